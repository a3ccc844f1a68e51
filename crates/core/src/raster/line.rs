//! Bresenham line with a linear color gradient

use crate::core_types::Rgba;
use crate::raster::PixelBuffer;

/// Draw the segment `p0`..=`p1` with a gradient from `color0` to `color1`.
///
/// The endpoints are ordered along the major axis first, so `color0` sits
/// at the end with the smaller major coordinate whichever way the segment
/// was given. Both endpoints are plotted. The blend factor of each pixel is
/// its Euclidean distance from that start over the segment length.
pub fn draw_line(
    buffer: &mut PixelBuffer,
    p0: (i32, i32),
    p1: (i32, i32),
    color0: Rgba,
    color1: Rgba,
) {
    let (dx, dy) = ((p1.0 - p0.0).abs(), (p1.1 - p0.1).abs());

    if dx > dy {
        let (start, end) = if p0.0 > p1.0 { (p1, p0) } else { (p0, p1) };
        let gradient = Gradient::new(start, end, color0, color1);
        walk(start, end, |major, minor| {
            let pixel = (major, minor);
            buffer.set(pixel.0, pixel.1, gradient.at(pixel));
        });
    } else {
        // Vertical-major: walk along y with x as the minor axis.
        let (start, end) = if p0.1 > p1.1 { (p1, p0) } else { (p0, p1) };
        let gradient = Gradient::new(start, end, color0, color1);
        walk((start.1, start.0), (end.1, end.0), |major, minor| {
            let pixel = (minor, major);
            buffer.set(pixel.0, pixel.1, gradient.at(pixel));
        });
    }
}

/// Step the major axis from `start.0` to `end.0` inclusive, calling
/// `plot(major, minor)` once per step. Requires `start.0 <= end.0`.
#[inline]
fn walk(start: (i32, i32), end: (i32, i32), mut plot: impl FnMut(i32, i32)) {
    let major = end.0 - start.0;
    let (minor, step) = if end.1 >= start.1 {
        (end.1 - start.1, 1)
    } else {
        (start.1 - end.1, -1)
    };

    let mut d = 2 * minor - major;
    let mut m = start.1;
    for a in start.0..=end.0 {
        plot(a, m);
        if d > 0 {
            m += step;
            d -= 2 * major;
        }
        d += 2 * minor;
    }
}

struct Gradient {
    start: (i32, i32),
    length: f64,
    from: Rgba,
    to: Rgba,
}

impl Gradient {
    fn new(start: (i32, i32), end: (i32, i32), from: Rgba, to: Rgba) -> Self {
        Self {
            start,
            length: distance(start, end),
            from,
            to,
        }
    }

    #[inline]
    fn at(&self, pixel: (i32, i32)) -> Rgba {
        let t = if self.length == 0.0 {
            1.0
        } else {
            distance(self.start, pixel) / self.length
        };
        self.from.lerp(self.to, t)
    }
}

#[inline]
fn distance(a: (i32, i32), b: (i32, i32)) -> f64 {
    f64::from(b.0 - a.0).hypot(f64::from(b.1 - a.1))
}
