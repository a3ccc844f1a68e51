//! Projected bounds and auto-fit to a screen
//!
//! [`compute_bounds`] projects every grid point and returns the rectangle
//! that encloses them. The rectangle starts at the origin and only grows, so
//! it always contains `(0, 0)`.
//!
//! [`auto_isometric`] uses two bounds passes: one at unit scale to find the
//! largest integer scale that fits the screen with a 1/8 margin, and one at
//! that scale to center the drawing.

use tracing::debug;

use crate::core_types::{Vec3, VecOps};
use crate::grid::Grid;
use crate::projection::{IsometricProjection, Projection};

/// Axis-aligned integer rectangle, `min` inclusive and `max` exclusive when
/// used for pixel addressing.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub struct Bounds {
    pub min_x: i32,
    pub min_y: i32,
    pub max_x: i32,
    pub max_y: i32,
}

impl Bounds {
    pub const fn new(min_x: i32, min_y: i32, max_x: i32, max_y: i32) -> Self {
        Self {
            min_x,
            min_y,
            max_x,
            max_y,
        }
    }

    pub const fn width(&self) -> i32 {
        self.max_x - self.min_x
    }

    pub const fn height(&self) -> i32 {
        self.max_y - self.min_y
    }

    pub const fn is_empty(&self) -> bool {
        self.width() <= 0 || self.height() <= 0
    }

    /// Half-open containment, like an image rectangle.
    pub const fn contains(&self, x: i32, y: i32) -> bool {
        x >= self.min_x && x < self.max_x && y >= self.min_y && y < self.max_y
    }

    /// Same rectangle shifted by `(dx, dy)`.
    pub const fn translated(&self, dx: i32, dy: i32) -> Self {
        Self::new(
            self.min_x + dx,
            self.min_y + dy,
            self.max_x + dx,
            self.max_y + dy,
        )
    }
}

/// Smallest rectangle (grown from the origin) enclosing every projected point.
///
/// Heights are multiplied by `height_factor` before projecting, as when
/// drawing. Per axis the minimum is checked first and the maximum only when
/// the minimum did not move (`else if`).
pub fn compute_bounds(grid: &Grid, projection: &Projection, height_factor: f64) -> Bounds {
    let mut bounds = Bounds::default();

    for point in grid.iter_points() {
        let p = projection.project(&point.vector().scaled_z(height_factor));

        let (lo_x, hi_x) = (p.x.floor(), p.x.ceil());
        if lo_x < f64::from(bounds.min_x) {
            bounds.min_x = lo_x as i32;
        } else if hi_x > f64::from(bounds.max_x) {
            bounds.max_x = hi_x as i32;
        }

        let (lo_y, hi_y) = (p.y.floor(), p.y.ceil());
        if lo_y < f64::from(bounds.min_y) {
            bounds.min_y = lo_y as i32;
        } else if hi_y > f64::from(bounds.max_y) {
            bounds.max_y = hi_y as i32;
        }
    }

    bounds
}

/// Largest integer scale that fits `bounds` into 7/8 of the screen.
///
/// Integer division throughout. A zero span counts as one.
pub fn fit_scale(screen_width: u32, screen_height: u32, bounds: &Bounds) -> i32 {
    let (w, h) = (i64::from(screen_width), i64::from(screen_height));
    let span_x = i64::from(bounds.width()).max(1);
    let span_y = i64::from(bounds.height()).max(1);

    let scale = ((w - w / 8) / span_x).min((h - h / 8) / span_y);
    i32::try_from(scale).unwrap_or(i32::MAX)
}

/// Offset that moves `bounds` to the center of the screen.
///
/// An axis with a negative minimum is additionally shifted by `-min`.
pub fn offset_center(screen_width: u32, screen_height: u32, bounds: &Bounds) -> (i32, i32) {
    let mut offset_x =
        ((f64::from(screen_width) - f64::from(bounds.width())) / 2.0).round() as i32;
    let mut offset_y =
        ((f64::from(screen_height) - f64::from(bounds.height())) / 2.0).round() as i32;

    if bounds.min_x < 0 {
        offset_x -= bounds.min_x;
    }
    if bounds.min_y < 0 {
        offset_y -= bounds.min_y;
    }
    (offset_x, offset_y)
}

/// Isometric projection scaled and centered for a `screen_width` x
/// `screen_height` screen.
///
/// The derived scale still goes through the `[2, 100]` clamp, so maps too
/// large for the screen at scale 2 will overflow it.
pub fn auto_isometric(
    grid: &Grid,
    screen_width: u32,
    screen_height: u32,
    height_factor: f64,
) -> Projection {
    let unit_projection = Projection::Isometric(IsometricProjection::new(1.0));
    let unit_bounds = compute_bounds(grid, &unit_projection, height_factor);
    let scale = fit_scale(screen_width, screen_height, &unit_bounds);

    let mut projection = Projection::isometric(f64::from(scale));
    let scaled_bounds = compute_bounds(grid, &projection, height_factor);
    let (offset_x, offset_y) = offset_center(screen_width, screen_height, &scaled_bounds);
    projection.set_offset(Vec3::new(f64::from(offset_x), f64::from(offset_y), 0.0));

    debug!(
        "Auto-fit {}x{}: unit bounds {:?}, scale {} (applied {}), offset ({}, {})",
        screen_width,
        screen_height,
        unit_bounds,
        scale,
        projection.scale(),
        offset_x,
        offset_y
    );

    projection
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core_types::Rgba;
    use crate::grid::{parse_map, MapPoint, ParserConfig};

    fn grid_from(points: &[(usize, usize, i32)]) -> Grid {
        let mut rows: Vec<Vec<MapPoint>> = Vec::new();
        for &(col, row, height) in points {
            while rows.len() <= row {
                rows.push(Vec::new());
            }
            rows[row].push(MapPoint::new(col, row, height, Rgba::WHITE));
        }
        Grid::from_rows(rows)
    }

    #[test]
    fn test_bounds_enclose_negative_and_positive_points() {
        // Direct projection with an offset places the two points at
        // (-2, -3) and (4, 5).
        let grid = grid_from(&[(0, 0, 0), (6, 8, 0)]);
        let mut projection = Projection::direct();
        projection.set_offset(Vec3::new(-2.0, -3.0, 0.0));

        let bounds = compute_bounds(&grid, &projection, 1.0);
        assert_eq!(bounds, Bounds::new(-2, -3, 4, 5));
        assert_eq!(bounds.width(), 6);
        assert_eq!(bounds.height(), 8);
    }

    #[test]
    fn test_bounds_always_contain_origin() {
        let grid = grid_from(&[(5, 5, 0)]);
        let mut projection = Projection::direct();
        projection.set_offset(Vec3::new(10.0, 10.0, 0.0));
        // Min stays at zero even though every point is far from it.
        assert_eq!(
            compute_bounds(&grid, &projection, 1.0),
            Bounds::new(0, 0, 15, 15)
        );
    }

    #[test]
    fn test_bounds_floor_and_ceil_fractions() {
        let grid = grid_from(&[(0, 0, 0)]);
        let mut projection = Projection::direct();
        projection.set_offset(Vec3::new(2.5, -1.5, 0.0));
        assert_eq!(
            compute_bounds(&grid, &projection, 1.0),
            Bounds::new(0, -2, 3, 0)
        );
    }

    #[test]
    fn test_bounds_apply_height_factor() {
        let grid = parse_map("0 10\n0 0", &ParserConfig::default()).unwrap();
        let projection = Projection::Isometric(IsometricProjection::new(1.0));
        let flat = compute_bounds(&grid, &projection, 0.0);
        let tall = compute_bounds(&grid, &projection, 2.0);
        assert!(tall.height() > flat.height());
    }

    #[test]
    fn test_fit_scale_integer_math() {
        // (1024 - 128) / 10 = 89, (768 - 96) / 20 = 33
        assert_eq!(fit_scale(1024, 768, &Bounds::new(0, 0, 10, 20)), 33);
        assert_eq!(fit_scale(800, 800, &Bounds::new(-5, 0, 5, 7)), 70);
    }

    #[test]
    fn test_fit_scale_zero_span() {
        assert_eq!(fit_scale(80, 80, &Bounds::default()), 70);
    }

    #[test]
    fn test_offset_center() {
        assert_eq!(offset_center(100, 50, &Bounds::new(0, 0, 20, 10)), (40, 20));
        assert_eq!(
            offset_center(100, 50, &Bounds::new(-10, -4, 10, 6)),
            (50, 24)
        );
        // Rounds half away from zero.
        assert_eq!(offset_center(101, 51, &Bounds::new(0, 0, 20, 10)), (41, 21));
    }

    #[test]
    fn test_auto_isometric_fits_and_centers() {
        let text = "0 0 0 0 0\n0 5 5 5 0\n0 5 10 5 0\n0 5 5 5 0\n0 0 0 0 0\n";
        let grid = parse_map(text, &ParserConfig::default()).unwrap();
        let (w, h) = (640_u32, 480_u32);

        let projection = auto_isometric(&grid, w, h, 1.0);

        let unit_projection = Projection::Isometric(IsometricProjection::new(1.0));
        let unit = compute_bounds(&grid, &unit_projection, 1.0);
        let limit = (f64::from(w - w / 8) / f64::from(unit.width()))
            .min(f64::from(h - h / 8) / f64::from(unit.height()));
        assert!(projection.scale() <= limit.max(2.0));
        assert!(projection.scale() >= 2.0);

        let bounds = compute_bounds(&grid, &projection, 1.0);
        assert_eq!((bounds.min_x, bounds.min_y), (0, 0));
        assert!(bounds.max_x <= w as i32, "{bounds:?}");
        assert!(bounds.max_y <= h as i32, "{bounds:?}");

        for point in grid.iter_points() {
            let p = projection.project(&point.vector());
            assert!(p.x >= 0.0 && p.x <= f64::from(w));
            assert!(p.y >= 0.0 && p.y <= f64::from(h));
        }
    }

    #[test]
    fn test_translated_bounds() {
        let b = Bounds::new(-2, -3, 4, 5).translated(2, 3);
        assert_eq!(b, Bounds::new(0, 0, 6, 8));
        assert!(b.contains(0, 0));
        assert!(!b.contains(6, 0));
        assert!(!Bounds::default().contains(0, 0));
        assert!(Bounds::default().is_empty());
    }
}
