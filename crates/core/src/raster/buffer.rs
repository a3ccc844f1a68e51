//! RGBA pixel buffer addressed in projected coordinates.

use crate::core_types::Rgba;
use crate::projection::Bounds;

/// RGBA8 pixel buffer covering a [`Bounds`] rectangle.
///
/// Pixel `(x, y)` is stored at `(x - min_x, y - min_y)`, so callers can draw
/// with projected coordinates directly, including negative ones.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PixelBuffer {
    bounds: Bounds,
    pixels: Vec<Rgba>,
}

impl PixelBuffer {
    /// Buffer covering `bounds`, every pixel set to `fill`.
    ///
    /// Empty or inverted bounds give a zero-sized buffer.
    pub fn new(bounds: Bounds, fill: Rgba) -> Self {
        let len = bounds.width().max(0) as usize * bounds.height().max(0) as usize;
        Self {
            bounds,
            pixels: vec![fill; len],
        }
    }

    pub fn bounds(&self) -> Bounds {
        self.bounds
    }

    pub fn width(&self) -> u32 {
        self.bounds.width().max(0) as u32
    }

    pub fn height(&self) -> u32 {
        self.bounds.height().max(0) as u32
    }

    #[inline(always)]
    fn idx(&self, x: i32, y: i32) -> Option<usize> {
        if !self.bounds.contains(x, y) {
            return None;
        }
        let col = (x - self.bounds.min_x) as usize;
        let row = (y - self.bounds.min_y) as usize;
        Some(row * self.width() as usize + col)
    }

    pub fn get(&self, x: i32, y: i32) -> Option<Rgba> {
        self.idx(x, y).map(|i| self.pixels[i])
    }

    /// Write one pixel; writes outside the bounds are dropped.
    #[inline]
    pub fn set(&mut self, x: i32, y: i32, color: Rgba) {
        if let Some(i) = self.idx(x, y) {
            self.pixels[i] = color;
        }
    }

    pub fn fill(&mut self, color: Rgba) {
        self.pixels.fill(color);
    }

    pub fn pixels(&self) -> &[Rgba] {
        &self.pixels
    }

    /// Row-major `RGBA` bytes, top-left first.
    pub fn as_raw(&self) -> Vec<u8> {
        self.pixels
            .iter()
            .flat_map(|c| [c.r, c.g, c.b, c.a])
            .collect()
    }

    pub fn into_raw(self) -> Vec<u8> {
        self.as_raw()
    }

    /// Coordinates of every pixel that differs from `background`, row-major.
    pub fn lit_pixels(&self, background: Rgba) -> Vec<(i32, i32)> {
        let width = self.width() as usize;
        self.pixels
            .iter()
            .enumerate()
            .filter(|(_, c)| **c != background)
            .map(|(i, _)| {
                (
                    self.bounds.min_x + (i % width) as i32,
                    self.bounds.min_y + (i / width) as i32,
                )
            })
            .collect()
    }
}
