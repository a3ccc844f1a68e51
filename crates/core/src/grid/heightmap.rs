//! Parsed heightmap: a jagged grid of colored map points.

use crate::core_types::{Rgba, Vec3};

/// One cell of the map.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct MapPoint {
    /// Column index within its row (x)
    pub(crate) col: usize,
    /// Row index (y)
    pub(crate) row: usize,
    /// Height (z)
    pub(crate) height: i32,
    pub(crate) color: Rgba,
}

impl MapPoint {
    pub fn new(col: usize, row: usize, height: i32, color: Rgba) -> Self {
        Self {
            col,
            row,
            height,
            color,
        }
    }

    pub fn col(&self) -> usize {
        self.col
    }

    pub fn row(&self) -> usize {
        self.row
    }

    pub fn height(&self) -> i32 {
        self.height
    }

    pub fn color(&self) -> Rgba {
        self.color
    }

    /// Position as `(col, row, height)`.
    #[inline]
    pub fn vector(&self) -> Vec3 {
        Vec3::new(self.col as f64, self.row as f64, f64::from(self.height))
    }
}

/// Rows of map points. Rows may have different lengths.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Grid {
    rows: Vec<Vec<MapPoint>>,
}

impl Grid {
    pub fn from_rows(rows: Vec<Vec<MapPoint>>) -> Self {
        Self { rows }
    }

    pub fn rows(&self) -> &[Vec<MapPoint>] {
        &self.rows
    }

    pub fn row(&self, row: usize) -> Option<&[MapPoint]> {
        self.rows.get(row).map(Vec::as_slice)
    }

    pub fn row_count(&self) -> usize {
        self.rows.len()
    }

    /// Point at `(col, row)`, checked against that row's own length.
    pub fn get(&self, col: usize, row: usize) -> Option<&MapPoint> {
        self.rows.get(row).and_then(|r| r.get(col))
    }

    pub fn point_count(&self) -> usize {
        self.rows.iter().map(Vec::len).sum()
    }

    pub fn is_empty(&self) -> bool {
        self.point_count() == 0
    }

    /// All points in row-major order.
    pub fn iter_points(&self) -> impl Iterator<Item = &MapPoint> {
        self.rows.iter().flatten()
    }

    /// Lowest and highest height, or `None` for an empty grid.
    pub fn height_range(&self) -> Option<(i32, i32)> {
        self.iter_points().fold(None, |acc, p| match acc {
            None => Some((p.height, p.height)),
            Some((lo, hi)) => Some((lo.min(p.height), hi.max(p.height))),
        })
    }
}
