//! Render engine
//!
//! [`Engine`] owns the loaded grid, the active [`Projection`] and the height
//! factor, and turns them into a [`PixelBuffer`]. All state changes go
//! through its setters; [`Engine::draw`] only reads.

use std::fmt;

use tracing::{debug, info, trace};

use crate::config::RenderConfig;
use crate::core_types::{Vec3, VecOps};
use crate::grid::{parse_map, Grid, MapPoint, MapSource, MapSourceError, ParseError};
use crate::projection::{self, compute_bounds, default_camera_rotation, Bounds, Projection};
use crate::raster::{draw_line, PixelBuffer};

/// Errors that can occur while loading maps or fitting the view
#[derive(Debug)]
pub enum EngineError {
    /// The map source could not provide the map
    Source(MapSourceError),
    /// The map text is malformed
    Parse { name: String, source: ParseError },
    /// Auto-fit was asked for a screen with no area
    EmptyScreen { width: u32, height: u32 },
}

impl fmt::Display for EngineError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            EngineError::Source(e) => write!(f, "{e}"),
            EngineError::Parse { name, source } => {
                write!(f, "failed to parse map {name:?}: {source}")
            }
            EngineError::EmptyScreen { width, height } => {
                write!(f, "cannot fit map to a {width}x{height} screen")
            }
        }
    }
}

impl std::error::Error for EngineError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            EngineError::Source(e) => Some(e),
            EngineError::Parse { source, .. } => Some(source),
            EngineError::EmptyScreen { .. } => None,
        }
    }
}

impl From<MapSourceError> for EngineError {
    fn from(e: MapSourceError) -> Self {
        EngineError::Source(e)
    }
}

fn log_loaded(name: &str, grid: &Grid) {
    let (low, high) = grid.height_range().unwrap_or_default();
    info!(
        "Loaded map {:?}: {} rows, {} points, heights {}..={}",
        name,
        grid.row_count(),
        grid.point_count(),
        low,
        high
    );
}

/// Wireframe renderer over maps from a [`MapSource`].
pub struct Engine<S: MapSource> {
    source: S,
    config: RenderConfig,
    grid: Grid,
    map_name: String,
    /// Projection as handed to [`Engine::set_projection`]
    base: Projection,
    /// `base` shifted so no bound is negative; this one draws
    projection: Projection,
    height_factor: f64,
}

impl<S: MapSource> Engine<S> {
    /// Load `name` from `source` and start with a direct projection.
    ///
    /// # Errors
    /// Returns error if the map cannot be read or parsed
    pub fn new(source: S, name: &str, config: RenderConfig) -> Result<Self, EngineError> {
        let grid = Self::read_grid(&source, name, &config)?;
        log_loaded(name, &grid);

        Ok(Self {
            source,
            height_factor: config.height_factor,
            config,
            grid,
            map_name: name.to_string(),
            base: Projection::direct(),
            projection: Projection::direct(),
        })
    }

    fn read_grid(source: &S, name: &str, config: &RenderConfig) -> Result<Grid, EngineError> {
        let text = source.read(name)?;
        parse_map(&text, &config.parser_config()).map_err(|source| EngineError::Parse {
            name: name.to_string(),
            source,
        })
    }

    /// Replace the grid with the named map.
    ///
    /// On error the current map stays loaded.
    ///
    /// # Errors
    /// Returns error if the map cannot be read or parsed
    pub fn load_map(&mut self, name: &str) -> Result<(), EngineError> {
        info!("Loading map {:?}", name);
        let grid = Self::read_grid(&self.source, name, &self.config)?;
        log_loaded(name, &grid);
        self.grid = grid;
        self.map_name = name.to_string();
        self.reproject();
        Ok(())
    }

    pub fn list_maps(&self) -> Vec<String> {
        self.source.list()
    }

    pub fn current_map_name(&self) -> &str {
        &self.map_name
    }

    /// Name following the current map in [`Self::list_maps`], wrapping
    /// around. Falls back to the first map if the current one is not listed.
    pub fn next_map_name(&self) -> Option<String> {
        let maps = self.list_maps();
        let next = maps
            .iter()
            .position(|m| *m == self.map_name)
            .map_or(0, |i| (i + 1) % maps.len());
        maps.into_iter().nth(next)
    }

    pub fn grid(&self) -> &Grid {
        &self.grid
    }

    pub fn config(&self) -> &RenderConfig {
        &self.config
    }

    pub fn projection(&self) -> &Projection {
        &self.projection
    }

    /// Projection as last installed, without the non-negativity shift.
    pub fn base_projection(&self) -> &Projection {
        &self.base
    }

    /// Install `projection` and shift it so no bound is negative.
    ///
    /// On every axis whose minimum is `<= 0` the offset of `projection` grows
    /// by `-min`. The shift is derived from `projection` alone, never from
    /// the previously installed one. Returns the bounds after the shift.
    pub fn set_projection(&mut self, projection: Projection) -> Bounds {
        self.base = projection;
        self.reproject()
    }

    /// Rebuild the drawing projection from `base` for the current grid and
    /// height factor.
    fn reproject(&mut self) -> Bounds {
        self.projection = self.base.clone();

        let bounds = self.bounds();
        let mut offset = self.base.offset();
        if bounds.min_x <= 0 {
            offset.x -= f64::from(bounds.min_x);
        }
        if bounds.min_y <= 0 {
            offset.y -= f64::from(bounds.min_y);
        }
        self.projection.set_offset(offset);

        let bounds = self.bounds();
        debug!("Projection {:?} bounds {:?}", self.projection.kind(), bounds);
        bounds
    }

    pub fn height_factor(&self) -> f64 {
        self.height_factor
    }

    /// Heights are scaled by `factor` on every draw. The non-negativity
    /// shift is recomputed for the new heights.
    pub fn set_height_factor(&mut self, factor: f64) {
        self.height_factor = factor;
        self.reproject();
    }

    /// Bounds of the current grid under the current projection.
    pub fn bounds(&self) -> Bounds {
        compute_bounds(&self.grid, &self.projection, self.height_factor)
    }

    /// Switch to an isometric projection scaled and centered for the screen.
    ///
    /// # Errors
    /// Returns [`EngineError::EmptyScreen`] if either dimension is zero
    pub fn auto_isometric(
        &mut self,
        screen_width: u32,
        screen_height: u32,
    ) -> Result<Bounds, EngineError> {
        if screen_width == 0 || screen_height == 0 {
            return Err(EngineError::EmptyScreen {
                width: screen_width,
                height: screen_height,
            });
        }
        let fitted = projection::auto_isometric(
            &self.grid,
            screen_width,
            screen_height,
            self.height_factor,
        );
        Ok(self.set_projection(fitted))
    }

    pub fn adjust_scale(&mut self, delta: f64) -> Bounds {
        let mut next = self.base.clone();
        next.set_scale(next.scale() + delta);
        self.set_projection(next)
    }

    pub fn adjust_angle(&mut self, delta: Vec3) -> Bounds {
        let mut next = self.base.clone();
        next.set_angle(next.angle() + delta);
        self.set_projection(next)
    }

    /// Set every camera angle to zero (looking straight down).
    pub fn zero_angle(&mut self) -> Bounds {
        let mut next = self.base.clone();
        next.set_angle(Vec3::zeros());
        self.set_projection(next)
    }

    /// Restore the isometric camera rotation, keeping scale and offset.
    pub fn reset_isometric_angle(&mut self) -> Bounds {
        let mut next = self.base.clone();
        next.set_angle(default_camera_rotation());
        self.set_projection(next)
    }

    pub fn adjust_height_factor(&mut self, delta: f64) -> Bounds {
        self.height_factor += delta;
        self.reproject()
    }

    #[inline]
    fn pixel(&self, point: &MapPoint) -> (i32, i32) {
        let p = self
            .projection
            .project(&point.vector().scaled_z(self.height_factor));
        (p.x.floor() as i32, p.y.floor() as i32)
    }

    /// Render the wireframe into a new buffer covering the current bounds.
    ///
    /// Each point is joined to its right neighbour and to the point below
    /// it, when the next row is long enough.
    pub fn draw(&self) -> PixelBuffer {
        let mut buffer = PixelBuffer::new(self.bounds(), self.config.background);
        let rows = self.grid.rows();

        for (row, line) in rows.iter().enumerate() {
            for (col, point) in line.iter().enumerate() {
                let from = self.pixel(point);

                if let Some(right) = line.get(col + 1) {
                    draw_line(&mut buffer, from, self.pixel(right), point.color(), right.color());
                }
                if let Some(below) = rows.get(row + 1).and_then(|next| next.get(col)) {
                    draw_line(&mut buffer, from, self.pixel(below), point.color(), below.color());
                }
            }
        }

        trace!(
            "Drew {:?} ({}x{})",
            self.map_name,
            buffer.width(),
            buffer.height()
        );
        buffer
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core_types::Rgba;
    use crate::grid::MemorySource;

    fn engine(maps: &[(&str, &str)]) -> Engine<MemorySource> {
        let mut source = MemorySource::new();
        for (name, text) in maps {
            source.insert(*name, *text);
        }
        Engine::new(source, maps[0].0, RenderConfig::default()).unwrap()
    }

    #[test]
    fn test_new_starts_direct() {
        let e = engine(&[("flat", "0 0 0\n0 0 0\n0 0 0")]);
        assert_eq!(e.projection(), &Projection::direct());
        assert_eq!(e.height_factor(), 1.0);
        assert_eq!(e.current_map_name(), "flat");
        assert_eq!(e.grid().point_count(), 9);
    }

    #[test]
    fn test_new_reports_missing_and_malformed_maps() {
        let source = MemorySource::new().with_map("bad", "0 x");
        assert!(matches!(
            Engine::new(source.clone(), "missing", RenderConfig::default()),
            Err(EngineError::Source(MapSourceError::NotFound(_)))
        ));
        let err = Engine::new(source, "bad", RenderConfig::default())
            .err()
            .unwrap();
        assert!(matches!(
            &err,
            EngineError::Parse { name, source: ParseError::InvalidHeight { .. } } if name == "bad"
        ));
        assert!(std::error::Error::source(&err).is_some());
    }

    #[test]
    fn test_direct_draw_flat_grid() {
        let e = engine(&[("flat", "0 0 0\n0 0 0\n0 0 0")]);
        let buf = e.draw();
        assert_eq!(buf.bounds(), Bounds::new(0, 0, 2, 2));
        // The last row and column sit on the exclusive max edge.
        assert_eq!(
            buf.lit_pixels(Rgba::BLACK),
            vec![(0, 0), (1, 0), (0, 1), (1, 1)]
        );
        assert_eq!(buf.get(0, 0), Some(Rgba::WHITE));
    }

    #[test]
    fn test_draw_uses_background_and_point_colors() {
        let config = RenderConfig {
            background: Rgba::rgb(0, 0, 64),
            ..RenderConfig::default()
        };
        let source = MemorySource::new().with_map("m", "0,0xFF0000 0 0\n0 0 0\n0 0 0");
        let e = Engine::new(source, "m", config).unwrap();
        let buf = e.draw();
        assert_eq!(buf.get(0, 0), Some(Rgba::rgb(255, 0, 0)));
        assert_eq!(buf.lit_pixels(Rgba::rgb(0, 0, 64)).len(), 4);
    }

    #[test]
    fn test_draw_is_read_only() {
        let mut e = engine(&[("pyramid", "0 0 0\n0 9 0\n0 0 0")]);
        e.auto_isometric(200, 200).unwrap();
        let before = e.projection().clone();
        let first = e.draw();
        let second = e.draw();
        assert_eq!(first, second);
        assert_eq!(e.projection(), &before);
    }

    #[test]
    fn test_jagged_rows() {
        let e = engine(&[("jagged", "0 0 0 0\n0\n0 0")]);
        let buf = e.draw();
        // Row 1 has a single point, so nothing links (1..=3, 0) downwards.
        assert_eq!(buf.bounds(), Bounds::new(0, 0, 3, 2));
        assert_eq!(
            buf.lit_pixels(Rgba::BLACK),
            vec![(0, 0), (1, 0), (2, 0), (0, 1)]
        );
    }

    #[test]
    fn test_set_projection_shifts_negative_bounds() {
        let mut e = engine(&[("flat", "0 0 0\n0 0 0")]);
        let mut p = Projection::direct();
        p.set_offset(Vec3::new(-5.0, -7.0, 0.0));

        let bounds = e.set_projection(p);
        assert_eq!((bounds.min_x, bounds.min_y), (0, 0));
        assert_eq!(e.projection().offset(), Vec3::new(0.0, 0.0, 0.0));
        assert_eq!(e.base_projection().offset(), Vec3::new(-5.0, -7.0, 0.0));
        assert_eq!(bounds, e.bounds());
    }

    #[test]
    fn test_set_projection_keeps_positive_offset() {
        let mut e = engine(&[("flat", "0 0\n0 0")]);
        let mut p = Projection::direct();
        p.set_offset(Vec3::new(10.0, 20.0, 0.0));
        let bounds = e.set_projection(p);
        assert_eq!(e.projection().offset(), Vec3::new(10.0, 20.0, 0.0));
        assert_eq!(bounds, Bounds::new(0, 0, 11, 21));
    }

    #[test]
    fn test_isometric_bounds_are_non_negative() {
        let mut e = engine(&[("pyramid", "0 0 0\n0 9 0\n0 0 0")]);
        let bounds = e.set_projection(Projection::isometric(10.0));
        assert!(bounds.min_x >= 0 && bounds.min_y >= 0, "{bounds:?}");
        for point in e.grid().iter_points() {
            let (x, y) = e.pixel(point);
            assert!(x >= 0 && y >= 0);
        }
    }

    #[test]
    fn test_auto_isometric_fits_screen() {
        let mut e = engine(&[("pyramid", "0 0 0 0\n0 5 5 0\n0 5 5 0\n0 0 0 0")]);
        let bounds = e.auto_isometric(400, 300).unwrap();
        assert_eq!(e.projection().kind(), projection::ProjectionKind::Isometric);
        assert!(bounds.max_x <= 400 && bounds.max_y <= 300, "{bounds:?}");
        assert!(!e.draw().lit_pixels(Rgba::BLACK).is_empty());
    }

    #[test]
    fn test_auto_isometric_rejects_empty_screen() {
        let mut e = engine(&[("flat", "0 0\n0 0")]);
        assert!(matches!(
            e.auto_isometric(0, 100),
            Err(EngineError::EmptyScreen { width: 0, height: 100 })
        ));
        assert_eq!(e.projection(), &Projection::direct());
    }

    #[test]
    fn test_height_factor_changes_drawing() {
        let mut e = engine(&[("spike", "0 0 0\n0 20 0\n0 0 0")]);
        e.set_projection(Projection::isometric(10.0));
        let tall = e.draw();
        e.set_height_factor(0.0);
        e.set_projection(e.projection().clone());
        let flat = e.draw();
        assert!(tall.height() > flat.height());
    }

    #[test]
    fn test_load_map_replaces_only_on_success() {
        let mut e = engine(&[("a", "0 0\n0 0"), ("b", "1 2 3"), ("c", "0 0x")]);
        e.load_map("b").unwrap();
        assert_eq!(e.current_map_name(), "b");
        assert_eq!(e.grid().point_count(), 3);

        assert!(e.load_map("c").is_err());
        assert!(e.load_map("zzz").is_err());
        assert_eq!(e.current_map_name(), "b");
        assert_eq!(e.grid().point_count(), 3);
    }

    #[test]
    fn test_map_cycling() {
        let mut e = engine(&[("b", "0"), ("a", "0"), ("c", "0")]);
        assert_eq!(e.list_maps(), vec!["a", "b", "c"]);
        assert_eq!(e.next_map_name().as_deref(), Some("c"));
        e.load_map("c").unwrap();
        assert_eq!(e.next_map_name().as_deref(), Some("a"));
    }

    #[test]
    fn test_adjustments() {
        let mut e = engine(&[("pyramid", "0 0 0\n0 9 0\n0 0 0")]);
        e.set_projection(Projection::isometric(10.0));

        e.adjust_scale(5.0);
        assert_eq!(e.projection().scale(), 15.0);
        e.adjust_scale(-1000.0);
        assert_eq!(e.projection().scale(), projection::MIN_SCALE);

        e.adjust_angle(Vec3::new(0.1, 0.0, 0.0));
        assert_ne!(e.projection().angle(), default_camera_rotation());
        e.zero_angle();
        assert_eq!(e.projection().angle(), Vec3::zeros());
        e.reset_isometric_angle();
        assert_eq!(e.projection().angle(), default_camera_rotation());

        let bounds = e.adjust_height_factor(-0.5);
        assert_eq!(e.height_factor(), 0.5);
        assert!(bounds.min_x >= 0 && bounds.min_y >= 0);
    }

    #[test]
    fn test_undone_adjustments_restore_bounds() {
        let mut e = engine(&[("spike", "0 0 0\n0 20 0\n0 0 0")]);
        let fresh = e.set_projection(Projection::isometric(10.0));
        let fresh_offset = e.projection().offset();

        e.adjust_height_factor(2.0);
        assert_eq!(e.adjust_height_factor(-2.0), fresh);
        assert_eq!(e.projection().offset(), fresh_offset);

        e.adjust_scale(40.0);
        assert_eq!(e.adjust_scale(-40.0), fresh);
        assert_eq!(e.projection().offset(), fresh_offset);
        assert_eq!(e.draw().bounds(), fresh);
    }

    #[test]
    fn test_lowered_height_factor_matches_fresh_engine() {
        let text = "0 0 0\n0 20 0\n0 0 0";
        let mut e = engine(&[("spike", text)]);
        e.set_projection(Projection::isometric(10.0));
        e.set_height_factor(0.0);

        let config = RenderConfig {
            height_factor: 0.0,
            ..RenderConfig::default()
        };
        let mut flat =
            Engine::new(MemorySource::new().with_map("spike", text), "spike", config).unwrap();
        let expected = flat.set_projection(Projection::isometric(10.0));

        assert_eq!(e.bounds(), expected);
        assert_eq!(e.projection(), flat.projection());
    }

    #[test]
    fn test_zoom_out_drops_stale_shift() {
        let text = "0 0 0 0\n0 3 3 0\n0 3 3 0\n0 0 0 0";
        let mut e = engine(&[("m", text)]);
        e.set_projection(Projection::isometric(50.0));
        let zoomed_out = e.adjust_scale(-48.0);

        let mut fresh = engine(&[("m", text)]);
        let expected = fresh.set_projection(Projection::isometric(2.0));

        assert_eq!(e.projection().scale(), 2.0);
        assert_eq!(zoomed_out, expected);
        assert_eq!(e.projection().offset(), fresh.projection().offset());
    }

    #[test]
    fn test_load_map_recomputes_shift() {
        let mut e = engine(&[
            ("wide", "0 0 0 0 0 0 0 0\n0 0 0 0 0 0 0 0"),
            ("small", "0 0\n0 0"),
        ]);
        e.set_projection(Projection::isometric(10.0));
        e.load_map("small").unwrap();

        let mut fresh = engine(&[("small", "0 0\n0 0")]);
        let expected = fresh.set_projection(Projection::isometric(10.0));
        assert_eq!(e.draw().bounds(), expected);
    }
}
