//! Wireframe Heightmap Renderer Core Library
//!
//! Turns a plain-text height grid into a wireframe drawing. Every cell is a
//! 3D point `(col, row, height)`; neighbouring cells are joined by lines whose
//! color blends between the two endpoints.
//!
//! ## Pipeline
//!
//! - Map text is parsed into a jagged [`Grid`] of [`MapPoint`]s
//! - A [`Projection`] (direct or isometric) maps points to screen space
//! - Projected [`Bounds`] size the output and drive auto-fit to a screen
//! - A Bresenham rasterizer draws gradient lines into a [`PixelBuffer`]
//!
//! [`Engine`] ties these together over a [`MapSource`] and a [`RenderConfig`].

// Core types and utilities
pub mod core_types;

// Map loading and parsing
pub mod grid;

// Rendering pipeline
pub mod engine;
pub mod projection;
pub mod raster;

pub mod config;

// Re-export core types
pub use core_types::{Axis, InvalidAxis, Matrix3, Rgba, Vec3, VecOps};

// Re-export map types
pub use grid::{
    parse_map, DirectorySource, Grid, MapPoint, MapSource, MapSourceError, MemorySource,
    ParseError, ParserConfig,
};

// Re-export rendering types
pub use config::{ConfigError, RenderConfig};
pub use engine::{Engine, EngineError};
pub use projection::{
    auto_isometric, compute_bounds, Bounds, DirectProjection, IsometricProjection, Projection,
    ProjectionKind,
};
pub use raster::{draw_line, PixelBuffer};
