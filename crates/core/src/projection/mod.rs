//! 3D to 2D projections
//!
//! A [`Projection`] maps a map point (`col`, `row`, `height`) to screen space.
//! The Z component of the result is kept but never used by the rasterizer.
//!
//! # Variants
//!
//! - [`DirectProjection`]: pass-through plus offset. Scale and angle are
//!   stored or ignored but never affect the result.
//! - [`IsometricProjection`]: uniform scale, fixed camera rotation (Z, then X,
//!   then Y) and offset.
//!
//! Switching variants replaces the whole value; bounds must be recomputed
//! afterwards (see [`fit::compute_bounds`]).

pub mod fit;

pub use fit::{auto_isometric, compute_bounds, fit_scale, offset_center, Bounds};

use serde::{Deserialize, Serialize};

use crate::core_types::{Vec3, VecOps};

/// Smallest isometric scale accepted by [`IsometricProjection::set_scale`]
pub const MIN_SCALE: f64 = 2.0;
/// Largest isometric scale accepted by [`IsometricProjection::set_scale`]
pub const MAX_SCALE: f64 = 100.0;

/// Default camera rotation in radians: a 45° spin about Z, then a tilt of
/// `atan(√2)` about X, nothing about Y. This is the true isometric view.
pub fn default_camera_rotation() -> Vec3 {
    Vec3::new(std::f64::consts::SQRT_2.atan(), 0.0, std::f64::consts::FRAC_PI_4)
}

/// Which projection variant is active.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum ProjectionKind {
    Direct,
    Isometric,
}

/// Pass-through projection.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DirectProjection {
    offset: Vec3,
    scale: f64,
}

impl DirectProjection {
    pub fn new() -> Self {
        Self {
            offset: Vec3::zeros(),
            scale: 1.0,
        }
    }

    #[inline]
    pub fn project(&self, v: &Vec3) -> Vec3 {
        v.translated(&self.offset)
    }
}

impl Default for DirectProjection {
    fn default() -> Self {
        Self::new()
    }
}

/// Scale, rotate, translate.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct IsometricProjection {
    scale: f64,
    offset: Vec3,
    camera_rotation: Vec3,
}

impl IsometricProjection {
    /// Isometric projection with the default camera rotation.
    ///
    /// The scale is stored as given; only [`Self::set_scale`] clamps.
    pub fn new(scale: f64) -> Self {
        Self {
            scale,
            offset: Vec3::zeros(),
            camera_rotation: default_camera_rotation(),
        }
    }

    pub fn with_offset(mut self, offset: Vec3) -> Self {
        self.offset = offset;
        self
    }

    pub fn with_camera_rotation(mut self, angle: Vec3) -> Self {
        self.camera_rotation = angle;
        self
    }

    /// Store `scale` clamped to `[MIN_SCALE, MAX_SCALE]`.
    pub fn set_scale(&mut self, scale: f64) {
        let clamped = scale.clamp(MIN_SCALE, MAX_SCALE);
        if clamped != scale {
            tracing::debug!("Isometric scale {scale} clamped to {clamped}");
        }
        self.scale = clamped;
    }

    #[inline]
    pub fn project(&self, v: &Vec3) -> Vec3 {
        v.scaled(self.scale)
            .rotated(&self.camera_rotation)
            .translated(&self.offset)
    }
}

/// Active projection. Exactly two variants; callers swap the whole value.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum Projection {
    Direct(DirectProjection),
    Isometric(IsometricProjection),
}

impl Projection {
    pub fn direct() -> Self {
        Self::Direct(DirectProjection::new())
    }

    /// Isometric projection with the default camera rotation, scale clamped.
    pub fn isometric(scale: f64) -> Self {
        let mut iso = IsometricProjection::new(scale);
        iso.set_scale(scale);
        Self::Isometric(iso)
    }

    pub fn kind(&self) -> ProjectionKind {
        match self {
            Self::Direct(_) => ProjectionKind::Direct,
            Self::Isometric(_) => ProjectionKind::Isometric,
        }
    }

    /// Project a 3D point. The returned Z is depth and is not rasterized.
    #[inline]
    pub fn project(&self, v: &Vec3) -> Vec3 {
        match self {
            Self::Direct(p) => p.project(v),
            Self::Isometric(p) => p.project(v),
        }
    }

    pub fn offset(&self) -> Vec3 {
        match self {
            Self::Direct(p) => p.offset,
            Self::Isometric(p) => p.offset,
        }
    }

    pub fn set_offset(&mut self, offset: Vec3) {
        match self {
            Self::Direct(p) => p.offset = offset,
            Self::Isometric(p) => p.offset = offset,
        }
    }

    pub fn scale(&self) -> f64 {
        match self {
            Self::Direct(p) => p.scale,
            Self::Isometric(p) => p.scale,
        }
    }

    /// Direct stores the value without effect; isometric clamps it.
    pub fn set_scale(&mut self, scale: f64) {
        match self {
            Self::Direct(p) => p.scale = scale,
            Self::Isometric(p) => p.set_scale(scale),
        }
    }

    /// Camera rotation in radians; always zero for direct.
    pub fn angle(&self) -> Vec3 {
        match self {
            Self::Direct(_) => Vec3::zeros(),
            Self::Isometric(p) => p.camera_rotation,
        }
    }

    /// No-op for direct.
    pub fn set_angle(&mut self, angle: Vec3) {
        if let Self::Isometric(p) = self {
            p.camera_rotation = angle;
        }
    }
}

impl Default for Projection {
    fn default() -> Self {
        Self::direct()
    }
}
