//! Vector and matrix aliases for the projection pipeline.
//!
//! `Vec3` and `Matrix3` are plain nalgebra types. The operations the
//! pipeline needs (uniform scale, height scale, translation, axis rotations)
//! live on the [`VecOps`] extension trait so every step returns a new value.

use std::fmt;
use std::str::FromStr;

use nalgebra::{Matrix3 as NaMatrix3, Vector3};

/// 3D vector type for map points, projected points, offsets and camera angles.
pub type Vec3 = Vector3<f64>;

/// 3x3 matrix type used for rotations.
pub type Matrix3 = NaMatrix3<f64>;

/// Rotation axis.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Axis {
    X,
    Y,
    Z,
}

/// Returned when an axis name is not one of `x`, `y` or `z`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct InvalidAxis(pub String);

impl fmt::Display for InvalidAxis {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "invalid rotation axis {:?}, expected x, y or z", self.0)
    }
}

impl std::error::Error for InvalidAxis {}

impl FromStr for Axis {
    type Err = InvalidAxis;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "x" => Ok(Self::X),
            "y" => Ok(Self::Y),
            "z" => Ok(Self::Z),
            _ => Err(InvalidAxis(s.to_string())),
        }
    }
}

/// Rotation matrix about `axis` by `angle` radians (right-hand rule).
///
/// Every axis takes radians, including Z.
pub fn rotation_matrix(angle: f64, axis: Axis) -> Matrix3 {
    let (sin, cos) = angle.sin_cos();
    match axis {
        Axis::X => Matrix3::new(
            1.0, 0.0, 0.0, //
            0.0, cos, -sin, //
            0.0, sin, cos,
        ),
        Axis::Y => Matrix3::new(
            cos, 0.0, sin, //
            0.0, 1.0, 0.0, //
            -sin, 0.0, cos,
        ),
        Axis::Z => Matrix3::new(
            cos, -sin, 0.0, //
            sin, cos, 0.0, //
            0.0, 0.0, 1.0,
        ),
    }
}

/// Value-returning operations on [`Vec3`].
pub trait VecOps {
    /// Scale all three components.
    fn scaled(&self, factor: f64) -> Self;

    /// Scale only the Z (height) component.
    fn scaled_z(&self, factor: f64) -> Self;

    /// Component-wise addition.
    fn translated(&self, offset: &Self) -> Self;

    /// `m * v`: row `i` of `m` dotted with `v` gives component `i`.
    fn multiply_matrix(&self, m: &Matrix3) -> Self;

    /// Rotate by `angles` (radians per axis), applied Z first, then X, then Y.
    fn rotated(&self, angles: &Self) -> Self;
}

impl VecOps for Vec3 {
    #[inline]
    fn scaled(&self, factor: f64) -> Self {
        self * factor
    }

    #[inline]
    fn scaled_z(&self, factor: f64) -> Self {
        Vec3::new(self.x, self.y, self.z * factor)
    }

    #[inline]
    fn translated(&self, offset: &Self) -> Self {
        self + offset
    }

    #[inline]
    fn multiply_matrix(&self, m: &Matrix3) -> Self {
        m * self
    }

    fn rotated(&self, angles: &Self) -> Self {
        self.multiply_matrix(&rotation_matrix(angles.z, Axis::Z))
            .multiply_matrix(&rotation_matrix(angles.x, Axis::X))
            .multiply_matrix(&rotation_matrix(angles.y, Axis::Y))
    }
}
