//! Core types and utilities

pub mod color;
pub mod vec3;

pub use color::{ColorError, Rgba};
pub use vec3::{rotation_matrix, Axis, InvalidAxis, Matrix3, Vec3, VecOps};
