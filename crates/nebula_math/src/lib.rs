//! Math support for the nebula particle animation
//!
//! This crate provides the small set of numeric types the simulation and
//! renderer share.
//!
//! ## Core Types
//!
//! - [`Vec3`] - 3D vector with x, y, z components
//! - [`Rgb`] - RGB color in [0, 1] per channel
//! - [`Mat4`] - 4x4 matrix (column-major) for render transforms

mod vec3;
mod color;
pub mod mat4;

pub use vec3::Vec3;
pub use color::Rgb;
pub use mat4::Mat4;
