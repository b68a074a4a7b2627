//! Render bridge for the nebula particle animation
//!
//! This crate is deliberately thin glue: the simulation core owns the
//! particle buffers and knows nothing about the GPU. The bridge copies
//! position/color buffers into wgpu vertex buffers (re-uploading only when
//! the core's dirty flags say so) and draws each population as a cloud of
//! additively blended point sprites.
//!
//! ## Key Components
//!
//! - [`context::RenderContext`] - wgpu device, queue, and surface management
//! - [`camera::Camera`] - fixed perspective viewpoint on the origin
//! - [`pipeline::PointPipeline`] - billboard point-sprite render pipeline
//! - [`point_cloud::PointCloud`] - GPU buffers for one population

pub mod context;
pub mod camera;
pub mod pipeline;
pub mod point_cloud;

pub use context::{ContextError, RenderContext};
pub use camera::Camera;
pub use pipeline::PointPipeline;
pub use point_cloud::PointCloud;
