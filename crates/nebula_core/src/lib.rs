//! Simulation core for the nebula particle animation
//!
//! Four particle populations are generated once at startup and advanced
//! once per display refresh:
//!
//! - **Outer** shell: a deterministic spherical spiral, displaced every
//!   frame by band-limited noise and pushed around by the pointer.
//! - **Core**: a dense uniform-volume sphere, static apart from its rigid
//!   group transform.
//! - **Stars**: a background cube of points with a slow cumulative z-drift.
//! - **Energy**: a thin shell swirling around the origin.
//!
//! The crate owns all particle buffers and exposes them as read-only
//! views; the render bridge copies or binds them after each tick, guided
//! by per-population dirty flags.
//!
//! - [`SimulationState`] - aggregate of populations, clock, and parameters
//! - [`Population`] - rest/current positions, colors, group transform
//! - [`NoiseSource`] - pluggable displacement field ([`PerlinNoise`] or
//!   the lower-fidelity [`JitterNoise`] fallback)
//! - [`PointerMailbox`] - last-value-wins pointer register

mod population;
mod field;
mod noise;
mod pointer;
mod sim;

pub use population::{DirtyFlags, GroupTransform, Population};
pub use field::{CoreParams, EnergyParams, OuterParams, StarParams};
pub use noise::{JitterNoise, NoiseSource, PerlinNoise};
pub use pointer::{Pointer, PointerMailbox};
pub use sim::{SimParams, SimulationState};

// Re-export commonly used math types for convenience
pub use nebula_math::{Rgb, Vec3};
