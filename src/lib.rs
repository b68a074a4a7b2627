//! Nebula - a real-time particle animation
//!
//! Library surface for the application crate. The actual simulation and
//! rendering live in `nebula_core` and `nebula_render`; this crate holds
//! the configuration layer and the windowed application shell.

pub mod config;
