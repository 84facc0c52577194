//! # dimshift demos
//!
//! Scenes for the command-line demos.
//!
//! ## Available Demos
//!
//! - `flip_demo` - flips a mixed scene between 3D and 2D over several ticks

pub mod scenes;

/// Demos library version
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
