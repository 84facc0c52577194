//! # dimshift core
//!
//! Shared building blocks for the dimension-conversion crates:
//!
//! - [`math`] `f32` vector, rotation and pose aliases plus helpers
//! - [`mesh`] [`TriMesh`](mesh::TriMesh) collision meshes and generators
//! - [`cancellation`] [`CancellationToken`] for frame-spread work
//! - [`profiling`] optional Tracy instrumentation macros

pub mod cancellation;
pub mod math;
pub mod mesh;
pub mod profiling;

pub use cancellation::{CancellationToken, Cancelled};

/// Core library version
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
