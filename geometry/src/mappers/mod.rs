//! Mappers for each supported shape kind.
//!
//! Every mapper exposes free functions for standalone use plus a unit
//! struct implementing [`ShapeMapper`](crate::ShapeMapper) for the
//! conversion pipeline.

pub mod capsule;
pub mod cuboid;
pub mod mesh;
pub mod sphere;

pub use capsule::CapsuleMapper;
pub use cuboid::CuboidMapper;
pub use mesh::MeshMapper;
pub use sphere::SphereMapper;
