//! # dimshift geometry
//!
//! Stateless conversion of collider geometry between a 3D volume and its
//! paired 2D planar shape.
//!
//! All mapping happens in the planar collider's local frame, whose Z axis is
//! the conversion axis (see [`PairFrame`]). Each shape kind has a mapper
//! implementing [`ShapeMapper`]:
//!
//! | volume       | planar      | mapper                         |
//! |--------------|-------------|--------------------------------|
//! | [`Sphere`]   | [`Circle`]  | [`SphereMapper`]               |
//! | [`Capsule`]  | [`Capsule2D`] | [`CapsuleMapper`]            |
//! | [`Cuboid`]   | [`Polygon`] | [`CuboidMapper`]               |
//! | [`MeshVolume`] | [`Polygon`] | [`MeshMapper`]               |
//!
//! The free functions in [`mappers`] are usable on their own for tooling.
//! Mesh shapes go through the [`outline`] extractor (silhouette render,
//! contour trace, simplification) and back through [`triangulate`].

pub mod extrude;
pub mod frame;
pub mod mapper;
pub mod mappers;
pub mod outline;
pub mod shapes;
pub mod simplify;
pub mod triangulate;

pub use extrude::{PolygonMeshOptions, polygon_to_mesh};
pub use frame::PairFrame;
pub use mapper::{MapEnv, MapOutcome, ShapeMapper, SkipReason};
pub use mappers::{CapsuleMapper, CuboidMapper, MeshMapper, SphereMapper};
pub use outline::{OutlineSettings, SilhouetteRenderer, SoftwareRenderer, extract_outline};
pub use shapes::{
    Axis, Capsule, Capsule2D, CapsuleDirection2D, Circle, Cuboid, MeshVolume, PlanarShape,
    PlanarVariant, Polygon, ShapeKind, Sphere, VolumeShape, VolumeVariant,
};
