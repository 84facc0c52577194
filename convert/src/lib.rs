//! # dimshift convert
//!
//! Runtime switching of scene entities between a 3D and a 2D physics
//! representation.
//!
//! A [`ConversionContext`] owns the converters of one simulation. Each
//! converter handles one part of an entity:
//!
//! - [`ShapeConverter`] one volume/planar collider pair, through a
//!   [`ShapeMapper`](dimshift_geometry::ShapeMapper)
//! - [`BodyConverter`] the dynamics body, with overlap suppression after a
//!   3D→2D switch
//! - [`ConstantForceConverter`] and [`JointConverter`] attachments, copied
//!   through the [`AdapterRegistry`]
//!
//! Converter types carry a [`ConversionOrder`]. A sweep runs them by
//! ascending priority and spreads each (priority, batch size) group over
//! several ticks; see [`schedule`].
//!
//! The physics engine is reached through [`PhysicsHost`]. [`AabbHost`] is a
//! bounding-box implementation; the `rapier` feature adds `RapierHost`.

pub mod adapters;
pub mod attachments;
pub mod body;
mod context;
pub mod converter;
pub mod converters;
mod direction;
pub mod dynamics;
mod error;
pub mod host;
mod order;
pub mod overlap;
#[cfg(feature = "rapier")]
pub mod rapier;
pub mod scene;
pub mod schedule;
mod settings;

pub use adapters::AdapterRegistry;
pub use attachments::{ConstantForce2D, ConstantForce3D, Joint2D, Joint3D, JointKind};
pub use body::{Body2D, Body3D, BodyType2D, Constraints2D, Constraints3D};
pub use context::ConversionContext;
pub use converter::{ConvertCx, Converter};
pub use converters::{
    BodyConverter, BoxConverter, CapsuleConverter, ConstantForceConverter, JointConverter,
    MeshConverter, ShapeConverter, SphereConverter,
};
pub use direction::{Dimension, Direction};
pub use error::{ConversionError, SettingsError};
pub use host::{AabbHost, NoopHost, PhysicsHost};
pub use order::ConversionOrder;
pub use overlap::OverlapState;
#[cfg(feature = "rapier")]
pub use rapier::RapierHost;
pub use scene::{Entity, EntityId, MaterialId, Scene, ShapeId};
pub use schedule::{ConverterId, SweepReport, SweepStatus};
pub use settings::{ConversionMode, ConversionSettings};
