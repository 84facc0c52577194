//! The converter interface driven by the scheduler.

use std::any::Any;
use std::sync::Arc;

use dimshift_core::mesh::TriMesh;
use dimshift_geometry::{MapOutcome, SilhouetteRenderer, SkipReason};

use crate::adapters::AdapterRegistry;
use crate::direction::Direction;
use crate::error::ConversionError;
use crate::host::PhysicsHost;
use crate::overlap::OverlapSuppressor;
use crate::scene::{EntityId, Scene};
use crate::settings::ConversionMode;

/// Everything a converter may touch during one conversion step.
pub struct ConvertCx<'a> {
    pub scene: &'a mut Scene,
    pub host: &'a mut dyn PhysicsHost,
    /// Shared scratch rig for outline extraction.
    pub renderer: &'a mut dyn SilhouetteRenderer,
    pub overlaps: &'a mut OverlapSuppressor,
    pub adapters: &'a AdapterRegistry,
    pub mode: ConversionMode,
    /// Default for body converters without their own setting.
    pub suppress_overlaps: bool,
    /// Meshes replaced by polygon→mesh conversion that the caller keeps.
    pub replaced_meshes: &'a mut Vec<Arc<TriMesh>>,
    /// Mappings that left their target untouched during this step.
    pub skipped: Vec<SkipReason>,
}

impl ConvertCx<'_> {
    pub fn is_editing(&self) -> bool {
        self.mode == ConversionMode::Editing
    }

    /// Remember a skipped mapping so it shows up in the sweep report.
    pub fn note(&mut self, outcome: MapOutcome) {
        if let MapOutcome::Skipped(reason) = outcome {
            self.skipped.push(reason);
        }
    }
}

/// Upcast to [`Any`] for typed access to stored converters.
pub trait AsAny: Any {
    fn as_any(&self) -> &dyn Any;
    fn as_any_mut(&mut self) -> &mut dyn Any;
}

impl<T: Any> AsAny for T {
    fn as_any(&self) -> &dyn Any {
        self
    }

    fn as_any_mut(&mut self) -> &mut dyn Any {
        self
    }
}

/// One unit of conversion work bound to an entity.
///
/// All instances of a type share one [`ConversionOrder`](crate::ConversionOrder).
pub trait Converter: AsAny {
    fn entity(&self) -> EntityId;

    /// Move this converter's part of the entity into `direction`'s target
    /// representation.
    fn convert(&mut self, direction: Direction, cx: &mut ConvertCx<'_>) -> Result<(), ConversionError>;

    /// Whether part of the last conversion is waiting on another entity.
    fn is_pending(&self) -> bool {
        false
    }

    /// Retry the waiting part of the last conversion.
    fn resolve(&mut self, _cx: &mut ConvertCx<'_>) -> Result<(), ConversionError> {
        Ok(())
    }

    /// Remove the latent structure this converter created. Called once when
    /// the converter is removed from its context; the live representation
    /// stays on the entity.
    fn teardown(&mut self, _scene: &mut Scene) {}
}
