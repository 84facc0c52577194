//! Builtin converters.

mod attachment;
mod body;
mod shape;

pub use attachment::{ConstantForceConverter, JointConverter};
pub use body::BodyConverter;
pub use shape::{BoxConverter, CapsuleConverter, MeshConverter, ShapeConverter, SphereConverter};

use crate::converter::ConvertCx;
use crate::error::ConversionError;
use crate::scene::{EntityId, Scene};

/// Resolve the hidden entity holding latent state for `owner`.
///
/// A scratch entity is spawned on first use. One that went missing later is
/// recreated in editing mode and an error otherwise.
pub(crate) fn ensure_scratch(
    cx: &mut ConvertCx<'_>,
    owner: EntityId,
    slot: &mut Option<EntityId>,
    label: &str,
) -> Result<EntityId, ConversionError> {
    match *slot {
        Some(id) if cx.scene.contains(id) => return Ok(id),
        Some(_) if !cx.is_editing() => return Err(ConversionError::MissingScratchEntity(owner)),
        Some(_) => log::warn!("scratch entity of {owner:?} is missing, recreating"),
        None => {}
    }
    let id = cx.scene.spawn_scratch(owner, label);
    *slot = Some(id);
    Ok(id)
}

/// Despawn the scratch entity in `slot`, if any.
pub(crate) fn release_scratch(scene: &mut Scene, slot: &mut Option<EntityId>) {
    if let Some(id) = slot.take() {
        scene.despawn(id);
    }
}
