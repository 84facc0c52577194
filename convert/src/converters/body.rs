use dimshift_core::math::{Pose, pose};

use crate::body::Body3D;
use crate::converter::{ConvertCx, Converter};
use crate::converters::{ensure_scratch, release_scratch};
use crate::direction::Direction;
use crate::dynamics::{body_to_2d, body_to_3d};
use crate::error::ConversionError;
use crate::scene::{EntityId, Scene};

/// Moves an entity's dynamics body between [`Body3D`] and [`Body2D`].
///
/// The inactive body waits on a hidden scratch entity so its
/// out-of-plane state survives the round trip.
#[derive(Debug, Clone)]
pub struct BodyConverter {
    entity: EntityId,
    scratch: Option<EntityId>,
    suppress_overlaps: Option<bool>,
}

impl BodyConverter {
    pub fn new(entity: EntityId) -> Self {
        Self {
            entity,
            scratch: None,
            suppress_overlaps: None,
        }
    }

    /// Override the context's overlap suppression default.
    pub fn with_suppress_overlaps(mut self, suppress: bool) -> Self {
        self.suppress_overlaps = Some(suppress);
        self
    }

    pub fn scratch(&self) -> Option<EntityId> {
        self.scratch
    }

    fn to_planar(&mut self, cx: &mut ConvertCx<'_>) -> Result<(), ConversionError> {
        let entity = self.entity;
        if already_in(cx, entity, Direction::ToPlanar) {
            return Ok(());
        }
        let world = cx
            .scene
            .world_pose(entity)
            .ok_or(ConversionError::MissingEntity(entity))?;
        let scratch = ensure_scratch(cx, entity, &mut self.scratch, "body")?;

        let mut body3d = cx
            .scene
            .entity_mut(entity)
            .and_then(|e| e.body3d.take())
            .ok_or(ConversionError::MissingBody(entity))?;
        body3d.position = world.translation.vector;
        body3d.rotation = world.rotation;

        let latent = cx.scene.entity_mut(scratch).and_then(|s| s.body2d.take());
        let mut body2d = latent.unwrap_or_default();
        body_to_2d(&body3d, &mut body2d);

        if let Some(s) = cx.scene.entity_mut(scratch) {
            s.body3d = Some(body3d);
        }
        if let Some(e) = cx.scene.entity_mut(entity) {
            e.body2d = Some(body2d);
        }

        if self.suppress_overlaps.unwrap_or(cx.suppress_overlaps) {
            cx.overlaps.begin(entity, cx.scene, cx.host);
        }
        Ok(())
    }

    fn to_volume(&mut self, cx: &mut ConvertCx<'_>) -> Result<(), ConversionError> {
        let entity = self.entity;
        if already_in(cx, entity, Direction::ToVolume) {
            return Ok(());
        }
        let world = cx
            .scene
            .world_pose(entity)
            .ok_or(ConversionError::MissingEntity(entity))?;
        let scratch = ensure_scratch(cx, entity, &mut self.scratch, "body")?;

        let body2d = cx
            .scene
            .entity_mut(entity)
            .and_then(|e| e.body2d.take())
            .ok_or(ConversionError::MissingBody(entity))?;

        // A body authored in 2D has no latent 3D state; it keeps the
        // entity's depth.
        let latent = cx.scene.entity_mut(scratch).and_then(|s| s.body3d.take());
        let mut body3d = latent.unwrap_or_else(|| Body3D {
            position: world.translation.vector,
            ..Default::default()
        });
        body_to_3d(&body2d, &mut body3d);

        let parent_world = cx
            .scene
            .entity(entity)
            .and_then(|e| e.parent)
            .and_then(|p| cx.scene.world_pose(p))
            .unwrap_or_else(Pose::identity);
        let local = parent_world.inverse() * pose(body3d.position, body3d.rotation);

        if let Some(s) = cx.scene.entity_mut(scratch) {
            s.body2d = Some(body2d);
        }
        if let Some(e) = cx.scene.entity_mut(entity) {
            e.pose = local;
            e.body3d = Some(body3d);
        }

        cx.overlaps.clear(entity, cx.host);
        Ok(())
    }
}

/// The body already sits in `direction`'s target representation.
fn already_in(cx: &ConvertCx<'_>, entity: EntityId, direction: Direction) -> bool {
    cx.scene.entity(entity).is_some_and(|e| match direction {
        Direction::ToPlanar => e.body3d.is_none() && e.body2d.is_some(),
        Direction::ToVolume => e.body2d.is_none() && e.body3d.is_some(),
    })
}

impl Converter for BodyConverter {
    fn entity(&self) -> EntityId {
        self.entity
    }

    fn convert(&mut self, direction: Direction, cx: &mut ConvertCx<'_>) -> Result<(), ConversionError> {
        dimshift_core::profile_scope!("body converter");
        match direction {
            Direction::ToPlanar => self.to_planar(cx),
            Direction::ToVolume => self.to_volume(cx),
        }
    }

    fn teardown(&mut self, scene: &mut Scene) {
        release_scratch(scene, &mut self.scratch);
    }
}
