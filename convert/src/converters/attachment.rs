use dimshift_core::math::Vec3;

use crate::converter::{ConvertCx, Converter};
use crate::converters::{ensure_scratch, release_scratch};
use crate::direction::{Dimension, Direction};
use crate::error::ConversionError;
use crate::scene::{EntityId, Scene};

/// Moves a constant force between its 3D and 2D form through the adapter
/// registry.
#[derive(Debug, Clone)]
pub struct ConstantForceConverter {
    entity: EntityId,
    scratch: Option<EntityId>,
}

impl ConstantForceConverter {
    pub fn new(entity: EntityId) -> Self {
        Self {
            entity,
            scratch: None,
        }
    }
}

impl Converter for ConstantForceConverter {
    fn entity(&self) -> EntityId {
        self.entity
    }

    fn convert(&mut self, direction: Direction, cx: &mut ConvertCx<'_>) -> Result<(), ConversionError> {
        let entity = self.entity;
        let live = cx
            .scene
            .entity(entity)
            .ok_or(ConversionError::MissingEntity(entity))?;

        match direction {
            Direction::ToPlanar => {
                let Some(src) = live.force3d.clone() else {
                    return Ok(());
                };
                let scratch = ensure_scratch(cx, entity, &mut self.scratch, "force")?;
                let latent = cx.scene.entity_mut(scratch).and_then(|s| s.force2d.take());
                let mut dst = latent.unwrap_or_default();
                cx.adapters.copy(&src, &mut dst)?;

                if let Some(s) = cx.scene.entity_mut(scratch) {
                    s.force3d = Some(src);
                }
                if let Some(e) = cx.scene.entity_mut(entity) {
                    e.force3d = None;
                    e.force2d = Some(dst);
                }
            }
            Direction::ToVolume => {
                let Some(src) = live.force2d.clone() else {
                    return Ok(());
                };
                let scratch = ensure_scratch(cx, entity, &mut self.scratch, "force")?;
                let latent = cx.scene.entity_mut(scratch).and_then(|s| s.force3d.take());
                let mut dst = latent.unwrap_or_default();
                cx.adapters.copy(&src, &mut dst)?;

                if let Some(s) = cx.scene.entity_mut(scratch) {
                    s.force2d = Some(src);
                }
                if let Some(e) = cx.scene.entity_mut(entity) {
                    e.force2d = None;
                    e.force3d = Some(dst);
                }
            }
        }
        Ok(())
    }

    fn teardown(&mut self, scene: &mut Scene) {
        release_scratch(scene, &mut self.scratch);
    }
}

/// Connection held back until the connected entity reaches the same
/// dimension.
#[derive(Debug, Clone, Copy, PartialEq)]
struct PendingConnection {
    direction: Direction,
    connected: EntityId,
    /// In the connected entity's local frame.
    connected_anchor: Vec3,
}

/// Moves a joint between its 3D and 2D form.
///
/// A joint cannot connect bodies living in different dimensions. When the
/// connected entity has not converted yet, the live joint is pinned to the
/// world at its current anchor and the connection is restored by
/// [`Converter::resolve`] once the other side catches up.
#[derive(Debug, Clone)]
pub struct JointConverter {
    entity: EntityId,
    scratch: Option<EntityId>,
    pending: Option<PendingConnection>,
}

impl JointConverter {
    pub fn new(entity: EntityId) -> Self {
        Self {
            entity,
            scratch: None,
            pending: None,
        }
    }

    /// World position of an anchor given in the owner's frame.
    fn world_anchor(cx: &ConvertCx<'_>, entity: EntityId, anchor: &Vec3) -> Vec3 {
        cx.scene
            .world_pose(entity)
            .map_or(*anchor, |pose| pose.transform_point(&(*anchor).into()).coords)
    }

    fn in_dimension(cx: &ConvertCx<'_>, entity: EntityId, dimension: Dimension) -> bool {
        cx.scene
            .entity(entity)
            .is_some_and(|e| e.dimension == dimension)
    }

    fn to_planar(&mut self, cx: &mut ConvertCx<'_>) -> Result<(), ConversionError> {
        let entity = self.entity;
        let Some(src) = cx.scene.entity(entity).and_then(|e| e.joint3d.clone()) else {
            return Ok(());
        };
        let scratch = ensure_scratch(cx, entity, &mut self.scratch, "joint")?;
        let latent = cx.scene.entity_mut(scratch).and_then(|s| s.joint2d.take());
        let mut dst = latent.unwrap_or_default();
        cx.adapters.copy(&src, &mut dst)?;

        self.pending = None;
        if let Some(other) = src.connected
            && !Self::in_dimension(cx, other, Dimension::Planar)
        {
            let world = Self::world_anchor(cx, entity, &src.anchor);
            dst.connected = None;
            dst.connected_anchor = world.xy();
            self.pending = Some(PendingConnection {
                direction: Direction::ToPlanar,
                connected: other,
                connected_anchor: src.connected_anchor,
            });
            log::debug!("joint of {entity:?} waits for {other:?} to go planar");
        }

        if let Some(s) = cx.scene.entity_mut(scratch) {
            s.joint3d = Some(src);
        }
        if let Some(e) = cx.scene.entity_mut(entity) {
            e.joint3d = None;
            e.joint2d = Some(dst);
        }
        Ok(())
    }

    fn to_volume(&mut self, cx: &mut ConvertCx<'_>) -> Result<(), ConversionError> {
        let entity = self.entity;
        let Some(mut src) = cx.scene.entity(entity).and_then(|e| e.joint2d.clone()) else {
            return Ok(());
        };
        // Still pinned from an unresolved 3D→2D conversion.
        if let Some(pending) = self.pending.take()
            && pending.direction == Direction::ToPlanar
        {
            src.connected = Some(pending.connected);
            src.connected_anchor = pending.connected_anchor.xy();
        }

        let scratch = ensure_scratch(cx, entity, &mut self.scratch, "joint")?;
        let latent = cx.scene.entity_mut(scratch).and_then(|s| s.joint3d.take());
        let mut dst = latent.unwrap_or_default();
        cx.adapters.copy(&src, &mut dst)?;

        if let Some(other) = dst.connected
            && !Self::in_dimension(cx, other, Dimension::Volume)
        {
            self.pending = Some(PendingConnection {
                direction: Direction::ToVolume,
                connected: other,
                connected_anchor: dst.connected_anchor,
            });
            dst.connected = None;
            dst.connected_anchor = Self::world_anchor(cx, entity, &dst.anchor);
            log::debug!("joint of {entity:?} waits for {other:?} to go 3D");
        }

        if let Some(s) = cx.scene.entity_mut(scratch) {
            s.joint2d = Some(src);
        }
        if let Some(e) = cx.scene.entity_mut(entity) {
            e.joint2d = None;
            e.joint3d = Some(dst);
        }
        Ok(())
    }
}

impl Converter for JointConverter {
    fn entity(&self) -> EntityId {
        self.entity
    }

    fn convert(&mut self, direction: Direction, cx: &mut ConvertCx<'_>) -> Result<(), ConversionError> {
        if !cx.scene.contains(self.entity) {
            return Err(ConversionError::MissingEntity(self.entity));
        }
        match direction {
            Direction::ToPlanar => self.to_planar(cx),
            Direction::ToVolume => self.to_volume(cx),
        }
    }

    fn is_pending(&self) -> bool {
        self.pending.is_some()
    }

    fn resolve(&mut self, cx: &mut ConvertCx<'_>) -> Result<(), ConversionError> {
        let Some(pending) = self.pending else {
            return Ok(());
        };
        if !Self::in_dimension(cx, pending.connected, pending.direction.target()) {
            return Ok(());
        }
        let entity = cx
            .scene
            .entity_mut(self.entity)
            .ok_or(ConversionError::MissingEntity(self.entity))?;
        match pending.direction {
            Direction::ToPlanar => {
                if let Some(joint) = entity.joint2d.as_mut() {
                    joint.connected = Some(pending.connected);
                    joint.connected_anchor = pending.connected_anchor.xy();
                }
            }
            Direction::ToVolume => {
                if let Some(joint) = entity.joint3d.as_mut() {
                    joint.connected = Some(pending.connected);
                    joint.connected_anchor = pending.connected_anchor;
                }
            }
        }
        log::debug!("joint of {:?} reconnected to {:?}", self.entity, pending.connected);
        self.pending = None;
        Ok(())
    }

    fn teardown(&mut self, scene: &mut Scene) {
        // An unresolved connection stays pinned to the world.
        self.pending = None;
        release_scratch(scene, &mut self.scratch);
    }
}
