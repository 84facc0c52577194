use dimshift_core::math::{Pose, Rot3};
use dimshift_geometry::{
    CapsuleMapper, CuboidMapper, MapEnv, MeshMapper, PairFrame, PlanarShape, PlanarVariant,
    ShapeMapper, SphereMapper, VolumeShape, VolumeVariant,
};

use crate::converter::{ConvertCx, Converter};
use crate::direction::Direction;
use crate::error::ConversionError;
use crate::scene::{EntityId, Scene, ShapeId};

/// Converter for one volume/planar collider pair, generic over the
/// geometry mapper.
#[derive(Debug, Clone)]
pub struct ShapeConverter<M: ShapeMapper> {
    entity: EntityId,
    volume: ShapeId,
    planar: ShapeId,
    mapper: M,
}

type Volume<M> = <M as ShapeMapper>::Volume;
type Planar<M> = <M as ShapeMapper>::Planar;

pub type SphereConverter = ShapeConverter<SphereMapper>;
pub type CapsuleConverter = ShapeConverter<CapsuleMapper>;
pub type BoxConverter = ShapeConverter<CuboidMapper>;
pub type MeshConverter = ShapeConverter<MeshMapper>;

impl<M> ShapeConverter<M>
where
    M: ShapeMapper,
    M::Volume: VolumeVariant + Clone,
    M::Planar: PlanarVariant + Clone,
{
    pub fn new(entity: EntityId, volume: ShapeId, planar: ShapeId, mapper: M) -> Self {
        Self {
            entity,
            volume,
            planar,
            mapper,
        }
    }

    /// Pair an existing volume collider with a new latent planar collider.
    ///
    /// The planar collider sits at the volume collider's position with the
    /// entity's orientation.
    pub fn attach(
        scene: &mut Scene,
        entity: EntityId,
        volume: ShapeId,
        mapper: M,
    ) -> Result<Self, ConversionError> {
        let collider = scene
            .volume(volume)
            .filter(|c| c.common.entity == entity && <Volume<M> as VolumeVariant>::get(&c.shape).is_some())
            .ok_or(ConversionError::MissingPairedShape {
                entity,
                shape: volume,
            })?;
        let local = Pose::from_parts(collider.common.local.translation, Rot3::identity());
        let material = collider.common.material;
        let is_trigger = collider.common.is_trigger;

        let planar = scene.add_planar_collider(entity, local, PlanarShape::default_for(<Volume<M> as VolumeVariant>::KIND));
        if let Some(p) = scene.planar_mut(planar) {
            p.common.material = material;
            p.common.is_trigger = is_trigger;
        }
        Ok(Self::new(entity, volume, planar, mapper))
    }

    pub fn volume(&self) -> ShapeId {
        self.volume
    }

    pub fn planar(&self) -> ShapeId {
        self.planar
    }

    pub fn mapper(&self) -> &M {
        &self.mapper
    }

    pub fn mapper_mut(&mut self) -> &mut M {
        &mut self.mapper
    }

    /// Make sure both halves of the pair exist with the right shape kind.
    fn check_pair(&mut self, cx: &mut ConvertCx<'_>) -> Result<(), ConversionError> {
        let kind = <Volume<M> as VolumeVariant>::KIND;
        let volume_ok = cx
            .scene
            .volume(self.volume)
            .is_some_and(|c| <Volume<M> as VolumeVariant>::get(&c.shape).is_some());
        if !volume_ok {
            if !cx.is_editing() {
                return Err(ConversionError::MissingPairedShape {
                    entity: self.entity,
                    shape: self.volume,
                });
            }
            log::warn!("{kind} volume of {:?} is missing, recreating with defaults", self.entity);
            cx.scene.remove_collider(self.volume);
            self.volume = cx
                .scene
                .add_volume_collider(self.entity, Pose::identity(), VolumeShape::default_for(kind));
        }

        let planar_ok = cx
            .scene
            .planar(self.planar)
            .is_some_and(|c| <Planar<M> as PlanarVariant>::get(&c.shape).is_some());
        if !planar_ok {
            if !cx.is_editing() {
                return Err(ConversionError::MissingPairedShape {
                    entity: self.entity,
                    shape: self.planar,
                });
            }
            log::warn!("{kind} planar shape of {:?} is missing, recreating with defaults", self.entity);
            cx.scene.remove_collider(self.planar);
            self.planar = cx
                .scene
                .add_planar_collider(self.entity, Pose::identity(), PlanarShape::default_for(kind));
        }
        Ok(())
    }

    fn map(&self, direction: Direction, cx: &mut ConvertCx<'_>) -> Result<(), ConversionError> {
        let missing = |shape| ConversionError::MissingPairedShape {
            entity: self.entity,
            shape,
        };
        let volume = cx.scene.volume(self.volume).ok_or(missing(self.volume))?;
        let planar = cx.scene.planar(self.planar).ok_or(missing(self.planar))?;
        let frame = PairFrame::new(volume.common.local, planar.common.local);
        let mut env = MapEnv::new(frame, &mut *cx.renderer);

        let outcome = match direction {
            Direction::ToPlanar => {
                let src = <Volume<M> as VolumeVariant>::get(&volume.shape)
                    .cloned()
                    .ok_or(missing(self.volume))?;
                let mut dst = <Planar<M> as PlanarVariant>::get(&planar.shape)
                    .cloned()
                    .ok_or(missing(self.planar))?;
                let (material, is_trigger) = (volume.common.material, volume.common.is_trigger);
                let outcome = self.mapper.to_planar(&src, &mut dst, &mut env);

                let target = cx.scene.planar_mut(self.planar).ok_or(missing(self.planar))?;
                if let Some(slot) = <Planar<M> as PlanarVariant>::get_mut(&mut target.shape) {
                    *slot = dst;
                }
                target.common.material = material;
                target.common.is_trigger = is_trigger;
                outcome
            }
            Direction::ToVolume => {
                let src = <Planar<M> as PlanarVariant>::get(&planar.shape)
                    .cloned()
                    .ok_or(missing(self.planar))?;
                let mut dst = <Volume<M> as VolumeVariant>::get(&volume.shape)
                    .cloned()
                    .ok_or(missing(self.volume))?;
                let (material, is_trigger) = (planar.common.material, planar.common.is_trigger);
                let outcome = self.mapper.to_volume(&src, &mut dst, &mut env);

                let target = cx.scene.volume_mut(self.volume).ok_or(missing(self.volume))?;
                if let Some(slot) = <Volume<M> as VolumeVariant>::get_mut(&mut target.shape) {
                    *slot = dst;
                }
                target.common.material = material;
                target.common.is_trigger = is_trigger;
                outcome
            }
        };
        cx.replaced_meshes.append(&mut env.replaced_meshes);
        cx.note(outcome);
        Ok(())
    }

    fn set_live(&self, direction: Direction, cx: &mut ConvertCx<'_>) {
        let to_planar = direction == Direction::ToPlanar;
        if let Some(volume) = cx.scene.volume_mut(self.volume) {
            volume.common.live = !to_planar;
        }
        if let Some(planar) = cx.scene.planar_mut(self.planar) {
            planar.common.live = to_planar;
        }
    }
}

impl<M> Converter for ShapeConverter<M>
where
    M: ShapeMapper + 'static,
    M::Volume: VolumeVariant + Clone,
    M::Planar: PlanarVariant + Clone,
{
    fn entity(&self) -> EntityId {
        self.entity
    }

    fn convert(&mut self, direction: Direction, cx: &mut ConvertCx<'_>) -> Result<(), ConversionError> {
        dimshift_core::profile_scope!("shape converter");
        if !cx.scene.contains(self.entity) {
            return Err(ConversionError::MissingEntity(self.entity));
        }
        self.check_pair(cx)?;
        // Skipped mappings still hand over: the target keeps its previous
        // parameters.
        self.map(direction, cx)?;
        self.set_live(direction, cx);
        Ok(())
    }

    fn teardown(&mut self, scene: &mut Scene) {
        let planar_live = scene.planar(self.planar).is_some_and(|c| c.common.live);
        let latent = if planar_live { self.volume } else { self.planar };
        scene.remove_collider(latent);
    }
}
