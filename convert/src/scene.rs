//! Minimal scene model: entities, colliders and the bodies and attachments
//! converters move between representations.
//!
//! Ids are generational: a freed slot gets a new generation when reused, so
//! stale ids never resolve to a different object.

use dimshift_core::math::Pose;
use dimshift_geometry::{PlanarShape, VolumeShape};

use crate::attachments::{ConstantForce2D, ConstantForce3D, Joint2D, Joint3D};
use crate::body::{Body2D, Body3D};
use crate::direction::Dimension;

macro_rules! generational_id {
    ($(#[$meta:meta])* $name:ident) => {
        $(#[$meta])*
        #[derive(Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
        pub struct $name {
            index: u32,
            generation: u32,
        }

        impl $name {
            pub(crate) fn new(index: u32, generation: u32) -> Self {
                Self { index, generation }
            }

            /// Slot index.
            pub fn index(&self) -> u32 {
                self.index
            }

            pub fn generation(&self) -> u32 {
                self.generation
            }
        }

        impl std::fmt::Debug for $name {
            fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
                write!(f, "{}({}v{})", stringify!($name), self.index, self.generation)
            }
        }
    };
}

generational_id!(
    /// Identifier of a scene entity.
    EntityId
);
generational_id!(
    /// Identifier of a collider.
    ShapeId
);

pub(crate) use generational_id;

/// Opaque physics material reference, shared by both sides of a pair.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct MaterialId(pub u32);

struct Slot<T> {
    generation: u32,
    value: Option<T>,
}

/// Generational slot storage.
pub(crate) struct Arena<T> {
    slots: Vec<Slot<T>>,
    free: Vec<u32>,
}

impl<T> Default for Arena<T> {
    fn default() -> Self {
        Self {
            slots: Vec::new(),
            free: Vec::new(),
        }
    }
}

impl<T> Arena<T> {
    pub(crate) fn insert(&mut self, value: T) -> (u32, u32) {
        if let Some(index) = self.free.pop() {
            let slot = &mut self.slots[index as usize];
            slot.generation += 1;
            slot.value = Some(value);
            (index, slot.generation)
        } else {
            self.slots.push(Slot {
                generation: 0,
                value: Some(value),
            });
            (self.slots.len() as u32 - 1, 0)
        }
    }

    pub(crate) fn get(&self, index: u32, generation: u32) -> Option<&T> {
        self.slots
            .get(index as usize)
            .filter(|s| s.generation == generation)
            .and_then(|s| s.value.as_ref())
    }

    pub(crate) fn get_mut(&mut self, index: u32, generation: u32) -> Option<&mut T> {
        self.slots
            .get_mut(index as usize)
            .filter(|s| s.generation == generation)
            .and_then(|s| s.value.as_mut())
    }

    pub(crate) fn remove(&mut self, index: u32, generation: u32) -> Option<T> {
        let slot = self.slots.get_mut(index as usize)?;
        if slot.generation != generation {
            return None;
        }
        let value = slot.value.take()?;
        self.free.push(index);
        Some(value)
    }

    /// Live entries as `(index, generation, value)`.
    pub(crate) fn iter(&self) -> impl Iterator<Item = (u32, u32, &T)> {
        self.slots
            .iter()
            .enumerate()
            .filter_map(|(i, s)| s.value.as_ref().map(|v| (i as u32, s.generation, v)))
    }

    pub(crate) fn iter_mut(&mut self) -> impl Iterator<Item = (u32, u32, &mut T)> {
        self.slots
            .iter_mut()
            .enumerate()
            .filter_map(|(i, s)| s.value.as_mut().map(|v| (i as u32, s.generation, v)))
    }

    pub(crate) fn len(&self) -> usize {
        self.slots.iter().filter(|s| s.value.is_some()).count()
    }
}

/// A scene entity and the simulation state attached to it.
#[derive(Debug, Clone)]
pub struct Entity {
    pub name: String,
    /// Pose relative to the parent (or the world when there is none).
    pub pose: Pose,
    pub parent: Option<EntityId>,
    /// Scratch entities are hidden and never simulated or rendered.
    pub hidden: bool,
    /// Representation currently live on this entity.
    pub dimension: Dimension,
    pub body3d: Option<Body3D>,
    pub body2d: Option<Body2D>,
    pub force3d: Option<ConstantForce3D>,
    pub force2d: Option<ConstantForce2D>,
    pub joint3d: Option<Joint3D>,
    pub joint2d: Option<Joint2D>,
}

impl Entity {
    pub fn new(name: impl Into<String>, pose: Pose) -> Self {
        Self {
            name: name.into(),
            pose,
            parent: None,
            hidden: false,
            dimension: Dimension::Volume,
            body3d: None,
            body2d: None,
            force3d: None,
            force2d: None,
            joint3d: None,
            joint2d: None,
        }
    }

    pub fn with_parent(mut self, parent: EntityId) -> Self {
        self.parent = Some(parent);
        self
    }

    pub fn with_dimension(mut self, dimension: Dimension) -> Self {
        self.dimension = dimension;
        self
    }

    pub fn with_body3d(mut self, body: Body3D) -> Self {
        self.body3d = Some(body);
        self
    }

    pub fn with_body2d(mut self, body: Body2D) -> Self {
        self.body2d = Some(body);
        self
    }

    pub fn hidden(mut self) -> Self {
        self.hidden = true;
        self
    }
}

/// Collider attributes shared by both representations.
#[derive(Debug, Clone, PartialEq)]
pub struct ColliderCommon {
    pub entity: EntityId,
    /// Pose relative to the owning entity.
    pub local: Pose,
    pub material: Option<MaterialId>,
    pub is_trigger: bool,
    /// Attached to the entity's active representation.
    pub live: bool,
}

impl ColliderCommon {
    fn new(entity: EntityId, local: Pose, live: bool) -> Self {
        Self {
            entity,
            local,
            material: None,
            is_trigger: false,
            live,
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct VolumeCollider {
    pub common: ColliderCommon,
    pub shape: VolumeShape,
}

#[derive(Debug, Clone, PartialEq)]
pub struct PlanarCollider {
    pub common: ColliderCommon,
    pub shape: PlanarShape,
}

#[derive(Debug, Clone, PartialEq)]
pub enum Collider {
    Volume(VolumeCollider),
    Planar(PlanarCollider),
}

impl Collider {
    pub fn common(&self) -> &ColliderCommon {
        match self {
            Collider::Volume(c) => &c.common,
            Collider::Planar(c) => &c.common,
        }
    }

    pub fn common_mut(&mut self) -> &mut ColliderCommon {
        match self {
            Collider::Volume(c) => &mut c.common,
            Collider::Planar(c) => &mut c.common,
        }
    }
}

/// Entities and colliders of one simulation.
#[derive(Default)]
pub struct Scene {
    entities: Arena<Entity>,
    colliders: Arena<Collider>,
}

impl Scene {
    pub fn new() -> Self {
        Self::default()
    }

    // ---- Entities ----

    pub fn spawn(&mut self, entity: Entity) -> EntityId {
        let (index, generation) = self.entities.insert(entity);
        EntityId::new(index, generation)
    }

    /// Spawn a hidden child used to hold latent state.
    pub fn spawn_scratch(&mut self, owner: EntityId, label: &str) -> EntityId {
        let name = match self.entity(owner) {
            Some(e) => format!("{} [{label}]", e.name),
            None => format!("[{label}]"),
        };
        self.spawn(Entity::new(name, Pose::identity()).with_parent(owner).hidden())
    }

    /// Remove an entity together with its colliders and hidden children.
    pub fn despawn(&mut self, id: EntityId) -> Option<Entity> {
        let entity = self.entities.remove(id.index, id.generation)?;
        let shapes: Vec<ShapeId> = self.colliders_of(id).collect();
        for shape in shapes {
            self.colliders.remove(shape.index(), shape.generation());
        }
        let scratch: Vec<EntityId> = self
            .entities()
            .filter(|(_, e)| e.hidden && e.parent == Some(id))
            .map(|(child, _)| child)
            .collect();
        for child in scratch {
            self.despawn(child);
        }
        Some(entity)
    }

    pub fn contains(&self, id: EntityId) -> bool {
        self.entity(id).is_some()
    }

    pub fn entity(&self, id: EntityId) -> Option<&Entity> {
        self.entities.get(id.index, id.generation)
    }

    pub fn entity_mut(&mut self, id: EntityId) -> Option<&mut Entity> {
        self.entities.get_mut(id.index, id.generation)
    }

    pub fn entities(&self) -> impl Iterator<Item = (EntityId, &Entity)> {
        self.entities
            .iter()
            .map(|(i, g, e)| (EntityId::new(i, g), e))
    }

    pub fn entity_count(&self) -> usize {
        self.entities.len()
    }

    /// World pose, composed through the parent chain.
    pub fn world_pose(&self, id: EntityId) -> Option<Pose> {
        let mut entity = self.entity(id)?;
        let mut pose = entity.pose;
        // Parent chains are shallow; the depth cap guards against cycles.
        for _ in 0..64 {
            let Some(parent) = entity.parent.and_then(|p| self.entity(p)) else {
                break;
            };
            pose = parent.pose * pose;
            entity = parent;
        }
        Some(pose)
    }

    // ---- Colliders ----

    pub fn add_volume_collider(&mut self, entity: EntityId, local: Pose, shape: VolumeShape) -> ShapeId {
        let live = self
            .entity(entity)
            .is_none_or(|e| e.dimension == Dimension::Volume);
        let (index, generation) = self.colliders.insert(Collider::Volume(VolumeCollider {
            common: ColliderCommon::new(entity, local, live),
            shape,
        }));
        ShapeId::new(index, generation)
    }

    pub fn add_planar_collider(&mut self, entity: EntityId, local: Pose, shape: PlanarShape) -> ShapeId {
        let live = self
            .entity(entity)
            .is_some_and(|e| e.dimension == Dimension::Planar);
        let (index, generation) = self.colliders.insert(Collider::Planar(PlanarCollider {
            common: ColliderCommon::new(entity, local, live),
            shape,
        }));
        ShapeId::new(index, generation)
    }

    pub fn collider(&self, id: ShapeId) -> Option<&Collider> {
        self.colliders.get(id.index, id.generation)
    }

    pub fn collider_mut(&mut self, id: ShapeId) -> Option<&mut Collider> {
        self.colliders.get_mut(id.index, id.generation)
    }

    pub fn volume(&self, id: ShapeId) -> Option<&VolumeCollider> {
        match self.collider(id)? {
            Collider::Volume(c) => Some(c),
            Collider::Planar(_) => None,
        }
    }

    pub fn volume_mut(&mut self, id: ShapeId) -> Option<&mut VolumeCollider> {
        match self.collider_mut(id)? {
            Collider::Volume(c) => Some(c),
            Collider::Planar(_) => None,
        }
    }

    pub fn planar(&self, id: ShapeId) -> Option<&PlanarCollider> {
        match self.collider(id)? {
            Collider::Planar(c) => Some(c),
            Collider::Volume(_) => None,
        }
    }

    pub fn planar_mut(&mut self, id: ShapeId) -> Option<&mut PlanarCollider> {
        match self.collider_mut(id)? {
            Collider::Planar(c) => Some(c),
            Collider::Volume(_) => None,
        }
    }

    pub fn remove_collider(&mut self, id: ShapeId) -> Option<Collider> {
        self.colliders.remove(id.index, id.generation)
    }

    pub fn colliders(&self) -> impl Iterator<Item = (ShapeId, &Collider)> {
        self.colliders
            .iter()
            .map(|(i, g, c)| (ShapeId::new(i, g), c))
    }

    /// Every collider owned by `entity`.
    pub fn colliders_of(&self, entity: EntityId) -> impl Iterator<Item = ShapeId> + '_ {
        self.colliders()
            .filter(move |(_, c)| c.common().entity == entity)
            .map(|(id, _)| id)
    }

    /// Live planar colliders owned by `entity`.
    pub fn live_planar_shapes(&self, entity: EntityId) -> Vec<ShapeId> {
        self.colliders()
            .filter(|(_, c)| {
                matches!(c, Collider::Planar(_)) && c.common().entity == entity && c.common().live
            })
            .map(|(id, _)| id)
            .collect()
    }

    /// World pose of a collider.
    pub fn collider_world_pose(&self, id: ShapeId) -> Option<Pose> {
        let common = self.collider(id)?.common();
        Some(self.world_pose(common.entity)? * common.local)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use dimshift_core::math::Vec3;
    use dimshift_geometry::{Circle, Sphere};

    #[test]
    fn stale_ids_do_not_resolve() {
        let mut scene = Scene::new();
        let a = scene.spawn(Entity::new("a", Pose::identity()));
        scene.despawn(a);
        let b = scene.spawn(Entity::new("b", Pose::identity()));
        assert_eq!(a.index(), b.index());
        assert!(scene.entity(a).is_none());
        assert_eq!(scene.entity(b).map(|e| e.name.as_str()), Some("b"));
    }

    #[test]
    fn liveness_follows_entity_dimension() {
        let mut scene = Scene::new();
        let e = scene.spawn(Entity::new("ball", Pose::identity()));
        let v = scene.add_volume_collider(e, Pose::identity(), VolumeShape::Sphere(Sphere::default()));
        let p = scene.add_planar_collider(e, Pose::identity(), PlanarShape::Circle(Circle::default()));
        assert!(scene.volume(v).is_some_and(|c| c.common.live));
        assert!(scene.planar(p).is_some_and(|c| !c.common.live));
        assert!(scene.live_planar_shapes(e).is_empty());
    }

    #[test]
    fn despawn_removes_colliders_and_scratch() {
        let mut scene = Scene::new();
        let e = scene.spawn(Entity::new("box", Pose::identity()));
        let scratch = scene.spawn_scratch(e, "body");
        let shape = scene.add_volume_collider(e, Pose::identity(), VolumeShape::Sphere(Sphere::default()));
        scene.despawn(e);
        assert!(scene.collider(shape).is_none());
        assert!(!scene.contains(scratch));
        assert_eq!(scene.entity_count(), 0);
    }

    #[test]
    fn world_pose_composes_parents() {
        let mut scene = Scene::new();
        let parent = scene.spawn(Entity::new("p", Pose::translation(1.0, 0.0, 0.0)));
        let child = scene.spawn(Entity::new("c", Pose::translation(0.0, 2.0, 0.0)).with_parent(parent));
        let world = scene.world_pose(child).unwrap();
        assert_eq!(world.translation.vector, Vec3::new(1.0, 2.0, 0.0));
    }
}
