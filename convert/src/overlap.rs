//! Post-conversion overlap suppression.
//!
//! A body flattened into the plane often lands inside its 2D neighbours.
//! Collision response between its shapes and the shapes it already overlaps
//! is switched off until each pair separates.

use std::collections::{BTreeSet, HashMap};

use crate::host::PhysicsHost;
use crate::scene::{EntityId, Scene, ShapeId};

/// Suppression state of one body.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum OverlapState {
    #[default]
    Idle,
    /// Suppression was just issued; no tick has run yet.
    Suppressing,
    /// Overlaps are re-evaluated every tick.
    Monitoring,
}

#[derive(Debug, Clone)]
struct OverlapRecord {
    state: OverlapState,
    /// Planar shapes of the body at conversion time.
    attached: Vec<ShapeId>,
    /// Foreign shapes still suppressed against `attached`.
    tracked: BTreeSet<ShapeId>,
}

impl OverlapRecord {
    fn set_suppressed(&self, shape: ShapeId, host: &mut dyn PhysicsHost, suppressed: bool) {
        for &own in &self.attached {
            host.set_collision_suppressed(own, shape, suppressed);
        }
    }
}

/// Per-body overlap records.
#[derive(Debug, Default)]
pub struct OverlapSuppressor {
    records: HashMap<EntityId, OverlapRecord>,
}

impl OverlapSuppressor {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn state(&self, entity: EntityId) -> OverlapState {
        self.records
            .get(&entity)
            .map_or(OverlapState::Idle, |r| r.state)
    }

    /// Shapes currently suppressed against `entity`'s shapes.
    pub fn tracked(&self, entity: EntityId) -> impl Iterator<Item = ShapeId> + '_ {
        self.records
            .get(&entity)
            .into_iter()
            .flat_map(|r| r.tracked.iter().copied())
    }

    /// Bodies with an active record.
    pub fn active_count(&self) -> usize {
        self.records.len()
    }

    /// Suppress every pair between `entity`'s live planar shapes and the
    /// shapes they overlap right now. Returns the number of tracked shapes.
    ///
    /// An existing record is lifted first.
    pub fn begin(&mut self, entity: EntityId, scene: &Scene, host: &mut dyn PhysicsHost) -> usize {
        dimshift_core::profile_function!();
        self.clear(entity, host);

        let attached = scene.live_planar_shapes(entity);
        if attached.is_empty() {
            return 0;
        }
        let tracked: BTreeSet<ShapeId> = host
            .query_overlaps(scene, entity)
            .into_iter()
            .filter(|s| !attached.contains(s))
            .collect();
        if tracked.is_empty() {
            return 0;
        }

        let record = OverlapRecord {
            state: OverlapState::Suppressing,
            attached,
            tracked,
        };
        for &shape in &record.tracked {
            record.set_suppressed(shape, host, true);
        }
        let count = record.tracked.len();
        log::debug!("suppressing {count} overlapping shape(s) for {entity:?}");
        self.records.insert(entity, record);
        count
    }

    /// One monitoring pass for `entity`. Returns the number of shapes whose
    /// suppression was lifted.
    pub fn tick_entity(&mut self, entity: EntityId, scene: &Scene, host: &mut dyn PhysicsHost) -> usize {
        let Some(record) = self.records.get_mut(&entity) else {
            return 0;
        };
        record.state = OverlapState::Monitoring;

        let current: BTreeSet<ShapeId> = host.query_overlaps(scene, entity).into_iter().collect();
        let separated: Vec<ShapeId> = record
            .tracked
            .iter()
            .copied()
            .filter(|s| !current.contains(s))
            .collect();
        for &shape in &separated {
            record.set_suppressed(shape, host, false);
            record.tracked.remove(&shape);
        }

        if record.tracked.is_empty() {
            log::debug!("overlaps of {entity:?} resolved");
            self.records.remove(&entity);
        }
        separated.len()
    }

    /// Monitoring pass over every active record.
    pub fn tick(&mut self, scene: &Scene, host: &mut dyn PhysicsHost) -> usize {
        dimshift_core::profile_function!();
        let mut entities: Vec<EntityId> = self.records.keys().copied().collect();
        entities.sort();
        entities
            .into_iter()
            .map(|entity| self.tick_entity(entity, scene, host))
            .sum()
    }

    /// Lift every remaining suppression of `entity` and drop its record.
    pub fn clear(&mut self, entity: EntityId, host: &mut dyn PhysicsHost) {
        if let Some(record) = self.records.remove(&entity) {
            for &shape in &record.tracked {
                record.set_suppressed(shape, host, false);
            }
        }
    }

    /// Forget records of entities that no longer exist.
    pub fn prune(&mut self, scene: &Scene, host: &mut dyn PhysicsHost) {
        let stale: Vec<EntityId> = self
            .records
            .keys()
            .copied()
            .filter(|e| !scene.contains(*e))
            .collect();
        for entity in stale {
            self.clear(entity, host);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::direction::Dimension;
    use crate::host::AabbHost;
    use crate::scene::Entity;
    use dimshift_core::math::Pose;
    use dimshift_geometry::{Circle, PlanarShape};

    fn ball(scene: &mut Scene, x: f32) -> (EntityId, ShapeId) {
        let e = scene.spawn(
            Entity::new("ball", Pose::translation(x, 0.0, 0.0)).with_dimension(Dimension::Planar),
        );
        let s = scene.add_planar_collider(e, Pose::identity(), PlanarShape::Circle(Circle::default()));
        (e, s)
    }

    #[test]
    fn no_overlap_stays_idle() {
        let mut scene = Scene::new();
        let (a, _) = ball(&mut scene, 0.0);
        ball(&mut scene, 3.0);
        let mut host = AabbHost::new();
        let mut suppressor = OverlapSuppressor::new();
        assert_eq!(suppressor.begin(a, &scene, &mut host), 0);
        assert_eq!(suppressor.state(a), OverlapState::Idle);
    }

    #[test]
    fn state_walks_through_monitoring_to_idle() {
        let mut scene = Scene::new();
        let (a, a_shape) = ball(&mut scene, 0.0);
        let (b, b_shape) = ball(&mut scene, 0.5);
        let mut host = AabbHost::new();
        let mut suppressor = OverlapSuppressor::new();

        assert_eq!(suppressor.begin(a, &scene, &mut host), 1);
        assert_eq!(suppressor.state(a), OverlapState::Suppressing);
        assert!(host.is_suppressed(a_shape, b_shape));

        assert_eq!(suppressor.tick(&scene, &mut host), 0);
        assert_eq!(suppressor.state(a), OverlapState::Monitoring);

        if let Some(entity) = scene.entity_mut(b) {
            entity.pose = Pose::translation(4.0, 0.0, 0.0);
        }
        assert_eq!(suppressor.tick(&scene, &mut host), 1);
        assert_eq!(suppressor.state(a), OverlapState::Idle);
        assert!(!host.is_suppressed(a_shape, b_shape));
    }

    #[test]
    fn clear_lifts_everything() {
        let mut scene = Scene::new();
        let (a, _) = ball(&mut scene, 0.0);
        ball(&mut scene, 0.5);
        ball(&mut scene, -0.5);
        let mut host = AabbHost::new();
        let mut suppressor = OverlapSuppressor::new();
        assert_eq!(suppressor.begin(a, &scene, &mut host), 2);
        assert_eq!(host.suppressed_count(), 2);
        suppressor.clear(a, &mut host);
        assert_eq!(host.suppressed_count(), 0);
        assert_eq!(suppressor.state(a), OverlapState::Idle);
    }
}
