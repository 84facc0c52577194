//! The physics engine as seen by the conversion pipeline.

use std::collections::BTreeSet;

use dimshift_core::math::{Pose, Vec2, Vec3};
use dimshift_geometry::PlanarShape;

use crate::scene::{EntityId, Scene, ShapeId};

/// Collision queries and pairwise suppression offered by the host engine.
pub trait PhysicsHost {
    /// Live planar shapes of other entities that currently overlap any live
    /// planar shape of `entity`.
    fn query_overlaps(&self, scene: &Scene, entity: EntityId) -> Vec<ShapeId>;

    /// Disable (`true`) or re-enable (`false`) collision response between
    /// two shapes.
    fn set_collision_suppressed(&mut self, a: ShapeId, b: ShapeId, suppressed: bool);
}

/// Host that reports no overlaps and ignores suppression requests.
#[derive(Debug, Default, Clone, Copy)]
pub struct NoopHost;

impl PhysicsHost for NoopHost {
    fn query_overlaps(&self, _scene: &Scene, _entity: EntityId) -> Vec<ShapeId> {
        Vec::new()
    }

    fn set_collision_suppressed(&mut self, _a: ShapeId, _b: ShapeId, _suppressed: bool) {}
}

/// Axis-aligned planar bounds.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Aabb2 {
    pub min: Vec2,
    pub max: Vec2,
}

impl Aabb2 {
    fn from_points(points: impl IntoIterator<Item = Vec2>) -> Option<Self> {
        let mut iter = points.into_iter();
        let first = iter.next()?;
        let mut aabb = Self {
            min: first,
            max: first,
        };
        for p in iter {
            aabb.min = aabb.min.inf(&p);
            aabb.max = aabb.max.sup(&p);
        }
        Some(aabb)
    }

    fn inflate(mut self, amount: f32) -> Self {
        self.min -= Vec2::repeat(amount);
        self.max += Vec2::repeat(amount);
        self
    }

    /// Strict overlap; touching boxes do not intersect.
    pub fn intersects(&self, other: &Aabb2) -> bool {
        self.min.x < other.max.x
            && other.min.x < self.max.x
            && self.min.y < other.max.y
            && other.min.y < self.max.y
    }
}

/// World-space planar bounds of a planar shape placed at `world`.
pub fn planar_bounds(shape: &PlanarShape, world: &Pose) -> Option<Aabb2> {
    let place = |p: Vec2| world.transform_point(&Vec3::new(p.x, p.y, 0.0).into()).coords.xy();
    match shape {
        PlanarShape::Circle(circle) => {
            Aabb2::from_points([place(circle.offset)]).map(|b| b.inflate(circle.radius))
        }
        PlanarShape::Capsule(capsule) => {
            let half = capsule.direction.unit() * capsule.segment_length() * 0.5;
            Aabb2::from_points([place(capsule.offset + half), place(capsule.offset - half)])
                .map(|b| b.inflate(capsule.diameter() * 0.5))
        }
        PlanarShape::Polygon(polygon) => Aabb2::from_points(
            polygon
                .paths
                .iter()
                .flatten()
                .map(|p| place(polygon.offset + p)),
        ),
    }
}

/// Bounds of every live planar collider in the scene.
fn live_planar_bounds(scene: &Scene) -> Vec<(ShapeId, EntityId, Aabb2)> {
    scene
        .colliders()
        .filter_map(|(id, _)| {
            let planar = scene.planar(id)?;
            if !planar.common.live {
                return None;
            }
            let world = scene.collider_world_pose(id)?;
            let bounds = planar_bounds(&planar.shape, &world)?;
            Some((id, planar.common.entity, bounds))
        })
        .collect()
}

/// Bounding-box overlap host, for tests and engines without a narrow phase.
///
/// Suppressed pairs are recorded so a simulation loop can skip them.
#[derive(Debug, Default, Clone)]
pub struct AabbHost {
    suppressed: BTreeSet<(ShapeId, ShapeId)>,
}

impl AabbHost {
    pub fn new() -> Self {
        Self::default()
    }

    fn key(a: ShapeId, b: ShapeId) -> (ShapeId, ShapeId) {
        if a <= b { (a, b) } else { (b, a) }
    }

    pub fn is_suppressed(&self, a: ShapeId, b: ShapeId) -> bool {
        self.suppressed.contains(&Self::key(a, b))
    }

    pub fn suppressed_count(&self) -> usize {
        self.suppressed.len()
    }
}

impl PhysicsHost for AabbHost {
    fn query_overlaps(&self, scene: &Scene, entity: EntityId) -> Vec<ShapeId> {
        let all = live_planar_bounds(scene);
        let (own, others): (Vec<_>, Vec<_>) = all.into_iter().partition(|(_, e, _)| *e == entity);
        others
            .into_iter()
            .filter(|(_, _, bounds)| own.iter().any(|(_, _, mine)| mine.intersects(bounds)))
            .map(|(id, _, _)| id)
            .collect()
    }

    fn set_collision_suppressed(&mut self, a: ShapeId, b: ShapeId, suppressed: bool) {
        let key = Self::key(a, b);
        if suppressed {
            self.suppressed.insert(key);
        } else {
            self.suppressed.remove(&key);
        }
    }
}
