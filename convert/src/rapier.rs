//! [`PhysicsHost`] backed by rapier2d.
//!
//! Overlap queries run parry intersection tests between the scene's live
//! planar shapes. Suppressed pairs are exposed as a [`PhysicsHooks`]
//! contact filter for the caller's own pipeline step; colliders must carry
//! `ActiveHooks::FILTER_CONTACT_PAIRS` for the filter to be consulted.

use std::collections::{BTreeSet, HashMap, HashSet};

use rapier2d::parry::query::intersection_test;
use rapier2d::prelude::*;

use dimshift_core::math::{Pose, Vec2, twist_about_z};
use dimshift_geometry::triangulate::triangulate_paths;
use dimshift_geometry::{CapsuleDirection2D, PlanarShape};

use crate::host::PhysicsHost;
use crate::scene::{EntityId, Scene, ShapeId};

fn vector(v: Vec2) -> Vector {
    Vector::new(v.x as Real, v.y as Real)
}

/// Rapier colliders approximating a planar shape placed at `world`.
///
/// Polygons become one triangle collider per triangle so concave outlines
/// stay solid.
pub fn planar_colliders(shape: &PlanarShape, world: &Pose) -> Vec<Collider> {
    let position = world.translation.vector.xy();
    let angle = twist_about_z(&world.rotation) as Real;
    let place = |builder: ColliderBuilder| {
        builder
            .translation(vector(position))
            .rotation(angle)
            .build()
    };

    match shape {
        PlanarShape::Circle(circle) => {
            let center = world
                .transform_point(&circle.offset.push(0.0).into())
                .coords
                .xy();
            vec![
                ColliderBuilder::new(SharedShape::ball(circle.radius as Real))
                    .translation(vector(center))
                    .build(),
            ]
        }
        PlanarShape::Capsule(capsule) => {
            let half = capsule.segment_length() as Real * 0.5;
            let radius = capsule.diameter() as Real * 0.5;
            let center = world
                .transform_point(&capsule.offset.push(0.0).into())
                .coords
                .xy();
            let shared = match capsule.direction {
                CapsuleDirection2D::Vertical => SharedShape::capsule_y(half, radius),
                CapsuleDirection2D::Horizontal => SharedShape::capsule_x(half, radius),
            };
            vec![
                ColliderBuilder::new(shared)
                    .translation(vector(center))
                    .rotation(angle)
                    .build(),
            ]
        }
        PlanarShape::Polygon(polygon) => {
            let mesh = triangulate_paths(&polygon.paths);
            mesh.triangles
                .iter()
                .map(|[a, b, c]| {
                    let corner = |i: &u32| vector(polygon.offset + mesh.vertices[*i as usize]);
                    place(ColliderBuilder::new(SharedShape::triangle(
                        corner(a),
                        corner(b),
                        corner(c),
                    )))
                })
                .collect()
        }
    }
}

fn overlaps(a: &[Collider], b: &[Collider]) -> bool {
    a.iter().any(|ca| {
        b.iter().any(|cb| {
            intersection_test(ca.position(), ca.shape(), cb.position(), cb.shape()).unwrap_or(false)
        })
    })
}

/// Contact filter that drops suppressed collider pairs.
#[derive(Debug, Default, Clone)]
pub struct SuppressionHooks {
    pairs: HashSet<(ColliderHandle, ColliderHandle)>,
}

impl SuppressionHooks {
    pub fn is_suppressed(&self, a: ColliderHandle, b: ColliderHandle) -> bool {
        self.pairs.contains(&(a, b)) || self.pairs.contains(&(b, a))
    }

    fn set(&mut self, a: ColliderHandle, b: ColliderHandle, suppressed: bool) {
        if suppressed {
            self.pairs.insert((a, b));
        } else {
            self.pairs.remove(&(a, b));
            self.pairs.remove(&(b, a));
        }
    }
}

impl PhysicsHooks for SuppressionHooks {
    fn filter_contact_pair(&self, context: &PairFilterContext) -> Option<SolverFlags> {
        if self.is_suppressed(context.collider1, context.collider2) {
            None
        } else {
            Some(SolverFlags::COMPUTE_IMPULSES)
        }
    }
}

/// Rapier-backed host. Bind each planar shape to the collider that
/// simulates it so suppression reaches the contact filter.
#[derive(Debug, Default)]
pub struct RapierHost {
    bindings: HashMap<ShapeId, ColliderHandle>,
    suppressed: BTreeSet<(ShapeId, ShapeId)>,
    hooks: SuppressionHooks,
}

impl RapierHost {
    pub fn new() -> Self {
        Self::default()
    }

    fn key(a: ShapeId, b: ShapeId) -> (ShapeId, ShapeId) {
        if a <= b { (a, b) } else { (b, a) }
    }

    /// Associate a planar shape with its rapier collider. Suppressions
    /// issued before binding are carried over.
    pub fn bind(&mut self, shape: ShapeId, handle: ColliderHandle) {
        self.bindings.insert(shape, handle);
        let pairs: Vec<_> = self
            .suppressed
            .iter()
            .copied()
            .filter(|(a, b)| *a == shape || *b == shape)
            .collect();
        for (a, b) in pairs {
            if let (Some(&ha), Some(&hb)) = (self.bindings.get(&a), self.bindings.get(&b)) {
                self.hooks.set(ha, hb, true);
            }
        }
    }

    pub fn unbind(&mut self, shape: ShapeId) -> Option<ColliderHandle> {
        self.bindings.remove(&shape)
    }

    pub fn collider(&self, shape: ShapeId) -> Option<ColliderHandle> {
        self.bindings.get(&shape).copied()
    }

    pub fn is_suppressed(&self, a: ShapeId, b: ShapeId) -> bool {
        self.suppressed.contains(&Self::key(a, b))
    }

    /// Pass to `PhysicsPipeline::step` as the physics hooks.
    pub fn hooks(&self) -> &SuppressionHooks {
        &self.hooks
    }

    fn shape_colliders(scene: &Scene, shape: ShapeId) -> Vec<Collider> {
        let (Some(planar), Some(world)) = (scene.planar(shape), scene.collider_world_pose(shape)) else {
            return Vec::new();
        };
        planar_colliders(&planar.shape, &world)
    }
}

impl PhysicsHost for RapierHost {
    fn query_overlaps(&self, scene: &Scene, entity: EntityId) -> Vec<ShapeId> {
        dimshift_core::profile_function!();
        let own: Vec<Vec<Collider>> = scene
            .live_planar_shapes(entity)
            .into_iter()
            .map(|s| Self::shape_colliders(scene, s))
            .collect();
        if own.is_empty() {
            return Vec::new();
        }

        scene
            .colliders()
            .filter(|(_, c)| c.common().live && c.common().entity != entity)
            .filter_map(|(id, _)| scene.planar(id).map(|_| id))
            .filter(|&id| {
                let theirs = Self::shape_colliders(scene, id);
                own.iter().any(|mine| overlaps(mine, &theirs))
            })
            .collect()
    }

    fn set_collision_suppressed(&mut self, a: ShapeId, b: ShapeId, suppressed: bool) {
        let key = Self::key(a, b);
        if suppressed {
            self.suppressed.insert(key);
        } else {
            self.suppressed.remove(&key);
        }
        if let (Some(&ha), Some(&hb)) = (self.bindings.get(&a), self.bindings.get(&b)) {
            self.hooks.set(ha, hb, suppressed);
        }
    }
}
