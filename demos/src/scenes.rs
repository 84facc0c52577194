//! Procedural demo scenes.

use dimshift_convert::{Body3D, Entity, EntityId, Joint3D, JointKind, Scene};
use dimshift_core::math::{Pose, Vec3, pose, rot_x, rot_z};
use dimshift_core::mesh::generators::{generate_box, generate_sphere};
use dimshift_geometry::{Capsule, Cuboid, MeshVolume, Sphere, VolumeShape};

/// Spacing between neighbouring entities on the grid.
const SPACING: f32 = 1.5;

/// A grid of bodies cycling through every collider kind.
///
/// Every row sits at its own depth, so rows that are apart in 3D land on
/// top of each other once flattened. Every tenth entity is jointed to its
/// left neighbour.
pub fn mixed_grid(count: usize, columns: usize) -> (Scene, Vec<EntityId>) {
    let columns = columns.max(1);
    let mut scene = Scene::new();
    let mut ids = Vec::with_capacity(count);

    for i in 0..count {
        let (row, column) = (i / columns, i % columns);
        let position = Vec3::new(column as f32 * SPACING, (row % 4) as f32 * 0.4, row as f32 * 2.0);
        let tilt = rot_z(0.15 * i as f32) * rot_x(0.1 * (i % 3) as f32);
        let entity = scene.spawn(
            Entity::new(format!("body_{i}"), pose(position, tilt))
                .with_body3d(Body3D::default().with_velocity(Vec3::new(0.0, -1.0, 0.5))),
        );
        scene.add_volume_collider(entity, Pose::identity(), shape_for(i));

        if i % 10 == 9
            && let Some(&left) = ids.last()
        {
            if let Some(record) = scene.entity_mut(entity) {
                record.joint3d = Some(Joint3D {
                    connected: Some(left),
                    anchor: Vec3::new(-SPACING * 0.5, 0.0, 0.0),
                    connected_anchor: Vec3::new(SPACING * 0.5, 0.0, 0.0),
                    kind: JointKind::Hinge,
                    ..Default::default()
                });
            }
        }
        ids.push(entity);
    }
    (scene, ids)
}

fn shape_for(i: usize) -> VolumeShape {
    match i % 5 {
        0 => VolumeShape::Sphere(Sphere {
            center: Vec3::zeros(),
            radius: 0.5,
        }),
        1 => VolumeShape::Capsule(Capsule {
            radius: 0.3,
            height: 1.2,
            ..Default::default()
        }),
        2 => VolumeShape::Cuboid(Cuboid {
            center: Vec3::zeros(),
            size: Vec3::new(1.0, 0.6, 0.8),
        }),
        3 => VolumeShape::Mesh(MeshVolume::new(generate_box(Vec3::new(0.4, 0.3, 0.5)))),
        _ => VolumeShape::Mesh(MeshVolume::new(generate_sphere(0.5, 12, 8))),
    }
}
