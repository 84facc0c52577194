//! Local frames of a volume/planar collider pair.

use dimshift_core::math::{Pose, Rot3, Vec2, Vec3};

/// Local poses of a paired volume collider and planar collider, both
/// relative to their common entity.
///
/// Mapping happens in the planar collider's local frame. Its XY plane is
/// the 2D world and its Z axis is the conversion axis.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct PairFrame {
    pub volume: Pose,
    pub planar: Pose,
}

impl Default for PairFrame {
    fn default() -> Self {
        Self::identity()
    }
}

impl PairFrame {
    pub fn new(volume: Pose, planar: Pose) -> Self {
        Self { volume, planar }
    }

    /// Both colliders sit at the entity origin with no rotation.
    pub fn identity() -> Self {
        Self {
            volume: Pose::identity(),
            planar: Pose::identity(),
        }
    }

    /// Rotation taking volume-local directions into the planar frame.
    pub fn relative_rotation(&self) -> Rot3 {
        self.planar.rotation.inverse() * self.volume.rotation
    }

    /// Transform taking volume-local points into the planar frame.
    pub fn volume_to_planar_pose(&self) -> Pose {
        self.planar.inverse() * self.volume
    }

    /// Map a volume-local point into the planar frame (depth kept in `z`).
    pub fn volume_to_planar(&self, point: &Vec3) -> Vec3 {
        self.volume_to_planar_pose()
            .transform_point(&(*point).into())
            .coords
    }

    /// Map a planar-frame point back into volume-local coordinates.
    pub fn planar_to_volume(&self, point: &Vec3) -> Vec3 {
        self.volume_to_planar_pose()
            .inverse_transform_point(&(*point).into())
            .coords
    }

    /// Project a volume-local point onto the 2D plane.
    pub fn project(&self, point: &Vec3) -> Vec2 {
        self.volume_to_planar(point).xy()
    }

    /// Lift a 2D point back to volume-local space, reusing the planar-frame
    /// depth of `depth_source` (a volume-local point).
    pub fn lift(&self, point: &Vec2, depth_source: &Vec3) -> Vec3 {
        let depth = self.volume_to_planar(depth_source).z;
        self.planar_to_volume(&Vec3::new(point.x, point.y, depth))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use dimshift_core::math::{pose, rot_x, rot_z};

    #[test]
    fn identity_projection_drops_z() {
        let frame = PairFrame::identity();
        assert_eq!(frame.project(&Vec3::new(1.0, 2.0, 3.0)), Vec2::new(1.0, 2.0));
    }

    #[test]
    fn lift_preserves_depth() {
        let frame = PairFrame::new(
            pose(Vec3::new(0.0, 0.0, 0.5), rot_x(0.3)),
            pose(Vec3::new(1.0, 0.0, 0.0), rot_z(0.7)),
        );
        let center = Vec3::new(0.2, -0.4, 1.5);
        let projected = frame.project(&center);
        let lifted = frame.lift(&projected, &center);
        assert!((lifted - center).norm() < 1e-5);
    }
}
