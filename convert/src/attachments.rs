//! Constant-force and joint attachments, and their 3D/2D field mapping.

use dimshift_core::math::{Vec2, Vec3};

use crate::scene::EntityId;

/// Force applied to a 3D body every step.
#[derive(Debug, Clone, PartialEq)]
pub struct ConstantForce3D {
    pub force: Vec3,
    /// Force in the body's local frame.
    pub relative_force: Vec3,
    pub torque: Vec3,
    pub relative_torque: Vec3,
}

impl Default for ConstantForce3D {
    fn default() -> Self {
        Self {
            force: Vec3::zeros(),
            relative_force: Vec3::zeros(),
            torque: Vec3::zeros(),
            relative_torque: Vec3::zeros(),
        }
    }
}

/// Force applied to a 2D body every step.
#[derive(Debug, Clone, PartialEq)]
pub struct ConstantForce2D {
    pub force: Vec2,
    pub relative_force: Vec2,
    pub torque: f32,
}

impl Default for ConstantForce2D {
    fn default() -> Self {
        Self {
            force: Vec2::zeros(),
            relative_force: Vec2::zeros(),
            torque: 0.0,
        }
    }
}

pub fn force_to_2d(src: &ConstantForce3D, dst: &mut ConstantForce2D) {
    dst.force = src.force.xy();
    dst.relative_force = src.relative_force.xy();
    // Local and world Z coincide for a body that only spins about Z.
    dst.torque = src.torque.z + src.relative_torque.z;
}

/// Out-of-plane components keep the values already in `dst`.
pub fn force_to_3d(src: &ConstantForce2D, dst: &mut ConstantForce3D) {
    dst.force = Vec3::new(src.force.x, src.force.y, dst.force.z);
    dst.relative_force = Vec3::new(src.relative_force.x, src.relative_force.y, dst.relative_force.z);
    dst.torque.z = src.torque;
    dst.relative_torque.z = 0.0;
}

#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub enum JointKind {
    #[default]
    Fixed,
    Hinge,
    Spring {
        stiffness: f32,
        damping: f32,
    },
}

/// Joint between a 3D body and an optional connected body.
#[derive(Debug, Clone, PartialEq)]
pub struct Joint3D {
    /// `None` connects to the world.
    pub connected: Option<EntityId>,
    /// Anchor in the owner's local frame.
    pub anchor: Vec3,
    /// Anchor in the connected entity's local frame (world when unconnected).
    pub connected_anchor: Vec3,
    pub auto_configure_connected_anchor: bool,
    pub break_force: f32,
    pub break_torque: f32,
    pub enable_collision: bool,
    pub kind: JointKind,
}

impl Default for Joint3D {
    fn default() -> Self {
        Self {
            connected: None,
            anchor: Vec3::zeros(),
            connected_anchor: Vec3::zeros(),
            auto_configure_connected_anchor: true,
            break_force: f32::INFINITY,
            break_torque: f32::INFINITY,
            enable_collision: false,
            kind: JointKind::Fixed,
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct Joint2D {
    pub connected: Option<EntityId>,
    pub anchor: Vec2,
    pub connected_anchor: Vec2,
    pub auto_configure_connected_anchor: bool,
    pub break_force: f32,
    pub break_torque: f32,
    pub enable_collision: bool,
    pub kind: JointKind,
}

impl Default for Joint2D {
    fn default() -> Self {
        Self {
            connected: None,
            anchor: Vec2::zeros(),
            connected_anchor: Vec2::zeros(),
            auto_configure_connected_anchor: true,
            break_force: f32::INFINITY,
            break_torque: f32::INFINITY,
            enable_collision: false,
            kind: JointKind::Fixed,
        }
    }
}

pub fn joint_to_2d(src: &Joint3D, dst: &mut Joint2D) {
    dst.connected = src.connected;
    dst.anchor = src.anchor.xy();
    dst.connected_anchor = src.connected_anchor.xy();
    dst.auto_configure_connected_anchor = src.auto_configure_connected_anchor;
    dst.break_force = src.break_force;
    dst.break_torque = src.break_torque;
    dst.enable_collision = src.enable_collision;
    dst.kind = src.kind;
}

/// Anchor depths keep the values already in `dst`.
pub fn joint_to_3d(src: &Joint2D, dst: &mut Joint3D) {
    dst.connected = src.connected;
    dst.anchor = Vec3::new(src.anchor.x, src.anchor.y, dst.anchor.z);
    dst.connected_anchor = Vec3::new(
        src.connected_anchor.x,
        src.connected_anchor.y,
        dst.connected_anchor.z,
    );
    dst.auto_configure_connected_anchor = src.auto_configure_connected_anchor;
    dst.break_force = src.break_force;
    dst.break_torque = src.break_torque;
    dst.enable_collision = src.enable_collision;
    dst.kind = src.kind;
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn torque_sums_about_z() {
        let src = ConstantForce3D {
            force: Vec3::new(1.0, 2.0, 3.0),
            torque: Vec3::new(5.0, 5.0, 1.5),
            relative_torque: Vec3::new(0.0, 0.0, 0.5),
            ..Default::default()
        };
        let mut dst = ConstantForce2D::default();
        force_to_2d(&src, &mut dst);
        assert_eq!(dst.force, Vec2::new(1.0, 2.0));
        assert_eq!(dst.torque, 2.0);

        let mut back = src.clone();
        force_to_3d(&dst, &mut back);
        assert_eq!(back.force, src.force);
        assert_eq!(back.torque, Vec3::new(5.0, 5.0, 2.0));
        assert_eq!(back.relative_torque.z, 0.0);
    }

    #[test]
    fn joint_anchor_depth_survives() {
        let src = Joint3D {
            anchor: Vec3::new(1.0, 0.5, 2.0),
            connected_anchor: Vec3::new(0.0, -1.0, -3.0),
            kind: JointKind::Spring {
                stiffness: 10.0,
                damping: 0.5,
            },
            ..Default::default()
        };
        let mut planar = Joint2D::default();
        joint_to_2d(&src, &mut planar);
        assert_eq!(planar.anchor, Vec2::new(1.0, 0.5));
        assert_eq!(planar.kind, src.kind);

        let mut back = src.clone();
        joint_to_3d(&planar, &mut back);
        assert_eq!(back, src);
    }
}
