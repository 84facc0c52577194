//! Parameter mapping between [`Body3D`] and [`Body2D`].
//!
//! The 2D world is the XY plane; Z is dropped on the way down and restored
//! from the previous 3D state on the way back.

use dimshift_core::math::{Vec3, rot_z, twist_about_z};

use crate::body::{
    Body2D, Body3D, BodyType2D, CollisionDetection2D, CollisionDetection3D, Constraints2D,
    Constraints3D,
};

/// Largest mass or drag value the 2D engine accepts.
pub const MAX_REPRESENTABLE: f32 = 1.0e6;

fn clamp_representable(value: f32) -> f32 {
    value.clamp(0.0, MAX_REPRESENTABLE)
}

pub fn constraints_to_2d(flags: Constraints3D) -> Constraints2D {
    let mut out = Constraints2D::empty();
    out.set(
        Constraints2D::FREEZE_POSITION_X,
        flags.contains(Constraints3D::FREEZE_POSITION_X),
    );
    out.set(
        Constraints2D::FREEZE_POSITION_Y,
        flags.contains(Constraints3D::FREEZE_POSITION_Y),
    );
    out.set(
        Constraints2D::FREEZE_ROTATION,
        flags.contains(Constraints3D::FREEZE_ROTATION_Z),
    );
    out
}

/// Map 2D freeze flags back, keeping the out-of-plane flags of `previous`.
pub fn constraints_to_3d(flags: Constraints2D, previous: Constraints3D) -> Constraints3D {
    let out_of_plane = Constraints3D::FREEZE_POSITION_Z
        | Constraints3D::FREEZE_ROTATION_X
        | Constraints3D::FREEZE_ROTATION_Y;
    let mut out = previous & out_of_plane;
    out.set(
        Constraints3D::FREEZE_POSITION_X,
        flags.contains(Constraints2D::FREEZE_POSITION_X),
    );
    out.set(
        Constraints3D::FREEZE_POSITION_Y,
        flags.contains(Constraints2D::FREEZE_POSITION_Y),
    );
    out.set(
        Constraints3D::FREEZE_ROTATION_Z,
        flags.contains(Constraints2D::FREEZE_ROTATION),
    );
    out
}

pub fn collision_detection_to_2d(mode: CollisionDetection3D) -> CollisionDetection2D {
    match mode {
        CollisionDetection3D::Discrete => CollisionDetection2D::Discrete,
        CollisionDetection3D::Continuous
        | CollisionDetection3D::ContinuousDynamic
        | CollisionDetection3D::ContinuousSpeculative => CollisionDetection2D::Continuous,
    }
}

/// Continuous 2D detection restores the previous continuous flavour.
pub fn collision_detection_to_3d(
    mode: CollisionDetection2D,
    previous: CollisionDetection3D,
) -> CollisionDetection3D {
    match (mode, previous) {
        (CollisionDetection2D::Discrete, _) => CollisionDetection3D::Discrete,
        (CollisionDetection2D::Continuous, CollisionDetection3D::Discrete) => {
            CollisionDetection3D::Continuous
        }
        (CollisionDetection2D::Continuous, continuous) => continuous,
    }
}

/// Write the planar state of `src` into `dst`.
pub fn body_to_2d(src: &Body3D, dst: &mut Body2D) {
    dst.mass = clamp_representable(src.mass);
    dst.linear_drag = clamp_representable(src.drag);
    dst.angular_drag = clamp_representable(src.angular_drag);
    dst.gravity_scale = if src.use_gravity { 1.0 } else { 0.0 };
    dst.body_type = if src.is_kinematic {
        BodyType2D::Kinematic
    } else {
        BodyType2D::Dynamic
    };
    dst.interpolation = src.interpolation;
    dst.collision_detection = collision_detection_to_2d(src.collision_detection);
    dst.constraints = constraints_to_2d(src.constraints);
    dst.velocity = src.velocity.xy();
    dst.angular_velocity = src.angular_velocity.z.to_degrees();
    dst.position = src.position.xy();
    dst.rotation = twist_about_z(&src.rotation).to_degrees();
    dst.sleeping = src.sleeping;
}

/// Write `src` back into `dst`, which holds the 3D state from before the
/// body went planar.
///
/// Depth, out-of-plane freeze flags and the continuous detection flavour
/// come from `dst`. Motion out of the plane is cleared.
pub fn body_to_3d(src: &Body2D, dst: &mut Body3D) {
    dst.mass = src.mass;
    dst.drag = src.linear_drag;
    dst.angular_drag = src.angular_drag;
    dst.use_gravity = src.gravity_scale > 0.0;
    dst.is_kinematic = src.body_type != BodyType2D::Dynamic;
    dst.interpolation = src.interpolation;
    dst.collision_detection = collision_detection_to_3d(src.collision_detection, dst.collision_detection);
    dst.constraints = constraints_to_3d(src.constraints, dst.constraints);
    dst.velocity = Vec3::new(src.velocity.x, src.velocity.y, 0.0);
    dst.angular_velocity = Vec3::new(0.0, 0.0, src.angular_velocity.to_radians());
    dst.position = Vec3::new(src.position.x, src.position.y, dst.position.z);
    dst.rotation = rot_z(src.rotation.to_radians());
    dst.sleeping = src.sleeping;
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::body::Interpolation;
    use dimshift_core::math::{Rot3, Vec2, rot_x};
    use rstest::rstest;

    #[test]
    fn velocity_and_spin_project() {
        let src = Body3D::default()
            .with_velocity(Vec3::new(1.0, -2.0, 7.0))
            .with_angular_velocity(Vec3::new(3.0, 4.0, std::f32::consts::PI));
        let mut dst = Body2D::default();
        body_to_2d(&src, &mut dst);
        assert_eq!(dst.velocity, Vec2::new(1.0, -2.0));
        assert!((dst.angular_velocity - 180.0).abs() < 1e-3);
    }

    #[test]
    fn mass_and_drag_are_clamped() {
        let src = Body3D {
            mass: 1.0e9,
            drag: f32::INFINITY,
            ..Default::default()
        };
        let mut dst = Body2D::default();
        body_to_2d(&src, &mut dst);
        assert_eq!(dst.mass, MAX_REPRESENTABLE);
        assert_eq!(dst.linear_drag, MAX_REPRESENTABLE);
    }

    #[rstest]
    #[case::gravity_on(true, 1.0)]
    #[case::gravity_off(false, 0.0)]
    fn gravity_becomes_scale(#[case] use_gravity: bool, #[case] scale: f32) {
        let mut dst = Body2D::default();
        body_to_2d(&Body3D::default().with_gravity(use_gravity), &mut dst);
        assert_eq!(dst.gravity_scale, scale);
    }

    #[rstest]
    #[case::kinematic(true, BodyType2D::Kinematic)]
    #[case::dynamic(false, BodyType2D::Dynamic)]
    fn kinematic_flag_becomes_body_type(#[case] kinematic: bool, #[case] expected: BodyType2D) {
        let mut dst = Body2D::default();
        body_to_2d(&Body3D::default().with_kinematic(kinematic), &mut dst);
        assert_eq!(dst.body_type, expected);
    }

    #[rstest]
    #[case::discrete(CollisionDetection3D::Discrete, CollisionDetection2D::Discrete)]
    #[case::continuous(CollisionDetection3D::Continuous, CollisionDetection2D::Continuous)]
    #[case::dynamic(CollisionDetection3D::ContinuousDynamic, CollisionDetection2D::Continuous)]
    #[case::speculative(CollisionDetection3D::ContinuousSpeculative, CollisionDetection2D::Continuous)]
    fn collision_detection_is_coarsened(
        #[case] mode: CollisionDetection3D,
        #[case] expected: CollisionDetection2D,
    ) {
        assert_eq!(collision_detection_to_2d(mode), expected);
        assert_eq!(collision_detection_to_3d(expected, mode), mode);
    }

    #[test]
    fn out_of_plane_constraints_drop_and_return() {
        let flags = Constraints3D::FREEZE_POSITION_X
            | Constraints3D::FREEZE_POSITION_Z
            | Constraints3D::FREEZE_ROTATION_X
            | Constraints3D::FREEZE_ROTATION_Z;
        let planar = constraints_to_2d(flags);
        assert_eq!(
            planar,
            Constraints2D::FREEZE_POSITION_X | Constraints2D::FREEZE_ROTATION
        );
        assert_eq!(constraints_to_3d(planar, flags), flags);
    }

    #[test]
    fn round_trip_restores_depth() {
        let original = Body3D {
            position: Vec3::new(1.0, 2.0, -4.0),
            rotation: rot_z(0.6),
            interpolation: Interpolation::Interpolate,
            ..Default::default()
        };
        let mut planar = Body2D::default();
        body_to_2d(&original, &mut planar);
        assert!((planar.rotation - 0.6f32.to_degrees()).abs() < 1e-3);

        let mut restored = original.clone();
        restored.position.x = 99.0;
        body_to_3d(&planar, &mut restored);
        assert_eq!(restored.position, Vec3::new(1.0, 2.0, -4.0));
        assert_eq!(restored.interpolation, Interpolation::Interpolate);
        assert!(restored.rotation.angle_to(&original.rotation) < 1e-4);
    }

    #[test]
    fn tilt_is_discarded_on_return() {
        let tilted = Body3D {
            rotation: rot_z(0.3) * rot_x(0.8),
            ..Default::default()
        };
        let mut planar = Body2D::default();
        body_to_2d(&tilted, &mut planar);
        let mut back = tilted.clone();
        body_to_3d(&planar, &mut back);
        assert!(back.rotation.angle_to(&rot_z(0.3)) < 1e-4);
        assert!(back.rotation.angle_to(&Rot3::identity()) > 0.2);
    }

    #[test]
    fn out_of_plane_motion_stops_on_return() {
        let latent = Body3D::default()
            .with_velocity(Vec3::new(0.0, 0.0, 5.0))
            .with_angular_velocity(Vec3::new(1.0, 2.0, 0.0));
        let planar = Body2D {
            velocity: Vec2::new(3.0, -1.0),
            angular_velocity: 90.0,
            ..Default::default()
        };
        let mut back = latent.clone();
        body_to_3d(&planar, &mut back);
        assert_eq!(back.velocity, Vec3::new(3.0, -1.0, 0.0));
        assert_eq!(back.angular_velocity.xy(), Vec2::zeros());
        assert!((back.angular_velocity.z - std::f32::consts::FRAC_PI_2).abs() < 1e-5);
    }

    #[test]
    fn static_body_returns_kinematic() {
        let planar = Body2D {
            body_type: BodyType2D::Static,
            ..Default::default()
        };
        let mut back = Body3D::default();
        body_to_3d(&planar, &mut back);
        assert!(back.is_kinematic);
    }
}
