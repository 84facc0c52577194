//! Math type aliases and helper functions.
//!
//! Everything is `f32`: the conversion pipeline copies parameters between
//! engine-side shapes and bodies, which are single precision on both sides.
//!
//! Conventions used across the workspace:
//! - The planar (2D) world is the XY plane; Z is the *conversion axis*.
//! - Rotations are unit quaternions ([`Rot3`]); poses are [`Pose`] isometries.
//! - Planar rotations are stored in degrees at the API surface (as game
//!   engines expose them) and converted with [`f32::to_radians`] internally.

pub use nalgebra;

/// 2D vector (f32).
pub type Vec2 = nalgebra::Vector2<f32>;

/// 3D vector (f32).
pub type Vec3 = nalgebra::Vector3<f32>;

/// Unit quaternion rotation (f32).
pub type Rot3 = nalgebra::UnitQuaternion<f32>;

/// Rigid 3D transform: rotation followed by translation.
pub type Pose = nalgebra::Isometry3<f32>;

/// Practical epsilon for geometric comparisons in local shape space.
pub const GEOM_EPS: f32 = 1.0e-5;

/// Epsilon used when testing whether a direction is (anti)parallel to an axis.
pub const PARALLEL_EPS: f32 = 1.0e-4;

/// Build a pose from a translation and rotation.
pub fn pose(translation: Vec3, rotation: Rot3) -> Pose {
    Pose::from_parts(nalgebra::Translation3::from(translation), rotation)
}

/// Create a rotation around the X axis.
pub fn rot_x(angle: f32) -> Rot3 {
    Rot3::from_axis_angle(&Vec3::x_axis(), angle)
}

/// Create a rotation around the Y axis.
pub fn rot_y(angle: f32) -> Rot3 {
    Rot3::from_axis_angle(&Vec3::y_axis(), angle)
}

/// Create a rotation around the Z axis (the conversion axis).
pub fn rot_z(angle: f32) -> Rot3 {
    Rot3::from_axis_angle(&Vec3::z_axis(), angle)
}

/// Angle in radians of a rotation's twist about the Z axis.
///
/// Measured as the heading of the rotated +X axis projected into the XY
/// plane. Falls back to the rotated +Y axis when +X points along Z.
pub fn twist_about_z(rotation: &Rot3) -> f32 {
    let x = rotation * Vec3::x();
    if x.xy().norm_squared() > PARALLEL_EPS {
        return x.y.atan2(x.x);
    }
    let y = rotation * Vec3::y();
    // +Y sits 90 degrees ahead of +X.
    y.y.atan2(y.x) - std::f32::consts::FRAC_PI_2
}

/// 2D cross product (z component of the 3D cross product).
pub fn cross2(a: &Vec2, b: &Vec2) -> f32 {
    a.x * b.y - a.y * b.x
}

/// Signed area of a closed polygon (positive when counter-clockwise).
pub fn signed_area(points: &[Vec2]) -> f32 {
    if points.len() < 3 {
        return 0.0;
    }
    let mut area = 0.0;
    for i in 0..points.len() {
        let a = points[i];
        let b = points[(i + 1) % points.len()];
        area += cross2(&a, &b);
    }
    area * 0.5
}
