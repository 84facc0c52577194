//! 3D and 2D dynamics body records.

use bitflags::bitflags;
use dimshift_core::math::{Rot3, Vec2, Vec3};

bitflags! {
    /// Freeze flags of a 3D body.
    #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
    pub struct Constraints3D: u32 {
        const FREEZE_POSITION_X = 1 << 0;
        const FREEZE_POSITION_Y = 1 << 1;
        const FREEZE_POSITION_Z = 1 << 2;
        const FREEZE_ROTATION_X = 1 << 3;
        const FREEZE_ROTATION_Y = 1 << 4;
        const FREEZE_ROTATION_Z = 1 << 5;
    }
}

impl Default for Constraints3D {
    fn default() -> Self {
        Self::empty()
    }
}

bitflags! {
    /// Freeze flags of a 2D body.
    #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
    pub struct Constraints2D: u32 {
        const FREEZE_POSITION_X = 1 << 0;
        const FREEZE_POSITION_Y = 1 << 1;
        const FREEZE_ROTATION = 1 << 2;
    }
}

impl Default for Constraints2D {
    fn default() -> Self {
        Self::empty()
    }
}

/// Pose smoothing between simulation steps.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum Interpolation {
    #[default]
    None,
    Interpolate,
    Extrapolate,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum CollisionDetection3D {
    #[default]
    Discrete,
    Continuous,
    ContinuousDynamic,
    ContinuousSpeculative,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum CollisionDetection2D {
    #[default]
    Discrete,
    Continuous,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum BodyType2D {
    #[default]
    Dynamic,
    Kinematic,
    Static,
}

/// Rigid body simulated by the 3D engine.
#[derive(Debug, Clone, PartialEq)]
pub struct Body3D {
    pub mass: f32,
    pub drag: f32,
    pub angular_drag: f32,
    pub use_gravity: bool,
    pub is_kinematic: bool,
    pub interpolation: Interpolation,
    pub collision_detection: CollisionDetection3D,
    pub constraints: Constraints3D,
    pub velocity: Vec3,
    /// Radians per second.
    pub angular_velocity: Vec3,
    pub position: Vec3,
    pub rotation: Rot3,
    pub sleeping: bool,
}

impl Default for Body3D {
    fn default() -> Self {
        Self {
            mass: 1.0,
            drag: 0.0,
            angular_drag: 0.05,
            use_gravity: true,
            is_kinematic: false,
            interpolation: Interpolation::None,
            collision_detection: CollisionDetection3D::Discrete,
            constraints: Constraints3D::empty(),
            velocity: Vec3::zeros(),
            angular_velocity: Vec3::zeros(),
            position: Vec3::zeros(),
            rotation: Rot3::identity(),
            sleeping: false,
        }
    }
}

impl Body3D {
    pub fn with_mass(mut self, mass: f32) -> Self {
        self.mass = mass;
        self
    }

    pub fn with_velocity(mut self, velocity: Vec3) -> Self {
        self.velocity = velocity;
        self
    }

    pub fn with_angular_velocity(mut self, angular_velocity: Vec3) -> Self {
        self.angular_velocity = angular_velocity;
        self
    }

    pub fn with_constraints(mut self, constraints: Constraints3D) -> Self {
        self.constraints = constraints;
        self
    }

    pub fn with_kinematic(mut self, is_kinematic: bool) -> Self {
        self.is_kinematic = is_kinematic;
        self
    }

    pub fn with_gravity(mut self, use_gravity: bool) -> Self {
        self.use_gravity = use_gravity;
        self
    }
}

/// Rigid body simulated by the 2D engine.
#[derive(Debug, Clone, PartialEq)]
pub struct Body2D {
    pub mass: f32,
    pub linear_drag: f32,
    pub angular_drag: f32,
    pub gravity_scale: f32,
    pub body_type: BodyType2D,
    pub interpolation: Interpolation,
    pub collision_detection: CollisionDetection2D,
    pub constraints: Constraints2D,
    pub velocity: Vec2,
    /// Degrees per second.
    pub angular_velocity: f32,
    pub position: Vec2,
    /// Degrees.
    pub rotation: f32,
    pub sleeping: bool,
}

impl Default for Body2D {
    fn default() -> Self {
        Self {
            mass: 1.0,
            linear_drag: 0.0,
            angular_drag: 0.05,
            gravity_scale: 1.0,
            body_type: BodyType2D::Dynamic,
            interpolation: Interpolation::None,
            collision_detection: CollisionDetection2D::Discrete,
            constraints: Constraints2D::empty(),
            velocity: Vec2::zeros(),
            angular_velocity: 0.0,
            position: Vec2::zeros(),
            rotation: 0.0,
            sleeping: false,
        }
    }
}
