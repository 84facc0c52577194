//! Sphere ↔ circle.

use crate::frame::PairFrame;
use crate::mapper::{MapEnv, MapOutcome, ShapeMapper};
use crate::shapes::{Circle, ShapeKind, Sphere};

/// Project a sphere onto the plane. The radius copies unchanged.
pub fn sphere_to_circle(sphere: &Sphere, frame: &PairFrame) -> Circle {
    Circle {
        offset: frame.project(&sphere.center),
        radius: sphere.radius,
    }
}

/// Lift a circle back to a sphere, keeping the depth of `previous.center`.
pub fn circle_to_sphere(circle: &Circle, previous: &Sphere, frame: &PairFrame) -> Sphere {
    Sphere {
        center: frame.lift(&circle.offset, &previous.center),
        radius: circle.radius,
    }
}

#[derive(Debug, Clone, Copy, Default)]
pub struct SphereMapper;

impl ShapeMapper for SphereMapper {
    type Volume = Sphere;
    type Planar = Circle;

    fn kind(&self) -> ShapeKind {
        ShapeKind::Sphere
    }

    fn to_planar(&self, src: &Sphere, dst: &mut Circle, env: &mut MapEnv<'_>) -> MapOutcome {
        *dst = sphere_to_circle(src, &env.frame);
        MapOutcome::Converted
    }

    fn to_volume(&self, src: &Circle, dst: &mut Sphere, env: &mut MapEnv<'_>) -> MapOutcome {
        *dst = circle_to_sphere(src, dst, &env.frame);
        MapOutcome::Converted
    }
}
