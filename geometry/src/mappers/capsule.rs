//! Capsule ↔ 2D capsule.
//!
//! The capsule's axis is rotated into the planar frame. Its dominant
//! in-plane component picks the 2D direction and scales the distance
//! between the hemisphere centers. Going back, the 3D height is recovered
//! from the angle between the two axes. An axis lying along the conversion
//! axis has no 2D equivalent and the mapping is skipped.

use dimshift_core::math::{Vec2, Vec3};

use crate::frame::PairFrame;
use crate::mapper::{MapEnv, MapOutcome, ShapeMapper, SkipReason};
use crate::shapes::{Capsule, Capsule2D, CapsuleDirection2D, ShapeKind};

/// Minimum in-plane length of the unit axis for a capsule to be mappable.
const MIN_PROJECTED_AXIS: f32 = 1.0e-3;

/// Angles whose cosine falls below this count as perpendicular.
const PERPENDICULAR_COS: f32 = 1.0e-3;

/// Capsule axis expressed in the planar frame.
fn planar_axis(capsule: &Capsule, frame: &PairFrame) -> Vec3 {
    frame.relative_rotation() * capsule.direction.unit()
}

/// Map a capsule to its 2D silhouette, or `None` when it points along the
/// conversion axis.
pub fn capsule_to_2d(capsule: &Capsule, frame: &PairFrame) -> Option<Capsule2D> {
    let axis = planar_axis(capsule, frame);
    let in_plane = axis.xy();
    if in_plane.norm() < MIN_PROJECTED_AXIS {
        return None;
    }

    let diameter = 2.0 * capsule.radius;
    let horizontal = in_plane.x.abs() > in_plane.y.abs();
    // Hemisphere separation measured along the chosen 2D axis.
    let along = if horizontal { in_plane.x } else { in_plane.y };
    let distance = capsule.segment_length() * along.abs();
    let (direction, size) = if horizontal {
        (
            CapsuleDirection2D::Horizontal,
            Vec2::new(diameter + distance, diameter),
        )
    } else {
        (
            CapsuleDirection2D::Vertical,
            Vec2::new(diameter, diameter + distance),
        )
    };

    Some(Capsule2D {
        offset: frame.project(&capsule.center),
        size,
        direction,
    })
}

/// Angle in radians between the capsule's axis (in the planar frame) and
/// the long axis of a 2D capsule.
pub fn axis_angle(capsule: &Capsule, direction: CapsuleDirection2D, frame: &PairFrame) -> f32 {
    let axis = planar_axis(capsule, frame);
    let flat = direction.unit();
    let cos = (axis.x * flat.x + axis.y * flat.y).abs().min(1.0);
    cos.acos()
}

/// Rebuild a capsule from a 2D capsule. Depth, axis and anything the 2D
/// shape does not carry come from `previous`.
pub fn capsule_from_2d(shape: &Capsule2D, previous: &Capsule, frame: &PairFrame) -> Capsule {
    let diameter = shape.diameter();
    let distance = shape.segment_length();
    let angle = axis_angle(previous, shape.direction, frame);

    let height = if angle.cos() < PERPENDICULAR_COS {
        diameter
    } else {
        let slant = distance * angle.tan();
        diameter + (distance * distance + slant * slant).sqrt()
    };

    Capsule {
        center: frame.lift(&shape.offset, &previous.center),
        radius: diameter * 0.5,
        height,
        direction: previous.direction,
    }
}

#[derive(Debug, Clone, Copy, Default)]
pub struct CapsuleMapper;

impl ShapeMapper for CapsuleMapper {
    type Volume = Capsule;
    type Planar = Capsule2D;

    fn kind(&self) -> ShapeKind {
        ShapeKind::Capsule
    }

    fn to_planar(&self, src: &Capsule, dst: &mut Capsule2D, env: &mut MapEnv<'_>) -> MapOutcome {
        match capsule_to_2d(src, &env.frame) {
            Some(shape) => {
                *dst = shape;
                MapOutcome::Converted
            }
            None => MapOutcome::skip(self.kind(), "to 2D", SkipReason::UnsupportedOrientation),
        }
    }

    fn to_volume(&self, src: &Capsule2D, dst: &mut Capsule, env: &mut MapEnv<'_>) -> MapOutcome {
        if planar_axis(dst, &env.frame).xy().norm() < MIN_PROJECTED_AXIS {
            return MapOutcome::skip(self.kind(), "to 3D", SkipReason::UnsupportedOrientation);
        }
        *dst = capsule_from_2d(src, dst, &env.frame);
        MapOutcome::Converted
    }
}
