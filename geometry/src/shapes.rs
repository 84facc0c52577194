//! Volume (3D) and planar (2D) collider shapes.
//!
//! Parameters follow common game-engine conventions: capsule `height` is the
//! full tip-to-tip length, box `size` is the full edge length, and 2D capsule
//! `size` is the full bounding rectangle.

use std::sync::Arc;

use dimshift_core::math::{Vec2, Vec3};
use dimshift_core::mesh::TriMesh;

/// Local axis of a volume capsule.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum Axis {
    X,
    #[default]
    Y,
    Z,
}

impl Axis {
    /// Unit vector along this axis.
    pub fn unit(self) -> Vec3 {
        match self {
            Axis::X => Vec3::x(),
            Axis::Y => Vec3::y(),
            Axis::Z => Vec3::z(),
        }
    }
}

/// Orientation of a 2D capsule.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum CapsuleDirection2D {
    #[default]
    Vertical,
    Horizontal,
}

impl CapsuleDirection2D {
    /// Unit vector of the capsule's long axis in the plane.
    pub fn unit(self) -> Vec2 {
        match self {
            CapsuleDirection2D::Vertical => Vec2::y(),
            CapsuleDirection2D::Horizontal => Vec2::x(),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Sphere {
    pub center: Vec3,
    pub radius: f32,
}

impl Default for Sphere {
    fn default() -> Self {
        Self {
            center: Vec3::zeros(),
            radius: 0.5,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Capsule {
    pub center: Vec3,
    pub radius: f32,
    /// Full length including both hemispheres.
    pub height: f32,
    pub direction: Axis,
}

impl Default for Capsule {
    fn default() -> Self {
        Self {
            center: Vec3::zeros(),
            radius: 0.5,
            height: 2.0,
            direction: Axis::Y,
        }
    }
}

impl Capsule {
    /// Distance between the two hemisphere centers.
    pub fn segment_length(&self) -> f32 {
        (self.height - 2.0 * self.radius).max(0.0)
    }
}

/// Oriented box; `size` holds full edge lengths along the local axes.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Cuboid {
    pub center: Vec3,
    pub size: Vec3,
}

impl Default for Cuboid {
    fn default() -> Self {
        Self {
            center: Vec3::zeros(),
            size: Vec3::repeat(1.0),
        }
    }
}

/// Mesh collider. The mesh asset is shared, so it lives behind an [`Arc`].
#[derive(Debug, Clone, Default, PartialEq)]
pub struct MeshVolume {
    pub mesh: Option<Arc<TriMesh>>,
}

impl MeshVolume {
    pub fn new(mesh: TriMesh) -> Self {
        Self {
            mesh: Some(Arc::new(mesh)),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Circle {
    pub offset: Vec2,
    pub radius: f32,
}

impl Default for Circle {
    fn default() -> Self {
        Self {
            offset: Vec2::zeros(),
            radius: 0.5,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Capsule2D {
    pub offset: Vec2,
    /// Full bounding rectangle of the capsule.
    pub size: Vec2,
    pub direction: CapsuleDirection2D,
}

impl Default for Capsule2D {
    fn default() -> Self {
        Self {
            offset: Vec2::zeros(),
            size: Vec2::new(1.0, 2.0),
            direction: CapsuleDirection2D::Vertical,
        }
    }
}

impl Capsule2D {
    /// Width across the capsule's long axis.
    pub fn diameter(&self) -> f32 {
        match self.direction {
            CapsuleDirection2D::Vertical => self.size.x,
            CapsuleDirection2D::Horizontal => self.size.y,
        }
    }

    /// Distance between the two semicircle centers.
    pub fn segment_length(&self) -> f32 {
        match self.direction {
            CapsuleDirection2D::Vertical => (self.size.y - self.size.x).max(0.0),
            CapsuleDirection2D::Horizontal => (self.size.x - self.size.y).max(0.0),
        }
    }
}

/// Polygon collider made of one or more closed paths.
///
/// Path points are relative to `offset`. Outer boundaries wind
/// counter-clockwise, holes clockwise.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct Polygon {
    pub offset: Vec2,
    pub paths: Vec<Vec<Vec2>>,
}

impl Polygon {
    /// Single-path polygon.
    pub fn from_points(offset: Vec2, points: Vec<Vec2>) -> Self {
        Self {
            offset,
            paths: vec![points],
        }
    }

    pub fn path_count(&self) -> usize {
        self.paths.len()
    }

    pub fn point_count(&self) -> usize {
        self.paths.iter().map(Vec::len).sum()
    }

    pub fn is_empty(&self) -> bool {
        self.paths.iter().all(|p| p.len() < 3)
    }
}

/// Kind of a shape pair, used for dispatch and logging.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ShapeKind {
    Sphere,
    Capsule,
    Box,
    Mesh,
}

impl std::fmt::Display for ShapeKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let name = match self {
            ShapeKind::Sphere => "sphere",
            ShapeKind::Capsule => "capsule",
            ShapeKind::Box => "box",
            ShapeKind::Mesh => "mesh",
        };
        f.write_str(name)
    }
}

/// Any volume collider shape.
#[derive(Debug, Clone, PartialEq)]
pub enum VolumeShape {
    Sphere(Sphere),
    Capsule(Capsule),
    Cuboid(Cuboid),
    Mesh(MeshVolume),
}

impl VolumeShape {
    pub fn kind(&self) -> ShapeKind {
        match self {
            VolumeShape::Sphere(_) => ShapeKind::Sphere,
            VolumeShape::Capsule(_) => ShapeKind::Capsule,
            VolumeShape::Cuboid(_) => ShapeKind::Box,
            VolumeShape::Mesh(_) => ShapeKind::Mesh,
        }
    }

    /// Default shape of the given kind.
    pub fn default_for(kind: ShapeKind) -> Self {
        match kind {
            ShapeKind::Sphere => VolumeShape::Sphere(Sphere::default()),
            ShapeKind::Capsule => VolumeShape::Capsule(Capsule::default()),
            ShapeKind::Box => VolumeShape::Cuboid(Cuboid::default()),
            ShapeKind::Mesh => VolumeShape::Mesh(MeshVolume::default()),
        }
    }
}

/// Any planar collider shape.
#[derive(Debug, Clone, PartialEq)]
pub enum PlanarShape {
    Circle(Circle),
    Capsule(Capsule2D),
    Polygon(Polygon),
}

impl PlanarShape {
    /// Kinds of volume shape this planar shape can pair with.
    pub fn pairs_with(&self, kind: ShapeKind) -> bool {
        matches!(
            (self, kind),
            (PlanarShape::Circle(_), ShapeKind::Sphere)
                | (PlanarShape::Capsule(_), ShapeKind::Capsule)
                | (PlanarShape::Polygon(_), ShapeKind::Box | ShapeKind::Mesh)
        )
    }

    /// Default planar partner for a volume shape kind.
    pub fn default_for(kind: ShapeKind) -> Self {
        match kind {
            ShapeKind::Sphere => PlanarShape::Circle(Circle::default()),
            ShapeKind::Capsule => PlanarShape::Capsule(Capsule2D::default()),
            ShapeKind::Box | ShapeKind::Mesh => PlanarShape::Polygon(Polygon::default()),
        }
    }
}

/// Typed access to one variant of [`VolumeShape`].
pub trait VolumeVariant: Sized {
    const KIND: ShapeKind;
    fn get(shape: &VolumeShape) -> Option<&Self>;
    fn get_mut(shape: &mut VolumeShape) -> Option<&mut Self>;
}

/// Typed access to one variant of [`PlanarShape`].
pub trait PlanarVariant: Sized {
    fn get(shape: &PlanarShape) -> Option<&Self>;
    fn get_mut(shape: &mut PlanarShape) -> Option<&mut Self>;
}

macro_rules! volume_variant {
    ($ty:ty, $variant:ident, $kind:expr) => {
        impl VolumeVariant for $ty {
            const KIND: ShapeKind = $kind;

            fn get(shape: &VolumeShape) -> Option<&Self> {
                match shape {
                    VolumeShape::$variant(s) => Some(s),
                    _ => None,
                }
            }

            fn get_mut(shape: &mut VolumeShape) -> Option<&mut Self> {
                match shape {
                    VolumeShape::$variant(s) => Some(s),
                    _ => None,
                }
            }
        }
    };
}

macro_rules! planar_variant {
    ($ty:ty, $variant:ident) => {
        impl PlanarVariant for $ty {
            fn get(shape: &PlanarShape) -> Option<&Self> {
                match shape {
                    PlanarShape::$variant(s) => Some(s),
                    _ => None,
                }
            }

            fn get_mut(shape: &mut PlanarShape) -> Option<&mut Self> {
                match shape {
                    PlanarShape::$variant(s) => Some(s),
                    _ => None,
                }
            }
        }
    };
}

volume_variant!(Sphere, Sphere, ShapeKind::Sphere);
volume_variant!(Capsule, Capsule, ShapeKind::Capsule);
volume_variant!(Cuboid, Cuboid, ShapeKind::Box);
volume_variant!(MeshVolume, Mesh, ShapeKind::Mesh);
planar_variant!(Circle, Circle);
planar_variant!(Capsule2D, Capsule);
planar_variant!(Polygon, Polygon);

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn capsule_segment_never_negative() {
        let capsule = Capsule {
            radius: 1.0,
            height: 1.0,
            ..Default::default()
        };
        assert_eq!(capsule.segment_length(), 0.0);
    }

    #[test]
    fn capsule2d_diameter_follows_direction() {
        let mut c = Capsule2D {
            size: Vec2::new(3.0, 1.0),
            direction: CapsuleDirection2D::Horizontal,
            ..Default::default()
        };
        assert_eq!(c.diameter(), 1.0);
        assert_eq!(c.segment_length(), 2.0);
        c.direction = CapsuleDirection2D::Vertical;
        assert_eq!(c.diameter(), 3.0);
        assert_eq!(c.segment_length(), 0.0);
    }

    #[test]
    fn variant_access() {
        let mut shape = VolumeShape::default_for(ShapeKind::Box);
        assert!(Cuboid::get(&shape).is_some());
        assert!(Sphere::get(&shape).is_none());
        if let Some(cuboid) = Cuboid::get_mut(&mut shape) {
            cuboid.size.x = 4.0;
        }
        assert_eq!(Cuboid::get(&shape).map(|c| c.size.x), Some(4.0));
    }

    #[test]
    fn planar_pairing() {
        assert!(PlanarShape::default_for(ShapeKind::Mesh).pairs_with(ShapeKind::Box));
        assert!(!PlanarShape::default_for(ShapeKind::Sphere).pairs_with(ShapeKind::Capsule));
    }
}
