//! The per-shape mapping capability.

use std::sync::Arc;

use dimshift_core::mesh::TriMesh;

use crate::frame::PairFrame;
use crate::outline::SilhouetteRenderer;
use crate::shapes::ShapeKind;

/// Why a mapping left its target untouched.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SkipReason {
    /// The shape's orientation has no counterpart in the other dimension.
    UnsupportedOrientation,
    /// The shape collapses to nothing when projected.
    DegenerateBounds,
    /// The polygon failed the box plausibility check.
    NotABox,
    /// Mesh collider without a mesh.
    MissingMesh,
    /// Polygon without any usable path.
    EmptyPolygon,
    /// Mesh generation is switched off.
    GenerationDisabled,
}

impl std::fmt::Display for SkipReason {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            SkipReason::UnsupportedOrientation => {
                f.write_str("orientation has no equivalent in the target dimension")
            }
            SkipReason::DegenerateBounds => f.write_str("shape has zero planar extent"),
            SkipReason::NotABox => f.write_str("polygon is not a box silhouette"),
            SkipReason::MissingMesh => f.write_str("mesh collider has no mesh"),
            SkipReason::EmptyPolygon => f.write_str("polygon has no closed path"),
            SkipReason::GenerationDisabled => f.write_str("mesh generation disabled"),
        }
    }
}

/// Result of one mapping call.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MapOutcome {
    Converted,
    Skipped(SkipReason),
}

impl MapOutcome {
    pub fn is_converted(self) -> bool {
        matches!(self, MapOutcome::Converted)
    }

    /// Log a skip as a warning and return it.
    pub(crate) fn skip(kind: ShapeKind, direction: &str, reason: SkipReason) -> Self {
        log::warn!("{kind} {direction}: skipped, {reason}");
        MapOutcome::Skipped(reason)
    }
}

/// Environment shared by mapping calls.
pub struct MapEnv<'a> {
    /// Local frames of the pair being mapped.
    pub frame: PairFrame,
    /// Scratch rig used for outline extraction.
    pub renderer: &'a mut dyn SilhouetteRenderer,
    /// Meshes replaced during polygon→mesh conversion that the caller keeps.
    pub replaced_meshes: Vec<Arc<TriMesh>>,
}

impl<'a> MapEnv<'a> {
    pub fn new(frame: PairFrame, renderer: &'a mut dyn SilhouetteRenderer) -> Self {
        Self {
            frame,
            renderer,
            replaced_meshes: Vec::new(),
        }
    }
}

/// Bidirectional mapping between one volume shape type and one planar
/// shape type.
///
/// A skipped mapping must leave `dst` exactly as it was.
pub trait ShapeMapper {
    type Volume;
    type Planar;

    /// Shape kind handled by this mapper.
    fn kind(&self) -> ShapeKind;

    fn to_planar(
        &self,
        src: &Self::Volume,
        dst: &mut Self::Planar,
        env: &mut MapEnv<'_>,
    ) -> MapOutcome;

    fn to_volume(
        &self,
        src: &Self::Planar,
        dst: &mut Self::Volume,
        env: &mut MapEnv<'_>,
    ) -> MapOutcome;
}
