//! Silhouette outline extraction for mesh colliders.
//!
//! The mesh is rendered orthographically along the conversion axis into a
//! binary raster, narrow gaps are closed, boundaries are traced with
//! marching squares and each loop is simplified with Douglas-Peucker.
//!
//! ```ignore
//! let settings = OutlineSettings::default().with_resolution(256).with_tolerance(0.75);
//! let outline = extract_outline(&mesh, &frame.volume_to_planar_pose(), &settings, &mut renderer);
//! ```

mod contour;
mod extract;
mod raster;
mod render;
mod settings;

pub use contour::{GridKey, connect_segments, extract_segments, trace_contours};
pub use extract::{Outline, extract_outline, loop_bounds, planar_depth};
pub use raster::Raster;
pub use render::{SilhouetteRenderer, SilhouetteRequest, SoftwareRenderer};
pub use settings::{MIN_RESOLUTION, OutlineSettings};
