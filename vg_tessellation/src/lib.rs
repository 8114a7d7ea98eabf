//! Flattening, dashing, stroke offsetting, and triangulation (§4.5,
//! §4.7): turns `vg_path::Path` geometry into renderable triangle
//! meshes.

pub mod cache;
pub mod dash;
pub mod pipeline;
pub mod stroke;
pub mod triangulate;

pub use cache::{Triangulation, TriangulationCache};
pub use pipeline::{build, Mesh, StrokeResult, Tessellator};
pub use triangulate::{triangulate_polygon, triangulate_polygon_with_holes};
