//! 2D vector graphics: path editing, paint, dashing, stroking and
//! triangulation.
//!
//! # Crates
//!
//! This meta-crate reexports its sub-crates for convenience:
//!
//! * **vg_geom** - cubic-bezier math, adaptive flattening, ray/curve
//!   intersection.
//! * **vg_path** - the `Subpath`/`Path`/`Graphics` editing model, paint
//!   and gradients, animation.
//! * **vg_algorithms** - bounds, arc-length measurement, winding.
//! * **vg_tessellation** - dashing, stroke offsetting, triangulation
//!   and the partition-verification cache.
//!
//! Each `vg_<name>` crate is reexported as a `<name>` module here. For
//! example `vg_path::Path` is also reachable as `vectograph::path::Path`.

pub use vg_algorithms as algorithms;
pub use vg_geom as geom;
pub use vg_path as path;
pub use vg_tessellation as tessellation;

/// The common types most callers need: re-exported flat rather than
/// through their owning module.
pub mod prelude {
    pub use vg_algorithms::winding::HoleConvention;
    pub use vg_geom::{point, vector, Box2D, CubicBezierSegment, Point, Transform, Vector};
    pub use vg_path::{FillRule, Graphics, Handle, LineCap, LineJoin, Paint, Path, Rgba, Style, Subpath};
    pub use vg_tessellation::{build, Mesh, StrokeResult, Tessellator, Triangulation, TriangulationCache};
}
