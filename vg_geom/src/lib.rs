//! Pure 2D geometry: points, cubic bézier segments, flattening and
//! cubic-root intersection math.
//!
//! This crate has no notion of subpaths, paths or paints — see
//! `vg_path` for the data model built on top of it. Everything here
//! operates on bare coordinates so it can be reused by both the path
//! editor and the tessellation pipeline without a dependency cycle.

pub mod cubic_bezier;
pub mod flatten;
pub mod intersect;
pub mod math;
pub mod primitives;
pub mod winding;

pub use crate::cubic_bezier::CubicBezierSegment;
pub use crate::math::{point, vector, Box2D, Point, Transform, Vector};
