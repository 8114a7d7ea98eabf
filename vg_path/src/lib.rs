//! The path data model: `Subpath`, `Path`, `Graphics` and their
//! editing, paint, bounds, hit-testing and animation operations.
//!
//! Built on `vg_geom` for the underlying curve math; intersect-test
//! and flattening stay in `vg_geom` so this crate is free of any
//! tessellation-specific dependency.

pub mod edit_command;
pub mod error;
pub mod graphics;
pub mod paint;
pub mod path;
pub mod subpath;

pub use crate::error::Error;
pub use crate::graphics::{Graphics, Style};
pub use crate::paint::{Gradient, GradientStop, LinearGradient, Paint, RadialGradient, Rgba};
pub use crate::path::{LineCap, LineJoin, Path};
pub use crate::subpath::{FillRule, Handle, Side, Subpath};
