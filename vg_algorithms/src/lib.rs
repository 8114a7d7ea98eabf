//! Cross-cutting geometry helpers reused by both the path editor and
//! the tessellation pipeline, kept in their own crate so neither has
//! to depend on the other (mirrors lyon's split of `algorithms` away
//! from `path` and `tessellation`).

pub mod aabb;
pub mod measure;
pub mod winding;
