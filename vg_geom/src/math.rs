//! Thin aliases over `euclid`'s untyped (no coordinate-space unit)
//! f32 primitives. Kept in their own module so the rest of the crate
//! reads like plain 2D code instead of a forest of `euclid::default::`.

pub type Point = euclid::default::Point2D<f32>;
pub type Vector = euclid::default::Vector2D<f32>;
pub type Box2D = euclid::default::Box2D<f32>;
pub type Transform = euclid::default::Transform2D<f32>;

#[inline]
pub fn point(x: f32, y: f32) -> Point {
    Point::new(x, y)
}

#[inline]
pub fn vector(x: f32, y: f32) -> Vector {
    Vector::new(x, y)
}
