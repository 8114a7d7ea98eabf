//! Ray/curve intersection via a closed-form Cardano cubic solver, and
//! the NonZero/EvenOdd winding counters built on top of it. Grounded
//! in tove2d's `intersect.h`, which casts axis-aligned rays (`+x` and
//! `+y`) against each curve's monomial coefficients instead of walking
//! flattened polygons.

use crate::cubic_bezier::CubicBezierSegment;
use crate::math::Point;
use std::f32::consts::PI;

/// Real roots of `t^3 + a t^2 + b t + c = 0` in `[0, 1]`, via Cardano's
/// formula. Mirrors tove2d's `Q = (3b - a^2) / 9`, `R = (9ab - 27c -
/// 2a^3) / 54`, `D = Q^3 + R^2` branch structure.
pub fn solve_cubic_01(a: f32, b: f32, c: f32) -> arrayvec::ArrayVec<f32, 3> {
    let mut roots = arrayvec::ArrayVec::new();
    let q = (3.0 * b - a * a) / 9.0;
    let r = (9.0 * a * b - 27.0 * c - 2.0 * a * a * a) / 54.0;
    let d = q * q * q + r * r;
    let third_a = a / 3.0;

    if d > 0.0 {
        let sqrt_d = d.sqrt();
        let s = (r + sqrt_d).cbrt();
        let t = (r - sqrt_d).cbrt();
        push_if_in_range(&mut roots, s + t - third_a);
    } else if d == 0.0 {
        let s = r.cbrt();
        push_if_in_range(&mut roots, 2.0 * s - third_a);
        push_if_in_range(&mut roots, -s - third_a);
    } else {
        let theta = (r / (-q * q * q).sqrt()).clamp(-1.0, 1.0).acos();
        let sqrt_neg_q = (-q).sqrt();
        for k in 0..3 {
            let angle = (theta + 2.0 * PI * k as f32) / 3.0;
            push_if_in_range(&mut roots, 2.0 * sqrt_neg_q * angle.cos() - third_a);
        }
    }
    roots
}

fn push_if_in_range(roots: &mut arrayvec::ArrayVec<f32, 3>, t: f32) {
    if t >= -1e-6 && t <= 1.0 + 1e-6 {
        roots.push(t.clamp(0.0, 1.0));
    }
}

/// Parameters `t` at which `curve` crosses the ray `from + s * dir`
/// (`s >= 0`), for an arbitrary ray direction. Used by `hit_test`-style
/// point containment and by `nearest`'s caller-supplied probing rays.
pub fn ray_curve_intersections(
    curve: &CubicBezierSegment,
    origin: Point,
    dir: (f32, f32),
) -> arrayvec::ArrayVec<f32, 3> {
    let coeffs = curve.coefficients();
    // Rotate into ray space: solve for t such that the curve point,
    // projected onto the direction perpendicular to `dir`, equals the
    // ray's own perpendicular offset (i.e. intersect with the ray's
    // supporting line), the same substitution tove2d's `CompiledRay`
    // bakes into template parameters `DX`/`DY`.
    let (dx, dy) = dir;
    let px = |i: usize| coeffs.x[i];
    let py = |i: usize| coeffs.y[i];

    // f(t) = dy * (x(t) - origin.x) - dx * (y(t) - origin.y) = 0
    let k3 = dy * px(0) - dx * py(0);
    let k2 = dy * px(1) - dx * py(1);
    let k1 = dy * px(2) - dx * py(2);
    let k0 = dy * (px(3) - origin.x) - dx * (py(3) - origin.y);

    let mut out = arrayvec::ArrayVec::new();
    if k3.abs() < 1e-9 {
        // Degenerates to at most a quadratic; solve directly rather
        // than dividing by a near-zero leading coefficient.
        for t in solve_quadratic_01(k2, k1, k0) {
            if ray_param_at(curve, t, origin, dir) >= -1e-4 {
                out.push(t);
            }
        }
        return out;
    }

    for t in solve_cubic_01(k2 / k3, k1 / k3, k0 / k3) {
        if ray_param_at(curve, t, origin, dir) >= -1e-4 {
            out.push(t);
        }
    }
    out
}

fn solve_quadratic_01(a: f32, b: f32, c: f32) -> arrayvec::ArrayVec<f32, 2> {
    let mut roots = arrayvec::ArrayVec::new();
    if a.abs() < 1e-9 {
        if b.abs() > 1e-9 {
            let t = -c / b;
            if (0.0..=1.0).contains(&t) {
                roots.push(t);
            }
        }
        return roots;
    }
    let disc = b * b - 4.0 * a * c;
    if disc < 0.0 {
        return roots;
    }
    let sqrt_disc = disc.sqrt();
    for t in [(-b - sqrt_disc) / (2.0 * a), (-b + sqrt_disc) / (2.0 * a)] {
        if (0.0..=1.0).contains(&t) {
            roots.push(t);
        }
    }
    roots
}

fn ray_param_at(curve: &CubicBezierSegment, t: f32, origin: Point, dir: (f32, f32)) -> f32 {
    let p = curve.sample(t);
    let (dx, dy) = dir;
    let len2 = dx * dx + dy * dy;
    if len2 < 1e-12 {
        return 0.0;
    }
    ((p.x - origin.x) * dx + (p.y - origin.y) * dy) / len2
}

/// Winding accumulator for the nonzero fill rule: `+1` for each
/// upward ray crossing, `-1` for each downward one.
#[derive(Default, Clone, Copy)]
pub struct NonZeroCounter {
    pub winding: i32,
}

impl NonZeroCounter {
    pub fn add_crossing(&mut self, curve: &CubicBezierSegment, t: f32) {
        let d = curve.derivative(t);
        if d.y > 0.0 {
            self.winding += 1;
        } else if d.y < 0.0 {
            self.winding -= 1;
        }
    }

    pub fn is_inside(&self) -> bool {
        self.winding != 0
    }
}

/// Crossing-count accumulator for the even-odd fill rule.
#[derive(Default, Clone, Copy)]
pub struct EvenOddCounter {
    pub crossings: u32,
}

impl EvenOddCounter {
    pub fn add_crossing(&mut self) {
        self.crossings += 1;
    }

    pub fn is_inside(&self) -> bool {
        self.crossings % 2 == 1
    }
}

/// Tests whether `point` lies inside the closed curve list under the
/// given fill rule, casting three rays — `(1, 0)`, `(0, 1)`, `(1, 1)`
/// — and taking the majority vote. A single ray can misclassify points
/// that lie exactly on a curve's tangent or pass through a vertex;
/// tove2d's `AbstractInsideTest` works around this the same way.
pub fn point_in_curves(curves: &[CubicBezierSegment], point: Point, nonzero: bool) -> bool {
    let rays: [(f32, f32); 3] = [(1.0, 0.0), (0.0, 1.0), (1.0, 1.0)];
    let mut votes = 0;
    for &dir in &rays {
        let inside = if nonzero {
            let mut counter = NonZeroCounter::default();
            for curve in curves {
                for t in ray_curve_intersections(curve, point, dir) {
                    counter.add_crossing(curve, t);
                }
            }
            counter.is_inside()
        } else {
            let mut counter = EvenOddCounter::default();
            for curve in curves {
                for _t in ray_curve_intersections(curve, point, dir) {
                    counter.add_crossing();
                }
            }
            counter.is_inside()
        };
        if inside {
            votes += 1;
        }
    }
    votes >= 2
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::math::point;

    fn unit_square() -> Vec<CubicBezierSegment> {
        let a = point(0.0, 0.0);
        let b = point(10.0, 0.0);
        let c = point(10.0, 10.0);
        let d = point(0.0, 10.0);
        vec![
            CubicBezierSegment::new(a, a.lerp(b, 1.0 / 3.0), a.lerp(b, 2.0 / 3.0), b),
            CubicBezierSegment::new(b, b.lerp(c, 1.0 / 3.0), b.lerp(c, 2.0 / 3.0), c),
            CubicBezierSegment::new(c, c.lerp(d, 1.0 / 3.0), c.lerp(d, 2.0 / 3.0), d),
            CubicBezierSegment::new(d, d.lerp(a, 1.0 / 3.0), d.lerp(a, 2.0 / 3.0), a),
        ]
    }

    #[test]
    fn point_inside_square() {
        let square = unit_square();
        assert!(point_in_curves(&square, point(5.0, 5.0), true));
    }

    #[test]
    fn point_outside_square() {
        let square = unit_square();
        assert!(!point_in_curves(&square, point(50.0, 50.0), true));
    }

    #[test]
    fn cubic_solver_finds_known_root() {
        // (t - 0.5)^3 = t^3 - 1.5t^2 + 0.75t - 0.125
        let roots = solve_cubic_01(-1.5, 0.75, -0.125);
        assert_eq!(roots.len(), 1);
        assert!((roots[0] - 0.5).abs() < 1e-3);
    }
}
