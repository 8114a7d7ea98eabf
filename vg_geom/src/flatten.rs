//! Adaptive and fixed-depth flattening of cubic béziers into line
//! segments, for rasterization and stroke-offset construction.

use crate::cubic_bezier::CubicBezierSegment;
use crate::math::Point;

/// Default recursion depth cap; tove2d's flattener uses 8 in practice
/// and refuses to go past 10 even if the tolerance test keeps failing.
pub const DEFAULT_MAX_RECURSION: u32 = 8;
pub const ABSOLUTE_MAX_RECURSION: u32 = 10;

/// Tolerance-based adaptive flattener (tove2d's `DefaultCurveFlattener`):
/// a curve is "flat enough" when the two midline control points don't
/// deviate from the chord by more than `sqrt(tolerance)`, tested via
/// the squared forms `ax^2`/`ay^2`/`bx^2`/`by^2` to avoid a `sqrt` per
/// candidate. Otherwise the curve is split at `t = 0.5` and both
/// halves are flattened recursively, down to `max_recursion` deep.
pub struct AdaptiveFlattener {
    pub tolerance: f32,
    pub max_recursion: u32,
}

impl Default for AdaptiveFlattener {
    fn default() -> Self {
        AdaptiveFlattener {
            tolerance: 0.1,
            max_recursion: DEFAULT_MAX_RECURSION,
        }
    }
}

impl AdaptiveFlattener {
    pub fn new(tolerance: f32) -> Self {
        AdaptiveFlattener {
            tolerance,
            max_recursion: DEFAULT_MAX_RECURSION,
        }
    }

    fn is_flat(&self, curve: &CubicBezierSegment) -> bool {
        let ax = 3.0 * curve.ctrl1.x - 2.0 * curve.from.x - curve.to.x;
        let ay = 3.0 * curve.ctrl1.y - 2.0 * curve.from.y - curve.to.y;
        let bx = 3.0 * curve.ctrl2.x - curve.from.x - 2.0 * curve.to.x;
        let by = 3.0 * curve.ctrl2.y - curve.from.y - 2.0 * curve.to.y;

        let max_x = (ax * ax).max(bx * bx);
        let max_y = (ay * ay).max(by * by);
        max_x + max_y <= 16.0 * self.tolerance * self.tolerance
    }

    /// Appends the curve's flattened points (excluding `curve.from`,
    /// including `curve.to`) to `out`.
    pub fn flatten(&self, curve: &CubicBezierSegment, out: &mut Vec<Point>) {
        self.flatten_rec(curve, out, self.max_recursion.min(ABSOLUTE_MAX_RECURSION));
    }

    fn flatten_rec(&self, curve: &CubicBezierSegment, out: &mut Vec<Point>, depth_left: u32) {
        if depth_left == 0 || self.is_flat(curve) {
            out.push(curve.to);
            return;
        }
        let (a, b) = curve.split(0.5);
        self.flatten_rec(&a, out, depth_left - 1);
        self.flatten_rec(&b, out, depth_left - 1);
    }
}

/// AntiGrain-style flattener: splits not just on flatness but also on
/// sharp turning angle and cusps, which the simple squared-deviation
/// test can miss on S-shaped curves.
pub struct AntiGrainFlattener {
    pub tolerance: f32,
    pub angle_tolerance: f32,
    pub max_recursion: u32,
}

impl Default for AntiGrainFlattener {
    fn default() -> Self {
        AntiGrainFlattener {
            tolerance: 0.1,
            angle_tolerance: 0.01,
            max_recursion: DEFAULT_MAX_RECURSION,
        }
    }
}

impl AntiGrainFlattener {
    pub fn flatten(&self, curve: &CubicBezierSegment, out: &mut Vec<Point>) {
        self.flatten_rec(curve, out, self.max_recursion.min(ABSOLUTE_MAX_RECURSION));
    }

    fn flatten_rec(&self, curve: &CubicBezierSegment, out: &mut Vec<Point>, depth_left: u32) {
        if depth_left == 0 {
            out.push(curve.to);
            return;
        }

        let dx = curve.to.x - curve.from.x;
        let dy = curve.to.y - curve.from.y;

        let d2 = ((curve.ctrl1.x - curve.to.x) * dy - (curve.ctrl1.y - curve.to.y) * dx).abs();
        let d3 = ((curve.ctrl2.x - curve.to.x) * dy - (curve.ctrl2.y - curve.to.y) * dx).abs();

        let collinear = if d2 > 1e-9 || d3 > 1e-9 {
            let chord_len2 = dx * dx + dy * dy;
            (d2 + d3) * (d2 + d3) <= self.tolerance * chord_len2
        } else {
            // All four points are collinear; only the chord length
            // between the controls can still force a split (a cusp
            // folded back on itself).
            let da = ((curve.ctrl1.x - curve.from.x) * dx + (curve.ctrl1.y - curve.from.y) * dy)
                .abs();
            let db =
                ((curve.ctrl2.x - curve.from.x) * dx + (curve.ctrl2.y - curve.from.y) * dy).abs();
            let chord_len2 = dx * dx + dy * dy;
            da <= chord_len2 && db <= chord_len2
        };

        if collinear && self.angle_is_flat(curve) {
            out.push(curve.to);
            return;
        }

        let (a, b) = curve.split(0.5);
        self.flatten_rec(&a, out, depth_left - 1);
        self.flatten_rec(&b, out, depth_left - 1);
    }

    fn angle_is_flat(&self, curve: &CubicBezierSegment) -> bool {
        if self.angle_tolerance <= 0.0 {
            return true;
        }
        let t1 = curve.derivative(0.05);
        let t2 = curve.derivative(0.95);
        let len1 = (t1.x * t1.x + t1.y * t1.y).sqrt();
        let len2 = (t2.x * t2.x + t2.y * t2.y).sqrt();
        if len1 < 1e-9 || len2 < 1e-9 {
            return true;
        }
        let cos_angle = (t1.x * t2.x + t1.y * t2.y) / (len1 * len2);
        (1.0 - cos_angle.clamp(-1.0, 1.0)) <= self.angle_tolerance
    }
}

/// Flattens into exactly `2^depth` line segments by uniform parameter
/// subdivision, with no tolerance test — used where callers need a
/// fixed, predictable vertex count (e.g. dash-turtle measurement) and
/// can afford over- or under-sampling smooth curves.
pub fn flatten_fixed(curve: &CubicBezierSegment, depth: u32, out: &mut Vec<Point>) {
    let steps = 1u32 << depth;
    for i in 1..=steps {
        let t = i as f32 / steps as f32;
        out.push(curve.sample(t));
    }
}

/// Same as [`flatten_fixed`] but each point is nudged `offset` along
/// the local normal, for building a quick-and-dirty parallel outline
/// without full stroke-offset geometry.
pub fn flatten_fixed_offset(curve: &CubicBezierSegment, depth: u32, offset: f32, out: &mut Vec<Point>) {
    let steps = 1u32 << depth;
    for i in 1..=steps {
        let t = i as f32 / steps as f32;
        let p = curve.sample(t);
        let d = curve.derivative(t);
        let len = (d.x * d.x + d.y * d.y).sqrt();
        if len < 1e-9 {
            out.push(p);
            continue;
        }
        let nx = -d.y / len;
        let ny = d.x / len;
        out.push(Point::new(p.x + nx * offset, p.y + ny * offset));
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::math::point;

    #[test]
    fn straight_line_flattens_to_single_point() {
        let c = CubicBezierSegment::new(
            point(0.0, 0.0),
            point(1.0, 0.0),
            point(2.0, 0.0),
            point(3.0, 0.0),
        );
        let f = AdaptiveFlattener::new(0.1);
        let mut out = Vec::new();
        f.flatten(&c, &mut out);
        assert_eq!(out.len(), 1);
        assert_eq!(out[0], c.to);
    }

    #[test]
    fn curvy_segment_subdivides() {
        let c = CubicBezierSegment::new(
            point(0.0, 0.0),
            point(0.0, 100.0),
            point(100.0, 100.0),
            point(100.0, 0.0),
        );
        let f = AdaptiveFlattener::new(0.1);
        let mut out = Vec::new();
        f.flatten(&c, &mut out);
        assert!(out.len() > 1);
        assert_eq!(*out.last().unwrap(), c.to);
    }

    #[test]
    fn fixed_flatten_produces_power_of_two_points() {
        let c = CubicBezierSegment::new(
            point(0.0, 0.0),
            point(0.0, 100.0),
            point(100.0, 100.0),
            point(100.0, 0.0),
        );
        let mut out = Vec::new();
        flatten_fixed(&c, 4, &mut out);
        assert_eq!(out.len(), 16);
    }
}
