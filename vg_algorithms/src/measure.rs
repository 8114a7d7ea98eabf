//! Arc-length measurement, used by the dash turtle to walk a flattened
//! outline by distance rather than by parameter.

use vg_geom::cubic_bezier::CubicBezierSegment;
use vg_geom::Point;

/// Approximates a cubic's arc length by sampling `steps` equal
/// parameter increments and summing chord lengths — cheap and
/// sufficiently accurate once a curve has already been flattened for
/// rendering at a similar resolution.
pub fn cubic_length(curve: &CubicBezierSegment, steps: u32) -> f32 {
    let mut length = 0.0;
    let mut prev = curve.from;
    for i in 1..=steps {
        let t = i as f32 / steps as f32;
        let p = curve.sample(t);
        length += dist(prev, p);
        prev = p;
    }
    length
}

/// Total length of a polyline (already-flattened curve or polygon
/// edge list).
pub fn polyline_length(points: &[Point], closed: bool) -> f32 {
    if points.len() < 2 {
        return 0.0;
    }
    let mut length = 0.0;
    for w in points.windows(2) {
        length += dist(w[0], w[1]);
    }
    if closed {
        length += dist(*points.last().unwrap(), points[0]);
    }
    length
}

fn dist(a: Point, b: Point) -> f32 {
    ((b.x - a.x).powi(2) + (b.y - a.y).powi(2)).sqrt()
}

/// Walks a polyline to the point at cumulative arc-length `distance`,
/// returning the interpolated point plus the index of the segment it
/// falls in. Clamps `distance` into `[0, total_length]`.
pub fn point_at_length(points: &[Point], closed: bool, distance: f32) -> Option<(Point, usize)> {
    if points.len() < 2 {
        return None;
    }
    let mut remaining = distance.max(0.0);
    let n = points.len();
    let edge_count = if closed { n } else { n - 1 };
    for i in 0..edge_count {
        let a = points[i];
        let b = points[(i + 1) % n];
        let seg_len = dist(a, b);
        if remaining <= seg_len || i == edge_count - 1 {
            let t = if seg_len > 1e-9 { (remaining / seg_len).clamp(0.0, 1.0) } else { 0.0 };
            return Some((vg_geom::point(a.x + (b.x - a.x) * t, a.y + (b.y - a.y) * t), i));
        }
        remaining -= seg_len;
    }
    None
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn straight_line_length() {
        let pts = vec![vg_geom::point(0.0, 0.0), vg_geom::point(3.0, 4.0)];
        assert!((polyline_length(&pts, false) - 5.0).abs() < 1e-5);
    }

    #[test]
    fn point_at_half_length() {
        let pts = vec![vg_geom::point(0.0, 0.0), vg_geom::point(10.0, 0.0)];
        let (p, _) = point_at_length(&pts, false, 5.0).unwrap();
        assert!((p.x - 5.0).abs() < 1e-5);
    }
}
