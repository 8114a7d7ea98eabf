//! Closed-form emitters turning lines/rects/ellipses/arcs into cubic
//! bézier control points, in the `K C C` knot/control layout (§3/§4.1).
//! These only compute point arrays; `vg_path::Subpath` owns the
//! bookkeeping around them.

use crate::math::Point;

/// κ₉₀, the classic circular-arc cubic approximation constant (taken,
/// like the rest of this emitter set, from NanoSVG's convention).
pub const KAPPA90: f32 = 0.5522847493;

/// Appends the `C C K` triple for a straight line from `from` to
/// `(x, y)`, placing the two control points at 1/3 and 2/3 along the
/// chord so the segment flattens back to the original line exactly.
pub fn line_to(from: Point, x: f32, y: f32, out: &mut Vec<Point>) {
    let dx = x - from.x;
    let dy = y - from.y;
    out.push(Point::new(from.x + dx / 3.0, from.y + dy / 3.0));
    out.push(Point::new(x - dx / 3.0, y - dy / 3.0));
    out.push(Point::new(x, y));
}

/// Normalizes corner radii into `[0, min(w,h)/2]`, per §4.1's
/// `draw_rect` contract.
pub fn normalize_rect_radii(w: f32, h: f32, mut rx: f32, mut ry: f32) -> (f32, f32) {
    if rx < 0.0 && ry > 0.0 {
        rx = ry;
    }
    if ry < 0.0 && rx > 0.0 {
        ry = rx;
    }
    rx = rx.max(0.0);
    ry = ry.max(0.0);
    rx = rx.min(w / 2.0);
    ry = ry.min(h / 2.0);
    (rx, ry)
}

/// Emits the knot/control points for a rectangle at `(x, y)` sized
/// `w × h` with corner radii `(rx, ry)`. Returns an empty vec for a
/// degenerate (zero width or height) rect, 9 points (`K C C K C C K C C`
/// minus the trailing duplicate close point callers add) for a sharp
/// rect, or 12 for a rounded one, matching §4.1.
pub fn draw_rect(x: f32, y: f32, w: f32, h: f32, rx: f32, ry: f32) -> Vec<Point> {
    if w == 0.0 || h == 0.0 {
        return Vec::new();
    }
    let (rx, ry) = normalize_rect_radii(w, h, rx, ry);
    let mut pts = Vec::new();

    if rx < f32::EPSILON || ry < f32::EPSILON {
        pts.push(Point::new(x, y));
        line_to(Point::new(x, y), x + w, y, &mut pts);
        line_to(Point::new(x + w, y), x + w, y + h, &mut pts);
        line_to(Point::new(x + w, y + h), x, y + h, &mut pts);
        line_to(Point::new(x, y + h), x, y, &mut pts);
    } else {
        let k = 1.0 - KAPPA90;
        pts.push(Point::new(x + rx, y));
        line_to(Point::new(x + rx, y), x + w - rx, y, &mut pts);
        pts.push(Point::new(x + w - rx * k, y));
        pts.push(Point::new(x + w, y + ry * k));
        pts.push(Point::new(x + w, y + ry));
        line_to(Point::new(x + w, y + ry), x + w, y + h - ry, &mut pts);
        pts.push(Point::new(x + w, y + h - ry * k));
        pts.push(Point::new(x + w - rx * k, y + h));
        pts.push(Point::new(x + w - rx, y + h));
        line_to(Point::new(x + w - rx, y + h), x + rx, y + h, &mut pts);
        pts.push(Point::new(x + rx * k, y + h));
        pts.push(Point::new(x, y + h - ry * k));
        pts.push(Point::new(x, y + h - ry));
        line_to(Point::new(x, y + h - ry), x, y + ry, &mut pts);
        pts.push(Point::new(x, y + ry * k));
        pts.push(Point::new(x + rx * k, y));
        pts.push(Point::new(x + rx, y));
    }
    pts
}

/// Emits the 13-point (1 start + 4 segments × 3) four-segment κ₉₀
/// approximation of an ellipse, per §4.1/scenario 2 of §8.
pub fn draw_ellipse(cx: f32, cy: f32, rx: f32, ry: f32) -> Vec<Point> {
    let k = KAPPA90;
    vec![
        Point::new(cx + rx, cy),
        Point::new(cx + rx, cy + ry * k),
        Point::new(cx + rx * k, cy + ry),
        Point::new(cx, cy + ry),
        Point::new(cx - rx * k, cy + ry),
        Point::new(cx - rx, cy + ry * k),
        Point::new(cx - rx, cy),
        Point::new(cx - rx, cy - ry * k),
        Point::new(cx - rx * k, cy - ry),
        Point::new(cx, cy - ry),
        Point::new(cx + rx * k, cy - ry),
        Point::new(cx + rx, cy - ry * k),
        Point::new(cx + rx, cy),
    ]
}

/// Wraps a sweep angle (degrees) into `(-360, 360]`, as §4.1's `arc`
/// contract requires before deciding between the ellipse degeneracy
/// and the large-arc decomposition.
pub fn wrap_angle(mut degrees: f32) -> f32 {
    while degrees <= -360.0 {
        degrees += 360.0;
    }
    while degrees > 360.0 {
        degrees -= 360.0;
    }
    degrees
}

fn polar_to_cartesian(cx: f32, cy: f32, r: f32, angle_deg: f32) -> Point {
    let a = angle_deg.to_radians();
    Point::new(cx + r * a.cos(), cy + r * a.sin())
}

/// One cubic-bezier arc segment spanning at most 90°, a building
/// block for `arc`'s large-arc decomposition.
fn arc_segment(cx: f32, cy: f32, r: f32, a0: f32, a1: f32) -> (Point, Point, Point) {
    let sweep = (a1 - a0).to_radians();
    let alpha = (sweep / 2.0).tan() * (4.0 / 3.0);
    let p0 = polar_to_cartesian(cx, cy, r, a0);
    let p1 = polar_to_cartesian(cx, cy, r, a1);
    let t0 = crate::math::Vector::new(-p0.y + cy, p0.x - cx);
    let t1 = crate::math::Vector::new(-p1.y + cy, p1.x - cx);
    let c1 = Point::new(p0.x + alpha * t0.x, p0.y + alpha * t0.y);
    let c2 = Point::new(p1.x - alpha * t1.x, p1.y - alpha * t1.y);
    (c1, c2, p1)
}

/// Decomposes the arc `(cx, cy, r, a0 -> a1, ccw)` into cubic segments,
/// returning `(start_point, segments)` where each segment is
/// `(ctrl1, ctrl2, knot)`. A full-circle sweep (`|delta| == 360`)
/// returns `None`, signalling the caller should fall back to
/// `draw_ellipse` instead (§4.1: "a full circle degenerates to
/// draw_ellipse").
pub fn arc(
    cx: f32,
    cy: f32,
    r: f32,
    start_angle: f32,
    end_angle: f32,
    ccw: bool,
) -> Option<(Point, Vec<(Point, Point, Point)>)> {
    let delta = wrap_angle(end_angle - start_angle);
    if (delta.abs() - 360.0).abs() < 0.01 {
        return None;
    }

    let mut delta = delta;
    if ccw && delta > 0.0 {
        delta -= 360.0;
    } else if !ccw && delta < 0.0 {
        delta += 360.0;
    }

    // Break into steps of at most 90 degrees so each cubic stays a
    // good approximation of its arc.
    let steps = (delta.abs() / 90.0).ceil().max(1.0) as i32;
    let step = delta / steps as f32;

    let start = polar_to_cartesian(cx, cy, r, start_angle);
    let mut segments = Vec::with_capacity(steps as usize);
    let mut angle = start_angle;
    for _ in 0..steps {
        let next_angle = angle + step;
        let (c1, c2, p1) = arc_segment(cx, cy, r, angle, next_angle);
        segments.push((c1, c2, p1));
        angle = next_angle;
    }
    Some((start, segments))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn rect_radii_clamp() {
        let (rx, ry) = normalize_rect_radii(10.0, 4.0, 100.0, 100.0);
        assert_eq!(rx, 5.0);
        assert_eq!(ry, 2.0);
    }

    #[test]
    fn ellipse_has_thirteen_points() {
        let pts = draw_ellipse(0.0, 0.0, 10.0, 10.0);
        assert_eq!(pts.len(), 13);
    }

    #[test]
    fn full_sweep_arc_is_none() {
        assert!(arc(0.0, 0.0, 10.0, 0.0, 360.0, false).is_none());
        assert!(arc(0.0, 0.0, 10.0, 0.0, -360.0, true).is_none());
    }
}
