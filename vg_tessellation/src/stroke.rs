//! Polygon offsetting for stroke outlines: given a (possibly dashed)
//! polyline, produce the filled band of vertices `line_width / 2` to
//! either side, joined and capped per the path's style.

use vg_geom::Point;
use vg_path::{LineCap, LineJoin};

fn normal(a: Point, b: Point) -> Option<(f32, f32)> {
    let dx = b.x - a.x;
    let dy = b.y - a.y;
    let len = (dx * dx + dy * dy).sqrt();
    if len < 1e-9 {
        None
    } else {
        Some((-dy / len, dx / len))
    }
}

/// Builds the closed outline polygon for one (possibly open) polyline
/// stroked at half-width `half_width`, with the requested join at
/// interior vertices and the requested cap at the two ends (ignored
/// when `closed`).
pub fn offset_polyline(
    points: &[Point],
    closed: bool,
    half_width: f32,
    join: LineJoin,
    cap: LineCap,
    miter_limit: f32,
) -> Vec<Point> {
    if points.len() < 2 || half_width <= 0.0 {
        return Vec::new();
    }

    let mut left = Vec::new();
    let mut right = Vec::new();
    let n = points.len();
    let edge_count = if closed { n } else { n - 1 };

    for i in 0..edge_count {
        let a = points[i];
        let b = points[(i + 1) % n];
        let (nx, ny) = match normal(a, b) {
            Some(n) => n,
            None => continue,
        };

        if i > 0 || closed {
            let prev_index = if i == 0 { n - 1 } else { i - 1 };
            if let Some((pnx, pny)) = normal(points[prev_index], a) {
                add_join(&mut left, &mut right, a, (pnx, pny), (nx, ny), half_width, join, miter_limit);
            }
        } else {
            left.push(vg_geom::point(a.x + nx * half_width, a.y + ny * half_width));
            right.push(vg_geom::point(a.x - nx * half_width, a.y - ny * half_width));
        }

        if i == edge_count - 1 && !closed {
            left.push(vg_geom::point(b.x + nx * half_width, b.y + ny * half_width));
            right.push(vg_geom::point(b.x - nx * half_width, b.y - ny * half_width));
        }
    }

    if closed {
        let mut outline = left;
        right.reverse();
        outline.extend(right);
        outline
    } else {
        let mut outline = left;
        add_cap(&mut outline, points[n - 1], cap, half_width, true);
        right.reverse();
        outline.extend(right);
        add_cap(&mut outline, points[0], cap, half_width, false);
        outline
    }
}

fn add_join(
    left: &mut Vec<Point>,
    right: &mut Vec<Point>,
    at: Point,
    prev_normal: (f32, f32),
    next_normal: (f32, f32),
    half_width: f32,
    join: LineJoin,
    miter_limit: f32,
) {
    let (pnx, pny) = prev_normal;
    let (nnx, nny) = next_normal;

    match join {
        LineJoin::Bevel => {
            left.push(vg_geom::point(at.x + pnx * half_width, at.y + pny * half_width));
            left.push(vg_geom::point(at.x + nnx * half_width, at.y + nny * half_width));
            right.push(vg_geom::point(at.x - pnx * half_width, at.y - pny * half_width));
            right.push(vg_geom::point(at.x - nnx * half_width, at.y - nny * half_width));
        }
        LineJoin::Round => {
            // Approximate the arc between the two normals with a
            // handful of segments.
            const STEPS: u32 = 6;
            let a0 = pny.atan2(pnx);
            let mut a1 = nny.atan2(nnx);
            let mut delta = a1 - a0;
            while delta > std::f32::consts::PI {
                delta -= std::f32::consts::TAU;
            }
            while delta < -std::f32::consts::PI {
                delta += std::f32::consts::TAU;
            }
            a1 = a0 + delta;
            for s in 0..=STEPS {
                let a = a0 + (a1 - a0) * (s as f32 / STEPS as f32);
                left.push(vg_geom::point(at.x + a.cos() * half_width, at.y + a.sin() * half_width));
                right.push(vg_geom::point(at.x - a.cos() * half_width, at.y - a.sin() * half_width));
            }
        }
        LineJoin::Miter => {
            let mx = pnx + nnx;
            let my = pny + nny;
            let mlen2 = mx * mx + my * my;
            if mlen2 < 1e-9 {
                // Normals point opposite ways (a cusp); fall back to bevel.
                return add_join(left, right, at, prev_normal, next_normal, half_width, LineJoin::Bevel, miter_limit);
            }
            let cos_half = ((1.0 + (pnx * nnx + pny * nny)) / 2.0).max(0.0).sqrt();
            let miter_len = if cos_half > 1e-6 { 1.0 / cos_half } else { miter_limit + 1.0 };
            if miter_len > miter_limit {
                return add_join(left, right, at, prev_normal, next_normal, half_width, LineJoin::Bevel, miter_limit);
            }
            let scale = half_width * miter_len / mlen2.sqrt();
            left.push(vg_geom::point(at.x + mx / mlen2.sqrt() * scale, at.y + my / mlen2.sqrt() * scale));
            right.push(vg_geom::point(at.x - mx / mlen2.sqrt() * scale, at.y - my / mlen2.sqrt() * scale));
        }
    }
}

fn add_cap(outline: &mut Vec<Point>, at: Point, cap: LineCap, half_width: f32, _is_end: bool) {
    let last = match outline.last() {
        Some(p) => *p,
        None => return,
    };
    match cap {
        LineCap::Butt => {}
        LineCap::Square => {
            let dx = last.x - at.x;
            let dy = last.y - at.y;
            let len = (dx * dx + dy * dy).sqrt().max(1e-9);
            let ext = half_width;
            outline.push(vg_geom::point(last.x + dx / len * ext, last.y + dy / len * ext));
        }
        LineCap::Round => {
            const STEPS: u32 = 8;
            let a0 = (last.y - at.y).atan2(last.x - at.x);
            for s in 1..STEPS {
                let a = a0 - std::f32::consts::PI * (s as f32 / STEPS as f32);
                outline.push(vg_geom::point(at.x + a.cos() * half_width, at.y + a.sin() * half_width));
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn straight_segment_offsets_to_rectangle() {
        let pts = vec![vg_geom::point(0.0, 0.0), vg_geom::point(10.0, 0.0)];
        let outline = offset_polyline(&pts, false, 1.0, LineJoin::Miter, LineCap::Butt, 10.0);
        assert_eq!(outline.len(), 4);
        for p in &outline {
            assert!(p.y.abs() <= 1.0 + 1e-4);
        }
    }

    #[test]
    fn degenerate_polyline_yields_no_outline() {
        let pts = vec![vg_geom::point(0.0, 0.0)];
        assert!(offset_polyline(&pts, false, 1.0, LineJoin::Miter, LineCap::Butt, 10.0).is_empty());
    }
}
