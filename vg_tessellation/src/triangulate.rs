//! Convex partitioning and per-piece triangulation (§4.7 steps 1-4).
//!
//! Indices throughout refer to positions in a flat vertex buffer built
//! by the caller; a "polygon" here is a `Vec<u32>` of indices into
//! that buffer, CCW for an outer boundary.

use vg_path::Error;
use vg_geom::Point;

fn cross(a: Point, b: Point, c: Point) -> f32 {
    (b.x - a.x) * (c.y - b.y) - (b.y - a.y) * (c.x - b.x)
}

fn signed_area2_indexed(indices: &[u32], points: &[Point]) -> f32 {
    let n = indices.len();
    let mut sum = 0.0;
    for i in 0..n {
        let a = points[indices[i] as usize];
        let b = points[indices[(i + 1) % n] as usize];
        sum += a.x * b.y - b.x * a.y;
    }
    sum
}

/// `true` when every interior angle of the polygon turns the same
/// way, tested via consecutive signed-triple areas (§4.7's convexity
/// check, reused here to decide when a piece needs no further split
/// and, unmodified, by the partition-verification cache).
pub fn is_convex(indices: &[u32], points: &[Point], eps: f32) -> bool {
    let n = indices.len();
    if n < 3 {
        return true;
    }
    let mut sign = 0i32;
    for i in 0..n {
        let a = points[indices[i] as usize];
        let b = points[indices[(i + 1) % n] as usize];
        let c = points[indices[(i + 2) % n] as usize];
        let area = cross(a, b, c);
        if area.abs() > eps {
            let s = if area > 0.0 { 1 } else { -1 };
            if sign == 0 {
                sign = s;
            } else if sign != s {
                return false;
            }
        }
    }
    true
}

fn point_in_polygon(p: Point, indices: &[u32], points: &[Point]) -> bool {
    let n = indices.len();
    let mut inside = false;
    let mut j = n - 1;
    for i in 0..n {
        let pi = points[indices[i] as usize];
        let pj = points[indices[j] as usize];
        if (pi.y > p.y) != (pj.y > p.y) {
            let x_cross = pj.x + (p.y - pj.y) / (pi.y - pj.y) * (pi.x - pj.x);
            if p.x < x_cross {
                inside = !inside;
            }
        }
        j = i;
    }
    inside
}

fn segments_intersect(a: Point, b: Point, c: Point, d: Point) -> bool {
    let d1 = cross(c, d, a);
    let d2 = cross(c, d, b);
    let d3 = cross(a, b, c);
    let d4 = cross(a, b, d);
    ((d1 > 0.0) != (d2 > 0.0)) && ((d3 > 0.0) != (d4 > 0.0))
}

fn diagonal_is_valid(indices: &[u32], points: &[Point], i: usize, j: usize) -> bool {
    let n = indices.len();
    let pi = points[indices[i] as usize];
    let pj = points[indices[j] as usize];
    let mid = vg_geom::point((pi.x + pj.x) / 2.0, (pi.y + pj.y) / 2.0);
    if !point_in_polygon(mid, indices, points) {
        return false;
    }
    for e in 0..n {
        let e2 = (e + 1) % n;
        if e == i || e == j || e2 == i || e2 == j {
            continue;
        }
        if segments_intersect(pi, pj, points[indices[e] as usize], points[indices[e2] as usize]) {
            return false;
        }
    }
    true
}

/// Splits `indices` at a reflex vertex by finding a valid diagonal to
/// another vertex and recursing on both halves, stopping once every
/// piece is convex (Keil/Snoeyink-style greedy partition, simplified:
/// the first valid diagonal found is taken rather than an optimal
/// one). Falls back to returning the whole polygon as a single
/// (possibly non-convex) piece if no valid diagonal exists — the
/// caller's ear-clip fallback still handles that piece correctly.
pub fn convex_partition(indices: &[u32], points: &[Point]) -> Vec<Vec<u32>> {
    if indices.len() <= 3 || is_convex(indices, points, 1e-6) {
        return vec![indices.to_vec()];
    }
    let n = indices.len();
    for i in 0..n {
        let prev = points[indices[(i + n - 1) % n] as usize];
        let here = points[indices[i] as usize];
        let next = points[indices[(i + 1) % n] as usize];
        let area = cross(prev, here, next);
        let overall_sign = signed_area2_indexed(indices, points).signum();
        if area * overall_sign >= -1e-6 {
            continue; // convex at this vertex
        }
        for j in 0..n {
            if j == i || j == (i + 1) % n || j == (i + n - 1) % n {
                continue;
            }
            if diagonal_is_valid(indices, points, i, j) {
                let (part1, part2) = split_at(indices, i, j);
                let mut result = convex_partition(&part1, points);
                result.extend(convex_partition(&part2, points));
                return result;
            }
        }
    }
    vec![indices.to_vec()]
}

fn split_at(indices: &[u32], i: usize, j: usize) -> (Vec<u32>, Vec<u32>) {
    let n = indices.len();
    let (lo, hi) = if i < j { (i, j) } else { (j, i) };
    let mut part1 = Vec::new();
    let mut k = lo;
    while k != hi {
        part1.push(indices[k]);
        k = (k + 1) % n;
    }
    part1.push(indices[hi]);

    let mut part2 = Vec::new();
    let mut k = hi;
    while k != lo {
        part2.push(indices[k]);
        k = (k + 1) % n;
    }
    part2.push(indices[lo]);

    (part1, part2)
}

/// Fans a convex polygon into triangles from its first vertex.
pub fn fan_triangulate(indices: &[u32]) -> Vec<[u32; 3]> {
    let mut tris = Vec::new();
    for i in 1..indices.len() - 1 {
        tris.push([indices[0], indices[i], indices[i + 1]]);
    }
    tris
}

/// General ear-clipping triangulation, the fallback when a piece
/// can't be proven convex (§4.7 step 3).
pub fn ear_clip_triangulate(indices: &[u32], points: &[Point]) -> Result<Vec<[u32; 3]>, Error> {
    let mut remaining: Vec<u32> = indices.to_vec();
    let mut tris = Vec::new();
    let overall_sign = signed_area2_indexed(&remaining, points).signum();

    let mut guard = 0usize;
    let max_iters = remaining.len() * remaining.len() + 8;

    while remaining.len() > 3 {
        guard += 1;
        if guard > max_iters {
            return Err(Error::TriangulationFailed);
        }
        let n = remaining.len();
        let mut found = false;
        for i in 0..n {
            let a = points[remaining[(i + n - 1) % n] as usize];
            let b = points[remaining[i] as usize];
            let c = points[remaining[(i + 1) % n] as usize];
            let area = cross(a, b, c);
            if area * overall_sign <= 1e-7 {
                continue; // reflex or degenerate, not a candidate ear
            }
            let tri = [remaining[(i + n - 1) % n], remaining[i], remaining[(i + 1) % n]];
            let mut clean = true;
            for &p in &remaining {
                if p == tri[0] || p == tri[1] || p == tri[2] {
                    continue;
                }
                if point_in_triangle(points[p as usize], a, b, c) {
                    clean = false;
                    break;
                }
            }
            if clean {
                tris.push(tri);
                remaining.remove(i);
                found = true;
                break;
            }
        }
        if !found {
            return Err(Error::TriangulationFailed);
        }
    }
    if remaining.len() == 3 {
        tris.push([remaining[0], remaining[1], remaining[2]]);
    }
    Ok(tris)
}

fn point_in_triangle(p: Point, a: Point, b: Point, c: Point) -> bool {
    let d1 = cross(a, b, p);
    let d2 = cross(b, c, p);
    let d3 = cross(c, a, p);
    let has_neg = d1 < 0.0 || d2 < 0.0 || d3 < 0.0;
    let has_pos = d1 > 0.0 || d2 > 0.0 || d3 > 0.0;
    !(has_neg && has_pos)
}

/// Triangulates a single simple polygon: convex-partition, then
/// triangulate each piece, falling back to ear-clipping per piece on
/// failure, matching §4.7's monotone-then-ear-clip fallback chain.
pub fn triangulate_polygon(indices: &[u32], points: &[Point]) -> Result<(Vec<Vec<u32>>, Vec<[u32; 3]>), Error> {
    if indices.len() < 3 {
        return Ok((Vec::new(), Vec::new()));
    }
    let partition = convex_partition(indices, points);
    let mut triangles = Vec::new();
    for piece in &partition {
        if is_convex(piece, points, 1e-2) {
            triangles.extend(fan_triangulate(piece));
        } else {
            triangles.extend(ear_clip_triangulate(piece, points)?);
        }
    }
    Ok((partition, triangles))
}

/// Finds the outer contour vertex visible from the hole's rightmost
/// vertex (the vertex with greatest x) and splices the hole into the
/// outer contour there, producing a single simple polygon — the
/// classic bridge-edge technique for triangulating a polygon with
/// holes without a dedicated hole-aware tessellator (§4.7 step 1,
/// "holes joined into the fill contour before triangulation").
/// "Visible" here means the bridge segment crosses no edge of the
/// outer contour, the hole itself, or any `other_holes` still waiting
/// to be merged; ties are broken by nearest candidate.
fn bridge_hole(outer: &[u32], hole: &[u32], points: &[Point], other_holes: &[&[u32]]) -> Vec<u32> {
    if hole.is_empty() {
        return outer.to_vec();
    }
    let rightmost = (0..hole.len())
        .max_by(|&a, &b| points[hole[a] as usize].x.partial_cmp(&points[hole[b] as usize].x).unwrap())
        .unwrap_or(0);
    let hole_vertex = hole[rightmost];
    let m = points[hole_vertex as usize];

    let mut best: Option<(usize, f32)> = None;
    for (oi, &ov) in outer.iter().enumerate() {
        if ov == hole_vertex {
            continue;
        }
        let v = points[ov as usize];
        let blocked = std::iter::once(outer)
            .chain(other_holes.iter().copied())
            .chain(std::iter::once(hole))
            .any(|contour| {
                let n = contour.len();
                (0..n).any(|e| {
                    let (ia, ib) = (contour[e], contour[(e + 1) % n]);
                    if ia == ov || ib == ov || ia == hole_vertex || ib == hole_vertex {
                        return false;
                    }
                    segments_intersect(m, v, points[ia as usize], points[ib as usize])
                })
            });
        if blocked {
            continue;
        }
        let d2 = (v.x - m.x).powi(2) + (v.y - m.y).powi(2);
        if best.map_or(true, |(_, bd2)| d2 < bd2) {
            best = Some((oi, d2));
        }
    }

    let bridge_idx = match best {
        Some((oi, _)) => oi,
        None => return outer.to_vec(), // no unobstructed bridge found; drop the hole rather than corrupt the contour
    };

    let mut merged = Vec::with_capacity(outer.len() + hole.len() + 2);
    merged.extend_from_slice(&outer[..=bridge_idx]);
    merged.extend_from_slice(&hole[rightmost..]);
    merged.extend_from_slice(&hole[..=rightmost]);
    merged.push(outer[bridge_idx]);
    merged.extend_from_slice(&outer[bridge_idx + 1..]);
    merged
}

/// Triangulates an outer contour plus any number of holes
/// (`contours[0]` is the outer boundary, `contours[1..]` the holes;
/// the caller is responsible for giving them opposite windings per
/// `vg_algorithms::winding::HoleConvention` before calling). Bridges
/// every hole into the outer contour first, then runs the same
/// convex-partition/ear-clip pipeline as `triangulate_polygon`.
pub fn triangulate_polygon_with_holes(
    contours: &[Vec<u32>],
    points: &[Point],
) -> Result<(Vec<Vec<u32>>, Vec<[u32; 3]>), Error> {
    if contours.is_empty() {
        return Ok((Vec::new(), Vec::new()));
    }
    let mut merged = contours[0].clone();
    for i in 1..contours.len() {
        let remaining: Vec<&[u32]> = contours[i + 1..].iter().map(|h| h.as_slice()).collect();
        merged = bridge_hole(&merged, &contours[i], points, &remaining);
    }
    triangulate_polygon(&merged, points)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn square() -> Vec<Point> {
        vec![
            vg_geom::point(0.0, 0.0),
            vg_geom::point(1.0, 0.0),
            vg_geom::point(1.0, 1.0),
            vg_geom::point(0.0, 1.0),
        ]
    }

    #[test]
    fn convex_square_is_single_piece() {
        let pts = square();
        let indices: Vec<u32> = (0..4).collect();
        let parts = convex_partition(&indices, &pts);
        assert_eq!(parts.len(), 1);
    }

    #[test]
    fn square_triangulates_into_two_triangles() {
        let pts = square();
        let indices: Vec<u32> = (0..4).collect();
        let (_parts, tris) = triangulate_polygon(&indices, &pts).unwrap();
        assert_eq!(tris.len(), 2);
    }

    #[test]
    fn l_shape_is_reflex_and_splits() {
        // An L-shaped hexagon with one reflex vertex.
        let pts = vec![
            vg_geom::point(0.0, 0.0),
            vg_geom::point(2.0, 0.0),
            vg_geom::point(2.0, 1.0),
            vg_geom::point(1.0, 1.0),
            vg_geom::point(1.0, 2.0),
            vg_geom::point(0.0, 2.0),
        ];
        let indices: Vec<u32> = (0..6).collect();
        assert!(!is_convex(&indices, &pts, 1e-6));
        let (_parts, tris) = triangulate_polygon(&indices, &pts).unwrap();
        assert_eq!(tris.len(), 4);
    }

    #[test]
    fn triangulate_with_holes_bridges_and_covers_outer_only() {
        // A 10x10 outer square (CCW) with a 2x2 hole (CW) in the middle.
        let pts = vec![
            vg_geom::point(0.0, 0.0),
            vg_geom::point(10.0, 0.0),
            vg_geom::point(10.0, 10.0),
            vg_geom::point(0.0, 10.0),
            vg_geom::point(4.0, 4.0),
            vg_geom::point(4.0, 6.0),
            vg_geom::point(6.0, 6.0),
            vg_geom::point(6.0, 4.0),
        ];
        let outer: Vec<u32> = vec![0, 1, 2, 3];
        let hole: Vec<u32> = vec![4, 5, 6, 7];
        let (_parts, tris) = triangulate_polygon_with_holes(&[outer, hole], &pts).unwrap();
        assert!(!tris.is_empty());
        for tri in &tris {
            for &idx in tri {
                assert!((idx as usize) < pts.len());
            }
        }
        // No triangle should be centered inside the hole.
        for tri in &tris {
            let centroid_x = (pts[tri[0] as usize].x + pts[tri[1] as usize].x + pts[tri[2] as usize].x) / 3.0;
            let centroid_y = (pts[tri[0] as usize].y + pts[tri[1] as usize].y + pts[tri[2] as usize].y) / 3.0;
            let inside_hole = (4.0..6.0).contains(&centroid_x) && (4.0..6.0).contains(&centroid_y);
            assert!(!inside_hole);
        }
    }

    #[test]
    fn triangulate_with_holes_empty_contours_is_empty() {
        let pts: Vec<Point> = Vec::new();
        let (parts, tris) = triangulate_polygon_with_holes(&[], &pts).unwrap();
        assert!(parts.is_empty());
        assert!(tris.is_empty());
    }
}
