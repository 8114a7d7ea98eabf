//! Orchestrates flatten → dash → offset → (fill, stroke) for a whole
//! `Path` (§4.5), then on to triangulation and meshes (§4.7).
//! Boolean-clipping the stroke out of the fill (original step 5) is
//! intentionally not implemented — see `SPEC_FULL.md`'s resolved open
//! questions.

use crate::cache::TriangulationCache;
use crate::dash::walk_dashes;
use crate::stroke::offset_polyline;
use crate::triangulate;
use vg_algorithms::winding::{is_hole, HoleConvention};
use vg_geom::flatten::AdaptiveFlattener;
use vg_geom::Point;
use vg_path::{Error, Path};

/// The two mesh surfaces a `Path` produces: flattened fill outlines,
/// and (if the path has a stroke) the offset stroke outlines.
pub struct StrokeResult {
    pub fill_polygons: Vec<Vec<Point>>,
    pub stroke_polygons: Vec<Vec<Point>>,
}

/// Flattens every subpath of `path` and, if it has a visible stroke,
/// dashes and offsets it.
pub fn build(path: &Path, tolerance: f32) -> StrokeResult {
    let flattener = AdaptiveFlattener::new(tolerance);
    let mut fill_polygons = Vec::new();
    let mut stroke_polygons = Vec::new();

    for subpath in path.subpaths() {
        let mut polyline = Vec::new();
        if let Some(first) = subpath.points().first() {
            polyline.push(*first);
        }
        for curve in subpath.curves() {
            flattener.flatten(&curve, &mut polyline);
        }
        if polyline.len() < 2 {
            continue;
        }
        fill_polygons.push(polyline.clone());

        if path.stroke().is_none() || path.line_width <= 0.0 {
            continue;
        }

        let half_width = path.line_width / 2.0;
        if half_width < 1e-6 {
            log::warn!("stroke width below representable threshold, skipping stroke");
            continue;
        }

        let stretches = if path.dash().is_empty() {
            vec![polyline]
        } else {
            walk_dashes(&polyline, subpath.closed(), path.dash(), path.dash_offset)
        };

        let closed_stretch = subpath.closed() && path.dash().is_empty();
        for stretch in stretches {
            let outline = offset_polyline(
                &stretch,
                closed_stretch,
                half_width,
                path.line_join,
                path.line_cap,
                path.miter_limit,
            );
            if !outline.is_empty() {
                stroke_polygons.push(outline);
            }
        }
    }

    StrokeResult { fill_polygons, stroke_polygons }
}

/// A triangulated polygon: its own point buffer plus triangle indices
/// into it.
#[derive(Clone, Debug, Default)]
pub struct Mesh {
    pub points: Vec<Point>,
    pub triangles: Vec<[u32; 3]>,
}

/// Triangulates `path`'s fill outlines and stroke outlines into
/// meshes, reusing `self`'s caches across calls for a path whose
/// point counts are stable frame-to-frame — the end-to-end §4.5→§4.7
/// entry point: flatten/dash/offset (`build`), split fill contours
/// into outer/hole groups by `hole_convention` and bridge them
/// (`triangulate::triangulate_polygon_with_holes`), triangulate each
/// stroke outline on its own (`triangulate::triangulate_polygon`), and
/// cache every result (`TriangulationCache`).
pub struct Tessellator {
    fill_cache: TriangulationCache,
    stroke_caches: Vec<TriangulationCache>,
}

impl Default for Tessellator {
    fn default() -> Self {
        Tessellator::new()
    }
}

impl Tessellator {
    pub fn new() -> Self {
        Tessellator { fill_cache: TriangulationCache::default(), stroke_caches: Vec::new() }
    }

    /// Runs the full pipeline and returns one fill mesh (all of the
    /// path's fill contours, holes bridged in per `hole_convention`)
    /// and one mesh per stroke outline.
    pub fn tessellate(
        &mut self,
        path: &Path,
        tolerance: f32,
        hole_convention: HoleConvention,
    ) -> Result<(Mesh, Vec<Mesh>), Error> {
        let built = build(path, tolerance);

        let fill_mesh = tessellate_fill(&built.fill_polygons, hole_convention, &mut self.fill_cache)?;

        while self.stroke_caches.len() < built.stroke_polygons.len() {
            self.stroke_caches.push(TriangulationCache::default());
        }
        self.stroke_caches.truncate(built.stroke_polygons.len());
        let mut stroke_meshes = Vec::with_capacity(built.stroke_polygons.len());
        for (outline, cache) in built.stroke_polygons.iter().zip(self.stroke_caches.iter_mut()) {
            stroke_meshes.push(tessellate_simple(outline, cache)?);
        }

        Ok((fill_mesh, stroke_meshes))
    }
}

/// Splits `polygons` into outer contours and holes by
/// `hole_convention`, bridges each hole into the outer contour whose
/// bounding box contains its first point (first outer contour wins
/// ties; a hole matching none is dropped with a warning), and
/// triangulates the merged result against a shared point buffer.
fn tessellate_fill(
    polygons: &[Vec<Point>],
    hole_convention: HoleConvention,
    cache: &mut TriangulationCache,
) -> Result<Mesh, Error> {
    if polygons.is_empty() {
        return Ok(Mesh::default());
    }

    let mut points = Vec::new();
    let mut contours: Vec<Vec<u32>> = Vec::new();
    let mut outer_bounds = Vec::new();
    let mut holes: Vec<Vec<u32>> = Vec::new();
    let mut hole_bounds = Vec::new();

    for polygon in polygons {
        let start = points.len() as u32;
        points.extend_from_slice(polygon);
        let indices: Vec<u32> = (start..start + polygon.len() as u32).collect();
        if is_hole(polygon, hole_convention) {
            hole_bounds.push(polygon_bounds(polygon));
            holes.push(indices);
        } else {
            outer_bounds.push(polygon_bounds(polygon));
            contours.push(indices);
        }
    }

    if contours.is_empty() {
        // every contour looked like a hole (degenerate input); fall back
        // to treating them all as independent outer contours.
        contours = std::mem::take(&mut holes);
        outer_bounds = std::mem::take(&mut hole_bounds);
    }

    let mut assigned: Vec<Vec<Vec<u32>>> = vec![Vec::new(); contours.len()];
    for (hole, bounds) in holes.into_iter().zip(hole_bounds.into_iter()) {
        match outer_bounds.iter().position(|b| box_contains(*b, bounds)) {
            Some(owner) => assigned[owner].push(hole),
            None => log::warn!("fill hole matches no outer contour, dropping it"),
        }
    }

    if let Some(triangles) = cache.find_and_touch(&points) {
        return Ok(Mesh { points, triangles });
    }

    let mut all_partitions = Vec::new();
    let mut all_triangles = Vec::new();
    for (outer, owned_holes) in contours.into_iter().zip(assigned.into_iter()) {
        let mut group = vec![outer];
        group.extend(owned_holes);
        let (mut partition, triangles) = triangulate::triangulate_polygon_with_holes(&group, &points)?;
        all_partitions.append(&mut partition);
        all_triangles.extend(triangles);
    }

    cache.insert(all_partitions, all_triangles.clone(), false);
    Ok(Mesh { points, triangles: all_triangles })
}

fn tessellate_simple(polygon: &[Point], cache: &mut TriangulationCache) -> Result<Mesh, Error> {
    if let Some(triangles) = cache.find_and_touch(polygon) {
        return Ok(Mesh { points: polygon.to_vec(), triangles });
    }
    let indices: Vec<u32> = (0..polygon.len() as u32).collect();
    let (partition, triangles) = triangulate::triangulate_polygon(&indices, polygon)?;
    cache.insert(partition, triangles.clone(), false);
    Ok(Mesh { points: polygon.to_vec(), triangles })
}

fn polygon_bounds(points: &[Point]) -> (f32, f32, f32, f32) {
    let mut min_x = f32::INFINITY;
    let mut min_y = f32::INFINITY;
    let mut max_x = f32::NEG_INFINITY;
    let mut max_y = f32::NEG_INFINITY;
    for p in points {
        min_x = min_x.min(p.x);
        min_y = min_y.min(p.y);
        max_x = max_x.max(p.x);
        max_y = max_y.max(p.y);
    }
    (min_x, min_y, max_x, max_y)
}

fn box_contains(outer: (f32, f32, f32, f32), inner: (f32, f32, f32, f32)) -> bool {
    outer.0 <= inner.0 && outer.1 <= inner.1 && outer.2 >= inner.2 && outer.3 >= inner.3
}

#[cfg(test)]
mod tests {
    use super::*;
    use vg_path::{LineCap, LineJoin, Paint, Rgba};

    #[test]
    fn unstroked_path_has_no_stroke_polygons() {
        let mut path = Path::new();
        path.begin_subpath();
        let sp = path.current_subpath_mut().unwrap();
        sp.move_to(0.0, 0.0);
        sp.line_to(10.0, 0.0).unwrap();
        let result = build(&path, 0.1);
        assert_eq!(result.fill_polygons.len(), 1);
        assert!(result.stroke_polygons.is_empty());
    }

    #[test]
    fn stroked_open_line_produces_one_outline() {
        let mut path = Path::new();
        path.begin_subpath();
        {
            let sp = path.current_subpath_mut().unwrap();
            sp.move_to(0.0, 0.0);
            sp.line_to(10.0, 0.0).unwrap();
        }
        path.set_stroke(Paint::Solid(Rgba::new(0, 0, 0, 255)));
        path.line_width = 2.0;
        path.line_join = LineJoin::Miter;
        path.line_cap = LineCap::Butt;
        let result = build(&path, 0.1);
        assert_eq!(result.stroke_polygons.len(), 1);
    }

    /// CCW square (outer-contour winding).
    fn square_subpath(p: &mut Path, x: f32, y: f32, s: f32) {
        p.begin_subpath();
        {
            let sp = p.current_subpath_mut().unwrap();
            sp.move_to(x, y);
            sp.line_to(x + s, y).unwrap();
            sp.line_to(x + s, y + s).unwrap();
            sp.line_to(x, y + s).unwrap();
        }
        p.close_subpath(true);
    }

    /// CW square (hole winding, opposite of `square_subpath`).
    fn hole_square_subpath(p: &mut Path, x: f32, y: f32, s: f32) {
        p.begin_subpath();
        {
            let sp = p.current_subpath_mut().unwrap();
            sp.move_to(x, y);
            sp.line_to(x, y + s).unwrap();
            sp.line_to(x + s, y + s).unwrap();
            sp.line_to(x + s, y).unwrap();
        }
        p.close_subpath(true);
    }

    #[test]
    fn tessellate_fill_triangulates_square() {
        let mut path = Path::new();
        square_subpath(&mut path, 0.0, 0.0, 10.0);
        path.set_fill(Paint::Solid(Rgba::new(0, 0, 0, 255)));

        let mut tess = Tessellator::new();
        let (fill, strokes) = tess.tessellate(&path, 0.1, HoleConvention::Cw).unwrap();
        assert!(!fill.triangles.is_empty());
        assert!(strokes.is_empty());
    }

    #[test]
    fn tessellate_fill_bridges_hole() {
        let mut path = Path::new();
        square_subpath(&mut path, 0.0, 0.0, 10.0);
        hole_square_subpath(&mut path, 4.0, 4.0, 2.0);
        path.set_fill(Paint::Solid(Rgba::new(0, 0, 0, 255)));

        let mut tess = Tessellator::new();
        let (fill, _) = tess.tessellate(&path, 0.1, HoleConvention::Cw).unwrap();
        assert!(!fill.triangles.is_empty());
        for tri in &fill.triangles {
            for &idx in tri {
                assert!((idx as usize) < fill.points.len());
            }
        }
    }

    #[test]
    fn tessellate_caches_fill_across_calls() {
        let mut path = Path::new();
        square_subpath(&mut path, 0.0, 0.0, 10.0);
        path.set_fill(Paint::Solid(Rgba::new(0, 0, 0, 255)));

        let mut tess = Tessellator::new();
        let (first, _) = tess.tessellate(&path, 0.1, HoleConvention::Cw).unwrap();
        assert_eq!(tess.fill_cache.len(), 1);
        let (second, _) = tess.tessellate(&path, 0.1, HoleConvention::Cw).unwrap();
        assert_eq!(first.triangles, second.triangles);
    }
}
