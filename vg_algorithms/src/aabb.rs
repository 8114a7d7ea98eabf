//! Axis-aligned bound computation over paths and raw polylines.

use vg_geom::Box2D;
use vg_path::{Graphics, Path};

/// Union of every path's bounds; `None` for an empty graphics.
pub fn graphics_bounds(g: &mut Graphics) -> Option<Box2D> {
    if g.paths().is_empty() {
        return None;
    }
    Some(g.bounds())
}

/// Union of every subpath's bounds within a single path.
pub fn path_bounds(p: &mut Path) -> Option<Box2D> {
    if p.subpaths().is_empty() {
        return None;
    }
    Some(p.bounds())
}

/// Bound of a flat polyline, used by the stroke pipeline before
/// handing polygons to the triangulator.
pub fn polyline_bounds(points: &[vg_geom::Point]) -> Option<Box2D> {
    let mut iter = points.iter();
    let first = *iter.next()?;
    let mut min_x = first.x;
    let mut max_x = first.x;
    let mut min_y = first.y;
    let mut max_y = first.y;
    for p in iter {
        min_x = min_x.min(p.x);
        max_x = max_x.max(p.x);
        min_y = min_y.min(p.y);
        max_y = max_y.max(p.y);
    }
    Some(Box2D::new(vg_geom::point(min_x, min_y), vg_geom::point(max_x, max_y)))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn polyline_bounds_matches_extent() {
        let pts = vec![vg_geom::point(0.0, 0.0), vg_geom::point(5.0, -2.0), vg_geom::point(-1.0, 3.0)];
        let b = polyline_bounds(&pts).unwrap();
        assert_eq!(b.min.x, -1.0);
        assert_eq!(b.max.x, 5.0);
        assert_eq!(b.min.y, -2.0);
        assert_eq!(b.max.y, 3.0);
    }
}
