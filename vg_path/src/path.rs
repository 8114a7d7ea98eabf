//! A path: subpaths plus fill/stroke paint and stroke style (§4.2).

use crate::error::Error;
use crate::paint::Paint;
use crate::subpath::{FillRule, Subpath};
use vg_geom::Box2D;

pub const FILL_STYLE: u32 = 1;
pub const LINE_STYLE: u32 = 2;
pub const POINTS: u32 = 4;
pub const GEOMETRY: u32 = 8;
pub const LINE_ARGS: u32 = 16;
pub const BOUNDS: u32 = 32;
pub const EXACT_BOUNDS: u32 = 64;
pub const RECREATE: u32 = 128;

/// Platform constant (§4.2 `set_line_dash`): arrays longer than this
/// are truncated.
pub const MAX_DASHES: usize = 8;

#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub enum LineJoin {
    Miter,
    Round,
    Bevel,
}

#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub enum LineCap {
    Butt,
    Round,
    Square,
}

#[derive(Clone, Debug, PartialEq)]
pub struct Path {
    subpaths: Vec<Subpath>,
    fill: Paint,
    stroke: Paint,
    pub line_width: f32,
    pub miter_limit: f32,
    pub line_join: LineJoin,
    pub line_cap: LineCap,
    pub fill_rule: FillRule,
    dash: Vec<f32>,
    pub dash_offset: f32,
    pub opacity: f32,
    new_subpath: bool,
    bounds: Option<Box2D>,
    exact_bounds: Option<Box2D>,
    change_flags: u32,
}

impl Default for Path {
    fn default() -> Self {
        Path::new()
    }
}

impl Path {
    pub fn new() -> Self {
        Path {
            subpaths: Vec::new(),
            fill: Paint::None,
            stroke: Paint::None,
            line_width: 1.0,
            miter_limit: 10.0,
            line_join: LineJoin::Miter,
            line_cap: LineCap::Butt,
            fill_rule: FillRule::NonZero,
            dash: Vec::new(),
            dash_offset: 0.0,
            opacity: 1.0,
            new_subpath: true,
            bounds: None,
            exact_bounds: None,
            change_flags: 0,
        }
    }

    pub fn subpaths(&self) -> &[Subpath] {
        &self.subpaths
    }

    pub fn subpaths_mut(&mut self) -> &mut [Subpath] {
        self.invalidate_geometry();
        &mut self.subpaths
    }

    pub fn fill(&self) -> &Paint {
        &self.fill
    }

    pub fn stroke(&self) -> &Paint {
        &self.stroke
    }

    pub fn dash(&self) -> &[f32] {
        &self.dash
    }

    pub fn change_flags(&self) -> u32 {
        self.change_flags
    }

    pub fn clear_change_flags(&mut self) {
        self.change_flags = 0;
    }

    fn raise(&mut self, flags: u32) {
        self.change_flags |= flags;
    }

    fn invalidate_geometry(&mut self) {
        self.bounds = None;
        self.exact_bounds = None;
        self.raise(GEOMETRY | BOUNDS | EXACT_BOUNDS);
    }

    /// Begins a fresh subpath; the builder's `new_subpath` flag is
    /// cleared by the first move/line/curve call that follows.
    pub fn begin_subpath(&mut self) {
        self.subpaths.push(Subpath::new());
        self.new_subpath = false;
        self.raise(POINTS | GEOMETRY);
    }

    /// Closes the current subpath; `close_curves` also sets its
    /// `closed` flag (appending the loop duplicate).
    pub fn close_subpath(&mut self, close_curves: bool) {
        if let Some(sp) = self.subpaths.last_mut() {
            if close_curves {
                sp.set_closed(true);
            }
        }
        self.new_subpath = true;
        self.invalidate_geometry();
    }

    pub fn current_subpath_mut(&mut self) -> Option<&mut Subpath> {
        if self.new_subpath {
            self.begin_subpath();
        }
        self.subpaths.last_mut()
    }

    /// Appends a subpath; a fill paint forces it closed, since filled
    /// paths are implicitly closed (§4.2).
    pub fn add_subpath(&mut self, mut subpath: Subpath) {
        if !self.fill.is_none() {
            subpath.set_closed(true);
        }
        self.subpaths.push(subpath);
        self.invalidate_geometry();
    }

    pub fn set_fill(&mut self, paint: Paint) {
        self.fill = paint;
        if !self.fill.is_none() {
            for sp in &mut self.subpaths {
                sp.set_closed(true);
            }
        }
        self.raise(FILL_STYLE);
    }

    pub fn set_stroke(&mut self, paint: Paint) {
        self.stroke = paint;
        self.raise(LINE_STYLE);
    }

    /// Arrays summing to less than `1e-6` disable dashing; arrays
    /// longer than `MAX_DASHES` are truncated.
    pub fn set_line_dash(&mut self, mut dashes: Vec<f32>) {
        dashes.truncate(MAX_DASHES);
        let sum: f32 = dashes.iter().sum();
        if sum < 1e-6 {
            dashes.clear();
        }
        self.dash = dashes;
        self.raise(LINE_ARGS);
    }

    pub fn bounds(&mut self) -> Box2D {
        if let Some(b) = self.bounds {
            return b;
        }
        let b = self.compute_bounds();
        self.bounds = Some(b);
        b
    }

    fn compute_bounds(&mut self) -> Box2D {
        let mut iter = self.subpaths.iter_mut();
        match iter.next() {
            None => Box2D::new(vg_geom::point(0.0, 0.0), vg_geom::point(0.0, 0.0)),
            Some(first) => {
                let mut b = first.bounds();
                for sp in iter {
                    b = b.union(&sp.bounds());
                }
                b
            }
        }
    }

    /// Bounds including stroke width and dash inflation.
    pub fn exact_bounds(&mut self) -> Box2D {
        if let Some(b) = self.exact_bounds {
            return b;
        }
        let base = self.bounds();
        let pad = if self.stroke.is_none() { 0.0 } else { self.line_width.max(0.0) };
        let b = Box2D::new(
            vg_geom::point(base.min.x - pad, base.min.y - pad),
            vg_geom::point(base.max.x + pad, base.max.y + pad),
        );
        self.exact_bounds = Some(b);
        b
    }

    /// Tests all *closed* subpaths under `fill_rule`; open subpaths
    /// are skipped (§4.2).
    pub fn is_inside(&self, x: f32, y: f32) -> bool {
        self.subpaths
            .iter()
            .filter(|sp| sp.closed())
            .any(|sp| sp.is_inside(x, y, self.fill_rule))
    }

    fn subpath_mut(&mut self, subpath_index: usize) -> Result<&mut Subpath, Error> {
        let len = self.subpaths.len();
        self.subpaths.get_mut(subpath_index).ok_or_else(|| {
            let err = Error::InvalidIndex { index: subpath_index, len };
            log::warn!("{err}");
            err
        })
    }

    /// §6 Edit API: `insert_curve` addressed by `(subpath_index,
    /// curve_index)` — here `t_global = curve_index + t_local`, same
    /// convention as `Subpath::insert_curve_at`. Delegates to the
    /// addressed subpath and invalidates cached geometry.
    pub fn insert_curve(&mut self, subpath_index: usize, t_global: f32) -> Result<usize, Error> {
        let knot = self.subpath_mut(subpath_index)?.insert_curve_at(t_global)?;
        self.invalidate_geometry();
        Ok(knot)
    }

    /// §6 Edit API: `remove_curve` addressed by `(subpath_index,
    /// curve_index)`.
    pub fn remove_curve(&mut self, subpath_index: usize, curve_index: usize) -> Result<(), Error> {
        self.subpath_mut(subpath_index)?.remove_curve(curve_index)?;
        self.invalidate_geometry();
        Ok(())
    }

    /// §6 Edit API: `set_points` addressed by `subpath_index`, replacing
    /// the whole point array of that subpath.
    pub fn set_points(
        &mut self,
        subpath_index: usize,
        points: Vec<vg_geom::Point>,
        add_loop_duplicate: bool,
    ) -> Result<(), Error> {
        self.subpath_mut(subpath_index)?.set_points(points, add_loop_duplicate);
        self.invalidate_geometry();
        Ok(())
    }

    /// Normalizes every subpath's winding to `want`, reversing any
    /// subpath whose current orientation disagrees (`Subpath::invert`
    /// preserves the closed-loop wrap duplicate under reversal). Used
    /// to satisfy the triangulator's single fill/hole convention
    /// before handing subpaths off to it (§4.7 step 1).
    pub fn set_orientation(&mut self, want: vg_geom::winding::Orientation) {
        for sp in &mut self.subpaths {
            if vg_geom::winding::orientation(sp.points()) != want {
                sp.invert();
            }
        }
        self.invalidate_geometry();
    }

    /// Linear interpolation between `a` and `b`'s matching-topology
    /// subpaths and paints (§4.9). Requires equal subpath counts.
    pub fn animate(a: &Path, b: &Path, t: f32) -> Result<Path, Error> {
        if a.subpaths.len() != b.subpaths.len() {
            return Err(Error::CountMismatch { a: a.subpaths.len(), b: b.subpaths.len() });
        }
        let mut out = Path::new();
        out.line_width = a.line_width + (b.line_width - a.line_width) * t;
        out.miter_limit = a.miter_limit + (b.miter_limit - a.miter_limit) * t;
        out.opacity = a.opacity + (b.opacity - a.opacity) * t;
        out.line_join = if t < 0.5 { a.line_join } else { b.line_join };
        out.line_cap = if t < 0.5 { a.line_cap } else { b.line_cap };
        out.fill_rule = if t < 0.5 { a.fill_rule } else { b.fill_rule };

        out.dash = if a.dash.len() == b.dash.len() {
            a.dash
                .iter()
                .zip(b.dash.iter())
                .map(|(x, y)| x + (y - x) * t)
                .collect()
        } else {
            log::warn!("dash array count mismatch ({} vs {}), snapping by t", a.dash.len(), b.dash.len());
            if t < 0.5 { a.dash.clone() } else { b.dash.clone() }
        };
        out.dash_offset = a.dash_offset + (b.dash_offset - a.dash_offset) * t;

        out.fill = match Paint::interpolate(&a.fill, &b.fill, t) {
            Some(p) => p,
            None => {
                log::warn!("fill paint mismatch, snapping by t");
                if t < 0.5 { a.fill.clone() } else { b.fill.clone() }
            }
        };
        out.stroke = match Paint::interpolate(&a.stroke, &b.stroke, t) {
            Some(p) => p,
            None => {
                log::warn!("stroke paint mismatch, snapping by t");
                if t < 0.5 { a.stroke.clone() } else { b.stroke.clone() }
            }
        };

        for (sa, sb) in a.subpaths.iter().zip(b.subpaths.iter()) {
            out.subpaths.push(interpolate_subpath(sa, sb, t));
        }
        Ok(out)
    }
}

fn interpolate_subpath(a: &Subpath, b: &Subpath, t: f32) -> Subpath {
    let mut out = Subpath::new();
    if a.points().len() == b.points().len() {
        let pts: Vec<vg_geom::Point> = a
            .points()
            .iter()
            .zip(b.points().iter())
            .map(|(pa, pb)| vg_geom::point(pa.x + (pb.x - pa.x) * t, pa.y + (pb.y - pa.y) * t))
            .collect();
        out.set_closed(if t < 0.5 { a.closed() } else { b.closed() });
        out.set_points(pts, false);
    } else {
        log::warn!(
            "subpath point count mismatch ({} vs {}), snapping by t",
            a.points().len(),
            b.points().len()
        );
        let src = if t < 0.5 { a } else { b };
        out.set_closed(src.closed());
        out.set_points(src.points().to_vec(), false);
    }
    out
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::paint::Rgba;

    fn unit_square() -> Path {
        let mut p = Path::new();
        p.begin_subpath();
        {
            let sp = p.current_subpath_mut().unwrap();
            sp.move_to(0.0, 0.0);
            sp.line_to(1.0, 0.0).unwrap();
            sp.line_to(1.0, 1.0).unwrap();
            sp.line_to(0.0, 1.0).unwrap();
        }
        p.close_subpath(true);
        p
    }

    #[test]
    fn unit_square_bounds_and_inside() {
        let mut p = unit_square();
        let b = p.bounds();
        assert!((b.min.x - 0.0).abs() < 1e-5 && (b.max.x - 1.0).abs() < 1e-5);
        assert!(p.is_inside(0.5, 0.5));
        assert!(!p.is_inside(1.5, 0.5));
    }

    #[test]
    fn animate_endpoints_match_inputs() {
        let a = unit_square();
        let mut b = unit_square();
        b.set_fill(Paint::Solid(Rgba::new(255, 0, 0, 255)));
        let at0 = Path::animate(&a, &b, 0.0).unwrap();
        let at1 = Path::animate(&a, &b, 1.0).unwrap();
        assert_eq!(at0.subpaths()[0].points(), a.subpaths()[0].points());
        assert_eq!(at1.subpaths()[0].points(), b.subpaths()[0].points());
    }

    #[test]
    fn dash_below_threshold_disables() {
        let mut p = Path::new();
        p.set_line_dash(vec![0.0000001, 0.0]);
        assert!(p.dash().is_empty());
    }

    #[test]
    fn insert_and_remove_curve_round_trip_through_path() {
        let mut p = unit_square();
        let before = p.subpaths()[0].points().len();
        let knot = p.insert_curve(0, 0.5).unwrap();
        assert!(knot > 0);
        assert_eq!(p.subpaths()[0].points().len(), before + 3);
        p.remove_curve(0, 0).unwrap();
        assert_eq!(p.subpaths()[0].points().len(), before);
    }

    #[test]
    fn set_points_replaces_addressed_subpath() {
        let mut p = unit_square();
        let pts = vec![vg_geom::point(0.0, 0.0), vg_geom::point(2.0, 0.0), vg_geom::point(2.0, 2.0), vg_geom::point(0.0, 2.0)];
        p.set_points(0, pts.clone(), false).unwrap();
        assert_eq!(p.subpaths()[0].points(), pts.as_slice());
    }

    #[test]
    fn edit_api_rejects_out_of_range_subpath_index() {
        let mut p = unit_square();
        assert_eq!(p.insert_curve(1, 0.0), Err(Error::InvalidIndex { index: 1, len: 1 }));
        assert_eq!(p.remove_curve(1, 0), Err(Error::InvalidIndex { index: 1, len: 1 }));
        assert_eq!(p.set_points(1, Vec::new(), false), Err(Error::InvalidIndex { index: 1, len: 1 }));
    }

    #[test]
    fn set_orientation_reverses_mismatched_subpaths() {
        use vg_geom::winding::{orientation, Orientation};
        let mut p = unit_square();
        assert_eq!(orientation(p.subpaths()[0].points()), Orientation::Ccw);
        p.set_orientation(Orientation::Cw);
        assert_eq!(orientation(p.subpaths()[0].points()), Orientation::Cw);
        p.set_orientation(Orientation::Cw);
        assert_eq!(orientation(p.subpaths()[0].points()), Orientation::Cw);
    }
}
