//! A chain of cubic-bezier segments with the editing operations of
//! §4.1, grounded in tove2d's `Subpath` (`subpath.cpp`): `insertCurveAt`,
//! `removeCurve`, `mould`, `makeFlat`, `makeSmooth`, `move`, `nearest`.

use crate::edit_command::{EditCommand, EditCommandKind};
use crate::error::Error;
use vg_geom::cubic_bezier::{Coefficients, CubicBezierSegment};
use vg_geom::{point, Box2D, Point};

/// Cache invalidated as a unit (§9 "dirty-flag bag"): both the
/// per-segment polynomial coefficients and their bounds/roots are
/// rebuilt together on next access.
pub const DIRTY_COEFFICIENTS: u32 = 1;
pub const DIRTY_CURVE_BOUNDS: u32 = 2;
const DIRTY_ALL: u32 = DIRTY_COEFFICIENTS | DIRTY_CURVE_BOUNDS;

/// One row of the curve cache: polynomial coefficients, tight bounds,
/// and the sorted monotonicity roots (§6's GPU row, minus the fields
/// the renderer computes separately).
#[derive(Clone, Debug, PartialEq)]
pub struct CurveCacheEntry {
    pub coefficients: Coefficients,
    pub bounds: Box2D,
    pub roots: [f32; 4],
}

/// A handle on a subpath point: either an on-curve knot or an
/// off-curve control, distinguished by `index mod 3` (§3).
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub enum PointKind {
    Knot,
    Control,
}

/// Which side(s) of a knot `make_flat`/`make_smooth` touch.
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub enum Side {
    Incoming = -1,
    Both = 0,
    Outgoing = 1,
}

/// How `move` treats the opposite control point of the one being
/// dragged.
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub enum Handle {
    Free,
    Aligned,
}

#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub enum FillRule {
    NonZero,
    EvenOdd,
}

#[derive(Clone, Debug, PartialEq)]
pub struct Subpath {
    points: Vec<Point>,
    closed: bool,
    commands: Vec<EditCommand>,
    curve_cache: Vec<CurveCacheEntry>,
    dirty_flags: u32,
}

impl Default for Subpath {
    fn default() -> Self {
        Subpath::new()
    }
}

impl Subpath {
    pub fn new() -> Self {
        Subpath {
            points: Vec::new(),
            closed: false,
            commands: Vec::new(),
            curve_cache: Vec::new(),
            dirty_flags: DIRTY_ALL,
        }
    }

    pub fn points(&self) -> &[Point] {
        &self.points
    }

    pub fn closed(&self) -> bool {
        self.closed
    }

    /// Number of cubic segments, `⌊(len-1)/3⌋` (§8).
    pub fn curve_count(&self) -> usize {
        if self.points.is_empty() {
            0
        } else {
            (self.points.len() - 1) / 3
        }
    }

    fn mark_dirty(&mut self) {
        self.dirty_flags |= DIRTY_ALL;
    }

    /// Warns (but does not block) when an append-style edit lands on an
    /// already-closed subpath, matching tove2d's `addPoints`'s
    /// `"editing closed trajectory."` warning.
    fn warn_if_closed(&self, op: &str) {
        if self.closed {
            log::warn!("editing closed trajectory ({op})");
        }
    }

    /// `open -> closed` appends the wrap-around duplicate of
    /// `points[0]` if it isn't already present; `closed -> open` is a
    /// pure flag flip and never removes the duplicate (§4.1 state
    /// machine note).
    pub fn set_closed(&mut self, closed: bool) {
        if closed && !self.closed && !self.points.is_empty() {
            let first = self.points[0];
            let needs_dup = self.points.last().map_or(true, |p| *p != first);
            if needs_dup {
                self.points.push(first);
                self.mark_dirty();
            }
        }
        self.closed = closed;
    }

    // -- builder append operations --------------------------------

    pub fn move_to(&mut self, x: f32, y: f32) {
        let start = self.points.len();
        self.points.push(point(x, y));
        self.commands.push(EditCommand::new(EditCommandKind::MoveTo { x, y }, start));
        self.mark_dirty();
    }

    pub fn line_to(&mut self, x: f32, y: f32) -> Result<(), Error> {
        let from = *self.points.last().ok_or_else(|| {
            log::warn!("{}", Error::EmptyPath);
            Error::EmptyPath
        })?;
        self.warn_if_closed("line_to");
        let start = self.points.len();
        let mut pts = Vec::with_capacity(3);
        vg_geom::primitives::line_to(from, x, y, &mut pts);
        self.points.extend_from_slice(&pts);
        self.commands.push(EditCommand::new(EditCommandKind::LineTo { x, y }, start));
        self.mark_dirty();
        Ok(())
    }

    pub fn curve_to(&mut self, cp1: Point, cp2: Point, p: Point) -> Result<(), Error> {
        if self.points.is_empty() {
            log::warn!("{}", Error::EmptyPath);
            return Err(Error::EmptyPath);
        }
        self.warn_if_closed("curve_to");
        let start = self.points.len();
        self.points.push(cp1);
        self.points.push(cp2);
        self.points.push(p);
        self.commands.push(EditCommand::new(EditCommandKind::CurveTo { cp1, cp2, p }, start));
        self.mark_dirty();
        Ok(())
    }

    /// Wraps the sweep into `(-360, 360]`; a full circle degenerates
    /// to `draw_ellipse`; otherwise each cubic segment of the
    /// large-arc decomposition is appended via `curve_to`.
    pub fn arc(&mut self, cx: f32, cy: f32, r: f32, a0: f32, a1: f32, ccw: bool) -> Result<(), Error> {
        match vg_geom::primitives::arc(cx, cy, r, a0, a1, ccw) {
            None => self.draw_ellipse(cx, cy, r, r),
            Some((start, segments)) => {
                if self.points.is_empty() {
                    self.move_to(start.x, start.y);
                } else {
                    self.line_to(start.x, start.y)?;
                }
                for (c1, c2, p) in segments {
                    self.curve_to(c1, c2, p)?;
                }
                Ok(())
            }
        }
    }

    pub fn draw_rect(&mut self, x: f32, y: f32, w: f32, h: f32, rx: f32, ry: f32) {
        let pts = vg_geom::primitives::draw_rect(x, y, w, h, rx, ry);
        if pts.is_empty() {
            return;
        }
        self.warn_if_closed("draw_rect");
        let start = self.points.len();
        self.points.extend_from_slice(&pts);
        self.commands
            .push(EditCommand::new(EditCommandKind::DrawRect { x, y, w, h, rx, ry }, start));
        self.closed = true;
        self.mark_dirty();
    }

    pub fn draw_ellipse(&mut self, cx: f32, cy: f32, rx: f32, ry: f32) -> Result<(), Error> {
        let pts = vg_geom::primitives::draw_ellipse(cx, cy, rx, ry);
        self.warn_if_closed("draw_ellipse");
        let start = self.points.len();
        self.points.extend_from_slice(&pts);
        self.commands
            .push(EditCommand::new(EditCommandKind::DrawEllipse { cx, cy, rx, ry }, start));
        self.closed = true;
        self.mark_dirty();
        Ok(())
    }

    /// Number of recorded edit commands (§3).
    pub fn command_count(&self) -> usize {
        self.commands.len()
    }

    /// Re-parameterizes a previously recorded command in place (e.g.
    /// reshaping a `DrawRect`'s corner radii) without discarding the
    /// commands recorded after it. Marks the command dirty; the point
    /// array isn't touched until `commit()` replays it. The new kind
    /// must be the same variant as the one being replaced — replacing
    /// `LineTo` with `DrawRect`, say, would leave the command list's
    /// implied point layout inconsistent with no way to repair it.
    pub fn set_command(&mut self, command_index: usize, kind: EditCommandKind) -> Result<(), Error> {
        let n = self.commands.len();
        let cmd = self.commands.get_mut(command_index).ok_or_else(|| {
            let err = Error::InvalidIndex { index: command_index, len: n };
            log::warn!("{err}");
            err
        })?;
        if std::mem::discriminant(&cmd.kind) != std::mem::discriminant(&kind) {
            let err = Error::BadArgument("set_command: kind must match the recorded command's variant");
            log::warn!("{err}");
            return Err(err);
        }
        cmd.kind = kind;
        cmd.dirty = true;
        Ok(())
    }

    /// Replays every dirty command's point range in declaration order,
    /// rewriting the subpath's flat point array and shifting later
    /// commands' `start_index` by however many points each replay
    /// added or removed. A no-op when nothing is dirty.
    ///
    /// Each command's *current* span is taken from the gap between its
    /// own (pre-commit) `start_index` and the next command's, rather
    /// than from `point_count()` — `set_command` may have already
    /// swapped in a new `kind` whose `point_count()` describes the
    /// replacement, not what's still sitting in `self.points`.
    pub fn commit(&mut self) -> Result<(), Error> {
        if !self.commands.iter().any(|c| c.dirty) {
            return Ok(());
        }
        let original_starts: Vec<usize> = self.commands.iter().map(|c| c.start_index).collect();
        let total_points = self.points.len();

        let mut shift = 0isize;
        for i in 0..self.commands.len() {
            let orig_start = original_starts[i];
            let orig_end = original_starts.get(i + 1).copied().unwrap_or(total_points);
            let start = (orig_start as isize + shift) as usize;
            self.commands[i].start_index = start;
            if !self.commands[i].dirty {
                continue;
            }
            let end = (orig_end as isize + shift) as usize;
            let prev = if start > 0 {
                *self.points.get(start - 1).ok_or(Error::InvalidIndex { index: start - 1, len: self.points.len() })?
            } else {
                point(0.0, 0.0)
            };
            let mut fresh = Vec::new();
            self.commands[i].write(prev, &mut fresh);
            shift += fresh.len() as isize - (end as isize - start as isize);
            self.points.splice(start..end, fresh);
            self.commands[i].dirty = false;
        }
        self.mark_dirty();
        Ok(())
    }

    // -- curve cache / sampling ------------------------------------

    fn rebuild_cache_if_dirty(&mut self) {
        if self.dirty_flags == 0 {
            return;
        }
        self.curve_cache.clear();
        for i in 0..self.curve_count() {
            let c = self.curve_at(i);
            self.curve_cache.push(CurveCacheEntry {
                coefficients: c.coefficients(),
                bounds: c.bounding_box(),
                roots: c.sorted_monotonic_roots(),
            });
        }
        self.dirty_flags = 0;
    }

    pub fn curve_cache(&mut self) -> &[CurveCacheEntry] {
        self.rebuild_cache_if_dirty();
        &self.curve_cache
    }

    /// Builds the i-th cubic segment from the flat point array.
    pub fn curve_at(&self, i: usize) -> CubicBezierSegment {
        let b = i * 3;
        CubicBezierSegment::new(self.points[b], self.points[b + 1], self.points[b + 2], self.points[b + 3])
    }

    pub fn curves(&self) -> impl Iterator<Item = CubicBezierSegment> + '_ {
        (0..self.curve_count()).map(move |i| self.curve_at(i))
    }

    pub fn position(&self, t_global: f32) -> Point {
        let (i, t) = self.split_global_t(t_global);
        self.curve_at(i).sample(t)
    }

    pub fn normal(&self, t_global: f32) -> vg_geom::Vector {
        let (i, t) = self.split_global_t(t_global);
        let d = self.curve_at(i).derivative(t);
        vg_geom::vector(-d.y, d.x)
    }

    fn split_global_t(&self, t_global: f32) -> (usize, f32) {
        let nc = self.curve_count().max(1);
        let mut t = t_global;
        if self.closed {
            t = t.rem_euclid(nc as f32);
        } else {
            t = t.clamp(0.0, nc as f32);
        }
        let mut i = t.floor() as usize;
        if i >= nc {
            i = nc - 1;
            return (i, 1.0);
        }
        (i, t - i as f32)
    }

    // -- insert / remove ---------------------------------------------

    /// Splits the addressed segment at `t_local` via de Casteljau,
    /// inserting three new points; returns the index of the new knot.
    pub fn insert_curve_at(&mut self, t_global: f32) -> Result<usize, Error> {
        if self.curve_count() == 0 {
            log::warn!("{}", Error::EmptyPath);
            return Err(Error::EmptyPath);
        }
        let (i, t_local) = self.split_global_t(t_global);
        let curve = self.curve_at(i);
        let (a, b) = curve.split(t_local.clamp(0.0, 1.0));
        let base = i * 3;
        // Replace [base+1, base+2, base+3] with a.ctrl1, a.ctrl2,
        // a.to(=new knot), b.ctrl1, b.ctrl2, leaving b.to as the old
        // base+3 point (unchanged, so we splice in 5 points for the 3
        // removed).
        let new_points = [a.ctrl1, a.ctrl2, a.to, b.ctrl1, b.ctrl2];
        self.points.splice(base + 1..base + 3, new_points.iter().copied());
        self.mark_dirty();
        Ok(base + 3)
    }

    /// Inverse of `insert_curve_at`: merges curves `curve_index` and
    /// `curve_index + 1` back into one cubic. When the pair is
    /// line-like, the merged controls snap to the 1/3-chord points
    /// (matching `line_to`); otherwise the split parameter is
    /// recovered exactly from the level-2 de Casteljau points shared
    /// by the two halves and the original controls reconstructed from
    /// it.
    pub fn remove_curve(&mut self, curve_index: usize) -> Result<(), Error> {
        let nc = self.curve_count();
        if curve_index + 1 >= nc {
            let err = Error::InvalidIndex { index: curve_index, len: nc };
            log::warn!("{err}");
            return Err(err);
        }
        let a = self.curve_at(curve_index);
        let b = self.curve_at(curve_index + 1);

        let (p1, p2) = if a.is_line_like(1e-4) && b.is_line_like(1e-4) {
            let p0 = a.from;
            let p3 = b.to;
            (
                point(p0.x + (p3.x - p0.x) / 3.0, p0.y + (p3.y - p0.y) / 3.0),
                point(p0.x + (p3.x - p0.x) * 2.0 / 3.0, p0.y + (p3.y - p0.y) * 2.0 / 3.0),
            )
        } else {
            reconstruct_merged_controls(&a, &b)
        };

        let base = curve_index * 3;
        // [a.from, a.ctrl1, a.ctrl2, a.to(=shared knot), b.ctrl1, b.ctrl2, b.to]
        // collapses to [a.from, p1, p2, b.to].
        self.points.splice(base + 1..base + 6, [p1, p2].iter().copied());
        self.mark_dirty();
        Ok(())
    }

    // -- mould / smoothing / move -------------------------------------

    /// Moves the on-curve point at `t_global` to `(x, y)`, keeping
    /// segment endpoints fixed. The interior controls are adjusted by
    /// splitting the required delta between them, weighted by both
    /// their Bernstein influence at `t` and the paper.js-style
    /// projection ratio `u = s^3 / (t^3 + s^3)` that biases the split
    /// toward whichever endpoint `t` sits closer to.
    pub fn mould(&mut self, t_global: f32, x: f32, y: f32) -> Result<(), Error> {
        let (i, t) = self.split_global_t(t_global);
        let curve = self.curve_at(i);
        let s = 1.0 - t;
        let w1 = 3.0 * s * s * t;
        let w2 = 3.0 * s * t * t;
        if w1 * w1 + w2 * w2 < 1e-12 {
            // t ~= 0 or 1: no interior control influences this point.
            return Ok(());
        }
        let target = point(x, y);
        let current = curve.sample(t);
        let dx = target.x - current.x;
        let dy = target.y - current.y;

        let t3 = t * t * t;
        let s3 = s * s * s;
        let denom = (t3 + s3).max(1e-9);
        let u = s3 / denom;

        let k1 = w1 * u;
        let k2 = w2 * (1.0 - u);
        let norm = (k1 * k1 + k2 * k2).max(1e-9);

        let base = i * 3;
        self.points[base + 1].x += dx * k1 / norm;
        self.points[base + 1].y += dy * k1 / norm;
        self.points[base + 2].x += dx * k2 / norm;
        self.points[base + 2].y += dy * k2 / norm;
        self.mark_dirty();
        Ok(())
    }

    /// Sets the outgoing/incoming (or both) control adjacent to
    /// `knot_index` to 1/3 of the chord toward its neighbor knot.
    pub fn make_flat(&mut self, knot_index: usize, dir: Side) -> Result<(), Error> {
        let n = self.points.len();
        if knot_index >= n || knot_index % 3 != 0 {
            let err = Error::InvalidIndex { index: knot_index, len: n };
            log::warn!("{err}");
            return Err(err);
        }
        let knot = self.points[knot_index];
        if (dir == Side::Outgoing || dir == Side::Both) && knot_index + 3 < n {
            let next = self.points[knot_index + 3];
            self.points[knot_index + 1] = point(
                knot.x + (next.x - knot.x) / 3.0,
                knot.y + (next.y - knot.y) / 3.0,
            );
        }
        if (dir == Side::Incoming || dir == Side::Both) && knot_index >= 3 {
            let prev = self.points[knot_index - 3];
            self.points[knot_index - 1] = point(
                knot.x + (prev.x - knot.x) / 3.0,
                knot.y + (prev.y - knot.y) / 3.0,
            );
        }
        self.mark_dirty();
        Ok(())
    }

    /// Catmull-Rom-style smoothing with exponent `a` (`a = 0` ~ flat,
    /// `a = 1` ~ full-length tangent). Falls back to `make_flat` when
    /// the relevant chord has zero length.
    pub fn make_smooth(&mut self, knot_index: usize, dir: Side, a: f32) -> Result<(), Error> {
        let n = self.points.len();
        if knot_index >= n || knot_index % 3 != 0 {
            let err = Error::InvalidIndex { index: knot_index, len: n };
            log::warn!("{err}");
            return Err(err);
        }
        let has_prev = knot_index >= 3;
        let has_next = knot_index + 3 < n;
        if !has_prev || !has_next {
            return self.make_flat(knot_index, dir);
        }
        let prev = self.points[knot_index - 3];
        let knot = self.points[knot_index];
        let next = self.points[knot_index + 3];

        let tangent = point(next.x - prev.x, next.y - prev.y);
        let chord_in = ((knot.x - prev.x).powi(2) + (knot.y - prev.y).powi(2)).sqrt();
        let chord_out = ((next.x - knot.x).powi(2) + (next.y - knot.y).powi(2)).sqrt();

        if chord_in < 1e-9 || chord_out < 1e-9 {
            return self.make_flat(knot_index, dir);
        }

        let scale_in = chord_in.powf(a) / 6.0;
        let scale_out = chord_out.powf(a) / 6.0;
        let tangent_len = (tangent.x * tangent.x + tangent.y * tangent.y).sqrt().max(1e-9);
        let nx = tangent.x / tangent_len;
        let ny = tangent.y / tangent_len;

        if dir == Side::Incoming || dir == Side::Both {
            self.points[knot_index - 1] = point(knot.x - nx * scale_in, knot.y - ny * scale_in);
        }
        if dir == Side::Outgoing || dir == Side::Both {
            self.points[knot_index + 1] = point(knot.x + nx * scale_out, knot.y + ny * scale_out);
        }
        self.mark_dirty();
        Ok(())
    }

    /// Moves a knot (translating its adjacent controls by the same
    /// delta) or a control point (optionally reflecting the opposite
    /// control around the knot when `handle == Aligned`).
    pub fn move_point(&mut self, point_index: usize, x: f32, y: f32, handle: Handle) -> Result<(), Error> {
        let n = self.points.len();
        if point_index >= n {
            let err = Error::InvalidIndex { index: point_index, len: n };
            log::warn!("{err}");
            return Err(err);
        }
        let old = self.points[point_index];
        let dx = x - old.x;
        let dy = y - old.y;
        self.points[point_index] = point(x, y);

        if point_index % 3 == 0 {
            if point_index + 1 < n {
                self.points[point_index + 1].x += dx;
                self.points[point_index + 1].y += dy;
            }
            if point_index >= 1 {
                self.points[point_index - 1].x += dx;
                self.points[point_index - 1].y += dy;
            }
        } else if handle == Handle::Aligned {
            let knot_index = if point_index % 3 == 1 { point_index - 1 } else { point_index + 1 };
            let opposite_index = if point_index % 3 == 1 {
                if knot_index >= 1 { Some(knot_index - 1) } else { None }
            } else if knot_index + 1 < n {
                Some(knot_index + 1)
            } else {
                None
            };
            if let (Some(opp), true) = (opposite_index, knot_index < n) {
                let knot = self.points[knot_index];
                let moved = self.points[point_index];
                let magnitude = {
                    let old_opp = self.points[opp];
                    ((old_opp.x - knot.x).powi(2) + (old_opp.y - knot.y).powi(2)).sqrt()
                };
                let dir_len = ((moved.x - knot.x).powi(2) + (moved.y - knot.y).powi(2)).sqrt().max(1e-9);
                let ux = (knot.x - moved.x) / dir_len;
                let uy = (knot.y - moved.y) / dir_len;
                self.points[opp] = point(knot.x + ux * magnitude, knot.y + uy * magnitude);
            }
        }
        self.mark_dirty();
        Ok(())
    }

    /// Replaces the whole point array. For closed subpaths with
    /// `add_loop_duplicate`, appends the wrap-around point if missing.
    pub fn set_points(&mut self, points: Vec<Point>, add_loop_duplicate: bool) {
        self.points = points;
        if self.closed && add_loop_duplicate && !self.points.is_empty() {
            let first = self.points[0];
            if self.points.last().map_or(true, |p| *p != first) {
                self.points.push(first);
            }
        }
        self.mark_dirty();
    }

    /// Finds the closest point on the subpath to `(x, y)` within
    /// `[d_min, d_max]`. AABBs are inflated by `d_max` to skip whole
    /// segments cheaply; surviving segments are searched by bisecting
    /// each monotonicity-root interval for up to 16 iterations.
    /// Returns a negative `t` when nothing is within `d_max`.
    pub fn nearest(&mut self, x: f32, y: f32, d_min: f32, d_max: f32) -> (f32, f32) {
        let query = point(x, y);
        let d_max2 = d_max * d_max;
        let d_min2 = d_min * d_min;

        let mut best_t = -1.0f32;
        let mut best_d2 = f32::MAX;

        self.rebuild_cache_if_dirty();
        let n = self.curve_count();
        for i in 0..n {
            let bounds = &self.curve_cache[i].bounds;
            let inflated = Box2D::new(
                point(bounds.min.x - d_max, bounds.min.y - d_max),
                point(bounds.max.x + d_max, bounds.max.y + d_max),
            );
            if !inflated.contains(query) {
                continue;
            }
            let curve = self.curve_at(i);
            let roots = self.curve_cache[i].roots;
            let mut interval_start = 0.0f32;
            for &root in roots.iter() {
                let interval_end = root.min(1.0);
                if let Some((t, d2)) = bisect_interval(&curve, query, interval_start, interval_end, d_min2) {
                    if d2 < best_d2 {
                        best_d2 = d2;
                        best_t = i as f32 + t;
                    }
                    if best_d2 <= d_min2 {
                        return (best_t, best_d2);
                    }
                }
                interval_start = interval_end;
                if interval_start >= 1.0 {
                    break;
                }
            }
            let _ = d_max2;
        }
        (best_t, best_d2)
    }

    /// Routes to the fill-rule-aware point-in-path test over this
    /// subpath's curves.
    pub fn is_inside(&self, x: f32, y: f32, rule: FillRule) -> bool {
        let curves: Vec<CubicBezierSegment> = self.curves().collect();
        vg_geom::intersect::point_in_curves(&curves, point(x, y), rule == FillRule::NonZero)
    }

    /// Axis-aligned bound over all segments' tight bounding boxes.
    pub fn bounds(&mut self) -> Box2D {
        self.rebuild_cache_if_dirty();
        if self.curve_cache.is_empty() {
            return Box2D::new(Point::zero(), Point::zero());
        }
        let mut b = self.curve_cache[0].bounds;
        for entry in &self.curve_cache[1..] {
            b = b.union(&entry.bounds);
        }
        b
    }

    /// Removes degenerate (near-coincident knot) segments, a feature
    /// dropped from the distilled spec but present in the original
    /// (`Subpath::clean`): repeatedly merges any curve whose endpoints
    /// are within `eps` of each other.
    pub fn clean(&mut self, eps: f32) {
        let eps2 = eps * eps;
        let mut i = 0;
        while i + 1 < self.curve_count() {
            let c = self.curve_at(i);
            let dx = c.to.x - c.from.x;
            let dy = c.to.y - c.from.y;
            if dx * dx + dy * dy < eps2 && self.curve_count() > 1 {
                let base = i * 3;
                self.points.drain(base + 1..base + 4);
                self.mark_dirty();
            } else {
                i += 1;
            }
        }
    }

    /// Reverses point order in place, flipping winding (`Subpath::invert`
    /// in the original): each cubic's `(from, ctrl1, ctrl2, to)` becomes
    /// `(to, ctrl2, ctrl1, from)` read in reverse overall order.
    pub fn invert(&mut self) {
        self.points.reverse();
        self.mark_dirty();
    }
}

/// Exact split-parameter recovery: `m = lerp(a.ctrl2, b.ctrl1, t)`, so
/// `t` can be read off per axis wherever the two don't coincide, then
/// averaged — this is the "averaging the two axis-wise estimates" of
/// §4.1's `remove_curve` contract.
fn reconstruct_merged_controls(a: &CubicBezierSegment, b: &CubicBezierSegment) -> (Point, Point) {
    let p012 = a.ctrl2;
    let p123 = b.ctrl1;
    let m = a.to;

    let mut sum_t = 0.0f32;
    let mut count = 0;
    for (d_m, d_span) in [(m.x - p012.x, p123.x - p012.x), (m.y - p012.y, p123.y - p012.y)] {
        if d_span.abs() > 1e-6 {
            sum_t += d_m / d_span;
            count += 1;
        }
    }
    let t = if count > 0 { (sum_t / count as f32).clamp(1e-4, 1.0 - 1e-4) } else { 0.5 };
    let s = 1.0 - t;

    let p0 = a.from;
    let p01 = a.ctrl1;
    let p23 = b.ctrl2;
    let p3 = b.to;

    let p1 = point(p0.x + (p01.x - p0.x) / t, p0.y + (p01.y - p0.y) / t);
    let p2 = point((p23.x - t * p3.x) / s, (p23.y - t * p3.y) / s);
    (p1, p2)
}

fn bisect_interval(
    curve: &CubicBezierSegment,
    query: Point,
    t0: f32,
    t1: f32,
    d_min2: f32,
) -> Option<(f32, f32)> {
    if t1 <= t0 {
        return None;
    }
    let dist2 = |t: f32| -> f32 {
        let p = curve.sample(t);
        let dx = p.x - query.x;
        let dy = p.y - query.y;
        dx * dx + dy * dy
    };

    let mut best_t = t0;
    let mut best_d2 = dist2(t0);
    let end_d2 = dist2(t1);
    if end_d2 < best_d2 {
        best_t = t1;
        best_d2 = end_d2;
    }

    let mut lo = t0;
    let mut hi = t1;
    let mut step = (hi - lo) / 2.0;
    let mut mid = lo + step;
    for _ in 0..16 {
        let d2 = dist2(mid);
        if d2 < best_d2 {
            best_d2 = d2;
            best_t = mid;
        }
        if best_d2 <= d_min2 {
            break;
        }
        step /= 2.0;
        let d_left = dist2((mid - step).max(lo));
        let d_right = dist2((mid + step).min(hi));
        mid = if d_left < d_right { (mid - step).max(lo) } else { (mid + step).min(hi) };
    }
    Some((best_t, best_d2))
}

#[cfg(test)]
mod tests {
    use super::*;

    fn generic_cubic() -> Subpath {
        let mut s = Subpath::new();
        s.move_to(0.0, 0.0);
        s.curve_to(point(1.0, 0.0), point(0.0, 1.0), point(1.0, 1.0)).unwrap();
        s
    }

    #[test]
    fn layout_invariant_after_insert() {
        let mut s = generic_cubic();
        let idx = s.insert_curve_at(0.37).unwrap();
        assert_eq!(s.points().len(), 7);
        assert_eq!(idx, 3);
        assert_eq!(s.curve_count(), 2);
    }

    #[test]
    fn insert_then_remove_round_trips() {
        let mut s = generic_cubic();
        let before: Vec<Point> = s.points().to_vec();
        s.insert_curve_at(0.37).unwrap();
        s.remove_curve(0).unwrap();
        let after = s.points();
        assert_eq!(after.len(), before.len());
        for (a, b) in before.iter().zip(after.iter()) {
            assert!((a.x - b.x).abs() < 1e-3, "{:?} vs {:?}", a, b);
            assert!((a.y - b.y).abs() < 1e-3, "{:?} vs {:?}", a, b);
        }
    }

    #[test]
    fn closed_duplicates_first_point() {
        let mut s = Subpath::new();
        s.move_to(0.0, 0.0);
        s.line_to(1.0, 0.0).unwrap();
        s.set_closed(true);
        assert_eq!(*s.points().last().unwrap(), point(0.0, 0.0));
    }

    #[test]
    fn unit_square_is_inside() {
        let mut s = Subpath::new();
        s.move_to(0.0, 0.0);
        s.line_to(1.0, 0.0).unwrap();
        s.line_to(1.0, 1.0).unwrap();
        s.line_to(0.0, 1.0).unwrap();
        s.set_closed(true);
        assert!(s.is_inside(0.5, 0.5, FillRule::NonZero));
        assert!(!s.is_inside(1.5, 0.5, FillRule::NonZero));
    }

    #[test]
    fn mould_at_endpoints_is_noop() {
        let mut s = generic_cubic();
        let before = s.points().to_vec();
        s.mould(0.0, 50.0, 50.0).unwrap();
        assert_eq!(s.points(), before.as_slice());
    }

    #[test]
    fn nearest_on_circle_start() {
        let mut s = Subpath::new();
        s.draw_ellipse(0.0, 0.0, 10.0, 10.0).unwrap();
        let (t, d2) = s.nearest(10.0, 0.0, 0.1, 1.0);
        assert!(t >= 0.0);
        assert!(d2 < 0.5);
    }

    #[test]
    fn commit_replays_resized_rect() {
        let mut s = Subpath::new();
        s.draw_rect(0.0, 0.0, 10.0, 10.0, 0.0, 0.0);
        assert_eq!(s.points().len(), 13);

        s.set_command(0, EditCommandKind::DrawRect { x: 0.0, y: 0.0, w: 10.0, h: 10.0, rx: 2.0, ry: 2.0 })
            .unwrap();
        s.commit().unwrap();
        assert_eq!(s.points().len(), 25);
    }

    #[test]
    fn commit_shifts_later_commands() {
        let mut s = Subpath::new();
        s.draw_rect(0.0, 0.0, 10.0, 10.0, 0.0, 0.0);
        s.line_to(20.0, 20.0).unwrap();
        let line_start_before = s.commands[1].start_index;

        s.set_command(0, EditCommandKind::DrawRect { x: 0.0, y: 0.0, w: 10.0, h: 10.0, rx: 2.0, ry: 2.0 })
            .unwrap();
        s.commit().unwrap();

        assert_eq!(s.commands[1].start_index, line_start_before + 12);
        assert_eq!(s.points().len(), 25 + 3);
    }

    #[test]
    fn set_command_rejects_mismatched_variant() {
        let mut s = Subpath::new();
        s.move_to(0.0, 0.0);
        let err = s.set_command(0, EditCommandKind::LineTo { x: 1.0, y: 1.0 }).unwrap_err();
        assert_eq!(err, Error::BadArgument("set_command: kind must match the recorded command's variant"));
    }
}
