//! Deferred edit-command replay (§9 "Edit-command replay"): instead of
//! the source's polymorphic emitter objects, each high-level drawing
//! call is recorded as a plain enum with inline payload and a dirty
//! bit; `commit()` is a one-pass walk rewriting the point slice it
//! owns.

use vg_geom::Point;

#[derive(Copy, Clone, Debug, PartialEq)]
#[cfg_attr(feature = "serialization", derive(serde::Serialize, serde::Deserialize))]
pub enum EditCommandKind {
    MoveTo { x: f32, y: f32 },
    LineTo { x: f32, y: f32 },
    CurveTo { cp1: Point, cp2: Point, p: Point },
    DrawRect { x: f32, y: f32, w: f32, h: f32, rx: f32, ry: f32 },
    DrawEllipse { cx: f32, cy: f32, rx: f32, ry: f32 },
}

/// A recorded command plus the point index it owns (the index of its
/// first emitted point in the subpath's flat array) and a dirty bit
/// set whenever the command's parameters change without a full
/// `set_points` rebuild.
#[derive(Copy, Clone, Debug, PartialEq)]
#[cfg_attr(feature = "serialization", derive(serde::Serialize, serde::Deserialize))]
pub struct EditCommand {
    pub kind: EditCommandKind,
    pub start_index: usize,
    pub dirty: bool,
}

impl EditCommand {
    pub fn new(kind: EditCommandKind, start_index: usize) -> Self {
        EditCommand { kind, start_index, dirty: false }
    }

    /// Number of points this command owns in the flat array, including
    /// its starting knot when it begins one (`MoveTo` / `DrawRect` /
    /// `DrawEllipse`). Matches `vg_geom::primitives::draw_rect`/
    /// `draw_ellipse`'s actual emission counts exactly: a sharp rect
    /// is `1 + 4*3 = 13` points, a rounded one `4*(3+3) + 1 = 25`, and
    /// the ellipse's fixed four-segment approximation is always 13.
    pub fn point_count(&self) -> usize {
        match self.kind {
            EditCommandKind::MoveTo { .. } => 1,
            EditCommandKind::LineTo { .. } => 3,
            EditCommandKind::CurveTo { .. } => 3,
            EditCommandKind::DrawRect { w, h, rx, ry, .. } => {
                if w == 0.0 || h == 0.0 {
                    0
                } else {
                    let (rx, ry) = vg_geom::primitives::normalize_rect_radii(w, h, rx, ry);
                    if rx < f32::EPSILON || ry < f32::EPSILON {
                        13
                    } else {
                        25
                    }
                }
            }
            EditCommandKind::DrawEllipse { .. } => 13,
        }
    }

    /// Recomputes this command's point payload from its current
    /// parameters, appending to `out`. `prev` is the last point ahead
    /// of this command in the flat array (needed by `LineTo`, which
    /// places its controls along the chord from there); it is ignored
    /// by every other variant. Used by `Subpath::commit` to replay a
    /// dirtied command without rebuilding the whole subpath.
    pub fn write(&self, prev: Point, out: &mut Vec<Point>) {
        match self.kind {
            EditCommandKind::MoveTo { x, y } => out.push(Point::new(x, y)),
            EditCommandKind::LineTo { x, y } => vg_geom::primitives::line_to(prev, x, y, out),
            EditCommandKind::CurveTo { cp1, cp2, p } => {
                out.push(cp1);
                out.push(cp2);
                out.push(p);
            }
            EditCommandKind::DrawRect { x, y, w, h, rx, ry } => {
                out.extend(vg_geom::primitives::draw_rect(x, y, w, h, rx, ry));
            }
            EditCommandKind::DrawEllipse { cx, cy, rx, ry } => {
                out.extend(vg_geom::primitives::draw_ellipse(cx, cy, rx, ry));
            }
        }
    }
}
