//! Top-level collection of paths: builder entry point, hit-testing,
//! and morphing (§4.3, §4.9).

use crate::error::Error;
use crate::paint::Paint;
use crate::path::Path;
use vg_geom::Box2D;

#[derive(Clone, Debug, Default)]
pub struct Style {
    pub fill: Paint,
    pub stroke: Paint,
}

#[derive(Clone, Debug, Default)]
pub struct Graphics {
    paths: Vec<Path>,
    pub width: f32,
    pub height: f32,
    current_style: Style,
    new_path: bool,
    bounds: Option<Box2D>,
}

impl Graphics {
    pub fn new(width: f32, height: f32) -> Self {
        Graphics {
            paths: Vec::new(),
            width,
            height,
            current_style: Style::default(),
            new_path: true,
            bounds: None,
        }
    }

    pub fn paths(&self) -> &[Path] {
        &self.paths
    }

    pub fn paths_mut(&mut self) -> &mut [Path] {
        self.bounds = None;
        &mut self.paths
    }

    pub fn begin_path(&mut self) {
        self.paths.push(Path::new());
        self.new_path = false;
        self.bounds = None;
    }

    pub fn current_path_mut(&mut self) -> &mut Path {
        if self.new_path || self.paths.is_empty() {
            self.begin_path();
        }
        self.paths.last_mut().unwrap()
    }

    /// Applies the pending fill style to the current path.
    pub fn fill(&mut self) {
        let fill = self.current_style.fill.clone();
        self.current_path_mut().set_fill(fill);
        self.new_path = true;
    }

    /// Applies the pending stroke style to the current path.
    pub fn stroke(&mut self) {
        let stroke = self.current_style.stroke.clone();
        self.current_path_mut().set_stroke(stroke);
        self.new_path = true;
    }

    pub fn set_current_fill(&mut self, paint: Paint) {
        self.current_style.fill = paint;
    }

    pub fn set_current_stroke(&mut self, paint: Paint) {
        self.current_style.stroke = paint;
    }

    pub fn bounds(&mut self) -> Box2D {
        if let Some(b) = self.bounds {
            return b;
        }
        let mut iter = self.paths.iter_mut();
        let b = match iter.next() {
            None => Box2D::new(vg_geom::point(0.0, 0.0), vg_geom::point(0.0, 0.0)),
            Some(first) => {
                let mut b = first.bounds();
                for p in iter {
                    b = b.union(&p.bounds());
                }
                b
            }
        };
        self.bounds = Some(b);
        b
    }

    /// First path in reverse draw order (last painted wins) whose
    /// `is_inside` returns true.
    pub fn hit(&self, x: f32, y: f32) -> Option<usize> {
        self.paths.iter().enumerate().rev().find(|(_, p)| p.is_inside(x, y)).map(|(i, _)| i)
    }

    /// Equalizes subpath and point counts across `graphics` so
    /// per-point interpolation is well-defined afterward: subpath
    /// counts are raised to the max (padding with empty subpaths), and
    /// each subpath index's curve count is raised to the max across
    /// inputs by repeated `insert_curve_at` calls — uniform
    /// subdivision when the gap is large, bisect-longest-segment
    /// otherwise.
    pub fn morphify(graphics: &mut [Graphics]) -> Result<(), Error> {
        if graphics.is_empty() {
            return Ok(());
        }
        let max_paths = graphics.iter().map(|g| g.paths.len()).max().unwrap_or(0);
        for g in graphics.iter_mut() {
            while g.paths.len() < max_paths {
                g.paths.push(Path::new());
            }
        }

        for path_index in 0..max_paths {
            let max_subpaths = graphics.iter().map(|g| g.paths[path_index].subpaths().len()).max().unwrap_or(0);
            for g in graphics.iter_mut() {
                let path = &mut g.paths[path_index];
                while path.subpaths().len() < max_subpaths {
                    path.add_subpath(crate::subpath::Subpath::new());
                }
            }

            for subpath_index in 0..max_subpaths {
                let max_curves = graphics
                    .iter()
                    .map(|g| g.paths[path_index].subpaths()[subpath_index].curve_count())
                    .max()
                    .unwrap_or(0);
                for g in graphics.iter_mut() {
                    let path = &mut g.paths[path_index];
                    let subpaths = path.subpaths_mut();
                    let sp = &mut subpaths[subpath_index];
                    equalize_curve_count(sp, max_curves);
                }
            }
        }
        Ok(())
    }
}

fn equalize_curve_count(sp: &mut crate::subpath::Subpath, target: usize) {
    if target == 0 {
        return;
    }
    let gap = target.saturating_sub(sp.curve_count());
    if gap == 0 {
        return;
    }

    let large_gap = gap > sp.curve_count().max(1);
    if large_gap {
        // Uniform subdivision: repeatedly halve every segment until
        // we're at or past the target, since that converges fast when
        // the gap is large relative to the current count.
        while sp.curve_count() * 2 <= target {
            let n = sp.curve_count();
            for i in (0..n).rev() {
                let _ = sp.insert_curve_at(i as f32 + 0.5);
            }
        }
        while sp.curve_count() < target {
            let _ = sp.insert_curve_at(0.5);
        }
    } else {
        // Bisect the longest segment repeatedly.
        while sp.curve_count() < target {
            let mut longest = 0usize;
            let mut longest_len = -1.0f32;
            for (i, c) in sp.curves().enumerate() {
                let dx = c.to.x - c.from.x;
                let dy = c.to.y - c.from.y;
                let len = dx * dx + dy * dy;
                if len > longest_len {
                    longest_len = len;
                    longest = i;
                }
            }
            let _ = sp.insert_curve_at(longest as f32 + 0.5);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn morphify_single_is_identity() {
        let mut g = Graphics::new(10.0, 10.0);
        g.begin_path();
        {
            let sp = g.current_path_mut().current_subpath_mut().unwrap();
            sp.move_to(0.0, 0.0);
            sp.line_to(1.0, 0.0).unwrap();
        }
        let before = g.paths()[0].subpaths()[0].points().to_vec();
        let mut list = vec![g];
        Graphics::morphify(&mut list).unwrap();
        assert_eq!(list[0].paths()[0].subpaths()[0].points(), before.as_slice());
    }

    #[test]
    fn morphify_equalizes_curve_counts() {
        let mut g1 = Graphics::new(10.0, 10.0);
        g1.begin_path();
        g1.current_path_mut().current_subpath_mut().unwrap().move_to(0.0, 0.0);
        g1.current_path_mut().current_subpath_mut().unwrap().line_to(1.0, 0.0).unwrap();

        let mut g2 = Graphics::new(10.0, 10.0);
        g2.begin_path();
        g2.current_path_mut().current_subpath_mut().unwrap().move_to(0.0, 0.0);
        g2.current_path_mut().current_subpath_mut().unwrap().line_to(1.0, 0.0).unwrap();
        g2.current_path_mut().current_subpath_mut().unwrap().line_to(2.0, 0.0).unwrap();
        g2.current_path_mut().current_subpath_mut().unwrap().line_to(3.0, 0.0).unwrap();

        let mut list = vec![g1, g2];
        Graphics::morphify(&mut list).unwrap();
        let c0 = list[0].paths()[0].subpaths()[0].curve_count();
        let c1 = list[1].paths()[0].subpaths()[0].curve_count();
        assert_eq!(c0, c1);
    }
}
