//! Solid colors and linear/radial gradients (§4.10).

use vg_geom::Transform;

/// Packed non-premultiplied RGBA, one byte per channel.
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "serialization", derive(serde::Serialize, serde::Deserialize))]
pub struct Rgba {
    pub r: u8,
    pub g: u8,
    pub b: u8,
    pub a: u8,
}

impl Rgba {
    pub const fn new(r: u8, g: u8, b: u8, a: u8) -> Self {
        Rgba { r, g, b, a }
    }

    /// Scales alpha by `opacity` (clamped to `[0, 1]`); other channels
    /// are untouched, matching `apply_opacity`'s non-premultiplied
    /// contract.
    pub fn apply_opacity(self, opacity: f32) -> Rgba {
        let o = opacity.clamp(0.0, 1.0);
        Rgba::new(self.r, self.g, self.b, (self.a as f32 * o).round() as u8)
    }

    fn lerp(self, other: Rgba, t: f32) -> Rgba {
        let l = |a: u8, b: u8| -> u8 { (a as f32 + (b as f32 - a as f32) * t).round() as u8 };
        Rgba::new(l(self.r, other.r), l(self.g, other.g), l(self.b, other.b), l(self.a, other.a))
    }
}

/// A single gradient stop.
#[derive(Copy, Clone, Debug, PartialEq)]
#[cfg_attr(feature = "serialization", derive(serde::Serialize, serde::Deserialize))]
pub struct GradientStop {
    pub offset: f32,
    pub color: Rgba,
}

/// Shared gradient state: an ordered stop table plus the forward and
/// inverse affine kept in sync so a consumer (e.g. a rasterizer) never
/// has to invert the matrix itself.
#[derive(Clone, Debug, PartialEq)]
#[cfg_attr(feature = "serialization", derive(serde::Serialize, serde::Deserialize))]
pub struct Gradient {
    stops: Vec<GradientStop>,
    sorted: bool,
    xform: Transform,
    xform_inv: Transform,
}

impl Gradient {
    pub fn new(stops: Vec<GradientStop>) -> Self {
        Gradient {
            stops,
            sorted: false,
            xform: Transform::identity(),
            xform_inv: Transform::identity(),
        }
    }

    /// Stops sorted by offset; the sort is lazy and runs only once,
    /// the first time a consumer needs stable ordering.
    pub fn stops(&mut self) -> &[GradientStop] {
        if !self.sorted {
            self.stops
                .sort_by(|a, b| a.offset.partial_cmp(&b.offset).unwrap());
            self.sorted = true;
        }
        &self.stops
    }

    pub fn stops_unsorted(&self) -> &[GradientStop] {
        &self.stops
    }

    pub fn transform(&self) -> &Transform {
        &self.xform
    }

    pub fn inverse_transform(&self) -> &Transform {
        &self.xform_inv
    }

    /// Post-multiplies the forward transform by `m` and recomputes the
    /// inverse, so the two never drift out of sync.
    pub fn apply_transform(&mut self, m: &Transform) {
        self.xform = self.xform.then(m);
        self.xform_inv = self
            .xform
            .inverse()
            .unwrap_or_else(Transform::identity);
    }

    /// A 256-entry color table, or the 2-entry fast path when the
    /// gradient is exactly `{0.0, 1.0}` (no table needed beyond the
    /// endpoints themselves), for the rasterizer's `clamp(round(g *
    /// 255), 0, 255)` lookup.
    pub fn color_table(&mut self) -> Vec<Rgba> {
        let stops = {
            self.stops();
            self.stops.clone()
        };
        if stops.len() == 2 && stops[0].offset == 0.0 && stops[1].offset == 1.0 {
            return vec![stops[0].color, stops[1].color];
        }
        if stops.is_empty() {
            return vec![Rgba::new(0, 0, 0, 0); 256];
        }
        let mut table = Vec::with_capacity(256);
        for i in 0..256 {
            let g = i as f32 / 255.0;
            table.push(sample_stops(&stops, g));
        }
        table
    }
}

fn sample_stops(stops: &[GradientStop], g: f32) -> Rgba {
    if g <= stops[0].offset {
        return stops[0].color;
    }
    let last = stops.len() - 1;
    if g >= stops[last].offset {
        return stops[last].color;
    }
    for w in stops.windows(2) {
        let (a, b) = (w[0], w[1]);
        if g >= a.offset && g <= b.offset {
            let span = b.offset - a.offset;
            let t = if span > f32::EPSILON { (g - a.offset) / span } else { 0.0 };
            return a.color.lerp(b.color, t);
        }
    }
    stops[last].color
}

/// Linear gradient, evaluated along its local y axis after applying
/// `xform_inv`.
#[derive(Clone, Debug, PartialEq)]
#[cfg_attr(feature = "serialization", derive(serde::Serialize, serde::Deserialize))]
pub struct LinearGradient {
    pub gradient: Gradient,
}

/// Radial gradient with an optional focal point offset from center.
#[derive(Clone, Debug, PartialEq)]
#[cfg_attr(feature = "serialization", derive(serde::Serialize, serde::Deserialize))]
pub struct RadialGradient {
    pub gradient: Gradient,
    pub focal_x: f32,
    pub focal_y: f32,
}

/// A fill or stroke paint (§3).
#[derive(Clone, Debug, PartialEq)]
#[cfg_attr(feature = "serialization", derive(serde::Serialize, serde::Deserialize))]
pub enum Paint {
    None,
    Solid(Rgba),
    Linear(LinearGradient),
    Radial(RadialGradient),
}

impl Default for Paint {
    fn default() -> Self {
        Paint::None
    }
}

impl Paint {
    pub fn is_none(&self) -> bool {
        matches!(self, Paint::None)
    }

    /// Per-stop linear interpolation between two paints of matching
    /// kind, required by `Path::animate` (§4.9). Mismatched paint
    /// kinds or stop counts return `None`, on `Paint::interpolate`'s
    /// caller to decide the snap policy.
    pub fn interpolate(a: &Paint, b: &Paint, t: f32) -> Option<Paint> {
        match (a, b) {
            (Paint::None, Paint::None) => Some(Paint::None),
            (Paint::Solid(ca), Paint::Solid(cb)) => Some(Paint::Solid(ca.lerp(*cb, t))),
            (Paint::Linear(ga), Paint::Linear(gb)) => {
                interpolate_gradient(&ga.gradient, &gb.gradient, t)
                    .map(|g| Paint::Linear(LinearGradient { gradient: g }))
            }
            (Paint::Radial(ga), Paint::Radial(gb)) => {
                interpolate_gradient(&ga.gradient, &gb.gradient, t).map(|g| {
                    Paint::Radial(RadialGradient {
                        gradient: g,
                        focal_x: ga.focal_x + (gb.focal_x - ga.focal_x) * t,
                        focal_y: ga.focal_y + (gb.focal_y - ga.focal_y) * t,
                    })
                })
            }
            _ => None,
        }
    }
}

fn interpolate_gradient(a: &Gradient, b: &Gradient, t: f32) -> Option<Gradient> {
    let sa = a.stops_unsorted();
    let sb = b.stops_unsorted();
    if sa.len() != sb.len() {
        return None;
    }
    let stops = sa
        .iter()
        .zip(sb.iter())
        .map(|(x, y)| GradientStop {
            offset: x.offset + (y.offset - x.offset) * t,
            color: x.color.lerp(y.color, t),
        })
        .collect();
    Some(Gradient::new(stops))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn two_stop_midpoint_is_exact_blend() {
        let mut g = Gradient::new(vec![
            GradientStop { offset: 0.0, color: Rgba::new(255, 0, 0, 255) },
            GradientStop { offset: 1.0, color: Rgba::new(0, 0, 255, 255) },
        ]);
        let c = sample_stops(&{ g.stops(); g.stops_unsorted().to_vec() }, 0.5);
        assert_eq!(c, Rgba::new(127, 0, 127, 255));
    }

    #[test]
    fn color_table_two_stop_fast_path() {
        let mut g = Gradient::new(vec![
            GradientStop { offset: 0.0, color: Rgba::new(255, 0, 0, 255) },
            GradientStop { offset: 1.0, color: Rgba::new(0, 0, 255, 255) },
        ]);
        assert_eq!(g.color_table().len(), 2);
    }

    #[test]
    fn opacity_scales_alpha_only() {
        let c = Rgba::new(10, 20, 30, 200).apply_opacity(0.5);
        assert_eq!(c, Rgba::new(10, 20, 30, 100));
    }
}
