//! CPU drawing of the panel body, used as the `SourceGraphic` of the glass
//! filter wherever no browser paints it.

use crate::animation::{gradient_color, iridescent_gradient};
use crate::constants::{
    BODY_ALPHA, BODY_ALPHA_OVER_LIGHT, HIGHLIGHT_ALPHA, HIGHLIGHT_ALPHA_HOVER, HIGHLIGHT_EXTENT,
    RIPPLE_ALPHA,
};
use crate::decor::GlassVisual;
use crate::raster::{over, premultiply, Raster};
use glam::{Vec2, Vec4};

const RIM_ALPHA: f32 = 0.35;
const RIM_WIDTH: f32 = 1.0;

/// Signed distance from `p` to a rounded box of half extents `half`
/// centred at the origin. Negative inside.
pub fn rounded_box_distance(p: Vec2, half: Vec2, radius: f32) -> f32 {
    let radius = radius.clamp(0.0, half.x.min(half.y).max(0.0));
    let q = p.abs() - half + Vec2::splat(radius);
    q.max(Vec2::ZERO).length() + q.x.max(q.y).min(0.0) - radius
}

/// Coverage of a one-pixel antialiased edge at signed distance `d`.
#[inline]
fn coverage(d: f32) -> f32 {
    (0.5 - d).clamp(0.0, 1.0)
}

/// Draw the panel at `width × height` pixels; `visual` is in CSS pixels and
/// is scaled to fit.
pub fn rasterize(size: (u32, u32), visual: &GlassVisual, t: f32) -> Raster {
    let (width, height) = size;
    let mut out = Raster::new(width, height);
    if width == 0 || height == 0 {
        return out;
    }
    let scale = if visual.size.width > 0.0 {
        width as f32 / visual.size.width
    } else {
        1.0
    };
    let dims = Vec2::new(width as f32, height as f32);
    let half = dims / 2.0;
    let radius = visual.effective_radius * scale;
    let highlight_center = visual.highlight / 100.0 * dims;
    let highlight_radius = dims.max_element() * HIGHLIGHT_EXTENT;
    let highlight_alpha = if visual.hovered {
        HIGHLIGHT_ALPHA_HOVER
    } else {
        HIGHLIGHT_ALPHA
    };
    let body_alpha = if visual.over_light {
        BODY_ALPHA_OVER_LIGHT
    } else {
        BODY_ALPHA
    };
    let fringe = visual.fringe_opacity();
    let gradient = iridescent_gradient();

    for y in 0..height {
        for x in 0..width {
            let p = Vec2::new(x as f32 + 0.5, y as f32 + 0.5);
            let d = rounded_box_distance(p - half, half, radius);
            let mask = coverage(d);
            if mask <= 0.0 {
                continue;
            }

            let mut c = premultiply(Vec4::new(1.0, 1.0, 1.0, body_alpha));

            let k = (1.0 - p.distance(highlight_center) / highlight_radius).max(0.0);
            c = over(premultiply(Vec4::new(1.0, 1.0, 1.0, highlight_alpha * k * k)), c);

            let diagonal = (p.x / dims.x + p.y / dims.y) / 2.0;
            if let Some((rgb, opacity)) = gradient_color(&gradient, diagonal, t) {
                c = over(premultiply(rgb.extend(opacity * fringe)), c);
            }

            for ripple in &visual.ripples {
                let r = ripple.diameter * scale / 2.0;
                let rd = p.distance(ripple.center * scale) - r;
                let a = coverage(rd) * RIPPLE_ALPHA * ripple.opacity;
                if a > 0.0 {
                    c = over(premultiply(Vec4::new(1.0, 1.0, 1.0, a)), c);
                }
            }

            // Thin bright rim just inside the edge.
            let rim = coverage(-d - RIM_WIDTH) * RIM_ALPHA;
            if rim > 0.0 {
                c = over(premultiply(Vec4::new(1.0, 1.0, 1.0, rim)), c);
            }

            out.set(x, y, c * mask);
        }
    }
    out
}
