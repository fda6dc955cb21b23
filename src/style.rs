// Inline CSS for the panel layers, built from a `GlassVisual`.
//
// Pure string builders; the frame loop writes the results into
// `style` attributes.

use crate::constants::{LAYER_TRANSITION_MS, RIPPLE_ANIMATION, RIPPLE_FILL};
use glass_core::constants::{
    BODY_ALPHA, BODY_ALPHA_OVER_LIGHT, HIGHLIGHT_ALPHA, HIGHLIGHT_ALPHA_HOVER, HIGHLIGHT_EXTENT,
    RIPPLE_LIFETIME, RIPPLE_START_DIAMETER,
};
use glass_core::decor::{ColorStop, GlassVisual, GlowLayer, ShadowLayer};

/// CSS number: at most two decimals, no trailing zeros, never `-0`.
pub fn css_num(v: f32) -> String {
    if !v.is_finite() {
        return "0".to_string();
    }
    let rounded = (v * 100.0).round() / 100.0;
    if rounded == 0.0 {
        return "0".to_string();
    }
    let s = format!("{rounded:.2}");
    s.trim_end_matches('0').trim_end_matches('.').to_string()
}

fn px(v: f32) -> String {
    format!("{}px", css_num(v))
}

fn rgba(stop: &ColorStop) -> String {
    let c = stop.color;
    if c.w <= 0.0 {
        return "transparent".to_string();
    }
    format!(
        "rgba({}, {}, {}, {})",
        (c.x * 255.0).round() as u8,
        (c.y * 255.0).round() as u8,
        (c.z * 255.0).round() as u8,
        css_num(c.w)
    )
}

/// `background` of the glow layer: a circular radial gradient over its stops.
pub fn glow_background(glow: &GlowLayer) -> String {
    let stops = glow
        .stops
        .iter()
        .map(|s| format!("{} {}%", rgba(s), css_num(s.offset * 100.0)))
        .collect::<Vec<_>>()
        .join(", ");
    format!("radial-gradient(circle at 50% 50%, {stops})")
}

pub fn glow_style(glow: &GlowLayer, corner_radius: f32, translation: (f32, f32)) -> String {
    format!(
        "width: {}; height: {}; border-radius: {}; background: {}; filter: blur({}); opacity: {}; transform: translate(calc(-50% + {}), calc(-50% + {}));",
        px(glow.width),
        px(glow.height),
        px(corner_radius),
        glow_background(glow),
        px(glow.blur_px),
        css_num(glow.opacity),
        px(translation.0),
        px(translation.1)
    )
}

pub fn box_shadow(shadow: &ShadowLayer) -> String {
    shadow
        .shadows
        .iter()
        .map(|s| {
            format!(
                "{} {} {} rgba(0, 0, 0, {})",
                px(s.dx),
                px(s.dy),
                px(s.blur),
                css_num(s.alpha)
            )
        })
        .collect::<Vec<_>>()
        .join(", ")
}

pub fn shadow_style(shadow: &ShadowLayer, corner_radius: f32, translation: (f32, f32)) -> String {
    format!(
        "width: {}; height: {}; border-radius: {}; box-shadow: {}; transform: translate(calc(-50% + {}), calc(-50% + {}));",
        px(shadow.width),
        px(shadow.height),
        px(corner_radius),
        box_shadow(shadow),
        px(translation.0),
        px(translation.1)
    )
}

/// Specular highlight centred on the pointer-derived position.
pub fn highlight_background(visual: &GlassVisual) -> String {
    let alpha = if visual.hovered {
        HIGHLIGHT_ALPHA_HOVER
    } else {
        HIGHLIGHT_ALPHA
    };
    let body = if visual.over_light {
        BODY_ALPHA_OVER_LIGHT
    } else {
        BODY_ALPHA
    };
    format!(
        "radial-gradient(circle at {}% {}%, rgba(255, 255, 255, {}) 0%, rgba(255, 255, 255, 0) {}%), rgba(255, 255, 255, {})",
        css_num(visual.highlight.x),
        css_num(visual.highlight.y),
        css_num(alpha),
        css_num(HIGHLIGHT_EXTENT * 100.0),
        css_num(body)
    )
}

/// The glass body. `filter_id` is `None` when the texture could not be
/// encoded; the panel then renders unfiltered.
pub fn panel_style(visual: &GlassVisual, filter_id: Option<&str>) -> String {
    let p = &visual.padding;
    let mut css = format!(
        "padding: {} {} {} {}; border-radius: {}; background: {}; backdrop-filter: blur({}) saturate({}%); -webkit-backdrop-filter: blur({}) saturate({}%); transform: translate({}, {}); transition: transform {}s ease-out, background {}ms;",
        px(p.top),
        px(p.right),
        px(p.bottom),
        px(p.left),
        px(visual.corner_radius),
        highlight_background(visual),
        px(visual.blur_amount),
        css_num(visual.saturation),
        px(visual.blur_amount),
        css_num(visual.saturation),
        px(visual.translation.x),
        px(visual.translation.y),
        css_num(visual.elasticity),
        LAYER_TRANSITION_MS
    );
    if let Some(id) = filter_id {
        css.push_str(&format!(" filter: url(#{id});"));
    }
    css
}

/// Iridescent overlay opacity grows with the aberration intensity.
pub fn tint_style(visual: &GlassVisual) -> String {
    format!(
        "border-radius: {}; opacity: {};",
        px(visual.corner_radius),
        css_num(visual.fringe_opacity())
    )
}

/// Markup for the tint layer: a rect filled with the animated gradient.
pub fn tint_markup(gradient_id: &str) -> String {
    format!(
        r#"<svg width="100%" height="100%" preserveAspectRatio="none"><rect width="100%" height="100%" fill="url(#{gradient_id})"/></svg>"#
    )
}

/// A ripple span centred at (`x`, `y`) in panel pixels; the browser
/// animates size and opacity.
pub fn ripple_style(x: f32, y: f32) -> String {
    format!(
        "left: {}; top: {}; width: {}; height: {}; background: {RIPPLE_FILL}; animation: {RIPPLE_ANIMATION} {}ms ease-out forwards;",
        px(x),
        px(y),
        px(RIPPLE_START_DIAMETER),
        px(RIPPLE_START_DIAMETER),
        RIPPLE_LIFETIME.as_millis()
    )
}
