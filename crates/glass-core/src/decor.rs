//! Per-frame render state derived from pointer state and configuration.
//!
//! Nothing here touches a surface: the web front-end turns a [`GlassVisual`]
//! into inline styles and the native viewer rasterizes it.

use crate::config::{GlassConfig, Padding};
use crate::constants::{
    GLOW_BLUR_PX, GLOW_EXTENT, GLOW_IDLE_FACTOR, GLOW_INNER_RGB, GLOW_MID_HOVER_FACTOR,
    GLOW_MID_IDLE_FACTOR, GLOW_MID_RGB, SHADOW_ALPHAS, SHADOW_ALPHAS_OVER_LIGHT,
};
use crate::interaction::{GlassSize, PointerSnapshot};
use crate::raster::{premultiply, unpremultiply};
use crate::ripple::{RippleAppearance, RippleSet};
use glam::{Vec2, Vec4};
use instant::Instant;

/// One colour stop of a radial gradient; `color` is straight-alpha RGBA.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct ColorStop {
    pub offset: f32,
    pub color: Vec4,
}

#[derive(Clone, Copy, Debug, PartialEq)]
pub struct GlowLayer {
    pub width: f32,
    pub height: f32,
    pub stops: [ColorStop; 3],
    pub blur_px: f32,
    pub opacity: f32,
}

impl GlowLayer {
    pub fn new(size: GlassSize, glow_intensity: f32, hovered: bool, over_light: bool) -> Self {
        let (inner, mid) = if hovered {
            (glow_intensity, glow_intensity * GLOW_MID_HOVER_FACTOR)
        } else {
            (
                glow_intensity * GLOW_IDLE_FACTOR,
                glow_intensity * GLOW_MID_IDLE_FACTOR,
            )
        };
        let rgb = |c: [u8; 3], a: f32| {
            Vec4::new(c[0] as f32 / 255.0, c[1] as f32 / 255.0, c[2] as f32 / 255.0, a)
        };
        Self {
            width: size.width + GLOW_EXTENT,
            height: size.height + GLOW_EXTENT,
            stops: [
                ColorStop {
                    offset: 0.0,
                    color: rgb(GLOW_INNER_RGB, inner),
                },
                ColorStop {
                    offset: 0.5,
                    color: rgb(GLOW_MID_RGB, mid),
                },
                ColorStop {
                    offset: 0.7,
                    color: Vec4::ZERO,
                },
            ],
            blur_px: GLOW_BLUR_PX,
            opacity: if over_light { 0.0 } else { 1.0 },
        }
    }

    /// Straight-alpha colour at normalized radius `r` (0 centre, 1 edge).
    /// Interpolation happens on premultiplied colour so the fade into
    /// transparent does not darken.
    pub fn color_at(&self, r: f32) -> Vec4 {
        let r = if r.is_finite() { r.max(0.0) } else { 0.0 };
        let first = self.stops[0];
        if r <= first.offset {
            return first.color;
        }
        for pair in self.stops.windows(2) {
            let (a, b) = (pair[0], pair[1]);
            if r <= b.offset {
                let k = (r - a.offset) / (b.offset - a.offset);
                return unpremultiply(premultiply(a.color).lerp(premultiply(b.color), k));
            }
        }
        self.stops[2].color
    }
}

#[derive(Clone, Copy, Debug, PartialEq)]
pub struct BoxShadow {
    pub dx: f32,
    pub dy: f32,
    pub blur: f32,
    pub alpha: f32,
}

#[derive(Clone, Copy, Debug, PartialEq)]
pub struct ShadowLayer {
    pub width: f32,
    pub height: f32,
    pub shadows: [BoxShadow; 2],
}

impl ShadowLayer {
    pub fn new(size: GlassSize, over_light: bool) -> Self {
        let [far, near] = if over_light {
            SHADOW_ALPHAS_OVER_LIGHT
        } else {
            SHADOW_ALPHAS
        };
        Self {
            width: size.width,
            height: size.height,
            shadows: [
                BoxShadow {
                    dx: 0.0,
                    dy: 10.0,
                    blur: 40.0,
                    alpha: far,
                },
                BoxShadow {
                    dx: 0.0,
                    dy: 2.0,
                    blur: 10.0,
                    alpha: near,
                },
            ],
        }
    }
}

#[derive(Clone, Debug, PartialEq)]
pub struct GlassVisual {
    pub size: GlassSize,
    pub translation: Vec2,
    /// Specular highlight centre, percent of the panel box.
    pub highlight: Vec2,
    pub corner_radius: f32,
    /// Radius clamped to half the shorter side, for rasterization.
    pub effective_radius: f32,
    pub padding: Padding,
    pub blur_amount: f32,
    pub saturation: f32,
    pub aberration_intensity: f32,
    /// Easing time of the translation, seconds.
    pub elasticity: f32,
    pub hovered: bool,
    pub over_light: bool,
    pub glow: GlowLayer,
    pub shadow: ShadowLayer,
    pub ripples: Vec<RippleAppearance>,
}

impl GlassVisual {
    /// Opacity of the iridescent overlay; the default aberration gives 1.
    pub fn fringe_opacity(&self) -> f32 {
        (self.aberration_intensity * 0.5).clamp(0.0, 1.0)
    }
}

pub fn highlight_position(mouse_offset: Vec2) -> Vec2 {
    let h = Vec2::splat(50.0) + mouse_offset / 2.0;
    if h.is_finite() {
        h.clamp(Vec2::ZERO, Vec2::splat(100.0))
    } else {
        Vec2::splat(50.0)
    }
}

pub fn compose_visual(
    snapshot: &PointerSnapshot,
    config: &GlassConfig,
    size: GlassSize,
    hovered: bool,
    ripples: &RippleSet,
    now: Instant,
) -> GlassVisual {
    let config = config.sanitized();
    let size = GlassSize {
        width: size.width.max(0.0),
        height: size.height.max(0.0),
    };
    let translation = if snapshot.magnetic_offset.is_finite() {
        snapshot.magnetic_offset
    } else {
        Vec2::ZERO
    };
    GlassVisual {
        size,
        translation,
        highlight: highlight_position(snapshot.mouse_offset),
        corner_radius: config.corner_radius,
        effective_radius: config.corner_radius.min(size.width.min(size.height) / 2.0),
        padding: config.padding,
        blur_amount: config.blur_amount,
        saturation: config.saturation,
        aberration_intensity: config.aberration_intensity,
        elasticity: config.elasticity,
        hovered,
        over_light: config.over_light,
        glow: GlowLayer::new(size, config.glow_intensity, hovered, config.over_light),
        shadow: ShadowLayer::new(size, config.over_light),
        ripples: ripples.appearances(now),
    }
}
