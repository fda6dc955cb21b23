// Host-side tests for the inline CSS builders.
// The main crate is wasm-only, so we include the pure-Rust modules directly.

#![allow(dead_code)]
mod constants {
    include!("../src/constants.rs");
}
mod style {
    include!("../src/style.rs");
}

use glam::Vec2;
use glass_core::decor::{compose_visual, GlassVisual, GlowLayer, ShadowLayer};
use glass_core::ripple::RippleSet;
use glass_core::{GlassConfig, GlassSize, InteractionController, PointerOverrides};
use instant::Instant;
use style::*;

fn visual_with(config: &GlassConfig, controller: &InteractionController) -> GlassVisual {
    compose_visual(
        &controller.snapshot(),
        config,
        GlassSize::default(),
        controller.is_hovered(),
        &RippleSet::default(),
        Instant::now(),
    )
}

#[test]
fn css_numbers_are_short_and_finite() {
    assert_eq!(css_num(1.0), "1");
    assert_eq!(css_num(40.0), "40");
    assert_eq!(css_num(2.5), "2.5");
    assert_eq!(css_num(0.333), "0.33");
    assert_eq!(css_num(-3.25), "-3.25");
    assert_eq!(css_num(-0.001), "0");
    assert_eq!(css_num(f32::NAN), "0");
    assert_eq!(css_num(f32::INFINITY), "0");
}

#[test]
fn glow_gradient_on_hover() {
    let glow = GlowLayer::new(GlassSize::default(), 0.5, true, false);
    assert_eq!(
        glow_background(&glow),
        "radial-gradient(circle at 50% 50%, rgba(138, 43, 226, 0.5) 0%, rgba(30, 144, 255, 0.25) 50%, transparent 70%)"
    );
}

#[test]
fn glow_gradient_idle_is_dimmer() {
    let glow = GlowLayer::new(GlassSize::default(), 0.5, false, false);
    let bg = glow_background(&glow);
    assert!(bg.contains("rgba(138, 43, 226, 0.15) 0%"), "{bg}");
    assert!(bg.contains("rgba(30, 144, 255, 0.05) 50%"), "{bg}");
}

#[test]
fn glow_style_sizes_and_hides_over_light() {
    let glow = GlowLayer::new(GlassSize::default(), 0.5, false, true);
    let css = glow_style(&glow, 999.0, (4.0, -2.0));
    assert!(css.contains("width: 370px; height: 169px;"), "{css}");
    assert!(css.contains("filter: blur(40px);"), "{css}");
    assert!(css.contains("opacity: 0;"), "{css}");
    assert!(css.contains("calc(-50% + 4px), calc(-50% + -2px)"), "{css}");
}

#[test]
fn box_shadow_alphas() {
    let dark = ShadowLayer::new(GlassSize::default(), false);
    assert_eq!(
        box_shadow(&dark),
        "0px 10px 40px rgba(0, 0, 0, 0.2), 0px 2px 10px rgba(0, 0, 0, 0.1)"
    );
    let light = ShadowLayer::new(GlassSize::default(), true);
    assert_eq!(
        box_shadow(&light),
        "0px 10px 40px rgba(0, 0, 0, 0.4), 0px 2px 10px rgba(0, 0, 0, 0.3)"
    );
}

#[test]
fn highlight_centred_without_pointer() {
    let visual = visual_with(&GlassConfig::default(), &InteractionController::default());
    let bg = highlight_background(&visual);
    assert!(bg.starts_with("radial-gradient(circle at 50% 50%"), "{bg}");
    assert!(bg.contains("rgba(255, 255, 255, 0.3) 0%"), "{bg}");
    assert!(bg.contains("rgba(255, 255, 255, 0) 60%"), "{bg}");
    assert!(bg.ends_with("rgba(255, 255, 255, 0.12)"), "{bg}");
}

#[test]
fn highlight_follows_mouse_offset_override() {
    let mut controller = InteractionController::default();
    controller.set_overrides(PointerOverrides {
        global_position: None,
        mouse_offset: Some(Vec2::new(20.0, -40.0)),
    });
    let visual = visual_with(&GlassConfig::default(), &controller);
    assert!(highlight_background(&visual).starts_with("radial-gradient(circle at 60% 30%"));
}

#[test]
fn panel_style_references_filter_when_available() {
    let visual = visual_with(&GlassConfig::default(), &InteractionController::default());
    let css = panel_style(&visual, Some("glass-7"));
    assert!(css.contains("padding: 24px 32px 24px 32px;"), "{css}");
    assert!(css.contains("border-radius: 999px;"), "{css}");
    assert!(css.contains("backdrop-filter: blur(12px) saturate(140%);"), "{css}");
    assert!(css.contains("-webkit-backdrop-filter: blur(12px) saturate(140%);"), "{css}");
    assert!(css.contains("transform: translate(0px, 0px);"), "{css}");
    assert!(css.contains("transition: transform 0.15s ease-out"), "{css}");
    assert!(css.ends_with("filter: url(#glass-7);"), "{css}");
    assert!(!css.contains("glass-7-turbulence"), "{css}");
}

#[test]
fn panel_style_unfiltered_without_texture() {
    let visual = visual_with(&GlassConfig::default(), &InteractionController::default());
    let css = panel_style(&visual, None);
    assert!(!css.contains("url(#"), "{css}");
}

#[test]
fn tint_opacity_tracks_aberration() {
    let visual = visual_with(&GlassConfig::default(), &InteractionController::default());
    assert!(tint_style(&visual).contains("opacity: 1;"));

    let config = GlassConfig {
        aberration_intensity: 1.0,
        ..GlassConfig::default()
    };
    let visual = visual_with(&config, &InteractionController::default());
    assert!(tint_style(&visual).contains("opacity: 0.5;"));
}

#[test]
fn tint_markup_fills_with_gradient() {
    let markup = tint_markup("glass-3-iridescent");
    assert!(markup.contains(r#"fill="url(#glass-3-iridescent)""#), "{markup}");
    assert!(markup.starts_with("<svg"));
}

#[test]
fn ripple_starts_small_and_runs_for_its_lifetime() {
    let css = ripple_style(10.0, 20.5);
    assert!(css.contains("left: 10px; top: 20.5px;"), "{css}");
    assert!(css.contains("width: 20px; height: 20px;"), "{css}");
    assert!(css.contains("animation: lg-ripple 600ms ease-out forwards;"), "{css}");
}
