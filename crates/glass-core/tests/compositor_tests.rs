// Host-side tests for the CPU filter evaluator and its primitives.

use glam::Vec4;
use glass_core::compositor::ops;
use glass_core::filter::*;
use glass_core::raster::Raster;
use glass_core::texture::generate_with_size;
use glass_core::{Compositor, GlassConfig, GlassError};
use rand::rngs::StdRng;
use rand::SeedableRng;
use std::sync::Arc;

fn compositor() -> Compositor {
    let tex = generate_with_size(32, &mut StdRng::seed_from_u64(42)).unwrap();
    Compositor::new(Arc::new(tex))
}

fn panel(w: u32, h: u32) -> Raster {
    Raster::filled(w, h, Vec4::new(0.4, 0.5, 0.6, 0.8))
}

fn approx(a: Vec4, b: Vec4) -> bool {
    (a - b).abs().max_element() < 1e-4
}

#[test]
fn output_covers_twice_the_source() {
    let mut c = compositor();
    let doc = FilterDocument::new("t", &GlassConfig::default());
    let out = c.render_document(&doc, &panel(10, 6), 0.0).unwrap();
    assert_eq!((out.glass.width(), out.glass.height()), (20, 12));
    assert_eq!((out.shimmer.width(), out.shimmer.height()), (20, 12));
    assert_eq!(out.source_offset, (5, 3));
}

#[test]
fn empty_source_and_nan_time_do_not_panic() {
    let mut c = compositor();
    let doc = FilterDocument::new("t", &GlassConfig::default());
    let out = c.render_document(&doc, &Raster::new(0, 0), 0.0).unwrap();
    assert!(out.glass.is_empty());
    let out = c.render_document(&doc, &panel(4, 4), f32::NAN).unwrap();
    assert!(out
        .glass
        .pixels()
        .iter()
        .all(|p| p.is_finite() && p.max_element() <= 1.0 + 1e-5));
}

#[test]
fn extreme_config_is_sanitized_before_rendering() {
    let mut c = compositor();
    let config = GlassConfig {
        displacement_scale: f32::INFINITY,
        refraction_amount: -3.0,
        shimmer_intensity: f32::NAN,
        blur_amount: 1e9,
        ..GlassConfig::default()
    };
    let doc = FilterDocument::new("t", &config);
    let out = c.render_document(&doc, &panel(6, 6), 3.0).unwrap();
    assert!(out.glass.pixels().iter().all(|p| p.is_finite()));
}

#[test]
fn traced_render_exposes_named_stages() {
    let mut c = compositor();
    let graph = glass_filter("t", &GlassConfig::default());
    let (out, traced) = c.render_traced(&graph, &panel(8, 8), 0.0).unwrap();
    assert_eq!(traced.len(), 14);
    assert_eq!(traced[0].0, DISPLACEMENT_MAP);
    assert_eq!(traced[13].0, SHIMMER);
    for (name, raster) in &traced {
        assert_eq!(
            (raster.width(), raster.height()),
            (out.width(), out.height()),
            "{name}"
        );
    }
}

#[test]
fn channel_stage_keeps_only_its_channel() {
    let mut c = compositor();
    let graph = glass_filter("t", &GlassConfig::default());
    let (_, traced) = c.render_traced(&graph, &panel(8, 8), 0.0).unwrap();
    let (_, g) = traced.iter().find(|(n, _)| n == G_CHANNEL).unwrap();
    assert!(g.pixels().iter().all(|p| p.x == 0.0 && p.z == 0.0));
}

#[test]
fn invalid_graph_is_reported() {
    let mut c = compositor();
    let mut graph = FilterGraph::new("bad");
    graph.push(Stage::new(Primitive::GaussianBlur {
        input: Input::named("NOPE"),
        std_dev: 1.0,
    }));
    assert!(matches!(
        c.render(&graph, &panel(4, 4), 0.0),
        Err(GlassError::UnknownInput { .. })
    ));
}

#[test]
fn shimmer_changes_over_time() {
    let mut c = compositor();
    let doc = FilterDocument::new("t", &GlassConfig::default());
    let a = c.render_document(&doc, &panel(16, 16), 0.0).unwrap();
    let b = c.render_document(&doc, &panel(16, 16), 5.0).unwrap();
    assert_ne!(a.shimmer, b.shimmer);
    // The glass graph itself has no animated stage.
    assert_eq!(a.glass, b.glass);
}

#[test]
fn screen_and_multiply_formulas() {
    let top = Raster::filled(1, 1, Vec4::new(0.5, 0.5, 0.5, 1.0));
    let bottom = Raster::filled(1, 1, Vec4::new(0.5, 0.0, 1.0, 1.0));
    let screen = ops::blend(BlendMode::Screen, &top, &bottom);
    assert!(approx(screen.get(0, 0), Vec4::new(0.75, 0.5, 1.0, 1.0)));
    let multiply = ops::blend(BlendMode::Multiply, &top, &bottom);
    assert!(approx(multiply.get(0, 0), Vec4::new(0.25, 0.0, 0.5, 1.0)));
}

#[test]
fn screen_with_transparent_is_identity() {
    let top = Raster::new(1, 1);
    let bottom = Raster::filled(1, 1, Vec4::new(0.2, 0.3, 0.4, 0.5));
    let out = ops::blend(BlendMode::Screen, &top, &bottom);
    assert!(approx(out.get(0, 0), bottom.get(0, 0)));
}

#[test]
fn color_matrix_isolates_red() {
    let src = Raster::filled(2, 2, Vec4::new(0.3, 0.6, 0.9, 1.0));
    let out = ops::color_matrix(&src, &channel_mask(Channel::R));
    assert!(approx(out.get(1, 1), Vec4::new(0.3, 0.0, 0.0, 1.0)));
}

#[test]
fn color_matrix_gain_is_clamped() {
    let src = Raster::filled(1, 1, Vec4::new(0.8, 0.1, 0.5, 1.0));
    let out = ops::color_matrix(&src, &rgb_gain(2.0));
    assert!(approx(out.get(0, 0), Vec4::new(1.0, 0.2, 1.0, 1.0)));
}

#[test]
fn neutral_map_does_not_displace() {
    let mut src = Raster::new(3, 3);
    src.set(1, 1, Vec4::ONE);
    let map = Raster::filled(3, 3, Vec4::new(0.5, 0.5, 0.5, 1.0));
    let out = ops::displacement_map(&src, &map, 100.0, Channel::R, Channel::G);
    assert_eq!(out, src);
}

#[test]
fn full_red_map_shifts_by_half_the_scale() {
    // R = 1 reads from x + scale * 0.5; G = 0.5 leaves y alone.
    let mut src = Raster::new(4, 1);
    src.set(3, 0, Vec4::ONE);
    let map = Raster::filled(4, 1, Vec4::new(1.0, 0.5, 0.0, 1.0));
    let out = ops::displacement_map(&src, &map, 4.0, Channel::R, Channel::G);
    assert_eq!(out.get(1, 0), Vec4::ONE);
    // Beyond the edge reads transparent.
    assert_eq!(out.get(3, 0), Vec4::ZERO);
}

#[test]
fn blur_preserves_total_energy_inside_bounds() {
    let mut src = Raster::new(21, 21);
    src.set(10, 10, Vec4::ONE);
    let out = ops::gaussian_blur(&src, 1.5);
    let total: f32 = out.pixels().iter().map(|p| p.w).sum();
    assert!((total - 1.0).abs() < 1e-3);
    assert!(out.get(10, 10).w < 1.0);
    assert!(out.get(10, 10).w > out.get(12, 10).w);
}

#[test]
fn zero_blur_is_identity() {
    let src = panel(3, 2);
    assert_eq!(ops::gaussian_blur(&src, 0.0), src);
    assert_eq!(ops::gaussian_blur(&src, f32::NAN), src);
}

#[test]
fn drop_shadow_falls_below_the_shape() {
    let mut src = Raster::new(9, 9);
    src.set(4, 2, Vec4::ONE);
    let out = ops::drop_shadow(&src, 0.0, 2.0, 0.0, 0.5);
    assert_eq!(out.get(4, 2), Vec4::ONE);
    assert!(approx(out.get(4, 4), Vec4::new(0.0, 0.0, 0.0, 0.5)));
    assert_eq!(out.get(4, 0), Vec4::ZERO);
}

#[test]
fn image_cover_fills_the_region() {
    let tex = generate_with_size(8, &mut StdRng::seed_from_u64(1)).unwrap();
    let out = ops::image_cover(&tex, 16, 4);
    assert_eq!((out.width(), out.height()), (16, 4));
    assert!(out.pixels().iter().all(|p| (p.w - 1.0).abs() < 1e-6));
}
