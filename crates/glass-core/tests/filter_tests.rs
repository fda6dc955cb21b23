// Host-side tests for the filter graph builder and its SVG markup.

use glass_core::filter::svg::{fmt_num, to_svg_defs};
use glass_core::filter::*;
use glass_core::{GlassConfig, GlassError};

fn result_names(graph: &FilterGraph) -> Vec<Option<&str>> {
    graph.stages.iter().map(|s| s.result.as_deref()).collect()
}

#[test]
fn default_graph_is_valid_and_ordered() {
    let graph = glass_filter("g", &GlassConfig::default());
    graph.validate().unwrap();
    assert_eq!(
        result_names(&graph),
        vec![
            Some(DISPLACEMENT_MAP),
            Some(TURBULENCE),
            Some(COMBINED_DISPLACEMENT),
            Some(BLUR_SOURCE),
            Some(R_DISPLACED),
            Some(R_CHANNEL),
            Some(G_DISPLACED),
            Some(G_CHANNEL),
            Some(B_DISPLACED),
            Some(B_CHANNEL),
            Some(RG_COMBINED),
            Some(RGB_COMBINED),
            Some(GLOW),
            Some(SHIMMER),
            None,
            None,
        ]
    );
    assert!(matches!(
        graph.stages.last().unwrap().primitive,
        Primitive::DropShadow { .. }
    ));
}

#[test]
fn chromatic_split_scales_and_selectors() {
    let config = GlassConfig {
        displacement_scale: 50.0,
        refraction_amount: 2.0,
        ..GlassConfig::default()
    };
    let graph = glass_filter("g", &config);
    let expect = [
        (R_DISPLACED, 50.0, Channel::R, Channel::G),
        (G_DISPLACED, 110.0, Channel::G, Channel::B),
        (B_DISPLACED, 120.0, Channel::B, Channel::R),
    ];
    for (name, want_scale, want_x, want_y) in expect {
        match &graph.stage(name).unwrap().primitive {
            Primitive::DisplacementMap {
                input,
                map,
                scale,
                x_channel,
                y_channel,
            } => {
                assert_eq!(*input, Input::named(BLUR_SOURCE));
                assert_eq!(*map, Input::named(COMBINED_DISPLACEMENT));
                assert!((scale - want_scale).abs() < 1e-3, "{name}: {scale}");
                assert_eq!(*x_channel, want_x);
                assert_eq!(*y_channel, want_y);
            }
            other => panic!("{name} is {other:?}"),
        }
    }
}

#[test]
fn channel_masks_keep_one_channel_and_alpha() {
    let graph = glass_filter("g", &GlassConfig::default());
    for (name, channel) in [(R_CHANNEL, 0), (G_CHANNEL, 1), (B_CHANNEL, 2)] {
        let Primitive::ColorMatrix { matrix, .. } = &graph.stage(name).unwrap().primitive else {
            panic!("{name} is not a colour matrix");
        };
        for row in 0..4 {
            for col in 0..5 {
                let v = matrix[row * 5 + col];
                let keep = (row == channel && col == channel) || (row == 3 && col == 3);
                assert_eq!(v, if keep { 1.0 } else { 0.0 }, "{name}[{row}][{col}]");
            }
        }
    }
}

#[test]
fn shimmer_gain_follows_intensity() {
    let config = GlassConfig {
        shimmer_intensity: 0.75,
        ..GlassConfig::default()
    };
    let graph = glass_filter("g", &config);
    let Primitive::ColorMatrix { input, matrix } = &graph.stage(SHIMMER).unwrap().primitive else {
        panic!("shimmer is not a colour matrix");
    };
    assert_eq!(*input, Input::named(GLOW));
    assert_eq!(matrix[0], 1.75);
    assert_eq!(matrix[6], 1.75);
    assert_eq!(matrix[12], 1.75);
    assert_eq!(matrix[18], 1.0);
}

#[test]
fn static_turbulence_and_shadow_parameters() {
    let graph = glass_filter("g", &GlassConfig::default());
    let Primitive::Turbulence(p) = &graph.stage(TURBULENCE).unwrap().primitive else {
        panic!("turbulence stage missing");
    };
    assert_eq!(p.kind, NoiseKind::FractalNoise);
    assert_eq!(p.base_frequency, glam::Vec2::splat(0.01));
    assert_eq!(p.octaves, 2);
    assert!(p.animation.is_none());
    assert!(!graph.is_time_dependent());

    let Primitive::DropShadow {
        dx,
        dy,
        std_dev,
        opacity,
        ..
    } = graph.stages.last().unwrap().primitive
    else {
        panic!("last stage is not a drop shadow");
    };
    assert_eq!((dx, dy, std_dev, opacity), (0.0, 2.0, 4.0, 0.2));
}

#[test]
fn shimmer_filter_is_animated() {
    let doc = FilterDocument::new("panel", &GlassConfig::default());
    assert_eq!(doc.shimmer.id, "panel-turbulence");
    assert!(doc.shimmer.is_time_dependent());
    let Primitive::Turbulence(p) = &doc.shimmer.stages[0].primitive else {
        panic!("shimmer filter has no turbulence");
    };
    assert_eq!(p.octaves, 4);
    assert_eq!(p.seed, 2);
    let f0 = p.frequency_at(0.0);
    let f10 = p.frequency_at(10.0);
    assert!((f0 - glam::Vec2::new(0.02, 0.1)).length() < 1e-6);
    assert!((f10 - glam::Vec2::new(0.04, 0.2)).length() < 1e-6);
}

#[test]
fn unknown_input_is_rejected() {
    let mut graph = FilterGraph::new("bad");
    graph.push(Stage::named(
        Primitive::GaussianBlur {
            input: Input::named("MISSING"),
            std_dev: 1.0,
        },
        "OUT",
    ));
    assert_eq!(
        graph.validate(),
        Err(GlassError::UnknownInput {
            stage: 0,
            name: "MISSING".into()
        })
    );
}

#[test]
fn forward_reference_is_rejected() {
    let mut graph = FilterGraph::new("bad");
    graph
        .push(Stage::named(
            Primitive::GaussianBlur {
                input: Input::named("LATER"),
                std_dev: 1.0,
            },
            "FIRST",
        ))
        .push(Stage::named(Primitive::Image, "LATER"));
    assert!(matches!(
        graph.validate(),
        Err(GlassError::UnknownInput { stage: 0, .. })
    ));
}

#[test]
fn duplicate_result_is_rejected() {
    let mut graph = FilterGraph::new("bad");
    graph
        .push(Stage::named(Primitive::Image, "A"))
        .push(Stage::named(Primitive::Image, "A"));
    assert_eq!(graph.validate(), Err(GlassError::DuplicateResult("A".into())));
}

#[test]
fn previous_on_first_stage_is_rejected() {
    let mut graph = FilterGraph::new("bad");
    graph.push(Stage::new(Primitive::GaussianBlur {
        input: Input::Previous,
        std_dev: 1.0,
    }));
    assert_eq!(graph.validate(), Err(GlassError::NoPreviousResult(0)));
}

#[test]
fn filter_ids_are_unique() {
    let a = unique_filter_id();
    let b = unique_filter_id();
    assert_ne!(a, b);
    assert!(a.starts_with("liquid-glass-"));
}

#[test]
fn region_grows_by_half_on_every_side() {
    let region = FilterRegion::default();
    assert_eq!(region.layout(100, 40), (200, 80, 50, 20));
    assert_eq!(region.layout(0, 0), (0, 0, 0, 0));
}

#[test]
fn numbers_are_formatted_compactly() {
    assert_eq!(fmt_num(70.0), "70");
    assert_eq!(fmt_num(0.5), "0.5");
    assert_eq!(fmt_num(-0.0), "0");
    assert_eq!(fmt_num(f32::NAN), "0");
    assert_eq!(fmt_num(84.7), "84.7");
}

#[test]
fn svg_defs_contain_every_definition() {
    let doc = FilterDocument::new("lg", &GlassConfig::default());
    let svg = to_svg_defs(&doc, Some("data:image/png;base64,AAAA"));
    assert!(svg.starts_with("<svg"));
    assert!(svg.contains(r#"<filter id="lg-turbulence">"#));
    assert!(svg.contains(r#"<filter id="lg" x="-50%" y="-50%" width="200%" height="200%""#));
    assert!(svg.contains(r#"href="data:image/png;base64,AAAA""#));
    assert!(svg.contains(r#"values="0.02 0.1;0.04 0.2;0.02 0.1""#));
    assert!(svg.contains(r#"operator="multiply""#));
    assert!(svg.contains(r#"xChannelSelector="B" yChannelSelector="R""#));
    assert!(svg.contains(r#"<linearGradient id="lg-iridescent""#));
    assert!(svg.contains(r##"values="#ff00ff;#00ffff;#ffff00;#ff00ff""##));
    assert!(svg.contains(r#"flood-opacity="0.2""#));
    assert!(svg.ends_with("</svg>"));
}

#[test]
fn svg_without_texture_has_empty_image() {
    let doc = FilterDocument::new("lg", &GlassConfig::default());
    let svg = to_svg_defs(&doc, None);
    assert!(svg.contains(r#"<feImage href="""#));
}
