//! SVG `<defs>` markup for a [`FilterDocument`].

use super::{BlendMode, Channel, FilterDocument, FilterGraph, Input, NoiseKind, Primitive, Stage};
use crate::animation::KeyframeLoop;
use glam::{Vec2, Vec3};
use std::fmt::Write;

/// Compact number formatting: no trailing zeros, no `-0`.
pub fn fmt_num(v: f32) -> String {
    if !v.is_finite() {
        return "0".to_string();
    }
    let rounded = (v * 10_000.0).round() / 10_000.0;
    if rounded == 0.0 {
        return "0".to_string();
    }
    let s = format!("{rounded:.4}");
    s.trim_end_matches('0').trim_end_matches('.').to_string()
}

fn fmt_pair(v: Vec2) -> String {
    format!("{} {}", fmt_num(v.x), fmt_num(v.y))
}

fn fmt_hex(c: Vec3) -> String {
    let [r, g, b] = (c.clamp(Vec3::ZERO, Vec3::ONE) * 255.0).round().to_array();
    format!("#{:02x}{:02x}{:02x}", r as u8, g as u8, b as u8)
}

fn escape_attr(s: &str) -> String {
    s.replace('&', "&amp;")
        .replace('"', "&quot;")
        .replace('<', "&lt;")
}

fn input_ref(input: &Input) -> Option<&str> {
    match input {
        Input::SourceGraphic => Some("SourceGraphic"),
        Input::SourceAlpha => Some("SourceAlpha"),
        Input::Previous => None,
        Input::Named(name) => Some(name.as_str()),
    }
}

fn attr(out: &mut String, name: &str, input: &Input) {
    if let Some(r) = input_ref(input) {
        let _ = write!(out, r#" {name}="{r}""#);
    }
}

fn channel_name(c: Channel) -> &'static str {
    match c {
        Channel::R => "R",
        Channel::G => "G",
        Channel::B => "B",
        Channel::A => "A",
    }
}

fn animate_values<T: Copy>(anim: &KeyframeLoop<T>, fmt: impl Fn(T) -> String) -> String {
    anim.values
        .iter()
        .map(|v| fmt(*v))
        .collect::<Vec<_>>()
        .join(";")
}

fn write_stage(out: &mut String, stage: &Stage, texture_href: Option<&str>) {
    let result = stage
        .result
        .as_deref()
        .map(|r| format!(r#" result="{r}""#))
        .unwrap_or_default();
    match &stage.primitive {
        Primitive::Image => {
            // Without a texture the image primitive renders transparent.
            let href = texture_href.map(escape_attr).unwrap_or_default();
            let _ = write!(
                out,
                r#"<feImage href="{href}"{result} preserveAspectRatio="xMidYMid slice"/>"#
            );
        }
        Primitive::Turbulence(p) => {
            let kind = match p.kind {
                NoiseKind::FractalNoise => "fractalNoise",
                NoiseKind::Turbulence => "turbulence",
            };
            let _ = write!(
                out,
                r#"<feTurbulence type="{kind}" baseFrequency="{}" numOctaves="{}" seed="{}"{result}>"#,
                fmt_pair(p.base_frequency),
                p.octaves,
                p.seed
            );
            if let Some(anim) = &p.animation {
                let _ = write!(
                    out,
                    r#"<animate attributeName="baseFrequency" dur="{}s" values="{}" repeatCount="indefinite"/>"#,
                    fmt_num(anim.period_sec),
                    animate_values(anim, fmt_pair)
                );
            }
            out.push_str("</feTurbulence>");
        }
        Primitive::Blend { mode, top, bottom } => {
            let op = match mode {
                BlendMode::Multiply => "multiply",
                BlendMode::Screen => "screen",
            };
            out.push_str("<feComposite");
            attr(out, "in", top);
            attr(out, "in2", bottom);
            let _ = write!(out, r#" operator="{op}"{result}/>"#);
        }
        Primitive::GaussianBlur { input, std_dev } => {
            out.push_str("<feGaussianBlur");
            attr(out, "in", input);
            let _ = write!(out, r#" stdDeviation="{}"{result}/>"#, fmt_num(*std_dev));
        }
        Primitive::DisplacementMap {
            input,
            map,
            scale,
            x_channel,
            y_channel,
        } => {
            out.push_str("<feDisplacementMap");
            attr(out, "in", input);
            attr(out, "in2", map);
            let _ = write!(
                out,
                r#" scale="{}" xChannelSelector="{}" yChannelSelector="{}"{result}/>"#,
                fmt_num(*scale),
                channel_name(*x_channel),
                channel_name(*y_channel)
            );
        }
        Primitive::ColorMatrix { input, matrix } => {
            out.push_str("<feColorMatrix");
            attr(out, "in", input);
            let rows = matrix
                .chunks(5)
                .map(|row| row.iter().map(|v| fmt_num(*v)).collect::<Vec<_>>().join(" "))
                .collect::<Vec<_>>()
                .join(" ");
            let _ = write!(out, r#" type="matrix" values="{rows}"{result}/>"#);
        }
        Primitive::DropShadow {
            input,
            dx,
            dy,
            std_dev,
            opacity,
        } => {
            out.push_str("<feDropShadow");
            attr(out, "in", input);
            let _ = write!(
                out,
                r#" dx="{}" dy="{}" stdDeviation="{}" flood-opacity="{}"{result}/>"#,
                fmt_num(*dx),
                fmt_num(*dy),
                fmt_num(*std_dev),
                fmt_num(*opacity)
            );
        }
    }
}

pub fn filter_markup(graph: &FilterGraph, texture_href: Option<&str>, full_region: bool) -> String {
    let mut out = String::new();
    let _ = write!(out, r#"<filter id="{}""#, escape_attr(&graph.id));
    if full_region {
        let m = graph.region.margin * 100.0;
        let _ = write!(
            out,
            r#" x="-{m}%" y="-{m}%" width="{w}%" height="{w}%" color-interpolation-filters="sRGB""#,
            m = fmt_num(m),
            w = fmt_num(100.0 + 2.0 * m)
        );
    }
    out.push('>');
    for stage in &graph.stages {
        write_stage(&mut out, stage, texture_href);
    }
    out.push_str("</filter>");
    out
}

/// Complete hidden `<svg>` element holding every definition a panel needs.
pub fn to_svg_defs(doc: &FilterDocument, texture_href: Option<&str>) -> String {
    let mut out = String::from(
        r#"<svg xmlns="http://www.w3.org/2000/svg" style="position:absolute;width:0;height:0" aria-hidden="true"><defs>"#,
    );
    out.push_str(&filter_markup(&doc.shimmer, None, false));
    out.push_str(&filter_markup(&doc.glass, texture_href, true));
    let _ = write!(
        out,
        r#"<linearGradient id="{}" x1="0%" y1="0%" x2="100%" y2="100%">"#,
        escape_attr(&doc.iridescent_id())
    );
    for stop in &doc.iridescent {
        let first = stop.colors.values.first().copied().unwrap_or(Vec3::ONE);
        let _ = write!(
            out,
            r#"<stop offset="{}%" stop-color="{}" stop-opacity="{}"><animate attributeName="stop-color" dur="{}s" values="{}" repeatCount="indefinite"/></stop>"#,
            fmt_num(stop.offset * 100.0),
            fmt_hex(first),
            fmt_num(stop.opacity),
            fmt_num(stop.colors.period_sec),
            animate_values(&stop.colors, fmt_hex)
        );
    }
    out.push_str("</linearGradient></defs></svg>");
    out
}
