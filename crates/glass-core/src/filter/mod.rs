//! The glass filter as a directed acyclic graph of named stages.
//!
//! Every panel shares the same structure built by [`glass_filter`]; only the
//! numeric inputs derived from its [`GlassConfig`] differ. The graph can be
//! rendered to SVG markup (see [`svg`]) or evaluated on the CPU by
//! [`crate::compositor::Compositor`].

pub mod svg;

use crate::animation::{self, KeyframeLoop};
use crate::config::GlassConfig;
use crate::constants::*;
use crate::error::{GlassError, Result};
use fnv::FnvHashSet;
use glam::Vec2;
use std::sync::atomic::{AtomicU64, Ordering};

// Result names used by the glass graph.
pub const DISPLACEMENT_MAP: &str = "DISPLACEMENT_MAP";
pub const TURBULENCE: &str = "TURBULENCE";
pub const COMBINED_DISPLACEMENT: &str = "COMBINED_DISPLACEMENT";
pub const BLUR_SOURCE: &str = "BLUR_SOURCE";
pub const R_DISPLACED: &str = "R_DISPLACED";
pub const R_CHANNEL: &str = "R_CHANNEL";
pub const G_DISPLACED: &str = "G_DISPLACED";
pub const G_CHANNEL: &str = "G_CHANNEL";
pub const B_DISPLACED: &str = "B_DISPLACED";
pub const B_CHANNEL: &str = "B_CHANNEL";
pub const RG_COMBINED: &str = "RG_COMBINED";
pub const RGB_COMBINED: &str = "RGB_COMBINED";
pub const GLOW: &str = "GLOW";
pub const SHIMMER: &str = "SHIMMER";

static NEXT_FILTER_ID: AtomicU64 = AtomicU64::new(0);

/// A process-unique filter id.
pub fn unique_filter_id() -> String {
    format!("liquid-glass-{}", NEXT_FILTER_ID.fetch_add(1, Ordering::Relaxed))
}

#[derive(Clone, Debug, PartialEq, Eq, Hash)]
pub enum Input {
    SourceGraphic,
    SourceAlpha,
    Previous,
    Named(String),
}

impl Input {
    pub fn named(name: &str) -> Self {
        Input::Named(name.to_string())
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum Channel {
    R,
    G,
    B,
    A,
}

impl Channel {
    pub fn index(self) -> usize {
        match self {
            Channel::R => 0,
            Channel::G => 1,
            Channel::B => 2,
            Channel::A => 3,
        }
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum NoiseKind {
    FractalNoise,
    Turbulence,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum BlendMode {
    Multiply,
    Screen,
}

#[derive(Clone, Debug, PartialEq)]
pub struct TurbulenceParams {
    pub kind: NoiseKind,
    pub base_frequency: Vec2,
    pub octaves: u32,
    pub seed: i32,
    /// Base frequency envelope; the field is static when `None`.
    pub animation: Option<KeyframeLoop<Vec2>>,
}

impl TurbulenceParams {
    pub fn frequency_at(&self, t: f32) -> Vec2 {
        self.animation
            .as_ref()
            .and_then(|a| a.value_at(t))
            .unwrap_or(self.base_frequency)
    }
}

/// Row-major 4×5 colour matrix applied to unpremultiplied `[r, g, b, a, 1]`.
pub type ColorMatrix = [f32; 20];

pub fn channel_mask(channel: Channel) -> ColorMatrix {
    let mut m = [0.0; 20];
    let c = channel.index();
    m[c * 5 + c] = 1.0;
    m[18] = 1.0;
    m
}

pub fn rgb_gain(gain: f32) -> ColorMatrix {
    let mut m = [0.0; 20];
    m[0] = gain;
    m[6] = gain;
    m[12] = gain;
    m[18] = 1.0;
    m
}

#[derive(Clone, Debug, PartialEq)]
pub enum Primitive {
    /// The shared displacement texture, scaled to cover the region
    /// (`preserveAspectRatio="xMidYMid slice"`).
    Image,
    Turbulence(TurbulenceParams),
    Blend {
        mode: BlendMode,
        top: Input,
        bottom: Input,
    },
    GaussianBlur {
        input: Input,
        std_dev: f32,
    },
    DisplacementMap {
        input: Input,
        map: Input,
        scale: f32,
        x_channel: Channel,
        y_channel: Channel,
    },
    ColorMatrix {
        input: Input,
        matrix: ColorMatrix,
    },
    DropShadow {
        input: Input,
        dx: f32,
        dy: f32,
        std_dev: f32,
        opacity: f32,
    },
}

impl Primitive {
    pub fn inputs(&self) -> Vec<&Input> {
        match self {
            Primitive::Image | Primitive::Turbulence(_) => Vec::new(),
            Primitive::Blend { top, bottom, .. } => vec![top, bottom],
            Primitive::GaussianBlur { input, .. }
            | Primitive::ColorMatrix { input, .. }
            | Primitive::DropShadow { input, .. } => vec![input],
            Primitive::DisplacementMap { input, map, .. } => vec![input, map],
        }
    }

    pub fn is_time_dependent(&self) -> bool {
        matches!(self, Primitive::Turbulence(p) if p.animation.is_some())
    }
}

#[derive(Clone, Debug, PartialEq)]
pub struct Stage {
    pub primitive: Primitive,
    pub result: Option<String>,
}

impl Stage {
    pub fn new(primitive: Primitive) -> Self {
        Self {
            primitive,
            result: None,
        }
    }

    pub fn named(primitive: Primitive, result: &str) -> Self {
        Self {
            primitive,
            result: Some(result.to_string()),
        }
    }
}

/// Region the filter renders into, relative to the source bounds.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct FilterRegion {
    /// Fraction of the source size added on every side.
    pub margin: f32,
}

impl Default for FilterRegion {
    fn default() -> Self {
        Self {
            margin: FILTER_REGION_MARGIN,
        }
    }
}

impl FilterRegion {
    /// Region size and the source's offset inside it, in whole pixels.
    pub fn layout(&self, width: u32, height: u32) -> (u32, u32, u32, u32) {
        let mx = (width as f32 * self.margin).round().max(0.0) as u32;
        let my = (height as f32 * self.margin).round().max(0.0) as u32;
        (width + 2 * mx, height + 2 * my, mx, my)
    }
}

#[derive(Clone, Debug, PartialEq)]
pub struct FilterGraph {
    pub id: String,
    pub region: FilterRegion,
    pub stages: Vec<Stage>,
}

impl FilterGraph {
    pub fn new(id: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            region: FilterRegion::default(),
            stages: Vec::new(),
        }
    }

    pub fn push(&mut self, stage: Stage) -> &mut Self {
        self.stages.push(stage);
        self
    }

    /// Check that every named input refers to an earlier result and that
    /// result names are unique. Stages run in order, so a valid graph is
    /// acyclic by construction.
    pub fn validate(&self) -> Result<()> {
        let mut seen = FnvHashSet::default();
        for (i, stage) in self.stages.iter().enumerate() {
            for input in stage.primitive.inputs() {
                match input {
                    Input::Named(name) if !seen.contains(name.as_str()) => {
                        return Err(GlassError::UnknownInput {
                            stage: i,
                            name: name.clone(),
                        });
                    }
                    Input::Previous if i == 0 => return Err(GlassError::NoPreviousResult(i)),
                    _ => {}
                }
            }
            if let Some(name) = &stage.result {
                if !seen.insert(name.as_str()) {
                    return Err(GlassError::DuplicateResult(name.clone()));
                }
            }
        }
        Ok(())
    }

    pub fn stage(&self, result: &str) -> Option<&Stage> {
        self.stages
            .iter()
            .find(|s| s.result.as_deref() == Some(result))
    }

    pub fn is_time_dependent(&self) -> bool {
        self.stages.iter().any(|s| s.primitive.is_time_dependent())
    }
}

/// Everything a panel mounts: the glass filter, the animated shimmer field
/// and the iridescent gradient definition.
#[derive(Clone, Debug, PartialEq)]
pub struct FilterDocument {
    pub glass: FilterGraph,
    pub shimmer: FilterGraph,
    pub iridescent: Vec<animation::GradientStop>,
}

impl FilterDocument {
    pub fn new(id: &str, config: &GlassConfig) -> Self {
        Self {
            glass: glass_filter(id, config),
            shimmer: shimmer_filter(&format!("{id}-turbulence")),
            iridescent: animation::iridescent_gradient(),
        }
    }

    pub fn id(&self) -> &str {
        &self.glass.id
    }

    pub fn iridescent_id(&self) -> String {
        format!("{}-iridescent", self.glass.id)
    }
}

pub fn shimmer_filter(id: &str) -> FilterGraph {
    let frequency = animation::shimmer_frequency();
    let mut graph = FilterGraph::new(id);
    graph.push(Stage::new(Primitive::Turbulence(TurbulenceParams {
        kind: NoiseKind::FractalNoise,
        base_frequency: Vec2::from_array(SHIMMER_TURBULENCE_FREQUENCIES[0]),
        octaves: SHIMMER_TURBULENCE_OCTAVES,
        seed: SHIMMER_TURBULENCE_SEED,
        animation: Some(frequency),
    })));
    graph
}

pub fn glass_filter(id: &str, config: &GlassConfig) -> FilterGraph {
    let config = config.sanitized();
    let scale = config.displacement_scale;
    let refraction = config.refraction_amount;
    let displaced = Input::named(BLUR_SOURCE);
    let map = Input::named(COMBINED_DISPLACEMENT);

    let mut graph = FilterGraph::new(id);
    graph
        .push(Stage::named(Primitive::Image, DISPLACEMENT_MAP))
        .push(Stage::named(
            Primitive::Turbulence(TurbulenceParams {
                kind: NoiseKind::FractalNoise,
                base_frequency: Vec2::from_array(STATIC_TURBULENCE_FREQUENCY),
                octaves: STATIC_TURBULENCE_OCTAVES,
                seed: 0,
                animation: None,
            }),
            TURBULENCE,
        ))
        .push(Stage::named(
            Primitive::Blend {
                mode: BlendMode::Multiply,
                top: Input::named(DISPLACEMENT_MAP),
                bottom: Input::named(TURBULENCE),
            },
            COMBINED_DISPLACEMENT,
        ))
        .push(Stage::named(
            Primitive::GaussianBlur {
                input: Input::SourceGraphic,
                std_dev: SOURCE_BLUR_STD_DEV,
            },
            BLUR_SOURCE,
        ));

    // Red is left unscaled by `refraction`.
    let channels = [
        (scale, Channel::R, Channel::G, Channel::R, R_DISPLACED, R_CHANNEL),
        (
            scale * refraction * GREEN_SCALE_FACTOR,
            Channel::G,
            Channel::B,
            Channel::G,
            G_DISPLACED,
            G_CHANNEL,
        ),
        (
            scale * refraction * BLUE_SCALE_FACTOR,
            Channel::B,
            Channel::R,
            Channel::B,
            B_DISPLACED,
            B_CHANNEL,
        ),
    ];
    for (scale, x_channel, y_channel, keep, displaced_name, channel_name) in channels {
        graph
            .push(Stage::named(
                Primitive::DisplacementMap {
                    input: displaced.clone(),
                    map: map.clone(),
                    scale,
                    x_channel,
                    y_channel,
                },
                displaced_name,
            ))
            .push(Stage::named(
                Primitive::ColorMatrix {
                    input: Input::named(displaced_name),
                    matrix: channel_mask(keep),
                },
                channel_name,
            ));
    }

    graph
        .push(Stage::named(
            Primitive::Blend {
                mode: BlendMode::Screen,
                top: Input::named(R_CHANNEL),
                bottom: Input::named(G_CHANNEL),
            },
            RG_COMBINED,
        ))
        .push(Stage::named(
            Primitive::Blend {
                mode: BlendMode::Screen,
                top: Input::named(RG_COMBINED),
                bottom: Input::named(B_CHANNEL),
            },
            RGB_COMBINED,
        ))
        .push(Stage::named(
            Primitive::GaussianBlur {
                input: Input::named(RGB_COMBINED),
                std_dev: GLOW_BLUR_STD_DEV,
            },
            GLOW,
        ))
        .push(Stage::named(
            Primitive::ColorMatrix {
                input: Input::named(GLOW),
                matrix: rgb_gain(1.0 + config.shimmer_intensity),
            },
            SHIMMER,
        ))
        .push(Stage::new(Primitive::Blend {
            mode: BlendMode::Screen,
            top: Input::named(SHIMMER),
            bottom: Input::named(RGB_COMBINED),
        }))
        .push(Stage::new(Primitive::DropShadow {
            input: Input::Previous,
            dx: 0.0,
            dy: SHADOW_DY,
            std_dev: SHADOW_STD_DEV,
            opacity: SHADOW_OPACITY,
        }));
    graph
}
