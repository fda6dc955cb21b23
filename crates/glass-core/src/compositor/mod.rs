//! CPU evaluation of a [`FilterGraph`].
//!
//! Stages run in order on premultiplied float rasters sized to the filter
//! region. Time-independent noise fields are memoised per size; anything
//! driven by an animation envelope is recomputed for every call, so two
//! renders of the same inputs at different times may differ.

pub mod ops;
pub mod turbulence;

use crate::error::{GlassError, Result};
use crate::filter::{FilterDocument, FilterGraph, Input, NoiseKind, Primitive, TurbulenceParams};
use crate::raster::Raster;
use crate::texture::DisplacementTexture;
use fnv::FnvHashMap;
use glam::{Vec2, Vec4};
use std::sync::Arc;
use turbulence::PerlinLattice;

#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
struct NoiseKey {
    seed: i32,
    octaves: u32,
    kind: NoiseKind,
    frequency: [u32; 2],
    origin: [u32; 2],
    width: u32,
    height: u32,
}

/// Output of one [`FilterDocument`] render.
#[derive(Clone, Debug)]
pub struct RenderOutput {
    /// The filtered panel over the whole filter region.
    pub glass: Raster,
    /// The animated shimmer field, same size as `glass`.
    pub shimmer: Raster,
    /// Position of the source's top-left corner inside the region.
    pub source_offset: (u32, u32),
}

struct Scope<'a> {
    stage: usize,
    source: &'a Raster,
    alpha: &'a Raster,
    outputs: &'a [Raster],
    names: &'a FnvHashMap<&'a str, usize>,
}

impl<'a> Scope<'a> {
    fn resolve(&self, input: &Input) -> Result<&'a Raster> {
        match input {
            Input::SourceGraphic => Ok(self.source),
            Input::SourceAlpha => Ok(self.alpha),
            Input::Previous => Ok(self.outputs.last().unwrap_or(self.source)),
            Input::Named(name) => self
                .names
                .get(name.as_str())
                .map(|idx| &self.outputs[*idx])
                .ok_or_else(|| GlassError::UnknownInput {
                    stage: self.stage,
                    name: name.clone(),
                }),
        }
    }
}

pub struct Compositor {
    texture: Arc<DisplacementTexture>,
    lattices: FnvHashMap<i32, Box<PerlinLattice>>,
    static_noise: FnvHashMap<NoiseKey, Raster>,
}

impl Compositor {
    pub fn new(texture: Arc<DisplacementTexture>) -> Self {
        Self {
            texture,
            lattices: FnvHashMap::default(),
            static_noise: FnvHashMap::default(),
        }
    }

    pub fn with_shared_texture() -> Self {
        Self::new(crate::texture::shared())
    }

    pub fn texture(&self) -> &Arc<DisplacementTexture> {
        &self.texture
    }

    /// Render the glass filter and the shimmer field at time `t` seconds.
    pub fn render_document(
        &mut self,
        doc: &FilterDocument,
        source: &Raster,
        t: f32,
    ) -> Result<RenderOutput> {
        let glass = self.render(&doc.glass, source, t)?;
        let shimmer = self.render(&doc.shimmer, source, t)?;
        let (_, _, mx, my) = doc.glass.region.layout(source.width(), source.height());
        Ok(RenderOutput {
            glass,
            shimmer,
            source_offset: (mx, my),
        })
    }

    pub fn render(&mut self, graph: &FilterGraph, source: &Raster, t: f32) -> Result<Raster> {
        self.evaluate(graph, source, t, false).map(|(out, _)| out)
    }

    /// Like [`render`](Self::render) but also returns every named stage
    /// output, in stage order.
    pub fn render_traced(
        &mut self,
        graph: &FilterGraph,
        source: &Raster,
        t: f32,
    ) -> Result<(Raster, Vec<(String, Raster)>)> {
        self.evaluate(graph, source, t, true)
    }

    fn evaluate(
        &mut self,
        graph: &FilterGraph,
        source: &Raster,
        t: f32,
        trace: bool,
    ) -> Result<(Raster, Vec<(String, Raster)>)> {
        graph.validate()?;
        let t = if t.is_finite() { t } else { 0.0 };
        let (rw, rh, mx, my) = graph.region.layout(source.width(), source.height());
        let origin = -Vec2::new(mx as f32, my as f32);
        let source_graphic = source.padded(rw, rh, mx, my);
        let source_alpha = source_graphic.map(|p| Vec4::new(0.0, 0.0, 0.0, p.w));

        let mut outputs: Vec<Raster> = Vec::with_capacity(graph.stages.len());
        let mut names: FnvHashMap<&str, usize> = FnvHashMap::default();
        let mut traced = Vec::new();

        for (i, stage) in graph.stages.iter().enumerate() {
            let scope = Scope {
                stage: i,
                source: &source_graphic,
                alpha: &source_alpha,
                outputs: &outputs,
                names: &names,
            };
            let resolve = |input: &Input| scope.resolve(input);
            let out = match &stage.primitive {
                Primitive::Image => ops::image_cover(&self.texture, rw, rh),
                Primitive::Turbulence(params) => self.noise(params, rw, rh, origin, t),
                Primitive::Blend { mode, top, bottom } => {
                    ops::blend(*mode, resolve(top)?, resolve(bottom)?)
                }
                Primitive::GaussianBlur { input, std_dev } => {
                    ops::gaussian_blur(resolve(input)?, *std_dev)
                }
                Primitive::DisplacementMap {
                    input,
                    map,
                    scale,
                    x_channel,
                    y_channel,
                } => ops::displacement_map(
                    resolve(input)?,
                    resolve(map)?,
                    *scale,
                    *x_channel,
                    *y_channel,
                ),
                Primitive::ColorMatrix { input, matrix } => {
                    ops::color_matrix(resolve(input)?, matrix)
                }
                Primitive::DropShadow {
                    input,
                    dx,
                    dy,
                    std_dev,
                    opacity,
                } => ops::drop_shadow(resolve(input)?, *dx, *dy, *std_dev, *opacity),
            };
            if let Some(name) = &stage.result {
                names.insert(name.as_str(), outputs.len());
                if trace {
                    traced.push((name.clone(), out.clone()));
                }
            }
            outputs.push(out);
        }

        let result = outputs.pop().unwrap_or(source_graphic);
        log::trace!(
            "[compositor] {} stages -> {}x{}",
            graph.stages.len(),
            result.width(),
            result.height()
        );
        Ok((result, traced))
    }

    fn noise(
        &mut self,
        params: &TurbulenceParams,
        width: u32,
        height: u32,
        origin: Vec2,
        t: f32,
    ) -> Raster {
        let frequency = params.frequency_at(t);
        let lattice = self
            .lattices
            .entry(params.seed)
            .or_insert_with(|| PerlinLattice::new(params.seed));
        if params.animation.is_some() {
            return turbulence::render(
                lattice,
                width,
                height,
                origin,
                frequency,
                params.octaves,
                params.kind,
            );
        }
        let key = NoiseKey {
            seed: params.seed,
            octaves: params.octaves,
            kind: params.kind,
            frequency: [frequency.x.to_bits(), frequency.y.to_bits()],
            origin: [origin.x.to_bits(), origin.y.to_bits()],
            width,
            height,
        };
        self.static_noise
            .entry(key)
            .or_insert_with(|| {
                turbulence::render(
                    lattice,
                    width,
                    height,
                    origin,
                    frequency,
                    params.octaves,
                    params.kind,
                )
            })
            .clone()
    }
}
