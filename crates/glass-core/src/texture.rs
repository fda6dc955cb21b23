//! Procedural displacement texture.
//!
//! The texture is banded noise under a soft radial highlight. The banding
//! comes from a sine of the flat byte index rather than of the 2D position,
//! which gives diagonal organic streaks across rows.

use crate::constants::{
    ORGANIC_AMPLITUDE, ORGANIC_FREQUENCY, TEXTURE_GRADIENT_ALPHA, TEXTURE_SIZE,
};
use crate::error::{GlassError, Result};
use glam::Vec4;
use rand::Rng;
use std::sync::{Arc, OnceLock};

/// Immutable RGBA8 bitmap; fully opaque everywhere.
#[derive(Clone, PartialEq, Eq)]
pub struct DisplacementTexture {
    width: u32,
    height: u32,
    pixels: Vec<[u8; 4]>,
}

impl std::fmt::Debug for DisplacementTexture {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("DisplacementTexture")
            .field("width", &self.width)
            .field("height", &self.height)
            .finish_non_exhaustive()
    }
}

impl DisplacementTexture {
    pub fn width(&self) -> u32 {
        self.width
    }

    pub fn height(&self) -> u32 {
        self.height
    }

    pub fn pixel(&self, x: u32, y: u32) -> Option<[u8; 4]> {
        if x >= self.width || y >= self.height {
            return None;
        }
        self.pixels.get((y * self.width + x) as usize).copied()
    }

    pub fn pixels(&self) -> &[[u8; 4]] {
        &self.pixels
    }

    /// Row-major RGBA bytes, ready for `ImageData` or a GPU upload.
    pub fn as_rgba8(&self) -> &[u8] {
        bytemuck::cast_slice(&self.pixels)
    }

    /// Normalized colour at an integer position, clamped to the edges.
    pub fn sample(&self, x: i64, y: i64) -> Vec4 {
        let x = x.clamp(0, self.width as i64 - 1) as u32;
        let y = y.clamp(0, self.height as i64 - 1) as u32;
        let [r, g, b, a] = self.pixels[(y * self.width + x) as usize];
        Vec4::new(r as f32, g as f32, b as f32, a as f32) / 255.0
    }
}

pub fn generate(rng: &mut impl Rng) -> DisplacementTexture {
    build(TEXTURE_SIZE, rng)
}

pub fn generate_with_size(size: u32, rng: &mut impl Rng) -> Result<DisplacementTexture> {
    if size == 0 {
        return Err(GlassError::EmptyTexture);
    }
    Ok(build(size, rng))
}

fn build(size: u32, rng: &mut impl Rng) -> DisplacementTexture {
    let mut pixels = Vec::with_capacity((size * size) as usize);
    fill_noise(&mut pixels, size, size, rng);
    overlay_radial_gradient(&mut pixels, size, size);
    DisplacementTexture {
        width: size,
        height: size,
        pixels,
    }
}

fn fill_noise(pixels: &mut Vec<[u8; 4]>, width: u32, height: u32, rng: &mut impl Rng) {
    for p in 0..(width as usize * height as usize) {
        let byte_index = (p * 4) as f32;
        let noise: f32 = rng.gen();
        let organic = (byte_index * ORGANIC_FREQUENCY).sin() * ORGANIC_AMPLITUDE + ORGANIC_AMPLITUDE;
        let v = to_byte(noise * organic);
        pixels.push([v, v, v, 255]);
    }
}

// White at the centre fading to black at the edge, both at half alpha,
// drawn source-over on the opaque noise.
fn overlay_radial_gradient(pixels: &mut [[u8; 4]], width: u32, height: u32) {
    let cx = width as f32 / 2.0;
    let cy = height as f32 / 2.0;
    let radius = (width.min(height) as f32 / 2.0).max(f32::EPSILON);
    for y in 0..height {
        for x in 0..width {
            let dx = x as f32 + 0.5 - cx;
            let dy = y as f32 + 0.5 - cy;
            let t = ((dx * dx + dy * dy).sqrt() / radius).min(1.0);
            let gradient = 255.0 * (1.0 - t);
            let px = &mut pixels[(y * width + x) as usize];
            for c in px.iter_mut().take(3) {
                *c = to_byte(gradient * TEXTURE_GRADIENT_ALPHA + *c as f32 * (1.0 - TEXTURE_GRADIENT_ALPHA));
            }
        }
    }
}

#[inline]
fn to_byte(v: f32) -> u8 {
    v.round().clamp(0.0, 255.0) as u8
}

static SHARED: OnceLock<Arc<DisplacementTexture>> = OnceLock::new();

/// The process-wide texture, generated on first use.
pub fn shared() -> Arc<DisplacementTexture> {
    SHARED
        .get_or_init(|| {
            let texture = generate(&mut rand::thread_rng());
            log::info!(
                "[texture] generated {}x{} displacement map",
                texture.width,
                texture.height
            );
            Arc::new(texture)
        })
        .clone()
}
