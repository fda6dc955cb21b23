//! Perlin turbulence as defined for `feTurbulence`.
//!
//! The lattice and gradients come from the reference Park–Miller generator so
//! a given seed produces the same field as a browser would.

use crate::filter::NoiseKind;
use crate::raster::{premultiply, Raster};
use glam::{Vec2, Vec4};

const B_SIZE: usize = 0x100;
const B_MASK: i32 = 0xff;
const PERLIN_N: f32 = 4096.0;

const RAND_M: i64 = 2_147_483_647;
const RAND_A: i64 = 16_807;
const RAND_Q: i64 = 127_773;
const RAND_R: i64 = 2_836;

fn setup_seed(seed: i64) -> i64 {
    let mut seed = seed;
    if seed <= 0 {
        seed = -(seed % (RAND_M - 1)) + 1;
    }
    if seed > RAND_M - 1 {
        seed = RAND_M - 1;
    }
    seed
}

fn next_random(seed: i64) -> i64 {
    let mut result = RAND_A * (seed % RAND_Q) - RAND_R * (seed / RAND_Q);
    if result <= 0 {
        result += RAND_M;
    }
    result
}

pub struct PerlinLattice {
    selector: [usize; B_SIZE + B_SIZE + 2],
    gradient: [[[f32; 2]; B_SIZE + B_SIZE + 2]; 4],
}

impl PerlinLattice {
    pub fn new(seed: i32) -> Box<Self> {
        let mut lattice = Box::new(Self {
            selector: [0; B_SIZE + B_SIZE + 2],
            gradient: [[[0.0; 2]; B_SIZE + B_SIZE + 2]; 4],
        });
        let mut seed = setup_seed(seed as i64);
        for k in 0..4 {
            for i in 0..B_SIZE {
                lattice.selector[i] = i;
                for j in 0..2 {
                    seed = next_random(seed);
                    lattice.gradient[k][i][j] =
                        ((seed % (B_SIZE as i64 * 2)) - B_SIZE as i64) as f32 / B_SIZE as f32;
                }
                let [gx, gy] = lattice.gradient[k][i];
                let len = (gx * gx + gy * gy).sqrt();
                if len > 0.0 {
                    lattice.gradient[k][i] = [gx / len, gy / len];
                }
            }
        }
        for i in (1..B_SIZE).rev() {
            seed = next_random(seed);
            let j = (seed % B_SIZE as i64) as usize;
            lattice.selector.swap(i, j);
        }
        for i in 0..B_SIZE + 2 {
            lattice.selector[B_SIZE + i] = lattice.selector[i];
            for k in 0..4 {
                lattice.gradient[k][B_SIZE + i] = lattice.gradient[k][i];
            }
        }
        lattice
    }

    fn noise2(&self, channel: usize, v: Vec2) -> f32 {
        #[inline]
        fn s_curve(t: f32) -> f32 {
            t * t * (3.0 - 2.0 * t)
        }
        #[inline]
        fn lerp(t: f32, a: f32, b: f32) -> f32 {
            a + t * (b - a)
        }

        let t = v.x + PERLIN_N;
        let bx0 = (t as i32 & B_MASK) as usize;
        let bx1 = ((bx0 as i32 + 1) & B_MASK) as usize;
        let rx0 = t - (t as i32) as f32;
        let rx1 = rx0 - 1.0;
        let t = v.y + PERLIN_N;
        let by0 = (t as i32 & B_MASK) as usize;
        let by1 = ((by0 as i32 + 1) & B_MASK) as usize;
        let ry0 = t - (t as i32) as f32;
        let ry1 = ry0 - 1.0;

        let i = self.selector[bx0];
        let j = self.selector[bx1];
        let b00 = self.selector[i + by0];
        let b10 = self.selector[j + by0];
        let b01 = self.selector[i + by1];
        let b11 = self.selector[j + by1];

        let g = &self.gradient[channel];
        let sx = s_curve(rx0);
        let sy = s_curve(ry0);
        let u = rx0 * g[b00][0] + ry0 * g[b00][1];
        let v = rx1 * g[b10][0] + ry0 * g[b10][1];
        let a = lerp(sx, u, v);
        let u = rx0 * g[b01][0] + ry1 * g[b01][1];
        let v = rx1 * g[b11][0] + ry1 * g[b11][1];
        let b = lerp(sx, u, v);
        lerp(sy, a, b)
    }

    /// Summed octaves for one channel at `point` (filter-space pixels).
    pub fn turbulence(
        &self,
        channel: usize,
        point: Vec2,
        base_frequency: Vec2,
        octaves: u32,
        kind: NoiseKind,
    ) -> f32 {
        let mut sum = 0.0;
        let mut v = point * base_frequency;
        let mut ratio = 1.0;
        for _ in 0..octaves {
            let n = self.noise2(channel, v);
            sum += match kind {
                NoiseKind::FractalNoise => n / ratio,
                NoiseKind::Turbulence => n.abs() / ratio,
            };
            v *= 2.0;
            ratio *= 2.0;
        }
        sum
    }
}

/// Render a `width × height` noise field whose top-left pixel sits at
/// `origin` in filter space. Colour values are produced unpremultiplied, as
/// the primitive defines, and stored premultiplied.
pub fn render(
    lattice: &PerlinLattice,
    width: u32,
    height: u32,
    origin: Vec2,
    base_frequency: Vec2,
    octaves: u32,
    kind: NoiseKind,
) -> Raster {
    let mut out = Raster::new(width, height);
    // Octave count is capped; beyond ~10 the contribution is below 8-bit precision.
    let octaves = octaves.min(10);
    for y in 0..height {
        for x in 0..width {
            let point = Vec2::new(x as f32, y as f32) + origin;
            let mut c = [0.0; 4];
            for (channel, value) in c.iter_mut().enumerate() {
                let sum = lattice.turbulence(channel, point, base_frequency, octaves, kind);
                let v = match kind {
                    NoiseKind::FractalNoise => (sum + 1.0) / 2.0,
                    NoiseKind::Turbulence => sum,
                };
                *value = v.clamp(0.0, 1.0);
            }
            out.set(x, y, premultiply(Vec4::from_array(c)));
        }
    }
    out
}
