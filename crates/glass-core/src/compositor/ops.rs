use crate::constants::MAX_BLUR_STD_DEV;
use crate::filter::{BlendMode, Channel, ColorMatrix};
use crate::raster::{over, premultiply, unpremultiply, Raster};
use crate::texture::DisplacementTexture;
use glam::Vec4;

/// Scale the texture to cover `width × height`, centred, cropping the
/// overflow (`xMidYMid slice`).
pub fn image_cover(texture: &DisplacementTexture, width: u32, height: u32) -> Raster {
    let mut out = Raster::new(width, height);
    if width == 0 || height == 0 {
        return out;
    }
    let tw = texture.width() as f32;
    let th = texture.height() as f32;
    let scale = (width as f32 / tw).max(height as f32 / th);
    let ox = (tw * scale - width as f32) / 2.0;
    let oy = (th * scale - height as f32) / 2.0;
    for y in 0..height {
        let sy = ((y as f32 + 0.5 + oy) / scale).floor() as i64;
        for x in 0..width {
            let sx = ((x as f32 + 0.5 + ox) / scale).floor() as i64;
            out.set(x, y, premultiply(texture.sample(sx, sy)));
        }
    }
    out
}

fn gaussian_kernel(std_dev: f32, limit: usize) -> Vec<f32> {
    let radius = ((std_dev * 3.0).ceil() as usize).min(limit);
    let two_sigma_sq = 2.0 * std_dev * std_dev;
    let mut kernel: Vec<f32> = (0..=radius * 2)
        .map(|i| {
            let d = i as f32 - radius as f32;
            (-(d * d) / two_sigma_sq).exp()
        })
        .collect();
    let sum: f32 = kernel.iter().sum();
    for k in kernel.iter_mut() {
        *k /= sum;
    }
    kernel
}

/// Separable Gaussian blur on premultiplied pixels. Samples outside the
/// image are transparent.
pub fn gaussian_blur(src: &Raster, std_dev: f32) -> Raster {
    let std_dev = if std_dev.is_finite() {
        std_dev.min(MAX_BLUR_STD_DEV)
    } else {
        0.0
    };
    if std_dev <= 0.0 || src.is_empty() {
        return src.clone();
    }
    let (w, h) = (src.width(), src.height());
    let kernel = gaussian_kernel(std_dev, w.max(h) as usize);
    let radius = (kernel.len() / 2) as i64;

    let mut horizontal = Raster::new(w, h);
    for y in 0..h {
        for x in 0..w {
            let mut acc = Vec4::ZERO;
            for (k, weight) in kernel.iter().enumerate() {
                acc += src.get_or_clear(x as i64 + k as i64 - radius, y as i64) * *weight;
            }
            horizontal.set(x, y, acc);
        }
    }
    let mut out = Raster::new(w, h);
    for y in 0..h {
        for x in 0..w {
            let mut acc = Vec4::ZERO;
            for (k, weight) in kernel.iter().enumerate() {
                acc += horizontal.get_or_clear(x as i64, y as i64 + k as i64 - radius) * *weight;
            }
            out.set(x, y, acc);
        }
    }
    out
}

/// `P'(x,y) = P(x + s·(Cx − ½), y + s·(Cy − ½))` with the map read
/// unpremultiplied. Samples that land outside `src` are transparent.
pub fn displacement_map(
    src: &Raster,
    map: &Raster,
    scale: f32,
    x_channel: Channel,
    y_channel: Channel,
) -> Raster {
    let scale = if scale.is_finite() { scale } else { 0.0 };
    let (w, h) = (src.width(), src.height());
    let mut out = Raster::new(w, h);
    for y in 0..h {
        for x in 0..w {
            let m = if x < map.width() && y < map.height() {
                unpremultiply(map.get(x, y))
            } else {
                Vec4::splat(0.5)
            };
            let dx = scale * (m[x_channel.index()] - 0.5);
            let dy = scale * (m[y_channel.index()] - 0.5);
            let sx = (x as f32 + dx).round() as i64;
            let sy = (y as f32 + dy).round() as i64;
            out.set(x, y, src.get_or_clear(sx, sy));
        }
    }
    out
}

pub fn color_matrix(src: &Raster, matrix: &ColorMatrix) -> Raster {
    src.map(|p| {
        let c = unpremultiply(p);
        let input = [c.x, c.y, c.z, c.w, 1.0];
        let mut result = [0.0f32; 4];
        for (row, value) in result.iter_mut().enumerate() {
            let coeffs = &matrix[row * 5..row * 5 + 5];
            let v: f32 = coeffs.iter().zip(input.iter()).map(|(m, c)| m * c).sum();
            *value = if v.is_finite() { v.clamp(0.0, 1.0) } else { 0.0 };
        }
        premultiply(Vec4::from_array(result))
    })
}

/// Blend `top` onto `bottom` with the separable blend-mode formulas on
/// premultiplied colour. The result takes the size of `bottom`.
pub fn blend(mode: BlendMode, top: &Raster, bottom: &Raster) -> Raster {
    let (w, h) = (bottom.width(), bottom.height());
    let mut out = Raster::new(w, h);
    for y in 0..h {
        for x in 0..w {
            let a = top.get_or_clear(x as i64, y as i64);
            let b = bottom.get(x, y);
            let alpha = 1.0 - (1.0 - a.w) * (1.0 - b.w);
            let rgb = match mode {
                BlendMode::Multiply => {
                    a.truncate() * (1.0 - b.w) + b.truncate() * (1.0 - a.w) + a.truncate() * b.truncate()
                }
                BlendMode::Screen => a.truncate() + b.truncate() - a.truncate() * b.truncate(),
            };
            out.set(x, y, rgb.extend(alpha).clamp(Vec4::ZERO, Vec4::ONE));
        }
    }
    out
}

/// Blurred, offset black silhouette of `src` at `opacity`, merged under `src`.
pub fn drop_shadow(src: &Raster, dx: f32, dy: f32, std_dev: f32, opacity: f32) -> Raster {
    let opacity = if opacity.is_finite() {
        opacity.clamp(0.0, 1.0)
    } else {
        0.0
    };
    let silhouette = src.map(|p| Vec4::new(0.0, 0.0, 0.0, p.w * opacity));
    let blurred = gaussian_blur(&silhouette, std_dev);
    let (ox, oy) = (
        if dx.is_finite() { dx.round() as i64 } else { 0 },
        if dy.is_finite() { dy.round() as i64 } else { 0 },
    );
    let (w, h) = (src.width(), src.height());
    let mut out = Raster::new(w, h);
    for y in 0..h {
        for x in 0..w {
            let shadow = blurred.get_or_clear(x as i64 - ox, y as i64 - oy);
            out.set(x, y, over(src.get(x, y), shadow));
        }
    }
    out
}
