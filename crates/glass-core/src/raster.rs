//! Float RGBA image used by the CPU compositor.
//!
//! Pixels are premultiplied, in sRGB space, each channel in `0..=1`.

use glam::Vec4;

#[derive(Clone, Debug, PartialEq)]
pub struct Raster {
    width: u32,
    height: u32,
    pixels: Vec<Vec4>,
}

impl Raster {
    pub fn new(width: u32, height: u32) -> Self {
        Self::filled(width, height, Vec4::ZERO)
    }

    pub fn filled(width: u32, height: u32, color: Vec4) -> Self {
        Self {
            width,
            height,
            pixels: vec![color; width as usize * height as usize],
        }
    }

    pub fn width(&self) -> u32 {
        self.width
    }

    pub fn height(&self) -> u32 {
        self.height
    }

    pub fn is_empty(&self) -> bool {
        self.pixels.is_empty()
    }

    pub fn pixels(&self) -> &[Vec4] {
        &self.pixels
    }

    pub fn pixels_mut(&mut self) -> &mut [Vec4] {
        &mut self.pixels
    }

    #[inline]
    pub fn get(&self, x: u32, y: u32) -> Vec4 {
        self.pixels[(y * self.width + x) as usize]
    }

    /// Premultiplied pixel, transparent outside the bounds.
    #[inline]
    pub fn get_or_clear(&self, x: i64, y: i64) -> Vec4 {
        if x < 0 || y < 0 || x >= self.width as i64 || y >= self.height as i64 {
            return Vec4::ZERO;
        }
        self.pixels[(y as u32 * self.width + x as u32) as usize]
    }

    #[inline]
    pub fn set(&mut self, x: u32, y: u32, color: Vec4) {
        let i = (y * self.width + x) as usize;
        self.pixels[i] = color;
    }

    pub fn map(&self, f: impl Fn(Vec4) -> Vec4) -> Self {
        Self {
            width: self.width,
            height: self.height,
            pixels: self.pixels.iter().map(|p| f(*p)).collect(),
        }
    }

    /// Copy of `self` placed at (`x`, `y`) inside a larger transparent canvas.
    pub fn padded(&self, width: u32, height: u32, x: u32, y: u32) -> Self {
        let mut out = Self::new(width, height);
        out.draw_over(self, x as i64, y as i64);
        out
    }

    /// Source-over composite of `top` at (`x`, `y`).
    pub fn draw_over(&mut self, top: &Raster, x: i64, y: i64) {
        for ty in 0..top.height {
            let dy = y + ty as i64;
            if dy < 0 || dy >= self.height as i64 {
                continue;
            }
            for tx in 0..top.width {
                let dx = x + tx as i64;
                if dx < 0 || dx >= self.width as i64 {
                    continue;
                }
                let src = top.get(tx, ty);
                let i = (dy as u32 * self.width + dx as u32) as usize;
                self.pixels[i] = over(src, self.pixels[i]);
            }
        }
    }

    pub fn to_rgba8(&self) -> Vec<u8> {
        let pixels: Vec<[u8; 4]> = self
            .pixels
            .iter()
            .map(|p| {
                let c = (unpremultiply(*p).clamp(Vec4::ZERO, Vec4::ONE) * 255.0).round();
                [c.x as u8, c.y as u8, c.z as u8, c.w as u8]
            })
            .collect();
        bytemuck::cast_slice(&pixels).to_vec()
    }
}

#[inline]
pub fn premultiply(c: Vec4) -> Vec4 {
    Vec4::new(c.x * c.w, c.y * c.w, c.z * c.w, c.w)
}

#[inline]
pub fn unpremultiply(c: Vec4) -> Vec4 {
    if c.w <= 0.0 {
        return Vec4::ZERO;
    }
    Vec4::new(c.x / c.w, c.y / c.w, c.z / c.w, c.w)
}

#[inline]
pub fn over(src: Vec4, dst: Vec4) -> Vec4 {
    src + dst * (1.0 - src.w)
}
