//! Tuning parameters for a single glass panel.
//!
//! A `GlassConfig` is immutable per render. Front-ends build one from
//! defaults, optionally overriding fields through string attributes (the web
//! host reads them from `data-*` attributes), and pass the sanitized copy to
//! the filter graph builder.

use crate::constants::{MAX_BLUR_STD_DEV, MAX_DISPLACEMENT_SCALE, MAX_INTENSITY};
use crate::error::{GlassError, Result};
use std::fmt;
use std::str::FromStr;

/// CSS-like padding shorthand, in pixels.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Padding {
    pub top: f32,
    pub right: f32,
    pub bottom: f32,
    pub left: f32,
}

impl Padding {
    pub const fn new(vertical: f32, horizontal: f32) -> Self {
        Self {
            top: vertical,
            right: horizontal,
            bottom: vertical,
            left: horizontal,
        }
    }

    pub fn horizontal(&self) -> f32 {
        self.left + self.right
    }

    pub fn vertical(&self) -> f32 {
        self.top + self.bottom
    }
}

impl Default for Padding {
    fn default() -> Self {
        Self::new(24.0, 32.0)
    }
}

fn parse_px(token: &str) -> Option<f32> {
    let number = token.strip_suffix("px").unwrap_or(token);
    number.parse::<f32>().ok().filter(|v| v.is_finite() && *v >= 0.0)
}

impl FromStr for Padding {
    type Err = GlassError;

    fn from_str(s: &str) -> Result<Self> {
        let bad = || GlassError::InvalidPadding(s.to_string());
        let values = s
            .split_whitespace()
            .map(parse_px)
            .collect::<Option<Vec<f32>>>()
            .ok_or_else(bad)?;
        match values[..] {
            [all] => Ok(Self::new(all, all)),
            [v, h] => Ok(Self::new(v, h)),
            [top, h, bottom] => Ok(Self {
                top,
                right: h,
                bottom,
                left: h,
            }),
            [top, right, bottom, left] => Ok(Self {
                top,
                right,
                bottom,
                left,
            }),
            _ => Err(bad()),
        }
    }
}

impl fmt::Display for Padding {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{}px {}px {}px {}px",
            self.top, self.right, self.bottom, self.left
        )
    }
}

#[derive(Clone, Debug, PartialEq)]
pub struct GlassConfig {
    pub displacement_scale: f32,
    pub blur_amount: f32,
    pub saturation: f32,
    pub aberration_intensity: f32,
    pub shimmer_intensity: f32,
    pub refraction_amount: f32,
    pub elasticity: f32,
    pub corner_radius: f32,
    pub padding: Padding,
    pub over_light: bool,
    pub magnetic_pull: bool,
    pub glow_intensity: f32,
}

impl Default for GlassConfig {
    fn default() -> Self {
        Self {
            displacement_scale: 70.0,
            blur_amount: 12.0,
            saturation: 140.0,
            aberration_intensity: 2.0,
            shimmer_intensity: 0.5,
            refraction_amount: 1.0,
            elasticity: 0.15,
            corner_radius: 999.0,
            padding: Padding::default(),
            over_light: false,
            magnetic_pull: true,
            glow_intensity: 0.5,
        }
    }
}

fn clean(value: f32, default: f32, max: f32) -> f32 {
    if value.is_finite() {
        value.clamp(0.0, max)
    } else {
        default
    }
}

fn parse_number(name: &str, value: &str) -> Result<f32> {
    value
        .trim()
        .parse::<f32>()
        .map_err(|_| GlassError::InvalidValue {
            name: name.to_string(),
            value: value.to_string(),
        })
}

fn parse_flag(name: &str, value: &str) -> Result<bool> {
    match value.trim() {
        // A bare attribute (`data-over-light`) reads as an empty string.
        "" | "true" | "1" | "yes" => Ok(true),
        "false" | "0" | "no" => Ok(false),
        _ => Err(GlassError::InvalidValue {
            name: name.to_string(),
            value: value.to_string(),
        }),
    }
}

impl GlassConfig {
    /// Copy with every numeric field finite and in range. Non-finite values
    /// fall back to the defaults; negatives clamp to zero.
    pub fn sanitized(&self) -> Self {
        let d = Self::default();
        Self {
            displacement_scale: clean(
                self.displacement_scale,
                d.displacement_scale,
                MAX_DISPLACEMENT_SCALE,
            ),
            blur_amount: clean(self.blur_amount, d.blur_amount, MAX_BLUR_STD_DEV),
            saturation: clean(self.saturation, d.saturation, 1000.0),
            aberration_intensity: clean(
                self.aberration_intensity,
                d.aberration_intensity,
                MAX_INTENSITY,
            ),
            shimmer_intensity: clean(self.shimmer_intensity, d.shimmer_intensity, MAX_INTENSITY),
            refraction_amount: clean(self.refraction_amount, d.refraction_amount, MAX_INTENSITY),
            elasticity: clean(self.elasticity, d.elasticity, 1.0),
            corner_radius: clean(self.corner_radius, d.corner_radius, f32::MAX),
            padding: self.padding,
            over_light: self.over_light,
            magnetic_pull: self.magnetic_pull,
            glow_intensity: clean(self.glow_intensity, d.glow_intensity, 1.0),
        }
    }

    /// Apply one kebab-case attribute, e.g. `("displacement-scale", "80")`.
    pub fn apply_attribute(&mut self, name: &str, value: &str) -> Result<()> {
        match name {
            "displacement-scale" => self.displacement_scale = parse_number(name, value)?,
            "blur-amount" => self.blur_amount = parse_number(name, value)?,
            "saturation" => self.saturation = parse_number(name, value)?,
            "aberration-intensity" => self.aberration_intensity = parse_number(name, value)?,
            "shimmer-intensity" => self.shimmer_intensity = parse_number(name, value)?,
            "refraction-amount" => self.refraction_amount = parse_number(name, value)?,
            "elasticity" => self.elasticity = parse_number(name, value)?,
            "corner-radius" => self.corner_radius = parse_number(name, value)?,
            "glow-intensity" => self.glow_intensity = parse_number(name, value)?,
            "padding" => self.padding = value.parse()?,
            "over-light" => self.over_light = parse_flag(name, value)?,
            "magnetic-pull" => self.magnetic_pull = parse_flag(name, value)?,
            _ => return Err(GlassError::UnknownAttribute(name.to_string())),
        }
        Ok(())
    }

    /// Build from `(name, value)` pairs, skipping (and logging) bad entries.
    pub fn from_attributes<'a>(attrs: impl IntoIterator<Item = (&'a str, &'a str)>) -> Self {
        let mut config = Self::default();
        for (name, value) in attrs {
            if let Err(e) = config.apply_attribute(name, value) {
                log::warn!("[config] {e}");
            }
        }
        config
    }
}
