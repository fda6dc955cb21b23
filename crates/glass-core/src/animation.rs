//! Time-varying filter parameters as pure functions of wall-clock time.
//!
//! On the web the browser evaluates the same envelopes through SMIL
//! `<animate>` elements; the CPU compositor and the native viewer call
//! [`KeyframeLoop::value_at`] every frame instead.

use crate::constants::{
    IRIDESCENT_COLORS, IRIDESCENT_PERIOD_SEC, IRIDESCENT_STOP_OPACITY, SHIMMER_PERIOD_SEC,
    SHIMMER_TURBULENCE_FREQUENCIES,
};
use glam::{Vec2, Vec3};

pub trait Lerp: Copy {
    fn lerp(self, other: Self, t: f32) -> Self;
}

impl Lerp for f32 {
    fn lerp(self, other: Self, t: f32) -> Self {
        self + (other - self) * t
    }
}

impl Lerp for Vec2 {
    fn lerp(self, other: Self, t: f32) -> Self {
        Vec2::lerp(self, other, t)
    }
}

impl Lerp for Vec3 {
    fn lerp(self, other: Self, t: f32) -> Self {
        Vec3::lerp(self, other, t)
    }
}

/// Evenly spaced keyframes repeated forever (`repeatCount="indefinite"`).
#[derive(Clone, Debug, PartialEq)]
pub struct KeyframeLoop<T> {
    pub period_sec: f32,
    pub values: Vec<T>,
}

impl<T: Lerp> KeyframeLoop<T> {
    pub fn new(period_sec: f32, values: Vec<T>) -> Self {
        Self { period_sec, values }
    }

    /// Value at `t` seconds. Negative or non-finite times read as 0.
    ///
    /// Returns `None` only for an empty keyframe list.
    pub fn value_at(&self, t: f32) -> Option<T> {
        let first = *self.values.first()?;
        let segments = self.values.len() - 1;
        if segments == 0 || self.period_sec.is_nan() || self.period_sec <= 0.0 {
            return Some(first);
        }
        let t = if t.is_finite() { t.max(0.0) } else { 0.0 };
        let phase = (t % self.period_sec) / self.period_sec;
        let pos = phase * segments as f32;
        let i = (pos.floor() as usize).min(segments - 1);
        let frac = pos - i as f32;
        Some(self.values[i].lerp(self.values[i + 1], frac))
    }
}

/// The shimmer turbulence base frequency: `0.02 0.1 → 0.04 0.2 → 0.02 0.1` over 20 s.
pub fn shimmer_frequency() -> KeyframeLoop<Vec2> {
    KeyframeLoop::new(
        SHIMMER_PERIOD_SEC,
        SHIMMER_TURBULENCE_FREQUENCIES
            .iter()
            .map(|f| Vec2::from_array(*f))
            .collect(),
    )
}

#[derive(Clone, Debug, PartialEq)]
pub struct GradientStop {
    /// Position along the gradient, 0..=1.
    pub offset: f32,
    pub opacity: f32,
    pub colors: KeyframeLoop<Vec3>,
}

/// Diagonal iridescent gradient whose three stops cycle magenta, cyan and
/// yellow, each stop one colour ahead of the previous.
pub fn iridescent_gradient() -> Vec<GradientStop> {
    let palette: Vec<Vec3> = IRIDESCENT_COLORS
        .iter()
        .map(|c| Vec3::new(c[0] as f32, c[1] as f32, c[2] as f32) / 255.0)
        .collect();
    (0..palette.len())
        .map(|stop| {
            let mut values: Vec<Vec3> = (0..palette.len())
                .map(|k| palette[(stop + k) % palette.len()])
                .collect();
            values.push(palette[stop]);
            GradientStop {
                offset: stop as f32 / (palette.len() - 1) as f32,
                opacity: IRIDESCENT_STOP_OPACITY[stop],
                colors: KeyframeLoop::new(IRIDESCENT_PERIOD_SEC, values),
            }
        })
        .collect()
}

/// Colour of a gradient at `position` (0..=1) and time `t`; RGB + opacity.
pub fn gradient_color(stops: &[GradientStop], position: f32, t: f32) -> Option<(Vec3, f32)> {
    let first = stops.first()?;
    let position = position.clamp(0.0, 1.0);
    let sample = |s: &GradientStop| s.colors.value_at(t).map(|c| (c, s.opacity));
    if position <= first.offset {
        return sample(first);
    }
    for pair in stops.windows(2) {
        let (a, b) = (&pair[0], &pair[1]);
        if position <= b.offset {
            let span = (b.offset - a.offset).max(f32::EPSILON);
            let k = (position - a.offset) / span;
            let (ca, oa) = sample(a)?;
            let (cb, ob) = sample(b)?;
            return Some((ca.lerp(cb, k), Lerp::lerp(oa, ob, k)));
        }
    }
    stops.last().and_then(sample)
}
