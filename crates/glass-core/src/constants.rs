use std::time::Duration;

// Shared tuning constants for the glass surface, used by both web and native frontends.

// Displacement texture
pub const TEXTURE_SIZE: u32 = 512; // square edge length in pixels
pub const ORGANIC_FREQUENCY: f32 = 0.001; // radians per flat buffer byte
pub const ORGANIC_AMPLITUDE: f32 = 128.0;
pub const TEXTURE_GRADIENT_ALPHA: f32 = 0.5; // both radial stops are half transparent

// Magnetic pull
pub const MAGNETIC_RADIUS: f32 = 150.0; // px; hard cutoff, no hysteresis
pub const MAGNETIC_STRENGTH: f32 = 0.1; // fraction of the raw delta at full pull

// Ripples
pub const RIPPLE_LIFETIME: Duration = Duration::from_millis(600);
pub const RIPPLE_START_DIAMETER: f32 = 20.0;
pub const RIPPLE_END_DIAMETER: f32 = 100.0;

// Panel defaults
pub const DEFAULT_GLASS_WIDTH: f32 = 270.0;
pub const DEFAULT_GLASS_HEIGHT: f32 = 69.0;

// Filter region grows the source bounds by this fraction on every side
pub const FILTER_REGION_MARGIN: f32 = 0.5;

// Filter stage tuning
pub const SOURCE_BLUR_STD_DEV: f32 = 0.5;
// The red channel displaces by the bare scale; only green and blue are
// multiplied by the refraction amount and these factors.
pub const GREEN_SCALE_FACTOR: f32 = 1.1;
pub const BLUE_SCALE_FACTOR: f32 = 1.2;
pub const GLOW_BLUR_STD_DEV: f32 = 2.0;
pub const SHADOW_DY: f32 = 2.0;
pub const SHADOW_STD_DEV: f32 = 4.0;
pub const SHADOW_OPACITY: f32 = 0.2;

// Turbulence fields
pub const STATIC_TURBULENCE_FREQUENCY: [f32; 2] = [0.01, 0.01];
pub const STATIC_TURBULENCE_OCTAVES: u32 = 2;
pub const SHIMMER_TURBULENCE_FREQUENCIES: [[f32; 2]; 3] = [[0.02, 0.1], [0.04, 0.2], [0.02, 0.1]];
pub const SHIMMER_TURBULENCE_OCTAVES: u32 = 4;
pub const SHIMMER_TURBULENCE_SEED: i32 = 2;
pub const SHIMMER_PERIOD_SEC: f32 = 20.0;

// Iridescent gradient
pub const IRIDESCENT_PERIOD_SEC: f32 = 10.0;
pub const IRIDESCENT_COLORS: [[u8; 3]; 3] = [
    [0xff, 0x00, 0xff], // magenta
    [0x00, 0xff, 0xff], // cyan
    [0xff, 0xff, 0x00], // yellow
];
pub const IRIDESCENT_STOP_OPACITY: [f32; 3] = [0.2, 0.1, 0.2];

// Glow and shadow layers
pub const GLOW_EXTENT: f32 = 100.0; // px added to each panel dimension
pub const GLOW_BLUR_PX: f32 = 40.0;
pub const GLOW_IDLE_FACTOR: f32 = 0.3;
pub const GLOW_MID_HOVER_FACTOR: f32 = 0.5;
pub const GLOW_MID_IDLE_FACTOR: f32 = 0.1;
pub const GLOW_INNER_RGB: [u8; 3] = [138, 43, 226]; // blue violet
pub const GLOW_MID_RGB: [u8; 3] = [30, 144, 255]; // dodger blue
pub const SHADOW_ALPHAS: [f32; 2] = [0.2, 0.1];
pub const SHADOW_ALPHAS_OVER_LIGHT: [f32; 2] = [0.4, 0.3];

// Panel body
pub const BODY_ALPHA: f32 = 0.12;
pub const BODY_ALPHA_OVER_LIGHT: f32 = 0.05;
pub const HIGHLIGHT_ALPHA: f32 = 0.3;
pub const HIGHLIGHT_ALPHA_HOVER: f32 = 0.45;
pub const HIGHLIGHT_EXTENT: f32 = 0.6; // fraction of the panel's longer side
pub const RIPPLE_ALPHA: f32 = 0.3;

// Caps applied by `GlassConfig::sanitized`
pub const MAX_DISPLACEMENT_SCALE: f32 = 1000.0;
pub const MAX_INTENSITY: f32 = 16.0;
pub const MAX_BLUR_STD_DEV: f32 = 64.0;
