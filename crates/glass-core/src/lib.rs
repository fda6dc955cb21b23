pub mod animation;
pub mod compositor;
pub mod config;
pub mod constants;
pub mod decor;
pub mod error;
pub mod filter;
pub mod interaction;
pub mod panel;
pub mod raster;
pub mod ripple;
pub mod texture;

pub use animation::{KeyframeLoop, Lerp};
pub use compositor::{Compositor, RenderOutput};
pub use config::{GlassConfig, Padding};
pub use decor::{compose_visual, GlassVisual, GlowLayer, ShadowLayer};
pub use error::{GlassError, Result};
pub use filter::{FilterDocument, FilterGraph};
pub use interaction::{
    GlassSize, InteractionController, PointerEvent, PointerOverrides, PointerSnapshot,
    PointerState, Rect,
};
pub use raster::Raster;
pub use ripple::{Ripple, RippleId, RippleSet};
pub use texture::DisplacementTexture;
