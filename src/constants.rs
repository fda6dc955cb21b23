// DOM names and stylesheet text shared by every mounted panel.
// Pure data so host tests can `include!` it.

// Attribute that marks an element for automatic mounting
pub const MOUNT_ATTRIBUTE: &str = "data-liquid-glass";
pub const MOUNT_SELECTOR: &str = "[data-liquid-glass]";
pub const DATA_PREFIX: &str = "data-";
// `data-mouse-container="<css selector>"` picks the element to measure against
pub const MOUSE_CONTAINER_ATTRIBUTE: &str = "mouse-container";

// Class names
pub const HOST_CLASS: &str = "lg-host";
pub const GLOW_CLASS: &str = "lg-glow";
pub const SHADOW_CLASS: &str = "lg-shadow";
pub const PANEL_CLASS: &str = "lg-panel";
pub const TINT_CLASS: &str = "lg-tint";
pub const CONTENT_CLASS: &str = "lg-content";
pub const RIPPLE_CLASS: &str = "lg-ripple";

pub const STYLESHEET_ID: &str = "liquid-glass-style";
pub const RIPPLE_ANIMATION: &str = "lg-ripple";

// Layer transitions (ms)
pub const LAYER_TRANSITION_MS: u32 = 300;

// Ripple fill
pub const RIPPLE_FILL: &str = "rgba(255, 255, 255, 0.3)";

/// Injected once per document.
pub const STYLESHEET: &str = "\
@keyframes lg-ripple { from { width: 20px; height: 20px; opacity: 1; } to { width: 100px; height: 100px; opacity: 0; } }
.lg-host { position: relative; display: inline-block; }
.lg-glow, .lg-shadow { position: absolute; left: 50%; top: 50%; pointer-events: none; transition: all 300ms; }
.lg-panel { position: relative; overflow: hidden; isolation: isolate; }
.lg-tint { position: absolute; inset: 0; pointer-events: none; }
.lg-content { position: relative; z-index: 1; }
.lg-ripple { position: absolute; border-radius: 50%; pointer-events: none; transform: translate(-50%, -50%); }
";
