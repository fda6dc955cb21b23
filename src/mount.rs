//! Turning a host element into a glass panel, and back.

use crate::attrs::{camel_to_kebab, config_key};
use crate::constants::{
    CONTENT_CLASS, DATA_PREFIX, GLOW_CLASS, HOST_CLASS, MOUSE_CONTAINER_ATTRIBUTE, PANEL_CLASS,
    RIPPLE_CLASS, SHADOW_CLASS, TINT_CLASS,
};
use crate::dom::{self, js_err};
use crate::events::{self, Listener, Timeout};
use crate::frame::FrameLoop;
use crate::style;
use anyhow::anyhow;
use glam::Vec2;
use glass_core::filter::{svg::to_svg_defs, unique_filter_id};
use glass_core::{
    compose_visual, FilterDocument, GlassConfig, GlassSize, InteractionController, Rect, RippleId,
};
use instant::Instant;
use std::cell::RefCell;
use std::rc::Rc;
use wasm_bindgen::{JsCast, JsValue};
use web_sys as web;

pub type Shared = Rc<RefCell<PanelState>>;

/// The DOM nodes a mounted panel owns.
pub struct Elements {
    pub host: web::HtmlElement,
    pub glow: web::HtmlElement,
    pub shadow: web::HtmlElement,
    pub panel: web::HtmlElement,
    pub tint: web::HtmlElement,
    pub content: web::HtmlElement,
    pub defs: web::HtmlElement,
}

pub struct PanelState {
    pub config: GlassConfig,
    pub controller: InteractionController,
    pub elements: Elements,
    pub mouse_container: Option<web::Element>,
    /// `None` when the displacement texture is unavailable.
    pub filter_id: Option<String>,
    pub on_click: Option<js_sys::Function>,
    pub timers: Vec<(RippleId, Timeout)>,
    ripple_nodes: Vec<(RippleId, web::HtmlElement)>,
    // glow, shadow, panel, tint
    last_styles: [String; 4],
}

impl PanelState {
    /// Bounds the pointer is measured against; `None` once the tracked
    /// element has left the document.
    pub fn tracked_bounds(&self) -> Option<Rect> {
        match &self.mouse_container {
            Some(container) => dom::connected_rect(container),
            None => dom::connected_rect(&self.elements.host),
        }
    }

    pub fn add_ripple_node(&mut self, id: RippleId, position: Vec2) -> anyhow::Result<()> {
        let document = dom::window_document().ok_or_else(|| anyhow!("no document"))?;
        let span = document
            .create_element("span")
            .map_err(js_err)?
            .dyn_into::<web::HtmlElement>()
            .map_err(|_| anyhow!("span is not an HtmlElement"))?;
        span.set_class_name(RIPPLE_CLASS);
        span.set_attribute("style", &style::ripple_style(position.x, position.y))
            .map_err(js_err)?;
        self.elements.panel.append_child(&span).map_err(js_err)?;
        self.ripple_nodes.push((id, span));
        Ok(())
    }

    /// Timer path of ripple removal. The timer entry itself is pruned by the
    /// next frame since it is still running here.
    pub fn finish_ripple(&mut self, id: RippleId) {
        self.controller.remove_ripple(id);
        self.ripple_nodes.retain(|(rid, node)| {
            if *rid == id {
                node.remove();
                false
            } else {
                true
            }
        });
    }

    fn prune_ripples(&mut self, now: Instant) {
        let expired = self.controller.expire(now);
        if expired > 0 {
            log::debug!("[ripple] expired {expired}");
        }
        let ripples = self.controller.ripples();
        self.ripple_nodes.retain(|(id, node)| {
            let alive = ripples.contains(*id);
            if !alive {
                node.remove();
            }
            alive
        });
        self.timers.retain(|(id, _)| ripples.contains(*id));
    }

    /// Re-apply the visual state; styles are written only when they change.
    pub fn render(&mut self, now: Instant) {
        let panel = &self.elements.panel;
        let measured = GlassSize {
            width: panel.offset_width() as f32,
            height: panel.offset_height() as f32,
        };
        if measured.width > 0.0 && measured.height > 0.0 {
            self.controller.set_size(measured);
        }
        self.prune_ripples(now);

        let snapshot = self.controller.snapshot();
        let visual = compose_visual(
            &snapshot,
            &self.config,
            self.controller.size(),
            self.controller.is_hovered(),
            self.controller.ripples(),
            now,
        );
        let t = (visual.translation.x, visual.translation.y);
        let styles = [
            style::glow_style(&visual.glow, visual.corner_radius, t),
            style::shadow_style(&visual.shadow, visual.corner_radius, t),
            style::panel_style(&visual, self.filter_id.as_deref()),
            style::tint_style(&visual),
        ];
        let targets = [
            &self.elements.glow,
            &self.elements.shadow,
            &self.elements.panel,
            &self.elements.tint,
        ];
        for ((css, last), el) in styles.into_iter().zip(self.last_styles.iter_mut()).zip(targets) {
            if css != *last {
                _ = el.set_attribute("style", &css);
                *last = css;
            }
        }
    }
}

/// Panel options gathered from `data-*` attributes and/or a JS object.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct MountOptions {
    /// Kebab-case config attributes, applied in order.
    pub attributes: Vec<(String, String)>,
    /// CSS selector of the element the pointer is measured against.
    pub mouse_container: Option<String>,
}

impl MountOptions {
    pub fn from_element(host: &web::Element) -> Self {
        let mut options = Self::default();
        let container_attr = format!("{DATA_PREFIX}{MOUSE_CONTAINER_ATTRIBUTE}");
        for name in host.get_attribute_names().iter().filter_map(|v| v.as_string()) {
            let Some(value) = host.get_attribute(&name) else {
                continue;
            };
            if name == container_attr {
                options.mouse_container = Some(value);
            } else if let Some(key) = config_key(&name) {
                options.attributes.push((key.to_string(), value));
            }
        }
        options
    }

    /// Read a `{ displacementScale: 80, overLight: true, ... }` object.
    /// `undefined` and `null` give no options.
    pub fn from_js(value: &JsValue) -> anyhow::Result<Self> {
        let mut options = Self::default();
        if value.is_undefined() || value.is_null() {
            return Ok(options);
        }
        let object = value
            .dyn_ref::<js_sys::Object>()
            .ok_or_else(|| anyhow!("options must be an object"))?;
        for entry in js_sys::Object::entries(object).iter() {
            let pair: js_sys::Array = entry.unchecked_into();
            let Some(key) = pair.get(0).as_string() else {
                continue;
            };
            let key = camel_to_kebab(&key);
            let raw = pair.get(1);
            let value = if let Some(s) = raw.as_string() {
                s
            } else if let Some(n) = raw.as_f64() {
                n.to_string()
            } else if let Some(b) = raw.as_bool() {
                b.to_string()
            } else {
                log::warn!("[mount] option {key} has an unsupported type");
                continue;
            };
            if key == MOUSE_CONTAINER_ATTRIBUTE {
                options.mouse_container = Some(value);
            } else {
                options.attributes.push((key, value));
            }
        }
        Ok(options)
    }

    /// Layer `other` on top of `self`; later attributes win.
    pub fn merge(mut self, other: MountOptions) -> Self {
        self.attributes.extend(other.attributes);
        if other.mouse_container.is_some() {
            self.mouse_container = other.mouse_container;
        }
        self
    }
}

/// A live panel. Dropping it unmounts.
pub struct Mount {
    state: Shared,
    listeners: Vec<Listener>,
    frame: Option<FrameLoop>,
    mounted: bool,
}

impl Mount {
    pub fn state(&self) -> &Shared {
        &self.state
    }

    pub fn is_mounted(&self) -> bool {
        self.mounted
    }

    /// Restore the host to its pre-mount shape. Safe to call twice.
    pub fn unmount(&mut self) {
        if !self.mounted {
            return;
        }
        self.mounted = false;
        self.frame = None;
        self.listeners.clear();

        let mut s = self.state.borrow_mut();
        s.timers.clear();
        for (_, node) in s.ripple_nodes.drain(..) {
            node.remove();
        }
        s.controller.reset();
        s.on_click = None;
        let e = &s.elements;
        if let Err(err) = dom::move_children(&e.content, &e.host) {
            log::warn!("[mount] restoring children: {err}");
        }
        e.glow.remove();
        e.shadow.remove();
        e.panel.remove();
        e.defs.remove();
        _ = e.host.class_list().remove_1(HOST_CLASS);
        log::info!("[mount] unmounted {}", s.filter_id.as_deref().unwrap_or("unfiltered panel"));
    }
}

impl Drop for Mount {
    fn drop(&mut self) {
        self.unmount();
    }
}

pub fn mount(host: web::HtmlElement, options: MountOptions) -> anyhow::Result<Mount> {
    let document = dom::window_document().ok_or_else(|| anyhow!("no document"))?;
    dom::ensure_stylesheet(&document)?;

    let config = GlassConfig::from_attributes(
        options
            .attributes
            .iter()
            .map(|(k, v)| (k.as_str(), v.as_str())),
    )
    .sanitized();

    let id = unique_filter_id();
    let filters = FilterDocument::new(&id, &config);
    let texture = dom::texture_data_uri(&document);
    // The shimmer `{id}-turbulence` filter is emitted but no layer references it.
    let defs = dom::insert_defs(&document, &to_svg_defs(&filters, texture.as_deref()))?;
    let filter_id = texture.is_some().then(|| id.clone());

    let glow = dom::create_div(&document, GLOW_CLASS)?;
    let shadow = dom::create_div(&document, SHADOW_CLASS)?;
    let panel = dom::create_div(&document, PANEL_CLASS)?;
    let tint = dom::create_div(&document, TINT_CLASS)?;
    tint.set_inner_html(&style::tint_markup(&filters.iridescent_id()));
    let content = dom::create_div(&document, CONTENT_CLASS)?;

    dom::move_children(&host, &content)?;
    panel.append_child(&tint).map_err(js_err)?;
    panel.append_child(&content).map_err(js_err)?;
    host.append_child(&glow).map_err(js_err)?;
    host.append_child(&shadow).map_err(js_err)?;
    host.append_child(&panel).map_err(js_err)?;
    host.class_list().add_1(HOST_CLASS).map_err(js_err)?;

    let mouse_container = options.mouse_container.as_deref().and_then(|selector| {
        match document.query_selector(selector) {
            Ok(Some(el)) => Some(el),
            _ => {
                log::warn!("[mount] mouse container {selector:?} not found, tracking the host");
                None
            }
        }
    });

    let mut controller = InteractionController::new(config.magnetic_pull);
    if mouse_container.is_some() {
        controller.bind_container();
    }

    let state: Shared = Rc::new(RefCell::new(PanelState {
        config,
        controller,
        elements: Elements {
            host,
            glow,
            shadow,
            panel,
            tint,
            content,
            defs,
        },
        mouse_container,
        filter_id,
        on_click: None,
        timers: Vec::new(),
        ripple_nodes: Vec::new(),
        last_styles: Default::default(),
    }));
    state.borrow_mut().render(Instant::now());

    let mut mounted = Mount {
        state: state.clone(),
        listeners: Vec::new(),
        frame: None,
        mounted: true,
    };
    // On failure from here `mounted` drops and undoes the DOM work above.
    mounted.listeners = events::wire(&state)?;
    mounted.frame = Some(FrameLoop::start(state)?);
    log::info!("[mount] mounted panel {id}");
    Ok(mounted)
}
