#![cfg(target_arch = "wasm32")]
use glam::Vec2;
use glass_core::PointerOverrides;
use std::cell::RefCell;
use wasm_bindgen::prelude::*;
use wasm_bindgen::JsCast;
use web_sys as web;

mod attrs;
mod constants;
mod dom;
mod events;
mod frame;
mod mount;
mod style;

use constants::{HOST_CLASS, MOUNT_SELECTOR};
use mount::{Mount, MountOptions};

thread_local! {
    // Panels mounted from `[data-liquid-glass]` markup at startup.
    static AUTO_MOUNTED: RefCell<Vec<Mount>> = const { RefCell::new(Vec::new()) };
}

fn to_js(e: anyhow::Error) -> JsValue {
    JsValue::from_str(&format!("{e:#}"))
}

fn auto_mount(document: &web::Document) -> anyhow::Result<usize> {
    let nodes = document
        .query_selector_all(MOUNT_SELECTOR)
        .map_err(dom::js_err)?;
    let mut count = 0;
    for i in 0..nodes.length() {
        let Some(host) = nodes
            .item(i)
            .and_then(|n| n.dyn_into::<web::HtmlElement>().ok())
        else {
            continue;
        };
        if host.class_list().contains(HOST_CLASS) {
            continue;
        }
        let options = MountOptions::from_element(&host);
        match mount::mount(host, options) {
            Ok(m) => {
                AUTO_MOUNTED.with(|list| list.borrow_mut().push(m));
                count += 1;
            }
            Err(e) => log::error!("[mount] auto-mount failed: {e:#}"),
        }
    }
    Ok(count)
}

#[wasm_bindgen(start)]
pub fn start() -> Result<(), JsValue> {
    console_error_panic_hook::set_once();
    _ = console_log::init_with_level(log::Level::Info);

    let Some(document) = dom::window_document() else {
        return Err(JsValue::from_str("no document"));
    };
    let count = auto_mount(&document).map_err(to_js)?;
    log::info!("[init] liquid glass ready, {count} panel(s) auto-mounted");
    Ok(())
}

/// Handle to one mounted glass panel.
#[wasm_bindgen]
pub struct LiquidGlass {
    inner: Mount,
}

#[wasm_bindgen]
impl LiquidGlass {
    /// Mount a panel on `element`. `options` is an optional object of
    /// camelCase settings that override the element's `data-*` attributes.
    pub fn mount(element: web::HtmlElement, options: JsValue) -> Result<LiquidGlass, JsValue> {
        if element.class_list().contains(HOST_CLASS) {
            return Err(JsValue::from_str("element already hosts a glass panel"));
        }
        let options = MountOptions::from_element(&element)
            .merge(MountOptions::from_js(&options).map_err(to_js)?);
        let inner = mount::mount(element, options).map_err(to_js)?;
        Ok(LiquidGlass { inner })
    }

    /// Drive the panel from an external pointer position.
    #[wasm_bindgen(js_name = setGlobalMousePos)]
    pub fn set_global_mouse_pos(&self, x: f32, y: f32) {
        self.update_overrides(|o| o.global_position = Some(Vec2::new(x, y)));
    }

    /// Drive the highlight from an external offset, in percent of the panel.
    #[wasm_bindgen(js_name = setMouseOffset)]
    pub fn set_mouse_offset(&self, x: f32, y: f32) {
        self.update_overrides(|o| o.mouse_offset = Some(Vec2::new(x, y)));
    }

    #[wasm_bindgen(js_name = clearOverrides)]
    pub fn clear_overrides(&self) {
        self.update_overrides(|o| *o = PointerOverrides::default());
    }

    /// Toggle the magnetic drift. Disabling it snaps the panel back to rest.
    #[wasm_bindgen(js_name = setMagneticPull)]
    pub fn set_magnetic_pull(&self, enabled: bool) {
        let mut s = self.inner.state().borrow_mut();
        s.config.magnetic_pull = enabled;
        s.controller.set_magnetic_pull(enabled);
    }

    /// Called after every click, once the ripple has been spawned.
    #[wasm_bindgen(js_name = setOnClick)]
    pub fn set_on_click(&self, callback: Option<js_sys::Function>) {
        self.inner.state().borrow_mut().on_click = callback;
    }

    #[wasm_bindgen(js_name = isMounted)]
    pub fn is_mounted(&self) -> bool {
        self.inner.is_mounted()
    }

    pub fn unmount(&mut self) {
        self.inner.unmount();
    }
}

impl LiquidGlass {
    fn update_overrides(&self, f: impl FnOnce(&mut PointerOverrides)) {
        let mut s = self.inner.state().borrow_mut();
        let mut overrides = s.controller.overrides();
        f(&mut overrides);
        s.controller.set_overrides(overrides);
    }
}
