use crate::dom::{self, js_err};
use crate::mount::{PanelState, Shared};
use anyhow::anyhow;
use glam::Vec2;
use glass_core::constants::RIPPLE_LIFETIME;
use instant::Instant;
use std::cell::RefCell;
use std::rc::{Rc, Weak};
use wasm_bindgen::closure::Closure;
use wasm_bindgen::JsCast;
use web_sys as web;

/// A DOM listener that detaches itself when dropped.
pub struct Listener {
    target: web::EventTarget,
    kind: &'static str,
    closure: Closure<dyn FnMut(web::MouseEvent)>,
}

impl Listener {
    pub fn attach(
        target: &web::EventTarget,
        kind: &'static str,
        handler: impl FnMut(web::MouseEvent) + 'static,
    ) -> anyhow::Result<Self> {
        let closure = Closure::wrap(Box::new(handler) as Box<dyn FnMut(web::MouseEvent)>);
        target
            .add_event_listener_with_callback(kind, closure.as_ref().unchecked_ref())
            .map_err(js_err)?;
        Ok(Self {
            target: target.clone(),
            kind,
            closure,
        })
    }
}

impl Drop for Listener {
    fn drop(&mut self) {
        _ = self
            .target
            .remove_event_listener_with_callback(self.kind, self.closure.as_ref().unchecked_ref());
    }
}

/// A pending `setTimeout`, cleared when dropped.
pub struct Timeout {
    handle: i32,
    _closure: Closure<dyn FnMut()>,
}

impl Timeout {
    pub fn schedule(ms: i32, f: impl FnOnce() + 'static) -> anyhow::Result<Self> {
        let window = web::window().ok_or_else(|| anyhow!("no window"))?;
        let closure = Closure::once(f);
        let handle = window
            .set_timeout_with_callback_and_timeout_and_arguments_0(
                closure.as_ref().unchecked_ref(),
                ms,
            )
            .map_err(js_err)?;
        Ok(Self {
            handle,
            _closure: closure,
        })
    }
}

impl Drop for Timeout {
    fn drop(&mut self) {
        if let Some(window) = web::window() {
            window.clear_timeout_with_handle(self.handle);
        }
    }
}

fn client_pos(ev: &web::MouseEvent) -> Vec2 {
    Vec2::new(ev.client_x() as f32, ev.client_y() as f32)
}

/// Wire pointer tracking, hover and click for one panel. Dropping the
/// returned listeners detaches everything.
pub fn wire(state: &Shared) -> anyhow::Result<Vec<Listener>> {
    let window = web::window().ok_or_else(|| anyhow!("no window"))?;
    let (host, panel) = {
        let s = state.borrow();
        (s.elements.host.clone(), s.elements.panel.clone())
    };

    let mut listeners = Vec::with_capacity(4);

    let s = state.clone();
    listeners.push(Listener::attach(&window, "mousemove", move |ev| {
        let mut s = s.borrow_mut();
        let bounds = s.tracked_bounds();
        s.controller.on_pointer_move(client_pos(&ev), bounds);
    })?);

    let s = state.clone();
    listeners.push(Listener::attach(&host, "mouseenter", move |_| {
        s.borrow_mut().controller.on_pointer_enter();
    })?);

    let s = state.clone();
    listeners.push(Listener::attach(&host, "mouseleave", move |_| {
        s.borrow_mut().controller.on_pointer_leave();
    })?);

    let s = state.clone();
    listeners.push(Listener::attach(&panel, "click", move |ev| {
        on_click(&s, &ev);
    })?);

    log::debug!("[events] wired {} listeners", listeners.len());
    Ok(listeners)
}

fn on_click(state: &Shared, ev: &web::MouseEvent) {
    let weak: Weak<RefCell<PanelState>> = Rc::downgrade(state);
    let callback = {
        let mut s = state.borrow_mut();
        let rect = dom::bounding_rect(&s.elements.panel);
        let pos = client_pos(ev) - Vec2::new(rect.left, rect.top);
        let id = s.controller.on_click(pos, Instant::now());
        if let Err(e) = s.add_ripple_node(id, pos) {
            log::warn!("[ripple] {e}");
        }
        // The frame loop prunes the ripple on expiry if the timer cannot be set.
        match Timeout::schedule(RIPPLE_LIFETIME.as_millis() as i32, move || {
            if let Some(state) = weak.upgrade() {
                state.borrow_mut().finish_ripple(id);
            }
        }) {
            Ok(timer) => s.timers.push((id, timer)),
            Err(e) => log::warn!("[ripple] timer: {e}"),
        }
        s.on_click.clone()
    };
    // Deferred so a callback that unmounts never runs inside this listener.
    if let (Some(f), Some(window)) = (callback, web::window()) {
        window.queue_microtask(&f);
    }
}
