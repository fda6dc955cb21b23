use crate::dom::js_err;
use crate::mount::Shared;
use anyhow::anyhow;
use instant::Instant;
use std::cell::{Cell, RefCell};
use std::rc::Rc;
use wasm_bindgen::closure::Closure;
use wasm_bindgen::JsCast;
use web_sys as web;

type FrameCallback = Rc<RefCell<Option<Closure<dyn FnMut(f64)>>>>;

/// `requestAnimationFrame` loop re-applying a panel's visual state.
/// Stopping (or dropping) cancels the pending frame and frees the callback.
pub struct FrameLoop {
    window: web::Window,
    handle: Rc<Cell<Option<i32>>>,
    callback: FrameCallback,
}

impl FrameLoop {
    pub fn start(state: Shared) -> anyhow::Result<Self> {
        let window = web::window().ok_or_else(|| anyhow!("no window"))?;
        let handle = Rc::new(Cell::new(None));
        let callback: FrameCallback = Rc::new(RefCell::new(None));

        // The closure reschedules itself through `callback`; `stop` breaks
        // the cycle by taking it out.
        let next = callback.clone();
        let next_handle = handle.clone();
        let win = window.clone();
        *callback.borrow_mut() = Some(Closure::wrap(Box::new(move |_ts: f64| {
            next_handle.set(None);
            state.borrow_mut().render(Instant::now());
            if let Some(cb) = next.borrow().as_ref() {
                match win.request_animation_frame(cb.as_ref().unchecked_ref()) {
                    Ok(id) => next_handle.set(Some(id)),
                    Err(e) => log::error!("[frame] requestAnimationFrame failed: {:?}", e),
                }
            }
        }) as Box<dyn FnMut(f64)>));

        let id = {
            let cb = callback.borrow();
            let cb = cb.as_ref().ok_or_else(|| anyhow!("frame callback missing"))?;
            window
                .request_animation_frame(cb.as_ref().unchecked_ref())
                .map_err(js_err)?
        };
        handle.set(Some(id));
        Ok(Self {
            window,
            handle,
            callback,
        })
    }

    pub fn stop(&mut self) {
        if let Some(id) = self.handle.take() {
            _ = self.window.cancel_animation_frame(id);
        }
        self.callback.borrow_mut().take();
    }
}

impl Drop for FrameLoop {
    fn drop(&mut self) {
        self.stop();
    }
}
