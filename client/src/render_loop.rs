use std::cell::{Cell, RefCell};
use std::rc::Rc;

use wasm_bindgen::prelude::*;

/// Drives pan operations off `requestAnimationFrame`.
///
/// At most one frame is outstanding at a time. The frame function receives
/// the frame timestamp (same clock as `performance.now()`) and returns `true`
/// while the active operation needs another frame.
pub struct FrameScheduler {
    inner: Rc<Inner>,
}

struct Inner {
    window: Option<web_sys::Window>,
    scheduled: Cell<bool>,
    raf_id: Cell<Option<i32>>,
    callback: RefCell<Option<Closure<dyn FnMut(f64)>>>,
}

impl Inner {
    fn schedule(&self) {
        if self.scheduled.get() {
            return;
        }
        let cb_ref = self.callback.borrow();
        let Some(ref cb) = *cb_ref else {
            return;
        };
        let Some(window) = self.window.as_ref() else {
            return;
        };
        match window.request_animation_frame(cb.as_ref().unchecked_ref()) {
            Ok(id) => {
                self.scheduled.set(true);
                self.raf_id.set(Some(id));
            }
            Err(_) => self.scheduled.set(false),
        }
    }

    fn cancel(&self) {
        if let Some(raf_id) = self.raf_id.replace(None)
            && let Some(window) = self.window.as_ref()
        {
            let _ = window.cancel_animation_frame(raf_id);
        }
        self.scheduled.set(false);
    }
}

impl FrameScheduler {
    pub fn new(frame_fn: impl Fn(f64) -> bool + 'static) -> Self {
        let inner = Rc::new(Inner {
            window: web_sys::window(),
            scheduled: Cell::new(false),
            raf_id: Cell::new(None),
            callback: RefCell::new(None),
        });

        let inner_cb = inner.clone();
        let cb = Closure::<dyn FnMut(f64)>::new(move |timestamp: f64| {
            inner_cb.scheduled.set(false);
            inner_cb.raf_id.set(None);
            if frame_fn(timestamp) {
                inner_cb.schedule();
            }
        });
        *inner.callback.borrow_mut() = Some(cb);

        Self { inner }
    }

    /// Ask for a frame. Cheap when one is already pending.
    pub fn request(&self) {
        self.inner.schedule();
    }

    /// Drop the pending frame, if any.
    pub fn cancel(&self) {
        self.inner.cancel();
    }
}

impl Drop for FrameScheduler {
    fn drop(&mut self) {
        self.inner.cancel();
        // Break the callback->inner reference cycle on teardown.
        self.inner.callback.borrow_mut().take();
    }
}
