use std::cell::RefCell;

use gloo_timers::callback::Timeout;
use spiral_shared::config::DEFAULT_RESIZE_DEBOUNCE_MS;
use spiral_shared::{Direction, FLOOR_LOADED_EVENT};
use wasm_bindgen::JsCast;
use wasm_bindgen::closure::Closure;

use crate::boot;
use crate::console;
use crate::host::with_host;
use crate::page;

const RECENTER_KEY: &str = "Home";

struct ResizeBinding {
    window: web_sys::Window,
    handler: Closure<dyn Fn()>,
}

struct KeydownBinding {
    window: web_sys::Window,
    handler: Closure<dyn Fn(web_sys::KeyboardEvent)>,
}

struct FloorLoadedBinding {
    document: web_sys::Document,
    handler: Closure<dyn Fn()>,
}

thread_local! {
    static RESIZE_BINDING: RefCell<Option<ResizeBinding>> = const { RefCell::new(None) };
    static RESIZE_DEBOUNCE: RefCell<Option<Timeout>> = const { RefCell::new(None) };
    static KEYDOWN_BINDING: RefCell<Option<KeydownBinding>> = const { RefCell::new(None) };
    static FLOOR_LOADED_BINDING: RefCell<Option<FloorLoadedBinding>> = const { RefCell::new(None) };
}

/// Installs the page-level listeners. Safe to call again; old bindings are removed first.
pub(crate) fn bind_all() {
    bind_resize();
    bind_keydown();
    bind_floor_loaded();
}

fn bind_resize() {
    RESIZE_BINDING.with(|slot| {
        if let Some(old) = slot.borrow_mut().take() {
            let _ = old
                .window
                .remove_event_listener_with_callback("resize", old.handler.as_ref().unchecked_ref());
        }
    });
    let Some(window) = web_sys::window() else {
        return;
    };

    let handler = Closure::<dyn Fn()>::new(|| {
        let delay = with_host(|host| host.config().resize_debounce_ms)
            .unwrap_or(DEFAULT_RESIZE_DEBOUNCE_MS);
        let timeout = Timeout::new(delay, refit_after_resize);
        RESIZE_DEBOUNCE.with(|slot| {
            if let Some(old) = slot.borrow_mut().replace(timeout) {
                old.cancel();
            }
        });
    });
    if window
        .add_event_listener_with_callback("resize", handler.as_ref().unchecked_ref())
        .is_err()
    {
        console::warn("failed to bind resize listener");
        return;
    }
    RESIZE_BINDING.with(|slot| *slot.borrow_mut() = Some(ResizeBinding { window, handler }));
}

/// Re-measures once the resize burst has settled. Sub-pixel changes are ignored.
fn refit_after_resize() {
    RESIZE_DEBOUNCE.with(|slot| slot.borrow_mut().take());
    let Ok(document) = page::document() else {
        return;
    };
    let Ok(body) = page::body(&document) else {
        return;
    };
    let viewport = page::viewport_size();

    let Some(pending) = with_host(|host| {
        let source = page::read_source(&document, &body);
        let changed = host.viewport().differs_materially(viewport)
            || source.as_ref().is_ok_and(|s| *s != host.source());
        (changed, source, page::read_transform(host.container()).scale)
    }) else {
        return;
    };

    match pending {
        (false, _, _) => {}
        (true, Ok(source), scale) => {
            with_host(|host| {
                let swapped = source != host.source();
                host.refit(source, viewport, scale);
                if swapped {
                    host.recenter();
                }
            });
        }
        (true, Err(e), _) => {
            // The background went away underneath us; start over.
            console::warn(&format!("{e} after resize; reinitializing"));
            boot::initialize();
        }
    }
}

fn bind_keydown() {
    KEYDOWN_BINDING.with(|slot| {
        if let Some(old) = slot.borrow_mut().take() {
            let _ = old.window.remove_event_listener_with_callback(
                "keydown",
                old.handler.as_ref().unchecked_ref(),
            );
        }
    });
    let Some(window) = web_sys::window() else {
        return;
    };

    let handler = Closure::<dyn Fn(web_sys::KeyboardEvent)>::new(|e: web_sys::KeyboardEvent| {
        if e.default_prevented() || e.alt_key() || e.ctrl_key() || e.meta_key() {
            return;
        }
        let key = e.key();
        let direction = Direction::from_key(&key);
        if (direction.is_none() && key != RECENTER_KEY) || target_is_editable(&e) {
            return;
        }
        let handled = with_host(|host| {
            if !host.is_scrollable() {
                return false;
            }
            match direction {
                Some(direction) => host.step(direction, true),
                None => host.recenter(),
            }
            true
        })
        .unwrap_or(false);
        if handled {
            e.prevent_default();
        }
    });
    if window
        .add_event_listener_with_callback("keydown", handler.as_ref().unchecked_ref())
        .is_err()
    {
        console::warn("failed to bind keydown listener");
        return;
    }
    KEYDOWN_BINDING.with(|slot| *slot.borrow_mut() = Some(KeydownBinding { window, handler }));
}

fn target_is_editable(e: &web_sys::KeyboardEvent) -> bool {
    let Some(element) = e
        .target()
        .and_then(|t| t.dyn_into::<web_sys::HtmlElement>().ok())
    else {
        return false;
    };
    element.is_content_editable()
        || matches!(
            element.tag_name().to_ascii_lowercase().as_str(),
            "input" | "textarea" | "select"
        )
}

fn bind_floor_loaded() {
    FLOOR_LOADED_BINDING.with(|slot| {
        if let Some(old) = slot.borrow_mut().take() {
            let _ = old.document.remove_event_listener_with_callback(
                FLOOR_LOADED_EVENT,
                old.handler.as_ref().unchecked_ref(),
            );
        }
    });
    let Ok(document) = page::document() else {
        return;
    };

    let handler = Closure::<dyn Fn()>::new(|| {
        console::info("floor loaded; reinitializing background scroll");
        boot::initialize();
    });
    if document
        .add_event_listener_with_callback(FLOOR_LOADED_EVENT, handler.as_ref().unchecked_ref())
        .is_err()
    {
        console::warn("failed to bind floor-loaded listener");
        return;
    }
    FLOOR_LOADED_BINDING
        .with(|slot| *slot.borrow_mut() = Some(FloorLoadedBinding { document, handler }));
}
