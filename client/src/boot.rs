use std::any::Any;
use std::cell::RefCell;

use gloo_timers::callback::Timeout;
use leptos::mount::mount_to;
use leptos::prelude::*;
use spiral_shared::{ArrowState, FitError, PanController, ScrollConfig};

use crate::arrows::ScrollArrows;
use crate::console;
use crate::host::{self, ScrollHost};
use crate::page;

struct ArrowMount {
    state: RwSignal<ArrowState>,
    _handle: Box<dyn Any>,
}

thread_local! {
    static ARROW_MOUNT: RefCell<Option<ArrowMount>> = const { RefCell::new(None) };
    static INIT_RETRY: RefCell<Option<Timeout>> = const { RefCell::new(None) };
}

/// (Re)builds the scroll host from the current page, retrying with a fixed
/// delay while the background hasn't been laid out yet.
pub(crate) fn initialize() {
    attempt(0);
}

fn attempt(tries: u32) {
    // A new initialization supersedes any pending retry.
    INIT_RETRY.with(|slot| {
        if let Some(pending) = slot.borrow_mut().take() {
            pending.cancel();
        }
    });

    let dom = page::document().and_then(|document| {
        let body = page::body(&document)?;
        Ok((document, body))
    });
    let config = match &dom {
        Ok((_, body)) => page::read_config(body),
        Err(_) => ScrollConfig::default(),
    };
    let (delay, max_retries) = (config.init_retry_delay_ms, config.init_max_retries);

    let built = dom.and_then(|(document, body)| build_host(&document, &body, config));
    match built {
        Ok(host) => {
            host::install(host);
            if tries > 0 {
                console::info(&format!("background scroll ready after {tries} retries"));
            }
        }
        Err(FitError::MissingElement(name)) if tries < max_retries => {
            console::warn(&format!(
                "waiting for `{name}` (attempt {} of {max_retries})",
                tries + 1
            ));
            let timeout = Timeout::new(delay, move || attempt(tries + 1));
            INIT_RETRY.with(|slot| *slot.borrow_mut() = Some(timeout));
        }
        Err(e) => {
            console::warn(&format!("background scroll disabled: {e}"));
        }
    }
}

fn build_host(
    document: &web_sys::Document,
    body: &web_sys::HtmlElement,
    config: ScrollConfig,
) -> Result<ScrollHost, FitError> {
    let container = page::html_element_by_id(document, page::CONTAINER_ID)?;
    let source = page::read_source(document, body)?;
    let viewport = page::viewport_size();
    let transform = page::read_transform(&container);

    let controller = PanController::new(source, viewport, transform, config);
    if let Some(reason) = controller.state().degraded() {
        console::warn(&format!("scrolling disabled: {reason}"));
    }
    let markers = page::collect_markers(document);

    Ok(ScrollHost::new(
        controller,
        container,
        markers,
        arrow_state(document),
    ))
}

/// Mounts the arrow affordances once and hands back their shared state.
fn arrow_state(document: &web_sys::Document) -> RwSignal<ArrowState> {
    if let Some(state) = ARROW_MOUNT.with(|slot| slot.borrow().as_ref().map(|m| m.state)) {
        return state;
    }

    let state = RwSignal::new(ArrowState::default());
    let target = page::html_element_by_id(document, page::ARROWS_ROOT_ID)
        .ok()
        .or_else(|| document.body());
    if let Some(target) = target {
        let handle = mount_to(target, move || view! { <ScrollArrows state=state /> });
        ARROW_MOUNT.with(|slot| {
            *slot.borrow_mut() = Some(ArrowMount {
                state,
                _handle: Box::new(handle),
            });
        });
    } else {
        console::warn("no element to mount scroll arrows into");
    }
    state
}
