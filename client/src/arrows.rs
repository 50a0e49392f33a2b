use std::cell::{Cell, RefCell};
use std::rc::Rc;

use gloo_timers::callback::Timeout;
use leptos::prelude::*;
use spiral_shared::config::DEFAULT_HOLD_DELAY_MS;
use spiral_shared::{ArrowState, Direction};

use crate::host::with_host;

/// The four directional scroll affordances.
#[component]
pub fn ScrollArrows(state: RwSignal<ArrowState>) -> impl IntoView {
    view! {
        <div class="scroll-arrows" style:display=move || if state.get().any() { "" } else { "none" }>
            {Direction::ALL
                .into_iter()
                .map(|direction| view! { <ScrollArrow direction=direction state=state /> })
                .collect_view()}
        </div>
    }
}

/// Click steps once with easing; press-and-hold pans continuously until released.
#[component]
fn ScrollArrow(direction: Direction, state: RwSignal<ArrowState>) -> impl IntoView {
    let enabled = move || state.get().is_enabled(direction);

    // Hold the timeout handle so release can cancel it before it fires.
    let hold_timeout = Rc::new(RefCell::new(None::<Timeout>));
    let holding = Rc::new(Cell::new(false));

    let on_pointer_down = {
        let hold_timeout = Rc::clone(&hold_timeout);
        let holding = Rc::clone(&holding);
        move |e: web_sys::PointerEvent| {
            if !state.get_untracked().is_enabled(direction) {
                return;
            }
            e.prevent_default();
            holding.set(false);

            let delay = with_host(|host| host.config().hold_delay_ms)
                .unwrap_or(DEFAULT_HOLD_DELAY_MS);
            let holding_cb = Rc::clone(&holding);
            let timeout = Timeout::new(delay, move || {
                holding_cb.set(true);
                with_host(|host| host.start_continuous(direction));
            });
            if let Some(old) = hold_timeout.borrow_mut().replace(timeout) {
                old.cancel();
            }
        }
    };

    let on_pointer_up = {
        let hold_timeout = Rc::clone(&hold_timeout);
        let holding = Rc::clone(&holding);
        move |_: web_sys::PointerEvent| {
            let Some(timeout) = hold_timeout.borrow_mut().take() else {
                return;
            };
            if holding.replace(false) {
                with_host(|host| host.stop_continuous());
            } else {
                timeout.cancel();
                with_host(|host| host.step(direction, true));
            }
        }
    };

    let on_pointer_leave = {
        let hold_timeout = Rc::clone(&hold_timeout);
        let holding = Rc::clone(&holding);
        move |_: web_sys::PointerEvent| {
            if let Some(timeout) = hold_timeout.borrow_mut().take() {
                timeout.cancel();
            }
            if holding.replace(false) {
                with_host(|host| host.stop_continuous());
            }
        }
    };
    let on_pointer_cancel = on_pointer_leave.clone();

    view! {
        <button
            type="button"
            class=format!("scroll-arrow scroll-{}", direction.label())
            class:active=enabled
            aria-label=format!("Scroll {}", direction.label())
            disabled=move || !enabled()
            on:pointerdown=on_pointer_down
            on:pointerup=on_pointer_up
            on:pointerleave=on_pointer_leave
            on:pointercancel=on_pointer_cancel
        ></button>
    }
}
