use std::cell::RefCell;

use leptos::prelude::*;
use spiral_shared::{
    ArrowState, BackgroundSource, Direction, FrameOutcome, MarkerSynchronizer, POSITION_CHANGED_EVENT,
    PanController, PanOutcome, PositionChanged, ScrollConfig, Size,
};
use web_sys::{CustomEvent, CustomEventInit, HtmlElement};

use crate::console;
use crate::page::{self, MarkerElement};
use crate::render_loop::FrameScheduler;

thread_local! {
    static HOST: RefCell<Option<ScrollHost>> = const { RefCell::new(None) };
}

/// Runs `f` against the live host, if one is installed.
pub(crate) fn with_host<R>(f: impl FnOnce(&mut ScrollHost) -> R) -> Option<R> {
    HOST.with(|slot| slot.borrow_mut().as_mut().map(f))
}

/// Replaces the live host. The previous one (and its pending frame) is dropped.
pub(crate) fn install(host: ScrollHost) {
    let old = HOST.with(|slot| slot.borrow_mut().replace(host));
    drop(old);
    with_host(|host| host.render(true));
}

/// Binds one [`PanController`] to the background element, its markers and
/// the arrow affordances.
pub(crate) struct ScrollHost {
    controller: PanController,
    container: HtmlElement,
    markers: MarkerSynchronizer,
    marker_elements: Vec<(String, HtmlElement)>,
    arrows: RwSignal<ArrowState>,
    scheduler: FrameScheduler,
}

impl ScrollHost {
    pub(crate) fn new(
        controller: PanController,
        container: HtmlElement,
        markers: Vec<MarkerElement>,
        arrows: RwSignal<ArrowState>,
    ) -> Self {
        let mut sync = MarkerSynchronizer::new(controller.config().marker_parallax_factor);
        let mut marker_elements = Vec::with_capacity(markers.len());
        for marker in markers {
            sync.track(marker.id.clone(), marker.anchor);
            marker_elements.push((marker.id, marker.element));
        }

        let scheduler =
            FrameScheduler::new(|now| with_host(|host| host.on_frame(now)).unwrap_or(false));

        Self {
            controller,
            container,
            markers: sync,
            marker_elements,
            arrows,
            scheduler,
        }
    }

    pub(crate) fn config(&self) -> &ScrollConfig {
        self.controller.config()
    }

    pub(crate) fn is_scrollable(&self) -> bool {
        self.controller.state().is_scrollable()
    }

    pub(crate) fn source(&self) -> BackgroundSource {
        self.controller.state().source()
    }

    pub(crate) fn viewport(&self) -> Size {
        self.controller.state().viewport()
    }

    pub(crate) fn container(&self) -> &HtmlElement {
        &self.container
    }

    pub(crate) fn step(&mut self, direction: Direction, animate: bool) {
        let outcome = self.controller.step_pan(direction, animate, page::now_ms());
        self.handle(outcome);
    }

    pub(crate) fn start_continuous(&mut self, direction: Direction) {
        let outcome = self.controller.start_continuous_pan(direction);
        self.handle(outcome);
    }

    pub(crate) fn stop_continuous(&mut self) {
        let outcome = self.controller.stop_continuous_pan();
        self.handle(outcome);
    }

    pub(crate) fn recenter(&mut self) {
        let outcome = self.controller.force_recenter();
        self.handle(outcome);
    }

    pub(crate) fn refit(&mut self, source: BackgroundSource, viewport: Size, scale: f64) {
        let outcome = self.controller.refit(source, viewport, scale);
        if let Some(reason) = self.controller.state().degraded() {
            console::warn(&format!("scrolling disabled after resize: {reason}"));
        }
        self.handle(outcome);
    }

    fn handle(&mut self, outcome: PanOutcome) {
        match outcome {
            PanOutcome::Settled => {
                self.scheduler.cancel();
                self.render(true);
            }
            PanOutcome::Scheduled => {
                self.arrows.set(self.controller.arrows());
                self.scheduler.request();
            }
            PanOutcome::Unchanged | PanOutcome::Busy => {}
        }
    }

    fn on_frame(&mut self, now: f64) -> bool {
        match self.controller.tick(now) {
            FrameOutcome::Idle => false,
            FrameOutcome::Continue => {
                self.render(false);
                true
            }
            FrameOutcome::Settled => {
                self.render(true);
                false
            }
        }
    }

    /// Writes the current state to the page. Arrow state is only refreshed
    /// on settled writes so held arrows don't flicker.
    fn render(&mut self, settled: bool) {
        let css = self.controller.transform().to_css();
        if let Err(e) = self.container.style().set_property("transform", &css) {
            console::warn(&format!("failed to apply transform: {e:?}"));
        }

        let position = self.controller.position();
        self.sync_markers(&position);
        dispatch_position_changed(&position);

        if settled {
            self.arrows.set(self.controller.arrows());
        }
    }

    fn sync_markers(&mut self, position: &PositionChanged) {
        for (id, placement) in self.markers.sync(position) {
            let Some((_, element)) = self.marker_elements.iter().find(|(el_id, _)| *el_id == id)
            else {
                continue;
            };
            let style = element.style();
            for (property, value) in page::marker_css(&placement) {
                if let Err(e) = style.set_property(property, &value) {
                    console::warn(&format!("failed to place marker `{id}`: {e:?}"));
                }
            }
        }
    }
}

fn dispatch_position_changed(position: &PositionChanged) {
    let Ok(document) = page::document() else {
        return;
    };
    let detail = match serde_wasm_bindgen::to_value(position) {
        Ok(detail) => detail,
        Err(e) => {
            console::warn(&format!("failed to encode position: {e}"));
            return;
        }
    };
    let init = CustomEventInit::new();
    init.set_detail(&detail);
    match CustomEvent::new_with_event_init_dict(POSITION_CHANGED_EVENT, &init) {
        Ok(event) => {
            if let Err(e) = document.dispatch_event(&event) {
                console::warn(&format!("failed to dispatch position event: {e:?}"));
            }
        }
        Err(e) => console::warn(&format!("failed to create position event: {e:?}")),
    }
}
