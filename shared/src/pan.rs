use crate::animation::PanAnimation;
use crate::arrows::ArrowState;
use crate::config::ScrollConfig;
use crate::events::PositionChanged;
use crate::fit::ViewportFitState;
use crate::geometry::{BackgroundSource, Direction, Offset, Size};
use crate::transform::AffineTransform;

/// What the controller is doing right now.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PanPhase {
    Idle,
    ContinuousPanning(Direction),
    Animating,
}

/// Result of a pan operation request.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PanOutcome {
    /// The offset was written and the controller is idle.
    Settled,
    /// An operation started; drive it with [`PanController::tick`].
    Scheduled,
    /// Nothing observable changed.
    Unchanged,
    /// Rejected because an animation is in flight.
    Busy,
}

/// Result of advancing one display frame.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FrameOutcome {
    /// No operation was active.
    Idle,
    /// The offset moved and another frame is needed.
    Continue,
    /// The operation finished this frame.
    Settled,
}

#[derive(Debug, Clone, Copy, PartialEq)]
enum Operation {
    Continuous(Direction),
    Animation(PanAnimation),
}

/// Owns the scroll state and the single in-flight operation slot.
///
/// Time is passed in as milliseconds (`performance.now()` in the browser), so
/// the controller itself never touches a clock.
#[derive(Debug, Clone)]
pub struct PanController {
    state: ViewportFitState,
    config: ScrollConfig,
    current: Option<Operation>,
}

impl PanController {
    /// Measures the background and adopts whatever translation the page
    /// already applied, clamped into the new bounds.
    pub fn new(
        source: BackgroundSource,
        viewport: Size,
        transform: AffineTransform,
        config: ScrollConfig,
    ) -> Self {
        let mut state = ViewportFitState::measure(source, viewport, transform.scale, &config);
        let scale = state.scale();
        state.set_offset(Offset::new(
            transform.offset_x / scale,
            transform.offset_y / scale,
        ));
        Self {
            state,
            config,
            current: None,
        }
    }

    pub fn state(&self) -> &ViewportFitState {
        &self.state
    }

    pub fn config(&self) -> &ScrollConfig {
        &self.config
    }

    pub fn phase(&self) -> PanPhase {
        match self.current {
            None => PanPhase::Idle,
            Some(Operation::Continuous(direction)) => PanPhase::ContinuousPanning(direction),
            Some(Operation::Animation(_)) => PanPhase::Animating,
        }
    }

    /// Drops the in-flight operation, leaving the offset where it is.
    pub fn cancel(&mut self) -> bool {
        self.current.take().is_some()
    }

    /// Moves one fixed step. While continuous panning the hold is released
    /// first; while animating the step is refused.
    pub fn step_pan(&mut self, direction: Direction, animate: bool, now: f64) -> PanOutcome {
        if matches!(self.current, Some(Operation::Animation(_))) {
            return PanOutcome::Busy;
        }
        let interrupted = self.cancel();

        let axis = direction.axis();
        let delta = self.config.step_px / self.state.scale() * direction.sign();
        let from = self.state.offset();
        let target = self
            .state
            .bounds()
            .clamp(from.with(axis, from.along(axis) + delta));

        if target == from {
            return if interrupted {
                PanOutcome::Settled
            } else {
                PanOutcome::Unchanged
            };
        }

        if animate {
            self.begin_animation(from, target, now);
            PanOutcome::Scheduled
        } else {
            self.state.set_offset(target);
            PanOutcome::Settled
        }
    }

    /// Eased pan to an arbitrary target (clamped into bounds).
    pub fn animate_to(&mut self, target: Offset, now: f64) -> PanOutcome {
        if matches!(self.current, Some(Operation::Animation(_))) {
            return PanOutcome::Busy;
        }
        let interrupted = self.cancel();

        let from = self.state.offset();
        let target = self.state.bounds().clamp(target);
        if target == from {
            return if interrupted {
                PanOutcome::Settled
            } else {
                PanOutcome::Unchanged
            };
        }
        self.begin_animation(from, target, now);
        PanOutcome::Scheduled
    }

    fn begin_animation(&mut self, from: Offset, to: Offset, now: f64) {
        self.current = Some(Operation::Animation(PanAnimation::new(
            from,
            to,
            now,
            self.config.animation_ms,
        )));
    }

    /// Starts per-frame panning until the bound is hit or it is stopped.
    pub fn start_continuous_pan(&mut self, direction: Direction) -> PanOutcome {
        match self.current {
            Some(Operation::Animation(_)) => return PanOutcome::Busy,
            Some(Operation::Continuous(active)) if active == direction => {
                return PanOutcome::Unchanged;
            }
            _ => {}
        }

        if self.state.remaining(direction.axis(), direction.sign()) <= 0.0 {
            return if self.cancel() {
                PanOutcome::Settled
            } else {
                PanOutcome::Unchanged
            };
        }

        self.current = Some(Operation::Continuous(direction));
        PanOutcome::Scheduled
    }

    /// Ends a continuous pan. A no-op when not continuous panning.
    pub fn stop_continuous_pan(&mut self) -> PanOutcome {
        if matches!(self.current, Some(Operation::Continuous(_))) {
            self.current = None;
            PanOutcome::Settled
        } else {
            PanOutcome::Unchanged
        }
    }

    /// Cancels anything in flight and returns to the centered position.
    pub fn force_recenter(&mut self) -> PanOutcome {
        self.current = None;
        self.state.set_offset(Offset::ZERO);
        PanOutcome::Settled
    }

    /// Re-measures after a resize, keeping the offset where it still fits.
    pub fn refit(&mut self, source: BackgroundSource, viewport: Size, scale: f64) -> PanOutcome {
        self.current = None;
        let offset = self.state.offset();
        self.state = ViewportFitState::measure(source, viewport, scale, &self.config);
        self.state.set_offset(offset);
        PanOutcome::Settled
    }

    /// Advances the active operation by one display frame.
    pub fn tick(&mut self, now: f64) -> FrameOutcome {
        let Some(operation) = self.current else {
            return FrameOutcome::Idle;
        };

        match operation {
            Operation::Continuous(direction) => {
                let axis = direction.axis();
                let delta = self.config.continuous_step_px / self.state.scale() * direction.sign();
                let offset = self.state.offset();
                self.state
                    .set_offset(offset.with(axis, offset.along(axis) + delta));

                if self.state.remaining(axis, direction.sign()) <= 0.0 {
                    self.current = None;
                    FrameOutcome::Settled
                } else {
                    FrameOutcome::Continue
                }
            }
            Operation::Animation(animation) => match animation.current_offset(now) {
                Some(offset) => {
                    self.state.set_offset(offset);
                    FrameOutcome::Continue
                }
                None => {
                    self.state.set_offset(animation.to);
                    self.current = None;
                    FrameOutcome::Settled
                }
            },
        }
    }

    /// The transform to write to the background element.
    pub fn transform(&self) -> AffineTransform {
        let scale = self.state.scale();
        let offset = self.state.offset();
        AffineTransform {
            scale,
            offset_x: offset.x * scale,
            offset_y: offset.y * scale,
        }
    }

    pub fn arrows(&self) -> ArrowState {
        ArrowState::compute(
            self.state.offset(),
            self.state.bounds(),
            self.state.scroll_direction(),
            self.config.arrow_epsilon_px / self.state.scale(),
        )
    }

    pub fn position(&self) -> PositionChanged {
        let offset = self.state.offset();
        let percent = self.state.percent();
        PositionChanged {
            mode: self.state.mode(),
            offset_x: offset.x,
            offset_y: offset.y,
            percent_x: percent.x,
            percent_y: percent.y,
            scale: self.state.scale(),
            settled: self.current.is_none(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::FitError;
    use crate::geometry::{AxisBounds, ScrollDirection};
    use crate::markers::{MarkerAnchor, place_marker};

    fn assert_close(actual: f64, expected: f64) {
        let diff = (actual - expected).abs();
        assert!(
            diff < 1e-9,
            "expected {expected}, got {actual} (diff: {diff})"
        );
    }

    fn wide_image() -> PanController {
        PanController::new(
            BackgroundSource::image(2000.0, 1000.0),
            Size::new(1000.0, 1000.0),
            AffineTransform::IDENTITY,
            ScrollConfig::default(),
        )
    }

    fn video() -> PanController {
        PanController::new(
            BackgroundSource::video(1600.0, 900.0),
            Size::new(1280.0, 720.0),
            AffineTransform::IDENTITY,
            ScrollConfig::default(),
        )
    }

    fn run_until_idle(controller: &mut PanController, start: f64) -> usize {
        let mut frames = 0;
        let mut now = start;
        loop {
            now += 16.0;
            frames += 1;
            match controller.tick(now) {
                FrameOutcome::Continue => {
                    assert!(controller.state().bounds().contains(controller.state().offset()));
                }
                FrameOutcome::Settled | FrameOutcome::Idle => return frames,
            }
            assert!(frames < 10_000, "operation never settled");
        }
    }

    #[test]
    fn wide_image_scenario() {
        let controller = wide_image();
        let state = controller.state();
        assert_eq!(state.scroll_direction(), ScrollDirection::Horizontal);
        assert_close(state.bounds().x.min, -480.0);
        assert_close(state.bounds().x.max, 480.0);
        assert_eq!(state.bounds().y, AxisBounds::FIXED);
        let arrows = controller.arrows();
        assert!(arrows.left && arrows.right && !arrows.up && !arrows.down);
    }

    #[test]
    fn small_image_scenario_hides_arrows() {
        let controller = PanController::new(
            BackgroundSource::image(500.0, 500.0),
            Size::new(1000.0, 1000.0),
            AffineTransform::IDENTITY,
            ScrollConfig::default(),
        );
        assert_eq!(controller.state().scroll_direction(), ScrollDirection::None);
        assert!(!controller.arrows().any());
    }

    #[test]
    fn video_continuous_left_stops_exactly_at_bound() {
        let mut controller = video();
        assert_eq!(
            controller.state().overflow().max_scroll,
            Some(Offset::new(320.0, 180.0))
        );

        assert_eq!(controller.start_continuous_pan(Direction::Left), PanOutcome::Scheduled);
        assert_eq!(controller.phase(), PanPhase::ContinuousPanning(Direction::Left));
        run_until_idle(&mut controller, 0.0);

        assert_eq!(controller.state().offset().x, -160.0);
        assert_eq!(controller.phase(), PanPhase::Idle);
        assert!(!controller.arrows().left);

        // Pushing further left is refused.
        assert_eq!(controller.start_continuous_pan(Direction::Left), PanOutcome::Unchanged);
        assert_eq!(controller.state().offset().x, -160.0);
    }

    #[test]
    fn immediate_steps_stay_in_bounds() {
        let mut controller = wide_image();
        let sequence = [
            Direction::Left,
            Direction::Left,
            Direction::Left,
            Direction::Left,
            Direction::Left,
            Direction::Left,
            Direction::Up,
            Direction::Right,
            Direction::Down,
            Direction::Right,
        ];
        for direction in sequence {
            controller.step_pan(direction, false, 0.0);
            assert!(controller.state().bounds().contains(controller.state().offset()));
        }
        assert_close(controller.state().offset().x, -280.0);
        assert_eq!(controller.state().offset().y, 0.0);
    }

    #[test]
    fn step_at_bound_is_unchanged() {
        let mut controller = wide_image();
        for _ in 0..5 {
            controller.step_pan(Direction::Right, false, 0.0);
        }
        assert_close(controller.state().offset().x, 480.0);
        assert_eq!(controller.step_pan(Direction::Right, false, 0.0), PanOutcome::Unchanged);
        assert_eq!(controller.step_pan(Direction::Up, false, 0.0), PanOutcome::Unchanged);
    }

    #[test]
    fn animated_step_eases_to_target() {
        let mut controller = wide_image();
        assert_eq!(controller.step_pan(Direction::Left, true, 1000.0), PanOutcome::Scheduled);
        assert_eq!(controller.phase(), PanPhase::Animating);
        assert!(!controller.position().settled);

        assert_eq!(controller.tick(1150.0), FrameOutcome::Continue);
        let mid = controller.state().offset().x;
        assert!(mid < -50.0 && mid > -100.0, "midpoint {mid}");

        assert_eq!(controller.tick(1300.0), FrameOutcome::Settled);
        assert_eq!(controller.state().offset().x, -100.0);
        assert_eq!(controller.phase(), PanPhase::Idle);
        assert!(controller.position().settled);
    }

    #[test]
    fn animation_rejects_new_starts() {
        let mut controller = wide_image();
        controller.step_pan(Direction::Left, true, 0.0);
        assert_eq!(controller.step_pan(Direction::Right, true, 10.0), PanOutcome::Busy);
        assert_eq!(controller.start_continuous_pan(Direction::Right), PanOutcome::Busy);
        assert_eq!(controller.animate_to(Offset::ZERO, 10.0), PanOutcome::Busy);
        assert_eq!(controller.stop_continuous_pan(), PanOutcome::Unchanged);
        assert_eq!(controller.phase(), PanPhase::Animating);
    }

    #[test]
    fn step_releases_continuous_pan() {
        let mut controller = wide_image();
        controller.start_continuous_pan(Direction::Right);
        controller.tick(16.0);
        assert_eq!(controller.step_pan(Direction::Left, false, 32.0), PanOutcome::Settled);
        assert_eq!(controller.phase(), PanPhase::Idle);
        assert_close(controller.state().offset().x, 6.0 - 100.0);
    }

    #[test]
    fn continuous_pan_switches_direction() {
        let mut controller = wide_image();
        controller.start_continuous_pan(Direction::Right);
        assert_eq!(controller.start_continuous_pan(Direction::Right), PanOutcome::Unchanged);
        assert_eq!(controller.start_continuous_pan(Direction::Left), PanOutcome::Scheduled);
        assert_eq!(controller.phase(), PanPhase::ContinuousPanning(Direction::Left));
    }

    #[test]
    fn stop_when_idle_has_no_effect() {
        let mut controller = wide_image();
        controller.step_pan(Direction::Left, false, 0.0);
        let before = controller.state().clone();
        assert_eq!(controller.stop_continuous_pan(), PanOutcome::Unchanged);
        assert_eq!(controller.stop_continuous_pan(), PanOutcome::Unchanged);
        assert_eq!(controller.state(), &before);
        assert_eq!(controller.tick(100.0), FrameOutcome::Idle);
    }

    #[test]
    fn stop_ends_continuous_pan_where_it_is() {
        let mut controller = wide_image();
        controller.start_continuous_pan(Direction::Left);
        controller.tick(16.0);
        controller.tick(32.0);
        assert_eq!(controller.stop_continuous_pan(), PanOutcome::Settled);
        assert_close(controller.state().offset().x, -12.0);
        assert_eq!(controller.tick(48.0), FrameOutcome::Idle);
    }

    #[test]
    fn recenter_is_idempotent_and_cancels() {
        let mut controller = wide_image();
        controller.step_pan(Direction::Left, false, 0.0);
        controller.step_pan(Direction::Left, true, 0.0);

        assert_eq!(controller.force_recenter(), PanOutcome::Settled);
        let first = controller.state().clone();
        assert_eq!(controller.force_recenter(), PanOutcome::Settled);
        assert_eq!(controller.state(), &first);
        assert_eq!(first.offset(), Offset::ZERO);
        assert_eq!(controller.phase(), PanPhase::Idle);
        assert_eq!(controller.position().percent_x, 50.0);
    }

    #[test]
    fn video_recenter_returns_to_zero_and_is_idempotent() {
        let mut controller = video();
        controller.start_continuous_pan(Direction::Left);
        run_until_idle(&mut controller, 0.0);
        assert_eq!(controller.state().offset().x, -160.0);

        assert_eq!(controller.force_recenter(), PanOutcome::Settled);
        assert_eq!(controller.state().offset(), Offset::ZERO);
        assert_eq!(controller.transform().to_css(), "translate(0px, 0px) scale(1)");
        let first = controller.state().clone();
        assert_eq!(controller.force_recenter(), PanOutcome::Settled);
        assert_eq!(controller.state(), &first);
        assert!(controller.arrows().left && controller.arrows().right);
    }

    #[test]
    fn tiny_excess_never_pans_past_the_image_edge() {
        let mut controller = PanController::new(
            BackgroundSource::image(1004.0, 800.0),
            Size::new(1000.0, 800.0),
            AffineTransform::IDENTITY,
            ScrollConfig::default(),
        );
        assert_eq!(controller.state().scroll_direction(), ScrollDirection::Horizontal);

        assert_eq!(controller.step_pan(Direction::Left, false, 0.0), PanOutcome::Settled);
        assert_close(controller.state().offset().x, -2.0);
        let position = controller.position();
        assert_close(position.percent_x, 100.0);
        assert_close(position.percent_y, 50.0);

        let placement = place_marker(MarkerAnchor::percent(30.0, 50.0), &position, 1.0);
        assert_close(placement.left_pct, -20.0);
        assert_close(placement.top_pct, 50.0);

        controller.step_pan(Direction::Right, false, 0.0);
        controller.step_pan(Direction::Right, false, 0.0);
        assert_close(controller.state().offset().x, 2.0);
        assert_close(controller.position().percent_x, 0.0);
    }

    #[test]
    fn refit_recovers_from_zero_dimension() {
        let mut controller = PanController::new(
            BackgroundSource::image(0.0, 0.0),
            Size::new(1000.0, 1000.0),
            AffineTransform::IDENTITY,
            ScrollConfig::default(),
        );
        assert!(matches!(
            controller.state().degraded(),
            Some(FitError::ZeroDimension { .. })
        ));
        assert_eq!(controller.step_pan(Direction::Left, false, 0.0), PanOutcome::Unchanged);

        assert_eq!(
            controller.refit(
                BackgroundSource::image(2000.0, 1000.0),
                Size::new(1000.0, 1000.0),
                1.0
            ),
            PanOutcome::Settled
        );
        assert!(controller.state().degraded().is_none());
        assert!(controller.state().is_scrollable());
        assert_close(controller.state().bounds().x.min, -480.0);
        assert_close(controller.state().bounds().x.max, 480.0);
        assert_eq!(controller.step_pan(Direction::Left, false, 0.0), PanOutcome::Settled);
        assert_close(controller.state().offset().x, -100.0);
    }

    #[test]
    fn refit_clamps_into_smaller_bounds() {
        let mut controller = wide_image();
        for _ in 0..4 {
            controller.step_pan(Direction::Left, false, 0.0);
        }
        assert_close(controller.state().offset().x, -400.0);

        controller.start_continuous_pan(Direction::Left);
        assert_eq!(
            controller.refit(
                BackgroundSource::image(2000.0, 1000.0),
                Size::new(1600.0, 1000.0),
                1.0
            ),
            PanOutcome::Settled
        );
        assert_eq!(controller.phase(), PanPhase::Idle);
        assert_close(controller.state().bounds().x.min, -180.0);
        assert_close(controller.state().offset().x, -180.0);
    }

    #[test]
    fn new_adopts_existing_translation() {
        let controller = PanController::new(
            BackgroundSource::image(2000.0, 1000.0),
            Size::new(1000.0, 1000.0),
            AffineTransform {
                scale: 1.0,
                offset_x: -150.0,
                offset_y: 30.0,
            },
            ScrollConfig::default(),
        );
        assert_eq!(controller.state().offset(), Offset::new(-150.0, 0.0));
        assert_eq!(
            controller.transform().to_css(),
            "translate(-150px, 0px) scale(1)"
        );
    }

    #[test]
    fn scaled_background_steps_in_screen_pixels() {
        let mut controller = PanController::new(
            BackgroundSource::image(1000.0, 1000.0),
            Size::new(1000.0, 1000.0),
            AffineTransform {
                scale: 2.0,
                offset_x: 0.0,
                offset_y: 0.0,
            },
            ScrollConfig::default(),
        );
        controller.step_pan(Direction::Down, false, 0.0);
        assert_close(controller.state().offset().y, 50.0);
        assert_close(controller.transform().offset_y, 100.0);
    }

    #[test]
    fn animate_to_clamps_target() {
        let mut controller = wide_image();
        assert_eq!(
            controller.animate_to(Offset::new(900.0, 900.0), 0.0),
            PanOutcome::Scheduled
        );
        run_until_idle(&mut controller, 0.0);
        assert_eq!(controller.state().offset(), Offset::new(480.0, 0.0));
        assert_eq!(controller.animate_to(Offset::new(480.0, 0.0), 0.0), PanOutcome::Unchanged);
    }

    #[test]
    fn image_percent_follows_offset() {
        let mut controller = wide_image();
        controller.step_pan(Direction::Left, false, 0.0);
        controller.step_pan(Direction::Left, false, 0.0);
        let position = controller.position();
        assert_close(position.percent_x, 70.0);
        assert_close(position.percent_y, 50.0);
    }
}
