use crate::config::ScrollConfig;
use crate::geometry::{Axis, AxisBounds, BackgroundMode, Bounds};
use crate::overflow::Overflow;

/// Derives the pan range from an overflow result.
///
/// Content is pan-centered, so only half the excess is reachable in either
/// direction. Images also keep `edge_buffer_px` back from their edge; video
/// players may travel the full half. Any axis with excess gets at least
/// `min_reach_px` (or the whole half excess, if smaller) so one step is
/// always possible.
pub fn compute_bounds(
    overflow: &Overflow,
    scale: f64,
    mode: BackgroundMode,
    config: &ScrollConfig,
) -> Bounds {
    if !scale.is_finite() || scale <= 0.0 {
        return Bounds::default();
    }
    Bounds {
        x: axis_bounds(overflow, Axis::X, scale, mode, config),
        y: axis_bounds(overflow, Axis::Y, scale, mode, config),
    }
}

fn axis_bounds(
    overflow: &Overflow,
    axis: Axis,
    scale: f64,
    mode: BackgroundMode,
    config: &ScrollConfig,
) -> AxisBounds {
    let axis_overflow = overflow.along(axis);
    if !axis_overflow.enabled() {
        return AxisBounds::FIXED;
    }

    let reach = match mode {
        BackgroundMode::Image => {
            let half = axis_overflow.excess / 2.0 / scale;
            (half - config.edge_buffer_px / scale).max(0.0)
        }
        BackgroundMode::Video => {
            let travel = overflow
                .max_scroll
                .map_or(axis_overflow.excess, |max| max.along(axis));
            travel / 2.0 / scale
        }
    };

    // The minimum reach never exceeds the half excess, so no empty edge shows.
    let floor = config.min_reach_px.min(axis_overflow.excess / 2.0) / scale;
    AxisBounds::symmetric(reach.max(floor))
}
