use serde::Serialize;

use crate::config::ScrollConfig;
use crate::error::FitError;
use crate::geometry::{Axis, BackgroundMode, Offset, ScrollDirection, Size};

/// How far the scaled background sticks out past the viewport on one axis.
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize)]
pub struct AxisOverflow {
    /// Scaled size minus viewport size, never negative.
    pub excess: f64,
    /// Excess above the configured threshold.
    pub significant: bool,
}

impl AxisOverflow {
    fn measure(scaled: f64, viewport: f64, threshold: f64) -> Self {
        let excess = (scaled - viewport).max(0.0);
        Self {
            excess,
            significant: excess > threshold,
        }
    }

    /// Any positive excess enables scrolling, even below the threshold.
    pub fn enabled(&self) -> bool {
        self.significant || self.excess > 0.0
    }

    /// Enabled only because of the small-excess allowance.
    pub fn is_carve_out(&self) -> bool {
        self.excess > 0.0 && !self.significant
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize)]
pub struct Overflow {
    pub x: AxisOverflow,
    pub y: AxisOverflow,
    pub direction: ScrollDirection,
    /// Video only: total pixel travel available on each axis.
    pub max_scroll: Option<Offset>,
}

impl Overflow {
    /// Nothing overflows; used when the background cannot be measured.
    pub fn none() -> Self {
        Self::default()
    }

    pub fn along(&self, axis: Axis) -> AxisOverflow {
        match axis {
            Axis::X => self.x,
            Axis::Y => self.y,
        }
    }
}

/// Works out which axes of the scaled background exceed the viewport.
pub fn compute_overflow(
    natural: Size,
    scale: f64,
    viewport: Size,
    mode: BackgroundMode,
    config: &ScrollConfig,
) -> Result<Overflow, FitError> {
    if !natural.is_measurable() {
        return Err(FitError::ZeroDimension {
            width: natural.width,
            height: natural.height,
        });
    }
    if !viewport.is_measurable() {
        return Err(FitError::ZeroDimension {
            width: viewport.width,
            height: viewport.height,
        });
    }
    if !scale.is_finite() || scale <= 0.0 {
        return Err(FitError::InvalidScale(scale));
    }

    let threshold = config.overflow_threshold_px;
    let x = AxisOverflow::measure(natural.width * scale, viewport.width, threshold);
    let y = AxisOverflow::measure(natural.height * scale, viewport.height, threshold);

    let max_scroll = match mode {
        BackgroundMode::Video => Some(Offset::new(x.excess, y.excess)),
        BackgroundMode::Image => None,
    };

    Ok(Overflow {
        x,
        y,
        direction: ScrollDirection::from_axes(x.enabled(), y.enabled()),
        max_scroll,
    })
}
