use crate::bounds::compute_bounds;
use crate::config::ScrollConfig;
use crate::error::FitError;
use crate::geometry::{Axis, BackgroundMode, BackgroundSource, Bounds, Offset, ScrollDirection, Size};
use crate::overflow::{Overflow, compute_overflow};

/// Transient scroll state for one background in one viewport.
///
/// The offset is in content pixels (before scale) and is kept inside
/// `bounds` by every mutation. Only [`crate::pan::PanController`] mutates it.
#[derive(Debug, Clone, PartialEq)]
pub struct ViewportFitState {
    source: BackgroundSource,
    viewport: Size,
    scale: f64,
    offset: Offset,
    overflow: Overflow,
    bounds: Bounds,
    degraded: Option<FitError>,
}

impl ViewportFitState {
    /// Measures a fresh, centered state. Unmeasurable input disables scrolling
    /// and records why in [`Self::degraded`].
    pub fn measure(
        source: BackgroundSource,
        viewport: Size,
        scale: f64,
        config: &ScrollConfig,
    ) -> Self {
        let (overflow, degraded) =
            match compute_overflow(source.natural, scale, viewport, source.mode, config) {
                Ok(overflow) => (overflow, None),
                Err(e) => (Overflow::none(), Some(e)),
            };
        let scale = if scale.is_finite() && scale > 0.0 {
            scale
        } else {
            1.0
        };
        let bounds = compute_bounds(&overflow, scale, source.mode, config);

        Self {
            source,
            viewport,
            scale,
            offset: Offset::ZERO,
            overflow,
            bounds,
            degraded,
        }
    }

    pub fn source(&self) -> BackgroundSource {
        self.source
    }

    pub fn mode(&self) -> BackgroundMode {
        self.source.mode
    }

    pub fn viewport(&self) -> Size {
        self.viewport
    }

    pub fn scale(&self) -> f64 {
        self.scale
    }

    pub fn offset(&self) -> Offset {
        self.offset
    }

    pub fn overflow(&self) -> &Overflow {
        &self.overflow
    }

    pub fn bounds(&self) -> &Bounds {
        &self.bounds
    }

    pub fn scroll_direction(&self) -> ScrollDirection {
        self.overflow.direction
    }

    /// Why scrolling is disabled, when it was disabled by bad input.
    pub fn degraded(&self) -> Option<&FitError> {
        self.degraded.as_ref()
    }

    pub fn is_scrollable(&self) -> bool {
        self.overflow.direction != ScrollDirection::None
    }

    /// Background-position style percent for each axis, in `[0, 100]`; 50 is centered.
    pub fn percent(&self) -> Offset {
        Offset::new(self.axis_percent(Axis::X), self.axis_percent(Axis::Y))
    }

    fn axis_percent(&self, axis: Axis) -> f64 {
        let excess = self.overflow.along(axis).excess;
        if excess <= 0.0 {
            return 50.0;
        }
        (50.0 - self.offset.along(axis) * self.scale / excess * 100.0).clamp(0.0, 100.0)
    }

    /// Distance left before the bound in `sign`'s direction on `axis`.
    pub(crate) fn remaining(&self, axis: Axis, sign: f64) -> f64 {
        let value = self.offset.along(axis);
        let range = self.bounds.along(axis);
        if sign < 0.0 {
            value - range.min
        } else {
            range.max - value
        }
    }

    /// Clamps and stores the offset. Returns whether it changed.
    pub(crate) fn set_offset(&mut self, offset: Offset) -> bool {
        let clamped = self.bounds.clamp(offset);
        let changed = clamped != self.offset;
        self.offset = clamped;
        changed
    }
}
