use serde::Deserialize;

use crate::error::FitError;

/// Pixels kept between the pan bound and the true edge of an image.
pub const DEFAULT_EDGE_BUFFER_PX: f64 = 20.0;
/// Excess below this is "negligible" (but see the carve-out in `overflow`).
pub const DEFAULT_OVERFLOW_THRESHOLD_PX: f64 = 10.0;
/// Smallest reachable range on an axis with any excess at all.
pub const DEFAULT_MIN_REACH_PX: f64 = 10.0;
pub const DEFAULT_STEP_PX: f64 = 100.0;
pub const DEFAULT_CONTINUOUS_STEP_PX: f64 = 6.0;
pub const DEFAULT_ANIMATION_MS: f64 = 300.0;
pub const DEFAULT_ARROW_EPSILON_PX: f64 = 2.0;
pub const DEFAULT_RESIZE_DEBOUNCE_MS: u32 = 150;
pub const DEFAULT_INIT_RETRY_DELAY_MS: u32 = 200;
pub const DEFAULT_INIT_MAX_RETRIES: u32 = 10;
pub const DEFAULT_HOLD_DELAY_MS: u32 = 250;
pub const DEFAULT_MARKER_PARALLAX_FACTOR: f64 = 1.0;

/// Tunables for the scroll engine. Every field can be overridden from the
/// page's `data-scroll-config` JSON; missing fields keep their defaults.
#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct ScrollConfig {
    pub edge_buffer_px: f64,
    pub overflow_threshold_px: f64,
    pub min_reach_px: f64,
    pub step_px: f64,
    pub continuous_step_px: f64,
    pub animation_ms: f64,
    pub arrow_epsilon_px: f64,
    pub resize_debounce_ms: u32,
    pub init_retry_delay_ms: u32,
    pub init_max_retries: u32,
    pub hold_delay_ms: u32,
    pub marker_parallax_factor: f64,
}

impl Default for ScrollConfig {
    fn default() -> Self {
        Self {
            edge_buffer_px: DEFAULT_EDGE_BUFFER_PX,
            overflow_threshold_px: DEFAULT_OVERFLOW_THRESHOLD_PX,
            min_reach_px: DEFAULT_MIN_REACH_PX,
            step_px: DEFAULT_STEP_PX,
            continuous_step_px: DEFAULT_CONTINUOUS_STEP_PX,
            animation_ms: DEFAULT_ANIMATION_MS,
            arrow_epsilon_px: DEFAULT_ARROW_EPSILON_PX,
            resize_debounce_ms: DEFAULT_RESIZE_DEBOUNCE_MS,
            init_retry_delay_ms: DEFAULT_INIT_RETRY_DELAY_MS,
            init_max_retries: DEFAULT_INIT_MAX_RETRIES,
            hold_delay_ms: DEFAULT_HOLD_DELAY_MS,
            marker_parallax_factor: DEFAULT_MARKER_PARALLAX_FACTOR,
        }
    }
}

impl ScrollConfig {
    /// Parses a JSON override. Blank input yields the defaults.
    pub fn from_json(raw: &str) -> Result<Self, FitError> {
        if raw.trim().is_empty() {
            return Ok(Self::default());
        }
        let config: Self =
            serde_json::from_str(raw).map_err(|e| FitError::InvalidConfig(e.to_string()))?;
        config.validate()?;
        Ok(config)
    }

    pub fn validate(&self) -> Result<(), FitError> {
        let non_negative = [
            ("edgeBufferPx", self.edge_buffer_px),
            ("overflowThresholdPx", self.overflow_threshold_px),
            ("minReachPx", self.min_reach_px),
            ("arrowEpsilonPx", self.arrow_epsilon_px),
            ("markerParallaxFactor", self.marker_parallax_factor),
        ];
        for (name, value) in non_negative {
            if !value.is_finite() || value < 0.0 {
                return Err(FitError::InvalidConfig(format!(
                    "{name} must be a non-negative number, got {value}"
                )));
            }
        }

        let positive = [
            ("stepPx", self.step_px),
            ("continuousStepPx", self.continuous_step_px),
            ("animationMs", self.animation_ms),
        ];
        for (name, value) in positive {
            if !value.is_finite() || value <= 0.0 {
                return Err(FitError::InvalidConfig(format!(
                    "{name} must be a positive number, got {value}"
                )));
            }
        }
        Ok(())
    }
}
