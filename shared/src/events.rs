use serde::Serialize;

use crate::geometry::BackgroundMode;

/// Dispatched on `document` whenever the background offset changes.
pub const POSITION_CHANGED_EVENT: &str = "spiralTower:backgroundPositionChanged";
/// Dispatched by the page once a floor transition has swapped the background.
pub const FLOOR_LOADED_EVENT: &str = "spiralTower:floorLoaded";

/// Payload of [`POSITION_CHANGED_EVENT`].
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct PositionChanged {
    pub mode: BackgroundMode,
    /// Content-pixel offset from center.
    pub offset_x: f64,
    pub offset_y: f64,
    /// Background-position style percent; 50 is centered.
    pub percent_x: f64,
    pub percent_y: f64,
    pub scale: f64,
    /// False for intermediate animation/continuous frames.
    pub settled: bool,
}

impl PositionChanged {
    /// Screen-pixel translation applied to the background element.
    pub fn screen_offset(&self) -> (f64, f64) {
        (self.offset_x * self.scale, self.offset_y * self.scale)
    }
}
