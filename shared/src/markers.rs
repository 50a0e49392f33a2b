use crate::events::PositionChanged;
use crate::geometry::BackgroundMode;

/// Where a marker is pinned on the background.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct MarkerAnchor {
    pub x_pct: f64,
    pub y_pct: f64,
    /// Pixel nudge on top of the percent anchor.
    pub dx_px: f64,
    pub dy_px: f64,
}

impl MarkerAnchor {
    pub fn percent(x_pct: f64, y_pct: f64) -> Self {
        Self {
            x_pct,
            y_pct,
            dx_px: 0.0,
            dy_px: 0.0,
        }
    }

    pub fn with_pixels(self, dx_px: f64, dy_px: f64) -> Self {
        Self {
            dx_px,
            dy_px,
            ..self
        }
    }
}

/// Rendered position: percent `left`/`top` plus a pixel translation.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct MarkerPlacement {
    pub left_pct: f64,
    pub top_pct: f64,
    pub shift_x_px: f64,
    pub shift_y_px: f64,
}

/// Image backgrounds shift markers by the percent distance from center;
/// video backgrounds translate them with the player in pixels.
pub fn place_marker(
    anchor: MarkerAnchor,
    position: &PositionChanged,
    parallax_factor: f64,
) -> MarkerPlacement {
    match position.mode {
        BackgroundMode::Image => MarkerPlacement {
            left_pct: anchor.x_pct + (50.0 - position.percent_x) * parallax_factor,
            top_pct: anchor.y_pct + (50.0 - position.percent_y) * parallax_factor,
            shift_x_px: anchor.dx_px,
            shift_y_px: anchor.dy_px,
        },
        BackgroundMode::Video => {
            let (sx, sy) = position.screen_offset();
            MarkerPlacement {
                left_pct: anchor.x_pct,
                top_pct: anchor.y_pct,
                shift_x_px: anchor.dx_px + sx,
                shift_y_px: anchor.dy_px + sy,
            }
        }
    }
}

#[derive(Debug, Clone)]
struct TrackedMarker {
    id: String,
    anchor: MarkerAnchor,
    current: Option<MarkerPlacement>,
}

/// Keeps overlay markers locked to the panning background.
#[derive(Debug, Clone, Default)]
pub struct MarkerSynchronizer {
    markers: Vec<TrackedMarker>,
    parallax_factor: f64,
}

impl MarkerSynchronizer {
    pub fn new(parallax_factor: f64) -> Self {
        Self {
            markers: Vec::new(),
            parallax_factor,
        }
    }

    /// Registers a marker, replacing any existing one with the same id.
    pub fn track(&mut self, id: impl Into<String>, anchor: MarkerAnchor) {
        let id = id.into();
        self.markers.retain(|m| m.id != id);
        self.markers.push(TrackedMarker {
            id,
            anchor,
            current: None,
        });
    }

    pub fn len(&self) -> usize {
        self.markers.len()
    }

    pub fn is_empty(&self) -> bool {
        self.markers.is_empty()
    }

    pub fn placement(&self, id: &str) -> Option<MarkerPlacement> {
        self.markers
            .iter()
            .find(|m| m.id == id)
            .and_then(|m| m.current)
    }

    /// Recomputes every marker and returns the ones whose placement moved.
    pub fn sync(&mut self, position: &PositionChanged) -> Vec<(String, MarkerPlacement)> {
        let mut moved = Vec::new();
        for marker in &mut self.markers {
            let placement = place_marker(marker.anchor, position, self.parallax_factor);
            if marker.current != Some(placement) {
                marker.current = Some(placement);
                moved.push((marker.id.clone(), placement));
            }
        }
        moved
    }
}
