use crate::geometry::Offset;

/// An eased pan from one offset to another.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct PanAnimation {
    pub from: Offset,
    pub to: Offset,
    pub start_time: f64,
    pub duration: f64, // milliseconds
}

impl PanAnimation {
    pub fn new(from: Offset, to: Offset, start_time: f64, duration: f64) -> Self {
        Self {
            from,
            to,
            start_time,
            duration,
        }
    }

    /// Returns the interpolated offset, or None once the animation is complete.
    pub fn current_offset(&self, now: f64) -> Option<Offset> {
        let elapsed = now - self.start_time;
        if elapsed >= self.duration {
            return None;
        }
        // Clock skew between the start call and the first frame.
        let elapsed = elapsed.max(0.0);

        let t = cubic_ease_out(elapsed / self.duration);
        Some(self.from.lerp(self.to, t))
    }
}

/// Cubic ease-out: decelerating to zero velocity.
pub fn cubic_ease_out(t: f64) -> f64 {
    let t = t.clamp(0.0, 1.0) - 1.0;
    t * t * t + 1.0
}
