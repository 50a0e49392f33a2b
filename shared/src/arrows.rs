use serde::Serialize;

use crate::geometry::{Bounds, Direction, Offset, ScrollDirection};

/// Which of the four directional affordances can currently move the background.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize)]
pub struct ArrowState {
    pub up: bool,
    pub down: bool,
    pub left: bool,
    pub right: bool,
}

impl ArrowState {
    /// A direction is enabled when its axis scrolls and more than `epsilon`
    /// pixels remain before the bound in that direction.
    pub fn compute(
        offset: Offset,
        bounds: &Bounds,
        scroll_direction: ScrollDirection,
        epsilon: f64,
    ) -> Self {
        let room = |direction: Direction| {
            let axis = direction.axis();
            if !scroll_direction.includes(axis) {
                return false;
            }
            let value = offset.along(axis);
            let range = bounds.along(axis);
            let distance = if direction.sign() < 0.0 {
                value - range.min
            } else {
                range.max - value
            };
            distance > epsilon
        };

        Self {
            up: room(Direction::Up),
            down: room(Direction::Down),
            left: room(Direction::Left),
            right: room(Direction::Right),
        }
    }

    pub fn is_enabled(&self, direction: Direction) -> bool {
        match direction {
            Direction::Up => self.up,
            Direction::Down => self.down,
            Direction::Left => self.left,
            Direction::Right => self.right,
        }
    }

    pub fn any(&self) -> bool {
        self.up || self.down || self.left || self.right
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::geometry::AxisBounds;

    fn horizontal(reach: f64) -> Bounds {
        Bounds {
            x: AxisBounds::symmetric(reach),
            y: AxisBounds::FIXED,
        }
    }

    #[test]
    fn centered_horizontal_enables_left_and_right() {
        let arrows = ArrowState::compute(
            Offset::ZERO,
            &horizontal(480.0),
            ScrollDirection::Horizontal,
            2.0,
        );
        assert_eq!(
            arrows,
            ArrowState {
                up: false,
                down: false,
                left: true,
                right: true,
            }
        );
    }

    #[test]
    fn within_epsilon_of_bound_disables_that_side() {
        let bounds = horizontal(480.0);
        let arrows = ArrowState::compute(
            Offset::new(-478.5, 0.0),
            &bounds,
            ScrollDirection::Horizontal,
            2.0,
        );
        assert!(!arrows.left);
        assert!(arrows.right);

        let arrows =
            ArrowState::compute(Offset::new(480.0, 0.0), &bounds, ScrollDirection::Horizontal, 2.0);
        assert!(arrows.left);
        assert!(!arrows.right);
    }

    #[test]
    fn no_scroll_direction_hides_everything() {
        let arrows = ArrowState::compute(Offset::ZERO, &Bounds::default(), ScrollDirection::None, 2.0);
        assert!(!arrows.any());
    }

    #[test]
    fn axis_outside_scroll_direction_stays_disabled() {
        let bounds = Bounds {
            x: AxisBounds::symmetric(100.0),
            y: AxisBounds::symmetric(100.0),
        };
        let arrows = ArrowState::compute(Offset::ZERO, &bounds, ScrollDirection::Vertical, 2.0);
        assert!(arrows.up && arrows.down);
        assert!(!arrows.left && !arrows.right);
    }
}
