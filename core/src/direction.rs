use serde::{Deserialize, Serialize};

use crate::*;

/// Direction of a slide, as classified from a fling.
#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Direction {
    Right,
    Left,
    Up,
    Down,
    /// Near-diagonal, tied or zero fling. Never moves the board.
    Unknown,
}

impl Direction {
    /// The four directions that can move tiles.
    pub const ALL: [Direction; 4] = [Self::Right, Self::Left, Self::Up, Self::Down];

    /// Classifies a fling velocity by its dominant axis.
    ///
    /// Screen coordinates are assumed, so a negative `vel_y` is upward. When both axes have the same magnitude the
    /// result is [`Direction::Unknown`].
    pub fn from_velocity(vel_x: f32, vel_y: f32) -> Self {
        let abs_x = vel_x.abs();
        let abs_y = vel_y.abs();

        if vel_x > 0.0 && vel_x > abs_y {
            Self::Right
        } else if vel_x < 0.0 && abs_x > abs_y {
            Self::Left
        } else if vel_y < 0.0 && abs_y > abs_x {
            Self::Up
        } else if vel_y > 0.0 && vel_y > abs_x {
            Self::Down
        } else {
            Self::Unknown
        }
    }

    pub const fn is_known(self) -> bool {
        !matches!(self, Self::Unknown)
    }

    /// Cells of the `index`-th row or column, ordered from the edge tiles slide toward.
    ///
    /// Horizontal directions yield rows, vertical directions yield columns. `Unknown` has no lines.
    pub(crate) fn line(self, index: Coord) -> Option<[Coord2; ROWS as usize]> {
        let mut cells = [(0, 0); ROWS as usize];
        for (step, cell) in (0..ROWS).zip(cells.iter_mut()) {
            let far = ROWS - 1 - step;
            *cell = match self {
                Self::Left => (index, step),
                Self::Right => (index, far),
                Self::Up => (step, index),
                Self::Down => (far, index),
                Self::Unknown => return None,
            };
        }
        Some(cells)
    }

    pub(crate) fn lines(self) -> impl Iterator<Item = [Coord2; ROWS as usize]> {
        (0..ROWS).filter_map(move |index| self.line(index))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn dominant_axis_wins() {
        assert_eq!(Direction::from_velocity(300.0, -20.0), Direction::Right);
        assert_eq!(Direction::from_velocity(-300.0, 299.0), Direction::Left);
        assert_eq!(Direction::from_velocity(5.0, -80.0), Direction::Up);
        assert_eq!(Direction::from_velocity(-5.0, 80.0), Direction::Down);
    }

    #[test]
    fn ties_and_zero_are_unknown() {
        assert_eq!(Direction::from_velocity(0.0, 0.0), Direction::Unknown);
        assert_eq!(Direction::from_velocity(50.0, 50.0), Direction::Unknown);
        assert_eq!(Direction::from_velocity(-50.0, 50.0), Direction::Unknown);
        assert_eq!(Direction::from_velocity(50.0, -50.0), Direction::Unknown);
    }

    #[test]
    fn lines_start_at_target_edge() {
        assert_eq!(Direction::Left.line(1), Some([(1, 0), (1, 1), (1, 2), (1, 3)]));
        assert_eq!(Direction::Right.line(1), Some([(1, 3), (1, 2), (1, 1), (1, 0)]));
        assert_eq!(Direction::Up.line(2), Some([(0, 2), (1, 2), (2, 2), (3, 2)]));
        assert_eq!(Direction::Down.line(2), Some([(3, 2), (2, 2), (1, 2), (0, 2)]));
        assert_eq!(Direction::Unknown.line(0), None);
        assert_eq!(Direction::Unknown.lines().count(), 0);
    }
}
