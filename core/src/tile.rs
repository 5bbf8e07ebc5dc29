use serde::{Deserialize, Serialize};

use crate::*;

/// Observable animation state of a tile.
#[derive(Copy, Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub enum TileState {
    /// At its goal with no merge pending.
    Idle,
    /// Moving toward its goal.
    Sliding,
    /// Consumed by a merge, removed once it and its twin stop sliding.
    MergePending,
}

/// Valid transitions:
/// - Live -> Merging
#[derive(Copy, Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
enum MergeLatch {
    Live,
    Merging { twin: TileId },
}

/// A single numbered tile and its slide animation.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct Tile {
    value: Value,
    cell: Coord2,
    position: Point,
    goal: Point,
    sliding: bool,
    merge: MergeLatch,
}

impl Tile {
    /// Creates an idle tile resting at `position`.
    pub const fn new(value: Value, cell: Coord2, position: Point) -> Self {
        Self {
            value,
            cell,
            position,
            goal: position,
            sliding: false,
            merge: MergeLatch::Live,
        }
    }

    pub const fn value(&self) -> Value {
        self.value
    }

    /// Index of this value among tile faces: 2 is 0, 4 is 1, 2048 is 10.
    pub const fn rank(&self) -> u32 {
        self.value.trailing_zeros().saturating_sub(1)
    }

    pub const fn cell(&self) -> Coord2 {
        self.cell
    }

    pub const fn row(&self) -> Coord {
        self.cell.0
    }

    pub const fn col(&self) -> Coord {
        self.cell.1
    }

    pub const fn position(&self) -> Point {
        self.position
    }

    pub const fn goal(&self) -> Point {
        self.goal
    }

    pub const fn is_sliding(&self) -> bool {
        self.sliding
    }

    pub const fn is_merge_pending(&self) -> bool {
        matches!(self.merge, MergeLatch::Merging { .. })
    }

    /// The tile this one merges with, if any.
    pub const fn twin(&self) -> Option<TileId> {
        match self.merge {
            MergeLatch::Live => None,
            MergeLatch::Merging { twin } => Some(twin),
        }
    }

    pub const fn state(&self) -> TileState {
        match (self.merge, self.sliding) {
            (MergeLatch::Merging { .. }, _) => TileState::MergePending,
            (MergeLatch::Live, true) => TileState::Sliding,
            (MergeLatch::Live, false) => TileState::Idle,
        }
    }

    pub(crate) fn set_cell(&mut self, cell: Coord2) {
        self.cell = cell;
    }

    /// Sets where the tile should end up, without starting the animation.
    pub fn set_goal(&mut self, goal: Point) {
        self.goal = goal;
    }

    /// Moves the tile to `position` at once, dropping any animation in progress.
    pub(crate) fn place_at(&mut self, position: Point) {
        self.position = position;
        self.goal = position;
        self.sliding = false;
    }

    /// Marks the tile as consumed by a merge with `twin`. There is no way back.
    pub(crate) fn latch_merge(&mut self, twin: TileId) {
        debug_assert!(!self.is_merge_pending(), "tile merged twice in one slide");
        self.merge = MergeLatch::Merging { twin };
    }

    /// Starts the slide animation if the goal differs from the current position.
    pub fn perform_slide(&mut self) {
        if self.goal != self.position {
            self.sliding = true;
        }
    }

    /// Moves one animation step of at most `step` units, horizontal axis first.
    ///
    /// Returns whether the tile is still sliding afterwards.
    pub fn advance(&mut self, step: Px) -> bool {
        if !self.sliding {
            return false;
        }

        let (x, y) = self.position;
        let (goal_x, goal_y) = self.goal;

        if x != goal_x {
            self.position.0 = approach(x, goal_x, step);
        } else if y != goal_y {
            self.position.1 = approach(y, goal_y, step);
        }

        if self.position == self.goal {
            self.sliding = false;
        }
        self.sliding
    }
}

/// Steps `from` toward `to`, snapping when closer than `step`.
const fn approach(from: Px, to: Px, step: Px) -> Px {
    let remaining = to - from;
    if remaining.abs() <= step {
        to
    } else if remaining > 0 {
        from + step
    } else {
        from - step
    }
}
