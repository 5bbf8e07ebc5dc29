#![no_std]

extern crate alloc;

use serde::{Deserialize, Serialize};

pub use board::*;
pub use direction::*;
pub use error::*;
pub use geometry::*;
pub use session::*;
pub use tile::*;
pub use types::*;

mod board;
mod direction;
mod error;
mod geometry;
mod session;
mod tile;
mod types;

#[derive(Copy, Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct BoardConfig {
    /// Tile value that wins the game.
    pub win_value: Value,
    /// Render units a tile moves per frame.
    pub speed: Px,
    pub geometry: Geometry,
    /// Seed for tile spawning.
    pub seed: u64,
}

impl BoardConfig {
    pub const DEFAULT_WIN_VALUE: Value = 2048;
    pub const DEFAULT_SPEED: Px = 40;

    pub const fn new(seed: u64) -> Self {
        Self {
            win_value: Self::DEFAULT_WIN_VALUE,
            speed: Self::DEFAULT_SPEED,
            geometry: Geometry::new((0, 0), TILE_LENGTH),
            seed,
        }
    }

    pub const fn with_win_value(mut self, win_value: Value) -> Self {
        self.win_value = win_value;
        self
    }

    pub const fn with_speed(mut self, speed: Px) -> Self {
        self.speed = speed;
        self
    }

    pub const fn with_geometry(mut self, geometry: Geometry) -> Self {
        self.geometry = geometry;
        self
    }

    pub fn validate(&self) -> Result<()> {
        if !is_tile_value(self.win_value) {
            return Err(BoardError::InvalidWinValue(self.win_value));
        }
        if self.speed <= 0 {
            return Err(BoardError::InvalidSpeed(self.speed));
        }
        self.geometry.validate()
    }
}

impl Default for BoardConfig {
    fn default() -> Self {
        Self::new(0)
    }
}

#[derive(Copy, Clone, Debug, PartialEq)]
pub enum SlideOutcome {
    Rejected,
    Moved,
}

impl SlideOutcome {
    pub const fn has_update(self) -> bool {
        match self {
            Self::Rejected => false,
            Self::Moved => true,
        }
    }
}

/// Outcome of a single animation frame.
#[derive(Copy, Clone, Debug, PartialEq)]
pub enum FrameOutcome {
    /// Nothing was sliding.
    Idle,
    /// Tiles are still sliding.
    Animating,
    /// The last tiles stopped this frame, the board accepts input again.
    Settled,
}

impl FrameOutcome {
    pub const fn is_settled(self) -> bool {
        matches!(self, Self::Settled)
    }

    pub const fn has_update(self) -> bool {
        use FrameOutcome::*;
        match self {
            Idle => false,
            Animating => true,
            Settled => true,
        }
    }
}
