use serde::{Deserialize, Serialize};

use crate::*;

/// Width of the board border in unscaled render units.
pub const BORDER: Px = 8;

/// Side length of a tile in unscaled render units.
pub const TILE_LENGTH: Px = 100;

/// Maps logical cells to render-space positions.
#[derive(Copy, Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct Geometry {
    /// Top-left corner of the `(0, 0)` cell.
    pub origin: Point,
    pub tile_size: Px,
}

impl Geometry {
    pub const fn new(origin: Point, tile_size: Px) -> Self {
        Self { origin, tile_size }
    }

    /// Geometry of a board whose top-left corner is `board_origin`, drawn at `scale` times its native size.
    pub fn scaled(board_origin: Point, scale: f32) -> Self {
        let border = (BORDER as f32 * scale) as Px;
        Self {
            origin: (board_origin.0 + border, board_origin.1 + border),
            tile_size: (TILE_LENGTH as f32 * scale) as Px,
        }
    }

    /// Checks that the tile size is positive and every cell position, and the distance between any two of them,
    /// fits in a [`Px`].
    pub fn validate(&self) -> Result<()> {
        if self.tile_size <= 0 {
            return Err(BoardError::InvalidTileSize(self.tile_size));
        }

        let overflow = BoardError::GeometryOverflow {
            origin: self.origin,
            tile_size: self.tile_size,
        };
        let span = self
            .tile_size
            .checked_mul((ROWS - 1) as Px)
            .ok_or(overflow)?;
        self.origin.0.checked_add(span).ok_or(overflow)?;
        self.origin.1.checked_add(span).ok_or(overflow)?;
        Ok(())
    }

    pub const fn cell_position(&self, (row, col): Coord2) -> Point {
        (
            self.origin.0 + self.tile_size * col as Px,
            self.origin.1 + self.tile_size * row as Px,
        )
    }
}

impl Default for Geometry {
    fn default() -> Self {
        Self::new((0, 0), TILE_LENGTH)
    }
}
