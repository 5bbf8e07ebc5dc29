use serde::{Deserialize, Serialize};

/// Number of rows and columns on the board.
pub const ROWS: Coord = 4;

/// Total number of cells on the board.
pub const CELLS: usize = (ROWS as usize) * (ROWS as usize);

/// Single logical grid axis, used for rows and columns.
pub type Coord = u8;

/// Logical cell coordinates `(row, col)`.
pub type Coord2 = (Coord, Coord);

/// Render-space unit.
pub type Px = i32;

/// Render-space point `(x, y)`.
pub type Point = (Px, Px);

/// Tile face value, always a power of two.
pub type Value = u32;

/// Stable handle of a tile inside the board arena.
#[derive(Copy, Clone, Debug, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub struct TileId(pub(crate) u32);

pub trait ToNdIndex {
    type Output;
    fn to_nd_index(self) -> Self::Output;
}

impl ToNdIndex for Coord2 {
    type Output = [usize; 2];

    fn to_nd_index(self) -> Self::Output {
        [self.0.into(), self.1.into()]
    }
}

pub const fn in_bounds(row: Coord, col: Coord) -> bool {
    row < ROWS && col < ROWS
}

/// Whether `value` can appear on a tile.
pub const fn is_tile_value(value: Value) -> bool {
    value >= 2 && value.is_power_of_two()
}

/// Value of the tile two `value` tiles merge into, or `None` when it would not fit in a [`Value`].
pub const fn merged_value(value: Value) -> Option<Value> {
    value.checked_mul(2)
}

/// Iterates all cells in row-major order.
pub fn iter_cells() -> impl Iterator<Item = Coord2> {
    (0..ROWS).flat_map(|row| (0..ROWS).map(move |col| (row, col)))
}
