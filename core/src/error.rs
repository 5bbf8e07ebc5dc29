use thiserror::Error;

use crate::{Coord, Point, Px, Value};

#[derive(Error, Debug, Copy, Clone, PartialEq, Eq)]
pub enum BoardError {
    #[error("Invalid coordinates ({row}, {col})")]
    InvalidCoords { row: Coord, col: Coord },
    #[error("Cell ({row}, {col}) is already occupied")]
    OccupiedCell { row: Coord, col: Coord },
    #[error("Invalid tile value {0}, expected a power of two")]
    InvalidValue(Value),
    #[error("Board is full, no tile can be spawned")]
    BoardFull,
    #[error("Tiles are still sliding")]
    Animating,
    #[error("Invalid winning value {0}, expected a power of two")]
    InvalidWinValue(Value),
    #[error("Invalid animation speed {0}, expected a positive step")]
    InvalidSpeed(Px),
    #[error("Invalid tile size {0}, expected a positive length")]
    InvalidTileSize(Px),
    #[error("Board of tile size {tile_size} at {origin:?} does not fit in render space")]
    GeometryOverflow { origin: Point, tile_size: Px },
}

pub type Result<T> = core::result::Result<T, BoardError>;
