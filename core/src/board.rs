use alloc::collections::BTreeMap;
use alloc::vec::Vec;
use ndarray::Array2;
use rand::rngs::SmallRng;
use rand::{Rng, SeedableRng};
use serde::{Deserialize, Serialize};
use smallvec::SmallVec;

use crate::*;

/// Number of tiles placed at the start of a game.
pub const START_TILES: usize = 2;

/// Settled tile as stored across sessions.
#[derive(Copy, Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct SavedTile {
    pub value: Value,
    pub row: Coord,
    pub col: Coord,
}

impl SavedTile {
    pub const fn new(value: Value, row: Coord, col: Coord) -> Self {
        Self { value, row, col }
    }

    pub const fn cell(&self) -> Coord2 {
        (self.row, self.col)
    }
}

/// The 4×4 board: a tile arena plus a grid of handles into it.
///
/// Every tile on the board, including the ones waiting for a merge to resolve, lives in the arena. The grid only
/// references tiles that are still playable, so once the board is settled both views describe the same tiles.
#[derive(Clone, Debug)]
pub struct Board {
    config: BoardConfig,
    tiles: BTreeMap<TileId, Tile>,
    grid: Array2<Option<TileId>>,
    next_id: u32,
    locked: bool,
    rng: SmallRng,
}

impl Board {
    /// Starts a new game with two random tiles.
    pub fn new(config: BoardConfig) -> Result<Self> {
        let mut board = Self::empty(config)?;
        board.spawn_start_tiles();
        Ok(board)
    }

    /// Creates a board without any tiles.
    pub fn empty(config: BoardConfig) -> Result<Self> {
        config.validate()?;
        Ok(Self {
            config,
            tiles: BTreeMap::new(),
            grid: Array2::default((ROWS, ROWS).to_nd_index()),
            next_id: 0,
            locked: false,
            rng: SmallRng::seed_from_u64(config.seed),
        })
    }

    /// Rebuilds a settled board from saved tiles.
    pub fn restore(config: BoardConfig, saved: &[SavedTile]) -> Result<Self> {
        let mut board = Self::empty(config)?;
        board.restore_from_tiles(saved)?;
        Ok(board)
    }

    pub fn config(&self) -> &BoardConfig {
        &self.config
    }

    pub fn geometry(&self) -> Geometry {
        self.config.geometry
    }

    /// Whether tiles are still sliding, in which case input is rejected.
    pub fn is_locked(&self) -> bool {
        self.locked
    }

    /// Number of tiles on the board, counting both halves of unresolved merges.
    pub fn tile_count(&self) -> usize {
        self.tiles.len()
    }

    /// All tiles on the board, for drawing.
    pub fn tiles(&self) -> impl Iterator<Item = &Tile> + '_ {
        self.tiles.values()
    }

    pub fn tile_at(&self, cell: Coord2) -> Option<&Tile> {
        let id = (*self.grid.get(cell.to_nd_index())?)?;
        self.tiles.get(&id)
    }

    pub fn value_at(&self, cell: Coord2) -> Option<Value> {
        self.tile_at(cell).map(Tile::value)
    }

    /// Values of the playable tiles, indexed by `[row, col]`.
    pub fn values(&self) -> Array2<Option<Value>> {
        self.grid
            .map(|&id| id.and_then(|id| self.tiles.get(&id)).map(Tile::value))
    }

    pub fn is_full(&self) -> bool {
        self.grid.iter().all(Option::is_some)
    }

    pub fn is_won(&self) -> bool {
        self.tiles
            .values()
            .any(|tile| tile.value() == self.config.win_value)
    }

    /// Whether the grid is full and no direction can merge anything.
    pub fn is_lost(&self) -> bool {
        self.is_full()
            && !Direction::ALL
                .into_iter()
                .any(|direction| self.can_move_in_direction(direction))
    }

    /// Whether sliding toward `direction` would move or merge at least one tile.
    ///
    /// Tiles of the largest value are never merged, as their sum would not fit in a [`Value`].
    pub fn can_move_in_direction(&self, direction: Direction) -> bool {
        direction.lines().any(|line| {
            let mut seen_gap = false;
            let mut previous = None;
            for cell in line {
                match self.value_at(cell) {
                    None => seen_gap = true,
                    Some(_) if seen_gap => return true,
                    Some(value) if previous == Some(value) && merged_value(value).is_some() => return true,
                    value => previous = value,
                }
            }
            false
        })
    }

    /// Slides every tile toward `direction`, merging equal neighbours.
    ///
    /// The move is rejected without touching the board while tiles are still sliding, or when nothing would move.
    /// Otherwise the board is locked until [`Board::advance_frame`] reports it settled.
    pub fn slide(&mut self, direction: Direction) -> SlideOutcome {
        if self.locked {
            log::trace!("Ignoring {direction:?} slide, tiles are still sliding");
            return SlideOutcome::Rejected;
        }
        if !direction.is_known() {
            log::trace!("Ignoring fling without a dominant axis");
            return SlideOutcome::Rejected;
        }
        if !self.can_move_in_direction(direction) {
            log::trace!("Ignoring {direction:?} slide, nothing can move");
            return SlideOutcome::Rejected;
        }

        self.compact(direction);
        let merges = self.mark_merges(direction);
        self.compact(direction);

        for tile in self.tiles.values_mut() {
            tile.perform_slide();
        }
        self.locked = true;

        log::debug!("Sliding {direction:?} with {merges} pending merges");
        SlideOutcome::Moved
    }

    /// Advances every sliding tile by one animation step and resolves finished merges.
    pub fn advance_frame(&mut self) -> FrameOutcome {
        if !self.locked {
            return FrameOutcome::Idle;
        }

        let step = self.config.speed;
        for tile in self.tiles.values_mut() {
            tile.advance(step);
        }
        self.resolve_merges();

        self.locked = self.tiles.values().any(Tile::is_sliding);
        if self.locked {
            FrameOutcome::Animating
        } else {
            self.check_settled();
            FrameOutcome::Settled
        }
    }

    /// Places a 2 or a 4 on a uniformly chosen empty cell.
    pub fn spawn_random_tile(&mut self) -> Result<Coord2> {
        self.spawn_random().ok_or(BoardError::BoardFull)
    }

    /// Places an idle tile of `value` on the empty cell `cell`.
    pub fn spawn_tile_at(&mut self, value: Value, cell: Coord2) -> Result<TileId> {
        let cell = validate_cell(cell)?;
        validate_value(value)?;
        if self.grid[cell.to_nd_index()].is_some() {
            return Err(BoardError::OccupiedCell {
                row: cell.0,
                col: cell.1,
            });
        }
        Ok(self.insert_tile(value, cell))
    }

    /// Clears the board and starts a new game.
    pub fn reset(&mut self) {
        self.clear();
        self.spawn_start_tiles();
        log::debug!("Board reset");
    }

    /// Settled tiles in row-major order.
    pub fn serialize_tiles(&self) -> Result<Vec<SavedTile>> {
        if self.locked {
            return Err(BoardError::Animating);
        }

        Ok(iter_cells()
            .filter_map(|cell| {
                self.value_at(cell)
                    .map(|value| SavedTile::new(value, cell.0, cell.1))
            })
            .collect())
    }

    /// Replaces the board with `saved`. On error the board is left untouched.
    pub fn restore_from_tiles(&mut self, saved: &[SavedTile]) -> Result<()> {
        let mut occupied: Array2<bool> = Array2::default((ROWS, ROWS).to_nd_index());
        for tile in saved {
            let cell = validate_cell(tile.cell())?;
            validate_value(tile.value)?;
            let slot = &mut occupied[cell.to_nd_index()];
            if *slot {
                return Err(BoardError::OccupiedCell {
                    row: cell.0,
                    col: cell.1,
                });
            }
            *slot = true;
        }

        self.clear();
        for tile in saved {
            self.insert_tile(tile.value, tile.cell());
        }
        log::debug!("Restored board with {} tiles", saved.len());
        Ok(())
    }

    /// Switches to a new render geometry, moving every tile onto its cell.
    pub fn set_geometry(&mut self, geometry: Geometry) -> Result<()> {
        geometry.validate()?;
        if self.locked {
            return Err(BoardError::Animating);
        }

        self.config.geometry = geometry;
        for tile in self.tiles.values_mut() {
            tile.place_at(geometry.cell_position(tile.cell()));
        }
        Ok(())
    }

    fn spawn_start_tiles(&mut self) {
        for _ in 0..START_TILES {
            self.spawn_random();
        }
    }

    fn spawn_random(&mut self) -> Option<Coord2> {
        let empty: SmallVec<[Coord2; CELLS]> = iter_cells()
            .filter(|&cell| self.grid[cell.to_nd_index()].is_none())
            .collect();
        if empty.is_empty() {
            log::warn!("Cannot spawn a tile, the board is full");
            return None;
        }

        let cell = empty[self.rng.random_range(0..empty.len())];
        let value = if self.rng.random_bool(0.5) { 2 } else { 4 };
        self.insert_tile(value, cell);
        log::debug!("Spawned {value} at {cell:?}");
        Some(cell)
    }

    fn insert_tile(&mut self, value: Value, cell: Coord2) -> TileId {
        let id = TileId(self.next_id);
        self.next_id += 1;

        let position = self.config.geometry.cell_position(cell);
        self.tiles.insert(id, Tile::new(value, cell, position));
        self.grid[cell.to_nd_index()] = Some(id);
        id
    }

    fn clear(&mut self) {
        self.tiles.clear();
        self.grid.fill(None);
        self.locked = false;
    }

    /// Packs each line against the edge tiles slide toward, keeping their order.
    fn compact(&mut self, direction: Direction) {
        for line in direction.lines() {
            let occupants: SmallVec<[TileId; ROWS as usize]> = line
                .iter()
                .filter_map(|&cell| self.grid[cell.to_nd_index()])
                .collect();

            for (slot, &cell) in line.iter().enumerate() {
                let occupant = occupants.get(slot).copied();
                self.grid[cell.to_nd_index()] = occupant;
                if let Some(id) = occupant {
                    self.move_tile(id, cell);
                }
            }
        }
    }

    /// Pairs up equal neighbours, scanning from the target edge inward.
    ///
    /// The inner tile of each pair leaves the grid and follows the outer one. Tiles already paired are skipped, so
    /// each tile merges at most once per slide.
    fn mark_merges(&mut self, direction: Direction) -> usize {
        let mut merges = 0;
        for line in direction.lines() {
            for pair in line.windows(2) {
                let (survivor_cell, consumed_cell) = (pair[0], pair[1]);
                let (Some(survivor), Some(consumed)) = (
                    self.grid[survivor_cell.to_nd_index()],
                    self.grid[consumed_cell.to_nd_index()],
                ) else {
                    continue;
                };
                let (Some(survivor_value), Some(consumed_value)) =
                    (self.unpaired_value(survivor), self.unpaired_value(consumed))
                else {
                    continue;
                };
                if survivor_value != consumed_value || merged_value(survivor_value).is_none() {
                    continue;
                }

                self.grid[consumed_cell.to_nd_index()] = None;
                let goal = self.config.geometry.cell_position(survivor_cell);
                if let Some(tile) = self.tiles.get_mut(&consumed) {
                    tile.set_cell(survivor_cell);
                    tile.set_goal(goal);
                    tile.latch_merge(survivor);
                }
                if let Some(tile) = self.tiles.get_mut(&survivor) {
                    tile.latch_merge(consumed);
                }
                merges += 1;
            }
        }
        merges
    }

    fn unpaired_value(&self, id: TileId) -> Option<Value> {
        self.tiles
            .get(&id)
            .filter(|tile| !tile.is_merge_pending())
            .map(Tile::value)
    }

    /// Retargets a tile, and its merge twin if any, to `cell`.
    fn move_tile(&mut self, id: TileId, cell: Coord2) {
        let goal = self.config.geometry.cell_position(cell);
        let Some(tile) = self.tiles.get_mut(&id) else {
            return;
        };
        tile.set_cell(cell);
        tile.set_goal(goal);

        if let Some(twin) = tile.twin().and_then(|twin| self.tiles.get_mut(&twin)) {
            twin.set_cell(cell);
            twin.set_goal(goal);
        }
    }

    /// Replaces every merge pair whose halves have both stopped with one tile of double value.
    fn resolve_merges(&mut self) {
        let ready: SmallVec<[(TileId, TileId, Value); CELLS / 2]> = self
            .tiles
            .iter()
            .filter_map(|(&id, tile)| {
                let twin = tile.twin()?;
                let twin_tile = self.tiles.get(&twin)?;
                let value = merged_value(tile.value())?;
                (id < twin && !tile.is_sliding() && !twin_tile.is_sliding()).then_some((id, twin, value))
            })
            .collect();

        for (first, second, value) in ready {
            let (Some(first), Some(second)) = (self.tiles.remove(&first), self.tiles.remove(&second)) else {
                continue;
            };
            debug_assert_eq!(first.value(), second.value(), "merge twins disagree on value");
            debug_assert_eq!(first.cell(), second.cell(), "merge twins on different cells");

            let cell = first.cell();
            let id = TileId(self.next_id);
            self.next_id += 1;
            self.tiles.insert(id, Tile::new(value, cell, first.position()));
            self.grid[cell.to_nd_index()] = Some(id);
            log::debug!("Merged into {value} at {cell:?}");
        }
    }

    fn check_settled(&self) {
        let occupied = self.grid.iter().filter(|id| id.is_some()).count();
        debug_assert_eq!(
            occupied,
            self.tiles.len(),
            "settled grid and tile arena disagree"
        );
        debug_assert!(self.tiles.values().all(|tile| !tile.is_merge_pending()));
    }
}

fn validate_cell(cell: Coord2) -> Result<Coord2> {
    if in_bounds(cell.0, cell.1) {
        Ok(cell)
    } else {
        Err(BoardError::InvalidCoords {
            row: cell.0,
            col: cell.1,
        })
    }
}

fn validate_value(value: Value) -> Result<Value> {
    if is_tile_value(value) {
        Ok(value)
    } else {
        Err(BoardError::InvalidValue(value))
    }
}
