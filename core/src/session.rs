use alloc::vec::Vec;

use crate::*;

/// Outcome of a player input.
#[derive(Copy, Clone, Debug, PartialEq)]
pub enum InputOutcome {
    /// The input did not move anything.
    Ignored,
    /// Tiles started sliding.
    Moved,
    /// The previous game was lost, so the input started a new one.
    Reset,
}

impl InputOutcome {
    pub const fn has_update(self) -> bool {
        !matches!(self, Self::Ignored)
    }
}

/// What happened during one tick of the game loop.
#[derive(Copy, Clone, Debug, PartialEq)]
pub struct TickOutcome {
    pub frame: FrameOutcome,
    /// Cell of the tile spawned once the board settled.
    pub spawned: Option<Coord2>,
    pub won: bool,
    /// The board is stuck, the next input resets it.
    pub lost: bool,
}

/// Drives a board the way a game loop is expected to.
///
/// Input goes through [`Session::fling`] or [`Session::slide`], and [`Session::tick`] is called once per frame.
/// A tile is spawned each time the board settles, and after a loss the next input starts a new game instead of
/// sliding.
#[derive(Clone, Debug)]
pub struct Session {
    board: Board,
    reset_on_next_input: bool,
}

impl Session {
    pub fn new(config: BoardConfig) -> Result<Self> {
        Ok(Self::from_board(Board::new(config)?))
    }

    pub fn restore(config: BoardConfig, saved: &[SavedTile]) -> Result<Self> {
        Ok(Self::from_board(Board::restore(config, saved)?))
    }

    pub fn from_board(board: Board) -> Self {
        let reset_on_next_input = board.is_lost();
        Self {
            board,
            reset_on_next_input,
        }
    }

    pub fn board(&self) -> &Board {
        &self.board
    }

    pub fn is_awaiting_reset(&self) -> bool {
        self.reset_on_next_input
    }

    /// Handles a fling with the given velocity.
    pub fn fling(&mut self, vel_x: f32, vel_y: f32) -> InputOutcome {
        self.slide(Direction::from_velocity(vel_x, vel_y))
    }

    pub fn slide(&mut self, direction: Direction) -> InputOutcome {
        if self.reset_on_next_input {
            self.reset_on_next_input = false;
            self.board.reset();
            log::info!("Started a new game after a loss");
            return InputOutcome::Reset;
        }

        match self.board.slide(direction) {
            SlideOutcome::Moved => InputOutcome::Moved,
            SlideOutcome::Rejected => InputOutcome::Ignored,
        }
    }

    /// Runs one frame of the game loop.
    pub fn tick(&mut self) -> TickOutcome {
        let frame = self.board.advance_frame();
        let mut spawned = None;

        if frame.is_settled() {
            if !self.board.is_full() {
                spawned = self.board.spawn_random_tile().ok();
            }
            if self.board.is_lost() {
                log::info!("No moves left, the next input starts a new game");
                self.reset_on_next_input = true;
            }
        }

        TickOutcome {
            frame,
            spawned,
            won: self.board.is_won(),
            lost: self.reset_on_next_input,
        }
    }

    /// Runs frames until the board settles, returning the last tick.
    pub fn run_until_settled(&mut self) -> TickOutcome {
        loop {
            let outcome = self.tick();
            if outcome.frame != FrameOutcome::Animating {
                return outcome;
            }
        }
    }

    pub fn save(&self) -> Result<Vec<SavedTile>> {
        self.board.serialize_tiles()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn config() -> BoardConfig {
        BoardConfig::new(3)
    }

    #[test]
    fn new_session_starts_with_two_tiles() {
        let session = Session::new(config()).unwrap();

        assert_eq!(session.board().tile_count(), START_TILES);
        assert!(!session.is_awaiting_reset());
    }

    #[test]
    fn settling_spawns_a_tile() {
        let saved = [SavedTile::new(2, 0, 0), SavedTile::new(2, 0, 3)];
        let mut session = Session::restore(config(), &saved).unwrap();

        assert_eq!(session.fling(-900.0, 10.0), InputOutcome::Moved);
        let outcome = session.run_until_settled();

        assert_eq!(outcome.frame, FrameOutcome::Settled);
        let spawned = outcome.spawned.unwrap();
        assert_ne!(spawned, (0, 0));
        assert_eq!(session.board().value_at((0, 0)), Some(4));
        assert_eq!(session.board().tile_count(), 2);
        assert!(!outcome.lost);
    }

    #[test]
    fn idle_ticks_do_not_spawn() {
        let mut session = Session::new(config()).unwrap();

        let outcome = session.tick();

        assert_eq!(outcome.frame, FrameOutcome::Idle);
        assert_eq!(outcome.spawned, None);
        assert_eq!(session.board().tile_count(), START_TILES);
    }

    #[test]
    fn ignored_fling_changes_nothing() {
        let saved = [SavedTile::new(2, 0, 0)];
        let mut session = Session::restore(config(), &saved).unwrap();

        assert_eq!(session.fling(-50.0, -50.0), InputOutcome::Ignored);
        assert_eq!(session.fling(-50.0, 0.0), InputOutcome::Ignored);
        assert_eq!(session.tick().frame, FrameOutcome::Idle);
        assert_eq!(session.save().unwrap(), saved);
    }

    #[test]
    fn loss_turns_next_input_into_reset() {
        // sliding left opens (3, 3) only, and neither a 2 nor a 4 pairs with its neighbours
        let rows: [[Value; 4]; 4] = [[2, 4, 2, 4], [4, 2, 4, 2], [2, 4, 2, 8], [4, 2, 0, 16]];
        let saved: Vec<SavedTile> = iter_cells()
            .filter_map(|(row, col)| {
                let value = rows[row as usize][col as usize];
                (value != 0).then(|| SavedTile::new(value, row, col))
            })
            .collect();
        let mut session = Session::restore(config(), &saved).unwrap();
        assert!(!session.is_awaiting_reset());

        assert_eq!(session.slide(Direction::Left), InputOutcome::Moved);
        let outcome = session.run_until_settled();

        assert_eq!(outcome.spawned, Some((3, 3)));
        assert!(outcome.lost);
        assert!(session.is_awaiting_reset());

        assert_eq!(session.slide(Direction::Left), InputOutcome::Reset);
        assert_eq!(session.board().tile_count(), START_TILES);
        assert!(!session.is_awaiting_reset());
    }

    #[test]
    fn restoring_a_lost_board_awaits_reset() {
        let saved: Vec<SavedTile> = iter_cells()
            .map(|(row, col)| {
                let value = if (row + col) % 2 == 0 { 2 } else { 4 };
                SavedTile::new(value, row, col)
            })
            .collect();
        let mut session = Session::restore(config(), &saved).unwrap();

        assert!(session.is_awaiting_reset());
        assert_eq!(session.fling(0.0, 100.0), InputOutcome::Reset);
        assert_eq!(session.board().tile_count(), START_TILES);
    }
}
