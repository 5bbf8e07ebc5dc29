use std::path::PathBuf;

use anyhow::{Result, bail};
use rand::rngs::SmallRng;
use rand::seq::IndexedRandom;
use rand::SeedableRng;
use tilemerge_core::*;

use crate::render::render;
use crate::save::SaveFile;

#[derive(clap::Args, Debug)]
pub struct PlayArgs {
    /// Force a seed instead of random
    #[arg(short, long)]
    seed: Option<u64>,

    /// Moves to play instead of autoplay, as letters l, r, u, d (e.g. "l,l,u,r")
    #[arg(short, long)]
    moves: Option<String>,

    /// Stop autoplay after this many moves
    #[arg(long, value_name = "N", default_value_t = 1000)]
    max_moves: usize,

    /// Tile value that wins the game
    #[arg(long, value_name = "VALUE", default_value_t = BoardConfig::DEFAULT_WIN_VALUE)]
    win: Value,

    /// Render units a tile moves per frame
    #[arg(long, value_name = "UNITS", default_value_t = BoardConfig::DEFAULT_SPEED)]
    speed: Px,

    /// Resume from a save file
    #[arg(long, value_name = "FILE")]
    load: Option<PathBuf>,

    /// Write the final board to a save file
    #[arg(long, value_name = "FILE")]
    save: Option<PathBuf>,

    /// Only print the final board
    #[arg(long)]
    summary: bool,
}

/// Summary of a finished run.
#[derive(Copy, Clone, Debug, Default, PartialEq)]
pub struct RunStats {
    pub moves: usize,
    pub frames: usize,
    pub won: bool,
    pub lost: bool,
}

pub fn run(args: PlayArgs) -> Result<()> {
    let seed = args.seed.unwrap_or_else(rand::random);
    log::debug!("seed: {seed}");

    let config = BoardConfig::new(seed)
        .with_win_value(args.win)
        .with_speed(args.speed);
    config.validate()?;

    let mut session = match &args.load {
        Some(path) => {
            let save = SaveFile::load(path)?;
            Session::restore(config, &save.tiles).or_else(|err| {
                log::warn!("Ignoring save file {}: {err}, starting a new game", path.display());
                Session::new(config)
            })?
        }
        None => Session::new(config)?,
    };

    let show = |session: &Session| {
        if !args.summary {
            print!("{}", render(session.board()));
        }
    };
    show(&session);

    let stats = match &args.moves {
        Some(moves) => {
            let moves = parse_moves(moves)?;
            play_scripted(&mut session, &moves, show)
        }
        None => play_auto(&mut session, seed, args.max_moves, show),
    };

    if args.summary {
        print!("{}", render(session.board()));
    }
    println!(
        "{} moves, {} frames{}",
        stats.moves,
        stats.frames,
        match (stats.won, stats.lost) {
            (true, _) => ", won",
            (false, true) => ", lost",
            (false, false) => "",
        }
    );

    if let Some(path) = &args.save {
        SaveFile::new(session.save()?).store(path)?;
    }
    Ok(())
}

/// Parses a move list such as `"l,r,u,d"` or `"lrud"`.
pub fn parse_moves(text: &str) -> Result<Vec<Direction>> {
    text.chars()
        .filter(|c| !c.is_whitespace() && *c != ',')
        .map(|c| {
            Ok(match c.to_ascii_lowercase() {
                'l' => Direction::Left,
                'r' => Direction::Right,
                'u' => Direction::Up,
                'd' => Direction::Down,
                _ => bail!("Unknown move {c:?}, expected one of l, r, u, d"),
            })
        })
        .collect()
}

/// Plays `moves` in order, skipping the ones that cannot move anything.
pub fn play_scripted(
    session: &mut Session,
    moves: &[Direction],
    mut show: impl FnMut(&Session),
) -> RunStats {
    let mut stats = RunStats::default();
    for &direction in moves {
        match step(session, direction, &mut stats) {
            InputOutcome::Ignored => log::warn!("Move {direction:?} does not change the board"),
            _ => show(session),
        }
    }
    stats
}

/// Plays random legal moves until the game is won, lost, or `max_moves` is reached.
pub fn play_auto(
    session: &mut Session,
    seed: u64,
    max_moves: usize,
    mut show: impl FnMut(&Session),
) -> RunStats {
    let mut rng = SmallRng::seed_from_u64(seed.rotate_left(32));
    let mut stats = RunStats::default();

    while stats.moves < max_moves && !stats.won && !stats.lost {
        let legal: Vec<Direction> = Direction::ALL
            .into_iter()
            .filter(|&direction| session.board().can_move_in_direction(direction))
            .collect();
        let Some(&direction) = legal.choose(&mut rng) else {
            log::warn!("No legal moves left");
            stats.lost = true;
            break;
        };
        step(session, direction, &mut stats);
        show(session);
    }
    stats
}

/// Applies one input and runs frames until the board settles.
fn step(session: &mut Session, direction: Direction, stats: &mut RunStats) -> InputOutcome {
    let outcome = session.slide(direction);
    match outcome {
        InputOutcome::Moved => {}
        InputOutcome::Reset => {
            stats.lost = false;
            return outcome;
        }
        InputOutcome::Ignored => return outcome,
    }

    stats.moves += 1;
    loop {
        let tick = session.tick();
        stats.frames += 1;
        if tick.frame != FrameOutcome::Animating {
            stats.won |= tick.won;
            stats.lost = tick.lost;
            if let Some(cell) = tick.spawned {
                log::debug!("New tile at {cell:?}");
            }
            return outcome;
        }
    }
}
