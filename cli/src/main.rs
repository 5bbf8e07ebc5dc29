use std::path::PathBuf;

use anyhow::Result;
use clap::{Parser, Subcommand};

mod play;
mod render;
mod save;

#[derive(Parser, Debug)]
#[command(version, about, long_about = None)]
struct Args {
    /// What log level to use
    #[command(flatten)]
    verbose: clap_verbosity_flag::Verbosity,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Play a game in the terminal, either scripted or on autoplay
    Play(play::PlayArgs),

    /// Print the board stored in a save file
    Show {
        /// Save file to read
        #[arg(short, long, value_name = "FILE")]
        load: PathBuf,
    },
}

fn main() -> Result<()> {
    let args = Args::parse();
    env_logger::Builder::new()
        .filter_level(args.verbose.log_level_filter())
        .init();

    match args.command {
        Command::Play(play_args) => play::run(play_args),
        Command::Show { load } => {
            let save = save::SaveFile::load(&load)?;
            let board = tilemerge_core::Board::restore(Default::default(), &save.tiles)?;
            print!("{}", render::render(&board));
            Ok(())
        }
    }
}
