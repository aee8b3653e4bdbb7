//! Morris CLI - Command-line interface
//!
//! Commands:
//! - play: Computer-vs-computer matches
//! - search: Search a position reached by a list of placements

mod config;
mod play_cmd;
mod search_cmd;

use clap::{Parser, Subcommand};
use tracing_subscriber::EnvFilter;

#[derive(Parser)]
#[command(name = "morris")]
#[command(about = "Six Men's Morris engine and computer opponent")]
struct Cli {
    /// Random seed for reproducible runs
    #[arg(long, global = true)]
    seed: Option<u64>,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Play computer-vs-computer games
    Play(play_cmd::PlayArgs),
    /// Search a position and print the chosen move
    Search(search_cmd::SearchArgs),
}

fn main() -> anyhow::Result<()> {
    // Logs go to stderr so JSON output stays clean
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .with_writer(std::io::stderr)
        .init();

    let cli = Cli::parse();

    match cli.command {
        Commands::Play(args) => play_cmd::run(args, cli.seed),
        Commands::Search(args) => search_cmd::run(args),
    }
}
