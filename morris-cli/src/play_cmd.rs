//! Play command - computer-vs-computer games
//!
//! ## Architecture (4-layer granularity)
//!
//! - Level 1: run() - orchestration
//! - Level 2: play_match(), report_results()
//! - Level 3: play_single_game(), compute_match_statistics()
//! - Level 4: formatting utilities

use anyhow::{bail, Result};
use clap::Args;
use rand::SeedableRng;
use rand_chacha::ChaCha8Rng;
use rustc_hash::FxHashMap;
use serde::Serialize;

use morris_core::{random_move, Engine, GameResult, GameState, Heuristics, Phase, SearchMove};

use crate::config::MatchConfig;

/// Occurrences of the same movement-phase position that end a game
const REPETITION_LIMIT: u32 = 3;

// ============================================================================
// COMMAND ARGUMENTS (Level 4 - Configuration)
// ============================================================================

#[derive(Args)]
pub struct PlayArgs {
    /// Number of games to play
    #[arg(long, default_value = "1")]
    pub games: usize,

    /// Search depth for both sides
    #[arg(long, default_value = "3")]
    pub depth: u32,

    /// Search depth for White (overrides --depth)
    #[arg(long)]
    pub white_depth: Option<u32>,

    /// Search depth for Black (overrides --depth)
    #[arg(long)]
    pub black_depth: Option<u32>,

    /// Maximum plies per game before it is called a draw
    #[arg(long, default_value = "200")]
    pub max_plies: u32,

    /// Random opening plies before the engines take over
    #[arg(long, default_value = "0")]
    pub random_plies: u32,

    /// Weight of each piece on the board
    #[arg(long, default_value = "10.0")]
    pub material_weight: f32,

    /// Weight of each open two-in-a-row
    #[arg(long, default_value = "5.0")]
    pub two_in_a_row_weight: f32,

    /// Print the board after every ply
    #[arg(long)]
    pub verbose: bool,

    /// Output results as JSON
    #[arg(long)]
    pub json: bool,
}

impl PlayArgs {
    fn to_config(&self, seed: Option<u64>) -> MatchConfig {
        let mut config = MatchConfig::default()
            .with_depth(self.depth)
            .with_games(self.games)
            .with_max_plies(self.max_plies)
            .with_random_plies(self.random_plies)
            .with_heuristics(Heuristics {
                material_weight: self.material_weight,
                two_in_a_row_weight: self.two_in_a_row_weight,
            });
        if self.white_depth.is_some() || self.black_depth.is_some() {
            config = config.with_depths(
                self.white_depth.unwrap_or(self.depth),
                self.black_depth.unwrap_or(self.depth),
            );
        }
        match seed {
            Some(s) => config.with_seed(s),
            None => config,
        }
    }
}

/// How a game ended
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize)]
enum Outcome {
    WhiteWins,
    BlackWins,
    Repetition,
    MoveLimit,
}

impl Outcome {
    fn from_result(result: GameResult) -> Option<Self> {
        match result {
            GameResult::WhiteWins => Some(Outcome::WhiteWins),
            GameResult::BlackWins => Some(Outcome::BlackWins),
            GameResult::Ongoing => None,
        }
    }

    fn is_draw(self) -> bool {
        matches!(self, Outcome::Repetition | Outcome::MoveLimit)
    }
}

/// Result of a single game
#[derive(Clone, Debug)]
struct GameRecord {
    game_number: usize,
    outcome: Outcome,
    plies: u32,
    moves: Vec<SearchMove>,
    final_state: GameState,
}

/// Aggregated match results
#[derive(Clone, Debug)]
struct MatchResults {
    games: Vec<GameRecord>,
    white_wins: usize,
    black_wins: usize,
    draws: usize,
    avg_plies: f32,
}

// ============================================================================
// LEVEL 1 - ORCHESTRATION
// ============================================================================

/// Run play command
///
/// 1. Build the match configuration
/// 2. Play the games
/// 3. Report results
pub fn run(args: PlayArgs, seed: Option<u64>) -> Result<()> {
    if args.games == 0 {
        bail!("--games must be at least 1");
    }
    let config = args.to_config(seed);

    tracing::info!(
        "Starting match: {} games, depth W={} B={}",
        config.games,
        config.white_depth,
        config.black_depth
    );

    let results = play_match(&config, args.verbose);

    report_results(&results, args.json)?;

    Ok(())
}

// ============================================================================
// LEVEL 2 - PHASES
// ============================================================================

/// Play all games in the match
fn play_match(config: &MatchConfig, verbose: bool) -> MatchResults {
    let mut rng = create_rng(config.seed);
    let mut games = Vec::with_capacity(config.games);

    for game_num in 0..config.games {
        let record = play_single_game(config, game_num + 1, &mut rng, verbose);

        tracing::info!(
            "Game {}: {:?} ({} plies)",
            record.game_number,
            record.outcome,
            record.plies
        );

        games.push(record);
    }

    compute_match_statistics(games)
}

/// Report match results
fn report_results(results: &MatchResults, json: bool) -> Result<()> {
    if json {
        print_json_results(results)
    } else {
        print_text_results(results);
        Ok(())
    }
}

// ============================================================================
// LEVEL 3 - STEPS
// ============================================================================

/// Play one game from the empty board.
///
/// Each ply follows the front-end protocol: play the move (with its capture),
/// check whether the mover has won, then hand the turn over.
fn play_single_game(
    config: &MatchConfig,
    game_number: usize,
    rng: &mut ChaCha8Rng,
    verbose: bool,
) -> GameRecord {
    let mut engine = Engine::with_heuristics(config.heuristics.clone());
    engine.start();

    let mut moves = Vec::new();
    let mut seen: FxHashMap<GameState, u32> = FxHashMap::default();

    let outcome = loop {
        if moves.len() as u32 >= config.max_plies {
            break Outcome::MoveLimit;
        }

        let mover = engine.current_player();
        let played = if (moves.len() as u32) < config.random_plies {
            match random_move(engine.state(), rng) {
                Some(mv) if engine.apply_search_move(mv).is_ok() => Some(mv),
                _ => None,
            }
        } else {
            engine.computer_move(config.depth_for(mover))
        };

        let Some(mv) = played else {
            // a stuck mover has lost
            match Outcome::from_result(engine.state().result()) {
                Some(outcome) => break outcome,
                None => break Outcome::MoveLimit,
            }
        };
        moves.push(mv);

        if verbose {
            println!("Ply {}: {} plays {:?}\n{}", moves.len(), mover, mv, engine);
        }

        if engine.check_win() {
            match Outcome::from_result(engine.state().result()) {
                Some(outcome) => break outcome,
                None => break Outcome::MoveLimit,
            }
        }
        engine.switch_turn();

        if engine.phase() == Phase::Movement {
            let count = seen.entry(engine.state().clone()).or_insert(0);
            *count += 1;
            if *count >= REPETITION_LIMIT {
                break Outcome::Repetition;
            }
        }
    };

    GameRecord {
        game_number,
        outcome,
        plies: moves.len() as u32,
        moves,
        final_state: engine.state().clone(),
    }
}

/// Compute aggregate statistics from game records
fn compute_match_statistics(games: Vec<GameRecord>) -> MatchResults {
    let white_wins = games
        .iter()
        .filter(|g| g.outcome == Outcome::WhiteWins)
        .count();
    let black_wins = games
        .iter()
        .filter(|g| g.outcome == Outcome::BlackWins)
        .count();
    let draws = games.iter().filter(|g| g.outcome.is_draw()).count();

    let total_plies: u32 = games.iter().map(|g| g.plies).sum();
    let avg_plies = if games.is_empty() {
        0.0
    } else {
        total_plies as f32 / games.len() as f32
    };

    MatchResults {
        games,
        white_wins,
        black_wins,
        draws,
        avg_plies,
    }
}

// ============================================================================
// LEVEL 4 - UTILITIES
// ============================================================================

/// Create RNG from seed or random
fn create_rng(seed: Option<u64>) -> ChaCha8Rng {
    match seed {
        Some(s) => ChaCha8Rng::seed_from_u64(s),
        None => ChaCha8Rng::from_entropy(),
    }
}

fn percent(count: usize, total: usize) -> f32 {
    if total > 0 {
        count as f32 / total as f32 * 100.0
    } else {
        0.0
    }
}

/// Print results as JSON
fn print_json_results(results: &MatchResults) -> Result<()> {
    #[derive(Serialize)]
    struct JsonGame<'a> {
        game_number: usize,
        outcome: Outcome,
        plies: u32,
        moves: &'a [SearchMove],
        final_state: &'a GameState,
    }

    #[derive(Serialize)]
    struct JsonOutput<'a> {
        total_games: usize,
        white_wins: usize,
        black_wins: usize,
        draws: usize,
        avg_plies: f32,
        games: Vec<JsonGame<'a>>,
    }

    let output = JsonOutput {
        total_games: results.games.len(),
        white_wins: results.white_wins,
        black_wins: results.black_wins,
        draws: results.draws,
        avg_plies: results.avg_plies,
        games: results
            .games
            .iter()
            .map(|g| JsonGame {
                game_number: g.game_number,
                outcome: g.outcome,
                plies: g.plies,
                moves: &g.moves,
                final_state: &g.final_state,
            })
            .collect(),
    };

    println!("{}", serde_json::to_string_pretty(&output)?);
    Ok(())
}

/// Print results as text
fn print_text_results(results: &MatchResults) {
    let total = results.games.len();

    println!("\n=== Match Results ===");
    println!("Total games: {}", total);
    println!(
        "White wins:  {} ({:.1}%)",
        results.white_wins,
        percent(results.white_wins, total)
    );
    println!(
        "Black wins:  {} ({:.1}%)",
        results.black_wins,
        percent(results.black_wins, total)
    );
    println!(
        "Draws:       {} ({:.1}%)",
        results.draws,
        percent(results.draws, total)
    );
    println!("Avg plies:   {:.1}", results.avg_plies);

    println!("\nGame details:");
    for game in &results.games {
        println!(
            "  Game {}: {:?} in {} plies",
            game.game_number, game.outcome, game.plies
        );
    }
    if let Some(last) = results.games.last() {
        println!("\nFinal position of game {}:\n{}", last.game_number, last.final_state);
    }
}

// ============================================================================
// TESTS
// ============================================================================
