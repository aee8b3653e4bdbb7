//! Search command - analyse a position reached by a list of placements
//!
//! Placements are given as `x,y` tokens, alternating colors from White.
//! A placement that closes a mill takes its capture as `x,y/rx,ry`.

use anyhow::{bail, Context, Result};
use clap::Args;
use serde::Serialize;

use morris_core::{Engine, GameState, Player, SearchResult};

#[derive(Args)]
pub struct SearchArgs {
    /// Placements from the empty board, e.g. "0,0 2,4 2,0 4,4 4,0/2,4"
    #[arg(long, default_value = "")]
    pub moves: String,

    /// Search depth
    #[arg(long, default_value = "3")]
    pub depth: u32,

    /// Output result as JSON
    #[arg(long)]
    pub json: bool,
}

/// One parsed placement token
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
struct Placement {
    at: (i32, i32),
    removal: Option<(i32, i32)>,
}

/// Run search command
pub fn run(args: SearchArgs) -> Result<()> {
    let placements = parse_placements(&args.moves)?;
    let engine = replay(&placements)?;

    tracing::info!(
        "Searching {} to move at depth {}",
        engine.current_player(),
        args.depth
    );
    let result = search(&engine, args.depth);

    if args.json {
        print_json_result(engine.state(), &result)
    } else {
        println!("{}", engine);
        println!("Score: {}", result.score);
        match result.action {
            Some(mv) => println!("Best move: {:?}", mv),
            None => println!("Best move: none"),
        }
        Ok(())
    }
}

/// Apply placements from the start position, switching turns after each
fn replay(placements: &[Placement]) -> Result<Engine> {
    let mut engine = Engine::new();
    engine.start();

    for (index, placement) in placements.iter().enumerate() {
        let player = engine.current_player();
        let (x, y) = placement.at;
        engine
            .place(x, y)
            .with_context(|| format!("placement {} at ({}, {})", index + 1, x, y))?;

        let closed_mill = engine.check_mill(x, y, player);
        match (closed_mill, placement.removal) {
            (true, Some((rx, ry))) => engine
                .remove_piece(rx, ry, player)
                .with_context(|| format!("capture at ({}, {})", rx, ry))?,
            (true, None) => bail!("placement at ({}, {}) closes a mill; add a capture", x, y),
            (false, Some(_)) => bail!("placement at ({}, {}) does not close a mill", x, y),
            (false, None) => {}
        }

        if engine.check_win() {
            bail!("game is already won by {}", player);
        }
        engine.switch_turn();
    }

    Ok(engine)
}

#[cfg(not(feature = "parallel"))]
fn search(engine: &Engine, depth: u32) -> SearchResult {
    engine.search(
        depth,
        f32::NEG_INFINITY,
        f32::INFINITY,
        engine.current_player() == Player::White,
    )
}

#[cfg(feature = "parallel")]
fn search(engine: &Engine, depth: u32) -> SearchResult {
    morris_core::parallel_search(engine.state(), depth, engine.heuristics())
}

fn parse_placements(text: &str) -> Result<Vec<Placement>> {
    text.split_whitespace().map(parse_placement).collect()
}

fn parse_placement(token: &str) -> Result<Placement> {
    let (at, removal) = match token.split_once('/') {
        Some((at, removal)) => (at, Some(removal)),
        None => (token, None),
    };
    Ok(Placement {
        at: parse_coords(at)?,
        removal: removal.map(parse_coords).transpose()?,
    })
}

fn parse_coords(text: &str) -> Result<(i32, i32)> {
    let (x, y) = text
        .split_once(',')
        .with_context(|| format!("expected x,y but got '{}'", text))?;
    let x = x.trim().parse().with_context(|| format!("bad x in '{}'", text))?;
    let y = y.trim().parse().with_context(|| format!("bad y in '{}'", text))?;
    Ok((x, y))
}

fn print_json_result(state: &GameState, result: &SearchResult) -> Result<()> {
    #[derive(Serialize)]
    struct JsonOutput<'a> {
        to_move: Player,
        state: &'a GameState,
        result: &'a SearchResult,
    }

    let output = JsonOutput {
        to_move: state.current_player(),
        state,
        result,
    };
    println!("{}", serde_json::to_string_pretty(&output)?);
    Ok(())
}
