//! Morris Core - Six Men's Morris rules engine and computer opponent
//!
//! This crate provides:
//! - Board geometry (16 intersections, adjacency graph, 8 mill lines)
//! - Game state with placement, movement and flying rules
//! - Mill detection, capture rules and win detection
//! - Position evaluation (material and open two-in-a-rows)
//! - Minimax search with alpha-beta pruning
//! - A computer player and an engine with undo

pub mod board;
pub mod error;
pub mod game;
pub mod eval;
pub mod ai;
pub mod strategy;
pub mod history;
pub mod engine;

// Re-exports for convenient access
pub use board::{Board, Cell, Pos, GRID_SIZE, INTERSECTIONS, MILL_LINES};
pub use error::MorrisError;
pub use game::{Action, GameResult, GameState, Phase, Player, TOTAL_PIECES};
pub use eval::{evaluate, Heuristics, WIN_VALUE};
pub use ai::{best_move, minimax, SearchMove, SearchResult};
#[cfg(feature = "parallel")]
pub use ai::parallel_search;
pub use strategy::{choose_move, choose_removal, random_move};
pub use history::History;
pub use engine::Engine;
