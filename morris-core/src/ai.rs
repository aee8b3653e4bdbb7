//! Minimax search with alpha-beta pruning over compound moves

use serde::{Deserialize, Serialize};

use crate::board::Pos;
use crate::eval::{evaluate, Heuristics};
use crate::game::{Action, GameState, Player};

// ============================================================================
// SEARCH TYPES
// ============================================================================

/// A complete turn: a primary action plus the capture it earned, if any
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum SearchMove {
    Place { to: Pos, removal: Option<Pos> },
    Slide { from: Pos, to: Pos, removal: Option<Pos> },
}

impl SearchMove {
    pub fn new(action: Action, removal: Option<Pos>) -> Self {
        match action {
            Action::Place { to } => SearchMove::Place { to, removal },
            Action::Slide { from, to } => SearchMove::Slide { from, to, removal },
        }
    }

    pub fn action(&self) -> Action {
        match *self {
            SearchMove::Place { to, .. } => Action::Place { to },
            SearchMove::Slide { from, to, .. } => Action::Slide { from, to },
        }
    }

    pub fn removal(&self) -> Option<Pos> {
        match *self {
            SearchMove::Place { removal, .. } | SearchMove::Slide { removal, .. } => removal,
        }
    }
}

/// Score of a searched position and the move that achieves it
#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
pub struct SearchResult {
    pub score: f32,
    /// `None` only when the position itself was scored
    pub action: Option<SearchMove>,
}

impl SearchResult {
    fn leaf(score: f32) -> Self {
        Self {
            score,
            action: None,
        }
    }
}

// ============================================================================
// CHILD GENERATION
// ============================================================================

/// Successor positions of `action`, turn already switched.
///
/// A mill yields one child per removable piece; otherwise there is exactly
/// one child with no removal.
pub(crate) fn expand(state: &GameState, action: Action, mover: Player) -> Vec<(GameState, SearchMove)> {
    let mut after = state.clone();
    if after.apply_action(action, mover).is_err() {
        return Vec::new();
    }

    if after.forms_mill(action.destination(), mover) {
        let removable = after.removable_pieces(mover);
        if !removable.is_empty() {
            return removable
                .into_iter()
                .filter_map(|target| {
                    let mut child = after.clone();
                    child.remove_piece(target, mover).ok()?;
                    child.switch_turn();
                    Some((child, SearchMove::new(action, Some(target))))
                })
                .collect();
        }
    }

    after.switch_turn();
    vec![(after, SearchMove::new(action, None))]
}

// ============================================================================
// MINIMAX WITH ALPHA-BETA
// ============================================================================

/// Depth-limited minimax with alpha-beta pruning.
///
/// White maximizes and Black minimizes. One unit of depth is spent per
/// primary action; a removal chosen after a mill is part of the same ply
/// and does not cost extra depth. The primary-action loop and the removal
/// loop share a single cutoff, and ties keep the first move in scan order.
///
/// A node is terminal once either side has won, not only the side to move.
pub fn minimax(
    state: &GameState,
    depth: u32,
    mut alpha: f32,
    mut beta: f32,
    maximizing: bool,
    heuristics: &Heuristics,
) -> SearchResult {
    if depth == 0 || state.winner().is_some() {
        return SearchResult::leaf(evaluate(state, heuristics));
    }

    let mover = state.current_player();
    let actions = state.legal_actions(mover);
    if actions.is_empty() {
        return SearchResult::leaf(evaluate(state, heuristics));
    }

    let mut best = SearchResult::leaf(if maximizing {
        f32::NEG_INFINITY
    } else {
        f32::INFINITY
    });

    'actions: for action in actions {
        for (child, mv) in expand(state, action, mover) {
            let score = minimax(&child, depth - 1, alpha, beta, !maximizing, heuristics).score;

            if maximizing {
                if score > best.score || best.action.is_none() {
                    best = SearchResult { score, action: Some(mv) };
                }
                alpha = alpha.max(best.score);
                if best.score >= beta {
                    break 'actions;
                }
            } else {
                if score < best.score || best.action.is_none() {
                    best = SearchResult { score, action: Some(mv) };
                }
                beta = beta.min(best.score);
                if best.score <= alpha {
                    break 'actions;
                }
            }
        }
    }

    best
}

/// Full-window search for the player to move
pub fn best_move(state: &GameState, depth: u32, heuristics: &Heuristics) -> SearchResult {
    let maximizing = state.current_player() == Player::White;
    minimax(
        state,
        depth,
        f32::NEG_INFINITY,
        f32::INFINITY,
        maximizing,
        heuristics,
    )
}

/// Root search with every top-level child scored on its own thread.
///
/// Each child owns its state copy and is searched with a full window, so the
/// score matches `best_move`; ties still resolve to the first child.
#[cfg(feature = "parallel")]
pub fn parallel_search(state: &GameState, depth: u32, heuristics: &Heuristics) -> SearchResult {
    use rayon::prelude::*;

    if depth == 0 || state.winner().is_some() {
        return SearchResult::leaf(evaluate(state, heuristics));
    }

    let mover = state.current_player();
    let maximizing = mover == Player::White;
    let children: Vec<(GameState, SearchMove)> = state
        .legal_actions(mover)
        .into_iter()
        .flat_map(|action| expand(state, action, mover))
        .collect();
    if children.is_empty() {
        return SearchResult::leaf(evaluate(state, heuristics));
    }

    let scores: Vec<f32> = children
        .par_iter()
        .map(|(child, _)| {
            minimax(
                child,
                depth - 1,
                f32::NEG_INFINITY,
                f32::INFINITY,
                !maximizing,
                heuristics,
            )
            .score
        })
        .collect();

    let mut best = SearchResult::leaf(scores[0]);
    best.action = Some(children[0].1);
    for ((_, mv), &score) in children.iter().zip(&scores).skip(1) {
        let better = if maximizing {
            score > best.score
        } else {
            score < best.score
        };
        if better {
            best = SearchResult { score, action: Some(*mv) };
        }
    }
    best
}

// ============================================================================
// TESTS
// ============================================================================
