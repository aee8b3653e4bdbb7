//! Game engine: the operations exposed to front ends
//!
//! Wraps one `GameState` together with its undo history. Coordinates arrive
//! as plain integers and are validated before they touch the board. Turn
//! switching stays with the caller: after a mill the caller removes a piece
//! before calling `switch_turn`.

use std::fmt;

use tracing::{debug, info};

use crate::ai::{self, SearchMove, SearchResult};
use crate::board::{Board, Pos};
use crate::error::MorrisError;
use crate::eval::{self, Heuristics};
use crate::game::{Action, GameState, Phase, Player};
use crate::history::History;
use crate::strategy;

/// Single game session, driven by one caller at a time
#[derive(Clone, Debug, Default)]
pub struct Engine {
    state: GameState,
    history: History,
    heuristics: Heuristics,
}

impl Engine {
    /// Engine with an empty, inactive board; call `start` to play
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_heuristics(heuristics: Heuristics) -> Self {
        Self {
            heuristics,
            ..Self::default()
        }
    }

    /// Engine resuming from an existing position, with no undo history
    pub fn from_state(state: GameState) -> Self {
        Self {
            state,
            ..Self::default()
        }
    }

    // ========================================================================
    // LIFECYCLE
    // ========================================================================

    /// Reset to an empty board with White to move
    pub fn start(&mut self) {
        self.state = GameState::started();
        self.history.clear();
        info!("new game started");
    }

    pub fn switch_turn(&mut self) {
        self.state.switch_turn();
    }

    /// Restore the position before the last placement or move.
    ///
    /// The player to move is left as it is.
    pub fn undo(&mut self) -> bool {
        match self.history.pop() {
            Some(mut snapshot) => {
                snapshot.set_current_player(self.state.current_player());
                self.state = snapshot;
                true
            }
            None => false,
        }
    }

    // ========================================================================
    // QUERIES
    // ========================================================================

    pub fn state(&self) -> &GameState {
        &self.state
    }

    pub fn board(&self) -> &Board {
        self.state.board()
    }

    pub fn current_player(&self) -> Player {
        self.state.current_player()
    }

    pub fn placed_count(&self) -> u8 {
        self.state.placed_count()
    }

    pub fn is_active(&self) -> bool {
        self.state.is_active()
    }

    pub fn phase(&self) -> Phase {
        self.state.phase()
    }

    pub fn removed_count(&self, player: Player) -> u8 {
        self.state.removed_count(player)
    }

    /// Snapshots available to `undo`
    pub fn history_len(&self) -> usize {
        self.history.len()
    }

    pub fn heuristics(&self) -> &Heuristics {
        &self.heuristics
    }

    /// Legal primary actions for the player to move
    pub fn legal_actions(&self) -> Vec<Action> {
        self.state.legal_actions(self.state.current_player())
    }

    // ========================================================================
    // PLACEMENT AND MOVEMENT
    // ========================================================================

    /// Place a piece for the player to move
    pub fn place(&mut self, x: i32, y: i32) -> Result<(), MorrisError> {
        let pos = Pos::from_coords(x, y)?;
        let player = self.state.current_player();
        self.apply(|state| state.place(pos, player))
    }

    /// Move a piece of the player to move from `(x, y)` to `(nx, ny)`
    pub fn move_piece(&mut self, x: i32, y: i32, nx: i32, ny: i32) -> Result<(), MorrisError> {
        let from = Pos::from_coords(x, y)?;
        let to = Pos::from_coords(nx, ny)?;
        let player = self.state.current_player();
        self.apply(|state| state.move_piece(from, to, player))
    }

    /// Run a mutation, keeping a snapshot only if it succeeded
    fn apply<F>(&mut self, mutate: F) -> Result<(), MorrisError>
    where
        F: FnOnce(&mut GameState) -> Result<(), MorrisError>,
    {
        let snapshot = self.state.clone();
        mutate(&mut self.state)?;
        self.history.push(snapshot);
        Ok(())
    }

    /// Play a full turn: the primary action, then its capture if it has one.
    ///
    /// A capture is required exactly when the action closes a mill and the
    /// opponent has a piece to lose. Nothing changes unless both halves are
    /// legal.
    pub fn apply_search_move(&mut self, mv: SearchMove) -> Result<(), MorrisError> {
        let player = self.state.current_player();
        let action = mv.action();
        let to = action.destination();

        self.apply(|state| {
            let mut next = state.clone();
            next.apply_action(action, player)?;

            let closed_mill = next.forms_mill(to, player);
            match mv.removal() {
                Some(target) if closed_mill => next.remove_piece(target, player)?,
                Some(_) => return Err(MorrisError::CaptureWithoutMill(to)),
                None if closed_mill && !next.removable_pieces(player).is_empty() => {
                    return Err(MorrisError::CaptureRequired(to));
                }
                None => {}
            }

            *state = next;
            Ok(())
        })
    }

    // ========================================================================
    // MILLS AND CAPTURES
    // ========================================================================

    /// Whether `(x, y)` is part of a mill owned by `player`; off-board
    /// coordinates are never in a mill
    pub fn check_mill(&self, x: i32, y: i32, player: Player) -> bool {
        Pos::from_coords(x, y)
            .map(|pos| self.state.forms_mill(pos, player))
            .unwrap_or(false)
    }

    pub fn removable_pieces(&self, player: Player) -> Vec<Pos> {
        self.state.removable_pieces(player)
    }

    /// Take the opponent piece at `(x, y)` on behalf of `player`
    pub fn remove_piece(&mut self, x: i32, y: i32, player: Player) -> Result<(), MorrisError> {
        let pos = Pos::from_coords(x, y)?;
        self.state.remove_piece(pos, player)
    }

    // ========================================================================
    // TERMINAL DETECTION AND EVALUATION
    // ========================================================================

    pub fn piece_count(&self, player: Player) -> usize {
        self.state.piece_count(player)
    }

    pub fn has_legal_move(&self, player: Player) -> bool {
        self.state.has_legal_move(player)
    }

    /// Whether the player to move has won
    pub fn check_win(&self) -> bool {
        self.state.check_win()
    }

    pub fn unblocked_two_in_a_row(&self, player: Player) -> usize {
        self.state.unblocked_two_in_a_row(player)
    }

    /// Static score from White's point of view
    pub fn evaluate(&self) -> f32 {
        eval::evaluate(&self.state, &self.heuristics)
    }

    // ========================================================================
    // COMPUTER PLAYER
    // ========================================================================

    /// Alpha-beta search from the current position
    pub fn search(&self, depth: u32, alpha: f32, beta: f32, maximizing: bool) -> SearchResult {
        ai::minimax(&self.state, depth, alpha, beta, maximizing, &self.heuristics)
    }

    /// Choose and play a turn for the player to move.
    ///
    /// Returns the turn played, or `None` if there was nothing to play.
    pub fn computer_move(&mut self, depth: u32) -> Option<SearchMove> {
        let mv = strategy::choose_move(&self.state, depth, &self.heuristics)?;
        match self.apply_search_move(mv) {
            Ok(()) => {
                debug!(?mv, player = %self.state.current_player(), "computer move");
                Some(mv)
            }
            Err(err) => {
                debug!(?mv, %err, "computer move rejected");
                None
            }
        }
    }

    /// Choose and take an opponent piece for the player to move
    pub fn remove_best_opponent_piece(&mut self, depth: u32) -> Option<Pos> {
        let player = self.state.current_player();
        let target = strategy::choose_removal(&self.state, player, depth, &self.heuristics)?;
        self.state.remove_piece(target, player).ok()?;
        debug!(%target, %player, "removed opponent piece");
        Some(target)
    }
}

impl fmt::Display for Engine {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.state)
    }
}
