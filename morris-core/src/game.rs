//! Game state, legality checks, mills, captures and terminal detection

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

use crate::board::{Board, Cell, Pos, INTERSECTIONS, MILL_LINES};
use crate::error::MorrisError;

// ============================================================================
// CONSTANTS
// ============================================================================

/// Pieces placed in total before the movement phase starts
pub const TOTAL_PIECES: u8 = 12;

/// A player with exactly this many pieces may fly
const FLY_COUNT: usize = 3;

/// A player reduced to this many pieces has lost
const LOSING_COUNT: usize = 2;

// ============================================================================
// CORE TYPES
// ============================================================================

/// Player color
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Player {
    White = 0,
    Black = 1,
}

impl Player {
    pub fn opponent(self) -> Self {
        match self {
            Player::White => Player::Black,
            Player::Black => Player::White,
        }
    }

    /// Cell value for this player's pieces
    pub fn cell(self) -> Cell {
        match self {
            Player::White => Cell::White,
            Player::Black => Cell::Black,
        }
    }
}

impl fmt::Display for Player {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            Player::White => "W",
            Player::Black => "B",
        })
    }
}

impl FromStr for Player {
    type Err = MorrisError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "w" | "white" => Ok(Player::White),
            "b" | "black" => Ok(Player::Black),
            _ => Err(MorrisError::UnknownPlayer(s.to_string())),
        }
    }
}

/// Game phase, derived from the number of pieces placed
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub enum Phase {
    Placement,
    Movement,
}

/// Game result
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub enum GameResult {
    Ongoing,
    WhiteWins,
    BlackWins,
}

/// A primary action: a placement or a slide (a flight when flying)
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Action {
    Place { to: Pos },
    Slide { from: Pos, to: Pos },
}

impl Action {
    /// Where the moved or placed piece ends up
    pub fn destination(&self) -> Pos {
        match *self {
            Action::Place { to } | Action::Slide { to, .. } => to,
        }
    }
}

// ============================================================================
// GAME STATE
// ============================================================================

/// Full game state (clone to explore)
#[derive(Clone, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct GameState {
    board: Board,
    current_player: Player,
    placed: u8,
    white_on_board: u8,
    black_on_board: u8,
    white_removed: u8,
    black_removed: u8,
    active: bool,
}

impl Default for GameState {
    fn default() -> Self {
        Self::new()
    }
}

impl GameState {
    // ========================================================================
    // CONSTRUCTORS
    // ========================================================================

    /// Empty board, White to move, not yet started
    pub fn new() -> Self {
        Self {
            board: Board::new(),
            current_player: Player::White,
            placed: 0,
            white_on_board: 0,
            black_on_board: 0,
            white_removed: 0,
            black_removed: 0,
            active: false,
        }
    }

    /// Empty board, White to move, game active
    pub fn started() -> Self {
        Self {
            active: true,
            ..Self::new()
        }
    }

    /// Build an active game from piece lists.
    ///
    /// `placed` is the number of placements made so far; White placed the
    /// odd-numbered ones, so any shortfall between that and the pieces on
    /// the board is recorded as removed. A color with more pieces than it
    /// could have placed is rejected.
    pub fn from_position(
        white: &[Pos],
        black: &[Pos],
        placed: u8,
        to_move: Player,
    ) -> Result<Self, MorrisError> {
        let placed = placed.min(TOTAL_PIECES);
        for (pieces, player) in [(white, Player::White), (black, Player::Black)] {
            if pieces.len() > assigned(placed, player) as usize {
                return Err(MorrisError::TooManyPieces {
                    player,
                    count: pieces.len(),
                    placed,
                });
            }
        }

        let mut state = Self::started();
        for (pieces, player) in [(white, Player::White), (black, Player::Black)] {
            for &pos in pieces {
                if !pos.is_intersection() {
                    return Err(MorrisError::NotAnIntersection(pos));
                }
                if state.board.get(pos) != Cell::Empty {
                    return Err(MorrisError::Occupied(pos));
                }
                state.board.set(pos, player.cell());
            }
        }

        let white_count = white.len() as u8;
        let black_count = black.len() as u8;
        state.placed = placed;
        state.white_on_board = white_count;
        state.black_on_board = black_count;
        state.white_removed = assigned(placed, Player::White) - white_count;
        state.black_removed = assigned(placed, Player::Black) - black_count;
        state.current_player = to_move;
        Ok(state)
    }

    // ========================================================================
    // ACCESSORS
    // ========================================================================

    pub fn board(&self) -> &Board {
        &self.board
    }

    pub fn current_player(&self) -> Player {
        self.current_player
    }

    pub(crate) fn set_current_player(&mut self, player: Player) {
        self.current_player = player;
    }

    /// Placements made so far (0..=12)
    pub fn placed_count(&self) -> u8 {
        self.placed
    }

    pub fn is_active(&self) -> bool {
        self.active
    }

    pub fn phase(&self) -> Phase {
        if self.placed < TOTAL_PIECES {
            Phase::Placement
        } else {
            Phase::Movement
        }
    }

    /// Tracked on-board counter for `player`
    pub fn on_board(&self, player: Player) -> u8 {
        match player {
            Player::White => self.white_on_board,
            Player::Black => self.black_on_board,
        }
    }

    /// How many of `player`'s pieces have been captured
    pub fn removed_count(&self, player: Player) -> u8 {
        match player {
            Player::White => self.white_removed,
            Player::Black => self.black_removed,
        }
    }

    /// Pieces handed to `player` so far; placements alternate from White
    pub fn assigned_count(&self, player: Player) -> u8 {
        assigned(self.placed, player)
    }

    /// Cells holding `player`'s color
    pub fn piece_count(&self, player: Player) -> usize {
        self.board.count(player.cell())
    }

    /// `player`'s pieces in scan order
    pub fn pieces(&self, player: Player) -> impl Iterator<Item = Pos> + '_ {
        self.board.positions_of(player.cell())
    }

    /// Whether `player` ignores adjacency when moving
    pub fn is_flying(&self, player: Player) -> bool {
        self.phase() == Phase::Movement && self.piece_count(player) == FLY_COUNT
    }

    // ========================================================================
    // MUTATION
    // ========================================================================

    pub fn switch_turn(&mut self) {
        self.current_player = self.current_player.opponent();
    }

    /// Put a new piece for `player` on an empty intersection
    pub fn place(&mut self, pos: Pos, player: Player) -> Result<(), MorrisError> {
        if self.placed >= TOTAL_PIECES {
            return Err(MorrisError::PlacementComplete);
        }
        if !pos.is_intersection() {
            return Err(MorrisError::NotAnIntersection(pos));
        }
        if self.board.get(pos) != Cell::Empty {
            return Err(MorrisError::Occupied(pos));
        }

        self.board.set(pos, player.cell());
        self.placed += 1;
        match player {
            Player::White => self.white_on_board += 1,
            Player::Black => self.black_on_board += 1,
        }
        Ok(())
    }

    /// Move one of `player`'s pieces, sliding along a line or flying with
    /// exactly three pieces left
    pub fn move_piece(&mut self, from: Pos, to: Pos, player: Player) -> Result<(), MorrisError> {
        if self.placed < TOTAL_PIECES {
            return Err(MorrisError::PlacementInProgress);
        }
        if self.board.get(from) != player.cell() {
            return Err(MorrisError::NotOwnPiece { pos: from, player });
        }
        if !to.is_intersection() {
            return Err(MorrisError::NotAnIntersection(to));
        }
        if self.board.get(to) != Cell::Empty {
            return Err(MorrisError::Occupied(to));
        }
        if !self.is_flying(player) && !from.is_adjacent(to) {
            return Err(MorrisError::NotAdjacent { from, to });
        }

        self.board.set(from, Cell::Empty);
        self.board.set(to, player.cell());
        Ok(())
    }

    /// Apply a primary action for `player`
    pub fn apply_action(&mut self, action: Action, player: Player) -> Result<(), MorrisError> {
        match action {
            Action::Place { to } => self.place(to, player),
            Action::Slide { from, to } => self.move_piece(from, to, player),
        }
    }

    // ========================================================================
    // MILLS AND CAPTURES
    // ========================================================================

    /// True if `pos` completes a line held entirely by `player`
    pub fn forms_mill(&self, pos: Pos, player: Player) -> bool {
        let cell = player.cell();
        pos.mill_lines()
            .any(|line| line.iter().all(|&p| self.board.get(p) == cell))
    }

    /// True if the piece at `pos` belongs to a mill of its own color
    fn in_mill(&self, pos: Pos) -> bool {
        match self.board.get(pos) {
            Cell::White => self.forms_mill(pos, Player::White),
            Cell::Black => self.forms_mill(pos, Player::Black),
            Cell::Empty => false,
        }
    }

    /// Opponent pieces `capturer` may take, in scan order.
    ///
    /// Pieces in a mill are protected unless every opponent piece is in one.
    pub fn removable_pieces(&self, capturer: Player) -> Vec<Pos> {
        let opponent: Vec<Pos> = self.pieces(capturer.opponent()).collect();
        let free: Vec<Pos> = opponent
            .iter()
            .copied()
            .filter(|&pos| !self.in_mill(pos))
            .collect();

        if free.is_empty() {
            opponent
        } else {
            free
        }
    }

    /// Capture an opponent piece after `capturer` formed a mill
    pub fn remove_piece(&mut self, pos: Pos, capturer: Player) -> Result<(), MorrisError> {
        let victim = capturer.opponent();
        if self.board.get(pos) != victim.cell() {
            return Err(MorrisError::NotOpponentPiece(pos));
        }
        if !self.removable_pieces(capturer).contains(&pos) {
            return Err(MorrisError::Protected(pos));
        }

        self.board.set(pos, Cell::Empty);
        match victim {
            Player::White => {
                self.white_removed += 1;
                self.white_on_board = self.white_on_board.saturating_sub(1);
            }
            Player::Black => {
                self.black_removed += 1;
                self.black_on_board = self.black_on_board.saturating_sub(1);
            }
        }
        Ok(())
    }

    // ========================================================================
    // MOVE GENERATION
    // ========================================================================

    /// Empty cells `player`'s piece at `from` can reach in one move
    pub fn destinations(&self, from: Pos, player: Player) -> Vec<Pos> {
        if self.is_flying(player) {
            self.board.positions_of(Cell::Empty).collect()
        } else {
            from.neighbors()
                .iter()
                .copied()
                .filter(|&to| self.board.get(to) == Cell::Empty)
                .collect()
        }
    }

    /// Every legal primary action for `player` in scan order.
    ///
    /// Placement targets go row-major; slides go source by source, each
    /// source's destinations in adjacency order (row-major when flying).
    pub fn legal_actions(&self, player: Player) -> Vec<Action> {
        match self.phase() {
            Phase::Placement => self
                .board
                .positions_of(Cell::Empty)
                .map(|to| Action::Place { to })
                .collect(),
            Phase::Movement => {
                let mut actions = Vec::new();
                for from in self.pieces(player) {
                    for to in self.destinations(from, player) {
                        actions.push(Action::Slide { from, to });
                    }
                }
                actions
            }
        }
    }

    // ========================================================================
    // TERMINAL DETECTION
    // ========================================================================

    /// Whether `player` could still move a piece
    pub fn has_legal_move(&self, player: Player) -> bool {
        if self.piece_count(player) <= LOSING_COUNT {
            return false;
        }
        self.pieces(player)
            .any(|from| !self.destinations(from, player).is_empty())
    }

    /// Whether `player` has beaten the opponent. Never true during placement.
    pub fn has_won(&self, player: Player) -> bool {
        if self.phase() == Phase::Placement {
            return false;
        }
        let opponent = player.opponent();
        self.piece_count(opponent) <= LOSING_COUNT || !self.has_legal_move(opponent)
    }

    /// Whether the player to move has won
    pub fn check_win(&self) -> bool {
        self.has_won(self.current_player)
    }

    /// Winner, checking the player to move first
    pub fn winner(&self) -> Option<Player> {
        let current = self.current_player;
        if self.has_won(current) {
            Some(current)
        } else if self.has_won(current.opponent()) {
            Some(current.opponent())
        } else {
            None
        }
    }

    pub fn result(&self) -> GameResult {
        match self.winner() {
            Some(Player::White) => GameResult::WhiteWins,
            Some(Player::Black) => GameResult::BlackWins,
            None => GameResult::Ongoing,
        }
    }

    // ========================================================================
    // LINE PATTERNS
    // ========================================================================

    /// Lines holding two of `player`'s pieces and one empty cell
    pub fn unblocked_two_in_a_row(&self, player: Player) -> usize {
        MILL_LINES
            .iter()
            .filter(|line| self.line_counts(line, player) == (2, 0))
            .count()
    }

    /// Pieces of `player` and of the opponent on `line`
    pub(crate) fn line_counts(&self, line: &[Pos; 3], player: Player) -> (usize, usize) {
        let own = line
            .iter()
            .filter(|&&p| self.board.get(p) == player.cell())
            .count();
        let other = line
            .iter()
            .filter(|&&p| self.board.get(p) == player.opponent().cell())
            .count();
        (own, other)
    }

    /// Check the counters agree with the grid, every piece handed out is
    /// either on the board or removed, and no piece sits off an intersection
    pub fn check_invariants(&self) -> bool {
        let white = self.piece_count(Player::White);
        let black = self.piece_count(Player::Black);
        let on_intersections = INTERSECTIONS
            .iter()
            .filter(|&&p| self.board.get(p) != Cell::Empty)
            .count();
        let accounted = [Player::White, Player::Black].into_iter().all(|player| {
            self.on_board(player) as u16 + self.removed_count(player) as u16
                == self.assigned_count(player) as u16
        });
        white == self.white_on_board as usize
            && black == self.black_on_board as usize
            && on_intersections == white + black
            && self.placed <= TOTAL_PIECES
            && accounted
    }
}

/// Pieces `player` has received after `placed` alternating placements
fn assigned(placed: u8, player: Player) -> u8 {
    match player {
        Player::White => (placed + 1) / 2,
        Player::Black => placed / 2,
    }
}

impl fmt::Display for GameState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.board)?;
        writeln!(
            f,
            "{:?} phase, {} to move, W {} on board / {} lost, B {} on board / {} lost",
            self.phase(),
            self.current_player,
            self.white_on_board,
            self.white_removed,
            self.black_on_board,
            self.black_removed,
        )
    }
}

// ============================================================================
// TESTS
// ============================================================================
