//! Rule violations reported by the engine

use crate::board::Pos;
use crate::game::Player;

/// Why an action was rejected. The game state is never modified when one of
/// these is returned.
#[derive(Clone, Debug, PartialEq, Eq, thiserror::Error)]
pub enum MorrisError {
    #[error("coordinates ({x}, {y}) are outside the 5x5 grid")]
    OutOfBounds { x: i32, y: i32 },

    #[error("{0} is not a board intersection")]
    NotAnIntersection(Pos),

    #[error("all 12 pieces have already been placed")]
    PlacementComplete,

    #[error("pieces cannot move until all 12 have been placed")]
    PlacementInProgress,

    #[error("{0} is already occupied")]
    Occupied(Pos),

    #[error("{pos} does not hold a {player} piece")]
    NotOwnPiece { pos: Pos, player: Player },

    #[error("{from} is not adjacent to {to}")]
    NotAdjacent { from: Pos, to: Pos },

    #[error("{0} does not hold an opponent piece")]
    NotOpponentPiece(Pos),

    #[error("{0} is protected by a mill")]
    Protected(Pos),

    #[error("{0} does not complete a mill, so nothing can be captured")]
    CaptureWithoutMill(Pos),

    #[error("{0} completes a mill and must name a capture")]
    CaptureRequired(Pos),

    #[error("{count} {player} pieces cannot come from {placed} placements")]
    TooManyPieces { player: Player, count: usize, placed: u8 },

    #[error("unknown player '{0}'")]
    UnknownPlayer(String),
}
