//! Position evaluation

use crate::game::{GameState, Player};
use serde::{Deserialize, Serialize};

/// Score of a won position; positive means White has won
pub const WIN_VALUE: f32 = f32::INFINITY;

/// Heuristic weights for position evaluation
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct Heuristics {
    /// Value of each piece on the board
    pub material_weight: f32,
    /// Value of each line one move away from a mill
    pub two_in_a_row_weight: f32,
}

impl Default for Heuristics {
    fn default() -> Self {
        Self {
            material_weight: 10.0,
            two_in_a_row_weight: 5.0,
        }
    }
}

/// Evaluate position from White's point of view.
///
/// A decided game scores `±WIN_VALUE`; otherwise material and open
/// two-in-a-rows are weighed against each other.
pub fn evaluate(state: &GameState, heuristics: &Heuristics) -> f32 {
    match state.winner() {
        Some(Player::White) => return WIN_VALUE,
        Some(Player::Black) => return -WIN_VALUE,
        None => {}
    }

    let material =
        state.piece_count(Player::White) as f32 - state.piece_count(Player::Black) as f32;
    let threats = state.unblocked_two_in_a_row(Player::White) as f32
        - state.unblocked_two_in_a_row(Player::Black) as f32;

    heuristics.material_weight * material + heuristics.two_in_a_row_weight * threats
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::board::Pos;
    use crate::game::TOTAL_PIECES;

    #[test]
    fn test_evaluate_empty_board() {
        let state = GameState::started();
        assert_eq!(evaluate(&state, &Heuristics::default()), 0.0);
    }

    #[test]
    fn test_evaluate_material_and_threats() {
        // White: two on the top row with the corner open; Black: one extra loose piece
        let state = GameState::from_position(
            &[Pos::new(0, 0), Pos::new(2, 0)],
            &[Pos::new(1, 3), Pos::new(3, 1), Pos::new(0, 4)],
            6,
            Player::White,
        )
        .unwrap();
        // material -1 => -10, threats: white 1, black 0 => +5
        assert_eq!(evaluate(&state, &Heuristics::default()), -5.0);
    }

    #[test]
    fn test_evaluate_win_either_side_to_move() {
        let white = [Pos::new(0, 0), Pos::new(1, 1), Pos::new(3, 1)];
        let black = [Pos::new(4, 4), Pos::new(2, 4)];
        let heuristics = Heuristics::default();

        let white_to_move =
            GameState::from_position(&white, &black, TOTAL_PIECES, Player::White).unwrap();
        assert_eq!(evaluate(&white_to_move, &heuristics), WIN_VALUE);

        let black_to_move =
            GameState::from_position(&white, &black, TOTAL_PIECES, Player::Black).unwrap();
        assert_eq!(evaluate(&black_to_move, &heuristics), WIN_VALUE);

        let lost = GameState::from_position(&black, &white, TOTAL_PIECES, Player::White).unwrap();
        assert_eq!(evaluate(&lost, &heuristics), -WIN_VALUE);
    }

    #[test]
    fn test_default_heuristics() {
        let h = Heuristics::default();
        assert!(h.material_weight > h.two_in_a_row_weight);
    }
}
