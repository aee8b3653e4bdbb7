//! Computer player: take a mill, block a mill, or fall back to search

use rand::seq::SliceRandom;
use rand::Rng;
use tracing::debug;

use crate::ai::{minimax, SearchMove};
use crate::board::{Cell, Pos, MILL_LINES};
use crate::eval::Heuristics;
use crate::game::{Action, GameState, Phase, Player};

// ============================================================================
// LEVEL 1 - TURN SELECTION
// ============================================================================

/// Pick a full turn for the player to move.
///
/// In order of preference: the first action that closes a mill (with the
/// capture chosen by `choose_removal`), the first action that fills an
/// opponent's open two-in-a-row, then the search result at `depth`.
/// Returns `None` when the player has nothing to play.
pub fn choose_move(state: &GameState, depth: u32, heuristics: &Heuristics) -> Option<SearchMove> {
    let mover = state.current_player();

    if let Some((action, after)) = find_mill_action(state, mover) {
        let removal = choose_removal(&after, mover, depth, heuristics);
        debug!(?action, ?removal, "closing a mill");
        return Some(SearchMove::new(action, removal));
    }

    if let Some(action) = find_block_action(state, mover) {
        debug!(?action, "blocking an opponent mill");
        return Some(SearchMove::new(action, None));
    }

    // a zero-depth search scores the root and returns no move
    let depth = depth.max(1);
    let result = minimax(
        state,
        depth,
        f32::NEG_INFINITY,
        f32::INFINITY,
        mover == Player::White,
        heuristics,
    );
    debug!(depth, score = result.score, action = ?result.action, "search fallback");
    result.action
}

/// Pick which opponent piece `capturer` should take.
///
/// Breaks an opponent two-in-a-row that `capturer` does not contest when
/// possible; otherwise searches one ply shallower after each candidate
/// removal and keeps the best for `capturer`; with no depth left it takes
/// the first removable piece.
pub fn choose_removal(
    state: &GameState,
    capturer: Player,
    depth: u32,
    heuristics: &Heuristics,
) -> Option<Pos> {
    let removable = state.removable_pieces(capturer);
    if removable.is_empty() {
        return None;
    }

    if let Some(target) = find_threat_piece(state, capturer, &removable) {
        debug!(%target, "breaking an opponent two-in-a-row");
        return Some(target);
    }

    if depth > 0 {
        if let Some(target) = search_removal(state, capturer, &removable, depth - 1, heuristics) {
            return Some(target);
        }
    }

    removable.first().copied()
}

// ============================================================================
// LEVEL 2 - HEURISTICS
// ============================================================================

/// First legal action that closes a mill for `mover`, with the resulting state
fn find_mill_action(state: &GameState, mover: Player) -> Option<(Action, GameState)> {
    state.legal_actions(mover).into_iter().find_map(|action| {
        let mut trial = state.clone();
        trial.apply_action(action, mover).ok()?;
        trial
            .forms_mill(action.destination(), mover)
            .then_some((action, trial))
    })
}

/// First action that fills the gap in an opponent's open two-in-a-row
fn find_block_action(state: &GameState, mover: Player) -> Option<Action> {
    let opponent = mover.opponent();

    for line in &MILL_LINES {
        if state.line_counts(line, opponent) != (2, 0) {
            continue;
        }
        let Some(&gap) = line.iter().find(|&&p| state.board().get(p) == Cell::Empty) else {
            continue;
        };

        match state.phase() {
            Phase::Placement => return Some(Action::Place { to: gap }),
            Phase::Movement => {
                let blocker = state
                    .pieces(mover)
                    .find(|&from| state.destinations(from, mover).contains(&gap));
                if let Some(from) = blocker {
                    return Some(Action::Slide { from, to: gap });
                }
            }
        }
    }

    None
}

/// Removable piece on a line holding two opponent pieces and none of ours
fn find_threat_piece(state: &GameState, capturer: Player, removable: &[Pos]) -> Option<Pos> {
    let victim = capturer.opponent();

    MILL_LINES
        .iter()
        .filter(|line| state.line_counts(line, victim) == (2, 0))
        .flat_map(|line| line.iter().copied())
        .find(|pos| state.board().get(*pos) == victim.cell() && removable.contains(pos))
}

/// Candidate removal with the best searched score for `capturer`
fn search_removal(
    state: &GameState,
    capturer: Player,
    removable: &[Pos],
    depth: u32,
    heuristics: &Heuristics,
) -> Option<Pos> {
    let maximizing = capturer == Player::White;
    let mut best: Option<(Pos, f32)> = None;

    for &target in removable {
        let mut trial = state.clone();
        if trial.remove_piece(target, capturer).is_err() {
            continue;
        }
        trial.switch_turn();

        let score = minimax(
            &trial,
            depth,
            f32::NEG_INFINITY,
            f32::INFINITY,
            trial.current_player() == Player::White,
            heuristics,
        )
        .score;

        let better = match best {
            None => true,
            Some((_, best_score)) if maximizing => score > best_score,
            Some((_, best_score)) => score < best_score,
        };
        if better {
            best = Some((target, score));
        }
    }

    best.map(|(target, _)| target)
}

// ============================================================================
// LEVEL 3 - RANDOM PLAY
// ============================================================================

/// Uniformly random legal turn, including a random capture after a mill
pub fn random_move<R: Rng>(state: &GameState, rng: &mut R) -> Option<SearchMove> {
    let mover = state.current_player();
    let action = *state.legal_actions(mover).choose(rng)?;

    let mut after = state.clone();
    after.apply_action(action, mover).ok()?;
    let removal = if after.forms_mill(action.destination(), mover) {
        after.removable_pieces(mover).choose(rng).copied()
    } else {
        None
    };

    Some(SearchMove::new(action, removal))
}

// ============================================================================
// TESTS
// ============================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use crate::game::TOTAL_PIECES;
    use rand::SeedableRng;
    use rand_chacha::ChaCha8Rng;

    fn p(x: u8, y: u8) -> Pos {
        Pos::new(x, y)
    }

    #[test]
    fn test_takes_mill_first() {
        // White can both close a mill and block; the mill wins
        let state = GameState::from_position(
            &[p(0, 0), p(2, 0)],
            &[p(0, 4), p(2, 4)],
            4,
            Player::White,
        )
        .unwrap();
        let mv = choose_move(&state, 2, &Heuristics::default()).unwrap();
        assert_eq!(mv.action(), Action::Place { to: p(4, 0) });
        // both black pieces sit on black's open bottom row; the first is taken
        assert_eq!(mv.removal(), Some(p(0, 4)));
    }

    #[test]
    fn test_blocks_opponent_mill() {
        let state = GameState::from_position(
            &[p(0, 0), p(3, 3)],
            &[p(1, 1), p(2, 1), p(4, 4)],
            6,
            Player::White,
        )
        .unwrap();
        let mv = choose_move(&state, 2, &Heuristics::default()).unwrap();
        assert_eq!(mv, SearchMove::Place { to: p(3, 1), removal: None });
    }

    #[test]
    fn test_blocks_by_sliding() {
        // Black threatens the inner top row at (3,1); White's (3,2) can slide up
        let white = [p(0, 0), p(3, 2), p(0, 4), p(4, 4)];
        let black = [p(1, 1), p(2, 1), p(4, 0), p(1, 3)];
        let state = GameState::from_position(&white, &black, TOTAL_PIECES, Player::White).unwrap();
        let mv = choose_move(&state, 2, &Heuristics::default()).unwrap();
        assert_eq!(mv, SearchMove::Slide { from: p(3, 2), to: p(3, 1), removal: None });
    }

    #[test]
    fn test_search_fallback_returns_legal_move() {
        let state = GameState::started();
        let mv = choose_move(&state, 2, &Heuristics::default()).unwrap();
        assert!(matches!(mv, SearchMove::Place { removal: None, .. }));
    }

    #[test]
    fn test_zero_depth_still_moves() {
        let state = GameState::started();
        assert!(choose_move(&state, 0, &Heuristics::default()).is_some());
    }

    #[test]
    fn test_no_move_when_blocked() {
        let white = [p(0, 0), p(2, 0), p(0, 2), p(4, 4)];
        let black = [p(4, 0), p(2, 1), p(0, 4), p(1, 2), p(2, 4), p(4, 2)];
        let state = GameState::from_position(&white, &black, TOTAL_PIECES, Player::White).unwrap();
        assert_eq!(choose_move(&state, 2, &Heuristics::default()), None);
    }

    #[test]
    fn test_removal_breaks_uncontested_threat() {
        // Black's left column is open; the top-row pair is contested by White
        let state = GameState::from_position(
            &[p(4, 0), p(1, 1), p(3, 3)],
            &[p(0, 0), p(2, 0), p(0, 2), p(4, 4)],
            8,
            Player::White,
        )
        .unwrap();
        // (0,0) and (2,0) share a line with White's (4,0); (0,0),(0,2) do not
        assert_eq!(
            choose_removal(&state, Player::White, 2, &Heuristics::default()),
            Some(p(0, 0))
        );
    }

    #[test]
    fn test_removal_by_search() {
        // No black pair: pick by search; with no depth, the first piece
        let state = GameState::from_position(
            &[p(0, 0), p(2, 0), p(4, 0)],
            &[p(1, 1), p(3, 3), p(4, 2)],
            6,
            Player::White,
        )
        .unwrap();
        let h = Heuristics::default();
        let removable = state.removable_pieces(Player::White);
        let searched = choose_removal(&state, Player::White, 2, &h).unwrap();
        assert!(removable.contains(&searched));
        assert_eq!(choose_removal(&state, Player::White, 0, &h), Some(p(1, 1)));
    }

    #[test]
    fn test_random_move_is_legal() {
        let mut rng = ChaCha8Rng::seed_from_u64(42);
        let mut state = GameState::started();
        for _ in 0..40 {
            if state.winner().is_some() {
                break;
            }
            let mover = state.current_player();
            let mv = random_move(&state, &mut rng).unwrap();
            assert!(state.apply_action(mv.action(), mover).is_ok());
            if let Some(target) = mv.removal() {
                assert!(state.remove_piece(target, mover).is_ok());
            }
            state.switch_turn();
            assert!(state.check_invariants());
        }
    }
}
