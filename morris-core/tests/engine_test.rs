//! Integration tests for the Six Men's Morris engine
//!
//! Drives the public `Engine` surface the way a front end would: coordinates
//! in, results and queries out.

use morris_core::{
    evaluate, Action, Cell, Engine, GameResult, GameState, Heuristics, MorrisError, Phase,
    Player, Pos, SearchMove, INTERSECTIONS, MILL_LINES, TOTAL_PIECES,
};
use rand::SeedableRng;
use rand_chacha::ChaCha8Rng;

// ============================================================================
// TEST FIXTURES
// ============================================================================

fn p(x: u8, y: u8) -> Pos {
    Pos::new(x, y)
}

fn engine_at(white: &[Pos], black: &[Pos], placed: u8, to_move: Player) -> Engine {
    Engine::from_state(GameState::from_position(white, black, placed, to_move).unwrap())
}

/// Play one full turn the way a front end does, returning false once the
/// game is over or the mover is stuck
fn play_turn(engine: &mut Engine, depth: u32) -> bool {
    if engine.computer_move(depth).is_none() {
        return false;
    }
    if engine.check_win() {
        return false;
    }
    engine.switch_turn();
    true
}

// ============================================================================
// PLACEMENT
// ============================================================================

#[test]
fn test_centre_rejected_then_edge_accepted() {
    let mut engine = Engine::new();
    engine.start();

    assert_eq!(
        engine.place(2, 2),
        Err(MorrisError::NotAnIntersection(p(2, 2)))
    );
    assert_eq!(engine.placed_count(), 0);

    assert!(engine.place(2, 0).is_ok());
    assert_eq!(engine.placed_count(), 1);
    assert_eq!(engine.board().get(p(2, 0)), Cell::White);
}

#[test]
fn test_place_only_on_empty_intersections() {
    let mut engine = Engine::new();
    engine.start();

    for y in -1..=5 {
        for x in -1..=5 {
            let before = engine.state().clone();
            let ok = engine.place(x, y).is_ok();
            let valid = Pos::from_coords(x, y).is_ok();
            assert_eq!(ok, valid, "({x}, {y})");
            if ok {
                // occupied now, so a second attempt must fail untouched
                let after = engine.state().clone();
                assert_eq!(engine.place(x, y), Err(MorrisError::Occupied(p(x as u8, y as u8))));
                assert_eq!(engine.state(), &after);
                engine.undo();
            }
            assert_eq!(engine.state(), &before);
        }
    }
}

#[test]
fn test_placement_ends_after_twelve() {
    let mut engine = Engine::new();
    engine.start();

    // alternate colors along scan order, avoiding any mill
    let order = [
        (0, 0), (0, 2), (2, 0), (4, 0),
        (1, 1), (2, 1), (3, 1), (1, 2),
        (3, 2), (4, 2), (1, 3), (3, 3),
    ];
    for &(x, y) in &order {
        engine.place(x, y).unwrap();
        engine.switch_turn();
    }

    assert_eq!(engine.placed_count(), TOTAL_PIECES);
    assert_eq!(engine.phase(), Phase::Movement);
    assert_eq!(engine.place(2, 4), Err(MorrisError::PlacementComplete));
    assert_eq!(engine.piece_count(Player::White), 6);
    assert_eq!(engine.piece_count(Player::Black), 6);
}

// ============================================================================
// MOVEMENT
// ============================================================================

#[test]
fn test_move_adjacent_only() {
    let white = [p(0, 0), p(1, 1), p(3, 1), p(4, 4)];
    let black = [p(2, 4), p(1, 3), p(3, 3), p(4, 2)];
    let mut engine = engine_at(&white, &black, TOTAL_PIECES, Player::White);

    assert_eq!(
        engine.move_piece(0, 0, 0, 4),
        Err(MorrisError::NotAdjacent { from: p(0, 0), to: p(0, 4) })
    );
    assert_eq!(
        engine.move_piece(0, 0, 9, 9),
        Err(MorrisError::OutOfBounds { x: 9, y: 9 })
    );
    assert!(engine.move_piece(0, 0, 0, 2).is_ok());
    assert_eq!(engine.board().get(p(0, 2)), Cell::White);
}

#[test]
fn test_three_pieces_fly() {
    let white = [p(0, 0), p(1, 1), p(3, 1)];
    let black = [p(2, 4), p(1, 3), p(3, 3), p(4, 2)];
    let mut engine = engine_at(&white, &black, TOTAL_PIECES, Player::White);

    let before = engine.state().clone();
    assert_eq!(
        engine.move_piece(0, 0, 4, 2),
        Err(MorrisError::Occupied(p(4, 2)))
    );
    assert_eq!(
        engine.move_piece(0, 0, 2, 2),
        Err(MorrisError::NotAnIntersection(p(2, 2)))
    );
    assert_eq!(engine.state(), &before);
    assert_eq!(engine.history_len(), 0);

    assert!(engine.move_piece(0, 0, 4, 4).is_ok());
    assert_eq!(engine.board().get(p(4, 4)), Cell::White);
}

// ============================================================================
// MILLS AND CAPTURES
// ============================================================================

#[test]
fn test_top_row_mill() {
    let mut engine = engine_at(&[p(0, 0), p(2, 0)], &[p(1, 1), p(3, 3)], 4, Player::White);

    assert!(!engine.check_mill(2, 0, Player::White));
    engine.place(4, 0).unwrap();
    assert!(engine.check_mill(4, 0, Player::White));

    for pos in MILL_LINES[0] {
        assert_eq!(engine.board().get(pos), Cell::White);
    }
}

#[test]
fn test_single_loose_piece_is_removable() {
    // Black mill on the top row plus a loose piece
    let engine = engine_at(
        &[p(1, 1), p(3, 3), p(0, 4)],
        &[p(0, 0), p(2, 0), p(4, 0), p(1, 3)],
        8,
        Player::White,
    );
    assert_eq!(engine.removable_pieces(Player::White), vec![p(1, 3)]);
}

#[test]
fn test_remove_piece_updates_counts() {
    let mut engine = engine_at(
        &[p(1, 1), p(3, 3), p(0, 4)],
        &[p(0, 0), p(2, 0), p(4, 0), p(1, 3)],
        8,
        Player::White,
    );
    assert_eq!(engine.remove_piece(2, 0, Player::White), Err(MorrisError::Protected(p(2, 0))));
    assert!(engine.remove_piece(1, 3, Player::White).is_ok());
    assert_eq!(engine.piece_count(Player::Black), 3);
    assert_eq!(engine.removed_count(Player::Black), 1);
}

#[test]
fn test_mill_members_share_color() {
    let mut rng = ChaCha8Rng::seed_from_u64(11);
    let mut state = GameState::started();

    for _ in 0..60 {
        if state.winner().is_some() {
            break;
        }
        let mover = state.current_player();
        let Some(mv) = morris_core::random_move(&state, &mut rng) else {
            break;
        };
        state.apply_action(mv.action(), mover).unwrap();

        let to = mv.action().destination();
        if state.forms_mill(to, mover) {
            let full_line = MILL_LINES.iter().filter(|line| line.contains(&to)).any(|line| {
                line.iter().all(|&q| state.board().get(q) == mover.cell())
            });
            assert!(full_line, "{state}");
        }

        if let Some(target) = mv.removal() {
            state.remove_piece(target, mover).unwrap();
        }
        state.switch_turn();
    }
}

// ============================================================================
// TERMINAL DETECTION
// ============================================================================

#[test]
fn test_two_pieces_lose() {
    let engine = engine_at(
        &[p(0, 0), p(1, 1), p(3, 1)],
        &[p(4, 4), p(2, 4)],
        TOTAL_PIECES,
        Player::White,
    );
    assert!(!engine.has_legal_move(Player::Black));
    assert!(engine.check_win());
    assert_eq!(engine.state().result(), GameResult::WhiteWins);
}

#[test]
fn test_no_win_before_placement_completes() {
    let engine = engine_at(&[p(0, 0), p(1, 1), p(3, 1)], &[p(4, 4), p(2, 4)], 9, Player::White);
    assert!(!engine.check_win());
}

// ============================================================================
// UNDO
// ============================================================================

#[test]
fn test_undo_round_trip_place() {
    let mut engine = Engine::new();
    engine.start();
    engine.place(0, 0).unwrap();
    engine.switch_turn();

    let before = engine.state().clone();
    engine.place(4, 4).unwrap();
    assert!(engine.undo());
    assert_eq!(engine.state(), &before);
}

#[test]
fn test_undo_round_trip_move() {
    let white = [p(0, 0), p(1, 1), p(3, 1), p(4, 4)];
    let black = [p(2, 4), p(1, 3), p(3, 3), p(4, 2)];
    let mut engine = engine_at(&white, &black, TOTAL_PIECES, Player::White);
    let before = engine.state().clone();

    engine.move_piece(1, 1, 2, 1).unwrap();
    assert_ne!(engine.state(), &before);
    assert!(engine.undo());
    assert_eq!(engine.state(), &before);
    assert!(!engine.undo());
}

// ============================================================================
// SEARCH AND COMPUTER PLAYER
// ============================================================================

#[test]
fn test_depth_one_finds_mill() {
    let engine = engine_at(&[p(0, 0), p(2, 0)], &[p(1, 1), p(3, 3)], 4, Player::White);
    let result = engine.search(1, f32::NEG_INFINITY, f32::INFINITY, true);

    let mv = result.action.unwrap();
    assert_eq!(mv.action(), Action::Place { to: p(4, 0) });

    // every other depth-1 alternative scores no better
    let heuristics = Heuristics::default();
    for to in INTERSECTIONS {
        let mut trial = engine.state().clone();
        if trial.place(to, Player::White).is_err() || to == p(4, 0) {
            continue;
        }
        trial.switch_turn();
        assert!(evaluate(&trial, &heuristics) <= result.score, "{to}");
    }
}

#[test]
fn test_evaluate_matches_engine() {
    let engine = engine_at(&[p(0, 0), p(2, 0)], &[p(1, 1)], 3, Player::Black);
    assert_eq!(engine.evaluate(), evaluate(engine.state(), engine.heuristics()));
    assert_eq!(engine.unblocked_two_in_a_row(Player::White), 1);
}

#[test]
fn test_apply_search_move_is_undoable() {
    let mut engine = engine_at(&[p(0, 0), p(2, 0)], &[p(1, 1), p(3, 3)], 4, Player::White);
    let before = engine.state().clone();

    let mv = SearchMove::Place { to: p(4, 0), removal: Some(p(3, 3)) };
    engine.apply_search_move(mv).unwrap();
    assert_eq!(engine.board().get(p(3, 3)), Cell::Empty);

    assert!(engine.undo());
    assert_eq!(engine.state(), &before);
}

#[test]
fn test_self_play_keeps_state_consistent() {
    let mut engine = Engine::new();
    engine.start();

    for _ in 0..80 {
        let before = engine.state().clone();
        let continuing = play_turn(&mut engine, 2);
        assert!(engine.state().check_invariants(), "{before}\n{engine}");
        if !continuing {
            break;
        }
    }
    assert!(engine.placed_count() <= TOTAL_PIECES);
}
