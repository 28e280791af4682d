//! Move-generation node counts (perft) for the opening position.

use reversi_endgame_core::board::Position;
use reversi_endgame_core::move_list::moves_of;

/// Recursively counts leaf positions after `depth` plies, passing when a
/// side has no legal move.
fn perft(position: Position, depth: u32) -> u64 {
    if depth == 0 {
        return 1;
    }
    let legal = position.legal_moves();
    if legal == 0 {
        if position.pass().legal_moves() == 0 {
            return 1;
        }
        return perft(position.pass(), depth - 1);
    }
    moves_of(legal)
        .iter()
        .map(|&mv| perft(position.make_move(mv), depth - 1))
        .sum()
}

#[test]
fn test_perft_depth_0_is_one() {
    assert_eq!(perft(Position::default(), 0), 1);
}

#[test]
fn test_perft_depth_1_matches_legal_move_count() {
    assert_eq!(perft(Position::default(), 1), 4);
}

#[test]
fn test_perft_depth_2() {
    // Every depth-1 reply has exactly 3 legal replies from the opening.
    assert_eq!(perft(Position::default(), 2), 12);
}

#[test]
fn test_perft_depth_3() {
    assert_eq!(perft(Position::default(), 3), 56);
}
