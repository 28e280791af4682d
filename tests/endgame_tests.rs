//! End-to-end exact-solve scenarios, including a canonical FFO test
//! position.

use reversi_endgame_core::board::{Board, Position};
use reversi_endgame_core::square::Color;
use reversi_endgame_core::{search, Square};

/// FFO #40: a canonical 20-empty test position. Black (`X`) to move;
/// the game-theoretic outcome is +38 for the side to move.
#[test]
fn test_ffo_40_returns_exact_score() {
    // "O--OOOOX-OOOOOOXOOXXOOOXOOXOOOXXOOOOOOXX---OOOOX----O--X--------",
    // side to move "X", expected score 38 (X = black, O = white, - = empty).
    let position_string =
        "w..wwwwb.wwwwwwbwwbbwwwbwwbwwwbbwwwwwwbb...wwwwb....w..b........b";
    let position = Position::from_string(position_string).unwrap();
    let result = search::solve(position);
    assert_eq!(result.outcome, 38);
}

#[test]
fn test_terminal_full_board_favors_black() {
    let position = Position::new(
        Board {
            black: u64::MAX,
            white: 0,
        },
        Color::Black,
    );
    let result = search::solve(position);
    assert_eq!(result.outcome, 64);
    assert!(result.principal_variation.is_empty());
}

#[test]
fn test_draw_position_returns_zero() {
    // Checkerboard split: 32 black, 32 white, no empties, so neither
    // side has a legal move and the game is over with an even score.
    let position = Position::new(
        Board {
            black: 0x5555_5555_5555_5555,
            white: 0xAAAA_AAAA_AAAA_AAAA,
        },
        Color::Black,
    );
    let result = search::solve(position);
    assert_eq!(result.outcome, 0);
}

/// A position with a couple of empties replays its principal variation
/// all the way to the final board the solver recorded.
#[test]
fn test_principal_variation_replays_to_final_board() {
    // Black holds every square except A1, H8, and E8, which is white's
    // only disc; white to move. White's only legal move is H8 (it
    // flips F8 and G8); afterward A1 has no opposite-color neighbor for
    // either side, so the game ends in a second consecutive pass.
    let mut black = 0u64;
    let mut white = 0u64;
    for sq in Square::iter() {
        match sq {
            Square::A1 | Square::H8 => {}
            Square::E8 => white |= sq.bitboard(),
            _ => black |= sq.bitboard(),
        }
    }
    let position = Position::new(Board { black, white }, Color::White);

    let result = search::solve(position);
    let final_board = result
        .final_board
        .expect("search should reach a terminal position");
    assert!(final_board.is_terminal());

    let mut replay = position;
    for &mv in &result.principal_variation {
        replay = replay.make_move(mv);
    }
    assert_eq!(replay.board.black, final_board.board.black);
    assert_eq!(replay.board.white, final_board.board.white);
}
