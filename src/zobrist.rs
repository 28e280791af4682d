//! Zobrist hashing for board positions.
//!
//! The table is 128 independent random `u64` constants: squares 0-63 key
//! a black disc, squares 64-127 key a white disc at `square - 64`. The
//! position hash is the XOR of the constants for every occupied square,
//! bitwise-NOT'd in its entirety when white is to move. Flipping the
//! whole hash on side-to-move avoids rehashing the 4 center discs when a
//! player passes, unlike a scheme that folds side-to-move into one more
//! XOR term.

use std::sync::OnceLock;

use rand::rngs::StdRng;
use rand::{RngCore, SeedableRng};

use crate::square::{Color, Square};

const TABLE_LEN: usize = 128;

/// A fixed seed keeps the table reproducible across runs: hashes are
/// only ever compared within a single process, but determinism makes
/// search traces reproducible, which matters for debugging transposition
/// hits and for golden-file tests.
const SEED: u64 = 0x5245_5645_5253_4921;

fn build_table() -> [u64; TABLE_LEN] {
    let mut rng = StdRng::seed_from_u64(SEED);
    let mut table = [0u64; TABLE_LEN];
    for slot in table.iter_mut() {
        *slot = rng.next_u64();
    }
    table
}

static ZOBRIST_TABLE: OnceLock<[u64; TABLE_LEN]> = OnceLock::new();

fn table() -> &'static [u64; TABLE_LEN] {
    ZOBRIST_TABLE.get_or_init(build_table)
}

#[inline]
fn key(color: Color, sq: Square) -> u64 {
    let offset = match color {
        Color::Black => 0,
        Color::White => 64,
    };
    *crate::uget!(table(); offset + sq.index())
}

/// Hashes the occupied squares of a position, then inverts the whole
/// result if `to_move` is white.
pub fn hash(black: u64, white: u64, to_move: Color) -> u64 {
    let mut h = 0u64;
    let mut bits = black;
    while bits != 0 {
        let sq = Square::from_usize_unchecked(crate::bit::lowest_set_bit_index(bits) as usize);
        h ^= key(Color::Black, sq);
        bits &= bits - 1;
    }
    let mut bits = white;
    while bits != 0 {
        let sq = Square::from_usize_unchecked(crate::bit::lowest_set_bit_index(bits) as usize);
        h ^= key(Color::White, sq);
        bits &= bits - 1;
    }
    match to_move {
        Color::Black => h,
        Color::White => !h,
    }
}

/// Incrementally updates a hash as if `sq` toggled from empty to
/// occupied-by-`color`, or vice versa. XOR is its own inverse, so the
/// same call serves both directions; callers apply it once per disc that
/// changed color or appeared/disappeared, then re-flip if the
/// side-to-move changed (see [`hash`]'s convention).
#[inline]
pub fn toggle(h: u64, color: Color, sq: Square) -> u64 {
    h ^ key(color, sq)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_hash_changes_with_side_to_move() {
        let black = Square::D4.bitboard() | Square::E5.bitboard();
        let white = Square::D5.bitboard() | Square::E4.bitboard();
        let h_black = hash(black, white, Color::Black);
        let h_white = hash(black, white, Color::White);
        assert_eq!(h_black, !h_white);
    }

    #[test]
    fn test_hash_is_deterministic() {
        let black = Square::D4.bitboard();
        let white = Square::E5.bitboard();
        assert_eq!(
            hash(black, white, Color::Black),
            hash(black, white, Color::Black)
        );
    }

    #[test]
    fn test_toggle_is_involution() {
        let h = hash(Square::D4.bitboard(), Square::E5.bitboard(), Color::Black);
        let toggled = toggle(h, Color::Black, Square::A1);
        assert_eq!(toggle(toggled, Color::Black, Square::A1), h);
    }

    #[test]
    fn test_distinct_squares_distinct_keys() {
        let t = table();
        for i in 0..TABLE_LEN {
            for j in (i + 1)..TABLE_LEN {
                assert_ne!(t[i], t[j], "collision between slots {i} and {j}");
            }
        }
    }
}
