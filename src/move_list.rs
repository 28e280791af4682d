//! Flat move-list buffer shared by every frame of the search stack.
//!
//! Instead of one heap-allocated `Vec<Square>` per frame, every frame's
//! legal moves are scanned directly into a contiguous slice of one
//! process-wide buffer. A frame only needs to remember where its slice
//! starts (`head`) and how long it is (`count`); the next frame's moves
//! start right after.

use arrayvec::ArrayVec;

use crate::bit;
use crate::bitboard::SquareSet;
use crate::square::Square;

/// Upper bound on live moves across the whole frame stack at once. 34 is
/// the most moves ever available in a single position; `MAX_FRAMES`
/// frames could in principle all be mid-enumeration, but in practice the
/// stack only ever holds one partially-consumed move list per depth, so
/// 1024 squares of headroom comfortably covers real search traces.
pub const MOVE_BUFFER_CAPACITY: usize = 1024;

/// The shared move buffer. Frames never allocate; they claim a region
/// of this buffer and write their legal moves into it.
pub struct MoveListBuffer {
    squares: [Square; MOVE_BUFFER_CAPACITY],
}

impl MoveListBuffer {
    pub fn new() -> Self {
        MoveListBuffer {
            squares: [Square::None; MOVE_BUFFER_CAPACITY],
        }
    }

    /// Scans `legal` low-bit-first into the buffer starting at `head`,
    /// returning the number of moves written.
    ///
    /// # Panics
    ///
    /// Panics if `head + popcount(legal)` would exceed the buffer's
    /// capacity — an invariant violation, since a legal root position
    /// never produces a search deep enough to overflow it.
    pub fn write(&mut self, head: usize, legal: SquareSet) -> usize {
        let mut bits = legal;
        let mut count = 0usize;
        while bits != 0 {
            let idx = bit::lowest_set_bit_index(bits) as usize;
            self.squares[head + count] = Square::from_usize_unchecked(idx);
            bits &= bits - 1;
            count += 1;
        }
        count
    }

    /// The moves written at `[head, head + count)`.
    #[inline]
    pub fn moves(&self, head: usize, count: usize) -> &[Square] {
        &self.squares[head..head + count]
    }

    /// The moves written at `[head, head + count)`, mutable — used by
    /// the move-ordering strategies to reorder a frame's slice in place.
    #[inline]
    pub fn moves_mut(&mut self, head: usize, count: usize) -> &mut [Square] {
        &mut self.squares[head..head + count]
    }
}

impl Default for MoveListBuffer {
    fn default() -> Self {
        Self::new()
    }
}

/// Collects `legal`'s squares into a small stack-allocated vector,
/// low-bit-first. Used by callers outside the search stack (tests,
/// perft) that want a move list without claiming a buffer region.
pub fn moves_of(legal: SquareSet) -> ArrayVec<Square, 32> {
    let mut out = ArrayVec::new();
    let mut bits = legal;
    while bits != 0 {
        let idx = bit::lowest_set_bit_index(bits) as usize;
        out.push(Square::from_usize_unchecked(idx));
        bits &= bits - 1;
    }
    out
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::square::Square;

    #[test]
    fn test_write_scans_low_bit_first() {
        let mut buf = MoveListBuffer::new();
        let legal = Square::C4.bitboard() | Square::A1.bitboard() | Square::H8.bitboard();
        let count = buf.write(0, legal);
        assert_eq!(count, 3);
        assert_eq!(buf.moves(0, count), &[Square::A1, Square::C4, Square::H8]);
    }

    #[test]
    fn test_write_empty_is_zero_moves() {
        let mut buf = MoveListBuffer::new();
        assert_eq!(buf.write(0, 0), 0);
    }

    #[test]
    fn test_successive_frames_do_not_overlap() {
        let mut buf = MoveListBuffer::new();
        let first = buf.write(0, Square::A1.bitboard() | Square::B1.bitboard());
        let second_head = first;
        let second = buf.write(second_head, Square::H8.bitboard());
        assert_eq!(buf.moves(0, first), &[Square::A1, Square::B1]);
        assert_eq!(buf.moves(second_head, second), &[Square::H8]);
    }

    #[test]
    fn test_moves_of_matches_write() {
        let legal = Square::D3.bitboard() | Square::E6.bitboard();
        let collected = moves_of(legal);
        let mut buf = MoveListBuffer::new();
        let count = buf.write(0, legal);
        assert_eq!(collected.as_slice(), buf.moves(0, count));
    }
}
