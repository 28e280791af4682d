//! Fast-endgame (FFES-style) solver: a second, independent exact-solve
//! engine kept for cross-validation against the frame-stack solver in
//! [`crate::search`]. Uses a 10x10 padded board and a circular
//! doubly-linked empty list instead of bitboards, the way the reference
//! fast-endgame implementation does, so the two engines share no code
//! and a bug in one is unlikely to be mirrored in the other.
//!
//! This is a comparison tool, not the primary solver: it gets a more
//! compact treatment than [`crate::search`], matching its lesser weight
//! in the overall design.

use crate::board::{Board, Position};
use crate::square::{Color, Square};

const PAD_WIDTH: usize = 10;
const PAD_SIZE: usize = PAD_WIDTH * PAD_WIDTH;
const DUMMY: u8 = 2;
const EMPTY: u8 = 3;

/// Below this many empties, fastest-first ordering gives way to parity
/// ordering.
const FASTEST_FIRST: usize = 7;
/// Below this many empties, parity ordering gives way to plain search.
const USE_PARITY: usize = 4;

/// The eight ray offsets on a 10-wide padded board.
const DIRECTIONS: [isize; 8] = [-11, -10, -9, -1, 1, 9, 10, 11];

#[inline]
fn padded_index(sq: Square) -> usize {
    (sq.rank() + 1) * PAD_WIDTH + (sq.file() + 1)
}

#[inline]
fn color_cell(color: Color) -> u8 {
    match color {
        Color::Black => 0,
        Color::White => 1,
    }
}

/// A board with a one-cell `DUMMY` border on every side, so ray walks
/// never need a bounds check: a walk off the real 8x8 area always hits a
/// `DUMMY` cell and stops.
#[derive(Clone)]
struct PaddedBoard {
    cells: [u8; PAD_SIZE],
}

impl PaddedBoard {
    fn from_position(position: &Position) -> PaddedBoard {
        let mut cells = [DUMMY; PAD_SIZE];
        for sq in Square::iter() {
            let idx = padded_index(sq);
            let bit = sq.bitboard();
            cells[idx] = if position.board.black & bit != 0 {
                color_cell(Color::Black)
            } else if position.board.white & bit != 0 {
                color_cell(Color::White)
            } else {
                EMPTY
            };
        }
        PaddedBoard { cells }
    }

    fn to_position(&self, to_move: Color) -> Position {
        let mut black = 0u64;
        let mut white = 0u64;
        for sq in Square::iter() {
            let idx = padded_index(sq);
            let bit = sq.bitboard();
            if self.cells[idx] == color_cell(Color::Black) {
                black |= bit;
            } else if self.cells[idx] == color_cell(Color::White) {
                white |= bit;
            }
        }
        Position::new(Board { black, white }, to_move)
    }
}

/// Records every flip a move makes so it can be undone in O(flips)
/// without recomputing anything.
struct FlipRecord {
    placed: usize,
    flipped: Vec<usize>,
}

/// Tries to play `mover` at padded index `at`, recording flips. Returns
/// `None` (and leaves the board untouched) if the move is illegal.
fn apply_move(board: &mut PaddedBoard, at: usize, mover: u8, opponent: u8) -> Option<FlipRecord> {
    let mut flipped = Vec::new();
    for &dir in &DIRECTIONS {
        let mut run = Vec::new();
        let mut cur = at as isize + dir;
        while board.cells[cur as usize] == opponent {
            run.push(cur as usize);
            cur += dir;
        }
        if !run.is_empty() && board.cells[cur as usize] == mover {
            flipped.extend(run);
        }
    }
    if flipped.is_empty() {
        return None;
    }
    board.cells[at] = mover;
    for &idx in &flipped {
        board.cells[idx] = mover;
    }
    Some(FlipRecord { placed: at, flipped })
}

fn undo_move(board: &mut PaddedBoard, record: FlipRecord, opponent: u8) {
    board.cells[record.placed] = EMPTY;
    for idx in record.flipped {
        board.cells[idx] = opponent;
    }
}

/// One node of the circular doubly-linked empty list.
#[derive(Clone, Copy)]
struct EmptyNode {
    next: usize,
    prev: usize,
    hole_id: u32,
}

/// Empties ordered by a fixed static weight, worst squares (the
/// dangerous X-squares next to an open corner) linked first, the best
/// (corners, then center) linked last — so removing from the list's
/// head during plain search tries the least damaging squares first and
/// leaves the most valuable ones for when more context is available.
struct EmptyList {
    nodes: [EmptyNode; PAD_SIZE],
    head: usize,
    count: usize,
}

/// Reuses the positional cluster used for move ordering, but in reverse:
/// rank 0 here is the worst square to play early (an X-square), rank 9
/// the best (true center).
fn worst_to_best_rank(sq: Square) -> u8 {
    9 - crate::search::move_order::cluster_rank(sq)
}

impl EmptyList {
    fn new(board: &PaddedBoard) -> EmptyList {
        let mut empties: Vec<Square> = Square::iter()
            .filter(|&sq| board.cells[padded_index(sq)] == EMPTY)
            .collect();
        empties.sort_by_key(|&sq| worst_to_best_rank(sq));

        let mut nodes = [EmptyNode { next: 0, prev: 0, hole_id: 0 }; PAD_SIZE];
        let indices: Vec<usize> = empties.iter().map(|&sq| padded_index(sq)).collect();
        let n = indices.len();
        for (i, &idx) in indices.iter().enumerate() {
            let next = indices[(i + 1) % n.max(1)];
            let prev = indices[(i + n - 1) % n.max(1)];
            nodes[idx] = EmptyNode { next, prev, hole_id: 0 };
        }

        let mut list = EmptyList {
            nodes,
            head: indices.first().copied().unwrap_or(0),
            count: n,
        };
        list.assign_hole_ids(board, &indices);
        list
    }

    /// Connected components of empties under king-adjacency, found by a
    /// flood fill. Each hole gets a power-of-two id so the global
    /// `RegionParity` mask can track every hole's parity with one XOR.
    fn assign_hole_ids(&mut self, board: &PaddedBoard, indices: &[usize]) {
        let mut seen = vec![false; PAD_SIZE];
        let mut next_bit = 0u32;
        for &start in indices {
            if seen[start] {
                continue;
            }
            let bit = 1u32 << next_bit.min(31);
            next_bit += 1;
            let mut stack = vec![start];
            seen[start] = true;
            while let Some(idx) = stack.pop() {
                self.nodes[idx].hole_id = bit;
                for &dir in &DIRECTIONS {
                    let neighbor = (idx as isize + dir) as usize;
                    if board.cells[neighbor] == EMPTY && !seen[neighbor] {
                        seen[neighbor] = true;
                        stack.push(neighbor);
                    }
                }
            }
        }
    }

    fn remove(&mut self, idx: usize) {
        let (prev, next) = (self.nodes[idx].prev, self.nodes[idx].next);
        self.nodes[prev].next = next;
        self.nodes[next].prev = prev;
        if self.head == idx {
            self.head = next;
        }
        self.count -= 1;
    }

    fn restore(&mut self, idx: usize) {
        let (prev, next) = (self.nodes[idx].prev, self.nodes[idx].next);
        self.nodes[prev].next = idx;
        self.nodes[next].prev = idx;
        self.count += 1;
    }

    fn iter_from_head(&self) -> Vec<usize> {
        let mut out = Vec::with_capacity(self.count);
        let mut cur = self.head;
        for _ in 0..self.count {
            out.push(cur);
            cur = self.nodes[cur].next;
        }
        out
    }
}

/// Result of a fast-endgame solve: the outcome from `position`'s side to
/// move, matching [`crate::search::SolveResult::outcome`]'s convention.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct FastEndgameResult {
    pub outcome: i32,
    pub node_count: u64,
}

struct Context {
    empties: EmptyList,
    region_parity: u32,
    node_count: u64,
}

fn final_score(board: &PaddedBoard, mover: u8, opponent: u8, empties_left: i32) -> i32 {
    let mover_count = board.cells.iter().filter(|&&c| c == mover).count() as i32;
    let opponent_count = board.cells.iter().filter(|&&c| c == opponent).count() as i32;
    let diff = mover_count - opponent_count;
    if diff == 0 {
        0
    } else if diff > 0 {
        diff + empties_left
    } else {
        diff - empties_left
    }
}

fn has_any_move(board: &PaddedBoard, list: &[usize], mover: u8, opponent: u8) -> bool {
    list.iter().any(|&idx| can_play(board, idx, mover, opponent))
}

fn can_play(board: &PaddedBoard, at: usize, mover: u8, opponent: u8) -> bool {
    for &dir in &DIRECTIONS {
        let mut cur = at as isize + dir;
        let mut saw_opponent = false;
        while board.cells[cur as usize] == opponent {
            saw_opponent = true;
            cur += dir;
        }
        if saw_opponent && board.cells[cur as usize] == mover {
            return true;
        }
    }
    false
}

/// No move for either side: score from `mover`'s perspective.
fn terminal(board: &PaddedBoard, mover: u8, opponent: u8, empties_left: i32) -> i32 {
    final_score(board, mover, opponent, empties_left)
}

fn no_parity_search(
    ctx: &mut Context,
    board: &mut PaddedBoard,
    mut alpha: i32,
    beta: i32,
    mover: u8,
    opponent: u8,
    empties_left: i32,
) -> i32 {
    ctx.node_count += 1;
    let candidates = ctx.empties.iter_from_head();
    let mut any_move = false;
    let mut best = i32::MIN;

    for &idx in &candidates {
        let Some(record) = apply_move(board, idx, mover, opponent) else {
            continue;
        };
        any_move = true;
        ctx.empties.remove(idx);
        let value = -no_parity_search(ctx, board, -beta, -alpha, opponent, mover, empties_left - 1);
        ctx.empties.restore(idx);
        undo_move(board, record, opponent);

        if value > best {
            best = value;
            if best > alpha {
                alpha = best;
            }
            if alpha >= beta {
                return best;
            }
        }
    }

    if !any_move {
        let opponent_candidates = ctx.empties.iter_from_head();
        if has_any_move(board, &opponent_candidates, opponent, mover) {
            return -no_parity_search(ctx, board, -beta, -alpha, opponent, mover, empties_left);
        }
        return terminal(board, mover, opponent, empties_left);
    }
    best
}

fn parity_search(
    ctx: &mut Context,
    board: &mut PaddedBoard,
    mut alpha: i32,
    beta: i32,
    mover: u8,
    opponent: u8,
    empties_left: i32,
) -> i32 {
    if empties_left as usize <= USE_PARITY {
        return no_parity_search(ctx, board, alpha, beta, mover, opponent, empties_left);
    }
    ctx.node_count += 1;

    let candidates = ctx.empties.iter_from_head();
    let mut any_move = false;
    let mut best = i32::MIN;

    // Odd-parity holes first, then even — moves into a hole with an odd
    // number of empties are less likely to hand the opponent the last
    // move in that region.
    for &want_odd in &[true, false] {
        for &idx in &candidates {
            let hole_id = ctx.empties.nodes[idx].hole_id;
            let is_odd = ctx.region_parity & hole_id != 0;
            if is_odd != want_odd {
                continue;
            }
            let Some(record) = apply_move(board, idx, mover, opponent) else {
                continue;
            };
            any_move = true;
            ctx.empties.remove(idx);
            ctx.region_parity ^= hole_id;
            let value = -parity_search(ctx, board, -beta, -alpha, opponent, mover, empties_left - 1);
            ctx.region_parity ^= hole_id;
            ctx.empties.restore(idx);
            undo_move(board, record, opponent);

            if value > best {
                best = value;
                if best > alpha {
                    alpha = best;
                }
                if alpha >= beta {
                    return best;
                }
            }
        }
    }

    if !any_move {
        let opponent_candidates = ctx.empties.iter_from_head();
        if has_any_move(board, &opponent_candidates, opponent, mover) {
            return -parity_search(ctx, board, -beta, -alpha, opponent, mover, empties_left);
        }
        return terminal(board, mover, opponent, empties_left);
    }
    best
}

fn fastest_first_search(
    ctx: &mut Context,
    board: &mut PaddedBoard,
    mut alpha: i32,
    beta: i32,
    mover: u8,
    opponent: u8,
    empties_left: i32,
) -> i32 {
    if empties_left as usize <= FASTEST_FIRST {
        return parity_search(ctx, board, alpha, beta, mover, opponent, empties_left);
    }
    ctx.node_count += 1;

    let candidates = ctx.empties.iter_from_head();
    let mut scored: Vec<(usize, u32)> = Vec::new();
    for &idx in &candidates {
        let Some(record) = apply_move(board, idx, mover, opponent) else {
            continue;
        };
        ctx.empties.remove(idx);
        let remaining = ctx.empties.iter_from_head();
        let opponent_mobility = remaining.iter().filter(|&&j| can_play(board, j, opponent, mover)).count() as u32;
        ctx.empties.restore(idx);
        undo_move(board, record, opponent);
        scored.push((idx, opponent_mobility));
    }
    scored.sort_by_key(|&(_, mobility)| mobility);

    let mut any_move = false;
    let mut best = i32::MIN;
    for (idx, _) in scored {
        let Some(record) = apply_move(board, idx, mover, opponent) else {
            continue;
        };
        any_move = true;
        ctx.empties.remove(idx);
        let hole_id = ctx.empties.nodes[idx].hole_id;
        ctx.region_parity ^= hole_id;
        let value = -fastest_first_search(ctx, board, -beta, -alpha, opponent, mover, empties_left - 1);
        ctx.region_parity ^= hole_id;
        ctx.empties.restore(idx);
        undo_move(board, record, opponent);

        if value > best {
            best = value;
            if best > alpha {
                alpha = best;
            }
            if alpha >= beta {
                return best;
            }
        }
    }

    if !any_move {
        let opponent_candidates = ctx.empties.iter_from_head();
        if has_any_move(board, &opponent_candidates, opponent, mover) {
            return -fastest_first_search(ctx, board, -beta, -alpha, opponent, mover, empties_left);
        }
        return terminal(board, mover, opponent, empties_left);
    }
    best
}

/// Solves `position` exactly with the fast-endgame engine. Intended for
/// cross-checking [`crate::search::solve`] on positions with few enough
/// empties to be practical (the procedure selection below assumes a
/// late-game position).
pub fn solve(position: &Position) -> FastEndgameResult {
    let mut board = PaddedBoard::from_position(position);
    let empties = EmptyList::new(&board);
    let empties_left = empties.count as i32;
    let mover = color_cell(position.to_move);
    let opponent = color_cell(position.to_move.opponent());
    let mut ctx = Context {
        empties,
        region_parity: 0,
        node_count: 0,
    };
    let outcome = fastest_first_search(&mut ctx, &mut board, -64, 64, mover, opponent, empties_left);
    FastEndgameResult {
        outcome,
        node_count: ctx.node_count,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::board::Board;

    fn near_terminal_white_to_move() -> Position {
        let mut black = 0u64;
        let mut white = 0u64;
        for sq in Square::iter() {
            match sq {
                Square::A1 | Square::H8 => {}
                Square::E8 => white |= sq.bitboard(),
                _ => black |= sq.bitboard(),
            }
        }
        Position::new(Board { black, white }, Color::White)
    }

    #[test]
    fn test_terminal_position_matches_final_value() {
        let board = Board {
            black: u64::MAX,
            white: 0,
        };
        let pos = Position::new(board, Color::Black);
        let result = solve(&pos);
        assert_eq!(result.outcome, pos.final_value());
    }

    #[test]
    fn test_padded_board_round_trips_through_position() {
        let pos = Position::default();
        let padded = PaddedBoard::from_position(&pos);
        assert_eq!(padded.to_position(pos.to_move), pos);
    }

    #[test]
    fn test_matches_primary_solver_on_near_terminal_position() {
        let pos = near_terminal_white_to_move();
        let ffes = solve(&pos);
        let primary = crate::search::solve(pos);
        assert_eq!(ffes.outcome, primary.outcome);
    }

    #[test]
    fn test_empty_list_covers_every_empty_square_once() {
        let pos = Position::default();
        let board = PaddedBoard::from_position(&pos);
        let list = EmptyList::new(&board);
        assert_eq!(list.count, 60);
        assert_eq!(list.iter_from_head().len(), 60);
    }
}
