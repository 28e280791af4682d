//! Alpha-beta negamax over the explicit frame stack.
//!
//! The search never recurses natively; it walks [`FrameStack`] depth by
//! depth, writing each frame's move list into the shared
//! [`MoveListBuffer`] and its principal variation into a [`PvArena`].
//! Exactly one [`LogRecord`] is emitted per frame entry.

use crate::board::Position;
use crate::logger::{LogRecord, LogSink};
use crate::move_list::MoveListBuffer;
use crate::search::frame::FrameStack;
use crate::search::move_order::{self, MoveOrder};
use crate::search::pv::{PvArena, PVLine};
use crate::square::Square;
use crate::zobrist;

/// Out-of-range sentinel a frame's running best value starts at; any
/// real move score beats it.
const DEFEAT_SENTINEL: i32 = -65;

/// What a solve call returns.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SolveResult {
    /// Game-theoretic value from the root's side to move, in `[-64, 64]`.
    pub outcome: i32,
    /// The sequence of moves realizing `outcome`, root-first.
    pub principal_variation: Vec<Square>,
    pub node_count: u64,
    pub leaf_count: u64,
    pub final_board: Option<Position>,
}

/// Drives one exact solve. Not reused across calls: a fresh `Solver` is
/// built per root position so its arenas are sized to that root's empty
/// count.
pub struct Solver<'a> {
    frames: FrameStack,
    moves: MoveListBuffer,
    next_head: usize,
    pv: PvArena,
    order: MoveOrder,
    sink: &'a mut dyn LogSink,
    node_count: u64,
    leaf_count: u64,
    call_id: i32,
}

impl<'a> Solver<'a> {
    pub fn new(root: Position, order: MoveOrder, sink: &'a mut dyn LogSink) -> Solver<'a> {
        let empty_count = crate::bit::popcount(root.board.empties()) as usize;
        Solver {
            frames: FrameStack::new(root),
            moves: MoveListBuffer::new(),
            next_head: 0,
            pv: PvArena::new(empty_count),
            order,
            sink,
            node_count: 0,
            leaf_count: 0,
            call_id: 0,
        }
    }

    /// Runs the full search from the root and reports the outcome.
    pub fn solve(&mut self) -> SolveResult {
        let line = self.pv.new_line();
        let outcome = self.search(1, line);
        let principal_variation = self.pv.collect(line);
        let mut final_board = self.frames.get(1).position;
        for mv in &principal_variation {
            final_board = final_board.make_move(*mv);
        }
        self.pv.delete_line(line);
        SolveResult {
            outcome,
            principal_variation,
            node_count: self.node_count,
            leaf_count: self.leaf_count,
            final_board: Some(final_board),
        }
    }

    fn emit_log(&mut self, depth: usize) {
        let position = self.frames.get(depth).position;
        let parent_hash = if depth == 0 { 0 } else { self.frames.get(depth - 1).hash };
        let record = LogRecord {
            sub_run_id: 0,
            call_id: self.call_id,
            hash: self.frames.get(depth).hash,
            parent_hash,
            black_bb: position.board.black,
            white_bb: position.board.white,
            side_to_move: position.to_move,
            aux_json: "{}".to_string(),
        };
        self.call_id += 1;
        let _ = self.sink.write(&record);
    }

    /// Searches the subtree rooted at `frames[depth]`, recording its
    /// principal variation into `line`. Returns the negamax value from
    /// that frame's side to move.
    fn search(&mut self, depth: usize, line: PVLine) -> i32 {
        self.node_count += 1;

        let position = self.frames.get(depth).position;
        let legal = position.legal_moves();
        let head = self.next_head;
        let count = self.moves.write(head, legal);
        self.next_head = head + count;

        {
            let frame = self.frames.get_mut(depth);
            frame.legal_move_set = legal;
            frame.legal_move_count = count;
            frame.head_of_move_list = head;
            frame.hash = zobrist::hash(position.board.black, position.board.white, position.to_move);
        }
        self.emit_log(depth);

        let result = if count == 0 {
            let result = if position.board.empties() != 0 && !self.frames.get(depth).via_pass {
                let alpha = self.frames.get(depth).alpha;
                let beta = self.frames.get(depth).beta;
                {
                    let child = self.frames.get_mut(depth + 1);
                    child.position = position.pass();
                    child.alpha = -beta;
                    child.beta = -alpha;
                    child.via_pass = true;
                }
                // Added before recursing so a descendant's own additions
                // land after it in play order (add_move's insertion order
                // is preserved by collect, see PvArena docs).
                self.pv.add_move(line, Square::Pass);
                let child_value = self.search(depth + 1, line);
                self.frames.get_mut(depth).best_move = Square::Pass;
                -child_value
            } else {
                self.leaf_count += 1;
                self.frames.get_mut(depth).best_move = Square::None;
                position.final_value()
            };
            self.next_head = head;
            result
        } else {
            // Copied onto the stack (34 is the most moves ever available
            // in a single position, see move_list::MOVE_BUFFER_CAPACITY's
            // docs) so the recursive calls below don't need to hold a
            // borrow of `self.moves` across `self.search`.
            let mut ordered = [Square::None; 34];
            {
                let slice = self.moves.moves_mut(head, count);
                move_order::apply(self.order, &position, slice);
                ordered[..count].copy_from_slice(slice);
            }
            self.next_head = head + count;

            let mut alpha = DEFEAT_SENTINEL;
            let mut best_move = Square::None;
            let mut best_child_line: Option<PVLine> = None;
            let beta = self.frames.get(depth).beta;

            for &mv in &ordered[..count] {
                let child_position = position.make_move(mv);
                {
                    let child = self.frames.get_mut(depth + 1);
                    child.position = child_position;
                    child.alpha = -beta;
                    child.beta = -alpha;
                    child.via_pass = false;
                }
                let child_line = self.pv.new_line();
                let child_value = -self.search(depth + 1, child_line);
                if child_value > alpha {
                    alpha = child_value;
                    best_move = mv;
                    if let Some(stale) = best_child_line.take() {
                        self.pv.delete_line(stale);
                    }
                    best_child_line = Some(child_line);
                    if alpha >= beta {
                        break;
                    }
                } else {
                    self.pv.delete_line(child_line);
                }
            }

            self.frames.get_mut(depth).best_move = best_move;
            self.pv.add_move(line, best_move);
            if let Some(child_line) = best_child_line {
                for mv in self.pv.collect(child_line) {
                    self.pv.add_move(line, mv);
                }
                self.pv.delete_line(child_line);
            }

            self.next_head = head;
            alpha
        };

        self.frames.get_mut(depth).alpha = result;
        result
    }
}

/// Convenience entry point: solves `root` with mobility ordering and no
/// logging.
pub fn solve(root: Position) -> SolveResult {
    let mut sink = crate::logger::NullSink;
    let mut solver = Solver::new(root, MoveOrder::Mobility, &mut sink);
    solver.solve()
}
