//! Principal-variation arena: two fixed-capacity pools (line heads and
//! cells) sized once from the root's empty count, giving O(1)
//! allocation and deallocation during search with no heap traffic once
//! the arena is built.
//!
//! Lines and cells are addressed by arena-relative `u16` index rather
//! than a reference, so a [`PvArena`] has no lifetime of its own and can
//! sit alongside the frame stack in the solver without fighting the
//! borrow checker.

use crate::square::Square;

/// The shared "no line" / "no cell" sentinel.
pub const NONE: u16 = u16::MAX;

/// An arena-relative reference to a line's head cell.
pub type PVLine = u16;

#[derive(Clone, Copy, Debug)]
struct Cell {
    mv: Square,
    next: u16,
    active: bool,
}

#[derive(Clone, Copy, Debug)]
struct LineSlot {
    head: u16,
}

/// Pool of [`PVLine`]s and their cells, sized for a search rooted at a
/// position with `empty_count` empty squares.
pub struct PvArena {
    cells: Vec<Cell>,
    free_cells: Vec<u16>,
    lines: Vec<LineSlot>,
    free_lines: Vec<u16>,
}

impl PvArena {
    pub fn new(empty_count: usize) -> PvArena {
        let line_capacity = 2 * (empty_count + 1) + 1;
        let cell_capacity = (empty_count + 2) * (empty_count + 3) / 2;

        let cells = vec![
            Cell {
                mv: Square::None,
                next: NONE,
                active: false,
            };
            cell_capacity
        ];
        let free_cells: Vec<u16> = (0..cell_capacity as u16).rev().collect();

        let lines = vec![LineSlot { head: NONE }; line_capacity];
        let free_lines: Vec<u16> = (0..line_capacity as u16).rev().collect();

        PvArena {
            cells,
            free_cells,
            lines,
            free_lines,
        }
    }

    /// Claims an empty line.
    pub fn new_line(&mut self) -> PVLine {
        let idx = self.free_lines.pop().expect("PV line arena exhausted");
        self.lines[idx as usize].head = NONE;
        idx
    }

    /// Prepends `mv` to `line`.
    pub fn add_move(&mut self, line: PVLine, mv: Square) {
        let cell_idx = self.free_cells.pop().expect("PV cell arena exhausted");
        let head = self.lines[line as usize].head;
        self.cells[cell_idx as usize] = Cell {
            mv,
            next: head,
            active: true,
        };
        self.lines[line as usize].head = cell_idx;
    }

    /// Returns every cell in `line`'s chain to the free pool, then
    /// returns the line slot itself.
    pub fn delete_line(&mut self, line: PVLine) {
        let mut cur = self.lines[line as usize].head;
        while cur != NONE {
            let next = self.cells[cur as usize].next;
            self.cells[cur as usize].active = false;
            self.free_cells.push(cur);
            cur = next;
        }
        self.lines[line as usize].head = NONE;
        self.free_lines.push(line);
    }

    /// Copies `line`'s moves in play order (oldest first). Cells are
    /// stored newest-first because `add_move` prepends, so this reverses
    /// the walk.
    pub fn collect(&self, line: PVLine) -> Vec<Square> {
        let mut moves = Vec::new();
        let mut cur = self.lines[line as usize].head;
        while cur != NONE {
            moves.push(self.cells[cur as usize].mv);
            cur = self.cells[cur as usize].next;
        }
        moves.reverse();
        moves
    }

    #[cfg(test)]
    fn active_cell_count(&self) -> usize {
        self.cells.iter().filter(|c| c.active).count()
    }
}
