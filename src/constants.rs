//! Global constants shared across the board model and the solver.

/// Number of squares on the Reversi board.
pub const BOARD_SQUARES: usize = 64;

/// Depth of the explicit search frame stack: 60 plies plus headroom for
/// consecutive passes and the sentinel frame at index 0.
pub const MAX_FRAMES: usize = 72;

/// Maximum possible score (disc difference).
pub const SCORE_MAX: i32 = 64;

/// Minimum possible score (disc difference).
pub const SCORE_MIN: i32 = -64;

/// Upper bound on the number of empty squares any solver in this crate
/// will be asked to handle. Othello starts with 60 empties after the
/// four-disc opening setup.
pub const MAX_EMPTIES: usize = 60;
