//! The exact-solver search stack: frames, move ordering, the PV arena,
//! and the alpha-beta negamax driver built on top of them.

pub mod frame;
pub mod move_order;
pub mod pv;
pub mod solver;

pub use move_order::MoveOrder;
pub use solver::{solve, SolveResult, Solver};
