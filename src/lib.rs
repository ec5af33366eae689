//! **stepmaze** generates perfect mazes one carved passage at a time.
//!
//! The [`generators::RecursiveBacktracker`] is re-entrant at cell
//! granularity: every call to `step` does one unit of work and reports
//! whether a passage was carved, the frontier backtracked, or the maze is
//! complete. An external scheduler owns the cadence, which is what makes the
//! generation animatable.

pub mod cells;
pub mod generators;
pub mod grid;
pub mod units;
mod utils;
