//! Fill crossword grids from a word list by treating each slot as a variable in a constraint
//! satisfaction problem: node consistency on word lengths, AC-3 on crossing letters, then
//! backtracking search with minimum-remaining-values and least-constraining-value ordering.
//!
//! ```
//! use xwordfill::{solve, Puzzle, Structure};
//!
//! let structure = Structure::from_template(
//!     "
//!     ___
//!     _##
//!     _##
//!     _##
//!     ",
//! )?;
//! let puzzle = Puzzle::new(structure, ["cat", "dog", "cats", "cast"])?;
//!
//! let assignment = solve(&puzzle).expect("this puzzle has a fill");
//! let letters = puzzle.letter_grid(&assignment);
//! assert_eq!(letters[0][0], Some('c'));
//! # Ok::<(), xwordfill::PuzzleError>(())
//! ```

pub mod arc_consistency;
pub mod backtracking_search;
pub mod domains;
pub mod error;
pub mod puzzle;
pub mod types;
pub mod word_list;

pub use backtracking_search::{is_consistent, solve, Solver, Statistics};
pub use error::{PuzzleError, PuzzleResult};
pub use puzzle::{Puzzle, Structure};
pub use types::{Assignment, Choice, Direction, Slot, SlotId, WordId};

/// The expected maximum length for a single slot. Longer slots still work; their per-cell data
/// just moves to the heap.
pub const MAX_SLOT_LENGTH: usize = 21;
