use crate::types::Slot;

pub type PuzzleResult<T> = Result<T, PuzzleError>;

/// Reasons a grid structure or slot list can be rejected before solving starts. Failing to find a
/// fill is not one of these; that's reported as `None` by the solver.
#[derive(thiserror::Error, Debug, Clone, PartialEq, Eq)]
pub enum PuzzleError {
    #[error("Grid structure has no cells")]
    EmptyStructure,

    #[error("Row {row} has {found} cells, expected {expected}")]
    RaggedStructure { row: usize, expected: usize, found: usize },

    #[error("Unrecognized template character {cell:?} at ({row}, {col})")]
    InvalidCell { row: usize, col: usize, cell: char },

    #[error("Slot {slot:?} has no cells")]
    EmptySlot { slot: Slot },

    #[error("Slot {slot:?} runs off the edge of the grid")]
    SlotOutOfBounds { slot: Slot },

    #[error("Slot {slot:?} covers blocked cell ({row}, {col})")]
    BlockedCell { slot: Slot, row: usize, col: usize },

    #[error("Slot {slot:?} is declared more than once")]
    DuplicateSlot { slot: Slot },

    #[error("More than two slots share cell ({row}, {col})")]
    CrowdedCell { row: usize, col: usize },

    #[error("Slots {first:?} and {second:?} share more than one cell")]
    MultipleOverlaps { first: Slot, second: Slot },
}
