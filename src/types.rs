use std::collections::BTreeMap;
use std::fmt::{Debug, Formatter};

use smallvec::SmallVec;

use crate::puzzle::Puzzle;
use crate::MAX_SLOT_LENGTH;

/// An identifier for a given slot, based on its index in the Puzzle's `slot_configs` field.
pub type SlotId = usize;

/// An identifier for a given word, based on its index in the Puzzle's word list.
pub type WordId = usize;

/// Zero-indexed (row, col) coords for a cell in the grid, where row = 0 is the top row.
pub type GridCoord = (usize, usize);

/// Direction that a slot is facing.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum Direction {
    Across,
    Down,
}

/// One contiguous run of cells that receives a word. Two slots are the same slot iff all four
/// fields match, so this is safe to use as a map key.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct Slot {
    pub row: usize,
    pub col: usize,
    pub direction: Direction,
    pub length: usize,
}

impl Slot {
    pub fn new(row: usize, col: usize, direction: Direction, length: usize) -> Slot {
        Slot { row, col, direction, length }
    }

    /// The coords of the cell at `cell_idx` within this slot.
    pub fn cell(&self, cell_idx: usize) -> GridCoord {
        match self.direction {
            Direction::Across => (self.row, self.col + cell_idx),
            Direction::Down => (self.row + cell_idx, self.col),
        }
    }

    /// Generate the coords for each cell of this slot.
    pub fn cell_coords(&self) -> Vec<GridCoord> {
        (0..self.length).map(|cell_idx| self.cell(cell_idx)).collect()
    }
}

/// A word that can be chosen for a slot.
pub struct Word {
    pub string: String,
    pub glyphs: SmallVec<[char; MAX_SLOT_LENGTH]>,
}

impl Word {
    pub fn new(string: &str) -> Word {
        Word { string: string.to_owned(), glyphs: string.chars().collect() }
    }

    /// Length in chars, which is what gets compared against slot lengths.
    pub fn len(&self) -> usize {
        self.glyphs.len()
    }

    pub fn is_empty(&self) -> bool {
        self.glyphs.is_empty()
    }

    /// The letter at `cell_idx`, or `None` if the word is too short to reach it.
    pub fn glyph(&self, cell_idx: usize) -> Option<char> {
        self.glyphs.get(cell_idx).copied()
    }
}

impl Debug for Word {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        write!(f, "{:?}", self.string)
    }
}

/// A crossing between one slot and another, referencing the other slot's id and the location of
/// the intersection within the other slot.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Crossing {
    pub other_slot_id: SlotId,
    pub other_slot_cell: usize,
}

/// A single slot assignment.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Choice {
    pub slot_id: SlotId,
    pub word_id: WordId,
}

/// A partial or complete mapping from slots to words. Search branches each get their own copy.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Assignment {
    choices: Vec<Option<WordId>>,
    assigned_count: usize,
}

impl Assignment {
    /// An empty assignment for a puzzle with `slot_count` slots.
    pub fn new(slot_count: usize) -> Assignment {
        Assignment { choices: vec![None; slot_count], assigned_count: 0 }
    }

    /// Set (or replace) the word for a slot.
    ///
    /// # Panics
    /// If `slot_id` is not a slot of the puzzle this assignment was created for.
    pub fn assign(&mut self, slot_id: SlotId, word_id: WordId) {
        if self.choices[slot_id].replace(word_id).is_none() {
            self.assigned_count += 1;
        }
    }

    pub fn get(&self, slot_id: SlotId) -> Option<WordId> {
        self.choices.get(slot_id).copied().flatten()
    }

    pub fn is_assigned(&self, slot_id: SlotId) -> bool {
        self.get(slot_id).is_some()
    }

    /// Number of assigned slots.
    pub fn len(&self) -> usize {
        self.assigned_count
    }

    pub fn is_empty(&self) -> bool {
        self.assigned_count == 0
    }

    /// Does this assignment cover every slot?
    pub fn is_complete(&self) -> bool {
        self.assigned_count == self.choices.len()
    }

    /// The assigned slots, in ascending slot id order.
    pub fn choices(&self) -> impl Iterator<Item = Choice> + '_ {
        self.choices.iter().enumerate().filter_map(|(slot_id, word_id)| {
            word_id.map(|word_id| Choice { slot_id, word_id })
        })
    }

    /// Resolve ids against the puzzle, producing a slot → word map.
    pub fn words(&self, puzzle: &Puzzle) -> BTreeMap<Slot, String> {
        self.choices()
            .map(|Choice { slot_id, word_id }| {
                (*puzzle.slot(slot_id), puzzle.word(word_id).string.clone())
            })
            .collect()
    }
}
