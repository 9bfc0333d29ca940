use std::collections::HashMap;
use std::fmt::{Debug, Formatter};

use log::debug;
use smallvec::SmallVec;

use crate::error::{PuzzleError, PuzzleResult};
use crate::types::{Assignment, Crossing, Direction, GridCoord, Slot, SlotId, Word, WordId};
use crate::word_list::WordList;
use crate::MAX_SLOT_LENGTH;

/// Slots shorter than this aren't treated as entries when deriving them from a structure.
const MIN_SLOT_LENGTH: usize = 2;

/// The shape of a grid: which cells can hold a letter and which are blocks.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Structure {
    cells: Vec<Vec<bool>>,
    width: usize,
}

impl Structure {
    /// Build a structure from rows of fillable flags. Rows must all be the same width.
    pub fn new(cells: Vec<Vec<bool>>) -> PuzzleResult<Structure> {
        let width = cells.first().map(|row| row.len()).unwrap_or(0);
        if width == 0 {
            return Err(PuzzleError::EmptyStructure);
        }

        for (row, cells_in_row) in cells.iter().enumerate() {
            if cells_in_row.len() != width {
                return Err(PuzzleError::RaggedStructure {
                    row,
                    expected: width,
                    found: cells_in_row.len(),
                });
            }
        }

        Ok(Structure { cells, width })
    }

    /// Build a structure from a string template, with `_` or `.` representing fillable cells and
    /// `#` representing blocks. Blank lines and whitespace around each row are ignored.
    pub fn from_template(template: &str) -> PuzzleResult<Structure> {
        let rows = template.lines().map(str::trim).filter(|line| !line.is_empty());

        let mut cells: Vec<Vec<bool>> = vec![];
        for (row, line) in rows.enumerate() {
            let cells_in_row = line.chars().enumerate().map(|(col, cell)| match cell {
                '_' | '.' => Ok(true),
                '#' => Ok(false),
                _ => Err(PuzzleError::InvalidCell { row, col, cell }),
            }).collect::<PuzzleResult<Vec<bool>>>()?;

            cells.push(cells_in_row);
        }

        Structure::new(cells)
    }

    pub fn height(&self) -> usize {
        self.cells.len()
    }

    pub fn width(&self) -> usize {
        self.width
    }

    /// Whether the cell can hold a letter. Cells outside the grid can't.
    pub fn is_fillable(&self, (row, col): GridCoord) -> bool {
        self.cells.get(row).and_then(|cells_in_row| cells_in_row.get(col)).copied().unwrap_or(false)
    }

    /// Every maximal run of fillable cells at least `MIN_SLOT_LENGTH` long, across then down.
    pub fn derive_slots(&self) -> Vec<Slot> {
        let mut slots: Vec<Slot> = vec![];

        for (direction, outer, inner) in [
            (Direction::Across, self.height(), self.width()),
            (Direction::Down, self.width(), self.height()),
        ] {
            for line in 0..outer {
                let coord = |pos: usize| match direction {
                    Direction::Across => (line, pos),
                    Direction::Down => (pos, line),
                };

                let mut run_start: Option<usize> = None;

                for pos in 0..=inner {
                    let fillable = pos < inner && self.is_fillable(coord(pos));

                    match (run_start, fillable) {
                        (None, true) => run_start = Some(pos),
                        (Some(start), false) => {
                            if pos - start >= MIN_SLOT_LENGTH {
                                let (row, col) = coord(start);
                                slots.push(Slot::new(row, col, direction, pos - start));
                            }
                            run_start = None;
                        }
                        _ => {}
                    }
                }
            }
        }

        slots
    }

    fn validate_slot(&self, slot: &Slot) -> PuzzleResult<()> {
        if slot.length == 0 {
            return Err(PuzzleError::EmptySlot { slot: *slot });
        }

        let (last_row, last_col) = match slot.direction {
            Direction::Across => (Some(slot.row), slot.col.checked_add(slot.length - 1)),
            Direction::Down => (slot.row.checked_add(slot.length - 1), Some(slot.col)),
        };
        let in_bounds = matches!(
            (last_row, last_col),
            (Some(row), Some(col)) if row < self.height() && col < self.width()
        );
        if !in_bounds {
            return Err(PuzzleError::SlotOutOfBounds { slot: *slot });
        }

        for (row, col) in slot.cell_coords() {
            if !self.is_fillable((row, col)) {
                return Err(PuzzleError::BlockedCell { slot: *slot, row, col });
            }
        }

        Ok(())
    }
}

/// The aspects of a slot that stay fixed while solving.
pub struct SlotConfig {
    pub id: SlotId,
    pub slot: Slot,

    /// One entry per cell: the slot crossing that cell, if any.
    pub crossings: SmallVec<[Option<Crossing>; MAX_SLOT_LENGTH]>,

    /// Every slot with a crossing, in ascending id order.
    pub neighbors: SmallVec<[SlotId; MAX_SLOT_LENGTH]>,
}

impl Debug for SlotConfig {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("SlotConfig")
            .field("id", &self.id)
            .field("slot", &self.slot)
            .field("neighbors", &self.neighbors)
            .finish()
    }
}

/// An immutable description of a puzzle: the grid, its slots, the vocabulary and the overlaps
/// between slots. Built once; the solver only ever reads it.
pub struct Puzzle {
    structure: Structure,
    slot_configs: Vec<SlotConfig>,
    slot_ids: HashMap<Slot, SlotId>,
    words: WordList,
}

impl Debug for Puzzle {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Puzzle")
            .field("structure", &self.structure)
            .field("slot_configs", &self.slot_configs)
            .field("words", &format!("({} entries)", self.words.len()))
            .finish()
    }
}

impl Puzzle {
    /// Build a puzzle whose slots are the maximal fillable runs of the structure.
    pub fn new<I, S>(structure: Structure, words: I) -> PuzzleResult<Puzzle>
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        let slots = structure.derive_slots();
        Puzzle::with_slots(structure, slots, words)
    }

    /// Build a puzzle from an explicit slot list. Each slot has to fit inside the grid, cover only
    /// fillable cells, and cross any other slot at most once.
    pub fn with_slots<I, S>(structure: Structure, mut slots: Vec<Slot>, words: I) -> PuzzleResult<Puzzle>
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        slots.sort();
        if let Some(pair) = slots.windows(2).find(|pair| pair[0] == pair[1]) {
            return Err(PuzzleError::DuplicateSlot { slot: pair[0] });
        }

        for slot in &slots {
            structure.validate_slot(slot)?;
        }

        // Build a map from cell location to (slot id, cell index within slot) so we can find
        // the crossings.
        let mut entries_by_loc: HashMap<GridCoord, SmallVec<[(SlotId, usize); 2]>> = HashMap::new();
        for (slot_id, slot) in slots.iter().enumerate() {
            for (cell_idx, loc) in slot.cell_coords().into_iter().enumerate() {
                let entries = entries_by_loc.entry(loc).or_default();
                if entries.len() == 2 {
                    return Err(PuzzleError::CrowdedCell { row: loc.0, col: loc.1 });
                }
                entries.push((slot_id, cell_idx));
            }
        }

        let mut slot_configs: Vec<SlotConfig> = Vec::with_capacity(slots.len());
        for (slot_id, slot) in slots.iter().enumerate() {
            let crossings: SmallVec<[Option<Crossing>; MAX_SLOT_LENGTH]> =
                slot.cell_coords().iter().map(|loc| {
                    entries_by_loc[loc].iter()
                        .find(|&&(other_slot_id, _)| other_slot_id != slot_id)
                        .map(|&(other_slot_id, other_slot_cell)| {
                            Crossing { other_slot_id, other_slot_cell }
                        })
                }).collect();

            let mut neighbors: SmallVec<[SlotId; MAX_SLOT_LENGTH]> =
                crossings.iter().flatten().map(|crossing| crossing.other_slot_id).collect();
            neighbors.sort_unstable();

            if let Some(pair) = neighbors.windows(2).find(|pair| pair[0] == pair[1]) {
                return Err(PuzzleError::MultipleOverlaps { first: *slot, second: slots[pair[0]] });
            }

            slot_configs.push(SlotConfig { id: slot_id, slot: *slot, crossings, neighbors });
        }

        let slot_ids = slots.iter().enumerate().map(|(slot_id, &slot)| (slot, slot_id)).collect();
        let words = WordList::new(words);

        debug!(
            "Built {}x{} puzzle with {} slots and {} words",
            structure.height(),
            structure.width(),
            slot_configs.len(),
            words.len(),
        );

        Ok(Puzzle { structure, slot_configs, slot_ids, words })
    }

    pub fn structure(&self) -> &Structure {
        &self.structure
    }

    pub fn height(&self) -> usize {
        self.structure.height()
    }

    pub fn width(&self) -> usize {
        self.structure.width()
    }

    pub fn slot_count(&self) -> usize {
        self.slot_configs.len()
    }

    /// All slots, in `SlotId` order.
    pub fn slots(&self) -> impl Iterator<Item = &Slot> {
        self.slot_configs.iter().map(|slot_config| &slot_config.slot)
    }

    pub fn slot(&self, slot_id: SlotId) -> &Slot {
        &self.slot_configs[slot_id].slot
    }

    pub fn slot_id(&self, slot: &Slot) -> Option<SlotId> {
        self.slot_ids.get(slot).copied()
    }

    pub fn slot_config(&self, slot_id: SlotId) -> &SlotConfig {
        &self.slot_configs[slot_id]
    }

    pub fn words(&self) -> &WordList {
        &self.words
    }

    pub fn word(&self, word_id: WordId) -> &Word {
        self.words.get(word_id)
    }

    pub fn word_id(&self, string: &str) -> Option<WordId> {
        self.words.id_of(string)
    }

    /// Which letter of each slot's word has to match where `a` and `b` cross, as
    /// `(cell in a, cell in b)`, or `None` if they don't cross.
    pub fn overlap(&self, a: SlotId, b: SlotId) -> Option<(usize, usize)> {
        self.slot_configs[a].crossings.iter().enumerate().find_map(|(cell_idx, crossing)| {
            crossing
                .filter(|crossing| crossing.other_slot_id == b)
                .map(|crossing| (cell_idx, crossing.other_slot_cell))
        })
    }

    pub fn neighbors(&self, slot_id: SlotId) -> &[SlotId] {
        &self.slot_configs[slot_id].neighbors
    }

    /// Lay the assigned words out on the grid. Cells that are blocked or belong only to
    /// unassigned slots are `None`.
    pub fn letter_grid(&self, assignment: &Assignment) -> Vec<Vec<Option<char>>> {
        let mut letters = vec![vec![None; self.width()]; self.height()];

        for choice in assignment.choices() {
            let slot = self.slot(choice.slot_id);
            for (cell_idx, &glyph) in self.word(choice.word_id).glyphs.iter().enumerate() {
                let (row, col) = slot.cell(cell_idx);
                if let Some(cell) = letters.get_mut(row).and_then(|cells| cells.get_mut(col)) {
                    *cell = Some(glyph);
                }
            }
        }

        letters
    }
}
