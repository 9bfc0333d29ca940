use bit_set::BitSet;
use log::debug;

use crate::puzzle::Puzzle;
use crate::types::{SlotId, WordId};

/// The words still considered legal for each slot. Values are only ever removed while solving;
/// each search branch works on its own clone.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Domains {
    by_slot: Vec<BitSet>,
}

impl Domains {
    /// Every slot starts out allowing every word in the puzzle's vocabulary.
    pub fn new(puzzle: &Puzzle) -> Domains {
        let all_words: BitSet = (0..puzzle.words().len()).collect();

        Domains { by_slot: vec![all_words; puzzle.slot_count()] }
    }

    /// Replace a slot's domain outright.
    pub fn set<I>(&mut self, slot_id: SlotId, word_ids: I)
    where
        I: IntoIterator<Item = WordId>,
    {
        self.by_slot[slot_id] = word_ids.into_iter().collect();
    }

    /// Reduce a slot's domain to the single chosen word.
    pub fn narrow(&mut self, slot_id: SlotId, word_id: WordId) {
        let domain = &mut self.by_slot[slot_id];
        domain.clear();
        domain.insert(word_id);
    }

    pub fn remove(&mut self, slot_id: SlotId, word_id: WordId) -> bool {
        self.by_slot[slot_id].remove(word_id)
    }

    pub fn contains(&self, slot_id: SlotId, word_id: WordId) -> bool {
        self.by_slot[slot_id].contains(word_id)
    }

    pub fn len(&self, slot_id: SlotId) -> usize {
        self.by_slot[slot_id].len()
    }

    pub fn is_empty(&self, slot_id: SlotId) -> bool {
        self.by_slot[slot_id].is_empty()
    }

    /// The slot's remaining words, in ascending id order.
    pub fn iter(&self, slot_id: SlotId) -> impl Iterator<Item = WordId> + '_ {
        self.by_slot[slot_id].iter()
    }

    /// Total number of (slot, word) pairs still allowed.
    pub fn total_len(&self) -> usize {
        self.by_slot.iter().map(BitSet::len).sum()
    }

    /// Whether every slot's domain here is contained in the same slot's domain in `other`.
    pub fn is_subset(&self, other: &Domains) -> bool {
        self.by_slot.len() == other.by_slot.len()
            && self.by_slot.iter().zip(&other.by_slot).all(|(ours, theirs)| ours.is_subset(theirs))
    }
}

/// Remove every word whose length doesn't match its slot's length. Returns how many words were
/// removed in total; a slot can end up with nothing left, which the caller finds out about later.
pub fn enforce_node_consistency(puzzle: &Puzzle, domains: &mut Domains) -> usize {
    let mut removed = 0;

    for slot_id in 0..puzzle.slot_count() {
        let length = puzzle.slot(slot_id).length;
        let mismatched: Vec<WordId> = domains.iter(slot_id)
            .filter(|&word_id| puzzle.word(word_id).len() != length)
            .collect();

        for word_id in mismatched {
            domains.remove(slot_id, word_id);
            removed += 1;
        }
    }

    debug!("Node consistency removed {} options, {} remain", removed, domains.total_len());

    removed
}
