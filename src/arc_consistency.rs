use std::collections::{HashSet, VecDeque};

use log::trace;

use crate::domains::Domains;
use crate::puzzle::Puzzle;
use crate::types::{SlotId, WordId};

/// An ordered pair of crossing slots `(x, y)`: revising it makes `x` consistent with `y`.
pub type ConstraintArc = (SlotId, SlotId);

/// FIFO worklist of arcs still to be revised. An arc that's already waiting isn't queued twice,
/// since it will see the latest domains when it's popped anyway.
#[derive(Debug)]
struct ConsistencyQueue {
    queue: VecDeque<ConstraintArc>,
    queued: HashSet<ConstraintArc>,
}

impl ConsistencyQueue {
    fn with_initial_queue<Items>(items: Items) -> ConsistencyQueue
        where
            Items: IntoIterator<Item=ConstraintArc>
    {
        let mut queue = ConsistencyQueue { queue: VecDeque::new(), queued: HashSet::new() };
        for arc in items {
            queue.enqueue(arc);
        }
        queue
    }

    fn pop_front(&mut self) -> Option<ConstraintArc> {
        let arc = self.queue.pop_front()?;
        self.queued.remove(&arc);
        Some(arc)
    }

    fn enqueue(&mut self, arc: ConstraintArc) {
        if self.queued.insert(arc) {
            self.queue.push_back(arc);
        }
    }
}

/// Results from a call to `enforce_arc_consistency`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ArcConsistencySuccess {
    /// How many revisions removed at least one word.
    pub revisions: u64,
    /// How many words were removed in total.
    pub eliminations: u64,
}

/// Returned when some slot runs out of words; `exhausted_slot_id` is the slot that emptied.
/// Domains may already have been partially pruned when this comes back.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ArcConsistencyFailure {
    pub exhausted_slot_id: SlotId,
    pub revisions: u64,
    pub eliminations: u64,
}

pub type ArcConsistencyResult = Result<ArcConsistencySuccess, ArcConsistencyFailure>;

/// Every `(slot, neighbor)` pair in the puzzle, slots and neighbors both in ascending id order.
pub fn all_arcs(puzzle: &Puzzle) -> Vec<ConstraintArc> {
    (0..puzzle.slot_count())
        .flat_map(|slot_id| puzzle.neighbors(slot_id).iter().map(move |&neighbor| (slot_id, neighbor)))
        .collect()
}

/// Make `x` arc consistent with `y`: drop every word in `x`'s domain that has no word in `y`'s
/// domain with the same letter where the two slots cross. Returns the number of words removed,
/// which is zero if the slots don't cross at all.
pub fn revise(puzzle: &Puzzle, domains: &mut Domains, x: SlotId, y: SlotId) -> usize {
    let Some((x_cell, y_cell)) = puzzle.overlap(x, y) else {
        return 0;
    };

    // Which letters does `y` still allow in the crossing cell? A word that's too short to reach
    // the cell contributes nothing.
    let supported_glyphs: HashSet<char> = domains.iter(y)
        .filter_map(|word_id| puzzle.word(word_id).glyph(y_cell))
        .collect();

    let unsupported: Vec<WordId> = domains.iter(x)
        .filter(|&word_id| {
            !puzzle.word(word_id).glyph(x_cell).is_some_and(|glyph| supported_glyphs.contains(&glyph))
        })
        .collect();

    for &word_id in &unsupported {
        domains.remove(x, word_id);
    }

    unsupported.len()
}

/// AC-3. Starting from `arcs` (or every arc in the puzzle if `None`), revise arcs until nothing
/// changes. Whenever `x` loses words we re-check every other neighbor `z` against it by queueing
/// `(z, x)`. Gives up as soon as any domain is emptied.
///
/// Terminates because every requeue is preceded by at least one removal, and domains are finite.
pub fn enforce_arc_consistency(
    puzzle: &Puzzle,
    domains: &mut Domains,
    arcs: Option<Vec<ConstraintArc>>,
) -> ArcConsistencyResult {
    let mut queue = ConsistencyQueue::with_initial_queue(arcs.unwrap_or_else(|| all_arcs(puzzle)));

    let mut revisions: u64 = 0;
    let mut eliminations: u64 = 0;

    while let Some((x, y)) = queue.pop_front() {
        let removed = revise(puzzle, domains, x, y);
        if removed == 0 {
            continue;
        }

        revisions += 1;
        eliminations += removed as u64;

        if domains.is_empty(x) {
            trace!("Slot {} exhausted while revising against slot {}", x, y);
            return Err(ArcConsistencyFailure { exhausted_slot_id: x, revisions, eliminations });
        }

        for &z in puzzle.neighbors(x) {
            if z != y {
                queue.enqueue((z, x));
            }
        }
    }

    Ok(ArcConsistencySuccess { revisions, eliminations })
}

#[cfg(test)]
mod tests {
    use crate::arc_consistency::{all_arcs, enforce_arc_consistency, revise};
    use crate::domains::{enforce_node_consistency, Domains};
    use crate::puzzle::{Puzzle, Structure};
    use crate::types::{Direction::{Across, Down}, Slot, SlotId};

    /// Two slots crossing at the second letter of the across and the first letter of the down:
    ///
    /// ___
    /// #_#
    /// #_#
    fn t_puzzle(words: &[&str]) -> (Puzzle, SlotId, SlotId) {
        let puzzle = Puzzle::new(
            Structure::from_template("___\n#_#\n#_#").unwrap(),
            words,
        ).unwrap();

        let across = puzzle.slot_id(&Slot::new(0, 0, Across, 3)).unwrap();
        let down = puzzle.slot_id(&Slot::new(0, 1, Down, 3)).unwrap();
        assert_eq!(puzzle.overlap(across, down), Some((1, 0)));

        (puzzle, across, down)
    }

    fn domain_words(puzzle: &Puzzle, domains: &Domains, slot_id: SlotId) -> Vec<String> {
        domains.iter(slot_id).map(|word_id| puzzle.word(word_id).string.clone()).collect()
    }

    #[test]
    fn test_revise_removes_unsupported_words() {
        let (puzzle, across, down) = t_puzzle(&["cat", "dog", "oat", "egg"]);
        let mut domains = Domains::new(&puzzle);
        domains.set(across, ["cat", "dog"].map(|w| puzzle.word_id(w).unwrap()));
        domains.set(down, ["oat", "egg"].map(|w| puzzle.word_id(w).unwrap()));

        // "cat" needs a down word starting with 'a'; "dog" is supported by "oat".
        assert_eq!(revise(&puzzle, &mut domains, across, down), 1);
        assert_eq!(domain_words(&puzzle, &domains, across), vec!["dog"]);
        assert_eq!(domain_words(&puzzle, &domains, down), vec!["oat", "egg"]);

        assert_eq!(revise(&puzzle, &mut domains, across, down), 0);
    }

    #[test]
    fn test_revise_without_overlap_is_noop() {
        let puzzle = Puzzle::new(
            Structure::from_template("___\n###\n___").unwrap(),
            ["abc", "xyz"],
        ).unwrap();
        let mut domains = Domains::new(&puzzle);
        let before = domains.clone();

        assert_eq!(revise(&puzzle, &mut domains, 0, 1), 0);
        assert_eq!(domains, before);
    }

    #[test]
    fn test_word_survives_iff_supported() {
        let words = ["cat", "dog", "oat", "egg", "ape", "toe", "gnu"];
        let (puzzle, across, down) = t_puzzle(&words);
        let mut domains = Domains::new(&puzzle);
        let before = domains.clone();

        revise(&puzzle, &mut domains, across, down);

        for word_id in before.iter(across) {
            let x_glyph = puzzle.word(word_id).glyph(1);
            let supported = before.iter(down).any(|other| puzzle.word(other).glyph(0) == x_glyph);
            assert_eq!(domains.contains(across, word_id), supported, "{:?}", puzzle.word(word_id));
        }
    }

    #[test]
    fn test_all_arcs_covers_both_directions() {
        let (puzzle, across, down) = t_puzzle(&["cat"]);
        let mut arcs = all_arcs(&puzzle);
        arcs.sort();

        let mut expected = vec![(across, down), (down, across)];
        expected.sort();
        assert_eq!(arcs, expected);
    }

    #[test]
    fn test_ac3_prunes_both_sides() {
        let (puzzle, across, down) = t_puzzle(&["cat", "dog", "oat", "egg", "axe"]);
        let mut domains = Domains::new(&puzzle);
        enforce_node_consistency(&puzzle, &mut domains);
        let before = domains.clone();

        let result = enforce_arc_consistency(&puzzle, &mut domains, None);

        assert!(result.is_ok());
        assert!(domains.is_subset(&before));
        // Across words need a down word starting with their middle letter, and vice versa.
        assert_eq!(domain_words(&puzzle, &domains, across), vec!["cat", "dog", "oat"]);
        assert_eq!(domain_words(&puzzle, &domains, down), vec!["oat", "axe"]);
    }

    #[test]
    fn test_ac3_fails_when_a_domain_empties() {
        let (puzzle, across, down) = t_puzzle(&["abc", "xyz"]);
        let mut domains = Domains::new(&puzzle);
        domains.set(across, [puzzle.word_id("abc").unwrap()]);
        domains.set(down, [puzzle.word_id("xyz").unwrap()]);

        let failure = enforce_arc_consistency(&puzzle, &mut domains, None).unwrap_err();

        assert_eq!(failure.exhausted_slot_id, across);
        assert_eq!(failure.eliminations, 1);
    }

    #[test]
    fn test_ac3_with_scoped_arcs_only_touches_queued_slots() {
        // Two separate crossings; only the first one is queued.
        //
        // ___#___
        // #_###_#
        // #_###_#
        let puzzle = Puzzle::new(
            Structure::from_template("___#___\n#_###_#\n#_###_#").unwrap(),
            ["cat", "dog", "oat", "egg"],
        ).unwrap();
        let left_across = puzzle.slot_id(&Slot::new(0, 0, Across, 3)).unwrap();
        let left_down = puzzle.slot_id(&Slot::new(0, 1, Down, 3)).unwrap();
        let right_across = puzzle.slot_id(&Slot::new(0, 4, Across, 3)).unwrap();

        let mut domains = Domains::new(&puzzle);
        let result = enforce_arc_consistency(&puzzle, &mut domains, Some(vec![(left_across, left_down)]));

        assert!(result.is_ok());
        assert_eq!(domain_words(&puzzle, &domains, left_across), vec!["dog"]);
        assert_eq!(domains.len(right_across), 4);
    }

    #[test]
    fn test_ac3_terminates_on_a_cycle() {
        // A ring of four slots where every word is compatible with every other, so nothing is
        // ever removed and the worklist has to drain on its own.
        let puzzle = Puzzle::new(
            Structure::from_template("___\n_#_\n___").unwrap(),
            ["aaa", "aba"],
        ).unwrap();
        let mut domains = Domains::new(&puzzle);

        let success = enforce_arc_consistency(&puzzle, &mut domains, None).unwrap();

        assert_eq!(success.eliminations, 0);
        assert_eq!(domains, Domains::new(&puzzle));
    }
}
