use std::cmp::Reverse;
use std::collections::{HashMap, HashSet};

use instant::{Duration, Instant};
use log::{debug, info, trace};

use crate::arc_consistency::{
    enforce_arc_consistency, ArcConsistencyFailure, ArcConsistencySuccess, ConstraintArc,
};
use crate::domains::{enforce_node_consistency, Domains};
use crate::puzzle::Puzzle;
use crate::types::{Assignment, Choice, SlotId, WordId};

/// A struct tracking statistics about the filling process.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Statistics {
    /// Search nodes entered.
    pub states: u64,
    /// Candidate words abandoned, whether rejected outright or after their subtree failed.
    pub backtracks: u64,
    /// Arc revisions that removed at least one word.
    pub revisions: u64,
    /// Words removed by node and arc consistency, summed over every branch.
    pub pruned: u64,
    pub duration: Duration,
}

/// Does `assignment` break any rule? Checks that no word is used twice, that every word fits its
/// slot, and that crossing slots agree on their shared letter. Unassigned slots are ignored, so
/// this works on partial assignments too.
pub fn is_consistent(puzzle: &Puzzle, assignment: &Assignment) -> bool {
    let mut used_words: HashSet<WordId> = HashSet::with_capacity(assignment.len());

    for Choice { slot_id, word_id } in assignment.choices() {
        if !used_words.insert(word_id) {
            return false;
        }

        let word = puzzle.word(word_id);
        if word.len() != puzzle.slot(slot_id).length {
            return false;
        }

        for &neighbor in puzzle.neighbors(slot_id) {
            let Some(neighbor_word_id) = assignment.get(neighbor) else {
                continue;
            };
            let Some((cell, neighbor_cell)) = puzzle.overlap(slot_id, neighbor) else {
                continue;
            };

            if word.glyph(cell) != puzzle.word(neighbor_word_id).glyph(neighbor_cell) {
                return false;
            }
        }
    }

    true
}

/// Backtracking search over a single puzzle. Each call to `solve` starts from fresh domains; the
/// puzzle itself is never modified.
#[derive(Debug)]
pub struct Solver<'a> {
    puzzle: &'a Puzzle,
    statistics: Statistics,
}

impl<'a> Solver<'a> {
    pub fn new(puzzle: &'a Puzzle) -> Solver<'a> {
        Solver { puzzle, statistics: Statistics::default() }
    }

    /// Statistics from the most recent `solve`.
    pub fn statistics(&self) -> &Statistics {
        &self.statistics
    }

    /// Enforce node and arc consistency, then search for a complete assignment. `None` means the
    /// puzzle has no fill with this vocabulary.
    pub fn solve(&mut self) -> Option<Assignment> {
        let start = Instant::now();
        self.statistics = Statistics::default();

        info!(
            "Solving puzzle with {} slots and {} words",
            self.puzzle.slot_count(),
            self.puzzle.words().len(),
        );

        let mut domains = Domains::new(self.puzzle);
        self.statistics.pruned += enforce_node_consistency(self.puzzle, &mut domains) as u64;

        let result = if self.propagate(&mut domains, None) {
            debug!("Initial arc consistency left {} options", domains.total_len());
            self.backtrack(&Assignment::new(self.puzzle.slot_count()), &domains)
        } else {
            debug!("Initial arc consistency emptied a slot");
            None
        };

        self.statistics.duration = start.elapsed();

        match &result {
            Some(_) => info!("Found a fill: {:?}", self.statistics),
            None => info!("No fill exists: {:?}", self.statistics),
        }

        result
    }

    /// Run AC-3 and fold its counters into our statistics.
    fn propagate(&mut self, domains: &mut Domains, arcs: Option<Vec<ConstraintArc>>) -> bool {
        match enforce_arc_consistency(self.puzzle, domains, arcs) {
            Ok(ArcConsistencySuccess { revisions, eliminations }) => {
                self.statistics.revisions += revisions;
                self.statistics.pruned += eliminations;
                true
            }
            Err(ArcConsistencyFailure { revisions, eliminations, .. }) => {
                self.statistics.revisions += revisions;
                self.statistics.pruned += eliminations;
                false
            }
        }
    }

    /// Pick the unassigned slot with the fewest remaining words, preferring slots with more
    /// neighbors when that's tied and the lowest slot id after that. `None` once every slot is
    /// assigned.
    pub fn select_unassigned_slot(&self, assignment: &Assignment, domains: &Domains) -> Option<SlotId> {
        (0..self.puzzle.slot_count())
            .filter(|&slot_id| !assignment.is_assigned(slot_id))
            .min_by_key(|&slot_id| {
                (domains.len(slot_id), Reverse(self.puzzle.neighbors(slot_id).len()), slot_id)
            })
    }

    /// Return the slot's remaining words ordered by how many words each would rule out of its
    /// unassigned neighbors' domains, fewest first. Ties keep word id order.
    pub fn order_domain_values(
        &self,
        slot_id: SlotId,
        assignment: &Assignment,
        domains: &Domains,
    ) -> Vec<WordId> {
        // For each unassigned neighbor: which cell of ours it crosses, how many words it has left,
        // and how many of those put each letter in the crossing cell.
        let crossing_counts: Vec<(usize, usize, HashMap<char, usize>)> = self.puzzle
            .neighbors(slot_id)
            .iter()
            .filter(|&&neighbor| !assignment.is_assigned(neighbor))
            .filter_map(|&neighbor| {
                let (cell, neighbor_cell) = self.puzzle.overlap(slot_id, neighbor)?;

                let mut glyph_counts: HashMap<char, usize> = HashMap::new();
                for word_id in domains.iter(neighbor) {
                    if let Some(glyph) = self.puzzle.word(word_id).glyph(neighbor_cell) {
                        *glyph_counts.entry(glyph).or_insert(0) += 1;
                    }
                }

                Some((cell, domains.len(neighbor), glyph_counts))
            })
            .collect();

        let mut values: Vec<WordId> = domains.iter(slot_id).collect();
        values.sort_by_cached_key(|&word_id| {
            let word = self.puzzle.word(word_id);

            crossing_counts.iter().map(|(cell, remaining, glyph_counts)| {
                let compatible = word.glyph(*cell)
                    .and_then(|glyph| glyph_counts.get(&glyph).copied())
                    .unwrap_or(0);
                remaining - compatible
            }).sum::<usize>()
        });

        values
    }

    /// Extend `assignment` to a complete, consistent one, or return `None` if no extension exists.
    /// `domains` belongs to the caller; every candidate we try gets its own copy, so nothing we
    /// prune here is visible to sibling branches.
    fn backtrack(&mut self, assignment: &Assignment, domains: &Domains) -> Option<Assignment> {
        self.statistics.states += 1;

        if assignment.is_complete() {
            return Some(assignment.clone());
        }

        let slot_id = self.select_unassigned_slot(assignment, domains)?;
        let values = self.order_domain_values(slot_id, assignment, domains);

        trace!(
            "Depth {}: slot {} ({:?}) has {} candidates",
            assignment.len(),
            slot_id,
            self.puzzle.slot(slot_id),
            values.len(),
        );

        for word_id in values {
            let mut candidate_assignment = assignment.clone();
            candidate_assignment.assign(slot_id, word_id);

            let mut candidate_domains = domains.clone();
            candidate_domains.narrow(slot_id, word_id);

            let arcs: Vec<ConstraintArc> = self.puzzle.neighbors(slot_id).iter()
                .map(|&neighbor| (neighbor, slot_id))
                .collect();

            if self.propagate(&mut candidate_domains, Some(arcs))
                && is_consistent(self.puzzle, &candidate_assignment)
            {
                if let Some(result) = self.backtrack(&candidate_assignment, &candidate_domains) {
                    return Some(result);
                }
            } else {
                trace!("Rejected {:?} for slot {}", self.puzzle.word(word_id), slot_id);
            }

            self.statistics.backtracks += 1;
        }

        None
    }
}

/// Find one complete assignment for the puzzle, or `None` if none exists.
pub fn solve(puzzle: &Puzzle) -> Option<Assignment> {
    Solver::new(puzzle).solve()
}
