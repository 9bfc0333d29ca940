use xwordfill::{is_consistent, Assignment, Puzzle, SlotId, Structure};

pub fn init_logger() {
    let _ = env_logger::builder().is_test(true).try_init();
}

/// Build a puzzle from a template, panicking on malformed input.
#[allow(dead_code)]
pub fn puzzle(template: &str, words: &[&str]) -> Puzzle {
    Puzzle::new(Structure::from_template(template).unwrap(), words).unwrap()
}

/// Exhaustively try every length-matching word for every slot. Partial assignments that already
/// break a rule are cut off early, which can't hide a fill since adding words never repairs a
/// violation.
#[allow(dead_code)]
pub fn brute_force_has_fill(puzzle: &Puzzle) -> bool {
    fn extend(puzzle: &Puzzle, assignment: &Assignment, slot_id: SlotId) -> bool {
        if slot_id == puzzle.slot_count() {
            return true;
        }

        let length = puzzle.slot(slot_id).length;
        for (word_id, word) in puzzle.words().iter() {
            if word.len() != length {
                continue;
            }

            let mut candidate = assignment.clone();
            candidate.assign(slot_id, word_id);
            if is_consistent(puzzle, &candidate) && extend(puzzle, &candidate, slot_id + 1) {
                return true;
            }
        }

        false
    }

    extend(puzzle, &Assignment::new(puzzle.slot_count()), 0)
}

/// Panic unless `assignment` covers every slot exactly once and breaks no rule.
#[allow(dead_code)]
pub fn assert_sound(puzzle: &Puzzle, assignment: &Assignment) {
    assert!(assignment.is_complete(), "assignment is missing slots: {:?}", assignment);
    assert_eq!(assignment.words(puzzle).len(), puzzle.slot_count());
    assert!(is_consistent(puzzle, assignment), "inconsistent assignment: {:?}", assignment);
}
