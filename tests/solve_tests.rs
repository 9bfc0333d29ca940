mod common;

use std::thread;

use xwordfill::{solve, Solver};

use crate::common::{assert_sound, brute_force_has_fill, init_logger, puzzle};

/// A three-letter across sharing its first cell with a four-letter down.
const CORNER: &str = "
    ___
    _##
    _##
    _##
";

/// An across crossing a down at the across's middle letter.
const TEE: &str = "
    ___
    #_#
    #_#
";

/// Four slots in a ring.
const RING: &str = "
    ___
    _#_
    ___
";

/// #___#
/// _##_#
/// _##_#
/// ____#
const LOOP: &str = "
    #___#
    _##_#
    _##_#
    ____#
";

/// Every row and column is a slot.
const SQUARE: &str = "
    ___
    ___
    ___
";

fn check_against_brute_force(template: &str, words: &[&str]) {
    let puzzle = puzzle(template, words);
    let expected = brute_force_has_fill(&puzzle);

    match solve(&puzzle) {
        Some(assignment) => {
            assert!(expected, "solver found a fill brute force missed: {:?}", assignment.words(&puzzle));
            assert_sound(&puzzle, &assignment);
        }
        None => assert!(!expected, "solver missed a fill for {:?}", words),
    }
}

#[test]
fn small_instances_agree_with_brute_force() {
    init_logger();

    let cases: &[(&str, &[&str])] = &[
        (CORNER, &["cat", "dog", "cats", "cast"]),
        (CORNER, &["cat", "dog", "oats", "eggs"]),
        (CORNER, &["cat", "dog", "dogs", "cast"]),
        (CORNER, &["cat", "cats"]),
        (CORNER, &["cats", "cast"]),
        (TEE, &["cat", "dog", "oat", "egg"]),
        (TEE, &["abc", "xyz"]),
        (TEE, &["aaa"]),
        (TEE, &["aaa", "aab"]),
        (RING, &["aaa", "aba"]),
        (RING, &["aaa", "aba", "aca", "ada"]),
        (RING, &["top", "pan", "tin", "nap", "pit", "ten"]),
        (RING, &["bat", "tab", "bit", "tub"]),
        (LOOP, &["cat", "toes", "oil", "lips", "dog", "tree", "ham"]),
        (LOOP, &["cat", "toes", "oil", "lips"]),
        (LOOP, &["cat", "toes", "oil", "lids"]),
        (SQUARE, &["bit", "ace", "den", "bad", "ice", "ten", "ate", "dot"]),
        (SQUARE, &["cab", "are", "ten", "cat", "are", "bee", "abe", "ret"]),
    ];

    for (template, words) in cases {
        check_against_brute_force(template, words);
    }
}

#[test]
fn unsatisfiable_puzzle_is_a_normal_outcome() {
    init_logger();

    // The only words disagree at every crossing.
    let puzzle = puzzle(TEE, &["abc", "xyz"]);
    let mut solver = Solver::new(&puzzle);

    assert_eq!(solver.solve(), None);
    assert_eq!(solver.statistics().states, 0);
}

#[test]
fn solved_grid_spells_every_word() {
    init_logger();

    let puzzle = puzzle(LOOP, &["cat", "toes", "oil", "lips", "dog", "tree", "ham"]);
    let assignment = solve(&puzzle).expect("Failed to find a fill");
    let letters = puzzle.letter_grid(&assignment);

    for (slot, word) in assignment.words(&puzzle) {
        let spelled: String = slot.cell_coords().iter()
            .map(|&(row, col)| letters[row][col].unwrap())
            .collect();
        assert_eq!(spelled, word);
    }

    for (row, cells) in letters.iter().enumerate() {
        for (col, cell) in cells.iter().enumerate() {
            assert_eq!(cell.is_some(), puzzle.structure().is_fillable((row, col)));
        }
    }
}

#[test]
fn solves_share_a_puzzle_across_threads() {
    init_logger();

    let puzzle = puzzle(RING, &["top", "pan", "tin", "nap", "pit", "ten", "pat", "tan"]);
    let expected = solve(&puzzle);

    let results: Vec<_> = thread::scope(|scope| {
        let handles: Vec<_> = (0..4).map(|_| scope.spawn(|| solve(&puzzle))).collect();
        handles.into_iter().map(|handle| handle.join().unwrap()).collect()
    });

    for result in results {
        assert_eq!(result, expected);
    }
}
