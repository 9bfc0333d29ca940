use std::collections::HashMap;

use crate::types::{Word, WordId};

/// The vocabulary a puzzle is filled from. Words keep the order they were first seen in, so
/// `WordId`s (and everything that iterates over them) are stable for a given input.
#[derive(Debug, Default)]
pub struct WordList {
    words: Vec<Word>,
    ids_by_string: HashMap<String, WordId>,
}

impl WordList {
    /// Build a word list, dropping empty strings and repeats.
    pub fn new<I, S>(words: I) -> WordList
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        let mut word_list = WordList::default();

        for word in words {
            word_list.add_word(word.as_ref());
        }

        word_list
    }

    /// Add a word if it isn't already present, returning its id either way. Empty strings can
    /// never fill a slot, so they get `None`.
    pub fn add_word(&mut self, string: &str) -> Option<WordId> {
        if string.is_empty() {
            return None;
        }

        if let Some(&word_id) = self.ids_by_string.get(string) {
            return Some(word_id);
        }

        let word_id = self.words.len();
        self.words.push(Word::new(string));
        self.ids_by_string.insert(string.to_owned(), word_id);

        Some(word_id)
    }

    pub fn get(&self, word_id: WordId) -> &Word {
        &self.words[word_id]
    }

    pub fn id_of(&self, string: &str) -> Option<WordId> {
        self.ids_by_string.get(string).copied()
    }

    pub fn len(&self) -> usize {
        self.words.len()
    }

    pub fn is_empty(&self) -> bool {
        self.words.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = (WordId, &Word)> {
        self.words.iter().enumerate()
    }
}
