//! Word ↔ id index, bucketed by length.
//!
//! Ids are assigned contiguously starting right after [`MIN_INDEX`], bucket-2
//! first, then bucket-3, and so on, each bucket sorted lexicographically.
//! `MIN_INDEX` itself is the sentinel meaning "no word" for the optional
//! second word slot of a row/column.

use anyhow::{ensure, Context, Result};
use std::fs;
use std::path::Path;

/// Sentinel meaning "no word"; also the id space's base.
pub const MIN_INDEX: i32 = 256;

/// Black tile symbol, one past `'z'`.
pub const BLACK_TILE: i32 = 'z' as i32 + 1;

pub const LETTER_MIN: i32 = 'a' as i32;
pub const LETTER_MAX: i32 = 'z' as i32;

pub type WordId = i32;

/// Length-bucketed, id-assigning dictionary.
#[derive(Debug, Clone)]
pub struct Dictionary {
    maxlen: usize,
    /// `buckets[len - 2]` holds every admissible word of that length, sorted.
    buckets: Vec<Vec<String>>,
}

impl Dictionary {
    pub fn new(maxlen: usize) -> Self {
        Dictionary {
            maxlen,
            buckets: vec![Vec::new(); maxlen.saturating_sub(1)],
        }
    }

    pub fn load_file(path: impl AsRef<Path>, maxlen: usize) -> Result<Self> {
        let path = path.as_ref();
        let content = fs::read_to_string(path)
            .with_context(|| format!("failed to read dictionary file {}", path.display()))?;
        let mut dict = Dictionary::new(maxlen);
        dict.add_words(content.lines());
        Ok(dict)
    }

    /// Add words from an in-memory iterator. Words shorter than 2 or longer
    /// than `maxlen` are silently dropped.
    pub fn add_words<'a>(&mut self, words: impl IntoIterator<Item = &'a str>) {
        for word in words {
            let word = word.trim();
            if word.len() >= 2 && word.len() <= self.maxlen {
                self.buckets[word.len() - 2].insert_sorted(word);
            }
        }
    }

    pub fn maxlen(&self) -> usize {
        self.maxlen
    }

    pub fn bucket(&self, length: usize) -> &[String] {
        if length < 2 || length > self.maxlen {
            &[]
        } else {
            &self.buckets[length - 2]
        }
    }

    /// First id assigned to a word of the given length.
    pub fn first_id(&self, length: usize) -> WordId {
        let mut index = MIN_INDEX + 1;
        for len in 2..length {
            index += self.bucket(len).len() as i32;
        }
        index
    }

    /// Last id assigned to a word of the given length (may be `first_id - 1`
    /// when the bucket is empty).
    pub fn last_id(&self, length: usize) -> WordId {
        self.first_id(length) + self.bucket(length).len() as i32 - 1
    }

    /// Id of `word`, if it is part of the dictionary.
    pub fn id_of(&self, word: &str) -> Option<WordId> {
        let bucket = self.bucket(word.len());
        bucket
            .binary_search_by(|candidate| candidate.as_str().cmp(word))
            .ok()
            .map(|i| self.first_id(word.len()) + i as i32)
    }

    /// Length of the word behind `id`, if any.
    pub fn len_of(&self, id: WordId) -> Option<usize> {
        (2..=self.maxlen).find(|&len| id >= self.first_id(len) && id <= self.last_id(len))
    }

    /// Word behind `id`, if any.
    pub fn word_of(&self, id: WordId) -> Option<&str> {
        let len = self.len_of(id)?;
        let offset = (id - self.first_id(len)) as usize;
        self.bucket(len).get(offset).map(String::as_str)
    }

    /// Total number of distinct admissible words.
    pub fn len(&self) -> usize {
        self.buckets.iter().map(Vec::len).sum()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

trait InsertSorted {
    fn insert_sorted(&mut self, word: &str);
}

impl InsertSorted for Vec<String> {
    fn insert_sorted(&mut self, word: &str) {
        if let Err(pos) = self.binary_search_by(|candidate| candidate.as_str().cmp(word)) {
            self.insert(pos, word.to_string());
        }
    }
}

/// Load the mandatory-words file, folding every word into `dict` (mandatory
/// words must be placeable, so they are part of the admissible vocabulary
/// too) and returning them in file order.
pub fn load_mandatory(
    dict: &mut Dictionary,
    path: impl AsRef<Path>,
    maxlen: usize,
) -> Result<Vec<String>> {
    let path = path.as_ref();
    let content = fs::read_to_string(path)
        .with_context(|| format!("failed to read mandatory file {}", path.display()))?;

    let mut words = Vec::new();
    for line in content.lines() {
        let word = line.trim();
        if word.len() >= 2 && word.len() <= maxlen {
            words.push(word.to_string());
        }
    }
    dict.add_words(words.iter().map(String::as_str));

    for word in &words {
        ensure!(
            dict.id_of(word).is_some(),
            "mandatory word {:?} could not be indexed",
            word
        );
    }

    Ok(words)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sample() -> Dictionary {
        let mut dict = Dictionary::new(5);
        dict.add_words(["car", "cat", "arc", "are", "bee", "cab", "eat", "rob", "tab", "tea"]);
        dict
    }

    #[test]
    fn id_round_trip() {
        let dict = sample();
        for len in 2..=dict.maxlen() {
            for word in dict.bucket(len) {
                let id = dict.id_of(word).expect("word should have an id");
                assert_eq!(dict.word_of(id), Some(word.as_str()));
                assert_eq!(dict.len_of(id), Some(word.len()));
            }
        }
    }

    #[test]
    fn id_density() {
        let dict = sample();
        let mut seen = Vec::new();
        for len in 2..=dict.maxlen() {
            let first = dict.first_id(len);
            let last = dict.last_id(len);
            assert_eq!(last - first + 1, dict.bucket(len).len() as i32);
            seen.push((first, last));
        }
        for window in seen.windows(2) {
            if let [(_, prev_last), (next_first, _)] = window {
                assert!(prev_last < next_first);
            }
        }
        assert_eq!(seen[0].0, MIN_INDEX + 1);
    }

    #[test]
    fn short_and_long_words_are_dropped() {
        let mut dict = Dictionary::new(4);
        dict.add_words(["a", "ab", "abcde", "abcd"]);
        assert_eq!(dict.len(), 2);
        assert!(dict.id_of("a").is_none());
        assert!(dict.id_of("abcde").is_none());
    }

    #[test]
    fn stable_ids_for_same_content() {
        let a = sample();
        let b = sample();
        for len in 2..=5 {
            for word in a.bucket(len) {
                assert_eq!(a.id_of(word), b.id_of(word));
            }
        }
    }
}
