//! `NoIndex`: the letter-only row/column validator used by the alternate
//! "letter-only" model (`spec.md` §4.2, §9). Validates that every maximal
//! letter run of length ≥ 2 in a full row/column is a dictionary word,
//! without any word-id symbols in the sequence.

use crate::dfa::{Dfa, GraphBuilder};
use crate::dictionary::{Dictionary, BLACK_TILE};

pub fn build(dict: &Dictionary, maxlength: usize) -> Dfa {
    let mut g = GraphBuilder::new();

    // State 0 doubles as: the line start, the "bridge" reached right after
    // a black tile, and a final state (accepting end-of-line there, i.e. a
    // line that ends in a black tile, or is entirely black tiles).
    g.mark_final(0);

    for length in 2..=maxlength {
        for word in dict.bucket(length) {
            let state = g.add_word(word, 0);
            g.mark_final(state);
            // After the word, a black tile returns to the bridge, from
            // which another word (or end-of-line) may follow.
            g.add_transition(state, BLACK_TILE, 0);
        }
    }

    g.build()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn dict() -> Dictionary {
        let mut d = Dictionary::new(5);
        d.add_words(["arc", "are", "bee", "cab", "car", "cat", "eat", "rob", "tab", "tea"]);
        d
    }

    fn spell(s: &str) -> Vec<i32> {
        s.chars()
            .map(|c| if c == '#' { BLACK_TILE } else { c as i32 })
            .collect()
    }

    #[test]
    fn accepts_lines_whose_runs_are_all_words() {
        let dict = dict();
        let dfa = build(&dict, 5);

        assert!(dfa.accepts(&spell("car#tea")));
        assert!(dfa.accepts(&spell("cat")));
        assert!(dfa.accepts(&spell("#####")));
        assert!(!dfa.accepts(&spell("car#xyz")));
        assert!(!dfa.accepts(&spell("zzz")));
    }

    #[test]
    fn single_letter_runs_are_rejected() {
        let dict = dict();
        let dfa = build(&dict, 5);
        assert!(!dfa.accepts(&spell("a#car")));
    }
}
