//! The ad-hoc "mandatory anywhere" DFA: accepts any cell-symbol sequence
//! that contains `word` as a maximal letter run, i.e. black-tile delimited
//! or anchored at either end of the line.

use crate::dfa::{Dfa, GraphBuilder, Symbol};
use crate::dictionary::{LETTER_MAX, LETTER_MIN};

pub fn build(word: &str, _dim: usize) -> Dfa {
    let mut g = GraphBuilder::new();

    // `dont_care` (state 0): anchored position -- the previous symbol was
    // either the start of the line or a black tile, so a word may start
    // here.
    let dont_care: u32 = 0;
    // `not_anchored`: mid-letters, but not matching `word`; a black tile
    // re-anchors, any other letter keeps drifting.
    let not_anchored = g.new_state();
    g.add_transition(not_anchored, crate::dictionary::BLACK_TILE, dont_care);
    for c in LETTER_MIN..=LETTER_MAX {
        g.add_transition(not_anchored, c, not_anchored);
    }
    g.add_transition(dont_care, crate::dictionary::BLACK_TILE, dont_care);

    let letters: Vec<Symbol> = word.chars().map(|c| c as Symbol).collect();
    let mut state = dont_care;
    for (i, &c) in letters.iter().enumerate() {
        let next = g.new_state();
        g.add_transition(state, c, next);
        for other in LETTER_MIN..=LETTER_MAX {
            if other != c {
                g.add_transition(state, other, not_anchored);
            }
        }
        if i > 0 {
            g.add_transition(state, crate::dictionary::BLACK_TILE, dont_care);
        }
        state = next;
    }

    // `state` now sits right after a full match. Anchored acceptance: the
    // match may end the line, or be followed by a black tile; either way the
    // rest of the line no longer matters (one occurrence is enough).
    g.mark_final(state);
    let after = g.step_or_create(state, crate::dictionary::BLACK_TILE);
    g.mark_final(after);
    g.self_loop(after, crate::dfa::cell_alphabet());

    g.build()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn spell(s: &str) -> Vec<Symbol> {
        s.chars()
            .map(|c| {
                if c == '#' {
                    crate::dictionary::BLACK_TILE
                } else {
                    c as Symbol
                }
            })
            .collect()
    }

    #[test]
    fn accepts_the_word_as_a_maximal_run_anywhere() {
        let dfa = build("hello", 9);
        assert!(dfa.accepts(&spell("hello")));
        assert!(dfa.accepts(&spell("ab#hello#cd")));
        assert!(dfa.accepts(&spell("##hello")));
        assert!(dfa.accepts(&spell("hello##xx")));
    }

    #[test]
    fn rejects_when_the_word_is_only_a_substring_of_a_longer_run() {
        let dfa = build("hello", 10);
        assert!(!dfa.accepts(&spell("ahellob")));
        assert!(!dfa.accepts(&spell("helloo")));
        assert!(!dfa.accepts(&spell("xhello")));
    }

    #[test]
    fn rejects_lines_without_the_word() {
        let dfa = build("hello", 9);
        assert!(!dfa.accepts(&spell("world####")));
    }
}
