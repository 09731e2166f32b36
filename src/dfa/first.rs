//! `FirstH`/`FirstV`: accepts `<pos> <dim letters> <id> <len>`, where letters
//! are either a full-line word (`pos = 0`, no black tile) or a word at
//! `pos ∈ {0, 2}` followed by a black tile and arbitrary padding.

use crate::dfa::{cell_alphabet, Dfa, GraphBuilder, Symbol};
use crate::dictionary::{Dictionary, BLACK_TILE, LETTER_MIN};

pub fn build(dict: &Dictionary, dim: usize) -> Dfa {
    let mut g = GraphBuilder::new();

    // Position prefix: pos=0 goes straight to reading the word; pos=2 first
    // consumes one letter (the implicit two-letter lead-in already handled
    // by the neighboring slot), then requires the mandatory black-tile
    // separator before the word starts.
    let pos0_state = g.step_or_create(0, 0);
    let pos2_state = g.step_or_create(0, 2);
    let pos1_state = g.step_or_create(pos2_state, LETTER_MIN);
    for c in (LETTER_MIN + 1)..=('z' as Symbol) {
        g.add_transition(pos2_state, c, pos1_state);
    }
    g.add_transition(pos1_state, BLACK_TILE, pos0_state);

    // Letter phase.
    for length in 2..=dim {
        let base = dict.first_id(length);
        for (i, word) in dict.bucket(length).iter().enumerate() {
            let state = g.add_word(word, pos0_state);
            let word_index = base + i as i32;

            let index_state = g.step_or_create(state, word_index as Symbol);
            let final_state = g.step_or_create(index_state, length as Symbol);
            g.mark_final(final_state);

            if length < dim {
                // Short word: allow arbitrary padding (the black-tile
                // separator and whatever the second word occupies) before
                // the id/length suffix.
                let swallow = g.step_or_create(state, BLACK_TILE);
                g.self_loop(swallow, cell_alphabet());
                g.add_transition(swallow, word_index as Symbol, index_state);
            }
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

    fn spell(word: &str) -> Vec<Symbol> {
        word.chars().map(|c| c as Symbol).collect()
    }

    #[test]
    fn full_line_word_is_accepted() {
        let dict = dict();
        let dim = 3;
        let dfa = build(&dict, dim);

        for word in dict.bucket(dim) {
            let id = dict.id_of(word).unwrap();
            let mut seq = vec![0];
            seq.extend(spell(word));
            seq.push(id);
            seq.push(dim as Symbol);
            assert!(dfa.accepts(&seq), "should accept full-line {word}");
        }
    }

    #[test]
    fn short_word_with_padding_is_accepted() {
        let dict = dict();
        let dim = 5;
        let dfa = build(&dict, dim);

        let word = "car";
        let id = dict.id_of(word).unwrap();
        let mut seq = vec![0];
        seq.extend(spell(word));
        seq.push(BLACK_TILE);
        seq.push('z' as Symbol); // arbitrary padding cell (part of 2nd word)
        seq.push(id);
        seq.push(3);
        assert!(dfa.accepts(&seq));
    }

    #[test]
    fn offset_line_requires_word_right_after_the_separator() {
        let dict = dict();
        let dim = 5;
        let dfa = build(&dict, dim);

        let word = "car";
        let id = dict.id_of(word).unwrap();
        let mut seq = vec![2, 'x' as Symbol, BLACK_TILE];
        seq.extend(spell(word));
        seq.push(id);
        seq.push(3);
        assert!(dfa.accepts(&seq));

        // Missing the mandatory separator must be rejected.
        let mut bad = vec![2, 'x' as Symbol];
        bad.extend(spell(word));
        bad.push(id);
        bad.push(3);
        assert!(!dfa.accepts(&bad));
    }

    #[test]
    fn position_one_is_never_accepted() {
        let dict = dict();
        let dfa = build(&dict, 5);
        let mut seq = vec![1];
        seq.extend(spell("car"));
        seq.push(dict.id_of("car").unwrap());
        seq.push(3);
        assert!(!dfa.accepts(&seq));
    }
}
