//! `SecondH`/`SecondV`: accepts `<pos> <letters> <id>` describing the second
//! word on a line, where `letters` is the reduced slice (`dim-3` cells
//! starting three positions in from the line's origin). `pos` ranges over
//! `[3, dim-2]` for a real second word, or one of two sentinel values
//! (`dim-1`, `dim+1`) meaning "no second word".

use crate::dfa::{cell_alphabet, Dfa, GraphBuilder, Symbol};
use crate::dictionary::{Dictionary, MIN_INDEX};

pub fn build(dict: &Dictionary, dim: usize) -> Dfa {
    let mut g = GraphBuilder::new();
    let dim = dim as i32;

    // Absent-word branch: either sentinel position leads to a swallow state
    // that accepts any remaining cells, then the sentinel id.
    let swallow = g.new_state();
    g.add_transition(0, dim - 1, swallow);
    g.add_transition(0, dim + 1, swallow);
    g.self_loop(swallow, cell_alphabet());
    let absent_final = g.step_or_create(swallow, MIN_INDEX as Symbol);
    g.mark_final(absent_final);

    // Position prefix: a real second word starts at pos in [3, dim-2]. Each
    // entry chains back to a common start_state by consuming (pos-3)
    // arbitrary cells (the gap between the assumed first word and this one).
    let start_state = g.new_state();
    let max_pos = dim - 2;
    if max_pos >= 3 {
        for pos in 3..=max_pos {
            let mut state = start_state;
            for _ in 0..(pos - 3) {
                let entry = g.new_state();
                g.self_loop_into(entry, state);
                state = entry;
            }
            g.add_transition(0, pos, state);
        }
    }

    // Letter phase: words of length in [2, dim-3], possibly followed by
    // arbitrary trailing padding before the id.
    let max_len = dim - 3;
    if max_len >= 2 {
        for length in 2..=(max_len as usize) {
            let base = dict.first_id(length);
            for (i, word) in dict.bucket(length).iter().enumerate() {
                let state = g.add_word(word, start_state);
                let word_index = base + i as i32;

                let final_state = g.step_or_create(state, word_index as Symbol);
                g.mark_final(final_state);

                if (length as i32) < max_len {
                    let pad = g.step_or_create(state, crate::dictionary::BLACK_TILE);
                    g.self_loop(pad, cell_alphabet());
                    g.add_transition(pad, word_index as Symbol, final_state);
                }
            }
        }
    }

    g.build()
}

trait SelfLoopInto {
    /// Wire every cell symbol from `from` into `to`.
    fn self_loop_into(&mut self, from: crate::dfa::State, to: crate::dfa::State);
}

impl SelfLoopInto for GraphBuilder {
    fn self_loop_into(&mut self, from: crate::dfa::State, to: crate::dfa::State) {
        for symbol in cell_alphabet() {
            self.add_transition(from, symbol, to);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::dictionary::BLACK_TILE;

    fn dict() -> Dictionary {
        let mut d = Dictionary::new(9);
        d.add_words(["arc", "are", "bee", "cab", "car", "cat", "eat", "rob", "tab", "tea"]);
        d
    }

    fn spell(word: &str) -> Vec<Symbol> {
        word.chars().map(|c| c as Symbol).collect()
    }

    #[test]
    fn absent_second_word_is_accepted_only_via_sentinel() {
        let dict = dict();
        let dim = 9;
        let dfa = build(&dict, dim);

        let reduced_len = dim - 3;
        let mut seq = vec![dim as Symbol - 1];
        seq.extend(std::iter::repeat(BLACK_TILE).take(reduced_len as usize));
        seq.push(MIN_INDEX);
        assert!(dfa.accepts(&seq));

        let mut seq2 = vec![dim as Symbol + 1];
        seq2.extend(std::iter::repeat('x' as Symbol).take(reduced_len as usize));
        seq2.push(MIN_INDEX);
        assert!(dfa.accepts(&seq2));

        // No other position accepts MIN_INDEX as a suffix.
        let mut bad = vec![3];
        bad.extend(spell("car"));
        bad.extend(std::iter::repeat(BLACK_TILE).take((reduced_len - 3) as usize));
        bad.push(MIN_INDEX);
        assert!(!dfa.accepts(&bad));
    }

    #[test]
    fn second_word_at_its_position_is_accepted() {
        let dict = dict();
        let dim = 9;
        let dfa = build(&dict, dim);
        let reduced_len = (dim - 3) as usize;

        let pos = 3;
        let word = "car";
        let id = dict.id_of(word).unwrap();
        let mut seq = vec![pos as Symbol];
        seq.extend(spell(word));
        seq.extend(std::iter::repeat(BLACK_TILE).take(reduced_len - word.len()));
        seq.push(id);
        assert!(dfa.accepts(&seq));
    }
}
