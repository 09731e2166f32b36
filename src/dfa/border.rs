//! `BorderH`/`BorderV`: accepts `<dim letters spelling a dictionary word of
//! length dim> <word-id>`, coupling spelling and id in a single regular
//! constraint.

use crate::dfa::{Dfa, GraphBuilder, Symbol};
use crate::dictionary::Dictionary;

pub fn build(dict: &Dictionary, dim: usize) -> Dfa {
    let mut g = GraphBuilder::new();
    let base = dict.first_id(dim);

    for (i, word) in dict.bucket(dim).iter().enumerate() {
        let state = g.add_word(word, 0);
        let word_index = base + i as i32;
        let final_state = g.step_or_create(state, word_index as Symbol);
        g.mark_final(final_state);
    }

    g.build()
}
