//! DFA compilation: the intermediate labeled digraph and its six/eight
//! constructions over the dictionary (border, first, second, no-index,
//! mandatory-anywhere).
//!
//! Each DFA consumes symbols from a superset alphabet: the cell alphabet
//! (`'a'..='z'` plus [`BLACK_TILE`]), the word-id space, and small
//! position/length integers. The builder never has to disambiguate between
//! these meanings; they're just integers, and each DFA's transition table is
//! self-contained.

pub mod border;
pub mod first;
pub mod mandatory;
pub mod no_index;
pub mod second;

use crate::dictionary::BLACK_TILE;
use itertools::Itertools;
use std::collections::{HashMap, HashSet};

pub type State = u32;
pub type Symbol = i32;

/// The full cell alphabet: `'a'..='z'` plus the black tile.
pub fn cell_alphabet() -> impl Iterator<Item = Symbol> {
    (crate::dictionary::LETTER_MIN..=BLACK_TILE).into_iter()
}

/// Builds the intermediate transition map for one DFA. State 0 is always the
/// initial state.
#[derive(Debug, Default)]
pub struct GraphBuilder {
    transitions: HashMap<(State, Symbol), State>,
    finals: HashSet<State>,
    next_state: State,
}

impl GraphBuilder {
    pub fn new() -> Self {
        GraphBuilder {
            transitions: HashMap::new(),
            finals: HashSet::new(),
            next_state: 1,
        }
    }

    pub fn new_state(&mut self) -> State {
        let state = self.next_state;
        self.next_state += 1;
        state
    }

    /// Return the target of `(from, symbol)`, creating a fresh state and
    /// transition if it doesn't exist yet.
    pub fn step_or_create(&mut self, from: State, symbol: Symbol) -> State {
        if let Some(&to) = self.transitions.get(&(from, symbol)) {
            to
        } else {
            let to = self.new_state();
            self.transitions.insert((from, symbol), to);
            to
        }
    }

    /// Force `(from, symbol) -> to`, overwriting any previous target. Used
    /// when the caller already knows the target state (e.g. wiring multiple
    /// symbols into a shared bridge/swallow state).
    pub fn add_transition(&mut self, from: State, symbol: Symbol, to: State) {
        self.transitions.insert((from, symbol), to);
    }

    pub fn mark_final(&mut self, state: State) {
        self.finals.insert(state);
    }

    /// Walk `word`'s letters from `from`, creating the chain as needed, and
    /// return the terminal state.
    pub fn add_word(&mut self, word: &str, from: State) -> State {
        let mut state = from;
        for c in word.chars() {
            state = self.step_or_create(state, c as Symbol);
        }
        state
    }

    /// Wire every symbol in `alphabet` from `state` back to itself.
    pub fn self_loop(&mut self, state: State, alphabet: impl Iterator<Item = Symbol>) {
        for symbol in alphabet {
            self.add_transition(state, symbol, state);
        }
    }

    pub fn build(self) -> Dfa {
        let mut by_state: HashMap<State, Vec<(Symbol, State)>> = HashMap::new();
        let mut lookup: HashMap<(State, Symbol), State> = HashMap::new();
        let mut num_states = self.next_state;
        for (&(from, symbol), &to) in &self.transitions {
            by_state.entry(from).or_default().push((symbol, to));
            lookup.insert((from, symbol), to);
            num_states = num_states.max(from + 1).max(to + 1);
        }

        Dfa {
            initial: 0,
            finals: self.finals,
            by_state,
            lookup,
            num_states: num_states as usize,
        }
    }
}

/// A compiled DFA: a transition table plus final-state set, ready for use by
/// the solver's extensional propagator.
#[derive(Debug, Clone)]
pub struct Dfa {
    pub initial: State,
    pub finals: HashSet<State>,
    by_state: HashMap<State, Vec<(Symbol, State)>>,
    lookup: HashMap<(State, Symbol), State>,
    pub num_states: usize,
}

impl Dfa {
    pub fn transition(&self, state: State, symbol: Symbol) -> Option<State> {
        self.lookup.get(&(state, symbol)).copied()
    }

    pub fn outgoing(&self, state: State) -> &[(Symbol, State)] {
        self.by_state.get(&state).map(Vec::as_slice).unwrap_or(&[])
    }

    pub fn is_final(&self, state: State) -> bool {
        self.finals.contains(&state)
    }

    /// Whether the DFA accepts the given symbol sequence. Used by tests to
    /// check the acceptance properties directly.
    pub fn accepts(&self, symbols: &[Symbol]) -> bool {
        let mut state = self.initial;
        for &symbol in symbols {
            match self.transition(state, symbol) {
                Some(next) => state = next,
                None => return false,
            }
        }
        self.is_final(state)
    }

    /// Serialize to the engine's wire format: a transition list terminated
    /// by `(-1, 0, 0)` and a final-state list terminated by `-1`, with
    /// initial state 0.
    pub fn to_wire(&self) -> (Vec<(i32, i32, i32)>, Vec<i32>) {
        let mut transitions: Vec<(i32, i32, i32)> = self
            .lookup
            .iter()
            .map(|(&(from, symbol), &to)| (from as i32, symbol, to as i32))
            .sorted()
            .collect();
        transitions.push((-1, 0, 0));

        let mut finals: Vec<i32> = self.finals.iter().map(|&s| s as i32).sorted().collect();
        finals.push(-1);

        (transitions, finals)
    }

    /// Rebuild a DFA from the wire format produced by [`Dfa::to_wire`].
    pub fn from_wire(transitions: &[(i32, i32, i32)], finals: &[i32]) -> Dfa {
        let mut by_state: HashMap<State, Vec<(Symbol, State)>> = HashMap::new();
        let mut lookup = HashMap::new();
        let mut num_states = 1u32;
        for &(from, symbol, to) in transitions {
            if from == -1 {
                break;
            }
            let (from, to) = (from as State, to as State);
            by_state.entry(from).or_default().push((symbol, to));
            lookup.insert((from, symbol), to);
            num_states = num_states.max(from + 1).max(to + 1);
        }

        let finals = finals
            .iter()
            .take_while(|&&s| s != -1)
            .map(|&s| s as State)
            .collect();

        Dfa {
            initial: 0,
            finals,
            by_state,
            lookup,
            num_states: num_states as usize,
        }
    }
}
