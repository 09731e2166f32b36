//! The constraint-engine collaborator, treated in `spec.md` only by
//! interface ("integer variables with domains, `distinct`, `count`,
//! `extensional(DFA)`, linear relations, branching heuristics, restart-based
//! search, multi-threaded DFS"). No Gecode-equivalent crate exists for
//! Rust, so this module implements exactly that slice of engine behavior.

pub mod domain;
pub mod propagator;
pub mod search;

use crate::dfa::Dfa;
use domain::Domain;
use std::sync::Arc;

pub type VarId = usize;

#[derive(Clone)]
pub enum Constraint {
    Extensional { vars: Vec<VarId>, dfa: Arc<Dfa> },
    DistinctExcept { vars: Vec<VarId>, sentinel: i32 },
    CountLe { vars: Vec<VarId>, value: i32, max: i32 },
    CountEqOne { vars: Vec<VarId>, value: i32 },
    Linear { a: VarId, b: VarId, c: VarId, offset: i32 },
}

/// A constraint model: variable domains plus the constraints over them.
/// Mirrors the "space" of the original engine -- created once per search
/// root, then copied (cloned) at every branch point.
#[derive(Clone)]
pub struct Model {
    pub domains: Vec<Domain>,
    pub constraints: Vec<Constraint>,
}

impl Model {
    pub fn new() -> Self {
        Model {
            domains: Vec::new(),
            constraints: Vec::new(),
        }
    }

    pub fn new_var(&mut self, domain: Domain) -> VarId {
        self.domains.push(domain);
        self.domains.len() - 1
    }

    pub fn post(&mut self, constraint: Constraint) {
        self.constraints.push(constraint);
    }

    pub fn pin(&mut self, var: VarId, value: i32) {
        self.domains[var] = Domain::singleton(value);
    }

    /// Run every constraint's filter to a fixpoint. Returns `Ok(())` if the
    /// model is still consistent, `Err(())` on failure.
    pub fn propagate(&mut self) -> Result<(), ()> {
        loop {
            let mut changed = false;
            for constraint in &self.constraints {
                let did_change = match constraint {
                    Constraint::Extensional { vars, dfa } => {
                        propagator::filter_extensional(&mut self.domains, vars, dfa)?
                    }
                    Constraint::DistinctExcept { vars, sentinel } => {
                        propagator::filter_distinct_except(&mut self.domains, vars, *sentinel)?
                    }
                    Constraint::CountLe { vars, value, max } => {
                        propagator::filter_count_le(&mut self.domains, vars, *value, *max)?
                    }
                    Constraint::CountEqOne { vars, value } => {
                        propagator::filter_count_eq_one(&mut self.domains, vars, *value)?
                    }
                    Constraint::Linear { a, b, c, offset } => {
                        propagator::filter_linear(&mut self.domains, *a, *b, *c, *offset)?
                    }
                };
                changed |= did_change;
            }
            if !changed {
                return Ok(());
            }
        }
    }

    pub fn is_solved(&self) -> bool {
        self.domains.iter().all(|d| d.assigned().is_some())
    }
}

impl Default for Model {
    fn default() -> Self {
        Self::new()
    }
}
