//! Restart-based DFS driver: branching order, value selection, a
//! failure-count cutoff, and a worker pool of OS threads racing the same
//! model with different random seeds (`spec.md` §4.3, §4.4, §5).

use crate::solver::{Model, VarId};
use rand::rngs::SmallRng;
use rand::seq::SliceRandom;
use rand::SeedableRng;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Mutex;

/// The three branching groups, in the required order:
/// 1. border + first-word ids, smallest-domain-first, random value;
/// 2. second-word ids, natural order, random value;
/// 3. first-word positions, natural order, minimum value.
///
/// These groups don't cover every variable: the word-variable model's
/// swallow/padding cells and `len1`/`pos2` are left to propagation, and the
/// letter-only model has no id/position variables at all. Once all three
/// groups are exhausted, [`pick_next_var`] falls back to branching directly
/// on whatever variable is still unassigned (`main.cpp`'s `branch(letters,
/// ...)`), so every model is fully decided before the driver calls it solved.
#[derive(Debug, Clone, Default)]
pub struct BranchGroups {
    pub ids_smallest_domain: Vec<VarId>,
    pub second_ids_natural: Vec<VarId>,
    pub positions_natural_min: Vec<VarId>,
}

enum ValueOrder {
    Random,
    Min,
}

enum NextVar {
    None,
    Found(VarId, ValueOrder),
}

fn pick_next_var(model: &Model, groups: &BranchGroups) -> NextVar {
    let unassigned_in = |vars: &[VarId]| -> Vec<VarId> {
        vars.iter()
            .copied()
            .filter(|&v| model.domains[v].assigned().is_none())
            .collect()
    };

    let group1 = unassigned_in(&groups.ids_smallest_domain);
    if !group1.is_empty() {
        let best = group1
            .into_iter()
            .min_by_key(|&v| model.domains[v].len())
            .unwrap();
        return NextVar::Found(best, ValueOrder::Random);
    }

    let group2 = unassigned_in(&groups.second_ids_natural);
    if let Some(&v) = group2.first() {
        return NextVar::Found(v, ValueOrder::Random);
    }

    let group3 = unassigned_in(&groups.positions_natural_min);
    if let Some(&v) = group3.first() {
        return NextVar::Found(v, ValueOrder::Min);
    }

    // Fallback group: any remaining unassigned variable, natural order,
    // random value. Covers letters (the whole domain, for the letter-only
    // model) and the word-variable model's swallow cells / len1 / pos2.
    for (var, domain) in model.domains.iter().enumerate() {
        if domain.assigned().is_none() {
            return NextVar::Found(var, ValueOrder::Random);
        }
    }

    NextVar::None
}

enum Outcome {
    Solved(Vec<i32>),
    Exhausted,
    CutoffReached,
}

fn dfs(
    model: &mut Model,
    groups: &BranchGroups,
    rng: &mut SmallRng,
    failures: &mut u64,
    cutoff: u64,
) -> Outcome {
    if model.propagate().is_err() {
        *failures += 1;
        return Outcome::Exhausted;
    }

    let (var, order) = match pick_next_var(model, groups) {
        NextVar::None if model.is_solved() => {
            return Outcome::Solved(model.domains.iter().map(|d| d.assigned().unwrap()).collect());
        }
        NextVar::None => {
            // pick_next_var's fallback group covers every variable, so this
            // is unreachable in practice; treat it as a failed branch rather
            // than panicking on an un-collapsed domain.
            *failures += 1;
            return Outcome::Exhausted;
        }
        NextVar::Found(v, order) => (v, order),
    };

    let mut values = model.domains[var].values();
    match order {
        ValueOrder::Random => values.shuffle(rng),
        ValueOrder::Min => values.sort_unstable(),
    }

    let mut any_cutoff = false;
    for value in values {
        if *failures >= cutoff {
            return Outcome::CutoffReached;
        }
        let mut child = model.clone();
        child.pin(var, value);
        match dfs(&mut child, groups, rng, failures, cutoff) {
            Outcome::Solved(sol) => return Outcome::Solved(sol),
            Outcome::Exhausted => continue,
            Outcome::CutoffReached => {
                any_cutoff = true;
                break;
            }
        }
    }

    if any_cutoff {
        Outcome::CutoffReached
    } else {
        *failures += 1;
        Outcome::Exhausted
    }
}

#[derive(Debug, Clone)]
pub struct SearchConfig {
    pub restart_cutoff: u64,
    pub max_restarts_per_thread: u32,
    pub thread_count: usize,
    pub seed: u64,
}

impl Default for SearchConfig {
    fn default() -> Self {
        SearchConfig {
            restart_cutoff: 120_000,
            max_restarts_per_thread: 64,
            thread_count: 4,
            seed: 0,
        }
    }
}

/// Run the restart-based DFS across `cfg.thread_count` worker threads, each
/// with its own seed, racing for the first solution. Cooperative
/// cancellation only happens between restarts, as `spec.md` §5 specifies
/// ("no external cancellation channel").
pub fn solve(model: &Model, groups: &BranchGroups, cfg: &SearchConfig) -> Option<Vec<i32>> {
    let found: Mutex<Option<Vec<i32>>> = Mutex::new(None);
    let proven_infeasible = AtomicBool::new(false);

    std::thread::scope(|scope| {
        for thread_index in 0..cfg.thread_count {
            let model = model.clone();
            let groups = groups.clone();
            let found = &found;
            let proven_infeasible = &proven_infeasible;
            let seed = cfg.seed ^ (thread_index as u64).wrapping_mul(0x9E3779B97F4A7C15);
            scope.spawn(move || {
                for restart in 0..cfg.max_restarts_per_thread {
                    if found.lock().unwrap().is_some() || proven_infeasible.load(Ordering::Relaxed) {
                        return;
                    }
                    let mut attempt = model.clone();
                    let mut failures = 0u64;
                    // Re-seed each restart so repeated attempts explore
                    // different random value orderings.
                    let mut attempt_rng =
                        SmallRng::seed_from_u64(seed ^ (restart as u64).wrapping_mul(0xD1B54A32D192ED03));
                    match dfs(&mut attempt, &groups, &mut attempt_rng, &mut failures, cfg.restart_cutoff) {
                        Outcome::Solved(solution) => {
                            *found.lock().unwrap() = Some(solution);
                            return;
                        }
                        Outcome::Exhausted => {
                            proven_infeasible.store(true, Ordering::Relaxed);
                            return;
                        }
                        Outcome::CutoffReached => continue,
                    }
                }
            });
        }
    });

    found.into_inner().unwrap()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::solver::domain::Domain;
    use crate::solver::Constraint;

    #[test]
    fn solves_a_single_letter_word_dfa() {
        let mut g = crate::dfa::GraphBuilder::new();
        let s = g.add_word("ab", 0);
        g.mark_final(s);
        let dfa = std::sync::Arc::new(g.build());

        let mut model = Model::new();
        let v0 = model.new_var(Domain::from_values(['a' as i32, 'z' as i32]));
        let v1 = model.new_var(Domain::from_values(['b' as i32, 'z' as i32]));
        model.post(Constraint::Extensional { vars: vec![v0, v1], dfa });

        let groups = BranchGroups {
            ids_smallest_domain: vec![v0, v1],
            ..Default::default()
        };
        let cfg = SearchConfig {
            thread_count: 1,
            ..Default::default()
        };
        let solution = solve(&model, &groups, &cfg).expect("should solve");
        assert_eq!(solution, vec!['a' as i32, 'b' as i32]);
    }

    #[test]
    fn detects_infeasibility() {
        let mut model = Model::new();
        let v0 = model.new_var(Domain::singleton(1));
        let v1 = model.new_var(Domain::singleton(2));
        model.post(Constraint::DistinctExcept {
            vars: vec![v0, v1],
            sentinel: -1,
        });
        // force a conflicting pin to make it infeasible
        model.pin(v1, 1);

        let groups = BranchGroups::default();
        let cfg = SearchConfig {
            thread_count: 1,
            max_restarts_per_thread: 1,
            ..Default::default()
        };
        assert!(solve(&model, &groups, &cfg).is_none());
    }
}
