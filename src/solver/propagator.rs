//! Constraint filtering. Each function narrows the given variables'
//! domains and returns `Ok(true)` if anything changed, `Ok(false)` if the
//! constraint is already stable, or `Err(())` on failure (an empty domain or
//! a provably unsatisfiable constraint).

use crate::dfa::{Dfa, State};
use crate::solver::domain::Domain;
use std::collections::HashSet;

pub type Fail = ();

/// Generalized arc consistency for the regular-membership ("extensional")
/// constraint, via the standard layered forward/backward reachability
/// algorithm (Pesant 2004): this is what lets a single DFA simultaneously
/// constrain spelling, word id, position and length.
pub fn filter_extensional(
    domains: &mut [Domain],
    vars: &[usize],
    dfa: &Dfa,
) -> Result<bool, Fail> {
    let n = vars.len();

    // Forward pass: states reachable after reading a prefix of length i.
    let mut reach: Vec<HashSet<State>> = Vec::with_capacity(n + 1);
    reach.push(HashSet::from([dfa.initial]));
    for i in 0..n {
        let dom = &domains[vars[i]];
        let mut next = HashSet::new();
        for &state in &reach[i] {
            for value in dom.iter() {
                if let Some(to) = dfa.transition(state, value) {
                    next.insert(to);
                }
            }
        }
        reach.push(next);
    }

    if reach[n].is_disjoint(&dfa.finals) {
        return Err(());
    }

    // Backward pass: states at position i from which some final state is
    // still reachable using the remaining (domain-consistent) symbols.
    let mut coreach: Vec<HashSet<State>> = vec![HashSet::new(); n + 1];
    coreach[n] = reach[n].intersection(&dfa.finals).copied().collect();
    for i in (0..n).rev() {
        let dom = &domains[vars[i]];
        let mut cr = HashSet::new();
        for &state in &reach[i] {
            let supported = dom
                .iter()
                .any(|value| dfa.transition(state, value).map_or(false, |to| coreach[i + 1].contains(&to)));
            if supported {
                cr.insert(state);
            }
        }
        coreach[i] = cr;
    }

    if !coreach[0].contains(&dfa.initial) {
        return Err(());
    }

    let mut changed = false;
    for i in 0..n {
        let reach_i = &reach[i];
        let coreach_next = &coreach[i + 1];
        let dfa_ref = dfa;
        let dom = &mut domains[vars[i]];
        let before = dom.len();
        dom.retain(|value| {
            reach_i
                .iter()
                .any(|&state| dfa_ref.transition(state, value).map_or(false, |to| coreach_next.contains(&to)))
        });
        if dom.is_empty() {
            return Err(());
        }
        if dom.len() != before {
            changed = true;
        }
    }

    Ok(changed)
}

/// All variables in `vars` must take pairwise-distinct values, except that
/// `sentinel` may repeat freely. Implemented as forward checking (remove
/// already-assigned non-sentinel values from every other domain); weaker
/// than full arc consistency for all-different, but correct and simple, and
/// combined with search this still yields only valid solutions.
pub fn filter_distinct_except(
    domains: &mut [Domain],
    vars: &[usize],
    sentinel: i32,
) -> Result<bool, Fail> {
    let mut assigned_counts: std::collections::HashMap<i32, usize> = std::collections::HashMap::new();
    for &v in vars {
        if let Some(value) = domains[v].assigned() {
            if value != sentinel {
                *assigned_counts.entry(value).or_insert(0) += 1;
            }
        }
    }
    if assigned_counts.values().any(|&count| count > 1) {
        return Err(());
    }

    let mut changed = false;
    for &v in vars {
        if domains[v].assigned().is_some() {
            continue;
        }
        for (&value, &count) in &assigned_counts {
            if count >= 1 && domains[v].remove(value) {
                changed = true;
            }
        }
        if domains[v].is_empty() {
            return Err(());
        }
    }
    Ok(changed)
}

/// `count(vars, value) <= max`.
pub fn filter_count_le(
    domains: &mut [Domain],
    vars: &[usize],
    value: i32,
    max: i32,
) -> Result<bool, Fail> {
    let assigned = vars
        .iter()
        .filter(|&&v| domains[v].assigned() == Some(value))
        .count() as i32;
    if assigned > max {
        return Err(());
    }
    if assigned < max {
        return Ok(false);
    }

    let mut changed = false;
    for &v in vars {
        if domains[v].assigned().is_none() && domains[v].remove(value) {
            changed = true;
            if domains[v].is_empty() {
                return Err(());
            }
        }
    }
    Ok(changed)
}

/// `count(vars, value) == 1`, with forced assignment when only one
/// candidate variable remains -- the same propagation strength as the
/// original's `PropMandatory`.
pub fn filter_count_eq_one(
    domains: &mut [Domain],
    vars: &[usize],
    value: i32,
) -> Result<bool, Fail> {
    let mut assigned_hits = 0;
    let mut candidates = Vec::new();
    for &v in vars {
        if domains[v].assigned() == Some(value) {
            assigned_hits += 1;
        } else if domains[v].contains(value) {
            candidates.push(v);
        }
    }

    if assigned_hits > 1 {
        return Err(());
    }

    if assigned_hits == 1 {
        let mut changed = false;
        for &v in &candidates {
            if domains[v].remove(value) {
                changed = true;
                if domains[v].is_empty() {
                    return Err(());
                }
            }
        }
        return Ok(changed);
    }

    if candidates.is_empty() {
        return Err(());
    }

    if candidates.len() == 1 {
        let v = candidates[0];
        if domains[v].len() > 1 {
            domains[v] = Domain::singleton(value);
            return Ok(true);
        }
    }

    Ok(false)
}

/// `c == a + b + offset` (used for `pos2 = pos1 + len1 + 1`). Domains are
/// small, so plain cross-product filtering is simple and fast enough.
pub fn filter_linear(
    domains: &mut [Domain],
    a: usize,
    b: usize,
    c: usize,
    offset: i32,
) -> Result<bool, Fail> {
    let da = domains[a].values();
    let db = domains[b].values();
    let dc = domains[c].values();

    let dc_set: HashSet<i32> = dc.iter().copied().collect();
    let da_set: HashSet<i32> = da.iter().copied().collect();
    let db_set: HashSet<i32> = db.iter().copied().collect();

    let mut changed = false;

    {
        let valid: HashSet<i32> = da.iter().flat_map(|&x| db.iter().map(move |&y| x + y + offset)).collect();
        let dom = &mut domains[c];
        let before = dom.len();
        dom.retain(|v| valid.contains(&v));
        if dom.is_empty() {
            return Err(());
        }
        changed |= dom.len() != before;
    }
    {
        let dom = &mut domains[a];
        let before = dom.len();
        dom.retain(|x| db_set.iter().any(|&y| dc_set.contains(&(x + y + offset))));
        if dom.is_empty() {
            return Err(());
        }
        changed |= dom.len() != before;
    }
    {
        let dom = &mut domains[b];
        let before = dom.len();
        dom.retain(|y| da_set.iter().any(|&x| dc_set.contains(&(x + y + offset))));
        if dom.is_empty() {
            return Err(());
        }
        changed |= dom.len() != before;
    }

    Ok(changed)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::dfa::GraphBuilder;

    #[test]
    fn extensional_prunes_to_dfa_language() {
        let mut g = GraphBuilder::new();
        let s = g.add_word("ab", 0);
        g.mark_final(s);
        let dfa = g.build();

        let mut domains = vec![
            Domain::from_values(['a' as i32, 'z' as i32]),
            Domain::from_values(['b' as i32, 'z' as i32]),
        ];
        let changed = filter_extensional(&mut domains, &[0, 1], &dfa).unwrap();
        assert!(changed);
        assert_eq!(domains[0].assigned(), Some('a' as i32));
        assert_eq!(domains[1].assigned(), Some('b' as i32));
    }

    #[test]
    fn extensional_fails_when_no_path_exists() {
        let mut g = GraphBuilder::new();
        let s = g.add_word("ab", 0);
        g.mark_final(s);
        let dfa = g.build();

        let mut domains = vec![Domain::singleton('x' as i32), Domain::singleton('y' as i32)];
        assert!(filter_extensional(&mut domains, &[0, 1], &dfa).is_err());
    }

    #[test]
    fn distinct_except_allows_sentinel_repeats() {
        let mut domains = vec![Domain::singleton(5), Domain::singleton(5)];
        assert!(filter_distinct_except(&mut domains, &[0, 1], 5).is_ok());

        let mut domains = vec![Domain::singleton(5), Domain::singleton(5)];
        assert!(filter_distinct_except(&mut domains, &[0, 1], 9).is_err());
    }

    #[test]
    fn count_eq_one_forces_sole_candidate() {
        let mut domains = vec![
            Domain::from_values([1, 2]),
            Domain::from_values([2, 3]),
            Domain::from_values([3, 4]),
        ];
        // value 1 only appears in var 0's domain.
        let changed = filter_count_eq_one(&mut domains, &[0, 1, 2], 1).unwrap();
        assert!(changed);
        assert_eq!(domains[0].assigned(), Some(1));
    }

    #[test]
    fn linear_filters_all_three_vars() {
        let mut domains = vec![
            Domain::from_values([0, 2]),
            Domain::range(2, 5),
            Domain::range(3, 10),
        ];
        filter_linear(&mut domains, 0, 1, 2, 1).unwrap();
        // pos2 = pos1 + len1 + 1, pos1 in {0,2}, len1 in [2,5] => pos2 in
        // {3..6} ∪ {5..8} = {3,4,5,6,7,8}
        assert!(domains[2].iter().all(|v| (3..=8).contains(&v)));
    }
}
