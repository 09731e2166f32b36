//! Mandatory-word placement enumeration (`spec.md` §4.5): encodes every
//! `(line, local_pos)` combination as a mixed-radix integer, shuffles and
//! round-robins the space across worker threads, and validates + pins each
//! combination before handing it a fresh search root.

use crate::dictionary::{Dictionary, BLACK_TILE};
use crate::grid::GridModel;
use crate::io;
use crate::solver::search::{self, SearchConfig};
use rand::rngs::SmallRng;
use rand::seq::SliceRandom;
use rand::SeedableRng;
use rayon::prelude::*;
use std::io::Write;
use std::sync::Mutex;

/// Which line a placement falls on: a row (`y`) or a column (`x`).
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Line {
    Row(usize),
    Col(usize),
}

#[derive(Debug, Clone, Copy)]
pub struct Placement {
    pub word_index: usize,
    pub line: Line,
    pub actual_pos: usize,
}

/// `local2actual`: the four legal local offsets `{0, 2, dim-len, dim-2-len}`.
/// Returns `None` when the offset would be negative (word doesn't fit).
pub fn local_to_actual(local_pos: usize, line_len: usize, word_len: usize) -> Option<usize> {
    match local_pos {
        0 => Some(0),
        1 => Some(2),
        2 => line_len.checked_sub(word_len),
        3 => line_len.checked_sub(2)?.checked_sub(word_len),
        _ => unreachable!("local_pos is always combination % 4"),
    }
}

/// `COMBINATION_BASE = 4 * (width + height)`.
pub fn combination_base(width: usize, height: usize) -> u64 {
    4 * (width + height) as u64
}

/// Decode one mixed-radix combination into a placement per mandatory word,
/// mirroring `main.cpp::combination_valid`'s digit extraction. Returns
/// `None` as soon as one digit names a placement that doesn't fit its line.
pub fn decode_combination(
    mut combination: u64,
    width: usize,
    height: usize,
    mandatory: &[String],
) -> Option<Vec<Placement>> {
    let base = combination_base(width, height);
    let mut placements = Vec::with_capacity(mandatory.len());
    for (word_index, word) in mandatory.iter().enumerate() {
        let encoded = (combination % base) as usize;
        let rowcol = encoded / 4;
        let local_pos = encoded % 4;
        let horizontal = rowcol < height;
        let line_len = if horizontal { width } else { height };
        let actual_pos = local_to_actual(local_pos, line_len, word.chars().count())?;
        let line = if horizontal {
            Line::Row(rowcol)
        } else {
            Line::Col(rowcol - height)
        };
        placements.push(Placement {
            word_index,
            line,
            actual_pos,
        });
        combination /= base;
    }
    Some(placements)
}

/// Pre-flight validation + `GridConstraint` materialization (`spec.md`
/// §4.5): every word must fit its line, and two mandatory words may only
/// occupy the same cell when they agree on its letter (separator black
/// tiles included). Returns `None` on any conflict.
pub fn preflight(
    width: usize,
    height: usize,
    mandatory: &[String],
    placements: &[Placement],
) -> Option<Vec<Option<i32>>> {
    let mut forced: Vec<Option<i32>> = vec![None; width * height];

    let mut set = |forced: &mut Vec<Option<i32>>, index: usize, value: i32| -> bool {
        match forced[index] {
            Some(existing) if existing != value => false,
            _ => {
                forced[index] = Some(value);
                true
            }
        }
    };

    for placement in placements {
        let word = &mandatory[placement.word_index];
        let word_len = word.chars().count();
        let (line_len, start_index, stride) = match placement.line {
            Line::Row(y) => (width, y * width, 1),
            Line::Col(x) => (height, x, width),
        };
        if placement.actual_pos + word_len > line_len {
            return None;
        }

        if placement.actual_pos > 0 {
            let index = start_index + (placement.actual_pos - 1) * stride;
            if !set(&mut forced, index, BLACK_TILE) {
                return None;
            }
        }
        for (j, c) in word.chars().enumerate() {
            let index = start_index + (placement.actual_pos + j) * stride;
            if !set(&mut forced, index, c as i32) {
                return None;
            }
        }
        if placement.actual_pos + word_len < line_len {
            let index = start_index + (placement.actual_pos + word_len) * stride;
            if !set(&mut forced, index, BLACK_TILE) {
                return None;
            }
        }
    }

    Some(forced)
}

pub struct OrchestratorConfig {
    pub width: usize,
    pub height: usize,
    pub black_tile_cap: i32,
    pub thread_count: usize,
    pub restart_cutoff: u64,
}

/// Run the full orchestrator: enumerate, shuffle, and spread combinations
/// across a `cfg.thread_count`-sized pool (the data-parallel counterpart of
/// `main.cpp`'s modulo round-robin split), pre-flighting each one and
/// printing every solution found through a shared `stdout` mutex
/// (`main.cpp`'s `cout_mutex`).
pub fn run(dict: &Dictionary, mandatory: &[String], cfg: &OrchestratorConfig) {
    let base = combination_base(cfg.width, cfg.height);
    let combination_count = base.saturating_pow(mandatory.len() as u32);
    log::info!("{} combinations at most", combination_count);

    let mut combinations: Vec<u64> = (0..combination_count).collect();
    let mut rng = SmallRng::from_entropy();
    combinations.shuffle(&mut rng);

    let stdout = Mutex::new(std::io::stdout());

    let pool = rayon::ThreadPoolBuilder::new()
        .num_threads(cfg.thread_count)
        .build()
        .expect("failed to build the orchestrator's thread pool");

    pool.install(|| {
        combinations
            .par_iter()
            .for_each(|&combination| try_combination(dict, mandatory, cfg, combination, &stdout));
    });
}

fn try_combination(
    dict: &Dictionary,
    mandatory: &[String],
    cfg: &OrchestratorConfig,
    combination: u64,
    stdout: &Mutex<std::io::Stdout>,
) {
    let placements = match decode_combination(combination, cfg.width, cfg.height, mandatory) {
        Some(p) => p,
        None => return,
    };
    let forced = match preflight(cfg.width, cfg.height, mandatory, &placements) {
        Some(f) => f,
        None => return,
    };

    let mut grid = GridModel::build(dict, cfg.width, cfg.height, cfg.black_tile_cap);
    grid.pin_grid_input(&forced);
    let groups = grid.branch_groups();
    let search_cfg = SearchConfig {
        restart_cutoff: cfg.restart_cutoff,
        thread_count: 1,
        ..Default::default()
    };

    if let Some(solution) = search::solve(&grid.model, &groups, &search_cfg) {
        let cells: Vec<Option<i32>> = solution.into_iter().map(Some).collect();
        let rendered = io::format_grid(&cells, cfg.width, cfg.height);
        let mut out = stdout.lock().unwrap();
        let _ = writeln!(out, "{rendered}");
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn local_to_actual_matches_the_four_offsets() {
        assert_eq!(local_to_actual(0, 9, 3), Some(0));
        assert_eq!(local_to_actual(1, 9, 3), Some(2));
        assert_eq!(local_to_actual(2, 9, 3), Some(6));
        assert_eq!(local_to_actual(3, 9, 3), Some(4));
        assert_eq!(local_to_actual(2, 3, 5), None);
    }

    #[test]
    fn decode_combination_splits_rows_from_columns() {
        let mandatory = vec!["hello".to_string()];
        // rowcol = 0 (a row), local_pos = 0.
        let placements = decode_combination(0, 9, 11, &mandatory).unwrap();
        assert_eq!(placements.len(), 1);
        assert_eq!(placements[0].line, Line::Row(0));
    }

    #[test]
    fn preflight_tolerates_agreeing_overlaps_but_rejects_conflicts() {
        let mandatory = vec!["car".to_string(), "cat".to_string()];
        // Both words start at row 0, col 0: they agree on 'c' and 'a' but
        // conflict on the third letter.
        let placements = vec![
            Placement {
                word_index: 0,
                line: Line::Row(0),
                actual_pos: 0,
            },
            Placement {
                word_index: 1,
                line: Line::Row(0),
                actual_pos: 0,
            },
        ];
        assert!(preflight(9, 11, &mandatory, &placements).is_none());
    }

    #[test]
    fn preflight_builds_a_grid_constraint_with_separators() {
        let mandatory = vec!["car".to_string()];
        let placements = vec![Placement {
            word_index: 0,
            line: Line::Row(1),
            actual_pos: 2,
        }];
        let forced = preflight(9, 11, &mandatory, &placements).unwrap();
        assert_eq!(forced[1 * 9 + 1], Some(BLACK_TILE));
        assert_eq!(forced[1 * 9 + 2], Some('c' as i32));
        assert_eq!(forced[1 * 9 + 5], Some(BLACK_TILE));
    }
}
