//! `solve`: a single grid, optionally seeded with a partially pre-filled
//! grid and/or mandatory words pinned via `count(ind_all, id, =, 1)`
//! (`spec.md` §4.5(a) -- the placement-free alternative to the
//! orchestrator's physical enumeration in `mandatory-solve`).

use crate::config::Config;
use crate::dictionary::{self, Dictionary, BLACK_TILE};
use crate::grid::GridModel;
use crate::io;
use crate::solver::search::{self, SearchConfig};
use anyhow::{Context, Result};
use std::time::{SystemTime, UNIX_EPOCH};

/// Whether the search produced a grid or exhausted its restart cutoff.
/// Not an error: "no solution" is a reportable, non-fatal outcome
/// (`spec.md` §7).
pub enum SolveOutcome {
    Solved(Vec<i32>),
    NoSolution,
}

pub fn solve(cfg: Config) -> Result<()> {
    let maxlen = cfg.width.max(cfg.height);
    let mut dict = Dictionary::load_file(&cfg.dict, maxlen)
        .with_context(|| format!("failed to load dictionary {}", cfg.dict.display()))?;
    log::info!("Dictionary loaded: {} words", dict.len());

    let mandatory = match &cfg.mandatory {
        Some(path) => dictionary::load_mandatory(&mut dict, path, maxlen)
            .with_context(|| format!("failed to load mandatory words {}", path.display()))?,
        None => Vec::new(),
    };

    let grid_input = match &cfg.grid_input {
        Some(path) => Some(io::read_grid_input(path, cfg.width, cfg.height)?),
        None => None,
    };

    let mut cap = cfg.black_tile_cap;
    let mut best: Option<Vec<i32>> = None;
    loop {
        let mut grid = GridModel::build(&dict, cfg.width, cfg.height, cap);
        for word in &mandatory {
            grid.pin_mandatory_by_count(&dict, word)?;
        }
        if let Some(grid_input) = &grid_input {
            grid.pin_grid_input(grid_input);
        }

        let groups = grid.branch_groups();
        let seed = SystemTime::now()
            .duration_since(UNIX_EPOCH)
            .unwrap_or_default()
            .as_nanos() as u64;
        let search_cfg = SearchConfig {
            restart_cutoff: cfg.restart_cutoff,
            thread_count: cfg.thread_count,
            seed,
            ..Default::default()
        };

        log::info!("Search starting (black tile cap {})", cap);
        match search::solve(&grid.model, &groups, &search_cfg) {
            Some(solution) => {
                let black_tiles = solution.iter().filter(|&&c| c == BLACK_TILE).count() as i32;
                best = Some(solution);
                if !cfg.minimize_black_tiles || black_tiles == 0 {
                    break;
                }
                // Overload the incumbent/candidate relation from `spec.md`
                // §4.3's minimization variant: only accept a strictly lower
                // black-tile count on the next iteration.
                cap = black_tiles - 1;
            }
            None => break,
        }
    }
    log::info!("Search done");

    let outcome = match best {
        Some(solution) => SolveOutcome::Solved(solution),
        None => SolveOutcome::NoSolution,
    };
    print_outcome(outcome, cfg.width, cfg.height);
    Ok(())
}

fn print_outcome(outcome: SolveOutcome, width: usize, height: usize) {
    match outcome {
        SolveOutcome::Solved(letters) => {
            let cells: Vec<Option<i32>> = letters.into_iter().map(Some).collect();
            print!("{}", io::format_grid(&cells, width, height));

            let words = io::extract_words(&cells, width, height);
            for word in &words {
                println!("{word}");
            }
            if io::has_redundant_words(&words) {
                println!("\nWarning: Redundant words!");
            }
        }
        SolveOutcome::NoSolution => {
            println!("No solution found within the restart cutoff.");
        }
    }
}
