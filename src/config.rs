//! `Config` / CLI surface. Doc comments on each field become the
//! `--help` text, the way the teacher's `GeneratePhrases`/`Tokenize`
//! structs do it.

use std::path::PathBuf;
use structopt::StructOpt;

/// Solve a rectangular crossword grid against a dictionary and, optionally,
/// a list of mandatory words and a partially pre-filled grid.
#[derive(Debug, StructOpt)]
pub struct Config {
    /// Grid width.
    #[structopt(long)]
    pub width: usize,
    /// Grid height.
    #[structopt(long)]
    pub height: usize,
    /// Path to the dictionary file, one lowercase word per line. Words
    /// outside `[2, max(width, height)]` are dropped.
    #[structopt(long)]
    pub dict: PathBuf,
    /// Path to the mandatory-words file, same format as `dict`. Every word
    /// listed must appear somewhere in the solved grid: `solve` pins each
    /// one via count(ind_all, id, =, 1), `mandatory-solve` enumerates its
    /// physical placements via the orchestrator.
    #[structopt(long)]
    pub mandatory: Option<PathBuf>,
    /// Path to a pre-filled grid: a width*height character sequence where
    /// `a..z` pins a letter, `#` pins a black tile, anything else is free.
    #[structopt(long)]
    pub grid_input: Option<PathBuf>,
    /// Maximum number of black-tile cells in the solved grid.
    #[structopt(long, default_value = "10")]
    pub black_tile_cap: i32,
    /// Number of worker threads driving the search.
    #[structopt(long, default_value = "4")]
    pub thread_count: usize,
    /// Search failures before a restart with a fresh random seed.
    #[structopt(long, default_value = "120000")]
    pub restart_cutoff: u64,
    /// Use the black-tile-minimizing search variant instead of stopping at
    /// the first feasible grid: re-solve with a strictly lower cap after
    /// each incumbent until none is found. Only supported by `solve`.
    #[structopt(long)]
    pub minimize_black_tiles: bool,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_required_and_default_fields() {
        let cfg = Config::from_iter(&[
            "xword", "--width", "9", "--height", "11", "--dict", "words.txt",
        ]);
        assert_eq!(cfg.width, 9);
        assert_eq!(cfg.height, 11);
        assert_eq!(cfg.black_tile_cap, 10);
        assert_eq!(cfg.thread_count, 4);
        assert_eq!(cfg.restart_cutoff, 120_000);
        assert!(!cfg.minimize_black_tiles);
        assert!(cfg.mandatory.is_none());
    }
}
