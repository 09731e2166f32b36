//! File formats and rendering (`spec.md` §6): grid-pin-file parsing,
//! solution printing, and post-solve word extraction
//! (`main.cpp::wordlist`/`redundant_word`).

use crate::dictionary::BLACK_TILE;
use anyhow::{ensure, Context, Result};
use std::collections::HashSet;
use std::fs;
use std::path::Path;

/// Parse a pre-filled grid: a `width * height` sequence of characters where
/// `a..z` pins a letter and `#` pins a black tile. Any other character
/// (typically `.`) means free. Whitespace and `/` (used to visually
/// separate rows) are ignored, so both a bare character stream and a
/// `/`-separated layout like `"c.t / a.a / #b."` parse the same way.
pub fn parse_grid_input(content: &str, width: usize, height: usize) -> Result<Vec<Option<i32>>> {
    let cells: Vec<char> = content
        .chars()
        .filter(|c| !c.is_whitespace() && *c != '/')
        .collect();
    ensure!(
        cells.len() == width * height,
        "grid input has {} cells, expected {} ({}x{})",
        cells.len(),
        width * height,
        width,
        height
    );

    Ok(cells
        .into_iter()
        .map(|c| match c {
            'a'..='z' => Some(c as i32),
            '#' => Some(BLACK_TILE),
            _ => None,
        })
        .collect())
}

pub fn read_grid_input(path: impl AsRef<Path>, width: usize, height: usize) -> Result<Vec<Option<i32>>> {
    let path = path.as_ref();
    let content = fs::read_to_string(path)
        .with_context(|| format!("failed to read grid input file {}", path.display()))?;
    parse_grid_input(&content, width, height)
}

/// Render a (possibly partial) grid row-major, one line per row: `?` for
/// unresolved cells, `a..z` for letters, `#` for black tiles.
pub fn format_grid(cells: &[Option<i32>], width: usize, height: usize) -> String {
    let mut out = String::with_capacity((width + 1) * height);
    for y in 0..height {
        for x in 0..width {
            out.push(cell_char(cells[y * width + x]));
        }
        out.push('\n');
    }
    out
}

fn cell_char(cell: Option<i32>) -> char {
    match cell {
        Some(code) if code == BLACK_TILE => '#',
        Some(code) => (code as u8) as char,
        None => '?',
    }
}

/// Scan every row then every column for maximal letter runs of length ≥ 2,
/// the way `main.cpp::wordlist` does. Unresolved cells contribute `?` to a
/// run rather than breaking it, matching the original's partial-grid
/// behavior.
pub fn extract_words(cells: &[Option<i32>], width: usize, height: usize) -> Vec<String> {
    let mut words = Vec::new();

    for y in 0..height {
        let mut run = String::new();
        for x in 0..width {
            extend_run(cells[y * width + x], &mut run, &mut words);
        }
        flush_run(&mut run, &mut words);
    }
    for x in 0..width {
        let mut run = String::new();
        for y in 0..height {
            extend_run(cells[y * width + x], &mut run, &mut words);
        }
        flush_run(&mut run, &mut words);
    }

    words
}

fn extend_run(cell: Option<i32>, run: &mut String, words: &mut Vec<String>) {
    match cell {
        Some(code) if code == BLACK_TILE => flush_run(run, words),
        Some(code) => run.push((code as u8) as char),
        None => run.push('?'),
    }
}

fn flush_run(run: &mut String, words: &mut Vec<String>) {
    if run.chars().count() >= 2 {
        words.push(std::mem::take(run));
    } else {
        run.clear();
    }
}

/// Whether the same word text appears more than once in `words`
/// (`main.cpp::redundant_word`).
pub fn has_redundant_words(words: &[String]) -> bool {
    let mut seen = HashSet::new();
    words.iter().any(|word| !seen.insert(word))
}
