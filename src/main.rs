use crate::commands::mandatory_solve::mandatory_solve;
use crate::commands::solve::solve;
use crate::config::Config;
use anyhow::Error;
use std::env;
use std::env::VarError;
use structopt::StructOpt;

mod commands;
mod config;
mod dfa;
mod dictionary;
mod grid;
mod io;
mod orchestrator;
mod solver;

#[derive(Debug, StructOpt)]
#[structopt(name = "xword", about = "Crossword-grid solver.")]
enum Opt {
    /// Solve a single grid against a dictionary. Mandatory words, if any,
    /// are pinned via count(ind_all, id, =, 1) rather than physically
    /// placed; supports --minimize-black-tiles.
    Solve(Config),
    /// Solve a grid that must contain every word from --mandatory
    /// somewhere, enumerating physical placements via the orchestrator.
    MandatorySolve(Config),
}

fn main() -> Result<(), Error> {
    if let Err(VarError::NotPresent) = env::var("RUST_LOG") {
        env::set_var("RUST_LOG", "INFO");
    }
    env_logger::init();
    log::info!("Starting");

    match Opt::from_args() {
        Opt::Solve(cfg) => solve(cfg)?,
        Opt::MandatorySolve(cfg) => mandatory_solve(cfg)?,
    };

    log::info!("Done");
    Ok(())
}
