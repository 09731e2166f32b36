//! `mandatory-solve`: delegates to the orchestrator, which enumerates
//! placement combinations for every mandatory word (`spec.md` §4.5).

use crate::config::Config;
use crate::dictionary::{self, Dictionary};
use crate::orchestrator::{self, OrchestratorConfig};
use anyhow::{bail, Context, Result};

pub fn mandatory_solve(cfg: Config) -> Result<()> {
    let mandatory_path = match &cfg.mandatory {
        Some(path) => path,
        None => bail!("mandatory-solve requires --mandatory"),
    };
    if cfg.minimize_black_tiles {
        bail!(
            "--minimize-black-tiles is not supported by mandatory-solve; \
             the orchestrator races placements to the first solution and \
             has no single incumbent to improve. Use solve --mandatory \
             instead, which pins mandatory words via count(ind_all, id, =, 1) \
             and supports minimization."
        );
    }

    let maxlen = cfg.width.max(cfg.height);
    let mut dict = Dictionary::load_file(&cfg.dict, maxlen)
        .with_context(|| format!("failed to load dictionary {}", cfg.dict.display()))?;
    log::info!("Dictionary loaded: {} words", dict.len());

    let mandatory = dictionary::load_mandatory(&mut dict, mandatory_path, maxlen)
        .with_context(|| format!("failed to load mandatory words {}", mandatory_path.display()))?;

    let word_slots = 4 + 2 * (cfg.width + cfg.height).saturating_sub(4);
    if mandatory.len() > word_slots {
        bail!(
            "{} mandatory words exceed the {} word slots this grid can hold",
            mandatory.len(),
            word_slots
        );
    }

    orchestrator::run(
        &dict,
        &mandatory,
        &OrchestratorConfig {
            width: cfg.width,
            height: cfg.height,
            black_tile_cap: cfg.black_tile_cap,
            thread_count: cfg.thread_count,
            restart_cutoff: cfg.restart_cutoff,
        },
    );

    Ok(())
}
