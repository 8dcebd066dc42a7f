use std::path::PathBuf;

use log::{error, info, warn};

use crate::agent::{AgentConfig, QLearningAgent};
use crate::decay::Decay;
use crate::env::World;
use crate::table::ValueTable;

/// When the value table is written back to disk
#[derive(Clone, Copy, PartialEq, Eq, Debug)]
pub enum Checkpoint {
    /// Once, after the last episode
    EndOfRun,
    /// After every episode
    EveryEpisode,
}

/// Configuration for a training run
#[derive(Clone, Debug)]
pub struct RunConfig {
    pub episodes: u32,
    /// Per-episode safety budget on agent steps, in case the world's own
    /// terminal conditions never trigger
    pub step_limit: u32,
    pub table_path: PathBuf,
    pub checkpoint: Checkpoint,
}

impl Default for RunConfig {
    fn default() -> Self {
        Self {
            episodes: 10_000,
            step_limit: 500,
            table_path: PathBuf::from("q.dat"),
            checkpoint: Checkpoint::EndOfRun,
        }
    }
}

/// Aggregate outcome of a training run
#[derive(Clone, Debug, PartialEq)]
pub struct RunSummary {
    pub episodes: u32,
    pub mean_score: f64,
    /// Distinct states in the table after the run
    pub states: usize,
}

/// Train across `config.episodes` episodes, one world per episode
///
/// The table is loaded from `config.table_path` (empty on a first run),
/// shared in memory across all episodes, and persisted according to the
/// checkpoint policy. A failed save is reported and training continues; the
/// next run simply resumes from whatever was last written successfully.
pub fn run<W, F, D>(config: &RunConfig, agent_config: AgentConfig<D>, mut make_world: F) -> RunSummary
where
    W: World,
    F: FnMut(u32) -> W,
    D: Decay,
{
    let table = match ValueTable::load(&config.table_path) {
        Ok(table) => table,
        Err(e) => {
            warn!("could not read {}: {e}, starting empty", config.table_path.display());
            ValueTable::new()
        }
    };
    let mut agent = QLearningAgent::new(table, agent_config);

    let mut total_score = 0.0;
    for episode in 0..config.episodes {
        let mut world = make_world(episode);
        for _ in 0..config.step_limit {
            if world.game_over() {
                break;
            }
            agent.step(&mut world);
        }
        total_score += world.score();
        agent.end_episode();

        if config.checkpoint == Checkpoint::EveryEpisode {
            persist(agent.table(), config);
        }
    }
    if config.checkpoint == Checkpoint::EndOfRun {
        persist(agent.table(), config);
    }

    let summary = RunSummary {
        episodes: config.episodes,
        mean_score: total_score / f64::from(config.episodes.max(1)),
        states: agent.table().len(),
    };
    info!(
        "{} episodes done: mean score {:.1}, {} states",
        summary.episodes, summary.mean_score, summary.states
    );
    summary
}

fn persist(table: &ValueTable, config: &RunConfig) {
    if let Err(e) = table.save(&config.table_path) {
        error!("could not persist value table to {}: {e}", config.table_path.display());
    }
}
