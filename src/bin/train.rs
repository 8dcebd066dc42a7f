use std::env;
use std::path::PathBuf;

use wumpus_rl::agent::AgentConfig;
use wumpus_rl::gym::WumpusWorld;
use wumpus_rl::runner::{self, Checkpoint, RunConfig};

/// Train on randomly generated 4x4 worlds and print the aggregate score.
///
/// Usage: `train [episodes] [table-path]`
fn main() {
    let mut args = env::args().skip(1);
    let episodes = args
        .next()
        .and_then(|s| s.parse().ok())
        .unwrap_or(10_000);
    let table_path = args.next().map_or_else(|| PathBuf::from("q.dat"), PathBuf::from);

    let config = RunConfig {
        episodes,
        table_path,
        checkpoint: Checkpoint::EndOfRun,
        ..RunConfig::default()
    };
    let summary = runner::run(&config, AgentConfig::default(), |episode| {
        WumpusWorld::random(4, u64::from(episode))
    });

    println!(
        "{} episodes: mean score {:.1}, {} states learned",
        summary.episodes, summary.mean_score, summary.states
    );
}
