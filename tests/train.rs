use std::fs;
use std::path::PathBuf;

use wumpus_rl::agent::AgentConfig;
use wumpus_rl::gym::WumpusWorld;
use wumpus_rl::runner::{self, Checkpoint, RunConfig};
use wumpus_rl::table::ValueTable;

fn temp_table(name: &str) -> PathBuf {
    std::env::temp_dir().join(format!("wumpus-rl-it-{}-{}", std::process::id(), name))
}

#[test]
fn training_grows_and_persists_the_table() {
    let path = temp_table("grow");
    let config = RunConfig {
        episodes: 40,
        step_limit: 300,
        table_path: path.clone(),
        checkpoint: Checkpoint::EndOfRun,
    };

    let summary = runner::run(&config, AgentConfig::default(), |episode| {
        WumpusWorld::random(4, u64::from(episode))
    });
    assert_eq!(summary.episodes, 40);
    assert!(summary.states > 0);
    assert!(summary.mean_score.is_finite());

    let persisted = ValueTable::load(&path).unwrap();
    assert_eq!(persisted.len(), summary.states);

    // A second run resumes from the persisted table rather than relearning.
    let resumed = runner::run(&config, AgentConfig::default(), |episode| {
        WumpusWorld::random(4, u64::from(episode))
    });
    assert!(resumed.states >= summary.states);

    fs::remove_file(&path).unwrap();
}

#[test]
fn per_episode_checkpointing_writes_the_file_early() {
    let path = temp_table("every-episode");
    let config = RunConfig {
        episodes: 1,
        step_limit: 50,
        table_path: path.clone(),
        checkpoint: Checkpoint::EveryEpisode,
    };
    runner::run(&config, AgentConfig::default(), |_| WumpusWorld::random(4, 11));

    let persisted = ValueTable::load(&path).unwrap();
    assert!(!persisted.is_empty());
    fs::remove_file(&path).unwrap();
}
