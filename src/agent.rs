use log::debug;
use rand::{thread_rng, Rng};

use crate::assert_interval;
use crate::decay::{self, Decay};
use crate::env::{Command, World};
use crate::exploration::EpsilonGreedy;
use crate::reward::RewardConfig;
use crate::state::State;
use crate::table::ValueTable;

/// Configuration for the [`QLearningAgent`]
pub struct AgentConfig<D: Decay = decay::Constant> {
    /// Learning rate, in `[0,1]`
    pub alpha: f64,
    /// Discount factor, in `[0,1]`
    pub gamma: f64,
    pub exploration: EpsilonGreedy<D>,
    pub rewards: RewardConfig,
}

impl Default for AgentConfig<decay::Constant> {
    fn default() -> Self {
        Self {
            alpha: 0.1,
            gamma: 0.5,
            exploration: EpsilonGreedy::new(decay::Constant::new(0.01)),
            rewards: RewardConfig::default(),
        }
    }
}

/// A tabular Q-learning agent for the Wumpus World
///
/// The agent owns the [`ValueTable`] it was constructed with and mutates it in
/// place across episodes; persistence stays with the caller, who can borrow
/// the table at any checkpoint via [`table`](Self::table) or reclaim it with
/// [`into_table`](Self::into_table).
pub struct QLearningAgent<D: Decay = decay::Constant> {
    table: ValueTable,
    exploration: EpsilonGreedy<D>,
    alpha: f64,
    gamma: f64,
    rewards: RewardConfig,
    episode: u32,
}

impl<D: Decay> QLearningAgent<D> {
    /// Initialize a new `QLearningAgent` around an existing value table
    ///
    /// **Panics** if `alpha` or `gamma` is not in the interval `[0,1]`
    pub fn new(table: ValueTable, config: AgentConfig<D>) -> Self {
        assert_interval!(config.alpha, 0.0, 1.0);
        assert_interval!(config.gamma, 0.0, 1.0);
        Self {
            table,
            exploration: config.exploration,
            alpha: config.alpha,
            gamma: config.gamma,
            rewards: config.rewards,
            episode: 0,
        }
    }

    pub fn table(&self) -> &ValueTable {
        &self.table
    }

    pub fn into_table(self) -> ValueTable {
        self.table
    }

    /// Advance the exploration schedule's clock
    pub fn end_episode(&mut self) {
        self.episode += 1;
    }

    /// Run one full action cycle against the world
    pub fn step<W: World + ?Sized>(&mut self, world: &mut W) {
        self.step_with(world, &mut thread_rng())
    }

    /// [`step`](Self::step) with an explicit randomness source
    pub fn step_with<W, R>(&mut self, world: &mut W, rng: &mut R)
    where
        W: World + ?Sized,
        R: Rng,
    {
        let (x, y) = world.position();

        // Reflexes come before the policy: gold is always grabbed, and a pit
        // is climbed out of before anything else happens on this cell.
        if world.has_glitter(x, y) {
            world.perform(Command::Grab);
            return;
        }
        if world.has_pit(x, y) {
            world.perform(Command::Climb);
        }

        let before = world.snapshot();
        let state = State::observe(world);
        let values = *self.table.get_or_create(state);
        let action = self.exploration.select(self.episode as f64, &values, rng);

        world.perform(Command::from(action));

        let next = State::observe(world);
        let reward = self.rewards.evaluate(&before, action, world);
        let max_next = self
            .table
            .get_or_create(next)
            .iter()
            .copied()
            .fold(f64::NEG_INFINITY, f64::max);

        let entry = self.table.get_or_create(state);
        entry[action as usize] = backup(self.alpha, self.gamma, entry[action as usize], reward, max_next);

        debug!(
            "{:?} at {:?}: q={:?} r={} -> {}",
            action,
            before.position,
            values,
            reward,
            entry[action as usize],
        );
    }
}

/// One-step temporal-difference backup
fn backup(alpha: f64, gamma: f64, q: f64, reward: f64, max_next: f64) -> f64 {
    q + alpha * (reward + gamma * max_next - q)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::env::Action;
    use crate::gym::WumpusWorld;

    #[test]
    fn backup_matches_the_update_rule() {
        let updated = backup(0.1, 0.5, 0.0, 10.0, 4.0);
        assert!((updated - 1.2).abs() < 1e-12);
    }

    #[test]
    fn glitter_triggers_grab_without_learning() {
        let mut world = WumpusWorld::from_layout("AG..\n....");
        world.perform(Command::Forward);
        let (x, y) = world.position();
        assert!(world.has_glitter(x, y));

        let mut agent = QLearningAgent::new(ValueTable::new(), AgentConfig::default());
        agent.step(&mut world);
        assert!(world.has_gold());
        assert!(agent.table().is_empty());
    }

    #[test]
    fn pit_triggers_climb_before_the_policy_action() {
        let mut world = WumpusWorld::from_layout("AP..\n...W");
        world.perform(Command::Forward);
        let steps_before = world.steps();

        let mut agent = QLearningAgent::new(ValueTable::new(), AgentConfig::default());
        agent.step(&mut world);
        // Climb plus one learned action were both executed.
        assert_eq!(world.steps(), steps_before + 2);
        assert_eq!(agent.table().len(), 2);
    }

    #[test]
    fn a_step_learns_exactly_one_entry_pair() {
        let mut world = WumpusWorld::from_layout("A...\n....");
        let state = State::observe(&world);
        let mut agent = QLearningAgent::new(ValueTable::new(), AgentConfig::default());
        agent.step(&mut world);

        // The visited state and its successor were lazily created.
        assert!(agent.table().len() <= 2);
        assert!(agent.table().get(&state).is_some());
    }

    #[test]
    fn wall_bump_drives_the_value_down() {
        let mut world = WumpusWorld::from_layout("A...\n....");
        world.perform(Command::TurnLeft);
        world.perform(Command::TurnLeft);
        let state = State::observe(&world);

        // Seed Forward as the sole best action so the greedy policy must bump.
        let mut table = ValueTable::new();
        table.get_or_create(state)[Action::Forward as usize] = 1.0;
        let config = AgentConfig {
            exploration: EpsilonGreedy::new(decay::Constant::new(0.0)),
            ..AgentConfig::default()
        };
        let mut agent = QLearningAgent::new(table, config);
        agent.step(&mut world);

        // A bump leaves the state unchanged, so the backup target is
        // -10 + 0.5 * 1.0 and the value drops to 1 + 0.1 * (-9.5 - 1).
        let values = agent.table().get(&state).expect("state was visited");
        assert!((values[Action::Forward as usize] + 0.05).abs() < 1e-9);
    }
}
