use crate::env::{Action, Snapshot, World};

/// Reward magnitude for every rule, in priority order
///
/// Signs follow the classic large-magnitude scale of the course scoring:
/// terminal events dominate at ±1000, mid-weight events at ±100..500, and
/// shaping terms stay small so they never outweigh a real outcome.
#[derive(Debug, Clone, PartialEq)]
pub struct RewardConfig {
    /// Turning in place
    pub turn: f64,
    /// Walking into the grid boundary
    pub bump: f64,
    /// Shooting with no arrow left
    pub wasted_shot: f64,
    /// Sharing a cell with the live wumpus
    pub eaten: f64,
    /// Holding the gold
    pub gold: f64,
    /// Falling into a pit the agent was not already in
    pub pit: f64,
    /// The arrow was spent and the wumpus died
    pub wumpus_killed: f64,
    /// The arrow was spent and the wumpus survived
    pub arrow_missed: f64,
    /// Stepping onto a previously unrevealed cell
    pub explored: f64,
}

impl Default for RewardConfig {
    fn default() -> Self {
        Self {
            turn: -1.0,
            bump: -10.0,
            wasted_shot: -50.0,
            eaten: -1000.0,
            gold: 1000.0,
            pit: -500.0,
            wumpus_killed: 100.0,
            arrow_missed: -100.0,
            explored: 10.0,
        }
    }
}

impl RewardConfig {
    /// Score the transition from `before` through `action` into the current world
    ///
    /// Rules are evaluated in a fixed priority order and the first match wins.
    pub fn evaluate<W: World + ?Sized>(&self, before: &Snapshot, action: Action, world: &W) -> f64 {
        let (x, y) = world.position();

        if matches!(action, Action::TurnLeft | Action::TurnRight) {
            return self.turn;
        }
        if action == Action::Forward && (x, y) == before.position {
            return self.bump;
        }
        if action == Action::Shoot && !before.has_arrow {
            return self.wasted_shot;
        }
        if world.wumpus_alive() && world.has_wumpus(x, y) {
            return self.eaten;
        }
        if world.has_gold() {
            return self.gold;
        }
        if world.has_pit(x, y) && !((x, y) == before.position && before.in_pit) {
            return self.pit;
        }
        if before.has_arrow && !world.has_arrow() {
            return if world.wumpus_alive() {
                self.arrow_missed
            } else {
                self.wumpus_killed
            };
        }
        if action == Action::Forward && before.ahead_unseen {
            return self.explored;
        }
        0.0
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::env::Command;
    use crate::gym::WumpusWorld;

    #[test]
    fn turning_is_penalized_first() {
        let world = WumpusWorld::from_layout("A.\n..");
        let before = world.snapshot();
        let rewards = RewardConfig::default();
        assert_eq!(
            rewards.evaluate(&before, Action::TurnLeft, &world),
            rewards.turn
        );
    }

    #[test]
    fn wall_bump_beats_exploration_bonus() {
        let mut world = WumpusWorld::from_layout("A.\n..");
        // Face the boundary and walk into it.
        world.perform(Command::TurnLeft);
        world.perform(Command::TurnLeft);
        let before = world.snapshot();
        world.perform(Command::Forward);
        let rewards = RewardConfig::default();
        assert_eq!(
            rewards.evaluate(&before, Action::Forward, &world),
            rewards.bump
        );
    }

    #[test]
    fn exploring_a_fresh_cell_earns_the_bonus() {
        let mut world = WumpusWorld::from_layout("A.\n..");
        let before = world.snapshot();
        assert!(before.ahead_unseen);
        world.perform(Command::Forward);
        let rewards = RewardConfig::default();
        assert_eq!(
            rewards.evaluate(&before, Action::Forward, &world),
            rewards.explored
        );
    }

    #[test]
    fn revisiting_a_cell_is_neutral() {
        let mut world = WumpusWorld::from_layout("A...\n....");
        world.perform(Command::Forward);
        world.perform(Command::TurnLeft);
        world.perform(Command::TurnLeft);
        let before = world.snapshot();
        assert!(!before.ahead_unseen);
        world.perform(Command::Forward);
        let rewards = RewardConfig::default();
        assert_eq!(rewards.evaluate(&before, Action::Forward, &world), 0.0);
    }

    #[test]
    fn spent_arrow_scores_by_outcome() {
        let rewards = RewardConfig::default();

        // Wumpus straight ahead: the shot connects.
        let mut world = WumpusWorld::from_layout("A.W.\n....");
        let before = world.snapshot();
        world.perform(Command::Shoot);
        assert!(!world.wumpus_alive());
        assert_eq!(
            rewards.evaluate(&before, Action::Shoot, &world),
            rewards.wumpus_killed
        );

        // Wumpus off the firing line: the arrow is gone for nothing.
        let mut world = WumpusWorld::from_layout("A...\n..W.");
        let before = world.snapshot();
        world.perform(Command::Shoot);
        assert!(world.wumpus_alive());
        assert_eq!(
            rewards.evaluate(&before, Action::Shoot, &world),
            rewards.arrow_missed
        );
    }

    #[test]
    fn shooting_without_an_arrow_is_wasted() {
        let mut world = WumpusWorld::from_layout("A...\n..W.");
        world.perform(Command::Shoot);
        let before = world.snapshot();
        assert!(!before.has_arrow);
        world.perform(Command::Shoot);
        let rewards = RewardConfig::default();
        assert_eq!(
            rewards.evaluate(&before, Action::Shoot, &world),
            rewards.wasted_shot
        );
    }

    #[test]
    fn walking_into_the_wumpus_is_terminal() {
        let mut world = WumpusWorld::from_layout("AW\n..");
        let before = world.snapshot();
        world.perform(Command::Forward);
        let rewards = RewardConfig::default();
        assert_eq!(
            rewards.evaluate(&before, Action::Forward, &world),
            rewards.eaten
        );
    }

    #[test]
    fn lingering_in_a_pit_is_not_re_penalized() {
        let mut world = WumpusWorld::from_layout("AP..\n...W");
        let before = world.snapshot();
        world.perform(Command::Forward);
        let rewards = RewardConfig::default();
        assert_eq!(
            rewards.evaluate(&before, Action::Forward, &world),
            rewards.pit
        );

        // Still on the pit cell one action later: rule 6 must not fire again.
        let before = world.snapshot();
        assert!(before.in_pit);
        world.perform(Command::Shoot);
        assert_eq!(
            rewards.evaluate(&before, Action::Shoot, &world),
            rewards.arrow_missed
        );
    }
}
