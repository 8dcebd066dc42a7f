/// Q-learning agent and per-step control cycle
pub mod agent;

/// Implementations of strategies for time-decaying hyperparameters
pub mod decay;

/// World interface consumed by the agent
pub mod env;

/// Exploration policies
pub mod exploration;

/// Testing environments
pub mod gym;

/// Reward rules
pub mod reward;

/// Episode driver and persistence checkpoints
pub mod runner;

/// State encoding
pub mod state;

/// Value table and its binary persistence
pub mod table;

mod util;
