pub mod game;
pub mod infra;
pub mod planners;
pub mod state;

// Re-export commonly used types for convenience
pub use game::{Agents, EpisodeOutcome, Game, Script, TurnOutcome};
pub use infra::{Error, P1Action, P2Action, Position, Result, SimulationConfig};
pub use planners::{BeliefAgent, HiddenType, TypedQLearner};
pub use state::{GridEnvironment, TrajectoryLog};
