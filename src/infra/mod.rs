mod action;
mod composite_observer;
mod config;
mod default_observer;
mod error;
mod export;
mod game_observer;
mod types;

pub use action::{
    GridAction, NUM_P1_ACTIONS, NUM_P2_ACTIONS, P1Action, P2Action, greedy, parse_script,
};
pub use composite_observer::CompositeObserver;
pub use config::{BeliefAgentConfig, GridConfig, LayoutMode, QLearnerConfig, SimulationConfig};
pub use default_observer::DefaultObserver;
pub use error::{Error, Result};
pub use export::{
    ENVIRONMENT_SCHEMA_VERSION, EnvironmentLayout, ExportWriter, TRAJECTORY_SCHEMA_VERSION,
};
pub use game_observer::{EpisodeSummary, GameObserver};
pub use types::{JointPosition, Position, StateSpace};
