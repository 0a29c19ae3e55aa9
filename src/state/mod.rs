mod grid;
mod history;
mod trajectory;

pub use grid::GridEnvironment;
pub use history::EpisodeHistory;
pub use trajectory::{EpisodeRecord, TrajectoryLog, TurnRecord};
