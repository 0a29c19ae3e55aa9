use crate::infra::SimulationConfig;
use crate::planners::{Belief, HiddenType};
use crate::state::{GridEnvironment, TrajectoryLog, TurnRecord};

/// Outcome of one finished episode
#[derive(Debug, Clone)]
pub struct EpisodeSummary {
    pub episode: usize,
    pub hidden_type: HiddenType,
    /// Player1's belief at episode start
    pub belief: Belief,
    pub turns: usize,
    /// Ended early by a zap landing next to Player2
    pub zapped: bool,
    pub p1_return: f64,
    pub p2_return: f64,
}

/// Trait for observing run events during a simulation
pub trait GameObserver {
    /// Called once after the layout is assigned, before the first episode
    fn on_run_start(&mut self, config: &SimulationConfig, env: &GridEnvironment);

    /// Called after spawn positions and the hidden type are drawn
    fn on_episode_start(
        &mut self,
        _episode: usize,
        _hidden_type: HiddenType,
        _belief: &Belief,
        _env: &GridEnvironment,
    ) {
        // Default implementation does nothing
    }

    /// Called after each turn's learning updates
    fn on_turn(&mut self, _episode: usize, _turn: usize, _record: &TurnRecord) {
        // Default implementation does nothing
    }

    /// Called when an episode's trajectory record is closed
    fn on_episode_end(&mut self, summary: &EpisodeSummary);

    /// Called after the last episode
    fn on_run_finished(&mut self, trajectory: &TrajectoryLog);
}
