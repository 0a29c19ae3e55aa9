#![allow(dead_code)]

use std::sync::{Arc, Mutex};

use beliefgrid::game::{Agents, Game};
use beliefgrid::infra::{EpisodeSummary, GameObserver, SimulationConfig};
use beliefgrid::state::{GridEnvironment, TrajectoryLog};
use rand::SeedableRng;
use rand::rngs::StdRng;

/// Collects episode summaries so tests can inspect them after a run
#[derive(Clone, Default)]
pub struct RecordingObserver {
    pub summaries: Arc<Mutex<Vec<EpisodeSummary>>>,
}

impl RecordingObserver {
    pub fn summaries(&self) -> Vec<EpisodeSummary> {
        self.summaries.lock().unwrap().clone()
    }
}

impl GameObserver for RecordingObserver {
    fn on_run_start(&mut self, _config: &SimulationConfig, _env: &GridEnvironment) {}

    fn on_episode_end(&mut self, summary: &EpisodeSummary) {
        self.summaries.lock().unwrap().push(summary.clone());
    }

    fn on_run_finished(&mut self, _trajectory: &TrajectoryLog) {}
}

pub fn setup(config: SimulationConfig, seed: u64) -> (Game, Agents, StdRng, RecordingObserver) {
    config.validate().unwrap();
    let mut rng = StdRng::seed_from_u64(seed);
    let mut env = GridEnvironment::new(config.grid.clone());
    env.assign_cells(&mut rng).unwrap();
    env.assign_players(&mut rng).unwrap();

    let agents = Agents::new(&config, &env);
    let observer = RecordingObserver::default();
    let game = Game::new(config, env, observer.clone());
    (game, agents, rng, observer)
}
