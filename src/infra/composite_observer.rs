use crate::infra::{EpisodeSummary, GameObserver, SimulationConfig};
use crate::planners::{Belief, HiddenType};
use crate::state::{GridEnvironment, TrajectoryLog, TurnRecord};

pub struct CompositeObserver {
    observers: Vec<Box<dyn GameObserver>>,
}

impl CompositeObserver {
    pub fn new(observers: Vec<Box<dyn GameObserver>>) -> Self {
        Self { observers }
    }
}

impl GameObserver for CompositeObserver {
    fn on_run_start(&mut self, config: &SimulationConfig, env: &GridEnvironment) {
        for observer in &mut self.observers {
            observer.on_run_start(config, env);
        }
    }

    fn on_episode_start(
        &mut self,
        episode: usize,
        hidden_type: HiddenType,
        belief: &Belief,
        env: &GridEnvironment,
    ) {
        for observer in &mut self.observers {
            observer.on_episode_start(episode, hidden_type, belief, env);
        }
    }

    fn on_turn(&mut self, episode: usize, turn: usize, record: &TurnRecord) {
        for observer in &mut self.observers {
            observer.on_turn(episode, turn, record);
        }
    }

    fn on_episode_end(&mut self, summary: &EpisodeSummary) {
        for observer in &mut self.observers {
            observer.on_episode_end(summary);
        }
    }

    fn on_run_finished(&mut self, trajectory: &TrajectoryLog) {
        for observer in &mut self.observers {
            observer.on_run_finished(trajectory);
        }
    }
}
