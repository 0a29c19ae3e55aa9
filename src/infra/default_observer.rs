use tracing::{debug, info};

use crate::infra::{EpisodeSummary, GameObserver, SimulationConfig};
use crate::planners::{Belief, HiddenType};
use crate::state::{GridEnvironment, TrajectoryLog, TurnRecord};

pub struct DefaultObserver;

impl GameObserver for DefaultObserver {
    fn on_run_start(&mut self, config: &SimulationConfig, env: &GridEnvironment) {
        info!("Run started");
        if let Some(seed) = config.seed {
            info!("- seed: {}", seed);
        }
        info!("- grid: {}x{} ({:?} layout)", env.width(), env.height(), env.mode());
        info!(
            "- episodes: {}, turns: {}, B: {}, C: {}",
            config.num_episodes, config.turns, config.competition_reward, config.zap_punishment
        );
        debug!("\n{}", env.draw_ascii_map());
    }

    fn on_episode_start(
        &mut self,
        episode: usize,
        hidden_type: HiddenType,
        belief: &Belief,
        env: &GridEnvironment,
    ) {
        debug!(
            "episode {} start: type={}, belief(coop)={:.4}, p1={:?}, p2={:?}",
            episode,
            hidden_type,
            belief.get(HiddenType::Cooperative),
            env.p1_position,
            env.p2_position,
        );
    }

    fn on_turn(&mut self, episode: usize, turn: usize, record: &TurnRecord) {
        debug!(
            "episode {} turn {}: a1={} a2={} r=({}, {}) Q1={:.4} Q2={:.4}",
            episode, turn, record.a1t, record.a2t, record.r1, record.r2, record.q1, record.q2
        );
    }

    fn on_episode_end(&mut self, summary: &EpisodeSummary) {
        if summary.zapped {
            debug!(
                "episode {} ended by zap after {} turns ({})",
                summary.episode, summary.turns, summary.hidden_type
            );
        }
    }

    fn on_run_finished(&mut self, trajectory: &TrajectoryLog) {
        info!("Run finished with {} episodes recorded", trajectory.len());
    }
}
