//! Episode orchestration: reward generation, zap termination and both
//! agents' learning updates across a multi-episode run.

use rand::Rng;

use crate::infra::{
    EpisodeSummary, GameObserver, GridAction, JointPosition, P1Action, P2Action, Result,
    SimulationConfig,
};
use crate::planners::{BeliefAgent, HiddenType, TypedQLearner};
use crate::state::{EpisodeHistory, EpisodeRecord, GridEnvironment, TrajectoryLog, TurnRecord};

/// Learnable state of both players, carried from one episode into the next.
#[derive(Debug, Clone)]
pub struct Agents {
    pub player1: BeliefAgent,
    pub player2: TypedQLearner,
}

impl Agents {
    pub fn new(config: &SimulationConfig, env: &GridEnvironment) -> Self {
        Self {
            player1: BeliefAgent::new(config.player1.clone(), env.p1_position),
            player2: TypedQLearner::new(
                config.player2.clone(),
                env.state_space(),
                env.p2_position,
            ),
        }
    }
}

/// Fixed action sequences overriding the policies turn by turn.
/// Turns beyond a script's length fall back to the policy.
#[derive(Debug, Clone, Default)]
pub struct Script {
    pub player1: Vec<P1Action>,
    pub player2: Vec<P2Action>,
}

/// Resolved positions and rewards of one turn
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct TurnOutcome {
    pub next: JointPosition,
    pub r1: f64,
    pub r2: f64,
    /// Zap landed within reach of Player2; the episode ends after this turn
    pub terminal: bool,
}

/// What an episode hands to the next one
#[derive(Debug)]
pub struct EpisodeOutcome {
    pub agents: Agents,
    /// History the next episode's belief update consumes
    pub history: EpisodeHistory,
    pub summary: EpisodeSummary,
}

pub struct Game {
    config: SimulationConfig,
    env: GridEnvironment,
    observer: Box<dyn GameObserver>,
    trajectory: TrajectoryLog,
}

impl Game {
    /// `env` must already have its cells assigned.
    pub fn new(
        config: SimulationConfig,
        env: GridEnvironment,
        observer: impl GameObserver + 'static,
    ) -> Self {
        Self {
            config,
            env,
            observer: Box::new(observer),
            trajectory: TrajectoryLog::new(),
        }
    }

    pub fn env(&self) -> &GridEnvironment {
        &self.env
    }

    pub fn trajectory(&self) -> &TrajectoryLog {
        &self.trajectory
    }

    pub fn into_trajectory(self) -> TrajectoryLog {
        self.trajectory
    }

    /// Plays `num_episodes` episodes in order and returns the trained agents.
    pub fn run(&mut self, mut agents: Agents, rng: &mut impl Rng) -> Result<Agents> {
        self.observer.on_run_start(&self.config, &self.env);
        tracing::info!(
            "Starting run of {} episodes x {} turns",
            self.config.num_episodes,
            self.config.turns
        );

        let mut history = EpisodeHistory::new();
        for episode in 0..self.config.num_episodes {
            let outcome = self.play_episode(episode, agents, history, rng)?;
            agents = outcome.agents;
            history = outcome.history;
        }

        self.observer.on_run_finished(&self.trajectory);
        Ok(agents)
    }

    pub fn play_episode(
        &mut self,
        episode: usize,
        agents: Agents,
        previous: EpisodeHistory,
        rng: &mut impl Rng,
    ) -> Result<EpisodeOutcome> {
        self.play_scripted_episode(episode, agents, previous, &Script::default(), rng)
    }

    /// One episode: init, up to `turns` turns, then the trajectory record is closed.
    #[tracing::instrument(level = "trace", skip_all, fields(episode = episode))]
    pub fn play_scripted_episode(
        &mut self,
        episode: usize,
        mut agents: Agents,
        previous: EpisodeHistory,
        script: &Script,
        rng: &mut impl Rng,
    ) -> Result<EpisodeOutcome> {
        // Episode init
        agents.player1.update_belief(&previous);
        agents.player2.assign_type(self.config.p_cooperative, rng);
        self.env.assign_players(rng)?;
        agents.player1.position = self.env.p1_position;
        agents.player2.position = self.env.p2_position;

        let hidden_type = agents.player2.hidden_type();
        let belief = *agents.player1.belief();
        let mut history = EpisodeHistory::seeded(self.env.joint_position());
        let mut record = EpisodeRecord::new(belief);
        self.observer
            .on_episode_start(episode, hidden_type, &belief, &self.env);

        let mut zapped = false;
        let (mut p1_return, mut p2_return) = (0.0, 0.0);

        for turn in 0..self.config.turns {
            let state = history.last_state()?;

            let mut a1 = agents.player1.choose_action(P2Action::ALL);
            if let Some(&scripted) = script.player1.get(turn) {
                a1 = scripted;
            }
            let a2 = match script.player2.get(turn) {
                Some(&scripted) => scripted,
                None => agents.player2.choose_action(&state, rng),
            };

            let outcome = self.resolve_turn(&state, a1, a2, hidden_type);
            agents.player1.position = outcome.next.p1;
            agents.player2.position = outcome.next.p2;

            let q1 = agents.player1.update_q(&history, a1, a2, outcome.r1);
            let q2 = agents.player2.update_q(&state, a2, outcome.r2, &outcome.next);

            // A terminating zap is logged but never enters the history.
            if !outcome.terminal {
                history.record(outcome.next, a1, a2);
            }

            let turn_record = TurnRecord {
                p1t: state.p1,
                p2t: state.p2,
                a1t: a1,
                a2t: a2,
                r1: outcome.r1,
                r2: outcome.r2,
                q1,
                q2,
                vi1: *agents.player1.value_estimates(),
            };
            self.observer.on_turn(episode, turn, &turn_record);
            record.turns.push(turn_record);

            p1_return += outcome.r1;
            p2_return += outcome.r2;

            if outcome.terminal {
                zapped = true;
                break;
            }
        }

        // Episode end
        let summary = EpisodeSummary {
            episode,
            hidden_type,
            belief,
            turns: record.turns.len(),
            zapped,
            p1_return,
            p2_return,
        };
        self.trajectory.insert(episode, record);
        self.observer.on_episode_end(&summary);

        Ok(EpisodeOutcome {
            agents,
            history,
            summary,
        })
    }

    /// Moves both players independently and applies the zap and reward rules.
    pub fn resolve_turn(
        &self,
        state: &JointPosition,
        a1: P1Action,
        a2: P2Action,
        hidden_type: HiddenType,
    ) -> TurnOutcome {
        let next = JointPosition::new(
            self.env.resolve_move(state.p1, a1),
            self.env.resolve_move(state.p2, a2),
        );

        if a1 == P1Action::Zap && next.p1.is_within_reach(&next.p2) {
            let reward = match hidden_type {
                HiddenType::Cooperative => -self.config.zap_punishment,
                HiddenType::Competitive => 0.0,
            };
            return TurnOutcome {
                next,
                r1: reward,
                r2: reward,
                terminal: true,
            };
        }

        let (r1, r2) = match hidden_type {
            HiddenType::Cooperative if self.env.is_green(&next.p2) => (1.0, 1.0),
            HiddenType::Competitive if self.env.is_red(&next.p2) => (
                -self.config.competition_reward,
                self.config.competition_reward,
            ),
            _ => (0.0, 0.0),
        };

        TurnOutcome {
            next,
            r1,
            r2,
            terminal: false,
        }
    }
}
