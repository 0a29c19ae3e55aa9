//! Player2: epsilon-greedy tabular Q-learning over joint positions, with a
//! hidden type redrawn every episode.

use rand::Rng;
use rand::seq::IndexedRandom;

use crate::infra::{
    GridAction, JointPosition, NUM_P2_ACTIONS, P2Action, Position, QLearnerConfig, StateSpace,
};

use super::belief::HiddenType;

#[derive(Debug, Clone)]
pub struct TypedQLearner {
    config: QLearnerConfig,
    pub position: Position,
    hidden_type: HiddenType,
    forced_type: Option<HiddenType>,
    space: StateSpace,
    /// Q2 rows indexed by `StateSpace::state_index`
    q_values: Vec<[f64; NUM_P2_ACTIONS]>,
}

impl TypedQLearner {
    pub fn new(config: QLearnerConfig, space: StateSpace, position: Position) -> Self {
        Self {
            config,
            position,
            hidden_type: HiddenType::Cooperative,
            forced_type: None,
            space,
            q_values: vec![[0.0; NUM_P2_ACTIONS]; space.state_count()],
        }
    }

    pub fn hidden_type(&self) -> HiddenType {
        self.hidden_type
    }

    /// Pins the hidden type for scripted scenarios; `None` resumes random draws.
    pub fn force_type(&mut self, hidden_type: Option<HiddenType>) {
        self.forced_type = hidden_type;
        if let Some(t) = hidden_type {
            self.hidden_type = t;
        }
    }

    /// Bernoulli draw: cooperative with probability `p_cooperative`.
    pub fn assign_type(&mut self, p_cooperative: f64, rng: &mut impl Rng) {
        self.hidden_type = match self.forced_type {
            Some(t) => t,
            None if rng.random_bool(p_cooperative) => HiddenType::Cooperative,
            None => HiddenType::Competitive,
        };
    }

    fn row(&self, state: &JointPosition) -> &[f64; NUM_P2_ACTIONS] {
        &self.q_values[self.space.state_index(state)]
    }

    pub fn q_value(&self, state: &JointPosition, action: P2Action) -> f64 {
        self.row(state)[action.index()]
    }

    pub fn max_q(&self, state: &JointPosition) -> f64 {
        self.row(state).iter().copied().fold(f64::NEG_INFINITY, f64::max)
    }

    /// First action in enumeration order with the highest Q-value.
    pub fn greedy_action(&self, state: &JointPosition) -> P2Action {
        let row = self.row(state);
        crate::infra::greedy(|a: P2Action| row[a.index()])
    }

    /// Epsilon-greedy selection
    pub fn choose_action(&self, state: &JointPosition, rng: &mut impl Rng) -> P2Action {
        if rng.random::<f64>() < self.config.epsilon {
            if let Some(&action) = P2Action::ALL.choose(rng) {
                return action;
            }
        }
        self.greedy_action(state)
    }

    /// Q(s,a) ← Q(s,a) + α[r + γ max_a' Q(s',a') - Q(s,a)]
    pub fn update_q(
        &mut self,
        state: &JointPosition,
        action: P2Action,
        reward: f64,
        next_state: &JointPosition,
    ) -> f64 {
        let max_next = self.max_q(next_state);
        let index = self.space.state_index(state);
        let current = self.q_values[index][action.index()];
        let updated =
            current + self.config.alpha * (reward + self.config.gamma * max_next - current);
        self.q_values[index][action.index()] = updated;
        updated
    }
}
