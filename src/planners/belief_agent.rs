//! Player1: Bayesian inference over Player2's hidden type plus a
//! position-agnostic joint-action value table.

use crate::infra::{
    BeliefAgentConfig, GridAction, NUM_P1_ACTIONS, NUM_P2_ACTIONS, P1Action, P2Action, Position,
};
use crate::state::EpisodeHistory;

use super::belief::{Belief, HiddenType, OpponentModel, ValueEstimates};

#[derive(Debug, Clone)]
pub struct BeliefAgent {
    config: BeliefAgentConfig,
    pub position: Position,
    belief: Belief,
    model: OpponentModel,
    /// Q1 over the full action cross product, indexed `[a1][a2]`
    q_values: [[f64; NUM_P2_ACTIONS]; NUM_P1_ACTIONS],
    /// VI as computed by the latest `choose_action`
    value_estimates: ValueEstimates,
}

impl BeliefAgent {
    pub fn new(config: BeliefAgentConfig, position: Position) -> Self {
        Self {
            config,
            position,
            belief: Belief::uniform(),
            model: OpponentModel::uniform(),
            q_values: [[0.0; NUM_P2_ACTIONS]; NUM_P1_ACTIONS],
            value_estimates: ValueEstimates::default(),
        }
    }

    pub fn belief(&self) -> &Belief {
        &self.belief
    }

    pub fn value_estimates(&self) -> &ValueEstimates {
        &self.value_estimates
    }

    pub fn q_value(&self, a1: P1Action, a2: P2Action) -> f64 {
        self.q_values[a1.index()][a2.index()]
    }

    /// Product of the modelled probabilities of every Player2 action in `history`.
    pub fn likelihood_of_history(&self, history: &EpisodeHistory, hidden_type: HiddenType) -> f64 {
        self.model.likelihood(history.p2_actions(), hidden_type)
    }

    /// Posterior over types given a finished episode, without mutating the agent.
    pub fn posterior(&self, history: &EpisodeHistory) -> Belief {
        self.belief.posterior(|t| self.likelihood_of_history(history, t))
    }

    #[tracing::instrument(level = "trace", skip_all, fields(turns = history.turns()))]
    pub fn update_belief(&mut self, history: &EpisodeHistory) {
        self.belief = self.posterior(history);
        tracing::trace!(
            cooperative = self.belief.get(HiddenType::Cooperative),
            competitive = self.belief.get(HiddenType::Competitive),
            "belief updated"
        );
    }

    /// Belief-weighted value of `a1` marginalized over the opponent model.
    fn expected_value(&self, a1: P1Action, opponent_actions: &[P2Action]) -> f64 {
        HiddenType::ALL
            .iter()
            .map(|&t| {
                let inner: f64 = opponent_actions
                    .iter()
                    .map(|&a2| self.q_value(a1, a2) * self.model.probability(t, a2))
                    .sum();
                self.belief.get(t) * inner
            })
            .sum()
    }

    /// Recomputes VI for every own action and returns its first maximizer.
    pub fn choose_action(&mut self, opponent_actions: &[P2Action]) -> P1Action {
        for &a1 in P1Action::ALL {
            let value = self.expected_value(a1, opponent_actions);
            self.value_estimates.set(a1, value);
        }
        self.value_estimates.best_action()
    }

    /// TD update of `Q1[a1, a2]`.
    ///
    /// The bootstrap reuses the VI vector from this turn's `choose_action`
    /// and weights it by the raw likelihood of `history` under each type,
    /// not by the posterior belief.
    pub fn update_q(
        &mut self,
        history: &EpisodeHistory,
        a1: P1Action,
        a2: P2Action,
        reward: f64,
    ) -> f64 {
        let max_next = self.value_estimates.max();
        let expected: f64 = HiddenType::ALL
            .iter()
            .map(|&t| self.likelihood_of_history(history, t) * max_next)
            .sum();

        let current = self.q_value(a1, a2);
        let target = reward + self.config.gamma * expected;
        let updated = current + self.config.alpha * (target - current);
        self.q_values[a1.index()][a2.index()] = updated;
        updated
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::infra::JointPosition;

    fn agent() -> BeliefAgent {
        BeliefAgent::new(BeliefAgentConfig::default(), Position::new(2, 2))
    }

    fn history_with(actions: &[P2Action]) -> EpisodeHistory {
        let state = JointPosition::new(Position::new(2, 2), Position::new(3, 3));
        let mut history = EpisodeHistory::seeded(state);
        for &a2 in actions {
            history.record(state, P1Action::Stay, a2);
        }
        history
    }

    #[test]
    fn test_q_table_starts_at_zero() {
        let agent = agent();
        for &a1 in P1Action::ALL {
            for &a2 in P2Action::ALL {
                assert_eq!(agent.q_value(a1, a2), 0.0);
            }
        }
    }

    #[test]
    fn test_empty_history_likelihood_is_one() {
        let agent = agent();
        let history = EpisodeHistory::new();
        for t in HiddenType::ALL {
            assert_eq!(agent.likelihood_of_history(&history, t), 1.0);
        }
    }

    #[test]
    fn test_update_belief_stays_normalized_and_is_repeatable() {
        let mut agent = agent();
        let history = history_with(&[P2Action::North, P2Action::East, P2Action::Stay]);

        let first = agent.posterior(&history);
        let second = agent.posterior(&history);
        assert_eq!(first, second);

        agent.update_belief(&history);
        assert!((agent.belief().total() - 1.0).abs() < 1e-9);
        for t in HiddenType::ALL {
            assert!((0.0..=1.0).contains(&agent.belief().get(t)));
        }
    }

    #[test]
    fn test_choose_action_without_experience_stays() {
        let mut agent = agent();
        assert_eq!(agent.choose_action(P2Action::ALL), P1Action::Stay);
        assert_eq!(agent.value_estimates().max(), 0.0);
    }

    #[test]
    fn test_choose_action_follows_learned_values() {
        let mut agent = agent();
        let history = EpisodeHistory::new();
        agent.choose_action(P2Action::ALL);
        agent.update_q(&history, P1Action::West, P2Action::South, 1.0);

        assert_eq!(agent.choose_action(P2Action::ALL), P1Action::West);
        // 0.5 * (0.1 * 0.2) + 0.5 * (0.1 * 0.2)
        assert!((agent.value_estimates().get(P1Action::West) - 0.02).abs() < 1e-12);
    }

    #[test]
    fn test_update_q_uses_likelihood_weighted_bootstrap() {
        let mut agent = agent();
        agent.q_values[P1Action::North.index()] = [1.0; NUM_P2_ACTIONS];
        agent.choose_action(P2Action::ALL);
        assert!((agent.value_estimates().max() - 1.0).abs() < 1e-12);

        // two observed actions: likelihood 0.04 under each type
        let history = history_with(&[P2Action::North, P2Action::West]);
        let updated = agent.update_q(&history, P1Action::Stay, P2Action::Stay, 0.5);

        let expected = 0.1 * (0.5 + 0.9 * (0.04 + 0.04) * 1.0);
        assert!((updated - expected).abs() < 1e-12);
        assert_eq!(agent.q_value(P1Action::Stay, P2Action::Stay), updated);
    }
}
