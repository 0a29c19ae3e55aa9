use crate::infra::{Error, JointPosition, P1Action, P2Action, Result};

/// Joint positions and actions of the episode in progress.
///
/// Once seeded, `states` holds one more entry than each action list.
#[derive(Debug, Clone, Default)]
pub struct EpisodeHistory {
    states: Vec<JointPosition>,
    p1_actions: Vec<P1Action>,
    p2_actions: Vec<P2Action>,
}

impl EpisodeHistory {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn seeded(initial: JointPosition) -> Self {
        Self {
            states: vec![initial],
            p1_actions: Vec::new(),
            p2_actions: Vec::new(),
        }
    }

    pub fn record(&mut self, next: JointPosition, a1: P1Action, a2: P2Action) {
        self.states.push(next);
        self.p1_actions.push(a1);
        self.p2_actions.push(a2);
    }

    pub fn last_state(&self) -> Result<JointPosition> {
        self.states.last().copied().ok_or(Error::EmptyHistory)
    }

    pub fn states(&self) -> &[JointPosition] {
        &self.states
    }

    pub fn p1_actions(&self) -> &[P1Action] {
        &self.p1_actions
    }

    pub fn p2_actions(&self) -> &[P2Action] {
        &self.p2_actions
    }

    pub fn turns(&self) -> usize {
        self.p2_actions.len()
    }

    pub fn is_empty(&self) -> bool {
        self.states.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::infra::Position;

    #[test]
    fn test_empty_history_has_no_state() {
        let history = EpisodeHistory::new();
        assert!(history.is_empty());
        assert!(matches!(history.last_state(), Err(Error::EmptyHistory)));
    }

    #[test]
    fn test_record_keeps_lists_parallel() {
        let start = JointPosition::new(Position::new(2, 2), Position::new(3, 3));
        let next = JointPosition::new(Position::new(2, 2), Position::new(3, 2));
        let mut history = EpisodeHistory::seeded(start);
        history.record(next, P1Action::Stay, P2Action::North);

        assert_eq!(history.states().len(), history.turns() + 1);
        assert_eq!(history.p1_actions().len(), history.turns());
        assert_eq!(history.last_state().unwrap(), next);
        assert_eq!(history.p2_actions(), &[P2Action::North]);
    }
}
