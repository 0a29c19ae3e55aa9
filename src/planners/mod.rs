//! Learning agents
//!
//! - `BeliefAgent` (Player1): Bayesian belief over Player2's hidden type and a
//!   joint-action value table weighted by that belief
//! - `TypedQLearner` (Player2): epsilon-greedy Q-learning over joint positions
//! - `RunMetrics`: moving averages of episode outcomes

mod belief;
mod belief_agent;
mod metrics;
mod typed_q;

pub use belief::{Belief, HiddenType, OpponentModel, ValueEstimates};
pub use belief_agent::BeliefAgent;
pub use metrics::{MetricsObserver, MovingAverage, RunMetrics};
pub use typed_q::TypedQLearner;
