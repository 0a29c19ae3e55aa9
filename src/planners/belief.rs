//! Hidden opponent type, Player1's belief over it, and the fixed per-type
//! opponent action model the belief is inferred against.

use std::fmt;

use serde::{Deserialize, Serialize};

use crate::infra::{Error, GridAction, NUM_P1_ACTIONS, NUM_P2_ACTIONS, P1Action, P2Action};

/// Player2's latent disposition, redrawn every episode.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum HiddenType {
    Cooperative,
    Competitive,
}

impl HiddenType {
    pub const ALL: [HiddenType; 2] = [HiddenType::Cooperative, HiddenType::Competitive];

    pub fn index(&self) -> usize {
        match self {
            HiddenType::Cooperative => 0,
            HiddenType::Competitive => 1,
        }
    }
}

impl TryFrom<u8> for HiddenType {
    type Error = Error;

    fn try_from(value: u8) -> Result<Self, Self::Error> {
        match value {
            0 => Ok(HiddenType::Cooperative),
            1 => Ok(HiddenType::Competitive),
            _ => Err(Error::InvalidType { value }),
        }
    }
}

impl fmt::Display for HiddenType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            HiddenType::Cooperative => f.write_str("cooperative"),
            HiddenType::Competitive => f.write_str("competitive"),
        }
    }
}

/// Probability of each hidden type. Exported as `{"0": p_coop, "1": p_comp}`.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(into = "BeliefWire", from = "BeliefWire")]
pub struct Belief {
    probs: [f64; 2],
}

#[derive(Serialize, Deserialize)]
struct BeliefWire {
    #[serde(rename = "0")]
    cooperative: f64,
    #[serde(rename = "1")]
    competitive: f64,
}

impl From<Belief> for BeliefWire {
    fn from(belief: Belief) -> Self {
        Self {
            cooperative: belief.probs[0],
            competitive: belief.probs[1],
        }
    }
}

impl From<BeliefWire> for Belief {
    fn from(wire: BeliefWire) -> Self {
        Self {
            probs: [wire.cooperative, wire.competitive],
        }
    }
}

impl Default for Belief {
    fn default() -> Self {
        Self::uniform()
    }
}

impl Belief {
    pub fn uniform() -> Self {
        Self { probs: [0.5, 0.5] }
    }

    pub fn get(&self, hidden_type: HiddenType) -> f64 {
        self.probs[hidden_type.index()]
    }

    pub fn total(&self) -> f64 {
        self.probs.iter().sum()
    }

    /// Bayes' rule with per-type likelihoods. Zero total evidence keeps the prior.
    pub fn posterior(&self, likelihood: impl Fn(HiddenType) -> f64) -> Belief {
        let joint = HiddenType::ALL.map(|t| likelihood(t) * self.get(t));
        let evidence: f64 = joint.iter().sum();

        if evidence > 0.0 {
            Belief {
                probs: joint.map(|p| p / evidence),
            }
        } else {
            *self
        }
    }
}

/// Fixed per-type distribution over Player2's actions. Never learned.
#[derive(Debug, Clone)]
pub struct OpponentModel {
    probs: [[f64; NUM_P2_ACTIONS]; 2],
}

impl Default for OpponentModel {
    fn default() -> Self {
        Self::uniform()
    }
}

impl OpponentModel {
    pub fn uniform() -> Self {
        let p = 1.0 / NUM_P2_ACTIONS as f64;
        Self {
            probs: [[p; NUM_P2_ACTIONS]; 2],
        }
    }

    pub fn probability(&self, hidden_type: HiddenType, action: P2Action) -> f64 {
        self.probs[hidden_type.index()][action.index()]
    }

    /// Probability of an observed action sequence; 1 for an empty sequence.
    pub fn likelihood(&self, actions: &[P2Action], hidden_type: HiddenType) -> f64 {
        actions
            .iter()
            .map(|&a| self.probability(hidden_type, a))
            .product()
    }
}

/// Player1's per-action value estimate (VI), exported as a label-keyed map
/// in enumeration order.
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
#[serde(into = "ValueEstimatesWire", from = "ValueEstimatesWire")]
pub struct ValueEstimates {
    values: [f64; NUM_P1_ACTIONS],
}

#[derive(Serialize, Deserialize)]
struct ValueEstimatesWire {
    #[serde(rename = "0")]
    stay: f64,
    #[serde(rename = "N")]
    north: f64,
    #[serde(rename = "E")]
    east: f64,
    #[serde(rename = "W")]
    west: f64,
    #[serde(rename = "S")]
    south: f64,
    #[serde(rename = "Z")]
    zap: f64,
}

impl From<ValueEstimates> for ValueEstimatesWire {
    fn from(estimates: ValueEstimates) -> Self {
        let [stay, north, east, west, south, zap] = estimates.values;
        Self {
            stay,
            north,
            east,
            west,
            south,
            zap,
        }
    }
}

impl From<ValueEstimatesWire> for ValueEstimates {
    fn from(wire: ValueEstimatesWire) -> Self {
        Self {
            values: [wire.stay, wire.north, wire.east, wire.west, wire.south, wire.zap],
        }
    }
}

impl ValueEstimates {
    pub fn get(&self, action: P1Action) -> f64 {
        self.values[action.index()]
    }

    pub fn set(&mut self, action: P1Action, value: f64) {
        self.values[action.index()] = value;
    }

    pub fn max(&self) -> f64 {
        self.values.iter().copied().fold(f64::NEG_INFINITY, f64::max)
    }

    /// First action in enumeration order with the highest estimate.
    pub fn best_action(&self) -> P1Action {
        crate::infra::greedy(|a: P1Action| self.get(a))
    }
}
