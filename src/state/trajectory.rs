use std::collections::BTreeMap;
use std::fs::File;
use std::io::BufReader;
use std::path::Path;

use serde::{Deserialize, Serialize};

use crate::infra::{Error, P1Action, P2Action, Position, Result};
use crate::planners::{Belief, ValueEstimates};

/// One turn as exported: pre-move positions, actions, rewards and the
/// updated values of the actions taken.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TurnRecord {
    pub p1t: Position,
    pub p2t: Position,
    pub a1t: P1Action,
    pub a2t: P2Action,
    pub r1: f64,
    pub r2: f64,
    #[serde(rename = "Q1")]
    pub q1: f64,
    #[serde(rename = "Q2")]
    pub q2: f64,
    #[serde(rename = "VI1")]
    pub vi1: ValueEstimates,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct EpisodeRecord {
    /// Player1's belief when the episode started
    pub belief: Belief,
    pub turns: Vec<TurnRecord>,
}

impl EpisodeRecord {
    pub fn new(belief: Belief) -> Self {
        Self {
            belief,
            turns: Vec::new(),
        }
    }
}

/// Append-only per-episode log of a run, exported keyed by the episode index
/// as a string.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct TrajectoryLog {
    episodes: BTreeMap<usize, EpisodeRecord>,
}

impl TrajectoryLog {
    pub fn new() -> Self {
        Self::default()
    }

    /// Closes an episode. Records are never replaced once written.
    pub fn insert(&mut self, episode: usize, record: EpisodeRecord) {
        debug_assert!(
            !self.episodes.contains_key(&episode),
            "episode {} recorded twice",
            episode
        );
        self.episodes.entry(episode).or_insert(record);
    }

    pub fn episode(&self, episode: usize) -> Result<&EpisodeRecord> {
        self.episodes
            .get(&episode)
            .ok_or(Error::EpisodeNotFound { episode })
    }

    pub fn len(&self) -> usize {
        self.episodes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.episodes.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = (&usize, &EpisodeRecord)> {
        self.episodes.iter()
    }

    /// True when the recorded indices are exactly `0..len()`.
    pub fn is_dense(&self) -> bool {
        self.episodes.keys().copied().eq(0..self.episodes.len())
    }

    pub fn load(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();
        let file = File::open(path)
            .map_err(|e| Error::io(format!("open trajectory {}", path.display()), e))?;
        Ok(serde_json::from_reader(BufReader::new(file))?)
    }
}
