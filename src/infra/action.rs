use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::infra::Error;

/// Shared movement semantics of both players' action sets.
///
/// `ALL` fixes the enumeration order. Every argmax in the crate walks this
/// order and keeps the first maximum, so ties resolve the same way on every run.
pub trait GridAction: Copy + Eq + fmt::Debug + 'static {
    const ALL: &'static [Self];

    /// Unit displacement applied by the grid; `(0, 0)` for non-moving actions.
    fn displacement(&self) -> (i32, i32);

    /// Wire label used in exported trajectories.
    fn label(&self) -> &'static str;

    /// Ordinal inside `ALL`, used to index dense value tables.
    fn index(&self) -> usize;
}

/// Player1 actions. Zap never moves Player1.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum P1Action {
    #[serde(rename = "0")]
    Stay,
    #[serde(rename = "N")]
    North,
    #[serde(rename = "E")]
    East,
    #[serde(rename = "W")]
    West,
    #[serde(rename = "S")]
    South,
    #[serde(rename = "Z")]
    Zap,
}

/// Player2 actions.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum P2Action {
    #[serde(rename = "0")]
    Stay,
    #[serde(rename = "N")]
    North,
    #[serde(rename = "E")]
    East,
    #[serde(rename = "W")]
    West,
    #[serde(rename = "S")]
    South,
}

pub const NUM_P1_ACTIONS: usize = 6;
pub const NUM_P2_ACTIONS: usize = 5;

fn direction_displacement(label: &str) -> (i32, i32) {
    match label {
        "N" => (0, -1),
        "S" => (0, 1),
        "E" => (1, 0),
        "W" => (-1, 0),
        _ => (0, 0),
    }
}

impl GridAction for P1Action {
    const ALL: &'static [Self] = &[
        P1Action::Stay,
        P1Action::North,
        P1Action::East,
        P1Action::West,
        P1Action::South,
        P1Action::Zap,
    ];

    fn displacement(&self) -> (i32, i32) {
        direction_displacement(self.label())
    }

    fn label(&self) -> &'static str {
        match self {
            P1Action::Stay => "0",
            P1Action::North => "N",
            P1Action::East => "E",
            P1Action::West => "W",
            P1Action::South => "S",
            P1Action::Zap => "Z",
        }
    }

    fn index(&self) -> usize {
        *self as usize
    }
}

impl GridAction for P2Action {
    const ALL: &'static [Self] = &[
        P2Action::Stay,
        P2Action::North,
        P2Action::East,
        P2Action::West,
        P2Action::South,
    ];

    fn displacement(&self) -> (i32, i32) {
        direction_displacement(self.label())
    }

    fn label(&self) -> &'static str {
        match self {
            P2Action::Stay => "0",
            P2Action::North => "N",
            P2Action::East => "E",
            P2Action::West => "W",
            P2Action::South => "S",
        }
    }

    fn index(&self) -> usize {
        *self as usize
    }
}

fn parse_label<A: GridAction>(label: &str) -> Result<A, Error> {
    A::ALL
        .iter()
        .copied()
        .find(|action| action.label() == label)
        .ok_or_else(|| Error::UnknownAction {
            label: label.to_string(),
        })
}

impl FromStr for P1Action {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        parse_label(s)
    }
}

impl FromStr for P2Action {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        parse_label(s)
    }
}

impl fmt::Display for P1Action {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

impl fmt::Display for P2Action {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

/// First action in enumeration order whose value is maximal.
pub fn greedy<A: GridAction>(value_of: impl Fn(A) -> f64) -> A {
    let mut best = A::ALL[0];
    let mut best_value = value_of(best);
    for &action in &A::ALL[1..] {
        let value = value_of(action);
        if value > best_value {
            best = action;
            best_value = value;
        }
    }
    best
}

/// Parses a whitespace or comma separated action script such as `"N E N N"`.
pub fn parse_script<A>(script: &str) -> Result<Vec<A>, Error>
where
    A: GridAction + FromStr<Err = Error>,
{
    script
        .split(|c: char| c == ',' || c.is_whitespace())
        .filter(|token| !token.is_empty())
        .map(str::parse)
        .collect()
}
