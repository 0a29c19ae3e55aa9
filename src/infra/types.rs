use serde::{Deserialize, Serialize};

/// Grid cell coordinate. Serialized as a two-element `[x, y]` list.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(into = "[i32; 2]", from = "[i32; 2]")]
pub struct Position {
    pub x: i32,
    pub y: i32,
}

impl Position {
    pub fn new(x: i32, y: i32) -> Self {
        Self { x, y }
    }

    pub fn offset(&self, (dx, dy): (i32, i32)) -> Self {
        Self::new(self.x + dx, self.y + dy)
    }

    /// The 3x3 Chebyshev block centered on this position, including itself.
    /// Positions are not bounds-checked.
    pub fn neighbors8(&self) -> [Position; 9] {
        [
            Position::new(self.x - 1, self.y - 1),
            Position::new(self.x, self.y - 1),
            Position::new(self.x + 1, self.y - 1),
            Position::new(self.x - 1, self.y),
            Position::new(self.x, self.y),
            Position::new(self.x + 1, self.y),
            Position::new(self.x - 1, self.y + 1),
            Position::new(self.x, self.y + 1),
            Position::new(self.x + 1, self.y + 1),
        ]
    }

    pub fn is_within_reach(&self, other: &Position) -> bool {
        self.neighbors8().contains(other)
    }
}

impl From<Position> for [i32; 2] {
    fn from(pos: Position) -> Self {
        [pos.x, pos.y]
    }
}

impl From<[i32; 2]> for Position {
    fn from([x, y]: [i32; 2]) -> Self {
        Position::new(x, y)
    }
}

/// Ordered pair of both players' positions, the full observable state.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct JointPosition {
    pub p1: Position,
    pub p2: Position,
}

impl JointPosition {
    pub fn new(p1: Position, p2: Position) -> Self {
        Self { p1, p2 }
    }
}

/// Dense indexing of grid cells and joint positions for table-backed learners.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct StateSpace {
    pub width: i32,
    pub height: i32,
}

impl StateSpace {
    pub fn new(width: i32, height: i32) -> Self {
        Self { width, height }
    }

    pub fn cell_count(&self) -> usize {
        (self.width.max(0) * self.height.max(0)) as usize
    }

    /// Number of joint positions, every pair of cells.
    pub fn state_count(&self) -> usize {
        self.cell_count() * self.cell_count()
    }

    pub fn contains(&self, pos: &Position) -> bool {
        pos.x >= 0 && pos.x < self.width && pos.y >= 0 && pos.y < self.height
    }

    pub fn cell_index(&self, pos: &Position) -> usize {
        debug_assert!(self.contains(pos), "position {:?} off grid", pos);
        (pos.x * self.height + pos.y) as usize
    }

    pub fn state_index(&self, state: &JointPosition) -> usize {
        self.cell_index(&state.p1) * self.cell_count() + self.cell_index(&state.p2)
    }
}
