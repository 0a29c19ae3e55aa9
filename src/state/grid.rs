use rand::Rng;
use rand::seq::IndexedRandom;

use crate::infra::{
    EnvironmentLayout, Error, GridAction, GridConfig, JointPosition, LayoutMode, Position,
    Result, StateSpace,
};

const FIXED_OBSTACLES: [(i32, i32); 8] = [
    (3, 0),
    (3, 1),
    (0, 2),
    (1, 2),
    (4, 3),
    (5, 3),
    (2, 4),
    (2, 5),
];
const FIXED_RED_CELLS: [(i32, i32); 3] = [(0, 0), (4, 1), (1, 5)];
const FIXED_GREEN_CELLS: [(i32, i32); 2] = [(4, 0), (1, 3)];
const FIXED_P1_START: Position = Position { x: 2, y: 2 };
const FIXED_P2_START: Position = Position { x: 3, y: 3 };

/// Static grid geometry, special cells and per-episode spawn positions.
#[derive(Debug, Clone)]
pub struct GridEnvironment {
    config: GridConfig,
    obstacles: Vec<Position>,
    red_cells: Vec<Position>,
    green_cells: Vec<Position>,
    pub p1_position: Position,
    pub p2_position: Position,
}

fn to_positions(cells: &[(i32, i32)]) -> Vec<Position> {
    cells.iter().map(|&(x, y)| Position::new(x, y)).collect()
}

impl GridEnvironment {
    pub fn new(config: GridConfig) -> Self {
        Self {
            config,
            obstacles: Vec::new(),
            red_cells: Vec::new(),
            green_cells: Vec::new(),
            p1_position: Position::new(0, 0),
            p2_position: Position::new(0, 0),
        }
    }

    pub fn width(&self) -> i32 {
        self.config.width
    }

    pub fn height(&self) -> i32 {
        self.config.height
    }

    pub fn mode(&self) -> LayoutMode {
        self.config.mode
    }

    /// Every grid cell, column-major (x outer, y inner).
    pub fn states(&self) -> Vec<Position> {
        (0..self.config.width)
            .flat_map(|x| (0..self.config.height).map(move |y| Position::new(x, y)))
            .collect()
    }

    /// Assigns obstacles, red cells and green cells, in that order.
    /// Each procedural draw excludes everything sampled before it.
    pub fn assign_cells(&mut self, rng: &mut impl Rng) -> Result<()> {
        match self.config.mode {
            LayoutMode::Fixed => {
                self.obstacles = to_positions(&FIXED_OBSTACLES);
                self.red_cells = to_positions(&FIXED_RED_CELLS);
                self.green_cells = to_positions(&FIXED_GREEN_CELLS);
            }
            LayoutMode::Procedural => {
                let mut available = self.states();

                self.obstacles =
                    sample_cells(&available, self.config.obstacle_density, &self.config, rng)?;
                available.retain(|pos| !self.obstacles.contains(pos));

                self.red_cells =
                    sample_cells(&available, self.config.red_density, &self.config, rng)?;
                available.retain(|pos| !self.red_cells.contains(pos));

                self.green_cells =
                    sample_cells(&available, self.config.green_density, &self.config, rng)?;
            }
        }

        tracing::debug!(
            obstacles = self.obstacles.len(),
            red = self.red_cells.len(),
            green = self.green_cells.len(),
            "cells assigned"
        );
        Ok(())
    }

    /// Draws two distinct spawn cells outside every special set.
    pub fn assign_players(&mut self, rng: &mut impl Rng) -> Result<()> {
        match self.config.mode {
            LayoutMode::Fixed => {
                self.p1_position = FIXED_P1_START;
                self.p2_position = FIXED_P2_START;
            }
            LayoutMode::Procedural => {
                let mut available: Vec<Position> = self
                    .states()
                    .into_iter()
                    .filter(|pos| !self.is_special(pos))
                    .collect();
                if available.len() < 2 {
                    return Err(Error::InsufficientCapacity {
                        requested: 2,
                        available: available.len(),
                    });
                }

                let p1_index = rng.random_range(0..available.len());
                self.p1_position = available.remove(p1_index);

                let p2_index = rng.random_range(0..available.len());
                self.p2_position = available[p2_index];
            }
        }
        Ok(())
    }

    pub fn joint_position(&self) -> JointPosition {
        JointPosition::new(self.p1_position, self.p2_position)
    }

    pub fn state_space(&self) -> StateSpace {
        StateSpace::new(self.config.width, self.config.height)
    }

    pub fn in_bounds(&self, pos: &Position) -> bool {
        self.state_space().contains(pos)
    }

    /// In bounds and not an obstacle. Reward cells are always enterable.
    pub fn is_valid(&self, pos: &Position) -> bool {
        self.in_bounds(pos) && !self.obstacles.contains(pos)
    }

    /// Applies the action's displacement; an invalid target leaves `pos` unchanged.
    pub fn resolve_move<A: GridAction>(&self, pos: Position, action: A) -> Position {
        let next = pos.offset(action.displacement());
        if self.is_valid(&next) { next } else { pos }
    }

    pub fn is_obstacle(&self, pos: &Position) -> bool {
        self.obstacles.contains(pos)
    }

    pub fn is_red(&self, pos: &Position) -> bool {
        self.red_cells.contains(pos)
    }

    pub fn is_green(&self, pos: &Position) -> bool {
        self.green_cells.contains(pos)
    }

    fn is_special(&self, pos: &Position) -> bool {
        self.is_obstacle(pos) || self.is_red(pos) || self.is_green(pos)
    }

    pub fn layout(&self) -> EnvironmentLayout {
        EnvironmentLayout::new(
            self.obstacles.clone(),
            self.red_cells.clone(),
            self.green_cells.clone(),
        )
    }

    pub fn draw_ascii_map(&self) -> String {
        let mut output = String::new();

        for y in 0..self.config.height {
            for x in 0..self.config.width {
                let pos = Position::new(x, y);
                let glyph = if pos == self.p1_position {
                    '1'
                } else if pos == self.p2_position {
                    '2'
                } else if self.is_obstacle(&pos) {
                    '#'
                } else if self.is_red(&pos) {
                    'r'
                } else if self.is_green(&pos) {
                    'g'
                } else {
                    '.'
                };
                output.push(glyph);
            }
            output.push('\n');
        }

        output
    }
}

fn sample_cells(
    available: &[Position],
    density: f64,
    config: &GridConfig,
    rng: &mut impl Rng,
) -> Result<Vec<Position>> {
    let count = config.cell_count(density);
    if count > available.len() {
        return Err(Error::InsufficientCapacity {
            requested: count,
            available: available.len(),
        });
    }
    Ok(available.choose_multiple(rng, count).copied().collect())
}
