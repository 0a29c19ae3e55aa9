use std::env;
use std::str::FromStr;

use crate::infra::{Error, Result};

/// Cell layout and spawn selection
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LayoutMode {
    /// Hard-coded 6x6 layout and spawn cells for reproducible debugging
    Fixed,
    /// Sampled layout and spawn cells
    Procedural,
}

impl FromStr for LayoutMode {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self> {
        match s.to_ascii_lowercase().as_str() {
            "fixed" | "debug" => Ok(LayoutMode::Fixed),
            "procedural" | "random" => Ok(LayoutMode::Procedural),
            other => Err(Error::config(format!("unknown layout mode '{}'", other))),
        }
    }
}

#[derive(Debug, Clone)]
pub struct GridConfig {
    pub width: i32,
    pub height: i32,
    pub mode: LayoutMode,
    pub obstacle_density: f64,
    pub red_density: f64,
    pub green_density: f64,
}

impl Default for GridConfig {
    fn default() -> Self {
        Self {
            width: 6,
            height: 6,
            mode: LayoutMode::Fixed,
            obstacle_density: 8.0 / 36.0,
            red_density: 3.0 / 36.0,
            green_density: 2.0 / 36.0,
        }
    }
}

impl GridConfig {
    pub fn area(&self) -> usize {
        (self.width.max(0) as usize) * (self.height.max(0) as usize)
    }

    /// Number of cells a procedural layout samples for `density`.
    pub fn cell_count(&self, density: f64) -> usize {
        (self.area() as f64 * density).round() as usize
    }
}

/// Player1 step size and discount
#[derive(Debug, Clone)]
pub struct BeliefAgentConfig {
    pub alpha: f64,
    pub gamma: f64,
}

impl Default for BeliefAgentConfig {
    fn default() -> Self {
        Self {
            alpha: 0.1,
            gamma: 0.9,
        }
    }
}

/// Player2 exploration rate, step size and discount
#[derive(Debug, Clone)]
pub struct QLearnerConfig {
    pub epsilon: f64,
    pub alpha: f64,
    pub gamma: f64,
}

impl Default for QLearnerConfig {
    fn default() -> Self {
        Self {
            epsilon: 0.1,
            alpha: 0.1,
            gamma: 0.9,
        }
    }
}

/// Full run configuration
#[derive(Debug, Clone)]
pub struct SimulationConfig {
    pub grid: GridConfig,
    pub player1: BeliefAgentConfig,
    pub player2: QLearnerConfig,
    /// Reward B transferred from Player1 to a competitive Player2 on a red cell
    pub competition_reward: f64,
    /// Punishment C for both players when a cooperative Player2 is zapped
    pub zap_punishment: f64,
    pub num_episodes: usize,
    /// Turns per episode (T)
    pub turns: usize,
    pub p_cooperative: f64,
    pub seed: Option<u64>,
    pub output_folder: Option<String>,
    pub timestamp_exports: bool,
    /// Episodes between metric log lines
    pub log_every: usize,
}

impl Default for SimulationConfig {
    fn default() -> Self {
        Self {
            grid: GridConfig::default(),
            player1: BeliefAgentConfig::default(),
            player2: QLearnerConfig::default(),
            competition_reward: 0.5,
            zap_punishment: 0.5,
            num_episodes: 1000,
            turns: 10,
            p_cooperative: 0.5,
            seed: None,
            output_folder: None,
            timestamp_exports: false,
            log_every: 100,
        }
    }
}

fn parse_var<T: FromStr>(lookup: &impl Fn(&str) -> Option<String>, key: &str) -> Result<Option<T>> {
    match lookup(key) {
        Some(raw) => raw
            .trim()
            .parse::<T>()
            .map(Some)
            .map_err(|_| Error::config(format!("{} has unparseable value '{}'", key, raw))),
        None => Ok(None),
    }
}

fn overlay<T: FromStr>(
    target: &mut T,
    lookup: &impl Fn(&str) -> Option<String>,
    key: &str,
) -> Result<()> {
    if let Some(value) = parse_var(lookup, key)? {
        *target = value;
    }
    Ok(())
}

fn check_unit(name: &str, value: f64) -> Result<()> {
    if (0.0..=1.0).contains(&value) {
        Ok(())
    } else {
        Err(Error::config(format!("{} must be in [0, 1], got {}", name, value)))
    }
}

impl SimulationConfig {
    /// Defaults overlaid with `SIM_*` environment variables.
    pub fn from_env() -> Result<Self> {
        Self::from_lookup(|key| env::var(key).ok())
    }

    /// Defaults overlaid with values returned by `lookup` for each `SIM_*` key.
    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Result<Self> {
        let mut config = Self::default();

        overlay(&mut config.grid.width, &lookup, "SIM_WIDTH")?;
        overlay(&mut config.grid.height, &lookup, "SIM_HEIGHT")?;
        overlay(&mut config.grid.mode, &lookup, "SIM_MODE")?;
        overlay(&mut config.grid.obstacle_density, &lookup, "SIM_OBSTACLE_DENSITY")?;
        overlay(&mut config.grid.red_density, &lookup, "SIM_RED_DENSITY")?;
        overlay(&mut config.grid.green_density, &lookup, "SIM_GREEN_DENSITY")?;

        overlay(&mut config.player1.alpha, &lookup, "SIM_P1_ALPHA")?;
        overlay(&mut config.player1.gamma, &lookup, "SIM_P1_GAMMA")?;
        overlay(&mut config.player2.epsilon, &lookup, "SIM_P2_EPSILON")?;
        overlay(&mut config.player2.alpha, &lookup, "SIM_P2_ALPHA")?;
        overlay(&mut config.player2.gamma, &lookup, "SIM_P2_GAMMA")?;

        overlay(&mut config.competition_reward, &lookup, "SIM_REWARD_B")?;
        overlay(&mut config.zap_punishment, &lookup, "SIM_PUNISHMENT_C")?;
        overlay(&mut config.num_episodes, &lookup, "SIM_EPISODES")?;
        overlay(&mut config.turns, &lookup, "SIM_TURNS")?;
        overlay(&mut config.p_cooperative, &lookup, "SIM_P_COOPERATIVE")?;
        overlay(&mut config.timestamp_exports, &lookup, "SIM_TIMESTAMP_EXPORTS")?;
        overlay(&mut config.log_every, &lookup, "SIM_LOG_EVERY")?;

        config.seed = parse_var(&lookup, "SIM_SEED")?;
        config.output_folder = lookup("SIM_OUTPUT_FOLDER").filter(|s| !s.is_empty());

        Ok(config)
    }

    /// Rejects configurations that cannot produce a run.
    pub fn validate(&self) -> Result<()> {
        let grid = &self.grid;
        if grid.width <= 0 || grid.height <= 0 {
            return Err(Error::config(format!(
                "grid must be non-empty, got {}x{}",
                grid.width, grid.height
            )));
        }
        if grid.mode == LayoutMode::Fixed && (grid.width < 6 || grid.height < 6) {
            return Err(Error::config(format!(
                "fixed layout needs at least a 6x6 grid, got {}x{}",
                grid.width, grid.height
            )));
        }
        for (name, density) in [
            ("obstacle density", grid.obstacle_density),
            ("red density", grid.red_density),
            ("green density", grid.green_density),
        ] {
            check_unit(name, density)?;
        }

        check_unit("player1 alpha", self.player1.alpha)?;
        check_unit("player1 gamma", self.player1.gamma)?;
        check_unit("player2 epsilon", self.player2.epsilon)?;
        check_unit("player2 alpha", self.player2.alpha)?;
        check_unit("player2 gamma", self.player2.gamma)?;
        check_unit("cooperative probability", self.p_cooperative)?;

        if self.turns == 0 {
            return Err(Error::config("turns per episode must be positive"));
        }
        if self.log_every == 0 {
            return Err(Error::config("log interval must be positive"));
        }

        if grid.mode == LayoutMode::Procedural {
            // Two spawn cells must remain free after all special cells are sampled.
            let requested = grid.cell_count(grid.obstacle_density)
                + grid.cell_count(grid.red_density)
                + grid.cell_count(grid.green_density)
                + 2;
            if requested > grid.area() {
                return Err(Error::InsufficientCapacity {
                    requested,
                    available: grid.area(),
                });
            }
        }

        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    fn lookup_from(pairs: &[(&str, &str)]) -> impl Fn(&str) -> Option<String> {
        let map: HashMap<String, String> = pairs
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect();
        move |key: &str| map.get(key).cloned()
    }

    #[test]
    fn test_default_matches_debug_driver() {
        let config = SimulationConfig::default();
        assert_eq!(config.grid.width, 6);
        assert_eq!(config.grid.mode, LayoutMode::Fixed);
        assert_eq!(config.num_episodes, 1000);
        assert_eq!(config.turns, 10);
        assert!((config.competition_reward - 0.5).abs() < 1e-12);
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_cell_count_rounds() {
        let grid = GridConfig::default();
        assert_eq!(grid.cell_count(grid.obstacle_density), 8);
        assert_eq!(grid.cell_count(grid.red_density), 3);
        assert_eq!(grid.cell_count(grid.green_density), 2);
    }

    #[test]
    fn test_from_lookup_overlays_values() {
        let config = SimulationConfig::from_lookup(lookup_from(&[
            ("SIM_WIDTH", "10"),
            ("SIM_HEIGHT", "8"),
            ("SIM_MODE", "procedural"),
            ("SIM_SEED", "7"),
            ("SIM_REWARD_B", "2.5"),
        ]))
        .unwrap();
        assert_eq!(config.grid.width, 10);
        assert_eq!(config.grid.height, 8);
        assert_eq!(config.grid.mode, LayoutMode::Procedural);
        assert_eq!(config.seed, Some(7));
        assert!((config.competition_reward - 2.5).abs() < 1e-12);
        assert_eq!(config.turns, 10);
    }

    #[test]
    fn test_from_lookup_rejects_garbage() {
        let result = SimulationConfig::from_lookup(lookup_from(&[("SIM_TURNS", "ten")]));
        assert!(matches!(result, Err(Error::InvalidConfiguration { .. })));
    }

    #[test]
    fn test_validate_rejects_overfull_procedural_grid() {
        let mut config = SimulationConfig::default();
        config.grid.mode = LayoutMode::Procedural;
        config.grid.obstacle_density = 0.6;
        config.grid.red_density = 0.3;
        config.grid.green_density = 0.1;
        assert!(matches!(
            config.validate(),
            Err(Error::InsufficientCapacity {
                requested: 39,
                available: 36
            })
        ));
    }

    #[test]
    fn test_validate_rejects_small_fixed_grid() {
        let mut config = SimulationConfig::default();
        config.grid.width = 4;
        assert!(config.validate().is_err());
    }

    #[test]
    fn test_validate_rejects_out_of_range_rate() {
        let mut config = SimulationConfig::default();
        config.player2.epsilon = 1.5;
        assert!(config.validate().is_err());
    }
}
