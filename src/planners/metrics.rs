//! Moving-average run metrics, logged through `tracing`

use std::collections::VecDeque;
use std::time::Instant;

use crate::infra::{EpisodeSummary, GameObserver, SimulationConfig};
use crate::state::{GridEnvironment, TrajectoryLog};

use super::belief::HiddenType;

/// Moving average calculator
#[derive(Debug, Clone)]
pub struct MovingAverage {
    values: VecDeque<f64>,
    window_size: usize,
    sum: f64,
}

impl MovingAverage {
    pub fn new(window_size: usize) -> Self {
        Self {
            values: VecDeque::with_capacity(window_size),
            window_size,
            sum: 0.0,
        }
    }

    pub fn push(&mut self, value: f64) {
        if self.values.len() >= self.window_size {
            if let Some(old) = self.values.pop_front() {
                self.sum -= old;
            }
        }
        self.values.push_back(value);
        self.sum += value;
    }

    pub fn average(&self) -> f64 {
        if self.values.is_empty() {
            0.0
        } else {
            self.sum / self.values.len() as f64
        }
    }

    pub fn len(&self) -> usize {
        self.values.len()
    }

    pub fn is_empty(&self) -> bool {
        self.values.is_empty()
    }
}

/// Per-episode outcome statistics over a run
#[derive(Debug)]
pub struct RunMetrics {
    pub p1_return: MovingAverage,
    pub p2_return: MovingAverage,
    pub episode_length: MovingAverage,
    /// Fraction of episodes ended by a zap
    pub zap_rate: MovingAverage,
    /// Fraction of cooperative zaps among zap terminations
    pub false_zap_rate: MovingAverage,
    pub cooperative_rate: MovingAverage,
    pub belief_cooperative: MovingAverage,
    pub episodes: usize,
    pub total_turns: usize,
    pub total_zaps: usize,
    start_time: Instant,
}

impl RunMetrics {
    pub fn new(window_size: usize) -> Self {
        Self {
            p1_return: MovingAverage::new(window_size),
            p2_return: MovingAverage::new(window_size),
            episode_length: MovingAverage::new(window_size),
            zap_rate: MovingAverage::new(window_size),
            false_zap_rate: MovingAverage::new(window_size),
            cooperative_rate: MovingAverage::new(window_size),
            belief_cooperative: MovingAverage::new(window_size),
            episodes: 0,
            total_turns: 0,
            total_zaps: 0,
            start_time: Instant::now(),
        }
    }

    pub fn record_episode(&mut self, summary: &EpisodeSummary) {
        let cooperative = summary.hidden_type == HiddenType::Cooperative;

        self.p1_return.push(summary.p1_return);
        self.p2_return.push(summary.p2_return);
        self.episode_length.push(summary.turns as f64);
        self.zap_rate.push(if summary.zapped { 1.0 } else { 0.0 });
        if summary.zapped {
            self.false_zap_rate.push(if cooperative { 1.0 } else { 0.0 });
            self.total_zaps += 1;
        }
        self.cooperative_rate.push(if cooperative { 1.0 } else { 0.0 });
        self.belief_cooperative.push(summary.belief.get(HiddenType::Cooperative));

        self.episodes += 1;
        self.total_turns += summary.turns;
    }

    pub fn turns_per_second(&self) -> f64 {
        let duration = self.start_time.elapsed().as_secs_f64();
        if duration > 0.0 {
            self.total_turns as f64 / duration
        } else {
            0.0
        }
    }

    /// Log current metrics to console
    pub fn log_to_console(&self) {
        tracing::info!(
            "Episode {} | Turns {} | TPS {:.1}",
            self.episodes,
            self.total_turns,
            self.turns_per_second()
        );
        tracing::info!(
            "  Returns: p1={:.3}, p2={:.3}, length={:.2}",
            self.p1_return.average(),
            self.p2_return.average(),
            self.episode_length.average()
        );
        tracing::info!(
            "  Zaps: rate={:.1}%, cooperative victims={:.1}%, belief(coop)={:.3}",
            self.zap_rate.average() * 100.0,
            self.false_zap_rate.average() * 100.0,
            self.belief_cooperative.average()
        );
    }

    pub fn print_summary(&self) {
        tracing::info!("=== Run Summary ===");
        tracing::info!("Episodes: {}", self.episodes);
        tracing::info!("Turns: {}", self.total_turns);
        tracing::info!("Zap terminations: {}", self.total_zaps);
        tracing::info!("Recent p1 return: {:.3}", self.p1_return.average());
        tracing::info!("Recent p2 return: {:.3}", self.p2_return.average());
        tracing::info!(
            "Recent cooperative rate: {:.1}%",
            self.cooperative_rate.average() * 100.0
        );
    }
}

impl Default for RunMetrics {
    fn default() -> Self {
        Self::new(100)
    }
}

/// Observer feeding `RunMetrics` and logging it every `log_every` episodes.
pub struct MetricsObserver {
    metrics: RunMetrics,
    window_size: usize,
    log_every: usize,
}

impl MetricsObserver {
    pub fn new(window_size: usize, log_every: usize) -> Self {
        Self {
            metrics: RunMetrics::new(window_size),
            window_size,
            log_every: log_every.max(1),
        }
    }

    pub fn metrics(&self) -> &RunMetrics {
        &self.metrics
    }
}

impl GameObserver for MetricsObserver {
    fn on_run_start(&mut self, _config: &SimulationConfig, _env: &GridEnvironment) {
        self.metrics = RunMetrics::new(self.window_size);
    }

    fn on_episode_end(&mut self, summary: &EpisodeSummary) {
        self.metrics.record_episode(summary);
        if self.metrics.episodes % self.log_every == 0 {
            self.metrics.log_to_console();
        }
    }

    fn on_run_finished(&mut self, _trajectory: &TrajectoryLog) {
        self.metrics.print_summary();
    }
}
