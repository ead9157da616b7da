use crate::search::{Cost, INFINITE_COST};
use std::time::{Duration, Instant};
use tracing::info;

const LOG_INTERVAL: Duration = Duration::from_secs(10);

#[derive(Debug, Clone)]
pub struct SearchStatistics {
    /// Number of nodes expanded
    expanded_nodes: u64,
    /// Number of successors generated
    generated_nodes: u64,
    /// Number of successors that turned out to be already known states
    duplicate_nodes: u64,
    /// Number of known states moved to a cheaper path
    reopened_nodes: u64,
    /// Best heuristic value found so far
    best_heuristic_value: Cost,
    /// Time when the search started
    search_start_time: Instant,
    /// Time when the last log was printed, used for periodic logging
    last_log_time: Instant,
}

impl Default for SearchStatistics {
    fn default() -> Self {
        Self::new()
    }
}

impl SearchStatistics {
    pub fn new() -> Self {
        Self {
            expanded_nodes: 0,
            generated_nodes: 0,
            duplicate_nodes: 0,
            reopened_nodes: 0,
            best_heuristic_value: INFINITE_COST,
            search_start_time: Instant::now(),
            last_log_time: Instant::now(),
        }
    }

    pub fn register_heuristic_value(&mut self, heuristic_value: Cost) {
        if heuristic_value < self.best_heuristic_value {
            self.best_heuristic_value = heuristic_value;
            info!(best_heuristic_value = self.best_heuristic_value.into_inner());
        }
    }

    pub fn increment_expanded_nodes(&mut self) {
        self.expanded_nodes += 1;
        self.log_if_needed();
    }

    pub fn increment_generated_nodes(&mut self) {
        self.generated_nodes += 1;
    }

    pub fn increment_duplicate_nodes(&mut self) {
        self.duplicate_nodes += 1;
    }

    pub fn increment_reopened_nodes(&mut self) {
        self.reopened_nodes += 1;
    }

    pub fn expanded_nodes(&self) -> u64 {
        self.expanded_nodes
    }

    pub fn generated_nodes(&self) -> u64 {
        self.generated_nodes
    }

    pub fn duplicate_nodes(&self) -> u64 {
        self.duplicate_nodes
    }

    pub fn reopened_nodes(&self) -> u64 {
        self.reopened_nodes
    }

    pub fn elapsed(&self) -> Duration {
        self.search_start_time.elapsed()
    }

    fn log_if_needed(&mut self) {
        if self.last_log_time.elapsed() > LOG_INTERVAL {
            self.last_log_time = Instant::now();
            self.log();
        }
    }

    fn log(&self) {
        info!(
            expanded_nodes = self.expanded_nodes,
            generated_nodes = self.generated_nodes,
            duplicate_nodes = self.duplicate_nodes,
            reopened_nodes = self.reopened_nodes,
            best_heuristic_value = self.best_heuristic_value.into_inner(),
        );
    }

    pub fn finalise_search(&self) {
        info!("finalising search");
        self.log();
        info!(search_duration = self.search_start_time.elapsed().as_secs_f64());
    }
}
