use crate::search::{SearchOptions, SearchOutcome, SearchStatistics};
use memory_stats::memory_stats;
use std::time::{Duration, Instant};
use tracing::info;

const MEMORY_POLL_INTERVAL: Duration = Duration::from_secs(1);

/// Resource limits of a search, polled by the engines at the top of their
/// main loops.
#[derive(Debug)]
pub struct TerminationCondition {
    expansion_limit: Option<u64>,
    time_limit: Option<Duration>,
    memory_limit_mb: Option<usize>,
    start_time: Instant,
    peak_memory_usage_mb: Option<usize>,
    last_memory_poll: Instant,
}

impl TerminationCondition {
    pub fn new(
        expansion_limit: Option<u64>,
        time_limit: Option<Duration>,
        memory_limit_mb: Option<usize>,
    ) -> Self {
        info!(
            expansion_limit = expansion_limit,
            time_limit = time_limit.map(|d| d.as_secs_f64()),
            memory_limit_mb = memory_limit_mb,
        );
        Self {
            expansion_limit,
            time_limit,
            memory_limit_mb,
            start_time: Instant::now(),
            peak_memory_usage_mb: None,
            last_memory_poll: Instant::now(),
        }
    }

    pub fn from_options(options: &SearchOptions) -> Self {
        Self::new(
            options.expansion_limit,
            options.time_limit(),
            options.memory_limit_mb,
        )
    }

    /// A condition that never triggers.
    pub fn unlimited() -> Self {
        Self::new(None, None, None)
    }

    fn poll_memory(&mut self) {
        if self.last_memory_poll.elapsed() < MEMORY_POLL_INTERVAL {
            return;
        }
        self.last_memory_poll = Instant::now();
        let memory_usage = memory_stats().map(|usage| usage.physical_mem / 1024 / 1024);
        self.peak_memory_usage_mb = self.peak_memory_usage_mb.max(memory_usage);
    }

    pub fn finalise(&self) {
        info!(
            peak_recorded_memory_usage_mb = self.peak_memory_usage_mb,
            total_time_used = self.start_time.elapsed().as_secs_f64(),
        );
    }

    /// The outcome to stop the search with, if a limit has been hit.
    pub fn should_terminate(&mut self, statistics: &SearchStatistics) -> Option<SearchOutcome> {
        if let Some(expansion_limit) = self.expansion_limit {
            if statistics.expanded_nodes() >= expansion_limit {
                return Some(SearchOutcome::ExpansionLimitExceeded);
            }
        }
        if let Some(time_limit) = self.time_limit {
            if self.start_time.elapsed() > time_limit {
                return Some(SearchOutcome::TimeLimitExceeded);
            }
        }
        if let Some(memory_limit_mb) = self.memory_limit_mb {
            self.poll_memory();
            if let Some(peak_usage) = self.peak_memory_usage_mb {
                if peak_usage > memory_limit_mb {
                    return Some(SearchOutcome::MemoryLimitExceeded);
                }
            }
        }
        None
    }
}
