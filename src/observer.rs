//! Search event reporting
//!
//! The engine reports through an observer handed to it instead of writing to
//! a global logger. Callbacks run on the search thread, so they should be
//! cheap.

use crate::types::{SearchConfig, SearchProgress, SearchReport};

/// Receives search lifecycle events
pub trait SearchObserver: Send + Sync {
    /// Called once before the first candidate
    fn on_start(&self, _config: &SearchConfig, _search_space: u64) {}

    /// Called every `progress_interval` candidates
    fn on_progress(&self, _progress: &SearchProgress) {}

    /// Called once with the final report
    fn on_finish(&self, _report: &SearchReport) {}
}

/// Observer that ignores every event
#[derive(Debug, Default, Clone, Copy)]
pub struct NoopObserver;

impl SearchObserver for NoopObserver {}

/// Observer that forwards events to `tracing`
#[derive(Debug, Default, Clone, Copy)]
pub struct TracingObserver;

impl SearchObserver for TracingObserver {
    fn on_start(&self, config: &SearchConfig, search_space: u64) {
        tracing::info!(
            strategy = %config.strategy,
            length = %config.length,
            search_space = %search_space,
            timeout_ms = ?config.timeout.map(|t| t.as_millis()),
            "Brute force started"
        );
    }

    fn on_progress(&self, progress: &SearchProgress) {
        tracing::debug!(
            attempts = %progress.attempts,
            total = %progress.total,
            percent = %format!("{:.2}", progress.percent()),
            oracle_errors = %progress.oracle_errors,
            rate = %format!("{:.0}", progress.candidates_per_second()),
            "Brute force progress"
        );
    }

    fn on_finish(&self, report: &SearchReport) {
        tracing::info!(
            outcome = %report.outcome,
            attempts = %report.attempts,
            oracle_errors = %report.oracle_errors,
            duration_ms = %report.elapsed_ms,
            "Brute force finished"
        );
    }
}


#[cfg(test)]
mod tests {
    use super::*;
    use crate::cancel::CancelToken;
    use crate::generator::Alphabet;
    use crate::oracle::MemoryOracle;
    use crate::breaker::Breaker;
    use std::sync::Arc;

    #[tokio::test]
    async fn test_tracing_observer_in_search() {
        let config = SearchConfig::default()
            .with_length(2)
            .with_timeout(None)
            .with_progress_interval(10);
        let breaker = Breaker::new(Arc::new(MemoryOracle::new("42")))
            .with_alphabet(Alphabet::digits())
            .with_observer(Arc::new(TracingObserver));

        let cracked = breaker.brute_force_with(&config, CancelToken::new()).await.unwrap();
        assert_eq!(cracked.report.attempts, 43);
    }
}
