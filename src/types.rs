//! Core types and structures for pdf-breaker

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::str::FromStr;
use std::sync::atomic::{AtomicU64, Ordering};
use std::time::Duration;

use crate::error::{BreakerError, Result};
use crate::generator::MAX_PASSWORD_LENGTH;

/// Candidate generation strategy
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Strategy {
    /// Depth-first, position by position with backtracking
    Recursive,
    /// Mixed-radix odometer over every index of the search space
    #[default]
    Iterative,
}

impl std::fmt::Display for Strategy {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Strategy::Recursive => write!(f, "recursive"),
            Strategy::Iterative => write!(f, "iterative"),
        }
    }
}

impl FromStr for Strategy {
    type Err = BreakerError;

    fn from_str(s: &str) -> Result<Self> {
        match s.trim().to_lowercase().as_str() {
            "recursive" | "rec" => Ok(Strategy::Recursive),
            "iterative" | "iter" => Ok(Strategy::Iterative),
            other => Err(BreakerError::config(format!(
                "Unknown strategy '{}'. Expected 'recursive' or 'iterative'",
                other
            ))),
        }
    }
}

/// How a search ended
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Outcome {
    Found,
    Exhausted,
    TimedOut,
    Cancelled,
}

impl std::fmt::Display for Outcome {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Outcome::Found => write!(f, "found"),
            Outcome::Exhausted => write!(f, "exhausted"),
            Outcome::TimedOut => write!(f, "timed_out"),
            Outcome::Cancelled => write!(f, "cancelled"),
        }
    }
}

/// Environment variable holding the password length
pub const ENV_LENGTH: &str = "PDF_BREAKER_LENGTH";
/// Environment variable holding the timeout in seconds (0 disables it)
pub const ENV_TIMEOUT_SECS: &str = "PDF_BREAKER_TIMEOUT_SECS";
/// Environment variable holding the strategy name
pub const ENV_STRATEGY: &str = "PDF_BREAKER_STRATEGY";

/// Configuration for one brute-force run
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SearchConfig {
    /// Exact password length to enumerate
    pub length: usize,
    /// Time budget; `None` searches until exhaustion
    pub timeout: Option<Duration>,
    /// Generation strategy
    pub strategy: Strategy,
    /// Report progress to the observer every N candidates (0 disables it)
    pub progress_interval: u64,
}

impl Default for SearchConfig {
    fn default() -> Self {
        Self {
            length: 6,
            timeout: Some(Duration::from_secs(60)),
            strategy: Strategy::Iterative,
            progress_interval: 10_000,
        }
    }
}

impl SearchConfig {
    /// Build a configuration from the process environment.
    ///
    /// Loads `.env` if present, then overrides defaults with
    /// `PDF_BREAKER_LENGTH`, `PDF_BREAKER_TIMEOUT_SECS` and `PDF_BREAKER_STRATEGY`.
    pub fn from_env() -> Result<Self> {
        dotenv::dotenv().ok();
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Build a configuration from an arbitrary key lookup
    pub fn from_lookup<F>(lookup: F) -> Result<Self>
    where
        F: Fn(&str) -> Option<String>,
    {
        let mut config = Self::default();

        if let Some(raw) = lookup(ENV_LENGTH) {
            config.length = raw.trim().parse().map_err(|_| {
                BreakerError::config(format!("{} must be a positive integer, got '{}'", ENV_LENGTH, raw))
            })?;
        }

        if let Some(raw) = lookup(ENV_TIMEOUT_SECS) {
            let secs: u64 = raw.trim().parse().map_err(|_| {
                BreakerError::config(format!("{} must be a number of seconds, got '{}'", ENV_TIMEOUT_SECS, raw))
            })?;
            config.timeout = (secs > 0).then(|| Duration::from_secs(secs));
        }

        if let Some(raw) = lookup(ENV_STRATEGY) {
            config.strategy = raw.parse()?;
        }

        config.validate()?;
        Ok(config)
    }

    /// Check the configuration before a search starts
    pub fn validate(&self) -> Result<()> {
        if self.length == 0 {
            return Err(BreakerError::config("Password length must be at least 1"));
        }
        if self.length > MAX_PASSWORD_LENGTH {
            return Err(BreakerError::config(format!(
                "Password length {} exceeds the maximum of {}",
                self.length, MAX_PASSWORD_LENGTH
            )));
        }
        if matches!(self.timeout, Some(t) if t.is_zero()) {
            return Err(BreakerError::config(
                "Timeout must be greater than zero (use no timeout to search until exhaustion)",
            ));
        }
        Ok(())
    }

    pub fn with_length(mut self, length: usize) -> Self {
        self.length = length;
        self
    }

    pub fn with_timeout(mut self, timeout: Option<Duration>) -> Self {
        self.timeout = timeout;
        self
    }

    pub fn with_strategy(mut self, strategy: Strategy) -> Self {
        self.strategy = strategy;
        self
    }

    pub fn with_progress_interval(mut self, interval: u64) -> Self {
        self.progress_interval = interval;
        self
    }
}

/// Counters shared between the search task and observers
#[derive(Debug, Default)]
pub struct SearchMetrics {
    candidates_tried: AtomicU64,
    oracle_errors: AtomicU64,
    oracle_time_ns: AtomicU64,
}

impl SearchMetrics {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn increment_candidates(&self) -> u64 {
        self.candidates_tried.fetch_add(1, Ordering::Relaxed) + 1
    }

    pub fn increment_oracle_errors(&self) {
        self.oracle_errors.fetch_add(1, Ordering::Relaxed);
    }

    pub fn add_oracle_time(&self, elapsed: Duration) {
        self.oracle_time_ns
            .fetch_add(elapsed.as_nanos() as u64, Ordering::Relaxed);
    }

    pub fn candidates_tried(&self) -> u64 {
        self.candidates_tried.load(Ordering::Relaxed)
    }

    pub fn oracle_errors(&self) -> u64 {
        self.oracle_errors.load(Ordering::Relaxed)
    }

    /// Get a consistent-enough copy of the counters
    pub fn get_stats(&self) -> MetricsSnapshot {
        MetricsSnapshot {
            candidates_tried: self.candidates_tried(),
            oracle_errors: self.oracle_errors(),
            oracle_time_ns: self.oracle_time_ns.load(Ordering::Relaxed),
        }
    }
}

/// Point-in-time copy of [`SearchMetrics`]
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct MetricsSnapshot {
    pub candidates_tried: u64,
    pub oracle_errors: u64,
    pub oracle_time_ns: u64,
}

impl MetricsSnapshot {
    /// Average time spent inside the oracle per candidate, in microseconds
    pub fn avg_oracle_time_us(&self) -> f64 {
        if self.candidates_tried == 0 {
            0.0
        } else {
            self.oracle_time_ns as f64 / self.candidates_tried as f64 / 1_000.0
        }
    }
}

/// Progress info handed to observers
#[derive(Debug, Clone)]
pub struct SearchProgress {
    pub attempts: u64,
    pub total: u64,
    pub oracle_errors: u64,
    pub elapsed: Duration,
}

impl SearchProgress {
    pub fn percent(&self) -> f64 {
        if self.total == 0 {
            100.0
        } else {
            (self.attempts as f64 / self.total as f64) * 100.0
        }
    }

    pub fn candidates_per_second(&self) -> f64 {
        let secs = self.elapsed.as_secs_f64();
        if secs > 0.0 {
            self.attempts as f64 / secs
        } else {
            0.0
        }
    }
}

/// Summary of a finished search
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SearchReport {
    pub outcome: Outcome,
    pub strategy: Strategy,
    pub length: usize,
    pub alphabet_size: usize,
    pub search_space: u64,
    pub attempts: u64,
    pub oracle_errors: u64,
    pub started_at: DateTime<Utc>,
    pub finished_at: DateTime<Utc>,
    pub elapsed_ms: u64,
    pub candidates_per_second: f64,
}

impl SearchReport {
    pub fn elapsed(&self) -> Duration {
        Duration::from_millis(self.elapsed_ms)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    fn lookup(pairs: &[(&str, &str)]) -> impl Fn(&str) -> Option<String> {
        let map: HashMap<String, String> = pairs
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect();
        move |key| map.get(key).cloned()
    }

    #[test]
    fn test_default_config() {
        let config = SearchConfig::default();
        assert_eq!(config.length, 6);
        assert_eq!(config.timeout, Some(Duration::from_secs(60)));
        assert_eq!(config.strategy, Strategy::Iterative);
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_config_from_lookup() {
        let config = SearchConfig::from_lookup(lookup(&[
            (ENV_LENGTH, "4"),
            (ENV_TIMEOUT_SECS, "0"),
            (ENV_STRATEGY, "Recursive"),
        ]))
        .unwrap();

        assert_eq!(config.length, 4);
        assert_eq!(config.timeout, None);
        assert_eq!(config.strategy, Strategy::Recursive);
    }

    #[test]
    fn test_config_rejects_bad_values() {
        assert!(SearchConfig::from_lookup(lookup(&[(ENV_LENGTH, "six")])).is_err());
        assert!(SearchConfig::from_lookup(lookup(&[(ENV_LENGTH, "0")])).is_err());
        assert!(SearchConfig::from_lookup(lookup(&[(ENV_STRATEGY, "gpu")])).is_err());

        let config = SearchConfig::default().with_timeout(Some(Duration::ZERO));
        assert!(config.validate().is_err());

        let too_long = SearchConfig::default().with_length(MAX_PASSWORD_LENGTH + 1);
        assert!(matches!(too_long.validate(), Err(BreakerError::Config { .. })));
        assert!(SearchConfig::default().with_length(MAX_PASSWORD_LENGTH).validate().is_ok());
    }

    #[test]
    fn test_strategy_display_roundtrip() {
        for strategy in [Strategy::Recursive, Strategy::Iterative] {
            assert_eq!(strategy.to_string().parse::<Strategy>().unwrap(), strategy);
        }
    }

    #[test]
    fn test_metrics_snapshot() {
        let metrics = SearchMetrics::new();
        assert_eq!(metrics.increment_candidates(), 1);
        assert_eq!(metrics.increment_candidates(), 2);
        metrics.increment_oracle_errors();
        metrics.add_oracle_time(Duration::from_micros(10));

        let stats = metrics.get_stats();
        assert_eq!(stats.candidates_tried, 2);
        assert_eq!(stats.oracle_errors, 1);
        assert!((stats.avg_oracle_time_us() - 5.0).abs() < f64::EPSILON);
    }

    #[test]
    fn test_progress_percent() {
        let progress = SearchProgress {
            attempts: 25,
            total: 100,
            oracle_errors: 0,
            elapsed: Duration::from_secs(5),
        };
        assert_eq!(progress.percent(), 25.0);
        assert_eq!(progress.candidates_per_second(), 5.0);
    }
}
