//! Brute-force engine
//!
//! Wires an [`Oracle`] to a candidate generator, a deadline and an observer.
//! One call to [`Breaker::brute_force`] is one terminal search: nothing is
//! carried over between calls.

use chrono::Utc;
use std::sync::Arc;
use std::time::Instant;

use crate::cancel::{CancelState, CancelToken, Deadline};
use crate::error::{BreakerError, Result};
use crate::generator::{self, Alphabet};
use crate::observer::{NoopObserver, SearchObserver};
use crate::oracle::{AccessRights, Oracle, Verdict};
use crate::types::{Outcome, SearchConfig, SearchMetrics, SearchProgress, SearchReport};

/// A recovered password
#[derive(Debug, Clone)]
pub struct Cracked {
    pub password: Vec<u8>,
    /// What the password grants; `None` when the oracle could not say
    pub access: Option<AccessRights>,
    pub report: SearchReport,
}

impl Cracked {
    /// Password as text (lossy for non UTF-8 alphabets)
    pub fn password_str(&self) -> String {
        String::from_utf8_lossy(&self.password).into_owned()
    }
}

/// Brute-force engine over a single oracle
#[derive(Clone)]
pub struct Breaker {
    oracle: Arc<dyn Oracle>,
    alphabet: Alphabet,
    observer: Arc<dyn SearchObserver>,
}

impl Breaker {
    /// Create an engine over `oracle` with the digit alphabet
    pub fn new(oracle: Arc<dyn Oracle>) -> Self {
        Self {
            oracle,
            alphabet: Alphabet::digits(),
            observer: Arc::new(NoopObserver),
        }
    }

    /// Create an engine over the PDF at `path`
    #[cfg(feature = "pdf")]
    pub fn open_pdf(path: impl AsRef<std::path::Path>) -> Result<Self> {
        let oracle = crate::oracle::PdfOracle::open(path)?;
        Ok(Self::new(Arc::new(oracle)))
    }

    pub fn with_alphabet(mut self, alphabet: Alphabet) -> Self {
        self.alphabet = alphabet;
        self
    }

    pub fn with_observer(mut self, observer: Arc<dyn SearchObserver>) -> Self {
        self.observer = observer;
        self
    }

    pub fn alphabet(&self) -> &Alphabet {
        &self.alphabet
    }

    /// Whether the target needs a password at all
    pub fn is_protected(&self) -> Result<bool> {
        self.oracle.is_protected()
    }

    /// Search for the password described by `config`
    pub async fn brute_force(&self, config: &SearchConfig) -> Result<Cracked> {
        self.brute_force_with(config, CancelToken::new()).await
    }

    /// Like [`brute_force`](Self::brute_force), with a caller-held token for explicit aborts.
    ///
    /// The token must be fresh: a token that already left the armed state
    /// ends the search before the first candidate.
    pub async fn brute_force_with(&self, config: &SearchConfig, token: CancelToken) -> Result<Cracked> {
        config.validate()?;
        let search_space = self.alphabet.search_space(config.length)?;

        if !self.oracle.is_protected()? {
            tracing::warn!(oracle = %self.oracle.name(), "Cannot brute force an unprotected target");
            return Err(BreakerError::NotProtected);
        }

        let deadline = config
            .timeout
            .map(|timeout| Deadline::arm(&token, timeout))
            .transpose()?;

        let metrics = Arc::new(SearchMetrics::new());
        let started_at = Utc::now();
        let start = Instant::now();
        self.observer.on_start(config, search_space);

        let found = self
            .run_search(config, search_space, &token, &metrics, start)
            .await;
        drop(deadline);
        let found = found?;

        let elapsed = start.elapsed();
        let stats = metrics.get_stats();
        let outcome = match (&found, token.state()) {
            (Some(_), _) => Outcome::Found,
            // a deadline that fires after the last candidate does not turn exhaustion into a timeout
            (None, _) if stats.candidates_tried >= search_space => Outcome::Exhausted,
            (None, CancelState::Expired) => Outcome::TimedOut,
            (None, CancelState::Cancelled) => Outcome::Cancelled,
            (None, CancelState::Armed) => Outcome::Exhausted,
        };

        let report = SearchReport {
            outcome,
            strategy: config.strategy,
            length: config.length,
            alphabet_size: self.alphabet.len(),
            search_space,
            attempts: stats.candidates_tried,
            oracle_errors: stats.oracle_errors,
            started_at,
            finished_at: Utc::now(),
            elapsed_ms: elapsed.as_millis() as u64,
            candidates_per_second: if elapsed.as_secs_f64() > 0.0 {
                stats.candidates_tried as f64 / elapsed.as_secs_f64()
            } else {
                0.0
            },
        };
        self.observer.on_finish(&report);

        if stats.oracle_errors > 0 {
            tracing::warn!(
                oracle_errors = %stats.oracle_errors,
                attempts = %stats.candidates_tried,
                "Some candidates could not be validated and were treated as non-matches"
            );
        }

        let Some(password) = found else {
            return Err(match outcome {
                Outcome::TimedOut => {
                    BreakerError::timed_out(stats.candidates_tried, config.timeout.unwrap_or_default())
                }
                Outcome::Cancelled => BreakerError::cancelled(stats.candidates_tried),
                _ => BreakerError::exhausted(stats.candidates_tried, stats.oracle_errors),
            });
        };

        tracing::info!(
            attempts = %stats.candidates_tried,
            duration_ms = %elapsed.as_millis(),
            avg_oracle_us = %format!("{:.1}", stats.avg_oracle_time_us()),
            "Password cracked"
        );

        let access = match self.oracle.describe_access(&password) {
            Ok(rights) => {
                tracing::info!(rights = %rights, "Access rights");
                Some(rights)
            }
            Err(e) => {
                tracing::warn!(error = %e, "Failed getting access rights");
                None
            }
        };

        Ok(Cracked {
            password,
            access,
            report,
        })
    }

    /// Run the generator on a blocking thread; `Some(password)` on match
    async fn run_search(
        &self,
        config: &SearchConfig,
        total: u64,
        token: &CancelToken,
        metrics: &Arc<SearchMetrics>,
        start: Instant,
    ) -> Result<Option<Vec<u8>>> {
        let oracle = Arc::clone(&self.oracle);
        let observer = Arc::clone(&self.observer);
        let alphabet = self.alphabet.clone();
        let metrics = Arc::clone(metrics);
        let token = token.clone();
        let strategy = config.strategy;
        let length = config.length;
        let interval = config.progress_interval;

        let task = tokio::task::spawn_blocking(move || -> Result<Option<Vec<u8>>> {
            let mut buffer = vec![alphabet.symbols()[0]; length];

            let mut check = |candidate: &[u8]| {
                let attempts = metrics.increment_candidates();
                let oracle_start = Instant::now();
                let verdict = Verdict::of(oracle.as_ref(), candidate);
                metrics.add_oracle_time(oracle_start.elapsed());

                if interval > 0 && attempts % interval == 0 {
                    observer.on_progress(&SearchProgress {
                        attempts,
                        total,
                        oracle_errors: metrics.oracle_errors(),
                        elapsed: start.elapsed(),
                    });
                }

                match verdict {
                    Verdict::Match => true,
                    Verdict::NoMatch => false,
                    Verdict::Failed(error) => {
                        metrics.increment_oracle_errors();
                        tracing::debug!(attempt = %attempts, error = %error, "Candidate validation failed");
                        false
                    }
                }
            };

            let found = generator::search(strategy, &alphabet, &mut buffer, &mut check, &token)?;
            Ok(found.then_some(buffer))
        });

        task.await
            .map_err(|e| BreakerError::internal(format!("Search task failed: {}", e)))?
    }
}
