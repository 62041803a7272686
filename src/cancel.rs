//! Cooperative cancellation for running searches
//!
//! A [`CancelToken`] is a one-shot state shared between the search task and a
//! timer task. It starts armed and moves exactly once, to expired (deadline
//! reached) or cancelled (explicit abort). Generators poll it with a single
//! atomic load and never block on it.

use std::sync::atomic::{AtomicU8, Ordering};
use std::sync::Arc;
use std::time::Duration;

use tokio::task::JoinHandle;

use crate::error::{BreakerError, Result};

const ARMED: u8 = 0;
const EXPIRED: u8 = 1;
const CANCELLED: u8 = 2;

/// Observable state of a [`CancelToken`]
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CancelState {
    Armed,
    Expired,
    Cancelled,
}

/// Shared, sticky halt flag
#[derive(Debug, Clone, Default)]
pub struct CancelToken {
    state: Arc<AtomicU8>,
}

impl CancelToken {
    pub fn new() -> Self {
        Self::default()
    }

    /// Non-blocking poll used by the generators
    #[inline]
    pub fn is_halted(&self) -> bool {
        self.state.load(Ordering::Acquire) != ARMED
    }

    pub fn state(&self) -> CancelState {
        match self.state.load(Ordering::Acquire) {
            ARMED => CancelState::Armed,
            EXPIRED => CancelState::Expired,
            _ => CancelState::Cancelled,
        }
    }

    pub fn is_expired(&self) -> bool {
        self.state() == CancelState::Expired
    }

    pub fn is_cancelled(&self) -> bool {
        self.state() == CancelState::Cancelled
    }

    /// Mark the deadline as reached.
    ///
    /// Returns `false` when the token already left the armed state; late or
    /// repeated calls are no-ops.
    pub fn expire(&self) -> bool {
        self.transition(EXPIRED)
    }

    /// Abort the search explicitly. Same one-shot semantics as [`expire`](Self::expire).
    pub fn cancel(&self) -> bool {
        self.transition(CANCELLED)
    }

    fn transition(&self, to: u8) -> bool {
        self.state
            .compare_exchange(ARMED, to, Ordering::AcqRel, Ordering::Acquire)
            .is_ok()
    }
}

/// One-shot timer that expires a token after a duration.
///
/// Dropping the deadline aborts the timer task. Aborting after the timer
/// already fired, or firing after the search returned, is harmless.
#[derive(Debug)]
pub struct Deadline {
    timeout: Duration,
    handle: JoinHandle<()>,
}

impl Deadline {
    /// Start the timer on the current tokio runtime
    pub fn arm(token: &CancelToken, timeout: Duration) -> Result<Self> {
        let runtime = tokio::runtime::Handle::try_current().map_err(|e| {
            BreakerError::internal(format!("Deadline requires a tokio runtime: {}", e))
        })?;

        let token = token.clone();
        let handle = runtime.spawn(async move {
            tokio::time::sleep(timeout).await;
            if token.expire() {
                tracing::debug!(timeout_ms = %timeout.as_millis(), "Search deadline reached");
            }
        });

        Ok(Self { timeout, handle })
    }

    pub fn timeout(&self) -> Duration {
        self.timeout
    }

    pub fn is_finished(&self) -> bool {
        self.handle.is_finished()
    }

    /// Stop the timer without touching the token
    pub fn disarm(self) {
        drop(self);
    }
}

impl Drop for Deadline {
    fn drop(&mut self) {
        self.handle.abort();
    }
}
