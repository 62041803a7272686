//! In-memory oracle with a fixed secret

use parking_lot::Mutex;
use std::sync::atomic::{AtomicU64, Ordering};
use std::time::Duration;

use super::{AccessRights, Oracle};
use crate::error::{BreakerError, Result};

/// Oracle that knows its password up front.
///
/// Useful for exercising the engine without a real document: it counts
/// validation calls, can record every candidate it sees, and can be told to
/// fail or slow down.
#[derive(Debug)]
pub struct MemoryOracle {
    secret: Option<Vec<u8>>,
    protected: bool,
    rights: AccessRights,
    fail_protection: bool,
    fail_validation: bool,
    fail_description: bool,
    delay: Option<Duration>,
    validate_calls: AtomicU64,
    recorded: Option<Mutex<Vec<Vec<u8>>>>,
}

impl MemoryOracle {
    /// Protected target unlocked by `secret`
    pub fn new(secret: impl Into<Vec<u8>>) -> Self {
        Self::build(Some(secret.into()), true)
    }

    /// Protected target no candidate can unlock
    pub fn never_matching() -> Self {
        Self::build(None, true)
    }

    /// Target without a password
    pub fn unprotected() -> Self {
        Self::build(None, false)
    }

    fn build(secret: Option<Vec<u8>>, protected: bool) -> Self {
        Self {
            secret,
            protected,
            rights: AccessRights::full(),
            fail_protection: false,
            fail_validation: false,
            fail_description: false,
            delay: None,
            validate_calls: AtomicU64::new(0),
            recorded: None,
        }
    }

    /// Rights reported once the secret is found
    pub fn with_rights(mut self, rights: AccessRights) -> Self {
        self.rights = rights;
        self
    }

    /// Sleep this long inside every `validate` call
    pub fn with_delay(mut self, delay: Duration) -> Self {
        self.delay = Some(delay);
        self
    }

    /// Keep a copy of every validated candidate
    pub fn recording(mut self) -> Self {
        self.recorded = Some(Mutex::new(Vec::new()));
        self
    }

    /// Make `is_protected` fail
    pub fn failing_protection_check(mut self) -> Self {
        self.fail_protection = true;
        self
    }

    /// Make every `validate` call fail
    pub fn failing_validation(mut self) -> Self {
        self.fail_validation = true;
        self
    }

    /// Make `describe_access` fail
    pub fn failing_description(mut self) -> Self {
        self.fail_description = true;
        self
    }

    /// Number of `validate` calls so far
    pub fn validate_calls(&self) -> u64 {
        self.validate_calls.load(Ordering::Relaxed)
    }

    /// Candidates seen so far, in call order (empty unless [`recording`](Self::recording))
    pub fn recorded(&self) -> Vec<Vec<u8>> {
        self.recorded
            .as_ref()
            .map(|r| r.lock().clone())
            .unwrap_or_default()
    }

    fn unlocks(&self, candidate: &[u8]) -> bool {
        self.secret.as_deref() == Some(candidate)
    }
}

impl Oracle for MemoryOracle {
    fn is_protected(&self) -> Result<bool> {
        if self.fail_protection {
            return Err(BreakerError::oracle("protection state unavailable"));
        }
        Ok(self.protected)
    }

    fn validate(&self, candidate: &[u8]) -> Result<bool> {
        self.validate_calls.fetch_add(1, Ordering::Relaxed);
        if let Some(recorded) = &self.recorded {
            recorded.lock().push(candidate.to_vec());
        }
        if let Some(delay) = self.delay {
            std::thread::sleep(delay);
        }

        if self.fail_validation {
            return Err(BreakerError::oracle(format!(
                "cannot validate candidate of {} bytes",
                candidate.len()
            )));
        }
        Ok(self.unlocks(candidate))
    }

    fn describe_access(&self, password: &[u8]) -> Result<AccessRights> {
        if self.fail_description {
            return Err(BreakerError::oracle("access rights unavailable"));
        }
        if !self.unlocks(password) {
            return Err(BreakerError::oracle("password does not unlock the target"));
        }
        Ok(self.rights)
    }

    fn name(&self) -> &'static str {
        "memory"
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_secret_matching() {
        let oracle = MemoryOracle::new("0042");
        assert!(oracle.is_protected().unwrap());
        assert!(oracle.validate(b"0042").unwrap());
        assert!(!oracle.validate(b"0043").unwrap());
        assert_eq!(oracle.validate_calls(), 2);
    }

    #[test]
    fn test_unprotected_and_never_matching() {
        assert!(!MemoryOracle::unprotected().is_protected().unwrap());

        let oracle = MemoryOracle::never_matching();
        assert!(oracle.is_protected().unwrap());
        assert!(!oracle.validate(b"").unwrap());
        assert!(oracle.describe_access(b"1").is_err());
    }

    #[test]
    fn test_recording() {
        let oracle = MemoryOracle::new("9").recording();
        oracle.validate(b"1").unwrap();
        oracle.validate(b"2").unwrap();
        assert_eq!(oracle.recorded(), vec![b"1".to_vec(), b"2".to_vec()]);

        let silent = MemoryOracle::new("9");
        silent.validate(b"1").unwrap();
        assert!(silent.recorded().is_empty());
    }

    #[test]
    fn test_failure_modes() {
        let oracle = MemoryOracle::new("7")
            .failing_validation()
            .failing_description()
            .failing_protection_check();

        assert!(oracle.is_protected().is_err());
        assert!(oracle.validate(b"7").is_err());
        assert!(oracle.describe_access(b"7").is_err());
        assert_eq!(oracle.validate_calls(), 1);
    }

    #[test]
    fn test_describe_access() {
        let rights = AccessRights::from_bits(1 << 2);
        let oracle = MemoryOracle::new("12").with_rights(rights);
        assert_eq!(oracle.describe_access(b"12").unwrap(), rights);
    }
}
