//! Error handling for pdf-breaker

use std::time::Duration;
use thiserror::Error;

/// Main error type for pdf-breaker
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum BreakerError {
    #[error("Target is not password protected")]
    NotProtected,

    #[error("Search space exhausted after {attempts} candidates ({oracle_errors} oracle errors)")]
    Exhausted { attempts: u64, oracle_errors: u64 },

    #[error("Search timed out after {timeout:?} ({attempts} candidates tried)")]
    TimedOut { attempts: u64, timeout: Duration },

    #[error("Search cancelled after {attempts} candidates")]
    Cancelled { attempts: u64 },

    #[error("Oracle error: {message}")]
    Oracle { message: String },

    #[error("Configuration error: {message}")]
    Config { message: String },

    #[error("Search space too large: {base}^{length} candidates do not fit in 64 bits")]
    SearchSpaceTooLarge { base: usize, length: usize },

    #[error("IO error: {message}")]
    Io {
        message: String,
        path: Option<String>,
    },

    #[error("Internal error: {message}")]
    Internal { message: String },
}

impl BreakerError {
    /// Create an exhaustion error
    pub fn exhausted(attempts: u64, oracle_errors: u64) -> Self {
        Self::Exhausted {
            attempts,
            oracle_errors,
        }
    }

    /// Create a timeout error
    pub fn timed_out(attempts: u64, timeout: Duration) -> Self {
        Self::TimedOut { attempts, timeout }
    }

    /// Create a cancellation error
    pub fn cancelled(attempts: u64) -> Self {
        Self::Cancelled { attempts }
    }

    /// Create an oracle error
    pub fn oracle(message: impl Into<String>) -> Self {
        Self::Oracle {
            message: message.into(),
        }
    }

    /// Create a configuration error
    pub fn config(message: impl Into<String>) -> Self {
        Self::Config {
            message: message.into(),
        }
    }

    /// Create an IO error
    pub fn io(message: impl Into<String>, path: Option<String>) -> Self {
        Self::Io {
            message: message.into(),
            path,
        }
    }

    /// Create an internal error
    pub fn internal(message: impl Into<String>) -> Self {
        Self::Internal {
            message: message.into(),
        }
    }

    /// True when the search ran but produced no password.
    ///
    /// Exhaustion, timeout and cancellation stay distinct variants; this only
    /// groups them for callers that report all three the same way.
    pub fn is_no_password_found(&self) -> bool {
        matches!(
            self,
            Self::Exhausted { .. } | Self::TimedOut { .. } | Self::Cancelled { .. }
        )
    }

    /// Number of candidates tried before the search stopped, if it ran at all
    pub fn attempts(&self) -> Option<u64> {
        match self {
            Self::Exhausted { attempts, .. }
            | Self::TimedOut { attempts, .. }
            | Self::Cancelled { attempts } => Some(*attempts),
            _ => None,
        }
    }

    /// Get user-friendly error message with suggestions
    pub fn user_message(&self) -> String {
        match self {
            Self::NotProtected => {
                "ℹ️  The document is not password protected\n💡 Nothing to recover".to_string()
            }
            Self::Exhausted { attempts, oracle_errors } => {
                let errors = if *oracle_errors > 0 {
                    format!(" ({} validation errors)", oracle_errors)
                } else {
                    String::new()
                };
                format!(
                    "✗ Password not found after {} candidates{}\n💡 Try a different password length",
                    attempts, errors
                )
            }
            Self::TimedOut { attempts, timeout } => {
                format!(
                    "⏱️  Gave up after {:?} ({} candidates tried)\n💡 Increase the timeout with -t",
                    timeout, attempts
                )
            }
            Self::Cancelled { attempts } => {
                format!("⏹️  Search cancelled after {} candidates", attempts)
            }
            Self::Oracle { message } => {
                format!("❌ Could not inspect the document: {}\n💡 Check that the file is a valid PDF", message)
            }
            Self::Config { message } => {
                format!("❌ Configuration problem: {}\n💡 Check your flags or .env file", message)
            }
            Self::SearchSpaceTooLarge { base, length } => {
                format!(
                    "❌ {}^{} candidates is too many to enumerate\n💡 Use a shorter password length",
                    base, length
                )
            }
            Self::Io { message, path } => {
                let path_info = path.as_ref().map_or(String::new(), |p| format!(" ({})", p));
                format!("❌ File error{}: {}\n💡 Check file permissions and paths", path_info, message)
            }
            Self::Internal { message } => {
                format!("❌ Internal error: {}\n💡 This is a bug, please report it", message)
            }
        }
    }
}

impl From<serde_json::Error> for BreakerError {
    fn from(err: serde_json::Error) -> Self {
        Self::internal(format!("JSON serialization failed: {}", err))
    }
}

impl From<std::io::Error> for BreakerError {
    fn from(err: std::io::Error) -> Self {
        Self::io(err.to_string(), None)
    }
}

#[cfg(feature = "pdf")]
impl From<lopdf::Error> for BreakerError {
    fn from(err: lopdf::Error) -> Self {
        Self::oracle(err.to_string())
    }
}

/// Result type alias for pdf-breaker
pub type Result<T> = std::result::Result<T, BreakerError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_creation() {
        let error = BreakerError::config("bad length");
        assert!(matches!(error, BreakerError::Config { .. }));
        assert!(error.to_string().contains("bad length"));

        let error = BreakerError::timed_out(42, Duration::from_secs(5));
        assert_eq!(error.attempts(), Some(42));
        assert!(error.to_string().contains("5s"));

        let error = BreakerError::timed_out(7, Duration::from_millis(40));
        assert!(error.to_string().contains("40ms"), "{}", error);
        assert!(error.user_message().contains("Gave up after 40ms"));
    }

    #[test]
    fn test_no_password_found_grouping() {
        assert!(BreakerError::exhausted(8, 0).is_no_password_found());
        assert!(BreakerError::timed_out(1, Duration::from_secs(1)).is_no_password_found());
        assert!(BreakerError::cancelled(3).is_no_password_found());
        assert!(!BreakerError::NotProtected.is_no_password_found());
        assert!(!BreakerError::oracle("broken").is_no_password_found());
        assert_ne!(BreakerError::exhausted(8, 0), BreakerError::timed_out(8, Duration::from_secs(1)));
    }

    #[test]
    fn test_user_messages() {
        let msg = BreakerError::NotProtected.user_message();
        assert!(msg.contains("not password protected"));

        let msg = BreakerError::exhausted(10, 3).user_message();
        assert!(msg.contains("3 validation errors"));

        let msg = BreakerError::io("missing", Some("a.pdf".to_string())).user_message();
        assert!(msg.contains("a.pdf"));
    }
}
