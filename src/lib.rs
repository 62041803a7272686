//! PDF Breaker - digit password recovery for protected documents
//!
//! Enumerates fixed-length candidates over an alphabet (decimal digits by
//! default) and tests each one against an [`Oracle`] until one matches, the
//! space is exhausted, or a deadline passes.

pub mod breaker;
pub mod cancel;
pub mod error;
pub mod generator;
pub mod observer;
pub mod oracle;
pub mod types;

// Re-export commonly used types
pub use breaker::{Breaker, Cracked};
pub use cancel::{CancelState, CancelToken, Deadline};
pub use error::{BreakerError, Result};
pub use generator::Alphabet;
pub use observer::{NoopObserver, SearchObserver, TracingObserver};
pub use oracle::{AccessRights, MemoryOracle, Oracle, Verdict};
#[cfg(feature = "pdf")]
pub use oracle::PdfOracle;
pub use types::{
    MetricsSnapshot, Outcome, SearchConfig, SearchMetrics, SearchProgress, SearchReport, Strategy,
};

/// Library version
pub const VERSION: &str = env!("CARGO_PKG_VERSION");

/// Initialize the library
pub fn init() -> Result<()> {
    // Load .env file if it exists
    dotenv::dotenv().ok();
    Ok(())
}
