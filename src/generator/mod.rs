//! Candidate generation
//!
//! Two strategies walk the same search space in the same order:
//! - recursive: depth-first over buffer positions
//! - iterative: mixed-radix decomposition of every index in `0..base^len`
//!
//! Both write into a caller-owned buffer and hand the full candidate to a
//! `check` callback, stopping at the first `true`.

pub mod iterative;
mod recursive;

use crate::cancel::CancelToken;
use crate::error::{BreakerError, Result};
use crate::types::Strategy;

/// Longest candidate either strategy will build.
///
/// The recursive walk uses one stack frame per position, and a one-symbol
/// alphabet keeps `base^len` at 1 for any length, so the space check alone
/// does not bound the depth.
pub const MAX_PASSWORD_LENGTH: usize = 64;

/// Ordered set of symbols a candidate is built from.
///
/// Index 0 is enumerated first at every position.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Alphabet {
    symbols: Vec<u8>,
}

impl Alphabet {
    /// The ten decimal digits, `0` through `9`
    pub fn digits() -> Self {
        Self {
            symbols: b"0123456789".to_vec(),
        }
    }

    /// Build a custom alphabet; symbols must be non-empty and unique
    pub fn new(symbols: impl Into<Vec<u8>>) -> Result<Self> {
        let symbols = symbols.into();
        if symbols.is_empty() {
            return Err(BreakerError::config("Alphabet cannot be empty"));
        }

        let mut seen = [false; 256];
        for &symbol in &symbols {
            if std::mem::replace(&mut seen[symbol as usize], true) {
                return Err(BreakerError::config(format!(
                    "Alphabet contains duplicate symbol {:?}",
                    symbol as char
                )));
            }
        }

        Ok(Self { symbols })
    }

    pub fn symbols(&self) -> &[u8] {
        &self.symbols
    }

    /// Number of symbols, i.e. the radix of the search space
    pub fn len(&self) -> usize {
        self.symbols.len()
    }

    pub fn is_empty(&self) -> bool {
        self.symbols.is_empty()
    }

    /// `len^length`, or `None` when it does not fit in 64 bits
    pub fn total_combinations(&self, length: usize) -> Option<u64> {
        let exponent = u32::try_from(length).ok()?;
        (self.symbols.len() as u64).checked_pow(exponent)
    }

    /// Like [`total_combinations`](Self::total_combinations) but as a checked error
    pub fn search_space(&self, length: usize) -> Result<u64> {
        self.total_combinations(length)
            .ok_or(BreakerError::SearchSpaceTooLarge {
                base: self.len(),
                length,
            })
    }
}

impl Default for Alphabet {
    fn default() -> Self {
        Self::digits()
    }
}

/// Run the selected strategy over `buffer`.
///
/// Returns `true` when `check` accepted a candidate; the buffer then holds it.
/// Returns `false` on exhaustion or when `cancel` halted the walk.
pub fn search<F>(
    strategy: Strategy,
    alphabet: &Alphabet,
    buffer: &mut [u8],
    check: &mut F,
    cancel: &CancelToken,
) -> Result<bool>
where
    F: FnMut(&[u8]) -> bool,
{
    if buffer.is_empty() {
        return Err(BreakerError::config("Password length must be at least 1"));
    }
    if buffer.len() > MAX_PASSWORD_LENGTH {
        return Err(BreakerError::config(format!(
            "Password length {} exceeds the maximum of {}",
            buffer.len(),
            MAX_PASSWORD_LENGTH
        )));
    }
    alphabet.search_space(buffer.len())?;

    let found = match strategy {
        Strategy::Recursive => recursive::search(alphabet, buffer, 0, check, cancel),
        Strategy::Iterative => iterative::search(alphabet, buffer, check, cancel),
    };
    Ok(found)
}
