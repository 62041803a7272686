//! Password oracles
//!
//! An oracle owns the protected target and answers three questions: is it
//! protected at all, does a candidate unlock it, and what may the holder of a
//! working password do with it. The engine never looks inside the target.

pub mod memory;
#[cfg(feature = "pdf")]
pub mod pdf;

pub use memory::MemoryOracle;
#[cfg(feature = "pdf")]
pub use pdf::PdfOracle;

use serde::{Deserialize, Serialize};

use crate::error::Result;

/// Core trait for all password oracles.
///
/// `validate` sits on the hot path: it is called once per candidate, must not
/// retain or modify the candidate, and must not spawn work that outlives the
/// call.
pub trait Oracle: Send + Sync {
    /// Whether the target needs a password at all
    fn is_protected(&self) -> Result<bool>;

    /// Whether `candidate` unlocks the target
    fn validate(&self, candidate: &[u8]) -> Result<bool>;

    /// Describe what `password` grants, for reporting after a match
    fn describe_access(&self, password: &[u8]) -> Result<AccessRights>;

    /// Oracle name used in logs
    fn name(&self) -> &'static str;
}

/// Result of validating one candidate
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Verdict {
    NoMatch,
    Match,
    /// Validation itself failed; counted as a non-match
    Failed(String),
}

impl Verdict {
    /// Ask `oracle` about `candidate`, folding errors into [`Verdict::Failed`]
    pub fn of(oracle: &dyn Oracle, candidate: &[u8]) -> Self {
        match oracle.validate(candidate) {
            Ok(true) => Verdict::Match,
            Ok(false) => Verdict::NoMatch,
            Err(e) => Verdict::Failed(e.to_string()),
        }
    }

    pub fn is_match(&self) -> bool {
        matches!(self, Verdict::Match)
    }
}

/// Permissions granted by a document password.
///
/// Mirrors the user access permission bits of a PDF standard security
/// handler (`/P` entry).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct AccessRights {
    pub print: bool,
    pub modify: bool,
    pub copy: bool,
    pub annotate: bool,
    pub fill_forms: bool,
    pub extract_for_accessibility: bool,
    pub assemble: bool,
    pub print_high_quality: bool,
    /// Raw permission word when the target exposes one
    pub raw: Option<i32>,
}

impl AccessRights {
    /// Every permission granted
    pub fn full() -> Self {
        Self::from_bits(-1)
    }

    /// Decode a `/P` permission word (bit 3 = print ... bit 12 = high quality print)
    pub fn from_bits(p: i32) -> Self {
        let bit = |n: u32| p & (1 << (n - 1)) != 0;
        Self {
            print: bit(3),
            modify: bit(4),
            copy: bit(5),
            annotate: bit(6),
            fill_forms: bit(9),
            extract_for_accessibility: bit(10),
            assemble: bit(11),
            print_high_quality: bit(12),
            raw: Some(p),
        }
    }

    /// Names of the granted permissions
    pub fn granted(&self) -> Vec<&'static str> {
        [
            (self.print, "print"),
            (self.modify, "modify"),
            (self.copy, "copy"),
            (self.annotate, "annotate"),
            (self.fill_forms, "fill-forms"),
            (self.extract_for_accessibility, "extract-accessibility"),
            (self.assemble, "assemble"),
            (self.print_high_quality, "print-high-quality"),
        ]
        .into_iter()
        .filter_map(|(granted, name)| granted.then_some(name))
        .collect()
    }
}

impl std::fmt::Display for AccessRights {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let granted = self.granted();
        if granted.is_empty() {
            write!(f, "none")
        } else {
            write!(f, "{}", granted.join(", "))
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_rights_from_bits() {
        // print + copy only: bits 3 and 5 plus the reserved high bits
        let p = (0xFFFF_F0C0u32 as i32) | (1 << 2) | (1 << 4);
        let rights = AccessRights::from_bits(p);

        assert!(rights.print);
        assert!(rights.copy);
        assert!(!rights.modify);
        assert!(!rights.assemble);
        assert_eq!(rights.raw, Some(p));
        assert_eq!(rights.to_string(), "print, copy");
    }

    #[test]
    fn test_full_rights() {
        let rights = AccessRights::full();
        assert_eq!(rights.granted().len(), 8);
    }

    #[test]
    fn test_verdict_folds_errors() {
        let oracle = MemoryOracle::new("42").failing_validation();
        assert!(matches!(Verdict::of(&oracle, b"42"), Verdict::Failed(_)));

        let oracle = MemoryOracle::new("42");
        assert!(Verdict::of(&oracle, b"42").is_match());
        assert_eq!(Verdict::of(&oracle, b"41"), Verdict::NoMatch);
    }
}
