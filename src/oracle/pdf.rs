//! PDF document oracle backed by lopdf

use lopdf::encryption::DecryptionError;
use lopdf::{Document, Object};
use std::path::{Path, PathBuf};

use super::{AccessRights, Oracle};
use crate::error::{BreakerError, Result};

/// Oracle over a PDF protected by the standard security handler
pub struct PdfOracle {
    path: PathBuf,
    document: Document,
}

impl PdfOracle {
    /// Load the document at `path`
    pub fn open(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();
        if !path.is_file() {
            return Err(BreakerError::io(
                "File not found",
                Some(path.to_string_lossy().to_string()),
            ));
        }

        let document = Document::load(path).map_err(|e| {
            BreakerError::io(
                format!("Failed to load PDF: {}", e),
                Some(path.to_string_lossy().to_string()),
            )
        })?;

        tracing::debug!(
            path = %path.display(),
            encrypted = %document.is_encrypted(),
            "PDF loaded"
        );

        Ok(Self {
            path: path.to_path_buf(),
            document,
        })
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    /// The `/P` permission word from the encryption dictionary
    fn permission_bits(&self) -> Result<i32> {
        let encrypt = self
            .document
            .trailer
            .get(b"Encrypt")
            .map_err(|_| BreakerError::oracle("Document has no encryption dictionary"))?;

        let dictionary = match encrypt {
            Object::Reference(id) => self.document.get_object(*id)?.as_dict()?,
            other => other.as_dict()?,
        };

        let p = dictionary.get(b"P")?.as_i64()?;
        Ok(p as i32)
    }
}

impl Oracle for PdfOracle {
    fn is_protected(&self) -> Result<bool> {
        Ok(self.document.is_encrypted())
    }

    fn validate(&self, candidate: &[u8]) -> Result<bool> {
        let password = std::str::from_utf8(candidate)
            .map_err(|e| BreakerError::oracle(format!("Candidate is not valid UTF-8: {}", e)))?;

        match self.document.authenticate_password(password) {
            Ok(()) => Ok(true),
            Err(lopdf::Error::Decryption(DecryptionError::IncorrectPassword)) => Ok(false),
            Err(e) => Err(e.into()),
        }
    }

    fn describe_access(&self, password: &[u8]) -> Result<AccessRights> {
        if !self.validate(password)? {
            return Err(BreakerError::oracle("Password does not unlock the document"));
        }
        Ok(AccessRights::from_bits(self.permission_bits()?))
    }

    fn name(&self) -> &'static str {
        "pdf"
    }
}
