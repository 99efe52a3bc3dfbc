//! Length and SHA-256 checks run against the reference digits before anything is chunked.

use crate::digits::Digits;
use log::debug;
use serde::{Deserialize, Serialize};
use sha2::{Digest, Sha256};
use thiserror::Error;

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum IntegrityError {
    #[error("digit length mismatch: expected {expected}, got {actual}")]
    LengthMismatch { expected: usize, actual: usize },

    #[error("digit hash mismatch: expected {expected}, got {actual}")]
    HashMismatch { expected: String, actual: String },
}

/// The expected length and SHA-256 of a digit sequence.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct IntegrityRecord {
    pub expected_length: usize,
    /// Lowercase hex.
    pub expected_sha256: String,
}

/// Digit count of M136279841.
pub const REFERENCE_LENGTH: usize = 41_024_320;

/// SHA-256 of the digits of M136279841, with no separators.
pub const REFERENCE_SHA256: &str =
    "14b98acc8e181001c699ad6a4cabe3858ba011fb782d570628312482bc8a2cde";

impl IntegrityRecord {
    #[must_use]
    pub fn new(expected_length: usize, expected_sha256: impl Into<String>) -> Self {
        Self {
            expected_length,
            expected_sha256: expected_sha256.into(),
        }
    }

    /// The record for the reference deployment.
    #[must_use]
    pub fn reference() -> Self {
        Self::new(REFERENCE_LENGTH, REFERENCE_SHA256)
    }

    /// Compute the record that `digits` would pass.
    #[must_use]
    pub fn measure(digits: &Digits) -> Self {
        Self::new(digits.len(), sha256_hex(digits.as_str()))
    }

    /// Check the length first, then the hash.
    ///
    /// # Errors
    /// Returns `LengthMismatch` or `HashMismatch` for the first check that fails.
    pub fn verify(&self, digits: &Digits) -> Result<(), IntegrityError> {
        if digits.len() != self.expected_length {
            return Err(IntegrityError::LengthMismatch {
                expected: self.expected_length,
                actual: digits.len(),
            });
        }
        debug!("Digit length check passed ({} digits)", digits.len());

        let actual = sha256_hex(digits.as_str());
        if !actual.eq_ignore_ascii_case(&self.expected_sha256) {
            return Err(IntegrityError::HashMismatch {
                expected: self.expected_sha256.clone(),
                actual,
            });
        }
        debug!("Digit hash check passed ({actual})");

        Ok(())
    }
}

fn sha256_hex(text: &str) -> String {
    let digest = Sha256::digest(text.as_bytes());
    digest.iter().map(|b| format!("{b:02x}")).collect()
}
