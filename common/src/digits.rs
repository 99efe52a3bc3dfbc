//! Normalizing arbitrary text into digits and splitting digits into fixed-size chunks.

use std::fmt;
use std::iter::FusedIterator;
use thiserror::Error;

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum DigitsError {
    #[error("invalid chunk size: {0} (must be a positive integer)")]
    InvalidChunkSize(usize),
}

/// A sequence of ASCII decimal digits.
///
/// The only way to get one is [`Digits::from_text`], which drops every other character,
/// so anything holding a `Digits` can slice it on byte offsets.
#[derive(Debug, Clone, Default, PartialEq, Eq, Hash)]
pub struct Digits(String);

impl Digits {
    /// Keep only the decimal digits of `raw`, in order.
    #[must_use]
    pub fn from_text(raw: &str) -> Self {
        Self(raw.chars().filter(char::is_ascii_digit).collect())
    }

    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.0
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.0.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    /// Number of chunks [`Digits::chunks`] would produce for this size.
    ///
    /// # Errors
    /// Returns `InvalidChunkSize` if `size` is zero.
    pub fn chunk_count(&self, size: usize) -> Result<usize, DigitsError> {
        if size == 0 {
            return Err(DigitsError::InvalidChunkSize(size));
        }
        Ok(self.len().div_ceil(size))
    }

    /// Iterate over consecutive chunks of `size` digits, left to right.
    ///
    /// The last chunk is shorter when the length is not a multiple of `size`.
    /// Calling this again starts over from the beginning.
    ///
    /// # Errors
    /// Returns `InvalidChunkSize` if `size` is zero.
    pub fn chunks(&self, size: usize) -> Result<Chunks<'_>, DigitsError> {
        if size == 0 {
            return Err(DigitsError::InvalidChunkSize(size));
        }
        Ok(Chunks {
            remaining: &self.0,
            size,
        })
    }
}

impl fmt::Display for Digits {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl AsRef<str> for Digits {
    fn as_ref(&self) -> &str {
        &self.0
    }
}

/// Iterator returned by [`Digits::chunks`].
#[derive(Debug, Clone)]
pub struct Chunks<'a> {
    remaining: &'a str,
    size: usize,
}

impl<'a> Iterator for Chunks<'a> {
    type Item = &'a str;

    fn next(&mut self) -> Option<&'a str> {
        if self.remaining.is_empty() {
            return None;
        }
        // digits are all single-byte, so any offset is a char boundary
        let end = self.size.min(self.remaining.len());
        let (chunk, rest) = self.remaining.split_at(end);
        self.remaining = rest;
        Some(chunk)
    }

    fn size_hint(&self) -> (usize, Option<usize>) {
        let n = self.remaining.len().div_ceil(self.size);
        (n, Some(n))
    }
}

impl ExactSizeIterator for Chunks<'_> {}

impl FusedIterator for Chunks<'_> {}
