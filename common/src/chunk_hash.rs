//! The 32-bit FNV-1a chunk hash and its hex rendering.

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;
use thiserror::Error;

const FNV_OFFSET: u32 = 0x811c_9dc5;
const FNV_PRIME: u32 = 0x0100_0193;

/// Length of a rendered hash.
pub const HEX_LEN: usize = 8;

/// The hash of one chunk of digits.
/// Serialized as 8 lowercase hex characters.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct ChunkHash(u32);

#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("invalid chunk hash {0:?}: expected 8 hex characters")]
pub struct ParseChunkHashError(String);

impl ChunkHash {
    #[must_use]
    pub const fn from_u32(value: u32) -> Self {
        Self(value)
    }

    #[must_use]
    pub const fn as_u32(self) -> u32 {
        self.0
    }

    #[must_use]
    pub fn to_hex(self) -> String {
        format!("{:08x}", self.0)
    }
}

/// 32-bit FNV-1a over the bytes of `text`.
///
/// For digit strings every byte is one character, so this matches hashing character codes.
#[must_use]
pub fn fnv1a_32(text: &str) -> ChunkHash {
    let mut hash = FNV_OFFSET;
    for byte in text.as_bytes() {
        hash ^= u32::from(*byte);
        hash = hash.wrapping_mul(FNV_PRIME);
    }
    ChunkHash(hash)
}

impl fmt::Display for ChunkHash {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{:08x}", self.0)
    }
}

impl FromStr for ChunkHash {
    type Err = ParseChunkHashError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        if s.len() != HEX_LEN || !s.bytes().all(|b| b.is_ascii_hexdigit()) {
            return Err(ParseChunkHashError(s.to_string()));
        }
        u32::from_str_radix(s, 16)
            .map(Self)
            .map_err(|_| ParseChunkHashError(s.to_string()))
    }
}

impl TryFrom<String> for ChunkHash {
    type Error = ParseChunkHashError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        value.parse()
    }
}

impl From<ChunkHash> for String {
    fn from(hash: ChunkHash) -> Self {
        hash.to_hex()
    }
}
