//! A library for verifying that a digit string is one chunk of a large reference sequence.
//!
//! The reference digits are split into fixed-size chunks once, offline, and each chunk is
//! reduced to a 32-bit FNV-1a hash. Only the list of hashes is shipped with the server, so
//! checks never need the reference itself.

#![warn(clippy::all, clippy::pedantic)]

pub mod artifact;
pub mod builder;
pub mod chunk_hash;
#[cfg(feature = "client")]
pub mod client_api;
pub mod digits;
pub mod integrity;
pub mod verifier;

pub use artifact::{ArtifactError, LookupArtifact};
pub use builder::{BuildError, build, build_to_path};
pub use chunk_hash::{ChunkHash, fnv1a_32};
pub use digits::{Chunks, Digits, DigitsError};
pub use integrity::{IntegrityError, IntegrityRecord};
pub use verifier::LookupSet;

pub const CLIENT_VERSION: &str = env!("CARGO_PKG_VERSION");

/// Number of digits in each chunk of the reference deployment.
pub const CHUNK_SIZE: usize = 419;

/// Where the builder writes the artifact and the api reads it, relative to the working directory.
pub const DEFAULT_ARTIFACT_PATH: &str = "data/chunk_hashes.json";

/// Where to obtain the reference digits (the decimal expansion of M136279841).
pub const REFERENCE_URL: &str = "https://www.mersenne.org/primes/digits/M136279841.zip";

/// The file name inside the reference archive.
pub const REFERENCE_FILE_NAME: &str = "m136279841.txt";

/// Seconds to wait on the api before giving up on a request.
pub const CLIENT_REQUEST_TIMEOUT_SECS: u64 = 10;

/// The body returned by the check endpoint.
#[derive(Debug, Clone, Copy, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
pub struct CheckResponse {
    pub result: bool,
}
