//! Build the lookup artifact from the reference digits.

use crate::artifact::{ArtifactError, LookupArtifact};
use crate::chunk_hash::ChunkHash;
use crate::digits::{Digits, DigitsError};
use crate::integrity::{IntegrityError, IntegrityRecord};
use log::{debug, info};
use std::path::Path;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum BuildError {
    #[error(transparent)]
    Integrity(#[from] IntegrityError),

    #[error(transparent)]
    Digits(#[from] DigitsError),

    #[error(transparent)]
    Artifact(#[from] ArtifactError),
}

/// Normalize `reference_raw`, verify it against `integrity`, and hash every chunk in order.
///
/// Both integrity checks must pass before any chunk is hashed.
///
/// # Errors
/// Returns `Integrity` if the digits fail a check and `Digits` if `chunk_size` is zero.
pub fn build<F>(
    reference_raw: &str,
    integrity: &IntegrityRecord,
    chunk_size: usize,
    hash_fn: F,
) -> Result<LookupArtifact, BuildError>
where
    F: Fn(&str) -> ChunkHash,
{
    let digits = Digits::from_text(reference_raw);

    integrity.verify(&digits)?;
    info!("Integrity checks passed for {} digits", digits.len());

    let hashes: Vec<ChunkHash> = digits.chunks(chunk_size)?.map(hash_fn).collect();
    debug!("Hashed {} chunks of {chunk_size} digits", hashes.len());

    Ok(LookupArtifact::new(hashes))
}

/// [`build`], then write the artifact to `out_path`. Nothing is written if the build fails.
///
/// # Errors
/// Returns any error from [`build`], or `Artifact` if the write fails.
pub fn build_to_path<F>(
    reference_raw: &str,
    integrity: &IntegrityRecord,
    chunk_size: usize,
    hash_fn: F,
    out_path: &Path,
) -> Result<LookupArtifact, BuildError>
where
    F: Fn(&str) -> ChunkHash,
{
    let artifact = build(reference_raw, integrity, chunk_size, hash_fn)?;
    artifact.write_to(out_path)?;
    info!("Chunk hashes written to {}", out_path.display());
    Ok(artifact)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::chunk_hash::fnv1a_32;
    use std::path::PathBuf;

    fn record_for(raw: &str) -> IntegrityRecord {
        IntegrityRecord::measure(&Digits::from_text(raw))
    }

    fn temp_path(name: &str) -> PathBuf {
        std::env::temp_dir()
            .join(format!("digits_builder_{name}_{}", std::process::id()))
            .join("chunk_hashes.json")
    }

    #[test_log::test]
    fn test_build_two_chunks() {
        let artifact = build("12345678", &record_for("12345678"), 4, fnv1a_32).unwrap();
        assert_eq!(artifact.hashes(), &[fnv1a_32("1234"), fnv1a_32("5678")]);
    }

    #[test_log::test]
    fn test_build_short_last_chunk() {
        let raw = "3.14159 26535 89793";
        let artifact = build(raw, &record_for(raw), 5, fnv1a_32).unwrap();
        assert_eq!(
            artifact.hashes(),
            &[
                fnv1a_32("31415"),
                fnv1a_32("92653"),
                fnv1a_32("58979"),
                fnv1a_32("3")
            ]
        );
    }

    #[test_log::test]
    fn test_build_uses_given_hash_fn() {
        let artifact = build("123456", &record_for("123456"), 2, |chunk| {
            ChunkHash::from_u32(chunk.parse().unwrap())
        })
        .unwrap();
        assert_eq!(
            artifact.hashes(),
            &[
                ChunkHash::from_u32(12),
                ChunkHash::from_u32(34),
                ChunkHash::from_u32(56)
            ]
        );
    }

    #[test_log::test]
    fn test_build_length_mismatch() {
        let result = build("1234567", &record_for("12345678"), 4, fnv1a_32);
        assert!(matches!(
            result,
            Err(BuildError::Integrity(IntegrityError::LengthMismatch {
                expected: 8,
                actual: 7
            }))
        ));
    }

    #[test_log::test]
    fn test_build_hash_mismatch() {
        let result = build("12345670", &record_for("12345678"), 4, fnv1a_32);
        assert!(matches!(
            result,
            Err(BuildError::Integrity(IntegrityError::HashMismatch { .. }))
        ));
    }

    #[test_log::test]
    fn test_build_zero_chunk_size() {
        let result = build("1234", &record_for("1234"), 0, fnv1a_32);
        assert!(matches!(
            result,
            Err(BuildError::Digits(DigitsError::InvalidChunkSize(0)))
        ));
    }

    #[test_log::test]
    fn test_build_to_path_writes_artifact() {
        let path = temp_path("writes");
        let artifact =
            build_to_path("12345678", &record_for("12345678"), 4, fnv1a_32, &path).unwrap();
        assert_eq!(LookupArtifact::read_from(&path).unwrap(), artifact);
        std::fs::remove_dir_all(path.parent().unwrap()).unwrap();
    }

    #[test_log::test]
    fn test_build_to_path_writes_nothing_on_failure() {
        let path = temp_path("nothing");
        let result = build_to_path("12345679", &record_for("12345678"), 4, fnv1a_32, &path);
        assert!(matches!(result, Err(BuildError::Integrity(_))));
        assert!(!path.exists());
        assert!(!path.parent().unwrap().exists());
    }
}
