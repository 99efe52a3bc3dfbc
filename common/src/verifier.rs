//! Membership checks against the set of reference chunk hashes.
//!
//! A [`LookupSet`] is loaded once at startup and never changes afterwards, so it can be
//! shared by reference across any number of concurrent checks without locking.

use crate::artifact::{ArtifactError, LookupArtifact};
use crate::chunk_hash::{ChunkHash, fnv1a_32};
use crate::digits::Digits;
use std::collections::HashSet;
use std::path::Path;

/// The deduplicated chunk hashes of a [`LookupArtifact`].
#[derive(Debug, Clone, Default)]
pub struct LookupSet {
    hashes: HashSet<ChunkHash>,
}

impl LookupSet {
    #[must_use]
    pub fn load(artifact: LookupArtifact) -> Self {
        Self {
            hashes: artifact.into_iter().collect(),
        }
    }

    /// Read and load the artifact at `path`.
    ///
    /// # Errors
    /// Returns an `ArtifactError` if the file is missing or malformed. No partial set is returned.
    pub fn from_path(path: &Path) -> Result<Self, ArtifactError> {
        Ok(Self::load(LookupArtifact::read_from(path)?))
    }

    #[must_use]
    pub fn contains(&self, hash: ChunkHash) -> bool {
        self.hashes.contains(&hash)
    }

    /// Whether the digits of `query` hash to a known chunk under `hash_fn`.
    ///
    /// Non-digit characters are dropped first. Text with no digits is checked as the empty string.
    pub fn check_with<F>(&self, query: &str, hash_fn: F) -> bool
    where
        F: Fn(&str) -> ChunkHash,
    {
        let digits = Digits::from_text(query);
        self.contains(hash_fn(digits.as_str()))
    }

    /// [`LookupSet::check_with`] using 32-bit FNV-1a.
    #[must_use]
    pub fn check(&self, query: &str) -> bool {
        self.check_with(query, fnv1a_32)
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.hashes.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.hashes.is_empty()
    }
}

impl FromIterator<ChunkHash> for LookupSet {
    fn from_iter<I: IntoIterator<Item = ChunkHash>>(iter: I) -> Self {
        Self {
            hashes: iter.into_iter().collect(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::builder::build;
    use crate::integrity::IntegrityRecord;
    use std::sync::Arc;
    use std::thread;

    fn set_for(raw: &str, chunk_size: usize) -> LookupSet {
        let record = IntegrityRecord::measure(&Digits::from_text(raw));
        LookupSet::load(build(raw, &record, chunk_size, fnv1a_32).unwrap())
    }

    #[test]
    fn test_check_concrete_scenario() {
        let set = set_for("12345678", 4);
        assert!(set.check("1234"));
        assert!(set.check("5678"));
        assert!(!set.check("123"));
        assert!(set.check("abcd1234efgh"));
        assert!(!set.check(""));
        assert!(!set.check("no digits"));
        assert!(!set.check("2345"));
        assert!(!set.check("12345678"));
    }

    #[test]
    fn test_check_every_built_chunk() {
        let raw = "2718281828459045235360287471352662497757247093699959574966967627";
        let set = set_for(raw, 7);
        let digits = Digits::from_text(raw);
        for chunk in digits.chunks(7).unwrap() {
            assert!(set.check(chunk), "missing chunk {chunk}");
        }
    }

    #[test]
    fn test_check_is_deterministic() {
        let set = set_for("12345678", 4);
        for query in ["1234", "12-34", "9999", ""] {
            assert_eq!(set.check(query), set.check(query));
        }
    }

    #[test]
    fn test_check_with_custom_hash() {
        let set: LookupSet = [ChunkHash::from_u32(4)].into_iter().collect();
        let by_len = |text: &str| ChunkHash::from_u32(u32::try_from(text.len()).unwrap());
        assert!(set.check_with("12x34", by_len));
        assert!(!set.check_with("123", by_len));
    }

    #[test]
    fn test_empty_matches_only_if_built() {
        let set: LookupSet = [fnv1a_32("")].into_iter().collect();
        assert!(set.check(""));
        assert!(set.check("letters only"));
    }

    #[test]
    fn test_load_deduplicates() {
        let artifact = LookupArtifact::new(vec![fnv1a_32("11"), fnv1a_32("11"), fnv1a_32("22")]);
        let set = LookupSet::load(artifact);
        assert_eq!(set.len(), 2);
        assert!(set.contains(fnv1a_32("22")));
    }

    #[test]
    fn test_from_path_rejects_malformed() {
        let path = std::env::temp_dir().join(format!(
            "digits_verifier_malformed_{}.json",
            std::process::id()
        ));
        std::fs::write(&path, r#"["811c9dc5", 7]"#).unwrap();
        assert!(matches!(
            LookupSet::from_path(&path),
            Err(ArtifactError::Parse(_))
        ));
        std::fs::remove_file(&path).unwrap();
    }

    #[test]
    fn test_concurrent_checks() {
        let set = Arc::new(set_for("12345678", 4));
        let handles: Vec<_> = (0..8)
            .map(|i| {
                let set = Arc::clone(&set);
                thread::spawn(move || {
                    let query = if i % 2 == 0 { "1234" } else { "4321" };
                    (i, set.check(query))
                })
            })
            .collect();
        for handle in handles {
            let (i, result) = handle.join().unwrap();
            assert_eq!(result, i % 2 == 0);
        }
    }
}
