//! The persisted list of chunk hashes: a JSON array of 8-character hex strings.

use crate::chunk_hash::ChunkHash;
use serde::{Deserialize, Serialize};
use std::fs;
use std::io;
use std::path::{Path, PathBuf};
use thiserror::Error;

#[derive(Debug, Error)]
pub enum ArtifactError {
    #[error("could not access artifact at {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: io::Error,
    },

    #[error("could not parse artifact as a list of chunk hashes: {0}")]
    Parse(#[from] serde_json::Error),
}

/// Chunk hashes in the order their chunks appear in the reference.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct LookupArtifact(Vec<ChunkHash>);

impl LookupArtifact {
    #[must_use]
    pub fn new(hashes: Vec<ChunkHash>) -> Self {
        Self(hashes)
    }

    #[must_use]
    pub fn hashes(&self) -> &[ChunkHash] {
        &self.0
    }

    #[must_use]
    pub fn into_hashes(self) -> Vec<ChunkHash> {
        self.0
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.0.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    /// # Errors
    /// Returns `Parse` if the text is not a JSON array of hex hash strings.
    pub fn from_json(text: &str) -> Result<Self, ArtifactError> {
        Ok(serde_json::from_str(text)?)
    }

    /// # Errors
    /// Returns `Parse` if serialization fails.
    pub fn to_json(&self) -> Result<String, ArtifactError> {
        Ok(serde_json::to_string(self)?)
    }

    /// # Errors
    /// Returns `Io` if the file is missing or unreadable, `Parse` if it is malformed.
    pub fn read_from(path: &Path) -> Result<Self, ArtifactError> {
        let text = fs::read_to_string(path).map_err(|source| ArtifactError::Io {
            path: path.to_path_buf(),
            source,
        })?;
        Self::from_json(&text)
    }

    /// Write the artifact, creating parent directories as needed.
    /// The file is written beside the target and renamed into place.
    ///
    /// # Errors
    /// Returns `Io` if any directory, write or rename fails.
    pub fn write_to(&self, path: &Path) -> Result<(), ArtifactError> {
        let io_err = |source| ArtifactError::Io {
            path: path.to_path_buf(),
            source,
        };

        if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
            fs::create_dir_all(parent).map_err(io_err)?;
        }

        let mut tmp_name = path.as_os_str().to_owned();
        tmp_name.push(".tmp");
        let tmp_path = PathBuf::from(tmp_name);

        let written =
            fs::write(&tmp_path, self.to_json()?).and_then(|()| fs::rename(&tmp_path, path));
        if written.is_err() {
            let _ = fs::remove_file(&tmp_path);
        }
        written.map_err(io_err)
    }
}

impl From<Vec<ChunkHash>> for LookupArtifact {
    fn from(hashes: Vec<ChunkHash>) -> Self {
        Self(hashes)
    }
}

impl IntoIterator for LookupArtifact {
    type Item = ChunkHash;
    type IntoIter = std::vec::IntoIter<ChunkHash>;

    fn into_iter(self) -> Self::IntoIter {
        self.0.into_iter()
    }
}
