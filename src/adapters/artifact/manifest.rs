//! Integrity manifest for model artifacts.
//!
//! `manifest.json` maps artifact file names (relative to the model directory)
//! to lowercase hex SHA-256 digests of their bytes.

use std::collections::BTreeMap;
use std::fs;
use std::path::Path;

use serde::{Deserialize, Serialize};
use sha2::{Digest, Sha256};

use crate::ports::ModelError;

const MANIFEST_VERSION: u32 = 1;

/// Hex-encoded SHA-256 of `bytes`.
#[must_use]
pub fn sha256_hex(bytes: &[u8]) -> String {
    Sha256::digest(bytes)
        .iter()
        .map(|b| format!("{b:02x}"))
        .collect()
}

fn integrity(file: &str, message: impl Into<String>) -> ModelError {
    ModelError::Integrity {
        file: file.to_string(),
        message: message.into(),
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ArtifactManifest {
    pub version: u32,
    pub files: BTreeMap<String, String>,
}

impl ArtifactManifest {
    pub const FILE_NAME: &'static str = "manifest.json";

    /// Hash the given files inside `dir`.
    ///
    /// # Errors
    /// Returns `ModelError::Io` if a file cannot be read.
    pub fn build(dir: &Path, files: &[&str]) -> Result<Self, ModelError> {
        let mut map = BTreeMap::new();
        for name in files {
            let path = dir.join(name);
            let bytes = fs::read(&path).map_err(|source| ModelError::Io {
                path: path.display().to_string(),
                source,
            })?;
            map.insert((*name).to_string(), sha256_hex(&bytes));
        }
        Ok(Self {
            version: MANIFEST_VERSION,
            files: map,
        })
    }

    /// Read `manifest.json` from `dir`, if present.
    ///
    /// # Errors
    /// Returns error if the manifest exists but cannot be read or parsed.
    pub fn load(dir: &Path) -> Result<Option<Self>, ModelError> {
        let path = dir.join(Self::FILE_NAME);
        if !path.exists() {
            return Ok(None);
        }

        let bytes = fs::read(&path).map_err(|source| ModelError::Io {
            path: path.display().to_string(),
            source,
        })?;
        let manifest: Self = serde_json::from_slice(&bytes)
            .map_err(|e| integrity(Self::FILE_NAME, format!("invalid format: {e}")))?;

        if manifest.version != MANIFEST_VERSION {
            return Err(integrity(
                Self::FILE_NAME,
                format!("unsupported version {}", manifest.version),
            ));
        }
        Ok(Some(manifest))
    }

    /// Write the manifest as pretty JSON into `dir`.
    ///
    /// # Errors
    /// Returns error if serialization or the write fails.
    pub fn write(&self, dir: &Path) -> Result<(), ModelError> {
        let path = dir.join(Self::FILE_NAME);
        let mut bytes = serde_json::to_vec_pretty(self)
            .map_err(|e| integrity(Self::FILE_NAME, e.to_string()))?;
        bytes.push(b'\n');
        fs::write(&path, bytes).map_err(|source| ModelError::Io {
            path: path.display().to_string(),
            source,
        })
    }

    /// Verify every listed file and require that each of `required` is listed.
    ///
    /// # Errors
    /// Returns `ModelError::Integrity` on a missing entry or digest mismatch.
    pub fn verify(&self, dir: &Path, required: &[&str]) -> Result<(), ModelError> {
        if self.files.is_empty() {
            return Err(integrity(Self::FILE_NAME, "manifest lists no files"));
        }

        for name in required {
            if !self.files.contains_key(*name) {
                return Err(integrity(name, "not listed in manifest.json"));
            }
        }

        for (name, expected) in &self.files {
            let path = dir.join(name);
            let bytes = fs::read(&path).map_err(|e| {
                integrity(name, format!("listed in manifest but unreadable: {e}"))
            })?;
            if !sha256_hex(&bytes).eq_ignore_ascii_case(expected) {
                return Err(integrity(name, "SHA-256 digest mismatch"));
            }
        }
        Ok(())
    }
}
