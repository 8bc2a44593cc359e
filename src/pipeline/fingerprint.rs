// file: src/pipeline/fingerprint.rs
// description: source set fingerprinting for rebuild staleness checks
// reference: https://docs.rs/sha2

use crate::error::{PipelineError, Result};
use sha2::{Digest, Sha256};
use std::fs;
use std::path::{Path, PathBuf};
use tracing::debug;

/// Fingerprints a sorted path list by hashing each path together with
/// its content. Identical inputs always produce the same value, so a
/// stored fingerprint answers "did anything change since last build"
/// without any recompilation machinery.
pub fn compute_fingerprint(paths: &[PathBuf]) -> Result<String> {
    let mut hasher = Sha256::new();

    for path in paths {
        hasher.update(path.to_string_lossy().as_bytes());
        hasher.update([0u8]);

        let content = fs::read(path).map_err(|source| PipelineError::FileOperation {
            path: path.to_path_buf(),
            source,
        })?;
        hasher.update(&content);
        hasher.update([0u8]);
    }

    Ok(format!("{:x}", hasher.finalize()))
}

/// Persists the fingerprint of the last successful build.
pub struct FingerprintStore {
    path: PathBuf,
}

impl FingerprintStore {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    pub fn load(&self) -> Result<Option<String>> {
        match fs::read_to_string(&self.path) {
            Ok(stored) => Ok(Some(stored.trim().to_string())),
            Err(err) if err.kind() == std::io::ErrorKind::NotFound => Ok(None),
            Err(source) => Err(PipelineError::FileOperation {
                path: self.path.clone(),
                source,
            }),
        }
    }

    pub fn store(&self, fingerprint: &str) -> Result<()> {
        if let Some(parent) = self.path.parent()
            && !parent.as_os_str().is_empty()
        {
            fs::create_dir_all(parent)?;
        }
        fs::write(&self.path, fingerprint)?;
        debug!("Stored fingerprint at {}", self.path.display());
        Ok(())
    }

    /// True when no fingerprint is stored yet or the stored value
    /// differs from `current`.
    pub fn is_stale(&self, current: &str) -> Result<bool> {
        Ok(match self.load()? {
            Some(stored) => stored != current,
            None => true,
        })
    }
}
