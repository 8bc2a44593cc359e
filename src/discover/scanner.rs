// file: src/discover/scanner.rs
// description: directory walking and source file discovery with filtering
// reference: https://docs.rs/walkdir

use crate::config::SourceConfig;
use crate::error::Result;
use std::path::{Path, PathBuf};
use tracing::{debug, info};
use walkdir::WalkDir;

/// Default file-discovery collaborator. The pipeline driver itself never
/// globs; it consumes the sorted, deduplicated list produced here.
pub struct SourceScanner {
    config: SourceConfig,
}

impl SourceScanner {
    pub fn new(config: SourceConfig) -> Self {
        Self { config }
    }

    pub fn scan(&self) -> Result<Vec<PathBuf>> {
        self.scan_root(&self.config.root)
    }

    pub fn scan_root(&self, root: &Path) -> Result<Vec<PathBuf>> {
        info!("Scanning directory: {}", root.display());
        let mut files = Vec::new();
        let max_size = (self.config.max_file_size_mb * 1024 * 1024) as u64;

        for entry in WalkDir::new(root)
            .follow_links(false)
            .into_iter()
            .filter_map(|e| e.ok())
        {
            if !entry.file_type().is_file() {
                continue;
            }

            let path = entry.path();

            if self.should_skip(path) {
                debug!("Skipping file: {}", path.display());
                continue;
            }

            if !self.has_source_extension(path) {
                continue;
            }

            if let Ok(metadata) = entry.metadata() {
                if metadata.len() > max_size {
                    debug!(
                        "Skipping large file ({} MB): {}",
                        metadata.len() / 1024 / 1024,
                        path.display()
                    );
                    continue;
                }
            }

            files.push(path.to_path_buf());
        }

        files.sort();
        files.dedup();

        info!("Found {} source files", files.len());
        Ok(files)
    }

    fn has_source_extension(&self, path: &Path) -> bool {
        let Some(extension) = path.extension().and_then(|e| e.to_str()) else {
            return false;
        };
        self.config
            .extensions
            .iter()
            .any(|e| e.eq_ignore_ascii_case(extension))
    }

    fn should_skip(&self, path: &Path) -> bool {
        let path_str = path.to_string_lossy();

        for pattern in &self.config.skip_patterns {
            if let Some(prefix) = pattern.strip_suffix("/*") {
                if path_str.contains(prefix) {
                    return true;
                }
            } else if let Some(suffix) = pattern.strip_prefix('*') {
                if path_str.ends_with(suffix) {
                    return true;
                }
            } else if path_str.contains(pattern.as_str()) {
                return true;
            }
        }

        false
    }
}
