// file: src/exporter/json.rs
// description: json export of built pages with a run manifest

use crate::error::{PipelineError, Result};
use crate::models::Page;
use chrono::Utc;
use serde::Serialize;
use std::fs;
use std::path::{Path, PathBuf};
use tracing::info;
use uuid::Uuid;

#[derive(Debug, Clone)]
pub struct JsonExporter {
    output_dir: PathBuf,
}

#[derive(Debug, Serialize)]
pub struct ExportManifest {
    pub run_id: Uuid,
    pub exported_at: String,
    pub total_pages: usize,
    pub files: Vec<String>,
}

impl JsonExporter {
    pub fn new(output_dir: impl Into<PathBuf>) -> Result<Self> {
        let output_dir = output_dir.into();
        fs::create_dir_all(&output_dir)?;
        Ok(Self { output_dir })
    }

    /// Writes one JSON document per page plus `manifest.json`. File
    /// names carry the page's position so multi-unit sources stay
    /// distinct and ordered.
    pub fn export(&self, pages: &[Page], pretty: bool) -> Result<ExportManifest> {
        info!("Exporting {} pages to {}", pages.len(), self.output_dir.display());

        let mut files = Vec::with_capacity(pages.len());

        for (index, page) in pages.iter().enumerate() {
            let file_name = format!("{:04}-{}.json", index, slug_for(&page.path));
            let target = self.output_dir.join(&file_name);

            let encoded = if pretty {
                serde_json::to_string_pretty(page)
            } else {
                serde_json::to_string(page)
            }
            .map_err(|e| PipelineError::Serialization(e.to_string()))?;

            fs::write(&target, encoded).map_err(|source| PipelineError::FileOperation {
                path: target.clone(),
                source,
            })?;
            files.push(file_name);
        }

        let manifest = ExportManifest {
            run_id: Uuid::new_v4(),
            exported_at: Utc::now().to_rfc3339(),
            total_pages: pages.len(),
            files,
        };

        let manifest_path = self.output_dir.join("manifest.json");
        let encoded = serde_json::to_string_pretty(&manifest)
            .map_err(|e| PipelineError::Serialization(e.to_string()))?;
        fs::write(&manifest_path, encoded).map_err(|source| PipelineError::FileOperation {
            path: manifest_path,
            source,
        })?;

        info!("Export complete: {} pages", manifest.total_pages);
        Ok(manifest)
    }
}

fn slug_for(path: &str) -> String {
    let stem = Path::new(path)
        .file_stem()
        .map(|s| s.to_string_lossy().to_string())
        .unwrap_or_else(|| "page".to_string());

    stem.chars()
        .map(|c| if c.is_ascii_alphanumeric() || c == '-' || c == '_' { c } else { '-' })
        .collect()
}
