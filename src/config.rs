// file: src/config.rs
// description: application configuration management with toml support
// reference: https://docs.rs/config

use crate::error::{PipelineError, Result};
use dotenvy::dotenv;
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct Config {
    pub sources: SourceConfig,
    pub pipeline: PipelineConfig,
    pub markdown: MarkdownConfig,
    pub highlight: HighlightConfig,
    pub export: ExportConfig,
}

#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct SourceConfig {
    pub root: PathBuf,
    pub extensions: Vec<String>,
    pub skip_patterns: Vec<String>,
    pub max_file_size_mb: usize,
}

#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct PipelineConfig {
    pub parallel_workers: usize,
    pub force_rebuild: bool,
    pub fingerprint_path: PathBuf,
}

/// Options handed through to the Markdown engine. Each flag maps onto the
/// corresponding pulldown-cmark extension and is not interpreted here.
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct MarkdownConfig {
    pub extensions: Vec<String>,
    pub tables: bool,
    pub footnotes: bool,
    pub strikethrough: bool,
    pub tasklists: bool,
    pub smart_punctuation: bool,
}

#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct HighlightConfig {
    pub css_class: String,
}

#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct ExportConfig {
    pub output_dir: PathBuf,
    pub pretty: bool,
}

impl Config {
    pub fn load(path: Option<&Path>) -> Result<Self> {
        dotenv().ok();

        let mut builder = config::Config::builder();

        if let Some(path) = path {
            builder = builder.add_source(config::File::from(path));
        } else {
            builder = builder.add_source(config::File::from(Path::new("config/default.toml")));
        }

        builder = builder.add_source(
            config::Environment::with_prefix("PRESSROOM")
                .separator("__")
                .try_parsing(true),
        );

        let settings = builder
            .build()
            .map_err(|e| PipelineError::Config(e.to_string()))?;

        let config: Config = settings
            .try_deserialize()
            .map_err(|e| PipelineError::Config(e.to_string()))?;

        config.validate()?;
        Ok(config)
    }

    pub fn default_config() -> Self {
        Self {
            sources: SourceConfig {
                root: PathBuf::from("./content"),
                extensions: vec![
                    "md".to_string(),
                    "markdown".to_string(),
                    "txt".to_string(),
                ],
                skip_patterns: vec!["_drafts/*".to_string(), ".git/*".to_string()],
                max_file_size_mb: 10,
            },
            pipeline: PipelineConfig {
                parallel_workers: 4,
                force_rebuild: false,
                fingerprint_path: PathBuf::from(".pressroom-fingerprint"),
            },
            markdown: MarkdownConfig {
                extensions: vec!["md".to_string(), "markdown".to_string()],
                tables: true,
                footnotes: true,
                strikethrough: true,
                tasklists: false,
                smart_punctuation: false,
            },
            highlight: HighlightConfig {
                css_class: "highlight".to_string(),
            },
            export: ExportConfig {
                output_dir: PathBuf::from("./build"),
                pretty: false,
            },
        }
    }

    fn validate(&self) -> Result<()> {
        if self.pipeline.parallel_workers == 0 {
            return Err(PipelineError::Config(
                "parallel_workers must be greater than 0".to_string(),
            ));
        }

        if self.sources.extensions.is_empty() {
            return Err(PipelineError::Config(
                "sources.extensions must not be empty".to_string(),
            ));
        }

        if self.highlight.css_class.trim().is_empty() {
            return Err(PipelineError::Config(
                "highlight.css_class must not be blank".to_string(),
            ));
        }

        Ok(())
    }
}
