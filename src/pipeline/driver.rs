// file: src/pipeline/driver.rs
// description: coordinates parsing, conversion, highlighting, and record building
// reference: orchestrates the per-file content pipeline

use crate::config::Config;
use crate::convert::{BodyConverter, Converter};
use crate::error::{PipelineError, Result};
use crate::highlight::{CodeBlockRewriter, EngineRegistry};
use crate::models::{Attributes, ConvertedUnit};
use crate::parser::{ContentParser, DocumentParser};
use crate::pipeline::progress::ProgressTracker;
use futures::stream::{self, StreamExt};
use std::fs;
use std::path::{Path, PathBuf};
use std::sync::Arc;
use tokio::sync::Semaphore;
use tracing::{debug, error, info};

/// Caller-supplied builder that turns one rendered unit into the final
/// domain record. The pipeline never interprets the record's shape.
pub trait RecordBuilder: Send + Sync {
    type Record: Send + 'static;

    fn build(&self, path: &Path, attributes: Attributes, html: String) -> Self::Record;
}

pub struct PipelineDriver<B: RecordBuilder> {
    config: Config,
    parser: Arc<ContentParser>,
    converter: Arc<BodyConverter>,
    rewriter: Option<Arc<CodeBlockRewriter>>,
    builder: Arc<B>,
    max_concurrent_tasks: usize,
}

impl<B: RecordBuilder + 'static> PipelineDriver<B> {
    pub fn new(config: Config, builder: B) -> Self {
        let parser = Arc::new(ContentParser::new());
        let converter = Arc::new(BodyConverter::new(config.markdown.clone()));
        let max_concurrent_tasks = config.pipeline.parallel_workers.max(1);

        Self {
            config,
            parser,
            converter,
            rewriter: None,
            builder: Arc::new(builder),
            max_concurrent_tasks,
        }
    }

    /// Replaces front matter splitting and attribute decoding wholesale.
    pub fn with_parser(mut self, parser: Arc<dyn DocumentParser>) -> Self {
        self.parser = Arc::new(ContentParser::with_custom(parser));
        self
    }

    /// Replaces extension-based conversion dispatch wholesale.
    pub fn with_converter(mut self, converter: Arc<dyn Converter>) -> Self {
        self.converter = Arc::new(BodyConverter::with_custom(
            self.config.markdown.clone(),
            converter,
        ));
        self
    }

    /// Enables the highlighting stage for the registered languages. An
    /// empty registry leaves the stage disabled so documents are not
    /// scanned for nothing.
    pub fn with_engines(mut self, registry: EngineRegistry) -> Self {
        self.rewriter = if registry.is_empty() {
            None
        } else {
            Some(Arc::new(CodeBlockRewriter::new(
                registry,
                self.config.highlight.css_class.clone(),
            )))
        };
        self
    }

    /// Installs a fully configured rewriter, e.g. one with a custom
    /// region pattern for a non-default renderer.
    pub fn with_rewriter(mut self, rewriter: CodeBlockRewriter) -> Self {
        self.rewriter = Some(Arc::new(rewriter));
        self
    }

    /// Runs the pipeline over an externally discovered, sorted and
    /// deduplicated path list. Files are processed by a bounded worker
    /// pool; results are joined and reordered back into path order
    /// (and parser order within a path). Any failure aborts the whole
    /// run: in-flight siblings finish, but no partial set is returned
    /// and the error for the earliest failing path is surfaced.
    pub async fn run(
        &self,
        paths: Vec<PathBuf>,
        progress: Arc<ProgressTracker>,
    ) -> Result<Vec<B::Record>> {
        info!(
            "Processing {} files with {} concurrent tasks",
            paths.len(),
            self.max_concurrent_tasks
        );

        let semaphore = Arc::new(Semaphore::new(self.max_concurrent_tasks));

        let tasks = paths.into_iter().enumerate().map(|(index, path)| {
            let semaphore = semaphore.clone();
            let parser = self.parser.clone();
            let converter = self.converter.clone();
            let rewriter = self.rewriter.clone();
            let builder = self.builder.clone();
            let progress = progress.clone();

            async move {
                let permit = match semaphore.acquire_owned().await {
                    Ok(permit) => permit,
                    Err(e) => return (index, Err(PipelineError::Worker(e.to_string()))),
                };

                let display_path = path.display().to_string();
                let worker_progress = progress.clone();
                let joined = tokio::task::spawn_blocking(move || {
                    process_file(
                        &parser,
                        &converter,
                        rewriter.as_deref(),
                        builder.as_ref(),
                        &worker_progress,
                        &path,
                    )
                })
                .await;

                drop(permit);

                let result = match joined {
                    Ok(result) => result,
                    Err(e) => Err(PipelineError::Worker(format!(
                        "task for {display_path} did not complete: {e}"
                    ))),
                };

                match &result {
                    Ok(_) => progress.inc_files_processed(),
                    Err(e) => {
                        progress.inc_files_failed();
                        error!("Failed to process {}: {}", display_path, e);
                    }
                }

                (index, result)
            }
        });

        let mut outcomes: Vec<(usize, Result<Vec<B::Record>>)> = stream::iter(tasks)
            .buffer_unordered(self.max_concurrent_tasks)
            .collect()
            .await;

        // Completion order is arbitrary; restore submission order before
        // surfacing records or picking the error to report.
        outcomes.sort_by_key(|(index, _)| *index);

        let mut records = Vec::new();
        for (_, outcome) in outcomes {
            records.extend(outcome?);
        }

        Ok(records)
    }
}

fn process_file<B: RecordBuilder>(
    parser: &ContentParser,
    converter: &BodyConverter,
    rewriter: Option<&CodeBlockRewriter>,
    builder: &B,
    progress: &ProgressTracker,
    path: &Path,
) -> Result<Vec<B::Record>> {
    let raw = fs::read_to_string(path).map_err(|source| PipelineError::FileOperation {
        path: path.to_path_buf(),
        source,
    })?;
    progress.add_bytes_processed(raw.len() as u64);

    let units = parser.parse(path, &raw)?;
    let mut records = Vec::with_capacity(units.len());

    for unit in units {
        let html = converter.convert(path, &unit.body, &unit.attributes)?;
        let mut converted = ConvertedUnit {
            attributes: unit.attributes,
            html,
        };

        if let Some(rewriter) = rewriter {
            let outcome = rewriter.rewrite(&converted.html);
            progress.add_regions(outcome.regions_highlighted, outcome.regions_skipped);
            converted.html = outcome.html;
        }

        records.push(builder.build(path, converted.attributes, converted.html));
        progress.add_unit_built();
    }

    debug!("Built {} unit(s) from {}", records.len(), path.display());
    Ok(records)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::highlight::{HighlightEngine, Token, TokenizeError};
    use crate::models::{PageBuilder, ParseOutput, ParsedUnit};
    use tempfile::TempDir;

    fn test_config(workers: usize) -> Config {
        let mut config = Config::default_config();
        config.pipeline.parallel_workers = workers;
        config
    }

    fn write_post(dir: &TempDir, name: &str, body: &str) -> PathBuf {
        let path = dir.path().join(name);
        fs::write(&path, format!("title: {name}\n---\n{body}")).unwrap();
        path
    }

    fn tracker(total: usize) -> Arc<ProgressTracker> {
        Arc::new(ProgressTracker::with_color(total, false))
    }

    #[tokio::test]
    async fn test_concurrent_matches_sequential_order() {
        let dir = TempDir::new().unwrap();
        let mut paths: Vec<_> = (0..8)
            .map(|i| write_post(&dir, &format!("post-{i}.md"), "hello *world*"))
            .collect();
        paths.sort();

        let parallel = PipelineDriver::new(test_config(4), PageBuilder::new())
            .run(paths.clone(), tracker(paths.len()))
            .await
            .unwrap();
        let sequential = PipelineDriver::new(test_config(1), PageBuilder::new())
            .run(paths.clone(), tracker(paths.len()))
            .await
            .unwrap();

        let parallel_order: Vec<_> = parallel.iter().map(|p| p.path.clone()).collect();
        let sequential_order: Vec<_> = sequential.iter().map(|p| p.path.clone()).collect();
        let expected: Vec<_> = paths.iter().map(|p| p.display().to_string()).collect();

        assert_eq!(parallel_order, expected);
        assert_eq!(sequential_order, expected);
    }

    #[tokio::test]
    async fn test_renders_markdown_bodies() {
        let dir = TempDir::new().unwrap();
        let path = write_post(&dir, "doc.md", "This is a *markdown* document.");

        let pages = PipelineDriver::new(test_config(2), PageBuilder::new())
            .run(vec![path], tracker(1))
            .await
            .unwrap();

        assert_eq!(pages.len(), 1);
        assert!(pages[0].body.contains("<em>markdown</em>"));
        assert_eq!(pages[0].title.as_deref(), Some("doc.md"));
    }

    #[tokio::test]
    async fn test_failure_aborts_whole_run() {
        let dir = TempDir::new().unwrap();
        let good = write_post(&dir, "a.md", "fine");
        let bad = dir.path().join("b.md");
        fs::write(&bad, "no separator at all").unwrap();

        let result = PipelineDriver::new(test_config(4), PageBuilder::new())
            .run(vec![good, bad.clone()], tracker(2))
            .await;

        match result {
            Err(PipelineError::MissingSeparator { path }) => assert_eq!(path, bad),
            other => panic!("expected MissingSeparator, got {other:?}"),
        }
    }

    struct ChunkParser;

    impl DocumentParser for ChunkParser {
        fn parse(&self, _path: &Path, raw: &str) -> Result<ParseOutput> {
            let units = raw
                .split("%%")
                .map(|chunk| ParsedUnit::new(Attributes::new(), chunk.trim()))
                .collect::<Vec<_>>();
            Ok(units.into())
        }
    }

    #[tokio::test]
    async fn test_multi_unit_parser_yields_one_record_per_unit() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("bundle.md");
        fs::write(&path, "first%%second%%third").unwrap();

        let pages = PipelineDriver::new(test_config(2), PageBuilder::new())
            .with_parser(Arc::new(ChunkParser))
            .run(vec![path.clone()], tracker(1))
            .await
            .unwrap();

        assert_eq!(pages.len(), 3);
        let expected_path = path.display().to_string();
        for page in &pages {
            assert_eq!(page.path, expected_path);
        }
        assert!(pages[0].body.contains("first"));
        assert!(pages[2].body.contains("third"));
    }

    struct SingleTokenEngine;

    impl HighlightEngine for SingleTokenEngine {
        fn tokenize(&self, source: &str) -> std::result::Result<Vec<Token>, TokenizeError> {
            Ok(vec![Token::new("k", source)])
        }
    }

    #[tokio::test]
    async fn test_highlight_stage_end_to_end() {
        let dir = TempDir::new().unwrap();
        let path = write_post(&dir, "code.md", "```rust\nlet x = 1;\n```");

        let mut registry = EngineRegistry::new();
        registry.register("rust", Arc::new(SingleTokenEngine));

        let pages = PipelineDriver::new(test_config(2), PageBuilder::new())
            .with_engines(registry)
            .run(vec![path], tracker(1))
            .await
            .unwrap();

        assert!(pages[0].body.contains("class=\"highlight rust\""));
        assert!(pages[0].body.contains("<span class=\"k\">"));
    }

    #[tokio::test]
    async fn test_empty_registry_disables_highlighting() {
        let dir = TempDir::new().unwrap();
        let path = write_post(&dir, "code.md", "```rust\nlet x = 1;\n```");

        let pages = PipelineDriver::new(test_config(2), PageBuilder::new())
            .with_engines(EngineRegistry::new())
            .run(vec![path], tracker(1))
            .await
            .unwrap();

        // The renderer's own fence markup is left as-is.
        assert!(pages[0].body.contains("<pre><code class=\"language-rust\">"));
        assert!(!pages[0].body.contains("class=\"highlight rust\""));
    }
}
