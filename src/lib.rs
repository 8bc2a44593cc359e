// file: src/lib.rs
// description: library entry point and public api exports
// reference: rust library patterns
#![doc = include_str!(concat!(env!("CARGO_MANIFEST_DIR"), "/readme.md"))]

pub mod config;
pub mod convert;
pub mod discover;
pub mod error;
pub mod exporter;
pub mod highlight;
pub mod models;
pub mod parser;
pub mod pipeline;
pub mod utils;

pub use config::{
    Config, ExportConfig, HighlightConfig, MarkdownConfig, PipelineConfig, SourceConfig,
};
pub use convert::{BodyConverter, Converter, MarkdownRenderer};
pub use discover::SourceScanner;
pub use error::{PipelineError, Result};
pub use exporter::{ExportManifest, JsonExporter};
pub use highlight::{
    CodeBlockRewriter, EngineRegistry, HighlightEngine, RewriteOutcome, Token, TokenizeError,
};
pub use models::{Attributes, ConvertedUnit, Page, PageBuilder, ParseOutput, ParsedUnit};
pub use parser::{AttributeDecoder, ContentParser, DocumentParser, FrontmatterSplitter};
pub use pipeline::{
    FingerprintStore, PipelineDriver, PipelineStats, ProgressTracker, RecordBuilder,
    compute_fingerprint,
};
