// file: src/parser/document.rs
// description: content parsing orchestration with a pluggable parser seam
// reference: internal module structure

use crate::error::Result;
use crate::models::{ParseOutput, ParsedUnit};
use crate::parser::{AttributeDecoder, FrontmatterSplitter};
use std::path::Path;
use std::sync::Arc;

/// Caller-supplied parser that fully replaces front matter splitting and
/// attribute decoding. It may return one unit or an ordered sequence of
/// units, letting one physical file yield several logical records.
pub trait DocumentParser: Send + Sync {
    fn parse(&self, path: &Path, raw: &str) -> Result<ParseOutput>;
}

pub struct ContentParser {
    splitter: FrontmatterSplitter,
    decoder: AttributeDecoder,
    custom: Option<Arc<dyn DocumentParser>>,
}

impl ContentParser {
    pub fn new() -> Self {
        Self {
            splitter: FrontmatterSplitter::new(),
            decoder: AttributeDecoder::new(),
            custom: None,
        }
    }

    pub fn with_custom(parser: Arc<dyn DocumentParser>) -> Self {
        Self {
            splitter: FrontmatterSplitter::new(),
            decoder: AttributeDecoder::new(),
            custom: Some(parser),
        }
    }

    /// Parses raw file content into one or more units. The default path
    /// is splitter + decoder; a configured custom parser receives the
    /// whole input and its errors propagate as-is.
    pub fn parse(&self, path: &Path, raw: &str) -> Result<Vec<ParsedUnit>> {
        if let Some(custom) = &self.custom {
            return Ok(custom.parse(path, raw)?.into_units());
        }

        let (block, body) = self.splitter.split(path, raw)?;
        let attributes = self.decoder.decode(path, block)?;

        Ok(vec![ParsedUnit::new(attributes, body)])
    }
}

impl Default for ContentParser {
    fn default() -> Self {
        Self::new()
    }
}
