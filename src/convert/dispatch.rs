// file: src/convert/dispatch.rs
// description: body conversion dispatch keyed on file extension
// reference: internal module structure

use crate::config::MarkdownConfig;
use crate::convert::MarkdownRenderer;
use crate::error::Result;
use crate::models::Attributes;
use std::path::Path;
use std::sync::Arc;

/// Caller-supplied converter that fully replaces extension dispatch.
/// Its output is trusted as-is; its errors are fatal to the run.
pub trait Converter: Send + Sync {
    fn convert(
        &self,
        path: &Path,
        body: &str,
        attributes: &Attributes,
        options: &MarkdownConfig,
    ) -> Result<String>;
}

pub struct BodyConverter {
    renderer: MarkdownRenderer,
    options: MarkdownConfig,
    custom: Option<Arc<dyn Converter>>,
}

impl BodyConverter {
    pub fn new(options: MarkdownConfig) -> Self {
        Self {
            renderer: MarkdownRenderer::new(&options),
            options,
            custom: None,
        }
    }

    pub fn with_custom(options: MarkdownConfig, converter: Arc<dyn Converter>) -> Self {
        Self {
            renderer: MarkdownRenderer::new(&options),
            options,
            custom: Some(converter),
        }
    }

    /// Converts a body to HTML. Extensions listed in the Markdown
    /// configuration render through the engine; everything else passes
    /// through byte-identical. A custom converter skips extension
    /// sniffing entirely.
    pub fn convert(&self, path: &Path, body: &str, attributes: &Attributes) -> Result<String> {
        if let Some(custom) = &self.custom {
            return custom.convert(path, body, attributes, &self.options);
        }

        if self.is_renderable(path) {
            Ok(self.renderer.render(body))
        } else {
            Ok(body.to_string())
        }
    }

    fn is_renderable(&self, path: &Path) -> bool {
        let Some(extension) = path.extension().and_then(|e| e.to_str()) else {
            return false;
        };
        self.options
            .extensions
            .iter()
            .any(|e| e.eq_ignore_ascii_case(extension))
    }
}
