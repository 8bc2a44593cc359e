// file: src/parser/attributes.rs
// description: attribute block decoding for structured and line syntaxes
// reference: https://docs.rs/serde_json

use crate::error::{PipelineError, Result};
use crate::models::Attributes;
use serde_json::Value;
use std::path::Path;

pub struct AttributeDecoder;

impl AttributeDecoder {
    pub fn new() -> Self {
        Self
    }

    /// Decodes an attributes block into a key-value mapping.
    ///
    /// A block whose first non-whitespace byte is `{` is parsed as a JSON
    /// object literal; anything else is treated as `key: value` lines.
    /// Decoding is all-or-nothing: any bad line or a non-object literal
    /// fails the whole block.
    pub fn decode(&self, path: &Path, block: &str) -> Result<Attributes> {
        if block.trim_start().starts_with('{') {
            self.decode_structured(path, block)
        } else {
            self.decode_lines(path, block)
        }
    }

    fn decode_structured(&self, path: &Path, block: &str) -> Result<Attributes> {
        let value: Value =
            serde_json::from_str(block).map_err(|e| PipelineError::InvalidAttributes {
                path: path.to_path_buf(),
                message: format!("attribute literal is not valid JSON: {e}"),
            })?;

        match value {
            Value::Object(map) => Ok(Attributes::from_map(map)),
            other => Err(PipelineError::InvalidAttributes {
                path: path.to_path_buf(),
                message: format!("attribute literal is not a mapping: {other}"),
            }),
        }
    }

    fn decode_lines(&self, path: &Path, block: &str) -> Result<Attributes> {
        let mut attributes = Attributes::new();

        for line in block.lines().filter(|line| !line.trim().is_empty()) {
            // Split on the first colon only; values may contain colons.
            let (key, value) =
                line.split_once(':')
                    .ok_or_else(|| PipelineError::InvalidAttributes {
                        path: path.to_path_buf(),
                        message: format!("line has no `key: value` separator: {line:?}"),
                    })?;

            attributes.insert(key.trim(), Value::String(value.trim().to_string()));
        }

        Ok(attributes)
    }
}

impl Default for AttributeDecoder {
    fn default() -> Self {
        Self::new()
    }
}
