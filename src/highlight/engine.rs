// file: src/highlight/engine.rs
// description: highlighting engine seam and per-language registry
// reference: internal module structure

use std::collections::HashMap;
use std::sync::Arc;
use thiserror::Error;

/// One classed span of source text produced by a highlighting engine.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Token {
    pub class: String,
    pub text: String,
}

impl Token {
    pub fn new(class: impl Into<String>, text: impl Into<String>) -> Self {
        Self {
            class: class.into(),
            text: text.into(),
        }
    }
}

#[derive(Debug, Error)]
#[error("tokenization failed: {0}")]
pub struct TokenizeError(pub String);

/// External tokenizer for one language. Engines are invoked concurrently
/// from worker tasks and must be safe to share.
pub trait HighlightEngine: Send + Sync {
    fn tokenize(&self, source: &str) -> std::result::Result<Vec<Token>, TokenizeError>;
}

/// Maps language identifiers to their registered engines.
#[derive(Clone, Default)]
pub struct EngineRegistry {
    engines: HashMap<String, Arc<dyn HighlightEngine>>,
}

impl EngineRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn register(&mut self, language: impl Into<String>, engine: Arc<dyn HighlightEngine>) {
        self.engines.insert(language.into(), engine);
    }

    pub fn resolve(&self, language: &str) -> Option<&Arc<dyn HighlightEngine>> {
        self.engines.get(language)
    }

    pub fn is_empty(&self) -> bool {
        self.engines.is_empty()
    }

    pub fn len(&self) -> usize {
        self.engines.len()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    struct NullEngine;

    impl HighlightEngine for NullEngine {
        fn tokenize(&self, source: &str) -> std::result::Result<Vec<Token>, TokenizeError> {
            Ok(vec![Token::new("text", source)])
        }
    }

    #[test]
    fn test_register_and_resolve() {
        let mut registry = EngineRegistry::new();
        assert!(registry.is_empty());

        registry.register("elixir", Arc::new(NullEngine));

        assert_eq!(registry.len(), 1);
        assert!(registry.resolve("elixir").is_some());
        assert!(registry.resolve("erlang").is_none());
    }

    #[test]
    fn test_tokenize_through_registry() {
        let mut registry = EngineRegistry::new();
        registry.register("elixir", Arc::new(NullEngine));

        let tokens = registry
            .resolve("elixir")
            .unwrap()
            .tokenize("IO.puts(1)")
            .unwrap();

        assert_eq!(tokens, vec![Token::new("text", "IO.puts(1)")]);
    }
}
