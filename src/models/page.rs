// file: src/models/page.rs
// description: default built record with hashing and serialization
// reference: internal data structures

use crate::models::Attributes;
use crate::pipeline::RecordBuilder;
use serde::{Deserialize, Serialize};
use sha2::{Digest, Sha256};
use std::path::Path;
use std::time::{SystemTime, UNIX_EPOCH};

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Page {
    pub path: String,
    pub title: Option<String>,
    pub attributes: Attributes,
    pub body: String,
    pub content_hash: String,
    pub built_at: u64,
}

impl Page {
    pub fn new(path: String, attributes: Attributes, body: String) -> Self {
        let content_hash = Self::compute_hash(&body);
        let title = attributes.get_str("title").map(str::to_string);
        let built_at = SystemTime::now()
            .duration_since(UNIX_EPOCH)
            .map(|d| d.as_secs())
            .unwrap_or(0);

        Self {
            path,
            title,
            attributes,
            body,
            content_hash,
            built_at,
        }
    }

    fn compute_hash(content: &str) -> String {
        let mut hasher = Sha256::new();
        hasher.update(content.as_bytes());
        format!("{:x}", hasher.finalize())
    }
}

/// Default builder collaborator: wraps each rendered unit into a `Page`.
#[derive(Debug, Clone, Default)]
pub struct PageBuilder;

impl PageBuilder {
    pub fn new() -> Self {
        Self
    }
}

impl RecordBuilder for PageBuilder {
    type Record = Page;

    fn build(&self, path: &Path, attributes: Attributes, html: String) -> Page {
        Page::new(path.display().to_string(), attributes, html)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_page_creation() {
        let mut attrs = Attributes::new();
        attrs.insert("title", json!("Welcome"));

        let page = Page::new("posts/hello.md".to_string(), attrs, "<p>hi</p>".to_string());

        assert_eq!(page.title.as_deref(), Some("Welcome"));
        assert!(!page.content_hash.is_empty());
        assert_eq!(page.path, "posts/hello.md");
    }

    #[test]
    fn test_hash_consistency() {
        let a = Page::compute_hash("same body");
        let b = Page::compute_hash("same body");
        assert_eq!(a, b);
    }

    #[test]
    fn test_builder_uses_path_display() {
        let builder = PageBuilder::new();
        let page = builder.build(
            Path::new("notes/a.md"),
            Attributes::new(),
            "<p>x</p>".to_string(),
        );

        assert_eq!(page.path, "notes/a.md");
        assert!(page.title.is_none());
    }
}
