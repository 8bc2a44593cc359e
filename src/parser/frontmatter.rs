// file: src/parser/frontmatter.rs
// description: front matter splitting on the --- delimiter line
// reference: internal wire format

use crate::error::{PipelineError, Result};
use lazy_static::lazy_static;
use regex::Regex;
use std::path::Path;

lazy_static! {
    // The delimiter must sit on its own line: preceded and followed by a
    // newline, tolerant of CRLF on either side.
    static ref SEPARATOR: Regex =
        Regex::new(r"\r?\n---\r?\n").expect("SEPARATOR regex is valid");
}

pub struct FrontmatterSplitter;

impl FrontmatterSplitter {
    pub fn new() -> Self {
        Self
    }

    /// Splits raw content into (attributes block, body) on the first
    /// delimiter line. Everything after the first match belongs to the
    /// body verbatim; a body may itself contain `---`-like text.
    pub fn split<'a>(&self, path: &Path, content: &'a str) -> Result<(&'a str, &'a str)> {
        let separator = SEPARATOR
            .find(content)
            .ok_or_else(|| PipelineError::MissingSeparator {
                path: path.to_path_buf(),
            })?;

        let attributes = &content[..separator.start()];
        let body = &content[separator.end()..];
        Ok((attributes, body))
    }
}

impl Default for FrontmatterSplitter {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_split_covers_entire_input() {
        let splitter = FrontmatterSplitter::new();
        let content = "title: Test\n---\n# Body here";

        let (attributes, body) = splitter.split(Path::new("a.md"), content).unwrap();

        assert_eq!(attributes, "title: Test");
        assert_eq!(body, "# Body here");
        assert_eq!(
            attributes.len() + body.len() + "\n---\n".len(),
            content.len()
        );
    }

    #[test]
    fn test_split_tolerates_crlf() {
        let splitter = FrontmatterSplitter::new();
        let content = "title: Test\r\n---\r\nBody";

        let (attributes, body) = splitter.split(Path::new("a.md"), content).unwrap();

        assert_eq!(attributes, "title: Test");
        assert_eq!(body, "Body");
    }

    #[test]
    fn test_first_separator_wins() {
        let splitter = FrontmatterSplitter::new();
        let content = "title: Test\n---\nBody with\n---\na rule";

        let (_, body) = splitter.split(Path::new("a.md"), content).unwrap();

        assert_eq!(body, "Body with\n---\na rule");
    }

    #[test]
    fn test_missing_separator_names_path() {
        let splitter = FrontmatterSplitter::new();
        let err = splitter
            .split(Path::new("posts/broken.md"), "no delimiter here")
            .unwrap_err();

        match err {
            PipelineError::MissingSeparator { path } => {
                assert_eq!(path, Path::new("posts/broken.md"));
            }
            other => panic!("unexpected error: {other}"),
        }
    }

    #[test]
    fn test_leading_separator_is_not_a_boundary() {
        // A file starting with --- has no preceding newline, so the
        // delimiter line does not count.
        let splitter = FrontmatterSplitter::new();
        let result = splitter.split(Path::new("a.md"), "---\nonly a body");
        assert!(result.is_err());
    }
}
