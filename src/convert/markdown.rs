// file: src/convert/markdown.rs
// description: markdown to html rendering with pulldown-cmark
// reference: https://docs.rs/pulldown-cmark

use crate::config::MarkdownConfig;
use pulldown_cmark::{html, Options, Parser};

pub struct MarkdownRenderer {
    options: Options,
}

impl MarkdownRenderer {
    pub fn new(config: &MarkdownConfig) -> Self {
        let mut options = Options::empty();

        if config.tables {
            options.insert(Options::ENABLE_TABLES);
        }
        if config.footnotes {
            options.insert(Options::ENABLE_FOOTNOTES);
        }
        if config.strikethrough {
            options.insert(Options::ENABLE_STRIKETHROUGH);
        }
        if config.tasklists {
            options.insert(Options::ENABLE_TASKLISTS);
        }
        if config.smart_punctuation {
            options.insert(Options::ENABLE_SMART_PUNCTUATION);
        }

        Self { options }
    }

    /// Renders a Markdown body to HTML. The engine is total over its
    /// input: malformed constructs render as literal text.
    pub fn render(&self, body: &str) -> String {
        let parser = Parser::new_ext(body, self.options);
        let mut output = String::with_capacity(body.len() * 3 / 2);
        html::push_html(&mut output, parser);
        output
    }
}
