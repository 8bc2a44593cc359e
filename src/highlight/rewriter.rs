// file: src/highlight/rewriter.rs
// description: regex-driven code block rewriting in rendered html
// reference: https://docs.rs/regex

//! Locates fenced code regions in rendered HTML and replaces their
//! payload with tokenized markup from the registered engine for the
//! declared language.
//!
//! Region detection is regex-based on purpose: the input is the
//! constrained output of a known renderer, not general HTML, and the
//! pattern is caller-overridable to interoperate with other renderers.
//!
//! Failure policy: a tokenization error for one region is isolated. The
//! original region is substituted unchanged and a warning is logged;
//! sibling regions and the rest of the document still process. Regions
//! with no language tag, or a language with no registered engine, are
//! likewise left byte-identical.

use crate::error::{PipelineError, Result};
use crate::highlight::{EngineRegistry, Token};
use lazy_static::lazy_static;
use regex::{Captures, Regex};
use tracing::warn;

lazy_static! {
    // Matches the <pre><code class="LANG">...</code></pre> shape emitted
    // by pulldown-cmark, tolerating both bare and `language-`-prefixed
    // class values.
    static ref CODE_REGION: Regex = Regex::new(
        r#"(?s)<pre><code(?: class="(?:language-)?(?P<lang>[^"]*)")?>(?P<code>.*?)</code></pre>"#
    )
    .expect("CODE_REGION regex is valid");
}

/// Outcome of one document rewrite.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RewriteOutcome {
    pub html: String,
    pub regions_highlighted: usize,
    pub regions_skipped: usize,
}

pub struct CodeBlockRewriter {
    registry: EngineRegistry,
    pattern: Regex,
    css_class: String,
}

impl CodeBlockRewriter {
    pub fn new(registry: EngineRegistry, css_class: impl Into<String>) -> Self {
        Self {
            registry,
            pattern: CODE_REGION.clone(),
            css_class: css_class.into(),
        }
    }

    /// Replaces the default region pattern. The pattern must carry a
    /// `code` capture group for the inner payload and a `lang` group for
    /// the language tag.
    pub fn with_pattern(
        registry: EngineRegistry,
        css_class: impl Into<String>,
        pattern: Regex,
    ) -> Result<Self> {
        for required in ["lang", "code"] {
            if !pattern.capture_names().flatten().any(|n| n == required) {
                return Err(PipelineError::Config(format!(
                    "highlight pattern is missing the `{required}` capture group"
                )));
            }
        }

        Ok(Self {
            registry,
            pattern,
            css_class: css_class.into(),
        })
    }

    /// Rewrites every matched code region in `html`. Bytes outside
    /// matched regions are preserved exactly.
    pub fn rewrite(&self, html: &str) -> RewriteOutcome {
        let mut output = String::with_capacity(html.len());
        let mut highlighted = 0;
        let mut skipped = 0;
        let mut cursor = 0;

        for caps in self.pattern.captures_iter(html) {
            let region = caps.get(0).expect("capture 0 always participates");
            output.push_str(&html[cursor..region.start()]);

            match self.rewrite_region(&caps) {
                Some(replacement) => {
                    output.push_str(&replacement);
                    highlighted += 1;
                }
                None => {
                    output.push_str(region.as_str());
                    skipped += 1;
                }
            }

            cursor = region.end();
        }

        output.push_str(&html[cursor..]);

        RewriteOutcome {
            html: output,
            regions_highlighted: highlighted,
            regions_skipped: skipped,
        }
    }

    fn rewrite_region(&self, caps: &Captures) -> Option<String> {
        let lang = caps
            .name("lang")
            .map(|m| m.as_str())
            .filter(|lang| !lang.is_empty())?;
        let engine = self.registry.resolve(lang)?;

        let payload = caps.name("code").map(|m| m.as_str()).unwrap_or("");
        // The renderer HTML-escaped the payload; restore the raw source
        // before handing it to the tokenizer.
        let source = decode_entities(payload);

        match engine.tokenize(&source) {
            Ok(tokens) => Some(self.render_tokens(lang, &tokens)),
            Err(err) => {
                warn!("Leaving `{}` region unhighlighted: {}", lang, err);
                None
            }
        }
    }

    fn render_tokens(&self, lang: &str, tokens: &[Token]) -> String {
        let mut out = String::new();
        out.push_str("<pre><code class=\"");
        out.push_str(&self.css_class);
        out.push(' ');
        out.push_str(lang);
        out.push_str("\">");

        for token in tokens {
            if token.class.is_empty() {
                out.push_str(&escape_html(&token.text));
            } else {
                out.push_str("<span class=\"");
                out.push_str(&token.class);
                out.push_str("\">");
                out.push_str(&escape_html(&token.text));
                out.push_str("</span>");
            }
        }

        out.push_str("</code></pre>");
        out
    }
}

/// Decodes the named and numeric HTML entities a renderer emits inside
/// code payloads. Unknown entities are left untouched.
pub(crate) fn decode_entities(input: &str) -> String {
    let mut out = String::with_capacity(input.len());
    let mut rest = input;

    while let Some(pos) = rest.find('&') {
        out.push_str(&rest[..pos]);
        rest = &rest[pos..];

        let limit = rest.len().min(12);
        let semicolon = rest.as_bytes()[..limit].iter().position(|&b| b == b';');
        let decoded = semicolon.and_then(|end| {
            let entity = &rest[1..end];
            let ch = match entity {
                "lt" => Some('<'),
                "gt" => Some('>'),
                "amp" => Some('&'),
                "quot" => Some('"'),
                "apos" => Some('\''),
                _ => {
                    if let Some(hex) = entity.strip_prefix("#x").or_else(|| entity.strip_prefix("#X")) {
                        u32::from_str_radix(hex, 16).ok().and_then(char::from_u32)
                    } else if let Some(dec) = entity.strip_prefix('#') {
                        dec.parse::<u32>().ok().and_then(char::from_u32)
                    } else {
                        None
                    }
                }
            };
            ch.map(|ch| (ch, end + 1))
        });

        match decoded {
            Some((ch, consumed)) => {
                out.push(ch);
                rest = &rest[consumed..];
            }
            None => {
                out.push('&');
                rest = &rest[1..];
            }
        }
    }

    out.push_str(rest);
    out
}

pub(crate) fn escape_html(input: &str) -> String {
    let mut out = String::with_capacity(input.len());
    for ch in input.chars() {
        match ch {
            '&' => out.push_str("&amp;"),
            '<' => out.push_str("&lt;"),
            '>' => out.push_str("&gt;"),
            '"' => out.push_str("&quot;"),
            '\'' => out.push_str("&#39;"),
            _ => out.push(ch),
        }
    }
    out
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::highlight::{HighlightEngine, TokenizeError};
    use pretty_assertions::assert_eq;
    use std::sync::Arc;

    /// Echoes the raw source back as a single classed token, so tests
    /// can observe exactly what the engine received.
    struct MirrorEngine;

    impl HighlightEngine for MirrorEngine {
        fn tokenize(&self, source: &str) -> std::result::Result<Vec<Token>, TokenizeError> {
            Ok(vec![Token::new("src", source)])
        }
    }

    struct FailingEngine;

    impl HighlightEngine for FailingEngine {
        fn tokenize(&self, _source: &str) -> std::result::Result<Vec<Token>, TokenizeError> {
            Err(TokenizeError("unexpected byte".to_string()))
        }
    }

    fn rewriter_for(lang: &str) -> CodeBlockRewriter {
        let mut registry = EngineRegistry::new();
        registry.register(lang, Arc::new(MirrorEngine));
        CodeBlockRewriter::new(registry, "highlight")
    }

    #[test]
    fn test_registered_language_is_rewritten() {
        let html = "<p>before</p><pre><code class=\"elixir\">IO.puts(&quot;Hello World&quot;)</code></pre><p>after</p>";
        let outcome = rewriter_for("elixir").rewrite(html);

        assert_eq!(
            outcome.html,
            "<p>before</p><pre><code class=\"highlight elixir\"><span class=\"src\">IO.puts(&quot;Hello World&quot;)</span></code></pre><p>after</p>"
        );
        assert_eq!(outcome.regions_highlighted, 1);
        assert_eq!(outcome.regions_skipped, 0);
    }

    #[test]
    fn test_payload_entities_are_decoded_before_tokenizing() {
        // &lt; must reach the engine as a raw `<` and come back escaped.
        let html = "<pre><code class=\"c\">a &lt; b &amp;&amp; b &gt; 0</code></pre>";
        let outcome = rewriter_for("c").rewrite(html);

        assert_eq!(
            outcome.html,
            "<pre><code class=\"highlight c\"><span class=\"src\">a &lt; b &amp;&amp; b &gt; 0</span></code></pre>"
        );
    }

    #[test]
    fn test_language_prefixed_class_resolves() {
        let html = "<pre><code class=\"language-rust\">let x = 1;</code></pre>";
        let outcome = rewriter_for("rust").rewrite(html);

        assert!(outcome.html.contains("class=\"highlight rust\""));
        assert_eq!(outcome.regions_highlighted, 1);
    }

    #[test]
    fn test_unregistered_language_left_byte_identical() {
        let html = "<pre><code class=\"zig\">const x = 1;</code></pre>";
        let outcome = rewriter_for("rust").rewrite(html);

        assert_eq!(outcome.html, html);
        assert_eq!(outcome.regions_skipped, 1);
    }

    #[test]
    fn test_missing_language_tag_left_untouched() {
        let html = "<pre><code>plain block</code></pre>";
        let outcome = rewriter_for("rust").rewrite(html);

        assert_eq!(outcome.html, html);
    }

    #[test]
    fn test_empty_payload_is_wrapped_not_an_error() {
        let html = "<pre><code class=\"rust\"></code></pre>";
        let outcome = rewriter_for("rust").rewrite(html);

        assert_eq!(
            outcome.html,
            "<pre><code class=\"highlight rust\"><span class=\"src\"></span></code></pre>"
        );
        assert_eq!(outcome.regions_highlighted, 1);
    }

    #[test]
    fn test_regions_are_independent_and_order_preserving() {
        let mut registry = EngineRegistry::new();
        registry.register("ok", Arc::new(MirrorEngine));
        registry.register("bad", Arc::new(FailingEngine));
        let rewriter = CodeBlockRewriter::new(registry, "highlight");

        let html = "<pre><code class=\"bad\">first</code></pre>\n<pre><code class=\"ok\">second</code></pre>";
        let outcome = rewriter.rewrite(html);

        // The failing region passes through unchanged; its sibling is
        // still rewritten, in document order.
        assert_eq!(
            outcome.html,
            "<pre><code class=\"bad\">first</code></pre>\n<pre><code class=\"highlight ok\"><span class=\"src\">second</span></code></pre>"
        );
        assert_eq!(outcome.regions_highlighted, 1);
        assert_eq!(outcome.regions_skipped, 1);
    }

    #[test]
    fn test_custom_pattern_override() {
        let mut registry = EngineRegistry::new();
        registry.register("rust", Arc::new(MirrorEngine));
        let pattern =
            Regex::new(r#"(?s)<code-sample lang="(?P<lang>[^"]*)">(?P<code>.*?)</code-sample>"#)
                .unwrap();
        let rewriter = CodeBlockRewriter::with_pattern(registry, "highlight", pattern).unwrap();

        let html = "<code-sample lang=\"rust\">let x;</code-sample>";
        let outcome = rewriter.rewrite(html);

        assert_eq!(
            outcome.html,
            "<pre><code class=\"highlight rust\"><span class=\"src\">let x;</span></code></pre>"
        );
    }

    #[test]
    fn test_custom_pattern_requires_capture_groups() {
        let pattern = Regex::new(r"<pre>(.*?)</pre>").unwrap();
        let result =
            CodeBlockRewriter::with_pattern(EngineRegistry::new(), "highlight", pattern);

        assert!(result.is_err());
    }

    #[test]
    fn test_decode_entities_known_and_numeric() {
        assert_eq!(decode_entities("&lt;x&gt; &amp; &quot;y&quot;"), "<x> & \"y\"");
        assert_eq!(decode_entities("&#39;a&#39; &#x41;"), "'a' A");
    }

    #[test]
    fn test_decode_entities_leaves_unknown_alone() {
        assert_eq!(decode_entities("&nope; & plain"), "&nope; & plain");
    }

    #[test]
    fn test_decode_does_not_double_decode() {
        // &amp;lt; is the escaped text "&lt;", not a "<".
        assert_eq!(decode_entities("&amp;lt;"), "&lt;");
    }

    #[test]
    fn test_escape_html() {
        assert_eq!(escape_html("a<b>&\"'"), "a&lt;b&gt;&amp;&quot;&#39;");
    }
}
