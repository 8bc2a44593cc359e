// file: src/convert/mod.rs
// description: body conversion module exports
// reference: internal module structure

pub mod dispatch;
pub mod markdown;

pub use dispatch::{BodyConverter, Converter};
pub use markdown::MarkdownRenderer;
