//! floatlabel HTML
//!
//! HTML5 parsing built on html5ever, producing `floatlabel-dom` documents,
//! and serialization back to markup.

mod parser;
mod serializer;

pub use floatlabel_dom::Document;
pub use parser::HtmlParser;
pub use serializer::HtmlSerializer;

/// Parse an HTML string into a document that is still `Loading`
pub fn parse(html: &str) -> HtmlResult<Document> {
    HtmlParser::new().parse(html)
}

/// Result type for HTML operations
pub type HtmlResult<T> = Result<T, HtmlError>;

/// HTML errors
#[derive(Debug, thiserror::Error)]
pub enum HtmlError {
    #[error("failed to build DOM: {0}")]
    Dom(#[from] floatlabel_dom::DomError),
}
