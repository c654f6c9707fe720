//! Citation highlighting for GO annotations.
//!
//! Locates model-reported citations inside the original paper text, even when
//! the citation was quoted from a re-flowed copy, and renders the text with a
//! colored, sanitized marker around every located citation.

pub mod citations;
pub mod document;
pub mod locator;
pub mod normalize;
pub mod parser;
pub mod render;

pub use citations::{CitationSet, ColorAssignment, PALETTE};
pub use document::{annotate, AnnotatedDocument};
pub use locator::{locate, tolerant_pattern, CitationLocation};
pub use normalize::normalize;
pub use parser::{parse, parse_all};
pub use render::{escape_html, render, render_document, sanitize, HighlightSpan, HighlightedDocument, HIGHLIGHT_CLASS};
