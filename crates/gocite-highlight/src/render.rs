//! Highlight renderer.
//!
//! Rendering runs in two passes over the untouched original text:
//!   1. collect tagged spans for every citation, resolving overlaps so the
//!      citation that comes first in the set keeps the contested text;
//!   2. emit markup once from the sorted span list.
//!
//! Text segments are HTML-escaped before the markers are inserted and the
//! finished markup goes through a sanitizer that only admits the marker.

use std::collections::BTreeMap;
use std::ops::Range;

use serde::Serialize;
use tracing::debug;

use crate::citations::{CitationSet, ColorAssignment};
use crate::locator::locate_normalized;
use crate::normalize::normalize;

/// Class carried by every highlight marker.
pub const HIGHLIGHT_CLASS: &str = "highlight";

/// One highlighted region of the original text.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct HighlightSpan {
    /// Byte range into the original text.
    pub range: Range<usize>,
    pub citation: String,
    pub color: &'static str,
}

/// Original text with highlight markers layered on top.
#[derive(Debug, Clone)]
pub struct HighlightedDocument {
    /// Sanitized markup, ready for display.
    pub html: String,
    /// Non-overlapping spans, sorted by start.
    pub spans: Vec<HighlightSpan>,
    pub colors: ColorAssignment,
    /// Citations that produced no highlight.
    pub unmatched: Vec<String>,
}

impl HighlightedDocument {
    pub fn is_highlighted(&self, citation: &str) -> bool {
        self.spans.iter().any(|s| s.citation == citation)
    }
}

/// Render `text` with every located citation wrapped in a highlight marker.
pub fn render<I, S>(text: &str, citations: I) -> String
where
    I: IntoIterator<Item = S>,
    S: AsRef<str>,
{
    render_document(text, &CitationSet::new(citations)).html
}

/// Render `text` against a citation set and keep the span details.
pub fn render_document(text: &str, citations: &CitationSet) -> HighlightedDocument {
    let colors = ColorAssignment::for_set(citations);
    let normalized = normalize(text);

    // start -> (end, citation index); entries never overlap
    let mut accepted: BTreeMap<usize, (usize, usize)> = BTreeMap::new();
    let mut unmatched = Vec::new();

    for (idx, citation) in citations.iter().enumerate() {
        let location = locate_normalized(&normalized, citation);
        if !location.found {
            unmatched.push(citation.to_string());
            continue;
        }

        let candidates = location.spans(text);
        if candidates.is_empty() {
            debug!(citation, "Pattern matched nothing after normalized check passed (normalization divergence)");
            unmatched.push(citation.to_string());
            continue;
        }

        let mut kept = 0usize;
        for range in candidates {
            if overlaps_accepted(&accepted, &range) {
                debug!(citation, start = range.start, end = range.end, "Span overlaps an earlier citation; dropped");
                continue;
            }
            accepted.insert(range.start, (range.end, idx));
            kept += 1;
        }
        if kept == 0 {
            unmatched.push(citation.to_string());
        }
    }

    let set = citations.as_slice();
    let spans: Vec<HighlightSpan> = accepted
        .into_iter()
        .map(|(start, (end, idx))| {
            let citation = set[idx].clone();
            let color = colors.color_of(&citation).unwrap_or(crate::citations::PALETTE[0]);
            HighlightSpan { range: start..end, citation, color }
        })
        .collect();

    let markup = build_markup(text, &spans);
    HighlightedDocument {
        html: sanitize(&markup),
        spans,
        colors,
        unmatched,
    }
}

/// Only the accepted span with the greatest start before `range.end` can overlap.
fn overlaps_accepted(accepted: &BTreeMap<usize, (usize, usize)>, range: &Range<usize>) -> bool {
    accepted
        .range(..range.end)
        .next_back()
        .is_some_and(|(_, &(end, _))| end > range.start)
}

fn build_markup(text: &str, spans: &[HighlightSpan]) -> String {
    let mut out = String::with_capacity(text.len() + spans.len() * 96);
    let mut cursor = 0;

    for span in spans {
        out.push_str(&escape_html(&text[cursor..span.range.start]));
        out.push_str(&format!(
            r#"<span class="{}" data-citation="{}" style="background-color:{}">"#,
            HIGHLIGHT_CLASS,
            escape_html(&span.citation),
            span.color,
        ));
        out.push_str(&escape_html(&text[span.range.clone()]));
        out.push_str("</span>");
        cursor = span.range.end;
    }
    out.push_str(&escape_html(&text[cursor..]));
    out
}

/// Escape text for use in element content or a double-quoted attribute.
pub fn escape_html(s: &str) -> String {
    s.replace('&', "&amp;")
        .replace('<', "&lt;")
        .replace('>', "&gt;")
        .replace('"', "&quot;")
}

/// Strip everything except highlight markers from `markup`.
///
/// Total over any input string.
pub fn sanitize(markup: &str) -> String {
    let mut builder = ammonia::Builder::empty();
    builder
        .add_tags(&["span"])
        .add_tag_attributes("span", &["class", "data-citation", "style"]);
    builder.clean(markup).to_string()
}
