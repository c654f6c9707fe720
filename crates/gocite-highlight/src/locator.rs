//! Citation locator.
//!
//! The model quotes from a re-flowed copy of the input, so a citation rarely
//! matches the original byte for byte. Presence is decided on normalized text;
//! the actual occurrence is then found with a whitespace-tolerant pattern run
//! against the original.

use std::ops::Range;

use regex::{NoExpand, Regex, RegexBuilder};
use std::sync::OnceLock;
use tracing::{debug, warn};

use crate::normalize::normalize;

/// Matches any run of space, tab, newline or carriage return.
const TOLERANT_GAP: &str = r"[ \t\n\r]+";

/// Upper bound on compiled pattern size; larger citations are skipped.
const PATTERN_SIZE_LIMIT: usize = 1 << 22;

/// Runs of the gap characters only. Other whitespace, NBSP included, stays literal.
fn whitespace_run_regex() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    RE.get_or_init(|| Regex::new(r"[ \t\n\r]+").unwrap())
}

/// Result of locating one citation inside the original text.
#[derive(Debug, Clone)]
pub struct CitationLocation {
    pub citation: String,
    /// Normalized text contains the normalized citation.
    pub found: bool,
    /// Case-insensitive, whitespace-tolerant pattern for the citation.
    /// `None` when the citation is blank or its pattern could not be built.
    pub pattern: Option<Regex>,
}

impl CitationLocation {
    /// Byte ranges of every non-overlapping occurrence in `text`.
    ///
    /// Empty unless the citation was found.
    pub fn spans(&self, text: &str) -> Vec<Range<usize>> {
        match (&self.pattern, self.found) {
            (Some(pattern), true) => pattern.find_iter(text).map(|m| m.range()).collect(),
            _ => Vec::new(),
        }
    }
}

/// Build the tolerant pattern source for `citation`.
///
/// The citation is escaped as literal text, then every whitespace run is
/// replaced with a gap that matches one or more whitespace characters,
/// line breaks included.
pub fn tolerant_pattern(citation: &str) -> String {
    let escaped = regex::escape(citation);
    whitespace_run_regex()
        .replace_all(&escaped, NoExpand(TOLERANT_GAP))
        .into_owned()
}

/// Locate `citation` inside `original`.
///
/// A citation that is absent is an expected outcome: it is logged and reported
/// as not found, never raised.
pub fn locate(original: &str, citation: &str) -> CitationLocation {
    locate_normalized(&normalize(original), citation)
}

/// [`locate`] against text that has already been through [`normalize`].
pub(crate) fn locate_normalized(normalized_original: &str, citation: &str) -> CitationLocation {
    let normalized_citation = normalize(citation);
    if normalized_citation.is_empty() {
        debug!(citation, "Blank citation skipped");
        return CitationLocation {
            citation: citation.to_string(),
            found: false,
            pattern: None,
        };
    }

    let pattern = match RegexBuilder::new(&tolerant_pattern(citation))
        .case_insensitive(true)
        .size_limit(PATTERN_SIZE_LIMIT)
        .build()
    {
        Ok(re) => Some(re),
        Err(e) => {
            warn!(citation, error = %e, "Could not build citation pattern");
            None
        }
    };

    let contained = normalized_original.contains(&normalized_citation);
    if contained {
        debug!(citation, "Found citation");
    } else {
        warn!(citation, "Not found: citation absent from normalized text");
    }

    CitationLocation {
        citation: citation.to_string(),
        found: contained && pattern.is_some(),
        pattern,
    }
}
