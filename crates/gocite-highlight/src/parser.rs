//! Parser for one annotation record as emitted by the annotation model:
//!
//! ```text
//! Goterm 1: GO:0008284
//! Name: cell proliferation
//! Text Citation: "increased proliferation"
//! Reason: direct evidence
//! ```
//!
//! Labels are matched case-insensitively at the start of a line. A missing
//! label yields the `N/A` placeholder for that field only.

use regex::Regex;
use std::sync::OnceLock;

use gocite_common::{AnnotationRecord, NOT_AVAILABLE};

fn term_regex() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    RE.get_or_init(|| {
        // Optional list marker ("-", "*", "\u{2022}", "1.") then an optional ordinal
        // label ("Goterm 1:", "Term 2:", "3.", "4)") before the id
        Regex::new(
            r"(?m)^[ \t]*(?:(?:[-*\x{2022}]|\d+[.)])[ \t]*)?(?i:(?:go[ \t]*term|term)?[ \t]*\d*[ \t]*[:.)][ \t]*)?((?i:go):\d+)",
        )
        .unwrap()
    })
}

fn name_regex() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    RE.get_or_init(|| Regex::new(r"(?im)^[ \t]*Name:[ \t]*(.*?)[ \t\r]*$").unwrap())
}

fn citation_regex() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    RE.get_or_init(|| {
        Regex::new("(?im)^[ \\t]*Text Citation:[ \\t]*[\"\u{201C}\u{201D}]?(.*?)[\"\u{201C}\u{201D}]?[ \\t\\r]*$").unwrap()
    })
}

fn reason_regex() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    RE.get_or_init(|| Regex::new(r"(?im)^[ \t]*Reason:[ \t]*(.*?)[ \t\r]*$").unwrap())
}

fn capture(re: &Regex, record: &str) -> String {
    re.captures(record)
        .and_then(|caps| caps.get(1))
        .map(|m| m.as_str().to_string())
        .unwrap_or_else(|| NOT_AVAILABLE.to_string())
}

/// Parse one record. Never fails; missing fields degrade to `N/A`.
pub fn parse(record: &str) -> AnnotationRecord {
    AnnotationRecord {
        term_id: capture(term_regex(), record).to_ascii_uppercase(),
        term_name: capture(name_regex(), record),
        citation: capture(citation_regex(), record),
        reason: capture(reason_regex(), record),
    }
}

/// Parse each record independently.
pub fn parse_all<I, S>(records: I) -> Vec<AnnotationRecord>
where
    I: IntoIterator<Item = S>,
    S: AsRef<str>,
{
    records.into_iter().map(|r| parse(r.as_ref())).collect()
}
