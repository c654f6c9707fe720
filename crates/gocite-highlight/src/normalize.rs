//! Text canonicalization for reflow-insensitive comparison.
//!
//! Two copies of the same paragraph often differ only in layout: one was
//! wrapped with hyphenated line breaks, the other re-flowed by the model that
//! quoted it. `normalize` maps both onto the same string.

use regex::Regex;
use std::sync::OnceLock;

/// Hyphen at a line wrap, with any whitespace around the break.
fn hyphen_break_regex() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    RE.get_or_init(|| Regex::new(r"-\s*\n\s*").unwrap())
}

fn line_break_regex() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    RE.get_or_init(|| Regex::new(r"\n+").unwrap())
}

fn whitespace_regex() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    RE.get_or_init(|| Regex::new(r"\s+").unwrap())
}

/// Canonicalize `text` for comparison.
///
/// Steps, in order:
/// 1. drop hyphen + line break sequences (rejoins wrapped words)
/// 2. line-break runs become one space
/// 3. whitespace runs become one space
/// 4. curly double quotes become `"`, curly single quotes become `'`
/// 5. lowercase
/// 6. trim
///
/// Pure and idempotent.
pub fn normalize(text: &str) -> String {
    let joined = hyphen_break_regex().replace_all(text, "");
    let spaced = line_break_regex().replace_all(&joined, " ");
    let collapsed = whitespace_regex().replace_all(&spaced, " ");

    let unquoted: String = collapsed
        .chars()
        .map(|c| match c {
            '\u{201C}' | '\u{201D}' => '"',
            '\u{2018}' | '\u{2019}' => '\'',
            other => other,
        })
        .collect();

    unquoted.to_lowercase().trim().to_string()
}
