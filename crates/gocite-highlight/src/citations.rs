//! Distinct citation sets and their highlight colors.

use std::collections::HashMap;

use gocite_common::AnnotationRecord;

/// Fixed highlight palette, assigned by first-seen index modulo its length.
pub const PALETTE: [&str; 8] = [
    "#ffeb3b", // yellow
    "#8bc34a", // light green
    "#03a9f4", // light blue
    "#ff5722", // deep orange
    "#e91e63", // pink
    "#9c27b0", // purple
    "#00bcd4", // cyan
    "#cddc39", // lime
];

/// Distinct citation strings in first-seen order.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct CitationSet {
    citations: Vec<String>,
}

impl CitationSet {
    /// Deduplicate `citations`, keeping the first occurrence of each.
    pub fn new<I, S>(citations: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        let mut set = Self::default();
        for citation in citations {
            set.insert(citation.as_ref());
        }
        set
    }

    /// Citations carried by `records`, skipping records without one.
    pub fn from_records(records: &[AnnotationRecord]) -> Self {
        Self::new(
            records
                .iter()
                .filter(|r| r.has_citation())
                .map(|r| r.citation.as_str()),
        )
    }

    fn insert(&mut self, citation: &str) {
        if !self.citations.iter().any(|c| c == citation) {
            self.citations.push(citation.to_string());
        }
    }

    pub fn len(&self) -> usize {
        self.citations.len()
    }

    pub fn is_empty(&self) -> bool {
        self.citations.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = &str> {
        self.citations.iter().map(String::as_str)
    }

    pub fn as_slice(&self) -> &[String] {
        &self.citations
    }
}

/// Citation → palette color, by first-seen index.
#[derive(Debug, Clone, Default)]
pub struct ColorAssignment {
    index: HashMap<String, usize>,
}

impl ColorAssignment {
    pub fn for_set(set: &CitationSet) -> Self {
        let index = set
            .iter()
            .enumerate()
            .map(|(i, citation)| (citation.to_string(), i))
            .collect();
        Self { index }
    }

    /// First-seen index of `citation` within its set.
    pub fn index_of(&self, citation: &str) -> Option<usize> {
        self.index.get(citation).copied()
    }

    pub fn color_of(&self, citation: &str) -> Option<&'static str> {
        self.index_of(citation).map(|i| PALETTE[i % PALETTE.len()])
    }
}
