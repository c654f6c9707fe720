//! Standalone HTML report: the highlighted paper text followed by the GO
//! terms behind every citation.

use gocite_common::{AnnotationRecord, PaperMetadata};
use gocite_highlight::{escape_html, AnnotatedDocument};

const DEFAULT_REPORT_FILE: &str = "Highlighted_Text";

/// `<stem>.html`, or the built-in name when `stem` is empty.
pub fn report_file_name(stem: &str) -> String {
    if stem.is_empty() {
        format!("{}.html", DEFAULT_REPORT_FILE)
    } else {
        format!("{}.html", stem)
    }
}

fn render_term(record: &AnnotationRecord) -> String {
    let id = match record.quickgo_url() {
        Some(url) => format!(
            r#"<a href="{}" target="_blank">{}</a>"#,
            escape_html(&url),
            escape_html(&record.term_id)
        ),
        None => escape_html(&record.term_id),
    };
    format!(
        r#"<tr><td>{}</td><td>{}</td><td>{}</td></tr>"#,
        id,
        escape_html(&record.term_name),
        escape_html(&record.reason)
    )
}

fn render_citations(doc: &AnnotatedDocument) -> String {
    doc.grouped()
        .into_iter()
        .map(|(citation, records)| {
            let color = doc.highlighted.colors.color_of(citation).unwrap_or("transparent");
            let status = if doc.highlighted.is_highlighted(citation) {
                ""
            } else {
                r#" <span class="badge bg-secondary">not highlighted</span>"#
            };
            let rows = records.into_iter().map(render_term).collect::<String>();
            format!(
                r#"
            <div class="citation-card" style="border-left-color:{}">
                <blockquote>{}</blockquote>{}
                <table class="table table-sm">
                    <thead><tr><th>GO Term</th><th>Name</th><th>Reason</th></tr></thead>
                    <tbody>{}</tbody>
                </table>
            </div>"#,
                color,
                escape_html(citation),
                status,
                rows
            )
        })
        .collect()
}

/// Full report page for `doc`.
pub fn render_report(doc: &AnnotatedDocument, meta: &PaperMetadata) -> String {
    let heading = if meta.title.is_empty() {
        "GO Annotation Report".to_string()
    } else {
        escape_html(&meta.title)
    };

    // Records without a citation never reach the grouped view.
    let uncited = doc
        .records
        .iter()
        .filter(|r| !r.has_citation())
        .map(render_term)
        .collect::<String>();
    let uncited_html = if uncited.is_empty() {
        String::new()
    } else {
        format!(
            r#"
            <h4>Terms without a citation</h4>
            <table class="table table-sm">
                <thead><tr><th>GO Term</th><th>Name</th><th>Reason</th></tr></thead>
                <tbody>{}</tbody>
            </table>"#,
            uncited
        )
    };

    format!(
        r##"<!DOCTYPE html>
<html>
<head>
    <meta charset="utf-8">
    <title>{heading}</title>
    <link href="https://cdn.jsdelivr.net/npm/bootstrap@5.3.0/dist/css/bootstrap.min.css" rel="stylesheet">
    <style>
        body {{ padding: 2rem; background: #f8f9fa; }}
        .container {{ max-width: 1100px; }}
        .meta {{ color: #6c757d; margin-bottom: 1rem; }}
        .highlighted-text {{
            background: white;
            padding: 1.5rem;
            border-radius: 8px;
            line-height: 1.6;
            text-align: justify;
            white-space: pre-wrap;
            box-shadow: 0 2px 4px rgba(0,0,0,0.1);
        }}
        .citation-card {{ background: white; border-left: 6px solid; border-radius: 4px; padding: 1rem; margin-top: 1rem; }}
        blockquote {{ font-style: italic; }}
    </style>
</head>
<body>
    <div class="container">
        <h2>{heading}</h2>
        <div class="meta">Gene: {gene} &middot; Isoform: {isoform} &middot; Ensembl: {ensembl} &middot; PubMed: {paper_id}</div>
        <div class="highlighted-text">{text}</div>

        <h4 class="mt-4">Citations ({n_citations}) &middot; GO terms ({n_terms})</h4>
        {citations}
        {uncited}
    </div>
</body>
</html>
"##,
        heading = heading,
        gene = escape_html(&meta.gene),
        isoform = escape_html(&meta.isoform),
        ensembl = escape_html(&meta.ensembl_accession),
        paper_id = escape_html(&meta.paper_id),
        text = doc.highlighted.html,
        n_citations = doc.citations.len(),
        n_terms = doc.records.len(),
        citations = render_citations(doc),
        uncited = uncited_html,
    )
}

#[cfg(test)]
mod tests {
    use super::*;
    use gocite_highlight::{annotate, PALETTE};
    use gocite_test_utils::{model_records, sample_metadata, PAPER_TEXT};

    #[test]
    fn test_report_file_name() {
        assert_eq!(report_file_name(""), "Highlighted_Text.html");
        assert_eq!(report_file_name("abc1"), "abc1.html");
    }

    #[test]
    fn test_report_contains_highlights_and_links() {
        let doc = annotate(PAPER_TEXT, model_records());
        let html = render_report(&doc, &sample_metadata());
        assert!(html.contains("<title>ABC1-b in cardiomyocytes</title>"));
        assert!(html.contains(&doc.highlighted.html));
        assert!(html.contains(r#"<a href="https://www.ebi.ac.uk/QuickGO/term/GO:0005741" target="_blank">GO:0005741</a>"#));
        assert!(html.contains(&format!("border-left-color:{}", PALETTE[0])));
        assert!(html.contains("Citations (5) &middot; GO terms (5)"));
    }

    #[test]
    fn test_unmatched_citation_is_flagged() {
        let doc = annotate(PAPER_TEXT, model_records());
        let html = render_report(&doc, &sample_metadata());
        assert_eq!(html.matches("not highlighted").count(), 2);
    }

    #[test]
    fn test_record_fields_are_escaped() {
        let records = ["GO:0000001\nName: <b>bold</b>\nText Citation: \"nothing\"\nReason: a & b"];
        let doc = annotate("plain text", records);
        let html = render_report(&doc, &Default::default());
        assert!(html.contains("&lt;b&gt;bold&lt;/b&gt;"));
        assert!(html.contains("a &amp; b"));
        assert!(html.contains("<title>GO Annotation Report</title>"));
    }

    #[test]
    fn test_uncited_terms_listed_separately() {
        let records = ["GO:0000001\nName: orphan\nReason: no excerpt"];
        let doc = annotate("plain text", records);
        let html = render_report(&doc, &Default::default());
        assert!(html.contains("Terms without a citation"));
        assert!(html.contains("orphan"));
    }
}
