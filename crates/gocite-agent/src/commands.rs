//! Command handlers for the `gocite` binary.

use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use clap::Args;
use gocite_client::AnnotationService;
use gocite_common::{load_raw_records, AnnotationRecord, PaperMetadata};
use gocite_export::{all_file_name, record_file_name, write_csv, CsvExporter, QuoteMode};
use gocite_highlight::{annotate, parse_all, AnnotatedDocument};
use tracing::{info, warn};

use crate::report::{render_report, report_file_name};
use crate::session::Session;

/// Paper metadata entered by the user; repeated on every CSV row.
#[derive(Args, Debug, Clone, Default)]
pub struct MetadataArgs {
    #[arg(long, default_value = "")]
    pub gene: String,
    /// Isoform name, sent to the service as the annotation target
    #[arg(long, default_value = "")]
    pub isoform: String,
    #[arg(long = "ensembl", default_value = "")]
    pub ensembl_accession: String,
    /// PubMed id of the paper
    #[arg(long = "paper-id", default_value = "")]
    pub paper_id: String,
    #[arg(long, default_value = "")]
    pub title: String,
}

impl From<MetadataArgs> for PaperMetadata {
    fn from(args: MetadataArgs) -> Self {
        PaperMetadata {
            gene: args.gene,
            isoform: args.isoform,
            ensembl_accession: args.ensembl_accession,
            paper_id: args.paper_id,
            title: args.title,
        }
    }
}

#[derive(Args, Debug)]
pub struct AnnotateArgs {
    /// Paper text file
    #[arg(long, value_name = "PATH")]
    pub text: PathBuf,
    /// Model to load before submitting
    #[arg(long, value_name = "ID")]
    pub model: String,
    #[command(flatten)]
    pub metadata: MetadataArgs,
    /// File holding a prompt that replaces the built-in one
    #[arg(long, value_name = "PATH")]
    pub prompt: Option<PathBuf>,
    /// Unload the model when done
    #[arg(long)]
    pub unload: bool,
}

#[derive(Args, Debug)]
pub struct HighlightArgs {
    /// Paper text file
    #[arg(long, value_name = "PATH")]
    pub text: PathBuf,
    /// JSON array of raw model records
    #[arg(long, value_name = "PATH")]
    pub records: PathBuf,
    #[command(flatten)]
    pub metadata: MetadataArgs,
}

#[derive(Args, Debug)]
pub struct ExportArgs {
    /// Paper text file
    #[arg(long, value_name = "PATH")]
    pub text: PathBuf,
    /// JSON array of raw model records
    #[arg(long, value_name = "PATH")]
    pub records: PathBuf,
    #[command(flatten)]
    pub metadata: MetadataArgs,
    /// Also write one file per record
    #[arg(long)]
    pub per_record: bool,
}

#[derive(Args, Debug)]
pub struct ExtractArgs {
    /// PDF to extract text from
    #[arg(long, value_name = "PATH")]
    pub pdf: PathBuf,
    #[arg(long)]
    pub isoform: String,
    /// Model to load before extracting
    #[arg(long, value_name = "ID")]
    pub model: String,
}

/// Where and how output files are written.
#[derive(Debug, Clone)]
pub struct OutputSettings {
    pub dir: PathBuf,
    pub file_stem: String,
    pub quoting: QuoteMode,
}

fn read_text(path: &Path) -> Result<String> {
    std::fs::read_to_string(path).with_context(|| format!("reading {}", path.display()))
}

fn read_records(path: &Path) -> Result<Vec<String>> {
    load_raw_records(path).with_context(|| format!("loading model records from {}", path.display()))
}

fn write_report(doc: &AnnotatedDocument, meta: &PaperMetadata, out: &OutputSettings) -> Result<PathBuf> {
    std::fs::create_dir_all(&out.dir)?;
    let path = out.dir.join(report_file_name(&out.file_stem));
    std::fs::write(&path, render_report(doc, meta))
        .with_context(|| format!("writing {}", path.display()))?;
    info!("Wrote {}", path.display());
    Ok(path)
}

fn log_unmatched(doc: &AnnotatedDocument) {
    for citation in &doc.highlighted.unmatched {
        warn!("Not highlighted: \"{}\"", citation);
    }
}

/// Write the all-records CSV and, if asked, one CSV per record.
pub fn export_records(
    records: &[AnnotationRecord],
    text: &str,
    meta: &PaperMetadata,
    out: &OutputSettings,
    per_record: bool,
) -> Result<Vec<PathBuf>> {
    let exporter = CsvExporter::new(meta, text).with_quoting(out.quoting);
    let mut written = vec![write_csv(
        &out.dir,
        &all_file_name(&out.file_stem),
        &exporter.export_all(records)?,
    )?];

    if per_record {
        for (idx, record) in records.iter().enumerate() {
            written.push(write_csv(
                &out.dir,
                &record_file_name(&out.file_stem, idx),
                &exporter.export_one(record)?,
            )?);
        }
    }
    Ok(written)
}

pub async fn models<S: AnnotationService>(service: &S) -> Result<()> {
    for model in service.list_models().await? {
        println!("{}", model);
    }
    Ok(())
}

pub async fn unload<S: AnnotationService>(service: &S) -> Result<()> {
    // The loaded model lives in the service between invocations.
    let message = service.unload_model().await?;
    println!("{}", message);
    Ok(())
}

pub async fn annotate_text<S: AnnotationService>(
    service: S,
    args: AnnotateArgs,
    out: &OutputSettings,
) -> Result<Vec<PathBuf>> {
    let mut session = Session::new(service, args.metadata.into());
    session.text_input = read_text(&args.text)?;
    if let Some(path) = &args.prompt {
        session.custom_prompt = Some(read_text(path)?);
    }

    session.select_model(args.model);
    session.load_model().await?;
    let doc = session.submit().await?.clone();
    log_unmatched(&doc);

    let mut written = vec![write_report(&doc, &session.metadata, out)?];
    written.extend(export_records(&doc.records, &doc.raw_text, &session.metadata, out, false)?);

    if args.unload {
        session.unload_model().await?;
    }
    Ok(written)
}

/// Offline run of the highlighter over a saved set of model records.
pub fn highlight(args: HighlightArgs, out: &OutputSettings) -> Result<PathBuf> {
    let text = read_text(&args.text)?;
    let records = read_records(&args.records)?;
    let doc = annotate(&text, &records);
    log_unmatched(&doc);
    write_report(&doc, &args.metadata.into(), out)
}

pub fn export(args: ExportArgs, out: &OutputSettings) -> Result<Vec<PathBuf>> {
    let text = read_text(&args.text)?;
    let records = parse_all(read_records(&args.records)?);
    info!("Exporting {} records", records.len());

    let meta: PaperMetadata = args.metadata.into();
    export_records(&records, &text, &meta, out, args.per_record)
}

pub async fn extract<S: AnnotationService>(service: S, args: ExtractArgs) -> Result<String> {
    let pdf = std::fs::read(&args.pdf).with_context(|| format!("reading {}", args.pdf.display()))?;
    let file_name = args
        .pdf
        .file_name()
        .map(|n| n.to_string_lossy().into_owned())
        .unwrap_or_else(|| "upload.pdf".to_string());

    let meta = PaperMetadata { isoform: args.isoform, ..Default::default() };
    let mut session = Session::new(service, meta);
    session.select_model(args.model);
    session.load_model().await?;
    Ok(session.smart_extract(pdf, &file_name).await?.to_string())
}

pub async fn pubmed<S: AnnotationService>(service: S, query: &str) -> Result<String> {
    let mut session = Session::new(service, PaperMetadata::default());
    let search = session.pubmed_search(query).await?;
    info!(
        "Found {} articles, fetched {} ({} failed)",
        search.result.total_found,
        search.result.article_count,
        search.result.errors.len()
    );
    Ok(session.text_input)
}
