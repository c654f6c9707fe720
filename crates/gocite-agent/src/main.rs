//! gocite: GO-term annotation of paper text with citation highlighting.
//! Entry point for the command-line binary.

mod commands;
mod report;
mod session;

use std::path::PathBuf;
use std::time::Duration;

use clap::{Parser, Subcommand};
use gocite_client::{default_prompt, HttpAnnotationService};
use gocite_config::GociteConfig;
use tracing::{debug, info};
use tracing_subscriber::EnvFilter;

use commands::{AnnotateArgs, ExportArgs, ExtractArgs, HighlightArgs, MetadataArgs, OutputSettings};

/// GO-term annotation with citation highlighting
#[derive(Parser)]
#[command(name = "gocite", author, version)]
#[command(propagate_version = true)]
struct Cli {
    /// Annotation service URL (overrides [service].base_url)
    #[arg(long, global = true, value_name = "URL")]
    base_url: Option<String>,

    /// Output directory (overrides [export].output_dir)
    #[arg(long, global = true, value_name = "DIR")]
    out_dir: Option<PathBuf>,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand)]
enum Command {
    /// List the models the service can load
    Models,
    /// Load a model, annotate a text file, write the report and CSV
    Annotate(AnnotateArgs),
    /// Highlight a text file from saved model records (offline)
    Highlight(HighlightArgs),
    /// Export saved model records to CSV (offline)
    Export(ExportArgs),
    /// Extract isoform-relevant text from a PDF
    Extract(ExtractArgs),
    /// Search PubMed and print the fetched abstracts
    Pubmed {
        /// Search terms
        #[arg(required = true)]
        query: Vec<String>,
    },
    /// Unload whatever model the service has loaded
    Unload,
    /// Print the built-in annotation prompt for a paper
    Prompt(MetadataArgs),
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();
    let config = GociteConfig::load();

    let default_filter = config
        .as_ref()
        .map(|c| c.logging.filter.clone())
        .unwrap_or_else(|_| GociteConfig::default().logging.filter);
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_filter)),
        )
        .init();

    let config = config?;
    debug!("Version: {}", env!("CARGO_PKG_VERSION"));

    let base_url = cli.base_url.unwrap_or(config.service.base_url);
    let service = HttpAnnotationService::with_timeout(
        base_url.clone(),
        Duration::from_secs(config.service.timeout_secs),
    )?;
    let out = OutputSettings {
        dir: cli.out_dir.unwrap_or(config.export.output_dir),
        file_stem: config.export.file_stem,
        quoting: config.export.quoting,
    };

    match cli.command {
        Command::Models => commands::models(&service).await?,
        Command::Unload => commands::unload(&service).await?,
        Command::Annotate(args) => {
            info!("Annotating {} via {}", args.text.display(), base_url);
            let written = commands::annotate_text(service, args, &out).await?;
            for path in written {
                println!("{}", path.display());
            }
        }
        Command::Highlight(args) => {
            let path = commands::highlight(args, &out)?;
            println!("{}", path.display());
        }
        Command::Export(args) => {
            for path in commands::export(args, &out)? {
                println!("{}", path.display());
            }
        }
        Command::Extract(args) => {
            let text = commands::extract(service, args).await?;
            println!("{}", text);
        }
        Command::Prompt(meta) => println!("{}", default_prompt(&meta.into())),
        Command::Pubmed { query } => {
            let text = commands::pubmed(service, &query.join(" ")).await?;
            println!("{}", text);
        }
    }

    Ok(())
}
