use anyhow::Result;
use clap::{Args, Parser, Subcommand};
use sentilit_acquire::{output::write_catalog, select_authors, Fetcher, DEFAULT_MAX_BOOKS};
use sentilit_label::{GeminiClient, GeminiConfig, Labeler};
use sentilit_model::{Catalog, CATALOG_FILE};
use std::path::PathBuf;

mod pipeline;

#[derive(Parser)]
#[command(name = "sentilit")]
#[command(about = "Emotion analysis of classic books: scrape, label, chart")]
#[command(version)]
struct Cli {
    /// Log level: error, warn, info, debug, trace
    #[arg(long, global = true, default_value = "info", value_enum)]
    log_level: LogLevel,

    /// Use UTC timestamps instead of local time
    #[arg(long, global = true)]
    utc: bool,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Clone, clap::ValueEnum)]
enum LogLevel {
    Error,
    Warn,
    Info,
    Debug,
    Trace,
}

#[derive(Subcommand)]
enum Commands {
    /// Scrape, label and report in one pass
    Run {
        #[command(flatten)]
        scrape: ScrapeArgs,
    },

    /// Scrape listing pages into an unlabeled catalog
    Scrape {
        #[command(flatten)]
        scrape: ScrapeArgs,
    },

    /// Label the books of an existing catalog that have no emotions yet
    Label {
        /// Catalog JSON to label (default: <output-dir>/livros_analisados.json)
        #[arg(short, long)]
        input: Option<PathBuf>,

        /// Directory the labeled catalog is written to
        #[arg(short = 'O', long, default_value = ".")]
        output_dir: PathBuf,
    },

    /// Render charts and the insights report from a catalog
    Report {
        /// Catalog JSON to report on (default: <output-dir>/livros_analisados.json)
        #[arg(short, long)]
        input: Option<PathBuf>,

        /// Directory for the charts and the insights file
        #[arg(short = 'O', long, default_value = ".")]
        output_dir: PathBuf,
    },
}

#[derive(Args)]
struct ScrapeArgs {
    /// Output directory for the catalog and the charts
    #[arg(short = 'O', long, default_value = ".")]
    output_dir: PathBuf,

    /// Books kept per author
    #[arg(short, long, default_value_t = DEFAULT_MAX_BOOKS)]
    max_books: usize,

    /// Restrict the run to these authors (repeatable, e.g. --author "Edgar Allan Poe")
    #[arg(short, long)]
    author: Vec<String>,

    /// Save the raw HTML of each listing page to this directory
    #[arg(long)]
    cache_html: Option<PathBuf>,
}

impl ScrapeArgs {
    fn fetcher(&self) -> Result<Fetcher> {
        let fetcher = Fetcher::new()?;
        Ok(match &self.cache_html {
            Some(dir) => fetcher.with_html_cache(dir),
            None => fetcher,
        })
    }
}

fn labeler_from_env() -> Result<Labeler<GeminiClient>> {
    let config = GeminiConfig::from_env()?;
    tracing::debug!(config = ?config, "Loaded API configuration");
    Ok(Labeler::new(GeminiClient::new(&config)?))
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();

    // Map log level, suppressing noisy HTML-parsing crates at debug/trace
    let level = match cli.log_level {
        LogLevel::Error => "error",
        LogLevel::Warn  => "warn",
        LogLevel::Info  => "info",
        LogLevel::Debug => "debug,selectors=warn,html5ever=warn",
        LogLevel::Trace => "trace,selectors=warn,html5ever=warn",
    };
    let env_filter = tracing_subscriber::EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new(level));

    // Timestamp format: 2026-02-14 19:44:09.123 -08:00
    let time_format = "%Y-%m-%d %H:%M:%S%.3f %:z";

    if cli.utc {
        tracing_subscriber::fmt()
            .with_env_filter(env_filter)
            .with_timer(tracing_subscriber::fmt::time::ChronoUtc::new(time_format.to_string()))
            .init();
    } else {
        tracing_subscriber::fmt()
            .with_env_filter(env_filter)
            .with_timer(tracing_subscriber::fmt::time::ChronoLocal::new(time_format.to_string()))
            .init();
    }

    match cli.command {
        Commands::Run { scrape } => {
            let authors = select_authors(&scrape.author)?;
            let labeler = pipeline::optional_labeler(labeler_from_env());
            let fetcher = scrape.fetcher()?;
            tracing::info!(authors = authors.len(), max_books = scrape.max_books, "Starting full run");

            let books = pipeline::collect_books(
                &authors,
                |a| fetcher.fetch_author(a.name, a.url, scrape.max_books),
                labeler.as_ref(),
                pipeline::AUTHOR_PAUSE,
            )
            .await;

            let catalog = Catalog::new(books);
            write_catalog(&catalog, &scrape.output_dir)?;
            let written = sentilit_report::generate_report(&catalog.books, &scrape.output_dir)?;
            tracing::info!(
                books = catalog.books.len(),
                labeled = catalog.labeled_count(),
                artifacts = written.len(),
                "Analysis complete"
            );
        }
        Commands::Scrape { scrape } => {
            let authors = select_authors(&scrape.author)?;
            let fetcher = scrape.fetcher()?;
            tracing::info!(authors = authors.len(), max_books = scrape.max_books, "Scraping listing pages");

            let books = pipeline::collect_books(
                &authors,
                |a| fetcher.fetch_author(a.name, a.url, scrape.max_books),
                None::<&Labeler<GeminiClient>>,
                pipeline::AUTHOR_PAUSE,
            )
            .await;
            write_catalog(&Catalog::new(books), &scrape.output_dir)?;
        }
        Commands::Label { input, output_dir } => {
            let input = input.unwrap_or_else(|| output_dir.join(CATALOG_FILE));
            let mut catalog = pipeline::load_catalog(&input)?;
            let labeler = labeler_from_env()?;

            let stats = labeler.label_books(&mut catalog.books).await;
            write_catalog(&catalog, &output_dir)?;
            if stats.failed > 0 {
                tracing::warn!(failed = stats.failed, "Some books are still unlabeled; rerun to retry them");
            }
        }
        Commands::Report { input, output_dir } => {
            let input = input.unwrap_or_else(|| output_dir.join(CATALOG_FILE));
            let catalog = pipeline::load_catalog(&input)?;
            let written = sentilit_report::generate_report(&catalog.books, &output_dir)?;
            tracing::info!(artifacts = written.len(), path = %output_dir.display(), "Report complete");
        }
    }

    Ok(())
}
