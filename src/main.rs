//! Listing-Harvest main entry point
//!
//! This is the command-line interface for the Listing-Harvest scraper.

use clap::{Parser, Subcommand};
use listing_harvest::config::{load_config_with_hash, Config};
use listing_harvest::crawler::{Coordinator, TracingProgress};
use listing_harvest::output::{print_table_stats, table_path, write_table, Table, TableStats};
use listing_harvest::Category;
use std::path::PathBuf;
use tokio_util::sync::CancellationToken;
use tracing_subscriber::EnvFilter;

/// Listing-Harvest: a paginated classifieds scraper
///
/// Collects vehicle, motorcycle and rental listings page by page and exports
/// them as raw or cleaned tables.
#[derive(Parser, Debug)]
#[command(name = "listing-harvest")]
#[command(version)]
#[command(about = "A paginated classifieds scraper", long_about = None)]
struct Cli {
    /// Path to TOML configuration file (defaults apply when omitted)
    #[arg(short, long, value_name = "CONFIG", global = true)]
    config: Option<PathBuf>,

    /// Increase logging verbosity (-v, -vv, -vvv)
    #[arg(short, long, action = clap::ArgAction::Count, global = true)]
    verbose: u8,

    /// Suppress non-error output
    #[arg(short, long, conflicts_with = "verbose", global = true)]
    quiet: bool,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Scrape listings and export them
    Scrape {
        /// Category to scrape: vehicles, motorcycles, rentals or all
        #[arg(value_name = "CATEGORY")]
        category: String,

        /// Number of pages to scrape (detected from the paginator when omitted)
        #[arg(short, long)]
        pages: Option<u32>,

        /// Also export the cleaned table
        #[arg(long)]
        clean: bool,

        /// Write both tables to this directory instead of the configured ones
        #[arg(short, long, value_name = "DIR")]
        output_dir: Option<PathBuf>,
    },

    /// Detect the number of index pages and exit
    Pages {
        /// Category to inspect: vehicles, motorcycles, rentals or all
        #[arg(value_name = "CATEGORY")]
        category: String,
    },
}

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    let cli = Cli::parse();

    setup_logging(cli.verbose, cli.quiet);

    let config = match &cli.config {
        Some(path) => {
            tracing::info!("Loading configuration from: {}", path.display());
            match load_config_with_hash(path) {
                Ok((cfg, hash)) => {
                    tracing::info!("Configuration loaded successfully (hash: {})", hash);
                    cfg
                }
                Err(e) => {
                    tracing::error!("Failed to load configuration: {}", e);
                    return Err(e.into());
                }
            }
        }
        None => {
            tracing::debug!("No configuration file given, using defaults");
            Config::default()
        }
    };

    match cli.command {
        Command::Scrape {
            category,
            pages,
            clean,
            output_dir,
        } => {
            let categories = parse_categories(&category)?;
            handle_scrape(config, &categories, pages, clean, output_dir).await?;
        }
        Command::Pages { category } => {
            let categories = parse_categories(&category)?;
            handle_pages(&config, &categories).await?;
        }
    }

    Ok(())
}

/// Sets up the logging/tracing subscriber based on verbosity level
fn setup_logging(verbose: u8, quiet: bool) {
    let filter = if quiet {
        EnvFilter::new("error")
    } else {
        match verbose {
            0 => EnvFilter::new("listing_harvest=info,warn"),
            1 => EnvFilter::new("listing_harvest=debug,info"),
            2 => EnvFilter::new("listing_harvest=trace,debug"),
            _ => EnvFilter::new("trace"),
        }
    };

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(false)
        .with_thread_ids(false)
        .with_file(false)
        .init();
}

/// Parses a category argument; `all` selects every category
fn parse_categories(arg: &str) -> Result<Vec<Category>, String> {
    if arg.eq_ignore_ascii_case("all") {
        Ok(Category::all().to_vec())
    } else {
        arg.parse::<Category>().map(|category| vec![category])
    }
}

/// Handles the `pages` command: runs page discovery only
async fn handle_pages(
    config: &Config,
    categories: &[Category],
) -> Result<(), Box<dyn std::error::Error>> {
    let coordinator = Coordinator::new(&config.fetcher)?;

    for category in categories {
        let url = config.sources.url_for(*category);
        let pages = coordinator.discover_pages(url).await;
        println!("{}: {} pages ({})", category, pages, url);
    }

    Ok(())
}

/// Handles the `scrape` command
async fn handle_scrape(
    mut config: Config,
    categories: &[Category],
    pages: Option<u32>,
    clean: bool,
    output_dir: Option<PathBuf>,
) -> Result<(), Box<dyn std::error::Error>> {
    if let Some(dir) = output_dir {
        config.output.raw_dir = dir.clone();
        config.output.cleaned_dir = dir;
    }

    // Ctrl-C stops before the next page; what was gathered is still written
    let cancel = CancellationToken::new();
    {
        let cancel = cancel.clone();
        tokio::spawn(async move {
            if tokio::signal::ctrl_c().await.is_ok() {
                tracing::warn!("Interrupt received, stopping after the current page");
                cancel.cancel();
            }
        });
    }

    let coordinator = Coordinator::new(&config.fetcher)?.with_progress(TracingProgress);

    for category in categories {
        if cancel.is_cancelled() {
            break;
        }

        let base_url = config.sources.url_for(*category);
        let report = coordinator.run(*category, base_url, pages, &cancel).await;
        tracing::info!(
            "Scrape of {} finished in {}s ({} records)",
            category,
            report.duration().num_seconds(),
            report.records.len()
        );

        if !report.is_complete() {
            tracing::warn!(
                "Scrape of {} stopped early: {} ({} of {} pages)",
                category,
                report.stop_reason,
                report.pages_scraped,
                report.pages_requested
            );
        }

        let raw = Table::raw(*category, &report.records);
        let raw_path = table_path(&config.output, *category, false);
        write_table(&raw_path, &raw, config.output.delimiter)?;
        print_table_stats(
            &format!("{} (raw) -> {}", category, raw_path.display()),
            &TableStats::compute(&raw),
        );

        if clean {
            let cleaned = Table::cleaned(*category, &report.cleaned());
            let cleaned_path = table_path(&config.output, *category, true);
            write_table(&cleaned_path, &cleaned, config.output.delimiter)?;
            print_table_stats(
                &format!("{} (cleaned) -> {}", category, cleaned_path.display()),
                &TableStats::compute(&cleaned),
            );
        }

        if report.skipped_listings > 0 {
            println!(
                "{} listing(s) skipped on {}\n",
                report.skipped_listings, category
            );
        }
    }

    Ok(())
}
