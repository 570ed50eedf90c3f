use anyhow::{Context, Result};
use clap::{Parser, Subcommand};
use std::path::PathBuf;
use std::process::ExitCode;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use firechair::config::Config;
use firechair::crawler::CrawlPipeline;
use firechair::i18n::{self, t};
use firechair::models::{CrawlEvent, CrawlReport, Listing};

// The binary carries its own translation table; the locale is process-wide
rust_i18n::i18n!("locales", fallback = "en");

#[derive(Parser)]
#[command(
    name = "firechair",
    version,
    about = "Motorcycle classifieds crawler with price and mileage extraction",
    long_about = None
)]
struct Cli {
    #[command(subcommand)]
    command: Commands,

    /// Enable verbose logging
    #[arg(short, long, global = true)]
    verbose: bool,

    /// Log format (text, json); overrides the configured format
    #[arg(long, global = true)]
    log_format: Option<String>,

    /// Output language (en, de); defaults to FIRECHAIR_LANG
    #[arg(long, global = true)]
    lang: Option<String>,
}

#[derive(Subcommand)]
enum Commands {
    /// Crawl all listings for a motorcycle model
    Crawl {
        /// Model to search for, e.g. "honda cbr 600f"
        #[arg(required = true, num_args = 1..)]
        model: Vec<String>,

        /// TOML configuration file
        #[arg(short, long)]
        config: Option<PathBuf>,

        /// Directory for the CSV file
        #[arg(short, long)]
        output_dir: Option<PathBuf>,

        /// SQLite database path
        #[arg(long)]
        db: Option<PathBuf>,

        /// Do not write the CSV file
        #[arg(long, default_value = "false")]
        no_csv: bool,

        /// Do not write to the database
        #[arg(long, default_value = "false")]
        no_db: bool,

        /// Minimum delay before every detail page request in milliseconds
        #[arg(long)]
        delay_ms: Option<u64>,

        /// Print the crawl report as JSON
        #[arg(long, default_value = "false")]
        json: bool,
    },
}

#[tokio::main]
async fn main() -> Result<ExitCode> {
    let cli = Cli::parse();

    match cli.lang.as_deref() {
        Some(lang) => i18n::set_locale(lang),
        None => i18n::init_from_env(),
    }

    match cli.command {
        Commands::Crawl {
            model,
            config,
            output_dir,
            db,
            no_csv,
            no_db,
            delay_ms,
            json,
        } => {
            let mut settings = match config {
                Some(path) => Config::from_file(&path)?,
                None => Config::from_env()?,
            };

            if let Some(dir) = output_dir {
                settings.storage.output_dir = dir;
            }
            if let Some(path) = db {
                settings.storage.sqlite_path = path;
            }
            if no_csv {
                settings.storage.write_csv = false;
            }
            if no_db {
                settings.storage.write_database = false;
            }
            if let Some(ms) = delay_ms {
                settings.crawler.request_delay_ms = ms;
            }
            if let Some(format) = cli.log_format {
                settings.logging.format = format;
            }
            settings.validate().context("Invalid configuration")?;

            // Initialize tracing/logging
            setup_tracing(
                &settings.logging.format,
                &log_filter(&settings.logging.level, cli.verbose),
            );

            tracing::info!(locale = i18n::current_locale(), "firechair starting");

            let model = model.join(" ");
            tracing::info!(
                model = %model,
                output_dir = %settings.storage.output_dir.display(),
                json = %json,
                "Starting crawl command"
            );
            crawl(settings, model, json).await
        }
    }
}

/// Filter directive for the configured level; `--verbose` forces debug
fn log_filter(level: &str, verbose: bool) -> String {
    if verbose {
        String::from("firechair=debug,info")
    } else {
        format!("firechair={level},warn")
    }
}

fn setup_tracing(format: &str, filter: &str) {
    let env_filter = tracing_subscriber::EnvFilter::new(filter);

    match format {
        "json" => {
            tracing_subscriber::registry()
                .with(env_filter)
                .with(tracing_subscriber::fmt::layer().json().with_writer(std::io::stderr))
                .init();
        }
        _ => {
            tracing_subscriber::registry()
                .with(env_filter)
                .with(tracing_subscriber::fmt::layer().pretty().with_writer(std::io::stderr))
                .init();
        }
    }
}

async fn crawl(config: Config, model: String, json: bool) -> Result<ExitCode> {
    let mut pipeline = CrawlPipeline::new(&config)?;
    let mut events = pipeline.subscribe();

    let printer = tokio::spawn(async move {
        while let Some(event) = events.recv().await {
            print_event(&event, json);
        }
    });

    let outcome = pipeline.run(&model).await;

    // Closing the channel lets the printer drain and stop
    drop(pipeline);
    printer.await.context("Progress printer failed")?;

    let Some(report) = completed_report(outcome) else {
        return Ok(ExitCode::FAILURE);
    };

    if json {
        println!("{}", serde_json::to_string_pretty(&report)?);
    } else {
        print_report(&report, config.storage.write_database);
    }

    tracing::info!("firechair completed successfully");
    Ok(ExitCode::SUCCESS)
}

/// The report of a finished run
///
/// A failed run already printed its `Failed` event, so the error is only
/// logged here.
fn completed_report(outcome: firechair::error::Result<CrawlReport>) -> Option<CrawlReport> {
    match outcome {
        Ok(report) => Some(report),
        Err(err) => {
            tracing::debug!(error = %err, "Crawl aborted");
            None
        }
    }
}

fn print_event(event: &CrawlEvent, json: bool) {
    if json {
        // Stdout carries only the report; failures still go to stderr
        if let CrawlEvent::Failed { message, .. } = event {
            eprintln!("{}", t!("crawl.failed", message = message));
        }
        return;
    }

    match event {
        CrawlEvent::Started { model, .. } => {
            println!("{}", t!("cli.crawl.starting", model = model));
        }
        CrawlEvent::PagesDiscovered { max_page } => {
            println!("{}", t!("cli.crawl.pages", count = max_page));
        }
        CrawlEvent::TotalKnown { total } => {
            println!("{}", t!("cli.crawl.total", total = total));
        }
        CrawlEvent::ListingProcessed {
            completed,
            total,
            url,
        } => {
            println!(
                "{}",
                t!(
                    "cli.crawl.progress",
                    completed = completed,
                    total = total,
                    url = url
                )
            );
        }
        CrawlEvent::Finished { message, .. } => {
            println!("{message}");
        }
        CrawlEvent::Failed { message, .. } => {
            eprintln!("{}", t!("crawl.failed", message = message));
        }
    }
}

fn print_report(report: &CrawlReport, stored: bool) {
    if let Some(path) = &report.persisted.csv_path {
        println!("{}", t!("cli.crawl.saved", path = path.display()));
    }
    if stored {
        println!(
            "{}",
            t!(
                "cli.crawl.stored",
                inserted = report.persisted.inserted,
                ignored = report.persisted.ignored
            )
        );
    }
    if report.is_partial() {
        println!("{}", t!("cli.crawl.failures", count = report.failures.len()));
    }

    // The finished event already reported an empty crawl
    let Some(summary) = report.result.summary() else {
        return;
    };

    println!();
    println!("{}", t!("cli.crawl.count", count = report.result.len()));
    println!("{}", t!("cli.summary.title"));
    println!("========================");
    print_listing(&t!("cli.summary.cheapest"), summary.cheapest);
    print_listing(&t!("cli.summary.lowest_mileage"), summary.lowest_mileage);
}

fn print_listing(heading: &str, listing: &Listing) {
    let missing = t!("cli.summary.missing");
    println!("{heading}:");
    println!(
        "  {}: {}",
        t!("cli.summary.price"),
        listing.price.as_deref().unwrap_or(&missing)
    );
    println!(
        "  {}: {}",
        t!("cli.summary.mileage"),
        listing.mileage.as_deref().unwrap_or(&missing)
    );
    println!("  {}: {}", t!("cli.summary.url"), listing.url);
}
