//! Hotel-Scout main entry point
//!
//! This is the command-line interface for the Hotel-Scout room crawler.

use chrono::Local;
use clap::Parser;
use hotel_scout::config::{load_config_with_hash, Config};
use hotel_scout::crawler::{Coordinator, CrawlSession};
use hotel_scout::export::{export_fragments, export_text};
use hotel_scout::ScoutError;
use std::path::{Path, PathBuf};
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;
use tracing_subscriber::EnvFilter;

/// Hotel-Scout: find and tabulate the rooms of a hotel website
///
/// Hotel-Scout visits a handful of pages starting from the given URL, lets
/// an inference service decide where the room listings are, and exports
/// every listing it finds as CSV.
#[derive(Parser, Debug)]
#[command(name = "hotel-scout")]
#[command(version)]
#[command(about = "A bounded hotel room crawler", long_about = None)]
struct Cli {
    /// Hotel website URL to start from
    #[arg(value_name = "URL")]
    url: Option<String>,

    /// Path to TOML configuration file
    #[arg(short, long, value_name = "FILE")]
    config: Option<PathBuf>,

    /// Directory for the CSV export (overrides the configuration)
    #[arg(short, long, value_name = "DIR")]
    output_dir: Option<PathBuf>,

    /// Increase logging verbosity (-v, -vv, -vvv)
    #[arg(short, long, action = clap::ArgAction::Count)]
    verbose: u8,

    /// Suppress non-error output
    #[arg(short, long, conflicts_with = "verbose")]
    quiet: bool,

    /// Print the crawl session as JSON instead of the plain log
    #[arg(long)]
    json: bool,

    /// Validate config and show what would be crawled without actually crawling
    #[arg(long, conflicts_with = "export")]
    dry_run: bool,

    /// Convert saved fragment text into a CSV export and exit
    #[arg(long, value_name = "FILE", conflicts_with_all = ["dry_run", "url"])]
    export: Option<PathBuf>,
}

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    let cli = Cli::parse();

    setup_logging(cli.verbose, cli.quiet);

    let mut config = match &cli.config {
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

    if let Some(dir) = &cli.output_dir {
        config.output.directory = dir.display().to_string();
    }

    if cli.dry_run {
        handle_dry_run(&config, cli.url.as_deref());
    } else if let Some(path) = &cli.export {
        handle_export(&config, path)?;
    } else {
        handle_crawl(&config, cli.url.as_deref(), cli.json).await?;
    }

    Ok(())
}

/// Sets up the logging/tracing subscriber based on verbosity level
fn setup_logging(verbose: u8, quiet: bool) {
    let filter = if quiet {
        EnvFilter::new("error")
    } else {
        match verbose {
            0 => EnvFilter::new("hotel_scout=info,warn"),
            1 => EnvFilter::new("hotel_scout=debug,info"),
            2 => EnvFilter::new("hotel_scout=trace,debug"),
            _ => EnvFilter::new("trace"),
        }
    };

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(false)
        .with_thread_ids(false)
        .with_file(false)
        .with_writer(std::io::stderr)
        .init();
}

/// Handles the --dry-run mode: shows the effective configuration
fn handle_dry_run(config: &Config, url: Option<&str>) {
    println!("=== Hotel-Scout Dry Run ===\n");

    println!("Crawler Configuration:");
    println!("  Max pages: {}", config.crawler.max_pages);
    println!("  Request delay: {}ms", config.crawler.request_delay_ms);
    println!(
        "  Rate-limit cooldown: {}ms",
        config.crawler.rate_limit_cooldown_ms
    );
    println!("  Navigation links per page: {}", config.crawler.max_nav_links);
    println!("  Content ceiling: {} chars", config.crawler.max_content_chars);

    println!("\nUser Agent: {}", config.user_agent.header_value());

    println!("\nInference:");
    println!("  Endpoint: {}", config.inference.endpoint);
    println!("  Model: {}", config.inference.model);
    println!("  API key variable: {}", config.inference.api_key_env);
    println!(
        "  Schema: {} ({})",
        config.inference.schema,
        config.inference.schema.header_line()
    );

    println!("\nOutput directory: {}", config.output.directory);

    println!("\n✓ Configuration is valid");
    match url {
        Some(url) => println!("✓ Would start crawling at {}", url),
        None => println!("✗ No seed URL given"),
    }
}

/// Handles the --export mode: converts saved fragment text into a CSV file
fn handle_export(config: &Config, input: &Path) -> hotel_scout::Result<()> {
    let text = std::fs::read_to_string(input)?;
    let export = export_text(&text, Local::now().naive_local())?;
    let path = export.write_to(Path::new(&config.output.directory))?;

    println!("✓ Exported {} rows to: {}", export.row_count, path.display());
    Ok(())
}

/// Handles the main crawl operation
async fn handle_crawl(
    config: &Config,
    url: Option<&str>,
    json: bool,
) -> hotel_scout::Result<()> {
    let url = url.ok_or(ScoutError::MissingInput)?;

    let shutdown = Arc::new(AtomicBool::new(false));
    {
        let shutdown = shutdown.clone();
        tokio::spawn(async move {
            if tokio::signal::ctrl_c().await.is_ok() {
                tracing::warn!("Interrupt received, finishing current page");
                shutdown.store(true, Ordering::Release);
            }
        });
    }

    let coordinator = Coordinator::from_config(config)?.with_shutdown(shutdown);
    tracing::debug!(
        "Crawl settings: {} pages, {:?} between requests",
        coordinator.settings().max_pages,
        coordinator.settings().request_delay
    );

    let session = match coordinator.run(url).await {
        Ok(session) => session,
        Err(e) => {
            tracing::error!("Crawl failed: {}", e);
            return Err(e);
        }
    };

    if json {
        println!("{}", serde_json::to_string_pretty(&session)?);
    } else {
        print_session(&session);
    }

    if session.fragments.is_empty() {
        tracing::info!("No room data found, nothing to export");
    } else {
        let export = export_fragments(&session.fragments, Local::now().naive_local())?;
        let path = export.write_to(Path::new(&config.output.directory))?;
        tracing::info!("Exported {} rows to {}", export.row_count, path.display());
    }

    Ok(())
}

/// Prints the session log followed by a per-page summary
fn print_session(session: &CrawlSession) {
    for line in &session.logs {
        println!("{}", line);
    }

    println!("\n=== Crawl Summary ===");
    for page in &session.pages {
        println!("  {} → {}", page.url, page.outcome);
    }
    println!(
        "Pages visited: {}, fragments: {}, errors: {}, still queued: {}",
        session.pages_visited(),
        session.fragments.len(),
        session.error_count(),
        session.pending.len()
    );
}
