//! POI Export - Rust Edition
//!
//! A paginated streaming export engine for MongoDB point-of-interest data.
//! Streams a sorted result set into a waypoint file without ever holding
//! more than one page of records in memory.
//!
//! # Features
//!
//! - Seven waypoint formats (gpx, kml, loc, xml, csv, asc, json)
//! - Fixed-size page streaming with strict output ordering
//! - Single-flight admission (one export at a time)
//! - Cooperative cancellation on Ctrl+C
//! - Configuration management
//!
//! # Usage
//!
//! ```bash
//! poi-export mongodb://localhost:27017/geo --format gpx --query '{"query":{}}'
//! ```

use tokio_util::sync::CancellationToken;
use tracing::Level;

mod cli;
mod config;
mod connection;
mod encode;
mod error;
mod export;
mod fetch;
mod request;
mod waypoint;

use cli::CliInterface;
use connection::ConnectionManager;
use error::Result;
use export::{ExportCoordinator, ExportGate, FileSink, ProgressTracker};
use fetch::MongoPageFetcher;
use request::ExportRequest;

/// Application entry point
#[tokio::main]
async fn main() {
    // Initialize the application and handle any errors
    if let Err(e) = run().await {
        eprintln!("Error: {}", e);
        std::process::exit(1);
    }
}

/// Main application logic
///
/// This function orchestrates the application startup:
/// 1. Parse command-line arguments
/// 2. Load configuration
/// 3. Initialize logging
/// 4. Decode the export request and run it
///
/// # Returns
/// * `Result<()>` - Success or error
async fn run() -> Result<()> {
    // Parse command-line arguments and load configuration
    let cli = CliInterface::new()?;

    // Initialize logging based on verbosity
    initialize_logging(&cli);

    // Print banner if not in quiet mode
    cli.print_banner();

    // Decode the request the way a gateway would
    let request = ExportRequest::from_parts(
        Some(&cli.args().format),
        Some(&cli.args().query),
        cli.args().custom_icon.as_deref(),
    )?;

    run_export(&cli, request).await
}

/// Run one export session against a live connection
async fn run_export(cli: &CliInterface, request: ExportRequest) -> Result<()> {
    let mut conn_manager =
        ConnectionManager::new(cli.get_connection_uri(), cli.config().connection.clone());
    conn_manager.connect().await?;

    let collection = conn_manager.get_collection(&cli.get_collection())?;
    let fetcher = Box::new(MongoPageFetcher::new(collection, &request));

    let output_path = cli.output_path(request.format);
    let sink = Box::new(FileSink::create(&output_path).await?);

    // Wire Ctrl+C to the cancellation token sampled by the export loop
    let cancel_token = CancellationToken::new();
    let cancel_token_clone = cancel_token.clone();

    let ctrl_c_handle = tokio::spawn(async move {
        match tokio::signal::ctrl_c().await {
            Ok(()) => {
                cancel_token_clone.cancel();
            }
            Err(err) => {
                eprintln!("Failed to listen for Ctrl+C: {}", err);
            }
        }
    });

    let mut coordinator = ExportCoordinator::new(
        &request,
        fetcher,
        sink,
        ExportGate::new(),
    )
    .with_cancellation(cancel_token)
    .with_page_size(cli.get_page_size())
    .with_progress(ProgressTracker::new(cli.progress_enabled()));

    if let Some(timeout) = cli.config().page_timeout() {
        coordinator = coordinator.with_page_timeout(timeout);
    }

    let result = coordinator.execute().await;

    // Cancel the Ctrl+C listener now that the session ended
    ctrl_c_handle.abort();

    let outcome = result?;
    if outcome.aborted {
        println!(
            "Export aborted after {} waypoints; {} is truncated",
            outcome.waypoints_exported, output_path
        );
    } else {
        println!(
            "Exported {} waypoints to {} ({} bytes, {} pages, {} ms)",
            outcome.waypoints_exported,
            output_path,
            outcome.bytes_written,
            outcome.pages_fetched,
            outcome.elapsed_ms
        );
    }

    conn_manager.disconnect().await?;
    Ok(())
}

/// Initialize logging system based on verbosity level
///
/// # Arguments
/// * `cli` - CLI interface with verbosity settings
fn initialize_logging(cli: &CliInterface) {
    let level = if cli.args().very_verbose {
        Level::TRACE
    } else if cli.args().verbose {
        Level::DEBUG
    } else {
        cli.config().logging.level.to_tracing_level()
    };

    // Build subscriber with level filter
    let subscriber = tracing_subscriber::fmt()
        .with_max_level(level)
        .with_target(false);

    // Configure timestamps
    if cli.config().logging.timestamps {
        subscriber.init();
    } else {
        subscriber.without_time().init();
    }
}
