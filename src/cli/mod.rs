//! Command-line interface for the export engine
//!
//! This module handles:
//! - Command-line argument parsing using clap
//! - Configuration loading and validation
//! - Output path selection

use clap::Parser;
use std::path::{Path, PathBuf};

use crate::config::Config;
use crate::error::Result;
use crate::request::{ExportFormat, attachment_filename};

/// POI export engine - stream MongoDB records as waypoint files
#[derive(Parser, Debug)]
#[command(
    name = "poi-export",
    version,
    about = "Paginated streaming POI export for MongoDB",
    long_about = "Streams a MongoDB result set into a waypoint file (gpx, kml, loc, \
xml, csv, asc, json), fetching bounded pages so memory stays flat regardless of \
result size."
)]
pub struct CliArgs {
    /// MongoDB connection URI
    ///
    /// Format: mongodb://[username:password@]host[:port][/database][?options]
    #[arg(value_name = "URI")]
    pub uri: Option<String>,

    /// Export format (gpx, asc, kml, loc, xml, csv, json)
    #[arg(short, long, value_name = "FORMAT")]
    pub format: String,

    /// Query envelope as JSON: {"query": .., "sort": .., "projection": ..}
    #[arg(short, long, value_name = "JSON", default_value = "{}")]
    pub query: String,

    /// Custom icon map as JSON: {"gpx": url, "kml": url}
    #[arg(long, value_name = "JSON")]
    pub custom_icon: Option<String>,

    /// Collection to export (defaults to the configured collection)
    #[arg(short, long, value_name = "NAME")]
    pub collection: Option<String>,

    /// Output file path (defaults to POI-EXPORT_<date>.<ext>)
    #[arg(short, long, value_name = "PATH")]
    pub output: Option<String>,

    /// Override the internal page size
    #[arg(long, value_name = "N")]
    pub page_size: Option<u64>,

    /// Configuration file path
    #[arg(long, value_name = "PATH")]
    pub config: Option<PathBuf>,

    /// Enable verbose logging (debug level)
    #[arg(short, long)]
    pub verbose: bool,

    /// Enable very verbose logging (trace level)
    #[arg(long)]
    pub very_verbose: bool,

    /// Suppress banner and progress output
    #[arg(long)]
    pub quiet: bool,
}

/// CLI interface combining parsed arguments and loaded configuration
pub struct CliInterface {
    args: CliArgs,
    config: Config,
}

impl CliInterface {
    /// Parse arguments and load configuration
    ///
    /// # Returns
    /// * `Result<Self>` - Interface or a config error
    pub fn new() -> Result<Self> {
        let args = CliArgs::parse();
        Self::with_args(args)
    }

    /// Build an interface from pre-parsed arguments
    pub fn with_args(args: CliArgs) -> Result<Self> {
        let config = match args.config {
            Some(ref path) => Config::from_file(path)?,
            None => Config::default(),
        };

        Ok(Self { args, config })
    }

    /// Parsed command-line arguments
    pub fn args(&self) -> &CliArgs {
        &self.args
    }

    /// Loaded configuration
    pub fn config(&self) -> &Config {
        &self.config
    }

    /// Connection URI: command line wins over configuration
    pub fn get_connection_uri(&self) -> String {
        self.args
            .uri
            .clone()
            .unwrap_or_else(|| self.config.connection.default_uri.clone())
    }

    /// Collection name: command line wins over configuration
    pub fn get_collection(&self) -> String {
        self.args
            .collection
            .clone()
            .unwrap_or_else(|| self.config.export.collection.clone())
    }

    /// Internal page size: command line wins over configuration
    pub fn get_page_size(&self) -> u64 {
        self.args.page_size.unwrap_or(self.config.export.page_size)
    }

    /// Output path: explicit path, or the generated download filename
    pub fn output_path(&self, format: ExportFormat) -> String {
        match self.args.output {
            Some(ref path) => path.clone(),
            None => attachment_filename(
                &self.config.export.filename_prefix,
                format,
                chrono::Local::now().date_naive(),
            ),
        }
    }

    /// Print startup banner unless in quiet mode
    pub fn print_banner(&self) {
        if !self.args.quiet {
            println!("poi-export v{}", env!("CARGO_PKG_VERSION"));
        }
    }

    /// Whether to display the progress spinner
    pub fn progress_enabled(&self) -> bool {
        self.config.export.progress_bar && !self.args.quiet
    }

    /// Configuration file path, when one was given
    pub fn config_path(&self) -> Option<&Path> {
        self.args.config.as_deref()
    }
}
