//! POI Export Engine Library
//!
//! This library provides the core functionality for the POI export engine, a
//! paginated streaming exporter that turns MongoDB result sets into waypoint
//! files. It can be used as a standalone library to embed exports in other
//! tools and services.
//!
//! # Modules
//!
//! - `auth`: Authorization boundary contract
//! - `cli`: Command-line interface and argument parsing
//! - `config`: Configuration management
//! - `connection`: MongoDB connection management
//! - `encode`: Wire-format encoders (gpx, kml, loc, xml, csv, asc)
//! - `error`: Error types and handling
//! - `export`: Export coordinator, admission gate, sinks and progress
//! - `fetch`: Paged query contract and MongoDB fetcher
//! - `request`: Export request decoding and gateway interface
//! - `waypoint`: Validated records and the record validator
//!
//! # Example
//!
//! ```no_run
//! use poi_export::export::{ExportCoordinator, ExportGate, MemorySink};
//! use poi_export::fetch::MongoPageFetcher;
//! use poi_export::request::ExportRequest;
//!
//! # async fn example(collection: mongodb::Collection<bson::Document>) -> poi_export::error::Result<()> {
//! let request = ExportRequest::from_parts(Some("gpx"), Some("{}"), None)?;
//! let fetcher = Box::new(MongoPageFetcher::new(collection, &request));
//! let sink = Box::new(MemorySink::new());
//!
//! let mut coordinator =
//!     ExportCoordinator::new(&request, fetcher, sink, ExportGate::new());
//! let outcome = coordinator.execute().await?;
//! println!("Exported {} waypoints", outcome.waypoints_exported);
//! # Ok(())
//! # }
//! ```

pub mod auth;
pub mod cli;
pub mod config;
pub mod connection;
pub mod encode;
pub mod error;
pub mod export;
pub mod fetch;
pub mod request;
pub mod waypoint;

// Re-export commonly used types
pub use config::Config;
pub use connection::ConnectionManager;
pub use error::{ExportError, Result};
pub use export::{ExportCoordinator, ExportGate, ExportOutcome, ExportSink};
pub use fetch::{MongoPageFetcher, PageFetcher};
pub use request::{ExportFormat, ExportRequest};
pub use waypoint::Waypoint;

/// Library version
pub const VERSION: &str = env!("CARGO_PKG_VERSION");

/// Get library version string
///
/// # Returns
/// * `&str` - Version string
pub fn version() -> &'static str {
    VERSION
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_version() {
        assert!(!version().is_empty());
    }
}
