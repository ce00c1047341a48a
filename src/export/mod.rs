//! Export module for streaming export operations
//!
//! This module provides the streaming export engine:
//! - Paginated streaming to avoid memory issues with large result sets
//! - Single-flight admission so only one export runs at a time
//! - Cooperative cancellation on client disconnect
//! - Progress tracking with real-time feedback
//!
//! # Architecture
//!
//! The export engine is built on three main components:
//!
//! 1. **ExportGate**: Single-flight admission with an RAII permit
//! 2. **ExportSink**: Write-append output with clean and abrupt termination
//! 3. **ProgressTracker**: Real-time progress feedback
//!
//! These are orchestrated by the **ExportCoordinator**, which owns the
//! page-by-page loop against a [`crate::fetch::PageFetcher`].
//!
//! # Example
//!
//! ```no_run
//! // General pattern for running an export (requires a MongoDB connection)
//! //
//! // let request = ExportRequest::from_parts(Some("gpx"), Some("{}"), None)?;
//! // let fetcher = Box::new(MongoPageFetcher::new(collection, &request));
//! // let sink = Box::new(FileSink::create("pois.gpx").await?);
//! //
//! // let mut coordinator = ExportCoordinator::new(&request, fetcher, sink, gate)
//! //     .with_cancellation(token);
//! // let outcome = coordinator.execute().await?;
//! ```

pub mod coordinator;
pub mod gate;
pub mod progress;
pub mod sink;

pub use coordinator::{ExportCoordinator, ExportOutcome};
pub use gate::{ExportGate, ExportPermit};
pub use progress::ProgressTracker;
pub use sink::{ExportSink, FileSink, MemorySink};
