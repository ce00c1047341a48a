//! Export coordinator for orchestrating export operations
//!
//! This module owns the page-by-page export loop: admission through the
//! single-flight gate, the header/fragment/footer write sequence, cooperative
//! cancellation, and termination on exhaustion or failure.

use std::time::{Duration, Instant};

use tokio_util::sync::CancellationToken;
use tracing::{debug, info, warn};

use crate::error::{ExportError, Result, UpstreamError};
use crate::encode;
use crate::fetch::PageFetcher;
use crate::request::{CustomIcons, ExportFormat, ExportRequest};
use crate::waypoint::{self, Waypoint};

use super::gate::ExportGate;
use super::progress::ProgressTracker;
use super::sink::ExportSink;

/// Result of a terminated export session
#[derive(Debug)]
pub struct ExportOutcome {
    /// Number of waypoints written
    pub waypoints_exported: u64,
    /// Number of pages fetched from the data source
    pub pages_fetched: u64,
    /// Bytes accepted by the sink
    pub bytes_written: u64,
    /// Time taken for the export
    pub elapsed_ms: u64,
    /// Whether the session ended early on client disconnect
    pub aborted: bool,
}

/// Coordinator for export operations
///
/// Drives one export session: fetch a bounded page, validate it, encode and
/// write each waypoint in order, repeat until the data source returns a
/// short page. Pages are processed strictly in order - output order matches
/// the requested sort order minus dropped records.
pub struct ExportCoordinator {
    /// Output format
    format: ExportFormat,
    /// Per-format icon overrides
    icons: CustomIcons,
    /// Paged query over the data source
    fetcher: Box<dyn PageFetcher>,
    /// Output sink
    sink: Box<dyn ExportSink>,
    /// Single-flight admission gate
    gate: ExportGate,
    /// Progress tracker for user feedback
    tracker: ProgressTracker,
    /// Cancellation token latched on client disconnect
    cancel_token: Option<CancellationToken>,
    /// Records per page
    page_size: u64,
    /// Optional bound on a single page fetch
    page_timeout: Option<Duration>,
}

impl ExportCoordinator {
    /// Create a new export coordinator
    ///
    /// # Arguments
    /// * `request` - Validated export request (format, icon overrides)
    /// * `fetcher` - Paged query bound to the request's filter and sort
    /// * `sink` - Output sink
    /// * `gate` - Single-flight gate shared by this engine instance
    pub fn new(
        request: &ExportRequest,
        fetcher: Box<dyn PageFetcher>,
        sink: Box<dyn ExportSink>,
        gate: ExportGate,
    ) -> Self {
        Self {
            format: request.format,
            icons: request.custom_icons.clone(),
            fetcher,
            sink,
            gate,
            tracker: ProgressTracker::new(false),
            cancel_token: None,
            page_size: 100,
            page_timeout: None,
        }
    }

    /// Set cancellation token for this export operation
    pub fn with_cancellation(mut self, token: CancellationToken) -> Self {
        self.cancel_token = Some(token);
        self
    }

    /// Override the internal page size
    pub fn with_page_size(mut self, page_size: u64) -> Self {
        self.page_size = page_size.max(1);
        self
    }

    /// Bound each page fetch by a timeout
    pub fn with_page_timeout(mut self, timeout: Duration) -> Self {
        self.page_timeout = Some(timeout);
        self
    }

    /// Replace the progress tracker
    pub fn with_progress(mut self, tracker: ProgressTracker) -> Self {
        self.tracker = tracker;
        self
    }

    /// Execute the export operation
    ///
    /// This is the main entry point that drives the entire session:
    /// 1. Claim the single-flight gate (fail with `Busy` if held)
    /// 2. Write the format's file header
    /// 3. Fetch, validate, encode and write pages in order
    /// 4. Terminate on a short page, cancellation or failure
    /// 5. Release the gate on every exit path
    ///
    /// # Returns
    /// * `Result<ExportOutcome>` - Session statistics or error
    pub async fn execute(&mut self) -> Result<ExportOutcome> {
        // Admission: nothing is written when the gate is held elsewhere
        let _permit = self.gate.try_acquire().ok_or(ExportError::Busy)?;

        let start_time = Instant::now();
        info!("Starting {} export", self.format);

        let outcome = if self.format.is_streaming() {
            self.run_streaming(start_time).await
        } else {
            self.run_buffered(start_time).await
        };

        self.tracker.finish();

        match &outcome {
            Ok(result) if result.aborted => {
                info!("Export aborted by client after {} pages", result.pages_fetched)
            }
            Ok(result) => info!(
                "Export completed: {} waypoints, {} bytes, {} ms",
                result.waypoints_exported, result.bytes_written, result.elapsed_ms
            ),
            Err(e) => warn!("Export failed mid-session: {e}"),
        }

        outcome
        // _permit drops here: the gate reopens on success, abort and error alike
    }

    /// Streamed formats: header, per-waypoint fragments, footer.
    async fn run_streaming(&mut self, start_time: Instant) -> Result<ExportOutcome> {
        let header = encode::file_header(self.format, &self.icons);
        self.sink.write_fragment(&header).await?;

        let mut page_index: u64 = 0;
        let mut exported: u64 = 0;

        loop {
            // Disconnect is sampled once per iteration; the client is gone,
            // so no footer and no further fetches
            if self.is_cancelled() {
                self.sink.abort().await?;
                return Ok(self.outcome(exported, page_index, start_time, true));
            }

            let raw = self.fetch_page(page_index).await?;
            let raw_count = raw.len() as u64;
            debug!("Fetched page {page_index} ({raw_count} raw records)");

            for wp in waypoint::validate(&raw) {
                let fragment = encode::waypoint_fragment(self.format, &wp, &self.icons);
                self.sink.write_fragment(&fragment).await?;
                exported += 1;
            }
            self.tracker.update(exported);

            // A short page means the data source is exhausted
            if raw_count < self.page_size {
                break;
            }
            page_index += 1;
        }

        let footer = encode::file_footer(self.format);
        self.sink.write_fragment(&footer).await?;
        self.sink.finish().await?;

        Ok(self.outcome(exported, page_index + 1, start_time, false))
    }

    /// JSON: same pagination loop, but the validated list is serialized as
    /// one structured document at the end instead of streamed fragments.
    async fn run_buffered(&mut self, start_time: Instant) -> Result<ExportOutcome> {
        let mut collected: Vec<Waypoint> = Vec::new();
        let mut page_index: u64 = 0;

        loop {
            if self.is_cancelled() {
                self.sink.abort().await?;
                return Ok(self.outcome(collected.len() as u64, page_index, start_time, true));
            }

            let raw = self.fetch_page(page_index).await?;
            let raw_count = raw.len() as u64;

            collected.extend(waypoint::validate(&raw));
            self.tracker.update(collected.len() as u64);

            if raw_count < self.page_size {
                break;
            }
            page_index += 1;
        }

        let body = serde_json::to_string(&collected)
            .map_err(|e| ExportError::Generic(format!("Failed to serialize export: {e}")))?;
        self.sink.write_fragment(&body).await?;
        self.sink.finish().await?;

        Ok(self.outcome(collected.len() as u64, page_index + 1, start_time, false))
    }

    /// Fetch one page, bounded by the configured timeout when set.
    async fn fetch_page(&self, page_index: u64) -> Result<Vec<bson::Document>> {
        let skip = self.page_size * page_index;
        let fetch = self.fetcher.fetch_page(skip, self.page_size);

        match self.page_timeout {
            Some(limit) => match tokio::time::timeout(limit, fetch).await {
                Ok(result) => result,
                Err(_) => Err(UpstreamError::PageTimeout(limit.as_secs()).into()),
            },
            None => fetch.await,
        }
    }

    fn is_cancelled(&self) -> bool {
        self.cancel_token
            .as_ref()
            .is_some_and(|token| token.is_cancelled())
    }

    fn outcome(
        &self,
        exported: u64,
        pages_fetched: u64,
        start_time: Instant,
        aborted: bool,
    ) -> ExportOutcome {
        ExportOutcome {
            waypoints_exported: exported,
            pages_fetched,
            bytes_written: self.sink.bytes_written(),
            elapsed_ms: start_time.elapsed().as_millis() as u64,
            aborted,
        }
    }
}
