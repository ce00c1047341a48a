//! Output sinks for export operations
//!
//! A sink is a write-append destination for serialized fragments with two
//! ways to end: `finish` for clean completion and `abort` for early
//! termination (client disconnect, upstream failure). An aborted document
//! stays truncated on purpose - the missing footer is the client-visible
//! signal that the export did not complete.

use std::path::Path;

use async_trait::async_trait;
use tokio::fs::File;
use tokio::io::{AsyncWriteExt, BufWriter};
use tracing::debug;

use crate::error::Result;

/// Trait for writing serialized export output
#[async_trait]
pub trait ExportSink: Send {
    /// Append one fragment.
    ///
    /// # Arguments
    /// * `fragment` - Serialized text for one waypoint, header or footer
    async fn write_fragment(&mut self, fragment: &str) -> Result<()>;

    /// Flush buffers and end the output cleanly.
    async fn finish(&mut self) -> Result<()>;

    /// End the output abruptly, leaving whatever was written so far.
    async fn abort(&mut self) -> Result<()>;

    /// Bytes accepted so far.
    fn bytes_written(&self) -> u64;
}

/// Helper to create a buffered file writer.
async fn create_writer(path: &str) -> Result<BufWriter<File>> {
    let file = File::create(path).await?;
    Ok(BufWriter::with_capacity(8 * 1024 * 1024, file)) // 8MB buffer
}

/// Validate that the target directory exists before opening the file.
fn validate_path(path: &str) -> Result<()> {
    let path_obj = Path::new(path);

    if let Some(parent) = path_obj.parent() {
        if !parent.as_os_str().is_empty() && !parent.exists() {
            return Err(crate::error::ExportError::Generic(format!(
                "Directory does not exist: {}",
                parent.display()
            )));
        }
    }

    Ok(())
}

/// Sink writing to a buffered file
pub struct FileSink {
    writer: BufWriter<File>,
    path: String,
    bytes: u64,
}

impl FileSink {
    /// Create a sink for the given output path.
    ///
    /// # Arguments
    /// * `path` - Output file path
    ///
    /// # Returns
    /// * `Result<Self>` - New sink or error
    pub async fn create(path: &str) -> Result<Self> {
        validate_path(path)?;
        let writer = create_writer(path).await?;

        debug!("Created export file sink: {}", path);

        Ok(Self {
            writer,
            path: path.to_string(),
            bytes: 0,
        })
    }

    /// Output file path.
    pub fn path(&self) -> &str {
        &self.path
    }
}

#[async_trait]
impl ExportSink for FileSink {
    async fn write_fragment(&mut self, fragment: &str) -> Result<()> {
        self.writer.write_all(fragment.as_bytes()).await?;
        self.bytes += fragment.len() as u64;
        Ok(())
    }

    async fn finish(&mut self) -> Result<()> {
        self.writer.flush().await?;
        debug!("Finalized export file: {} ({} bytes)", self.path, self.bytes);
        Ok(())
    }

    async fn abort(&mut self) -> Result<()> {
        // Flush what was accepted; the truncated document is the signal
        self.writer.flush().await?;
        debug!("Aborted export file: {} ({} bytes)", self.path, self.bytes);
        Ok(())
    }

    fn bytes_written(&self) -> u64 {
        self.bytes
    }
}

/// In-memory sink
///
/// Useful for gateways buffering small exports and for tests asserting on
/// exact output.
#[derive(Debug, Default)]
pub struct MemorySink {
    buf: Vec<u8>,
    finished: bool,
    aborted: bool,
}

impl MemorySink {
    /// Create an empty sink.
    pub fn new() -> Self {
        Self::default()
    }

    /// Accumulated output as text.
    pub fn contents(&self) -> &str {
        std::str::from_utf8(&self.buf).unwrap_or_default()
    }

    /// Whether `finish` was called.
    pub fn is_finished(&self) -> bool {
        self.finished
    }

    /// Whether `abort` was called.
    pub fn is_aborted(&self) -> bool {
        self.aborted
    }
}

#[async_trait]
impl ExportSink for MemorySink {
    async fn write_fragment(&mut self, fragment: &str) -> Result<()> {
        self.buf.extend_from_slice(fragment.as_bytes());
        Ok(())
    }

    async fn finish(&mut self) -> Result<()> {
        self.finished = true;
        Ok(())
    }

    async fn abort(&mut self) -> Result<()> {
        self.aborted = true;
        Ok(())
    }

    fn bytes_written(&self) -> u64 {
        self.buf.len() as u64
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_file_sink_writes_and_counts() {
        let path = std::env::temp_dir().join("poi_export_sink_test.csv");
        let path = path.to_str().unwrap().to_string();

        let mut sink = FileSink::create(&path).await.unwrap();
        sink.write_fragment("Latitude,Longitude,Elevation\n").await.unwrap();
        sink.write_fragment("1,2,0.0\n").await.unwrap();
        sink.finish().await.unwrap();

        assert_eq!(sink.bytes_written(), 37);

        let content = tokio::fs::read_to_string(&path).await.unwrap();
        assert_eq!(content, "Latitude,Longitude,Elevation\n1,2,0.0\n");

        tokio::fs::remove_file(&path).await.ok();
    }

    #[tokio::test]
    async fn test_file_sink_invalid_directory() {
        let result = FileSink::create("/nonexistent/directory/out.gpx").await;
        assert!(result.is_err());
    }

    #[tokio::test]
    async fn test_memory_sink_records_termination_kind() {
        let mut sink = MemorySink::new();
        sink.write_fragment("a").await.unwrap();
        sink.abort().await.unwrap();

        assert!(sink.is_aborted());
        assert!(!sink.is_finished());
        assert_eq!(sink.contents(), "a");
    }
}
