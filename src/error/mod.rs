//! Error handling module for export operations.
//!
//! This module provides comprehensive error handling for the export engine with:
//! - Structured error information extraction from MongoDB driver errors
//! - A single error taxonomy covering request, admission, upstream and sink failures
//! - Consistent JSON error formatting for logging and gateway responses
//!
//! # Example
//!
//! ```rust,no_run
//! use poi_export::error::{Result, ExportError};
//!
//! fn example_operation() -> Result<()> {
//!     // MongoDB operations automatically convert errors
//!     // into the crate-wide error type
//!     Ok(())
//! }
//! ```

pub mod kinds;
pub mod mongo;

// Re-export commonly used types
pub use kinds::{
    ConfigError, ConnectionError, ExportError, RequestError, Result, UpstreamError,
};
pub use mongo::{ErrorInfo, extract_error_info};
