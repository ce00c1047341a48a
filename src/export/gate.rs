//! Single-flight admission gate
//!
//! At most one export runs per gate. This is a hard admission policy, not a
//! queue: a second request is rejected outright rather than serialized. The
//! gate is an owned value handed to each coordinator, so unrelated engine
//! instances (and tests) never share admission state.

use std::sync::Arc;
use std::sync::atomic::{AtomicBool, Ordering};

use tracing::debug;

/// Cloneable single-flight gate.
///
/// Clones share the same admission state; create a fresh gate for an
/// independent engine instance.
#[derive(Debug, Clone, Default)]
pub struct ExportGate {
    busy: Arc<AtomicBool>,
}

impl ExportGate {
    /// Create a new, open gate.
    pub fn new() -> Self {
        Self::default()
    }

    /// Try to claim the gate.
    ///
    /// Returns a permit when the gate was open; `None` when another export
    /// already holds it. Dropping the permit reopens the gate, which makes
    /// release unconditional on every exit path.
    pub fn try_acquire(&self) -> Option<ExportPermit> {
        if self
            .busy
            .compare_exchange(false, true, Ordering::AcqRel, Ordering::Acquire)
            .is_ok()
        {
            debug!("Export gate acquired");
            Some(ExportPermit {
                busy: Arc::clone(&self.busy),
            })
        } else {
            None
        }
    }

    /// Whether an export currently holds the gate.
    pub fn is_busy(&self) -> bool {
        self.busy.load(Ordering::Acquire)
    }
}

/// RAII permit for a running export.
#[derive(Debug)]
pub struct ExportPermit {
    busy: Arc<AtomicBool>,
}

impl Drop for ExportPermit {
    fn drop(&mut self) {
        self.busy.store(false, Ordering::Release);
        debug!("Export gate released");
    }
}
