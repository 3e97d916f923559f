//! Progress-callback trait for per-unit batch events.
//!
//! Inject an [`Arc<dyn BatchProgressCallback>`] via
//! [`crate::config::BatchConfigBuilder::progress_callback`] to receive events
//! as the orchestrator works through the batch. A *unit* is one image file or
//! one PDF page.
//!
//! Events are delivered synchronously on the processing thread, in order, and
//! never overlap with the work itself: the next unit starts only after
//! `on_unit_complete` for the previous one has returned.
//!
//! # Example
//!
//! ```rust
//! use inksaver::{BatchConfig, BatchProgressCallback, ProgressState};
//! use std::sync::Arc;
//!
//! struct Printer;
//!
//! impl BatchProgressCallback for Printer {
//!     fn on_unit_complete(&self, state: &ProgressState) {
//!         eprintln!("{:>3.0}% {}", state.fraction() * 100.0, state.current_label);
//!     }
//! }
//!
//! let config = BatchConfig::builder()
//!     .progress_callback(Arc::new(Printer) as Arc<dyn BatchProgressCallback>)
//!     .build()
//!     .unwrap();
//! ```

use serde::{Deserialize, Serialize};
use std::sync::Arc;

/// Snapshot emitted after every unit.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ProgressState {
    pub completed_units: usize,
    pub total_units: usize,
    /// Human-readable label of the unit just finished, e.g. `slide.pdf (page 2/3)`.
    pub current_label: String,
}

impl ProgressState {
    /// Completion ratio in `[0, 1]`.
    ///
    /// `completed_units` can exceed `total_units` when a PDF whose page count
    /// could not be precomputed turns out to render; the ratio saturates.
    pub fn fraction(&self) -> f64 {
        if self.total_units == 0 {
            return if self.completed_units == 0 { 0.0 } else { 1.0 };
        }
        (self.completed_units as f64 / self.total_units as f64).min(1.0)
    }
}

/// Called by the orchestrator as it processes each unit.
///
/// All methods have default no-op implementations so callers only override
/// what they care about.
pub trait BatchProgressCallback: Send + Sync {
    /// Called once, after unit precomputation and before any work.
    fn on_batch_start(&self, total_units: usize) {
        let _ = total_units;
    }

    /// Called after every unit, successful or not.
    fn on_unit_complete(&self, state: &ProgressState) {
        let _ = state;
    }

    /// Called when an input (or a PDF page) is recorded as failed.
    ///
    /// # Arguments
    /// * `label`: identity of the failed item
    /// * `error`: human-readable error description
    fn on_item_error(&self, label: &str, error: &str) {
        let _ = (label, error);
    }

    /// Called once after every input has been attempted.
    fn on_batch_complete(&self, artifacts: usize, failures: usize) {
        let _ = (artifacts, failures);
    }
}

/// A no-op implementation for callers that don't need progress events.
pub struct NoopProgressCallback;

impl BatchProgressCallback for NoopProgressCallback {}

/// Convenience alias matching the type stored in [`crate::config::BatchConfig`].
pub type ProgressCallback = Arc<dyn BatchProgressCallback>;
