use std::sync::Arc;

use chrono::{DateTime, Utc};
use tokio::sync::watch;

use super::SourceId;

/// The failure currently shown in the error banner
#[derive(Debug, Clone, PartialEq)]
pub struct ErrorReport {
    pub source: SourceId,
    pub message: String,
    pub reported_at: DateTime<Utc>,
}

/// Single "most recent error" slot shared by every data source
///
/// The last source to fail owns the banner; earlier failures are overwritten, not
/// merged. A later success elsewhere does not clear it.
#[derive(Clone)]
pub struct ErrorAggregator {
    slot: Arc<watch::Sender<Option<ErrorReport>>>,
}

impl Default for ErrorAggregator {
    fn default() -> Self {
        Self::new()
    }
}

impl ErrorAggregator {
    pub fn new() -> Self {
        let (slot, _) = watch::channel(None);
        Self {
            slot: Arc::new(slot),
        }
    }

    /// Replaces whatever is displayed with this failure
    pub fn report(&self, source: SourceId, message: impl Into<String>) {
        let report = ErrorReport {
            source,
            message: message.into(),
            reported_at: Utc::now(),
        };
        tracing::warn!(source = %source, message = %report.message, "Error banner updated");
        self.slot.send_replace(Some(report));
    }

    /// Clears the banner
    pub fn dismiss(&self) {
        if self.slot.send_replace(None).is_some() {
            tracing::debug!("Error banner dismissed");
        }
    }

    pub fn current(&self) -> Option<ErrorReport> {
        self.slot.borrow().clone()
    }

    /// Message to display, if any
    pub fn message(&self) -> Option<String> {
        self.slot.borrow().as_ref().map(|report| report.message.clone())
    }

    pub fn subscribe(&self) -> watch::Receiver<Option<ErrorReport>> {
        self.slot.subscribe()
    }
}
