//! Request lifecycle with stale-response protection.
//!
//! Every request started through a [`FetchSession`] captures the sequence number it
//! was issued under. When the response arrives it is applied only if that number is
//! still the session's current one; otherwise a newer request has been issued and the
//! response is dropped without touching state. The last request started wins, whatever
//! order the responses come back in.

use std::{
    future::Future,
    sync::{Arc, Mutex, PoisonError},
};

use chrono::{DateTime, Utc};
use tokio::{
    sync::watch,
    task::{AbortHandle, JoinHandle},
};

use super::{ErrorAggregator, SourceId};
use crate::error::ApiResult;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FetchStatus {
    Idle,
    Loading,
    Success,
    Error,
}

/// Observable state of one data source
#[derive(Debug, Clone, PartialEq)]
pub struct FetchState<T> {
    pub status: FetchStatus,
    pub data: Option<T>,
    pub error: Option<String>,
    /// Sequence of the most recently issued request
    pub sequence: u64,
    pub updated_at: Option<DateTime<Utc>>,
}

impl<T> Default for FetchState<T> {
    fn default() -> Self {
        Self {
            status: FetchStatus::Idle,
            data: None,
            error: None,
            sequence: 0,
            updated_at: None,
        }
    }
}

impl<T> FetchState<T> {
    pub fn is_loading(&self) -> bool {
        self.status == FetchStatus::Loading
    }
}

/// What happened to a response once it arrived
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum FetchOutcome {
    /// Response was current and is now the source's data
    Applied,
    /// Request was current and failed; carries the user-facing message
    Failed(String),
    /// A newer request superseded this one; nothing changed
    Discarded,
}

struct SessionInner<T> {
    source: SourceId,
    state: watch::Sender<FetchState<T>>,
    errors: ErrorAggregator,
    in_flight: Mutex<Option<AbortHandle>>,
}

/// Owns the [`FetchState`] of one source and arbitrates which response may update it
pub struct FetchSession<T> {
    inner: Arc<SessionInner<T>>,
}

impl<T> Clone for FetchSession<T> {
    fn clone(&self) -> Self {
        Self {
            inner: Arc::clone(&self.inner),
        }
    }
}

impl<T> FetchSession<T>
where
    T: Clone + Default + Send + Sync + 'static,
{
    pub fn new(source: SourceId, errors: ErrorAggregator) -> Self {
        let (state, _) = watch::channel(FetchState::default());
        Self {
            inner: Arc::new(SessionInner {
                source,
                state,
                errors,
                in_flight: Mutex::new(None),
            }),
        }
    }

    /// Like [`new`](Self::new) but idle with empty data rather than no data
    pub fn idle_empty(source: SourceId, errors: ErrorAggregator) -> Self {
        let session = Self::new(source, errors);
        session.inner.state.send_modify(|state| state.data = Some(T::default()));
        session
    }

    pub fn source(&self) -> SourceId {
        self.inner.source
    }

    /// Snapshot of the current state
    pub fn state(&self) -> FetchState<T> {
        self.inner.state.borrow().clone()
    }

    pub fn sequence(&self) -> u64 {
        self.inner.state.borrow().sequence
    }

    pub fn subscribe(&self) -> watch::Receiver<FetchState<T>> {
        self.inner.state.subscribe()
    }

    /// Issues `request` as the new current request for this source
    ///
    /// The returned handle resolves once the response has been applied or discarded.
    /// An earlier request still in flight is not aborted; its response is discarded
    /// when it arrives.
    pub fn start<F>(&self, request: F) -> JoinHandle<FetchOutcome>
    where
        F: Future<Output = ApiResult<T>> + Send + 'static,
    {
        let sequence = self.begin();
        let session = self.clone();
        let handle = tokio::spawn(async move {
            let result = request.await;
            session.complete(sequence, result)
        });
        *self.in_flight_slot() = Some(handle.abort_handle());
        handle
    }

    /// Bumps the sequence and marks the source as loading; returns the new sequence
    pub fn begin(&self) -> u64 {
        let mut sequence = 0;
        self.inner.state.send_modify(|state| {
            state.sequence += 1;
            state.status = FetchStatus::Loading;
            sequence = state.sequence;
        });
        tracing::debug!(source = %self.inner.source, sequence, "Fetch started");
        sequence
    }

    /// Applies a response issued under `sequence`, unless it has been superseded
    ///
    /// On failure the previous data is kept and the source's generic message is
    /// reported to the error banner.
    pub fn complete(&self, sequence: u64, result: ApiResult<T>) -> FetchOutcome {
        let source = self.inner.source;
        let mut outcome = FetchOutcome::Discarded;

        self.inner.state.send_if_modified(|state| {
            if state.sequence != sequence {
                return false;
            }
            match result {
                Ok(data) => {
                    state.status = FetchStatus::Success;
                    state.data = Some(data);
                    state.error = None;
                    outcome = FetchOutcome::Applied;
                }
                Err(e) => {
                    tracing::error!(source = %source, sequence, error = %e, "Fetch failed");
                    let message = source.failure_message().to_string();
                    state.status = FetchStatus::Error;
                    state.error = Some(message.clone());
                    outcome = FetchOutcome::Failed(message);
                }
            }
            state.updated_at = Some(Utc::now());
            true
        });

        match &outcome {
            FetchOutcome::Applied => {
                tracing::debug!(source = %source, sequence, "Fetch applied");
            }
            FetchOutcome::Failed(message) => self.inner.errors.report(source, message.as_str()),
            FetchOutcome::Discarded => {
                tracing::debug!(source = %source, sequence, "Discarding stale response");
            }
        }

        outcome
    }

    /// Invalidates the current request and aborts its task
    ///
    /// A source that was loading falls back to idle; its data is kept.
    pub fn cancel(&self) {
        self.abort_in_flight();
        self.inner.state.send_modify(|state| {
            state.sequence += 1;
            if state.status == FetchStatus::Loading {
                state.status = FetchStatus::Idle;
            }
        });
        tracing::debug!(source = %self.inner.source, "Fetch cancelled");
    }

    /// Returns to `idle` with empty data, invalidating anything in flight
    pub fn reset(&self) {
        self.abort_in_flight();
        self.inner.state.send_modify(|state| {
            state.sequence += 1;
            state.status = FetchStatus::Idle;
            state.data = Some(T::default());
            state.error = None;
            state.updated_at = Some(Utc::now());
        });
        tracing::debug!(source = %self.inner.source, "Source reset to idle");
    }

    fn abort_in_flight(&self) {
        if let Some(handle) = self.in_flight_slot().take() {
            handle.abort();
        }
    }

    fn in_flight_slot(&self) -> std::sync::MutexGuard<'_, Option<AbortHandle>> {
        self.inner
            .in_flight
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
    }
}
