use std::sync::{Arc, Mutex, PoisonError};

use tokio::{sync::watch, task::JoinHandle};

use super::{
    selection::{SelectionChange, SelectionListener},
    DataSource, ErrorAggregator, FetchOutcome, FetchSession, FetchState, PopularMoviesSource,
    RecommendationsSource, SourceId,
};
use crate::services::DashboardApi;

struct ControllerInner<S: DataSource> {
    source: S,
    api: Arc<dyn DashboardApi>,
    session: FetchSession<S::Data>,
    key: Mutex<Option<S::Key>>,
}

/// Keeps one data source's state in step with its key
///
/// Cheap to clone; clones share the same state. A key of `None` is the
/// "no selection" sentinel: the source sits idle with empty data and issues no
/// request. Failures are reported once and never retried automatically.
pub struct DataSourceController<S: DataSource> {
    inner: Arc<ControllerInner<S>>,
}

impl<S: DataSource> Clone for DataSourceController<S> {
    fn clone(&self) -> Self {
        Self {
            inner: Arc::clone(&self.inner),
        }
    }
}

impl<S: DataSource> DataSourceController<S> {
    /// Creates a key-gated controller with no key set; it starts idle with empty data
    pub fn new(source: S, api: Arc<dyn DashboardApi>, errors: ErrorAggregator) -> Self {
        let session = FetchSession::idle_empty(source.id(), errors);
        Self::with_session(source, api, session)
    }

    fn with_session(
        source: S,
        api: Arc<dyn DashboardApi>,
        session: FetchSession<S::Data>,
    ) -> Self {
        Self {
            inner: Arc::new(ControllerInner {
                source,
                api,
                session,
                key: Mutex::new(None),
            }),
        }
    }

    pub fn id(&self) -> SourceId {
        self.inner.source.id()
    }

    pub fn source(&self) -> &S {
        &self.inner.source
    }

    pub fn state(&self) -> FetchState<S::Data> {
        self.inner.session.state()
    }

    pub fn subscribe(&self) -> watch::Receiver<FetchState<S::Data>> {
        self.inner.session.subscribe()
    }

    pub fn key(&self) -> Option<S::Key> {
        self.key_slot().clone()
    }

    /// Switches the source to `key`
    ///
    /// An unchanged key is a no-op and returns `None`. A new key starts a request and
    /// supersedes any request still in flight. `None` resets the source to idle with
    /// empty data without issuing a request.
    pub fn set_key(&self, key: Option<S::Key>) -> Option<JoinHandle<FetchOutcome>> {
        {
            let mut current = self.key_slot();
            if *current == key {
                tracing::trace!(source = %self.id(), key = ?key, "Key unchanged");
                return None;
            }
            tracing::debug!(source = %self.id(), from = ?*current, to = ?key, "Key changed");
            *current = key.clone();
        }

        match key {
            Some(key) => Some(self.start(key)),
            None => {
                self.inner.session.reset();
                None
            }
        }
    }

    /// Re-issues the request for the current key; a no-op when no key is set
    pub fn refresh(&self) -> Option<JoinHandle<FetchOutcome>> {
        let key = self.key()?;
        Some(self.start(key))
    }

    /// Invalidates and aborts the in-flight request, keeping the current key
    pub fn cancel(&self) {
        self.inner.session.cancel();
    }

    fn start(&self, key: S::Key) -> JoinHandle<FetchOutcome> {
        let source = self.inner.source.clone();
        let api = Arc::clone(&self.inner.api);
        self.inner
            .session
            .start(async move { source.load(api.as_ref(), &key).await })
    }

    fn key_slot(&self) -> std::sync::MutexGuard<'_, Option<S::Key>> {
        self.inner.key.lock().unwrap_or_else(PoisonError::into_inner)
    }
}

impl<S> DataSourceController<S>
where
    S: DataSource<Key = ()>,
{
    /// Creates a key-less controller; it fetches when [`load`](Self::load) is called
    pub fn keyless(source: S, api: Arc<dyn DashboardApi>, errors: ErrorAggregator) -> Self {
        let session = FetchSession::new(source.id(), errors);
        Self::with_session(source, api, session)
    }

    /// Fetches a key-less source; repeated calls after the first are no-ops
    pub fn load(&self) -> Option<JoinHandle<FetchOutcome>> {
        self.set_key(Some(()))
    }
}

impl SelectionListener for DataSourceController<RecommendationsSource> {
    fn on_selection_change(&self, change: &SelectionChange) -> Option<JoinHandle<FetchOutcome>> {
        match change {
            SelectionChange::User(user_id) => self.set_key(*user_id),
            _ => None,
        }
    }
}

impl SelectionListener for DataSourceController<PopularMoviesSource> {
    fn on_selection_change(&self, change: &SelectionChange) -> Option<JoinHandle<FetchOutcome>> {
        match change {
            SelectionChange::SortKey(sort_key) => {
                let query = self.source().query_for(*sort_key);
                self.set_key(Some(query))
            }
            _ => None,
        }
    }
}
