use std::sync::Arc;

use tokio::task::JoinHandle;

use super::FetchOutcome;
use crate::models::{SortKey, UserId};

/// Dashboard tab; switching tabs never triggers a fetch
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum Tab {
    #[default]
    Recommendations,
    Clusters,
    PopularMovies,
}

/// A change to one of the coordinator's keys
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SelectionChange {
    User(Option<UserId>),
    SortKey(SortKey),
    Tab(Tab),
}

/// Receives key changes synchronously from a [`SelectionCoordinator`]
///
/// A listener that starts a request in response returns its handle.
pub trait SelectionListener: Send + Sync {
    fn on_selection_change(&self, change: &SelectionChange) -> Option<JoinHandle<FetchOutcome>>;
}

/// Single source of truth for the selected user, popularity sort key and tab
///
/// Mutations are pushed to every subscribed listener before the mutator returns.
/// Setting a value equal to the current one notifies nobody.
#[derive(Default)]
pub struct SelectionCoordinator {
    selected_user: Option<UserId>,
    sort_key: SortKey,
    tab: Tab,
    listeners: Vec<Arc<dyn SelectionListener>>,
}

impl SelectionCoordinator {
    pub fn new(sort_key: SortKey) -> Self {
        Self {
            sort_key,
            ..Self::default()
        }
    }

    pub fn subscribe(&mut self, listener: Arc<dyn SelectionListener>) {
        self.listeners.push(listener);
    }

    pub fn selected_user(&self) -> Option<UserId> {
        self.selected_user
    }

    pub fn sort_key(&self) -> SortKey {
        self.sort_key
    }

    pub fn tab(&self) -> Tab {
        self.tab
    }

    /// Selects a user, or clears the selection with `None`
    pub fn select_user(&mut self, user_id: Option<UserId>) -> Vec<JoinHandle<FetchOutcome>> {
        if self.selected_user == user_id {
            return Vec::new();
        }
        tracing::info!(user_id = ?user_id, "User selection changed");
        self.selected_user = user_id;
        self.notify(SelectionChange::User(user_id))
    }

    pub fn set_sort_key(&mut self, sort_key: SortKey) -> Vec<JoinHandle<FetchOutcome>> {
        if self.sort_key == sort_key {
            return Vec::new();
        }
        tracing::info!(sort_by = %sort_key, "Popularity sort key changed");
        self.sort_key = sort_key;
        self.notify(SelectionChange::SortKey(sort_key))
    }

    pub fn select_tab(&mut self, tab: Tab) {
        if self.tab == tab {
            return;
        }
        tracing::debug!(tab = ?tab, "Tab changed");
        self.tab = tab;
        // Listeners may observe tab changes, but none fetch in response
        let started = self.notify(SelectionChange::Tab(tab));
        debug_assert!(started.is_empty());
    }

    fn notify(&self, change: SelectionChange) -> Vec<JoinHandle<FetchOutcome>> {
        self.listeners
            .iter()
            .filter_map(|listener| listener.on_selection_change(&change))
            .collect()
    }
}
