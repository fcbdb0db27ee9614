//! The dashboard's presentation-facing surface.
//!
//! Owns one controller per data source, the selection coordinator, the user-list
//! paginator and the error banner. The mutators here are the only entry points the
//! UI needs; everything else is a read-only accessor or a derived view-model.
//!
//! Mutators start requests with `tokio::spawn` and must be called from within a tokio
//! runtime. They return the handles of any requests they started so callers can wait
//! for them; dropping the handles does not cancel anything.

use std::sync::Arc;

use tokio::task::JoinHandle;

use crate::{
    config::Config,
    error::{DashboardError, DashboardResult},
    models::{Cluster, Movie, PopularMovies, SortKey, User, UserId},
    services::DashboardApi,
    state::{
        ClustersSource, DataSourceController, ErrorAggregator, ErrorReport, FetchOutcome,
        FetchState, Paginator, PopularMoviesSource, RecommendationsSource, SelectionCoordinator,
        Tab, UsersSource,
    },
    view::{ClusterCard, PopularMovieCard, PopularStats, RecommendationList, UserOption},
};

pub struct Dashboard {
    errors: ErrorAggregator,
    users: DataSourceController<UsersSource>,
    clusters: DataSourceController<ClustersSource>,
    recommendations: DataSourceController<RecommendationsSource>,
    popular: DataSourceController<PopularMoviesSource>,
    selection: SelectionCoordinator,
    user_pages: Paginator,
}

impl Dashboard {
    pub fn new(api: Arc<dyn DashboardApi>, config: &Config) -> Self {
        let errors = ErrorAggregator::new();

        let users = DataSourceController::keyless(UsersSource, Arc::clone(&api), errors.clone());
        let clusters =
            DataSourceController::keyless(ClustersSource, Arc::clone(&api), errors.clone());
        let recommendations =
            DataSourceController::new(RecommendationsSource, Arc::clone(&api), errors.clone());
        let popular =
            DataSourceController::new(PopularMoviesSource::from(config), api, errors.clone());

        let mut selection = SelectionCoordinator::new(SortKey::default());
        selection.subscribe(Arc::new(recommendations.clone()));
        selection.subscribe(Arc::new(popular.clone()));

        Self {
            errors,
            users,
            clusters,
            recommendations,
            popular,
            selection,
            user_pages: Paginator::new(config.users_page_size),
        }
    }

    /// Issues the initial fetches: users, clusters and popular movies for the
    /// current sort key
    pub fn start(&self) -> Vec<JoinHandle<FetchOutcome>> {
        tracing::info!(sort_by = %self.selection.sort_key(), "Starting dashboard data sources");
        let initial_query = self.popular.source().query_for(self.selection.sort_key());
        [
            self.users.load(),
            self.clusters.load(),
            self.popular.set_key(Some(initial_query)),
        ]
        .into_iter()
        .flatten()
        .collect()
    }

    // Mutators

    /// Selects a user from the loaded list, or clears the selection with `None`
    ///
    /// Ids missing from the last successful users fetch are rejected without
    /// touching the current selection.
    pub fn select_user(
        &mut self,
        user_id: Option<UserId>,
    ) -> DashboardResult<Vec<JoinHandle<FetchOutcome>>> {
        if let Some(id) = user_id {
            if !self.is_known_user(id) {
                tracing::warn!(user_id = id, "Rejected selection of unknown user");
                return Err(DashboardError::UnknownUser(id));
            }
        }
        Ok(self.selection.select_user(user_id))
    }

    pub fn set_sort_key(&mut self, sort_key: SortKey) -> Vec<JoinHandle<FetchOutcome>> {
        self.selection.set_sort_key(sort_key)
    }

    pub fn select_tab(&mut self, tab: Tab) {
        self.selection.select_tab(tab);
    }

    pub fn load_more_users(&mut self) {
        self.user_pages.load_more();
    }

    /// Re-issues the recommendations request for the selected user
    pub fn retry_recommendations(&self) -> Option<JoinHandle<FetchOutcome>> {
        self.recommendations.refresh()
    }

    pub fn dismiss_error(&self) {
        self.errors.dismiss();
    }

    // Accessors

    pub fn selected_user_id(&self) -> Option<UserId> {
        self.selection.selected_user()
    }

    /// Record of the selected user, if it is still in the loaded list
    pub fn selected_user(&self) -> Option<User> {
        let id = self.selection.selected_user()?;
        self.users
            .state()
            .data
            .and_then(|users| users.into_iter().find(|user| user.user_id == id))
    }

    pub fn sort_key(&self) -> SortKey {
        self.selection.sort_key()
    }

    pub fn tab(&self) -> Tab {
        self.selection.tab()
    }

    pub fn users_state(&self) -> FetchState<Vec<User>> {
        self.users.state()
    }

    pub fn clusters_state(&self) -> FetchState<Vec<Cluster>> {
        self.clusters.state()
    }

    pub fn recommendations_state(&self) -> FetchState<Vec<Movie>> {
        self.recommendations.state()
    }

    pub fn popular_state(&self) -> FetchState<PopularMovies> {
        self.popular.state()
    }

    pub fn error_message(&self) -> Option<String> {
        self.errors.message()
    }

    pub fn error_report(&self) -> Option<ErrorReport> {
        self.errors.current()
    }

    // View-models

    /// Users revealed so far by "load more"
    pub fn visible_users(&self) -> Vec<UserOption> {
        let users = self.users.state().data.unwrap_or_default();
        self.user_pages
            .visible_slice(&users)
            .iter()
            .map(UserOption::from)
            .collect()
    }

    pub fn has_more_users(&self) -> bool {
        let users = self.users.state().data.unwrap_or_default();
        self.user_pages.has_more(&users)
    }

    pub fn cluster_cards(&self) -> Vec<ClusterCard> {
        self.clusters
            .state()
            .data
            .unwrap_or_default()
            .iter()
            .map(ClusterCard::from)
            .collect()
    }

    pub fn recommendation_list(&self) -> RecommendationList {
        let movies = self.recommendations.state().data.unwrap_or_default();
        RecommendationList::new(self.selection.selected_user(), &movies)
    }

    pub fn popular_cards(&self) -> Vec<PopularMovieCard> {
        let popular = self.popular.state().data.unwrap_or_default();
        PopularMovieCard::ranked(&popular.movies)
    }

    pub fn popular_stats(&self) -> Option<PopularStats> {
        self.popular
            .state()
            .data
            .as_ref()
            .and_then(PopularStats::from_response)
    }

    fn is_known_user(&self, id: UserId) -> bool {
        self.users
            .state()
            .data
            .is_some_and(|users| users.iter().any(|user| user.user_id == id))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{services::MockDashboardApi, state::FetchStatus};

    fn user(user_id: UserId) -> User {
        User {
            user_id,
            age: 30,
            gender: "F".to_string(),
            occupation: "writer".to_string(),
        }
    }

    fn api_with_users(count: u32) -> MockDashboardApi {
        let mut api = MockDashboardApi::new();
        api.expect_fetch_users()
            .times(1)
            .returning(move || Ok((1..=count).map(user).collect()));
        api.expect_fetch_clusters()
            .times(1)
            .returning(|| Ok(Vec::new()));
        api.expect_fetch_popular_movies()
            .withf(|query| query.sort_key == SortKey::RatingCount && query.limit == 20)
            .returning(|_| Ok(PopularMovies::default()));
        api
    }

    async fn started(api: MockDashboardApi) -> Dashboard {
        let dashboard = Dashboard::new(Arc::new(api), &Config::default());
        for handle in dashboard.start() {
            handle.await.unwrap();
        }
        dashboard
    }

    #[tokio::test]
    async fn test_start_loads_initial_sources() {
        let dashboard = started(api_with_users(3)).await;

        assert_eq!(dashboard.users_state().status, FetchStatus::Success);
        assert_eq!(dashboard.clusters_state().status, FetchStatus::Success);
        assert_eq!(dashboard.popular_state().status, FetchStatus::Success);
        assert_eq!(dashboard.recommendations_state().status, FetchStatus::Idle);
        assert_eq!(dashboard.popular_state().sequence, 1);
        assert_eq!(dashboard.sort_key(), SortKey::RatingCount);
    }

    #[tokio::test]
    async fn test_user_pagination() {
        let mut dashboard = started(api_with_users(45)).await;

        assert_eq!(dashboard.visible_users().len(), 20);
        assert!(dashboard.has_more_users());
        dashboard.load_more_users();
        dashboard.load_more_users();
        assert_eq!(dashboard.visible_users().len(), 45);
        assert!(!dashboard.has_more_users());
        assert_eq!(dashboard.visible_users()[44].label, "User 45 (30, F, writer)");
    }

    #[tokio::test]
    async fn test_unknown_user_is_rejected() {
        let mut dashboard = started(api_with_users(2)).await;

        let result = dashboard.select_user(Some(99));
        assert_eq!(result.unwrap_err(), DashboardError::UnknownUser(99));
        assert_eq!(dashboard.selected_user_id(), None);
    }

    #[tokio::test]
    async fn test_select_and_clear_user() {
        let mut api = api_with_users(2);
        api.expect_fetch_recommendations()
            .times(1)
            .returning(|_| Ok(Vec::new()));
        let mut dashboard = started(api).await;

        let handles = dashboard.select_user(Some(2)).unwrap();
        assert_eq!(handles.len(), 1);
        for handle in handles {
            handle.await.unwrap();
        }
        assert_eq!(dashboard.selected_user().unwrap().user_id, 2);
        assert_eq!(
            dashboard.recommendation_list().heading,
            "Recommendations for User 2"
        );

        assert!(dashboard.select_user(None).unwrap().is_empty());
        assert_eq!(dashboard.recommendations_state().status, FetchStatus::Idle);
        assert_eq!(dashboard.recommendation_list().heading, "Recommended Movies");
    }

    #[tokio::test]
    async fn test_tab_change_starts_nothing() {
        let mut dashboard = started(api_with_users(1)).await;
        let before = dashboard.popular_state().sequence;

        dashboard.select_tab(Tab::PopularMovies);

        assert_eq!(dashboard.tab(), Tab::PopularMovies);
        assert_eq!(dashboard.popular_state().sequence, before);
    }
}
