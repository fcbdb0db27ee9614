use std::fmt::{Debug, Display};

use crate::{
    config::Config,
    error::ApiResult,
    models::{Cluster, Movie, PopularMovies, PopularityQuery, SortKey, User, UserId},
    services::DashboardApi,
};

/// Identifies a logical data source in logs and in the error banner
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum SourceId {
    Users,
    Clusters,
    Recommendations,
    PopularMovies,
}

impl SourceId {
    /// Generic message shown to the user when this source fails
    pub fn failure_message(&self) -> &'static str {
        match self {
            SourceId::Users => "Failed to load users. Please try again later.",
            SourceId::Clusters => "Failed to load clusters. Please try again later.",
            SourceId::Recommendations => {
                "Failed to load recommendations. Please try again later."
            }
            SourceId::PopularMovies => "Failed to load popular movies. Please try again later.",
        }
    }
}

impl Display for SourceId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            SourceId::Users => write!(f, "users"),
            SourceId::Clusters => write!(f, "clusters"),
            SourceId::Recommendations => write!(f, "recommendations"),
            SourceId::PopularMovies => write!(f, "popular_movies"),
        }
    }
}

/// A logical source of dashboard data
///
/// `Key` is the input that decides which request should be in flight. Key-less
/// sources use `()`.
#[async_trait::async_trait]
pub trait DataSource: Clone + Send + Sync + 'static {
    type Key: Clone + PartialEq + Debug + Send + Sync + 'static;
    type Data: Clone + Default + Send + Sync + 'static;

    fn id(&self) -> SourceId;

    async fn load(&self, api: &dyn DashboardApi, key: &Self::Key) -> ApiResult<Self::Data>;
}

#[derive(Debug, Clone, Copy, Default)]
pub struct UsersSource;

#[async_trait::async_trait]
impl DataSource for UsersSource {
    type Key = ();
    type Data = Vec<User>;

    fn id(&self) -> SourceId {
        SourceId::Users
    }

    async fn load(&self, api: &dyn DashboardApi, _key: &()) -> ApiResult<Vec<User>> {
        api.fetch_users().await
    }
}

#[derive(Debug, Clone, Copy, Default)]
pub struct ClustersSource;

#[async_trait::async_trait]
impl DataSource for ClustersSource {
    type Key = ();
    type Data = Vec<Cluster>;

    fn id(&self) -> SourceId {
        SourceId::Clusters
    }

    async fn load(&self, api: &dyn DashboardApi, _key: &()) -> ApiResult<Vec<Cluster>> {
        api.fetch_clusters().await
    }
}

/// Recommendations for the selected user
#[derive(Debug, Clone, Copy, Default)]
pub struct RecommendationsSource;

#[async_trait::async_trait]
impl DataSource for RecommendationsSource {
    type Key = UserId;
    type Data = Vec<Movie>;

    fn id(&self) -> SourceId {
        SourceId::Recommendations
    }

    async fn load(&self, api: &dyn DashboardApi, user_id: &UserId) -> ApiResult<Vec<Movie>> {
        api.fetch_recommendations(*user_id).await
    }
}

/// Popular movies for the active sort key
///
/// Carries the fixed part of the query so a sort-key change can be turned into a
/// full [`PopularityQuery`].
#[derive(Debug, Clone, Copy)]
pub struct PopularMoviesSource {
    pub limit: u32,
    pub min_ratings: u32,
}

impl PopularMoviesSource {
    pub fn query_for(&self, sort_key: SortKey) -> PopularityQuery {
        PopularityQuery {
            sort_key,
            limit: self.limit,
            min_ratings: self.min_ratings,
        }
    }
}

impl From<&Config> for PopularMoviesSource {
    fn from(config: &Config) -> Self {
        Self {
            limit: config.popular_limit,
            min_ratings: config.popular_min_ratings,
        }
    }
}

#[async_trait::async_trait]
impl DataSource for PopularMoviesSource {
    type Key = PopularityQuery;
    type Data = PopularMovies;

    fn id(&self) -> SourceId {
        SourceId::PopularMovies
    }

    async fn load(
        &self,
        api: &dyn DashboardApi,
        query: &PopularityQuery,
    ) -> ApiResult<PopularMovies> {
        api.fetch_popular_movies(query).await
    }
}
