//! Read-only contract of the recommendation API
//!
//! The dashboard never writes; every call is an idempotent GET. Implementations must
//! report non-2xx responses and undecodable bodies as errors rather than returning
//! partial data.

use crate::{
    error::ApiResult,
    models::{Cluster, Movie, PopularMovies, PopularityQuery, User, UserId},
};

#[cfg_attr(test, mockall::automock)]
#[async_trait::async_trait]
pub trait DashboardApi: Send + Sync {
    /// `GET /api/users`
    async fn fetch_users(&self) -> ApiResult<Vec<User>>;

    /// `GET /api/clusters`
    async fn fetch_clusters(&self) -> ApiResult<Vec<Cluster>>;

    /// `GET /api/recommend/{user_id}`
    async fn fetch_recommendations(&self, user_id: UserId) -> ApiResult<Vec<Movie>>;

    /// `GET /api/popular-movies?sort_by=..&limit=..&min_ratings=..`
    async fn fetch_popular_movies(&self, query: &PopularityQuery) -> ApiResult<PopularMovies>;
}
