//! HTTP implementation of the dashboard API.
//!
//! Talks JSON to the recommendation backend. One `reqwest::Client` is shared by all
//! calls so connections are pooled across the four sources.

use reqwest::Client as HttpClient;
use serde::de::DeserializeOwned;
use tracing::instrument;

use crate::{
    config::Config,
    error::{ApiError, ApiResult},
    models::{Cluster, Movie, PopularMovies, PopularityQuery, User, UserId},
    services::DashboardApi,
};

#[derive(Clone)]
pub struct HttpDashboardApi {
    http_client: HttpClient,
    api_url: String,
}

impl HttpDashboardApi {
    pub fn new(api_url: impl Into<String>) -> Self {
        Self::with_client(HttpClient::new(), api_url)
    }

    pub fn with_client(http_client: HttpClient, api_url: impl Into<String>) -> Self {
        let api_url = api_url.into().trim_end_matches('/').to_string();
        Self {
            http_client,
            api_url,
        }
    }

    /// Builds a client from configuration, applying the optional request timeout
    pub fn from_config(config: &Config) -> ApiResult<Self> {
        let mut builder = HttpClient::builder();
        if let Some(timeout) = config.request_timeout() {
            builder = builder.timeout(timeout);
        }
        Ok(Self::with_client(builder.build()?, &config.api_base_url))
    }

    pub fn api_url(&self) -> &str {
        &self.api_url
    }

    /// Issues a GET and decodes the JSON body, failing on any non-2xx status
    async fn get_json<T: DeserializeOwned>(
        &self,
        path: &str,
        query: &[(&str, String)],
    ) -> ApiResult<T> {
        let url = format!("{}{}", self.api_url, path);

        let response = self.http_client.get(&url).query(query).send().await?;

        if !response.status().is_success() {
            let status = response.status();
            let body = response.text().await.unwrap_or_default();
            tracing::error!(
                endpoint = %path,
                status = %status,
                body = %body,
                "Dashboard API request failed"
            );
            return Err(ApiError::Status {
                endpoint: path.to_string(),
                status: status.as_u16(),
                body,
            });
        }

        let response_text = response.text().await?;
        tracing::debug!(endpoint = %path, bytes = response_text.len(), "Raw API response");

        serde_json::from_str(&response_text).map_err(|e| {
            tracing::error!(
                endpoint = %path,
                error = %e,
                "Failed to deserialize API response"
            );
            ApiError::Decode {
                endpoint: path.to_string(),
                reason: e.to_string(),
            }
        })
    }
}

#[async_trait::async_trait]
impl DashboardApi for HttpDashboardApi {
    #[instrument(skip(self))]
    async fn fetch_users(&self) -> ApiResult<Vec<User>> {
        let users: Vec<User> = self.get_json("/api/users", &[]).await?;
        tracing::info!(users = users.len(), "Users fetched");
        Ok(users)
    }

    #[instrument(skip(self))]
    async fn fetch_clusters(&self) -> ApiResult<Vec<Cluster>> {
        let clusters: Vec<Cluster> = self.get_json("/api/clusters", &[]).await?;
        tracing::info!(clusters = clusters.len(), "Clusters fetched");
        Ok(clusters)
    }

    #[instrument(skip(self))]
    async fn fetch_recommendations(&self, user_id: UserId) -> ApiResult<Vec<Movie>> {
        let path = format!("/api/recommend/{}", user_id);
        let movies: Vec<Movie> = self.get_json(&path, &[]).await?;
        tracing::info!(
            user_id = user_id,
            recommendations = movies.len(),
            "Recommendations fetched"
        );
        Ok(movies)
    }

    #[instrument(skip(self), fields(sort_by = %query.sort_key))]
    async fn fetch_popular_movies(&self, query: &PopularityQuery) -> ApiResult<PopularMovies> {
        let popular: PopularMovies = self
            .get_json("/api/popular-movies", &query.query_pairs())
            .await?;
        tracing::info!(
            movies = popular.movies.len(),
            total_movies = ?popular.total_movies,
            "Popular movies fetched"
        );
        Ok(popular)
    }
}
