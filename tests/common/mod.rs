#![allow(dead_code)]

use std::{
    collections::{HashMap, HashSet},
    sync::{Arc, Mutex},
};

use tokio::sync::oneshot;

use movielens_dashboard::{
    models::{Cluster, Movie, PopularMovies, PopularityQuery, SortKey, User, UserId},
    services::DashboardApi,
    state::SourceId,
    ApiError, ApiResult, Config, Dashboard,
};

pub type RecommendationsReply = oneshot::Sender<ApiResult<Vec<Movie>>>;
pub type PopularReply = oneshot::Sender<ApiResult<PopularMovies>>;

/// In-memory API whose responses can be held back and released in any order
///
/// Ungated calls answer immediately from the fixtures below. A gated call waits for
/// the test to send its reply; dropping the sender abandons the request.
#[derive(Default)]
pub struct ScriptedApi {
    users: Vec<User>,
    failing: Mutex<HashSet<SourceId>>,
    recommendation_gates: Mutex<HashMap<UserId, oneshot::Receiver<ApiResult<Vec<Movie>>>>>,
    popular_gates: Mutex<HashMap<SortKey, oneshot::Receiver<ApiResult<PopularMovies>>>>,
    calls: Mutex<Vec<String>>,
}

impl ScriptedApi {
    pub fn with_users(count: u32) -> Arc<Self> {
        Arc::new(Self {
            users: (1..=count).map(user).collect(),
            ..Self::default()
        })
    }

    /// Makes every later call for a key-less source fail
    pub fn fail(&self, source: SourceId) {
        self.failing.lock().unwrap().insert(source);
    }

    pub fn gate_recommendations(&self, user_id: UserId) -> RecommendationsReply {
        let (tx, rx) = oneshot::channel();
        self.recommendation_gates.lock().unwrap().insert(user_id, rx);
        tx
    }

    pub fn gate_popular(&self, sort_key: SortKey) -> PopularReply {
        let (tx, rx) = oneshot::channel();
        self.popular_gates.lock().unwrap().insert(sort_key, rx);
        tx
    }

    pub fn calls(&self) -> Vec<String> {
        self.calls.lock().unwrap().clone()
    }

    fn record(&self, call: String) {
        self.calls.lock().unwrap().push(call);
    }

    fn check(&self, source: SourceId) -> ApiResult<()> {
        if self.failing.lock().unwrap().contains(&source) {
            return Err(server_error(source));
        }
        Ok(())
    }
}

#[async_trait::async_trait]
impl DashboardApi for ScriptedApi {
    async fn fetch_users(&self) -> ApiResult<Vec<User>> {
        self.record("users".to_string());
        self.check(SourceId::Users)?;
        Ok(self.users.clone())
    }

    async fn fetch_clusters(&self) -> ApiResult<Vec<Cluster>> {
        self.record("clusters".to_string());
        self.check(SourceId::Clusters)?;
        Ok(vec![cluster(0), cluster(1)])
    }

    async fn fetch_recommendations(&self, user_id: UserId) -> ApiResult<Vec<Movie>> {
        self.record(format!("recommend/{}", user_id));
        let gate = self.recommendation_gates.lock().unwrap().remove(&user_id);
        match gate {
            Some(rx) => rx.await.unwrap_or(Err(ApiError::Abandoned)),
            None => Ok(recommendations_for(user_id)),
        }
    }

    async fn fetch_popular_movies(&self, query: &PopularityQuery) -> ApiResult<PopularMovies> {
        self.record(format!("popular/{}", query.sort_key));
        let gate = self.popular_gates.lock().unwrap().remove(&query.sort_key);
        match gate {
            Some(rx) => rx.await.unwrap_or(Err(ApiError::Abandoned)),
            None => Ok(popular_listing(query.sort_key)),
        }
    }
}

pub fn server_error(source: SourceId) -> ApiError {
    ApiError::Status {
        endpoint: source.to_string(),
        status: 500,
        body: "internal error".to_string(),
    }
}

pub fn user(user_id: UserId) -> User {
    User {
        user_id,
        age: 20 + user_id % 40,
        gender: if user_id % 2 == 0 { "F" } else { "M" }.to_string(),
        occupation: "student".to_string(),
    }
}

pub fn movie(movie_id: u32, title: &str, genres: &[&str]) -> Movie {
    Movie {
        movie_id,
        title: title.to_string(),
        genres: genres.iter().map(|g| g.to_string()).collect(),
        score: None,
        imdb_url: None,
        rating_count: None,
        avg_rating: None,
        weighted_score: None,
        release_date: None,
    }
}

/// Each user gets a single movie whose title names them
pub fn recommendations_for(user_id: UserId) -> Vec<Movie> {
    vec![movie(1000 + user_id, &format!("Pick for user {}", user_id), &["Drama"])]
}

pub fn popular_listing(sort_key: SortKey) -> PopularMovies {
    PopularMovies {
        movies: vec![
            movie(50, &format!("{} #1", sort_key.label()), &["Action", "Sci-Fi"]),
            movie(100, &format!("{} #2", sort_key.label()), &["Crime"]),
        ],
        total_movies: Some(939),
        global_mean_rating: Some(3.53),
        sort_by: Some(sort_key.as_str().to_string()),
    }
}

pub fn cluster(id: i64) -> Cluster {
    Cluster {
        cluster: Some(id),
        num_users: Some(100),
        age_mean: Some(30.0),
        ..Cluster::default()
    }
}

/// A dashboard whose initial fetches have all settled
pub async fn started_dashboard(api: Arc<ScriptedApi>) -> Dashboard {
    let dashboard = Dashboard::new(api, &Config::default());
    for handle in dashboard.start() {
        handle.await.unwrap();
    }
    dashboard
}
