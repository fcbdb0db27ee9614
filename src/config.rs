use std::time::Duration;

use serde::Deserialize;

/// Prefix shared by every environment variable the dashboard reads
pub const ENV_PREFIX: &str = "DASHBOARD_";

/// Dashboard configuration loaded from environment variables
#[derive(Debug, Deserialize, Clone, PartialEq)]
pub struct Config {
    /// Origin of the recommendation API
    #[serde(default = "default_api_base_url")]
    pub api_base_url: String,

    /// Number of users revealed per "load more" step
    #[serde(default = "default_users_page_size")]
    pub users_page_size: usize,

    /// Number of popular movies requested per sort key
    #[serde(default = "default_popular_limit")]
    pub popular_limit: u32,

    /// Minimum rating count for a movie to qualify as popular
    #[serde(default = "default_popular_min_ratings")]
    pub popular_min_ratings: u32,

    /// Optional per-request timeout; unset means requests may wait forever
    #[serde(default)]
    pub request_timeout_secs: Option<u64>,
}

fn default_api_base_url() -> String {
    "http://127.0.0.1:5000".to_string()
}

fn default_users_page_size() -> usize {
    20
}

fn default_popular_limit() -> u32 {
    20
}

fn default_popular_min_ratings() -> u32 {
    20
}

impl Default for Config {
    fn default() -> Self {
        Self {
            api_base_url: default_api_base_url(),
            users_page_size: default_users_page_size(),
            popular_limit: default_popular_limit(),
            popular_min_ratings: default_popular_min_ratings(),
            request_timeout_secs: None,
        }
    }
}

impl Config {
    /// Load configuration from environment variables
    pub fn from_env() -> anyhow::Result<Self> {
        dotenvy::dotenv().ok();
        envy::prefixed(ENV_PREFIX)
            .from_env::<Config>()
            .map_err(|e| anyhow::anyhow!("Failed to load config: {}", e))
    }

    pub fn request_timeout(&self) -> Option<Duration> {
        self.request_timeout_secs.map(Duration::from_secs)
    }
}
