use crate::models::UserId;

/// Failures raised while talking to the recommendation API
#[derive(thiserror::Error, Debug)]
pub enum ApiError {
    #[error("HTTP client error: {0}")]
    HttpClient(#[from] reqwest::Error),

    #[error("{endpoint} returned status {status}: {body}")]
    Status {
        endpoint: String,
        status: u16,
        body: String,
    },

    #[error("Failed to decode {endpoint} response: {reason}")]
    Decode { endpoint: String, reason: String },

    #[error("Request abandoned before a response arrived")]
    Abandoned,
}

pub type ApiResult<T> = Result<T, ApiError>;

/// Errors returned by the dashboard's mutator entry points
#[derive(thiserror::Error, Debug, PartialEq, Eq)]
pub enum DashboardError {
    #[error("User {0} is not part of the loaded user list")]
    UnknownUser(UserId),
}

pub type DashboardResult<T> = Result<T, DashboardError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_status_error_message() {
        let err = ApiError::Status {
            endpoint: "/api/clusters".to_string(),
            status: 503,
            body: "unavailable".to_string(),
        };
        assert_eq!(
            err.to_string(),
            "/api/clusters returned status 503: unavailable"
        );
    }

    #[test]
    fn test_unknown_user_message() {
        assert_eq!(
            DashboardError::UnknownUser(42).to_string(),
            "User 42 is not part of the loaded user list"
        );
    }
}
