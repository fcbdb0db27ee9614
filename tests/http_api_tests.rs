use mockito::{Matcher, Server};
use serde_json::json;

use movielens_dashboard::{
    models::{PopularityQuery, SortKey},
    services::{DashboardApi, HttpDashboardApi},
    ApiError,
};

#[tokio::test]
async fn test_fetch_users() {
    let mut server = Server::new_async().await;
    let mock = server
        .mock("GET", "/api/users")
        .with_status(200)
        .with_header("content-type", "application/json")
        .with_body(
            json!([
                {"user_id": 1, "age": 24, "gender": "M", "occupation": "technician"},
                {"user_id": 2, "age": 53, "gender": "F", "occupation": "other"}
            ])
            .to_string(),
        )
        .create_async()
        .await;

    let api = HttpDashboardApi::new(server.url());
    let users = api.fetch_users().await.unwrap();

    mock.assert_async().await;
    assert_eq!(users.len(), 2);
    assert_eq!(users[1].occupation, "other");
}

#[tokio::test]
async fn test_fetch_popular_movies_sends_query() {
    let mut server = Server::new_async().await;
    let mock = server
        .mock("GET", "/api/popular-movies")
        .match_query(Matcher::AllOf(vec![
            Matcher::UrlEncoded("sort_by".into(), "weighted_score".into()),
            Matcher::UrlEncoded("limit".into(), "20".into()),
            Matcher::UrlEncoded("min_ratings".into(), "20".into()),
        ]))
        .with_status(200)
        .with_header("content-type", "application/json")
        .with_body(
            json!({
                "movies": [
                    {
                        "movie_id": 50,
                        "title": "Star Wars (1977)",
                        "genres": ["Action", "Adventure", "Romance", "Sci-Fi", "War"],
                        "rating_count": 583,
                        "avg_rating": 4.358,
                        "weighted_score": 4.31
                    }
                ],
                "total_movies": 939,
                "global_mean_rating": 3.53,
                "sort_by": "weighted_score"
            })
            .to_string(),
        )
        .create_async()
        .await;

    let api = HttpDashboardApi::new(server.url());
    let query = PopularityQuery {
        sort_key: SortKey::WeightedScore,
        limit: 20,
        min_ratings: 20,
    };
    let popular = api.fetch_popular_movies(&query).await.unwrap();

    mock.assert_async().await;
    assert_eq!(popular.total_movies, Some(939));
    assert_eq!(popular.movies[0].rating_count, Some(583));
    assert_eq!(popular.movies[0].genres.len(), 5);
}

#[tokio::test]
async fn test_clusters_decode_leniently() {
    let mut server = Server::new_async().await;
    server
        .mock("GET", "/api/clusters")
        .with_status(200)
        .with_header("content-type", "application/json")
        .with_body(
            r#"[
                {
                    "cluster": 0,
                    "num_users": 120,
                    "age_mean": "unknown",
                    "age_std": null,
                    "gender_dist": {"M": 0.75, "F": 0.25},
                    "top_occupations": {"student": 0.4, "writer": null, "engineer": 0.1},
                    "genre_preferences": [
                        {"name": "Drama", "value": 3.9},
                        {"name": "Horror", "value": "n/a"}
                    ]
                },
                {"cluster": 1}
            ]"#,
        )
        .create_async()
        .await;

    let api = HttpDashboardApi::new(server.url());
    let clusters = api.fetch_clusters().await.unwrap();

    assert_eq!(clusters.len(), 2);
    let first = &clusters[0];
    assert_eq!(first.age_mean, None);
    assert_eq!(first.age_std, None);
    assert_eq!(first.gender_dist.get("M"), Some(0.75));
    let occupations: Vec<&str> = first.top_occupations.iter().map(|(label, _)| label).collect();
    assert_eq!(occupations, vec!["student", "writer", "engineer"]);
    assert_eq!(first.genre_preferences[1].value, None);

    assert_eq!(clusters[1].num_users, None);
    assert!(clusters[1].top_occupations.is_empty());
}

#[tokio::test]
async fn test_recommendations_path_includes_user_id() {
    let body = r#"[{"movie_id": 1, "title": "Toy Story (1995)", "genres": null, "score": 4.8}]"#;
    let mut server = Server::new_async().await;
    let mock = server
        .mock("GET", "/api/recommend/42")
        .with_status(200)
        .with_body(body)
        .create_async()
        .await;

    let api = HttpDashboardApi::new(format!("{}/", server.url()));
    let movies = api.fetch_recommendations(42).await.unwrap();

    mock.assert_async().await;
    assert_eq!(movies[0].title, "Toy Story (1995)");
    assert!(movies[0].genres.is_empty());
    assert_eq!(movies[0].score, Some(4.8));
}

#[tokio::test]
async fn test_non_success_status_is_an_error() {
    let mut server = Server::new_async().await;
    server
        .mock("GET", "/api/recommend/7")
        .with_status(404)
        .with_body(r#"{"error": "User not found"}"#)
        .create_async()
        .await;

    let api = HttpDashboardApi::new(server.url());
    let err = api.fetch_recommendations(7).await.unwrap_err();

    match err {
        ApiError::Status { endpoint, status, .. } => {
            assert_eq!(endpoint, "/api/recommend/7");
            assert_eq!(status, 404);
        }
        other => panic!("expected status error, got {other:?}"),
    }
}

#[tokio::test]
async fn test_malformed_body_is_a_decode_error() {
    let mut server = Server::new_async().await;
    server
        .mock("GET", "/api/users")
        .with_status(200)
        .with_body("<html>maintenance</html>")
        .create_async()
        .await;

    let api = HttpDashboardApi::new(server.url());
    let err = api.fetch_users().await.unwrap_err();

    assert!(matches!(err, ApiError::Decode { ref endpoint, .. } if endpoint == "/api/users"));
}
