use serde::{Deserialize, Serialize};

mod cluster;
pub mod lenient;
mod popularity;

pub use cluster::{Cluster, GenrePreference, OrderedRatios};
pub use popularity::{PopularityQuery, SortKey};

pub type UserId = u32;
pub type MovieId = u32;

/// A MovieLens user as listed by `/api/users`
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct User {
    pub user_id: UserId,
    pub age: u32,
    pub gender: String,
    pub occupation: String,
}

/// A movie as returned by the recommendation and popularity endpoints
///
/// Only `movie_id`, `title` and `genres` are always sent; each endpoint fills a
/// different subset of the remaining fields.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Movie {
    pub movie_id: MovieId,
    pub title: String,
    #[serde(default, deserialize_with = "lenient::null_as_default")]
    pub genres: Vec<String>,
    #[serde(default, deserialize_with = "lenient::finite_f64")]
    pub score: Option<f64>,
    #[serde(default)]
    pub imdb_url: Option<String>,
    #[serde(default, deserialize_with = "lenient::count")]
    pub rating_count: Option<u64>,
    #[serde(default, deserialize_with = "lenient::finite_f64")]
    pub avg_rating: Option<f64>,
    #[serde(default, deserialize_with = "lenient::finite_f64")]
    pub weighted_score: Option<f64>,
    #[serde(default)]
    pub release_date: Option<String>,
}

/// Response body of `/api/popular-movies`
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct PopularMovies {
    #[serde(default, deserialize_with = "lenient::null_as_default")]
    pub movies: Vec<Movie>,
    #[serde(default, deserialize_with = "lenient::count")]
    pub total_movies: Option<u64>,
    #[serde(default, deserialize_with = "lenient::finite_f64")]
    pub global_mean_rating: Option<f64>,
    #[serde(default)]
    pub sort_by: Option<String>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_user_deserialization_ignores_extra_fields() {
        let json = r#"{"user_id": 1, "age": 24, "gender": "M", "occupation": "technician", "zip_code": "85711"}"#;
        let user: User = serde_json::from_str(json).unwrap();
        assert_eq!(user.user_id, 1);
        assert_eq!(user.age, 24);
        assert_eq!(user.occupation, "technician");
    }

    #[test]
    fn test_recommendation_movie_deserialization() {
        let json = r#"{"movie_id": 50, "title": "Star Wars (1977)", "genres": ["Action", "Sci-Fi"]}"#;
        let movie: Movie = serde_json::from_str(json).unwrap();
        assert_eq!(movie.movie_id, 50);
        assert_eq!(movie.genres, vec!["Action", "Sci-Fi"]);
        assert_eq!(movie.rating_count, None);
        assert_eq!(movie.avg_rating, None);
    }

    #[test]
    fn test_popular_movies_deserialization() {
        let json = r#"{
            "movies": [{
                "movie_id": 50,
                "title": "Star Wars (1977)",
                "genres": ["Action"],
                "rating_count": 583,
                "avg_rating": 4.358,
                "weighted_score": 4.31,
                "release_date": "01-Jan-1977"
            }],
            "total_movies": 939,
            "global_mean_rating": 3.52986,
            "sort_by": "rating_count"
        }"#;

        let popular: PopularMovies = serde_json::from_str(json).unwrap();
        assert_eq!(popular.movies.len(), 1);
        assert_eq!(popular.movies[0].rating_count, Some(583));
        assert_eq!(popular.total_movies, Some(939));
        assert_eq!(popular.sort_by.as_deref(), Some("rating_count"));
    }

    #[test]
    fn test_movie_with_null_genres() {
        let json = r#"{"movie_id": 7, "title": "Unknown", "genres": null, "avg_rating": null}"#;
        let movie: Movie = serde_json::from_str(json).unwrap();
        assert!(movie.genres.is_empty());
        assert_eq!(movie.avg_rating, None);
    }
}
