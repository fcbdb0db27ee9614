use serde::Serialize;

use super::formatter::{
    format_occupation_list, percent_label, rank_label, safe_fixed, FiniteValue, FALLBACK,
};
use crate::models::{Cluster, Movie, PopularMovies, User, UserId};

const GENRE_CHIP_LIMIT: usize = 3;
const HIGHLIGHTED_RANKS: usize = 3;
const DEFAULT_GENRE: &str = "default";

pub const NO_GENRE_DATA: &str = "No genre data available.";
pub const NO_RECOMMENDATIONS: &str = "Select a user to see recommendations.";
pub const NO_POPULAR_MOVIES: &str = "No popular movies found.";
pub const CLUSTERS_LOADING: &str = "Loading cluster data...";

/// One `{name, value}` point handed to the chart renderer
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ChartPoint {
    pub name: String,
    pub value: f64,
}

/// Entry of the user picker
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct UserOption {
    pub user_id: UserId,
    pub label: String,
}

impl From<&User> for UserOption {
    fn from(user: &User) -> Self {
        Self {
            user_id: user.user_id,
            label: user_label(user),
        }
    }
}

/// `"User 1 (24, M, technician)"`
pub fn user_label(user: &User) -> String {
    format!(
        "User {} ({}, {}, {})",
        user.user_id, user.age, user.gender, user.occupation
    )
}

/// Display-ready summary of one cluster
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ClusterCard {
    pub title: String,
    pub users: String,
    pub age_mean: String,
    pub age_std: String,
    pub gender_male: String,
    pub gender_female: String,
    pub occupations: Vec<String>,
    /// `None` when there is nothing to chart
    pub genre_chart: Option<Vec<ChartPoint>>,
}

impl ClusterCard {
    pub fn age_line(&self) -> String {
        format!("Avg. Age: {} (Std: {})", self.age_mean, self.age_std)
    }

    pub fn gender_line(&self) -> String {
        format!("Gender: M ({}) | F ({})", self.gender_male, self.gender_female)
    }

    pub fn occupations_line(&self) -> String {
        format!("Top Occupations: {}", self.occupations.join(", "))
    }
}

impl From<&Cluster> for ClusterCard {
    fn from(cluster: &Cluster) -> Self {
        let title = match cluster.cluster {
            Some(id) => format!("Cluster {}", id),
            None => format!("Cluster {}", FALLBACK),
        };

        let chart: Vec<ChartPoint> = cluster
            .genre_preferences
            .iter()
            .filter_map(|pref| {
                pref.value.finite().map(|value| ChartPoint {
                    name: pref.name.clone(),
                    value,
                })
            })
            .collect();

        Self {
            title,
            users: cluster
                .num_users
                .map(|n| n.to_string())
                .unwrap_or_else(|| FALLBACK.to_string()),
            age_mean: safe_fixed(cluster.age_mean, 2, FALLBACK),
            age_std: safe_fixed(cluster.age_std, 2, FALLBACK),
            gender_male: percent_label(cluster.gender_dist.get("M"), 2, FALLBACK),
            gender_female: percent_label(cluster.gender_dist.get("F"), 2, FALLBACK),
            occupations: format_occupation_list(&cluster.top_occupations),
            genre_chart: (!chart.is_empty()).then_some(chart),
        }
    }
}

/// A recommended movie: title plus genre chips
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct MovieCard {
    pub movie_id: u32,
    pub title: String,
    pub genres: Vec<String>,
}

impl From<&Movie> for MovieCard {
    fn from(movie: &Movie) -> Self {
        Self {
            movie_id: movie.movie_id,
            title: movie.title.clone(),
            genres: movie.genres.clone(),
        }
    }
}

/// The recommendations panel for the current selection
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct RecommendationList {
    pub heading: String,
    pub cards: Vec<MovieCard>,
    /// Shown instead of the cards when there are none
    pub empty_message: Option<&'static str>,
}

impl RecommendationList {
    pub fn new(selected_user: Option<UserId>, movies: &[Movie]) -> Self {
        let heading = match selected_user {
            Some(user_id) => format!("Recommendations for User {}", user_id),
            None => "Recommended Movies".to_string(),
        };
        let cards: Vec<MovieCard> = movies.iter().map(MovieCard::from).collect();
        let empty_message = cards.is_empty().then_some(NO_RECOMMENDATIONS);
        Self {
            heading,
            cards,
            empty_message,
        }
    }
}

/// A ranked entry of the popular-movies grid
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct PopularMovieCard {
    pub movie_id: u32,
    pub rank: String,
    pub title: String,
    /// First genre, or `"default"` for the colour lookup
    pub main_genre: String,
    pub genre_chips: Vec<String>,
    /// `"+N"` when more genres exist than chips shown
    pub overflow_chip: Option<String>,
    pub rating_count: String,
    pub avg_rating: String,
    pub weighted_score: String,
    /// Top three entries get an accent border
    pub highlighted: bool,
}

impl PopularMovieCard {
    pub fn new(index: usize, movie: &Movie) -> Self {
        let main_genre = movie
            .genres
            .first()
            .cloned()
            .unwrap_or_else(|| DEFAULT_GENRE.to_string());
        let hidden = movie.genres.len().saturating_sub(GENRE_CHIP_LIMIT);

        Self {
            movie_id: movie.movie_id,
            rank: rank_label(index),
            title: movie.title.clone(),
            main_genre,
            genre_chips: movie.genres.iter().take(GENRE_CHIP_LIMIT).cloned().collect(),
            overflow_chip: (hidden > 0).then(|| format!("+{}", hidden)),
            rating_count: movie
                .rating_count
                .map(|n| n.to_string())
                .unwrap_or_else(|| FALLBACK.to_string()),
            avg_rating: safe_fixed(movie.avg_rating, 1, FALLBACK),
            weighted_score: safe_fixed(movie.weighted_score, 1, FALLBACK),
            highlighted: index < HIGHLIGHTED_RANKS,
        }
    }

    /// Cards for a whole listing, ranked in response order
    pub fn ranked(movies: &[Movie]) -> Vec<Self> {
        movies
            .iter()
            .enumerate()
            .map(|(index, movie)| Self::new(index, movie))
            .collect()
    }
}

/// Summary strip above the popular-movies grid
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct PopularStats {
    pub qualified_movies: String,
    pub average_rating: String,
}

impl PopularStats {
    /// `None` when the response carries no qualified-movie count
    pub fn from_response(popular: &PopularMovies) -> Option<Self> {
        let total = popular.total_movies.filter(|n| *n > 0)?;
        Some(Self {
            qualified_movies: total.to_string(),
            average_rating: safe_fixed(popular.global_mean_rating, 2, FALLBACK),
        })
    }
}
