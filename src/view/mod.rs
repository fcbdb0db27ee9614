//! Render-ready view-models derived from source state.

mod cards;
pub mod formatter;

pub use cards::{
    user_label, ChartPoint, ClusterCard, MovieCard, PopularMovieCard, PopularStats,
    RecommendationList, UserOption, CLUSTERS_LOADING, NO_GENRE_DATA, NO_POPULAR_MOVIES,
    NO_RECOMMENDATIONS,
};
pub use formatter::{
    format_occupation_list, percent_label, rank_label, safe_fixed, safe_percent, FiniteValue,
    FALLBACK,
};
