use std::{fmt::Display, str::FromStr};

use serde::{Deserialize, Serialize};

/// Ordering criterion for the popular-movies listing
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SortKey {
    #[default]
    RatingCount,
    AvgRating,
    WeightedScore,
}

impl SortKey {
    pub const ALL: [SortKey; 3] = [
        SortKey::RatingCount,
        SortKey::AvgRating,
        SortKey::WeightedScore,
    ];

    /// Value sent as the `sort_by` query parameter
    pub fn as_str(&self) -> &'static str {
        match self {
            SortKey::RatingCount => "rating_count",
            SortKey::AvgRating => "avg_rating",
            SortKey::WeightedScore => "weighted_score",
        }
    }

    /// Human-readable toggle label
    pub fn label(&self) -> &'static str {
        match self {
            SortKey::RatingCount => "Most Rated",
            SortKey::AvgRating => "Highest Rated",
            SortKey::WeightedScore => "Best Overall",
        }
    }
}

impl Display for SortKey {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for SortKey {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        SortKey::ALL
            .into_iter()
            .find(|key| key.as_str() == s)
            .ok_or_else(|| {
                format!(
                    "unknown sort key '{}' (expected rating_count, avg_rating or weighted_score)",
                    s
                )
            })
    }
}

/// Parameters of one `/api/popular-movies` request
///
/// Compared structurally: two queries with the same fields are the same key.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct PopularityQuery {
    pub sort_key: SortKey,
    pub limit: u32,
    pub min_ratings: u32,
}

impl PopularityQuery {
    /// Query-string pairs in the order the endpoint documents them
    pub fn query_pairs(&self) -> [(&'static str, String); 3] {
        [
            ("sort_by", self.sort_key.as_str().to_string()),
            ("limit", self.limit.to_string()),
            ("min_ratings", self.min_ratings.to_string()),
        ]
    }
}
