use std::fmt;

use serde::{
    de::{IgnoredAny, MapAccess, SeqAccess, Visitor},
    Deserialize, Deserializer, Serialize,
};
use serde_json::Value;

use super::lenient;

/// Label → ratio pairs kept in the order the API sent them
///
/// Used for `gender_dist` and `top_occupations`, where document order is the display
/// order. Values that are null or not finite numbers are kept as `None` so the label
/// still renders with a fallback.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct OrderedRatios(Vec<(String, Option<f64>)>);

impl OrderedRatios {
    pub fn new(entries: Vec<(String, Option<f64>)>) -> Self {
        Self(entries)
    }

    /// Ratio for a label; `None` when the label is missing or its value unusable
    pub fn get(&self, label: &str) -> Option<f64> {
        self.0
            .iter()
            .find(|(key, _)| key == label)
            .and_then(|(_, value)| *value)
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, Option<f64>)> {
        self.0.iter().map(|(key, value)| (key.as_str(), *value))
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }
}

impl<'de> Deserialize<'de> for OrderedRatios {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: Deserializer<'de>,
    {
        deserializer.deserialize_any(OrderedRatiosVisitor)
    }
}

struct OrderedRatiosVisitor;

impl<'de> Visitor<'de> for OrderedRatiosVisitor {
    type Value = OrderedRatios;

    fn expecting(&self, f: &mut fmt::Formatter) -> fmt::Result {
        f.write_str("a map of labels to ratios")
    }

    fn visit_map<A>(self, mut map: A) -> Result<Self::Value, A::Error>
    where
        A: MapAccess<'de>,
    {
        let mut entries = Vec::with_capacity(map.size_hint().unwrap_or(0));
        while let Some((label, value)) = map.next_entry::<String, Value>()? {
            entries.push((label, lenient::finite_number(&value)));
        }
        Ok(OrderedRatios(entries))
    }

    // Anything that is not an object is treated as an empty distribution

    fn visit_seq<A>(self, mut seq: A) -> Result<Self::Value, A::Error>
    where
        A: SeqAccess<'de>,
    {
        while seq.next_element::<IgnoredAny>()?.is_some() {}
        Ok(OrderedRatios::default())
    }

    fn visit_unit<E>(self) -> Result<Self::Value, E> {
        Ok(OrderedRatios::default())
    }

    fn visit_none<E>(self) -> Result<Self::Value, E> {
        Ok(OrderedRatios::default())
    }

    fn visit_bool<E>(self, _: bool) -> Result<Self::Value, E> {
        Ok(OrderedRatios::default())
    }

    fn visit_i64<E>(self, _: i64) -> Result<Self::Value, E> {
        Ok(OrderedRatios::default())
    }

    fn visit_u64<E>(self, _: u64) -> Result<Self::Value, E> {
        Ok(OrderedRatios::default())
    }

    fn visit_f64<E>(self, _: f64) -> Result<Self::Value, E> {
        Ok(OrderedRatios::default())
    }

    fn visit_str<E>(self, _: &str) -> Result<Self::Value, E> {
        Ok(OrderedRatios::default())
    }
}

/// One bar of a cluster's genre-preference chart
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct GenrePreference {
    pub name: String,
    /// Mean rating in `[0, 5]` when present
    #[serde(default, deserialize_with = "lenient::finite_f64")]
    pub value: Option<f64>,
}

/// Demographic and taste summary of one user cluster
///
/// Every numeric field is optional: the clustering backend may omit it, send `null`,
/// or send something that is not a finite number.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Cluster {
    #[serde(default, deserialize_with = "lenient::integer")]
    pub cluster: Option<i64>,
    #[serde(default, deserialize_with = "lenient::count")]
    pub num_users: Option<u64>,
    #[serde(default, deserialize_with = "lenient::finite_f64")]
    pub age_mean: Option<f64>,
    #[serde(default, deserialize_with = "lenient::finite_f64")]
    pub age_std: Option<f64>,
    #[serde(default)]
    pub gender_dist: OrderedRatios,
    #[serde(default)]
    pub top_occupations: OrderedRatios,
    #[serde(default, deserialize_with = "lenient::null_as_default")]
    pub genre_preferences: Vec<GenrePreference>,
}
