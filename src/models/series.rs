use serde::{Deserialize, Serialize};
use std::collections::HashMap;

use crate::domain::ItemId;

/// Read-only snapshot of a series item in the host library.
///
/// The engine never mutates series directly; it only reads genres, tags and
/// provider ids to decide which episodes to touch.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SeriesRef {
    pub id: ItemId,
    pub name: String,
    #[serde(default)]
    pub genres: Vec<String>,
    #[serde(default)]
    pub tags: Vec<String>,
    #[serde(default)]
    pub provider_ids: HashMap<String, String>,
}

impl SeriesRef {
    /// Looks up an external provider id by key, case-insensitively.
    /// Blank values count as absent.
    #[must_use]
    pub fn provider_id(&self, key: &str) -> Option<&str> {
        super::provider_lookup(&self.provider_ids, key)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::constants::providers;

    fn series_with(ids: &[(&str, &str)]) -> SeriesRef {
        SeriesRef {
            id: ItemId::new(),
            name: "Test Series".to_string(),
            genres: vec![],
            tags: vec![],
            provider_ids: ids
                .iter()
                .map(|(k, v)| ((*k).to_string(), (*v).to_string()))
                .collect(),
        }
    }

    #[test]
    fn provider_lookup_is_case_insensitive() {
        let series = series_with(&[("tvdb", "12345")]);
        assert_eq!(series.provider_id(providers::TVDB), Some("12345"));
    }

    #[test]
    fn blank_provider_values_count_as_absent() {
        let series = series_with(&[("Tvdb", "  ")]);
        assert_eq!(series.provider_id(providers::TVDB), None);
    }

    #[test]
    fn missing_provider_is_none() {
        let series = series_with(&[("Tvdb", "12345")]);
        assert_eq!(series.provider_id(providers::ANISEARCH), None);
    }
}
