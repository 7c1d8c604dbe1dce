use serde::{Deserialize, Serialize};
use std::collections::HashMap;

use crate::domain::ItemId;

/// Snapshot of an episode item in the host library.
///
/// Season 0 is reserved for specials. `season_number` and `episode_number`
/// are nullable because freshly-imported items may not have been numbered
/// yet; a missing or non-positive number is never treated as zero.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct EpisodeRef {
    pub id: ItemId,
    pub series_id: ItemId,
    pub season_number: Option<u32>,
    pub episode_number: Option<u32>,
    #[serde(default)]
    pub tags: Vec<String>,
    #[serde(default)]
    pub provider_ids: HashMap<String, String>,
}

impl EpisodeRef {
    /// Looks up an external provider id by key, case-insensitively.
    #[must_use]
    pub fn provider_id(&self, key: &str) -> Option<&str> {
        super::provider_lookup(&self.provider_ids, key)
    }

    /// Specials live under season 0 and are excluded from reorganization.
    #[must_use]
    pub const fn is_special(&self) -> bool {
        matches!(self.season_number, Some(0))
    }
}

/// Snapshot of a season container in the host library.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SeasonRef {
    pub id: ItemId,
    pub series_id: ItemId,
    pub number: Option<u32>,
    pub name: String,
}

#[cfg(test)]
mod tests {
    use super::*;

    fn episode(season: Option<u32>) -> EpisodeRef {
        EpisodeRef {
            id: ItemId::new(),
            series_id: ItemId::new(),
            season_number: season,
            episode_number: Some(1),
            tags: vec![],
            provider_ids: HashMap::new(),
        }
    }

    #[test]
    fn season_zero_is_special() {
        assert!(episode(Some(0)).is_special());
        assert!(!episode(Some(1)).is_special());
        assert!(!episode(None).is_special());
    }
}
