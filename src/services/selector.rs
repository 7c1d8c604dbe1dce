//! Filters the full series list down to the anime subset.

use crate::config::{IdentificationConfig, IdentificationMode};
use crate::constants::ANIME_GENRE;
use crate::models::SeriesRef;

/// Whether one series counts as anime under the configured mode.
#[must_use]
pub fn is_anime(series: &SeriesRef, config: &IdentificationConfig) -> bool {
    let by_genre = series
        .genres
        .iter()
        .any(|genre| genre.eq_ignore_ascii_case(ANIME_GENRE));
    let by_tag = series
        .tags
        .iter()
        .any(|tag| tag.eq_ignore_ascii_case(&config.tag));

    match config.mode {
        IdentificationMode::Genre => by_genre,
        IdentificationMode::Tag => by_tag,
        IdentificationMode::GenreOrTag => by_genre || by_tag,
        IdentificationMode::GenreAndTag => by_genre && by_tag,
    }
}

/// Pure filter: no network, no mutation. An empty result is a value, not an
/// error.
#[must_use]
pub fn select_anime(series: &[SeriesRef], config: &IdentificationConfig) -> Vec<SeriesRef> {
    series
        .iter()
        .filter(|s| is_anime(s, config))
        .cloned()
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::ItemId;
    use std::collections::HashMap;

    fn series(genres: &[&str], tags: &[&str]) -> SeriesRef {
        SeriesRef {
            id: ItemId::new(),
            name: "Show".to_string(),
            genres: genres.iter().map(|s| (*s).to_string()).collect(),
            tags: tags.iter().map(|s| (*s).to_string()).collect(),
            provider_ids: HashMap::new(),
        }
    }

    fn config(mode: IdentificationMode) -> IdentificationConfig {
        IdentificationConfig {
            mode,
            ..IdentificationConfig::default()
        }
    }

    #[test]
    fn genre_mode_matches_genre_case_insensitively() {
        let cfg = config(IdentificationMode::Genre);
        assert!(is_anime(&series(&["anime", "Comedy"], &[]), &cfg));
        assert!(is_anime(&series(&["Anime"], &[]), &cfg));
        assert!(!is_anime(&series(&["Animation"], &[]), &cfg));
        assert!(!is_anime(&series(&[], &["Anime"]), &cfg));
    }

    #[test]
    fn tag_mode_matches_configured_tag() {
        let cfg = IdentificationConfig {
            mode: IdentificationMode::Tag,
            tag: "japanese-animation".to_string(),
        };
        assert!(is_anime(&series(&[], &["Japanese-Animation"]), &cfg));
        assert!(!is_anime(&series(&["Anime"], &[]), &cfg));
    }

    #[test]
    fn combined_modes() {
        let or_cfg = config(IdentificationMode::GenreOrTag);
        assert!(is_anime(&series(&["Anime"], &[]), &or_cfg));
        assert!(is_anime(&series(&[], &["Anime"]), &or_cfg));
        assert!(!is_anime(&series(&["Drama"], &["Favorites"]), &or_cfg));

        let and_cfg = config(IdentificationMode::GenreAndTag);
        assert!(is_anime(&series(&["Anime"], &["Anime"]), &and_cfg));
        assert!(!is_anime(&series(&["Anime"], &[]), &and_cfg));
        assert!(!is_anime(&series(&[], &["Anime"]), &and_cfg));
    }

    #[test]
    fn no_match_yields_empty_list() {
        let all = vec![series(&["Drama"], &[]), series(&["Documentary"], &[])];
        let selected = select_anime(&all, &config(IdentificationMode::Genre));
        assert!(selected.is_empty());
    }

    #[test]
    fn matching_subset_is_selected() {
        let all = vec![
            series(&["Anime", "Comedy"], &[]),
            series(&["Drama"], &[]),
            series(&["anime"], &[]),
        ];
        let selected = select_anime(&all, &config(IdentificationMode::Genre));
        assert_eq!(selected.len(), 2);
    }
}
