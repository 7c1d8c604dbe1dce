use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::fmt;

/// Map from absolute episode number to status, built fresh per series on
/// every classification run and never persisted.
pub type FillerTable = BTreeMap<u32, FillerStatus>;

/// Canon/filler status of an episode.
///
/// The four labels form a closed set; at most one of them may appear in an
/// episode's tag set at any time.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum FillerStatus {
    MangaCanon,
    MixedCanonFiller,
    Filler,
    AnimeCanon,
}

impl FillerStatus {
    pub const ALL: [Self; 4] = [
        Self::MangaCanon,
        Self::MixedCanonFiller,
        Self::Filler,
        Self::AnimeCanon,
    ];

    /// Canonical label, as it appears both in the source table and in the
    /// tag set of a classified episode.
    #[must_use]
    pub const fn label(self) -> &'static str {
        match self {
            Self::MangaCanon => "Manga Canon",
            Self::MixedCanonFiller => "Mixed Canon/Filler",
            Self::Filler => "Filler",
            Self::AnimeCanon => "Anime Canon",
        }
    }

    /// Parses a label from the source table or a tag set. Case-insensitive,
    /// surrounding whitespace ignored; anything outside the closed set is
    /// `None`.
    #[must_use]
    pub fn from_label(label: &str) -> Option<Self> {
        let label = label.trim();
        Self::ALL
            .into_iter()
            .find(|status| label.eq_ignore_ascii_case(status.label()))
    }
}

impl fmt::Display for FillerStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn labels_roundtrip() {
        for status in FillerStatus::ALL {
            assert_eq!(FillerStatus::from_label(status.label()), Some(status));
        }
    }

    #[test]
    fn label_parsing_is_case_insensitive_and_trims() {
        assert_eq!(
            FillerStatus::from_label("  manga canon "),
            Some(FillerStatus::MangaCanon)
        );
        assert_eq!(
            FillerStatus::from_label("MIXED CANON/FILLER"),
            Some(FillerStatus::MixedCanonFiller)
        );
    }

    #[test]
    fn unknown_labels_are_rejected() {
        assert_eq!(FillerStatus::from_label("Recap"), None);
        assert_eq!(FillerStatus::from_label(""), None);
        assert_eq!(FillerStatus::from_label("Fillerish"), None);
    }
}
