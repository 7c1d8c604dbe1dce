pub mod episode;
pub mod filler;
pub mod series;

pub use episode::{EpisodeRef, SeasonRef};
pub use filler::{FillerStatus, FillerTable};
pub use series::SeriesRef;

use std::collections::HashMap;

/// Provider-id lookup shared by [`SeriesRef`] and [`EpisodeRef`]. Host
/// libraries are inconsistent about key casing ("Tvdb" vs "tvdb"), and an
/// empty value is as useless as a missing one.
pub(crate) fn provider_lookup<'a>(ids: &'a HashMap<String, String>, key: &str) -> Option<&'a str> {
    ids.iter()
        .find(|(k, _)| k.eq_ignore_ascii_case(key))
        .map(|(_, v)| v.trim())
        .filter(|v| !v.is_empty())
}
