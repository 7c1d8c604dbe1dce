//! Merges multi-season anime back into a single season.
//!
//! Moving episodes is safe only when their numbering stays unambiguous, so
//! the series' existing numbering pattern is classified first: a strictly
//! sequential `1..=n` set can be moved as-is, anything else gets its
//! numbers recomputed through the resolver fallback chain. Season
//! containers are only deleted after every episode move for the series was
//! issued and did not fail.

use std::sync::Arc;
use std::time::Instant;
use tokio_util::sync::CancellationToken;
use tracing::{debug, info, warn};

use crate::config::Config;
use crate::library::{MediaLibrary, UpdateKind};
use crate::models::{EpisodeRef, SeriesRef};
use crate::resolver::OrdinalResolver;
use crate::services::TaskError;
use crate::services::progress::{TaskProgress, series_fraction};
use crate::services::selector::select_anime;

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct MergeSummary {
    pub series_modified: usize,
    pub episodes_moved: usize,
    pub episodes_renumbered: usize,
    pub episodes_failed: usize,
    pub seasons_deleted: usize,
    pub seasons_renamed: usize,
}

/// Existing absolute-numbering pattern of a series' non-special episodes.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum NumberingPattern {
    /// Distinct numbers are exactly `1..=count`; safe to keep as-is.
    SequentialAbsolute,
    /// Episode number 1 occurs more than once, the signature of
    /// independent per-season numbering.
    Ambiguous,
    /// Neither sequential nor provably per-season; renumber to be safe.
    Irregular,
}

fn classify_numbering(numbers: &[u32]) -> NumberingPattern {
    let ones = numbers.iter().filter(|&&n| n == 1).count();
    if ones > 1 {
        return NumberingPattern::Ambiguous;
    }

    let mut distinct = numbers.to_vec();
    distinct.sort_unstable();
    distinct.dedup();

    let sequential = distinct.len() == numbers.len()
        && distinct
            .iter()
            .enumerate()
            .all(|(index, &n)| n as usize == index + 1);

    if sequential {
        NumberingPattern::SequentialAbsolute
    } else {
        NumberingPattern::Irregular
    }
}

pub struct SeasonMergeTask {
    library: Arc<dyn MediaLibrary>,
    resolver: Arc<dyn OrdinalResolver>,
    config: Config,
}

impl SeasonMergeTask {
    #[must_use]
    pub fn new(
        library: Arc<dyn MediaLibrary>,
        resolver: Arc<dyn OrdinalResolver>,
        config: Config,
    ) -> Self {
        Self {
            library,
            resolver,
            config,
        }
    }

    pub async fn run(
        &self,
        progress: &TaskProgress,
        cancel: &CancellationToken,
    ) -> Result<MergeSummary, TaskError> {
        let started = Instant::now();
        let all_series = self.library.series().await?;
        let candidates = select_anime(&all_series, &self.config.identification);
        let total = candidates.len();

        let mut summary = MergeSummary::default();

        for (series_index, series) in candidates.iter().enumerate() {
            if cancel.is_cancelled() {
                return Err(TaskError::Cancelled);
            }

            self.merge_series(series, series_index, total, progress, cancel, &mut summary)
                .await?;

            progress.report(series_fraction(series_index + 1, total, 0, 0));
        }

        info!(
            event = "job_finished",
            job_name = "merge_seasons",
            duration_ms = u64::try_from(started.elapsed().as_millis()).unwrap_or(u64::MAX),
            series_modified = summary.series_modified,
            episodes_moved = summary.episodes_moved,
            seasons_deleted = summary.seasons_deleted,
            "Season merge finished"
        );

        Ok(summary)
    }

    async fn merge_series(
        &self,
        series: &SeriesRef,
        series_index: usize,
        series_total: usize,
        progress: &TaskProgress,
        cancel: &CancellationToken,
        summary: &mut MergeSummary,
    ) -> Result<(), TaskError> {
        let episodes = self.library.episodes(&series.id).await?;
        let non_special: Vec<&EpisodeRef> =
            episodes.iter().filter(|e| !e.is_special()).collect();
        let episode_count = non_special.len();

        let numbers: Vec<u32> = non_special
            .iter()
            .filter_map(|e| e.episode_number)
            .filter(|&n| n > 0)
            .collect();
        let pattern = classify_numbering(&numbers);
        let needs_renumber = pattern != NumberingPattern::SequentialAbsolute;
        debug!(series = %series.name, ?pattern, "numbering pattern");

        let mut modified = false;
        let mut all_moves_ok = true;

        for (episode_index, episode) in non_special.iter().enumerate() {
            if cancel.is_cancelled() {
                return Err(TaskError::Cancelled);
            }
            progress.report(series_fraction(
                series_index,
                series_total,
                episode_index,
                episode_count,
            ));

            if episode.season_number == Some(1) {
                continue;
            }

            let mut updated = (*episode).clone();
            updated.season_number = Some(1);

            if needs_renumber {
                // Never overwrite a stored number with an unresolved value.
                if let Some(number) = self.resolver.resolve_absolute(series, episode).await {
                    if updated.episode_number != Some(number) {
                        summary.episodes_renumbered += 1;
                    }
                    updated.episode_number = Some(number);
                }
            }

            match self
                .library
                .update_episode(&updated, UpdateKind::MetadataEdit)
                .await
            {
                Ok(()) => {
                    summary.episodes_moved += 1;
                    modified = true;
                }
                Err(e) => {
                    warn!(
                        series = %series.name,
                        episode = %episode.id,
                        error = %e,
                        "failed to move episode into season 1"
                    );
                    summary.episodes_failed += 1;
                    all_moves_ok = false;
                }
            }
        }

        if !modified {
            return Ok(());
        }
        summary.series_modified += 1;

        if !self.config.reorg.refresh_after_reorg {
            return Ok(());
        }

        if let Err(e) = self.library.refresh_metadata(&series.id).await {
            warn!(series = %series.name, error = %e, "metadata refresh failed");
        }

        let seasons = match self.library.seasons(&series.id).await {
            Ok(seasons) => seasons,
            Err(e) => {
                warn!(series = %series.name, error = %e, "failed to enumerate seasons");
                return Ok(());
            }
        };

        for season in seasons {
            match season.number {
                Some(1) => {
                    let target = &self.config.reorg.single_season_name;
                    if self.config.reorg.rename_single_season
                        && !season.name.eq_ignore_ascii_case(target)
                    {
                        let mut renamed = season.clone();
                        renamed.name = target.clone();
                        match self
                            .library
                            .update_season(&renamed, UpdateKind::MetadataEdit)
                            .await
                        {
                            Ok(()) => summary.seasons_renamed += 1,
                            Err(e) => {
                                warn!(season = %season.id, error = %e, "failed to rename season");
                            }
                        }
                    }
                }
                Some(number) if number > 1 => {
                    // Precondition: every episode of this series has been
                    // moved out and none of the moves failed.
                    if !all_moves_ok {
                        warn!(
                            series = %series.name,
                            season = number,
                            "skipping season delete, not all episode moves succeeded"
                        );
                        continue;
                    }
                    match self.library.delete_season(&season.id).await {
                        Ok(()) => summary.seasons_deleted += 1,
                        Err(e) => {
                            warn!(season = %season.id, error = %e, "failed to delete season");
                        }
                    }
                }
                // Season 0 (specials) and unnumbered containers stay.
                _ => {}
            }
        }

        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn sequential_numbering_is_detected() {
        assert_eq!(
            classify_numbering(&[3, 1, 2, 4]),
            NumberingPattern::SequentialAbsolute
        );
        assert_eq!(classify_numbering(&[1]), NumberingPattern::SequentialAbsolute);
        // No positive numbers at all: nothing to renumber against.
        assert_eq!(classify_numbering(&[]), NumberingPattern::SequentialAbsolute);
    }

    #[test]
    fn duplicate_ones_are_ambiguous() {
        assert_eq!(classify_numbering(&[1, 2, 1, 2]), NumberingPattern::Ambiguous);
        assert_eq!(classify_numbering(&[1, 1]), NumberingPattern::Ambiguous);
    }

    #[test]
    fn gaps_and_duplicates_are_irregular() {
        assert_eq!(classify_numbering(&[1, 2, 4]), NumberingPattern::Irregular);
        assert_eq!(classify_numbering(&[2, 3, 4]), NumberingPattern::Irregular);
        assert_eq!(classify_numbering(&[1, 2, 2]), NumberingPattern::Irregular);
    }
}
