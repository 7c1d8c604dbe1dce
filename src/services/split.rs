//! Splits provider-flat anime into their aired seasons.
//!
//! The primary metadata provider may store a long-running anime as one
//! unbroken season while broadcast grouped it into several. Each episode's
//! aired season comes from the resolver; only episodes whose stored season
//! actually differs are touched, so a re-run over an already-split series
//! is a provable no-op.

use std::sync::Arc;
use std::time::Instant;
use tokio_util::sync::CancellationToken;
use tracing::{info, warn};

use crate::config::Config;
use crate::constants::providers;
use crate::library::{MediaLibrary, UpdateKind};
use crate::resolver::OrdinalResolver;
use crate::services::TaskError;
use crate::services::progress::{TaskProgress, series_fraction};
use crate::services::selector::select_anime;

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct SplitSummary {
    pub series_modified: usize,
    pub episodes_moved: usize,
    pub episodes_unchanged: usize,
    pub episodes_failed: usize,
}

pub struct SeasonSplitTask {
    library: Arc<dyn MediaLibrary>,
    resolver: Arc<dyn OrdinalResolver>,
    config: Config,
}

impl SeasonSplitTask {
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
    ) -> Result<SplitSummary, TaskError> {
        let started = Instant::now();
        let all_series = self.library.series().await?;
        let candidates = select_anime(&all_series, &self.config.identification);
        let total = candidates.len();

        let mut summary = SplitSummary::default();

        for (series_index, series) in candidates.iter().enumerate() {
            if cancel.is_cancelled() {
                return Err(TaskError::Cancelled);
            }

            let episodes = self.library.episodes(&series.id).await?;
            let episode_count = episodes.len();
            let mut modified = false;

            for (episode_index, episode) in episodes.iter().enumerate() {
                if cancel.is_cancelled() {
                    return Err(TaskError::Cancelled);
                }
                progress.report(series_fraction(
                    series_index,
                    total,
                    episode_index,
                    episode_count,
                ));

                // Specials stay under season 0.
                if episode.is_special() {
                    continue;
                }
                if episode.provider_id(providers::TVDB).is_none() {
                    continue;
                }

                let aired = self.resolver.aired_season(series, episode).await;
                if aired <= 1 || episode.season_number == Some(aired) {
                    summary.episodes_unchanged += 1;
                    continue;
                }

                let mut updated = episode.clone();
                updated.season_number = Some(aired);

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
                            aired,
                            error = %e,
                            "failed to move episode to aired season"
                        );
                        summary.episodes_failed += 1;
                    }
                }
            }

            if modified {
                summary.series_modified += 1;
                if self.config.reorg.refresh_after_reorg
                    && let Err(e) = self.library.refresh_metadata(&series.id).await
                {
                    // Applied episode moves stay; the refresh is best-effort.
                    warn!(series = %series.name, error = %e, "metadata refresh failed");
                }
            }

            progress.report(series_fraction(series_index + 1, total, 0, 0));
        }

        info!(
            event = "job_finished",
            job_name = "split_seasons",
            duration_ms = u64::try_from(started.elapsed().as_millis()).unwrap_or(u64::MAX),
            series_modified = summary.series_modified,
            episodes_moved = summary.episodes_moved,
            "Season split finished"
        );

        Ok(summary)
    }
}
