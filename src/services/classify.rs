//! Canon/filler classification over the anime subset of the library.
//!
//! Per series the filler table is rebuilt fresh from the external source;
//! per episode the absolute number comes from the resolver fallback chain
//! and the matching label is applied as a tag. Every failure mode is a
//! logged skip of that one unit of work, never a task failure.

use std::sync::Arc;
use std::time::Instant;
use tokio_util::sync::CancellationToken;
use tracing::{debug, info, warn};

use crate::clients::FillerSource;
use crate::clients::fillerlist::slugify;
use crate::config::Config;
use crate::library::{MediaLibrary, UpdateKind};
use crate::resolver::OrdinalResolver;
use crate::services::progress::{TaskProgress, series_fraction};
use crate::services::selector::select_anime;
use crate::services::tags::{has_filler_status, reconcile_filler_tags};
use crate::services::TaskError;

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ClassifySummary {
    pub series_processed: usize,
    pub series_without_data: usize,
    pub episodes_tagged: usize,
    pub episodes_already_labeled: usize,
    pub episodes_unresolved: usize,
    pub episodes_failed: usize,
}

pub struct ClassificationTask {
    library: Arc<dyn MediaLibrary>,
    resolver: Arc<dyn OrdinalResolver>,
    filler: Arc<dyn FillerSource>,
    config: Config,
}

impl ClassificationTask {
    #[must_use]
    pub fn new(
        library: Arc<dyn MediaLibrary>,
        resolver: Arc<dyn OrdinalResolver>,
        filler: Arc<dyn FillerSource>,
        config: Config,
    ) -> Self {
        Self {
            library,
            resolver,
            filler,
            config,
        }
    }

    pub async fn run(
        &self,
        progress: &TaskProgress,
        cancel: &CancellationToken,
    ) -> Result<ClassifySummary, TaskError> {
        let started = Instant::now();
        let all_series = self.library.series().await?;
        let candidates = select_anime(&all_series, &self.config.identification);
        let total = candidates.len();

        let mut summary = ClassifySummary::default();

        for (series_index, series) in candidates.iter().enumerate() {
            if cancel.is_cancelled() {
                return Err(TaskError::Cancelled);
            }

            let slug = slugify(&series.name);
            let table = self.filler.filler_table(&slug).await;
            if table.is_empty() {
                debug!(series = %series.name, slug, "no filler data for series, skipping");
                summary.series_without_data += 1;
                progress.report(series_fraction(series_index + 1, total, 0, 0));
                continue;
            }

            let episodes = self.library.episodes(&series.id).await?;
            let episode_count = episodes.len();

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

                if has_filler_status(&episode.tags) {
                    summary.episodes_already_labeled += 1;
                    continue;
                }

                let Some(absolute) = self.resolver.resolve_absolute(series, episode).await else {
                    summary.episodes_unresolved += 1;
                    continue;
                };
                let Some(status) = table.get(&absolute).copied() else {
                    debug!(
                        series = %series.name,
                        absolute,
                        "episode not listed in filler table"
                    );
                    summary.episodes_unresolved += 1;
                    continue;
                };

                let mut updated = episode.clone();
                updated.tags = reconcile_filler_tags(&episode.tags, Some(status));

                match self
                    .library
                    .update_episode(&updated, UpdateKind::MetadataEdit)
                    .await
                {
                    Ok(()) => summary.episodes_tagged += 1,
                    Err(e) => {
                        warn!(
                            series = %series.name,
                            episode = %episode.id,
                            error = %e,
                            "failed to apply status tag"
                        );
                        summary.episodes_failed += 1;
                    }
                }
            }

            summary.series_processed += 1;
            progress.report(series_fraction(series_index + 1, total, 0, 0));
        }

        info!(
            event = "job_finished",
            job_name = "classify_filler",
            duration_ms = u64::try_from(started.elapsed().as_millis()).unwrap_or(u64::MAX),
            series = summary.series_processed,
            tagged = summary.episodes_tagged,
            "Classification finished"
        );

        Ok(summary)
    }
}
