//! Episode-ordinal resolution over the external authorities.
//!
//! Both sources are unreliable, rate-limited scrape targets; every
//! operation fails closed. Callers must treat `None` as "skip this episode
//! with no mutation", never as zero.

use async_trait::async_trait;
use tracing::debug;

use crate::clients::{AniSearchClient, RequestPacer, TvdbClient, build_http_client};
use crate::config::ResolverConfig;
use crate::constants::providers;
use crate::models::{EpisodeRef, SeriesRef};

/// Resolves show-wide and aired ordinals a library cannot derive locally.
///
/// Implementations hide the parsing strategy behind this seam so tasks can
/// be driven with canned numbers in tests.
#[async_trait]
pub trait OrdinalResolver: Send + Sync {
    /// Absolute episode number from the primary authority. `None` covers
    /// missing identifiers, fetch failures and unparsable markup alike.
    async fn absolute_from_tvdb(
        &self,
        series: &SeriesRef,
        episode: &EpisodeRef,
    ) -> Option<u32>;

    /// Absolute episode number from the secondary authority, keyed only by
    /// the episode's own id there.
    async fn absolute_from_anisearch(&self, episode: &EpisodeRef) -> Option<u32>;

    /// Aired (broadcast-order) season number. Always at least 1: absence of
    /// data is defined as season 1, which is a no-op for the split logic.
    async fn aired_season(&self, series: &SeriesRef, episode: &EpisodeRef) -> u32;

    /// Primary-then-secondary fallback chain. Each attempted fetch pays its
    /// own rate-limit delay; when both sources come up empty the caller
    /// must skip, not guess.
    async fn resolve_absolute(&self, series: &SeriesRef, episode: &EpisodeRef) -> Option<u32> {
        if let Some(number) = self.absolute_from_tvdb(series, episode).await {
            return Some(number);
        }
        self.absolute_from_anisearch(episode).await
    }
}

/// Scrape-backed resolver over the two ordinal clients.
#[derive(Clone)]
pub struct ScrapeOrdinalResolver {
    tvdb: TvdbClient,
    anisearch: AniSearchClient,
}

impl ScrapeOrdinalResolver {
    /// Builds the resolver with its own pooled HTTP client.
    ///
    /// # Errors
    /// Returns an error if the HTTP client cannot be built.
    pub fn new(config: &ResolverConfig) -> anyhow::Result<Self> {
        let client = build_http_client(config.request_timeout())?;
        Ok(Self::with_shared_client(config, client))
    }

    /// Builds the resolver on an existing pooled client, the preferred
    /// constructor when the host already owns one.
    #[must_use]
    pub fn with_shared_client(config: &ResolverConfig, client: reqwest::Client) -> Self {
        let pacer = RequestPacer::new(config.request_delay());
        Self {
            tvdb: TvdbClient::new(config.tvdb_base_url.clone(), client.clone(), pacer.clone()),
            anisearch: AniSearchClient::new(config.anisearch_base_url.clone(), client, pacer),
        }
    }

    /// Numeric series id preferred, slug as fallback. No identifier means
    /// no request and no delay.
    fn series_key(series: &SeriesRef) -> Option<&str> {
        series
            .provider_id(providers::TVDB)
            .or_else(|| series.provider_id(providers::TVDB_SLUG))
    }
}

#[async_trait]
impl OrdinalResolver for ScrapeOrdinalResolver {
    async fn absolute_from_tvdb(&self, series: &SeriesRef, episode: &EpisodeRef) -> Option<u32> {
        let episode_id = episode.provider_id(providers::TVDB)?;
        let series_key = Self::series_key(series)?;
        let number = self.tvdb.absolute_number(series_key, episode_id).await;
        debug!(series = %series.name, episode_id, ?number, "tvdb absolute lookup");
        number
    }

    async fn absolute_from_anisearch(&self, episode: &EpisodeRef) -> Option<u32> {
        let episode_id = episode.provider_id(providers::ANISEARCH)?;
        let number = self.anisearch.episode_ordinal(episode_id).await;
        debug!(episode_id, ?number, "anisearch absolute lookup");
        number
    }

    async fn aired_season(&self, series: &SeriesRef, episode: &EpisodeRef) -> u32 {
        let Some(episode_id) = episode.provider_id(providers::TVDB) else {
            return 1;
        };
        let Some(series_key) = Self::series_key(series) else {
            return 1;
        };
        self.tvdb.aired_season(series_key, episode_id).await
    }
}
