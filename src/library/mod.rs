//! The seam between the engine and the host media library.
//!
//! The engine never owns storage: it reads item snapshots through
//! [`MediaLibrary`] and requests every mutation one item at a time. Each
//! successful mutation is immediately durable on the host side and
//! independent of later failures; there is no batch transaction.

use async_trait::async_trait;
use thiserror::Error;

use crate::domain::ItemId;
use crate::models::{EpisodeRef, SeasonRef, SeriesRef};

/// Errors surfaced by the host library collaborator.
#[derive(Debug, Error)]
pub enum LibraryError {
    #[error("item not found: {0}")]
    NotFound(ItemId),

    #[error("library query failed: {0}")]
    Query(String),

    #[error("item update rejected: {0}")]
    Update(String),
}

/// Kind of change carried by an update call, mirroring the host's item
/// update contract.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum UpdateKind {
    /// Locally-decided metadata change (season/episode numbers, tags).
    MetadataEdit,
    /// Metadata pulled in from an external provider.
    MetadataImport,
}

/// Host library collaborator.
///
/// The engine issues calls strictly sequentially; implementations do not
/// need to handle concurrent calls from it.
#[async_trait]
pub trait MediaLibrary: Send + Sync {
    /// All series-like items in the library.
    async fn series(&self) -> Result<Vec<SeriesRef>, LibraryError>;

    /// All episodes of one series, specials included.
    async fn episodes(&self, series: &ItemId) -> Result<Vec<EpisodeRef>, LibraryError>;

    /// All season containers of one series.
    async fn seasons(&self, series: &ItemId) -> Result<Vec<SeasonRef>, LibraryError>;

    /// Persists an updated episode snapshot. A failure affects only this
    /// episode; earlier updates stay applied.
    async fn update_episode(
        &self,
        episode: &EpisodeRef,
        kind: UpdateKind,
    ) -> Result<(), LibraryError>;

    /// Persists an updated season snapshot (rename).
    async fn update_season(&self, season: &SeasonRef, kind: UpdateKind)
    -> Result<(), LibraryError>;

    /// Requests a non-destructive metadata refresh for a series.
    async fn refresh_metadata(&self, series: &ItemId) -> Result<(), LibraryError>;

    /// Deletes an emptied season container.
    async fn delete_season(&self, season: &ItemId) -> Result<(), LibraryError>;
}
