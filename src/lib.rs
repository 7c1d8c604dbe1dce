//! Canon/filler classification and season reorganization engine for anime
//! libraries. The host supplies item snapshots and persistence through the
//! [`library::MediaLibrary`] seam; the engine resolves episode ordinals from
//! external authorities and applies tags and season structure on top.

pub mod clients;
pub mod config;
pub mod constants;
pub mod domain;
pub mod library;
pub mod models;
pub mod resolver;
pub mod services;

pub use config::{Config, IdentificationMode};
pub use domain::ItemId;
pub use library::{LibraryError, MediaLibrary, UpdateKind};
pub use models::{EpisodeRef, FillerStatus, FillerTable, SeasonRef, SeriesRef};
pub use resolver::{OrdinalResolver, ScrapeOrdinalResolver};
pub use services::{
    ClassificationTask, SeasonMergeTask, SeasonSplitTask, TaskError, TaskProgress,
};
