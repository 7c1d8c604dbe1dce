pub mod classify;
pub mod merge;
pub mod progress;
pub mod selector;
pub mod split;
pub mod tags;

pub use classify::{ClassificationTask, ClassifySummary};
pub use merge::{MergeSummary, SeasonMergeTask};
pub use progress::TaskProgress;
pub use selector::{is_anime, select_anime};
pub use split::{SeasonSplitTask, SplitSummary};
pub use tags::{has_filler_status, reconcile_filler_tags};

use thiserror::Error;

use crate::library::LibraryError;

/// Hard failures of a task run.
///
/// Per-item problems (unresolved lookups, rejected updates, failed
/// refreshes) are logged skips and never surface here; only cancellation
/// and a library that cannot even list its items end a run early.
#[derive(Debug, Error)]
pub enum TaskError {
    #[error("task cancelled")]
    Cancelled,

    #[error(transparent)]
    Library(#[from] LibraryError),
}
