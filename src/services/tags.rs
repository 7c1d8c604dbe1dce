//! Idempotent application of status labels to episode tag sets.

use std::collections::HashSet;

use crate::models::FillerStatus;

/// Whether the tag set already carries one of the four status labels.
///
/// Classification skips such episodes entirely, which makes a pass
/// non-overwriting: re-running only affects episodes that have never been
/// labeled.
#[must_use]
pub fn has_filler_status(tags: &[String]) -> bool {
    tags.iter().any(|tag| FillerStatus::from_label(tag).is_some())
}

/// Rebuilds a tag set with at most one status label.
///
/// Every label in the closed status set is removed first, even when the new
/// status is the same, then the new label (if any) is appended and the set
/// is deduplicated. Non-status tags keep their relative order.
#[must_use]
pub fn reconcile_filler_tags(current: &[String], new: Option<FillerStatus>) -> Vec<String> {
    let mut tags: Vec<String> = current
        .iter()
        .filter(|tag| FillerStatus::from_label(tag).is_none())
        .cloned()
        .collect();

    if let Some(status) = new {
        tags.push(status.label().to_string());
    }

    let mut seen = HashSet::new();
    tags.retain(|tag| seen.insert(tag.clone()));
    tags
}
