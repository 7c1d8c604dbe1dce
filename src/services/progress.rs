use tokio::sync::watch;

/// Fractional progress of one task run.
///
/// Values are clamped to `[0, 1]` and only ever move forward, so consumers
/// see a monotonically non-decreasing fraction even if a task reports a
/// stale value after a skip-heavy stretch.
#[derive(Debug)]
pub struct TaskProgress {
    tx: watch::Sender<f64>,
}

impl TaskProgress {
    #[must_use]
    pub fn new() -> Self {
        let (tx, _) = watch::channel(0.0);
        Self { tx }
    }

    /// Receiver side for the host's progress display.
    #[must_use]
    pub fn subscribe(&self) -> watch::Receiver<f64> {
        self.tx.subscribe()
    }

    pub fn report(&self, fraction: f64) {
        let fraction = fraction.clamp(0.0, 1.0);
        if fraction > *self.tx.borrow() {
            let _ = self.tx.send_replace(fraction);
        }
    }

    #[must_use]
    pub fn current(&self) -> f64 {
        *self.tx.borrow()
    }
}

impl Default for TaskProgress {
    fn default() -> Self {
        Self::new()
    }
}

/// Progress of `episode_index / episode_count` within series
/// `series_index / series_total`, the shape every task reports in.
#[must_use]
pub(crate) fn series_fraction(
    series_index: usize,
    series_total: usize,
    episode_index: usize,
    episode_count: usize,
) -> f64 {
    if series_total == 0 {
        return 1.0;
    }
    let within = if episode_count == 0 {
        0.0
    } else {
        episode_index as f64 / episode_count as f64
    };
    (series_index as f64 + within) / series_total as f64
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn progress_is_monotone_and_clamped() {
        let progress = TaskProgress::new();
        progress.report(0.5);
        progress.report(0.25);
        assert!((progress.current() - 0.5).abs() < f64::EPSILON);

        progress.report(7.0);
        assert!((progress.current() - 1.0).abs() < f64::EPSILON);
    }

    #[test]
    fn subscriber_sees_updates() {
        let progress = TaskProgress::new();
        let rx = progress.subscribe();
        progress.report(0.75);
        assert!((*rx.borrow() - 0.75).abs() < f64::EPSILON);
    }

    #[test]
    fn fraction_handles_empty_inputs() {
        assert!((series_fraction(0, 0, 0, 0) - 1.0).abs() < f64::EPSILON);
        assert!((series_fraction(1, 4, 0, 0) - 0.25).abs() < f64::EPSILON);
        assert!((series_fraction(1, 4, 6, 12) - 0.375).abs() < f64::EPSILON);
    }
}
