/// Rolling time-remaining estimate derived from epoch-completion cadence.
///
/// Epochs complete at irregular wall-clock intervals; the estimator averages
/// the observed gaps and projects them over the epochs still to run. Between
/// completions a one-per-second `tick` keeps the displayed countdown live.
/// A fresh estimate always overrides the ticking value immediately.
#[derive(Debug, Default)]
pub struct EtaEstimator {
    completions: Vec<f64>,
    remaining:   Option<f64>,
}

impl EtaEstimator {
    pub fn new() -> EtaEstimator {
        EtaEstimator::default()
    }

    /// Records an epoch-completion timestamp, seconds on any monotonic-ish
    /// scale. Irregularities (duplicate or backwards stamps) are tolerated;
    /// `estimate` filters them.
    pub fn on_epoch_completed(&mut self, now_secs: f64) {
        self.completions.push(now_secs);
    }

    /// Recomputes the projection from the completion history.
    ///
    /// Consecutive deltas are computed, non-positive ones discarded (clock
    /// irregularities, duplicate stamps), the rest averaged and multiplied by
    /// `remaining_epochs`. Returns `None` when fewer than two valid
    /// completions exist; the previously stored value persists in that case.
    pub fn estimate(&mut self, remaining_epochs: usize) -> Option<f64> {
        let deltas: Vec<f64> = self
            .completions
            .windows(2)
            .map(|w| w[1] - w[0])
            .filter(|d| *d > 0.0)
            .collect();
        if deltas.is_empty() {
            return None;
        }

        let avg = deltas.iter().sum::<f64>() / deltas.len() as f64;
        let projected = avg * remaining_epochs as f64;
        self.remaining = Some(projected);
        Some(projected)
    }

    /// One countdown step: minus one second, floored at zero. A no-op until
    /// the first estimate exists.
    pub fn tick(&mut self) {
        if let Some(remaining) = &mut self.remaining {
            *remaining = (*remaining - 1.0).max(0.0);
        }
    }

    /// Current countdown value, if any estimate has been made.
    pub fn remaining_seconds(&self) -> Option<f64> {
        self.remaining
    }

    /// Formatted countdown for display, or `None` before the first estimate.
    pub fn display(&self) -> Option<String> {
        self.remaining.map(format_eta)
    }

    /// Forgets all completions and the current estimate.
    pub fn reset(&mut self) {
        self.completions.clear();
        self.remaining = None;
    }
}

/// Formats seconds as the countdown label, e.g. `ETA: 2m 10s`.
pub fn format_eta(seconds: f64) -> String {
    let minutes = (seconds / 60.0).floor() as u64;
    let secs_left = (seconds % 60.0).floor() as u64;
    format!("ETA: {}m {}s", minutes, secs_left)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn ignores_non_positive_deltas() {
        let mut eta = EtaEstimator::new();
        // Duplicate stamp at 100: the zero delta must not drag the average.
        eta.on_epoch_completed(100.0);
        eta.on_epoch_completed(100.0);
        eta.on_epoch_completed(130.0);
        assert_eq!(eta.estimate(4), Some(120.0));
    }

    #[test]
    fn no_estimate_until_two_valid_completions() {
        let mut eta = EtaEstimator::new();
        assert_eq!(eta.estimate(10), None);
        eta.on_epoch_completed(100.0);
        assert_eq!(eta.estimate(10), None);
        assert_eq!(eta.remaining_seconds(), None);
        assert_eq!(eta.display(), None);
    }

    #[test]
    fn failed_recompute_keeps_previous_value() {
        let mut eta = EtaEstimator::new();
        eta.on_epoch_completed(10.0);
        eta.on_epoch_completed(20.0);
        assert_eq!(eta.estimate(3), Some(30.0));

        let mut backwards = EtaEstimator::new();
        backwards.on_epoch_completed(20.0);
        backwards.on_epoch_completed(10.0);
        assert_eq!(backwards.estimate(3), None);
        assert_eq!(backwards.remaining_seconds(), None);
    }

    #[test]
    fn tick_counts_down_and_floors_at_zero() {
        let mut eta = EtaEstimator::new();
        eta.on_epoch_completed(0.0);
        eta.on_epoch_completed(2.0);
        eta.estimate(1);
        assert_eq!(eta.remaining_seconds(), Some(2.0));
        eta.tick();
        assert_eq!(eta.remaining_seconds(), Some(1.0));
        eta.tick();
        eta.tick();
        assert_eq!(eta.remaining_seconds(), Some(0.0));
    }

    #[test]
    fn fresh_estimate_overrides_ticking_value() {
        let mut eta = EtaEstimator::new();
        eta.on_epoch_completed(0.0);
        eta.on_epoch_completed(10.0);
        eta.estimate(6);
        eta.tick();
        eta.tick();
        assert_eq!(eta.remaining_seconds(), Some(58.0));
        eta.on_epoch_completed(20.0);
        assert_eq!(eta.estimate(5), Some(50.0));
        assert_eq!(eta.remaining_seconds(), Some(50.0));
    }

    #[test]
    fn tick_before_any_estimate_is_a_no_op() {
        let mut eta = EtaEstimator::new();
        eta.tick();
        assert_eq!(eta.remaining_seconds(), None);
    }

    #[test]
    fn display_formatting() {
        assert_eq!(format_eta(130.0), "ETA: 2m 10s");
        assert_eq!(format_eta(59.9), "ETA: 0m 59s");
        assert_eq!(format_eta(0.0), "ETA: 0m 0s");
        assert_eq!(format_eta(3601.0), "ETA: 60m 1s");
    }

    #[test]
    fn reset_clears_history_and_estimate() {
        let mut eta = EtaEstimator::new();
        eta.on_epoch_completed(0.0);
        eta.on_epoch_completed(5.0);
        eta.estimate(2);
        eta.reset();
        assert_eq!(eta.remaining_seconds(), None);
        assert_eq!(eta.estimate(2), None);
    }
}
