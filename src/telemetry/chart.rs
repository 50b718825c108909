use tracing::debug;

use crate::telemetry::record::EpochRecord;

// ---------------------------------------------------------------------------
// ChartSeries
// ---------------------------------------------------------------------------

/// The loss chart's backing data: three parallel append-only sequences.
///
/// Invariants: all three are always the same length, and `labels` is strictly
/// increasing once populated.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ChartSeries {
    labels:     Vec<usize>,
    train_loss: Vec<f64>,
    val_loss:   Vec<f64>,
}

impl ChartSeries {
    pub fn labels(&self) -> &[usize] {
        &self.labels
    }

    pub fn train_loss(&self) -> &[f64] {
        &self.train_loss
    }

    pub fn val_loss(&self) -> &[f64] {
        &self.val_loss
    }

    pub fn len(&self) -> usize {
        self.labels.len()
    }

    pub fn is_empty(&self) -> bool {
        self.labels.is_empty()
    }

    /// Highest accepted epoch, or 0 for an empty series.
    pub fn last_label(&self) -> usize {
        self.labels.last().copied().unwrap_or(0)
    }
}

// ---------------------------------------------------------------------------
// TelemetryChartModel
// ---------------------------------------------------------------------------

/// What `apply` did with a record.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ApplyOutcome {
    /// First usable record: the series was populated wholesale.
    Seeded,
    /// A strictly newer epoch: one point appended to each sequence.
    Appended,
    /// Duplicate, out-of-order, or unusable record: dropped, nothing changed.
    Stale,
    /// The record carried the trained flag: the session is over and no
    /// further records will be accepted.
    Finished,
}

/// Merges the at-least-once telemetry stream into an append-only chart.
///
/// The stream redelivers the same epoch snapshot many times between epoch
/// boundaries, so acceptance is gated on a strictly increasing epoch number.
/// Applying any record twice leaves the series untouched the second time.
#[derive(Debug, Default)]
pub struct TelemetryChartModel {
    series:       ChartSeries,
    total_epochs: usize,
    finished:     bool,
}

impl TelemetryChartModel {
    pub fn new() -> TelemetryChartModel {
        TelemetryChartModel::default()
    }

    /// Folds one record into the series. Never panics on malformed records;
    /// anything that cannot be applied safely is dropped as `Stale`.
    pub fn apply(&mut self, record: &EpochRecord) -> ApplyOutcome {
        if record.is_trained {
            self.finished = true;
            return ApplyOutcome::Finished;
        }
        if self.finished {
            debug!(epoch = record.epoch, "record after session end dropped");
            return ApplyOutcome::Stale;
        }

        if self.series.is_empty() {
            self.seed(record)
        } else {
            self.append(record)
        }
    }

    /// Populates a fresh chart from the record's full history arrays.
    /// Lengths are reconciled so the parallel-length invariant holds even
    /// against a short history.
    fn seed(&mut self, record: &EpochRecord) -> ApplyOutcome {
        let n = record
            .epoch
            .min(record.train_loss.len())
            .min(record.val_loss.len());
        if n == 0 {
            // Snapshots sent before the first epoch completes carry nothing
            // chartable yet.
            debug!("empty telemetry snapshot dropped");
            return ApplyOutcome::Stale;
        }

        self.series.labels = (1..=n).collect();
        self.series.train_loss = record.train_loss[..n].to_vec();
        self.series.val_loss = record.val_loss[..n].to_vec();
        self.total_epochs = record.total_epochs;
        ApplyOutcome::Seeded
    }

    /// Appends the newest point iff the record's epoch strictly exceeds the
    /// last accepted label.
    fn append(&mut self, record: &EpochRecord) -> ApplyOutcome {
        if record.epoch <= self.series.last_label() {
            debug!(
                epoch = record.epoch,
                last = self.series.last_label(),
                "stale epoch dropped"
            );
            return ApplyOutcome::Stale;
        }

        // The record carries full history arrays; only the newest element is
        // appended to the running series.
        let idx = record.epoch - 1;
        let (train, val) = match (record.train_loss.get(idx), record.val_loss.get(idx)) {
            (Some(&t), Some(&v)) => (t, v),
            _ => {
                debug!(epoch = record.epoch, "record history shorter than its epoch");
                return ApplyOutcome::Stale;
            }
        };

        self.series.labels.push(record.epoch);
        self.series.train_loss.push(train);
        self.series.val_loss.push(val);
        self.total_epochs = record.total_epochs;
        ApplyOutcome::Appended
    }

    pub fn series(&self) -> &ChartSeries {
        &self.series
    }

    pub fn total_epochs(&self) -> usize {
        self.total_epochs
    }

    /// Highest accepted epoch so far.
    pub fn last_epoch(&self) -> usize {
        self.series.last_label()
    }

    pub fn is_finished(&self) -> bool {
        self.finished
    }

    /// Unrounded completion percentage for the progress bar.
    pub fn progress_percent(&self) -> f64 {
        if self.total_epochs == 0 {
            return 0.0;
        }
        self.last_epoch() as f64 / self.total_epochs as f64 * 100.0
    }

    /// Rounded percentage for the progress label.
    pub fn progress_text(&self) -> String {
        format!("{}%", self.progress_percent().round() as i64)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn record(epoch: usize, total: usize, train: &[f64], val: &[f64]) -> EpochRecord {
        EpochRecord {
            epoch,
            total_epochs: total,
            train_loss: train.to_vec(),
            val_loss: val.to_vec(),
            eta_seconds: 0.0,
            is_trained: false,
        }
    }

    #[test]
    fn first_record_seeds_full_history() {
        let mut model = TelemetryChartModel::new();
        let rec = record(3, 10, &[0.9, 0.7, 0.5], &[0.95, 0.8, 0.6]);
        assert_eq!(model.apply(&rec), ApplyOutcome::Seeded);
        assert_eq!(model.series().labels(), &[1, 2, 3]);
        assert_eq!(model.series().train_loss(), &[0.9, 0.7, 0.5]);
        assert_eq!(model.series().val_loss(), &[0.95, 0.8, 0.6]);
        assert_eq!(model.progress_text(), "30%");
        assert_eq!(model.progress_percent(), 30.0);
    }

    #[test]
    fn duplicate_delivery_is_idempotent() {
        let mut model = TelemetryChartModel::new();
        let rec = record(2, 10, &[0.9, 0.7], &[0.95, 0.8]);
        assert_eq!(model.apply(&rec), ApplyOutcome::Seeded);
        assert_eq!(model.apply(&rec), ApplyOutcome::Stale);
        assert_eq!(model.series().len(), 2);
    }

    #[test]
    fn out_of_order_epochs_are_rejected() {
        let mut model = TelemetryChartModel::new();
        let hist_t = [0.9, 0.8, 0.7, 0.6, 0.5];
        let hist_v = [1.0, 0.9, 0.8, 0.7, 0.6];
        model.apply(&record(5, 10, &hist_t, &hist_v));
        assert_eq!(model.apply(&record(4, 10, &hist_t, &hist_v)), ApplyOutcome::Stale);
        assert_eq!(model.apply(&record(5, 10, &hist_t, &hist_v)), ApplyOutcome::Stale);
        assert_eq!(model.series().len(), 5);
        assert_eq!(model.last_epoch(), 5);
    }

    #[test]
    fn newer_epoch_appends_only_the_newest_point() {
        let mut model = TelemetryChartModel::new();
        model.apply(&record(2, 10, &[0.9, 0.7], &[0.95, 0.8]));
        let out = model.apply(&record(3, 10, &[0.9, 0.7, 0.5], &[0.95, 0.8, 0.6]));
        assert_eq!(out, ApplyOutcome::Appended);
        assert_eq!(model.series().labels(), &[1, 2, 3]);
        assert_eq!(model.series().train_loss(), &[0.9, 0.7, 0.5]);
    }

    #[test]
    fn pre_first_epoch_snapshot_is_dropped() {
        let mut model = TelemetryChartModel::new();
        assert_eq!(model.apply(&record(0, 10, &[], &[])), ApplyOutcome::Stale);
        assert!(model.series().is_empty());
    }

    #[test]
    fn short_history_cannot_break_parallel_lengths() {
        let mut model = TelemetryChartModel::new();
        // Claims epoch 4 but only carries two points.
        model.apply(&record(4, 10, &[0.9, 0.7], &[0.95, 0.8]));
        assert_eq!(model.series().labels(), &[1, 2]);
        assert_eq!(model.series().train_loss().len(), model.series().val_loss().len());
        assert_eq!(model.series().labels().len(), model.series().train_loss().len());
    }

    #[test]
    fn trained_flag_finishes_and_blocks_further_records() {
        let mut model = TelemetryChartModel::new();
        model.apply(&record(2, 10, &[0.9, 0.7], &[0.95, 0.8]));

        let mut done = record(2, 10, &[0.9, 0.7], &[0.95, 0.8]);
        done.is_trained = true;
        assert_eq!(model.apply(&done), ApplyOutcome::Finished);
        assert!(model.is_finished());

        let late = record(3, 10, &[0.9, 0.7, 0.5], &[0.95, 0.8, 0.6]);
        assert_eq!(model.apply(&late), ApplyOutcome::Stale);
        assert_eq!(model.series().len(), 2);
    }

    #[test]
    fn progress_text_rounds() {
        let mut model = TelemetryChartModel::new();
        model.apply(&record(1, 3, &[0.9], &[1.0]));
        assert_eq!(model.progress_text(), "33%");
        assert!((model.progress_percent() - 100.0 / 3.0).abs() < 1e-9);
    }
}
