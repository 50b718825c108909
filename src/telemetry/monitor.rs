use std::time::Duration;

use tracing::{debug, info};

use crate::runtime::{TimerId, TimerTask, Timers};
use crate::telemetry::chart::{ApplyOutcome, TelemetryChartModel};
use crate::telemetry::eta::{format_eta, EtaEstimator};
use crate::telemetry::record::EpochRecord;

// ---------------------------------------------------------------------------
// Collaborator seams
// ---------------------------------------------------------------------------

/// The chart widget, reduced to the two operations the model needs from it.
/// Redrawing after an update is the sink's own concern.
pub trait ChartSink {
    /// Initial wholesale population of an empty chart.
    fn seed(&mut self, labels: &[usize], train_loss: &[f64], val_loss: &[f64]);

    /// One new point on every series.
    fn append(&mut self, label: usize, train_loss: f64, val_loss: f64);
}

/// Progress/ETA panel updates.
pub trait TrainingDisplay {
    /// `percent` is unrounded for a bar widget; `text` is the rounded label.
    fn progress(&mut self, percent: f64, text: &str);

    fn eta(&mut self, text: &str);

    /// Training is over; the panel should close.
    fn closed(&mut self);
}

// ---------------------------------------------------------------------------
// TrainingMonitor
// ---------------------------------------------------------------------------

/// The telemetry panel's conductor: feeds accepted records to the chart
/// model and its sink, tracks epoch-completion cadence for the ETA
/// estimator, and owns the countdown tick timer.
///
/// The tick timer starts lazily with the first estimate and is canceled when
/// the session finishes; cancel-before-start keeps it single-instance.
pub struct TrainingMonitor {
    model:     TelemetryChartModel,
    estimator: EtaEstimator,
    chart:     Box<dyn ChartSink>,
    display:   Box<dyn TrainingDisplay>,
    eta_tick:  Duration,
    eta_timer: Option<TimerId>,
}

impl TrainingMonitor {
    pub fn new(
        chart: Box<dyn ChartSink>,
        display: Box<dyn TrainingDisplay>,
        eta_tick: Duration,
    ) -> TrainingMonitor {
        TrainingMonitor {
            model: TelemetryChartModel::new(),
            estimator: EtaEstimator::new(),
            chart,
            display,
            eta_tick,
            eta_timer: None,
        }
    }

    /// Folds one inbound record into the panel. `now_secs` is the arrival
    /// time on the session clock, used as the epoch-completion timestamp.
    pub fn on_record(&mut self, record: &EpochRecord, now_secs: f64, timers: &mut Timers) {
        match self.model.apply(record) {
            ApplyOutcome::Seeded => {
                let series = self.model.series();
                self.chart
                    .seed(series.labels(), series.train_loss(), series.val_loss());
                self.refresh_progress();
                self.epoch_completed(now_secs, timers);
            }
            ApplyOutcome::Appended => {
                let series = self.model.series();
                let last = series.len() - 1;
                self.chart.append(
                    series.labels()[last],
                    series.train_loss()[last],
                    series.val_loss()[last],
                );
                self.refresh_progress();
                self.epoch_completed(now_secs, timers);
            }
            ApplyOutcome::Stale => {
                debug!(epoch = record.epoch, "telemetry record not applied");
            }
            ApplyOutcome::Finished => {
                info!("training finished, closing telemetry session");
                self.cancel_tick(timers);
                self.display.closed();
            }
        }
    }

    /// Advances the countdown between epoch events.
    pub fn on_eta_tick(&mut self) {
        self.estimator.tick();
        if let Some(text) = self.estimator.display() {
            self.display.eta(&text);
        }
    }

    pub fn is_finished(&self) -> bool {
        self.model.is_finished()
    }

    pub fn model(&self) -> &TelemetryChartModel {
        &self.model
    }

    pub fn estimator(&self) -> &EtaEstimator {
        &self.estimator
    }

    fn refresh_progress(&mut self) {
        let percent = self.model.progress_percent();
        let text = self.model.progress_text();
        self.display.progress(percent, &text);
    }

    fn epoch_completed(&mut self, now_secs: f64, timers: &mut Timers) {
        self.estimator.on_epoch_completed(now_secs);
        let remaining = self
            .model
            .total_epochs()
            .saturating_sub(self.model.last_epoch());
        if let Some(secs) = self.estimator.estimate(remaining) {
            if self.eta_timer.is_none() {
                self.eta_timer =
                    Some(timers.schedule_repeating(self.eta_tick, TimerTask::EtaTick));
            }
            self.display.eta(&format_eta(secs));
        }
    }

    fn cancel_tick(&mut self, timers: &mut Timers) {
        if let Some(id) = self.eta_timer.take() {
            timers.cancel(id);
        }
    }
}
