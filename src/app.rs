use std::time::Instant;

use crate::runtime::{AppEvent, EventHandler, TimerTask, Timers};
use crate::session::DrawingSessionController;
use crate::telemetry::TrainingMonitor;
use crate::wire;

/// The whole application: the drawing side and the telemetry side, glued to
/// the event loop. One handler method per inbound message kind; parsing
/// happens in `wire`, policy in the components.
///
/// The two sides are independent: the telemetry session closing does not
/// end a drawing session, and vice versa.
pub struct App {
    controller: DrawingSessionController,
    monitor:    TrainingMonitor,
    started:    Instant,
}

impl App {
    pub fn new(controller: DrawingSessionController, monitor: TrainingMonitor) -> App {
        App {
            controller,
            monitor,
            started: Instant::now(),
        }
    }

    /// Seconds since app start; the session clock used for epoch-completion
    /// timestamps.
    fn now_secs(&self) -> f64 {
        self.started.elapsed().as_secs_f64()
    }

    pub fn on_telemetry_message(&mut self, raw: &str, timers: &mut Timers) {
        if let Some(record) = wire::parse_epoch_record(raw) {
            let now = self.now_secs();
            self.monitor.on_record(&record, now, timers);
        }
    }

    pub fn controller(&self) -> &DrawingSessionController {
        &self.controller
    }

    pub fn controller_mut(&mut self) -> &mut DrawingSessionController {
        &mut self.controller
    }

    pub fn monitor(&self) -> &TrainingMonitor {
        &self.monitor
    }
}

impl EventHandler for App {
    fn handle(&mut self, event: AppEvent, timers: &mut Timers) {
        match event {
            AppEvent::Pointer(ev) => self.controller.on_pointer(ev, timers),
            AppEvent::PredictionMessage(raw) => self.controller.on_prediction_message(&raw),
            AppEvent::TelemetryMessage(raw) => self.on_telemetry_message(&raw, timers),
        }
    }

    fn on_timer(&mut self, task: TimerTask, _timers: &mut Timers) {
        match task {
            TimerTask::PredictionSample => self.controller.on_sample_tick(),
            TimerTask::EtaTick => self.monitor.on_eta_tick(),
        }
    }

    /// The shipped binaries treat training completion as the end of the
    /// run; embedders driving `App` directly are free to ignore this.
    fn done(&self) -> bool {
        self.monitor.is_finished()
    }
}
