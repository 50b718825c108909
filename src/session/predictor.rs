use std::time::Duration;

use tracing::warn;

use crate::canvas::{downsample, FeatureVector, Surface};
use crate::config::PadConfig;
use crate::error::PadError;
use crate::runtime::{TimerId, TimerTask, Timers};
use crate::wire;

// ---------------------------------------------------------------------------
// Collaborator seams
// ---------------------------------------------------------------------------

/// Outbound half of the prediction channel. Implementations deliver one
/// frame; retries and reconnects are theirs to worry about, not the
/// client's.
pub trait PredictionTransport {
    fn send_frame(&mut self, frame: &FeatureVector) -> Result<(), PadError>;
}

/// The prediction label in the UI.
pub trait PredictionDisplay {
    fn show(&mut self, label: &str);

    /// Back to the placeholder (after a clear).
    fn reset(&mut self);
}

// ---------------------------------------------------------------------------
// PredictionStreamClient
// ---------------------------------------------------------------------------

/// Streams the drawing to the classifier while a session is active.
///
/// Owns the sampling timer handle: started on session begin
/// (cancel-then-start, so at most one is ever armed), canceled on session
/// end and on clear. Each tick snapshots the surface, downsamples it, and
/// hands the frame to the transport. Whatever prediction comes back,
/// whenever it comes back, lands in the display; late results after a
/// session ended are harmless.
pub struct PredictionStreamClient {
    transport:     Box<dyn PredictionTransport>,
    display:       Box<dyn PredictionDisplay>,
    interval:      Duration,
    target_width:  u32,
    target_height: u32,
    timer:         Option<TimerId>,
}

impl PredictionStreamClient {
    pub fn new(
        config: &PadConfig,
        transport: Box<dyn PredictionTransport>,
        display: Box<dyn PredictionDisplay>,
    ) -> PredictionStreamClient {
        PredictionStreamClient {
            transport,
            display,
            interval: config.sample_interval,
            target_width: config.target_width,
            target_height: config.target_height,
            timer: None,
        }
    }

    /// Arms the sampling timer. Any stale timer is canceled first; a session
    /// has at most one.
    pub fn start_sampling(&mut self, timers: &mut Timers) {
        self.stop_sampling(timers);
        self.timer = Some(timers.schedule_repeating(self.interval, TimerTask::PredictionSample));
    }

    /// Cancels the sampling timer if one is armed.
    pub fn stop_sampling(&mut self, timers: &mut Timers) {
        if let Some(id) = self.timer.take() {
            timers.cancel(id);
        }
    }

    pub fn is_sampling(&self) -> bool {
        self.timer.is_some()
    }

    /// One sampling tick: capture, downsample, deliver. Delivery failures
    /// are logged and dropped.
    pub fn sample(&mut self, surface: &Surface) {
        let frame = downsample(&surface.snapshot(), self.target_width, self.target_height);
        if let Err(err) = self.transport.send_frame(&frame) {
            warn!(%err, "frame delivery failed");
        }
    }

    /// Inbound message from the prediction channel. Messages without a
    /// prediction field are ignored.
    pub fn on_message(&mut self, raw: &str) {
        if let Some(label) = wire::parse_prediction(raw) {
            self.display.show(&label);
        }
    }

    /// Resets the prediction label to its placeholder.
    pub fn reset_display(&mut self) {
        self.display.reset();
    }
}
