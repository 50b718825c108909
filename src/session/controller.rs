use tracing::{info, trace};

use crate::canvas::Surface;
use crate::config::PadConfig;
use crate::geom::Point;
use crate::input::{PointerButton, PointerEvent};
use crate::runtime::Timers;
use crate::session::predictor::PredictionStreamClient;
use crate::stroke::interpolate;

/// Stroke progress within one pointer-down-to-up interval.
#[derive(Debug, Clone, Copy, PartialEq)]
enum StrokeState {
    Idle,
    Active { last_point: Point, segments: usize },
}

/// The pointer-event state machine driving the whole drawing side.
///
/// Owns the surface and the stream client. `Idle` until a primary-button
/// press opens a session; every move while `Active` lays down interpolated
/// stamps; release or leaving the surface returns to `Idle` and cancels the
/// sampling timer. A secondary-button press clears everything from either
/// state without opening a stroke. Re-enterable indefinitely.
pub struct DrawingSessionController {
    surface:      Surface,
    state:        StrokeState,
    brush_radius: f64,
    steps:        usize,
    client:       PredictionStreamClient,
}

impl DrawingSessionController {
    pub fn new(config: &PadConfig, client: PredictionStreamClient) -> DrawingSessionController {
        DrawingSessionController {
            surface: Surface::new(config.surface_width, config.surface_height),
            state: StrokeState::Idle,
            brush_radius: config.brush_radius,
            steps: config.interpolation_steps,
            client,
        }
    }

    pub fn on_pointer(&mut self, event: PointerEvent, timers: &mut Timers) {
        match event {
            PointerEvent::Down { pos, button: PointerButton::Primary } => {
                self.begin_stroke(pos, timers)
            }
            PointerEvent::Down { button: PointerButton::Secondary, .. } => self.clear(timers),
            PointerEvent::Down { button: PointerButton::Other, .. } => {}
            PointerEvent::Move { pos } => self.extend_stroke(pos),
            PointerEvent::Up { .. } | PointerEvent::Leave { .. } => self.end_stroke(timers),
        }
    }

    fn begin_stroke(&mut self, pos: Point, timers: &mut Timers) {
        info!(x = pos.x, y = pos.y, "drawing session started");
        self.state = StrokeState::Active { last_point: pos, segments: 0 };
        self.surface.stamp_disk(pos, self.brush_radius);
        // start_sampling cancels any stale timer first.
        self.client.start_sampling(timers);
    }

    fn extend_stroke(&mut self, pos: Point) {
        // Moves while idle have no effect.
        let StrokeState::Active { last_point, segments } = self.state else {
            return;
        };
        for center in interpolate(last_point, pos, self.steps) {
            self.surface.stamp_disk(center, self.brush_radius);
        }
        trace!(segments, "stroke segment stamped");
        self.state = StrokeState::Active { last_point: pos, segments: segments + 1 };
    }

    fn end_stroke(&mut self, timers: &mut Timers) {
        if self.state == StrokeState::Idle {
            return;
        }
        info!("drawing session ended");
        self.state = StrokeState::Idle;
        self.client.stop_sampling(timers);
    }

    /// Wipes the surface, resets the prediction label to its placeholder,
    /// and cancels the sampling timer. Does not start a stroke.
    pub fn clear(&mut self, timers: &mut Timers) {
        info!("surface cleared");
        self.surface.clear();
        self.state = StrokeState::Idle;
        self.client.reset_display();
        self.client.stop_sampling(timers);
    }

    /// One prediction-sampling tick, delegated to the stream client with a
    /// read-only view of the surface.
    pub fn on_sample_tick(&mut self) {
        self.client.sample(&self.surface);
    }

    /// Inbound message from the prediction channel.
    pub fn on_prediction_message(&mut self, raw: &str) {
        self.client.on_message(raw);
    }

    pub fn is_active(&self) -> bool {
        matches!(self.state, StrokeState::Active { .. })
    }

    pub fn surface(&self) -> &Surface {
        &self.surface
    }

    /// Completed move segments in the current stroke, 0 while idle.
    pub fn segments(&self) -> usize {
        match self.state {
            StrokeState::Active { segments, .. } => segments,
            StrokeState::Idle => 0,
        }
    }
}
