use std::sync::mpsc::{self, Receiver, RecvTimeoutError, Sender};
use std::time::{Duration, Instant};

use crate::input::PointerEvent;
use crate::runtime::timers::{TimerTask, Timers};

/// Upper bound on one loop iteration when no timer is pending, so the loop
/// still notices channel disconnects and handler-driven exit conditions.
const IDLE_POLL: Duration = Duration::from_millis(250);

// ---------------------------------------------------------------------------
// Events
// ---------------------------------------------------------------------------

/// Everything the app can be woken up by. Transport threads and input
/// producers push these into the loop's channel; delivery order within the
/// channel is FIFO.
#[derive(Debug)]
pub enum AppEvent {
    /// A drawing-input event.
    Pointer(PointerEvent),
    /// Raw payload from the prediction channel. Parsed by the handler;
    /// payloads without a prediction are ignored there.
    PredictionMessage(String),
    /// Raw payload from the telemetry channel, one `EpochRecord` JSON object.
    TelemetryMessage(String),
}

/// The loop's view of the app: one entry point per wake-up kind.
pub trait EventHandler {
    fn handle(&mut self, event: AppEvent, timers: &mut Timers);

    fn on_timer(&mut self, task: TimerTask, timers: &mut Timers);

    /// When this turns true the loop exits after finishing the current
    /// iteration.
    fn done(&self) -> bool {
        false
    }
}

// ---------------------------------------------------------------------------
// EventLoop
// ---------------------------------------------------------------------------

/// Single-threaded cooperative loop: one inbound channel multiplexed with
/// the repeating-timer table via `recv_timeout`.
///
/// No handler blocks; suspension happens only here, bounded by the next
/// timer deadline. The loop ends when the handler reports `done`, or when
/// every event producer has dropped its sender.
pub struct EventLoop {
    rx:     Receiver<AppEvent>,
    timers: Timers,
}

impl EventLoop {
    /// Creates the loop and the sender side handed to event producers.
    pub fn new() -> (EventLoop, Sender<AppEvent>) {
        let (tx, rx) = mpsc::channel();
        (
            EventLoop {
                rx,
                timers: Timers::new(),
            },
            tx,
        )
    }

    pub fn timers_mut(&mut self) -> &mut Timers {
        &mut self.timers
    }

    pub fn run<H: EventHandler>(&mut self, handler: &mut H) {
        loop {
            let timeout = match self.timers.next_deadline() {
                Some(deadline) => deadline
                    .saturating_duration_since(Instant::now())
                    .min(IDLE_POLL),
                None => IDLE_POLL,
            };

            match self.rx.recv_timeout(timeout) {
                Ok(event) => handler.handle(event, &mut self.timers),
                Err(RecvTimeoutError::Timeout) => {}
                Err(RecvTimeoutError::Disconnected) => return,
            }

            for task in self.timers.fire_due(Instant::now()) {
                handler.on_timer(task, &mut self.timers);
            }

            if handler.done() {
                return;
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::geom::Point;
    use crate::input::PointerEvent;

    #[derive(Default)]
    struct CountingHandler {
        events: usize,
        ticks:  usize,
        stop_after: usize,
    }

    impl EventHandler for CountingHandler {
        fn handle(&mut self, _event: AppEvent, _timers: &mut Timers) {
            self.events += 1;
        }

        fn on_timer(&mut self, _task: TimerTask, _timers: &mut Timers) {
            self.ticks += 1;
        }

        fn done(&self) -> bool {
            self.ticks >= self.stop_after
        }
    }

    #[test]
    fn delivers_events_in_fifo_order_then_exits_on_disconnect() {
        let (mut el, tx) = EventLoop::new();
        let mut handler = CountingHandler {
            stop_after: usize::MAX,
            ..Default::default()
        };
        tx.send(AppEvent::Pointer(PointerEvent::Move {
            pos: Point::new(1.0, 1.0),
        }))
        .unwrap();
        tx.send(AppEvent::PredictionMessage("{}".into())).unwrap();
        drop(tx);

        el.run(&mut handler);
        assert_eq!(handler.events, 2);
    }

    #[test]
    fn fires_timers_and_honors_done() {
        let (mut el, _tx) = EventLoop::new();
        el.timers_mut()
            .schedule_repeating(Duration::from_millis(5), TimerTask::EtaTick);
        let mut handler = CountingHandler {
            stop_after: 3,
            ..Default::default()
        };
        el.run(&mut handler);
        assert_eq!(handler.ticks, 3);
    }
}
