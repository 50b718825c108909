use std::time::{Duration, Instant};

// ---------------------------------------------------------------------------
// Handles
// ---------------------------------------------------------------------------

/// Explicit handle for a scheduled timer. Holders keep it in an
/// `Option<TimerId>` and cancel through it; a handle is never left dangling
/// by the components in this crate (cancel-before-start, cancel-on-exit).
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct TimerId(u64);

/// What a timer firing means to the app. Dispatch is by value, not by
/// callback, so the single-threaded loop never stores closures over app
/// state.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TimerTask {
    /// Capture, downsample, and send the current drawing to the classifier.
    PredictionSample,
    /// Advance the local ETA countdown by one second.
    EtaTick,
}

// ---------------------------------------------------------------------------
// Timer table
// ---------------------------------------------------------------------------

#[derive(Debug)]
struct Entry {
    id:       TimerId,
    task:     TimerTask,
    interval: Duration,
    due:      Instant,
}

/// The event loop's repeating-timer table.
///
/// Single-threaded: timers only fire when the loop calls `fire_due`, so
/// handlers observe a consistent world. Canceling is synchronous; a canceled
/// timer can never fire afterwards.
#[derive(Debug, Default)]
pub struct Timers {
    entries: Vec<Entry>,
    next_id: u64,
}

impl Timers {
    pub fn new() -> Timers {
        Timers::default()
    }

    /// Schedules a repeating timer; first fire one `interval` from now.
    pub fn schedule_repeating(&mut self, interval: Duration, task: TimerTask) -> TimerId {
        let id = TimerId(self.next_id);
        self.next_id += 1;
        self.entries.push(Entry {
            id,
            task,
            interval,
            due: Instant::now() + interval,
        });
        id
    }

    /// Removes a timer. Returns false when the handle was already gone,
    /// which callers treat as "nothing to cancel".
    pub fn cancel(&mut self, id: TimerId) -> bool {
        let before = self.entries.len();
        self.entries.retain(|e| e.id != id);
        self.entries.len() != before
    }

    pub fn is_scheduled(&self, id: TimerId) -> bool {
        self.entries.iter().any(|e| e.id == id)
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Earliest pending deadline, bounding the loop's `recv_timeout`.
    pub fn next_deadline(&self) -> Option<Instant> {
        self.entries.iter().map(|e| e.due).min()
    }

    /// Collects every task due at `now` and re-arms each fired timer one
    /// interval ahead of `now`. A loop iteration that ran long fires a late
    /// timer once rather than bursting to catch up.
    pub fn fire_due(&mut self, now: Instant) -> Vec<TimerTask> {
        let mut fired = Vec::new();
        for entry in &mut self.entries {
            if entry.due <= now {
                fired.push(entry.task);
                entry.due = now + entry.interval;
            }
        }
        fired
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn fires_once_due_and_rearms() {
        let mut timers = Timers::new();
        timers.schedule_repeating(Duration::from_millis(200), TimerTask::PredictionSample);
        let now = Instant::now();

        assert!(timers.fire_due(now).is_empty());
        let later = now + Duration::from_millis(250);
        assert_eq!(timers.fire_due(later), vec![TimerTask::PredictionSample]);
        // Re-armed relative to the fire time, not bursting.
        assert!(timers.fire_due(later).is_empty());
        assert_eq!(
            timers.fire_due(later + Duration::from_millis(200)),
            vec![TimerTask::PredictionSample]
        );
    }

    #[test]
    fn canceled_timer_never_fires() {
        let mut timers = Timers::new();
        let id = timers.schedule_repeating(Duration::from_millis(1), TimerTask::EtaTick);
        assert!(timers.cancel(id));
        assert!(!timers.is_scheduled(id));
        assert!(timers
            .fire_due(Instant::now() + Duration::from_secs(5))
            .is_empty());
        // Double-cancel is harmless.
        assert!(!timers.cancel(id));
    }

    #[test]
    fn timers_are_independent() {
        let mut timers = Timers::new();
        let sample = timers.schedule_repeating(Duration::from_millis(200), TimerTask::PredictionSample);
        let tick = timers.schedule_repeating(Duration::from_millis(1000), TimerTask::EtaTick);
        assert_eq!(timers.len(), 2);

        timers.cancel(sample);
        assert!(timers.is_scheduled(tick));
        let fired = timers.fire_due(Instant::now() + Duration::from_secs(2));
        assert_eq!(fired, vec![TimerTask::EtaTick]);
    }

    #[test]
    fn next_deadline_is_the_earliest() {
        let mut timers = Timers::new();
        assert!(timers.next_deadline().is_none());
        timers.schedule_repeating(Duration::from_secs(10), TimerTask::EtaTick);
        let long = timers.next_deadline().unwrap();
        timers.schedule_repeating(Duration::from_millis(10), TimerTask::PredictionSample);
        assert!(timers.next_deadline().unwrap() < long);
    }
}
