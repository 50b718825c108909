use std::io::Write;
use std::sync::{Arc, Mutex};
use std::thread;
use std::time::Duration;

use rand::Rng;
use tiny_http::Request;
use tracing::info;

use graphite_pad::EpochRecord;

// ---------------------------------------------------------------------------
// Simulated training run
// ---------------------------------------------------------------------------

/// Shared snapshot of the simulated run. The training thread is the single
/// writer; SSE handlers clone the current state on every frame.
#[derive(Clone)]
pub struct TrainingFeed {
    state: Arc<Mutex<EpochRecord>>,
}

impl TrainingFeed {
    /// Starts the background training thread and returns the feed handle.
    pub fn start(total_epochs: usize, epoch_millis: u64) -> TrainingFeed {
        let state = Arc::new(Mutex::new(EpochRecord {
            epoch: 0,
            total_epochs,
            train_loss: Vec::new(),
            val_loss: Vec::new(),
            eta_seconds: 0.0,
            is_trained: false,
        }));

        let shared = state.clone();
        thread::spawn(move || run_training(shared, total_epochs, epoch_millis));

        TrainingFeed { state }
    }

    pub fn snapshot(&self) -> EpochRecord {
        self.state.lock().unwrap().clone()
    }
}

/// Walks through `total_epochs` fake epochs. Epoch durations jitter around
/// the nominal length and losses decay with noise, so the client sees the
/// same irregular cadence a real run produces.
fn run_training(shared: Arc<Mutex<EpochRecord>>, total_epochs: usize, epoch_millis: u64) {
    let nominal = Duration::from_millis(epoch_millis);
    let mut rng = rand::thread_rng();

    for epoch in 1..=total_epochs {
        thread::sleep(nominal.mul_f64(rng.gen_range(0.7..1.3)));

        let decay = (-0.12 * epoch as f64).exp();
        let train = (1.1 * decay + rng.gen_range(-0.02..0.02)).max(0.01);
        let val = (train + 0.05 + rng.gen_range(-0.03..0.03)).max(0.01);

        let mut st = shared.lock().unwrap();
        st.epoch = epoch;
        st.train_loss.push(train);
        st.val_loss.push(val);
        st.eta_seconds = (total_epochs - epoch) as f64 * nominal.as_secs_f64();
        info!(epoch, total_epochs, train, val, "epoch complete");
    }

    let mut st = shared.lock().unwrap();
    st.is_trained = true;
    info!("simulated training finished");
}

// ---------------------------------------------------------------------------
// GET /train/events — SSE handler
// ---------------------------------------------------------------------------

/// Streams training-progress snapshots at 1 Hz until the run completes.
///
/// Every frame carries the full loss history, so a client can join late and
/// the same epoch is redelivered between epoch boundaries. Consumers are
/// expected to deduplicate (at-least-once delivery). After the final,
/// `is_model_trained` frame the stream closes; that close is the session
/// end.
pub fn handle_events(request: Request, feed: TrainingFeed) {
    // Raw TCP stream: write the HTTP header ourselves, then SSE frames.
    let mut writer = request.into_writer();

    let header = "HTTP/1.1 200 OK\r\n\
                  Content-Type: text/event-stream\r\n\
                  Cache-Control: no-cache\r\n\
                  Connection: keep-alive\r\n\
                  \r\n";
    if write_all(&mut writer, header.as_bytes()).is_err() {
        return;
    }

    loop {
        let snapshot = feed.snapshot();
        let done = snapshot.is_trained;

        if let Ok(json) = serde_json::to_string(&snapshot) {
            let frame = format!("data: {}\n\n", json);
            if write_all(&mut writer, frame.as_bytes()).is_err() {
                return;
            }
        }
        if done {
            return;
        }
        thread::sleep(Duration::from_secs(1));
    }
}

/// Writes all bytes to the writer, returning `Err` on any I/O failure.
fn write_all<W: Write>(w: &mut W, data: &[u8]) -> std::io::Result<()> {
    w.write_all(data)?;
    w.flush()
}
