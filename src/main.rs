/// graphite-pad client
///
/// Wires the sketchpad core to a running backend:
/// - streams sampled drawings to POST /predict and shows the answers,
/// - follows the training telemetry SSE stream at /train/events,
/// - replays a scripted freehand stroke session as the drawing input.
///
/// Run the backend first, then:
///   cargo run --bin graphite-pad
///
/// Environment:
///   GRAPHITE_BACKEND    backend base URL (default http://127.0.0.1:7878)
///   GRAPHITE_FRAME_OUT  if set, the final downsampled frame is saved there
///                       as a PNG
use std::io::{BufRead, BufReader};
use std::sync::mpsc::{self, Receiver, Sender};
use std::thread;
use std::time::Duration;

use tracing::{error, info, warn};
use tracing_subscriber::EnvFilter;

use graphite_pad::wire;
use graphite_pad::{
    downsample, App, AppEvent, ChartSink, DrawingSessionController, EventLoop, FeatureVector,
    PadConfig, PadError, PointerButton, PointerEvent, PredictionDisplay, PredictionStreamClient,
    PredictionTransport, TrainingDisplay, TrainingMonitor,
};

fn main() {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")))
        .init();

    let config = PadConfig::default();
    if let Err(err) = config.validate() {
        error!(%err, "refusing to start");
        std::process::exit(1);
    }
    let base = std::env::var("GRAPHITE_BACKEND").unwrap_or_else(|_| "http://127.0.0.1:7878".into());

    let (mut event_loop, events) = EventLoop::new();

    let (frame_tx, frame_rx) = mpsc::channel::<String>();
    spawn_prediction_worker(base.clone(), frame_rx, events.clone());
    spawn_telemetry_reader(base.clone(), events.clone());
    spawn_stroke_script(events);

    let client = PredictionStreamClient::new(
        &config,
        Box::new(HttpPredictionTransport { frames: frame_tx }),
        Box::new(TerminalPrediction),
    );
    let controller = DrawingSessionController::new(&config, client);
    let monitor = TrainingMonitor::new(
        Box::new(TerminalChart),
        Box::new(TerminalTraining),
        config.eta_tick,
    );
    let mut app = App::new(controller, monitor);

    info!(%base, "graphite-pad session starting");
    event_loop.run(&mut app);

    if let Ok(path) = std::env::var("GRAPHITE_FRAME_OUT") {
        export_frame(&app, &config, &path);
    }
    info!("session finished");
}

// ---------------------------------------------------------------------------
// Transports
// ---------------------------------------------------------------------------

/// Hands encoded frames to the POST worker thread. The event loop never
/// blocks on the network.
struct HttpPredictionTransport {
    frames: Sender<String>,
}

impl PredictionTransport for HttpPredictionTransport {
    fn send_frame(&mut self, frame: &FeatureVector) -> Result<(), PadError> {
        self.frames
            .send(wire::encode_frame(frame))
            .map_err(|_| PadError::Transport("prediction worker is gone".into()))
    }
}

/// POSTs each frame to /predict and feeds whatever comes back into the event
/// loop as an inbound prediction message. A failed call is logged and the
/// frame dropped; the next sampling tick brings a fresh one anyway.
fn spawn_prediction_worker(base: String, frames: Receiver<String>, events: Sender<AppEvent>) {
    thread::spawn(move || {
        for payload in frames {
            let call = ureq::post(&format!("{}/predict", base))
                .set("Content-Type", "application/json")
                .timeout(Duration::from_secs(5))
                .send_string(&payload);
            match call {
                Ok(resp) => match resp.into_string() {
                    Ok(body) => {
                        if events.send(AppEvent::PredictionMessage(body)).is_err() {
                            return;
                        }
                    }
                    Err(err) => warn!(%err, "unreadable prediction response"),
                },
                Err(err) => warn!(%err, "predict call failed"),
            }
        }
    });
}

/// Follows the SSE stream and forwards each `data:` payload to the loop.
/// The stream closing (training finished, or backend gone) ends the thread;
/// reconnect policy belongs to the transport layer, and this practice client
/// simply doesn't have one.
fn spawn_telemetry_reader(base: String, events: Sender<AppEvent>) {
    thread::spawn(move || {
        let resp = match ureq::get(&format!("{}/train/events", base)).call() {
            Ok(resp) => resp,
            Err(err) => {
                error!(%err, "could not open telemetry stream");
                return;
            }
        };
        let reader = BufReader::new(resp.into_reader());
        for line in reader.lines() {
            let Ok(line) = line else { break };
            if let Some(data) = line.strip_prefix("data: ") {
                if events.send(AppEvent::TelemetryMessage(data.to_owned())).is_err() {
                    break;
                }
            }
        }
        info!("telemetry stream closed");
    });
}

// ---------------------------------------------------------------------------
// Scripted drawing input
// ---------------------------------------------------------------------------

/// Replays freehand sessions until the loop goes away: draw, let the
/// sampler stream a few frames, release, clear with the secondary button,
/// repeat.
fn spawn_stroke_script(events: Sender<AppEvent>) {
    thread::spawn(move || loop {
        for ev in scripted_stroke() {
            if events.send(AppEvent::Pointer(ev)).is_err() {
                return;
            }
            thread::sleep(Duration::from_millis(40));
        }
        thread::sleep(Duration::from_secs(2));
        let clear = PointerEvent::down(0.0, 0.0, PointerButton::Secondary);
        if events.send(AppEvent::Pointer(clear)).is_err() {
            return;
        }
        thread::sleep(Duration::from_secs(1));
    });
}

/// A rough hand-drawn zero: press on the circle, sweep around, release.
fn scripted_stroke() -> Vec<PointerEvent> {
    const POINTS: usize = 32;
    let on_circle = |i: usize| {
        let angle = i as f64 / POINTS as f64 * std::f64::consts::TAU;
        (140.0 + 70.0 * angle.cos(), 140.0 + 70.0 * angle.sin())
    };

    let (x0, y0) = on_circle(0);
    let mut script = vec![PointerEvent::down(x0, y0, PointerButton::Primary)];
    for i in 1..=POINTS {
        let (x, y) = on_circle(i);
        script.push(PointerEvent::moved(x, y));
    }
    let (xn, yn) = on_circle(POINTS);
    script.push(PointerEvent::up(xn, yn));
    script
}

// ---------------------------------------------------------------------------
// Terminal sinks
// ---------------------------------------------------------------------------

struct TerminalPrediction;

impl PredictionDisplay for TerminalPrediction {
    fn show(&mut self, label: &str) {
        info!(%label, "prediction");
    }

    fn reset(&mut self) {
        info!("prediction cleared");
    }
}

struct TerminalTraining;

impl TrainingDisplay for TerminalTraining {
    fn progress(&mut self, percent: f64, text: &str) {
        info!(percent, progress = text, "training progress");
    }

    fn eta(&mut self, text: &str) {
        info!("{}", text);
    }

    fn closed(&mut self) {
        info!("training panel closed");
    }
}

struct TerminalChart;

impl ChartSink for TerminalChart {
    fn seed(&mut self, labels: &[usize], train_loss: &[f64], val_loss: &[f64]) {
        info!(
            points = labels.len(),
            train = train_loss.last().copied().unwrap_or_default(),
            val = val_loss.last().copied().unwrap_or_default(),
            "loss chart seeded"
        );
    }

    fn append(&mut self, label: usize, train_loss: f64, val_loss: f64) {
        info!(epoch = label, train = train_loss, val = val_loss, "loss point");
    }
}

// ---------------------------------------------------------------------------
// Frame export
// ---------------------------------------------------------------------------

/// Saves the final downsampled frame as a PNG for eyeballing the 28x28 grid.
fn export_frame(app: &App, config: &PadConfig, path: &str) {
    let snapshot = app.controller().surface().snapshot();
    let frame = downsample(&snapshot, config.target_width, config.target_height);
    let image =
        image::GrayImage::from_raw(frame.width(), frame.height(), frame.values().to_vec());
    match image {
        Some(img) => match img.save(path) {
            Ok(()) => info!(%path, "downsampled frame exported"),
            Err(err) => warn!(%err, "could not export frame"),
        },
        // from_raw only fails on a length mismatch, which downsample rules out.
        None => {}
    }
}
