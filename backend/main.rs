/// graphite-backend
///
/// Practice backend for the sketchpad client: a simulated training run with
/// live telemetry, plus a stand-in prediction endpoint.
///
/// Run with:
///   cargo run --bin graphite-backend
///
/// Endpoints:
///   GET  /train/events — SSE stream of training-progress snapshots (1 Hz,
///                        full loss history each frame, closes once trained)
///   POST /predict      — accepts `{"imageData": [...]}`, answers
///                        `{"prediction": "N"}` when the frame carries ink
mod sim;
mod classify;

use std::io::Cursor;
use std::thread;

use tiny_http::{Method, Request, Response, Server};
use tracing::{error, info};
use tracing_subscriber::EnvFilter;

use sim::TrainingFeed;

fn main() {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")))
        .init();

    let addr = std::env::var("GRAPHITE_BACKEND_ADDR").unwrap_or_else(|_| "127.0.0.1:7878".into());
    let server = match Server::http(&addr) {
        Ok(server) => server,
        Err(err) => {
            error!(%addr, %err, "could not bind backend server");
            std::process::exit(1);
        }
    };

    let total_epochs = env_usize("GRAPHITE_SIM_EPOCHS", 30);
    let epoch_millis = env_usize("GRAPHITE_SIM_EPOCH_MS", 2000) as u64;
    let feed = TrainingFeed::start(total_epochs, epoch_millis);

    info!(%addr, total_epochs, "graphite-backend listening");

    // Each request gets its own thread so the long-lived SSE stream does not
    // stall prediction traffic.
    for request in server.incoming_requests() {
        let feed = feed.clone();
        thread::spawn(move || dispatch(request, feed));
    }
}

fn env_usize(key: &str, default: usize) -> usize {
    std::env::var(key)
        .ok()
        .and_then(|v| v.parse().ok())
        .unwrap_or(default)
}

fn dispatch(mut request: Request, feed: TrainingFeed) {
    let method = request.method().clone();
    let path = request.url().to_owned();

    // SSE is long-lived; the handler takes ownership and drives the stream.
    if method == Method::Get && path == "/train/events" {
        sim::handle_events(request, feed);
        return;
    }

    let response = match (method, path.as_str()) {
        (Method::Post, "/predict") => classify::handle_predict(&mut request),
        _ => not_found(),
    };
    let _ = request.respond(response);
}

pub fn json_response(body: String) -> Response<Cursor<Vec<u8>>> {
    Response::from_string(body).with_header(
        tiny_http::Header::from_bytes(b"Content-Type", b"application/json").unwrap(),
    )
}

fn not_found() -> Response<Cursor<Vec<u8>>> {
    Response::from_string("404 Not Found").with_status_code(404)
}
