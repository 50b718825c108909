pub mod geom;
pub mod input;
pub mod stroke;
pub mod canvas;
pub mod session;
pub mod telemetry;
pub mod runtime;
pub mod wire;
pub mod config;
pub mod error;
pub mod app;

// Convenience re-exports
pub use geom::Point;
pub use input::{PointerButton, PointerEvent};
pub use stroke::interpolate;
pub use canvas::{downsample, FeatureVector, Surface};
pub use session::{DrawingSessionController, PredictionDisplay, PredictionStreamClient, PredictionTransport};
pub use telemetry::{ApplyOutcome, ChartSeries, ChartSink, EpochRecord, EtaEstimator, TelemetryChartModel, TrainingDisplay, TrainingMonitor};
pub use runtime::{AppEvent, EventHandler, EventLoop, TimerId, TimerTask, Timers};
pub use config::PadConfig;
pub use error::PadError;
pub use app::App;
