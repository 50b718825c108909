pub mod record;
pub mod chart;
pub mod eta;
pub mod monitor;

pub use record::EpochRecord;
pub use chart::{ApplyOutcome, ChartSeries, TelemetryChartModel};
pub use eta::{format_eta, EtaEstimator};
pub use monitor::{ChartSink, TrainingDisplay, TrainingMonitor};
