use thiserror::Error;

/// Errors surfaced by the sketchpad core.
///
/// Malformed inbound messages and stale telemetry records are deliberately
/// not represented here: both are normal, silently-ignored conditions
/// (see `wire` and `telemetry::chart`).
#[derive(Debug, Error)]
pub enum PadError {
    /// Invalid configuration detected at startup. Fatal; nothing is
    /// constructed from a config that fails validation.
    #[error("invalid configuration: {0}")]
    Config(String),

    /// A frame could not be handed to the prediction transport. The stream
    /// client logs and drops these; retries are the transport's concern.
    #[error("prediction transport: {0}")]
    Transport(String),
}
