pub mod controller;
pub mod predictor;

pub use controller::DrawingSessionController;
pub use predictor::{PredictionDisplay, PredictionStreamClient, PredictionTransport};
