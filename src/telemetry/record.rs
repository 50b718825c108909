use serde::{Serialize, Deserialize};

/// One training-progress snapshot from the telemetry stream.
///
/// The source emits these at least once per second with the **full** loss
/// history up to the current epoch, so the same epoch number is routinely
/// delivered many times and, across reconnects, can arrive out of order.
/// Consumers must tolerate both (see `TelemetryChartModel::apply`).
///
/// Field names on the wire follow the trainer's protocol.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct EpochRecord {
    /// Number of the most recently completed epoch, 1-based; 0 before the
    /// first epoch finishes.
    #[serde(rename = "current_epoch")]
    pub epoch: usize,
    /// Total epochs requested for this run.
    pub total_epochs: usize,
    /// Mean training loss per completed epoch, index 0 = epoch 1.
    pub train_loss: Vec<f64>,
    /// Mean validation loss per completed epoch, index 0 = epoch 1.
    pub val_loss: Vec<f64>,
    /// Source-side remaining-time guess. Decoded for wire compatibility;
    /// the countdown shown to the user comes from the local estimator.
    #[serde(rename = "ETA", default)]
    pub eta_seconds: f64,
    /// True exactly once, on the final snapshot: the session is over.
    #[serde(rename = "is_model_trained", default)]
    pub is_trained: bool,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn decodes_the_trainer_wire_shape() {
        let raw = r#"{
            "current_epoch": 3,
            "total_epochs": 10,
            "train_loss": [0.9, 0.7, 0.5],
            "val_loss": [0.95, 0.8, 0.6],
            "ETA": 42.0,
            "is_model_trained": false
        }"#;
        let rec: EpochRecord = serde_json::from_str(raw).unwrap();
        assert_eq!(rec.epoch, 3);
        assert_eq!(rec.total_epochs, 10);
        assert_eq!(rec.train_loss.len(), 3);
        assert_eq!(rec.eta_seconds, 42.0);
        assert!(!rec.is_trained);
    }

    #[test]
    fn eta_and_trained_flag_are_optional() {
        let raw = r#"{"current_epoch":1,"total_epochs":5,"train_loss":[0.9],"val_loss":[1.0]}"#;
        let rec: EpochRecord = serde_json::from_str(raw).unwrap();
        assert_eq!(rec.eta_seconds, 0.0);
        assert!(!rec.is_trained);
    }
}
