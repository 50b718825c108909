//! JSON codec for the two message channels.
//!
//! Parsing is kept apart from the business rules: handlers receive raw
//! payloads, decode them here, and apply policy (idempotent merge, strict
//! increase) elsewhere. Malformed payloads decode to `None` and are ignored,
//! never propagated as errors.

use serde::{Serialize, Deserialize};
use serde_json::Value;
use tracing::debug;

use crate::canvas::FeatureVector;
use crate::telemetry::EpochRecord;

#[derive(Serialize, Deserialize)]
struct FramePayload {
    #[serde(rename = "imageData")]
    image_data: Vec<u8>,
}

/// Encodes one sampled frame as the outbound `{"imageData": [...]}` message.
pub fn encode_frame(frame: &FeatureVector) -> String {
    let payload = FramePayload {
        image_data: frame.values().to_vec(),
    };
    // A plain numeric array cannot fail to serialize.
    serde_json::to_string(&payload).unwrap_or_default()
}

/// Decodes an inbound frame payload (the backend side of `encode_frame`).
pub fn decode_frame(raw: &str) -> Option<Vec<u8>> {
    match serde_json::from_str::<FramePayload>(raw) {
        Ok(payload) => Some(payload.image_data),
        Err(err) => {
            debug!(%err, "unusable frame payload ignored");
            None
        }
    }
}

/// Extracts the prediction label from an inbound message, if present.
///
/// A message without a `prediction` field is not an error; the classifier
/// side is free to send other traffic on the same channel. String and
/// numeric labels are both accepted.
pub fn parse_prediction(raw: &str) -> Option<String> {
    let value: Value = match serde_json::from_str(raw) {
        Ok(v) => v,
        Err(err) => {
            debug!(%err, "unparseable prediction message ignored");
            return None;
        }
    };
    match value.get("prediction") {
        Some(Value::String(s)) => Some(s.clone()),
        Some(Value::Number(n)) => Some(n.to_string()),
        _ => None,
    }
}

/// Decodes one telemetry payload into an [`EpochRecord`].
pub fn parse_epoch_record(raw: &str) -> Option<EpochRecord> {
    match serde_json::from_str::<EpochRecord>(raw) {
        Ok(record) => Some(record),
        Err(err) => {
            debug!(%err, "malformed telemetry payload ignored");
            None
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::canvas::{downsample, Surface};

    #[test]
    fn frame_payload_round_trips() {
        let surface = Surface::new(56, 56);
        let frame = downsample(&surface.snapshot(), 28, 28);
        let encoded = encode_frame(&frame);
        assert!(encoded.starts_with(r#"{"imageData":[0,"#));
        let decoded = decode_frame(&encoded).unwrap();
        assert_eq!(decoded, frame.values());
    }

    #[test]
    fn prediction_field_is_optional() {
        assert_eq!(parse_prediction(r#"{"prediction":"7"}"#), Some("7".into()));
        assert_eq!(parse_prediction(r#"{"prediction":7}"#), Some("7".into()));
        assert_eq!(parse_prediction(r#"{"status":"warming up"}"#), None);
        assert_eq!(parse_prediction("not json at all"), None);
    }

    #[test]
    fn malformed_telemetry_decodes_to_none() {
        assert!(parse_epoch_record("{").is_none());
        assert!(parse_epoch_record(r#"{"current_epoch":"three"}"#).is_none());
        assert!(parse_epoch_record(
            r#"{"current_epoch":1,"total_epochs":5,"train_loss":[0.5],"val_loss":[0.6]}"#
        )
        .is_some());
    }
}
