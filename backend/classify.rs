use std::io::Cursor;

use tiny_http::{Request, Response};
use tracing::debug;

use graphite_pad::wire;

use crate::json_response;

// ---------------------------------------------------------------------------
// POST /predict
// ---------------------------------------------------------------------------

/// Reads one `{"imageData": [...]}` frame and answers with a prediction.
///
/// Frames that cannot be decoded, are not square, or carry no ink get an
/// empty JSON object instead; the client ignores messages without a
/// `prediction` field, so nothing special is needed on that side.
pub fn handle_predict(request: &mut Request) -> Response<Cursor<Vec<u8>>> {
    let mut body = String::new();
    let _ = request.as_reader().read_to_string(&mut body);

    let Some(values) = wire::decode_frame(&body) else {
        return json_response("{}".into());
    };

    match classify(&values) {
        Some(digit) => {
            let reply = serde_json::json!({ "prediction": digit.to_string() });
            json_response(reply.to_string())
        }
        None => {
            debug!(len = values.len(), "frame not classifiable");
            json_response("{}".into())
        }
    }
}

/// Stand-in classifier: a deterministic digit derived from the ink's first
/// moments. It gives stable, repeatable answers for identical drawings,
/// which is all the practice backend needs; a trained network would slot in
/// behind the same signature.
fn classify(values: &[u8]) -> Option<u8> {
    let side = (values.len() as f64).sqrt() as usize;
    if side == 0 || side * side != values.len() {
        return None;
    }

    let mass: u64 = values.iter().map(|&v| v as u64).sum();
    if mass == 0 {
        return None;
    }

    let mut row_moment = 0u64;
    let mut col_moment = 0u64;
    let mut coverage = 0u64;
    for (i, &v) in values.iter().enumerate() {
        if v > 0 {
            coverage += 1;
            row_moment += (i / side) as u64 * v as u64;
            col_moment += (i % side) as u64 * v as u64;
        }
    }

    let row_centroid = row_moment / mass;
    let col_centroid = col_moment / mass;
    let coverage_pct = coverage * 100 / (values.len() as u64);

    Some(((row_centroid * 3 + col_centroid * 5 + coverage_pct) % 10) as u8)
}
