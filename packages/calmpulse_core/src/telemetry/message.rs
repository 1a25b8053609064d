//! telemetry/message.rs
//!
//! Frame format pushed by the device bridge, and the BPM derivation.
//!
//! A frame is one JSON document per line: `{ "IBI": <ms>, "GSR": <value> }`.
//! Frames are decoded through `serde_json::Value` so that valid JSON of any
//! other shape is ignored rather than rejected; only text that fails to
//! parse at all counts as a malformed frame.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::telemetry::TelemetryError;

/// A heart-rate/GSR reading derived from one bridge frame.
///
/// Transient: the raw inter-beat interval is dropped after derivation.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct DerivedReading {
    /// Rounded BPM derived from the inter-beat interval.
    pub heart_rate: u16,
    /// Galvanic skin response, passed through untouched.
    pub gsr: f64,
    pub received_at: DateTime<Utc>,
}

/// Derive BPM from an inter-beat interval in milliseconds.
///
/// Non-positive and non-finite intervals are rejected, as are intervals so
/// short the rounded BPM overflows `u16` (below roughly 0.92 ms).
pub fn heart_rate_from_ibi(ibi_ms: f64) -> Result<u16, TelemetryError> {
    if !ibi_ms.is_finite() || ibi_ms <= 0.0 {
        return Err(TelemetryError::InvalidInterval(ibi_ms));
    }
    let bpm = (60_000.0 / ibi_ms).round();
    if bpm > f64::from(u16::MAX) {
        return Err(TelemetryError::InvalidInterval(ibi_ms));
    }
    Ok(bpm as u16)
}

/// Decode one frame.
///
/// `Ok(None)` means valid JSON that carries no reading (missing or
/// non-numeric fields); those are discarded without a log entry. Errors
/// cover malformed JSON and unusable intervals, which the listener logs.
pub fn decode_frame(raw: &str) -> Result<Option<DerivedReading>, TelemetryError> {
    let value: Value = serde_json::from_str(raw.trim())?;
    let ibi = value.get("IBI").and_then(Value::as_f64);
    let gsr = value.get("GSR").and_then(Value::as_f64);
    let (ibi, gsr) = match (ibi, gsr) {
        (Some(ibi), Some(gsr)) => (ibi, gsr),
        _ => return Ok(None),
    };
    let heart_rate = heart_rate_from_ibi(ibi)?;
    Ok(Some(DerivedReading {
        heart_rate,
        gsr,
        received_at: Utc::now(),
    }))
}
