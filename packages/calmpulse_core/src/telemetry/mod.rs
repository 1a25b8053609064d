//! Telemetry ingestion from the external device bridge.
//!
//! The bridge pushes newline-delimited JSON frames over a local TCP
//! connection. `BridgeListener` owns that connection and publishes derived
//! readings; `message` holds the frame format and the BPM derivation.

pub mod listener;
pub mod message;

use thiserror::Error;

#[derive(Error, Debug)]
pub enum TelemetryError {
    #[error("Failed to connect to bridge: {0}")]
    Connect(std::io::Error),

    #[error("Socket error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Malformed frame: {0}")]
    MalformedFrame(#[from] serde_json::Error),

    #[error("Invalid inter-beat interval: {0} ms")]
    InvalidInterval(f64),
}
