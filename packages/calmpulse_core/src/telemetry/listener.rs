//! telemetry/listener.rs
//!
//! Owns the single outbound connection to the device bridge. Connects once
//! and sends the greeting line, then decodes frames until the socket closes
//! or errors. No failure mode triggers a retry: a malformed frame is logged
//! and skipped, a dead socket ends the run. Reconnection is the caller's
//! decision, not the listener's.

use tokio::io::{AsyncBufReadExt, AsyncRead, AsyncWrite, AsyncWriteExt, BufReader};
use tokio::net::TcpStream;
use tokio::sync::broadcast;
use uuid::Uuid;

use crate::telemetry::message::{decode_frame, DerivedReading};
use crate::telemetry::TelemetryError;

/// Where the bridge lives and what we say on arrival.
#[derive(Clone, Debug)]
pub struct BridgeConfig {
    /// Loopback endpoint the bridge listens on.
    pub addr: String,
    /// Literal greeting sent once per successful connection.
    pub greeting: String,
}

impl Default for BridgeConfig {
    fn default() -> Self {
        Self {
            addr: "127.0.0.1:8080".to_string(),
            greeting: "hello from calmpulse".to_string(),
        }
    }
}

/// Connection lifecycle and per-frame outcomes, fanned out to subscribers.
#[derive(Clone, Debug, PartialEq)]
pub enum BridgeEvent {
    Connected,
    Reading(DerivedReading),
    Closed,
}

/// One outbound bridge connection with an owned lifecycle.
///
/// Nothing here is process-global: the listener is created on demand and
/// torn down when `run` returns. Derived readings reach subscribers over a
/// broadcast channel; the run loop also reports each one to the log sink.
pub struct BridgeListener {
    config: BridgeConfig,
    connection_id: Uuid,
    events_tx: broadcast::Sender<BridgeEvent>,
}

impl BridgeListener {
    pub fn new(config: BridgeConfig) -> Self {
        let (events_tx, _) = broadcast::channel(64);
        Self {
            config,
            connection_id: Uuid::new_v4(),
            events_tx,
        }
    }

    /// Subscribe to connection and reading events.
    pub fn events(&self) -> broadcast::Receiver<BridgeEvent> {
        self.events_tx.subscribe()
    }

    /// Connect, greet, and consume frames until the socket closes.
    ///
    /// Returns `Ok(())` on a clean close and the socket error otherwise.
    /// Never reconnects.
    pub async fn run(&self) -> Result<(), TelemetryError> {
        let stream = TcpStream::connect(&self.config.addr)
            .await
            .map_err(TelemetryError::Connect)?;
        log::info!(
            "[{}] connected to bridge at {}",
            self.connection_id,
            self.config.addr
        );
        self.drive(stream).await
    }

    /// Frame loop over an established stream, split out from `run` so the
    /// listener can be exercised over an in-memory stream.
    pub(crate) async fn drive<S>(&self, stream: S) -> Result<(), TelemetryError>
    where
        S: AsyncRead + AsyncWrite + Unpin,
    {
        let (read_half, mut write_half) = tokio::io::split(stream);

        write_half.write_all(self.config.greeting.as_bytes()).await?;
        write_half.write_all(b"\n").await?;
        write_half.flush().await?;
        let _ = self.events_tx.send(BridgeEvent::Connected);

        let mut lines = BufReader::new(read_half).lines();
        loop {
            match lines.next_line().await {
                Ok(Some(line)) => self.handle_frame(&line),
                Ok(None) => {
                    log::info!("[{}] bridge closed the connection", self.connection_id);
                    let _ = self.events_tx.send(BridgeEvent::Closed);
                    return Ok(());
                }
                Err(e) => {
                    log::warn!("[{}] socket error: {}", self.connection_id, e);
                    let _ = self.events_tx.send(BridgeEvent::Closed);
                    return Err(TelemetryError::Io(e));
                }
            }
        }
    }

    fn handle_frame(&self, line: &str) {
        log::debug!("[{}] frame: {}", self.connection_id, line);
        match decode_frame(line) {
            Ok(Some(reading)) => {
                log::info!(
                    "[{}] heart rate {} BPM, GSR {}",
                    self.connection_id,
                    reading.heart_rate,
                    reading.gsr
                );
                let _ = self.events_tx.send(BridgeEvent::Reading(reading));
            }
            Ok(None) => {}
            Err(e) => {
                log::warn!("[{}] dropped frame: {}", self.connection_id, e);
            }
        }
    }
}
