//! Simulated vitals: waveform synthesis, heart-rate draws, the panic-alert
//! state machine, and the async engine that drives them on a fixed cadence.

pub mod alert;
pub mod engine;
pub mod rates;
pub mod simulator;
pub mod waveform;
