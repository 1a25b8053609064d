//! vitals/simulator.rs
//!
//! The vitals state object and its pure transition function. The simulator
//! owns the waveform buffer, the phase counter, and the alert machine; an
//! external driver supplies the clock (`advance`) and relays the user's
//! prompt answers (`respond`). Nothing here does I/O, so every behavior is
//! unit-testable without a live timer.

use std::f64::consts::PI;
use std::fmt;
use std::time::Duration;

use serde::{Deserialize, Serialize};

use crate::vitals::alert::{AlertMachine, AlertPhase, AlertResponse};
use crate::vitals::rates::HeartRateSource;
use crate::vitals::waveform::WaveformBuffer;

/// Tunables for the simulated vitals stream.
#[derive(Clone, Debug)]
pub struct SimulatorConfig {
    /// Nominal period between ticks.
    pub tick_period: Duration,
    /// Number of points the waveform window holds.
    pub buffer_len: usize,
    /// Waveform centerline.
    pub baseline: f64,
    /// Peak deviation from the centerline.
    pub amplitude: f64,
    /// Multiplier applied to the phase angle.
    pub frequency: f64,
    /// Draws above this BPM raise the panic check.
    pub alert_threshold: u16,
    /// How long sampling stays suppressed after a confirmed alert.
    pub cooldown: Duration,
    /// Heart rate shown before the first tick.
    pub initial_heart_rate: u16,
}

impl Default for SimulatorConfig {
    fn default() -> Self {
        Self {
            tick_period: Duration::from_secs(1),
            buffer_len: 60,
            baseline: 50.0,
            amplitude: 25.0,
            frequency: 5.0,
            alert_threshold: 155,
            cooldown: Duration::from_secs(300),
            initial_heart_rate: 84,
        }
    }
}

/// Display label for signal strength.
///
/// Currently a placeholder: the simulator always reports `Great`, and
/// transitions are an external collaborator concern.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SignalQuality {
    Great,
    Good,
    Weak,
}

impl fmt::Display for SignalQuality {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let label = match self {
            SignalQuality::Great => "Great",
            SignalQuality::Good => "Good",
            SignalQuality::Weak => "Weak",
        };
        write!(f, "{}", label)
    }
}

/// Heart-rate readout published each tick.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct VitalsSample {
    pub heart_rate: u16,
    pub signal_quality: SignalQuality,
}

/// What a single `advance` or `respond` call produced, in emission order.
#[derive(Clone, Debug, PartialEq)]
pub enum VitalsEvent {
    /// Threshold breached on this tick; the front end should open the
    /// panic-check prompt.
    AlertRaised { heart_rate: u16 },
    /// New waveform point and heart-rate readout for display.
    Sample { point: f64, vitals: VitalsSample },
    /// Prompt dismissed; sampling was never interrupted.
    AlertDismissed,
    /// Prompt confirmed; the composing layer navigates to coping tools and
    /// sampling stays suppressed for `cooldown`.
    AlertConfirmed { cooldown: Duration },
    /// Cooldown window elapsed; sampling resumes immediately.
    CooldownEnded,
}

/// Simulated vitals state: waveform window, phase counter, last published
/// readout, and the alert machine.
pub struct Simulator {
    config: SimulatorConfig,
    buffer: WaveformBuffer,
    phase: u64,
    alert: AlertMachine,
    vitals: VitalsSample,
}

impl Simulator {
    pub fn new(config: SimulatorConfig) -> Self {
        let buffer = WaveformBuffer::new(config.buffer_len, config.baseline);
        let alert = AlertMachine::new(config.cooldown);
        let vitals = VitalsSample {
            heart_rate: config.initial_heart_rate,
            signal_quality: SignalQuality::Great,
        };
        Self {
            config,
            buffer,
            phase: 0,
            alert,
            vitals,
        }
    }

    /// One simulated tick.
    ///
    /// While cooling down, this only counts `dt` against the window; the
    /// buffer, phase, and displayed vitals stay frozen. The tick that
    /// exhausts the window emits `CooldownEnded` and resumes sampling
    /// within the same call.
    pub fn advance(&mut self, dt: Duration, rates: &mut dyn HeartRateSource) -> Vec<VitalsEvent> {
        let mut events = Vec::new();

        if self.alert.in_cooldown() {
            if !self.alert.advance(dt) {
                return events;
            }
            events.push(VitalsEvent::CooldownEnded);
        }

        self.phase += 1;
        let radians = self.phase as f64 * PI / 180.0;
        let point =
            self.config.baseline + self.config.amplitude * (radians * self.config.frequency).sin();

        let heart_rate = rates.next_bpm();
        if heart_rate > self.config.alert_threshold {
            self.alert.raise();
            events.push(VitalsEvent::AlertRaised { heart_rate });
        }

        self.buffer.push(point);
        self.vitals = VitalsSample {
            heart_rate,
            signal_quality: SignalQuality::Great,
        };
        events.push(VitalsEvent::Sample {
            point,
            vitals: self.vitals,
        });

        events
    }

    /// Relay the user's prompt answer. Stale answers (no prompt open) are
    /// dropped without effect, so repeated dismissals are idempotent.
    pub fn respond(&mut self, response: AlertResponse) -> Vec<VitalsEvent> {
        if !self.alert.respond(response) {
            return Vec::new();
        }
        match response {
            AlertResponse::Dismissed => vec![VitalsEvent::AlertDismissed],
            AlertResponse::Confirmed => vec![VitalsEvent::AlertConfirmed {
                cooldown: self.config.cooldown,
            }],
        }
    }

    pub fn waveform(&self) -> &WaveformBuffer {
        &self.buffer
    }

    pub fn vitals(&self) -> VitalsSample {
        self.vitals
    }

    pub fn alert_phase(&self) -> AlertPhase {
        self.alert.phase()
    }

    pub fn remaining_cooldown(&self) -> Duration {
        self.alert.remaining_cooldown()
    }
}
