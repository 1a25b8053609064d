//! Session composition: the one place the two vitals producers meet.
//!
//! The simulator and the bridge listener never talk to each other. The
//! `Session` subscribes to both and applies a display policy, handing the
//! front end a single stream of `SessionEvent`s, including navigation when
//! an alert is confirmed.

use std::time::Duration;

use crate::telemetry::listener::BridgeEvent;
use crate::vitals::simulator::{SignalQuality, VitalsEvent};

/// Navigable screens.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Route {
    Monitor,
    CopingTools,
}

impl Route {
    /// Stable route name for the front end's navigator.
    pub fn name(&self) -> &'static str {
        match self {
            Route::Monitor => "monitor",
            Route::CopingTools => "coping-tools",
        }
    }
}

/// Which producer drives the displayed heart rate.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum FeedPolicy {
    /// Telemetry reaches the log sink only; the display is simulated.
    #[default]
    SimulatedOnly,
    /// Live readings drive the display while the bridge is connected,
    /// simulated samples otherwise.
    PreferLive,
}

/// Where a displayed reading came from.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum FeedOrigin {
    Simulated,
    Live,
}

/// Heart-rate readout after the display policy has been applied.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct DisplayVitals {
    pub heart_rate: u16,
    pub signal_quality: SignalQuality,
    pub origin: FeedOrigin,
}

/// What the front end consumes.
#[derive(Clone, Debug, PartialEq)]
pub enum SessionEvent {
    /// New waveform point for the chart. The chart is always
    /// simulator-owned, whatever the policy says about the readout.
    Waveform(f64),
    /// New heart-rate readout for the vitals card.
    Vitals(DisplayVitals),
    /// Open the panic-check prompt.
    PanicCheck { heart_rate: u16 },
    /// Push this route.
    Navigate(Route),
    CooldownStarted(Duration),
    CooldownEnded,
    /// Bridge connectivity changed.
    BridgeStatus { connected: bool },
}

/// Fan-in translator from both producers to the front end's event stream.
pub struct Session {
    policy: FeedPolicy,
    bridge_connected: bool,
}

impl Session {
    pub fn new(policy: FeedPolicy) -> Self {
        Self {
            policy,
            bridge_connected: false,
        }
    }

    pub fn policy(&self) -> FeedPolicy {
        self.policy
    }

    pub fn bridge_connected(&self) -> bool {
        self.bridge_connected
    }

    fn live_display(&self) -> bool {
        self.policy == FeedPolicy::PreferLive && self.bridge_connected
    }

    /// Translate one simulator event.
    pub fn on_vitals(&mut self, event: VitalsEvent) -> Vec<SessionEvent> {
        match event {
            VitalsEvent::Sample { point, vitals } => {
                let mut out = vec![SessionEvent::Waveform(point)];
                if !self.live_display() {
                    out.push(SessionEvent::Vitals(DisplayVitals {
                        heart_rate: vitals.heart_rate,
                        signal_quality: vitals.signal_quality,
                        origin: FeedOrigin::Simulated,
                    }));
                }
                out
            }
            VitalsEvent::AlertRaised { heart_rate } => {
                vec![SessionEvent::PanicCheck { heart_rate }]
            }
            VitalsEvent::AlertDismissed => Vec::new(),
            VitalsEvent::AlertConfirmed { cooldown } => vec![
                SessionEvent::Navigate(Route::CopingTools),
                SessionEvent::CooldownStarted(cooldown),
            ],
            VitalsEvent::CooldownEnded => vec![SessionEvent::CooldownEnded],
        }
    }

    /// Translate one bridge event.
    pub fn on_bridge(&mut self, event: BridgeEvent) -> Vec<SessionEvent> {
        match event {
            BridgeEvent::Connected => {
                self.bridge_connected = true;
                vec![SessionEvent::BridgeStatus { connected: true }]
            }
            BridgeEvent::Closed => {
                self.bridge_connected = false;
                vec![SessionEvent::BridgeStatus { connected: false }]
            }
            BridgeEvent::Reading(reading) => {
                if self.live_display() {
                    vec![SessionEvent::Vitals(DisplayVitals {
                        heart_rate: reading.heart_rate,
                        signal_quality: SignalQuality::Great,
                        origin: FeedOrigin::Live,
                    })]
                } else {
                    // Log-sink only: the listener already reported it.
                    Vec::new()
                }
            }
        }
    }
}

impl Default for Session {
    fn default() -> Self {
        Self::new(FeedPolicy::default())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::telemetry::message::DerivedReading;
    use crate::vitals::simulator::VitalsSample;
    use chrono::Utc;

    fn sample(heart_rate: u16) -> VitalsEvent {
        VitalsEvent::Sample {
            point: 50.0,
            vitals: VitalsSample {
                heart_rate,
                signal_quality: SignalQuality::Great,
            },
        }
    }

    fn reading(heart_rate: u16) -> BridgeEvent {
        BridgeEvent::Reading(DerivedReading {
            heart_rate,
            gsr: 0.4,
            received_at: Utc::now(),
        })
    }

    fn displayed(events: &[SessionEvent]) -> Option<DisplayVitals> {
        events.iter().find_map(|e| match e {
            SessionEvent::Vitals(v) => Some(*v),
            _ => None,
        })
    }

    #[test]
    fn simulated_only_keeps_live_readings_off_the_display() {
        let mut session = Session::default();
        assert_eq!(session.policy(), FeedPolicy::SimulatedOnly);

        session.on_bridge(BridgeEvent::Connected);
        assert!(session.on_bridge(reading(66)).is_empty());

        let events = session.on_vitals(sample(82));
        let vitals = displayed(&events).unwrap();
        assert_eq!(vitals.heart_rate, 82);
        assert_eq!(vitals.origin, FeedOrigin::Simulated);
    }

    #[test]
    fn prefer_live_swaps_the_readout_while_connected() {
        let mut session = Session::new(FeedPolicy::PreferLive);

        // Not connected yet: simulated drives the display.
        let events = session.on_vitals(sample(82));
        assert_eq!(displayed(&events).unwrap().origin, FeedOrigin::Simulated);

        assert_eq!(
            session.on_bridge(BridgeEvent::Connected),
            vec![SessionEvent::BridgeStatus { connected: true }]
        );

        // Connected: live readings display, simulated samples only feed
        // the chart.
        let events = session.on_bridge(reading(66));
        let vitals = displayed(&events).unwrap();
        assert_eq!(vitals.heart_rate, 66);
        assert_eq!(vitals.origin, FeedOrigin::Live);

        let events = session.on_vitals(sample(83));
        assert_eq!(events, vec![SessionEvent::Waveform(50.0)]);

        // Closed: fall back to the simulated readout.
        session.on_bridge(BridgeEvent::Closed);
        let events = session.on_vitals(sample(84));
        assert_eq!(displayed(&events).unwrap().heart_rate, 84);
    }

    #[test]
    fn raised_alert_becomes_a_panic_check() {
        let mut session = Session::default();
        let events = session.on_vitals(VitalsEvent::AlertRaised { heart_rate: 158 });
        assert_eq!(events, vec![SessionEvent::PanicCheck { heart_rate: 158 }]);
    }

    #[test]
    fn confirmation_navigates_to_coping_tools() {
        let mut session = Session::default();
        let cooldown = Duration::from_secs(300);
        let events = session.on_vitals(VitalsEvent::AlertConfirmed { cooldown });
        assert_eq!(
            events,
            vec![
                SessionEvent::Navigate(Route::CopingTools),
                SessionEvent::CooldownStarted(cooldown),
            ]
        );
        assert_eq!(Route::CopingTools.name(), "coping-tools");
    }

    #[test]
    fn dismissal_stays_out_of_the_stream() {
        let mut session = Session::default();
        assert!(session.on_vitals(VitalsEvent::AlertDismissed).is_empty());
        assert_eq!(
            session.on_vitals(VitalsEvent::CooldownEnded),
            vec![SessionEvent::CooldownEnded]
        );
    }
}
