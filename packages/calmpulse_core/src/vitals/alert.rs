//! Alert/Cooldown state machine for the panic-check flow.
//!
//! Transitions: `Idle -> AlertPending` on a threshold breach,
//! `AlertPending -> Idle` on "No", `AlertPending -> Cooldown` on "Yes",
//! `Cooldown -> Idle` when the window elapses. The cooldown cannot be
//! cancelled and ignores every heart-rate value while it runs.

use std::time::Duration;

/// Where the alert flow currently stands.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum AlertPhase {
    /// Sampling normally, no prompt open.
    Idle,
    /// Threshold breached, waiting on the user's answer.
    AlertPending,
    /// Confirmed alert, sampling suppressed until the window elapses.
    Cooldown,
}

/// The user's answer to the panic-check prompt.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum AlertResponse {
    Dismissed,
    Confirmed,
}

#[derive(Clone, Debug)]
pub struct AlertMachine {
    phase: AlertPhase,
    window: Duration,
    remaining: Duration,
}

impl AlertMachine {
    pub fn new(window: Duration) -> Self {
        Self {
            phase: AlertPhase::Idle,
            window,
            remaining: Duration::ZERO,
        }
    }

    pub fn phase(&self) -> AlertPhase {
        self.phase
    }

    pub fn in_cooldown(&self) -> bool {
        self.phase == AlertPhase::Cooldown
    }

    pub fn remaining_cooldown(&self) -> Duration {
        self.remaining
    }

    /// Threshold breach. Opens (or re-opens) the prompt unless cooling down.
    pub fn raise(&mut self) {
        if self.phase != AlertPhase::Cooldown {
            self.phase = AlertPhase::AlertPending;
        }
    }

    /// Feed the user's answer in. Returns false for stale answers, which
    /// change nothing.
    pub fn respond(&mut self, response: AlertResponse) -> bool {
        if self.phase != AlertPhase::AlertPending {
            return false;
        }
        match response {
            AlertResponse::Dismissed => {
                self.phase = AlertPhase::Idle;
            }
            AlertResponse::Confirmed => {
                self.phase = AlertPhase::Cooldown;
                self.remaining = self.window;
            }
        }
        true
    }

    /// Count `dt` against an active cooldown. Returns true exactly once, on
    /// the call that exhausts the window, after which the machine is `Idle`.
    pub fn advance(&mut self, dt: Duration) -> bool {
        if self.phase != AlertPhase::Cooldown {
            return false;
        }
        self.remaining = self.remaining.saturating_sub(dt);
        if self.remaining.is_zero() {
            self.phase = AlertPhase::Idle;
            return true;
        }
        false
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const SECOND: Duration = Duration::from_secs(1);

    #[test]
    fn breach_opens_the_prompt() {
        let mut machine = AlertMachine::new(Duration::from_secs(300));
        assert_eq!(machine.phase(), AlertPhase::Idle);
        machine.raise();
        assert_eq!(machine.phase(), AlertPhase::AlertPending);
        // Another breach while the prompt is open keeps it open.
        machine.raise();
        assert_eq!(machine.phase(), AlertPhase::AlertPending);
    }

    #[test]
    fn dismissal_returns_to_idle() {
        let mut machine = AlertMachine::new(Duration::from_secs(300));
        machine.raise();
        assert!(machine.respond(AlertResponse::Dismissed));
        assert_eq!(machine.phase(), AlertPhase::Idle);
        assert_eq!(machine.remaining_cooldown(), Duration::ZERO);
    }

    #[test]
    fn stale_answers_are_dropped() {
        let mut machine = AlertMachine::new(Duration::from_secs(300));
        assert!(!machine.respond(AlertResponse::Dismissed));
        assert!(!machine.respond(AlertResponse::Confirmed));
        assert_eq!(machine.phase(), AlertPhase::Idle);

        machine.raise();
        assert!(machine.respond(AlertResponse::Dismissed));
        // A second answer to the same prompt is stale too.
        assert!(!machine.respond(AlertResponse::Dismissed));
        assert_eq!(machine.phase(), AlertPhase::Idle);
    }

    #[test]
    fn confirmation_arms_the_full_window() {
        let mut machine = AlertMachine::new(Duration::from_secs(300));
        machine.raise();
        assert!(machine.respond(AlertResponse::Confirmed));
        assert!(machine.in_cooldown());
        assert_eq!(machine.remaining_cooldown(), Duration::from_secs(300));
    }

    #[test]
    fn cooldown_expires_on_the_final_tick() {
        let mut machine = AlertMachine::new(Duration::from_secs(300));
        machine.raise();
        machine.respond(AlertResponse::Confirmed);

        for _ in 0..299 {
            assert!(!machine.advance(SECOND));
            assert!(machine.in_cooldown());
        }
        assert!(machine.advance(SECOND));
        assert_eq!(machine.phase(), AlertPhase::Idle);
        // Expired machines no longer report an ending.
        assert!(!machine.advance(SECOND));
    }

    #[test]
    fn cooldown_cannot_be_cancelled() {
        let mut machine = AlertMachine::new(Duration::from_secs(300));
        machine.raise();
        machine.respond(AlertResponse::Confirmed);

        machine.advance(SECOND);
        assert!(!machine.respond(AlertResponse::Dismissed));
        machine.raise();
        assert!(machine.in_cooldown());
        assert_eq!(
            machine.remaining_cooldown(),
            Duration::from_secs(299)
        );
    }

    #[test]
    fn advance_handles_uneven_steps() {
        let mut machine = AlertMachine::new(Duration::from_secs(300));
        machine.raise();
        machine.respond(AlertResponse::Confirmed);

        assert!(!machine.advance(Duration::from_secs(150)));
        assert!(machine.advance(Duration::from_secs(200)));
        assert_eq!(machine.phase(), AlertPhase::Idle);
    }
}
