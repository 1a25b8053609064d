//! Async driver for the vitals simulator.
//!
//! Owns the state object on a spawned task and ticks it on a fixed-period
//! interval. Events fan out over a broadcast channel; prompt answers arrive
//! over a command channel. Dropping the handle (or calling `shutdown`)
//! closes the command channel and ends the task, so the interval is
//! released on every exit path.

use tokio::sync::{broadcast, mpsc};
use tokio::task::JoinHandle;
use tokio::time::{self, MissedTickBehavior};

use crate::vitals::alert::AlertResponse;
use crate::vitals::rates::HeartRateSource;
use crate::vitals::simulator::{Simulator, SimulatorConfig, VitalsEvent};

enum EngineCommand {
    Respond(AlertResponse),
}

/// Handle to a running vitals engine task.
pub struct VitalsEngine {
    events_tx: broadcast::Sender<VitalsEvent>,
    commands: mpsc::Sender<EngineCommand>,
    task: JoinHandle<()>,
}

impl VitalsEngine {
    /// Spawn the engine task. The first tick fires one full period after
    /// spawn. Missed ticks are skipped silently, with no catch-up.
    pub fn spawn<S>(config: SimulatorConfig, rates: S) -> Self
    where
        S: HeartRateSource + 'static,
    {
        let (events_tx, _) = broadcast::channel(64);
        let (commands, mut command_rx) = mpsc::channel(8);
        let tx = events_tx.clone();

        let task = tokio::spawn(async move {
            let tick_period = config.tick_period;
            let mut simulator = Simulator::new(config);
            let mut rates = rates;
            let mut ticker = time::interval_at(time::Instant::now() + tick_period, tick_period);
            ticker.set_missed_tick_behavior(MissedTickBehavior::Skip);

            loop {
                tokio::select! {
                    _ = ticker.tick() => {
                        for event in simulator.advance(tick_period, &mut rates) {
                            let _ = tx.send(event);
                        }
                    }
                    command = command_rx.recv() => match command {
                        Some(EngineCommand::Respond(response)) => {
                            for event in simulator.respond(response) {
                                let _ = tx.send(event);
                            }
                        }
                        None => break,
                    },
                }
            }
            log::debug!("vitals engine stopped");
        });

        Self {
            events_tx,
            commands,
            task,
        }
    }

    /// Subscribe to the engine's event stream. Subscribers only see events
    /// emitted after they subscribe.
    pub fn subscribe(&self) -> broadcast::Receiver<VitalsEvent> {
        self.events_tx.subscribe()
    }

    /// Answer an open panic-check prompt. Dropped silently if the engine
    /// has already stopped.
    pub async fn respond(&self, response: AlertResponse) {
        let _ = self.commands.send(EngineCommand::Respond(response)).await;
    }

    /// Stop the engine and wait for the task to finish.
    pub async fn shutdown(self) {
        drop(self.commands);
        let _ = self.task.await;
    }
}
