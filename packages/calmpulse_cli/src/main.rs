// src/main.rs
//! CalmPulse terminal harness.
//!
//! `monitor` runs the vitals engine interactively with the panic-check
//! prompt on stdin. `listen` runs the bridge listener standalone. `bridge`
//! plays the external device bridge so the listener has something to
//! connect to during development.

use std::time::Duration;

use anyhow::Result;
use clap::{Parser, Subcommand, ValueEnum};
use tokio::io::{AsyncBufReadExt, AsyncWriteExt, BufReader};
use tokio::net::{TcpListener, TcpStream};
use tokio::sync::broadcast;
use tokio::sync::broadcast::error::RecvError;
use tokio::time::{self, MissedTickBehavior};

use calmpulse::coping::CopingDeck;
use calmpulse::session::{FeedOrigin, FeedPolicy, Route, Session, SessionEvent};
use calmpulse::telemetry::listener::{BridgeConfig, BridgeEvent, BridgeListener};
use calmpulse::vitals::alert::AlertResponse;
use calmpulse::vitals::engine::VitalsEngine;
use calmpulse::vitals::rates::UniformHeartRate;
use calmpulse::vitals::simulator::SimulatorConfig;

#[derive(Parser)]
#[command(name = "calmpulse-cli", about = "CalmPulse vitals engine and bridge tools")]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Clone, Copy, ValueEnum)]
enum PolicyArg {
    /// Telemetry stays in the logs; the display is simulated
    SimulatedOnly,
    /// Live readings drive the display while the bridge is connected
    PreferLive,
}

impl From<PolicyArg> for FeedPolicy {
    fn from(arg: PolicyArg) -> Self {
        match arg {
            PolicyArg::SimulatedOnly => FeedPolicy::SimulatedOnly,
            PolicyArg::PreferLive => FeedPolicy::PreferLive,
        }
    }
}

#[derive(Subcommand)]
enum Commands {
    /// Run the vitals monitor with the interactive panic-check prompt
    Monitor {
        /// Also connect to a device bridge at this address
        #[arg(long)]
        bridge: Option<String>,
        /// Which feed drives the displayed heart rate
        #[arg(long, value_enum, default_value = "simulated-only")]
        policy: PolicyArg,
    },
    /// Connect to a device bridge and print derived readings
    Listen {
        /// Bridge address
        #[arg(long, default_value = "127.0.0.1:8080")]
        addr: String,
    },
    /// Act as a fake device bridge emitting IBI/GSR frames
    Bridge {
        /// Address to listen on
        #[arg(long, default_value = "127.0.0.1:8080")]
        addr: String,
        /// Milliseconds between frames
        #[arg(long, default_value_t = 1000)]
        period_ms: u64,
    },
}

#[tokio::main]
async fn main() -> Result<()> {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();

    let cli = Cli::parse();
    match cli.command {
        Commands::Monitor { bridge, policy } => run_monitor(bridge, policy.into()).await,
        Commands::Listen { addr } => run_listen(addr).await,
        Commands::Bridge { addr, period_ms } => run_bridge(addr, period_ms).await,
    }
}

async fn run_monitor(bridge: Option<String>, policy: FeedPolicy) -> Result<()> {
    let engine = VitalsEngine::spawn(SimulatorConfig::default(), UniformHeartRate::default());
    let mut vitals_rx = engine.subscribe();
    let mut session = Session::new(policy);
    let deck = CopingDeck::with_defaults();

    let mut bridge_rx = match bridge {
        Some(addr) => {
            let listener = BridgeListener::new(BridgeConfig {
                addr,
                ..BridgeConfig::default()
            });
            let rx = listener.events();
            tokio::spawn(async move {
                if let Err(e) = listener.run().await {
                    log::warn!("bridge listener stopped: {}", e);
                }
            });
            Some(rx)
        }
        None => None,
    };

    println!("Monitoring. Answer the panic check with y/n; Ctrl+C quits.");
    let mut stdin = BufReader::new(tokio::io::stdin()).lines();

    loop {
        tokio::select! {
            event = vitals_rx.recv() => match event {
                Ok(event) => {
                    for out in session.on_vitals(event) {
                        render(&out, &deck);
                    }
                }
                Err(RecvError::Lagged(skipped)) => {
                    log::warn!("vitals feed lagged, skipped {} events", skipped);
                }
                Err(RecvError::Closed) => break,
            },
            event = recv_bridge(&mut bridge_rx) => match event {
                Some(event) => {
                    for out in session.on_bridge(event) {
                        render(&out, &deck);
                    }
                }
                None => bridge_rx = None,
            },
            line = stdin.next_line() => match line? {
                Some(line) => match line.trim() {
                    "y" | "yes" => engine.respond(AlertResponse::Confirmed).await,
                    "n" | "no" => engine.respond(AlertResponse::Dismissed).await,
                    "" => {}
                    other => println!("unrecognized answer: {}", other),
                },
                None => break,
            },
            _ = tokio::signal::ctrl_c() => break,
        }
    }

    engine.shutdown().await;
    Ok(())
}

/// Receive from the optional live feed; parks forever once the feed is gone
/// so the select loop stops polling it.
async fn recv_bridge(rx: &mut Option<broadcast::Receiver<BridgeEvent>>) -> Option<BridgeEvent> {
    match rx {
        None => std::future::pending().await,
        Some(receiver) => loop {
            match receiver.recv().await {
                Ok(event) => return Some(event),
                Err(RecvError::Lagged(skipped)) => {
                    log::warn!("bridge feed lagged, skipped {} events", skipped);
                }
                Err(RecvError::Closed) => return None,
            }
        },
    }
}

fn render(event: &SessionEvent, deck: &CopingDeck) {
    match event {
        SessionEvent::Waveform(point) => log::debug!("waveform point {:.2}", point),
        SessionEvent::Vitals(vitals) => println!(
            "HR {:>3} BPM  signal {}  [{}]",
            vitals.heart_rate,
            vitals.signal_quality,
            origin_label(vitals.origin)
        ),
        SessionEvent::PanicCheck { heart_rate } => {
            println!(
                "Heart rate spiked to {} BPM. Are you doing okay? [y/n]",
                heart_rate
            );
        }
        SessionEvent::Navigate(route) => {
            println!("-> {}", route.name());
            if *route == Route::CopingTools {
                print_deck(deck);
            }
        }
        SessionEvent::CooldownStarted(window) => {
            println!("Cooldown started: {}s of quiet time.", window.as_secs());
        }
        SessionEvent::CooldownEnded => println!("Cooldown over. Monitoring resumed."),
        SessionEvent::BridgeStatus { connected } => {
            println!(
                "bridge {}",
                if *connected { "connected" } else { "disconnected" }
            );
        }
    }
}

fn origin_label(origin: FeedOrigin) -> &'static str {
    match origin {
        FeedOrigin::Simulated => "sim",
        FeedOrigin::Live => "live",
    }
}

fn print_deck(deck: &CopingDeck) {
    for suggestion in deck.items() {
        println!(
            "  {}. {} - {}",
            suggestion.id, suggestion.title, suggestion.description
        );
    }
}

async fn run_listen(addr: String) -> Result<()> {
    let listener = BridgeListener::new(BridgeConfig {
        addr,
        ..BridgeConfig::default()
    });
    let mut events = listener.events();

    let printer = tokio::spawn(async move {
        loop {
            match events.recv().await {
                Ok(BridgeEvent::Reading(reading)) => println!(
                    "{} BPM  GSR {}  at {}",
                    reading.heart_rate,
                    reading.gsr,
                    reading.received_at.format("%H:%M:%S%.3f")
                ),
                Ok(_) => {}
                Err(RecvError::Lagged(_)) => {}
                Err(RecvError::Closed) => break,
            }
        }
    });

    let result = listener.run().await;
    drop(listener);
    let _ = printer.await;
    result?;
    Ok(())
}

async fn run_bridge(addr: String, period_ms: u64) -> Result<()> {
    let listener = TcpListener::bind(&addr).await?;
    println!(
        "Serving IBI/GSR frames on {} every {}ms. Ctrl+C stops.",
        addr, period_ms
    );

    loop {
        tokio::select! {
            accepted = listener.accept() => {
                let (stream, peer) = accepted?;
                log::info!("client connected from {}", peer);
                tokio::spawn(async move {
                    if let Err(e) = serve_client(stream, period_ms).await {
                        log::info!("client {} dropped: {}", peer, e);
                    }
                });
            }
            _ = tokio::signal::ctrl_c() => {
                println!("stopping bridge");
                return Ok(());
            }
        }
    }
}

async fn serve_client(stream: TcpStream, period_ms: u64) -> std::io::Result<()> {
    let (read_half, mut write_half) = stream.into_split();

    // The app greets first; log it like a real bridge would.
    let mut lines = BufReader::new(read_half).lines();
    if let Some(greeting) = lines.next_line().await? {
        log::info!("client greeting: {}", greeting);
    }

    let mut ticker = time::interval(Duration::from_millis(period_ms));
    ticker.set_missed_tick_behavior(MissedTickBehavior::Skip);
    let mut beat = 0u64;

    loop {
        ticker.tick().await;
        beat += 1;
        // Resting rhythm with a slow drift, so the derived BPM wanders
        // around 75 instead of sitting still.
        let drift = (beat as f64 * 0.05).sin() * 60.0 + (beat as f64 * 0.1).cos() * 20.0;
        let ibi = 800.0 + drift;
        let gsr = 0.30 + (beat as f64 * 0.02).sin() * 0.05;
        let frame = serde_json::json!({ "IBI": ibi, "GSR": gsr });
        let mut line = frame.to_string();
        line.push('\n');
        write_half.write_all(line.as_bytes()).await?;
    }
}
