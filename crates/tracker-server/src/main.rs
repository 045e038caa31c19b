//! Tracker-Over-IP server binary.
//!
//! Wires the pipeline together: serial link → device pump (OS thread) →
//! event channel → broadcast stage (tokio task) → per-station subscriber
//! registry fed by the connection multiplexer.

use std::path::PathBuf;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;
use std::time::Duration;

use anyhow::Context;
use tokio::io::{AsyncBufReadExt, BufReader};
use tokio::net::TcpListener;
use tokio::sync::{mpsc, watch};
use tracing::{error, info};
use tracing_subscriber::EnvFilter;

use tracker_server::application::{broadcast::run_broadcaster, EventPump};
use tracker_server::infrastructure::network::{ConnectionMultiplexer, SubscriberRegistry};
use tracker_server::infrastructure::storage::load_config;
use tracker_server::infrastructure::tracker_link::{commands, SerialLink};

/// Events buffered between the pump thread and the broadcast task.
const EVENT_CHANNEL_CAPACITY: usize = 1024;

/// How long to keep probing a silent tracker before giving up.
const DEVICE_WAIT_ATTEMPTS: u32 = 30;
const DEVICE_WAIT_RETRY: Duration = Duration::from_secs(1);

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let config_path = std::env::args()
        .nth(1)
        .map(PathBuf::from)
        .unwrap_or_else(|| PathBuf::from("tracker-server.toml"));
    let config = load_config(&config_path)
        .with_context(|| format!("failed to load config from '{}'", config_path.display()))?;

    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| EnvFilter::new(config.log_level.clone())),
        )
        .init();
    info!("Tracker-Over-IP server starting");

    // Bind before touching the device so a port clash fails fast.
    let bind_addr = format!("{}:{}", config.server.bind_address, config.server.port);
    let listener = TcpListener::bind(&bind_addr)
        .await
        .with_context(|| format!("failed to bind '{bind_addr}'"))?;
    info!(addr = %bind_addr, "listening for subscribers");

    let mut link = SerialLink::open(&config.device).context("failed to open tracker link")?;
    info!("waiting for the tracker to respond");
    commands::wait_for_device(&mut link, DEVICE_WAIT_ATTEMPTS, DEVICE_WAIT_RETRY)
        .context("tracker did not respond")?;
    commands::initialize(&mut link, &config.device.reference_frames)
        .context("tracker initialization failed")?;

    let station_count = config.device.station_count;
    let registry = Arc::new(SubscriberRegistry::new(usize::from(station_count)));
    let (event_tx, event_rx) = mpsc::channel(EVENT_CHANNEL_CAPACITY);
    let running = Arc::new(AtomicBool::new(true));
    let (shutdown_tx, shutdown_rx) = watch::channel(false);

    let pump = EventPump::new(link, station_count, event_tx, Arc::clone(&running));
    let pump_thread = std::thread::Builder::new()
        .name("tracker-pump".to_string())
        .spawn(move || pump.run())
        .context("failed to spawn the device pump thread")?;

    let broadcaster = tokio::spawn(run_broadcaster(event_rx, Arc::clone(&registry)));
    let multiplexer = ConnectionMultiplexer::new(listener, Arc::clone(&registry), station_count);
    let multiplexer_task = tokio::spawn(multiplexer.run(shutdown_rx));

    info!("server ready; press Enter or Ctrl-C to stop");
    wait_for_shutdown().await;

    // Teardown order matters: stop the pump first so the event channel
    // closes and the broadcast stage drains, then stop the multiplexer,
    // then close the remaining subscribers.
    info!("shutting down");
    running.store(false, Ordering::Relaxed);
    let _ = shutdown_tx.send(true);

    tokio::task::spawn_blocking(move || {
        if pump_thread.join().is_err() {
            error!("device pump thread panicked");
        }
    })
    .await
    .context("failed to join the device pump thread")?;

    broadcaster.await.context("broadcast stage failed")?;
    multiplexer_task
        .await
        .context("connection multiplexer failed")?;
    registry.close_all().await;

    info!("shutdown complete");
    Ok(())
}

/// Completes on Ctrl-C or a line on stdin, whichever comes first.
async fn wait_for_shutdown() {
    let mut stdin = BufReader::new(tokio::io::stdin());
    let mut line = String::new();
    tokio::select! {
        _ = tokio::signal::ctrl_c() => info!("interrupt received"),
        _ = stdin.read_line(&mut line) => info!("console shutdown requested"),
    }
}
