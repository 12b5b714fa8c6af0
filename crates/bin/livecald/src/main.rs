//! # livecald: live calendar daemon
//!
//! Composition root that wires a calendar file to a live event and logs
//! every state it publishes.
//!
//! ## Responsibilities
//! - Load configuration (config file, env vars)
//! - Initialize logging
//! - Load the events file into a static calendar bridge and reload it
//!   periodically, notifying the live event of changes
//! - Construct the live event controller and the state bus
//! - Dispose the live event on shutdown (SIGINT)
//!
//! ## Dependency rule
//! This is the **only** crate that depends on all other crates.
//! It is the wiring layer; no scheduling logic belongs here.

mod config;
mod source;

use std::sync::Arc;
use std::time::Duration;

use anyhow::Context;
use tokio::sync::broadcast;
use tokio::time::MissedTickBehavior;
use tracing_subscriber::EnvFilter;

use livecal_adapter_static_calendar::StaticBridge;
use livecal_app::live_event::LiveEventController;
use livecal_app::ports::SystemClock;
use livecal_app::state_bus::{LiveUpdate, StateBus};

use config::Config;
use source::{CalendarSource, SyncOutcome};

type LiveEvent = LiveEventController<Arc<StaticBridge>, Arc<StateBus>, SystemClock>;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let config_path = Config::path_from_env();
    let config = Config::load(&config_path)
        .with_context(|| format!("unable to load configuration from {}", config_path.display()))?;
    init_tracing(&config.logging.filter)?;

    // Calendar
    let bridge = Arc::new(StaticBridge::new());
    let mut source = CalendarSource::new(config.calendar.events_file.clone(), Arc::clone(&bridge));
    source.sync();

    // State bus
    let bus = Arc::new(StateBus::new(64));
    let updates = tokio::spawn(log_updates(bus.subscribe()));

    // Live event
    tracing::info!(
        events_file = %config.calendar.events_file.display(),
        offset = %config.live_event.reference_offset(),
        "livecald starting"
    );
    let live: LiveEvent =
        LiveEventController::new(Some(bridge), bus, SystemClock, config.live_event);
    if let Err(err) = live.initialize().await {
        tracing::error!(reason = %err.reason(), "live event initialization failed");
    }

    let mut reload = tokio::time::interval(Duration::from_secs(
        config.calendar.reload_interval_secs,
    ));
    reload.set_missed_tick_behavior(MissedTickBehavior::Delay);
    // the first tick completes immediately and the file was just read
    reload.tick().await;

    let shutdown = tokio::signal::ctrl_c();
    tokio::pin!(shutdown);
    loop {
        tokio::select! {
            result = &mut shutdown => {
                result.context("unable to listen for shutdown signal")?;
                break;
            }
            _ = reload.tick() => {
                let outcome = source.sync();
                notify(&live, outcome).await;
            }
        }
    }

    tracing::info!("shutting down");
    live.dispose().await;
    updates.abort();
    Ok(())
}

fn init_tracing(filter: &str) -> anyhow::Result<()> {
    let filter = EnvFilter::try_new(filter)
        .with_context(|| format!("invalid log filter {filter:?}"))?;
    tracing_subscriber::fmt().with_env_filter(filter).init();
    Ok(())
}

/// Tell the live event what the last reload changed.
async fn notify(live: &LiveEvent, outcome: SyncOutcome) {
    let result = if outcome.calendar_changed {
        live.calendar_updated().await
    } else if let Some(status) = outcome.status_changed {
        live.bridge_status_changed(status).await
    } else {
        return;
    };
    if let Err(err) = result {
        tracing::warn!(reason = %err.reason(), "live event update failed");
    }
}

async fn log_updates(mut rx: broadcast::Receiver<LiveUpdate>) {
    loop {
        match rx.recv().await {
            Ok(LiveUpdate::State(state)) => {
                if let Ok(json) = serde_json::to_string(&state) {
                    tracing::debug!(state = %json, "live state published");
                }
                for (channel, value) in state.channels() {
                    tracing::info!(%channel, %value, "channel updated");
                }
            }
            Ok(LiveUpdate::Status(status)) => {
                tracing::info!(%status, "live event status");
            }
            Err(broadcast::error::RecvError::Lagged(skipped)) => {
                tracing::warn!(skipped, "update logger lagged behind");
            }
            Err(broadcast::error::RecvError::Closed) => break,
        }
    }
}
