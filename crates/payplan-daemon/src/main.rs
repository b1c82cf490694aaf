//! payplan-daemon: commission and revenue-split service.
//!
//! Single OS process running a Tokio async runtime. The backend pushes
//! mirrored rows and the dashboard reads snapshots over JSON-RPC on a
//! Unix socket.

mod commands;
mod config;
mod events;
mod read_model;
mod rpc;

use std::sync::Arc;

use payplan_types::events::{Event, EventType};
use payplan_types::{epoch_day, SECONDS_PER_DAY};
use tokio::sync::{broadcast, Mutex};
use tokio::task::JoinHandle;
use tracing::{error, info, warn};

use crate::config::DaemonConfig;
use crate::events::{now_secs, EventBus};
use crate::read_model::ReadModel;
use crate::rpc::RpcServer;

/// Daemon-wide shared state.
pub struct DaemonState {
    /// Database connection.
    pub db: Arc<Mutex<rusqlite::Connection>>,
    /// Configuration.
    pub config: DaemonConfig,
    /// Event bus for pushing change events to subscribers.
    pub event_bus: EventBus,
    /// Cached dashboard snapshots.
    pub read_model: Arc<ReadModel>,
    /// Shutdown signal sender.
    pub shutdown_tx: broadcast::Sender<()>,
}

impl DaemonState {
    fn new(conn: rusqlite::Connection, config: DaemonConfig) -> Self {
        let (shutdown_tx, _) = broadcast::channel(1);
        Self {
            db: Arc::new(Mutex::new(conn)),
            event_bus: EventBus::new(config.refresh.event_buffer),
            read_model: Arc::new(ReadModel::new()),
            config,
            shutdown_tx,
        }
    }
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // 1. Load config; the log level lives there.
    let config = DaemonConfig::load()?;

    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::from_default_env()
                .add_directive(format!("payplan={}", config.logging.level).parse()?),
        )
        .init();

    info!("payplan daemon starting");

    let data_dir = config.data_dir();
    std::fs::create_dir_all(&data_dir)?;

    // 2. Open database
    let conn = payplan_db::open(&data_dir.join("payplan.db"))?;

    // 3. Build daemon state
    let state = Arc::new(DaemonState::new(conn, config));

    // 4. Background tasks
    let listener = state
        .read_model
        .clone()
        .spawn_listener(&state.event_bus, state.shutdown_tx.subscribe());
    let poller = spawn_poller(state.clone());

    // 5. Start IPC server
    let socket_path = data_dir.join("payplan.sock");
    let rpc_server = RpcServer::new(state.clone(), socket_path.clone());
    info!(socket = ?socket_path, "starting JSON-RPC server");

    // 6. Run until shutdown
    let mut shutdown_rx = state.shutdown_tx.subscribe();
    tokio::select! {
        result = rpc_server.run() => {
            if let Err(e) = result {
                error!(error = %e, "RPC server error");
            }
        }
        _ = shutdown_rx.recv() => {
            info!("shutdown signal received");
        }
        _ = tokio::signal::ctrl_c() => {
            info!("Ctrl-C received, shutting down");
        }
    }

    let _ = state.shutdown_tx.send(());
    for (name, task) in [("listener", listener), ("poller", poller)] {
        if let Err(e) = task.await {
            warn!(task = name, error = %e, "background task ended abnormally");
        }
    }

    let _ = std::fs::remove_file(&socket_path);
    info!("daemon stopped");
    Ok(())
}

/// Periodically force a full refresh and prune old earnings rows.
///
/// The refresh covers any change the backend made without pushing it.
fn spawn_poller(state: Arc<DaemonState>) -> JoinHandle<()> {
    let mut shutdown = state.shutdown_tx.subscribe();
    let mut ticker = tokio::time::interval(state.config.refresh.poll_interval());
    tokio::spawn(async move {
        loop {
            tokio::select! {
                _ = ticker.tick() => poll_once(&state).await,
                _ = shutdown.recv() => break,
            }
        }
    })
}

async fn poll_once(state: &DaemonState) {
    let now = now_secs();
    let retention = state.config.refresh.earnings_retention_days;
    let keep_from = epoch_day(now.saturating_sub(retention.saturating_mul(SECONDS_PER_DAY)));

    let pruned = {
        let db = state.db.lock().await;
        payplan_db::queries::earnings::prune_before(&db, keep_from)
    };
    match pruned {
        Ok(0) => {}
        Ok(rows) => info!(rows, keep_from, "pruned old daily earnings"),
        Err(e) => warn!(error = %e, "earnings prune failed"),
    }

    state.event_bus.emit(Event::global(EventType::Refresh, now));
    tracing::debug!(sequence = state.event_bus.sequence(), "refresh emitted");
}

#[cfg(test)]
pub(crate) fn test_state() -> Arc<DaemonState> {
    let conn = payplan_db::open_memory().expect("open in-memory db");
    Arc::new(DaemonState::new(conn, DaemonConfig::default()))
}
