mod config;
mod net;
mod script;
mod session;
mod snapshot;

use std::time::Duration;

use canvas::engine::EngineCore;
use clap::Parser;

use crate::config::{Cli, ConfigError};
use crate::net::backoff::Backoff;
use crate::net::sync_client::{SyncHandle, spawn_sync_client};
use crate::session::{RunOptions, Session};
use crate::snapshot::SnapshotError;

const SYNC_SHUTDOWN_GRACE: Duration = Duration::from_secs(2);

#[derive(Debug, thiserror::Error)]
enum ClientError {
    #[error(transparent)]
    Config(#[from] ConfigError),
    #[error(transparent)]
    Snapshot(#[from] SnapshotError),
}

#[tokio::main(flavor = "current_thread")]
async fn main() -> Result<(), ClientError> {
    tracing_subscriber::fmt::init();

    let cli = Cli::parse();
    let config = config::resolve(&cli).await?;
    tracing::info!(
        ws_url = %config.ws_url,
        width = config.engine.width,
        height = config.engine.height,
        "sketchboard starting"
    );

    let SyncHandle { outbound, events, task } = spawn_sync_client(config.ws_url.clone(), Backoff::default());
    let ui = config.input.clone().map(script::spawn_script_reader);
    let session = Session::new(EngineCore::new(config.engine.clone()), outbound);
    let options = RunOptions { frame_interval: config.frame_interval, linger: config.linger };

    let session = session::run(session, events, ui, options, shutdown_signal()).await;
    tracing::info!(
        status = ?session.status(),
        participants = session.engine().roster.len(),
        "session ended"
    );
    let engine = session.into_engine();

    // The session held the last outbound sender; the socket task closes on its own.
    if tokio::time::timeout(SYNC_SHUTDOWN_GRACE, task).await.is_err() {
        tracing::warn!("sync client did not stop in time");
    }

    if let Some(path) = &config.snapshot {
        snapshot::write_png(path, engine.surface.raster(), engine.overlay.layer())?;
    }
    tracing::info!("sketchboard stopped");
    Ok(())
}

async fn shutdown_signal() {
    if let Err(e) = tokio::signal::ctrl_c().await {
        tracing::error!(error = %e, "failed to listen for ctrl-c");
        std::future::pending::<()>().await;
    }
}
