// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! spined: the Spine job queue server.

use std::sync::Arc;

use anyhow::Context;
use spine_core::SystemClock;
use spine_server::{config::Config, reaper, routes, service::JobService};
use spine_storage::{BlobStore, JobStore};
use tokio_util::sync::CancellationToken;
use tracing::info;
use tracing_subscriber::EnvFilter;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")))
        .init();

    let config = Config::from_env().context("loading configuration")?;

    let store = JobStore::open(&config.data_dir)
        .with_context(|| format!("opening job store under {}", config.data_dir.display()))?;
    let blobs = BlobStore::open(&config.data_dir)
        .with_context(|| format!("opening blob store under {}", config.data_dir.display()))?;

    let lease = chrono::Duration::from_std(config.lease).context("lease duration out of range")?;
    let service =
        JobService::new(store, Arc::new(SystemClock), lease, config.default_max_attempts);

    let shutdown = CancellationToken::new();
    let reaper = reaper::spawn(service.clone(), config.reaper_interval, shutdown.clone());

    let state = Arc::new(routes::AppState {
        jobs: service,
        blobs,
        tokens: config.tokens.clone(),
    });
    let app = routes::router(state);

    let listener = tokio::net::TcpListener::bind(config.listen_addr())
        .await
        .with_context(|| format!("binding {}", config.listen_addr()))?;
    info!("listening on {}", listener.local_addr()?);

    axum::serve(listener, app)
        .with_graceful_shutdown(async {
            let _ = tokio::signal::ctrl_c().await;
        })
        .await
        .context("server error")?;

    shutdown.cancel();
    let _ = reaper.await;
    info!("shutdown complete");
    Ok(())
}
