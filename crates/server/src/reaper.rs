// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Lease reaper task.
//!
//! Sweeps once at startup and then on every interval tick, returning
//! expired running jobs to the queue or marking them dead when attempts
//! are exhausted. Shares the claim lock with request handlers and skips
//! contended records until the next pass.

use std::time::Duration;

use tokio::task::JoinHandle;
use tokio::time::MissedTickBehavior;
use tokio_util::sync::CancellationToken;
use tracing::{debug, info};

use crate::service::JobService;

/// Spawn the reaper. Cancel the token to stop it at shutdown.
pub fn spawn(
    service: JobService,
    interval: Duration,
    shutdown: CancellationToken,
) -> JoinHandle<()> {
    tokio::spawn(run(service, interval, shutdown))
}

async fn run(service: JobService, interval: Duration, shutdown: CancellationToken) {
    let mut timer = tokio::time::interval(interval);
    timer.set_missed_tick_behavior(MissedTickBehavior::Delay);
    // The first tick fires immediately: that is the startup sweep.
    loop {
        tokio::select! {
            _ = shutdown.cancelled() => {
                debug!("reaper stopped");
                return;
            }
            _ = timer.tick() => {
                let stats = service.reap_pass();
                if stats.requeued > 0 || stats.dead > 0 {
                    info!(requeued = stats.requeued, dead = stats.dead, "lease sweep");
                }
            }
        }
    }
}

#[cfg(test)]
#[path = "reaper_tests.rs"]
mod tests;
