// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

// Allow panic!/unwrap/expect in test code
#![cfg_attr(test, allow(clippy::panic))]
#![cfg_attr(test, allow(clippy::unwrap_used))]
#![cfg_attr(test, allow(clippy::expect_used))]

//! spine-server: the HTTP service around the Spine job coordination core.
//!
//! Request flow: bearer token → role → per-job claim lock → read record →
//! state machine transition → atomic write + event append → response.
//! The lease reaper runs the same pipeline from a detached periodic task.

pub mod auth;
pub mod config;
pub mod error;
pub mod reaper;
pub mod routes;
pub mod service;

pub use config::{Config, ConfigError};
pub use error::ApiError;
pub use routes::{router, AppState};
pub use service::{JobService, ReapStats};
