// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Centralized environment configuration for the server.

use std::collections::HashMap;
use std::net::{IpAddr, Ipv4Addr, SocketAddr};
use std::path::PathBuf;
use std::str::FromStr;
use std::time::Duration;

use spine_core::Role;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("invalid value for {0}: {1:?}")]
    Invalid(&'static str, String),

    /// Startup refuses to proceed with an unauthenticatable role.
    #[error("no tokens configured for role {0}")]
    EmptyTokenSet(Role),

    #[error("token is assigned to more than one role")]
    DuplicateToken,
}

/// Server configuration, loaded once at startup. The token map is
/// read-only afterwards.
#[derive(Debug, Clone)]
pub struct Config {
    pub port: u16,
    pub bind: IpAddr,
    pub data_dir: PathBuf,
    /// How long a claim's lease lasts before the reaper may revoke it.
    pub lease: Duration,
    /// Sweep cadence; keep well below the lease duration.
    pub reaper_interval: Duration,
    pub default_max_attempts: u32,
    /// Accepted bearer tokens and the role each resolves to.
    pub tokens: HashMap<String, Role>,
}

/// Token bindings per role. Both the single and the CSV variable
/// contribute to the set, so operators can rotate tokens by overlapping
/// old and new.
const TOKEN_VARS: [(Role, &str, &str); 3] = [
    (Role::Head, "SPINE_HEAD_TOKEN", "SPINE_HEAD_TOKENS"),
    (Role::LeftClaw, "SPINE_LEFT_CLAW_TOKEN", "SPINE_LEFT_CLAW_TOKENS"),
    (Role::RightClaw, "SPINE_RIGHT_CLAW_TOKEN", "SPINE_RIGHT_CLAW_TOKENS"),
];

impl Config {
    pub fn from_env() -> Result<Self, ConfigError> {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Build from any variable source. Tests pass a map; `from_env`
    /// passes the process environment.
    pub fn from_lookup<F>(lookup: F) -> Result<Self, ConfigError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let port = parse_or(&lookup, "SPINE_PORT", 7600)?;
        let bind = parse_or(&lookup, "SPINE_BIND", IpAddr::V4(Ipv4Addr::LOCALHOST))?;
        let data_dir =
            lookup("SPINE_DATA_DIR").map(PathBuf::from).unwrap_or_else(|| PathBuf::from("data"));
        let lease_secs: u64 = parse_or(&lookup, "SPINE_LEASE_SECS", 300)?;
        let reaper_ms: u64 = parse_or(&lookup, "SPINE_REAPER_INTERVAL_MS", 30_000)?;
        let default_max_attempts: u32 = parse_or(&lookup, "SPINE_DEFAULT_MAX_ATTEMPTS", 3)?;
        if default_max_attempts == 0 {
            return Err(ConfigError::Invalid("SPINE_DEFAULT_MAX_ATTEMPTS", "0".to_string()));
        }

        let mut tokens = HashMap::new();
        for (role, single, csv) in TOKEN_VARS {
            let set = role_tokens(&lookup, single, csv);
            if set.is_empty() {
                return Err(ConfigError::EmptyTokenSet(role));
            }
            for token in set {
                match tokens.insert(token, role) {
                    Some(previous) if previous != role => {
                        return Err(ConfigError::DuplicateToken);
                    }
                    _ => {}
                }
            }
        }

        Ok(Self {
            port,
            bind,
            data_dir,
            lease: Duration::from_secs(lease_secs),
            reaper_interval: Duration::from_millis(reaper_ms),
            default_max_attempts,
            tokens,
        })
    }

    pub fn listen_addr(&self) -> SocketAddr {
        SocketAddr::new(self.bind, self.port)
    }
}

fn parse_or<T, F>(lookup: &F, key: &'static str, default: T) -> Result<T, ConfigError>
where
    T: FromStr,
    F: Fn(&str) -> Option<String>,
{
    match lookup(key) {
        None => Ok(default),
        Some(raw) => raw.trim().parse().map_err(|_| ConfigError::Invalid(key, raw)),
    }
}

/// Merge the single and CSV bindings for one role. Whitespace is
/// trimmed, empties dropped; duplicates are coalesced by the caller's
/// map insert.
fn role_tokens<F>(lookup: &F, single: &str, csv: &str) -> Vec<String>
where
    F: Fn(&str) -> Option<String>,
{
    let mut out = Vec::new();
    if let Some(token) = lookup(single) {
        let token = token.trim();
        if !token.is_empty() {
            out.push(token.to_string());
        }
    }
    if let Some(list) = lookup(csv) {
        for part in list.split(',') {
            let part = part.trim();
            if !part.is_empty() {
                out.push(part.to_string());
            }
        }
    }
    out
}

#[cfg(test)]
#[path = "config_tests.rs"]
mod tests;
