// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Diagnostic event records.
//!
//! One line per event in the job's append-only log. Events never feed
//! back into state; the job record is authoritative.

use crate::time_fmt::serde_rfc3339_ms;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

/// Kind of job event.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum EventKind {
    #[serde(rename = "job.created")]
    Created,
    #[serde(rename = "job.claimed")]
    Claimed,
    #[serde(rename = "job.heartbeat")]
    Heartbeat,
    #[serde(rename = "job.completed")]
    Completed,
    #[serde(rename = "job.failed")]
    Failed,
    #[serde(rename = "job.released")]
    Released,
    #[serde(rename = "job.comment")]
    Comment,
    #[serde(rename = "job.expired")]
    Expired,
    #[serde(rename = "job.dead")]
    Dead,
}

crate::simple_display! {
    EventKind {
        Created => "job.created",
        Claimed => "job.claimed",
        Heartbeat => "job.heartbeat",
        Completed => "job.completed",
        Failed => "job.failed",
        Released => "job.released",
        Comment => "job.comment",
        Expired => "job.expired",
        Dead => "job.dead",
    }
}

/// One event line: `{t, type, by}` plus free-form extra fields.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Event {
    #[serde(with = "serde_rfc3339_ms")]
    pub t: DateTime<Utc>,
    #[serde(rename = "type")]
    pub kind: EventKind,
    pub by: String,
    #[serde(flatten)]
    pub data: Map<String, Value>,
}

impl Event {
    pub fn new(kind: EventKind, by: &str, t: DateTime<Utc>) -> Self {
        Self { t, kind, by: by.to_string(), data: Map::new() }
    }

    /// Attach an extra field to the event payload.
    pub fn with(mut self, key: &str, value: impl Into<Value>) -> Self {
        self.data.insert(key.to_string(), value.into());
        self
    }
}

#[cfg(test)]
#[path = "event_tests.rs"]
mod tests;
