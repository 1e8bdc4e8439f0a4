// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! The job record.

use crate::id::JobId;
use crate::role::Role;
use crate::status::JobStatus;
use crate::target::Target;
use crate::time_fmt::{serde_rfc3339_ms, serde_rfc3339_ms_opt};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

/// A comment attached to a job by the head or a claw.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Comment {
    #[serde(with = "serde_rfc3339_ms")]
    pub t: DateTime<Utc>,
    pub by: String,
    pub text: String,
}

/// Inputs for creating a job.
#[derive(Debug, Clone, Default)]
pub struct JobDraft {
    pub target: Target,
    pub spec: String,
    pub meta: Map<String, Value>,
    pub max_attempts: Option<u32>,
}

/// A job record.
///
/// The persisted JSON object is the authoritative state; per-job event
/// logs are diagnostic only. All mutations go through [`crate::machine`],
/// serialized per job by the claim lock in the storage layer.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Job {
    pub id: JobId,
    pub target: Target,
    pub status: JobStatus,
    #[serde(with = "serde_rfc3339_ms")]
    pub created_at: DateTime<Utc>,
    #[serde(with = "serde_rfc3339_ms")]
    pub updated_at: DateTime<Utc>,
    pub created_by: String,
    /// Set while running; retained after `complete` as an audit field.
    pub claimed_by: Option<String>,
    /// Non-null iff the job is running.
    #[serde(default, with = "serde_rfc3339_ms_opt")]
    pub lease_until: Option<DateTime<Utc>>,
    /// Successful claims so far. Never exceeds `max_attempts`.
    pub attempts: u32,
    pub max_attempts: u32,
    /// Free-form instruction to the worker.
    pub spec: String,
    pub meta: Map<String, Value>,
    pub comments: Vec<Comment>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub progress: Option<Value>,
    pub result: Option<Value>,
    pub error: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub release_reason: Option<String>,
}

impl Job {
    /// Create a queued job. Only the head creates jobs.
    pub fn create(draft: JobDraft, default_max_attempts: u32, now: DateTime<Utc>) -> Self {
        Self {
            id: JobId::new(),
            target: draft.target,
            status: JobStatus::Queued,
            created_at: now,
            updated_at: now,
            created_by: Role::Head.as_str().to_string(),
            claimed_by: None,
            lease_until: None,
            attempts: 0,
            max_attempts: draft.max_attempts.unwrap_or(default_max_attempts),
            spec: draft.spec,
            meta: draft.meta,
            comments: Vec::new(),
            progress: None,
            result: None,
            error: None,
            release_reason: None,
        }
    }

    pub fn is_terminal(&self) -> bool {
        self.status.is_terminal()
    }

    /// True when the job is running but its lease has lapsed.
    pub fn lease_expired(&self, now: DateTime<Utc>) -> bool {
        self.status == JobStatus::Running
            && self.lease_until.is_some_and(|until| until <= now)
    }

    /// Check the record invariants. Exercised after every transition in
    /// tests.
    ///
    /// `claimedBy` may outlive the lease on completed jobs (audit trail),
    /// so the reverse implication is only checked for `leaseUntil`.
    pub fn invariants_hold(&self) -> bool {
        let running_shape = self.status != JobStatus::Running
            || (self.claimed_by.is_some() && self.lease_until.is_some());
        let lease_implies_running =
            self.lease_until.is_none() || self.status == JobStatus::Running;
        running_shape && lease_implies_running && self.attempts <= self.max_attempts
    }
}

#[cfg(test)]
#[path = "job_tests.rs"]
mod tests;
