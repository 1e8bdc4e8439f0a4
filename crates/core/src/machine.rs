// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Job state machine.
//!
//! Pure transition functions over a job record. Callers hold the claim
//! lock, apply a transition here, then persist the record and append the
//! matching event; nothing in this module touches disk.

use crate::job::{Comment, Job};
use crate::role::Role;
use crate::status::JobStatus;
use chrono::{DateTime, Duration, Utc};
use thiserror::Error;

/// Why a transition was refused. Maps one-to-one onto the 409
/// discriminators of the HTTP surface.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
pub enum TransitionError {
    /// The job is running under a live lease.
    #[error("job is already claimed")]
    AlreadyClaimed,
    /// The job is in a sticky terminal status.
    #[error("job is in a terminal status")]
    TerminalStatus,
    /// The operation requires a running job.
    #[error("job is not running")]
    NotRunning,
    /// No claim attempts remain.
    #[error("max attempts reached")]
    MaxAttemptsReached,
}

/// What a successful claim validation did to the record.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ClaimOutcome {
    /// Running under a fresh lease; `attempts` was incremented.
    Claimed,
    /// Attempts were already exhausted; the record was marked dead in
    /// place and must still be persisted.
    MaxedOut,
}

/// Where a failure routed the job.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FailOutcome {
    Requeued,
    Failed,
    Dead,
}

/// What the reaper did to an expired record.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ReapOutcome {
    Requeued,
    Dead,
}

/// Claim a job for a worker.
///
/// A running job whose lease has expired is treated as available and
/// reclaimed immediately rather than bouncing the caller until the
/// reaper runs. The attempt bound applies either way: a maxed-out record
/// is transitioned to dead in place ([`ClaimOutcome::MaxedOut`]).
pub fn claim(
    job: &mut Job,
    role: Role,
    lease: Duration,
    now: DateTime<Utc>,
) -> Result<ClaimOutcome, TransitionError> {
    if job.is_terminal() {
        return Err(TransitionError::TerminalStatus);
    }
    if job.status == JobStatus::Running && !job.lease_expired(now) {
        return Err(TransitionError::AlreadyClaimed);
    }
    if job.attempts >= job.max_attempts {
        job.status = JobStatus::Dead;
        job.claimed_by = None;
        job.lease_until = None;
        job.updated_at = now;
        return Ok(ClaimOutcome::MaxedOut);
    }
    job.status = JobStatus::Running;
    job.claimed_by = Some(role.as_str().to_string());
    job.lease_until = Some(now + lease);
    job.attempts += 1;
    job.updated_at = now;
    Ok(ClaimOutcome::Claimed)
}

/// Extend the lease and optionally record progress.
///
/// Idempotent with respect to `status`, `attempts`, and `claimedBy`.
pub fn heartbeat(
    job: &mut Job,
    progress: Option<serde_json::Value>,
    lease: Duration,
    now: DateTime<Utc>,
) -> Result<(), TransitionError> {
    if job.status != JobStatus::Running {
        return Err(TransitionError::NotRunning);
    }
    job.lease_until = Some(now + lease);
    if let Some(p) = progress {
        job.progress = Some(p);
    }
    job.updated_at = now;
    Ok(())
}

/// Finish the job successfully.
///
/// `claimedBy` is intentionally retained as a record of who completed
/// the job; `fail` and `release` clear it.
pub fn complete(
    job: &mut Job,
    result: Option<serde_json::Value>,
    now: DateTime<Utc>,
) -> Result<(), TransitionError> {
    if job.status != JobStatus::Running {
        return Err(TransitionError::NotRunning);
    }
    job.status = JobStatus::Done;
    job.result = result;
    job.error = None;
    job.lease_until = None;
    job.updated_at = now;
    Ok(())
}

/// Report a failed run.
///
/// Requeues when the caller did not opt out and attempts remain;
/// otherwise the job lands on `failed`, or `dead` when attempts are
/// exhausted. Attempts are not changed; the increment happened at claim.
pub fn fail(
    job: &mut Job,
    error: Option<String>,
    requeue: bool,
    now: DateTime<Utc>,
) -> Result<FailOutcome, TransitionError> {
    if job.status != JobStatus::Running {
        return Err(TransitionError::NotRunning);
    }
    job.claimed_by = None;
    job.lease_until = None;
    job.error = error;
    job.updated_at = now;
    let outcome = if requeue && job.attempts < job.max_attempts {
        job.status = JobStatus::Queued;
        FailOutcome::Requeued
    } else if job.attempts >= job.max_attempts {
        job.status = JobStatus::Dead;
        FailOutcome::Dead
    } else {
        job.status = JobStatus::Failed;
        FailOutcome::Failed
    };
    Ok(outcome)
}

/// Voluntarily give the job back to the queue. Attempts are unchanged.
pub fn release(
    job: &mut Job,
    reason: Option<String>,
    now: DateTime<Utc>,
) -> Result<(), TransitionError> {
    if job.status != JobStatus::Running {
        return Err(TransitionError::NotRunning);
    }
    job.status = JobStatus::Queued;
    job.claimed_by = None;
    job.lease_until = None;
    if let Some(r) = reason {
        job.release_reason = Some(r);
    }
    job.updated_at = now;
    Ok(())
}

/// Append a comment. Allowed in any status.
pub fn comment(job: &mut Job, by: Role, text: String, now: DateTime<Utc>) {
    job.comments.push(Comment { t: now, by: by.as_str().to_string(), text });
    job.updated_at = now;
}

/// The reaper's transition for a running record with a lapsed lease.
///
/// Returns `None` when the record no longer needs reaping (the caller
/// re-reads under the lock before applying). Attempts are not
/// re-incremented on the requeue path.
pub fn expire(job: &mut Job, now: DateTime<Utc>) -> Option<ReapOutcome> {
    if !job.lease_expired(now) {
        return None;
    }
    job.claimed_by = None;
    job.lease_until = None;
    job.updated_at = now;
    if job.attempts >= job.max_attempts {
        job.status = JobStatus::Dead;
        Some(ReapOutcome::Dead)
    } else {
        job.status = JobStatus::Queued;
        Some(ReapOutcome::Requeued)
    }
}

#[cfg(test)]
#[path = "machine_tests.rs"]
mod tests;
