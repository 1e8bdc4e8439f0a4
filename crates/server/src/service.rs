// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Job operations.
//!
//! Every state-changing operation runs the same pipeline under the
//! per-job claim lock: read → authorize → transition → atomic write →
//! event append. Request handlers and the lease reaper both go through
//! here; the reaper holds no special privileges.

use std::sync::Arc;

use chrono::{DateTime, Duration, Utc};
use serde_json::Value;
use spine_core::{
    authz, machine, ClaimOutcome, Clock, Event, EventKind, FailOutcome, Job, JobDraft, JobStatus,
    ReapOutcome, Role, Target,
};
use spine_storage::{ClaimLock, JobStore, LockError};
use tracing::{debug, warn};

use crate::error::ApiError;

/// Name recorded on events the reaper emits.
const REAPER: &str = "reaper";

/// What one reaper pass did.
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq)]
pub struct ReapStats {
    pub requeued: usize,
    pub dead: usize,
}

#[derive(Clone)]
pub struct JobService {
    store: JobStore,
    clock: Arc<dyn Clock>,
    lease: Duration,
    default_max_attempts: u32,
}

impl JobService {
    pub fn new(
        store: JobStore,
        clock: Arc<dyn Clock>,
        lease: Duration,
        default_max_attempts: u32,
    ) -> Self {
        Self { store, clock, lease, default_max_attempts }
    }

    pub fn now(&self) -> DateTime<Utc> {
        self.clock.now()
    }

    /// Create a queued job. The head is the only caller.
    pub fn create(&self, draft: JobDraft) -> Result<Job, ApiError> {
        if draft.max_attempts == Some(0) {
            return Err(ApiError::BadRequest("maxAttempts must be positive"));
        }
        let now = self.now();
        let job = Job::create(draft, self.default_max_attempts, now);
        self.store.write(&job)?;
        self.log_event(
            &job,
            Event::new(EventKind::Created, Role::Head.as_str(), now)
                .with("target", job.target.to_string()),
        );
        Ok(job)
    }

    /// All records visible to `role`, filtered, ordered by creation time.
    pub fn list(
        &self,
        role: Role,
        status: Option<JobStatus>,
        target: Option<Target>,
    ) -> Result<Vec<Job>, ApiError> {
        let mut jobs: Vec<Job> = self
            .store
            .list()?
            .into_iter()
            .filter(|job| authz::can_access(role, job))
            .filter(|job| status.is_none_or(|s| job.status == s))
            .filter(|job| target.is_none_or(|t| job.target == t))
            .collect();
        jobs.sort_by(|a, b| {
            a.created_at.cmp(&b.created_at).then_with(|| a.id.as_str().cmp(b.id.as_str()))
        });
        Ok(jobs)
    }

    pub fn get(&self, role: Role, id: &str) -> Result<Job, ApiError> {
        let job = self.store.read(checked_id(id)?)?;
        if !authz::can_access(role, &job) {
            return Err(ApiError::Forbidden);
        }
        Ok(job)
    }

    /// Claim a job for a worker. The claim lock makes the race safe: at
    /// most one concurrent caller observes success.
    pub fn claim(&self, role: Role, id: &str) -> Result<Job, ApiError> {
        if !role.is_worker() {
            return Err(ApiError::Forbidden);
        }
        let id = checked_id(id)?;
        let _lock = ClaimLock::acquire(self.store.jobs_dir(), id)?;
        let mut job = self.store.read(id)?;
        if !authz::can_access(role, &job) {
            return Err(ApiError::Forbidden);
        }
        let now = self.now();
        match machine::claim(&mut job, role, self.lease, now)? {
            ClaimOutcome::Claimed => {
                self.store.write(&job)?;
                self.log_event(
                    &job,
                    Event::new(EventKind::Claimed, role.as_str(), now)
                        .with("attempts", job.attempts),
                );
                Ok(job)
            }
            ClaimOutcome::MaxedOut => {
                // Dead-lettered in place; persist, then report the refusal.
                self.store.write(&job)?;
                self.log_event(
                    &job,
                    Event::new(EventKind::Dead, role.as_str(), now)
                        .with("reason", "max_attempts_reached"),
                );
                Err(machine::TransitionError::MaxAttemptsReached.into())
            }
        }
    }

    /// Extend the lease; optionally record progress.
    pub fn heartbeat(
        &self,
        role: Role,
        id: &str,
        progress: Option<Value>,
    ) -> Result<Job, ApiError> {
        let id = checked_id(id)?;
        let _lock = ClaimLock::acquire(self.store.jobs_dir(), id)?;
        let mut job = self.store.read(id)?;
        let gate = owner_gate(role, &job);
        let now = self.now();
        machine::heartbeat(&mut job, progress, self.lease, now)?;
        gate?;
        self.store.write(&job)?;
        self.log_event(&job, Event::new(EventKind::Heartbeat, role.as_str(), now));
        Ok(job)
    }

    pub fn complete(
        &self,
        role: Role,
        id: &str,
        result: Option<Value>,
    ) -> Result<Job, ApiError> {
        let id = checked_id(id)?;
        let _lock = ClaimLock::acquire(self.store.jobs_dir(), id)?;
        let mut job = self.store.read(id)?;
        let gate = owner_gate(role, &job);
        let now = self.now();
        machine::complete(&mut job, result, now)?;
        gate?;
        self.store.write(&job)?;
        self.log_event(&job, Event::new(EventKind::Completed, role.as_str(), now));
        Ok(job)
    }

    pub fn fail(
        &self,
        role: Role,
        id: &str,
        error: Option<String>,
        requeue: bool,
    ) -> Result<Job, ApiError> {
        let id = checked_id(id)?;
        let _lock = ClaimLock::acquire(self.store.jobs_dir(), id)?;
        let mut job = self.store.read(id)?;
        let gate = owner_gate(role, &job);
        let now = self.now();
        let outcome = machine::fail(&mut job, error, requeue, now)?;
        gate?;
        self.store.write(&job)?;
        self.log_event(
            &job,
            Event::new(EventKind::Failed, role.as_str(), now)
                .with("requeued", outcome == FailOutcome::Requeued)
                .with("attempts", job.attempts),
        );
        Ok(job)
    }

    pub fn release(
        &self,
        role: Role,
        id: &str,
        reason: Option<String>,
    ) -> Result<Job, ApiError> {
        let id = checked_id(id)?;
        let _lock = ClaimLock::acquire(self.store.jobs_dir(), id)?;
        let mut job = self.store.read(id)?;
        let gate = owner_gate(role, &job);
        let now = self.now();
        machine::release(&mut job, reason.clone(), now)?;
        gate?;
        self.store.write(&job)?;
        let mut event = Event::new(EventKind::Released, role.as_str(), now);
        if let Some(reason) = reason {
            event = event.with("reason", reason);
        }
        self.log_event(&job, event);
        Ok(job)
    }

    /// Append a comment. Access-gated only; any status is fine.
    pub fn comment(&self, role: Role, id: &str, text: String) -> Result<Job, ApiError> {
        let id = checked_id(id)?;
        let _lock = ClaimLock::acquire(self.store.jobs_dir(), id)?;
        let mut job = self.store.read(id)?;
        if !authz::can_access(role, &job) {
            return Err(ApiError::Forbidden);
        }
        let now = self.now();
        machine::comment(&mut job, role, text.clone(), now);
        self.store.write(&job)?;
        self.log_event(
            &job,
            Event::new(EventKind::Comment, role.as_str(), now).with("text", text),
        );
        Ok(job)
    }

    /// One reaper pass: requeue or dead-letter every running record
    /// whose lease has lapsed. Per-record problems are logged and the
    /// sweep continues; contended locks are retried on the next pass.
    pub fn reap_pass(&self) -> ReapStats {
        let mut stats = ReapStats::default();
        let candidates = match self.store.list() {
            Ok(jobs) => jobs,
            Err(e) => {
                warn!(error = %e, "reaper could not enumerate job records");
                return stats;
            }
        };

        let now = self.now();
        for candidate in candidates {
            if !candidate.lease_expired(now) {
                continue;
            }
            let id = candidate.id.as_str();
            let _lock = match ClaimLock::acquire(self.store.jobs_dir(), id) {
                Ok(lock) => lock,
                Err(LockError::Contended) => {
                    debug!(id, "claim lock contended, retrying next pass");
                    continue;
                }
                Err(e) => {
                    warn!(id, error = %e, "reaper could not lock record");
                    continue;
                }
            };
            // Re-read under the lock; the record may have moved on.
            let mut job = match self.store.read(id) {
                Ok(job) => job,
                Err(e) => {
                    warn!(id, error = %e, "reaper could not re-read record");
                    continue;
                }
            };
            let now = self.now();
            let Some(outcome) = machine::expire(&mut job, now) else {
                continue;
            };
            if let Err(e) = self.store.write(&job) {
                warn!(id, error = %e, "reaper could not persist record");
                continue;
            }
            match outcome {
                ReapOutcome::Requeued => {
                    self.log_event(&job, Event::new(EventKind::Expired, REAPER, now));
                    stats.requeued += 1;
                }
                ReapOutcome::Dead => {
                    self.log_event(
                        &job,
                        Event::new(EventKind::Dead, REAPER, now)
                            .with("reason", "lease_expired_max_attempts"),
                    );
                    stats.dead += 1;
                }
            }
        }
        stats
    }

    /// Events are diagnostic; an append failure must not fail the
    /// request whose record write already succeeded.
    fn log_event(&self, job: &Job, event: Event) {
        if let Err(e) = self.store.append_event(job.id.as_str(), &event) {
            warn!(id = %job.id, error = %e, "failed to append event");
        }
    }
}

/// Ownership gate for heartbeat/complete/fail/release.
///
/// Evaluated against the pre-transition record (`fail` and `release`
/// clear `claimedBy`), enforced after the status gate so conflicts
/// outrank authorization, with `not_owner` outranking `forbidden`.
fn owner_gate(role: Role, job: &Job) -> Result<(), ApiError> {
    if !authz::is_owner_or_head(role, job) {
        return Err(ApiError::NotOwner);
    }
    if !authz::can_access(role, job) {
        return Err(ApiError::Forbidden);
    }
    Ok(())
}

/// Ids arrive straight from the URL path; nothing outside the nanoid
/// alphabet can name a record.
pub(crate) fn checked_id(id: &str) -> Result<&str, ApiError> {
    let ok = !id.is_empty()
        && id.bytes().all(|b| b.is_ascii_alphanumeric() || b == b'_' || b == b'-');
    if ok {
        Ok(id)
    } else {
        Err(ApiError::NotFound)
    }
}

#[cfg(test)]
#[path = "service_tests.rs"]
mod tests;
