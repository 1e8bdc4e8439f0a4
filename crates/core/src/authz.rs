// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Role-to-job authorization predicates.
//!
//! Stateless: the resolved role and the job record are the only inputs.
//! The head is an administrative override for both predicates.

use crate::job::Job;
use crate::role::Role;
use crate::target::Target;

/// Whether `role` may observe `job` at all.
pub fn can_access(role: Role, job: &Job) -> bool {
    match role {
        Role::Head => true,
        Role::LeftClaw => matches!(job.target, Target::LeftClaw | Target::Any),
        Role::RightClaw => matches!(job.target, Target::RightClaw | Target::Any),
    }
}

/// Whether `role` may mutate a claimed job: the head always may, a claw
/// only while it is the current claimant.
pub fn is_owner_or_head(role: Role, job: &Job) -> bool {
    role.is_head() || job.claimed_by.as_deref() == Some(role.as_str())
}

#[cfg(test)]
#[path = "authz_tests.rs"]
mod tests;
