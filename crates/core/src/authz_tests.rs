// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

use super::*;
use crate::clock::{Clock, FakeClock};
use crate::job::JobDraft;

fn job_for(target: Target) -> Job {
    let now = FakeClock::new().now();
    Job::create(JobDraft { target, ..JobDraft::default() }, 3, now)
}

#[test]
fn head_accesses_everything() {
    for target in [Target::LeftClaw, Target::RightClaw, Target::Any] {
        assert!(can_access(Role::Head, &job_for(target)));
    }
}

#[test]
fn claws_access_their_target_and_any() {
    assert!(can_access(Role::LeftClaw, &job_for(Target::LeftClaw)));
    assert!(can_access(Role::LeftClaw, &job_for(Target::Any)));
    assert!(!can_access(Role::LeftClaw, &job_for(Target::RightClaw)));

    assert!(can_access(Role::RightClaw, &job_for(Target::RightClaw)));
    assert!(can_access(Role::RightClaw, &job_for(Target::Any)));
    assert!(!can_access(Role::RightClaw, &job_for(Target::LeftClaw)));
}

#[test]
fn head_is_always_owner() {
    let job = job_for(Target::Any);
    assert!(is_owner_or_head(Role::Head, &job));
}

#[test]
fn claw_owns_only_its_claim() {
    let mut job = job_for(Target::Any);
    job.claimed_by = Some("left-claw".to_string());

    assert!(is_owner_or_head(Role::LeftClaw, &job));
    assert!(!is_owner_or_head(Role::RightClaw, &job));
}

#[test]
fn unclaimed_job_has_no_claw_owner() {
    let job = job_for(Target::Any);
    assert!(!is_owner_or_head(Role::LeftClaw, &job));
    assert!(!is_owner_or_head(Role::RightClaw, &job));
}
