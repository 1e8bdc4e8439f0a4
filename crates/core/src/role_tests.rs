// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

use super::*;

#[test]
fn canonical_names() {
    assert_eq!(Role::Head.as_str(), "head");
    assert_eq!(Role::LeftClaw.as_str(), "left-claw");
    assert_eq!(Role::RightClaw.as_str(), "right-claw");
}

#[test]
fn workers_are_not_head() {
    assert!(Role::Head.is_head());
    assert!(!Role::Head.is_worker());
    assert!(Role::LeftClaw.is_worker());
    assert!(Role::RightClaw.is_worker());
}

#[test]
fn serializes_kebab_case() {
    assert_eq!(serde_json::to_string(&Role::LeftClaw).unwrap(), "\"left-claw\"");
    let role: Role = serde_json::from_str("\"right-claw\"").unwrap();
    assert_eq!(role, Role::RightClaw);
}
