// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Which worker class may claim a job.

use serde::{Deserialize, Serialize};

/// Claim eligibility for a job: a specific claw, or either.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum Target {
    LeftClaw,
    RightClaw,
    Any,
}

impl Default for Target {
    fn default() -> Self {
        Target::Any
    }
}

crate::simple_display! {
    Target {
        LeftClaw => "left-claw",
        RightClaw => "right-claw",
        Any => "any",
    }
}

#[cfg(test)]
#[path = "target_tests.rs"]
mod tests;
