// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Authenticated caller roles.

use serde::{Deserialize, Serialize};

/// Who is making a request: the controller or one of the worker classes.
///
/// Roles are resolved from bearer tokens before any job logic runs; the
/// core only ever sees the resolved role.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum Role {
    /// Administrative controller. Creates jobs and overrides ownership.
    Head,
    LeftClaw,
    RightClaw,
}

impl Role {
    /// Canonical name recorded in `claimedBy`, comments, and events.
    pub fn as_str(&self) -> &'static str {
        match self {
            Role::Head => "head",
            Role::LeftClaw => "left-claw",
            Role::RightClaw => "right-claw",
        }
    }

    pub fn is_head(&self) -> bool {
        matches!(self, Role::Head)
    }

    /// Claws pull and process work; the head never claims.
    pub fn is_worker(&self) -> bool {
        !self.is_head()
    }
}

crate::simple_display! {
    Role {
        Head => "head",
        LeftClaw => "left-claw",
        RightClaw => "right-claw",
    }
}

#[cfg(test)]
#[path = "role_tests.rs"]
mod tests;
