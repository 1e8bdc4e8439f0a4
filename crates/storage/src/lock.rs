// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Per-job claim locks.

use std::fs::{self, OpenOptions};
use std::io;
use std::path::{Path, PathBuf};
use thiserror::Error;
use tracing::warn;

/// Why a claim lock could not be acquired.
#[derive(Debug, Error)]
pub enum LockError {
    /// Another caller holds the lock.
    #[error("job is locked by another caller")]
    Contended,

    #[error("lock io error: {0}")]
    Io(#[from] io::Error),
}

/// Exclusive per-job lock backed by a `<id>.lock` file next to the record.
///
/// Exclusive-create is the sole coordination primitive, which makes the
/// lock work across processes sharing one data directory. The guard
/// removes the file on drop, on every exit path. A stale lock left by a
/// crashed process must be cleared by an operator.
///
/// Holders are expected to keep the lock for milliseconds: one read, one
/// write, one event append.
#[derive(Debug)]
pub struct ClaimLock {
    path: PathBuf,
}

impl ClaimLock {
    pub fn acquire(jobs_dir: &Path, id: &str) -> Result<Self, LockError> {
        let path = jobs_dir.join(format!("{id}.lock"));
        match OpenOptions::new().write(true).create_new(true).open(&path) {
            Ok(_) => Ok(Self { path }),
            Err(e) if e.kind() == io::ErrorKind::AlreadyExists => Err(LockError::Contended),
            Err(e) => Err(e.into()),
        }
    }
}

impl Drop for ClaimLock {
    fn drop(&mut self) {
        if let Err(e) = fs::remove_file(&self.path) {
            if e.kind() != io::ErrorKind::NotFound {
                warn!(path = %self.path.display(), error = %e, "failed to remove claim lock");
            }
        }
    }
}

#[cfg(test)]
#[path = "lock_tests.rs"]
mod tests;
