// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Persistence errors.

use std::io;
use std::path::{Path, PathBuf};
use thiserror::Error;

/// Errors from the record, event, and blob stores.
#[derive(Debug, Error)]
pub enum StoreError {
    /// No record with this id.
    #[error("not found: {0}")]
    NotFound(String),

    /// A record exists but does not parse.
    #[error("corrupt record {path}: {source}")]
    Corrupt {
        path: PathBuf,
        #[source]
        source: serde_json::Error,
    },

    #[error("io error at {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: io::Error,
    },
}

impl StoreError {
    pub(crate) fn io(path: &Path, source: io::Error) -> Self {
        StoreError::Io { path: path.to_path_buf(), source }
    }

    pub fn is_not_found(&self) -> bool {
        matches!(self, StoreError::NotFound(_))
    }
}
