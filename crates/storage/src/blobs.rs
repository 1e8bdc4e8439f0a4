// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Opaque blob sink.

use std::fs;
use std::io;
use std::path::{Path, PathBuf};

use spine_core::BlobId;

use crate::error::StoreError;

/// Byte-stream sink with no lifecycle coupling to jobs.
///
/// Bodies land under `<data>/blobs/<id>`; ids are fresh nanoids, so a
/// blob is never written twice and never read before its id is returned.
#[derive(Debug, Clone)]
pub struct BlobStore {
    dir: PathBuf,
}

impl BlobStore {
    pub fn open(data_dir: &Path) -> Result<Self, StoreError> {
        let dir = data_dir.join("blobs");
        fs::create_dir_all(&dir).map_err(|e| StoreError::io(&dir, e))?;
        Ok(Self { dir })
    }

    /// Store one body, returning its fresh id.
    pub fn put(&self, bytes: &[u8]) -> Result<BlobId, StoreError> {
        let id = BlobId::new();
        let path = self.dir.join(id.as_str());
        fs::write(&path, bytes).map_err(|e| StoreError::io(&path, e))?;
        Ok(id)
    }

    pub fn get(&self, id: &str) -> Result<Vec<u8>, StoreError> {
        let path = self.dir.join(id);
        match fs::read(&path) {
            Ok(bytes) => Ok(bytes),
            Err(e) if e.kind() == io::ErrorKind::NotFound => {
                Err(StoreError::NotFound(id.to_string()))
            }
            Err(e) => Err(StoreError::io(&path, e)),
        }
    }
}

#[cfg(test)]
#[path = "blobs_tests.rs"]
mod tests;
