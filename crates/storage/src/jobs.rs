// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Job record store and per-job event logs.

use std::fs::{self, File, OpenOptions};
use std::io::{self, Write};
use std::path::{Path, PathBuf};

use spine_core::{Event, Job};
use tracing::warn;

use crate::error::StoreError;

/// File-backed store for job records and their event logs.
///
/// Records are written with temp-file-then-rename so readers never see a
/// partial record; a crash mid-write leaves either the old record or a
/// stray temp that the next write supersedes. The store does not
/// interpret record contents; all validation lives in the state machine.
#[derive(Debug, Clone)]
pub struct JobStore {
    jobs_dir: PathBuf,
    events_dir: PathBuf,
}

impl JobStore {
    /// Open (and create) the store under `data_dir`.
    pub fn open(data_dir: &Path) -> Result<Self, StoreError> {
        let jobs_dir = data_dir.join("jobs");
        let events_dir = data_dir.join("events");
        fs::create_dir_all(&jobs_dir).map_err(|e| StoreError::io(&jobs_dir, e))?;
        fs::create_dir_all(&events_dir).map_err(|e| StoreError::io(&events_dir, e))?;
        Ok(Self { jobs_dir, events_dir })
    }

    /// Directory holding record and lock files, for claim-lock co-location.
    pub fn jobs_dir(&self) -> &Path {
        &self.jobs_dir
    }

    fn record_path(&self, id: &str) -> PathBuf {
        self.jobs_dir.join(format!("{id}.json"))
    }

    /// Read one record. Missing file maps to [`StoreError::NotFound`].
    pub fn read(&self, id: &str) -> Result<Job, StoreError> {
        let path = self.record_path(id);
        let bytes = match fs::read(&path) {
            Ok(bytes) => bytes,
            Err(e) if e.kind() == io::ErrorKind::NotFound => {
                return Err(StoreError::NotFound(id.to_string()));
            }
            Err(e) => return Err(StoreError::io(&path, e)),
        };
        serde_json::from_slice(&bytes).map_err(|source| StoreError::Corrupt { path, source })
    }

    /// Write one record atomically: serialize to an adjacent temp file,
    /// fsync, then rename over the target.
    pub fn write(&self, job: &Job) -> Result<(), StoreError> {
        let path = self.record_path(job.id.as_str());
        let tmp = self.jobs_dir.join(format!("{}.json.tmp.{}", job.id, nanoid::nanoid!(8)));
        let data = serde_json::to_vec_pretty(job)
            .map_err(|source| StoreError::Corrupt { path: path.clone(), source })?;

        let result = (|| {
            let mut file = File::create(&tmp)?;
            file.write_all(&data)?;
            file.sync_all()?;
            fs::rename(&tmp, &path)
        })();

        if let Err(e) = result {
            let _ = fs::remove_file(&tmp);
            return Err(StoreError::io(&path, e));
        }
        Ok(())
    }

    /// Append one event line to the job's log.
    ///
    /// Each append is a single small write, so concurrent appenders never
    /// interleave within a line.
    pub fn append_event(&self, id: &str, event: &Event) -> Result<(), StoreError> {
        let path = self.events_dir.join(format!("{id}.jsonl"));
        let mut line = serde_json::to_vec(event)
            .map_err(|source| StoreError::Corrupt { path: path.clone(), source })?;
        line.push(b'\n');

        OpenOptions::new()
            .create(true)
            .append(true)
            .open(&path)
            .and_then(|mut file| file.write_all(&line))
            .map_err(|e| StoreError::io(&path, e))
    }

    /// Enumerate all records. O(n) in job count; no index is kept.
    ///
    /// Only canonical `<id>.json` names are recognized; lock files and
    /// write staging are invisible here. Unreadable records are logged
    /// and skipped so one bad file cannot take down a listing or a
    /// reaper pass.
    pub fn list(&self) -> Result<Vec<Job>, StoreError> {
        let entries =
            fs::read_dir(&self.jobs_dir).map_err(|e| StoreError::io(&self.jobs_dir, e))?;

        let mut jobs = Vec::new();
        for entry in entries {
            let entry = entry.map_err(|e| StoreError::io(&self.jobs_dir, e))?;
            let name = entry.file_name();
            let Some(id) = name.to_str().and_then(|n| n.strip_suffix(".json")) else {
                continue;
            };
            match self.read(id) {
                Ok(job) => jobs.push(job),
                Err(e) => warn!(id, error = %e, "skipping unreadable job record"),
            }
        }
        Ok(jobs)
    }
}

#[cfg(test)]
#[path = "jobs_tests.rs"]
mod tests;
