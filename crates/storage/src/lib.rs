// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

// Allow panic!/unwrap/expect in test code
#![cfg_attr(test, allow(clippy::panic))]
#![cfg_attr(test, allow(clippy::unwrap_used))]
#![cfg_attr(test, allow(clippy::expect_used))]

//! spine-storage: file-backed persistence for the Spine job queue.
//!
//! Layout under the data directory:
//!
//! ```text
//! <data>/jobs/<id>.json          job records (atomic rename writes)
//! <data>/jobs/<id>.json.tmp.*    write staging, invisible to listing
//! <data>/jobs/<id>.lock          claim locks, ephemeral
//! <data>/events/<id>.jsonl       append-only event logs
//! <data>/blobs/<id>              opaque uploads
//! ```

mod blobs;
mod error;
mod jobs;
mod lock;

pub use blobs::BlobStore;
pub use error::StoreError;
pub use jobs::JobStore;
pub use lock::{ClaimLock, LockError};
