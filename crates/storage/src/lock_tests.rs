// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

use super::*;

#[test]
fn acquire_creates_lock_file() {
    let dir = tempfile::tempdir().unwrap();
    let lock = ClaimLock::acquire(dir.path(), "job-a").unwrap();
    assert!(dir.path().join("job-a.lock").exists());
    drop(lock);
}

#[test]
fn second_acquire_is_contended() {
    let dir = tempfile::tempdir().unwrap();
    let _held = ClaimLock::acquire(dir.path(), "job-a").unwrap();

    let err = ClaimLock::acquire(dir.path(), "job-a").unwrap_err();
    assert!(matches!(err, LockError::Contended));
}

#[test]
fn drop_releases_the_lock() {
    let dir = tempfile::tempdir().unwrap();
    {
        let _lock = ClaimLock::acquire(dir.path(), "job-a").unwrap();
    }
    assert!(!dir.path().join("job-a.lock").exists());
    // And the lock can be re-acquired.
    let _lock = ClaimLock::acquire(dir.path(), "job-a").unwrap();
}

#[test]
fn locks_are_per_job() {
    let dir = tempfile::tempdir().unwrap();
    let _a = ClaimLock::acquire(dir.path(), "job-a").unwrap();
    let _b = ClaimLock::acquire(dir.path(), "job-b").unwrap();
}

#[test]
fn stale_lock_blocks_until_cleared() {
    // A crashed process leaves its lock file behind; acquisition keeps
    // failing until an operator removes it.
    let dir = tempfile::tempdir().unwrap();
    std::fs::write(dir.path().join("job-a.lock"), b"").unwrap();

    assert!(matches!(ClaimLock::acquire(dir.path(), "job-a"), Err(LockError::Contended)));

    std::fs::remove_file(dir.path().join("job-a.lock")).unwrap();
    assert!(ClaimLock::acquire(dir.path(), "job-a").is_ok());
}

#[test]
fn concurrent_acquires_admit_exactly_one() {
    use std::sync::{Arc, Barrier};

    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().to_path_buf();
    let barrier = Arc::new(Barrier::new(8));

    // Guards are returned from the threads so winners stay held until
    // the end of the test.
    let handles: Vec<_> = (0..8)
        .map(|_| {
            let path = path.clone();
            let barrier = Arc::clone(&barrier);
            std::thread::spawn(move || {
                barrier.wait();
                ClaimLock::acquire(&path, "job-a")
            })
        })
        .collect();

    let results: Vec<_> = handles.into_iter().map(|h| h.join().unwrap()).collect();
    let won = results.iter().filter(|r| r.is_ok()).count();
    assert_eq!(won, 1, "exclusive-create must admit exactly one winner");
}
