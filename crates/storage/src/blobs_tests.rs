// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

use super::*;

#[test]
fn put_then_get_round_trips() {
    let dir = tempfile::tempdir().unwrap();
    let blobs = BlobStore::open(dir.path()).unwrap();

    let id = blobs.put(b"opaque payload").unwrap();
    assert_eq!(blobs.get(id.as_str()).unwrap(), b"opaque payload");
}

#[test]
fn distinct_puts_get_distinct_ids() {
    let dir = tempfile::tempdir().unwrap();
    let blobs = BlobStore::open(dir.path()).unwrap();

    let a = blobs.put(b"one").unwrap();
    let b = blobs.put(b"one").unwrap();
    assert_ne!(a, b);
}

#[test]
fn get_missing_is_not_found() {
    let dir = tempfile::tempdir().unwrap();
    let blobs = BlobStore::open(dir.path()).unwrap();

    let err = blobs.get("does-not-exist").unwrap_err();
    assert!(err.is_not_found());
}

#[test]
fn empty_body_is_allowed() {
    let dir = tempfile::tempdir().unwrap();
    let blobs = BlobStore::open(dir.path()).unwrap();

    let id = blobs.put(b"").unwrap();
    assert_eq!(blobs.get(id.as_str()).unwrap(), Vec::<u8>::new());
}
