// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

use super::*;

#[test]
fn stable_for_identical_bytes() {
    let a = JobUid::from_bytes(b"[snijderjob]\nversion = 7\n");
    let b = JobUid::from_bytes(b"[snijderjob]\nversion = 7\n");
    assert_eq!(a, b);
    assert_eq!(a.as_str().len(), 40);
}

#[test]
fn differs_for_different_bytes() {
    let a = JobUid::from_bytes(b"one");
    let b = JobUid::from_bytes(b"two");
    assert_ne!(a, b);
}

#[test]
fn short_truncates_to_seven() {
    let uid = JobUid::from_bytes(b"payload");
    assert_eq!(uid.short().len(), 7);
    assert!(uid.as_str().starts_with(uid.short()));
}

#[test]
fn from_timestamp_is_deterministic() {
    let a = JobUid::from_timestamp("1700000000.123456");
    let b = JobUid::from_timestamp("1700000000.123456");
    assert_eq!(a, b);
}

#[test]
fn known_digest_matches_sha1() {
    // echo -n "abc" | sha1sum
    let uid = JobUid::from_bytes(b"abc");
    assert_eq!(uid.as_str(), "a9993e364706816aba3e25717850c26c9cd0d89");
}
