// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

use super::*;
use crate::uid::JobUid;

#[test]
fn already_queued_message_includes_uid() {
    let uid = JobUid::from_bytes(b"dup");
    let err = QueueError::AlreadyQueued(uid.clone());
    assert!(err.to_string().contains(uid.as_str()));
}
