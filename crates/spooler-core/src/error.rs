// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Error types for the queue and job-record seam.

use crate::uid::JobUid;
use thiserror::Error;

/// Failures from [`crate::queue::JobQueue`] mutating operations (§4.2, §7).
#[derive(Debug, Error)]
pub enum QueueError {
    #[error("job {0} is already in this queue")]
    AlreadyQueued(JobUid),
}

#[cfg(test)]
#[path = "error_tests.rs"]
mod tests;
