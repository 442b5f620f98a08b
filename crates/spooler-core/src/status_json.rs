// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! The external status-JSON wire shape (§6.4).

use std::path::PathBuf;

use serde::Serialize;

use crate::job::JobDescription;

/// One job entry in the status snapshot.
///
/// `server`, `progress`, `pid`, `start` are `"N/A"` placeholders until the
/// execution engine starts reporting them — the distilled spec treats the
/// engine as opaque, so this crate never fills them in itself.
#[derive(Debug, Clone, Serialize)]
pub struct StatusJob {
    pub id: String,
    pub file: Vec<PathBuf>,
    pub username: String,
    #[serde(rename = "jobType")]
    pub job_type: String,
    pub status: String,
    pub server: String,
    pub progress: String,
    pub pid: String,
    pub start: String,
    pub queued: f64,
}

impl From<&JobDescription> for StatusJob {
    fn from(job: &JobDescription) -> Self {
        Self {
            id: job.uid.to_string(),
            file: job.infiles.clone(),
            username: job.user.clone(),
            job_type: job.kind.jobtype().to_string(),
            status: job.status.to_string(),
            server: "N/A".to_string(),
            progress: "N/A".to_string(),
            pid: "N/A".to_string(),
            start: "N/A".to_string(),
            queued: job.timestamp,
        }
    }
}

#[derive(Debug, Clone, Serialize)]
pub struct QueueSnapshot {
    pub jobs: Vec<StatusJob>,
}

#[cfg(test)]
#[path = "status_json_tests.rs"]
mod tests;
