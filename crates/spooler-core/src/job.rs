// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! The job record (§3 "JobDescription").

use std::path::PathBuf;

use crate::status::JobStatus;
use crate::uid::JobUid;

/// `type` + `tasktype` collapsed into one tagged value — replaces the
/// original's runtime class dispatch by jobtype string (§9 "Dynamic job
/// type dispatch").
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, serde::Serialize, serde::Deserialize)]
pub enum JobKind {
    HuDecon,
    HuPreview,
    DummySleep,
    DeleteJobs,
}

impl JobKind {
    /// The `jobtype` string as it appears in the job file and in the
    /// status JSON's `jobType` field.
    pub fn jobtype(&self) -> &'static str {
        match self {
            Self::HuDecon | Self::HuPreview => "hucore",
            Self::DummySleep => "dummy",
            Self::DeleteJobs => "deletejobs",
        }
    }

    pub fn tasktype(&self) -> Option<&'static str> {
        match self {
            Self::HuDecon => Some("decon"),
            Self::HuPreview => Some("preview"),
            Self::DummySleep => Some("sleep"),
            Self::DeleteJobs => None,
        }
    }

    /// The scheduling queue this kind routes to (§4.1a `select_queue_for_job`).
    ///
    /// `DeleteJobs` never routes to a single queue — it fans out to every
    /// known queue's deletion list instead, handled at the call site.
    pub fn queue_name(&self) -> Option<&'static str> {
        match self {
            Self::HuDecon | Self::HuPreview | Self::DummySleep => Some("hucore"),
            Self::DeleteJobs => None,
        }
    }
}

/// A parsed, validated job (§3).
///
/// `fname` is `None` for string-sourced jobs (used in tests); such jobs
/// never participate in file motion (§4.5).
#[derive(Debug, Clone, serde::Serialize, serde::Deserialize)]
pub struct JobDescription {
    pub uid: JobUid,
    pub kind: JobKind,
    pub user: String,
    pub email: String,
    pub timestamp: f64,
    pub ver: String,
    pub exec: PathBuf,
    pub template: Option<PathBuf>,
    pub infiles: Vec<PathBuf>,
    /// `deletejobs` only: uids requested for removal.
    pub delete_ids: Vec<JobUid>,
    pub status: JobStatus,
    pub fname: Option<PathBuf>,
}

crate::builder! {
    pub struct JobDescriptionBuilder => JobDescription {
        set { uid: JobUid = JobUid::from_bytes(b"") }
        set { kind: JobKind = JobKind::DummySleep }
        into { user: String = "testuser" }
        into { email: String = "test@example.invalid" }
        set { timestamp: f64 = 0.0 }
        into { ver: String = "7" }
        into { exec: PathBuf = PathBuf::from("/bin/true") }
        option { template: PathBuf = None }
        set { infiles: Vec<PathBuf> = Vec::new() }
        set { delete_ids: Vec<JobUid> = Vec::new() }
        set { status: JobStatus = JobStatus::NotAvailable }
        option { fname: PathBuf = None }
    }
}

impl JobDescription {
    /// Whether this job was parsed from a file (and therefore participates
    /// in on-disk file motion, §4.5) vs. an in-memory string (tests only).
    pub fn is_file_sourced(&self) -> bool {
        self.fname.is_some()
    }

    /// Assign a new status, mirroring the original's store-on-change
    /// `__setitem__` side effect. Callers that need the dirty-bit/flush
    /// behaviour of §4.2 go through `JobQueue::set_jobstatus` instead;
    /// this is the bare field mutation it wraps.
    pub fn set_status(&mut self, status: JobStatus) {
        self.status = status;
    }
}

#[cfg(test)]
#[path = "job_tests.rs"]
mod tests;
