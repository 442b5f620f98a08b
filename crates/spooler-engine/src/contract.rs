// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! The execution-engine contract (§6.2).

use std::path::PathBuf;

use async_trait::async_trait;
use spooler_core::{JobDescription, JobStatus, JobUid};
use thiserror::Error;

/// Lifecycle state of a single in-flight task, as reported by the engine.
///
/// Mirrors [`JobStatus`]'s execution states; kept as a separate type
/// because the engine is the only thing allowed to observe a task's
/// *current* state (the queue only ever sees state the control loop has
/// already propagated to it via `set_jobstatus`).
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AppState {
    New,
    Submitted,
    Running,
    Terminating,
    Terminated,
    Unknown,
    Stopped,
}

impl From<AppState> for JobStatus {
    fn from(state: AppState) -> Self {
        match state {
            AppState::New => JobStatus::New,
            AppState::Submitted => JobStatus::Submitted,
            AppState::Running => JobStatus::Running,
            AppState::Terminating => JobStatus::Terminating,
            AppState::Terminated => JobStatus::Terminated,
            AppState::Unknown => JobStatus::Unknown,
            AppState::Stopped => JobStatus::Stopped,
        }
    }
}

/// Aggregate counts across every task the engine currently knows about
/// (§4.3, §6.2).
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct EngineCounts {
    pub new: u32,
    pub submitted: u32,
    pub running: u32,
    pub terminating: u32,
    pub terminated: u32,
    pub unknown: u32,
    pub stopped: u32,
}

impl EngineCounts {
    pub fn total(&self) -> u32 {
        self.new
            + self.submitted
            + self.running
            + self.terminating
            + self.terminated
            + self.unknown
            + self.stopped
    }

    /// `RUNNING + SUBMITTED`, the quantity §4.4's single-flight dispatch
    /// rule gates on.
    pub fn in_flight(&self) -> u32 {
        self.running + self.submitted
    }
}

/// One backend compute resource (§4.3 `get_resources`).
#[derive(Debug, Clone)]
pub struct ResourceInfo {
    pub name: String,
    pub resource_dir: PathBuf,
}

#[derive(Debug, Error)]
pub enum EngineError {
    #[error("{0}")]
    Setup(String),
    #[error("no task named {0} is known to the engine")]
    UnknownTask(JobUid),
    #[error(transparent)]
    Io(#[from] std::io::Error),
}

/// The capability set the control loop drives the backend through
/// (§6.2).
///
/// Unlike the original's GC3Pie-style design, where the spooler keeps its
/// own list of shared "app" objects that are *also* held by the engine,
/// every piece of per-job execution state here is owned by the engine
/// implementation and addressed by [`JobUid`]. The control loop's own
/// bookkeeping of "what's in flight" is the job queue's `processing`
/// list, so there's no second collection that needs to be mutated while
/// iterated (§9, the `apps` list bug the original design note flags).
#[async_trait]
pub trait Engine: Send {
    /// Submit a job for execution.
    async fn add(&mut self, job: &JobDescription) -> Result<(), EngineError>;

    /// One non-blocking tick: advance internal bookkeeping and reap any
    /// child process that has exited since the last tick.
    async fn progress(&mut self);

    fn counts(&self) -> EngineCounts;

    /// Current state of a task, if the engine still remembers it.
    fn state_of(&self, uid: &JobUid) -> Option<AppState>;

    /// Forcibly terminate an in-flight task (§4.4 `kill_running_job`).
    fn kill(&mut self, uid: &JobUid);

    /// Drop all bookkeeping for a uid the caller is done observing.
    fn forget(&mut self, uid: &JobUid);

    /// Restrict the engine to a single named resource (§4.3).
    fn select_resource(&mut self, name: &str);

    fn get_resources(&self) -> Vec<ResourceInfo>;
}

#[cfg(test)]
#[path = "contract_tests.rs"]
mod tests;
