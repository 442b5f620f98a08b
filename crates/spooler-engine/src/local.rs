// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! The local-execution backend (§4.3, §6.2): one child process at a
//! time, spawned with `tokio::process::Command` the same way the
//! teacher's coop adapter spawns its agent subprocess, but reaped
//! synchronously from `progress()` rather than via a detached reaper
//! task — the control loop already ticks on a fixed cadence, so there's
//! nowhere else the exit status needs to be delivered to.

use std::collections::HashMap;
use std::path::PathBuf;
use std::process::Stdio;

use async_trait::async_trait;
use spooler_core::{JobDescription, JobUid};
use tokio::process::{Child, Command};
use tracing::{info, warn};

use crate::apps;
use crate::contract::{AppState, Engine, EngineCounts, EngineError, ResourceInfo};
use crate::resource;

struct Task {
    child: Child,
    state: AppState,
    pid_file: Option<PathBuf>,
    kill_requested: bool,
}

/// Remove a task's pid-file, if it wrote one, once it's no longer running.
fn remove_pid_file(task: &Task) {
    if let Some(pid_file) = &task.pid_file {
        if let Err(e) = std::fs::remove_file(pid_file) {
            if e.kind() != std::io::ErrorKind::NotFound {
                warn!(path = %pid_file.display(), error = %e, "failed to remove pid-file for reaped task");
            }
        }
    }
}

#[cfg(unix)]
fn died_by_unrequested_signal(status: &std::process::ExitStatus, kill_requested: bool) -> bool {
    use std::os::unix::process::ExitStatusExt;
    !kill_requested && status.signal().is_some()
}

#[cfg(not(unix))]
fn died_by_unrequested_signal(_status: &std::process::ExitStatus, _kill_requested: bool) -> bool {
    false
}

/// The execution-engine adapter for locally-spawned child processes.
///
/// Holds at most as many [`Task`]s as the control loop has dispatched;
/// §4.4's single-flight rule keeps that at zero or one in practice, but
/// the engine itself places no such limit (it's the control loop's
/// policy, not the backend's).
pub struct LocalProcessEngine {
    resource_name: String,
    resource_dir: PathBuf,
    /// The backend configuration path handed to `setup` (§6.5b). This
    /// backend has no configuration of its own to read from it yet; it's
    /// kept only so the path is visible to whatever the backend grows
    /// into, the same way `setup`'s signature promises callers.
    #[allow(dead_code)]
    config_path: PathBuf,
    tasks: HashMap<JobUid, Task>,
}

impl LocalProcessEngine {
    /// Create the engine from the backend configuration path, scanning
    /// `resource_dir` for leftover pid-files from a previous, still-running
    /// instance (§4.3 `setup`). Fails if any of them still map to a live
    /// worker.
    pub fn new(
        resource_name: impl Into<String>,
        resource_dir: impl Into<PathBuf>,
        config_path: impl Into<PathBuf>,
    ) -> Result<Self, EngineError> {
        let resource_name = resource_name.into();
        let resource_dir = resource_dir.into();
        std::fs::create_dir_all(&resource_dir)?;

        let engine = Self {
            resource_name: resource_name.clone(),
            resource_dir: resource_dir.clone(),
            config_path: config_path.into(),
            tasks: HashMap::new(),
        };
        let live = resource::scan_and_clean(&engine.get_resources())?;
        resource::refuse_if_unclean(&live)?;
        Ok(engine)
    }
}

#[async_trait]
impl Engine for LocalProcessEngine {
    async fn add(&mut self, job: &JobDescription) -> Result<(), EngineError> {
        let spec = apps::build(job, &self.resource_dir);
        std::fs::create_dir_all(&spec.output_dir)?;

        // Combine stdout & stderr into one `stdout.txt`, matching the
        // original GC3Pie appconfig's `stderr=stdout, stdout=stdout.txt`.
        let stdout_file = std::fs::File::create(spec.output_dir.join("stdout.txt"))?;
        let stderr_file = stdout_file.try_clone()?;

        let child = Command::new(&spec.exec)
            .args(&spec.args)
            .stdin(Stdio::null())
            .stdout(Stdio::from(stdout_file))
            .stderr(Stdio::from(stderr_file))
            .kill_on_drop(true)
            .spawn()
            .map_err(|e| EngineError::Setup(format!("failed to spawn {}: {e}", spec.exec.display())))?;

        // Write <resource_dir>/<pid> containing the job uid (§4.3a), so a
        // future `setup` scan can tell a leftover file apart from an
        // unrelated process reusing the pid.
        let pid_file = child.id().map(|pid| {
            let path = self.resource_dir.join(pid.to_string());
            if let Err(e) = std::fs::write(&path, job.uid.to_string()) {
                warn!(path = %path.display(), error = %e, "failed to write pid-file for spawned task");
            }
            path
        });

        info!(uid = %job.uid.short(), exec = %spec.exec.display(), "submitted task to local execution backend");
        self.tasks.insert(
            job.uid.clone(),
            Task { child, state: AppState::Submitted, pid_file, kill_requested: false },
        );
        Ok(())
    }

    async fn progress(&mut self) {
        for (uid, task) in self.tasks.iter_mut() {
            match task.state {
                AppState::Submitted => task.state = AppState::Running,
                AppState::Running => match task.child.try_wait() {
                    Ok(Some(_)) => task.state = AppState::Terminating,
                    Ok(None) => {}
                    Err(e) => {
                        warn!(uid = %uid.short(), error = %e, "failed to poll task state");
                        task.state = AppState::Unknown;
                    }
                },
                AppState::Terminating => match task.child.try_wait() {
                    Ok(Some(status)) => {
                        if died_by_unrequested_signal(&status, task.kill_requested) {
                            warn!(uid = %uid.short(), exit_status = %status, "task died by signal it wasn't asked to be killed by");
                            task.state = AppState::Stopped;
                        } else {
                            if !status.success() {
                                warn!(uid = %uid.short(), exit_status = %status, "task exited non-zero");
                            }
                            task.state = AppState::Terminated;
                        }
                        remove_pid_file(task);
                    }
                    Ok(None) => {}
                    Err(e) => {
                        warn!(uid = %uid.short(), error = %e, "failed to poll task state");
                        task.state = AppState::Unknown;
                    }
                },
                AppState::New | AppState::Terminated | AppState::Unknown | AppState::Stopped => {}
            }
        }
    }

    fn counts(&self) -> EngineCounts {
        let mut counts = EngineCounts::default();
        for task in self.tasks.values() {
            match task.state {
                AppState::New => counts.new += 1,
                AppState::Submitted => counts.submitted += 1,
                AppState::Running => counts.running += 1,
                AppState::Terminating => counts.terminating += 1,
                AppState::Terminated => counts.terminated += 1,
                AppState::Unknown => counts.unknown += 1,
                AppState::Stopped => counts.stopped += 1,
            }
        }
        counts
    }

    fn state_of(&self, uid: &JobUid) -> Option<AppState> {
        self.tasks.get(uid).map(|t| t.state)
    }

    fn kill(&mut self, uid: &JobUid) {
        if let Some(task) = self.tasks.get_mut(uid) {
            if let Err(e) = task.child.start_kill() {
                warn!(uid = %uid.short(), error = %e, "failed to send kill signal");
            }
            task.kill_requested = true;
            task.state = AppState::Terminating;
        }
    }

    fn forget(&mut self, uid: &JobUid) {
        if let Some(task) = self.tasks.remove(uid) {
            remove_pid_file(&task);
        }
    }

    fn select_resource(&mut self, name: &str) {
        if name != self.resource_name {
            warn!(
                requested = name,
                available = %self.resource_name,
                "local execution backend has a single resource, ignoring selection"
            );
        }
    }

    fn get_resources(&self) -> Vec<ResourceInfo> {
        vec![ResourceInfo { name: self.resource_name.clone(), resource_dir: self.resource_dir.clone() }]
    }
}

#[cfg(test)]
#[path = "local_tests.rs"]
mod tests;
