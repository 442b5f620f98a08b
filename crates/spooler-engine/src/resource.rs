// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Resource-directory pid-file hygiene (§4.3 `setup`).

use std::path::PathBuf;

use sysinfo::{Pid, System};
use tracing::{info, warn};

use crate::contract::{EngineError, ResourceInfo};

/// A substring expected in a live backend worker's command line, used to
/// tell a backend's own leftover pid-file apart from some unrelated
/// process that happens to reuse the pid.
pub const WORKER_CMDLINE_MARKER: &str = "spooler-worker";

/// A pid-file that still maps to a live backend worker process.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LiveWorker {
    pub pid: u32,
    pub file: PathBuf,
}

/// Scan every resource directory for leftover pid-files (§4.3): a file
/// whose name parses as an integer is checked against the live process
/// table. Files matching a live backend worker are reported; everything
/// else (non-numeric names, pids with no matching or unrelated process)
/// is deleted as stale.
pub fn scan_and_clean(resources: &[ResourceInfo]) -> Result<Vec<LiveWorker>, EngineError> {
    let mut system = System::new();
    system.refresh_processes();

    let mut live = Vec::new();
    for resource in resources {
        if !resource.resource_dir.exists() {
            continue;
        }
        for entry in std::fs::read_dir(&resource.resource_dir)? {
            let entry = entry?;
            if !entry.file_type()?.is_file() {
                continue;
            }
            let path = entry.path();
            let Some(pid) =
                path.file_name().and_then(|n| n.to_str()).and_then(|n| n.parse::<u32>().ok())
            else {
                info!(file = %path.display(), "removing resource-dir file not related to a worker pid");
                std::fs::remove_file(&path)?;
                continue;
            };

            match system.process(Pid::from_u32(pid)) {
                Some(process) if is_worker_cmdline(process) => {
                    warn!(pid, file = %path.display(), "resource dir unclean: live worker still running");
                    live.push(LiveWorker { pid, file: path });
                }
                Some(_) => {
                    info!(pid, file = %path.display(), "pid-file matches a live process but not a worker, removing");
                    std::fs::remove_file(&path)?;
                }
                None => {
                    info!(pid, file = %path.display(), "stale pid-file, no such process, removing");
                    std::fs::remove_file(&path)?;
                }
            }
        }
    }
    Ok(live)
}

fn is_worker_cmdline(process: &sysinfo::Process) -> bool {
    process.cmd().iter().any(|arg| arg.contains(WORKER_CMDLINE_MARKER))
        || process.name().contains(WORKER_CMDLINE_MARKER)
}

/// `Err` with a message listing every offending (pid, file) pair, as
/// §4.3/§7 specify for the startup-refusal `RuntimeError`.
pub fn refuse_if_unclean(live: &[LiveWorker]) -> Result<(), EngineError> {
    if live.is_empty() {
        return Ok(());
    }
    let mut msg = String::from(
        "one or more resource directories contain pid-files referring to running workers:\n",
    );
    for worker in live {
        msg.push_str(&format!("  pid {} -> {}\n", worker.pid, worker.file.display()));
    }
    Err(EngineError::Setup(msg))
}

#[cfg(test)]
#[path = "resource_tests.rs"]
mod tests;
