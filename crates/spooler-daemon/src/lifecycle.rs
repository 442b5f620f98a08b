// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Startup & shutdown reconciliation: re-admitting leftover `cur/` and
//! `new/` files before the watcher starts, plus the single-instance
//! lock-file guard.

use std::fs::File;
use std::io::Write;

use fs2::FileExt;
use spooler_core::{Clock, SpoolPaths};
use tracing::{info, warn};

use crate::error::DaemonError;
use crate::queues::{self, QueueRouter};

/// Holds the exclusive lock on `<spooldir>/spoolerd.pid` for the lifetime of
/// the daemon process; released automatically on drop (§4.4a "at most one
/// spoolerd per spool directory").
pub struct DaemonLock {
    #[allow(dead_code)]
    file: File,
}

/// Acquire the single-instance guard. Fails immediately, before anything
/// else is touched, if another `spoolerd` already holds it against this
/// spool directory.
pub fn acquire_lock(paths: &SpoolPaths) -> Result<DaemonLock, DaemonError> {
    let lock_path = paths.base.join("spoolerd.pid");
    if let Some(parent) = lock_path.parent() {
        std::fs::create_dir_all(parent)?;
    }

    let file = std::fs::OpenOptions::new().write(true).create(true).truncate(false).open(&lock_path)?;
    file.try_lock_exclusive().map_err(|e| DaemonError::LockFailed(lock_path.clone(), e))?;

    let mut file = file;
    file.set_len(0)?;
    writeln!(file, "{}", std::process::id())?;

    Ok(DaemonLock { file })
}

/// Create/verify the spool tree and re-admit any backlog left over from a
/// previous run, before the filesystem watcher starts (§4.4a steps 1-3).
pub fn reconcile_backlog(
    paths: &SpoolPaths,
    router: &mut QueueRouter,
    clock: &impl Clock,
) -> std::io::Result<()> {
    paths.create_all()?;
    router.seed_known_queues(paths);

    let cur_files = paths.existing_cur_files()?;
    if !cur_files.is_empty() {
        warn!(count = cur_files.len(), "found jobs left over in cur/ from a previous run, resuming them");
        for path in cur_files {
            queues::resume_cur_file(&path, paths, router, clock);
        }
    }

    let new_files = paths.existing_new_files()?;
    if !new_files.is_empty() {
        info!(count = new_files.len(), "found pre-submitted jobs in new/, processing backlog");
        for path in new_files {
            queues::process_jobfile(&path, paths, router, clock);
        }
    }

    Ok(())
}

#[cfg(test)]
#[path = "lifecycle_tests.rs"]
mod tests;
