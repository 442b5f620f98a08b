// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Filesystem watcher for `spool/new`.
//!
//! The watcher owns nothing but the sending half of a channel — it never
//! touches a [`spooler_core::JobQueue`] itself. The control loop drains the
//! receiving half once per tick and routes each path through [`crate::queues`].

use std::path::{Path, PathBuf};

use notify::{Event as NotifyEvent, EventKind, RecommendedWatcher, RecursiveMode, Watcher};
use tokio::sync::mpsc;
use tracing::warn;

/// Start watching `dir` non-recursively for file-creation events. The
/// returned watcher must be kept alive for as long as events are wanted —
/// dropping it stops the watch.
pub fn watch(dir: &Path) -> notify::Result<(mpsc::UnboundedReceiver<PathBuf>, RecommendedWatcher)> {
    let (tx, rx) = mpsc::unbounded_channel();

    let mut watcher = notify::recommended_watcher(move |res: notify::Result<NotifyEvent>| match res {
        Ok(event) => {
            if matches!(event.kind, EventKind::Create(_)) {
                for path in event.paths {
                    let _ = tx.send(path);
                }
            }
        }
        Err(e) => warn!(error = %e, "filesystem watcher error"),
    })?;

    watcher.watch(dir, RecursiveMode::NonRecursive)?;
    Ok((rx, watcher))
}

#[cfg(test)]
#[path = "watcher_tests.rs"]
mod tests;
