// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Top-level daemon error taxonomy (§7a).

use std::path::PathBuf;

use thiserror::Error;

#[derive(Debug, Error)]
pub enum DaemonError {
    #[error("--spooldir is required (pass the flag or set SPOOLER_SPOOLDIR)")]
    MissingSpooldir,

    #[error("failed to acquire {0}: another spoolerd is already running against this spool directory")]
    LockFailed(PathBuf, #[source] std::io::Error),

    #[error(transparent)]
    Engine(#[from] spooler_engine::EngineError),

    #[error(transparent)]
    Watch(#[from] notify::Error),

    #[error(transparent)]
    Io(#[from] std::io::Error),
}

#[cfg(test)]
#[path = "error_tests.rs"]
mod tests;
