// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! The spool directory tree (§3 "Spool Tree").

use std::io;
use std::path::{Path, PathBuf};

/// `<base>/spool/{new,cur,done}` + `<base>/queue/{requests,status}`.
///
/// Created and owned by the spooler process; passed by value into the
/// parser and the control loop rather than read from a shared singleton
/// (§9 "Class-level 'spooldirs' shared between JobDescription instances").
#[derive(Debug, Clone)]
pub struct SpoolPaths {
    pub base: PathBuf,
    pub new: PathBuf,
    pub cur: PathBuf,
    pub done: PathBuf,
    pub requests: PathBuf,
    pub status: PathBuf,
}

impl SpoolPaths {
    pub fn new(base: impl Into<PathBuf>) -> Self {
        let base = base.into();
        Self {
            new: base.join("spool").join("new"),
            cur: base.join("spool").join("cur"),
            done: base.join("spool").join("done"),
            requests: base.join("queue").join("requests"),
            status: base.join("queue").join("status"),
            base,
        }
    }

    /// Create every directory in the tree if it doesn't already exist.
    pub fn create_all(&self) -> io::Result<()> {
        for dir in [&self.new, &self.cur, &self.done, &self.requests, &self.status] {
            std::fs::create_dir_all(dir)?;
        }
        Ok(())
    }

    /// List regular files directly under `new/`, sorted for determinism.
    /// Used both by the startup backlog scan (§4.4a) and by tests.
    pub fn existing_new_files(&self) -> io::Result<Vec<PathBuf>> {
        list_files(&self.new)
    }

    /// List regular files directly under `cur/`, i.e. jobs that were
    /// admitted to a queue by a previous run but never reached `done/`
    /// (§4.4a startup reconciliation).
    pub fn existing_cur_files(&self) -> io::Result<Vec<PathBuf>> {
        list_files(&self.cur)
    }

    pub fn status_file(&self, queue_name: &str) -> PathBuf {
        self.status.join(format!("{queue_name}.json"))
    }

    pub fn request_file(&self, request: &str) -> PathBuf {
        self.requests.join(request)
    }
}

fn list_files(dir: &Path) -> io::Result<Vec<PathBuf>> {
    let mut out = Vec::new();
    for entry in std::fs::read_dir(dir)? {
        let entry = entry?;
        if entry.file_type()?.is_file() {
            out.push(entry.path());
        }
    }
    out.sort();
    Ok(out)
}

#[cfg(test)]
#[path = "spool_tests.rs"]
mod tests;
