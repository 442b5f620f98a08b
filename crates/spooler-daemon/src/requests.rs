// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! The control-file request channel (§4.4 step 1, §6.3), grounded on
//! `snijder.spooler.JobSpooler.check_status_request`.

use spooler_core::SpoolPaths;
use tracing::warn;

/// A status transition requested by touching `queue/requests/<name>`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Request {
    Run,
    Pause,
    Refresh,
    Shutdown,
}

/// Checked in this order every tick; the first match wins and the file is
/// removed (§4.4 step 1 — at most one transition per tick).
const ORDER: [(&str, Request); 4] = [
    ("shutdown", Request::Shutdown),
    ("refresh", Request::Refresh),
    ("pause", Request::Pause),
    ("run", Request::Run),
];

pub fn check(paths: &SpoolPaths) -> Option<Request> {
    for (name, request) in ORDER {
        let file = paths.request_file(name);
        if file.exists() {
            if let Err(e) = std::fs::remove_file(&file) {
                warn!(file = %file.display(), error = %e, "failed to remove consumed request file");
            }
            return Some(request);
        }
    }
    None
}

#[cfg(test)]
#[path = "requests_tests.rs"]
mod tests;
