// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! The parser's error taxonomy (§4.1, §7a).

use std::path::PathBuf;

use thiserror::Error;

/// Failures from [`crate::job_file::parse`].
///
/// `Syntax` and `Validation` both trigger the `done/<basename>.invalid`
/// file-motion side effect in the caller (§4.1 "Edge cases"); `Io` never
/// does — the file may simply not be fully written yet.
#[derive(Debug, Error)]
pub enum ParseError {
    #[error("could not read job file {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("not a valid ini-style configuration: {0}")]
    Syntax(String),

    #[error("invalid job description: {0}")]
    Validation(String),
}

impl ParseError {
    /// Whether this failure should trigger the `.invalid` rejection move.
    pub fn rejects_file(&self) -> bool {
        !matches!(self, Self::Io { .. })
    }
}

#[cfg(test)]
#[path = "error_tests.rs"]
mod tests;
