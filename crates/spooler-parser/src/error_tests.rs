// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

use super::*;

#[test]
fn io_errors_never_reject_the_file() {
    let err = ParseError::Io {
        path: PathBuf::from("/spool/new/x.job"),
        source: std::io::Error::new(std::io::ErrorKind::NotFound, "gone"),
    };
    assert!(!err.rejects_file());
}

#[test]
fn syntax_and_validation_errors_reject_the_file() {
    assert!(ParseError::Syntax("no sections".into()).rejects_file());
    assert!(ParseError::Validation("missing ver".into()).rejects_file());
}
