// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

use super::*;

#[test]
fn no_files_means_no_request() {
    let dir = tempfile::tempdir().unwrap();
    let paths = SpoolPaths::new(dir.path());
    paths.create_all().unwrap();
    assert_eq!(check(&paths), None);
}

#[test]
fn shutdown_takes_priority_over_everything_else() {
    let dir = tempfile::tempdir().unwrap();
    let paths = SpoolPaths::new(dir.path());
    paths.create_all().unwrap();
    std::fs::write(paths.request_file("run"), b"").unwrap();
    std::fs::write(paths.request_file("shutdown"), b"").unwrap();

    assert_eq!(check(&paths), Some(Request::Shutdown));
    assert!(!paths.request_file("shutdown").exists());
    assert!(paths.request_file("run").exists(), "lower-priority files are untouched");
}

#[test]
fn consuming_a_request_deletes_its_file() {
    let dir = tempfile::tempdir().unwrap();
    let paths = SpoolPaths::new(dir.path());
    paths.create_all().unwrap();
    std::fs::write(paths.request_file("pause"), b"").unwrap();

    assert_eq!(check(&paths), Some(Request::Pause));
    assert!(!paths.request_file("pause").exists());
    assert_eq!(check(&paths), None);
}

#[test]
fn priority_order_is_shutdown_refresh_pause_run() {
    let dir = tempfile::tempdir().unwrap();
    let paths = SpoolPaths::new(dir.path());
    paths.create_all().unwrap();
    std::fs::write(paths.request_file("run"), b"").unwrap();
    std::fs::write(paths.request_file("pause"), b"").unwrap();
    std::fs::write(paths.request_file("refresh"), b"").unwrap();

    assert_eq!(check(&paths), Some(Request::Refresh));
    assert_eq!(check(&paths), Some(Request::Pause));
    assert_eq!(check(&paths), Some(Request::Run));
    assert_eq!(check(&paths), None);
}
