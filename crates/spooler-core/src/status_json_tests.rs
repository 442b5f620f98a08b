// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

use super::*;
use crate::job::{JobDescription, JobKind};
use crate::status::JobStatus;

#[test]
fn status_job_shape_matches_wire_contract() {
    let job = JobDescription::builder()
        .kind(JobKind::HuDecon)
        .user("alice")
        .status(JobStatus::Queued)
        .infiles(vec![PathBuf::from("/data/in.tif")])
        .timestamp(1700000000.5)
        .build();

    let status_job = StatusJob::from(&job);
    let value = serde_json::to_value(&status_job).unwrap();

    assert_eq!(value["username"], "alice");
    assert_eq!(value["jobType"], "hucore");
    assert_eq!(value["status"], "queued");
    assert_eq!(value["server"], "N/A");
    assert_eq!(value["progress"], "N/A");
    assert_eq!(value["pid"], "N/A");
    assert_eq!(value["start"], "N/A");
    assert_eq!(value["queued"], 1700000000.5);
    assert_eq!(value["file"][0], "/data/in.tif");
}

#[test]
fn snapshot_serializes_as_jobs_array() {
    let snapshot = QueueSnapshot { jobs: vec![] };
    let value = serde_json::to_value(&snapshot).unwrap();
    assert!(value["jobs"].as_array().unwrap().is_empty());
}
