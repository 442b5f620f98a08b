// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

use super::*;

#[test]
fn counts_total_sums_every_bucket() {
    let counts = EngineCounts {
        new: 1,
        submitted: 2,
        running: 3,
        terminating: 1,
        terminated: 4,
        unknown: 0,
        stopped: 1,
    };
    assert_eq!(counts.total(), 12);
    assert_eq!(counts.in_flight(), 5);
}

#[test]
fn app_state_maps_onto_job_status_one_to_one() {
    assert_eq!(JobStatus::from(AppState::New), JobStatus::New);
    assert_eq!(JobStatus::from(AppState::Submitted), JobStatus::Submitted);
    assert_eq!(JobStatus::from(AppState::Running), JobStatus::Running);
    assert_eq!(JobStatus::from(AppState::Terminating), JobStatus::Terminating);
    assert_eq!(JobStatus::from(AppState::Terminated), JobStatus::Terminated);
    assert_eq!(JobStatus::from(AppState::Unknown), JobStatus::Unknown);
    assert_eq!(JobStatus::from(AppState::Stopped), JobStatus::Stopped);
}
