//! S4: sleep job end-to-end (SPEC_FULL.md §8).

use crate::prelude::*;

#[test]
fn dummy_sleep_job_runs_to_completion_and_lands_in_done() {
    let mut daemon = Daemon::start();

    daemon.submit("sleeper.job", &dummy_job_text("alice", "1700000020.0"));

    let terminated = wait_for(SPEC_WAIT_MAX_MS * 3, || {
        daemon
            .status_json("hucore")
            .map(|v| v["jobs"].as_array().map(|a| a.is_empty()) == Some(true))
            .unwrap_or(false)
    });
    assert!(terminated, "job should run to TERMINATED and be evicted from the queue");

    let moved = wait_for(SPEC_WAIT_MAX_MS, || {
        daemon.done_files().iter().any(|f| f.ends_with(".jobfile"))
    });
    assert!(moved, "job file should have moved to done/ after termination");

    daemon.shutdown();
}
