//! S5: deletion of a running job (SPEC_FULL.md §8).

use crate::prelude::*;

#[test]
fn deletejobs_kills_a_running_job_and_cleans_up() {
    let mut daemon = Daemon::start();

    daemon.submit("long.job", &dummy_job_text("alice", "1700000030.0"));

    let running = wait_for(SPEC_WAIT_MAX_MS, || {
        daemon
            .status_json("hucore")
            .and_then(|v| v["jobs"].as_array().map(|a| a.first().cloned()))
            .flatten()
            .map(|job| job["status"] == "RUNNING")
            .unwrap_or(false)
    });
    assert!(running, "job should reach RUNNING before it's deleted");

    let uid = daemon.status_json("hucore").unwrap()["jobs"][0]["id"].as_str().unwrap().to_string();
    daemon.submit("kill.job", &deletejobs_text(&[&uid]));

    let cleared = wait_for(SPEC_WAIT_MAX_MS, || {
        daemon
            .status_json("hucore")
            .map(|v| v["jobs"].as_array().map(|a| a.is_empty()) == Some(true))
            .unwrap_or(false)
    });
    assert!(cleared, "deleted job should be evicted from the queue");

    let moved = wait_for(SPEC_WAIT_MAX_MS, || {
        daemon.done_files().iter().any(|f| f.ends_with(".jobfile"))
    });
    assert!(moved, "killed job's file should have moved to done/");

    daemon.shutdown();
}
