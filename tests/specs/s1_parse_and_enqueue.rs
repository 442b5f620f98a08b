//! S1: parse & enqueue (SPEC_FULL.md §8).

use crate::prelude::*;

#[test]
fn parse_and_enqueue_reports_one_queued_job() {
    let mut daemon = Daemon::start();
    // Pause first so admission is observable without a dispatch racing it.
    daemon.request("pause");

    daemon.submit("user01.job", &dummy_job_text("user01", "1700000010.0"));

    let admitted = wait_for(SPEC_WAIT_MAX_MS, || {
        daemon.status_json("hucore").map(|v| v["jobs"].as_array().map(|a| a.len()) == Some(Some(1))).unwrap_or(false)
    });
    assert!(admitted, "job should be admitted and reflected in status JSON");

    let status = daemon.status_json("hucore").unwrap();
    let jobs = status["jobs"].as_array().unwrap();
    assert_eq!(jobs.len(), 1);
    assert_eq!(jobs[0]["username"], "user01");
    assert_eq!(jobs[0]["status"], "queued");
    assert!(!jobs[0]["id"].as_str().unwrap().is_empty());

    daemon.shutdown();
}
