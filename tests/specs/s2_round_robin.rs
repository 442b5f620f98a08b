//! S2: round-robin (SPEC_FULL.md §8).

use crate::prelude::*;

#[test]
fn round_robin_interleaves_across_users() {
    let mut daemon = Daemon::start();
    daemon.request("pause");

    // user01 gets two jobs, user02 one; admitted in this order so user01 is
    // the head category when the round-robin rotation starts (§4.2).
    daemon.submit("a1.job", &dummy_job_text("user01", "1700000001.0"));
    std::thread::sleep(std::time::Duration::from_millis(50));
    daemon.submit("a2.job", &dummy_job_text("user01", "1700000002.0"));
    std::thread::sleep(std::time::Duration::from_millis(50));
    daemon.submit("b1.job", &dummy_job_text("user02", "1700000003.0"));

    let admitted = wait_for(SPEC_WAIT_MAX_MS, || {
        daemon.status_json("hucore").map(|v| v["jobs"].as_array().map(|a| a.len()) == Some(Some(3))).unwrap_or(false)
    });
    assert!(admitted, "all three jobs should be admitted");

    let status = daemon.status_json("hucore").unwrap();
    let jobs = status["jobs"].as_array().unwrap();
    // Row-major across categories: user01's first job, user02's only job,
    // then user01's second job.
    let usernames: Vec<&str> = jobs.iter().map(|j| j["username"].as_str().unwrap()).collect();
    assert_eq!(usernames, vec!["user01", "user02", "user01"]);

    daemon.shutdown();
}
