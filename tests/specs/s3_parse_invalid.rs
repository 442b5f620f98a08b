//! S3: parse-invalid (SPEC_FULL.md §8).

use crate::prelude::*;

#[test]
fn missing_snijderjob_section_is_rejected_to_done() {
    let mut daemon = Daemon::start();

    daemon.submit("bad.job", "[hucore]\ntasktype = sleep\nexecutable = /bin/sleep\n");

    let rejected = wait_for(SPEC_WAIT_MAX_MS, || daemon.done_files().contains(&"bad.job.invalid".to_string()));
    assert!(rejected, "job file missing [snijderjob] should be rejected to done/bad.job.invalid");

    assert!(!daemon.new_dir().join("bad.job").exists(), "new/ should no longer hold the rejected file");

    // Nothing should ever have been queued.
    let status = daemon.status_json("hucore");
    if let Some(status) = status {
        assert_eq!(status["jobs"].as_array().map(|a| a.len()), Some(0));
    }

    daemon.shutdown();
}
