//! S6: control-file transitions (SPEC_FULL.md §8).

use crate::prelude::*;

#[test]
fn each_request_file_is_consumed_exactly_once_in_order() {
    let mut daemon = Daemon::start();

    daemon.request("pause");
    let consumed = wait_for(SPEC_WAIT_MAX_MS, || !daemon.request_file_exists("pause"));
    assert!(consumed, "pause request should be consumed");

    daemon.request("run");
    let consumed = wait_for(SPEC_WAIT_MAX_MS, || !daemon.request_file_exists("run"));
    assert!(consumed, "run request should be consumed");

    daemon.request("refresh");
    let consumed = wait_for(SPEC_WAIT_MAX_MS, || !daemon.request_file_exists("refresh"));
    assert!(consumed, "refresh request should be consumed");

    // shutdown outranks everything and is the last transition observed;
    // the process must actually exit once it's processed.
    daemon.shutdown();
}
