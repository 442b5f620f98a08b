//! Shared harness for the end-to-end scenario tests, driving the compiled
//! `spoolerd` binary as a black box through its spool/queue directories.

use std::io::{BufRead, BufReader};
use std::path::{Path, PathBuf};
use std::process::{Child, Stdio};
use std::time::{Duration, Instant};

use assert_cmd::cargo::cargo_bin;

/// Upper bound any single [`wait_for`] poll loop spins for before giving up.
pub const SPEC_WAIT_MAX_MS: u64 = 5_000;

/// Poll `check` every 20ms until it returns true or `max_ms` elapses.
pub fn wait_for(max_ms: u64, mut check: impl FnMut() -> bool) -> bool {
    let deadline = Instant::now() + Duration::from_millis(max_ms);
    loop {
        if check() {
            return true;
        }
        if Instant::now() >= deadline {
            return false;
        }
        std::thread::sleep(Duration::from_millis(20));
    }
}

/// A running `spoolerd` process rooted at its own temp spool directory.
pub struct Daemon {
    dir: tempfile::TempDir,
    child: Option<Child>,
}

impl Daemon {
    /// Start `spoolerd` against a fresh temp directory and block until it
    /// prints its "READY" line, the way a caller scripting the real binary
    /// would wait for startup to finish before submitting work.
    pub fn start() -> Self {
        let dir = tempfile::tempdir().expect("tempdir");
        let mut child = std::process::Command::new(cargo_bin("spoolerd"))
            .arg("--spooldir")
            .arg(dir.path())
            .arg("--resource")
            .arg("localhost")
            .stdout(Stdio::piped())
            .stderr(Stdio::piped())
            .spawn()
            .expect("spoolerd should spawn");

        let stdout = child.stdout.take().expect("piped stdout");
        let mut reader = BufReader::new(stdout);
        let mut line = String::new();
        reader.read_line(&mut line).expect("spoolerd should print a READY line");
        assert!(line.contains("READY"), "expected READY, got {line:?}");

        Self { dir, child: Some(child) }
    }

    pub fn path(&self) -> &Path {
        self.dir.path()
    }

    fn spool(&self, sub: &str) -> PathBuf {
        self.dir.path().join("spool").join(sub)
    }

    pub fn new_dir(&self) -> PathBuf {
        self.spool("new")
    }

    pub fn done_dir(&self) -> PathBuf {
        self.spool("done")
    }

    pub fn status_file(&self, queue: &str) -> PathBuf {
        self.dir.path().join("queue").join("status").join(format!("{queue}.json"))
    }

    /// Drop a job file into `spool/new/`, the only externally-visible way to
    /// submit work (§4.1, §6.1).
    pub fn submit(&self, basename: &str, text: &str) {
        std::fs::write(self.new_dir().join(basename), text).expect("write job file");
    }

    /// Touch `queue/requests/<name>`, the control-file channel (§6.3).
    pub fn request(&self, name: &str) {
        let requests = self.dir.path().join("queue").join("requests");
        std::fs::create_dir_all(&requests).expect("create requests dir");
        std::fs::write(requests.join(name), b"").expect("write request file");
    }

    pub fn request_file_exists(&self, name: &str) -> bool {
        self.dir.path().join("queue").join("requests").join(name).exists()
    }

    /// Read and parse a queue's status JSON (§6.4), once it exists.
    pub fn status_json(&self, queue: &str) -> Option<serde_json::Value> {
        let raw = std::fs::read(self.status_file(queue)).ok()?;
        serde_json::from_slice(&raw).ok()
    }

    /// List basenames currently sitting in `spool/done/`.
    pub fn done_files(&self) -> Vec<String> {
        let Ok(entries) = std::fs::read_dir(self.done_dir()) else { return Vec::new() };
        entries.flatten().map(|e| e.file_name().to_string_lossy().into_owned()).collect()
    }

    /// Request a graceful shutdown and wait for the process to exit.
    pub fn shutdown(&mut self) {
        self.request("shutdown");
        if let Some(child) = &mut self.child {
            let exited = wait_for(SPEC_WAIT_MAX_MS * 2, || {
                matches!(child.try_wait(), Ok(Some(_)))
            });
            assert!(exited, "spoolerd did not exit after a shutdown request");
        }
        self.child = None;
    }
}

impl Drop for Daemon {
    fn drop(&mut self) {
        if let Some(child) = &mut self.child {
            let _ = child.kill();
            let _ = child.wait();
        }
    }
}

/// A `[snijderjob]` + `[hucore]` dummy-sleep job file (§6.1 "for
/// jobtype=dummy"), the cheapest real backend process the engine can spawn.
pub fn dummy_job_text(user: &str, seed: &str) -> String {
    format!(
        "[snijderjob]\n\
         version = 7\n\
         username = {user}\n\
         useremail = {user}@example.invalid\n\
         timestamp = {seed}\n\
         jobtype = dummy\n\
         \n\
         [hucore]\n\
         tasktype = sleep\n\
         executable = /bin/sleep\n"
    )
}

pub fn deletejobs_text(ids: &[&str]) -> String {
    format!(
        "[snijderjob]\n\
         version = 7\n\
         username = admin\n\
         useremail = admin@example.invalid\n\
         timestamp = 1700000000.5\n\
         jobtype = deletejobs\n\
         \n\
         [deletejobs]\n\
         ids = {}\n",
        ids.join(", ")
    )
}
