// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Job-to-queue routing (§4.1a `select_queue_for_job` / `process_jobfile`),
//! supplemented from `snijder.spooler.JobSpooler._spool`.

use std::collections::HashMap;
use std::path::Path;

use spooler_core::{move_into, Clock, JobKind, JobQueue, JobUid, SpoolPaths};
use spooler_parser::Source;
use tracing::{error, info, warn};

/// Every queue name any [`JobKind`] can route to, created unconditionally at
/// startup (§4.1a ground truth: `snijder.cmdline` creates `jobqueues["hucore"]`
/// before any job is ever routed) so a `deletejobs` request naming a queue
/// that happens to be empty so far still has somewhere to land its ids.
const KNOWN_QUEUE_NAMES: &[&str] = &["hucore"];

/// Every queue the router knows about, keyed by the name
/// [`JobKind::queue_name`] resolves to. In practice there is exactly one
/// ("hucore"), but nothing here assumes that.
#[derive(Default)]
pub struct QueueRouter {
    queues: HashMap<String, JobQueue>,
}

impl QueueRouter {
    pub fn new() -> Self {
        Self::default()
    }

    /// Pre-create every known queue name (§4.1a), so `fan_out_deletion` has
    /// somewhere to deliver a `deletejobs` request that arrives before any
    /// other job has ever touched that queue.
    pub fn seed_known_queues(&mut self, paths: &SpoolPaths) {
        for name in KNOWN_QUEUE_NAMES {
            self.queue_mut(name, paths);
        }
    }

    /// Get or create the named queue, wiring its status file (§6.4) the
    /// first time it's touched.
    pub fn queue_mut(&mut self, name: &str, paths: &SpoolPaths) -> &mut JobQueue {
        self.queues.entry(name.to_string()).or_insert_with(|| {
            let mut queue = JobQueue::new();
            queue.set_status_file(paths.status_file(name));
            queue
        })
    }

    pub fn get_mut(&mut self, name: &str) -> Option<&mut JobQueue> {
        self.queues.get_mut(name)
    }

    pub fn names(&self) -> Vec<String> {
        self.queues.keys().cloned().collect()
    }

    /// The queue currently holding `uid`, if any — used by deletion and
    /// transition handling, which are keyed by uid alone.
    pub fn find_queue_name(&self, uid: &JobUid) -> Option<String> {
        self.queues.iter().find(|(_, q)| q.get(uid).is_some()).map(|(name, _)| name.clone())
    }

    /// Fan a `deletejobs` request's ids out to every known queue's deletion
    /// list — the request doesn't know which queue owns its targets (§4.1a).
    pub fn fan_out_deletion(&mut self, ids: &[JobUid]) {
        for queue in self.queues.values_mut() {
            for uid in ids {
                queue.deletion_list.push_back(uid.clone());
            }
        }
    }

    pub fn iter_names(&mut self) -> impl Iterator<Item = (String, &mut JobQueue)> {
        self.queues.iter_mut().map(|(k, v)| (k.clone(), v))
    }
}

/// Parse and route one job file, handling it exactly as it would be handled
/// whether it arrived via a live filesystem event or a startup backlog scan
/// (§4.1a, §4.4a).
///
/// - A read failure (`ParseError::Io`) leaves the file in place: the
///   producer may still be writing it.
/// - A syntax/validation failure moves the file to `done/<basename>.invalid`
///   and returns.
/// - `deletejobs` fans its ids out to every known queue's deletion list,
///   moves the job file to `done/`, and returns — it never occupies a slot
///   in any [`JobQueue`].
/// - Anything else is moved to `cur/` *before* being appended, so a crash
///   between the two leaves the file recoverable from `cur/` rather than
///   lost; an append failure (duplicate uid) is logged, not propagated.
pub fn process_jobfile(path: &Path, paths: &SpoolPaths, router: &mut QueueRouter, clock: &impl Clock) {
    let mut job = match spooler_parser::parse(Source::File(path), clock) {
        Ok(job) => job,
        Err(err) => {
            if !err.rejects_file() {
                warn!(path = %path.display(), error = %err, "job file not readable yet, leaving in place");
                return;
            }
            let basename = spooler_parser::reject_basename(path);
            match move_into(path, &paths.done, &basename, ".invalid") {
                Ok(target) => {
                    warn!(path = %path.display(), target = %target.display(), error = %err, "rejected invalid job file")
                }
                Err(move_err) => {
                    error!(path = %path.display(), error = %err, move_error = %move_err, "rejected job file, and failed to move it to done/")
                }
            }
            return;
        }
    };

    if job.kind == JobKind::DeleteJobs {
        info!(uid = %job.uid.short(), count = job.delete_ids.len(), "processing deletejobs request");
        router.fan_out_deletion(&job.delete_ids);
        if let Some(fname) = &job.fname {
            if let Err(e) = move_into(fname, &paths.done, &job.uid.to_string(), ".jobfile") {
                error!(path = %fname.display(), error = %e, "failed to move processed deletejobs file to done/");
            }
        }
        return;
    }

    let Some(queue_name) = job.kind.queue_name() else {
        error!(uid = %job.uid.short(), kind = ?job.kind, "job has no destination queue, rejecting");
        if let Some(fname) = &job.fname {
            let _ = move_into(fname, &paths.done, &job.uid.to_string(), ".jobfile");
        }
        return;
    };

    let Some(fname) = &job.fname else {
        warn!(uid = %job.uid.short(), "string-sourced job reached the router, which only handles file-sourced jobs");
        return;
    };
    let target = match move_into(fname, &paths.cur, &job.uid.to_string(), ".jobfile") {
        Ok(target) => target,
        Err(e) => {
            error!(path = %fname.display(), error = %e, "failed to move accepted job file to cur/, leaving it in new/");
            return;
        }
    };
    job.fname = Some(target);

    let queue = router.queue_mut(queue_name, paths);
    if let Err(e) = queue.append(job) {
        warn!(error = %e, "failed to enqueue job");
    }
    let _ = queue.flush_status();
}

/// Re-admit a job file already sitting in `cur/` from a previous run, rather
/// than freshly arrived in `new/` (§4.4a startup reconciliation). The file
/// is not moved — it's already where a queued-then-processing job's file
/// lives — only re-parsed and re-appended.
pub fn resume_cur_file(path: &Path, paths: &SpoolPaths, router: &mut QueueRouter, clock: &impl Clock) {
    match spooler_parser::parse(Source::File(path), clock) {
        Ok(mut job) => {
            job.fname = Some(path.to_path_buf());
            warn!(path = %path.display(), uid = %job.uid.short(), "resuming job left over in cur/ from a previous run");

            let Some(queue_name) = job.kind.queue_name() else {
                warn!(path = %path.display(), "leftover cur/ file has no destination queue, moving to done/");
                let _ = move_into(path, &paths.done, &job.uid.to_string(), ".jobfile");
                return;
            };

            let queue = router.queue_mut(queue_name, paths);
            if let Err(e) = queue.append(job) {
                warn!(error = %e, "failed to resume leftover job");
            }
            let _ = queue.flush_status();
        }
        Err(err) => {
            warn!(path = %path.display(), error = %err, "failed to resume leftover job from cur/");
            if err.rejects_file() {
                let basename = spooler_parser::reject_basename(path);
                let _ = move_into(path, &paths.done, &basename, ".invalid");
            }
        }
    }
}

#[cfg(test)]
#[path = "queues_tests.rs"]
mod tests;
