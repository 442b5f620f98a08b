// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! The control loop (§4.4), grounded on `snijder.spooler.JobSpooler._spool`
//! / `engine_status` / `check_for_jobs_to_delete` / `kill_running_job` /
//! `cleanup`.

use std::collections::HashMap;
use std::path::PathBuf;
use std::time::Duration;

use spooler_core::{move_into, Clock, JobDescription, JobStatus, JobUid, SpoolPaths};
use spooler_engine::{AppState, Engine};
use tokio::sync::mpsc;
use tracing::{info, warn};

use crate::queues::{self, QueueRouter};
use crate::requests::{self, Request};

/// The inter-tick idle pause while the loop is otherwise caught up (§4.4).
const TICK_PAUSE: Duration = Duration::from_millis(500);

/// Spooler status (§4.4). `Refresh` is applied and reverted within the same
/// tick — it never becomes a resting value.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Status {
    Run,
    Pause,
    Shutdown,
}

pub struct Spooler<E: Engine, C: Clock> {
    status: Status,
    paths: SpoolPaths,
    router: QueueRouter,
    engine: E,
    clock: C,
    new_file_rx: mpsc::UnboundedReceiver<PathBuf>,
    last_states: HashMap<JobUid, AppState>,
}

impl<E: Engine, C: Clock> Spooler<E, C> {
    pub fn new(
        paths: SpoolPaths,
        router: QueueRouter,
        engine: E,
        clock: C,
        new_file_rx: mpsc::UnboundedReceiver<PathBuf>,
    ) -> Self {
        Self { status: Status::Run, paths, router, engine, clock, new_file_rx, last_states: HashMap::new() }
    }

    pub fn status(&self) -> Status {
        self.status
    }

    /// Run until a `shutdown` request is observed, then clean up (§4.4a).
    pub async fn run(&mut self) {
        loop {
            self.drain_new_files();
            self.handle_requests();
            match self.status {
                Status::Shutdown => break,
                Status::Pause => {}
                Status::Run => self.tick_once().await,
            }
            tokio::time::sleep(TICK_PAUSE).await;
        }
        self.cleanup().await;
    }

    /// Route every job file the watcher has reported since the last drain
    /// through the same logic the startup backlog scan uses (§4.4a).
    pub fn drain_new_files(&mut self) {
        while let Ok(path) = self.new_file_rx.try_recv() {
            queues::process_jobfile(&path, &self.paths, &mut self.router, &self.clock);
        }
    }

    /// Consume at most one control-file request and apply it (§4.4 step 1).
    pub fn handle_requests(&mut self) {
        let Some(request) = requests::check(&self.paths) else { return };
        match request {
            Request::Shutdown => self.set_status(Status::Shutdown),
            Request::Pause => self.set_status(Status::Pause),
            Request::Run => self.set_status(Status::Run),
            Request::Refresh => {
                info!("received queue status refresh request");
                for (name, queue) in self.router.iter_names() {
                    let _ = queue.flush_status();
                    info!(
                        queue = name,
                        processing = queue.num_jobs_processing(),
                        queued = queue.num_jobs_queued(),
                        "queue status"
                    );
                }
            }
        }
    }

    fn set_status(&mut self, new_status: Status) {
        if new_status == self.status {
            return;
        }
        warn!(from = ?self.status, to = ?new_status, "spooler status change");
        self.status = new_status;
    }

    /// One `run`-state tick: process deletions, advance the engine, propagate
    /// state transitions, then dispatch at most one new job (§4.4 steps 2a-d).
    pub async fn tick_once(&mut self) {
        self.process_deletions().await;
        self.engine.progress().await;
        self.collect_transitions();

        let counts = self.engine.counts();
        if counts.in_flight() > 0 {
            tokio::time::sleep(Duration::from_secs(1)).await;
            return;
        }

        self.dispatch_next().await;
    }

    /// Kill every processing job named in some queue's deletion list, then
    /// drain each queue's own deletion list for anything left over (uids for
    /// jobs that were only ever queued, never dispatched) (§4.2, §4.4 step
    /// 2a, §9 "the apps-list mutate-while-iterate bug").
    async fn process_deletions(&mut self) {
        let mut to_kill = Vec::new();
        for (_, queue) in self.router.iter_names() {
            let processing: Vec<JobUid> = queue.processing().cloned().collect();
            for uid in processing {
                if queue.deletion_list.contains(&uid) {
                    to_kill.push(uid);
                }
            }
        }
        for uid in to_kill {
            self.kill_running_job(uid).await;
        }
        for (_, queue) in self.router.iter_names() {
            queue.process_deletion_list();
        }
    }

    /// Force-terminate an in-flight job and evict it (§4.4 `kill_running_job`).
    async fn kill_running_job(&mut self, uid: JobUid) {
        warn!(uid = %uid.short(), "killing running job per deletion request");
        self.engine.kill(&uid);
        self.engine.progress().await;
        match self.engine.state_of(&uid) {
            Some(AppState::Terminated) => info!(uid = %uid.short(), "job terminated"),
            other => warn!(uid = %uid.short(), state = ?other, "job did not reach TERMINATED after kill"),
        }

        if let Some(name) = self.router.find_queue_name(&uid) {
            if let Some(queue) = self.router.get_mut(&name) {
                queue.deletion_list.retain(|u| *u != uid);
                if let Some(job) = queue.get(&uid) {
                    move_terminated_job_file(&self.paths, job);
                }
                queue.remove(uid.clone(), true);
            }
        }
        self.engine.forget(&uid);
        self.last_states.remove(&uid);
    }

    /// Compare every processing job's engine-observed state against what was
    /// last propagated, and push any change through to the queue (§4.4 step
    /// 2c, §6.2). `Terminated` additionally moves the job file to `done/`
    /// and drops the engine's bookkeeping for it.
    fn collect_transitions(&mut self) {
        let mut observed: Vec<(String, JobUid, AppState)> = Vec::new();
        for (name, queue) in self.router.iter_names() {
            for uid in queue.processing() {
                if let Some(state) = self.engine.state_of(uid) {
                    if self.last_states.get(uid) != Some(&state) {
                        observed.push((name.clone(), uid.clone(), state));
                    }
                }
            }
        }

        for (name, uid, state) in observed {
            self.last_states.insert(uid.clone(), state);
            let Some(queue) = self.router.get_mut(&name) else { continue };

            if state == AppState::Terminated {
                if let Some(job) = queue.get(&uid) {
                    move_terminated_job_file(&self.paths, job);
                }
                queue.set_jobstatus(uid.clone(), JobStatus::Terminated);
                self.engine.forget(&uid);
                self.last_states.remove(&uid);
            } else {
                queue.set_jobstatus(uid, state.into());
            }
        }
    }

    /// Single-flight dispatch: hand the next queued job to the engine
    /// (§4.4 step 2d "single-flight guarantee"). `deletejobs` never reaches
    /// here — it's fully handled in [`queues::process_jobfile`] and never
    /// occupies a queue slot.
    async fn dispatch_next(&mut self) {
        for name in self.router.names() {
            let Some(queue) = self.router.get_mut(&name) else { continue };
            let Some(job) = queue.next_job() else { continue };

            info!(uid = %job.uid.short(), kind = ?job.kind, queue = %name, "dispatching job to execution engine");
            match self.engine.add(&job).await {
                Ok(()) => {
                    self.last_states.insert(job.uid, AppState::Submitted);
                }
                Err(e) => {
                    warn!(
                        uid = %job.uid.short(),
                        error = %e,
                        "execution engine refused the job, evicting it rather than stalling the loop"
                    );
                    if let Some(queue) = self.router.get_mut(&name) {
                        queue.remove(job.uid, true);
                    }
                }
            }
            return;
        }
    }

    /// Shutdown reconciliation (§4.4a): kill every remaining processing job,
    /// report anything that didn't reach `TERMINATED`, then re-check the
    /// resource directories one last time.
    async fn cleanup(&mut self) {
        warn!("queue manager shutdown initiated");

        let mut uids = Vec::new();
        for (_, queue) in self.router.iter_names() {
            uids.extend(queue.processing().cloned());
        }

        if !uids.is_empty() {
            warn!(count = uids.len(), "unfinished jobs found, trying to stop them");
            for uid in uids {
                self.kill_running_job(uid).await;
            }
            self.engine.progress().await;
            let counts = self.engine.counts();
            if counts.running > 0 || counts.submitted > 0 {
                tracing::error!(in_flight = counts.in_flight(), "killing jobs failed, some still in flight");
            } else {
                info!("successfully terminated all remaining jobs");
            }
        }

        match spooler_engine::scan_and_clean(&self.engine.get_resources()) {
            Ok(live) if !live.is_empty() => {
                tracing::error!(count = live.len(), "resource directories still unclean at shutdown");
            }
            Err(e) => tracing::error!(error = %e, "failed to re-check resource directories at shutdown"),
            Ok(_) => {}
        }

        info!("queue manager shutdown complete");
    }
}

fn move_terminated_job_file(paths: &SpoolPaths, job: &JobDescription) {
    let Some(fname) = &job.fname else { return };
    match move_into(fname, &paths.done, &job.uid.to_string(), ".jobfile") {
        Ok(target) => info!(uid = %job.uid.short(), target = %target.display(), "moved job file to done/"),
        Err(e) => warn!(uid = %job.uid.short(), error = %e, "failed to move job file to done/"),
    }
}

#[cfg(test)]
#[path = "control_loop_tests.rs"]
mod tests;
