// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Round-robin multi-category job queue (§4.2).

use std::collections::{HashMap, VecDeque};
use std::io;
use std::path::PathBuf;

use tracing::{info, warn};

use crate::error::QueueError;
use crate::job::JobDescription;
use crate::status::JobStatus;
use crate::status_json::{QueueSnapshot, StatusJob};
use crate::uid::JobUid;

/// Fair round-robin scheduler over per-user FIFO sub-queues (§3 "JobQueue").
///
/// All mutating methods are meant to be called from a single owner (the
/// control loop, §4.4) — see the concurrency note in §4.2.
pub struct JobQueue {
    jobs: HashMap<JobUid, JobDescription>,
    categories: VecDeque<String>,
    queue: HashMap<String, VecDeque<JobUid>>,
    processing: VecDeque<JobUid>,
    pub deletion_list: VecDeque<JobUid>,
    status_file: Option<PathBuf>,
    dirty: bool,
}

impl JobQueue {
    pub fn new() -> Self {
        Self {
            jobs: HashMap::new(),
            categories: VecDeque::new(),
            queue: HashMap::new(),
            processing: VecDeque::new(),
            deletion_list: VecDeque::new(),
            status_file: None,
            dirty: false,
        }
    }

    pub fn set_status_file(&mut self, path: PathBuf) {
        self.status_file = Some(path);
    }

    pub fn num_jobs_queued(&self) -> usize {
        self.queue.values().map(|fifo| fifo.len()).sum()
    }

    pub fn num_jobs_processing(&self) -> usize {
        self.processing.len()
    }

    pub fn get(&self, uid: &JobUid) -> Option<&JobDescription> {
        self.jobs.get(uid)
    }

    pub fn is_processing(&self, uid: &JobUid) -> bool {
        self.processing.contains(uid)
    }

    pub fn processing(&self) -> impl Iterator<Item = &JobUid> {
        self.processing.iter()
    }

    /// Insert a new job into its category's FIFO, creating the category if
    /// this is its first job.
    pub fn append(&mut self, mut job: JobDescription) -> Result<(), QueueError> {
        if self.jobs.contains_key(&job.uid) {
            return Err(QueueError::AlreadyQueued(job.uid.clone()));
        }
        let uid = job.uid.clone();
        let category = job.user.clone();
        job.set_status(JobStatus::Queued);
        self.jobs.insert(uid.clone(), job);

        let fifo = self.queue.entry(category.clone()).or_default();
        if fifo.is_empty() {
            self.categories.push_back(category);
        }
        fifo.push_back(uid);
        self.mark_dirty();
        Ok(())
    }

    /// Take the next job from the head category and rotate it to the tail,
    /// unless its FIFO just emptied (§4.2 "next_job").
    pub fn next_job(&mut self) -> Option<JobDescription> {
        let category = self.categories.front()?.clone();
        let fifo = self.queue.get_mut(&category)?;
        let uid = fifo.pop_front()?;

        if fifo.is_empty() {
            self.queue.remove(&category);
            self.categories.pop_front();
        } else {
            self.categories.rotate_left(1);
        }

        self.processing.push_back(uid.clone());
        self.mark_dirty();
        self.jobs.get(&uid).cloned()
    }

    /// Remove a job from wherever it lives (a category FIFO or `processing`).
    ///
    /// Returns `None` both when the uid is unknown and when it was present
    /// in `jobs` but absent from both locations — an invariant violation
    /// that's logged but not treated as fatal (§7).
    pub fn remove(&mut self, uid: JobUid, update_status: bool) -> Option<JobDescription> {
        let job = match self.jobs.remove(&uid) {
            Some(job) => job,
            None => {
                info!(uid = %uid.short(), "remove: no such job in this queue");
                return None;
            }
        };

        let removed_from_processing = {
            let before = self.processing.len();
            self.processing.retain(|u| *u != uid);
            self.processing.len() != before
        };

        let removed_from_category = if removed_from_processing {
            true
        } else if let Some(fifo) = self.queue.get_mut(&job.user) {
            let before = fifo.len();
            fifo.retain(|u| *u != uid);
            let removed = fifo.len() != before;
            if removed && fifo.is_empty() {
                self.queue.remove(&job.user);
                self.categories.retain(|c| c != &job.user);
            }
            removed
        } else {
            false
        };

        if !removed_from_processing && !removed_from_category {
            warn!(
                uid = %uid.short(),
                "invariant violation: job was in `jobs` but in neither a category FIFO nor `processing`"
            );
        }

        self.mark_dirty();
        if update_status {
            let _ = self.flush_status();
        }
        Some(job)
    }

    /// Assign a new status and, on `TERMINATED`, evict the job (§4.2
    /// "set_jobstatus").
    pub fn set_jobstatus(&mut self, uid: JobUid, status: JobStatus) {
        if let Some(job) = self.jobs.get_mut(&uid) {
            job.set_status(status);
        }
        self.mark_dirty();
        if status == JobStatus::Terminated {
            self.remove(uid, false);
        }
        let _ = self.flush_status();
    }

    /// Drain the deletion list, removing every uid it names. Uids owned by
    /// a different queue simply yield `None` and are logged, not errored
    /// (§4.2). One coalesced flush at the end (Open Question resolution,
    /// SPEC_FULL.md §9).
    pub fn process_deletion_list(&mut self) {
        while let Some(uid) = self.deletion_list.pop_front() {
            match self.remove(uid.clone(), false) {
                Some(_) => info!(uid = %uid.short(), "processed deletion request"),
                None => info!(uid = %uid.short(), "deletion request for unknown or foreign uid"),
            }
        }
        let _ = self.flush_status();
    }

    /// Round-robin-interleaved view of future serving order, without
    /// mutating state (§4.2 "joblist").
    pub fn joblist(&self) -> Vec<JobUid> {
        let fifos: Vec<&VecDeque<JobUid>> =
            self.categories.iter().filter_map(|c| self.queue.get(c)).collect();
        let max_len = fifos.iter().map(|f| f.len()).max().unwrap_or(0);

        let mut out = Vec::new();
        for row in 0..max_len {
            for fifo in &fifos {
                if let Some(uid) = fifo.get(row) {
                    out.push(uid.clone());
                }
            }
        }
        out
    }

    /// Snapshot for §6.4: `processing` jobs first, then `joblist()` order.
    pub fn queue_details_json(&self) -> QueueSnapshot {
        let mut jobs = Vec::with_capacity(self.jobs.len());
        for uid in self.processing.iter().chain(self.joblist().iter()) {
            if let Some(job) = self.jobs.get(uid) {
                jobs.push(StatusJob::from(job));
            }
        }
        QueueSnapshot { jobs }
    }

    fn mark_dirty(&mut self) {
        self.dirty = true;
    }

    /// Write the status snapshot to `status_file` if dirty, atomically
    /// (serialize to a `.tmp` sibling, then rename over the target — §6.4).
    pub fn flush_status(&mut self) -> io::Result<()> {
        if !self.dirty {
            return Ok(());
        }
        if let Some(path) = &self.status_file {
            let snapshot = self.queue_details_json();
            let body = serde_json::to_vec_pretty(&snapshot)?;
            let tmp = path.with_extension("tmp");
            std::fs::write(&tmp, body)?;
            std::fs::rename(&tmp, path)?;
        }
        self.dirty = false;
        Ok(())
    }
}

impl Default for JobQueue {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
#[path = "queue_tests.rs"]
mod tests;
