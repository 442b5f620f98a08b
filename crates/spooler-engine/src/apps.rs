// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Per-jobtype application construction (§6.2 "App construction
//! inputs").
//!
//! Replaces the original's per-jobtype subclassing (`HuDeconApp`,
//! `HuPreviewApp`, `DummySleepApp`, all sharing `AbstractApp`) with one
//! function keyed off [`JobKind`] (§9 "Dynamic job type dispatch" /
//! "Inheritance between app classes").

use std::path::{Path, PathBuf};

use spooler_core::{JobDescription, JobKind};

/// Everything needed to spawn a job's backend process.
///
/// `output_dir` is rooted under the backend spool dir with a
/// `results_<uid>` suffix, matching the original's `gc3_output_dir`
/// convention.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AppSpec {
    pub exec: PathBuf,
    pub args: Vec<String>,
    pub output_dir: PathBuf,
}

/// Assemble the app spec for `job`, rooted under `backend_spool_dir`.
///
/// `deletejobs` never reaches the engine (it's fully handled inside the
/// control loop's deletion handling, §4.4 step 2a) but is given a
/// harmless spec here rather than panicking, since `JobKind` is not
/// `Copy`-restricted to the engine-routable variants at the type level.
pub fn build(job: &JobDescription, backend_spool_dir: &Path) -> AppSpec {
    let output_dir = backend_spool_dir.join(format!("results_{}", job.uid));
    match job.kind {
        JobKind::HuDecon | JobKind::HuPreview => {
            let mut args = vec![
                "-exitOnDone".to_string(),
                "-noExecLog".to_string(),
                "-checkForUpdates".to_string(),
                "disable".to_string(),
                "-template".to_string(),
                template_basename(job),
            ];
            // Unlike the GC3Pie backend (which stages `infiles` to the
            // remote host out-of-band and never puts them on the command
            // line), this local engine execs `exec` directly with no
            // separate transfer step, so the input files have to be named
            // as trailing arguments for it to find them at all.
            args.extend(job.infiles.iter().map(|p| p.to_string_lossy().into_owned()));
            AppSpec { exec: job.exec.clone(), args, output_dir }
        }
        JobKind::DummySleep => {
            AppSpec { exec: job.exec.clone(), args: vec!["1.6".to_string()], output_dir }
        }
        JobKind::DeleteJobs => AppSpec { exec: job.exec.clone(), args: Vec::new(), output_dir },
    }
}

/// The template file's basename, stripped of its local path — the
/// backend is expected to resolve it relative to its own working
/// directory, the way the original strips paths before handing the
/// template off to the remote execution host.
fn template_basename(job: &JobDescription) -> String {
    job.template
        .as_ref()
        .and_then(|t| t.file_name())
        .map(|n| n.to_string_lossy().into_owned())
        .unwrap_or_default()
}

#[cfg(test)]
#[path = "apps_tests.rs"]
mod tests;
