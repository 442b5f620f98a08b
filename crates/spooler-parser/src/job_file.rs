// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! The job description parser (§4.1).

use std::path::{Path, PathBuf};
use std::thread;
use std::time::Duration;

use spooler_core::{Clock, JobDescription, JobKind, JobStatus, JobUid};
use tracing::warn;

use crate::error::ParseError;
use crate::ini::{self, Section};

/// The manager's compile-time job-file format version (§4.1 step 5).
pub const JOBFILE_VER: &str = "7";

/// Back-off schedule for the race-tolerant file read (§4.1 step 1).
const READ_RETRY_DELAYS_MS: [u64; 6] = [0, 0, 0, 1, 10, 100];
// The first three entries are sub-millisecond in the original (0, 10us,
// 100us); std::thread::sleep has millisecond-ish practical resolution on
// most platforms, so they collapse to an immediate retry here and the
// back-off only becomes observable from the 1ms step onward.

/// Where the raw configuration bytes come from.
pub enum Source<'a> {
    /// A job file on disk, read with the race-tolerant retry loop.
    File(&'a Path),
    /// An in-memory string (tests only) — never participates in file
    /// motion (§4.5).
    String(&'a str),
}

/// Parse and validate a job description (§4.1).
pub fn parse(source: Source<'_>, clock: &impl Clock) -> Result<JobDescription, ParseError> {
    let (raw, fname) = match source {
        Source::File(path) => (read_with_retry(path)?, Some(path.to_path_buf())),
        Source::String(s) => (s.as_bytes().to_vec(), None),
    };

    let uid = JobUid::from_bytes(&raw);
    let text = std::str::from_utf8(&raw)
        .map_err(|e| ParseError::Validation(format!("job file is not valid UTF-8: {e}")))?;

    let mut doc = ini::parse(text)?;
    let mut job_section = doc.take_section("snijderjob").ok_or_else(|| {
        ParseError::Validation("missing required [snijderjob] section".to_string())
    })?;

    let ver = require(&mut job_section, "version")?;
    let user = require(&mut job_section, "username")?;
    let email = require(&mut job_section, "useremail")?;
    let timestamp_raw = require(&mut job_section, "timestamp")?;
    let jobtype = require(&mut job_section, "jobtype")?;

    let leftover = job_section.remaining_keys();
    if !leftover.is_empty() {
        return Err(ParseError::Validation(format!(
            "unknown option(s) in [snijderjob]: {}",
            leftover.join(", ")
        )));
    }

    if ver != JOBFILE_VER {
        return Err(ParseError::Validation(format!(
            "unsupported job file version {ver:?}, expected {JOBFILE_VER:?}"
        )));
    }

    let (timestamp, uid) = resolve_timestamp(&timestamp_raw, uid, clock)?;

    let (kind, exec, template, infiles, delete_ids) = match jobtype.as_str() {
        "hucore" => parse_hucore(&mut doc)?,
        "dummy" => parse_dummy(&mut doc)?,
        "deletejobs" => parse_deletejobs(&mut doc)?,
        other => {
            return Err(ParseError::Validation(format!("unknown jobtype {other:?}")));
        }
    };

    Ok(JobDescription {
        uid,
        kind,
        user,
        email,
        timestamp,
        ver,
        exec,
        template,
        infiles,
        delete_ids,
        status: JobStatus::NotAvailable,
        fname,
    })
}

/// The basename a rejected job file should be kept under, computed even
/// when parsing never reaches full validation (§4.1 "Edge cases").
pub fn reject_basename(path: &Path) -> String {
    path.file_name().map(|n| n.to_string_lossy().into_owned()).unwrap_or_else(|| "job".to_string())
}

fn require(section: &mut Section, key: &str) -> Result<String, ParseError> {
    section
        .take(key)
        .ok_or_else(|| ParseError::Validation(format!("missing required option {key:?}")))
}

/// `timestamp = <float>` or the `on_parsing` testing escape hatch, which
/// substitutes the current wall-clock and re-derives uid from it instead
/// of from the raw bytes (§9 Open Question resolution).
fn resolve_timestamp(
    raw: &str,
    uid: JobUid,
    clock: &impl Clock,
) -> Result<(f64, JobUid), ParseError> {
    if raw == "on_parsing" {
        let now = clock.epoch_seconds_f64();
        let hp = format!("{now:.9}");
        warn!(timestamp = %hp, "job file requested timestamp=on_parsing; substituting wall clock");
        Ok((now, JobUid::from_timestamp(&hp)))
    } else {
        match raw.parse::<f64>() {
            Ok(ts) => Ok((ts, uid)),
            Err(_) => Err(ParseError::Validation(format!("invalid timestamp {raw:?}"))),
        }
    }
}

type HucoreFields = (JobKind, PathBuf, Option<PathBuf>, Vec<PathBuf>, Vec<JobUid>);

fn parse_hucore(doc: &mut ini::IniDocument) -> Result<HucoreFields, ParseError> {
    let mut section = doc
        .take_section("hucore")
        .ok_or_else(|| ParseError::Validation("missing required [hucore] section".to_string()))?;

    let tasktype = require(&mut section, "tasktype")?;
    let exec = require(&mut section, "executable")?;
    let template = require(&mut section, "template")?;
    let leftover = section.remaining_keys();
    if !leftover.is_empty() {
        return Err(ParseError::Validation(format!(
            "unknown option(s) in [hucore]: {}",
            leftover.join(", ")
        )));
    }

    let kind = match tasktype.as_str() {
        "decon" => JobKind::HuDecon,
        "preview" => JobKind::HuPreview,
        other => {
            return Err(ParseError::Validation(format!("invalid hucore tasktype {other:?}")));
        }
    };

    let inputfiles = doc
        .take_section("inputfiles")
        .ok_or_else(|| ParseError::Validation("missing required [inputfiles] section".to_string()))?;
    let infiles: Vec<PathBuf> = inputfiles.values_in_order().map(PathBuf::from).collect();
    if infiles.is_empty() {
        return Err(ParseError::Validation("hucore jobs require at least one input file".to_string()));
    }

    Ok((kind, PathBuf::from(exec), Some(PathBuf::from(template)), infiles, Vec::new()))
}

fn parse_dummy(doc: &mut ini::IniDocument) -> Result<HucoreFields, ParseError> {
    let mut section = doc
        .take_section("hucore")
        .ok_or_else(|| ParseError::Validation("missing required [hucore] section".to_string()))?;

    let tasktype = require(&mut section, "tasktype")?;
    let exec = require(&mut section, "executable")?;
    let leftover = section.remaining_keys();
    if !leftover.is_empty() {
        return Err(ParseError::Validation(format!(
            "unknown option(s) in [hucore]: {}",
            leftover.join(", ")
        )));
    }
    if tasktype != "sleep" {
        return Err(ParseError::Validation(format!("invalid dummy tasktype {tasktype:?}")));
    }

    Ok((JobKind::DummySleep, PathBuf::from(exec), None, Vec::new(), Vec::new()))
}

fn parse_deletejobs(doc: &mut ini::IniDocument) -> Result<HucoreFields, ParseError> {
    let mut section = doc.take_section("deletejobs").ok_or_else(|| {
        ParseError::Validation("missing required [deletejobs] section".to_string())
    })?;

    let ids_raw = require(&mut section, "ids")?;
    let leftover = section.remaining_keys();
    if !leftover.is_empty() {
        return Err(ParseError::Validation(format!(
            "unknown option(s) in [deletejobs]: {}",
            leftover.join(", ")
        )));
    }

    let ids: Vec<JobUid> = ids_raw
        .split(',')
        .map(|s| s.trim())
        .filter(|s| !s.is_empty())
        .map(JobUid::from_literal)
        .collect();
    if ids.is_empty() {
        return Err(ParseError::Validation("deletejobs requires at least one id".to_string()));
    }

    Ok((JobKind::DeleteJobs, PathBuf::new(), None, Vec::new(), ids))
}

/// Read the whole file, retrying with back-off to tolerate a filesystem
/// event arriving before the producer finished writing (§4.1 step 1).
fn read_with_retry(path: &Path) -> Result<Vec<u8>, ParseError> {
    let mut last_err = None;
    for delay_ms in READ_RETRY_DELAYS_MS {
        if delay_ms > 0 {
            thread::sleep(Duration::from_millis(delay_ms));
        }
        match std::fs::read(path) {
            Ok(bytes) if !bytes.is_empty() => return Ok(bytes),
            Ok(_) => {
                last_err = None;
            }
            Err(e) => last_err = Some(e),
        }
    }
    match last_err {
        Some(source) => Err(ParseError::Io { path: path.to_path_buf(), source }),
        None => Err(ParseError::Io {
            path: path.to_path_buf(),
            source: std::io::Error::new(std::io::ErrorKind::UnexpectedEof, "job file is empty"),
        }),
    }
}

#[cfg(test)]
#[path = "job_file_tests.rs"]
mod tests;
