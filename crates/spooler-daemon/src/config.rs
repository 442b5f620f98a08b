// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! CLI flags and configuration resolution (§6.5, §6.5b).

use std::path::PathBuf;

use clap::Parser;

use crate::error::DaemonError;

/// Multi-user job queue spooler.
#[derive(Debug, Parser)]
#[command(name = "spoolerd", version, about = "Multi-user job queue spooler")]
pub struct Cli {
    /// Base spool directory; the spool/queue tree (§3) is created under it.
    /// Falls back to SPOOLER_SPOOLDIR if not given.
    #[arg(long)]
    pub spooldir: Option<PathBuf>,

    /// Backend engine configuration file. Defaults to <spooldir>/engine.toml,
    /// or SPOOLER_CONFIG if set.
    #[arg(long)]
    pub config: Option<PathBuf>,

    /// Restrict the execution engine to a single named resource. Defaults to
    /// SPOOLER_RESOURCE, or "localhost" if neither is given.
    #[arg(long)]
    pub resource: Option<String>,

    /// Increase log verbosity (repeatable): warn -> info -> debug -> trace.
    #[arg(short = 'v', long = "verbose", action = clap::ArgAction::Count)]
    pub verbose: u8,

    /// Set the backend engine's own log target to debug.
    #[arg(long, conflicts_with = "engine_info")]
    pub engine_debug: bool,

    /// Set the backend engine's own log target to info.
    #[arg(long, conflicts_with = "engine_debug")]
    pub engine_info: bool,
}

/// Resolved configuration (§6.5b): flag, then environment, then default.
#[derive(Debug, Clone)]
pub struct Config {
    pub spooldir: PathBuf,
    pub backend_config: PathBuf,
    pub resource: String,
    pub verbosity: u8,
    pub engine_log_level: Option<EngineLogLevel>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum EngineLogLevel {
    Debug,
    Info,
}

impl Config {
    pub fn resolve(cli: Cli) -> Result<Self, DaemonError> {
        let spooldir = cli
            .spooldir
            .or_else(|| std::env::var_os("SPOOLER_SPOOLDIR").map(PathBuf::from))
            .ok_or(DaemonError::MissingSpooldir)?;
        let spooldir = absolute(spooldir);

        let backend_config = cli
            .config
            .or_else(|| std::env::var_os("SPOOLER_CONFIG").map(PathBuf::from))
            .unwrap_or_else(|| spooldir.join("engine.toml"));

        let resource = cli
            .resource
            .or_else(|| std::env::var("SPOOLER_RESOURCE").ok())
            .unwrap_or_else(|| "localhost".to_string());

        let engine_log_level = if cli.engine_debug {
            Some(EngineLogLevel::Debug)
        } else if cli.engine_info {
            Some(EngineLogLevel::Info)
        } else {
            None
        };

        Ok(Self { spooldir, backend_config, resource, verbosity: cli.verbose, engine_log_level })
    }
}

/// Resolve a possibly-relative path against the current directory, without
/// requiring the path to already exist (unlike `std::fs::canonicalize`).
fn absolute(path: PathBuf) -> PathBuf {
    if path.is_absolute() {
        return path;
    }
    std::env::current_dir().map(|cwd| cwd.join(&path)).unwrap_or(path)
}

#[cfg(test)]
#[path = "config_tests.rs"]
mod tests;
