// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

#![cfg_attr(test, allow(clippy::panic))]
#![cfg_attr(test, allow(clippy::unwrap_used))]
#![cfg_attr(test, allow(clippy::expect_used))]

//! spooler-engine: the execution-engine adapter (§4.3, §6.2) — a thin
//! wrapper over a local-process execution backend, plus the per-jobtype
//! application construction it dispatches to.

pub mod apps;
pub mod contract;
pub mod local;
pub mod resource;

pub use apps::{build, AppSpec};
pub use contract::{AppState, Engine, EngineCounts, EngineError, ResourceInfo};
pub use local::LocalProcessEngine;
pub use resource::{refuse_if_unclean, scan_and_clean, LiveWorker, WORKER_CMDLINE_MARKER};
