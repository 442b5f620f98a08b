// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Structured logging setup (§6.5a).

use std::path::Path;

use tracing_subscriber::{fmt, prelude::*, EnvFilter};

use crate::config::EngineLogLevel;

/// Translate repeated `-v` flags into a default level: warn -> info -> debug
/// -> trace. `RUST_LOG`, when set, always wins (§6.5a).
fn default_filter(verbosity: u8, engine_log_level: Option<EngineLogLevel>) -> EnvFilter {
    let base = match verbosity {
        0 => "warn",
        1 => "info",
        2 => "debug",
        _ => "trace",
    };
    let mut directive = format!("spoolerd={base},spooler_core={base},spooler_parser={base}");
    match engine_log_level {
        Some(EngineLogLevel::Debug) => directive.push_str(",spooler_engine=debug"),
        Some(EngineLogLevel::Info) => directive.push_str(",spooler_engine=info"),
        None => directive.push_str(&format!(",spooler_engine={base}")),
    }

    EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(directive))
}

/// Install the global tracing subscriber. When `log_dir` is given, logs are
/// additionally written to `<log_dir>/spoolerd.log`; the returned guard must
/// be kept alive for the process lifetime (it flushes the non-blocking
/// writer on drop).
pub fn init(
    verbosity: u8,
    engine_log_level: Option<EngineLogLevel>,
    log_dir: Option<&Path>,
) -> Option<tracing_appender::non_blocking::WorkerGuard> {
    let filter = default_filter(verbosity, engine_log_level);

    match log_dir {
        Some(dir) => {
            let file_appender = tracing_appender::rolling::never(dir, "spoolerd.log");
            let (non_blocking, guard) = tracing_appender::non_blocking(file_appender);
            tracing_subscriber::registry()
                .with(filter)
                .with(fmt::layer().with_writer(non_blocking).compact())
                .init();
            Some(guard)
        }
        None => {
            tracing_subscriber::registry().with(filter).with(fmt::layer().compact()).init();
            None
        }
    }
}
