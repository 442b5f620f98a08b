// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! `spoolerd`: the multi-user job queue spooler binary.

use anyhow::Context;
use clap::Parser;
use spooler_core::{SpoolPaths, SystemClock};
use spooler_daemon::{control_loop, lifecycle, logging, queues::QueueRouter, watcher, Cli, Config};
use spooler_engine::LocalProcessEngine;
use tokio::signal::unix::{signal, SignalKind};
use tracing::{info, warn};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();
    let config = Config::resolve(cli).context("resolving configuration")?;
    let paths = SpoolPaths::new(config.spooldir.clone());
    let lock = lifecycle::acquire_lock(&paths).context("acquiring single-instance lock")?;

    let _log_guard = logging::init(config.verbosity, config.engine_log_level, Some(&paths.base));
    info!(spooldir = %config.spooldir.display(), resource = %config.resource, "spoolerd starting");

    let mut router = QueueRouter::new();
    let clock = SystemClock;
    lifecycle::reconcile_backlog(&paths, &mut router, &clock)?;

    let resource_dir = paths.base.join("resources").join(&config.resource);
    let engine = LocalProcessEngine::new(config.resource.clone(), resource_dir, config.backend_config.clone())?;

    let (new_file_rx, _watcher) = watcher::watch(&paths.new)?;

    let mut sigterm = signal(SignalKind::terminate())?;
    let mut sigint = signal(SignalKind::interrupt())?;
    let request_file = paths.request_file("shutdown");
    tokio::spawn(async move {
        tokio::select! {
            _ = sigterm.recv() => info!("received SIGTERM"),
            _ = sigint.recv() => info!("received SIGINT"),
        }
        info!("requesting graceful shutdown");
        if let Err(e) = std::fs::write(&request_file, b"") {
            warn!(error = %e, "failed to write shutdown request file from signal handler");
        }
    });

    let mut spooler = control_loop::Spooler::new(paths, router, engine, clock, new_file_rx);

    println!("READY");
    info!("spoolerd ready");

    spooler.run().await;
    drop(lock);

    info!("spoolerd stopped");
    Ok(())
}
