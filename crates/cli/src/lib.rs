// SPDX-License-Identifier: MIT
// Copyright (c) 2026 Alfred Jean LLC

//! wipsync - mirror a git working tree to a remote host over ssh.
//!
//! This crate wires the `wip-core` engine to the command line: it resolves
//! the target endpoint, layers configuration, installs logging and runs
//! the sync loop.
//!
//! # Main Components
//!
//! - [`Cli`] - command-line arguments
//! - [`Config`] - per-repository settings in `<git-dir>/wipsync.toml`
//! - [`target::resolve`] - remote name or explicit host to endpoint
//! - [`Error`] - error types with user-facing hints

mod cli;
pub mod colors;
pub mod config;
pub mod env;
pub mod error;
mod help;
pub mod logging;
pub mod settings;
pub mod target;

pub use cli::Cli;
pub use config::Config;
pub use error::{Error, Result};
pub use settings::Settings;

use tracing::info;
use wip_core::{GitRepository, InstanceLock, Observer, SshRemote, SyncLoop, Trigger};

/// Run wipsync with parsed arguments. Returns only on error, or after one
/// cycle with `--once`.
pub fn run(cli: Cli) -> Result<()> {
    let dir = match &cli.directory {
        Some(dir) => dir.clone(),
        None => std::env::current_dir()?,
    };
    let repo = GitRepository::open(&dir)?;
    let config = Config::load(repo.git_dir())?;
    let home = dirs::home_dir();
    let settings = Settings::resolve(&config, &cli, env::ssh_program(), home.as_deref());

    let url = repo.remote_url(&cli.remote)?;
    let endpoint = target::resolve(&cli.remote, cli.path.as_deref(), url.as_deref())?;
    info!(
        "local: mirroring {} to {}",
        repo.root().display(),
        endpoint.push_url()
    );

    let _lock = InstanceLock::acquire(repo.git_dir(), &endpoint)?;
    let mut remote = SshRemote::new(endpoint, settings.ssh.clone(), repo.root());
    remote.start_keepalive();

    let trigger = if settings.watch {
        Trigger::watch(repo.root(), settings.interval)?
    } else {
        Trigger::interval(settings.interval)
    };
    let observer = repo.with_ref_retry(settings.ref_retry);
    let mut sync = SyncLoop::new(observer, remote, trigger);

    if cli.once {
        let report = sync.run_once()?;
        info!(
            "local: done, {} changes mirrored{}",
            report.events.len(),
            if report.remove_failures > 0 {
                format!(", {} deletes failed", report.remove_failures)
            } else {
                String::new()
            }
        );
        return Ok(());
    }
    sync.run()?;
    Ok(())
}
