// SPDX-License-Identifier: MIT
// Copyright (c) 2026 Alfred Jean LLC

//! Effective settings: config file, then environment, then flags.

use std::path::Path;
use std::time::Duration;

use wip_core::SshOptions;

use crate::cli::Cli;
use crate::config::{expand_home, Config};

#[derive(Debug, Clone)]
pub struct Settings {
    pub interval: Duration,
    pub ref_retry: Duration,
    pub watch: bool,
    pub ssh: SshOptions,
}

impl Settings {
    /// `ssh_program` is the `WIPSYNC_SSH` override; `home` expands `~` in
    /// the identity file.
    pub fn resolve(config: &Config, cli: &Cli, ssh_program: Option<String>, home: Option<&Path>) -> Self {
        let program = ssh_program
            .or_else(|| config.ssh.program.clone())
            .unwrap_or_else(|| SshOptions::default().program);
        Settings {
            interval: Duration::from_millis(cli.interval_ms.unwrap_or(config.interval_ms)),
            ref_retry: Duration::from_millis(config.ref_retry_ms),
            watch: cli.watch || config.watch,
            ssh: SshOptions {
                program,
                options: config.ssh.options.clone(),
                identity_file: config
                    .ssh
                    .identity_file
                    .as_deref()
                    .map(|p| expand_home(p, home)),
                keepalive: config.keepalive && !cli.no_keepalive,
            },
        }
    }
}

#[cfg(test)]
#[path = "settings_tests.rs"]
mod tests;
