// SPDX-License-Identifier: MIT
// Copyright (c) 2026 Alfred Jean LLC

use clap::{ArgAction, Parser};
use std::path::PathBuf;

use crate::help;

#[derive(Parser, Debug)]
#[command(name = "wipsync", version)]
#[command(about = "Mirror a git working tree to a remote host over ssh")]
#[command(
    long_about = "Mirror a git working tree to a remote host over ssh.\n\n\
    The remote checkout follows the local branch and commit, and every \
    uncommitted change is copied as it happens."
)]
#[command(styles = help::styles())]
#[command(after_help = help::examples())]
pub struct Cli {
    /// Git remote to mirror to, or a host ([user@]host[:port]) when PATH is given
    #[arg(default_value = "origin")]
    pub remote: String,

    /// Repository directory on the host (with an explicit host only)
    pub path: Option<String>,

    /// Milliseconds between cycles (default 500)
    #[arg(long, value_name = "MS", value_parser = clap::value_parser!(u64).range(1..))]
    pub interval_ms: Option<u64>,

    /// Run a cycle when the filesystem reports a change instead of polling
    #[arg(long)]
    pub watch: bool,

    /// Do not hold an ssh master connection open
    #[arg(long)]
    pub no_keepalive: bool,

    /// Sync once and exit
    #[arg(long)]
    pub once: bool,

    /// Run as if started in DIR
    #[arg(short = 'C', value_name = "DIR")]
    pub directory: Option<PathBuf>,

    /// Log more (repeat for trace output)
    #[arg(short, long, action = ArgAction::Count, conflicts_with = "quiet")]
    pub verbose: u8,

    /// Log warnings and errors only
    #[arg(short, long)]
    pub quiet: bool,
}

#[cfg(test)]
#[path = "cli_tests.rs"]
mod tests;
