// SPDX-License-Identifier: MIT
// Copyright (c) 2026 Alfred Jean LLC

//! Console logging.
//!
//! Everything goes to stderr through a `tracing` fmt subscriber. Each
//! message names its side (`local` or the remote) itself, so targets are
//! left out.

use tracing_subscriber::EnvFilter;

use crate::{colors, env};

/// Default filter for the given `-v` count and `-q` flag.
pub fn default_directive(verbose: u8, quiet: bool) -> &'static str {
    match (quiet, verbose) {
        (true, _) => "warn",
        (false, 0) => "info",
        (false, 1) => "debug",
        (false, _) => "trace",
    }
}

/// Picks the filter: explicit flags first, then `WIPSYNC_LOG`, then `info`.
pub fn filter(verbose: u8, quiet: bool, from_env: Option<&str>) -> EnvFilter {
    let fallback = || EnvFilter::new(default_directive(verbose, quiet));
    if verbose > 0 || quiet {
        return fallback();
    }
    match from_env.map(EnvFilter::try_new) {
        Some(Ok(filter)) => filter,
        Some(Err(e)) => {
            eprintln!("warning: ignoring invalid {}: {}", env::vars::WIPSYNC_LOG, e);
            fallback()
        }
        None => fallback(),
    }
}

/// Installs the global subscriber. Safe to call more than once.
pub fn init(verbose: u8, quiet: bool) {
    let filter = filter(verbose, quiet, env::log_filter().as_deref());
    let _ = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .with_target(false)
        .without_time()
        .with_ansi(colors::stderr_colors())
        .try_init();
}

#[cfg(test)]
#[path = "logging_tests.rs"]
mod tests;
