// SPDX-License-Identifier: MIT
// Copyright (c) 2026 Alfred Jean LLC

//! Brings the remote checkout to the local branch and commit.

use std::time::Duration;

use tracing::info;

use crate::endpoint::Remote;
use crate::error::Result;
use crate::repo::RepositoryRef;
use crate::shell::RemoteCommand;
use crate::stopwatch::{Elapsed, Stopwatch};

/// Pushes `target` and checks it out on the remote.
///
/// Every step is fatal. The remote index is reset to the pushed commit but
/// the remote working tree is left alone; the file pass that follows
/// overwrites what differs. Running it twice for the same ref changes
/// nothing the second time.
pub fn sync_head(remote: &mut dyn Remote, target: &RepositoryRef) -> Result<Duration> {
    let watch = Stopwatch::start();
    info!("{}: syncing head to {}", remote.name(), target.short());

    // pushing into the checked-out branch must be allowed
    remote.run_checked(
        &RemoteCommand::git(&["config", "receive.denyCurrentBranch", "false"]),
        true,
    )?;
    remote.push_ref(&target.branch)?;
    remote.run_checked(&RemoteCommand::git(&["reset", "-q"]), true)?;
    remote.run_checked(
        &RemoteCommand::git(&["checkout", "-q"]).arg(target.branch.as_str()),
        true,
    )?;

    let elapsed = watch.elapsed();
    info!(
        "{}: head at {} ({})",
        remote.name(),
        target.short(),
        Elapsed(elapsed)
    );
    Ok(elapsed)
}

#[cfg(test)]
#[path = "head_tests.rs"]
mod tests;
