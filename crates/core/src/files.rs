// SPDX-License-Identifier: MIT
// Copyright (c) 2026 Alfred Jean LLC

//! Applies single file events to the remote.

use std::io;
use std::path::Path;
use std::time::Duration;

use tracing::{debug, info, warn};

use crate::endpoint::Remote;
use crate::error::{Error, Result};
use crate::stopwatch::{timed, Elapsed};
use crate::tracker::FileEvent;

/// What happened to one event on the remote.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FileOutcome {
    Copied { elapsed: Duration },
    /// The local file disappeared before it could be read; nothing was
    /// sent.
    Vanished,
    Removed,
    /// The remote delete failed; the stale remote copy is left in place.
    RemoveFailed,
}

/// Mirrors `event` for `path` (relative to `root`) on the remote.
///
/// # Errors
///
/// A failed copy is returned. A local file that is gone by the time it is
/// read comes back as [`FileOutcome::Vanished`]. A failed delete is logged
/// and reported as [`FileOutcome::RemoveFailed`].
pub fn apply(remote: &mut dyn Remote, root: &Path, path: &str, event: FileEvent) -> Result<FileOutcome> {
    match event {
        FileEvent::New | FileEvent::Modified => {
            let (copied, elapsed) = timed(|| remote.copy_file(&root.join(path), path));
            match copied {
                Ok(()) => {
                    info!("{}: {} {} ({})", remote.name(), event, path, Elapsed(elapsed));
                    Ok(FileOutcome::Copied { elapsed })
                }
                Err(Error::Io(e)) if e.kind() == io::ErrorKind::NotFound => {
                    debug!("local: {} vanished before it was sent", path);
                    Ok(FileOutcome::Vanished)
                }
                Err(e) => Err(e),
            }
        }
        FileEvent::Deleted => match remote.remove_file(path) {
            Ok(()) => {
                info!("{}: deleted {}", remote.name(), path);
                Ok(FileOutcome::Removed)
            }
            Err(e) => {
                warn!("{}: could not delete {}: {}", remote.name(), path, e);
                Ok(FileOutcome::RemoveFailed)
            }
        },
    }
}

#[cfg(test)]
#[path = "files_tests.rs"]
mod tests;
