// SPDX-License-Identifier: MIT
// Copyright (c) 2026 Alfred Jean LLC

//! Single-instance guard per repository and endpoint.
//!
//! Two processes mirroring the same working tree to the same endpoint would
//! interleave remote commands in one remote directory. The lock file lives
//! in the local git directory and is held for the life of the process.

use std::fs::{File, OpenOptions};
use std::path::{Path, PathBuf};

use fs2::FileExt;

use crate::endpoint::RemoteEndpoint;
use crate::error::{Error, Result};

/// An exclusive lock, released when dropped.
#[derive(Debug)]
pub struct InstanceLock {
    _file: File,
    path: PathBuf,
}

impl InstanceLock {
    /// Takes the lock for `endpoint` without blocking.
    ///
    /// # Errors
    ///
    /// Returns [`Error::Locked`] when another process holds it.
    pub fn acquire(git_dir: &Path, endpoint: &RemoteEndpoint) -> Result<Self> {
        let path = git_dir.join(format!("wipsync-{}.lock", endpoint.id()));
        let file = OpenOptions::new()
            .read(true)
            .write(true)
            .create(true)
            .truncate(false)
            .open(&path)?;

        file.try_lock_exclusive()
            .map_err(|_| Error::Locked(endpoint.name().to_string()))?;

        Ok(InstanceLock { _file: file, path })
    }

    pub fn path(&self) -> &Path {
        &self.path
    }
}

#[cfg(test)]
#[path = "lock_tests.rs"]
mod tests;
