// SPDX-License-Identifier: MIT
// Copyright (c) 2026 Alfred Jean LLC

//! Read-only queries against the local git repository.

use std::collections::BTreeSet;
use std::path::{Path, PathBuf};
use std::process::{Command, Stdio};
use std::thread;
use std::time::Duration;

use tracing::{debug, warn};

use crate::error::{Error, Result};

/// Number of unstable reads after which a warning is logged.
const UNSTABLE_WARN_AFTER: u32 = 10;

/// Git state directories that mean HEAD is mid-operation.
const IN_PROGRESS_MARKERS: [&str; 4] = ["rebase-merge", "rebase-apply", "MERGE_HEAD", "CHERRY_PICK_HEAD"];

/// The checked-out branch and its commit.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RepositoryRef {
    pub branch: String,
    pub commit: String,
}

impl RepositoryRef {
    pub fn new(branch: impl Into<String>, commit: impl Into<String>) -> Self {
        RepositoryRef {
            branch: branch.into(),
            commit: commit.into(),
        }
    }

    /// Abbreviated form for log lines.
    pub fn short(&self) -> String {
        let commit: String = self.commit.chars().take(8).collect();
        format!("{}@{}", self.branch, commit)
    }
}

/// What the sync loop needs to know about the local repository.
pub trait Observer {
    /// Root of the working tree; changed paths are relative to it.
    fn root(&self) -> &Path;

    /// The current branch and commit. Never returns a transitional state.
    fn current_ref(&self) -> Result<RepositoryRef>;

    /// Paths with uncommitted differences, untracked ones included.
    fn changed_paths(&self) -> Result<BTreeSet<String>>;
}

/// A git working tree queried through the `git` executable.
#[derive(Debug, Clone)]
pub struct GitRepository {
    root: PathBuf,
    git_dir: PathBuf,
    ref_retry: Duration,
}

impl GitRepository {
    /// Opens the working tree containing `dir`.
    ///
    /// # Errors
    ///
    /// Returns [`Error::NotARepository`] outside a git working tree.
    pub fn open(dir: &Path) -> Result<Self> {
        let output = Command::new("git")
            .current_dir(dir)
            .args(["rev-parse", "--show-toplevel", "--absolute-git-dir"])
            .stdin(Stdio::null())
            .output()
            .map_err(|e| Error::NotARepository(format!("{}: {}", dir.display(), e)))?;
        if !output.status.success() {
            return Err(Error::NotARepository(dir.display().to_string()));
        }

        let stdout = String::from_utf8_lossy(&output.stdout);
        let mut lines = stdout.lines();
        let root = lines.next().map(str::trim).filter(|l| !l.is_empty());
        let git_dir = lines.next().map(str::trim).filter(|l| !l.is_empty());
        match (root, git_dir) {
            (Some(root), Some(git_dir)) => Ok(GitRepository {
                root: PathBuf::from(root),
                git_dir: PathBuf::from(git_dir),
                ref_retry: Duration::from_millis(100),
            }),
            // bare repositories have no top level
            _ => Err(Error::NotARepository(dir.display().to_string())),
        }
    }

    /// Sets the pause between re-reads of an unstable HEAD.
    pub fn with_ref_retry(mut self, retry: Duration) -> Self {
        self.ref_retry = retry;
        self
    }

    pub fn git_dir(&self) -> &Path {
        &self.git_dir
    }

    /// URL configured for the named remote, if there is one.
    pub fn remote_url(&self, name: &str) -> Result<Option<String>> {
        let output = self.git(&["remote", "get-url", name])?;
        if !output.status.success() {
            return Ok(None);
        }
        let url = String::from_utf8_lossy(&output.stdout).trim().to_string();
        Ok(if url.is_empty() { None } else { Some(url) })
    }

    fn git(&self, args: &[&str]) -> Result<std::process::Output> {
        Ok(Command::new("git")
            .current_dir(&self.root)
            .args(args)
            .stdin(Stdio::null())
            .output()?)
    }

    /// Runs git and returns trimmed stdout, or `None` if it exited non-zero.
    fn git_value(&self, args: &[&str]) -> Result<Option<String>> {
        let output = self.git(args)?;
        if !output.status.success() {
            return Ok(None);
        }
        let value = String::from_utf8_lossy(&output.stdout).trim().to_string();
        Ok(if value.is_empty() { None } else { Some(value) })
    }

    fn operation_in_progress(&self) -> bool {
        IN_PROGRESS_MARKERS
            .iter()
            .any(|marker| self.git_dir.join(marker).exists())
    }

    /// One attempt at reading HEAD; `None` while it is in a transitional
    /// state.
    fn read_ref(&self) -> Result<Option<RepositoryRef>> {
        if self.operation_in_progress() {
            return Ok(None);
        }
        let Some(branch) = self.git_value(&["symbolic-ref", "--short", "-q", "HEAD"])? else {
            return Ok(None);
        };
        let Some(commit) = self.git_value(&["rev-parse", "--verify", "-q", "HEAD"])? else {
            return Ok(None);
        };
        Ok(Some(RepositoryRef { branch, commit }))
    }
}

impl Observer for GitRepository {
    fn root(&self) -> &Path {
        &self.root
    }

    fn current_ref(&self) -> Result<RepositoryRef> {
        let mut attempts = 0u32;
        loop {
            if let Some(head) = self.read_ref()? {
                return Ok(head);
            }
            attempts += 1;
            if attempts == UNSTABLE_WARN_AFTER {
                warn!("local: HEAD is detached or mid-operation, waiting for a branch");
            } else {
                debug!("local: HEAD unstable, retrying");
            }
            thread::sleep(self.ref_retry);
        }
    }

    fn changed_paths(&self) -> Result<BTreeSet<String>> {
        let output = self.git(&["status", "--porcelain=v1", "-z", "--untracked-files=all"])?;
        if !output.status.success() {
            return Err(Error::Git {
                command: "status".to_string(),
                output: String::from_utf8_lossy(&output.stderr).trim().to_string(),
            });
        }
        Ok(parse_status(&String::from_utf8_lossy(&output.stdout)))
    }
}

/// Parses `git status --porcelain=v1 -z` output into the set of paths.
///
/// With `--untracked-files=all` git names each untracked file; a `dir/`
/// entry only appears for a nested repository.
///
/// Renames and copies contribute both the new and the original path.
pub fn parse_status(output: &str) -> BTreeSet<String> {
    let mut paths = BTreeSet::new();
    let mut entries = output.split('\0');
    while let Some(entry) = entries.next() {
        if entry.len() < 4 {
            continue;
        }
        let (status, path) = entry.split_at(3);
        if !path.is_empty() {
            paths.insert(path.to_string());
        }
        if status[..2].contains(['R', 'C']) {
            if let Some(original) = entries.next().filter(|p| !p.is_empty()) {
                paths.insert(original.to_string());
            }
        }
    }
    paths
}

#[cfg(test)]
#[path = "repo_tests.rs"]
mod tests;
