// SPDX-License-Identifier: MIT
// Copyright (c) 2026 Alfred Jean LLC

//! Change detection by size and modification time.
//!
//! The tracker remembers a [`Fingerprint`] per repository-relative path and
//! turns each observation into NEW / MODIFIED / DELETED transitions. A path
//! without an entry is a path the tracker believes does not exist.

use std::collections::{BTreeSet, HashMap, HashSet};
use std::fmt;
use std::fs;
use std::path::Path;
use std::time::SystemTime;

use tracing::debug;

/// Directory never entered when expanding candidates.
const GIT_DIR: &str = ".git";

/// Cheap stand-in for file contents.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Fingerprint {
    pub size: u64,
    pub modified: SystemTime,
}

impl Fingerprint {
    /// Fingerprint of the file at `path`, or `None` if there is no file
    /// (missing, a directory, or a symlink with no target).
    ///
    /// Symlinks are followed, matching how the copy reads them.
    pub fn of(path: &Path) -> Option<Self> {
        let meta = fs::metadata(path).ok()?;
        if meta.is_dir() {
            return None;
        }
        Some(Fingerprint {
            size: meta.len(),
            modified: meta.modified().ok()?,
        })
    }
}

/// A change to one path between two observations.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FileEvent {
    New,
    Modified,
    Deleted,
}

impl fmt::Display for FileEvent {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            FileEvent::New => "new",
            FileEvent::Modified => "modified",
            FileEvent::Deleted => "deleted",
        })
    }
}

/// Fingerprints from the previous observation, keyed by relative path.
#[derive(Debug, Default)]
pub struct FileStateTracker {
    entries: HashMap<String, Fingerprint>,
}

impl FileStateTracker {
    pub fn new() -> Self {
        Self::default()
    }

    /// Compares the candidates under `root` against the stored fingerprints.
    ///
    /// Directory candidates are expanded to the files they contain right
    /// now; a trailing `/` is accepted. Events come back sorted by path, so
    /// the result does not depend on how the candidates were ordered.
    pub fn observe(&mut self, root: &Path, candidates: &BTreeSet<String>) -> Vec<(String, FileEvent)> {
        let mut paths = BTreeSet::new();
        for candidate in candidates {
            let relative = candidate.trim_end_matches('/');
            if relative.is_empty() {
                continue;
            }
            let full = root.join(relative);
            if is_dir(&full) {
                expand_dir(&full, relative, &mut paths);
                // a tracked file replaced by a directory must come out DELETED
                if self.entries.contains_key(relative) {
                    paths.insert(relative.to_string());
                }
            } else {
                paths.insert(relative.to_string());
            }
        }

        let mut events = Vec::new();
        for path in paths {
            let current = Fingerprint::of(&root.join(&path));
            let event = match (self.entries.get(&path), current) {
                (None, Some(_)) => Some(FileEvent::New),
                (Some(previous), Some(current)) if *previous != current => {
                    Some(FileEvent::Modified)
                }
                (Some(_), None) => Some(FileEvent::Deleted),
                _ => None,
            };
            match current {
                Some(fingerprint) => {
                    self.entries.insert(path.clone(), fingerprint);
                }
                None => {
                    self.entries.remove(&path);
                }
            }
            if let Some(event) = event {
                events.push((path, event));
            }
        }
        events
    }

    /// Stops watching paths that git no longer reports and that did not
    /// change in the latest observation. Returns how many were dropped.
    ///
    /// A reported entry ending in `/` covers every path below it.
    pub fn prune(&mut self, reported: &BTreeSet<String>, events: &[(String, FileEvent)]) -> usize {
        let touched: HashSet<&str> = events.iter().map(|(path, _)| path.as_str()).collect();
        let dirs: Vec<&str> = reported
            .iter()
            .map(String::as_str)
            .filter(|p| p.ends_with('/'))
            .collect();

        let before = self.entries.len();
        self.entries.retain(|path, _| {
            touched.contains(path.as_str())
                || reported.contains(path)
                || dirs.iter().any(|dir| path.starts_with(dir))
        });
        before - self.entries.len()
    }

    /// Drops the fingerprint of `path`, so its next observation starts over.
    pub fn forget(&mut self, path: &str) -> bool {
        self.entries.remove(path).is_some()
    }

    /// Every path currently holding a fingerprint.
    pub fn tracked_paths(&self) -> BTreeSet<String> {
        self.entries.keys().cloned().collect()
    }

    pub fn fingerprint(&self, path: &str) -> Option<Fingerprint> {
        self.entries.get(path).copied()
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

fn is_dir(path: &Path) -> bool {
    fs::symlink_metadata(path)
        .map(|m| m.is_dir())
        .unwrap_or(false)
}

/// Adds every non-directory below `dir` to `out`, as paths relative to the
/// repository root. Symlinked directories are not followed.
fn expand_dir(dir: &Path, relative: &str, out: &mut BTreeSet<String>) {
    let entries = match fs::read_dir(dir) {
        Ok(entries) => entries,
        Err(e) => {
            debug!("local: cannot read {}: {}", dir.display(), e);
            return;
        }
    };
    for entry in entries.flatten() {
        let name = entry.file_name();
        let name = name.to_string_lossy();
        if name == GIT_DIR {
            continue;
        }
        let child = format!("{}/{}", relative, name);
        match entry.file_type() {
            Ok(kind) if kind.is_dir() => expand_dir(&entry.path(), &child, out),
            Ok(_) => {
                out.insert(child);
            }
            Err(_) => {}
        }
    }
}

#[cfg(test)]
#[path = "tracker_tests.rs"]
mod tests;
