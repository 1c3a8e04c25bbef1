// SPDX-License-Identifier: MIT
// Copyright (c) 2026 Alfred Jean LLC

//! When the next sync cycle runs.
//!
//! Polling sleeps a fixed interval. Watch mode blocks until the filesystem
//! reports a change under the working tree (or the interval elapses, so
//! nothing is missed when notifications are lost), then drains the burst
//! that follows before returning. Draining stops after one more interval
//! even if the burst never settles.

use std::path::{Component, Path, PathBuf};
use std::sync::mpsc::{channel, Receiver, RecvTimeoutError};
use std::thread;
use std::time::{Duration, Instant};

use notify::{Event, RecommendedWatcher, RecursiveMode, Watcher};
use tracing::debug;

use crate::error::Result;

/// Quiet period that ends a notification burst.
const SETTLE: Duration = Duration::from_millis(50);

/// Entries of the git dir whose changes move HEAD.
const GIT_DIR_WATCHED: [&str; 3] = ["HEAD", "refs", "packed-refs"];

pub enum Trigger {
    Interval(Duration),
    Watch(FsWatcher),
}

impl Trigger {
    pub fn interval(every: Duration) -> Self {
        Trigger::Interval(every)
    }

    /// Watches `root` recursively, waking at least every `fallback`.
    pub fn watch(root: &Path, fallback: Duration) -> Result<Self> {
        Ok(Trigger::Watch(FsWatcher::new(root, fallback)?))
    }

    /// Blocks until the next cycle is due.
    pub fn wait(&mut self) {
        match self {
            Trigger::Interval(every) => thread::sleep(*every),
            Trigger::Watch(watcher) => {
                let seen = watcher.wait();
                debug!("local: {} filesystem notifications", seen);
            }
        }
    }
}

pub struct FsWatcher {
    _watcher: RecommendedWatcher,
    receiver: Receiver<PathBuf>,
    fallback: Duration,
}

impl FsWatcher {
    pub fn new(root: &Path, fallback: Duration) -> Result<Self> {
        let root = root.canonicalize().unwrap_or_else(|_| root.to_path_buf());
        let (tx, rx) = channel();
        let filter_root = root.clone();
        let mut watcher = notify::recommended_watcher(move |res: notify::Result<Event>| {
            if let Ok(event) = res {
                for path in event.paths {
                    if is_relevant(&filter_root, &path) {
                        let _ = tx.send(path);
                    }
                }
            }
        })?;
        watcher.watch(&root, RecursiveMode::Recursive)?;
        Ok(FsWatcher {
            _watcher: watcher,
            receiver: rx,
            fallback,
        })
    }

    /// Waits for one batch of notifications and returns how many arrived.
    /// Returns 0 when the fallback interval passed without any.
    ///
    /// A batch ends after a quiet [`SETTLE`] period or once the fallback
    /// interval has passed since its first notification.
    pub fn wait(&self) -> usize {
        match self.receiver.recv_timeout(self.fallback) {
            Ok(_) => {}
            Err(RecvTimeoutError::Timeout) => return 0,
            Err(RecvTimeoutError::Disconnected) => {
                thread::sleep(self.fallback);
                return 0;
            }
        }
        let deadline = Instant::now() + self.fallback;
        let mut seen = 1;
        loop {
            let left = deadline.saturating_duration_since(Instant::now());
            if left.is_zero() || self.receiver.recv_timeout(SETTLE.min(left)).is_err() {
                break;
            }
            seen += 1;
        }
        seen
    }
}

/// Working-tree paths count, as do the parts of `.git` that record the
/// checked-out ref. Everything else in `.git` is git's own bookkeeping,
/// including the index that every status query rewrites.
pub fn is_relevant(root: &Path, path: &Path) -> bool {
    let Ok(relative) = path.strip_prefix(root) else {
        return false;
    };
    let mut parts = relative.components();
    match parts.next() {
        Some(Component::Normal(first)) if first == ".git" => match parts.next() {
            Some(Component::Normal(second)) => GIT_DIR_WATCHED
                .iter()
                .any(|name| second == *name),
            _ => false,
        },
        Some(_) => true,
        None => false,
    }
}

#[cfg(test)]
#[path = "watch_tests.rs"]
mod tests;
