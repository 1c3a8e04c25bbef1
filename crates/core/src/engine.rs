// SPDX-License-Identifier: MIT
// Copyright (c) 2026 Alfred Jean LLC

//! The sync loop.
//!
//! Each cycle compares the local ref with the last one synchronized and
//! re-syncs the remote head when they differ, then runs a file pass over
//! the paths git reports plus every path already being tracked.

use tracing::{debug, info};

use crate::endpoint::Remote;
use crate::error::Result;
use crate::files::{self, FileOutcome};
use crate::head::sync_head;
use crate::repo::{Observer, RepositoryRef};
use crate::stopwatch::{Elapsed, Stopwatch};
use crate::tracker::{FileEvent, FileStateTracker};
use crate::watch::Trigger;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LoopState {
    Initializing,
    Steady,
}

/// What one cycle did.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct CycleReport {
    pub head_synced: bool,
    pub events: Vec<(String, FileEvent)>,
    /// Deletes that failed remotely and were skipped.
    pub remove_failures: usize,
}

pub struct SyncLoop<O: Observer, R: Remote> {
    observer: O,
    remote: R,
    trigger: Trigger,
    tracker: FileStateTracker,
    synced: Option<RepositoryRef>,
    state: LoopState,
}

impl<O: Observer, R: Remote> SyncLoop<O, R> {
    pub fn new(observer: O, remote: R, trigger: Trigger) -> Self {
        SyncLoop {
            observer,
            remote,
            trigger,
            tracker: FileStateTracker::new(),
            synced: None,
            state: LoopState::Initializing,
        }
    }

    pub fn state(&self) -> LoopState {
        self.state
    }

    /// The ref the remote was last brought to.
    pub fn synced_ref(&self) -> Option<&RepositoryRef> {
        self.synced.as_ref()
    }

    pub fn observer(&self) -> &O {
        &self.observer
    }

    pub fn remote(&self) -> &R {
        &self.remote
    }

    pub fn tracker(&self) -> &FileStateTracker {
        &self.tracker
    }

    /// Syncs the remote head unconditionally and mirrors every changed
    /// file.
    pub fn initialize(&mut self) -> Result<CycleReport> {
        let current = self.observer.current_ref()?;
        info!("local: on {}", current.short());
        sync_head(&mut self.remote, &current)?;
        self.synced = Some(current);

        let mut report = self.file_pass()?;
        report.head_synced = true;
        self.state = LoopState::Steady;
        info!("local: tracking {} files", self.tracker.len());
        Ok(report)
    }

    /// One steady-state iteration, without waiting for the trigger.
    pub fn cycle(&mut self) -> Result<CycleReport> {
        if self.state == LoopState::Initializing {
            return self.initialize();
        }

        let current = self.observer.current_ref()?;
        let head_synced = self.synced.as_ref() != Some(&current);
        if head_synced {
            info!("local: head moved to {}", current.short());
            sync_head(&mut self.remote, &current)?;
            // fingerprints stay; the pass below re-evaluates every tracked path
            self.synced = Some(current);
        }

        let mut report = self.file_pass()?;
        report.head_synced = head_synced;
        Ok(report)
    }

    /// Initializes, then cycles forever.
    pub fn run(&mut self) -> Result<()> {
        if self.state == LoopState::Initializing {
            self.initialize()?;
        }
        loop {
            self.trigger.wait();
            self.cycle()?;
        }
    }

    /// Initializes and runs a single cycle.
    pub fn run_once(&mut self) -> Result<CycleReport> {
        let mut report = self.initialize()?;
        let next = self.cycle()?;
        report.events.extend(next.events);
        report.remove_failures += next.remove_failures;
        report.head_synced |= next.head_synced;
        Ok(report)
    }

    fn file_pass(&mut self) -> Result<CycleReport> {
        let watch = Stopwatch::start();
        let reported = self.observer.changed_paths()?;
        let mut candidates = reported.clone();
        candidates.extend(self.tracker.tracked_paths());

        let events = self.tracker.observe(self.observer.root(), &candidates);
        let mut remove_failures = 0;
        for (path, event) in &events {
            match files::apply(&mut self.remote, self.observer.root(), path, *event)? {
                FileOutcome::RemoveFailed => remove_failures += 1,
                // the remote never had it; a later appearance is NEW again
                FileOutcome::Vanished if *event == FileEvent::New => {
                    self.tracker.forget(path);
                }
                _ => {}
            }
        }

        let pruned = self.tracker.prune(&reported, &events);
        if pruned > 0 {
            debug!("local: released {} unchanged paths", pruned);
        }
        if !events.is_empty() {
            debug!(
                "local: {} changes mirrored ({})",
                events.len(),
                Elapsed(watch.elapsed())
            );
        }
        Ok(CycleReport {
            head_synced: false,
            events,
            remove_failures,
        })
    }
}

#[cfg(test)]
#[path = "engine_tests.rs"]
mod tests;
