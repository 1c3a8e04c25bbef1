// SPDX-License-Identifier: MIT
// Copyright (c) 2026 Alfred Jean LLC

//! wip-core: working-tree mirroring engine for wipsync
//!
//! This crate provides change detection against a local git repository, the
//! ssh transport to the remote copy, and the sync loop tying them together.

pub mod endpoint;
pub mod engine;
pub mod error;
pub mod files;
pub mod head;
pub mod lock;
pub mod repo;
pub mod session;
pub mod shell;
pub mod stopwatch;
pub mod tracker;
pub mod url;
pub mod watch;

#[cfg(test)]
mod test_helpers;

pub use endpoint::{Remote, RemoteEndpoint, RemoteOutput, SshOptions, SshRemote};
pub use engine::{CycleReport, LoopState, SyncLoop};
pub use error::{Error, Result};
pub use files::FileOutcome;
pub use lock::InstanceLock;
pub use repo::{GitRepository, Observer, RepositoryRef};
pub use shell::RemoteCommand;
pub use stopwatch::Stopwatch;
pub use tracker::{FileEvent, FileStateTracker, Fingerprint};
pub use url::RemoteUrl;
pub use watch::Trigger;
