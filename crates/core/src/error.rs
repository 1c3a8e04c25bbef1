// SPDX-License-Identifier: MIT
// Copyright (c) 2026 Alfred Jean LLC

//! Error types for wip-core operations.

use thiserror::Error;

/// All possible errors that can occur while mirroring a working tree.
#[derive(Debug, Error)]
pub enum Error {
    #[error("configuration error: {0}")]
    Config(String),

    #[error("not a git repository: {0}\n  hint: run wipsync from inside a git working tree")]
    NotARepository(String),

    #[error("{remote}: `{command}` failed: {output}")]
    RemoteCommand {
        remote: String,
        command: String,
        output: String,
    },

    #[error("git {command} failed: {output}")]
    Git { command: String, output: String },

    #[error("another wipsync is already mirroring to {0}\n  hint: stop the other instance first")]
    Locked(String),

    #[error("watch error: {0}")]
    Watch(#[from] notify::Error),

    #[error("io error: {0}")]
    Io(#[from] std::io::Error),
}

impl Error {
    /// Builds a [`Error::RemoteCommand`] from a failed remote invocation.
    pub fn remote(remote: &str, command: impl Into<String>, output: &str) -> Self {
        let output = output.trim();
        Error::RemoteCommand {
            remote: remote.to_string(),
            command: command.into(),
            output: if output.is_empty() {
                "no output".to_string()
            } else {
                output.to_string()
            },
        }
    }
}

/// A specialized Result type for wip-core operations.
pub type Result<T> = std::result::Result<T, Error>;

#[cfg(test)]
#[path = "error_tests.rs"]
mod tests;
