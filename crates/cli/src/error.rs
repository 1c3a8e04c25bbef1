// SPDX-License-Identifier: MIT
// Copyright (c) 2026 Alfred Jean LLC

use thiserror::Error;

/// All possible errors that can occur in the wipsync CLI.
///
/// Errors provide user-friendly messages with hints for common issues.
#[derive(Debug, Error)]
pub enum Error {
    #[error("not a git repository: {0}\n  hint: run wipsync from inside a git working tree, or pass -C <dir>")]
    NotARepository(String),

    #[error("remote '{0}' not found\n  hint: name a configured git remote, or pass a host and a path: wipsync <host> <path>")]
    RemoteNotFound(String),

    #[error("'{remote}' is a configured remote; the path '{path}' would be ignored\n  hint: drop the path, or pass a host that is not a remote name")]
    AmbiguousTarget { remote: String, path: String },

    #[error("invalid host '{0}'\n  hint: expected [user@]host[:port]")]
    InvalidHost(String),

    #[error("config error: {0}")]
    Config(String),

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

    #[error("watch error: {0}\n  hint: run without --watch to poll instead")]
    Watch(String),

    #[error("io error: {0}")]
    Io(#[from] std::io::Error),
}

/// A specialized Result type for wipsync operations.
pub type Result<T> = std::result::Result<T, Error>;

impl From<wip_core::Error> for Error {
    fn from(e: wip_core::Error) -> Self {
        match e {
            wip_core::Error::Config(s) => Error::Config(s),
            wip_core::Error::NotARepository(s) => Error::NotARepository(s),
            wip_core::Error::RemoteCommand {
                remote,
                command,
                output,
            } => Error::RemoteCommand {
                remote,
                command,
                output,
            },
            wip_core::Error::Git { command, output } => Error::Git { command, output },
            wip_core::Error::Locked(s) => Error::Locked(s),
            wip_core::Error::Watch(e) => Error::Watch(e.to_string()),
            wip_core::Error::Io(e) => Error::Io(e),
        }
    }
}

#[cfg(test)]
#[path = "error_tests.rs"]
mod tests;
