// SPDX-License-Identifier: MIT
// Copyright (c) 2026 Alfred Jean LLC

//! Keep-alive ssh master connection.
//!
//! Every remote operation is a separate ssh invocation. An idle master
//! (`ssh -M -N`) lets those invocations multiplex over one connection via
//! `-S <socket>` instead of paying the handshake each time. The master is a
//! child process that is killed when the session is dropped; on SIGINT it
//! receives the signal together with the rest of the foreground group.

use std::fs;
use std::path::{Path, PathBuf};
use std::process::{Child, Command, Stdio};

use crate::endpoint::RemoteEndpoint;
use crate::error::Result;

/// A running ssh master process.
pub struct ControlSession {
    child: Child,
    path: PathBuf,
}

impl ControlSession {
    /// Spawns the master process bound to `path`.
    pub fn start(program: &str, args: &[String], host: &str, path: &Path) -> Result<Self> {
        // A socket left behind by a killed run would make ssh refuse to bind.
        let _ = fs::remove_file(path);

        let child = Command::new(program)
            .args(["-M", "-N", "-o", "ControlPersist=no", "-S"])
            .arg(path)
            .args(args)
            .arg(host)
            .stdin(Stdio::null())
            .stdout(Stdio::null())
            .stderr(Stdio::null())
            .spawn()?;

        Ok(ControlSession {
            child,
            path: path.to_path_buf(),
        })
    }

    /// Path of the control socket.
    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Returns false once the master process has exited.
    pub fn is_alive(&mut self) -> bool {
        matches!(self.child.try_wait(), Ok(None))
    }
}

impl Drop for ControlSession {
    fn drop(&mut self) {
        let _ = self.child.kill();
        let _ = self.child.wait();
        let _ = fs::remove_file(&self.path);
    }
}

/// Control socket location for an endpoint.
///
/// Lives in the user's runtime directory when there is one; socket paths
/// are length-limited, so the name is a short hash rather than the host.
pub fn control_path(endpoint: &RemoteEndpoint) -> PathBuf {
    let dir = dirs::runtime_dir().unwrap_or_else(std::env::temp_dir);
    dir.join(format!("wipsync-{}.sock", endpoint.id()))
}

#[cfg(test)]
#[path = "session_tests.rs"]
mod tests;
