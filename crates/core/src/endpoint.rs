// SPDX-License-Identifier: MIT
// Copyright (c) 2026 Alfred Jean LLC

//! Remote endpoints and the primitives the engine runs against them.
//!
//! [`Remote`] is the seam between the engine and the transport: the ssh
//! implementation lives here ([`SshRemote`]), tests use a scripted mock.
//! Higher-level operations (copy, remove, push with fallback) are provided
//! methods built on the four required primitives, so every implementation
//! shares the same escalation and error behavior.

use std::fs::File;
use std::os::unix::fs::PermissionsExt;
use std::path::{Path, PathBuf};
use std::process::{Command, Output, Stdio};

use sha2::{Digest, Sha256};
use tracing::{debug, info, warn};

use crate::error::{Error, Result};
use crate::session::ControlSession;
use crate::shell::{self, RemoteCommand};
use crate::url::RemoteUrl;

/// One remote target.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RemoteEndpoint {
    name: String,
    user: String,
    host: String,
    port: Option<u16>,
    base_path: String,
}

impl RemoteEndpoint {
    /// Creates an endpoint, defaulting the user to the local login name.
    ///
    /// # Errors
    ///
    /// Returns [`Error::Config`] if the host or the base path is empty.
    pub fn new(
        name: impl Into<String>,
        user: Option<String>,
        host: impl Into<String>,
        port: Option<u16>,
        base_path: &str,
    ) -> Result<Self> {
        let host = host.into().trim().to_string();
        if host.is_empty() {
            return Err(Error::Config("remote host is empty".to_string()));
        }
        let base_path = normalize_base_path(base_path);
        if base_path.is_empty() {
            return Err(Error::Config(format!(
                "remote path for {} is empty\n  hint: pass the remote directory after the host",
                host
            )));
        }
        let user = user
            .filter(|u| !u.trim().is_empty())
            .unwrap_or_else(whoami::username);
        Ok(RemoteEndpoint {
            name: name.into(),
            user,
            host,
            port,
            base_path,
        })
    }

    /// Creates an endpoint from a parsed remote URL.
    pub fn from_url(name: impl Into<String>, url: &RemoteUrl) -> Result<Self> {
        RemoteEndpoint::new(name, url.user.clone(), url.host.clone(), url.port, &url.path)
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    /// Renames the endpoint; used when it was built from an explicit host.
    pub fn set_name(&mut self, name: impl Into<String>) {
        self.name = name.into();
    }

    pub fn user(&self) -> &str {
        &self.user
    }

    pub fn host(&self) -> &str {
        &self.host
    }

    pub fn port(&self) -> Option<u16> {
        self.port
    }

    /// Directory of the remote repository, relative to the login directory
    /// unless absolute.
    pub fn base_path(&self) -> &str {
        &self.base_path
    }

    /// The URL local git pushes to.
    pub fn push_url(&self) -> String {
        let host = if self.host.contains(':') {
            format!("[{}]", self.host)
        } else {
            self.host.clone()
        };
        let port = self.port.map(|p| format!(":{}", p)).unwrap_or_default();
        let path = if self.base_path.starts_with('/') {
            self.base_path.clone()
        } else if self.base_path == "." {
            "/~".to_string()
        } else {
            format!("/~/{}", self.base_path)
        };
        format!("ssh://{}@{}{}{}", self.user, host, port, path)
    }

    /// Stable short identifier of `user@host:port/base`, used to name lock
    /// files and control sockets.
    pub fn id(&self) -> String {
        let mut hasher = Sha256::new();
        hasher.update(
            format!(
                "{}@{}:{}/{}",
                self.user,
                self.host,
                self.port.unwrap_or(22),
                self.base_path
            )
            .as_bytes(),
        );
        let digest = hasher.finalize();
        hex::encode(&digest[..8])
    }
}

/// Strips a leading `~` segment so the path is relative to the remote login
/// directory.
pub fn normalize_base_path(path: &str) -> String {
    let path = path.trim();
    if path == "~" {
        return ".".to_string();
    }
    match path.strip_prefix("~/") {
        Some(rest) => {
            let rest = rest.trim_start_matches('/');
            if rest.is_empty() {
                ".".to_string()
            } else {
                rest.to_string()
            }
        }
        None => path.to_string(),
    }
}

/// Captured result of a remote invocation.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct RemoteOutput {
    /// Combined stdout and stderr.
    pub output: String,
    pub success: bool,
}

impl RemoteOutput {
    pub fn ok(output: impl Into<String>) -> Self {
        RemoteOutput {
            output: output.into(),
            success: true,
        }
    }

    pub fn failed(output: impl Into<String>) -> Self {
        RemoteOutput {
            output: output.into(),
            success: false,
        }
    }

    fn from_process(output: Output) -> Self {
        let mut text = String::from_utf8_lossy(&output.stdout).into_owned();
        text.push_str(&String::from_utf8_lossy(&output.stderr));
        RemoteOutput {
            output: text,
            success: output.status.success(),
        }
    }
}

/// How a branch is pushed.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum PushMode {
    /// Plain push; rejected unless it fast-forwards the remote.
    FastForward,
    /// Forced push that aborts unless the remote tip equals `expected`
    /// (`None`: the branch must not exist remotely).
    ForceWithLease { expected: Option<String> },
}

/// Operations on one remote endpoint.
pub trait Remote {
    /// Name used to prefix every log line about this remote.
    fn name(&self) -> &str;

    /// Runs `cmd` on the remote host, first changing into the base path when
    /// `chdir` is set.
    fn run(&mut self, cmd: &RemoteCommand, chdir: bool) -> Result<RemoteOutput>;

    /// Runs `cmd` in the base path with the contents of `local` on stdin.
    fn send_file(&mut self, local: &Path, cmd: &RemoteCommand) -> Result<RemoteOutput>;

    /// Pushes the local branch to the identically named remote branch.
    fn push(&mut self, branch: &str, mode: &PushMode) -> Result<RemoteOutput>;

    /// Current tip of `branch` on the remote, if the branch exists.
    fn remote_tip(&mut self, branch: &str) -> Result<Option<String>>;

    /// Runs `cmd`, relays its output and turns a failure into an error.
    fn run_checked(&mut self, cmd: &RemoteCommand, chdir: bool) -> Result<String> {
        let out = self.run(cmd, chdir)?;
        relay(self.name(), &out.output);
        if out.success {
            Ok(out.output)
        } else {
            warn!("{}: {} failed", self.name(), cmd);
            Err(Error::remote(self.name(), cmd.to_string(), &out.output))
        }
    }

    /// Copies one file to `<base>/<relative>`, creating parent directories.
    fn copy_file(&mut self, local: &Path, relative: &str) -> Result<()> {
        if let Some(dir) = parent_dir(relative) {
            self.run_checked(
                &RemoteCommand::new("mkdir").args(["-p", "--", dir]),
                true,
            )?;
        }
        let script = if is_executable(local) {
            "cat > \"$1\" && chmod +x \"$1\""
        } else {
            "cat > \"$1\""
        };
        let cmd = RemoteCommand::new("sh").args(["-c", script, "sh", relative]);
        let out = self.send_file(local, &cmd)?;
        relay(self.name(), &out.output);
        if out.success {
            Ok(())
        } else {
            warn!("{}: copy {} failed", self.name(), relative);
            Err(Error::remote(
                self.name(),
                format!("copy {}", relative),
                &out.output,
            ))
        }
    }

    /// Removes `<base>/<relative>`.
    fn remove_file(&mut self, relative: &str) -> Result<()> {
        self.run_checked(&RemoteCommand::new("rm").args(["-f", "--", relative]), true)?;
        Ok(())
    }

    /// Pushes `branch`; if the plain push is rejected, retries exactly once
    /// with a force push leased on the tip the remote reports right now.
    fn push_ref(&mut self, branch: &str) -> Result<()> {
        let out = self.push(branch, &PushMode::FastForward)?;
        relay(self.name(), &out.output);
        if out.success {
            return Ok(());
        }

        warn!(
            "{}: push of {} rejected, retrying with lease",
            self.name(),
            branch
        );
        let expected = self.remote_tip(branch)?;
        let out = self.push(branch, &PushMode::ForceWithLease { expected })?;
        relay(self.name(), &out.output);
        if out.success {
            Ok(())
        } else {
            Err(Error::remote(
                self.name(),
                format!("git push --force-with-lease {}", branch),
                &out.output,
            ))
        }
    }
}

/// Logs each non-empty output line under the remote's name.
pub fn relay(name: &str, output: &str) {
    for line in output.lines().map(str::trim).filter(|l| !l.is_empty()) {
        info!("{}: {}", name, line);
    }
}

fn parent_dir(relative: &str) -> Option<&str> {
    relative
        .rsplit_once('/')
        .map(|(dir, _)| dir)
        .filter(|dir| !dir.is_empty())
}

fn is_executable(path: &Path) -> bool {
    path.metadata()
        .map(|m| m.permissions().mode() & 0o111 != 0)
        .unwrap_or(false)
}

/// Options for the ssh client.
#[derive(Debug, Clone)]
pub struct SshOptions {
    /// ssh executable.
    pub program: String,
    /// Extra arguments passed before the destination.
    pub options: Vec<String>,
    pub identity_file: Option<PathBuf>,
    /// Keep a master connection open for the lifetime of the process.
    pub keepalive: bool,
}

impl Default for SshOptions {
    fn default() -> Self {
        SshOptions {
            program: "ssh".to_string(),
            options: Vec::new(),
            identity_file: None,
            keepalive: true,
        }
    }
}

/// [`Remote`] over the system ssh client; pushes with local git.
pub struct SshRemote {
    endpoint: RemoteEndpoint,
    ssh: SshOptions,
    repo_root: PathBuf,
    session: Option<ControlSession>,
}

impl SshRemote {
    pub fn new(endpoint: RemoteEndpoint, ssh: SshOptions, repo_root: &Path) -> Self {
        SshRemote {
            endpoint,
            ssh,
            repo_root: repo_root.to_path_buf(),
            session: None,
        }
    }

    pub fn endpoint(&self) -> &RemoteEndpoint {
        &self.endpoint
    }

    /// Opens the keep-alive master connection if enabled.
    ///
    /// A master that fails to start only costs connection setup time, so the
    /// failure is logged and ignored.
    pub fn start_keepalive(&mut self) {
        if !self.ssh.keepalive || self.session.is_some() {
            return;
        }
        let path = crate::session::control_path(&self.endpoint);
        match ControlSession::start(
            &self.ssh.program,
            &self.connection_args(),
            self.endpoint.host(),
            &path,
        ) {
            Ok(session) => {
                debug!("{}: keep-alive session at {}", self.endpoint.name(), path.display());
                self.session = Some(session);
            }
            Err(e) => warn!("{}: keep-alive session failed: {}", self.endpoint.name(), e),
        }
    }

    /// Arguments shared by every ssh invocation, excluding the destination.
    fn connection_args(&self) -> Vec<String> {
        let mut args = self.ssh.options.clone();
        if let Some(identity) = &self.ssh.identity_file {
            args.push("-i".to_string());
            args.push(identity.to_string_lossy().into_owned());
        }
        if let Some(port) = self.endpoint.port() {
            args.push("-p".to_string());
            args.push(port.to_string());
        }
        args.push("-l".to_string());
        args.push(self.endpoint.user().to_string());
        args
    }

    /// Control socket of a live keep-alive session.
    fn control_socket(&mut self) -> Option<PathBuf> {
        let alive = self.session.as_mut().map(ControlSession::is_alive)?;
        if alive {
            return self.session.as_ref().map(|s| s.path().to_path_buf());
        }
        warn!(
            "{}: keep-alive session exited, continuing without it",
            self.endpoint.name()
        );
        self.session = None;
        None
    }

    fn ssh_command(&mut self, remote_command: &str) -> Command {
        let mut cmd = Command::new(&self.ssh.program);
        cmd.args(self.connection_args());
        if let Some(socket) = self.control_socket() {
            cmd.arg("-S").arg(socket);
        }
        cmd.arg(self.endpoint.host()).arg(remote_command);
        cmd
    }

    /// `GIT_SSH_COMMAND` for local git talking to this endpoint. User and
    /// port travel in the push URL.
    fn git_ssh_command(&mut self) -> String {
        let mut words = vec![self.ssh.program.clone()];
        words.extend(self.ssh.options.iter().cloned());
        if let Some(identity) = &self.ssh.identity_file {
            words.push("-i".to_string());
            words.push(identity.to_string_lossy().into_owned());
        }
        if let Some(socket) = self.control_socket() {
            words.push("-S".to_string());
            words.push(socket.to_string_lossy().into_owned());
        }
        shell::join(&words)
    }

    fn local_git(&mut self, args: &[String]) -> Result<RemoteOutput> {
        debug!("local: git {}", shell::join(args));
        let ssh_command = self.git_ssh_command();
        let output = Command::new("git")
            .current_dir(&self.repo_root)
            .args(args)
            .env("GIT_SSH_COMMAND", ssh_command)
            .stdin(Stdio::null())
            .output()?;
        Ok(RemoteOutput::from_process(output))
    }
}

impl Remote for SshRemote {
    fn name(&self) -> &str {
        self.endpoint.name()
    }

    fn run(&mut self, cmd: &RemoteCommand, chdir: bool) -> Result<RemoteOutput> {
        let base = chdir.then(|| self.endpoint.base_path().to_string());
        let remote_command = cmd.to_shell(base.as_deref());
        debug!("{}: $ {}", self.endpoint.name(), remote_command);
        let output = self
            .ssh_command(&remote_command)
            .stdin(Stdio::null())
            .output()?;
        Ok(RemoteOutput::from_process(output))
    }

    fn send_file(&mut self, local: &Path, cmd: &RemoteCommand) -> Result<RemoteOutput> {
        let remote_command = cmd.to_shell(Some(self.endpoint.base_path()));
        debug!(
            "{}: $ {} < {}",
            self.endpoint.name(),
            remote_command,
            local.display()
        );
        let file = File::open(local)?;
        let output = self
            .ssh_command(&remote_command)
            .stdin(Stdio::from(file))
            .output()?;
        Ok(RemoteOutput::from_process(output))
    }

    fn push(&mut self, branch: &str, mode: &PushMode) -> Result<RemoteOutput> {
        let refname = format!("refs/heads/{}", branch);
        let mut args = vec!["push".to_string()];
        if let PushMode::ForceWithLease { expected } = mode {
            args.push(format!(
                "--force-with-lease={}:{}",
                refname,
                expected.as_deref().unwrap_or("")
            ));
        }
        args.push(self.endpoint.push_url());
        args.push(format!("{}:{}", refname, refname));
        self.local_git(&args)
    }

    fn remote_tip(&mut self, branch: &str) -> Result<Option<String>> {
        let args = vec![
            "ls-remote".to_string(),
            self.endpoint.push_url(),
            format!("refs/heads/{}", branch),
        ];
        let out = self.local_git(&args)?;
        if !out.success {
            return Err(Error::remote(
                self.endpoint.name(),
                format!("git ls-remote {}", branch),
                &out.output,
            ));
        }
        Ok(out
            .output
            .lines()
            .next()
            .and_then(|line| line.split_whitespace().next())
            .map(str::to_string))
    }
}

#[cfg(test)]
#[path = "endpoint_tests.rs"]
mod tests;
