// SPDX-License-Identifier: MIT
// Copyright (c) 2026 Alfred Jean LLC

//! Shared test doubles for the engine.

#![allow(clippy::unwrap_used)]

use std::cell::RefCell;
use std::collections::{BTreeMap, BTreeSet, VecDeque};
use std::fs;
use std::os::unix::fs::PermissionsExt;
use std::io;
use std::path::{Path, PathBuf};
use std::sync::{Arc, Mutex};

use crate::endpoint::{PushMode, Remote, RemoteOutput};
use crate::error::{Error, Result};
use crate::repo::{Observer, RepositoryRef};
use crate::shell::RemoteCommand;

/// A scripted in-memory remote that records every operation.
#[derive(Debug, Default)]
pub struct MockRemote {
    pub name: String,
    /// One entry per primitive call, in order.
    pub log: Vec<String>,
    /// Operations whose log entry contains any of these fail.
    pub fail_matching: Vec<String>,
    pub reject_fast_forward: bool,
    pub reject_lease: bool,
    /// Tip reported by `remote_tip`.
    pub tip: Option<String>,
    /// Files the remote holds, by relative path.
    pub files: BTreeMap<String, Vec<u8>>,
    /// Local files deleted just before they are sent, once each.
    pub vanish: Vec<String>,
}

impl MockRemote {
    pub fn new(name: &str) -> Self {
        MockRemote {
            name: name.to_string(),
            ..Default::default()
        }
    }

    pub fn failing(name: &str, pattern: &str) -> Self {
        MockRemote {
            fail_matching: vec![pattern.to_string()],
            ..MockRemote::new(name)
        }
    }

    fn record(&mut self, entry: String) -> bool {
        let failed = self.fail_matching.iter().any(|p| entry.contains(p.as_str()));
        self.log.push(entry);
        !failed
    }

    /// Log entries with the given prefix.
    pub fn entries(&self, prefix: &str) -> Vec<&str> {
        self.log
            .iter()
            .map(String::as_str)
            .filter(|e| e.starts_with(prefix))
            .collect()
    }
}

impl Remote for MockRemote {
    fn name(&self) -> &str {
        &self.name
    }

    fn run(&mut self, cmd: &RemoteCommand, chdir: bool) -> Result<RemoteOutput> {
        let entry = if chdir {
            cmd.to_string()
        } else {
            format!("(home) {}", cmd)
        };
        if !self.record(entry) {
            return Ok(RemoteOutput::failed("simulated failure"));
        }
        if cmd.argv().first().map(String::as_str) == Some("rm") {
            if let Some(path) = cmd.argv().last() {
                self.files.remove(path);
            }
        }
        Ok(RemoteOutput::ok(""))
    }

    fn send_file(&mut self, local: &Path, cmd: &RemoteCommand) -> Result<RemoteOutput> {
        let relative = cmd.argv().last().cloned().unwrap_or_default();
        if !self.record(format!("send {}", relative)) {
            return Ok(RemoteOutput::failed("simulated failure"));
        }
        if let Some(i) = self.vanish.iter().position(|p| *p == relative) {
            self.vanish.remove(i);
            fs::remove_file(local)?;
        }
        let contents = fs::read(local)?;
        self.files.insert(relative, contents);
        Ok(RemoteOutput::ok(""))
    }

    fn push(&mut self, branch: &str, mode: &PushMode) -> Result<RemoteOutput> {
        let (entry, rejected) = match mode {
            PushMode::FastForward => (format!("push {}", branch), self.reject_fast_forward),
            PushMode::ForceWithLease { expected } => (
                format!(
                    "push {} lease={}",
                    branch,
                    expected.as_deref().unwrap_or("none")
                ),
                self.reject_lease,
            ),
        };
        if !self.record(entry) || rejected {
            return Ok(RemoteOutput::failed(" ! [rejected] (non-fast-forward)"));
        }
        Ok(RemoteOutput::ok(""))
    }

    fn remote_tip(&mut self, branch: &str) -> Result<Option<String>> {
        if !self.record(format!("ls-remote {}", branch)) {
            return Err(Error::remote(&self.name, "git ls-remote", "simulated failure"));
        }
        Ok(self.tip.clone())
    }
}

/// An observer that replays scripted refs and changed-path sets.
///
/// The last scripted value repeats once the script runs out.
pub struct FakeObserver {
    root: PathBuf,
    refs: RefCell<VecDeque<RepositoryRef>>,
    changes: RefCell<VecDeque<BTreeSet<String>>>,
    last_ref: RefCell<RepositoryRef>,
    last_changes: RefCell<BTreeSet<String>>,
}

impl FakeObserver {
    pub fn new(root: &Path, initial: RepositoryRef) -> Self {
        FakeObserver {
            root: root.to_path_buf(),
            refs: RefCell::new(VecDeque::new()),
            changes: RefCell::new(VecDeque::new()),
            last_ref: RefCell::new(initial),
            last_changes: RefCell::new(BTreeSet::new()),
        }
    }

    pub fn push_ref(&self, branch: &str, commit: &str) {
        self.refs.borrow_mut().push_back(RepositoryRef::new(branch, commit));
    }

    pub fn push_changes(&self, paths: &[&str]) {
        self.changes
            .borrow_mut()
            .push_back(paths.iter().map(|p| p.to_string()).collect());
    }
}

impl Observer for FakeObserver {
    fn root(&self) -> &Path {
        &self.root
    }

    fn current_ref(&self) -> Result<RepositoryRef> {
        if let Some(next) = self.refs.borrow_mut().pop_front() {
            *self.last_ref.borrow_mut() = next;
        }
        Ok(self.last_ref.borrow().clone())
    }

    fn changed_paths(&self) -> Result<BTreeSet<String>> {
        if let Some(next) = self.changes.borrow_mut().pop_front() {
            *self.last_changes.borrow_mut() = next;
        }
        Ok(self.last_changes.borrow().clone())
    }
}

/// Writes an executable stand-in for `ssh` that runs the remote command
/// locally: options are skipped, the destination dropped, and the command
/// string handed to `sh -c`.
pub fn fake_ssh(dir: &Path) -> PathBuf {
    let path = dir.join("fake-ssh");
    fs::write(
        &path,
        r#"#!/bin/sh
while [ $# -gt 0 ]; do
  case "$1" in
    -p|-l|-o|-i|-S) shift 2 ;;
    -*) shift ;;
    *) break ;;
  esac
done
shift
exec sh -c "$*"
"#,
    )
    .unwrap();
    fs::set_permissions(&path, fs::Permissions::from_mode(0o755)).unwrap();
    path
}

/// Runs git in `dir`, panicking on failure.
pub fn git(dir: &Path, args: &[&str]) -> String {
    let output = std::process::Command::new("git")
        .current_dir(dir)
        .args(args)
        .env("GIT_AUTHOR_NAME", "wipsync")
        .env("GIT_AUTHOR_EMAIL", "wipsync@localhost")
        .env("GIT_COMMITTER_NAME", "wipsync")
        .env("GIT_COMMITTER_EMAIL", "wipsync@localhost")
        .output()
        .unwrap();
    assert!(
        output.status.success(),
        "git {:?} failed: {}",
        args,
        String::from_utf8_lossy(&output.stderr)
    );
    String::from_utf8_lossy(&output.stdout).trim().to_string()
}

/// Initializes a repository on branch `main` with one commit.
pub fn init_repo(dir: &Path) {
    git(dir, &["init", "-q"]);
    git(dir, &["symbolic-ref", "HEAD", "refs/heads/main"]);
    fs::write(dir.join("README.md"), "hello\n").unwrap();
    git(dir, &["add", "README.md"]);
    git(dir, &["commit", "-q", "-m", "initial"]);
}

#[derive(Clone, Default)]
struct LogBuffer(Arc<Mutex<Vec<u8>>>);

impl io::Write for LogBuffer {
    fn write(&mut self, buf: &[u8]) -> io::Result<usize> {
        self.0.lock().unwrap().extend_from_slice(buf);
        Ok(buf.len())
    }

    fn flush(&mut self) -> io::Result<()> {
        Ok(())
    }
}

/// Runs `work` with a subscriber that records log lines, and returns them
/// alongside the result.
pub fn capture_logs<T>(work: impl FnOnce() -> T) -> (T, String) {
    let buffer = LogBuffer::default();
    let writer = buffer.clone();
    let subscriber = tracing_subscriber::fmt()
        .with_writer(move || writer.clone())
        .with_ansi(false)
        .without_time()
        .with_target(false)
        .finish();
    let result = tracing::subscriber::with_default(subscriber, work);
    let logs = String::from_utf8_lossy(&buffer.0.lock().unwrap()).into_owned();
    (result, logs)
}
