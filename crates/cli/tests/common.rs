// SPDX-License-Identifier: MIT
// Copyright (c) 2026 Alfred Jean LLC

// Allow unused items: test helpers are shared across multiple test binaries,
// and not every test file uses every helper.
#![allow(dead_code)]
#![allow(unused_imports)]
#![allow(clippy::unwrap_used)]

use std::fs;
use std::os::unix::fs::PermissionsExt;
use std::path::{Path, PathBuf};

use assert_cmd::cargo::cargo_bin_cmd;
use assert_cmd::Command;

pub use predicates::prelude::*;
pub use tempfile::TempDir;

pub fn wipsync() -> Command {
    let mut cmd = cargo_bin_cmd!("wipsync");
    cmd.env_remove("WIPSYNC_LOG").env_remove("WIPSYNC_SSH").env("NO_COLOR", "1");
    cmd
}

/// Runs git in `dir` with a fixed identity, panicking on failure.
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

/// A repository on branch `main` with one commit.
pub fn init_repo(dir: &Path) {
    fs::create_dir_all(dir).unwrap();
    git(dir, &["init", "-q"]);
    git(dir, &["symbolic-ref", "HEAD", "refs/heads/main"]);
    fs::write(dir.join("README.md"), "hello\n").unwrap();
    git(dir, &["add", "README.md"]);
    git(dir, &["commit", "-q", "-m", "initial"]);
}

/// An `ssh` stand-in that runs the remote command locally.
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

/// A local repository plus a non-bare clone standing in for the remote.
pub struct Mirror {
    pub temp: TempDir,
    pub local: PathBuf,
    pub remote: PathBuf,
    pub ssh: PathBuf,
}

impl Mirror {
    pub fn new() -> Self {
        let temp = TempDir::new().unwrap();
        let local = temp.path().join("local");
        let remote = temp.path().join("remote");
        init_repo(&local);
        git(
            temp.path(),
            &["clone", "-q", &local.to_string_lossy(), &remote.to_string_lossy()],
        );
        let ssh = fake_ssh(temp.path());
        Mirror {
            temp,
            local,
            remote,
            ssh,
        }
    }

    /// `wipsync` in the local repository, talking to the fake ssh.
    pub fn wipsync(&self) -> Command {
        let mut cmd = wipsync();
        cmd.current_dir(&self.local)
            .env("WIPSYNC_SSH", &self.ssh)
            .arg("--no-keepalive");
        cmd
    }
}
