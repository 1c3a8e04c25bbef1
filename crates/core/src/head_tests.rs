// SPDX-License-Identifier: MIT
// Copyright (c) 2026 Alfred Jean LLC

#![allow(clippy::unwrap_used)]

use super::*;
use crate::error::Error;
use crate::test_helpers::MockRemote;
use yare::parameterized;

fn target(branch: &str) -> RepositoryRef {
    RepositoryRef::new(branch, "0123456789abcdef")
}

#[test]
fn runs_the_four_steps_in_order() {
    let mut remote = MockRemote::new("devbox");

    sync_head(&mut remote, &target("feature")).unwrap();

    assert_eq!(
        remote.log,
        vec![
            "git config receive.denyCurrentBranch false",
            "push feature",
            "git reset -q",
            "git checkout -q feature",
        ]
    );
}

#[test]
fn rejected_push_escalates_before_failing() {
    let mut remote = MockRemote::new("devbox");
    remote.reject_fast_forward = true;
    remote.tip = Some("fedcba".into());

    sync_head(&mut remote, &target("main")).unwrap();

    assert_eq!(
        remote.log,
        vec![
            "git config receive.denyCurrentBranch false",
            "push main",
            "ls-remote main",
            "push main lease=fedcba",
            "git reset -q",
            "git checkout -q main",
        ]
    );
}

#[parameterized(
    config = { "git config", 1 },
    push = { "push main", 2 },
    reset = { "git reset", 3 },
    checkout = { "git checkout", 4 },
)]
fn each_step_is_fatal(failing: &str, attempted: usize) {
    let mut remote = MockRemote::failing("devbox", failing);
    remote.reject_lease = true;

    let err = sync_head(&mut remote, &target("main")).unwrap_err();

    assert!(matches!(err, Error::RemoteCommand { .. }), "got {err:?}");
    let steps = remote
        .log
        .iter()
        .filter(|e| !e.starts_with("ls-remote") && !e.contains("lease="))
        .count();
    assert_eq!(steps, attempted);
}

#[test]
fn repeating_the_sync_issues_the_same_commands() {
    let mut remote = MockRemote::new("devbox");
    sync_head(&mut remote, &target("main")).unwrap();
    let first = remote.log.clone();
    remote.log.clear();

    sync_head(&mut remote, &target("main")).unwrap();

    assert_eq!(remote.log, first);
}

#[test]
fn branch_names_are_quoted() {
    let mut remote = MockRemote::new("devbox");
    sync_head(&mut remote, &target("odd name")).unwrap();
    assert_eq!(remote.entries("git checkout"), vec!["git checkout -q 'odd name'"]);
}
