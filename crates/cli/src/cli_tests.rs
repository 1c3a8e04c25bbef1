// SPDX-License-Identifier: MIT
// Copyright (c) 2026 Alfred Jean LLC

#![allow(clippy::unwrap_used)]

use super::*;
use clap::CommandFactory;
use yare::parameterized;

fn parse(args: &[&str]) -> Cli {
    Cli::try_parse_from(std::iter::once("wipsync").chain(args.iter().copied())).unwrap()
}

#[test]
fn verify_cli() {
    Cli::command().debug_assert();
}

#[test]
fn defaults() {
    let cli = parse(&[]);
    assert_eq!(cli.remote, "origin");
    assert_eq!(cli.path, None);
    assert_eq!(cli.interval_ms, None);
    assert!(!cli.watch);
    assert!(!cli.no_keepalive);
    assert!(!cli.once);
    assert_eq!(cli.directory, None);
    assert_eq!(cli.verbose, 0);
    assert!(!cli.quiet);
}

#[test]
fn explicit_host_and_path() {
    let cli = parse(&["alice@devbox:2222", "~/src/app"]);
    assert_eq!(cli.remote, "alice@devbox:2222");
    assert_eq!(cli.path.as_deref(), Some("~/src/app"));
}

#[test]
fn all_flags() {
    let cli = parse(&[
        "devbox",
        "--interval-ms",
        "250",
        "--watch",
        "--no-keepalive",
        "--once",
        "-C",
        "/work/repo",
        "-vv",
    ]);
    assert_eq!(cli.interval_ms, Some(250));
    assert!(cli.watch && cli.no_keepalive && cli.once);
    assert_eq!(cli.directory, Some(PathBuf::from("/work/repo")));
    assert_eq!(cli.verbose, 2);
}

#[parameterized(
    zero_interval = { &["--interval-ms", "0"] },
    bad_interval = { &["--interval-ms", "soon"] },
    verbose_and_quiet = { &["-v", "-q"] },
    extra_positional = { &["a", "b", "c"] },
)]
fn rejected(args: &[&str]) {
    assert!(Cli::try_parse_from(std::iter::once("wipsync").chain(args.iter().copied())).is_err());
}
