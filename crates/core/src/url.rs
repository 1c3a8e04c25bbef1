// SPDX-License-Identifier: MIT
// Copyright (c) 2026 Alfred Jean LLC

//! Parsing of git remote URLs into ssh endpoint parts.
//!
//! Accepted forms:
//! - `ssh://[user@]host[:port]/path` (also `git+ssh://` and `ssh+git://`)
//! - scp-like `[user@]host:path`
//!
//! Any other scheme is rejected; only ssh remotes can be mirrored.

use regex::Regex;
use std::sync::LazyLock;

use crate::error::{Error, Result};

// Hard-coded patterns, exercised by the tests below.
static SCHEME_RE: LazyLock<Regex> = LazyLock::new(|| {
    match Regex::new(
        r"^(?P<scheme>[A-Za-z][A-Za-z0-9+.-]*)://(?:(?P<user>[^@/]+)@)?(?P<host>\[[^\]/]+\]|[^:/]*)(?::(?P<port>[^/]*))?(?P<path>/.*)?$",
    ) {
        Ok(re) => re,
        Err(_) => unreachable!("static regex pattern"),
    }
});
static SCP_RE: LazyLock<Regex> = LazyLock::new(|| {
    match Regex::new(r"^(?:(?P<user>[^@/:]+)@)?(?P<host>\[[^\]/]+\]|[^:/\[]+):(?P<path>.*)$") {
        Ok(re) => re,
        Err(_) => unreachable!("static regex pattern"),
    }
});

const SSH_SCHEMES: [&str; 3] = ["ssh", "git+ssh", "ssh+git"];

/// The ssh-relevant parts of a remote URL.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RemoteUrl {
    pub user: Option<String>,
    pub host: String,
    pub port: Option<u16>,
    pub path: String,
}

impl RemoteUrl {
    /// Parses a remote definition.
    ///
    /// # Errors
    ///
    /// Returns [`Error::Config`] for non-ssh schemes, local paths, or a
    /// malformed port.
    pub fn parse(url: &str) -> Result<Self> {
        let url = url.trim();

        if let Some(caps) = SCHEME_RE.captures(url) {
            let scheme = caps.name("scheme").map_or("", |m| m.as_str());
            if !SSH_SCHEMES.contains(&scheme.to_ascii_lowercase().as_str()) {
                return Err(Error::Config(format!(
                    "unsupported scheme '{}' in remote '{}'\n  hint: only ssh remotes can be mirrored",
                    scheme, url
                )));
            }
            let port = match caps.name("port").map(|m| m.as_str()) {
                None | Some("") => None,
                Some(p) => Some(p.parse::<u16>().map_err(|_| {
                    Error::Config(format!("invalid port '{}' in remote '{}'", p, url))
                })?),
            };
            // ssh://host/~/dir means a path relative to the login directory
            let raw_path = caps.name("path").map_or("", |m| m.as_str());
            let path = match raw_path.strip_prefix("/~") {
                Some(rest) => format!("~{}", rest),
                None => raw_path.to_string(),
            };
            return Ok(RemoteUrl {
                user: caps.name("user").map(|m| m.as_str().to_string()),
                host: strip_brackets(caps.name("host").map_or("", |m| m.as_str())),
                port,
                path,
            });
        }

        if let Some(caps) = SCP_RE.captures(url) {
            let host = caps.name("host").map_or("", |m| m.as_str());
            // `C:\repo` and similar are local paths, not hosts
            if host.len() > 1 {
                return Ok(RemoteUrl {
                    user: caps.name("user").map(|m| m.as_str().to_string()),
                    host: strip_brackets(host),
                    port: None,
                    path: caps.name("path").map_or("", |m| m.as_str()).to_string(),
                });
            }
        }

        Err(Error::Config(format!(
            "remote '{}' is not an ssh URL\n  hint: use ssh://[user@]host[:port]/path or [user@]host:path",
            url
        )))
    }
}

fn strip_brackets(host: &str) -> String {
    host.strip_prefix('[')
        .and_then(|h| h.strip_suffix(']'))
        .unwrap_or(host)
        .to_string()
}

#[cfg(test)]
#[path = "url_tests.rs"]
mod tests;
