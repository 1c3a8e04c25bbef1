// SPDX-License-Identifier: MIT
// Copyright (c) 2026 Alfred Jean LLC

//! Resolves the command-line target into a remote endpoint.
//!
//! A configured git remote wins: its URL names the host and path. Without
//! one, the first argument is an explicit `[user@]host[:port]` and the
//! second the remote path, and the endpoint is named after the host.

use regex::Regex;
use std::sync::LazyLock;

use wip_core::{RemoteEndpoint, RemoteUrl};

use crate::error::{Error, Result};

// Hard-coded pattern, exercised by tests.
static HOST_RE: LazyLock<Regex> = LazyLock::new(|| {
    match Regex::new(r"^(?:(?P<user>[^@:/\s]+)@)?(?P<host>\[[0-9A-Fa-f:.]+\]|[^@:/\[\]\s]+)(?::(?P<port>\d+))?$") {
        Ok(re) => re,
        Err(_) => unreachable!("static regex pattern"),
    }
});

/// Builds the endpoint for `remote` (and `path`), given the URL git has
/// configured for a remote of that name.
pub fn resolve(remote: &str, path: Option<&str>, configured_url: Option<&str>) -> Result<RemoteEndpoint> {
    if let Some(url) = configured_url {
        if let Some(path) = path {
            return Err(Error::AmbiguousTarget {
                remote: remote.to_string(),
                path: path.to_string(),
            });
        }
        let parsed = RemoteUrl::parse(url)?;
        return Ok(RemoteEndpoint::from_url(remote, &parsed)?);
    }

    let Some(path) = path else {
        return Err(Error::RemoteNotFound(remote.to_string()));
    };
    let (user, host, port) = parse_host(remote)?;
    let mut endpoint = RemoteEndpoint::new(remote, user, host, port, path)?;
    let name = endpoint.host().to_string();
    endpoint.set_name(name);
    Ok(endpoint)
}

/// Splits `[user@]host[:port]`.
pub fn parse_host(target: &str) -> Result<(Option<String>, String, Option<u16>)> {
    let caps = HOST_RE
        .captures(target.trim())
        .ok_or_else(|| Error::InvalidHost(target.to_string()))?;
    let host = caps
        .name("host")
        .map(|m| m.as_str().trim_start_matches('[').trim_end_matches(']').to_string())
        .unwrap_or_default();
    let port = match caps.name("port") {
        Some(p) => Some(
            p.as_str()
                .parse::<u16>()
                .map_err(|_| Error::InvalidHost(target.to_string()))?,
        ),
        None => None,
    };
    Ok((caps.name("user").map(|m| m.as_str().to_string()), host, port))
}

#[cfg(test)]
#[path = "target_tests.rs"]
mod tests;
