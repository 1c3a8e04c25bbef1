// SPDX-License-Identifier: MIT
// Copyright (c) 2026 Alfred Jean LLC

//! Centralized environment variable access.
//!
//! The variable name constants are generated by `build.rs` and live in the
//! [`vars`] submodule.

/// Generated environment variable name constants.
pub mod vars {
    include!(concat!(env!("OUT_DIR"), "/env_vars.rs"));
}

/// Returns the `WIPSYNC_LOG` filter directive, if set and non-empty.
pub fn log_filter() -> Option<String> {
    std::env::var(vars::WIPSYNC_LOG)
        .ok()
        .filter(|v| !v.trim().is_empty())
}

/// Returns the ssh program from `WIPSYNC_SSH`, if set and non-empty.
pub fn ssh_program() -> Option<String> {
    std::env::var(vars::WIPSYNC_SSH)
        .ok()
        .filter(|v| !v.trim().is_empty())
}

/// Returns `true` if `NO_COLOR=1`.
pub fn no_color() -> bool {
    std::env::var(vars::NO_COLOR).is_ok_and(|v| v == "1")
}

/// Returns `true` if `COLOR=1`.
pub fn force_color() -> bool {
    std::env::var(vars::COLOR).is_ok_and(|v| v == "1")
}

#[cfg(test)]
#[path = "env_tests.rs"]
mod tests;
