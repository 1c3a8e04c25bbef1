// SPDX-License-Identifier: MIT
// Copyright (c) 2026 Alfred Jean LLC

//! Per-repository configuration.
//!
//! Stored in `<git-dir>/wipsync.toml`, so it never shows up as a change to
//! mirror. Every key is optional:
//!
//! ```toml
//! interval_ms = 500
//! ref_retry_ms = 100
//! watch = false
//! keepalive = true
//!
//! [ssh]
//! program = "ssh"
//! options = ["-o", "ConnectTimeout=5"]
//! identity_file = "~/.ssh/devbox"
//! ```

use serde::{Deserialize, Serialize};
use std::fs;
use std::io::ErrorKind;
use std::path::{Path, PathBuf};

use crate::error::{Error, Result};

const CONFIG_FILE_NAME: &str = "wipsync.toml";

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct Config {
    /// Poll interval, and the longest wait between cycles in watch mode.
    #[serde(default = "default_interval_ms")]
    pub interval_ms: u64,
    /// Pause between re-reads of a HEAD that is mid-operation.
    #[serde(default = "default_ref_retry_ms")]
    pub ref_retry_ms: u64,
    #[serde(default)]
    pub watch: bool,
    /// Keep an ssh master connection open while running.
    #[serde(default = "default_keepalive")]
    pub keepalive: bool,
    #[serde(default)]
    pub ssh: SshConfig,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct SshConfig {
    pub program: Option<String>,
    #[serde(default)]
    pub options: Vec<String>,
    pub identity_file: Option<PathBuf>,
}

fn default_interval_ms() -> u64 {
    500
}

fn default_ref_retry_ms() -> u64 {
    100
}

fn default_keepalive() -> bool {
    true
}

impl Default for Config {
    fn default() -> Self {
        Config {
            interval_ms: default_interval_ms(),
            ref_retry_ms: default_ref_retry_ms(),
            watch: false,
            keepalive: default_keepalive(),
            ssh: SshConfig::default(),
        }
    }
}

impl Config {
    /// Path of the config file for a git directory.
    pub fn path(git_dir: &Path) -> PathBuf {
        git_dir.join(CONFIG_FILE_NAME)
    }

    /// Loads configuration from the given git directory; a missing file
    /// yields the defaults.
    pub fn load(git_dir: &Path) -> Result<Self> {
        let config_path = Config::path(git_dir);
        let content = match fs::read_to_string(&config_path) {
            Ok(content) => content,
            Err(e) if e.kind() == ErrorKind::NotFound => return Ok(Config::default()),
            Err(e) => return Err(Error::Config(format!("failed to read config: {}", e))),
        };
        let config: Config = toml::from_str(&content).map_err(|e| {
            Error::Config(format!(
                "failed to parse {}: {}",
                config_path.display(),
                e
            ))
        })?;
        if config.interval_ms == 0 {
            return Err(Error::Config(
                "interval_ms must be greater than zero".to_string(),
            ));
        }
        Ok(config)
    }

    /// Saves configuration to the given git directory.
    pub fn save(&self, git_dir: &Path) -> Result<()> {
        let content = toml::to_string_pretty(self)
            .map_err(|e| Error::Config(format!("failed to serialize config: {}", e)))?;
        fs::write(Config::path(git_dir), content)?;
        Ok(())
    }
}

/// Expands a leading `~/` against the home directory.
pub fn expand_home(path: &Path, home: Option<&Path>) -> PathBuf {
    match (path.strip_prefix("~"), home) {
        (Ok(rest), Some(home)) => home.join(rest),
        _ => path.to_path_buf(),
    }
}

#[cfg(test)]
#[path = "config_tests.rs"]
mod tests;
