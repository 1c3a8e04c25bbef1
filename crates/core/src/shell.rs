// SPDX-License-Identifier: MIT
// Copyright (c) 2026 Alfred Jean LLC

//! Remote command construction.
//!
//! Commands are built as explicit argument lists and turned into a single
//! POSIX shell string only at the transport boundary, by [`quote`].

use std::borrow::Cow;
use std::fmt;

/// Quotes a single word for a POSIX shell.
///
/// Words made only of characters that are never special to the shell are
/// returned unchanged; everything else is wrapped in single quotes.
pub fn quote(word: &str) -> Cow<'_, str> {
    if !word.is_empty() && word.chars().all(is_plain) {
        return Cow::Borrowed(word);
    }
    let mut quoted = String::with_capacity(word.len() + 2);
    quoted.push('\'');
    for c in word.chars() {
        if c == '\'' {
            quoted.push_str("'\\''");
        } else {
            quoted.push(c);
        }
    }
    quoted.push('\'');
    Cow::Owned(quoted)
}

/// Quotes every word and joins them with single spaces.
pub fn join<I, S>(words: I) -> String
where
    I: IntoIterator<Item = S>,
    S: AsRef<str>,
{
    words
        .into_iter()
        .map(|w| quote(w.as_ref()).into_owned())
        .collect::<Vec<_>>()
        .join(" ")
}

fn is_plain(c: char) -> bool {
    c.is_ascii_alphanumeric() || matches!(c, '-' | '_' | '.' | '/' | '=' | ':' | ',' | '+' | '@' | '%')
}

/// A command to run on a remote host, as an argument vector.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RemoteCommand {
    argv: Vec<String>,
}

impl RemoteCommand {
    /// Starts a command with the given program name.
    pub fn new(program: impl Into<String>) -> Self {
        RemoteCommand {
            argv: vec![program.into()],
        }
    }

    /// Starts a `git` command with the given arguments.
    pub fn git(args: &[&str]) -> Self {
        RemoteCommand::new("git").args(args.iter().copied())
    }

    /// Appends one argument.
    pub fn arg(mut self, arg: impl Into<String>) -> Self {
        self.argv.push(arg.into());
        self
    }

    /// Appends several arguments.
    pub fn args<I, S>(mut self, args: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.argv.extend(args.into_iter().map(Into::into));
        self
    }

    /// The raw argument vector.
    pub fn argv(&self) -> &[String] {
        &self.argv
    }

    /// Renders the command as one shell string, optionally preceded by a
    /// `cd` into `base`.
    pub fn to_shell(&self, base: Option<&str>) -> String {
        let command = join(&self.argv);
        match base {
            Some(dir) => format!("cd {} && {}", quote(dir), command),
            None => command,
        }
    }
}

impl fmt::Display for RemoteCommand {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&join(&self.argv))
    }
}

#[cfg(test)]
#[path = "shell_tests.rs"]
mod tests;
