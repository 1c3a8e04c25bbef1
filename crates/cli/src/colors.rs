// SPDX-License-Identifier: MIT
// Copyright (c) 2026 Alfred Jean LLC

//! Terminal color decisions.
//!
//! Respects environment variables:
//! - `NO_COLOR=1`: Disables colors
//! - `COLOR=1`: Forces colors even without TTY

use std::io::IsTerminal;

use crate::env;

/// ANSI 256-color codes for help output.
pub mod codes {
    /// Section headers: steel blue
    pub const HEADER: u8 = 74;
    /// Commands/literals: light grey
    pub const LITERAL: u8 = 250;
    /// Placeholders/context: medium grey
    pub const CONTEXT: u8 = 245;
}

/// Whether help on stdout should be colored.
pub fn stdout_colors() -> bool {
    decide(env::no_color(), env::force_color(), std::io::stdout().is_terminal())
}

/// Whether log lines on stderr should be colored.
pub fn stderr_colors() -> bool {
    decide(env::no_color(), env::force_color(), std::io::stderr().is_terminal())
}

/// `NO_COLOR` beats `COLOR`, which beats terminal detection.
pub fn decide(no_color: bool, force: bool, terminal: bool) -> bool {
    if no_color {
        return false;
    }
    force || terminal
}

fn fg256(code: u8) -> String {
    format!("\x1b[38;5;{code}m")
}

const RESET: &str = "\x1b[0m";

/// Apply header color (section titles) to text.
pub fn header(text: &str) -> String {
    format!("{}{}{}", fg256(codes::HEADER), text, RESET)
}

/// Apply literal color (commands, options) to text.
pub fn literal(text: &str) -> String {
    format!("{}{}{}", fg256(codes::LITERAL), text, RESET)
}

#[cfg(test)]
#[path = "colors_tests.rs"]
mod tests;
