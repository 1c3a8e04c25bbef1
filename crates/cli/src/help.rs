// SPDX-License-Identifier: MIT
// Copyright (c) 2026 Alfred Jean LLC

//! Help text generation with colorization support.

use crate::colors;
use clap::builder::styling::Styles;

/// Generate clap Styles for help output.
pub fn styles() -> Styles {
    if !colors::stdout_colors() {
        return Styles::plain();
    }

    use anstyle::{Ansi256Color, Color, Style};

    let header = Style::new().fg_color(Some(Color::Ansi256(Ansi256Color(colors::codes::HEADER))));
    let literal = Style::new().fg_color(Some(Color::Ansi256(Ansi256Color(colors::codes::LITERAL))));
    let context = Style::new().fg_color(Some(Color::Ansi256(Ansi256Color(colors::codes::CONTEXT))));

    Styles::styled()
        .header(header)
        .usage(header)
        .literal(literal)
        .placeholder(context)
        .valid(context)
}

const EXAMPLES: &[(&str, &str)] = &[
    ("wipsync", "Mirror to the host behind remote 'origin'"),
    ("wipsync devbox", "Mirror to the host behind remote 'devbox'"),
    ("wipsync alice@build:2222 src/app", "Mirror to an explicit host and path"),
    ("wipsync --watch", "Sync on filesystem notifications"),
    ("wipsync --once", "Sync once and exit"),
];

/// Examples block shown after the options.
pub fn examples() -> String {
    render_examples(colors::stdout_colors())
}

pub fn render_examples(colored: bool) -> String {
    let width = EXAMPLES.iter().map(|(cmd, _)| cmd.len()).max().unwrap_or(0);
    let mut out = if colored {
        colors::header("Examples:")
    } else {
        "Examples:".to_string()
    };
    for (cmd, description) in EXAMPLES {
        let padding = " ".repeat(width - cmd.len() + 2);
        let cmd = if colored {
            colors::literal(cmd)
        } else {
            cmd.to_string()
        };
        out.push_str(&format!("\n  {}{}{}", cmd, padding, description));
    }
    out
}

#[cfg(test)]
#[path = "help_tests.rs"]
mod tests;
