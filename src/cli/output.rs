//! Terminal output formatting with colors
//!
//! Respects NO_COLOR, CLICOLOR, CLICOLOR_FORCE automatically.
//! `colored` decides from stdout; the `error`/`warning` prefixes go to
//! stderr and are additionally left plain when stderr is not a terminal,
//! unless colors are forced with [`force_color`].
//! Write failures (e.g. a closed pipe) are ignored.

use std::fmt::Display;
use std::io::{self, IsTerminal, Write};
use std::sync::atomic::{AtomicBool, Ordering};

use colored::{ColoredString, Colorize};

static FORCE_COLOR: AtomicBool = AtomicBool::new(false);

/// Color stderr prefixes even when stderr is redirected.
pub fn force_color(on: bool) {
    FORCE_COLOR.store(on, Ordering::Relaxed);
}

fn stderr_colors() -> bool {
    FORCE_COLOR.load(Ordering::Relaxed) || io::stderr().is_terminal()
}

fn paint(label: ColoredString, colorize: bool) -> ColoredString {
    if colorize {
        label
    } else {
        label.clear()
    }
}

/// Print error (red bold "error:" prefix)
pub fn error(w: &mut dyn Write, msg: &(impl Display + ?Sized)) {
    let prefix = paint("error".red().bold(), stderr_colors());
    writeln!(w, "{}: {}", prefix, msg).ok();
}

/// Print warning (yellow "Warning:" prefix)
pub fn warning(w: &mut dyn Write, msg: &(impl Display + ?Sized)) {
    let prefix = paint("Warning".yellow(), stderr_colors());
    writeln!(w, "{}: {}", prefix, msg).ok();
}

/// Print plain line (no color)
pub fn line(w: &mut dyn Write, msg: &(impl Display + ?Sized)) {
    writeln!(w, "{}", msg).ok();
}

/// Print a pre-rendered block (help, usage), ending in exactly one newline
pub fn block(w: &mut dyn Write, text: &str) {
    let text = text.trim_end_matches('\n');
    writeln!(w, "{}", text).ok();
    w.flush().ok();
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn given_text_with_trailing_newlines_when_block_then_single_newline() {
        let mut buf = Vec::new();
        block(&mut buf, "Usage: mcd\n\n");
        assert_eq!(String::from_utf8(buf).unwrap(), "Usage: mcd\n");
    }

    #[test]
    fn given_message_when_error_then_prefixed() {
        let mut buf = Vec::new();
        error(&mut buf, "boom");
        let text = String::from_utf8(buf).unwrap();
        assert!(text.contains("error"));
        assert!(text.trim_end().ends_with(": boom"));
    }

    #[test]
    fn given_stderr_not_a_terminal_when_painting_then_prefix_plain() {
        let plain = paint("error".red().bold(), false);
        assert_eq!(plain.fgcolor(), None);
        assert_eq!(plain.to_string(), "error");
    }

    #[test]
    fn given_stderr_terminal_when_painting_then_prefix_styled() {
        let styled = paint("error".red().bold(), true);
        assert_eq!(styled.fgcolor(), Some(colored::Color::Red));
    }
}
