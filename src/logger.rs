//! Logging utilities with colored output.
//!
//! This module provides:
//! - `log!` macro for formatted terminal output with colored prefixes
//! - `debug!` macro that only prints in verbose mode
//! - `outcome` for the one-line ✓/✗ result rows printed by the CLI
//!
//! # Example
//!
//! ```ignore
//! log!("registry"; "mounted {}", repository);
//! debug!("cache"; "miss for {}", name);
//! ```

use crossterm::{
    execute,
    terminal::{Clear, ClearType},
};
use owo_colors::{OwoColorize, Stream, Style};
use std::{
    io::{Write, stdout},
    sync::atomic::{AtomicBool, Ordering},
};

/// Global verbose flag (set by --verbose CLI argument)
static VERBOSE: AtomicBool = AtomicBool::new(false);

/// Set verbose mode globally
pub fn set_verbose(v: bool) {
    VERBOSE.store(v, Ordering::SeqCst);
}

/// Check if verbose mode is enabled
pub fn is_verbose() -> bool {
    VERBOSE.load(Ordering::SeqCst)
}

// ============================================================================
// Log Macro
// ============================================================================

/// Log a message with a colored module prefix
///
/// # Usage
/// ```ignore
/// log!("module"; "message with {} formatting", args);
/// ```
#[macro_export]
macro_rules! log {
    ($module:expr; $($arg:tt)*) => {{
        $crate::logger::log($module, &format!($($arg)*))
    }};
}

/// Log a debug message (only shown when --verbose is enabled)
///
/// # Usage
/// ```ignore
/// debug!("module"; "debug info: {}", value);
/// ```
#[macro_export]
macro_rules! debug {
    ($module:expr; $($arg:tt)*) => {{
        if $crate::logger::is_verbose() {
            $crate::logger::log($module, &format!($($arg)*))
        }
    }};
}

// ============================================================================
// Helper Functions
// ============================================================================

/// Log a message with a colored module prefix
#[inline]
pub fn log(module: &str, message: &str) {
    let module_lower = module.to_ascii_lowercase();
    let prefix = colorize_prefix(module, &module_lower);

    let mut stdout = stdout().lock();
    execute!(stdout, Clear(ClearType::UntilNewLine)).ok();
    writeln!(stdout, "{prefix} {message}").ok();
    stdout.flush().ok();
}

/// Apply color to a module prefix based on module type
///
/// Styling goes through `if_supports_color`, so `--color never` and a
/// non-terminal stdout both yield plain text.
#[inline]
fn colorize_prefix(module: &str, module_lower: &str) -> String {
    let prefix = format!("[{module}]");
    let style = match module_lower {
        "resolve" => Style::new().bright_blue().bold(),
        "registry" => Style::new().bright_green().bold(),
        "error" => Style::new().bright_red().bold(),
        _ => Style::new().bright_yellow().bold(),
    };
    paint(&prefix, style)
}

#[inline]
fn paint(text: &str, style: Style) -> String {
    text.if_supports_color(Stream::Stdout, |t| t.style(style))
        .to_string()
}

/// Print a single result row: `✓ subject detail` or `✗ subject detail`.
pub fn outcome(ok: bool, subject: &str, detail: &str) {
    let symbol = if ok {
        paint("✓", Style::new().green())
    } else {
        paint("✗", Style::new().red())
    };
    let line = format_outcome(&symbol, subject, detail);

    let mut stdout = stdout().lock();
    writeln!(stdout, "{line}").ok();
    stdout.flush().ok();
}

fn format_outcome(symbol: &str, subject: &str, detail: &str) -> String {
    if detail.is_empty() {
        format!("{symbol} {subject}")
    } else {
        format!("{symbol} {subject} {}", paint(detail, Style::new().dimmed()))
    }
}

// ============================================================================
// Tests
// ============================================================================

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_prefix_contains_module() {
        owo_colors::set_override(false);
        assert_eq!(colorize_prefix("registry", "registry"), "[registry]");
        assert_eq!(colorize_prefix("Cache", "cache"), "[Cache]");
    }

    #[test]
    fn test_outcome_without_detail() {
        owo_colors::set_override(false);
        assert_eq!(format_outcome("✓", "/about", ""), "✓ /about");
        assert_eq!(
            format_outcome("✗", "/missing", "not found"),
            "✗ /missing not found"
        );
    }

    #[test]
    fn test_color_never_yields_plain_text() {
        owo_colors::set_override(false);
        assert_eq!(paint("✓", Style::new().green()), "✓");
        assert_eq!(colorize_prefix("resolve", "resolve"), "[resolve]");
        assert!(!colorize_prefix("error", "error").contains('\x1b'));
    }

    #[test]
    fn test_verbose_toggle() {
        set_verbose(true);
        assert!(is_verbose());
        set_verbose(false);
        assert!(!is_verbose());
    }
}
