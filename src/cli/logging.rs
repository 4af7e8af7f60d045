// Ultralytics 🚀 AGPL-3.0 License - https://ultralytics.com/license

//! Console logging macros shared by the library and the CLI.
//!
//! Warnings and errors go to stderr; progress output goes to stdout and is gated by
//! the global verbosity flag. Per-exercise detail lines from [`verbose!`] are indented
//! under the [`section!`] they belong to.

use std::sync::atomic::{AtomicBool, Ordering};

/// Global verbosity flag.
static VERBOSE: AtomicBool = AtomicBool::new(true);

/// Set the global verbosity flag.
pub fn set_verbose(verbose: bool) {
    VERBOSE.store(verbose, Ordering::Relaxed);
}

/// Check if verbose output is enabled.
pub fn is_verbose() -> bool {
    VERBOSE.load(Ordering::Relaxed)
}

/// Rule drawn under a section title, as wide as the title.
#[must_use]
pub fn underline(title: &str) -> String {
    "-".repeat(title.chars().count().max(1))
}

#[macro_export]
macro_rules! info {
    ($($arg:tt)*) => {{
        println!("{}", format!($($arg)*));
    }};
}

/// Warning on stderr; the run continues.
#[macro_export]
macro_rules! warn {
    ($($arg:tt)*) => {{
        use colored::Colorize;
        eprintln!("{} {}", "warning:".yellow().bold(), format!($($arg)*));
    }};
}

/// Error on stderr, for failed exercises and fatal command errors.
#[macro_export]
macro_rules! error {
    ($($arg:tt)*) => {{
        use colored::Colorize;
        eprintln!("{} {}", "error:".red().bold(), format!($($arg)*));
    }};
}

/// One finished exercise or command.
#[macro_export]
macro_rules! success {
    ($($arg:tt)*) => {{
        use colored::Colorize;
        println!("{} {}", "✔".green().bold(), format!($($arg)*));
    }};
}

/// Detail line, dimmed and only shown when verbose.
#[macro_export]
macro_rules! verbose {
    ($($arg:tt)*) => {{
        if $crate::cli::logging::is_verbose() {
            use colored::Colorize;
            println!("{}", format!($($arg)*).dimmed());
        }
    }};
}

/// Stage header: bold title with a rule under it.
#[macro_export]
macro_rules! section {
    ($($arg:tt)*) => {{
        if $crate::cli::logging::is_verbose() {
            use colored::Colorize;
            let title = format!($($arg)*);
            println!();
            println!("{}", title.cyan().bold());
            println!("{}", $crate::cli::logging::underline(&title).cyan());
        }
    }};
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_verbosity_toggle() {
        // other tests only ever silence output
        set_verbose(false);
        assert!(!is_verbose());
    }

    #[test]
    fn test_underline_matches_title_width() {
        assert_eq!(underline("Summary"), "-------");
        assert_eq!(underline("exercise-animation 0.1.0").len(), 24);
        // counted in characters, not bytes
        assert_eq!(underline("90°"), "---");
        assert_eq!(underline(""), "-");
    }
}
