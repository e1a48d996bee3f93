//! User-facing output.
//!
//! A [Reporter] is constructed once in `main` and passed down explicitly;
//! there is no process-global verbosity state. Every orchestrator
//! transition that informs the user emits exactly one line through it.

use console::style;

/// Console reporter with an optional silent mode.
#[derive(Debug, Clone, Copy)]
pub struct Reporter {
    silent: bool,
}

impl Reporter {
    pub fn new(silent: bool) -> Self {
        Reporter { silent }
    }

    /// Plain informational line
    pub fn message(&self, text: &str) {
        if !self.silent {
            println!("{}", text);
        }
    }

    /// Success line with a green checkmark
    pub fn success(&self, text: &str) {
        if !self.silent {
            println!("{} {}", style("✓").green(), text);
        }
    }

    /// Warning line in yellow
    pub fn warn(&self, text: &str) {
        if !self.silent {
            eprintln!("{} {}", style("⚠").yellow(), text);
        }
    }

    /// Error line in red; printed even in silent mode, the exit code alone
    /// is not enough to act on
    pub fn error(&self, text: &str) {
        eprintln!("{} {}", style("ERROR:").red(), text);
    }
}

impl Default for Reporter {
    fn default() -> Self {
        Reporter::new(false)
    }
}
