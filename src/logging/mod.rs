//! Logging and output control
//!
//! [`Logger`] writes progress and diagnostics to stderr so that command results
//! printed on stdout (account rows, bundle JSON) can be piped. The library default
//! is [`Verbosity::Quiet`]; the CLI picks the level from its flags.
//!
//! Secrets never go through the logger. Callers log usernames, paths, sizes and
//! statuses, never passwords or tokens.

use std::time::{Duration, Instant};

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, PartialOrd, Ord)]
pub enum Verbosity {
    /// Errors only
    #[default]
    Quiet,
    Normal,
    /// Adds per-request and per-entry detail
    Verbose,
}

#[derive(Debug, Clone)]
pub struct Logger {
    verbosity: Verbosity,
    start_time: Instant,
}

impl Default for Logger {
    fn default() -> Self {
        Self::new_quiet()
    }
}

impl Logger {
    pub fn new(verbose: bool) -> Self {
        Self::with_verbosity(if verbose {
            Verbosity::Verbose
        } else {
            Verbosity::Normal
        })
    }

    pub fn new_quiet() -> Self {
        Self::with_verbosity(Verbosity::Quiet)
    }

    pub fn with_verbosity(verbosity: Verbosity) -> Self {
        Self {
            verbosity,
            start_time: Instant::now(),
        }
    }

    pub fn verbosity(&self) -> Verbosity {
        self.verbosity
    }

    pub fn is_verbose(&self) -> bool {
        self.verbosity == Verbosity::Verbose
    }

    fn shows(&self, level: Verbosity) -> bool {
        self.verbosity >= level
    }

    /// Main section heading
    pub fn section(&self, title: &str) {
        if self.shows(Verbosity::Normal) {
            eprintln!("\n=== {} ===", title);
        }
    }

    pub fn subsection(&self, title: &str) {
        if self.shows(Verbosity::Normal) {
            eprintln!("\n--- {} ---", title);
        }
    }

    pub fn info(&self, message: &str) {
        if self.shows(Verbosity::Normal) {
            eprintln!("ℹ️  {}", message);
        }
    }

    pub fn step(&self, message: &str) {
        if self.shows(Verbosity::Normal) {
            eprintln!("▶️  {}", message);
        }
    }

    pub fn success(&self, message: &str) {
        if self.shows(Verbosity::Normal) {
            eprintln!("✅ {}", message);
        }
    }

    pub fn warning(&self, message: &str) {
        if self.shows(Verbosity::Normal) {
            eprintln!("⚠️  WARNING: {}", message);
        }
    }

    /// Printed at every level
    pub fn error(&self, message: &str) {
        eprintln!("❌ ERROR: {}", message);
    }

    /// Operation-level chatter: which account, which key, which label
    pub fn verbose(&self, message: &str) {
        if self.shows(Verbosity::Verbose) {
            eprintln!("📝 {}", message);
        }
    }

    /// Wire-level chatter: request lines, statuses, archive entries
    pub fn detail(&self, message: &str) {
        if self.shows(Verbosity::Verbose) {
            eprintln!("   {}", message);
        }
    }

    pub fn summary_kv(&self, title: &str, items: &[(&str, String)]) {
        if !self.shows(Verbosity::Normal) {
            return;
        }

        self.subsection(title);
        let width = items.iter().map(|(key, _)| key.len()).max().unwrap_or(0);
        for (key, value) in items {
            let value = if value.is_empty() { "-" } else { value.as_str() };
            eprintln!("  {:width$}  {}", key, value, width = width);
        }
    }

    pub fn list(&self, title: &str, items: &[String]) {
        if !self.shows(Verbosity::Normal) {
            return;
        }

        self.subsection(title);
        if items.is_empty() {
            eprintln!("  (none)");
        }
        for (i, item) in items.iter().enumerate() {
            eprintln!("  {}. {}", i + 1, item);
        }
    }

    /// Archive and body sizes
    pub fn format_size(&self, bytes: u64) -> String {
        const KIB: f64 = 1024.0;
        match bytes {
            0..1024 => format!("{} B", bytes),
            1024..1_048_576 => format!("{:.1} KB", bytes as f64 / KIB),
            _ => format!("{:.1} MB", bytes as f64 / (KIB * KIB)),
        }
    }

    pub fn format_duration(&self, duration: Duration) -> String {
        let secs = duration.as_secs();
        match secs {
            0 => format!("{}ms", duration.as_millis()),
            1..60 => format!("{:.1}s", duration.as_secs_f64()),
            _ => format!("{}m{}s", secs / 60, secs % 60),
        }
    }

    pub fn elapsed(&self) -> Duration {
        self.start_time.elapsed()
    }
}
