//! Command-line parsing and validation helpers.

#[cfg(test)]
mod tests;
mod validation;

use clap::Parser;
use std::path::PathBuf;
use std::time::Duration;

/// Default window for treating `Esc` + letter as an Alt chord.
pub const DEFAULT_CHORD_WINDOW_MS: u64 = 200;
pub const MIN_CHORD_WINDOW_MS: u64 = 50;
pub const MAX_CHORD_WINDOW_MS: u64 = 1000;
pub const MAX_AUTOSAVE_SECS: u64 = 86_400;

/// CLI options for modeterm. Validated values keep the dispatch loop predictable.
#[derive(Debug, Parser, Clone)]
#[command(about = "modeterm: modal menu and form overlays", author, version)]
pub struct AppConfig {
    /// Enable file logging (debug)
    #[arg(long = "logs", env = "MODETERM_LOGS", default_value_t = false)]
    pub logs: bool,

    /// Disable all file logging (overrides --logs and log env vars)
    #[arg(long = "no-logs", env = "MODETERM_NO_LOGS", default_value_t = false)]
    pub no_logs: bool,

    /// Allow logging form values and pasted text (debug log only)
    #[arg(
        long = "log-content",
        env = "MODETERM_LOG_CONTENT",
        default_value_t = false
    )]
    pub log_content: bool,

    /// Enable per-cycle dispatch timing traces
    #[arg(long)]
    pub log_timings: bool,

    /// Max delay between Esc and a letter for the pair to count as Alt+letter (milliseconds)
    #[arg(long = "chord-window-ms", default_value_t = DEFAULT_CHORD_WINDOW_MS)]
    pub chord_window_ms: u64,

    /// Autosave interval in seconds (0 disables autosave ticks)
    #[arg(long = "autosave-secs", default_value_t = 0)]
    pub autosave_secs: u64,

    /// JSON file describing the fields of the dynamic form
    #[arg(long = "form-spec", value_name = "PATH")]
    pub form_spec: Option<PathBuf>,

    /// Do not ask the terminal for bracketed paste events
    #[arg(long = "no-bracketed-paste", default_value_t = false)]
    pub no_bracketed_paste: bool,
}

impl AppConfig {
    pub fn logging_enabled(&self) -> bool {
        (self.logs || self.log_timings) && !self.no_logs
    }

    pub fn chord_window(&self) -> Duration {
        Duration::from_millis(self.chord_window_ms)
    }

    /// `None` when autosave is disabled.
    pub fn autosave_interval(&self) -> Option<Duration> {
        (self.autosave_secs > 0).then(|| Duration::from_secs(self.autosave_secs))
    }
}
