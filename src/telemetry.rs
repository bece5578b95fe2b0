//! JSON trace output for dispatch cycles.
//!
//! Each handled source runs inside a `dispatch` span carrying `source` and
//! `cycle`; the per-cycle timing event is emitted at DEBUG, so it only lands
//! in the trace file when `--log-timings` is on.

use crate::config::AppConfig;
use std::env;
use std::fs::OpenOptions;
use std::path::PathBuf;
use std::sync::OnceLock;
use tracing::Level;
use tracing_subscriber::fmt::time::UtcTime;

static TRACING_INIT: OnceLock<()> = OnceLock::new();

fn trace_log_path() -> PathBuf {
    env::var("MODETERM_TRACE_LOG")
        .map(PathBuf::from)
        .unwrap_or_else(|_| env::temp_dir().join("modeterm_trace.jsonl"))
}

/// Most verbose level written to the trace file.
fn trace_level(config: &AppConfig) -> Level {
    if config.log_timings {
        Level::DEBUG
    } else {
        Level::INFO
    }
}

/// Install the JSON trace subscriber once; a no-op when logging is off.
pub fn init_tracing(config: &AppConfig) {
    if !config.logging_enabled() {
        return;
    }

    let level = trace_level(config);
    let _ = TRACING_INIT.get_or_init(|| {
        let path = trace_log_path();
        let file = match OpenOptions::new().create(true).append(true).open(&path) {
            Ok(file) => file,
            Err(_) => return,
        };
        let subscriber = tracing_subscriber::fmt()
            .json()
            .with_max_level(level)
            .with_timer(UtcTime::rfc_3339())
            .with_writer(file)
            .with_target(false)
            .with_current_span(true)
            .with_span_list(false)
            .finish();
        let _ = tracing::subscriber::set_global_default(subscriber);
    });
}

/// Span wrapping the handling of one fired source.
pub(crate) fn dispatch_span(source: &'static str, cycle: u64) -> tracing::span::EnteredSpan {
    tracing::debug_span!("dispatch", source, cycle).entered()
}
