pub mod alt_key;
pub mod config;
pub mod deferred;
pub mod draw;
pub mod event_loop;
pub mod form;
pub mod input;
mod logging;
pub mod menu;
pub mod overlays;
pub mod signals;
mod telemetry;
pub mod terminal_restore;
#[cfg(test)]
mod test_support;
pub mod workspace;

pub use logging::{
    crash_log_path, init_logging, log_debug, log_debug_content, log_file_path, log_panic,
    logging_enabled,
};
pub use telemetry::init_tracing;
