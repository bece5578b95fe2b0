//! modeterm entrypoint: a scratch workspace under the menu and form overlays.
//!
//! # Architecture
//!
//! - Input thread: blocks on crossterm and forwards every event
//! - Signal thread: forwards SIGTERM/SIGINT/SIGQUIT/SIGABRT/SIGHUP
//! - Dispatch loop (main thread): owns the workspace and overlay state

mod scratch;

use anyhow::{Context, Result};
use crossbeam_channel::{bounded, unbounded};
use ratatui::backend::CrosstermBackend;
use ratatui::Terminal;
use std::io;
use std::process::ExitCode;

use modeterm::config::AppConfig;
use modeterm::event_loop::{
    finish_session, run_event_loop, session_exit_status, EventLoopDeps, EventLoopState,
    EventLoopTimers, LoopExit,
};
use modeterm::input::{spawn_input_thread, CrosstermEvents, INPUT_CHANNEL_CAPACITY};
use modeterm::overlays::OverlaySession;
use modeterm::signals::{signal_name, spawn_signal_listener};
use modeterm::terminal_restore::{restore_terminal, TerminalRestoreGuard};
use modeterm::workspace::StatusSink;
use modeterm::{init_logging, init_tracing, log_debug, log_file_path};

use crate::scratch::{ScratchWorkspace, HELP_TEXT};

fn main() -> ExitCode {
    let outcome = run();
    if let Err(err) = &outcome {
        restore_terminal();
        log_debug(&format!("fatal: {err:#}"));
        eprintln!("modeterm: {err:#}");
    }
    ExitCode::from(session_exit_status(&outcome))
}

fn run() -> Result<LoopExit> {
    let config = AppConfig::parse_args()?;
    init_logging(&config);
    init_tracing(&config);
    log_debug("=== modeterm started ===");
    log_debug(&format!("log file: {:?}", log_file_path()));

    let overlays = OverlaySession::new(config.load_form_spec()?, config.chord_window());

    let terminal_guard = TerminalRestoreGuard::new();
    terminal_guard.enable_raw_mode()?;
    let mut stdout = io::stdout();
    terminal_guard.enter_alt_screen(&mut stdout)?;
    if !config.no_bracketed_paste {
        terminal_guard.enable_bracketed_paste(&mut stdout)?;
    }
    let mut terminal = Terminal::new(CrosstermBackend::new(stdout))
        .context("failed to initialize terminal")?;
    terminal.clear().context("failed to clear terminal")?;

    let (input_tx, input_rx) = bounded(INPUT_CHANNEL_CAPACITY);
    let _input_handle = spawn_input_thread(CrosstermEvents, input_tx);
    let (signal_tx, signal_rx) = unbounded();
    let _signal_listener = spawn_signal_listener(signal_tx)
        .context("failed to register signal handlers")?;

    // Handles stay alive so their sources remain open for the whole session.
    let (mut deps, _handles) = EventLoopDeps::new(input_rx, signal_rx, config.autosave_interval());
    let mut state = EventLoopState::new(overlays, config.log_timings);
    let mut timers = EventLoopTimers::new();
    let mut workspace = ScratchWorkspace::new();
    workspace.message(HELP_TEXT);

    let outcome = run_event_loop(
        &mut terminal,
        &mut workspace,
        &mut state,
        &mut timers,
        &mut deps,
    );
    finish_session(
        &mut workspace,
        || terminal_guard.restore(),
        &mut io::stdout(),
    )
    .context("failed to flush buffered output")?;

    let exit = outcome?;
    log_debug(&format!(
        "dispatch loop ended ({exit:?}) after {} cycles in {:.1}s",
        timers.cycles,
        timers.started_at.elapsed().as_secs_f64()
    ));
    if let LoopExit::Signal(signal) = exit {
        log_debug(&format!("exiting on {}", signal_name(signal)));
    }
    Ok(exit)
}
