//! Single-threaded dispatch loop: render, wait on every source, route one
//! event, repeat.

mod state;

pub use state::{EventLoopDeps, EventLoopHandles, EventLoopState, EventLoopTimers, JobCompletion};

use anyhow::{Context, Result};
use crossbeam_channel::{never, select, RecvTimeoutError};
use crossterm::event::Event;
use ratatui::backend::Backend;
use ratatui::Terminal;
use std::io::{self, Write};
use std::time::{Duration, Instant};

use crate::input::{normalize_paste, InputMessage};
use crate::signals::signal_name;
use crate::telemetry::dispatch_span;
use crate::workspace::Workspace;
use crate::{log_debug, log_debug_content};

/// How long startup waits for the first input event before drawing.
pub const FIRST_EVENT_WAIT: Duration = Duration::from_millis(10);

/// Process status after a backend failure.
pub const EXIT_FAILURE: u8 = 1;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LoopExit {
    Signal(i32),
    InputClosed,
    Quit,
}

impl LoopExit {
    /// Every way the loop ends on its own is an orderly shutdown.
    pub fn exit_status(self) -> u8 {
        match self {
            LoopExit::Signal(_) | LoopExit::InputClosed | LoopExit::Quit => 0,
        }
    }
}

/// Status for the whole session: 0 after an orderly shutdown, 1 when the
/// backend or startup failed.
pub fn session_exit_status(outcome: &Result<LoopExit>) -> u8 {
    match outcome {
        Ok(exit) => exit.exit_status(),
        Err(_) => EXIT_FAILURE,
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Source {
    Job,
    Autosave,
    CloseTerms,
    Input,
    Redraw,
    Deferred,
    Signal,
}

impl Source {
    fn label(self) -> &'static str {
        match self {
            Source::Job => "job",
            Source::Autosave => "autosave",
            Source::CloseTerms => "close_terms",
            Source::Input => "input",
            Source::Redraw => "redraw",
            Source::Deferred => "deferred",
            Source::Signal => "signal",
        }
    }
}

/// Paint the workspace, then the menu, then the form.
fn render_frame<B: Backend>(
    terminal: &mut Terminal<B>,
    workspace: &mut dyn Workspace,
    state: &EventLoopState,
) -> Result<()> {
    terminal
        .draw(|frame| {
            let area = frame.size();
            let buf = frame.buffer_mut();
            workspace.render(area, buf);
            state.overlays.render(area, buf);
        })
        .context("failed to draw frame")?;
    Ok(())
}

/// Resize goes to the info bar and the editor; anything else goes to the
/// prompt while it is open, otherwise to the editor.
fn route_default(event: Event, workspace: &mut dyn Workspace) {
    let event = match event {
        Event::Paste(text) => {
            let cleaned = normalize_paste(&text);
            log_debug_content(&format!("paste: {cleaned:?}"));
            Event::Paste(cleaned)
        }
        other => other,
    };
    match &event {
        Event::Resize(..) => {
            workspace.handle_status_event(&event);
            workspace.handle_editor_event(&event);
        }
        _ if workspace.prompt_active() => workspace.handle_status_event(&event),
        _ => workspace.handle_editor_event(&event),
    }
}

/// Route one terminal event and run the post-dispatch hook.
pub fn dispatch_event(
    event: Event,
    workspace: &mut dyn Workspace,
    state: &mut EventLoopState,
    deps: &EventLoopDeps,
    now: Instant,
) {
    if let Some(event) = state
        .overlays
        .route(event, workspace, &deps.deferred_tx, now)
    {
        route_default(event, workspace);
    }
    if let Err(err) = workspace.after_event() {
        log_debug(&format!("post-dispatch hook failed: {err:#}"));
        workspace.message(&format!("{err:#}"));
    }
}

/// Fails only when the terminal backend reported a read error.
fn handle_input(
    message: InputMessage,
    workspace: &mut dyn Workspace,
    state: &mut EventLoopState,
    deps: &EventLoopDeps,
) -> Result<()> {
    match message {
        InputMessage::Event(event) => {
            dispatch_event(event, workspace, state, deps, Instant::now());
            Ok(())
        }
        InputMessage::Failed(err) => Err(err).context("terminal input failed"),
    }
}

fn record_timing(
    state: &EventLoopState,
    timers: &EventLoopTimers,
    source: Source,
    started: Instant,
) {
    if !state.log_timings {
        return;
    }
    let elapsed_us = started.elapsed().as_micros() as u64;
    log_debug(&format!(
        "timing|phase=dispatch|source={}|cycle={}|elapsed_us={elapsed_us}",
        source.label(),
        timers.cycles
    ));
    tracing::debug!(
        source = source.label(),
        cycle = timers.cycles,
        elapsed_us,
        "dispatch cycle"
    );
}

/// Drop stale redraw requests, then give the first input event a short
/// head start so it is visible in the first frame.
fn startup(
    workspace: &mut dyn Workspace,
    state: &mut EventLoopState,
    deps: &EventLoopDeps,
) -> Result<Option<LoopExit>> {
    let stale = deps.redraw_rx.try_iter().count();
    if stale > 0 {
        log_debug(&format!(
            "dropped {stale} redraw requests queued before startup"
        ));
    }
    match deps.input_rx.recv_timeout(FIRST_EVENT_WAIT) {
        Ok(message) => {
            let _span = dispatch_span(Source::Input.label(), 0);
            handle_input(message, workspace, state, deps)?;
        }
        Err(RecvTimeoutError::Timeout) => {}
        Err(RecvTimeoutError::Disconnected) => return Ok(Some(LoopExit::InputClosed)),
    }
    if workspace.quit_requested() {
        return Ok(Some(LoopExit::Quit));
    }
    Ok(None)
}

/// Run until a signal, end of input or a quit request. Backend failures
/// (drawing or reading) are returned as errors.
pub fn run_event_loop<B: Backend>(
    terminal: &mut Terminal<B>,
    workspace: &mut dyn Workspace,
    state: &mut EventLoopState,
    timers: &mut EventLoopTimers,
    deps: &mut EventLoopDeps,
) -> Result<LoopExit> {
    if let Some(exit) = startup(workspace, state, deps)? {
        return Ok(exit);
    }

    loop {
        render_frame(terminal, workspace, state)?;
        timers.cycles += 1;

        let mut exit = None;
        let mut closed = None;
        let source;
        select! {
            recv(deps.jobs_rx) -> job => {
                source = Source::Job;
                match job {
                    Ok(job) => {
                        let _span = dispatch_span(source.label(), timers.cycles);
                        let started = Instant::now();
                        job(workspace);
                        let mut drained = 1;
                        for job in deps.jobs_rx.try_iter() {
                            job(workspace);
                            drained += 1;
                        }
                        log_debug(&format!("applied {drained} job completions"));
                        record_timing(state, timers, source, started);
                    }
                    Err(_) => closed = Some(source),
                }
            }
            recv(deps.autosave_rx) -> tick => {
                source = Source::Autosave;
                match tick {
                    Ok(_) => workspace.autosave(),
                    Err(_) => closed = Some(source),
                }
            }
            recv(deps.close_terms_rx) -> request => {
                source = Source::CloseTerms;
                match request {
                    Ok(()) => workspace.close_terminals(),
                    Err(_) => closed = Some(source),
                }
            }
            recv(deps.input_rx) -> message => {
                source = Source::Input;
                match message {
                    Ok(message) => {
                        let _span = dispatch_span(source.label(), timers.cycles);
                        let started = Instant::now();
                        handle_input(message, workspace, state, deps)?;
                        record_timing(state, timers, source, started);
                    }
                    Err(_) => {
                        log_debug("input channel closed; leaving dispatch loop");
                        exit = Some(LoopExit::InputClosed);
                    }
                }
            }
            recv(deps.redraw_rx) -> request => {
                source = Source::Redraw;
                match request {
                    Ok(()) => deps.redraw_rx.try_iter().for_each(drop),
                    Err(_) => closed = Some(source),
                }
            }
            recv(deps.deferred.receiver()) -> task => {
                source = Source::Deferred;
                if let Ok(task) = task {
                    let _span = dispatch_span(source.label(), timers.cycles);
                    let started = Instant::now();
                    task(workspace);
                    let drained = 1 + deps.deferred.run_pending(workspace);
                    log_debug(&format!("ran {drained} deferred tasks"));
                    record_timing(state, timers, source, started);
                }
            }
            recv(deps.signal_rx) -> signal => {
                source = Source::Signal;
                match signal {
                    Ok(signal) => {
                        log_debug(&format!("{}: shutting down", signal_name(signal)));
                        exit = Some(LoopExit::Signal(signal));
                    }
                    Err(_) => closed = Some(source),
                }
            }
        }

        if let Some(source) = closed {
            log_debug(&format!("{} source closed", source.label()));
            match source {
                Source::Job => deps.jobs_rx = never(),
                Source::Autosave => deps.autosave_rx = never(),
                Source::CloseTerms => deps.close_terms_rx = never(),
                Source::Redraw => deps.redraw_rx = never(),
                Source::Signal => deps.signal_rx = never(),
                Source::Input | Source::Deferred => {}
            }
        }
        if let Some(exit) = exit {
            return Ok(exit);
        }
        if workspace.quit_requested() {
            log_debug("quit requested");
            return Ok(LoopExit::Quit);
        }
    }
}

/// Orderly shutdown: collect buffered stdout, release clean buffers,
/// restore the screen, then print what was collected.
pub fn finish_session<F, W>(
    workspace: &mut dyn Workspace,
    restore_screen: F,
    out: &mut W,
) -> io::Result<()>
where
    F: FnOnce(),
    W: Write,
{
    let pending = workspace.take_stdout();
    workspace.finalize_unmodified();
    restore_screen();
    if !pending.is_empty() {
        out.write_all(pending.as_bytes())?;
    }
    out.flush()
}
