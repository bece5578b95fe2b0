use crossbeam_channel::{never, tick, unbounded, Receiver, Sender};
use std::time::{Duration, Instant};

use crate::deferred::{deferred_queue, DeferredQueue, DeferredSender};
use crate::input::InputMessage;
use crate::overlays::OverlaySession;
use crate::workspace::Workspace;

/// Finished background job; applied on the loop thread.
pub type JobCompletion = Box<dyn FnOnce(&mut dyn Workspace) + Send + 'static>;

pub struct EventLoopState {
    pub overlays: OverlaySession,
    pub log_timings: bool,
}

impl EventLoopState {
    pub fn new(overlays: OverlaySession, log_timings: bool) -> Self {
        Self {
            overlays,
            log_timings,
        }
    }
}

pub struct EventLoopTimers {
    pub started_at: Instant,
    pub cycles: u64,
}

impl EventLoopTimers {
    pub fn new() -> Self {
        Self {
            started_at: Instant::now(),
            cycles: 0,
        }
    }
}

impl Default for EventLoopTimers {
    fn default() -> Self {
        Self::new()
    }
}

/// Loop-side ends of every source the multiplexer waits on.
pub struct EventLoopDeps {
    pub input_rx: Receiver<InputMessage>,
    pub jobs_rx: Receiver<JobCompletion>,
    pub autosave_rx: Receiver<Instant>,
    pub close_terms_rx: Receiver<()>,
    pub redraw_rx: Receiver<()>,
    pub deferred: DeferredQueue,
    pub deferred_tx: DeferredSender,
    pub signal_rx: Receiver<i32>,
}

/// Producer ends handed to the rest of the program.
#[derive(Debug, Clone)]
pub struct EventLoopHandles {
    pub jobs: Sender<JobCompletion>,
    pub close_terms: Sender<()>,
    pub redraw: Sender<()>,
    pub deferred: DeferredSender,
}

impl EventLoopDeps {
    /// Wire up the internal channels around the externally owned input and
    /// signal receivers. No autosave interval means the tick never fires.
    pub fn new(
        input_rx: Receiver<InputMessage>,
        signal_rx: Receiver<i32>,
        autosave: Option<Duration>,
    ) -> (Self, EventLoopHandles) {
        let (jobs_tx, jobs_rx) = unbounded();
        let (close_tx, close_terms_rx) = unbounded();
        let (redraw_tx, redraw_rx) = unbounded();
        let (deferred_tx, deferred) = deferred_queue();
        let autosave_rx = match autosave {
            Some(interval) => tick(interval),
            None => never(),
        };
        let handles = EventLoopHandles {
            jobs: jobs_tx,
            close_terms: close_tx,
            redraw: redraw_tx,
            deferred: deferred_tx.clone(),
        };
        let deps = Self {
            input_rx,
            jobs_rx,
            autosave_rx,
            close_terms_rx,
            redraw_rx,
            deferred,
            deferred_tx,
            signal_rx,
        };
        (deps, handles)
    }
}
