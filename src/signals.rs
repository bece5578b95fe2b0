//! OS termination signals forwarded into the dispatch loop.

use crossbeam_channel::Sender;
use signal_hook::consts::{SIGABRT, SIGHUP, SIGINT, SIGQUIT, SIGTERM};
use signal_hook::iterator::{Handle, Signals};
use std::io;
use std::thread;

use crate::log_debug;

pub const TERMINATION_SIGNALS: [i32; 5] = [SIGTERM, SIGINT, SIGQUIT, SIGABRT, SIGHUP];

pub fn signal_name(signal: i32) -> &'static str {
    match signal {
        SIGTERM => "SIGTERM",
        SIGINT => "SIGINT",
        SIGQUIT => "SIGQUIT",
        SIGABRT => "SIGABRT",
        SIGHUP => "SIGHUP",
        _ => "signal",
    }
}

/// Background thread owning the signal registration. Dropping it stops
/// delivery and joins the thread.
pub struct SignalListener {
    handle: Handle,
    thread: Option<thread::JoinHandle<()>>,
}

impl std::fmt::Debug for SignalListener {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("SignalListener")
            .field("running", &self.thread.is_some())
            .finish()
    }
}

pub fn spawn_signal_listener(tx: Sender<i32>) -> io::Result<SignalListener> {
    let mut signals = Signals::new(TERMINATION_SIGNALS)?;
    let handle = signals.handle();
    let thread = thread::spawn(move || {
        for signal in signals.forever() {
            log_debug(&format!("received {}", signal_name(signal)));
            if tx.send(signal).is_err() {
                break;
            }
        }
    });
    Ok(SignalListener {
        handle,
        thread: Some(thread),
    })
}

impl Drop for SignalListener {
    fn drop(&mut self) {
        self.handle.close();
        if let Some(thread) = self.thread.take() {
            let _ = thread.join();
        }
    }
}
