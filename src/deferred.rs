//! Deferred-call queue: background threads hand work to the dispatch loop.
//!
//! Only the loop thread owns editor and overlay state. Anything else that
//! needs to touch it submits a task here; the loop runs tasks between
//! renders, in submission order, each to completion.

use anyhow::{anyhow, Result};
use crossbeam_channel::{unbounded, Receiver, Sender};

use crate::workspace::Workspace;

/// Unit of work executed on the loop thread with exclusive workspace access.
pub type DeferredTask = Box<dyn FnOnce(&mut dyn Workspace) + Send + 'static>;

/// Cloneable submit handle; safe to move into any thread.
#[derive(Clone)]
pub struct DeferredSender {
    tx: Sender<DeferredTask>,
}

impl std::fmt::Debug for DeferredSender {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("DeferredSender")
            .field("pending", &self.tx.len())
            .finish()
    }
}

impl DeferredSender {
    /// Queue `work` for the loop thread. Fails only once the loop is gone.
    pub fn submit<F>(&self, work: F) -> Result<()>
    where
        F: FnOnce(&mut dyn Workspace) + Send + 'static,
    {
        self.tx
            .send(Box::new(work))
            .map_err(|_| anyhow!("dispatch loop has shut down; deferred task dropped"))
    }
}

/// Loop-side end of the queue.
pub struct DeferredQueue {
    rx: Receiver<DeferredTask>,
}

impl std::fmt::Debug for DeferredQueue {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("DeferredQueue")
            .field("pending", &self.rx.len())
            .finish()
    }
}

impl DeferredQueue {
    pub fn receiver(&self) -> &Receiver<DeferredTask> {
        &self.rx
    }

    /// Run every task queued right now; returns how many ran.
    pub fn run_pending(&self, workspace: &mut dyn Workspace) -> usize {
        let mut ran = 0;
        while let Ok(task) = self.rx.try_recv() {
            task(workspace);
            ran += 1;
        }
        ran
    }
}

pub fn deferred_queue() -> (DeferredSender, DeferredQueue) {
    let (tx, rx) = unbounded();
    (DeferredSender { tx }, DeferredQueue { rx })
}
