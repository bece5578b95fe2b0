use crossterm::event::{self, Event};
use std::io;

/// Blocking producer of decoded terminal events.
pub trait EventSource: Send + 'static {
    /// Block until the next event. `UnexpectedEof` means the terminal is gone.
    fn read_event(&mut self) -> io::Result<Event>;
}

/// Reads from the process terminal through crossterm.
#[derive(Debug, Default, Clone, Copy)]
pub struct CrosstermEvents;

impl EventSource for CrosstermEvents {
    fn read_event(&mut self) -> io::Result<Event> {
        event::read()
    }
}
