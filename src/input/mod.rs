//! Terminal input: the reader thread and paste cleanup.

mod paste;
mod source;
mod worker;

pub use paste::normalize_paste;
pub use source::{CrosstermEvents, EventSource};
pub use worker::{spawn_input_thread, InputMessage, INPUT_CHANNEL_CAPACITY};
