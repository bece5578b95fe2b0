use crossbeam_channel::Sender;
use crossterm::event::Event;
use std::io;
use std::thread;

use crate::input::source::EventSource;
use crate::log_debug;

/// Max pending input events before the reader blocks.
pub const INPUT_CHANNEL_CAPACITY: usize = 256;

#[derive(Debug)]
pub enum InputMessage {
    Event(Event),
    /// The backend failed; the reader has stopped.
    Failed(io::Error),
}

/// Forward every terminal event to the loop. Never touches editor state.
///
/// End of input closes the channel; any other read error is forwarded once
/// and ends the thread.
pub fn spawn_input_thread<S: EventSource>(
    mut source: S,
    tx: Sender<InputMessage>,
) -> thread::JoinHandle<()> {
    thread::spawn(move || loop {
        match source.read_event() {
            Ok(event) => {
                if tx.send(InputMessage::Event(event)).is_err() {
                    return;
                }
            }
            Err(err) if err.kind() == io::ErrorKind::Interrupted => continue,
            Err(err) if err.kind() == io::ErrorKind::UnexpectedEof => {
                log_debug("terminal input reached end of stream");
                return;
            }
            Err(err) => {
                log_debug(&format!("terminal read error: {err}"));
                let _ = tx.send(InputMessage::Failed(err));
                return;
            }
        }
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crossbeam_channel::bounded;
    use crossterm::event::{KeyCode, KeyEvent, KeyModifiers};
    use std::collections::VecDeque;
    use std::time::Duration;

    struct Scripted {
        items: VecDeque<io::Result<Event>>,
    }

    impl EventSource for Scripted {
        fn read_event(&mut self) -> io::Result<Event> {
            self.items
                .pop_front()
                .unwrap_or_else(|| Err(io::Error::from(io::ErrorKind::UnexpectedEof)))
        }
    }

    fn event_of(message: &InputMessage) -> Option<&Event> {
        match message {
            InputMessage::Event(event) => Some(event),
            InputMessage::Failed(_) => None,
        }
    }

    fn key_event(ch: char) -> Event {
        Event::Key(KeyEvent::new(KeyCode::Char(ch), KeyModifiers::NONE))
    }

    #[test]
    fn forwards_events_then_closes_on_eof() {
        let (tx, rx) = bounded(INPUT_CHANNEL_CAPACITY);
        let source = Scripted {
            items: VecDeque::from(vec![
                Ok(key_event('a')),
                Err(io::Error::from(io::ErrorKind::Interrupted)),
                Ok(Event::Resize(80, 24)),
            ]),
        };
        let handle = spawn_input_thread(source, tx);
        handle.join().expect("input thread");

        let received: Vec<InputMessage> = rx.try_iter().collect();
        assert_eq!(received.len(), 2);
        assert_eq!(event_of(&received[0]), Some(&key_event('a')));
        assert_eq!(event_of(&received[1]), Some(&Event::Resize(80, 24)));
        assert!(rx.recv_timeout(Duration::from_millis(50)).is_err());
    }

    #[test]
    fn forwards_backend_failure_and_stops() {
        let (tx, rx) = bounded(4);
        let source = Scripted {
            items: VecDeque::from(vec![
                Err(io::Error::new(io::ErrorKind::Other, "tty vanished")),
                Ok(key_event('z')),
            ]),
        };
        spawn_input_thread(source, tx).join().expect("input thread");
        let received: Vec<InputMessage> = rx.try_iter().collect();
        assert_eq!(received.len(), 1);
        match &received[0] {
            InputMessage::Failed(err) => assert_eq!(err.to_string(), "tty vanished"),
            InputMessage::Event(event) => panic!("unexpected event {event:?}"),
        }
    }
}
