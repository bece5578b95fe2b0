//! In-memory workspace double shared by unit tests.

use anyhow::{anyhow, bail, Result};
use crossterm::event::{Event, KeyCode, KeyEvent, KeyEventKind, KeyModifiers};
use ratatui::buffer::Buffer;
use ratatui::layout::Rect;
use ratatui::style::Style;

use crate::workspace::{FocusTracker, PaneId, StatusSink, Workspace};

const KNOWN_COMMANDS: &[&str] = &["open", "tab", "hsplit", "vsplit"];

#[derive(Debug)]
pub(crate) struct FakeWorkspace {
    pub(crate) messages: Vec<String>,
    pub(crate) status_events: Vec<Event>,
    pub(crate) editor_events: Vec<Event>,
    pub(crate) typed: String,
    pub(crate) commands: Vec<(PaneId, String, Vec<String>)>,
    pub(crate) focus: FocusTracker,
    pub(crate) blank_opens: usize,
    pub(crate) open_fails: bool,
    pub(crate) open_creates_pane: bool,
    pub(crate) prompt: bool,
    pub(crate) autosaves: usize,
    pub(crate) terminals_closed: usize,
    pub(crate) hook_calls: usize,
    pub(crate) hook_error: Option<String>,
    pub(crate) finalized: bool,
    pub(crate) stdout: String,
    pub(crate) quit: bool,
    next_pane: u32,
}

impl FakeWorkspace {
    pub(crate) fn new() -> Self {
        Self {
            messages: Vec::new(),
            status_events: Vec::new(),
            editor_events: Vec::new(),
            typed: String::new(),
            commands: Vec::new(),
            focus: FocusTracker::new(),
            blank_opens: 0,
            open_fails: false,
            open_creates_pane: true,
            prompt: false,
            autosaves: 0,
            terminals_closed: 0,
            hook_calls: 0,
            hook_error: None,
            finalized: false,
            stdout: String::new(),
            quit: false,
            next_pane: 1,
        }
    }

    pub(crate) fn with_pane() -> Self {
        let mut ws = Self::new();
        ws.add_pane();
        ws
    }

    fn add_pane(&mut self) -> PaneId {
        let pane = PaneId(self.next_pane);
        self.next_pane += 1;
        self.focus.add(pane);
        pane
    }

    pub(crate) fn last_message(&self) -> Option<&str> {
        self.messages.last().map(String::as_str)
    }
}

impl StatusSink for FakeWorkspace {
    fn message(&mut self, text: &str) {
        self.messages.push(text.to_string());
    }
}

impl Workspace for FakeWorkspace {
    fn render(&mut self, area: Rect, buf: &mut Buffer) {
        if area.width >= 6 && area.height > 0 {
            buf.set_string(area.x, area.y, "EDITOR", Style::default());
        }
    }

    fn prompt_active(&self) -> bool {
        self.prompt
    }

    fn handle_status_event(&mut self, event: &Event) {
        self.status_events.push(event.clone());
    }

    fn handle_editor_event(&mut self, event: &Event) {
        match event {
            Event::Key(KeyEvent {
                code: KeyCode::Char('q'),
                modifiers,
                ..
            }) if modifiers.contains(KeyModifiers::CONTROL) => self.quit = true,
            Event::Key(KeyEvent {
                code: KeyCode::Char(ch),
                ..
            }) => self.typed.push(*ch),
            Event::Key(KeyEvent {
                code: KeyCode::Enter,
                ..
            }) => self.typed.push('\n'),
            Event::Paste(text) => self.typed.push_str(text),
            _ => {}
        }
        self.editor_events.push(event.clone());
    }

    fn focus(&self) -> &FocusTracker {
        &self.focus
    }

    fn execute(&mut self, pane: PaneId, name: &str, args: &[String]) -> Result<()> {
        if !KNOWN_COMMANDS.contains(&name) {
            bail!("unknown command: {name}");
        }
        self.commands.push((pane, name.to_string(), args.to_vec()));
        Ok(())
    }

    fn open_blank(&mut self) -> Result<()> {
        self.blank_opens += 1;
        if self.open_fails {
            return Err(anyhow!("open refused"));
        }
        if self.open_creates_pane {
            self.add_pane();
        }
        Ok(())
    }

    fn autosave(&mut self) {
        self.autosaves += 1;
    }

    fn close_terminals(&mut self) {
        self.terminals_closed += 1;
    }

    fn after_event(&mut self) -> Result<()> {
        self.hook_calls += 1;
        match &self.hook_error {
            Some(err) => Err(anyhow!("{err}")),
            None => Ok(()),
        }
    }

    fn quit_requested(&self) -> bool {
        self.quit
    }

    fn finalize_unmodified(&mut self) {
        self.finalized = true;
    }

    fn take_stdout(&mut self) -> String {
        std::mem::take(&mut self.stdout)
    }
}

pub(crate) fn key(code: KeyCode) -> KeyEvent {
    KeyEvent::new(code, KeyModifiers::NONE)
}

pub(crate) fn char_key(ch: char) -> KeyEvent {
    key(KeyCode::Char(ch))
}

pub(crate) fn alt_key(ch: char) -> KeyEvent {
    KeyEvent::new(KeyCode::Char(ch), KeyModifiers::ALT)
}

pub(crate) fn ctrl_key(ch: char) -> KeyEvent {
    KeyEvent::new(KeyCode::Char(ch), KeyModifiers::CONTROL)
}

pub(crate) fn release(mut event: KeyEvent) -> KeyEvent {
    event.kind = KeyEventKind::Release;
    event
}

/// Concatenate one buffer row into a string for assertions.
pub(crate) fn row_text(buf: &Buffer, y: u16) -> String {
    let area = buf.area;
    (area.x..area.x + area.width)
        .map(|x| buf.get(x, y).symbol().to_string())
        .collect()
}

pub(crate) fn buffer_contains(buf: &Buffer, needle: &str) -> bool {
    let area = buf.area;
    (area.y..area.y + area.height).any(|y| row_text(buf, y).contains(needle))
}
