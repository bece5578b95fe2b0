//! Throwaway workspace for driving the overlays interactively.
//!
//! Tabs hold panes, panes hold plain lines. Nothing is ever written back to
//! disk; `open` and `tab` only read.

use anyhow::{bail, Context, Result};
use crossterm::event::{Event, KeyCode, KeyEvent, KeyEventKind, KeyModifiers};
use ratatui::buffer::Buffer;
use ratatui::layout::{Constraint, Direction, Layout, Rect};
use ratatui::style::{Modifier, Style};
use std::fs;
use std::io;

use modeterm::draw::{draw_box, put_row, truncate_to_width};
use modeterm::log_debug;
use modeterm::workspace::{run_command_line, FocusTracker, PaneId, StatusSink, Workspace};

pub(crate) const HELP_TEXT: &str =
    "Alt+m menu  Alt+f form  Ctrl+P command  Ctrl+W pane  Ctrl+N tab  Ctrl+Q quit";

#[derive(Debug, Clone)]
struct Pane {
    id: PaneId,
    name: String,
    lines: Vec<String>,
    modified: bool,
}

impl Pane {
    fn insert_char(&mut self, ch: char) {
        if let Some(line) = self.lines.last_mut() {
            line.push(ch);
        } else {
            self.lines.push(ch.to_string());
        }
        self.modified = true;
    }

    fn newline(&mut self) {
        self.lines.push(String::new());
        self.modified = true;
    }

    fn backspace(&mut self) {
        let Some(line) = self.lines.last_mut() else {
            return;
        };
        if line.pop().is_none() && self.lines.len() > 1 {
            self.lines.pop();
        }
        self.modified = true;
    }

    fn insert_text(&mut self, text: &str) {
        for (idx, chunk) in text.split('\n').enumerate() {
            if idx > 0 {
                self.newline();
            }
            for ch in chunk.chars() {
                self.insert_char(ch);
            }
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Split {
    /// Panes stacked above/below.
    Horizontal,
    /// Panes side by side.
    Vertical,
}

#[derive(Debug, Clone)]
struct Tab {
    panes: Vec<PaneId>,
    split: Split,
}

#[derive(Debug)]
pub(crate) struct ScratchWorkspace {
    panes: Vec<Pane>,
    tabs: Vec<Tab>,
    active_tab: usize,
    focus: FocusTracker,
    next_id: u32,
    info: String,
    prompt: Option<String>,
    stdout: String,
    quit: bool,
}

fn load_lines(path: &str) -> Result<Vec<String>> {
    match fs::read_to_string(path) {
        Ok(text) => Ok(text.lines().map(str::to_string).collect()),
        Err(err) if err.kind() == io::ErrorKind::NotFound => Ok(vec![String::new()]),
        Err(err) => Err(err).with_context(|| format!("failed to read {path}")),
    }
}

fn is_ctrl(key: &KeyEvent, ch: char) -> bool {
    key.modifiers.contains(KeyModifiers::CONTROL) && key.code == KeyCode::Char(ch)
}

impl ScratchWorkspace {
    pub(crate) fn new() -> Self {
        Self {
            panes: Vec::new(),
            tabs: Vec::new(),
            active_tab: 0,
            focus: FocusTracker::new(),
            next_id: 1,
            info: String::new(),
            prompt: None,
            stdout: String::new(),
            quit: false,
        }
    }

    fn new_pane(&mut self, name: &str, lines: Vec<String>) -> PaneId {
        let id = PaneId(self.next_id);
        self.next_id += 1;
        self.panes.push(Pane {
            id,
            name: name.to_string(),
            lines,
            modified: false,
        });
        self.focus.add(id);
        self.focus.focus(id);
        id
    }

    fn pane(&self, id: PaneId) -> Option<&Pane> {
        self.panes.iter().find(|pane| pane.id == id)
    }

    fn focused_pane_mut(&mut self) -> Option<&mut Pane> {
        let id = self.focus.active()?;
        self.panes.iter_mut().find(|pane| pane.id == id)
    }

    fn open_tab(&mut self, name: &str, lines: Vec<String>) {
        let id = self.new_pane(name, lines);
        self.tabs.push(Tab {
            panes: vec![id],
            split: Split::Vertical,
        });
        self.active_tab = self.tabs.len() - 1;
    }

    /// Add a pane next to `anchor` in the tab that holds it.
    fn split(&mut self, anchor: PaneId, split: Split, name: &str, lines: Vec<String>) {
        let Some(tab_idx) = self.tabs.iter().position(|tab| tab.panes.contains(&anchor)) else {
            self.open_tab(name, lines);
            return;
        };
        let id = self.new_pane(name, lines);
        let tab = &mut self.tabs[tab_idx];
        let at = tab
            .panes
            .iter()
            .position(|pane| *pane == anchor)
            .map_or(tab.panes.len(), |idx| idx + 1);
        tab.panes.insert(at, id);
        tab.split = split;
        self.active_tab = tab_idx;
    }

    fn next_tab(&mut self) {
        if self.tabs.is_empty() {
            return;
        }
        self.active_tab = (self.active_tab + 1) % self.tabs.len();
        if let Some(first) = self.tabs[self.active_tab].panes.first().copied() {
            self.focus.focus(first);
        }
    }

    fn next_pane(&mut self) {
        let Some(tab) = self.tabs.get(self.active_tab) else {
            return;
        };
        let current = self.focus.active();
        let idx = tab
            .panes
            .iter()
            .position(|pane| Some(*pane) == current)
            .map_or(0, |idx| (idx + 1) % tab.panes.len());
        if let Some(pane) = tab.panes.get(idx).copied() {
            self.focus.focus(pane);
        }
    }

    fn remove_pane(&mut self, id: PaneId) {
        self.panes.retain(|pane| pane.id != id);
        self.focus.remove(id);
        for tab in &mut self.tabs {
            tab.panes.retain(|pane| *pane != id);
        }
        self.tabs.retain(|tab| !tab.panes.is_empty());
        if self.active_tab >= self.tabs.len() {
            self.active_tab = self.tabs.len().saturating_sub(1);
        }
    }

    fn render_tab_line(&self, area: Rect, buf: &mut Buffer) {
        let mut x = area.x;
        for (idx, tab) in self.tabs.iter().enumerate() {
            let name = tab
                .panes
                .first()
                .and_then(|id| self.pane(*id))
                .map_or("[none]", |pane| pane.name.as_str());
            let label = format!(" {}:{} ", idx + 1, name);
            let style = if idx == self.active_tab {
                Style::default().add_modifier(Modifier::REVERSED)
            } else {
                Style::default()
            };
            let width = area.right().saturating_sub(x);
            if width == 0 {
                break;
            }
            let label = truncate_to_width(&label, usize::from(width));
            let shown = width.min(label.chars().count() as u16);
            put_row(buf, x, area.y, &label, shown, style);
            x = x.saturating_add(label.chars().count() as u16);
        }
    }

    fn render_pane(&self, pane: &Pane, area: Rect, buf: &mut Buffer) {
        let focused = self.focus.active() == Some(pane.id);
        let title = format!(" {}{} ", pane.name, if pane.modified { " [+]" } else { "" });
        let style = if focused {
            Style::default().add_modifier(Modifier::BOLD)
        } else {
            Style::default()
        };
        draw_box(buf, area, &title, style);
        if area.width < 3 || area.height < 3 {
            return;
        }
        let rows = usize::from(area.height - 2);
        let skip = pane.lines.len().saturating_sub(rows);
        for (row, line) in pane.lines.iter().skip(skip).enumerate() {
            let y = area.y + 1 + row as u16;
            put_row(buf, area.x + 1, y, line, area.width - 2, Style::default());
        }
    }

    fn handle_prompt_key(&mut self, key: &KeyEvent) {
        let Some(line) = self.prompt.as_mut() else {
            return;
        };
        match key.code {
            KeyCode::Esc => self.prompt = None,
            KeyCode::Backspace => {
                line.pop();
            }
            KeyCode::Char(ch) if !key.modifiers.contains(KeyModifiers::CONTROL) => line.push(ch),
            KeyCode::Enter => {
                let line = self.prompt.take().unwrap_or_default();
                if let Err(err) = run_command_line(self, &line) {
                    self.message(&format!("{err:#}"));
                }
            }
            _ => {}
        }
    }
}

impl StatusSink for ScratchWorkspace {
    fn message(&mut self, text: &str) {
        self.info = text.to_string();
    }
}

impl Workspace for ScratchWorkspace {
    fn render(&mut self, area: Rect, buf: &mut Buffer) {
        if area.height < 3 {
            return;
        }
        let tab_line = Rect { height: 1, ..area };
        let info_bar = Rect {
            y: area.bottom() - 1,
            height: 1,
            ..area
        };
        let body = Rect {
            y: area.y + 1,
            height: area.height - 2,
            ..area
        };
        self.render_tab_line(tab_line, buf);

        if let Some(tab) = self.tabs.get(self.active_tab) {
            let direction = match tab.split {
                Split::Horizontal => Direction::Vertical,
                Split::Vertical => Direction::Horizontal,
            };
            let count = tab.panes.len() as u32;
            let rects = Layout::default()
                .direction(direction)
                .constraints(vec![Constraint::Ratio(1, count); tab.panes.len()])
                .split(body);
            for (id, rect) in tab.panes.iter().zip(rects.iter()) {
                if let Some(pane) = self.pane(*id) {
                    self.render_pane(pane, *rect, buf);
                }
            }
        }

        let info = match &self.prompt {
            Some(line) => format!(":{line}"),
            None => self.info.clone(),
        };
        let style = Style::default().add_modifier(Modifier::REVERSED);
        put_row(buf, info_bar.x, info_bar.y, &info, info_bar.width, style);
    }

    fn prompt_active(&self) -> bool {
        self.prompt.is_some()
    }

    fn handle_status_event(&mut self, event: &Event) {
        match event {
            Event::Key(key) if key.kind != KeyEventKind::Release => self.handle_prompt_key(key),
            Event::Paste(text) => {
                if let Some(line) = self.prompt.as_mut() {
                    line.push_str(&text.replace('\n', " "));
                }
            }
            _ => {}
        }
    }

    fn handle_editor_event(&mut self, event: &Event) {
        match event {
            Event::Key(key) if key.kind == KeyEventKind::Release => {}
            Event::Key(key) if is_ctrl(key, 'q') => self.quit = true,
            Event::Key(key) if is_ctrl(key, 'p') => self.prompt = Some(String::new()),
            Event::Key(key) if is_ctrl(key, 'w') => self.next_pane(),
            Event::Key(key) if is_ctrl(key, 'n') => self.next_tab(),
            Event::Key(key) => {
                let ctrl = key.modifiers.contains(KeyModifiers::CONTROL);
                let Some(pane) = self.focused_pane_mut() else {
                    return;
                };
                match key.code {
                    KeyCode::Char(ch) if !ctrl => pane.insert_char(ch),
                    KeyCode::Enter => pane.newline(),
                    KeyCode::Backspace => pane.backspace(),
                    _ => {}
                }
            }
            Event::Paste(text) => {
                if let Some(pane) = self.focused_pane_mut() {
                    pane.insert_text(text);
                }
            }
            _ => {}
        }
    }

    fn focus(&self) -> &FocusTracker {
        &self.focus
    }

    fn execute(&mut self, pane: PaneId, name: &str, args: &[String]) -> Result<()> {
        let path = args.first().map(String::as_str);
        let (title, lines) = match path {
            Some(path) => (path.to_string(), load_lines(path)?),
            None => ("[scratch]".to_string(), vec![String::new()]),
        };
        match name {
            "open" => self.split(pane, Split::Vertical, &title, lines),
            "tab" => self.open_tab(&title, lines),
            "hsplit" | "vsplit" => {
                let split = if name == "hsplit" {
                    Split::Horizontal
                } else {
                    Split::Vertical
                };
                let (title, lines) = match (path, self.pane(pane)) {
                    (None, Some(source)) => (source.name.clone(), source.lines.clone()),
                    _ => (title, lines),
                };
                self.split(pane, split, &title, lines);
            }
            "print" => {
                self.stdout.push_str(&args.join(" "));
                self.stdout.push('\n');
            }
            "quit" => self.quit = true,
            other => bail!("unknown command: {other}"),
        }
        log_debug(&format!("ran {name} on pane {}", pane.0));
        Ok(())
    }

    fn open_blank(&mut self) -> Result<()> {
        self.open_tab("[scratch]", vec![String::new()]);
        Ok(())
    }

    fn autosave(&mut self) {
        let modified = self.panes.iter().filter(|pane| pane.modified).count();
        log_debug(&format!(
            "autosave tick: {modified} modified scratch buffers (not persisted)"
        ));
    }

    fn close_terminals(&mut self) {
        log_debug("close terminals requested; scratch workspace has none");
    }

    fn quit_requested(&self) -> bool {
        self.quit
    }

    fn finalize_unmodified(&mut self) {
        let clean: Vec<PaneId> = self
            .panes
            .iter()
            .filter(|pane| !pane.modified)
            .map(|pane| pane.id)
            .collect();
        for id in &clean {
            self.remove_pane(*id);
        }
        log_debug(&format!("released {} unmodified buffers", clean.len()));
    }

    fn take_stdout(&mut self) -> String {
        std::mem::take(&mut self.stdout)
    }
}
