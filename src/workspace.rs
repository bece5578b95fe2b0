//! Narrow interfaces to the editor collaborators the overlay core drives.
//!
//! Buffers, panes, the info bar and the command table all live outside this
//! crate. The dispatch loop only needs the capabilities below.

use anyhow::{anyhow, Context, Result};
use crossterm::event::Event;
use ratatui::buffer::Buffer;
use ratatui::layout::Rect;

use crate::log_debug;

/// Accepts plain-text messages for transient display.
pub trait StatusSink {
    fn message(&mut self, text: &str);
}

/// Identifier handed out by the pane-management collaborator.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct PaneId(pub u32);

/// Explicit record of which pane receives commands.
///
/// Kept by the pane manager, queried directly by the command bridge.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct FocusTracker {
    panes: Vec<PaneId>,
    focused: Option<PaneId>,
}

impl FocusTracker {
    pub fn new() -> Self {
        Self::default()
    }

    /// Register a pane; the first pane added takes focus.
    pub fn add(&mut self, pane: PaneId) {
        if !self.panes.contains(&pane) {
            self.panes.push(pane);
        }
        if self.focused.is_none() {
            self.focused = Some(pane);
        }
    }

    pub fn remove(&mut self, pane: PaneId) {
        self.panes.retain(|p| *p != pane);
        if self.focused == Some(pane) {
            self.focused = self.panes.first().copied();
        }
    }

    /// Returns false when the pane is unknown.
    pub fn focus(&mut self, pane: PaneId) -> bool {
        if self.panes.contains(&pane) {
            self.focused = Some(pane);
            true
        } else {
            false
        }
    }

    /// Focused pane, falling back to the first registered pane.
    pub fn active(&self) -> Option<PaneId> {
        self.focused.or_else(|| self.panes.first().copied())
    }

    pub fn panes(&self) -> &[PaneId] {
        &self.panes
    }

    pub fn is_empty(&self) -> bool {
        self.panes.is_empty()
    }
}

/// Everything the dispatch loop needs from the editor proper.
pub trait Workspace: StatusSink {
    /// Paint tabs, panes and the info bar.
    fn render(&mut self, area: Rect, buf: &mut Buffer);

    /// True while the info bar owns input (command prompt, search, ...).
    fn prompt_active(&self) -> bool;

    fn handle_status_event(&mut self, event: &Event);

    /// Normal editor routing for keys, paste and mouse.
    fn handle_editor_event(&mut self, event: &Event);

    fn focus(&self) -> &FocusTracker;

    /// Run a named command against `pane`. Unknown commands are errors.
    fn execute(&mut self, pane: PaneId, name: &str, args: &[String]) -> Result<()>;

    /// Open an empty buffer in a new pane; the fallback when nothing has focus.
    fn open_blank(&mut self) -> Result<()>;

    fn autosave(&mut self);

    fn close_terminals(&mut self);

    /// Runs after every routed input event.
    fn after_event(&mut self) -> Result<()> {
        Ok(())
    }

    fn quit_requested(&self) -> bool {
        false
    }

    /// Release buffers that have no unsaved changes.
    fn finalize_unmodified(&mut self);

    /// Text the editor buffered for stdout while the screen was active.
    fn take_stdout(&mut self) -> String {
        String::new()
    }
}

/// Execute `name` on the focused pane.
///
/// With no pane at all, opens a blank one once and retries; the error names
/// both failures when that fallback does not produce a pane.
pub fn run_command(workspace: &mut dyn Workspace, name: &str, args: &[String]) -> Result<()> {
    let pane = match workspace.focus().active() {
        Some(pane) => pane,
        None => {
            log_debug(&format!(
                "no focused pane for \"{name}\"; opening a blank one"
            ));
            workspace.open_blank().with_context(|| {
                format!(
                    "no pane available to run \"{name}\" and opening a blank buffer failed"
                )
            })?;
            workspace
                .focus()
                .active()
                .ok_or_else(|| anyhow!("blank buffer opened but still no pane for \"{name}\""))?
        }
    };
    workspace.execute(pane, name, args)
}

/// Parse a prompt-style line (`tab "my file.txt"`) and run it.
pub fn run_command_line(workspace: &mut dyn Workspace, line: &str) -> Result<()> {
    let words = shell_words::split(line.trim())
        .with_context(|| format!("failed to parse command line {line:?}"))?;
    let Some((name, args)) = words.split_first() else {
        return Ok(());
    };
    run_command(workspace, name, args)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::test_support::FakeWorkspace;

    #[test]
    fn focus_tracker_first_pane_takes_focus() {
        let mut focus = FocusTracker::new();
        assert_eq!(focus.active(), None);
        focus.add(PaneId(1));
        focus.add(PaneId(2));
        assert_eq!(focus.active(), Some(PaneId(1)));
        assert!(focus.focus(PaneId(2)));
        assert_eq!(focus.active(), Some(PaneId(2)));
        assert!(!focus.focus(PaneId(9)));
    }

    #[test]
    fn focus_tracker_refocuses_after_remove() {
        let mut focus = FocusTracker::new();
        focus.add(PaneId(1));
        focus.add(PaneId(2));
        focus.focus(PaneId(2));
        focus.remove(PaneId(2));
        assert_eq!(focus.active(), Some(PaneId(1)));
        focus.remove(PaneId(1));
        assert!(focus.is_empty());
        assert_eq!(focus.active(), None);
    }

    #[test]
    fn run_command_targets_focused_pane() {
        let mut ws = FakeWorkspace::with_pane();
        run_command(&mut ws, "vsplit", &[]).expect("vsplit");
        assert_eq!(ws.commands, vec![(PaneId(1), "vsplit".to_string(), vec![])]);
    }

    #[test]
    fn run_command_opens_blank_pane_once_when_none_focused() {
        let mut ws = FakeWorkspace::new();
        run_command(&mut ws, "hsplit", &[]).expect("hsplit after fallback");
        assert_eq!(ws.blank_opens, 1);
        assert_eq!(ws.commands, vec![(PaneId(1), "hsplit".to_string(), vec![])]);
    }

    #[test]
    fn run_command_reports_failed_fallback() {
        let mut ws = FakeWorkspace::new();
        ws.open_fails = true;
        let err = run_command(&mut ws, "tab", &[]).expect_err("no pane");
        let text = format!("{err:#}");
        assert!(text.contains("opening a blank buffer failed"));
        assert!(text.contains("open refused"));
        assert_eq!(ws.blank_opens, 1);
        assert!(ws.commands.is_empty());
    }

    #[test]
    fn run_command_does_not_retry_when_fallback_leaves_no_pane() {
        let mut ws = FakeWorkspace::new();
        ws.open_creates_pane = false;
        let err = run_command(&mut ws, "tab", &[]).expect_err("still no pane");
        assert!(err.to_string().contains("still no pane"));
        assert_eq!(ws.blank_opens, 1);
    }

    #[test]
    fn run_command_surfaces_unknown_command() {
        let mut ws = FakeWorkspace::with_pane();
        let err = run_command(&mut ws, "frobnicate", &[]).expect_err("unknown");
        assert!(err.to_string().contains("unknown command"));
    }

    #[test]
    fn run_command_line_splits_quoted_args() {
        let mut ws = FakeWorkspace::with_pane();
        run_command_line(&mut ws, r#"tab "my notes.md""#).expect("tab");
        let args = vec!["my notes.md".to_string()];
        assert_eq!(ws.commands, vec![(PaneId(1), "tab".to_string(), args)]);
        run_command_line(&mut ws, "   ").expect("blank line is a no-op");
        assert_eq!(ws.commands.len(), 1);
    }
}
