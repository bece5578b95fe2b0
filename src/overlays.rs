//! Menu and form overlays layered over normal editor routing.

use anyhow::Result;
use crossterm::event::{Event, KeyEvent, KeyEventKind};
use ratatui::buffer::Buffer;
use ratatui::layout::Rect;
use std::time::{Duration, Instant};

use crate::alt_key::{AltKeyDisambiguator, Chord};
use crate::deferred::DeferredSender;
use crate::form::{render_form, FormController, FormOutcome, FormSpec, FORM_CANCELLED};
use crate::menu::{default_menu, render_menu, ActionContext, MenuNode, MenuStack, MENU_ERROR_PREFIX};
use crate::workspace::Workspace;
use crate::{log_debug, log_debug_content};

pub const FORM_ERROR_PREFIX: &str = "form: error: ";

/// Builds a fresh root menu each time the menu chord fires.
pub type MenuBuilder = Box<dyn Fn() -> Result<MenuNode>>;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum OverlayMode {
    None,
    Menu,
    Form,
}

/// All modal state owned by the dispatch loop.
pub struct OverlaySession {
    menu: MenuStack,
    form: FormController,
    form_spec: FormSpec,
    build_menu: MenuBuilder,
    chords: AltKeyDisambiguator,
}

impl std::fmt::Debug for OverlaySession {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("OverlaySession")
            .field("mode", &self.mode())
            .field("menu_depth", &self.menu.depth())
            .field("form_title", &self.form_spec.title)
            .field("chord_window", &self.chords.window())
            .finish()
    }
}

impl OverlaySession {
    pub fn new(form_spec: FormSpec, chord_window: Duration) -> Self {
        Self {
            menu: MenuStack::new(),
            form: FormController::new(),
            form_spec,
            build_menu: Box::new(default_menu),
            chords: AltKeyDisambiguator::new(chord_window),
        }
    }

    pub fn with_menu_builder<F>(mut self, builder: F) -> Self
    where
        F: Fn() -> Result<MenuNode> + 'static,
    {
        self.build_menu = Box::new(builder);
        self
    }

    pub fn mode(&self) -> OverlayMode {
        if self.form.is_active() {
            OverlayMode::Form
        } else if self.menu.is_active() {
            OverlayMode::Menu
        } else {
            OverlayMode::None
        }
    }

    pub fn menu(&self) -> &MenuStack {
        &self.menu
    }

    pub fn form(&self) -> &FormController {
        &self.form
    }

    /// Show the root menu; the form, if open, is closed.
    pub fn open_menu(&mut self, workspace: &mut dyn Workspace) {
        self.form.close();
        match (self.build_menu)() {
            Ok(root) => self.menu.open(root),
            Err(err) => {
                log_debug(&format!("menu build failed: {err:#}"));
                workspace.message(&format!("{MENU_ERROR_PREFIX}{err:#}"));
            }
        }
    }

    /// Show the form; the menu, if open, is closed.
    pub fn open_form(&mut self, workspace: &mut dyn Workspace) {
        self.menu.close_all();
        if let Err(err) = self.form.open(&self.form_spec) {
            log_debug(&format!("form open failed: {err:#}"));
            workspace.message(&format!("{FORM_ERROR_PREFIX}{err:#}"));
        }
    }

    pub fn close_all(&mut self) {
        self.menu.close_all();
        self.form.close();
    }

    /// Paint the menu, then the form on top.
    pub fn render(&self, area: Rect, buf: &mut Buffer) {
        if let Some(node) = self.menu.current() {
            render_menu(node, area, buf);
        }
        render_form(&self.form, area, buf);
    }

    /// Apply modal routing. Returns the event when it should take the
    /// default editor path.
    pub fn route(
        &mut self,
        event: Event,
        workspace: &mut dyn Workspace,
        deferred: &DeferredSender,
        now: Instant,
    ) -> Option<Event> {
        match event {
            Event::Key(key) if key.kind == KeyEventKind::Release => None,
            Event::Key(key) => {
                if self.route_key(&key, workspace, deferred, now) {
                    None
                } else {
                    Some(Event::Key(key))
                }
            }
            Event::Resize(..) => Some(event),
            _ if self.mode() != OverlayMode::None => {
                log_debug("input swallowed while an overlay is open");
                None
            }
            other => Some(other),
        }
    }

    fn route_key(
        &mut self,
        key: &KeyEvent,
        workspace: &mut dyn Workspace,
        deferred: &DeferredSender,
        now: Instant,
    ) -> bool {
        self.chords.note_key(key, now);

        if self.chords.take(Chord::OpenForm, key, now) {
            self.open_form(workspace);
            return true;
        }
        if self.form.is_active() {
            match self.form.handle_key(key) {
                FormOutcome::Cancelled => workspace.message(FORM_CANCELLED),
                FormOutcome::Submitted(submission) => {
                    log_debug_content(&format!("form summary: {}", submission.summary()));
                    workspace.message(&submission.summary());
                }
                FormOutcome::Edited | FormOutcome::Ignored => {}
            }
            return true;
        }

        if self.chords.take(Chord::OpenMenu, key, now) {
            self.open_menu(workspace);
            return true;
        }
        if self.menu.is_active() {
            let mut ctx = ActionContext::new(workspace, deferred);
            self.menu.handle_key(key, &mut ctx);
            if ctx.form_requested() {
                self.open_form(ctx.workspace);
            }
            return true;
        }
        false
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::deferred::deferred_queue;
    use crate::menu::MenuItem;
    use crate::test_support::{alt_key, char_key, key, release, FakeWorkspace};
    use anyhow::bail;
    use crossterm::event::KeyCode;

    const WINDOW: Duration = Duration::from_millis(200);

    struct Rig {
        session: OverlaySession,
        ws: FakeWorkspace,
        sender: DeferredSender,
        now: Instant,
    }

    impl Rig {
        fn new() -> Self {
            let (sender, _queue) = deferred_queue();
            Self {
                session: OverlaySession::new(FormSpec::default(), WINDOW),
                ws: FakeWorkspace::with_pane(),
                sender,
                now: Instant::now(),
            }
        }

        fn after(&mut self, millis: u64, event: KeyEvent) -> Option<Event> {
            self.now += Duration::from_millis(millis);
            self.session
                .route(Event::Key(event), &mut self.ws, &self.sender, self.now)
        }

        fn send(&mut self, event: Event) -> Option<Event> {
            self.session
                .route(event, &mut self.ws, &self.sender, self.now)
        }
    }

    #[test]
    fn escape_then_m_opens_menu_and_escape_still_reaches_editor() {
        let mut rig = Rig::new();
        let esc = rig.after(0, key(KeyCode::Esc));
        assert_eq!(esc, Some(Event::Key(key(KeyCode::Esc))));
        assert_eq!(rig.after(50, char_key('m')), None);
        assert_eq!(rig.session.mode(), OverlayMode::Menu);
    }

    #[test]
    fn slow_escape_m_is_plain_typing() {
        let mut rig = Rig::new();
        rig.after(0, key(KeyCode::Esc));
        let typed = rig.after(250, char_key('m'));
        assert_eq!(typed, Some(Event::Key(char_key('m'))));
        assert_eq!(rig.session.mode(), OverlayMode::None);
    }

    #[test]
    fn form_chord_closes_menu() {
        let mut rig = Rig::new();
        rig.after(0, alt_key('m'));
        assert_eq!(rig.session.mode(), OverlayMode::Menu);
        rig.after(0, char_key('\u{0192}'));
        assert_eq!(rig.session.mode(), OverlayMode::Form);
        assert!(!rig.session.menu().is_active());
    }

    #[test]
    fn menu_chord_is_typed_into_open_form() {
        let mut rig = Rig::new();
        rig.after(0, alt_key('f'));
        assert_eq!(rig.session.mode(), OverlayMode::Form);
        assert_eq!(rig.after(0, char_key('\u{00B5}')), None);
        assert_eq!(rig.session.mode(), OverlayMode::Form);
        assert_eq!(rig.session.form().fields()[0].display_value(), "\u{00B5}");
    }

    #[test]
    fn form_commit_reports_summary() {
        let mut rig = Rig::new();
        rig.after(0, alt_key('f'));
        for _ in 0..4 {
            rig.after(0, key(KeyCode::Tab));
        }
        assert_eq!(rig.session.mode(), OverlayMode::None);
        assert_eq!(
            rig.ws.last_message(),
            Some("OK: Name=  Age=18  Terms=false  Language=Go")
        );
        assert!(rig.ws.editor_events.is_empty());
    }

    #[test]
    fn form_escape_reports_cancel() {
        let mut rig = Rig::new();
        rig.after(0, alt_key('f'));
        rig.after(0, key(KeyCode::Esc));
        assert_eq!(rig.session.mode(), OverlayMode::None);
        assert_eq!(rig.ws.last_message(), Some(FORM_CANCELLED));
    }

    #[test]
    fn menu_forms_entry_switches_to_form() {
        let mut rig = Rig::new();
        rig.after(0, alt_key('m'));
        rig.after(0, char_key('o'));
        rig.after(0, char_key('f'));
        assert_eq!(rig.session.mode(), OverlayMode::Form);
        assert_eq!(rig.ws.last_message(), Some("form: opened"));
    }

    #[test]
    fn paste_and_mouse_are_swallowed_while_modal() {
        let mut rig = Rig::new();
        assert_eq!(
            rig.send(Event::Paste("x".to_string())),
            Some(Event::Paste("x".to_string()))
        );
        rig.after(0, alt_key('m'));
        assert_eq!(rig.send(Event::Paste("x".to_string())), None);
        assert_eq!(rig.send(Event::FocusLost), None);
        let resize = Event::Resize(100, 40);
        assert_eq!(rig.send(resize.clone()), Some(resize));
        assert_eq!(rig.session.mode(), OverlayMode::Menu);
    }

    #[test]
    fn key_release_is_ignored() {
        let mut rig = Rig::new();
        assert_eq!(rig.after(0, release(alt_key('m'))), None);
        assert_eq!(rig.session.mode(), OverlayMode::None);
    }

    #[test]
    fn custom_menu_builder_is_used_and_errors_surface() {
        let mut rig = Rig::new();
        let custom = || {
            let zap = MenuItem::action('z', "Zap", |_| Ok(Some("zapped".to_string())));
            MenuNode::new("Custom", vec![zap])
        };
        rig.session = OverlaySession::new(FormSpec::default(), WINDOW)
            .with_menu_builder(custom);
        rig.after(0, alt_key('m'));
        let title = rig.session.menu().current().map(MenuNode::title);
        assert_eq!(title, Some("Custom"));
        rig.after(0, char_key('z'));
        assert_eq!(rig.ws.last_message(), Some("zapped"));

        rig.session = OverlaySession::new(FormSpec::default(), WINDOW)
            .with_menu_builder(|| bail!("menu source offline"));
        rig.after(0, alt_key('m'));
        assert_eq!(rig.session.mode(), OverlayMode::None);
        assert_eq!(
            rig.ws.last_message(),
            Some("menu: error: menu source offline")
        );
    }

    #[test]
    fn empty_form_spec_reports_instead_of_opening() {
        let mut rig = Rig::new();
        rig.session = OverlaySession::new(
            FormSpec {
                title: "Blank".to_string(),
                fields: Vec::new(),
            },
            WINDOW,
        );
        rig.after(0, alt_key('f'));
        assert_eq!(rig.session.mode(), OverlayMode::None);
        let message = rig.ws.last_message().expect("message");
        assert!(message.starts_with(FORM_ERROR_PREFIX));
    }

    #[test]
    fn render_layers_form_over_menu_area() {
        let mut rig = Rig::new();
        rig.after(0, alt_key('f'));
        let area = Rect::new(0, 0, 80, 24);
        let mut buf = Buffer::empty(area);
        rig.session.render(area, &mut buf);
        assert!(crate::test_support::buffer_contains(&buf, " Form "));
    }
}
