use crossterm::event::{KeyCode, KeyEvent, KeyModifiers};

use super::node::{ActionContext, MenuNode, MenuPayload};
use crate::log_debug;

/// Prefix for action failures surfaced on the status bar.
pub const MENU_ERROR_PREFIX: &str = "menu: error: ";

/// Path from the root menu to the displayed submenu.
///
/// The root is owned here; deeper levels are addressed by item index so the
/// tree keeps exclusive ownership of every child node.
#[derive(Debug, Default)]
pub struct MenuStack {
    root: Option<MenuNode>,
    path: Vec<usize>,
}

fn node_at<'a>(root: &'a MenuNode, path: &[usize]) -> Option<&'a MenuNode> {
    let mut node = root;
    for &idx in path {
        node = match &node.items.get(idx)?.payload {
            MenuPayload::Submenu(child) => child,
            MenuPayload::Action(_) => return None,
        };
    }
    Some(node)
}

fn node_at_mut<'a>(root: &'a mut MenuNode, path: &[usize]) -> Option<&'a mut MenuNode> {
    let mut node = root;
    for &idx in path {
        node = match &mut node.items.get_mut(idx)?.payload {
            MenuPayload::Submenu(child) => child,
            MenuPayload::Action(_) => return None,
        };
    }
    Some(node)
}

impl MenuStack {
    pub fn new() -> Self {
        Self::default()
    }

    /// Replace whatever is showing with `root`, selection at the top.
    pub fn open(&mut self, mut root: MenuNode) {
        root.selected = 0;
        log_debug(&format!("menu opened: {}", root.title));
        self.root = Some(root);
        self.path.clear();
    }

    pub fn close_all(&mut self) {
        if self.root.take().is_some() {
            log_debug("menu closed");
        }
        self.path.clear();
    }

    pub fn is_active(&self) -> bool {
        self.root.is_some()
    }

    pub fn depth(&self) -> usize {
        if self.root.is_some() {
            self.path.len() + 1
        } else {
            0
        }
    }

    pub fn current(&self) -> Option<&MenuNode> {
        node_at(self.root.as_ref()?, &self.path)
    }

    fn current_mut(&mut self) -> Option<&mut MenuNode> {
        node_at_mut(self.root.as_mut()?, &self.path)
    }

    /// Drop one level; leaving the root closes the menu.
    pub fn pop(&mut self) {
        if self.path.pop().is_none() {
            self.close_all();
        }
    }

    /// Route one key press. Returns false only when the menu is inactive.
    pub fn handle_key(&mut self, key: &KeyEvent, ctx: &mut ActionContext<'_>) -> bool {
        if !self.is_active() {
            return false;
        }
        let Some(current) = self.current_mut() else {
            self.close_all();
            return true;
        };
        let chord_modifiers = KeyModifiers::CONTROL | KeyModifiers::ALT;
        let unmodified = !key.modifiers.intersects(chord_modifiers);

        match key.code {
            KeyCode::Esc | KeyCode::Backspace => self.pop(),
            KeyCode::Up => current.move_up(),
            KeyCode::Down => current.move_down(),
            KeyCode::Enter => {
                let idx = current.selected;
                self.select(idx, ctx);
            }
            KeyCode::Char(ch) if unmodified => match current.index_of_key(ch) {
                Some(idx) => self.select(idx, ctx),
                None => self.pop(),
            },
            _ => self.pop(),
        }
        true
    }

    fn select(&mut self, idx: usize, ctx: &mut ActionContext<'_>) {
        let Some(current) = self.current_mut() else {
            self.close_all();
            return;
        };
        let Some(item) = current.items.get_mut(idx) else {
            return;
        };

        if let MenuPayload::Submenu(child) = &mut item.payload {
            if child.items.is_empty() {
                return;
            }
            child.selected = 0;
            log_debug(&format!("menu push: {}", child.title));
            self.path.push(idx);
            return;
        }

        // Actions always close the whole stack before they run.
        let path = std::mem::take(&mut self.path);
        let Some(root) = self.root.take() else {
            return;
        };
        let Some(item) = node_at(&root, &path).and_then(|node| node.items.get(idx)) else {
            return;
        };
        let MenuPayload::Action(action) = &item.payload else {
            return;
        };
        log_debug(&format!("menu action: {}", item.title));
        match action(ctx) {
            Ok(Some(message)) => ctx.workspace.message(&message),
            Ok(None) => {}
            Err(err) => {
                log_debug(&format!("menu action failed: {err:#}"));
                let text = format!("{MENU_ERROR_PREFIX}{err:#}");
                ctx.workspace.message(&text);
            }
        }
    }
}
