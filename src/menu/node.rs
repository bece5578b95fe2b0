use anyhow::{bail, Result};
use std::fmt;

use crate::deferred::DeferredSender;
use crate::workspace::Workspace;

/// What an action gets to touch while it runs on the loop thread.
pub struct ActionContext<'a> {
    pub workspace: &'a mut dyn Workspace,
    pub deferred: &'a DeferredSender,
    form_requested: bool,
}

impl<'a> ActionContext<'a> {
    pub fn new(workspace: &'a mut dyn Workspace, deferred: &'a DeferredSender) -> Self {
        Self {
            workspace,
            deferred,
            form_requested: false,
        }
    }

    /// Ask the overlay session to open the form once this action returns.
    pub fn request_form(&mut self) {
        self.form_requested = true;
    }

    pub fn form_requested(&self) -> bool {
        self.form_requested
    }
}

/// Returns an optional status message; errors are reported by the stack.
pub type MenuAction = Box<dyn Fn(&mut ActionContext<'_>) -> Result<Option<String>>>;

pub enum MenuPayload {
    Action(MenuAction),
    Submenu(MenuNode),
}

pub struct MenuItem {
    pub(crate) quick_key: Option<char>,
    pub(crate) title: String,
    pub(crate) payload: MenuPayload,
}

impl MenuItem {
    pub fn action<F>(
        quick_key: impl Into<Option<char>>,
        title: impl Into<String>,
        action: F,
    ) -> Self
    where
        F: Fn(&mut ActionContext<'_>) -> Result<Option<String>> + 'static,
    {
        Self {
            quick_key: quick_key.into(),
            title: title.into(),
            payload: MenuPayload::Action(Box::new(action)),
        }
    }

    pub fn submenu(
        quick_key: impl Into<Option<char>>,
        title: impl Into<String>,
        node: MenuNode,
    ) -> Self {
        Self {
            quick_key: quick_key.into(),
            title: title.into(),
            payload: MenuPayload::Submenu(node),
        }
    }

    pub fn quick_key(&self) -> Option<char> {
        self.quick_key
    }

    pub fn title(&self) -> &str {
        &self.title
    }

    pub fn is_submenu(&self) -> bool {
        matches!(self.payload, MenuPayload::Submenu(_))
    }
}

impl fmt::Debug for MenuItem {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let mut out = f.debug_struct("MenuItem");
        out.field("quick_key", &self.quick_key)
            .field("title", &self.title);
        match &self.payload {
            MenuPayload::Action(_) => out.field("payload", &"action"),
            MenuPayload::Submenu(node) => out.field("payload", node),
        };
        out.finish()
    }
}

#[derive(Debug)]
pub struct MenuNode {
    pub(crate) title: String,
    pub(crate) items: Vec<MenuItem>,
    pub(crate) selected: usize,
}

impl MenuNode {
    /// A menu with no items cannot be built.
    pub fn new(title: impl Into<String>, items: Vec<MenuItem>) -> Result<Self> {
        let title = title.into();
        if items.is_empty() {
            bail!("menu \"{title}\" has no items");
        }
        Ok(Self {
            title,
            items,
            selected: 0,
        })
    }

    pub fn title(&self) -> &str {
        &self.title
    }

    pub fn items(&self) -> &[MenuItem] {
        &self.items
    }

    pub fn selected(&self) -> usize {
        self.selected
    }

    pub fn move_up(&mut self) {
        if self.selected == 0 {
            self.selected = self.items.len().saturating_sub(1);
        } else {
            self.selected -= 1;
        }
    }

    pub fn move_down(&mut self) {
        if self.items.is_empty() {
            return;
        }
        self.selected = (self.selected + 1) % self.items.len();
    }

    /// Case-sensitive quick-key lookup.
    pub fn index_of_key(&self, key: char) -> Option<usize> {
        self.items
            .iter()
            .position(|item| item.quick_key == Some(key))
    }
}
