//! The menu tree opened by the menu chord unless the embedder supplies one.

use anyhow::Result;
use crossterm::event::{Event, KeyCode, KeyEvent, KeyModifiers};
use std::thread;
use time::format_description::well_known::Rfc3339;
use time::OffsetDateTime;

use super::node::{ActionContext, MenuItem, MenuNode};
use crate::deferred::DeferredSender;
use crate::log_debug;
use crate::workspace::{run_command, Workspace};

pub const ALIVE_TEXT: &str = "still alive!";

/// Feed `text` to the editor as if typed, optionally followed by Enter.
pub fn type_text(workspace: &mut dyn Workspace, text: &str, enter: bool) {
    for ch in text.chars() {
        let key = KeyEvent::new(KeyCode::Char(ch), KeyModifiers::NONE);
        workspace.handle_editor_event(&Event::Key(key));
    }
    if enter {
        let key = KeyEvent::new(KeyCode::Enter, KeyModifiers::NONE);
        workspace.handle_editor_event(&Event::Key(key));
    }
}

/// Produce text off the loop thread, then type it from the loop thread.
fn type_later<F>(deferred: &DeferredSender, produce: F, enter: bool)
where
    F: FnOnce() -> Result<String> + Send + 'static,
{
    let deferred = deferred.clone();
    thread::spawn(move || {
        let text = match produce() {
            Ok(text) => text,
            Err(err) => {
                log_debug(&format!("deferred insert failed: {err:#}"));
                return;
            }
        };
        if let Err(err) = deferred.submit(move |ws| type_text(ws, &text, enter)) {
            log_debug(&format!("{err:#}"));
        }
    });
}

fn command_item(
    key: char,
    title: &str,
    name: &'static str,
    args: &'static [&'static str],
    done: &'static str,
) -> MenuItem {
    MenuItem::action(key, title, move |ctx: &mut ActionContext<'_>| {
        let args: Vec<String> = args.iter().map(|arg| arg.to_string()).collect();
        run_command(ctx.workspace, name, &args)?;
        Ok(Some(done.to_string()))
    })
}

fn insertions() -> Result<MenuNode> {
    MenuNode::new(
        "Insertions",
        vec![
            command_item(
                'H',
                "Hsplit (above/below)",
                "hsplit",
                &[],
                "Horizontal split created",
            ),
            command_item(
                'V',
                "Vsplit (side by side)",
                "vsplit",
                &[],
                "Vertical split created",
            ),
            command_item('T', "New tab", "tab", &[], "Tab created"),
            command_item(
                'Y',
                "Tab with README.md",
                "tab",
                &["README.md"],
                "Tab created with README.md",
            ),
            MenuItem::action('a', format!("Insert \"{ALIVE_TEXT}\""), |ctx| {
                type_later(ctx.deferred, || Ok(ALIVE_TEXT.to_string()), false);
                Ok(Some(format!("Inserted: \"{ALIVE_TEXT}\"")))
            }),
            MenuItem::action('t', "Insert timestamp (RFC 3339)", |ctx| {
                type_later(
                    ctx.deferred,
                    || Ok(OffsetDateTime::now_utc().format(&Rfc3339)?),
                    true,
                );
                Ok(Some("Timestamp inserted".to_string()))
            }),
        ],
    )
}

fn tools() -> Result<MenuNode> {
    MenuNode::new(
        "Tools",
        vec![
            MenuItem::action('1', format!("Echo status: {ALIVE_TEXT}"), |_| {
                Ok(Some(format!("echo: {ALIVE_TEXT} ✔")))
            }),
            MenuItem::action('2', "Custom task", |_| {
                Ok(Some("custom task finished.".to_string()))
            }),
        ],
    )
}

fn forms() -> Result<MenuNode> {
    MenuNode::new(
        "Forms",
        vec![MenuItem::action('f', "Open form…", |ctx| {
            ctx.request_form();
            Ok(Some("form: opened".to_string()))
        })],
    )
}

pub fn default_menu() -> Result<MenuNode> {
    MenuNode::new(
        "Menu",
        vec![
            MenuItem::submenu('i', "Insertions →", insertions()?),
            MenuItem::submenu('f', "Tools →", tools()?),
            MenuItem::submenu('o', "Forms →", forms()?),
            MenuItem::action('q', "Close", |_| Ok(Some("menu: closed".to_string()))),
        ],
    )
}
