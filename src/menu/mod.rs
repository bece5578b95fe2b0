//! Modal menu with nested submenus.

mod default;
mod node;
mod render;
mod stack;

pub use default::{default_menu, type_text, ALIVE_TEXT};
pub use node::{ActionContext, MenuAction, MenuItem, MenuNode, MenuPayload};
pub use render::{
    menu_content_width, menu_height, menu_line, render_menu, MENU_FOOTER, MENU_MIN_WIDTH,
};
pub use stack::{MenuStack, MENU_ERROR_PREFIX};
