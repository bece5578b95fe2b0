//! Menu overlay rendering into a ratatui buffer.

use ratatui::buffer::Buffer;
use ratatui::layout::Rect;
use ratatui::style::{Modifier, Style};

use super::node::{MenuItem, MenuNode};
use crate::draw::{display_width, draw_box, overlay_rect, put_row};

pub const MENU_FOOTER: &str = "↑/↓, Enter, keys, Esc/Backspace: back";
pub const MENU_MIN_WIDTH: usize = 30;
/// Rows around the item list: borders, a spacer on each side, footer.
const MENU_CHROME_ROWS: usize = 5;

fn ends_with_arrow(text: &str) -> bool {
    text.ends_with('→')
}

pub fn menu_line(item: &MenuItem) -> String {
    let mut line = match item.quick_key() {
        Some(key) => format!("[{key}] {}", item.title()),
        None => format!("    {}", item.title()),
    };
    if item.is_submenu() && !ends_with_arrow(&line) {
        line.push_str(" →");
    }
    line
}

/// Content width between the borders.
pub fn menu_content_width(node: &MenuNode) -> usize {
    node.items()
        .iter()
        .map(|item| display_width(&menu_line(item)))
        .chain([display_width(node.title()) + 2, MENU_MIN_WIDTH])
        .max()
        .unwrap_or(MENU_MIN_WIDTH)
}

pub fn menu_height(node: &MenuNode) -> usize {
    node.items().len() + MENU_CHROME_ROWS
}

pub fn render_menu(node: &MenuNode, area: Rect, buf: &mut Buffer) {
    let content = menu_content_width(node);
    let rect = overlay_rect(
        area,
        u16::try_from(content).unwrap_or(u16::MAX),
        u16::try_from(menu_height(node)).unwrap_or(u16::MAX),
    );
    let base = Style::default();
    draw_box(buf, rect, &format!(" {} ", node.title()), base);
    if rect.height < 2 {
        return;
    }

    let inner = rect.width.saturating_sub(2);
    let footer_y = rect.bottom().saturating_sub(2);
    for (idx, item) in node.items().iter().enumerate() {
        let y = rect.y + 2 + idx as u16;
        if y >= footer_y {
            break;
        }
        let style = if idx == node.selected() {
            base.add_modifier(Modifier::REVERSED)
        } else {
            base
        };
        put_row(buf, rect.x + 1, y, &menu_line(item), inner, style);
    }

    if footer_y > rect.y {
        put_row(buf, rect.x + 1, footer_y, MENU_FOOTER, inner, base);
    }
}
