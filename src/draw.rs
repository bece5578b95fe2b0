//! Box drawing shared by the menu and form overlays.

use ratatui::buffer::Buffer;
use ratatui::layout::Rect;
use ratatui::style::Style;
use unicode_width::{UnicodeWidthChar, UnicodeWidthStr};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct BorderSet {
    pub top_left: &'static str,
    pub top_right: &'static str,
    pub bottom_left: &'static str,
    pub bottom_right: &'static str,
    pub horizontal: &'static str,
    pub vertical: &'static str,
}

pub const LIGHT_BORDERS: BorderSet = BorderSet {
    top_left: "┌",
    top_right: "┐",
    bottom_left: "└",
    bottom_right: "┘",
    horizontal: "─",
    vertical: "│",
};

pub fn display_width(text: &str) -> usize {
    UnicodeWidthStr::width(text)
}

/// Cut `text` to at most `width` columns without splitting a wide glyph.
pub fn truncate_to_width(text: &str, width: usize) -> String {
    let mut used = 0;
    let mut out = String::with_capacity(text.len());
    for ch in text.chars() {
        let w = UnicodeWidthChar::width(ch).unwrap_or(0);
        if used + w > width {
            break;
        }
        used += w;
        out.push(ch);
    }
    out
}

/// Truncate or space-pad to exactly `width` columns.
pub fn pad_right(text: &str, width: usize) -> String {
    let mut out = truncate_to_width(text, width);
    let fill = width.saturating_sub(display_width(&out));
    out.extend(std::iter::repeat(' ').take(fill));
    out
}

/// Outer rect for a box with `content_width` columns between the borders,
/// centered in `screen` and clipped to it.
pub fn overlay_rect(screen: Rect, content_width: u16, height: u16) -> Rect {
    let width = content_width.saturating_add(2).min(screen.width);
    let height = height.min(screen.height);
    Rect {
        x: screen.x + (screen.width - width) / 2,
        y: screen.y + (screen.height - height) / 2,
        width,
        height,
    }
}

/// Clear `area`, draw its border and center `title` on the top edge.
pub fn draw_box(buf: &mut Buffer, area: Rect, title: &str, style: Style) {
    let area = area.intersection(buf.area);
    if area.width < 2 || area.height < 2 {
        return;
    }
    let borders = LIGHT_BORDERS;
    let left = area.x;
    let right = area.right() - 1;
    let top = area.y;
    let bottom = area.bottom() - 1;

    for y in top..=bottom {
        for x in left..=right {
            let symbol = match (x, y) {
                (x, y) if x == left && y == top => borders.top_left,
                (x, y) if x == right && y == top => borders.top_right,
                (x, y) if x == left && y == bottom => borders.bottom_left,
                (x, y) if x == right && y == bottom => borders.bottom_right,
                (_, y) if y == top || y == bottom => borders.horizontal,
                (x, _) if x == left || x == right => borders.vertical,
                _ => " ",
            };
            buf.get_mut(x, y).reset();
            buf.get_mut(x, y).set_symbol(symbol).set_style(style);
        }
    }

    let inner = usize::from(area.width - 2);
    if inner > 0 && !title.is_empty() {
        let title = truncate_to_width(title, inner);
        let offset = (inner - display_width(&title)) / 2;
        buf.set_stringn(left + 1 + offset as u16, top, &title, inner, style);
    }
}

/// Write one content row padded to `width`, clipped to the buffer.
pub fn put_row(buf: &mut Buffer, x: u16, y: u16, text: &str, width: u16, style: Style) {
    let area = buf.area;
    if y < area.y || y >= area.bottom() || x < area.x || x >= area.right() {
        return;
    }
    let width = usize::from(width.min(area.right() - x));
    buf.set_stringn(x, y, pad_right(text, width), width, style);
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::test_support::row_text;

    #[test]
    fn pad_right_respects_wide_glyphs() {
        assert_eq!(pad_right("ab", 4), "ab  ");
        assert_eq!(pad_right("abcdef", 3), "abc");
        assert_eq!(display_width(&pad_right("日本語", 5)), 5);
        assert_eq!(truncate_to_width("日本語", 5), "日本");
    }

    #[test]
    fn overlay_rect_centers_and_clips() {
        let screen = Rect::new(0, 0, 80, 24);
        assert_eq!(overlay_rect(screen, 30, 9), Rect::new(24, 7, 32, 9));
        let tiny = Rect::new(0, 0, 10, 4);
        assert_eq!(overlay_rect(tiny, 30, 9), Rect::new(0, 0, 10, 4));
    }

    #[test]
    fn draw_box_paints_border_and_title() {
        let mut buf = Buffer::empty(Rect::new(0, 0, 12, 4));
        draw_box(&mut buf, Rect::new(0, 0, 12, 4), " Hi ", Style::default());
        assert_eq!(row_text(&buf, 0), "┌─── Hi ───┐");
        assert_eq!(row_text(&buf, 1), "│          │");
        assert_eq!(row_text(&buf, 3), "└──────────┘");
    }

    #[test]
    fn put_row_ignores_rows_outside_buffer() {
        let mut buf = Buffer::empty(Rect::new(0, 0, 5, 1));
        put_row(&mut buf, 0, 3, "hello", 5, Style::default());
        put_row(&mut buf, 2, 0, "hello", 10, Style::default());
        assert_eq!(row_text(&buf, 0), "  hel");
    }
}
