use ratatui::buffer::Buffer;
use ratatui::layout::Rect;
use ratatui::style::{Modifier, Style};

use super::controller::FormController;
use crate::draw::{draw_box, overlay_rect, put_row};

/// Columns between the borders.
pub const FORM_CONTENT_WIDTH: u16 = 52;
pub const FORM_LABEL_WIDTH: usize = 18;
pub const FORM_FOOTER: &str = "↑/↓ move  ←/→ change  Enter next/confirm  Esc cancel";
/// Rows around the field list: borders, spacers, footer.
const FORM_CHROME_ROWS: usize = 6;

pub fn form_height(field_count: usize) -> usize {
    field_count + FORM_CHROME_ROWS
}

pub fn form_row(label: &str, value: &str) -> String {
    format!("{label:<width$}: {value}", width = FORM_LABEL_WIDTH)
}

pub fn render_form(form: &FormController, area: Rect, buf: &mut Buffer) {
    if !form.is_active() {
        return;
    }
    let height = u16::try_from(form_height(form.fields().len())).unwrap_or(u16::MAX);
    let rect = overlay_rect(area, FORM_CONTENT_WIDTH, height);
    let base = Style::default();
    draw_box(buf, rect, &format!(" {} ", form.title()), base);

    // One column of padding inside each border.
    let text_x = rect.x + 2;
    let text_width = rect.width.saturating_sub(4);
    let footer_y = rect.bottom().saturating_sub(2);
    for (idx, field) in form.fields().iter().enumerate() {
        let y = rect.y + 2 + idx as u16;
        if y >= footer_y {
            break;
        }
        let style = if idx == form.cursor() {
            base.add_modifier(Modifier::REVERSED)
        } else {
            base
        };
        let row = form_row(&field.label, &field.display_value());
        put_row(buf, text_x, y, &row, text_width, style);
    }

    if footer_y > rect.y {
        put_row(buf, text_x, footer_y, FORM_FOOTER, text_width, base);
    }
}
