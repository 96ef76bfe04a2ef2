//! Toast overlay for the currently visible notification.

use ratatui::{
    layout::Rect,
    style::Style,
    text::Line,
    widgets::{Block, Borders, Clear, Paragraph, Wrap},
};

use crate::notify::Notification;
use crate::ui::util::{clock, toast_color, truncate};

pub fn draw_toast(f: &mut ratatui::Frame<'_>, area: Rect, toast: &Notification) {
    let width = area.width.min(44).max(20);
    let height = 4u16;
    if area.width <= width || area.height <= height {
        return;
    }
    // Bottom-right corner, one cell of margin.
    let rect = Rect {
        x: area.x + area.width - width - 1,
        y: area.y + area.height - height - 1,
        width,
        height,
    };

    let color = toast_color(toast.status);
    let block = Block::default()
        .borders(Borders::ALL)
        .border_style(Style::default().fg(color))
        .title(format!(
            "{} [{}]",
            truncate(&toast.title, width.saturating_sub(12) as usize),
            clock(toast.timestamp)
        ));
    let body = Paragraph::new(Line::from(toast.message.clone()))
        .wrap(Wrap { trim: true })
        .block(block);

    f.render_widget(Clear, rect);
    f.render_widget(body, rect);
}
