//! Top header with lot totals and per-feed status.

use ratatui::{
    layout::Rect,
    style::Style,
    text::Span,
    widgets::{Block, Borders},
};

use crate::stats::LotState;
use crate::ui::util::status_color;

pub fn draw_header(f: &mut ratatui::Frame<'_>, area: Rect, lot: &LotState) {
    let title = format!(
        "parkwatch — lot {}/{} occupied | predictions: {} | barrier: {}  (q quit, r reconnect, d dismiss)",
        lot.total_occupied(),
        lot.total_spots(),
        lot.system_status().label(),
        lot.barrier_status().label(),
    );
    let styled = Span::styled(title, Style::default().fg(status_color(lot.system_status())));
    f.render_widget(Block::default().title(styled).borders(Borders::BOTTOM), area);
}
