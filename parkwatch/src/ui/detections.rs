//! Detection breakdown: per-camera class counts from the latest frames.

use ratatui::{
    layout::Rect,
    style::{Color, Style},
    text::{Line, Span},
    widgets::{Block, Borders, Paragraph},
};

use crate::config::camera_title;
use crate::stats::{is_vehicle, LotState};

pub fn draw_detections(f: &mut ratatui::Frame<'_>, area: Rect, lot: &LotState) {
    let block = Block::default()
        .borders(Borders::ALL)
        .title(format!("Detections ({} total)", lot.total_detections()));

    let mut lines: Vec<Line> = Vec::new();
    for cam in 0..lot.camera_count() {
        let counts = lot.class_counts(cam);
        if counts.is_empty() {
            lines.push(Line::from(Span::styled(
                format!("{}: none", camera_title(cam)),
                Style::default().fg(Color::DarkGray),
            )));
            continue;
        }
        let mut spans = vec![Span::raw(format!("{}: ", camera_title(cam)))];
        for (i, (class, count)) in counts.iter().enumerate() {
            if i > 0 {
                spans.push(Span::raw(", "));
            }
            let color = if is_vehicle(class) {
                Color::Cyan
            } else {
                Color::Gray
            };
            spans.push(Span::styled(
                format!("{class} x{count}"),
                Style::default().fg(color),
            ));
        }
        lines.push(Line::from(spans));
    }

    f.render_widget(Paragraph::new(lines).block(block), area);
}
