//! Barrier (gate) status panel: latest event per camera.

use ratatui::{
    layout::Rect,
    style::{Color, Style},
    text::{Line, Span},
    widgets::{Block, Borders, Paragraph},
};

use crate::config::camera_title;
use crate::stats::LotState;
use crate::ui::util::clock;

pub fn draw_barriers(f: &mut ratatui::Frame<'_>, area: Rect, lot: &LotState) {
    let title = match lot.barrier_error() {
        Some(err) => format!("Barriers — {err}"),
        None => "Barriers".to_string(),
    };
    let block = Block::default().borders(Borders::ALL).title(title);

    let mut lines: Vec<Line> = Vec::new();
    for cam in 0..lot.camera_count() {
        match lot.barrier_for(cam) {
            Some(ev) => {
                let state_color = if ev.barrier_state == "open" {
                    Color::Green
                } else {
                    Color::Red
                };
                lines.push(Line::from(vec![
                    Span::raw(format!("{}: ", camera_title(cam))),
                    Span::styled(
                        ev.barrier_state.clone(),
                        Style::default().fg(state_color),
                    ),
                    Span::raw(format!(
                        " | cars {}/{} ({:.0}%) | {} free | {}",
                        ev.current_cars,
                        ev.max_cars,
                        ev.utilization_percent,
                        ev.space_available,
                        clock(ev.parsed_timestamp),
                    )),
                ]));
            }
            None => {
                lines.push(Line::from(Span::styled(
                    format!("{}: no barrier data", camera_title(cam)),
                    Style::default().fg(Color::DarkGray),
                )));
            }
        }
    }

    f.render_widget(Paragraph::new(lines).block(block), area);
}
