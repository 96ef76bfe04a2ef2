//! Per-camera occupancy gauges and the lot-wide history sparkline.

use ratatui::{
    layout::{Constraint, Direction, Layout, Rect},
    style::{Color, Style},
    widgets::{Block, Borders, Gauge, Sparkline},
};

use crate::config::camera_title;
use crate::stats::{LotState, SystemStatus};
use crate::ui::util::{alert_color, clock};

pub fn draw_cameras(f: &mut ratatui::Frame<'_>, area: Rect, lot: &LotState) {
    let n = lot.camera_count().max(1);
    let rows = Layout::default()
        .direction(Direction::Vertical)
        .constraints(vec![Constraint::Length(3); n])
        .split(area);

    for cam in 0..lot.camera_count() {
        let Some(stats) = lot.stats_for(cam) else {
            continue;
        };
        if cam >= rows.len() {
            break;
        }
        let updated = stats
            .last_update
            .map(|t| format!(" | updated {}", clock(t)))
            .unwrap_or_default();
        let title = format!(
            "{} — {}/{} occupied, {} free ({}){}",
            camera_title(cam),
            stats.occupied_spots,
            stats.total_spots,
            stats.available_spots,
            stats.alert_level.label(),
            updated,
        );
        let color = if lot.system_status() == SystemStatus::Active {
            alert_color(stats.alert_level)
        } else {
            Color::DarkGray
        };
        let g = Gauge::default()
            .block(Block::default().borders(Borders::ALL).title(title))
            .gauge_style(Style::default().fg(color))
            .percent(stats.occupancy_percent().min(100) as u16);
        f.render_widget(g, rows[cam]);
    }
}

pub fn draw_occupancy_spark(
    f: &mut ratatui::Frame<'_>,
    area: Rect,
    title: &str,
    hist: &[u64],
) {
    let max_points = area.width.saturating_sub(2) as usize;
    let start = hist.len().saturating_sub(max_points);
    let data = &hist[start..];

    let spark = Sparkline::default()
        .block(
            Block::default()
                .borders(Borders::ALL)
                .title(title.to_string()),
        )
        .data(data)
        .style(Style::default().fg(Color::Cyan));
    f.render_widget(spark, area);
}
