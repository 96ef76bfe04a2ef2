//! Small UI helpers: colors per alert level, status labels, timestamps.

use chrono::{DateTime, Local, Utc};
use ratatui::style::Color;

use crate::notify::NotificationStatus;
use crate::stats::{AlertLevel, SystemStatus};

pub fn alert_color(level: AlertLevel) -> Color {
    match level {
        AlertLevel::Low => Color::Green,
        AlertLevel::Medium => Color::Yellow,
        AlertLevel::High => Color::Red,
    }
}

pub fn status_color(status: SystemStatus) -> Color {
    match status {
        SystemStatus::Active => Color::Green,
        SystemStatus::Inactive => Color::Yellow,
        SystemStatus::Error => Color::Red,
    }
}

pub fn toast_color(status: NotificationStatus) -> Color {
    match status {
        NotificationStatus::Info => Color::Blue,
        NotificationStatus::Success => Color::Green,
        NotificationStatus::Warning => Color::Yellow,
        NotificationStatus::Error => Color::Red,
    }
}

pub fn clock(ts: DateTime<Utc>) -> String {
    ts.with_timezone(&Local).format("%H:%M:%S").to_string()
}

pub fn truncate(s: &str, max: usize) -> String {
    if s.chars().count() <= max {
        return s.to_string();
    }
    if max <= 3 {
        return "...".into();
    }
    let kept: String = s.chars().take(max - 3).collect();
    format!("{kept}...")
}
