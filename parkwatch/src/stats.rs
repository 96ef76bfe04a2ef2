//! Canonical lot state derived from the feed streams.
//!
//! Latest predictions per camera, derived occupancy statistics, barrier
//! snapshots, and the decision of which transitions deserve a toast.

use chrono::{DateTime, Utc};

use crate::config::camera_title;
use crate::feed::FeedStatus;
use crate::notify::{Notification, NotificationStatus};
use crate::types::{BarrierEvent, DetectionFrame, Prediction};

/// Detection classes that count toward parking occupancy.
pub const VEHICLE_CLASSES: [&str; 6] = ["car", "truck", "bus", "van", "pickup", "motorcycle"];

pub fn is_vehicle(class_name: &str) -> bool {
    let lower = class_name.to_ascii_lowercase();
    VEHICLE_CLASSES.iter().any(|c| *c == lower)
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AlertLevel {
    Low,
    Medium,
    High,
}

impl AlertLevel {
    pub fn for_available(available: u32) -> Self {
        if available < 5 {
            AlertLevel::High
        } else if available < 15 {
            AlertLevel::Medium
        } else {
            AlertLevel::Low
        }
    }

    pub fn label(&self) -> &'static str {
        match self {
            AlertLevel::Low => "low",
            AlertLevel::Medium => "medium",
            AlertLevel::High => "high",
        }
    }
}

#[derive(Debug, Clone)]
pub struct ParkingStats {
    pub total_spots: u32,
    pub occupied_spots: u32,
    pub available_spots: u32,
    pub last_update: Option<DateTime<Utc>>,
    pub alert_level: AlertLevel,
}

impl ParkingStats {
    fn empty(total_spots: u32) -> Self {
        Self {
            total_spots,
            occupied_spots: 0,
            available_spots: total_spots,
            last_update: None,
            alert_level: AlertLevel::for_available(total_spots),
        }
    }

    pub fn occupancy_percent(&self) -> u32 {
        if self.total_spots == 0 {
            return 0;
        }
        ((self.occupied_spots as f64 / self.total_spots as f64) * 100.0).round() as u32
    }
}

/// UI-facing health per feed, ranked error > loading > active.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SystemStatus {
    Active,
    Inactive,
    Error,
}

impl SystemStatus {
    pub fn label(&self) -> &'static str {
        match self {
            SystemStatus::Active => "active",
            SystemStatus::Inactive => "connecting",
            SystemStatus::Error => "error",
        }
    }
}

#[derive(Debug, Clone)]
pub struct FeedHealth {
    pub loading: bool,
    pub error: Option<String>,
}

impl FeedHealth {
    fn new() -> Self {
        Self {
            loading: true,
            error: None,
        }
    }

    pub fn status(&self) -> SystemStatus {
        if self.error.is_some() {
            SystemStatus::Error
        } else if self.loading {
            SystemStatus::Inactive
        } else {
            SystemStatus::Active
        }
    }

    fn apply(&mut self, st: FeedStatus) {
        match st {
            FeedStatus::Connecting => self.loading = true,
            FeedStatus::Connected => {
                self.loading = false;
                self.error = None;
            }
            FeedStatus::Disconnected => self.error = Some("disconnected from server".into()),
            FeedStatus::Error => self.error = Some("connection error".into()),
        }
    }
}

pub struct LotState {
    predictions: Vec<Vec<Prediction>>,
    stats: Vec<ParkingStats>,
    barrier: Vec<Option<BarrierEvent>>,
    last_updated: Option<DateTime<Utc>>,
    predictions_health: FeedHealth,
    barrier_health: FeedHealth,
}

impl LotState {
    pub fn new(spaces_per_camera: &[u32]) -> Self {
        Self {
            predictions: spaces_per_camera.iter().map(|_| Vec::new()).collect(),
            stats: spaces_per_camera
                .iter()
                .map(|&total| ParkingStats::empty(total))
                .collect(),
            barrier: spaces_per_camera.iter().map(|_| None).collect(),
            last_updated: None,
            predictions_health: FeedHealth::new(),
            barrier_health: FeedHealth::new(),
        }
    }

    pub fn camera_count(&self) -> usize {
        self.stats.len()
    }

    /// Fold a detection frame into the per-camera slot and recompute the
    /// derived stats. Returns a toast when the occupancy change qualifies.
    pub fn apply_detections(
        &mut self,
        frame: &DetectionFrame,
        now: DateTime<Utc>,
    ) -> Option<Notification> {
        let i = frame.cam_index;
        if i >= self.stats.len() {
            tracing::debug!(cam_index = i, "dropping frame for unknown camera");
            return None;
        }

        let prev_occupied = self.stats[i].occupied_spots;
        self.predictions[i] = frame.predictions.clone();
        let occupied = frame
            .predictions
            .iter()
            .filter(|p| is_vehicle(&p.class_name))
            .count() as u32;

        let s = &mut self.stats[i];
        s.occupied_spots = occupied;
        s.available_spots = s.total_spots.saturating_sub(occupied);
        s.alert_level = AlertLevel::for_available(s.available_spots);
        s.last_update = Some(now);
        self.last_updated = Some(now);
        self.predictions_health.error = None;

        // The first observation for a camera is initialization, not a change.
        if prev_occupied == 0 || occupied == prev_occupied {
            return None;
        }
        Some(occupancy_notification(i, prev_occupied, occupied, now))
    }

    /// Keep the latest barrier event per camera.
    pub fn apply_barrier(&mut self, ev: &BarrierEvent) {
        let i = ev.cam_index;
        if i >= self.barrier.len() {
            tracing::debug!(cam_index = i, "dropping barrier event for unknown camera");
            return;
        }
        self.barrier[i] = Some(ev.clone());
        self.barrier_health.error = None;
    }

    pub fn apply_predictions_status(&mut self, st: FeedStatus) {
        self.predictions_health.apply(st);
    }

    pub fn apply_barrier_status(&mut self, st: FeedStatus) {
        self.barrier_health.apply(st);
    }

    pub fn record_predictions_error(&mut self, message: impl Into<String>) {
        self.predictions_health.error = Some(message.into());
    }

    pub fn record_barrier_error(&mut self, message: impl Into<String>) {
        self.barrier_health.error = Some(message.into());
    }

    pub fn stats_for(&self, cam: usize) -> Option<&ParkingStats> {
        self.stats.get(cam)
    }

    pub fn predictions_for(&self, cam: usize) -> &[Prediction] {
        self.predictions.get(cam).map(Vec::as_slice).unwrap_or(&[])
    }

    pub fn barrier_for(&self, cam: usize) -> Option<&BarrierEvent> {
        self.barrier.get(cam).and_then(Option::as_ref)
    }

    pub fn last_updated(&self) -> Option<DateTime<Utc>> {
        self.last_updated
    }

    pub fn total_occupied(&self) -> u32 {
        self.stats.iter().map(|s| s.occupied_spots).sum()
    }

    pub fn total_spots(&self) -> u32 {
        self.stats.iter().map(|s| s.total_spots).sum()
    }

    pub fn total_detections(&self) -> usize {
        self.predictions.iter().map(Vec::len).sum()
    }

    pub fn system_status(&self) -> SystemStatus {
        self.predictions_health.status()
    }

    pub fn barrier_status(&self) -> SystemStatus {
        self.barrier_health.status()
    }

    pub fn predictions_error(&self) -> Option<&str> {
        self.predictions_health.error.as_deref()
    }

    pub fn barrier_error(&self) -> Option<&str> {
        self.barrier_health.error.as_deref()
    }

    /// Count of detections per class across one camera, sorted descending.
    pub fn class_counts(&self, cam: usize) -> Vec<(String, usize)> {
        let mut counts: Vec<(String, usize)> = Vec::new();
        for p in self.predictions_for(cam) {
            let key = p.class_name.to_ascii_lowercase();
            match counts.iter_mut().find(|(name, _)| *name == key) {
                Some((_, n)) => *n += 1,
                None => counts.push((key, 1)),
            }
        }
        counts.sort_by(|a, b| b.1.cmp(&a.1).then_with(|| a.0.cmp(&b.0)));
        counts
    }
}

fn occupancy_notification(
    cam: usize,
    prev: u32,
    current: u32,
    now: DateTime<Utc>,
) -> Notification {
    let delta = current as i64 - prev as i64;
    let count = delta.unsigned_abs();
    let plural = if count == 1 { "" } else { "s" };
    if delta > 0 {
        Notification::new(
            "Cars entered",
            format!("{count} car{plural} entered at {}", camera_title(cam)),
            "target",
            NotificationStatus::Info,
            now,
        )
    } else {
        Notification::new(
            "Cars exited",
            format!("{count} car{plural} left at {}", camera_title(cam)),
            "target",
            NotificationStatus::Success,
            now,
        )
    }
}
