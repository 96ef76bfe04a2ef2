//! Types that mirror the backend's JSON feed schemas.

use chrono::{DateTime, Utc};
use serde::Deserialize;

use crate::feed::{FeedError, FeedParser};

#[derive(Debug, Deserialize, Clone, PartialEq)]
pub struct Prediction {
    pub x1: f64,
    pub y1: f64,
    pub x2: f64,
    pub y2: f64,
    pub confidence: f64,
    pub class_id: i64,
    pub class_name: String,
}

/// One detection frame from `/ws/predictions`.
#[derive(Debug, Deserialize, Clone)]
pub struct DetectionFrame {
    pub cam_index: usize,
    #[serde(default)]
    pub timestamp: String,
    #[serde(default)]
    pub predictions: Vec<Prediction>,
}

#[derive(Debug, Deserialize, Clone, Copy, PartialEq, Eq)]
#[serde(rename_all = "snake_case")]
pub enum BarrierEventKind {
    CommandSent,
    StatusConfirmed,
}

/// One gate event from `/api/v1/ws/barrier-status`. `timestamp` is epoch
/// seconds on the wire; `parsed_timestamp` is derived at parse time. Some
/// backend revisions omit `cam_index`, which then falls back to camera 0.
#[derive(Debug, Deserialize, Clone)]
pub struct BarrierEvent {
    pub event: BarrierEventKind,
    pub barrier_action: String,
    pub barrier_state: String,
    pub current_cars: u32,
    pub max_cars: u32,
    pub utilization_percent: f64,
    pub space_available: u32,
    pub timestamp: f64,
    #[serde(default)]
    pub cam_index: usize,
    #[serde(skip, default = "unix_epoch")]
    pub parsed_timestamp: DateTime<Utc>,
}

fn unix_epoch() -> DateTime<Utc> {
    DateTime::<Utc>::UNIX_EPOCH
}

pub fn epoch_seconds_to_datetime(secs: f64) -> DateTime<Utc> {
    DateTime::<Utc>::from_timestamp_millis((secs * 1000.0) as i64)
        .unwrap_or(DateTime::<Utc>::UNIX_EPOCH)
}

/// Predictions feed wire contract.
pub struct PredictionsFeed;

impl FeedParser for PredictionsFeed {
    type Event = DetectionFrame;
    const PATH: &'static str = "/ws/predictions";

    fn parse(text: &str) -> Result<DetectionFrame, FeedError> {
        serde_json::from_str(text).map_err(|e| FeedError::Parse(e.to_string()))
    }
}

/// Barrier feed wire contract.
pub struct BarrierFeed;

impl FeedParser for BarrierFeed {
    type Event = BarrierEvent;
    const PATH: &'static str = "/api/v1/ws/barrier-status";

    fn parse(text: &str) -> Result<BarrierEvent, FeedError> {
        let mut ev: BarrierEvent =
            serde_json::from_str(text).map_err(|e| FeedError::Parse(e.to_string()))?;
        ev.parsed_timestamp = epoch_seconds_to_datetime(ev.timestamp);
        Ok(ev)
    }
}
