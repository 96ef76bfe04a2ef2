//! Wire parsing for both feeds.

use chrono::{TimeZone, Utc};
use parkwatch::feed::{FeedError, FeedParser};
use parkwatch::types::{BarrierEventKind, BarrierFeed, PredictionsFeed};

#[test]
fn parses_a_detection_frame() {
    let raw = r#"{
        "cam_index": 1,
        "timestamp": "2025-11-03T12:00:00Z",
        "predictions": [
            {"x1": 10.0, "y1": 20.0, "x2": 110.0, "y2": 80.0,
             "confidence": 0.93, "class_id": 2, "class_name": "car"}
        ]
    }"#;
    let frame = PredictionsFeed::parse(raw).unwrap();
    assert_eq!(frame.cam_index, 1);
    assert_eq!(frame.predictions.len(), 1);
    assert_eq!(frame.predictions[0].class_name, "car");
    assert!((frame.predictions[0].confidence - 0.93).abs() < 1e-9);
}

#[test]
fn detection_frame_defaults_empty_prediction_list() {
    let frame = PredictionsFeed::parse(r#"{"cam_index": 0}"#).unwrap();
    assert_eq!(frame.cam_index, 0);
    assert!(frame.predictions.is_empty());
    assert!(frame.timestamp.is_empty());
}

#[test]
fn detection_frame_requires_cam_index() {
    let err = PredictionsFeed::parse(r#"{"predictions": []}"#).unwrap_err();
    assert!(matches!(err, FeedError::Parse(_)));
}

#[test]
fn rejects_invalid_json() {
    assert!(matches!(
        PredictionsFeed::parse("not json"),
        Err(FeedError::Parse(_))
    ));
    assert!(matches!(
        BarrierFeed::parse("{truncated"),
        Err(FeedError::Parse(_))
    ));
}

fn barrier_raw(extra: &str) -> String {
    format!(
        r#"{{
            "event": "status_confirmed",
            "barrier_action": "open",
            "barrier_state": "open",
            "current_cars": 12,
            "max_cars": 50,
            "utilization_percent": 24.0,
            "space_available": 38,
            "timestamp": 1730635200{extra}
        }}"#
    )
}

#[test]
fn parses_a_barrier_event_and_derives_the_timestamp() {
    let ev = BarrierFeed::parse(&barrier_raw("")).unwrap();
    assert_eq!(ev.event, BarrierEventKind::StatusConfirmed);
    assert_eq!(ev.current_cars, 12);
    assert_eq!(ev.max_cars, 50);
    assert_eq!(ev.space_available, 38);
    // Epoch seconds become a real timestamp
    let expected = Utc.timestamp_opt(1_730_635_200, 0).unwrap();
    assert_eq!(ev.parsed_timestamp, expected);
}

#[test]
fn barrier_cam_index_defaults_to_zero_when_absent() {
    let ev = BarrierFeed::parse(&barrier_raw("")).unwrap();
    assert_eq!(ev.cam_index, 0);

    let ev = BarrierFeed::parse(&barrier_raw(r#", "cam_index": 3"#)).unwrap();
    assert_eq!(ev.cam_index, 3);
}

#[test]
fn barrier_rejects_non_numeric_counters() {
    let raw = r#"{
        "event": "command_sent",
        "barrier_action": "open",
        "barrier_state": "open",
        "current_cars": "many",
        "max_cars": 50,
        "utilization_percent": 24.0,
        "space_available": 38,
        "timestamp": 1730635200
    }"#;
    assert!(matches!(BarrierFeed::parse(raw), Err(FeedError::Parse(_))));
}

#[test]
fn barrier_rejects_unknown_event_kind() {
    let raw = barrier_raw("").replace("status_confirmed", "gate_blessed");
    assert!(matches!(
        BarrierFeed::parse(&raw),
        Err(FeedError::Parse(_))
    ));
}

#[test]
fn barrier_accepts_fractional_timestamps() {
    let raw = barrier_raw("").replace("1730635200", "1730635200.5");
    let ev = BarrierFeed::parse(&raw).unwrap();
    let expected = Utc.timestamp_millis_opt(1_730_635_200_500).unwrap();
    assert_eq!(ev.parsed_timestamp, expected);
}
