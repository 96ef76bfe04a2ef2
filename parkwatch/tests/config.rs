//! Config resolution and warn-only validation.

use std::collections::HashMap;
use std::time::Duration;

use parkwatch::config::{Config, FALLBACK_CAMERA_CAPACITY};

fn lookup(pairs: &[(&str, &str)]) -> impl Fn(&str) -> Option<String> {
    let map: HashMap<String, String> = pairs
        .iter()
        .map(|(k, v)| (k.to_string(), v.to_string()))
        .collect();
    move |key: &str| map.get(key).cloned()
}

#[test]
fn defaults_apply_when_nothing_is_set() {
    let cfg = Config::from_lookup(|_| None);
    assert_eq!(cfg.api_url, "http://localhost:8000");
    assert_eq!(cfg.camera_count, 1);
    assert_eq!(cfg.spaces_per_camera, vec![4, 6]);
    assert_eq!(cfg.poll_interval, Duration::from_millis(3000));
    assert!(cfg.validate().is_empty(), "defaults must validate cleanly");
}

#[test]
fn environment_overrides_are_picked_up() {
    let cfg = Config::from_lookup(lookup(&[
        ("PARKWATCH_API_URL", "http://lot.example:9000"),
        ("PARKWATCH_CAMERA_COUNT", "3"),
        ("PARKWATCH_SPACES_PER_CAMERA", "10, 20,5"),
        ("PARKWATCH_POLL_INTERVAL_MS", "2000"),
        ("PARKWATCH_TOAST_TIMEOUT_MS", "4000"),
    ]));
    assert_eq!(cfg.api_url, "http://lot.example:9000");
    assert_eq!(cfg.camera_count, 3);
    assert_eq!(cfg.spaces_per_camera, vec![10, 20, 5]);
    assert_eq!(cfg.poll_interval, Duration::from_millis(2000));
    assert_eq!(cfg.toast_timeout, Duration::from_millis(4000));
    assert_eq!(cfg.total_spaces(), 35);
}

#[test]
fn blank_and_malformed_values_fall_back_to_defaults() {
    let cfg = Config::from_lookup(lookup(&[
        ("PARKWATCH_API_URL", "  "),
        ("PARKWATCH_CAMERA_COUNT", "two"),
        ("PARKWATCH_POLL_INTERVAL_MS", "soon"),
    ]));
    assert_eq!(cfg.api_url, "http://localhost:8000");
    assert_eq!(cfg.camera_count, 1);
    assert_eq!(cfg.poll_interval, Duration::from_millis(3000));
}

#[test]
fn violated_minimums_warn_but_never_fail() {
    let cfg = Config::from_lookup(lookup(&[
        ("PARKWATCH_CAMERA_COUNT", "0"),
        ("PARKWATCH_POLL_INTERVAL_MS", "500"),
    ]));
    let warnings = cfg.validate();
    assert_eq!(warnings.len(), 2);
    assert!(warnings.iter().any(|w| w.contains("at least 1")));
    assert!(warnings.iter().any(|w| w.contains("at least 1000")));
}

#[test]
fn capacity_list_shorter_than_camera_count_warns_and_pads() {
    let cfg = Config::from_lookup(lookup(&[
        ("PARKWATCH_CAMERA_COUNT", "3"),
        ("PARKWATCH_SPACES_PER_CAMERA", "12"),
    ]));
    let warnings = cfg.validate();
    assert!(warnings.iter().any(|w| w.contains("capacities")));
    assert_eq!(
        cfg.camera_capacities(),
        vec![12, FALLBACK_CAMERA_CAPACITY, FALLBACK_CAMERA_CAPACITY]
    );
}

#[test]
fn extra_capacities_are_truncated_to_the_camera_count() {
    let cfg = Config::from_lookup(lookup(&[
        ("PARKWATCH_CAMERA_COUNT", "1"),
        ("PARKWATCH_SPACES_PER_CAMERA", "4,6,8"),
    ]));
    assert_eq!(cfg.camera_capacities(), vec![4]);
    assert_eq!(cfg.total_spaces(), 4);
}

#[test]
fn junk_entries_in_the_capacity_list_are_skipped() {
    let cfg = Config::from_lookup(lookup(&[(
        "PARKWATCH_SPACES_PER_CAMERA",
        "4, banana, 6",
    )]));
    assert_eq!(cfg.spaces_per_camera, vec![4, 6]);
}
