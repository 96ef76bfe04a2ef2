//! Integration probe: only runs when PARKWATCH_API points at a live backend
//! or a running parkwatch_sim instance.
//! Example: PARKWATCH_API=http://127.0.0.1:8787 cargo test -p parkwatch --test feed_probe -- --nocapture

use std::time::Duration;

use parkwatch::feed::FeedClient;
use parkwatch::types::{BarrierFeed, PredictionsFeed};
use tokio::sync::mpsc;

#[tokio::test]
async fn probe_predictions_feed() {
    // Gate the test to avoid CI failures when no backend is running.
    let base = match std::env::var("PARKWATCH_API") {
        Ok(v) if !v.is_empty() => v,
        _ => {
            eprintln!(
                "skipping feed_probe: set PARKWATCH_API=http://host:port to run this integration test"
            );
            return;
        }
    };

    let client = FeedClient::<PredictionsFeed>::new(&base);
    let (tx, mut rx) = mpsc::unbounded_channel();
    let _sub = client.on_message(move |frame| {
        let _ = tx.send(frame.clone());
    });
    client.connect(None);

    let frame = tokio::time::timeout(Duration::from_secs(10), rx.recv()).await;
    client.disconnect();
    let frame = frame.expect("expected a detection frame within 10s").unwrap();
    // Frames address one of the configured camera slots.
    assert!(frame.cam_index < 64, "implausible cam_index {}", frame.cam_index);
}

#[tokio::test]
async fn probe_barrier_feed() {
    let base = match std::env::var("PARKWATCH_API") {
        Ok(v) if !v.is_empty() => v,
        _ => {
            eprintln!("skipping feed_probe: set PARKWATCH_API=http://host:port");
            return;
        }
    };
    let token = std::env::var("PARKWATCH_TOKEN").ok();

    let client = FeedClient::<BarrierFeed>::new(&base);
    let (tx, mut rx) = mpsc::unbounded_channel();
    let _sub = client.on_message(move |ev| {
        let _ = tx.send(ev.current_cars);
    });
    client.connect(token.as_deref());

    // Barrier events only flow when occupancy changes; allow a longer window.
    let got = tokio::time::timeout(Duration::from_secs(30), rx.recv()).await;
    client.disconnect();
    assert!(got.is_ok(), "expected a barrier event within 30s");
}
