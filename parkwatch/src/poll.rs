//! Legacy HTTP fallback: poll the REST endpoint that predates the feeds.
//!
//! Kept behind `--poll` for backends that still only expose `/resultado`.
//! The response carries a bare prediction list, mapped onto a synthetic
//! frame for camera 0.

use std::time::Duration;

use chrono::Utc;
use serde::Deserialize;
use tokio::sync::mpsc::UnboundedSender;
use tokio::task::JoinHandle;

use crate::types::{DetectionFrame, Prediction};

#[derive(Debug, Deserialize)]
struct PollResponse {
    #[serde(default)]
    predictions: Vec<Prediction>,
}

pub fn poll_url(api_url: &str) -> String {
    format!("{}/resultado", api_url.trim_end_matches('/'))
}

pub async fn fetch_predictions(
    client: &reqwest::Client,
    api_url: &str,
) -> anyhow::Result<DetectionFrame> {
    let resp = client
        .get(poll_url(api_url))
        .send()
        .await?
        .error_for_status()?;
    let body: PollResponse = resp.json().await?;
    Ok(DetectionFrame {
        cam_index: 0,
        timestamp: Utc::now().to_rfc3339(),
        predictions: body.predictions,
    })
}

pub fn spawn_poller(
    api_url: String,
    interval: Duration,
    tx: UnboundedSender<DetectionFrame>,
) -> JoinHandle<()> {
    tokio::spawn(async move {
        let client = reqwest::Client::new();
        loop {
            match fetch_predictions(&client, &api_url).await {
                Ok(frame) => {
                    if tx.send(frame).is_err() {
                        break;
                    }
                }
                Err(e) => tracing::warn!(error = %e, "legacy poll failed"),
            }
            tokio::time::sleep(interval).await;
        }
    })
}
