//! Shared simulator state: camera capacities and broadcast fan-out.

use std::sync::Arc;

use tokio::sync::broadcast;

#[derive(Clone)]
pub struct SimState {
    pub capacities: Arc<Vec<u32>>,
    pub predictions_tx: broadcast::Sender<String>,
    pub barrier_tx: broadcast::Sender<String>,
    pub auth_token: Option<String>,
}

impl SimState {
    pub fn new(capacities: Vec<u32>, auth_token: Option<String>) -> Self {
        let (predictions_tx, _) = broadcast::channel(64);
        let (barrier_tx, _) = broadcast::channel(64);
        Self {
            capacities: Arc::new(capacities),
            predictions_tx,
            barrier_tx,
            auth_token,
        }
    }
}
