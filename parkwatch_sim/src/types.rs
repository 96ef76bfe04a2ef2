//! Data types sent to the client, matching the backend's wire schema.

use serde::Serialize;

#[derive(Debug, Serialize, Clone)]
pub struct SimPrediction {
    pub x1: f64,
    pub y1: f64,
    pub x2: f64,
    pub y2: f64,
    pub confidence: f64,
    pub class_id: i64,
    pub class_name: String,
}

#[derive(Debug, Serialize, Clone)]
pub struct SimFrame {
    pub cam_index: usize,
    pub timestamp: String,
    pub predictions: Vec<SimPrediction>,
}

#[derive(Debug, Serialize, Clone)]
pub struct SimBarrierEvent {
    pub event: String,
    pub barrier_action: String,
    pub barrier_state: String,
    pub current_cars: u32,
    pub max_cars: u32,
    pub utilization_percent: f64,
    pub space_available: u32,
    // epoch seconds
    pub timestamp: f64,
    pub cam_index: usize,
}
