//! Background lot simulator: random-walks per-camera occupancy and
//! broadcasts detection frames plus barrier events.

use std::time::Duration;

use chrono::Utc;
use tokio::task::JoinHandle;

use crate::state::SimState;
use crate::types::{SimBarrierEvent, SimFrame, SimPrediction};

const VEHICLE_CLASSES: [&str; 4] = ["car", "truck", "van", "motorcycle"];

pub fn spawn_simulator(state: SimState, period: Duration) -> JoinHandle<()> {
    tokio::spawn(async move {
        // Start half full so both entries and exits show up early.
        let mut occupied: Vec<u32> = state.capacities.iter().map(|c| c / 2).collect();
        loop {
            for (cam, cap) in state.capacities.iter().enumerate() {
                let prev = occupied[cam];
                occupied[cam] = walk(prev, *cap);

                let frame = make_frame(cam, occupied[cam]);
                match serde_json::to_string(&frame) {
                    Ok(js) => {
                        let _ = state.predictions_tx.send(js);
                    }
                    Err(e) => tracing::error!(error = %e, "frame serialization failed"),
                }

                if occupied[cam] != prev {
                    let ev = make_barrier_event(cam, prev, occupied[cam], *cap);
                    match serde_json::to_string(&ev) {
                        Ok(js) => {
                            let _ = state.barrier_tx.send(js);
                        }
                        Err(e) => tracing::error!(error = %e, "barrier serialization failed"),
                    }
                }
            }
            tokio::time::sleep(period).await;
        }
    })
}

// Mostly stay put; sometimes one car in or out.
fn walk(current: u32, cap: u32) -> u32 {
    match fastrand::u8(0..10) {
        0..=5 => current,
        6..=7 => (current + 1).min(cap),
        _ => current.saturating_sub(1),
    }
}

pub fn make_frame(cam: usize, occupied: u32) -> SimFrame {
    let mut predictions: Vec<SimPrediction> = (0..occupied)
        .map(|i| {
            let col = i % 4;
            let row = i / 4;
            let x1 = 40.0 + col as f64 * 130.0;
            let y1 = 30.0 + row as f64 * 90.0;
            SimPrediction {
                x1,
                y1,
                x2: x1 + 100.0,
                y2: y1 + 60.0,
                confidence: 0.70 + fastrand::f64() * 0.29,
                class_id: 2,
                class_name: VEHICLE_CLASSES[fastrand::usize(0..VEHICLE_CLASSES.len())].into(),
            }
        })
        .collect();

    // Occasional pedestrian; must not count toward occupancy downstream.
    if fastrand::u8(0..5) == 0 {
        predictions.push(SimPrediction {
            x1: 10.0,
            y1: 10.0,
            x2: 40.0,
            y2: 80.0,
            confidence: 0.55 + fastrand::f64() * 0.4,
            class_id: 0,
            class_name: "person".into(),
        });
    }

    SimFrame {
        cam_index: cam,
        timestamp: Utc::now().to_rfc3339(),
        predictions,
    }
}

pub fn make_barrier_event(cam: usize, prev: u32, current: u32, cap: u32) -> SimBarrierEvent {
    let action = if current > prev { "open" } else { "close" };
    let utilization = if cap > 0 {
        current as f64 / cap as f64 * 100.0
    } else {
        0.0
    };
    SimBarrierEvent {
        event: "status_confirmed".into(),
        barrier_action: action.into(),
        barrier_state: if action == "open" { "open" } else { "closed" }.into(),
        current_cars: current,
        max_cars: cap,
        utilization_percent: utilization,
        space_available: cap.saturating_sub(current),
        timestamp: Utc::now().timestamp_millis() as f64 / 1000.0,
        cam_index: cam,
    }
}
