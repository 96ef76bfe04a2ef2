//! parkwatch: terminal monitor for a parking surveillance backend.
//!
//! Consumes the backend's predictions and barrier-status WebSocket feeds
//! through reconnecting clients, aggregates per-camera occupancy, and draws
//! a live dashboard.

pub mod app;
pub mod cli;
pub mod config;
pub mod feed;
pub mod history;
pub mod notify;
pub mod poll;
pub mod stats;
pub mod types;
pub mod ui;
