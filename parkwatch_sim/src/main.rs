//! Feed simulator: serves synthetic predictions and barrier-status feeds so
//! parkwatch can run without the production backend.

mod sim;
mod state;
mod types;
mod ws;

use std::net::SocketAddr;
use std::time::Duration;

use axum::{routing::get, Router};
use tracing_subscriber::EnvFilter;

use crate::state::SimState;

const DEFAULT_PORT: u16 = 8787;

fn parse_port<I: IntoIterator<Item = String>>(args: I, default_port: u16) -> u16 {
    let mut it = args.into_iter();
    let _ = it.next(); // program name
    let mut long: Option<String> = None;
    let mut short: Option<String> = None;
    while let Some(a) = it.next() {
        match a.as_str() {
            "--port" => long = it.next(),
            "-p" => short = it.next(),
            _ if a.starts_with("--port=") => {
                if let Some((_, v)) = a.split_once('=') {
                    long = Some(v.to_string());
                }
            }
            _ => {}
        }
    }
    long.or(short)
        .and_then(|s| s.parse::<u16>().ok())
        .unwrap_or(default_port)
}

fn capacities_from_env() -> Vec<u32> {
    let count: usize = std::env::var("PARKWATCH_CAMERA_COUNT")
        .ok()
        .and_then(|v| v.trim().parse().ok())
        .unwrap_or(2);
    let spaces: Vec<u32> = std::env::var("PARKWATCH_SPACES_PER_CAMERA")
        .ok()
        .map(|v| {
            v.split(',')
                .filter_map(|part| part.trim().parse().ok())
                .collect()
        })
        .unwrap_or_else(|| vec![4, 6]);
    (0..count)
        .map(|i| spaces.get(i).copied().unwrap_or(4))
        .collect()
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .init();

    let port = parse_port(std::env::args(), DEFAULT_PORT);
    let capacities = capacities_from_env();
    let auth_token = std::env::var("PARKWATCH_SIM_TOKEN")
        .ok()
        .filter(|t| !t.is_empty());

    let state = SimState::new(capacities, auth_token);
    let _sim = sim::spawn_simulator(state.clone(), Duration::from_millis(1000));

    let app = Router::new()
        .route("/ws/predictions", get(ws::predictions_ws))
        .route("/api/v1/ws/barrier-status", get(ws::barrier_ws))
        .with_state(state);

    let addr = SocketAddr::from(([0, 0, 0, 0], port));
    tracing::info!(%addr, "parkwatch_sim listening");
    let listener = tokio::net::TcpListener::bind(addr).await?;
    axum::serve(listener, app).await?;
    Ok(())
}
