//! Environment-derived configuration and the static camera dictionary.
//!
//! Validation never aborts startup: violated minimums produce warnings and
//! the defaults carry the app, matching how the backend dashboards behave.

use std::time::Duration;

pub const DEFAULT_API_URL: &str = "http://localhost:8000";
pub const DEFAULT_STREAMING_BASE_URL: &str = "http://localhost:8080";
pub const DEFAULT_CAMERA_COUNT: usize = 1;
pub const DEFAULT_SPACES_PER_CAMERA: [u32; 2] = [4, 6];
pub const DEFAULT_POLL_INTERVAL: Duration = Duration::from_millis(3000);
pub const DEFAULT_TOAST_TIMEOUT: Duration = Duration::from_millis(8000);
/// Capacity assumed for cameras missing from PARKWATCH_SPACES_PER_CAMERA.
pub const FALLBACK_CAMERA_CAPACITY: u32 = 4;

#[derive(Debug, Clone)]
pub struct Config {
    pub api_url: String,
    pub streaming_base_url: String,
    pub camera_count: usize,
    pub spaces_per_camera: Vec<u32>,
    pub poll_interval: Duration,
    pub toast_timeout: Duration,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            api_url: DEFAULT_API_URL.into(),
            streaming_base_url: DEFAULT_STREAMING_BASE_URL.into(),
            camera_count: DEFAULT_CAMERA_COUNT,
            spaces_per_camera: DEFAULT_SPACES_PER_CAMERA.to_vec(),
            poll_interval: DEFAULT_POLL_INTERVAL,
            toast_timeout: DEFAULT_TOAST_TIMEOUT,
        }
    }
}

impl Config {
    pub fn from_env() -> Self {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Same resolution as `from_env`, with the variable source injected so
    /// tests do not have to mutate process state.
    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Self {
        let get = |key: &str| lookup(key).filter(|v| !v.trim().is_empty());
        let defaults = Config::default();
        Self {
            api_url: get("PARKWATCH_API_URL").unwrap_or(defaults.api_url),
            streaming_base_url: get("PARKWATCH_STREAMING_BASE_URL")
                .unwrap_or(defaults.streaming_base_url),
            camera_count: get("PARKWATCH_CAMERA_COUNT")
                .and_then(|v| v.trim().parse().ok())
                .unwrap_or(defaults.camera_count),
            spaces_per_camera: get("PARKWATCH_SPACES_PER_CAMERA")
                .map(|v| parse_spaces(&v))
                .unwrap_or(defaults.spaces_per_camera),
            poll_interval: get("PARKWATCH_POLL_INTERVAL_MS")
                .and_then(|v| v.trim().parse().ok())
                .map(Duration::from_millis)
                .unwrap_or(defaults.poll_interval),
            toast_timeout: get("PARKWATCH_TOAST_TIMEOUT_MS")
                .and_then(|v| v.trim().parse().ok())
                .map(Duration::from_millis)
                .unwrap_or(defaults.toast_timeout),
        }
    }

    /// Warn-only startup validation.
    pub fn validate(&self) -> Vec<String> {
        let mut warnings = Vec::new();
        if self.streaming_base_url.is_empty() {
            warnings.push("PARKWATCH_STREAMING_BASE_URL is required".into());
        }
        if self.camera_count < 1 {
            warnings.push("PARKWATCH_CAMERA_COUNT must be at least 1".into());
        }
        if self.poll_interval < Duration::from_millis(1000) {
            warnings.push("PARKWATCH_POLL_INTERVAL_MS must be at least 1000".into());
        }
        if self.spaces_per_camera.len() < self.camera_count {
            warnings.push(format!(
                "PARKWATCH_SPACES_PER_CAMERA lists {} capacities for {} cameras; \
                 missing cameras assume {}",
                self.spaces_per_camera.len(),
                self.camera_count,
                FALLBACK_CAMERA_CAPACITY
            ));
        }
        warnings
    }

    /// Per-camera capacities padded/truncated to the configured camera count.
    pub fn camera_capacities(&self) -> Vec<u32> {
        (0..self.camera_count)
            .map(|i| {
                self.spaces_per_camera
                    .get(i)
                    .copied()
                    .unwrap_or(FALLBACK_CAMERA_CAPACITY)
            })
            .collect()
    }

    pub fn total_spaces(&self) -> u32 {
        self.camera_capacities().iter().sum()
    }
}

fn parse_spaces(raw: &str) -> Vec<u32> {
    raw.split(',')
        .filter_map(|part| part.trim().parse().ok())
        .collect()
}

// Master camera dictionary; index is the slot used by the feeds.
#[derive(Debug, Clone, Copy)]
pub struct CameraEntry {
    pub id: u32,
    pub index: usize,
    pub title: &'static str,
    pub subtitle: &'static str,
}

pub const CAMERAS: [CameraEntry; 4] = [
    CameraEntry {
        id: 0,
        index: 0,
        title: "Main Entrance",
        subtitle: "Access",
    },
    CameraEntry {
        id: 1,
        index: 1,
        title: "North",
        subtitle: "Parking",
    },
    CameraEntry {
        id: 2,
        index: 2,
        title: "South",
        subtitle: "Parking",
    },
    CameraEntry {
        id: 3,
        index: 3,
        title: "Pavilion",
        subtitle: "Campus",
    },
];

pub fn camera_by_index(index: usize) -> Option<&'static CameraEntry> {
    CAMERAS.iter().find(|c| c.index == index)
}

pub fn camera_title(index: usize) -> String {
    camera_by_index(index)
        .map(|c| c.title.to_string())
        .unwrap_or_else(|| format!("Camera {index}"))
}
