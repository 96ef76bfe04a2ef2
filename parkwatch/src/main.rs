//! Entry point for the parkwatch TUI. Parses args and runs the App.

use std::env;
use std::sync::Mutex;

use parkwatch::app::App;
use parkwatch::cli::parse_args;
use parkwatch::config::Config;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let parsed = match parse_args(env::args()) {
        Ok(v) => v,
        Err(msg) => {
            eprintln!("{msg}");
            return Ok(());
        }
    };

    init_logging();

    let mut config = Config::from_env();
    if let Some(url) = parsed.url.clone() {
        config.api_url = url;
    }
    for w in config.validate() {
        eprintln!("warning: {w}");
    }

    if parsed.dry_run {
        println!("api_url: {}", config.api_url);
        println!("streaming_base_url: {}", config.streaming_base_url);
        println!(
            "cameras: {} (capacities {:?})",
            config.camera_count,
            config.camera_capacities()
        );
        println!("poll_interval: {:?}", config.poll_interval);
        println!("toast_timeout: {:?}", config.toast_timeout);
        return Ok(());
    }

    if parsed.demo {
        return run_demo_mode(config, parsed.token.as_deref(), parsed.poll).await;
    }

    let mut app = App::new(&config);
    app.run(&config, parsed.token.as_deref(), parsed.poll).await
}

// Log to a file when PARKWATCH_LOG is set; stderr belongs to the TUI.
fn init_logging() {
    let Ok(path) = std::env::var("PARKWATCH_LOG") else {
        return;
    };
    if path.is_empty() {
        return;
    }
    match std::fs::File::create(&path) {
        Ok(file) => {
            let filter = tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("info"));
            let _ = tracing_subscriber::fmt()
                .with_env_filter(filter)
                .with_ansi(false)
                .with_writer(Mutex::new(file))
                .try_init();
        }
        Err(e) => eprintln!("warning: cannot open log file {path}: {e}"),
    }
}

// --- Demo Mode ---

async fn run_demo_mode(mut config: Config, token: Option<&str>, poll: bool) -> anyhow::Result<()> {
    let port = 8787;
    config.api_url = format!("http://127.0.0.1:{port}");
    let child = spawn_sim_server(port, &config)?;
    // Use select to handle Ctrl-C and normal quit
    let mut app = App::new(&config);
    tokio::select! {
        res = app.run(&config, token, poll) => { drop(child); res }
        _ = tokio::signal::ctrl_c() => {
            drop(child);
            Ok(())
        }
    }
}

struct SimGuard(Mutex<Option<std::process::Child>>);

impl Drop for SimGuard {
    fn drop(&mut self) {
        if let Some(mut ch) = self.0.lock().unwrap().take() {
            let _ = ch.kill();
        }
    }
}

fn spawn_sim_server(port: u16, config: &Config) -> anyhow::Result<SimGuard> {
    let candidate = find_sim_executable();
    let mut cmd = std::process::Command::new(candidate);
    cmd.arg("--port").arg(port.to_string());
    cmd.env("PARKWATCH_CAMERA_COUNT", config.camera_count.to_string());
    cmd.env(
        "PARKWATCH_SPACES_PER_CAMERA",
        config
            .camera_capacities()
            .iter()
            .map(u32::to_string)
            .collect::<Vec<_>>()
            .join(","),
    );
    let child = cmd.spawn()?;
    // Give the sim a brief moment to start
    std::thread::sleep(std::time::Duration::from_millis(300));
    Ok(SimGuard(Mutex::new(Some(child))))
}

fn find_sim_executable() -> std::path::PathBuf {
    let self_exe = std::env::current_exe().ok();
    if let Some(exe) = self_exe {
        if let Some(parent) = exe.parent() {
            #[cfg(windows)]
            let name = "parkwatch_sim.exe";
            #[cfg(not(windows))]
            let name = "parkwatch_sim";
            let candidate = parent.join(name);
            if candidate.exists() {
                return candidate;
            }
        }
    }
    // Fallback to relying on PATH
    std::path::PathBuf::from("parkwatch_sim")
}
