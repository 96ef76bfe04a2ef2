//! Reconnecting WebSocket feed clients.
//!
//! One `FeedClient` per feed owns at most one live socket, a reconnect
//! policy with exponential backoff, and three subscriber registries
//! (message, error, status). Both backend feeds share this machinery and
//! differ only in their endpoint path and message parser.

mod policy;
mod registry;

pub use policy::{CloseAction, ConnState, ReconnectPolicy};
pub use registry::{Registry, Subscription};

use std::sync::atomic::{AtomicBool, AtomicU32, AtomicU64, Ordering};
use std::sync::{Arc, Mutex};
use std::time::Duration;

use futures_util::StreamExt;
use tokio::task::JoinHandle;
use tokio_tungstenite::{connect_async, tungstenite::Message};
use url::Url;

/// Settle delay between a manual `reconnect()` teardown and the fresh dial.
pub const RECONNECT_SETTLE: Duration = Duration::from_millis(1000);

#[derive(Debug, thiserror::Error)]
pub enum FeedError {
    #[error("invalid feed url: {0}")]
    Url(String),
    #[error("connection failed: {0}")]
    Connect(String),
    #[error("failed to parse feed message: {0}")]
    Parse(String),
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FeedStatus {
    Connecting,
    Connected,
    Disconnected,
    Error,
}

/// Per-feed wire contract: endpoint path plus raw-text-to-event parsing.
pub trait FeedParser: Send + Sync + 'static {
    type Event: Clone + Send + Sync + 'static;
    const PATH: &'static str;
    fn parse(text: &str) -> Result<Self::Event, FeedError>;
}

/// Build the socket URL from the API base: scheme rewritten http->ws /
/// https->wss, feed path appended, token added as a query parameter
/// (respecting any query the base already carries).
pub fn ws_url(base: &str, path: &str, token: Option<&str>) -> Result<String, FeedError> {
    let mut url = Url::parse(base).map_err(|e| FeedError::Url(format!("{base}: {e}")))?;
    let scheme = match url.scheme() {
        "http" => Some("ws"),
        "https" => Some("wss"),
        "ws" | "wss" => None,
        other => return Err(FeedError::Url(format!("unsupported scheme: {other}"))),
    };
    if let Some(s) = scheme {
        url.set_scheme(s)
            .map_err(|_| FeedError::Url(format!("cannot rewrite scheme of {base}")))?;
    }
    let joined = format!("{}{}", url.path().trim_end_matches('/'), path);
    url.set_path(&joined);
    if let Some(t) = token {
        url.query_pairs_mut().append_pair("token", t);
    }
    Ok(url.to_string())
}

type MessageHandler<E> = dyn Fn(&E) + Send + Sync;
type ErrorHandler = dyn Fn(&FeedError) + Send + Sync;
type StatusHandler = dyn Fn(FeedStatus) + Send + Sync;

#[derive(Default)]
struct TaskSlots {
    socket: Option<JoinHandle<()>>,
    timer: Option<JoinHandle<()>>,
}

struct Inner<P: FeedParser> {
    base_url: String,
    policy: ReconnectPolicy,
    messages: Registry<MessageHandler<P::Event>>,
    errors: Registry<ErrorHandler>,
    status: Registry<StatusHandler>,
    state: Mutex<ConnState>,
    attempts: AtomicU32,
    should_reconnect: AtomicBool,
    // Bumped on every connect()/disconnect(); tasks spawned under an older
    // generation stop delivering the moment it changes.
    generation: AtomicU64,
    token: Mutex<Option<String>>,
    tasks: Mutex<TaskSlots>,
}

impl<P: FeedParser> Inner<P> {
    fn stale(&self, gen: u64) -> bool {
        self.generation.load(Ordering::SeqCst) != gen
    }

    fn notify_message(&self, ev: &P::Event) {
        for h in self.messages.snapshot() {
            h(ev);
        }
    }

    fn notify_error(&self, err: &FeedError) {
        for h in self.errors.snapshot() {
            h(err);
        }
    }

    fn notify_status(&self, st: FeedStatus) {
        for h in self.status.snapshot() {
            h(st);
        }
    }

    fn abort_tasks(&self) {
        let mut tasks = self.tasks.lock().unwrap();
        if let Some(t) = tasks.timer.take() {
            t.abort();
        }
        if let Some(t) = tasks.socket.take() {
            t.abort();
        }
    }

    fn connect(inner: &Arc<Self>, token: Option<&str>) {
        {
            let state = inner.state.lock().unwrap();
            if state.is_active() {
                tracing::debug!(feed = P::PATH, state = ?*state, "connect ignored, already in progress");
                return;
            }
        }
        if let Some(t) = token {
            *inner.token.lock().unwrap() = Some(t.to_string());
        }

        // Tear down any stale socket or pending timer before dialing.
        let gen = inner.generation.fetch_add(1, Ordering::SeqCst) + 1;
        inner.abort_tasks();
        inner.should_reconnect.store(true, Ordering::SeqCst);
        *inner.state.lock().unwrap() = ConnState::Connecting;
        inner.notify_status(FeedStatus::Connecting);

        let url = {
            let token = inner.token.lock().unwrap().clone();
            ws_url(&inner.base_url, P::PATH, token.as_deref())
        };
        let url = match url {
            Ok(u) => u,
            Err(e) => {
                tracing::warn!(feed = P::PATH, error = %e, "socket setup failed");
                inner.notify_error(&e);
                Self::schedule_after_close(inner, gen);
                return;
            }
        };

        tracing::info!(
            feed = P::PATH,
            attempt = inner.attempts.load(Ordering::SeqCst) + 1,
            max = inner.policy.max_attempts,
            "connecting"
        );
        let handle = tokio::spawn(Self::run_socket(Arc::clone(inner), url, gen));
        inner.tasks.lock().unwrap().socket = Some(handle);
    }

    async fn run_socket(inner: Arc<Self>, url: String, gen: u64) {
        match connect_async(url.as_str()).await {
            Ok((mut ws, _)) => {
                if inner.stale(gen) {
                    return;
                }
                inner.attempts.store(0, Ordering::SeqCst);
                *inner.state.lock().unwrap() = ConnState::Open;
                tracing::info!(feed = P::PATH, "connected");
                inner.notify_status(FeedStatus::Connected);

                while let Some(frame) = ws.next().await {
                    if inner.stale(gen) {
                        return;
                    }
                    match frame {
                        Ok(Message::Text(text)) => match P::parse(&text) {
                            Ok(ev) => inner.notify_message(&ev),
                            Err(e) => {
                                // Malformed payloads are dropped; the socket stays up.
                                tracing::warn!(feed = P::PATH, error = %e, "dropping message");
                                inner.notify_error(&e);
                            }
                        },
                        Ok(Message::Close(_)) => break,
                        Ok(_) => {}
                        Err(e) => {
                            inner.notify_status(FeedStatus::Error);
                            inner.notify_error(&FeedError::Connect(e.to_string()));
                            break;
                        }
                    }
                }
                if inner.stale(gen) {
                    return;
                }
                Self::handle_close(&inner, gen);
            }
            Err(e) => {
                if inner.stale(gen) {
                    return;
                }
                inner.notify_status(FeedStatus::Error);
                inner.notify_error(&FeedError::Connect(e.to_string()));
                Self::handle_close(&inner, gen);
            }
        }
    }

    fn handle_close(inner: &Arc<Self>, gen: u64) {
        *inner.state.lock().unwrap() = ConnState::Idle;
        tracing::info!(feed = P::PATH, "disconnected");
        inner.notify_status(FeedStatus::Disconnected);
        Self::schedule_after_close(inner, gen);
    }

    fn schedule_after_close(inner: &Arc<Self>, gen: u64) {
        let should = inner.should_reconnect.load(Ordering::SeqCst);
        let attempts = inner.attempts.load(Ordering::SeqCst);
        match inner.policy.on_close(should, attempts) {
            CloseAction::Reconnect { attempt, delay } => {
                inner.attempts.store(attempt, Ordering::SeqCst);
                *inner.state.lock().unwrap() = ConnState::Reconnecting { attempt };
                tracing::warn!(
                    feed = P::PATH,
                    attempt,
                    max = inner.policy.max_attempts,
                    delay_ms = delay.as_millis() as u64,
                    "scheduling reconnect"
                );
                let arc = Arc::clone(inner);
                let handle = tokio::spawn(async move {
                    tokio::time::sleep(delay).await;
                    if arc.stale(gen) {
                        return;
                    }
                    if arc.should_reconnect.load(Ordering::SeqCst)
                        && arc.attempts.load(Ordering::SeqCst) <= arc.policy.max_attempts
                    {
                        Self::connect(&arc, None);
                    }
                });
                let mut tasks = inner.tasks.lock().unwrap();
                // Invariant: never two live reconnect timers for one connection.
                if let Some(t) = tasks.timer.take() {
                    t.abort();
                }
                tasks.timer = Some(handle);
            }
            CloseAction::GiveUp => {
                tracing::warn!(
                    feed = P::PATH,
                    attempts,
                    "reconnect attempts exhausted, staying down until reconnect()"
                );
                inner.should_reconnect.store(false, Ordering::SeqCst);
                *inner.state.lock().unwrap() = ConnState::Stopped;
            }
            CloseAction::Stay => {}
        }
    }

    fn disconnect(inner: &Arc<Self>) {
        inner.should_reconnect.store(false, Ordering::SeqCst);
        // Fence any in-flight delivery from the old socket.
        inner.generation.fetch_add(1, Ordering::SeqCst);
        inner.abort_tasks();
        *inner.state.lock().unwrap() = ConnState::Idle;
        tracing::info!(feed = P::PATH, "disconnecting manually");
        inner.notify_status(FeedStatus::Disconnected);
    }

    fn reconnect(inner: &Arc<Self>) {
        tracing::info!(feed = P::PATH, "manual reconnect");
        inner.attempts.store(0, Ordering::SeqCst);
        Self::disconnect(inner);
        inner.should_reconnect.store(true, Ordering::SeqCst);
        let gen = inner.generation.load(Ordering::SeqCst);
        let arc = Arc::clone(inner);
        let handle = tokio::spawn(async move {
            tokio::time::sleep(RECONNECT_SETTLE).await;
            if arc.stale(gen) {
                return;
            }
            Self::connect(&arc, None);
        });
        inner.tasks.lock().unwrap().timer = Some(handle);
    }
}

pub struct FeedClient<P: FeedParser> {
    inner: Arc<Inner<P>>,
}

impl<P: FeedParser> Clone for FeedClient<P> {
    fn clone(&self) -> Self {
        Self {
            inner: Arc::clone(&self.inner),
        }
    }
}

impl<P: FeedParser> FeedClient<P> {
    pub fn new(base_url: impl Into<String>) -> Self {
        Self::with_policy(base_url, ReconnectPolicy::default())
    }

    pub fn with_policy(base_url: impl Into<String>, policy: ReconnectPolicy) -> Self {
        Self {
            inner: Arc::new(Inner {
                base_url: base_url.into(),
                policy,
                messages: Registry::new(),
                errors: Registry::new(),
                status: Registry::new(),
                state: Mutex::new(ConnState::Idle),
                attempts: AtomicU32::new(0),
                should_reconnect: AtomicBool::new(true),
                generation: AtomicU64::new(0),
                token: Mutex::new(None),
                tasks: Mutex::new(TaskSlots::default()),
            }),
        }
    }

    pub fn on_message<F>(&self, f: F) -> Subscription
    where
        F: Fn(&P::Event) + Send + Sync + 'static,
    {
        self.inner.messages.add(Arc::new(f))
    }

    pub fn on_error<F>(&self, f: F) -> Subscription
    where
        F: Fn(&FeedError) + Send + Sync + 'static,
    {
        self.inner.errors.add(Arc::new(f))
    }

    pub fn on_status<F>(&self, f: F) -> Subscription
    where
        F: Fn(FeedStatus) + Send + Sync + 'static,
    {
        self.inner.status.add(Arc::new(f))
    }

    /// Open the feed. No-op while a socket is connecting or open. Must be
    /// called from within a tokio runtime.
    pub fn connect(&self, token: Option<&str>) {
        Inner::connect(&self.inner, token);
    }

    /// Stop the feed and any pending reconnect. Idempotent.
    pub fn disconnect(&self) {
        Inner::disconnect(&self.inner);
    }

    /// Reset the backoff budget and force a fresh dial after a short settle.
    pub fn reconnect(&self) {
        Inner::reconnect(&self.inner);
    }

    /// Swap the bearer token; a live connection is re-dialed to pick it up.
    pub fn update_token(&self, token: Option<&str>) {
        let changed = {
            let mut current = self.inner.token.lock().unwrap();
            let new = token.map(str::to_string);
            let changed = *current != new;
            *current = new;
            changed
        };
        if changed && self.is_connected() {
            tracing::info!(feed = P::PATH, "auth token changed, reconnecting");
            Inner::reconnect(&self.inner);
        }
    }

    pub fn state(&self) -> ConnState {
        *self.inner.state.lock().unwrap()
    }

    pub fn is_connected(&self) -> bool {
        matches!(self.state(), ConnState::Open)
    }

    pub fn attempts(&self) -> u32 {
        self.inner.attempts.load(Ordering::SeqCst)
    }
}
