//! App state and main loop: input handling, feed events, aggregation, drawing.

use std::io;
use std::time::Duration;

use chrono::Utc;
use crossterm::{
    event::{self, DisableMouseCapture, EnableMouseCapture, Event, KeyCode},
    execute,
    terminal::{disable_raw_mode, enable_raw_mode, EnterAlternateScreen, LeaveAlternateScreen},
};
use ratatui::{
    backend::CrosstermBackend,
    layout::{Constraint, Direction, Layout},
    Terminal,
};
use tokio::sync::mpsc;
use tokio::time::sleep;

use crate::config::Config;
use crate::feed::{FeedClient, FeedStatus, Subscription};
use crate::history::OccupancyHistory;
use crate::notify::{Notification, NotificationQueue};
use crate::poll::spawn_poller;
use crate::stats::LotState;
use crate::types::{BarrierEvent, BarrierFeed, DetectionFrame, PredictionsFeed};
use crate::ui::barrier::draw_barriers;
use crate::ui::detections::draw_detections;
use crate::ui::header::draw_header;
use crate::ui::lot::{draw_cameras, draw_occupancy_spark};
use crate::ui::toast::draw_toast;

/// Everything the feeds push at the UI, serialized onto one channel so the
/// aggregator only ever runs on the draw loop.
pub enum FeedEvent {
    Detections(DetectionFrame),
    Barrier(BarrierEvent),
    PredictionsStatus(FeedStatus),
    BarrierStatus(FeedStatus),
    PredictionsError(String),
    BarrierError(String),
}

pub struct App {
    lot: LotState,
    history: OccupancyHistory,
    should_quit: bool,
}

impl App {
    pub fn new(config: &Config) -> Self {
        Self {
            lot: LotState::new(&config.camera_capacities()),
            history: OccupancyHistory::new(config.camera_count, 600),
            should_quit: false,
        }
    }

    pub async fn run(
        &mut self,
        config: &Config,
        token: Option<&str>,
        poll_mode: bool,
    ) -> anyhow::Result<()> {
        let (tx, rx) = mpsc::unbounded_channel();
        let toasts = NotificationQueue::new(config.toast_timeout);

        let predictions = FeedClient::<PredictionsFeed>::new(&config.api_url);
        let barrier = FeedClient::<BarrierFeed>::new(&config.api_url);

        // Registrations live as long as the app; keep the handles around.
        let mut subs: Vec<Subscription> = Vec::new();
        {
            let tx = tx.clone();
            subs.push(predictions.on_message(move |frame| {
                let _ = tx.send(FeedEvent::Detections(frame.clone()));
            }));
        }
        {
            let tx = tx.clone();
            subs.push(predictions.on_status(move |st| {
                let _ = tx.send(FeedEvent::PredictionsStatus(st));
            }));
        }
        {
            let tx = tx.clone();
            subs.push(predictions.on_error(move |err| {
                let _ = tx.send(FeedEvent::PredictionsError(err.to_string()));
            }));
        }
        {
            let tx = tx.clone();
            subs.push(barrier.on_message(move |ev| {
                let _ = tx.send(FeedEvent::Barrier(ev.clone()));
            }));
        }
        {
            let tx = tx.clone();
            subs.push(barrier.on_status(move |st| {
                let _ = tx.send(FeedEvent::BarrierStatus(st));
            }));
        }
        {
            let tx = tx.clone();
            subs.push(barrier.on_error(move |err| {
                let _ = tx.send(FeedEvent::BarrierError(err.to_string()));
            }));
        }

        let mut poller = None;
        if poll_mode {
            // Legacy REST fallback replaces the predictions socket entirely.
            let (ptx, mut prx) = mpsc::unbounded_channel();
            poller = Some(spawn_poller(
                config.api_url.clone(),
                config.poll_interval,
                ptx,
            ));
            let tx = tx.clone();
            tokio::spawn(async move {
                while let Some(frame) = prx.recv().await {
                    if tx.send(FeedEvent::Detections(frame)).is_err() {
                        break;
                    }
                }
            });
            // No handshake in polling mode; show the feed as live right away.
            self.lot.apply_predictions_status(FeedStatus::Connected);
        } else {
            predictions.connect(token);
        }
        barrier.connect(token);

        // Terminal setup
        enable_raw_mode()?;
        let mut stdout = io::stdout();
        execute!(stdout, EnterAlternateScreen, EnableMouseCapture)?;
        let backend = CrosstermBackend::new(stdout);
        let mut terminal = Terminal::new(backend)?;
        terminal.clear()?;

        // Main loop
        let res = self
            .event_loop(&mut terminal, rx, &toasts, &predictions, &barrier, poll_mode)
            .await;

        // Teardown
        predictions.disconnect();
        barrier.disconnect();
        if let Some(p) = poller {
            p.abort();
        }
        disable_raw_mode()?;
        let backend = terminal.backend_mut();
        execute!(backend, DisableMouseCapture, LeaveAlternateScreen)?;
        terminal.show_cursor()?;

        res
    }

    async fn event_loop<B: ratatui::backend::Backend>(
        &mut self,
        terminal: &mut Terminal<B>,
        mut rx: mpsc::UnboundedReceiver<FeedEvent>,
        toasts: &NotificationQueue,
        predictions: &FeedClient<PredictionsFeed>,
        barrier: &FeedClient<BarrierFeed>,
        poll_mode: bool,
    ) -> anyhow::Result<()> {
        loop {
            // Input (non-blocking)
            while event::poll(Duration::from_millis(10))? {
                match event::read()? {
                    Event::Key(k) => match k.code {
                        KeyCode::Char('q') | KeyCode::Char('Q') | KeyCode::Esc => {
                            self.should_quit = true;
                        }
                        KeyCode::Char('r') | KeyCode::Char('R') => {
                            // In polling mode there is no predictions socket to revive.
                            if !poll_mode {
                                predictions.reconnect();
                            }
                            barrier.reconnect();
                        }
                        KeyCode::Char('d') | KeyCode::Char('D') => {
                            toasts.dismiss();
                        }
                        _ => {}
                    },
                    Event::Resize(_, _) => {}
                    _ => {}
                }
            }
            if self.should_quit {
                break;
            }

            // Drain feed events into the aggregator
            while let Ok(ev) = rx.try_recv() {
                self.apply_event(ev, toasts);
            }

            // Draw
            let current_toast = toasts.current();
            terminal.draw(|f| self.draw(f, current_toast.as_ref()))?;

            // Tick rate
            sleep(Duration::from_millis(250)).await;
        }

        Ok(())
    }

    pub fn apply_event(&mut self, ev: FeedEvent, toasts: &NotificationQueue) {
        match ev {
            FeedEvent::Detections(frame) => {
                let cam = frame.cam_index;
                if let Some(n) = self.lot.apply_detections(&frame, Utc::now()) {
                    toasts.push(n);
                }
                if let Some(stats) = self.lot.stats_for(cam) {
                    self.history.push_sample(cam, stats.occupied_spots);
                }
            }
            FeedEvent::Barrier(ev) => self.lot.apply_barrier(&ev),
            FeedEvent::PredictionsStatus(st) => self.lot.apply_predictions_status(st),
            FeedEvent::BarrierStatus(st) => self.lot.apply_barrier_status(st),
            FeedEvent::PredictionsError(msg) => self.lot.record_predictions_error(msg),
            FeedEvent::BarrierError(msg) => self.lot.record_barrier_error(msg),
        }
    }

    pub fn draw(&mut self, f: &mut ratatui::Frame<'_>, toast: Option<&Notification>) {
        let area = f.area();
        let cam_rows = (self.lot.camera_count().max(1) * 3) as u16;

        // Root rows: header, per-camera gauges, lot sparkline, bottom panels
        let rows = Layout::default()
            .direction(Direction::Vertical)
            .constraints([
                Constraint::Length(1),
                Constraint::Length(cam_rows),
                Constraint::Length(6),
                Constraint::Min(6),
            ])
            .split(area);

        draw_header(f, rows[0], &self.lot);
        draw_cameras(f, rows[1], &self.lot);
        let updated = self
            .lot
            .last_updated()
            .map(|t| format!(" | last frame {}", crate::ui::util::clock(t)))
            .unwrap_or_default();
        draw_occupancy_spark(
            f,
            rows[2],
            &format!(
                "Lot occupancy — now: {} of {}{updated}",
                self.lot.total_occupied(),
                self.lot.total_spots()
            ),
            &self.history.total_series(),
        );

        let bottom = Layout::default()
            .direction(Direction::Horizontal)
            .constraints([Constraint::Percentage(55), Constraint::Percentage(45)])
            .split(rows[3]);
        draw_detections(f, bottom[0], &self.lot);
        draw_barriers(f, bottom[1], &self.lot);

        // Toast floats over everything, bottom-right.
        if let Some(t) = toast {
            draw_toast(f, area, t);
        }
    }
}
