//! Reconnect backoff policy and the explicit connection state machine.

use std::time::Duration;

/// Connection lifecycle, driven by explicit transitions rather than socket
/// callbacks. `Stopped` means the backoff budget is spent and only a manual
/// `reconnect()` revives the feed.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ConnState {
    Idle,
    Connecting,
    Open,
    Reconnecting { attempt: u32 },
    Stopped,
}

impl ConnState {
    /// True while a socket is being established or already open; `connect()`
    /// is a no-op in these states.
    pub fn is_active(&self) -> bool {
        matches!(self, ConnState::Connecting | ConnState::Open)
    }
}

/// What a close (or failed connect) should do next.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CloseAction {
    Reconnect { attempt: u32, delay: Duration },
    GiveUp,
    Stay,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ReconnectPolicy {
    pub base_delay: Duration,
    pub max_delay: Duration,
    pub max_attempts: u32,
}

impl Default for ReconnectPolicy {
    fn default() -> Self {
        Self {
            base_delay: Duration::from_millis(5000),
            max_delay: Duration::from_millis(60_000),
            max_attempts: 10,
        }
    }
}

impl ReconnectPolicy {
    /// Backoff delay for the given 1-based attempt: 5s, 10s, 20s, 40s, 60s, 60s...
    pub fn delay_for(&self, attempt: u32) -> Duration {
        let exp = attempt.saturating_sub(1).min(31);
        let delay = self.base_delay.saturating_mul(2u32.saturating_pow(exp));
        delay.min(self.max_delay)
    }

    /// Transition for a close event given the current flags. Attempt counters
    /// are 0-based going in; the returned attempt is the 1-based one to run.
    pub fn on_close(&self, should_reconnect: bool, attempts: u32) -> CloseAction {
        if should_reconnect && attempts < self.max_attempts {
            let attempt = attempts + 1;
            CloseAction::Reconnect {
                attempt,
                delay: self.delay_for(attempt),
            }
        } else if attempts >= self.max_attempts {
            CloseAction::GiveUp
        } else {
            CloseAction::Stay
        }
    }
}
