use std::time::{Duration, Instant};

/// Default timer tick interval in milliseconds
pub const DEFAULT_TICK_MS: u64 = 1000;

/// Default input poll interval in milliseconds
pub const DEFAULT_POLL_MS: u64 = 250;

/// Get poll duration for the event loop
pub fn poll_duration(poll_ms: u64) -> Duration {
    Duration::from_millis(poll_ms.max(1))
}

/// Fixed-interval tick source. Fires immediately after `start`, then once per
/// interval; never fires while stopped.
#[derive(Debug, Clone)]
pub struct Ticker {
    interval: Duration,
    active: bool,
    last_fired: Option<Instant>,
}

impl Ticker {
    pub fn new(interval: Duration) -> Self {
        Self {
            interval,
            active: false,
            last_fired: None,
        }
    }

    pub fn interval(&self) -> Duration {
        self.interval
    }

    pub fn is_active(&self) -> bool {
        self.active
    }

    /// Begin ticking; the next poll fires right away
    pub fn start(&mut self) {
        self.active = true;
        self.last_fired = None;
    }

    pub fn stop(&mut self) {
        self.active = false;
        self.last_fired = None;
    }

    /// Whether a tick is due at `now`. Consumes the tick when it is.
    pub fn poll(&mut self, now: Instant) -> bool {
        if !self.active {
            return false;
        }
        let due = match self.last_fired {
            None => true,
            Some(last) => now.saturating_duration_since(last) >= self.interval,
        };
        if due {
            self.last_fired = Some(now);
        }
        due
    }
}

impl Default for Ticker {
    fn default() -> Self {
        Self::new(Duration::from_millis(DEFAULT_TICK_MS))
    }
}
