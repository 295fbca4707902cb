//! Rate-Limiting Utilities
//!
//! Generic debounce and throttle helpers for callers that trigger lookups
//! from high-frequency UI events such as continuous map panning. They reduce
//! the rate at which lookups are attempted at all, complementing the cache's
//! deduplication rather than replacing it. No dependency on cache internals.

use std::future::Future;
use std::time::{Duration, Instant};

use parking_lot::Mutex;
use tokio::task::JoinHandle;

// == Debouncer ==
/// Delays an action until calls quiesce for the configured interval.
///
/// Each call re-arms the timer and replaces the pending action, so only the
/// last action of a burst runs. In leading-edge mode the first call of a
/// burst runs immediately and subsequent calls inside the window are treated
/// as trailing.
pub struct Debouncer {
    /// Quiescence window
    delay: Duration,
    /// Fire the first call of a burst immediately
    leading: bool,
    /// Timer task for the current window, if one is open
    pending: Mutex<Option<JoinHandle<()>>>,
}

impl Debouncer {
    // == Constructor ==
    /// Creates a trailing-edge debouncer with the given quiescence window.
    pub fn new(delay: Duration) -> Self {
        Self {
            delay,
            leading: false,
            pending: Mutex::new(None),
        }
    }

    /// Switches to leading-edge mode.
    pub fn leading_edge(mut self) -> Self {
        self.leading = true;
        self
    }

    // == Call ==
    /// Schedules `action` according to the debounce policy, replacing any
    /// action still waiting from an earlier call.
    pub fn call<F, Fut>(&self, action: F)
    where
        F: FnOnce() -> Fut + Send + 'static,
        Fut: Future<Output = ()> + Send + 'static,
    {
        let mut pending = self.pending.lock();

        let window_open = pending
            .as_ref()
            .map(|handle| !handle.is_finished())
            .unwrap_or(false);
        if let Some(handle) = pending.take() {
            handle.abort();
        }

        if self.leading && !window_open {
            // First call of a burst: fire now, keep a quiet window open so
            // calls landing inside it debounce as trailing
            tokio::spawn(action());
            *pending = Some(tokio::spawn(tokio::time::sleep(self.delay)));
        } else {
            let delay = self.delay;
            *pending = Some(tokio::spawn(async move {
                tokio::time::sleep(delay).await;
                // Detach so a later call can no longer cancel a fired action
                tokio::spawn(action());
            }));
        }
    }

    // == Cancel ==
    /// Drops any action still waiting for its window to close.
    pub fn cancel(&self) {
        if let Some(handle) = self.pending.lock().take() {
            handle.abort();
        }
    }
}

// == Throttle ==
/// Caps execution to at most once per interval; excess calls are dropped.
pub struct Throttle {
    /// Minimum spacing between permitted calls
    interval: Duration,
    /// Earliest instant the next call is permitted
    next_allowed: Mutex<Option<Instant>>,
}

impl Throttle {
    // == Constructor ==
    /// Creates a throttle with the given minimum interval.
    pub fn new(interval: Duration) -> Self {
        Self {
            interval,
            next_allowed: Mutex::new(None),
        }
    }

    // == Try Acquire ==
    /// Returns true and opens a new interval if a call is permitted now.
    pub fn try_acquire(&self) -> bool {
        let mut next = self.next_allowed.lock();
        let now = Instant::now();
        match *next {
            Some(t) if now < t => false,
            _ => {
                *next = Some(now + self.interval);
                true
            }
        }
    }

    // == Run ==
    /// Spawns `action` only if the interval has elapsed; otherwise drops it.
    ///
    /// Returns whether the action was scheduled.
    pub fn run<F, Fut>(&self, action: F) -> bool
    where
        F: FnOnce() -> Fut,
        Fut: Future<Output = ()> + Send + 'static,
    {
        if self.try_acquire() {
            tokio::spawn(action());
            true
        } else {
            false
        }
    }
}
