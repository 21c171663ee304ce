//! The timer collaborator and the rate limiters built on it.
//!
//! Timers are identified by [`TimerId`]. When one fires, the host calls back
//! into the controller with the id; whoever armed it recognizes its own id
//! and acts. [`Debounce`] and [`Throttle`] follow the same pattern: `call`
//! decides whether to run now, `fire` decides whether a deadline that just
//! elapsed belongs to them and should run the deferred work.

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct TimerId(pub u64);

/// Repeating and one-shot callbacks, cancelable by id.
pub trait Timer {
    /// Schedule a callback every `period_ms` until cleared.
    fn set_interval(&mut self, period_ms: u64) -> TimerId;

    /// Schedule a single callback after `delay_ms`.
    fn set_timeout(&mut self, delay_ms: u64) -> TimerId;

    /// Cancel a timer. Clearing an unknown or already-fired id is a no-op.
    fn clear(&mut self, id: TimerId);
}

/// Trailing-edge debounce: only the last call in a burst runs, `wait_ms`
/// after the burst ends. A zero wait runs every call immediately.
#[derive(Debug, Clone, Default)]
pub struct Debounce {
    wait_ms: u64,
    pending: Option<TimerId>,
}

impl Debounce {
    pub fn new(wait_ms: u64) -> Self {
        Self {
            wait_ms,
            pending: None,
        }
    }

    /// Register a call. Returns `true` if the work should run right now.
    pub fn call(&mut self, timer: &mut dyn Timer) -> bool {
        if self.wait_ms == 0 {
            return true;
        }
        if let Some(id) = self.pending.take() {
            timer.clear(id);
        }
        self.pending = Some(timer.set_timeout(self.wait_ms));
        false
    }

    /// Returns `true` if `id` is this debounce's deadline.
    pub fn fire(&mut self, id: TimerId) -> bool {
        if self.pending == Some(id) {
            self.pending = None;
            true
        } else {
            false
        }
    }

    pub fn cancel(&mut self, timer: &mut dyn Timer) {
        if let Some(id) = self.pending.take() {
            timer.clear(id);
        }
    }

    pub fn is_pending(&self) -> bool {
        self.pending.is_some()
    }
}

/// Leading-edge throttle with one trailing re-run.
///
/// The first call in a window runs immediately and opens a `limit_ms` window.
/// Calls inside the window are dropped, but if any were dropped the work runs
/// once more when the window closes so the final state is never missed.
#[derive(Debug, Clone, Default)]
pub struct Throttle {
    limit_ms: u64,
    window: Option<TimerId>,
    suppressed: bool,
}

impl Throttle {
    pub fn new(limit_ms: u64) -> Self {
        Self {
            limit_ms,
            window: None,
            suppressed: false,
        }
    }

    /// Register a call. Returns `true` if the work should run right now.
    pub fn call(&mut self, timer: &mut dyn Timer) -> bool {
        if self.limit_ms == 0 {
            return true;
        }
        if self.window.is_some() {
            self.suppressed = true;
            return false;
        }
        self.window = Some(timer.set_timeout(self.limit_ms));
        true
    }

    /// Returns `true` if `id` closed this throttle's window and calls were
    /// dropped inside it.
    pub fn fire(&mut self, id: TimerId) -> bool {
        if self.window != Some(id) {
            return false;
        }
        self.window = None;
        std::mem::take(&mut self.suppressed)
    }

    pub fn cancel(&mut self, timer: &mut dyn Timer) {
        if let Some(id) = self.window.take() {
            timer.clear(id);
        }
        self.suppressed = false;
    }
}
