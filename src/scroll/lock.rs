//! Ownership token for the in-flight scroll tick.

use std::fmt;
use std::rc::Rc;

use super::PaneId;

/// How long a pane keeps ownership after its last scroll event.
pub const LOCK_TIMEOUT_MS: f64 = 100.0;

/// Monotonic milliseconds.
pub trait Clock {
    fn now_ms(&self) -> f64;
}

/// Wall clock: `Instant` natively, `Date.now()` on wasm32.
#[derive(Debug, Clone, Copy, Default)]
pub struct SystemClock;

#[cfg(not(target_arch = "wasm32"))]
impl Clock for SystemClock {
    fn now_ms(&self) -> f64 {
        use std::sync::OnceLock;
        use std::time::Instant;
        static START: OnceLock<Instant> = OnceLock::new();
        START.get_or_init(Instant::now).elapsed().as_secs_f64() * 1000.0
    }
}

#[cfg(target_arch = "wasm32")]
impl Clock for SystemClock {
    fn now_ms(&self) -> f64 {
        js_sys::Date::now()
    }
}

/// A clock advanced by hand. Clones share the same time.
#[derive(Debug, Clone, Default)]
pub struct ManualClock(Rc<std::cell::Cell<f64>>);

impl ManualClock {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn advance(&self, ms: f64) {
        self.0.set(self.0.get() + ms);
    }

    pub fn set(&self, ms: f64) {
        self.0.set(ms);
    }
}

impl Clock for ManualClock {
    fn now_ms(&self) -> f64 {
        self.0.get()
    }
}

/// At most one pane owns propagation at a time. Ownership lapses
/// [`LOCK_TIMEOUT_MS`] after the owner's last acquire.
pub struct ScrollLock {
    owner: Option<PaneId>,
    expires_at: f64,
    clock: Rc<dyn Clock>,
}

impl ScrollLock {
    pub fn new(clock: Rc<dyn Clock>) -> Self {
        Self {
            owner: None,
            expires_at: 0.0,
            clock,
        }
    }

    /// Current owner, `None` once expired.
    pub fn owner(&self) -> Option<PaneId> {
        self.owner
            .filter(|_| self.clock.now_ms() < self.expires_at)
    }

    /// Take or refresh ownership for `pane`. Fails while another pane holds it.
    pub fn try_acquire(&mut self, pane: PaneId) -> bool {
        match self.owner() {
            Some(owner) if owner != pane => false,
            _ => {
                self.owner = Some(pane);
                self.expires_at = self.clock.now_ms() + LOCK_TIMEOUT_MS;
                true
            }
        }
    }

    pub fn release(&mut self) {
        self.owner = None;
    }
}

impl fmt::Debug for ScrollLock {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ScrollLock")
            .field("owner", &self.owner())
            .field("expires_at", &self.expires_at)
            .finish()
    }
}
