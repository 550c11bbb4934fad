//! Cross-pane scroll propagation.
//!
//! Every pane reports its scroll events here. Horizontal offsets fan out to
//! the header, the main body and the sticky scrollbar; vertical offsets fan
//! out across the main and fixed bodies. A [`ScrollLock`] records which pane
//! drives the current tick, so the scroll events raised by programmatic
//! writes on the other panes are dropped instead of re-broadcast.
//!
//! Vertical mirroring goes through the same lock as horizontal propagation:
//! a fixed body's scroll is only mirrored when it owns (or can take) the lock.

use std::collections::BTreeMap;
use std::rc::Rc;

use serde::Serialize;

use super::lock::{Clock, ScrollLock, SystemClock};
use super::sticky::StickyScrollBarController;
use super::{same_offset, PaneId};
use crate::host::{ScrollMetrics, ScrollSurface};

/// Whether more content exists beyond either horizontal edge.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Ping {
    pub left: bool,
    pub right: bool,
}

impl Ping {
    pub fn from_metrics(scroll_left: f64, metrics: &ScrollMetrics) -> Self {
        Self {
            left: scroll_left > 0.0,
            right: scroll_left < metrics.scroll_width - metrics.client_width,
        }
    }
}

/// A scroll notification from one pane. Absent offsets are read from the
/// source pane's surface when it has one.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ScrollEvent {
    pub source: PaneId,
    pub scroll_left: Option<f64>,
    pub scroll_top: Option<f64>,
    /// Take the lock even if another pane holds it
    pub ignore_lock: bool,
}

impl ScrollEvent {
    /// A native scroll event; offsets come from the source surface.
    pub fn native(source: PaneId) -> Self {
        Self {
            source,
            scroll_left: None,
            scroll_top: None,
            ignore_lock: false,
        }
    }

    pub fn horizontal(source: PaneId, scroll_left: f64) -> Self {
        Self {
            scroll_left: Some(scroll_left),
            ..Self::native(source)
        }
    }

    pub fn vertical(source: PaneId, scroll_top: f64) -> Self {
        Self {
            scroll_top: Some(scroll_top),
            ..Self::native(source)
        }
    }

    pub fn ignoring_lock(mut self) -> Self {
        self.ignore_lock = true;
        self
    }
}

/// What one [`ScrollCoordinator::on_scroll`] call did.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ScrollOutcome {
    /// False when another pane held the lock
    pub accepted: bool,
    pub forwarded_left: Vec<PaneId>,
    pub forwarded_top: Vec<PaneId>,
    /// Recomputed when a new horizontal offset was propagated
    pub ping: Option<Ping>,
}

/// Hub all panes report to and receive scroll writes from.
pub struct ScrollCoordinator {
    panes: BTreeMap<PaneId, Box<dyn ScrollSurface>>,
    sticky: Option<StickyScrollBarController>,
    lock: ScrollLock,
    horizontal: bool,
    vertical: bool,
    last_left: Option<f64>,
    last_top: Option<f64>,
    ping: Ping,
}

impl Default for ScrollCoordinator {
    fn default() -> Self {
        Self::new(Rc::new(SystemClock))
    }
}

impl std::fmt::Debug for ScrollCoordinator {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ScrollCoordinator")
            .field("panes", &self.panes.keys().collect::<Vec<_>>())
            .field("lock", &self.lock)
            .field("last_left", &self.last_left)
            .field("last_top", &self.last_top)
            .field("ping", &self.ping)
            .finish()
    }
}

impl ScrollCoordinator {
    pub fn new(clock: Rc<dyn Clock>) -> Self {
        Self {
            panes: BTreeMap::new(),
            sticky: None,
            lock: ScrollLock::new(clock),
            horizontal: false,
            vertical: false,
            last_left: None,
            last_top: None,
            ping: Ping::default(),
        }
    }

    /// Enable horizontal (`scroll.x`) and vertical (`scroll.y`) propagation.
    pub fn set_axes(&mut self, horizontal: bool, vertical: bool) {
        self.horizontal = horizontal;
        self.vertical = vertical;
    }

    pub fn attach(&mut self, pane: PaneId, surface: Box<dyn ScrollSurface>) {
        log::trace!("attach {pane:?}");
        self.panes.insert(pane, surface);
    }

    pub fn detach(&mut self, pane: PaneId) {
        self.panes.remove(&pane);
        if self.lock.owner() == Some(pane) {
            self.lock.release();
        }
    }

    pub fn is_attached(&self, pane: PaneId) -> bool {
        self.panes.contains_key(&pane)
    }

    pub fn metrics(&self, pane: PaneId) -> Option<ScrollMetrics> {
        self.panes
            .get(&pane)
            .filter(|s| s.is_mounted())
            .map(|s| s.metrics())
    }

    pub fn set_sticky(&mut self, sticky: Option<StickyScrollBarController>) {
        self.sticky = sticky;
    }

    pub fn sticky(&self) -> Option<&StickyScrollBarController> {
        self.sticky.as_ref()
    }

    pub fn sticky_mut(&mut self) -> Option<&mut StickyScrollBarController> {
        self.sticky.as_mut()
    }

    pub fn ping(&self) -> Ping {
        self.ping
    }

    pub fn lock_owner(&self) -> Option<PaneId> {
        self.lock.owner()
    }

    /// Last propagated horizontal offset.
    pub fn scroll_left(&self) -> Option<f64> {
        self.last_left
    }

    pub fn scroll_top(&self) -> Option<f64> {
        self.last_top
    }

    /// Handle a scroll notification from `event.source`.
    pub fn on_scroll(&mut self, event: ScrollEvent) -> ScrollOutcome {
        let source = event.source;
        let source_metrics = self.metrics(source);

        let accepted = if event.ignore_lock {
            self.lock.release();
            self.lock.try_acquire(source)
        } else {
            self.lock.try_acquire(source)
        };
        if !accepted {
            log::trace!("{source:?} scroll dropped, lock held by {:?}", self.lock.owner());
            return ScrollOutcome::default();
        }

        let mut outcome = ScrollOutcome {
            accepted: true,
            ..ScrollOutcome::default()
        };

        let top = event
            .scroll_top
            .or_else(|| source_metrics.map(|m| m.scroll_top))
            .filter(|v| v.is_finite());
        if let Some(top) = top {
            outcome.forwarded_top = self.propagate_top(source, top);
        }

        let left = event
            .scroll_left
            .or_else(|| source_metrics.map(|m| m.scroll_left))
            .filter(|v| v.is_finite());
        if let Some(left) = left {
            if self.horizontal && source.scrolls_horizontally() && self.last_left != Some(left) {
                outcome.forwarded_left = self.propagate_left(source, left);
                self.last_left = Some(left);

                let ping_metrics = source_metrics.or_else(|| self.metrics(PaneId::Body));
                if let Some(metrics) = ping_metrics {
                    self.ping = Ping::from_metrics(left, &metrics);
                    outcome.ping = Some(self.ping);
                }
            }
        }
        outcome
    }

    /// Re-run propagation from the main body as if it had just scrolled.
    pub fn resync(&mut self) -> ScrollOutcome {
        self.last_left = None;
        self.on_scroll(ScrollEvent::native(PaneId::Body).ignoring_lock())
    }

    fn propagate_left(&mut self, source: PaneId, left: f64) -> Vec<PaneId> {
        let mut forwarded = Vec::new();
        for target in [PaneId::Header, PaneId::Body] {
            if target == source {
                continue;
            }
            let Some(surface) = self.panes.get(&target).filter(|s| s.is_mounted()) else {
                continue;
            };
            if !same_offset(surface.metrics().scroll_left, left) {
                surface.set_scroll_left(left);
                forwarded.push(target);
            }
        }

        let body = self.metrics(PaneId::Body);
        if let Some(sticky) = self.sticky.as_mut() {
            if let Some(body) = body {
                sticky.set_body_size(body.scroll_width, body.client_width);
            }
            if source != PaneId::StickyScrollBar {
                sticky.set_scroll_left(left);
                forwarded.push(PaneId::StickyScrollBar);
            }
        }
        log::trace!("scrollLeft {left} from {source:?} -> {forwarded:?}");
        forwarded
    }

    fn propagate_top(&mut self, source: PaneId, top: f64) -> Vec<PaneId> {
        let mut forwarded = Vec::new();
        if self.vertical && source != PaneId::Header && self.last_top != Some(top) {
            for target in [PaneId::FixedLeftBody, PaneId::FixedRightBody, PaneId::Body] {
                if target == source {
                    continue;
                }
                let Some(surface) = self.panes.get(&target).filter(|s| s.is_mounted()) else {
                    continue;
                };
                if !same_offset(surface.metrics().scroll_top, top) {
                    surface.set_scroll_top(top);
                    forwarded.push(target);
                }
            }
            if !forwarded.is_empty() {
                log::trace!("scrollTop {top} from {source:?} -> {forwarded:?}");
            }
        }
        self.last_top = Some(top);
        forwarded
    }

    /// Drop every pane and all transient state.
    pub fn dispose(&mut self) {
        self.panes.clear();
        self.lock.release();
        if let Some(sticky) = self.sticky.as_mut() {
            sticky.reset();
        }
        self.last_left = None;
        self.last_top = None;
        self.ping = Ping::default();
    }
}
