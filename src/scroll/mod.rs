//! Scroll coordination: ownership lock, propagation hub, sticky scrollbar and
//! scroll-ancestor lookup.

mod ancestor;
mod coordinator;
mod lock;
mod sticky;

pub use ancestor::find_scroll_parent;
pub use coordinator::{Ping, ScrollCoordinator, ScrollEvent, ScrollOutcome};
pub use lock::{Clock, ManualClock, ScrollLock, SystemClock, LOCK_TIMEOUT_MS};
pub use sticky::{StickyBarState, StickyGeometry, StickyOffsets, StickyScrollBarController};

use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::error::TableSyncError;

/// A pane that takes part in scroll propagation.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum PaneId {
    /// Pinned header above the main body
    Header,
    /// Main (unconstrained) body
    Body,
    FixedLeftBody,
    FixedRightBody,
    /// The synthetic sticky scrollbar
    StickyScrollBar,
}

impl PaneId {
    pub fn as_str(self) -> &'static str {
        match self {
            PaneId::Header => "header",
            PaneId::Body => "body",
            PaneId::FixedLeftBody => "fixedLeftBody",
            PaneId::FixedRightBody => "fixedRightBody",
            PaneId::StickyScrollBar => "stickyScrollBar",
        }
    }

    /// Fixed bodies never scroll horizontally, so their offsets are not propagated.
    pub fn scrolls_horizontally(self) -> bool {
        !matches!(self, PaneId::FixedLeftBody | PaneId::FixedRightBody)
    }
}

impl FromStr for PaneId {
    type Err = TableSyncError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "header" => Ok(PaneId::Header),
            "body" => Ok(PaneId::Body),
            "fixedLeftBody" | "left" => Ok(PaneId::FixedLeftBody),
            "fixedRightBody" | "right" => Ok(PaneId::FixedRightBody),
            "stickyScrollBar" | "sticky" => Ok(PaneId::StickyScrollBar),
            other => Err(TableSyncError::Host(format!("unknown pane '{other}'"))),
        }
    }
}

/// Scroll offsets closer than this are the same position.
pub(crate) fn same_offset(a: f64, b: f64) -> bool {
    (a - b).abs() < f64::EPSILON
}
