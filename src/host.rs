//! Host capabilities the engine needs from a rendering surface, plus
//! in-memory hosts.
//!
//! A host must be able to read box and scroll metrics, set scroll offsets,
//! and report rendered row heights after layout. Resize, scroll and pointer
//! subscriptions are driven by the host calling into [`crate::table::Table`].

use std::cell::RefCell;
use std::rc::Rc;

use serde::Serialize;

/// Scroll and box metrics of one scrollable element.
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ScrollMetrics {
    pub scroll_left: f64,
    pub scroll_top: f64,
    pub scroll_width: f64,
    pub client_width: f64,
    pub scroll_height: f64,
    pub client_height: f64,
}

impl ScrollMetrics {
    /// Largest reachable `scrollLeft`.
    pub fn max_scroll_left(&self) -> f64 {
        (self.scroll_width - self.client_width).max(0.0)
    }

    pub fn max_scroll_top(&self) -> f64 {
        (self.scroll_height - self.client_height).max(0.0)
    }

    pub fn overflows_x(&self) -> bool {
        self.scroll_width > self.client_width
    }

    pub fn overflows_y(&self) -> bool {
        self.scroll_height > self.client_height
    }
}

/// An element whose scroll offsets the engine reads and writes.
pub trait ScrollSurface {
    fn metrics(&self) -> ScrollMetrics;
    fn set_scroll_left(&self, px: f64);
    fn set_scroll_top(&self, px: f64);

    /// Unmounted surfaces are skipped by propagation.
    fn is_mounted(&self) -> bool {
        true
    }
}

/// One rendered row reported by a measurement pass.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct MeasuredRow {
    /// Value of the row's `data-row-key`
    pub key: String,
    /// Rendered box height, `None` when the row has no box yet
    pub height: Option<f64>,
}

impl MeasuredRow {
    pub fn new(key: impl Into<String>, height: f64) -> Self {
        Self {
            key: key.into(),
            height: Some(height),
        }
    }

    pub fn unmounted(key: impl Into<String>) -> Self {
        Self {
            key: key.into(),
            height: None,
        }
    }
}

/// The authoritative pane's rendered tree, read after layout has committed.
pub trait MeasureRoot {
    /// Heights of the header sections, top to bottom.
    fn header_heights(&self) -> Vec<Option<f64>>;
    /// Body rows in document order.
    fn body_rows(&self) -> Vec<MeasuredRow>;
}

/// Header section heights with sections of the pinned header pane first.
///
/// Each section is tagged with whether it sits in the header pane; order is
/// otherwise kept, so a body table's own header never shadows the pinned one.
pub fn header_pane_first(sections: impl IntoIterator<Item = (bool, Option<f64>)>) -> Vec<Option<f64>> {
    let (mut pinned, rest): (Vec<_>, Vec<_>) = sections.into_iter().partition(|(in_header, _)| *in_header);
    pinned.extend(rest);
    pinned.into_iter().map(|(_, height)| height).collect()
}

#[derive(Debug, Clone, Default)]
struct PaneState {
    metrics: ScrollMetrics,
    mounted: bool,
    left_writes: usize,
    top_writes: usize,
}

/// In-memory scroll surface. Clones share state, so a test can keep a handle
/// after registering the pane.
#[derive(Debug, Clone)]
pub struct MemoryPane(Rc<RefCell<PaneState>>);

impl Default for MemoryPane {
    fn default() -> Self {
        Self::new(0.0, 0.0)
    }
}

impl MemoryPane {
    /// A mounted pane with the given content and viewport widths.
    pub fn new(scroll_width: f64, client_width: f64) -> Self {
        let metrics = ScrollMetrics {
            scroll_width,
            client_width,
            ..ScrollMetrics::default()
        };
        Self(Rc::new(RefCell::new(PaneState {
            metrics,
            mounted: true,
            ..PaneState::default()
        })))
    }

    pub fn with_height(self, scroll_height: f64, client_height: f64) -> Self {
        {
            let mut state = self.0.borrow_mut();
            state.metrics.scroll_height = scroll_height;
            state.metrics.client_height = client_height;
        }
        self
    }

    pub fn scroll_left(&self) -> f64 {
        self.0.borrow().metrics.scroll_left
    }

    pub fn scroll_top(&self) -> f64 {
        self.0.borrow().metrics.scroll_top
    }

    /// Number of programmatic `scrollLeft` writes received.
    pub fn left_writes(&self) -> usize {
        self.0.borrow().left_writes
    }

    pub fn top_writes(&self) -> usize {
        self.0.borrow().top_writes
    }

    /// Simulate a user scroll: moves the offset without counting a write.
    pub fn user_scroll_left(&self, px: f64) -> f64 {
        let mut state = self.0.borrow_mut();
        state.metrics.scroll_left = clamp(px, state.metrics.max_scroll_left());
        state.metrics.scroll_left
    }

    pub fn user_scroll_top(&self, px: f64) -> f64 {
        let mut state = self.0.borrow_mut();
        state.metrics.scroll_top = clamp(px, state.metrics.max_scroll_top());
        state.metrics.scroll_top
    }

    pub fn set_widths(&self, scroll_width: f64, client_width: f64) {
        let mut state = self.0.borrow_mut();
        state.metrics.scroll_width = scroll_width;
        state.metrics.client_width = client_width;
    }

    pub fn unmount(&self) {
        self.0.borrow_mut().mounted = false;
    }
}

/// Clamp like a browser does; a pane with no overflow information accepts any
/// non-negative offset.
fn clamp(px: f64, max: f64) -> f64 {
    if max > 0.0 {
        px.clamp(0.0, max)
    } else {
        px.max(0.0)
    }
}

impl ScrollSurface for MemoryPane {
    fn metrics(&self) -> ScrollMetrics {
        self.0.borrow().metrics
    }

    fn set_scroll_left(&self, px: f64) {
        let mut state = self.0.borrow_mut();
        state.metrics.scroll_left = clamp(px, state.metrics.max_scroll_left());
        state.left_writes += 1;
    }

    fn set_scroll_top(&self, px: f64) {
        let mut state = self.0.borrow_mut();
        state.metrics.scroll_top = clamp(px, state.metrics.max_scroll_top());
        state.top_writes += 1;
    }

    fn is_mounted(&self) -> bool {
        self.0.borrow().mounted
    }
}

/// In-memory measurement root.
#[derive(Debug, Clone, Default)]
pub struct MemoryMeasureRoot {
    pub header: Vec<Option<f64>>,
    pub rows: Vec<MeasuredRow>,
}

impl MemoryMeasureRoot {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn header(mut self, height: f64) -> Self {
        self.header.push(Some(height));
        self
    }

    pub fn row(mut self, key: impl Into<String>, height: f64) -> Self {
        self.rows.push(MeasuredRow::new(key, height));
        self
    }

    pub fn unmounted_row(mut self, key: impl Into<String>) -> Self {
        self.rows.push(MeasuredRow::unmounted(key));
        self
    }
}

impl MeasureRoot for MemoryMeasureRoot {
    fn header_heights(&self) -> Vec<Option<f64>> {
        self.header.clone()
    }

    fn body_rows(&self) -> Vec<MeasuredRow> {
        self.rows.clone()
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used, clippy::expect_used, clippy::float_cmp)]
mod tests {
    use super::*;

    #[test]
    fn test_header_pane_sections_come_first() {
        let heights = header_pane_first([(false, Some(20.0)), (true, Some(64.0)), (false, None)]);
        assert_eq!(heights, vec![Some(64.0), Some(20.0), None]);
        assert_eq!(header_pane_first([(false, Some(20.0))]), vec![Some(20.0)]);
    }

    #[test]
    fn test_memory_pane_clamps_and_counts() {
        let pane = MemoryPane::new(1000.0, 400.0);
        pane.set_scroll_left(900.0);
        assert_eq!(pane.scroll_left(), 600.0);
        pane.set_scroll_left(-5.0);
        assert_eq!(pane.scroll_left(), 0.0);
        assert_eq!(pane.left_writes(), 2);

        pane.user_scroll_left(10.0);
        assert_eq!(pane.left_writes(), 2);
        assert_eq!(pane.metrics().scroll_left, 10.0);
    }

    #[test]
    fn test_clones_share_state() {
        let pane = MemoryPane::new(500.0, 100.0);
        let handle = pane.clone();
        pane.set_scroll_left(50.0);
        assert_eq!(handle.scroll_left(), 50.0);
        handle.unmount();
        assert!(!pane.is_mounted());
    }
}
