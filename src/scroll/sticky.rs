//! Synthetic sticky scrollbar and sticky header offsets.

use serde::Serialize;

/// Positions needed to decide whether the sticky scrollbar shows, all in the
/// same document coordinate space.
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct StickyGeometry {
    /// Top edge of the scrolling body
    pub table_top: f64,
    /// Rendered height of the scrolling body
    pub table_height: f64,
    /// Bottom edge of the visible range of the scrolling ancestor
    pub viewport_bottom: f64,
}

/// Visual state of the sticky scrollbar.
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct StickyBarState {
    /// Thumb offset within the track
    pub thumb_left: f64,
    pub thumb_width: f64,
    pub track_width: f64,
    pub translate_y: f64,
    pub bottom: f64,
    pub active: bool,
}

/// A draggable horizontal scrollbar pinned near the viewport's bottom edge.
///
/// The thumb is `clientWidth² / scrollWidth` wide. Dragging converts the thumb
/// offset back into a body `scrollLeft`; [`set_scroll_left`](Self::set_scroll_left)
/// moves the thumb without producing a scroll request.
#[derive(Debug, Clone, Default)]
pub struct StickyScrollBarController {
    client_width: f64,
    scroll_width: f64,
    scrollbar_size: f64,
    offset_scroll: f64,
    content_left: f64,
    thumb_left: f64,
    hidden: bool,
    translate_y: f64,
    /// Pointer x minus thumb offset at pointer-down, while dragging
    drag_delta: Option<f64>,
}

impl StickyScrollBarController {
    pub fn new(scrollbar_size: f64, offset_scroll: f64) -> Self {
        Self {
            scrollbar_size,
            offset_scroll,
            ..Self::default()
        }
    }

    /// Track the main body's content and viewport widths.
    pub fn set_body_size(&mut self, scroll_width: f64, client_width: f64) {
        self.scroll_width = scroll_width;
        self.client_width = client_width;
        self.thumb_left = self.thumb_for(self.content_left);
    }

    pub fn thumb_width(&self) -> f64 {
        if self.scroll_width > 0.0 {
            self.client_width * (self.client_width / self.scroll_width)
        } else {
            0.0
        }
    }

    /// Rendered only when the body overflows and the native scrollbar is off screen.
    pub fn is_rendered(&self) -> bool {
        self.scroll_width > self.client_width && self.thumb_width() > 0.0 && !self.hidden
    }

    pub fn is_hidden(&self) -> bool {
        self.hidden
    }

    pub fn is_dragging(&self) -> bool {
        self.drag_delta.is_some()
    }

    pub fn thumb_left(&self) -> f64 {
        self.thumb_left
    }

    pub fn content_scroll_left(&self) -> f64 {
        self.content_left
    }

    pub fn state(&self) -> StickyBarState {
        StickyBarState {
            thumb_left: self.thumb_left,
            thumb_width: self.thumb_width(),
            track_width: self.client_width,
            translate_y: self.translate_y,
            bottom: self.offset_scroll,
            active: self.is_dragging(),
        }
    }

    pub fn on_pointer_down(&mut self, page_x: f64) {
        self.drag_delta = Some(page_x - self.thumb_left);
    }

    /// Returns the body `scrollLeft` to apply, if dragging. A move with no
    /// button pressed ends the drag (the release happened outside the page).
    pub fn on_pointer_move(&mut self, page_x: f64, pressed: bool) -> Option<f64> {
        let delta = self.drag_delta?;
        if !pressed {
            self.drag_delta = None;
            return None;
        }
        if self.client_width <= 0.0 {
            return None;
        }
        let max_left = (self.client_width - self.thumb_width()).max(0.0);
        let left = (page_x - delta).clamp(0.0, max_left);
        self.thumb_left = left;
        let scroll_left = left / self.client_width * self.scroll_width;
        self.content_left = scroll_left;
        Some(scroll_left)
    }

    pub fn on_pointer_up(&mut self) {
        self.drag_delta = None;
    }

    /// Re-evaluate visibility after the scrolling ancestor moved or resized.
    ///
    /// Hidden while the table's own bottom edge (and so its native
    /// scrollbar) is on screen, or while the table starts below the visible
    /// range. Returns true when visibility flipped; on becoming visible the
    /// thumb is resynchronized from the last known content offset.
    pub fn on_container_scroll(&mut self, geometry: StickyGeometry) -> bool {
        let table_bottom = geometry.table_top + geometry.table_height;
        let hidden = table_bottom - self.scrollbar_size <= geometry.viewport_bottom
            || geometry.table_top >= geometry.viewport_bottom - self.offset_scroll;

        self.translate_y = if hidden {
            0.0
        } else {
            geometry.viewport_bottom - table_bottom - self.scrollbar_size * 2.0
        };

        let flipped = hidden != self.hidden;
        self.hidden = hidden;
        if flipped && !hidden {
            self.thumb_left = self.thumb_for(self.content_left);
        }
        flipped
    }

    /// Move the thumb to mirror a body `scrollLeft`.
    pub fn set_scroll_left(&mut self, px: f64) {
        if !px.is_finite() {
            return;
        }
        self.content_left = px;
        self.thumb_left = self.thumb_for(px);
    }

    fn thumb_for(&self, content_left: f64) -> f64 {
        if self.scroll_width > 0.0 {
            content_left / self.scroll_width * self.client_width
        } else {
            0.0
        }
    }

    pub fn reset(&mut self) {
        self.drag_delta = None;
        self.content_left = 0.0;
        self.thumb_left = 0.0;
        self.translate_y = 0.0;
        self.hidden = false;
    }
}

/// Translations applied to pinned header and summary rows while sticky.
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct StickyOffsets {
    pub header: f64,
    pub summary: f64,
}

impl StickyOffsets {
    /// `header_top` and `foot_top` are the header's and footer's offsets
    /// inside the scrolling ancestor, captured at mount.
    pub fn compute(scroll_top: f64, header_top: f64, foot_top: f64) -> Self {
        let top = scroll_top - header_top - 1.0;
        Self {
            header: if top > 0.0 { top.round() } else { 0.0 },
            summary: (scroll_top - foot_top).min(0.0),
        }
    }
}
