//! The table instance: owns columns, data, expansion, measurements and the
//! scroll hub, and turns host events into state changes.

use std::collections::HashSet;
use std::rc::Rc;

use serde_json::Value;

use crate::columns::{with_expand_column, ColumnTree, HeaderRows, LeafColumn};
use crate::error::{ConfigWarning, Result, WarningLog};
use crate::expand::{ExpandChange, ExpandableType, ExpandedKeySet, ExpandedKeyTracker};
use crate::host::{MeasureRoot, ScrollSurface};
use crate::layout::{
    is_fix_column, plan_body_rows, plan_panes, resolve_row_key, BodyPlan, BodyPlanContext, ColumnWidthAccumulator,
    PaneInputs, PaneKind, PaneLayout, RowHeight, RowHeightSynchronizer,
};
use crate::render::{render_pane, PaneRenderParams, RenderedPane, TableRenderer};
use crate::scroll::{
    Clock, Ping, PaneId, ScrollCoordinator, ScrollEvent, ScrollOutcome, StickyGeometry,
    StickyOffsets, StickyScrollBarController, SystemClock,
};
use crate::types::{Column, Record, RowKey, RowKeySource, TableConfig};

/// Scrollbar thickness assumed until the host measures the real one.
pub const DEFAULT_SCROLLBAR_SIZE: f64 = 15.0;

pub type RowExpandableFn<R> = Box<dyn Fn(&R) -> bool>;
pub type OnExpandFn<R> = Box<dyn FnMut(bool, &R)>;
pub type OnExpandedRowsChangeFn = Box<dyn FnMut(&[RowKey])>;

/// One logical table rendered as several synchronized panes.
pub struct Table<R: Record> {
    config: TableConfig,
    base_columns: Vec<Column>,
    tree: ColumnTree,
    data: Vec<R>,
    row_key: RowKeySource<R>,
    expandable_type: ExpandableType,
    expand: ExpandedKeyTracker,
    row_expandable: Option<RowExpandableFn<R>>,
    on_expand: Option<OnExpandFn<R>>,
    on_expanded_rows_change: Option<OnExpandedRowsChangeFn>,
    widths: ColumnWidthAccumulator,
    heights: RowHeightSynchronizer,
    coordinator: ScrollCoordinator,
    warnings: WarningLog,
    hovered: Option<RowKey>,
    component_width: f64,
    scrollbar_size: f64,
    is_horizon_scroll: bool,
    needs_measure: bool,
    sticky_offsets: StickyOffsets,
}

impl<R: Record> Table<R> {
    pub fn new(columns: Vec<Column>, data: Vec<R>, config: TableConfig) -> Self {
        let row_key = RowKeySource::Field(config.row_key.clone());
        let mut table = Self {
            expandable_type: ExpandableType::detect(&config.expandable, &data),
            expand: ExpandedKeyTracker::from_config(&config.expandable, &data, &row_key),
            config,
            base_columns: columns,
            tree: ColumnTree::default(),
            data,
            row_key,
            row_expandable: None,
            on_expand: None,
            on_expanded_rows_change: None,
            widths: ColumnWidthAccumulator::new(),
            heights: RowHeightSynchronizer::new(),
            coordinator: ScrollCoordinator::new(Rc::new(SystemClock)),
            warnings: WarningLog::new(),
            hovered: None,
            component_width: 0.0,
            scrollbar_size: DEFAULT_SCROLLBAR_SIZE,
            is_horizon_scroll: true,
            needs_measure: true,
            sticky_offsets: StickyOffsets::default(),
        };
        table.configure_coordinator();
        table.rebuild_columns();
        table.mark_initial_expansions();
        table.check_row_keys();
        for name in table.config.removed_options() {
            table
                .warnings
                .warn_once(ConfigWarning::RemovedOption(name.to_string()));
        }
        table
    }

    /// Derive row keys with a function instead of a field.
    pub fn with_row_key(mut self, source: RowKeySource<R>) -> Self {
        self.row_key = source;
        self.expand = ExpandedKeyTracker::from_config(&self.config.expandable, &self.data, &self.row_key);
        self.mark_initial_expansions();
        self.check_row_keys();
        self
    }

    pub fn with_row_expandable(mut self, f: impl Fn(&R) -> bool + 'static) -> Self {
        self.row_expandable = Some(Box::new(f));
        self
    }

    pub fn on_expand(mut self, f: impl FnMut(bool, &R) + 'static) -> Self {
        self.on_expand = Some(Box::new(f));
        self
    }

    pub fn on_expanded_rows_change(mut self, f: impl FnMut(&[RowKey]) + 'static) -> Self {
        self.on_expanded_rows_change = Some(Box::new(f));
        self
    }

    pub fn with_scrollbar_size(mut self, px: f64) -> Self {
        self.scrollbar_size = px;
        self.configure_coordinator();
        self
    }

    /// Replace the clock driving the scroll lock. Panes attached earlier are dropped.
    pub fn with_clock(mut self, clock: Rc<dyn Clock>) -> Self {
        self.coordinator = ScrollCoordinator::new(clock);
        self.configure_coordinator();
        self
    }

    fn configure_coordinator(&mut self) {
        self.coordinator
            .set_axes(self.config.scroll.horizontal(), self.config.scroll.vertical());
        let sticky = self
            .config
            .sticky()
            .map(|opts| StickyScrollBarController::new(self.scrollbar_size, opts.offset_scroll));
        self.coordinator.set_sticky(sticky);
    }

    fn rebuild_columns(&mut self) {
        let columns = if self.config.expandable.expanded_row_render {
            with_expand_column(&self.base_columns, self.config.expandable.expand_icon_column_index)
        } else {
            self.base_columns.clone()
        };
        self.tree = ColumnTree::resolve(columns);

        if is_fix_column(&self.config, &self.tree) {
            let missing_width: Vec<String> = self
                .tree
                .leaves()
                .iter()
                .filter(|l| l.fixed.is_some() && l.declared_width().is_none())
                .map(|l| l.key.clone())
                .collect();
            for key in missing_width {
                self.warnings
                    .warn_once(ConfigWarning::FixedColumnWithoutWidth(key));
            }
        }
    }

    fn mark_initial_expansions(&mut self) {
        if self.expandable_type != ExpandableType::Row {
            return;
        }
        let keys: Vec<RowKey> = self.expand.keys().iter().cloned().collect();
        for key in &keys {
            self.expand.mark_rendered(key);
        }
    }

    /// Warn once about records without a key and about key collisions.
    fn check_row_keys(&mut self) {
        let mut seen = HashSet::new();
        let mut missing = false;
        let mut duplicates = Vec::new();
        walk_keys(
            &self.data,
            &self.row_key,
            &self.config.expandable.children_column_name,
            &mut |key: Option<RowKey>| match key {
                Some(key) => {
                    if !seen.insert(key.clone()) {
                        duplicates.push(key);
                    }
                }
                None => missing = true,
            },
        );
        if missing {
            let field = self.row_key.describe().to_string();
            self.warnings.warn_once(ConfigWarning::MissingRowKey { field });
        }
        for key in duplicates {
            self.warnings
                .warn_once(ConfigWarning::DuplicateRowKey(key.to_string()));
        }
    }

    // ========================================================================
    // Structure
    // ========================================================================

    pub fn set_columns(&mut self, columns: Vec<Column>) {
        self.base_columns = columns;
        self.rebuild_columns();
        self.request_measure();
    }

    pub fn set_data(&mut self, data: Vec<R>) {
        self.data = data;
        self.expandable_type = ExpandableType::detect(&self.config.expandable, &self.data);
        self.check_row_keys();
        self.request_measure();
    }

    /// Switch to (or away from) controlled expanded keys.
    pub fn set_expanded_row_keys(&mut self, keys: Option<Vec<RowKey>>) {
        self.expand.set_controlled(keys);
        self.mark_initial_expansions();
        self.request_measure();
    }

    pub fn config(&self) -> &TableConfig {
        &self.config
    }

    pub fn tree(&self) -> &ColumnTree {
        &self.tree
    }

    pub fn data(&self) -> &[R] {
        &self.data
    }

    pub fn expandable_type(&self) -> ExpandableType {
        self.expandable_type
    }

    pub fn expanded_keys(&self) -> &ExpandedKeySet {
        self.expand.keys()
    }

    pub fn widths(&self) -> &ColumnWidthAccumulator {
        &self.widths
    }

    pub fn heights(&self) -> &RowHeightSynchronizer {
        &self.heights
    }

    pub fn coordinator(&self) -> &ScrollCoordinator {
        &self.coordinator
    }

    pub fn warnings(&self) -> &WarningLog {
        &self.warnings
    }

    pub fn ping(&self) -> Ping {
        self.coordinator.ping()
    }

    pub fn hovered(&self) -> Option<&RowKey> {
        self.hovered.as_ref()
    }

    pub fn component_width(&self) -> f64 {
        self.component_width
    }

    pub fn is_horizon_scroll(&self) -> bool {
        self.is_horizon_scroll
    }

    pub fn sticky_offsets(&self) -> StickyOffsets {
        self.sticky_offsets
    }

    pub fn is_fix_column(&self) -> bool {
        is_fix_column(&self.config, &self.tree)
    }

    // ========================================================================
    // Layout queries
    // ========================================================================

    pub fn pane_layout(&self) -> PaneLayout {
        plan_panes(
            &self.tree,
            &self.config,
            &self.widths,
            PaneInputs {
                has_data: !self.data.is_empty(),
                is_horizon_scroll: self.is_horizon_scroll,
                scrollbar_size: self.scrollbar_size,
            },
        )
    }

    /// Header grid for `pane`; fixed panes use their side's subtree.
    pub fn header_rows(&self, pane: PaneKind) -> HeaderRows<'_> {
        match pane.side() {
            None => self.tree.header_rows(),
            Some(side) => self.tree.side_header_rows(side),
        }
    }

    /// Forced height of each header row of `pane`.
    pub fn header_row_height(&self, pane: PaneKind) -> Option<RowHeight> {
        let rows = self.header_rows(pane).len();
        self.heights.header_row_height(pane, rows)
    }

    /// Leaves rendered in `pane`.
    pub fn pane_leaves(&self, pane: PaneKind) -> Vec<&LeafColumn> {
        match pane.side() {
            None => self.tree.leaves().iter().collect(),
            Some(side) => self.tree.side_leaves(side).collect(),
        }
    }

    /// Width of expanded-row content in `pane` when fixed columns are active.
    pub fn expanded_row_width(&self, pane: PaneKind) -> Option<f64> {
        if !self.is_fix_column() {
            return None;
        }
        match pane.side() {
            None => {
                let gutter = if self.config.scroll.vertical() {
                    self.scrollbar_size
                } else {
                    0.0
                };
                Some(self.component_width - gutter)
            }
            Some(side) => Some(self.widths.side_width(&self.tree, side)),
        }
    }

    /// Rows `pane` renders, in order.
    pub fn body_rows(&self, pane: PaneKind) -> BodyPlan<'_, R> {
        let ctx = BodyPlanContext {
            key_source: &self.row_key,
            expand: &self.expand,
            expandable_type: self.expandable_type,
            children_field: &self.config.expandable.children_column_name,
            row_expandable: self.row_expandable.as_deref(),
            hovered: self.hovered.as_ref(),
            heights: &self.heights,
            pane,
            col_span: self.pane_leaves(pane).len(),
            content_width: self.expanded_row_width(pane),
        };
        plan_body_rows(&self.data, &ctx)
    }

    /// Render `pane` through `renderer`.
    pub fn render_pane<T: TableRenderer<R>>(&self, pane: PaneKind, renderer: &mut T) -> RenderedPane<T::Node> {
        let header_rows = self.header_rows(pane);
        let leaves = self.pane_leaves(pane);
        let layout = self.pane_layout();
        let placeholders: &[String] = if pane == PaneKind::Main {
            &layout.main_placeholders
        } else {
            &[]
        };
        let body = self.body_rows(pane);
        let params = PaneRenderParams {
            pane,
            show_header: self.config.show_header,
            header_rows: &header_rows,
            header_row_height: self.heights.header_row_height(pane, header_rows.len()),
            leaves: &leaves,
            placeholders,
            body: &body.rows,
            expandable_type: self.expandable_type,
            expand_icon_column_index: self.config.expandable.expand_icon_column_index,
            indent_size: self.config.expandable.indent_size,
            header_translate_y: self.sticky_offsets.header,
            summary_translate_y: self.sticky_offsets.summary,
        };
        render_pane(renderer, &params)
    }

    // ========================================================================
    // Expansion and hover
    // ========================================================================

    /// Toggle the row with `key`. Returns `None` when the row does not exist or
    /// cannot expand.
    pub fn toggle_expanded(&mut self, key: &RowKey) -> Option<ExpandChange> {
        let children_field = self.config.expandable.children_column_name.as_str();
        let record = find_record(&self.data, &self.row_key, children_field, None, key)?;
        let expandable = match self.expandable_type {
            ExpandableType::None => false,
            ExpandableType::Nest => true,
            ExpandableType::Row => self.row_expandable.as_ref().map_or(true, |f| f(record)),
        };
        if !expandable {
            return None;
        }

        let (next, change) = self.expand.toggle(key);
        if change.is_expanded() && self.expandable_type == ExpandableType::Row {
            self.expand.mark_rendered(key);
        }
        log::debug!("row {key} {change:?}");

        if let Some(cb) = self.on_expand.as_mut() {
            cb(change.is_expanded(), record);
        }
        if let Some(cb) = self.on_expanded_rows_change.as_mut() {
            cb(&next.sorted());
        }
        self.needs_measure = true;
        Some(change)
    }

    /// Row click: toggles expansion when `expandRowByClick` is set.
    pub fn on_row_click(&mut self, key: &RowKey) -> Option<ExpandChange> {
        if self.config.expandable.expand_row_by_click {
            self.toggle_expanded(key)
        } else {
            None
        }
    }

    /// Share the hovered row across panes. Returns true when it changed.
    pub fn set_hover(&mut self, key: Option<RowKey>) -> bool {
        if self.hovered == key {
            return false;
        }
        self.hovered = key;
        true
    }

    // ========================================================================
    // Measurement
    // ========================================================================

    /// A column's rendered width changed.
    pub fn on_column_resize(&mut self, key: &str, px: f64) -> bool {
        self.widths.report_width(key, px)
    }

    /// Ask for a row-height pass after the next committed layout.
    pub fn request_measure(&mut self) {
        self.needs_measure = true;
    }

    pub fn needs_measure(&self) -> bool {
        self.needs_measure
    }

    /// Run the pending row-height pass against the main pane. Returns true
    /// when new heights were published and fixed panes need to re-render.
    pub fn after_layout(&mut self, root: &impl MeasureRoot) -> bool {
        if !self.needs_measure {
            return false;
        }
        self.needs_measure = false;
        if !self.is_fix_column() {
            return false;
        }
        self.heights.sync(root)
    }

    /// Height of the extra row of expanded `key`, measured in the main pane.
    pub fn record_expanded_row_height(&mut self, key: &RowKey, px: f64) -> bool {
        self.is_fix_column() && self.heights.record_expanded_row_height(key, px)
    }

    /// The table's outer box resized to `width`.
    pub fn on_full_table_resize(&mut self, width: f64) -> ScrollOutcome {
        let outcome = self.coordinator.resync();
        self.component_width = self
            .config
            .scroll
            .x
            .as_ref()
            .and_then(|x| x.px())
            .unwrap_or(width);
        self.needs_measure = true;
        if let Some(body) = self.coordinator.metrics(PaneId::Body) {
            self.is_horizon_scroll = body.overflows_x();
            if let Some(sticky) = self.coordinator.sticky_mut() {
                sticky.set_body_size(body.scroll_width, body.client_width);
            }
        }
        outcome
    }

    // ========================================================================
    // Scrolling
    // ========================================================================

    pub fn attach_pane(&mut self, pane: PaneId, surface: Box<dyn ScrollSurface>) {
        self.coordinator.attach(pane, surface);
        if pane == PaneId::Body {
            self.coordinator.resync();
        }
    }

    pub fn detach_pane(&mut self, pane: PaneId) {
        self.coordinator.detach(pane);
    }

    pub fn on_scroll(&mut self, event: ScrollEvent) -> ScrollOutcome {
        self.coordinator.on_scroll(event)
    }

    pub fn sticky_scroll_bar(&self) -> Option<&StickyScrollBarController> {
        self.coordinator.sticky()
    }

    pub fn on_sticky_pointer_down(&mut self, page_x: f64) {
        if let Some(sticky) = self.coordinator.sticky_mut() {
            sticky.on_pointer_down(page_x);
        }
    }

    /// Drag the sticky thumb; the resulting offset is propagated like any scroll.
    pub fn on_sticky_pointer_move(&mut self, page_x: f64, pressed: bool) -> Option<ScrollOutcome> {
        let left = self
            .coordinator
            .sticky_mut()
            .and_then(|s| s.on_pointer_move(page_x, pressed))?;
        Some(
            self.coordinator
                .on_scroll(ScrollEvent::horizontal(PaneId::StickyScrollBar, left)),
        )
    }

    pub fn on_sticky_pointer_up(&mut self) {
        if let Some(sticky) = self.coordinator.sticky_mut() {
            sticky.on_pointer_up();
        }
    }

    /// The scrolling ancestor moved or resized.
    pub fn on_container_scroll(&mut self, geometry: StickyGeometry) -> bool {
        self.coordinator
            .sticky_mut()
            .is_some_and(|s| s.on_container_scroll(geometry))
    }

    /// Report the outcome of the scroll-ancestor lookup.
    pub fn set_scroll_parent_found(&mut self, found: bool) {
        if !found && self.config.sticky().is_some() {
            self.warnings.warn_once(ConfigWarning::NoScrollParent);
        }
    }

    /// The scrolling ancestor scrolled to `scroll_top`; recompute sticky header
    /// and summary translations.
    pub fn on_parent_scroll(&mut self, scroll_top: f64, header_top: f64, foot_top: f64) -> StickyOffsets {
        if self.config.sticky().is_some() {
            self.sticky_offsets = StickyOffsets::compute(scroll_top, header_top, foot_top);
        }
        self.sticky_offsets
    }

    /// Detach every pane and drop lock, drag and measurement state.
    pub fn dispose(&mut self) {
        self.coordinator.dispose();
        self.expand.clear_rendered();
        self.heights.clear();
        self.widths.clear();
        self.hovered = None;
        self.needs_measure = false;
        self.sticky_offsets = StickyOffsets::default();
    }
}

impl Table<Value> {
    /// Build a table from JSON columns, data and config.
    pub fn from_json(columns: &str, data: &str, config: &str) -> Result<Self> {
        let columns: Vec<Column> = serde_json::from_str(columns)?;
        let data: Vec<Value> = serde_json::from_str(data)?;
        let config = TableConfig::from_json(config)?;
        Ok(Self::new(columns, data, config))
    }
}

fn walk_keys<R: Record>(
    rows: &[R],
    source: &RowKeySource<R>,
    children: &str,
    visit: &mut dyn FnMut(Option<RowKey>),
) {
    for (index, row) in rows.iter().enumerate() {
        visit(source.key_of(row, index));
        if let Some(kids) = row.children(children) {
            walk_keys(kids, source, children, visit);
        }
    }
}

/// Record whose body-plan key is `key`, including index fallbacks.
fn find_record<'d, R: Record>(
    rows: &'d [R],
    source: &RowKeySource<R>,
    children: &str,
    parent: Option<&RowKey>,
    key: &RowKey,
) -> Option<&'d R> {
    for (index, row) in rows.iter().enumerate() {
        let (row_key, _) = resolve_row_key(source, row, index, parent);
        if &row_key == key {
            return Some(row);
        }
        if let Some(found) = row
            .children(children)
            .and_then(|kids| find_record(kids, source, children, Some(&row_key), key))
        {
            return Some(found);
        }
    }
    None
}
