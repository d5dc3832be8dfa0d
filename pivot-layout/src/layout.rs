use alloc::sync::Arc;
use core::sync::atomic::{AtomicBool, Ordering};

use crate::alignment::{AlignmentCalculator, ChildExtent, EdgeItem};
use crate::fill::{FillContext, FillEngine, LayoutChild};
use crate::focus::{NavigationContext, main_axis_forward};
use crate::geometry::{LayoutGeometry, Viewport};
use crate::options::{ExtraSpace, ExtraSpaceRequest, LayoutOptions};
use crate::pivot::PivotState;
use crate::scroll::ScrollCoordinator;
use crate::spans::SpanCache;
use crate::{
    ChildAlignment, ChildInfo, ConfigError, FillDirection, FillRequest, FocusDirection,
    FocusableDirection, ItemDirection, ItemHandle, ItemProvider, LayoutPass, LayoutWindow,
    Orientation, ParentAlignment, PlacementSink, SavedState, ScrollTick, Selection,
};

/// Requests a layout pass.
///
/// Clones share one flag, so a requester can be handed to code that runs while the layout is
/// busy (selection callbacks, a host's measure step). Requests made during a pass are deferred
/// to [`PivotLayout::needs_layout`] after it.
#[derive(Clone, Debug, Default)]
pub struct LayoutRequester(Arc<AtomicBool>);

impl LayoutRequester {
    pub fn request(&self) {
        self.0.store(true, Ordering::Release);
    }

    pub fn is_requested(&self) -> bool {
        self.0.load(Ordering::Acquire)
    }

    fn take(&self) -> bool {
        self.0.swap(false, Ordering::AcqRel)
    }
}

/// A pivot-based layout engine for directional navigation.
///
/// The layout materializes only the rows that intersect the viewport (plus optional extra space),
/// keeps one selected item (the pivot) aligned to a keyline, and resolves directional moves into
/// new selections.
///
/// It is headless: views come from an [`ItemProvider`] and their bounds go to a
/// [`PlacementSink`]. Nothing here runs on its own; the host calls [`PivotLayout::layout`] when
/// [`PivotLayout::needs_layout`] says so and [`PivotLayout::tick`] once per frame while
/// [`PivotLayout::is_scrolling`].
pub struct PivotLayout<H> {
    options: LayoutOptions,
    geometry: LayoutGeometry,
    alignment: AlignmentCalculator,
    spans: SpanCache,
    fill: FillEngine<H>,
    pivot: PivotState,
    scroll: ScrollCoordinator,
    item_count: usize,
    remaining_scroll: i32,
    scroll_offset: i64,
    structure_changed: bool,
    has_laid_out: bool,
    in_layout: bool,
    needs_layout: bool,
    requester: LayoutRequester,
}

impl<H: ItemHandle> PivotLayout<H> {
    pub fn new(options: LayoutOptions) -> Result<Self, ConfigError> {
        options.validate()?;
        let mut layout = Self {
            geometry: LayoutGeometry::new(options.orientation, Viewport::default()),
            alignment: AlignmentCalculator::new(options.parent_alignment),
            spans: SpanCache::new(options.span_count, options.span_size.clone()),
            fill: FillEngine::new(),
            pivot: PivotState::new(),
            scroll: ScrollCoordinator::new(),
            options,
            item_count: 0,
            remaining_scroll: 0,
            scroll_offset: 0,
            structure_changed: false,
            has_laid_out: false,
            in_layout: false,
            needs_layout: true,
            requester: LayoutRequester::default(),
        };
        layout.sync_alignment();
        Ok(layout)
    }

    pub fn options(&self) -> &LayoutOptions {
        &self.options
    }

    /// Replaces the configuration. Invalid options are rejected and leave the layout untouched.
    pub fn set_options(&mut self, options: LayoutOptions) -> Result<(), ConfigError> {
        options.validate()?;
        self.geometry.set_orientation(options.orientation);
        self.alignment.set_parent_alignment(options.parent_alignment);
        self.spans
            .configure(options.span_count, options.span_size.clone());
        self.options = options;
        self.sync_alignment();
        self.request_layout();
        Ok(())
    }

    /// Edits a copy of the options and applies it through [`PivotLayout::set_options`].
    pub fn update_options(
        &mut self,
        f: impl FnOnce(&mut LayoutOptions),
    ) -> Result<(), ConfigError> {
        let mut next = self.options.clone();
        f(&mut next);
        self.set_options(next)
    }

    pub fn set_parent_alignment(&mut self, alignment: ParentAlignment) -> Result<(), ConfigError> {
        self.update_options(|o| o.parent_alignment = alignment)
    }

    pub fn set_child_alignment(&mut self, alignment: ChildAlignment) -> Result<(), ConfigError> {
        self.update_options(|o| o.child_alignment = alignment)
    }

    pub fn set_span_count(&mut self, span_count: usize) -> Result<(), ConfigError> {
        self.update_options(|o| o.span_count = span_count)
    }

    pub fn set_orientation(&mut self, orientation: Orientation) {
        if self.options.orientation == orientation {
            return;
        }
        self.options.orientation = orientation;
        self.geometry.set_orientation(orientation);
        self.sync_alignment();
        self.request_layout();
    }

    pub fn set_reverse_layout(&mut self, reverse_layout: bool) {
        if self.options.reverse_layout == reverse_layout {
            return;
        }
        self.options.reverse_layout = reverse_layout;
        self.sync_alignment();
        self.request_layout();
    }

    pub fn set_item_spacing(&mut self, item_spacing: i32) {
        self.options.item_spacing = item_spacing;
        self.request_layout();
    }

    pub fn set_focusable_direction(&mut self, direction: FocusableDirection) {
        self.options.focusable_direction = direction;
    }

    pub fn viewport(&self) -> Viewport {
        self.geometry.viewport()
    }

    pub fn set_viewport(&mut self, viewport: Viewport) {
        if self.geometry.viewport() == viewport {
            return;
        }
        self.geometry.set_viewport(viewport);
        self.sync_alignment();
        self.request_layout();
    }

    /// Pending scroll the host is about to apply (a fling, for example). Non-zero values make the
    /// default extra layout space pre-fill on that side. Positive is toward the layout end.
    pub fn set_remaining_scroll(&mut self, remaining: i32) {
        self.remaining_scroll = remaining;
    }

    fn sync_alignment(&mut self) {
        let g = &self.geometry;
        self.alignment.update_viewport(
            g.main_size(),
            g.start_padding(),
            g.end_padding(),
            self.options.reverse_layout,
        );
    }

    pub fn request_layout(&mut self) {
        if self.in_layout {
            self.requester.request();
        } else {
            self.needs_layout = true;
        }
    }

    pub fn needs_layout(&self) -> bool {
        self.needs_layout || self.requester.is_requested()
    }

    pub fn layout_requester(&self) -> LayoutRequester {
        self.requester.clone()
    }

    pub fn selection(&self) -> Option<Selection> {
        self.pivot.selection()
    }

    pub fn selected_position(&self) -> Option<usize> {
        self.pivot.position()
    }

    pub fn selected_sub_position(&self) -> usize {
        self.pivot.sub_position()
    }

    pub fn pivot_state(&self) -> &PivotState {
        &self.pivot
    }

    pub fn save_state(&self) -> SavedState {
        self.pivot.save()
    }

    /// Restores a saved selection. It takes effect on the next layout pass.
    pub fn restore_state(&mut self, state: SavedState) {
        self.scroll.cancel();
        self.pivot.restore(state);
        self.request_layout();
    }

    pub fn item_count(&self) -> usize {
        self.item_count
    }

    pub fn child_count(&self) -> usize {
        self.fill.len()
    }

    pub fn child(&self, position: usize) -> Option<ChildInfo> {
        self.fill.find(position).map(LayoutChild::info)
    }

    /// Materialized children in position order.
    pub fn children(&self) -> impl Iterator<Item = ChildInfo> + '_ {
        self.fill.children().iter().map(LayoutChild::info)
    }

    pub fn handle(&self, position: usize) -> Option<&H> {
        self.fill.find(position).map(|c| &c.handle)
    }

    pub fn layout_window(&self) -> Option<LayoutWindow> {
        self.fill.window(&self.geometry)
    }

    /// The last fill request, for inspection.
    pub fn fill_request(&self) -> &FillRequest {
        self.fill.request()
    }

    /// Keyline position of the viewport.
    pub fn parent_keyline(&self) -> i32 {
        self.alignment.keyline()
    }

    /// Keyline of a materialized child: at the selected sub-position for the pivot, otherwise at
    /// sub-position 0.
    pub fn child_keyline(&self, position: usize) -> Option<i32> {
        let child = self.fill.find(position)?;
        let sub_position = if self.pivot.position() == Some(position) {
            self.pivot.sub_position()
        } else {
            0
        };
        Some(self.keyline_of(child, sub_position))
    }

    /// Current `(min, max)` scroll deltas; `None` where the collection edge is not materialized.
    pub fn scroll_limits(&self) -> (Option<i32>, Option<i32>) {
        (self.alignment.min_scroll(), self.alignment.max_scroll())
    }

    /// Total content movement applied by scrolling since creation. Positive is toward the layout
    /// start.
    pub fn scroll_offset(&self) -> i64 {
        self.scroll_offset
    }

    pub fn is_scrolling(&self) -> bool {
        self.scroll.is_active()
    }

    pub fn scroll_target(&self) -> Option<Selection> {
        self.scroll.target()
    }

    pub fn on_items_inserted(&mut self, position: usize, count: usize) {
        ldebug!(position, count, "items inserted");
        self.pivot.on_items_inserted(position, count);
        self.mark_structure_changed();
    }

    pub fn on_items_removed(&mut self, position: usize, count: usize) {
        ldebug!(position, count, "items removed");
        self.pivot.on_items_removed(position, count);
        self.mark_structure_changed();
    }

    pub fn on_items_moved(&mut self, from: usize, to: usize, count: usize) {
        ldebug!(from, to, count, "items moved");
        self.pivot.on_items_moved(from, to, count);
        self.mark_structure_changed();
    }

    /// Item content changed in place. Materialized items in the range are rebound on the next
    /// pass; changes outside the window only relayout.
    pub fn on_items_changed(&mut self, position: usize, count: usize) {
        ldebug!(position, count, "items changed");
        if count == 0 {
            return;
        }
        let end = position.saturating_add(count);
        if let (Some(first), Some(last)) = (self.fill.first(), self.fill.last()) {
            if position <= last.position && end > first.position {
                self.structure_changed = true;
            }
        }
        self.spans.invalidate();
        self.request_layout();
    }

    fn mark_structure_changed(&mut self) {
        // Positions of a smooth scroll target are stale now.
        if self.scroll.cancel() {
            ldebug!("smooth scroll cancelled by a structural change");
        }
        self.structure_changed = true;
        self.spans.invalidate();
        self.request_layout();
    }

    pub fn layout<P, S>(&mut self, provider: &mut P, sink: &mut S)
    where
        P: ItemProvider<Handle = H>,
        S: PlacementSink<H>,
    {
        self.layout_pass(LayoutPass::Real, provider, sink);
    }

    /// Runs one pass. A predictive pass lays out against the pre-change collection (the provider
    /// must report it) and keeps unused views for the real pass; it neither recycles nor reports
    /// selection changes.
    pub fn layout_pass<P, S>(&mut self, pass: LayoutPass, provider: &mut P, sink: &mut S)
    where
        P: ItemProvider<Handle = H>,
        S: PlacementSink<H>,
    {
        if self.in_layout {
            lwarn!("layout pass requested while one is running; deferred");
            self.requester.request();
            return;
        }
        self.in_layout = true;
        self.needs_layout = false;
        self.requester.take();

        self.run_layout(pass, provider, sink);

        self.in_layout = false;
        if self.requester.take() {
            self.needs_layout = true;
        }
    }

    fn run_layout<P, S>(&mut self, pass: LayoutPass, provider: &mut P, sink: &mut S)
    where
        P: ItemProvider<Handle = H>,
        S: PlacementSink<H>,
    {
        let count = provider.item_count();
        let real = pass == LayoutPass::Real;
        ldebug!(count, ?pass, "layout pass");
        self.item_count = count;
        self.spans.set_item_count(count);
        self.sync_alignment();
        // Children still sit at pre-change positions, so the anchor is looked up before pending
        // structural offsets are applied.
        let anchor_position = self.pivot.position();
        if real {
            self.pivot.on_layout_start(count);
        }

        if count == 0 {
            self.fill.recycle_all(provider);
            self.alignment.clear_limits();
            if real {
                self.structure_changed = false;
                self.has_laid_out = true;
                self.finish_real_pass();
            }
            return;
        }

        let pivot = self.pivot.position().unwrap_or(0).min(count - 1);
        let anchor = match anchor_position {
            Some(position) => self.layout_anchor(position),
            None => self.geometry.start_after_padding(),
        };
        let reuse = !real || provider.has_stable_keys() || !self.structure_changed;
        if !reuse {
            self.fill.recycle_scrap(provider);
        }
        self.fill.scrap_all(reuse, provider);

        let extra = self.extra_space(self.pending_scroll_delta());
        let infinite = self.geometry.is_infinite();
        let toward_end = if self.options.reverse_layout {
            ItemDirection::Head
        } else {
            ItemDirection::Tail
        };
        let row_first = self.spans.row_start(pivot);
        let row_last = self.spans.row_end(pivot);
        let (entry, before) = match toward_end {
            ItemDirection::Tail => (row_first as isize, row_first as isize - 1),
            ItemDirection::Head => (row_last as isize, row_last as isize + 1),
        };
        let end_space = (self.geometry.end_after_padding() - anchor).max(0) + extra.end;
        let start_space = (anchor - self.geometry.start_after_padding()).max(0) + extra.start;

        // Toward the end, starting with the pivot's row; the budget is at least one pixel so the
        // pivot is always materialized.
        {
            let request = self.fill.request_mut();
            request.reset();
            request.direction = FillDirection::End;
            request.item_direction = toward_end;
            request.current_position = entry;
            request.checkpoint = anchor;
            request.set_fill_space(end_space.max(1));
            request.extra_space_start = extra.start;
            request.extra_space_end = extra.end;
            request.is_infinite = infinite;
        }
        self.run_fill(provider, sink);

        {
            let request = self.fill.request_mut();
            request.direction = FillDirection::Start;
            request.item_direction = toward_end.opposite();
            request.current_position = before;
            request.checkpoint = anchor - self.options.item_spacing;
            request.set_fill_space(start_space);
        }
        self.run_fill(provider, sink);

        if infinite {
            // Everything is laid out; pin the first row to the start padding.
            let low = self.fill.low_edge(&self.geometry).unwrap_or(0);
            let shift = self.geometry.start_after_padding() - low;
            if shift != 0 {
                self.fill.offset_children(shift, &self.geometry, sink);
            }
            self.alignment.clear_limits();
        } else {
            self.update_scroll_limits();
            let sub_position = self.pivot.sub_position();
            if let Some(delta) = self
                .alignment_delta(pivot, sub_position)
                .filter(|d| *d != 0)
            {
                self.scroll_by_internal(delta, provider, sink);
            }
            self.fill_gaps(extra, provider, sink);
            if real {
                self.recycle_outside(extra, provider);
            }
            self.update_scroll_limits();
        }

        if real {
            self.fill.recycle_scrap(provider);
            self.structure_changed = false;
            self.has_laid_out = true;
            self.finish_real_pass();
        }
        ltrace!(
            children = self.fill.len(),
            first = ?self.fill.first().map(|c| c.position),
            last = ?self.fill.last().map(|c| c.position),
            "layout pass finished"
        );
    }

    /// Low layout edge of the row holding `position`, or the start padding when it is not
    /// materialized.
    fn layout_anchor(&self, position: usize) -> i32 {
        let g = &self.geometry;
        if g.is_infinite() {
            return g.start_after_padding();
        }
        let Some(row) = self.fill.find(position).map(|c| c.row) else {
            return g.start_after_padding();
        };
        self.fill
            .children()
            .iter()
            .filter(|c| c.row == row)
            .map(|c| g.decorated_start(c.bounds, c.decor))
            .min()
            .unwrap_or_else(|| g.start_after_padding())
    }

    fn finish_real_pass(&mut self) {
        self.dispatch_selection();
        if !self.scroll.is_active() {
            self.dispatch_selection_aligned();
        }
        if let Some(f) = &self.options.on_layout_completed {
            f();
        }
    }

    fn run_fill<P, S>(&mut self, provider: &mut P, sink: &mut S) -> i32
    where
        P: ItemProvider<Handle = H>,
        S: PlacementSink<H>,
    {
        let mut ctx = FillContext {
            provider,
            sink,
            geometry: &self.geometry,
            spans: &mut self.spans,
            item_spacing: self.options.item_spacing,
        };
        self.fill.fill(&mut ctx)
    }

    /// Fills past the layout edge on `direction`'s side until `beyond` pixels past the matching
    /// viewport edge are covered.
    fn fill_toward<P, S>(
        &mut self,
        direction: FillDirection,
        beyond: i32,
        recycle: bool,
        extra: ExtraSpace,
        provider: &mut P,
        sink: &mut S,
    ) where
        P: ItemProvider<Handle = H>,
        S: PlacementSink<H>,
    {
        let (Some(first), Some(last)) = (
            self.fill.first().map(|c| c.position),
            self.fill.last().map(|c| c.position),
        ) else {
            return;
        };
        let g = self.geometry;
        let reverse = self.options.reverse_layout;
        let spacing = self.options.item_spacing;
        let (item_direction, next, checkpoint, space) = match direction {
            FillDirection::End => {
                let checkpoint = self.fill.high_edge(&g).unwrap_or(0) + spacing;
                let target = g.end_after_padding() + beyond;
                if reverse {
                    (ItemDirection::Head, first as isize - 1, checkpoint, target - checkpoint)
                } else {
                    (ItemDirection::Tail, last as isize + 1, checkpoint, target - checkpoint)
                }
            }
            FillDirection::Start => {
                let checkpoint = self.fill.low_edge(&g).unwrap_or(0) - spacing;
                let target = g.start_after_padding() - beyond;
                if reverse {
                    (ItemDirection::Tail, last as isize + 1, checkpoint, checkpoint - target)
                } else {
                    (ItemDirection::Head, first as isize - 1, checkpoint, checkpoint - target)
                }
            }
        };
        if space <= 0 {
            return;
        }
        {
            let request = self.fill.request_mut();
            request.direction = direction;
            request.item_direction = item_direction;
            request.current_position = next;
            request.checkpoint = checkpoint;
            request.set_fill_space(space);
            request.extra_space_start = extra.start;
            request.extra_space_end = extra.end;
            request.recycling_enabled = recycle;
            request.is_infinite = false;
        }
        self.run_fill(provider, sink);
    }

    fn fill_gaps<P, S>(&mut self, extra: ExtraSpace, provider: &mut P, sink: &mut S)
    where
        P: ItemProvider<Handle = H>,
        S: PlacementSink<H>,
    {
        self.fill_toward(FillDirection::End, extra.end, true, extra, provider, sink);
        self.fill_toward(FillDirection::Start, extra.start, true, extra, provider, sink);
    }

    fn recycle_outside<P>(&mut self, extra: ExtraSpace, provider: &mut P)
    where
        P: ItemProvider<Handle = H>,
    {
        let request = self.fill.request_mut();
        request.extra_space_start = extra.start;
        request.extra_space_end = extra.end;
        request.recycling_enabled = true;
        request.is_infinite = self.geometry.is_infinite();
        self.fill.recycle(provider, &self.geometry);
    }

    fn extra_space(&self, scroll_delta: i32) -> ExtraSpace {
        self.options.extra_layout_space.resolve(ExtraSpaceRequest {
            total_space: self.geometry.total_space(),
            scroll_delta,
        })
    }

    /// Scroll expected right after a pass, in layout terms.
    fn pending_scroll_delta(&self) -> i32 {
        if self.remaining_scroll != 0 {
            return self.remaining_scroll;
        }
        let Some(target) = self.scroll.target() else {
            return 0;
        };
        let pivot = self.pivot.position().unwrap_or(0);
        let forward = target.position >= pivot;
        if forward != self.options.reverse_layout { 1 } else { -1 }
    }

    fn keyline_of(&self, child: &LayoutChild<H>, sub_position: usize) -> i32 {
        let g = &self.geometry;
        let alignment = child
            .handle
            .sub_position_alignments()
            .get(sub_position)
            .copied()
            .unwrap_or(self.options.child_alignment);
        let start = g.start(child.bounds);
        let region = alignment.anchor.and_then(|id| child.handle.anchor(id));
        let extent = match region {
            Some(region) => ChildExtent {
                start: start + region.offset,
                size: region.size,
                padding_start: 0,
                padding_end: 0,
                baseline: None,
            },
            None => {
                let (padding_start, padding_end) = g.main_decoration(child.handle.padding());
                ChildExtent {
                    start,
                    size: g.measurement(child.bounds),
                    padding_start,
                    padding_end,
                    baseline: child.handle.baseline(),
                }
            }
        };
        alignment.keyline(extent, self.options.reverse_layout)
    }

    fn alignment_delta(&self, position: usize, sub_position: usize) -> Option<i32> {
        let child = self.fill.find(position)?;
        let keyline = self.keyline_of(child, sub_position);
        Some(self.alignment.scroll_offset_for_alignment(keyline))
    }

    fn update_scroll_limits(&mut self) {
        let (Some(front), Some(back)) = (self.fill.first(), self.fill.last()) else {
            self.alignment.clear_limits();
            return;
        };
        let head = (front.position == 0).then(|| self.keyline_of(front, 0));
        let tail = (back.position + 1 == self.item_count).then(|| self.keyline_of(back, 0));
        let low_edge = self.fill.low_edge(&self.geometry).unwrap_or(0);
        let high_edge = self.fill.high_edge(&self.geometry).unwrap_or(0);
        let (low, high) = if self.options.reverse_layout {
            (tail, head)
        } else {
            (head, tail)
        };
        self.alignment.update_limits(
            low.map(|keyline| EdgeItem {
                edge: low_edge,
                keyline,
            }),
            high.map(|keyline| EdgeItem {
                edge: high_edge,
                keyline,
            }),
        );
    }

    /// Scrolls content by up to `delta` pixels (positive toward the layout start) and returns
    /// the amount applied. Scrolling stops at the collection edges.
    pub fn scroll_by<P, S>(&mut self, delta: i32, provider: &mut P, sink: &mut S) -> i32
    where
        P: ItemProvider<Handle = H>,
        S: PlacementSink<H>,
    {
        if self.in_layout {
            lwarn!(delta, "scroll requested during a layout pass; ignored");
            return 0;
        }
        if self.structure_changed {
            self.layout(provider, sink);
        }
        self.scroll_by_internal(delta, provider, sink)
    }

    fn scroll_by_internal<P, S>(&mut self, delta: i32, provider: &mut P, sink: &mut S) -> i32
    where
        P: ItemProvider<Handle = H>,
        S: PlacementSink<H>,
    {
        if delta == 0 || self.fill.is_empty() || self.geometry.is_infinite() {
            return 0;
        }
        let extra = self.extra_space(delta);
        if delta > 0 {
            let beyond = delta + extra.end;
            self.fill_toward(FillDirection::End, beyond, false, extra, provider, sink);
        } else {
            let beyond = -delta + extra.start;
            self.fill_toward(FillDirection::Start, beyond, false, extra, provider, sink);
        }
        self.update_scroll_limits();

        let consumed = self.alignment.clamp(delta);
        if consumed != 0 {
            self.fill.offset_children(-consumed, &self.geometry, sink);
            self.scroll_offset += i64::from(consumed);
        }
        self.fill_gaps(extra, provider, sink);
        self.recycle_outside(extra, provider);
        self.update_scroll_limits();
        ltrace!(delta, consumed, "scrolled");
        consumed
    }

    /// Selects `position` and aligns it, either at once (a full layout pass) or by starting a
    /// smooth scroll that [`PivotLayout::tick`] advances.
    pub fn scroll_to_position<P, S>(
        &mut self,
        position: usize,
        sub_position: usize,
        smooth: bool,
        provider: &mut P,
        sink: &mut S,
    ) where
        P: ItemProvider<Handle = H>,
        S: PlacementSink<H>,
    {
        let count = provider.item_count();
        if count == 0 {
            return;
        }
        let position = if position >= count {
            lwarn!(position, count, "scroll target out of range; clamped");
            count - 1
        } else {
            position
        };

        if smooth && self.has_laid_out && !self.structure_changed && !self.fill.is_empty() {
            let target = Selection {
                position,
                sub_position,
            };
            ldebug!(position, sub_position, "smooth scroll");
            self.scroll.start(target);
            if self.fill.find(position).is_some() {
                self.pivot.update(position, sub_position);
                self.dispatch_selection();
            }
            return;
        }

        self.scroll.cancel();
        self.pivot.update(position, sub_position);
        self.layout(provider, sink);
    }

    /// Advances a smooth scroll by at most the configured step.
    pub fn tick<P, S>(&mut self, provider: &mut P, sink: &mut S) -> ScrollTick
    where
        P: ItemProvider<Handle = H>,
        S: PlacementSink<H>,
    {
        self.tick_by(self.options.smooth_scroll_step, provider, sink)
    }

    /// Advances a smooth scroll by at most `max_step` pixels.
    ///
    /// Until the target is materialized, each tick moves a full step toward it; once it is, the
    /// target becomes the selection and the scroll closes the remaining alignment distance.
    pub fn tick_by<P, S>(&mut self, max_step: u32, provider: &mut P, sink: &mut S) -> ScrollTick
    where
        P: ItemProvider<Handle = H>,
        S: PlacementSink<H>,
    {
        let Some(target) = self.scroll.target() else {
            return ScrollTick::Idle;
        };
        if self.in_layout {
            return ScrollTick::Scrolling { consumed: 0 };
        }
        if self.structure_changed {
            self.layout(provider, sink);
        }
        let Some(last) = self.fill.last().map(|c| c.position) else {
            self.scroll.cancel();
            return ScrollTick::Settled { consumed: 0 };
        };

        let position = target.position.min(self.item_count.saturating_sub(1));
        let remaining = self.alignment_delta(position, target.sub_position);
        if remaining.is_some() {
            let selection = Selection {
                position,
                sub_position: target.sub_position,
            };
            if self.pivot.selection() != Some(selection) {
                self.pivot.update(position, target.sub_position);
                self.dispatch_selection();
            }
        }
        // Only consulted while the target is not materialized, i.e. outside [first, last].
        let toward_end = (position > last) != self.options.reverse_layout;
        let step = self.scroll.next_step(remaining, toward_end, max_step);
        let consumed = self.scroll_by_internal(step, provider, sink);

        let settled = match remaining {
            Some(delta) => step == delta || consumed == 0,
            None => consumed == 0,
        };
        if settled {
            ldebug!(position, ticks = self.scroll.ticks(), "smooth scroll settled");
            self.scroll.cancel();
            self.dispatch_selection_aligned();
            ScrollTick::Settled { consumed }
        } else {
            ScrollTick::Scrolling { consumed }
        }
    }

    /// Stops a smooth scroll where the content is. Returns whether one was running.
    pub fn cancel_scroll(&mut self) -> bool {
        self.scroll.cancel()
    }

    /// Where a directional move from `current` would go, without moving. `None` means focus
    /// leaves the layout.
    pub fn next_focus_position<P>(
        &mut self,
        current: usize,
        direction: FocusDirection,
        provider: &P,
    ) -> Option<usize>
    where
        P: ItemProvider<Handle = H>,
    {
        let count = provider.item_count();
        if count == 0 || !self.has_laid_out || self.pivot.position().is_none() {
            return None;
        }
        self.spans.set_item_count(count);
        let navigator = self.options.navigator();
        let is_focusable = |p: usize| provider.is_focusable(p);
        navigator.next(
            current,
            direction,
            NavigationContext {
                orientation: self.options.orientation,
                reverse_layout: self.options.reverse_layout,
                spans: &mut self.spans,
                is_focusable: &is_focusable,
            },
        )
    }

    /// Moves the selection one step in `direction` and scrolls it into alignment.
    ///
    /// Main-axis moves first walk the selected item's sub-positions. Returns the selected
    /// position after the move, or `None` when focus leaves the layout.
    pub fn move_focus<P, S>(
        &mut self,
        direction: FocusDirection,
        provider: &mut P,
        sink: &mut S,
    ) -> Option<usize>
    where
        P: ItemProvider<Handle = H>,
        S: PlacementSink<H>,
    {
        if self.structure_changed || !self.has_laid_out {
            self.layout(provider, sink);
        }
        let current = self.scroll.target().or_else(|| self.pivot.selection())?;

        if let Some(sub_position) = self.next_sub_position(current, direction) {
            self.scroll_to_position(
                current.position,
                sub_position,
                self.options.smooth_focus_changes,
                provider,
                sink,
            );
            return Some(current.position);
        }

        let target = self.next_focus_position(current.position, direction, provider)?;
        if target != current.position {
            self.scroll_to_position(
                target,
                0,
                self.options.smooth_focus_changes,
                provider,
                sink,
            );
        }
        Some(target)
    }

    fn next_sub_position(&self, current: Selection, direction: FocusDirection) -> Option<usize> {
        let forward = main_axis_forward(
            direction,
            self.options.orientation,
            self.options.reverse_layout,
        )?;
        let count = self
            .fill
            .find(current.position)?
            .handle
            .sub_position_alignments()
            .len();
        if forward {
            let next = current.sub_position + 1;
            (next < count).then_some(next)
        } else {
            current.sub_position.checked_sub(1)
        }
    }

    fn dispatch_selection(&mut self) {
        let Some(change) = self.pivot.dispatch_selected() else {
            return;
        };
        ldebug!(previous = ?change.previous, current = ?change.current, "selection changed");
        let current_position = change.current.map(|c| c.position);
        if let Some(previous) = change
            .previous
            .filter(|p| Some(p.position) != current_position)
        {
            if let Some(child) = self.fill.find_mut(previous.position) {
                child.handle.on_deselected();
            }
        }
        if let Some(current) = change.current {
            if let Some(child) = self.fill.find_mut(current.position) {
                child.handle.on_selected(current.sub_position);
            }
        }
        if let Some(f) = &self.options.on_selection_changed {
            f(change.current);
        }
    }

    fn dispatch_selection_aligned(&mut self) {
        let Some(selection) = self.pivot.dispatch_selected_and_aligned() else {
            return;
        };
        if let Some(f) = &self.options.on_selection_aligned {
            f(selection);
        }
    }

    /// Gives every view back to the provider. The selection survives; the next pass rebuilds the
    /// layout around it.
    pub fn detach<P: ItemProvider<Handle = H>>(&mut self, provider: &mut P) {
        self.scroll.cancel();
        self.fill.recycle_all(provider);
        self.alignment.clear_limits();
        self.has_laid_out = false;
        self.request_layout();
    }
}

impl<H> core::fmt::Debug for PivotLayout<H> {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        f.debug_struct("PivotLayout")
            .field("options", &self.options)
            .field("geometry", &self.geometry)
            .field("alignment", &self.alignment)
            .field("spans", &self.spans)
            .field("fill", &self.fill)
            .field("pivot", &self.pivot)
            .field("scroll", &self.scroll)
            .field("item_count", &self.item_count)
            .field("needs_layout", &(self.needs_layout || self.requester.is_requested()))
            .finish_non_exhaustive()
    }
}
