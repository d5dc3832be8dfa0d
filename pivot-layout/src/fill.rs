use alloc::collections::VecDeque;
use alloc::vec::Vec;

use crate::geometry::LayoutGeometry;
use crate::grid_row::GridRow;
use crate::scrap::ScrapArena;
use crate::spans::SpanCache;
use crate::{
    Bounds, ChildInfo, FillDirection, Insets, ItemDirection, ItemHandle, ItemKey, ItemProvider,
    LayoutWindow, MeasureSpec, PlacementSink,
};

/// A materialized child, owned by the layout until it is recycled.
#[derive(Debug)]
pub(crate) struct LayoutChild<H> {
    pub(crate) position: usize,
    pub(crate) key: ItemKey,
    pub(crate) row: usize,
    pub(crate) span_index: usize,
    pub(crate) span_size: usize,
    pub(crate) handle: H,
    pub(crate) bounds: Bounds,
    pub(crate) decor: Insets,
}

impl<H> LayoutChild<H> {
    pub(crate) fn info(&self) -> ChildInfo {
        ChildInfo {
            position: self.position,
            key: self.key,
            bounds: self.bounds,
            span_index: self.span_index,
            span_size: self.span_size,
        }
    }
}

/// Parameters of one fill: where it starts, which way it grows and how much space it may use.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct FillRequest {
    pub direction: FillDirection,
    pub item_direction: ItemDirection,
    /// Next collection position to lay out; may step outside the collection.
    pub current_position: isize,
    /// Layout coordinate where the next row is placed.
    pub checkpoint: i32,
    /// Remaining main-axis budget. Never negative.
    pub fill_space: i32,
    pub extra_space_start: i32,
    pub extra_space_end: i32,
    pub recycling_enabled: bool,
    /// Ignore the budget and lay out every remaining item.
    pub is_infinite: bool,
}

impl Default for FillRequest {
    fn default() -> Self {
        Self {
            direction: FillDirection::End,
            item_direction: ItemDirection::Tail,
            current_position: 0,
            checkpoint: 0,
            fill_space: 0,
            extra_space_start: 0,
            extra_space_end: 0,
            recycling_enabled: false,
            is_infinite: false,
        }
    }
}

impl FillRequest {
    pub fn reset(&mut self) {
        *self = Self::default();
    }

    pub fn set_fill_space(&mut self, space: i32) {
        self.fill_space = space.max(0);
    }

    pub fn has_more_items(&self, item_count: usize) -> bool {
        self.current_position >= 0 && (self.current_position as usize) < item_count
    }
}

/// Everything a fill needs besides the engine itself.
pub(crate) struct FillContext<'a, P, S> {
    pub(crate) provider: &'a mut P,
    pub(crate) sink: &'a mut S,
    pub(crate) geometry: &'a LayoutGeometry,
    pub(crate) spans: &'a mut SpanCache,
    pub(crate) item_spacing: i32,
}

struct Staged<H> {
    position: usize,
    key: ItemKey,
    row: usize,
    span_index: usize,
    span_size: usize,
    handle: H,
    main: i32,
    cross: i32,
    decor: Insets,
    cross_offset: i32,
}

/// Result of laying out one row.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
struct RowResult {
    consumed: i32,
    ignore_consumed: bool,
}

/// Places rows of children into the viewport and recycles the ones that leave it.
///
/// Children are kept sorted by position. Rows are laid out whole and recycled whole, so the
/// children always form complete rows.
pub(crate) struct FillEngine<H> {
    children: VecDeque<LayoutChild<H>>,
    scrap: ScrapArena<H>,
    request: FillRequest,
    row: GridRow,
    staged: Vec<Staged<H>>,
}

impl<H: ItemHandle> FillEngine<H> {
    pub(crate) fn new() -> Self {
        Self {
            children: VecDeque::new(),
            scrap: ScrapArena::new(),
            request: FillRequest::default(),
            row: GridRow::new(1, 0),
            staged: Vec::new(),
        }
    }

    pub(crate) fn request(&self) -> &FillRequest {
        &self.request
    }

    pub(crate) fn request_mut(&mut self) -> &mut FillRequest {
        &mut self.request
    }

    pub(crate) fn children(&self) -> &VecDeque<LayoutChild<H>> {
        &self.children
    }

    pub(crate) fn is_empty(&self) -> bool {
        self.children.is_empty()
    }

    pub(crate) fn len(&self) -> usize {
        self.children.len()
    }

    #[cfg(test)]
    pub(crate) fn scrap_len(&self) -> usize {
        self.scrap.len()
    }

    pub(crate) fn first(&self) -> Option<&LayoutChild<H>> {
        self.children.front()
    }

    pub(crate) fn last(&self) -> Option<&LayoutChild<H>> {
        self.children.back()
    }

    pub(crate) fn find(&self, position: usize) -> Option<&LayoutChild<H>> {
        let index = self
            .children
            .binary_search_by_key(&position, |c| c.position)
            .ok()?;
        self.children.get(index)
    }

    pub(crate) fn find_mut(&mut self, position: usize) -> Option<&mut LayoutChild<H>> {
        let index = self
            .children
            .binary_search_by_key(&position, |c| c.position)
            .ok()?;
        self.children.get_mut(index)
    }

    /// Lowest decorated start among children.
    pub(crate) fn low_edge(&self, geometry: &LayoutGeometry) -> Option<i32> {
        self.children
            .iter()
            .map(|c| geometry.decorated_start(c.bounds, c.decor))
            .min()
    }

    /// Highest decorated end among children.
    pub(crate) fn high_edge(&self, geometry: &LayoutGeometry) -> Option<i32> {
        self.children
            .iter()
            .map(|c| geometry.decorated_end(c.bounds, c.decor))
            .max()
    }

    pub(crate) fn window(&self, geometry: &LayoutGeometry) -> Option<LayoutWindow> {
        Some(LayoutWindow {
            start_offset: self.low_edge(geometry)?,
            end_offset: self.high_edge(geometry)?,
        })
    }

    /// Lays out rows until the budget is spent or the collection runs out. Returns the space
    /// consumed, which may exceed the budget by up to one row.
    pub(crate) fn fill<P, S>(&mut self, ctx: &mut FillContext<'_, P, S>) -> i32
    where
        P: ItemProvider<Handle = H>,
        S: PlacementSink<H>,
    {
        self.recycle(ctx.provider, ctx.geometry);
        let item_count = ctx.provider.item_count();
        let mut consumed = 0;
        while self.request.has_more_items(item_count)
            && (self.request.fill_space > 0 || self.request.is_infinite)
        {
            let Some(result) = self.layout_next_row(ctx, item_count) else {
                break;
            };
            if !result.ignore_consumed {
                consumed += result.consumed;
                self.request
                    .set_fill_space(self.request.fill_space - result.consumed);
            }
            self.recycle(ctx.provider, ctx.geometry);
        }
        ltrace!(
            consumed,
            children = self.children.len(),
            next = self.request.current_position,
            "fill finished"
        );
        consumed
    }

    fn obtain<P>(&mut self, provider: &mut P, position: usize) -> (ItemKey, H)
    where
        P: ItemProvider<Handle = H>,
    {
        let key = provider.item_key(position);
        match self.scrap.take(key) {
            Some(child) => (key, child.handle),
            None => (key, provider.get_view(position)),
        }
    }

    fn layout_next_row<P, S>(
        &mut self,
        ctx: &mut FillContext<'_, P, S>,
        item_count: usize,
    ) -> Option<RowResult>
    where
        P: ItemProvider<Handle = H>,
        S: PlacementSink<H>,
    {
        let geometry = ctx.geometry;
        let request = self.request;
        let span_count = ctx.spans.span_count();
        let cross_space = geometry.cross_space();
        if self.row.span_count() != span_count || self.row.width() != cross_space {
            self.row.configure(span_count, cross_space);
        } else {
            self.row.reset(0);
        }

        let mut staged = core::mem::take(&mut self.staged);
        staged.clear();
        let mut ignore_consumed = true;
        let mut next = request.current_position;
        let first_row = ctx.spans.row(next as usize);

        while next >= 0 && (next as usize) < item_count {
            let position = next as usize;
            let info = ctx.spans.info(position);
            if info.row != first_row {
                break;
            }
            if !self.row.is_empty() {
                let fits = match request.item_direction {
                    ItemDirection::Tail => self.row.fits_end(info.span_size),
                    ItemDirection::Head => self.row.fits_start(info.span_size),
                };
                if !fits {
                    break;
                }
            }

            let (key, mut handle) = self.obtain(ctx.provider, position);
            let spec = MeasureSpec {
                orientation: geometry.orientation(),
                cross_space: self.row.span_space() * info.span_size as i32,
            };
            let size = ctx.provider.measure(&mut handle, spec);
            let decor = ctx.provider.decoration(&handle);
            let (before, after) = geometry.main_decoration(decor);
            let main = geometry.main_of(size);
            let decorated = main + before + after;
            let cross_offset = if self.row.is_empty() {
                self.row.init(0, decorated, info.span_index, info.span_size);
                self.row.start_offset()
            } else {
                match request.item_direction {
                    ItemDirection::Tail => self.row.append(decorated, info.span_size),
                    ItemDirection::Head => self.row.prepend(decorated, info.span_size),
                }
            };
            if !(handle.is_removed() || handle.is_changed()) {
                ignore_consumed = false;
            }
            staged.push(Staged {
                position,
                key,
                row: info.row,
                span_index: info.span_index,
                span_size: info.span_size,
                handle,
                main,
                cross: geometry.cross_of(size),
                decor,
                cross_offset,
            });
            next += request.item_direction.step();
        }

        if staged.is_empty() {
            self.staged = staged;
            return None;
        }

        let height = self.row.height();
        let row_start = match request.direction {
            FillDirection::End => request.checkpoint,
            FillDirection::Start => request.checkpoint - height,
        };
        let cross_origin = geometry.cross_start_after_padding();
        for item in staged.drain(..) {
            let (before, _) = geometry.main_decoration(item.decor);
            let (cross_before, _) = geometry.cross_decoration(item.decor);
            let main_start = row_start + before;
            let cross_start = cross_origin + item.cross_offset + cross_before;
            let bounds = geometry.bounds(
                main_start,
                main_start + item.main,
                cross_start,
                cross_start + item.cross,
            );
            ctx.sink.place(&item.handle, bounds);
            let child = LayoutChild {
                position: item.position,
                key: item.key,
                row: item.row,
                span_index: item.span_index,
                span_size: item.span_size,
                handle: item.handle,
                bounds,
                decor: item.decor,
            };
            match request.item_direction {
                ItemDirection::Tail => self.children.push_back(child),
                ItemDirection::Head => self.children.push_front(child),
            }
        }
        self.staged = staged;

        let consumed = height + ctx.item_spacing;
        self.request.current_position = next;
        self.request.checkpoint = match request.direction {
            FillDirection::End => row_start + height + ctx.item_spacing,
            FillDirection::Start => row_start - ctx.item_spacing,
        };
        Some(RowResult {
            consumed,
            ignore_consumed,
        })
    }

    /// Recycles whole rows that lie completely outside the viewport plus the request's extra
    /// space.
    pub(crate) fn recycle<P>(&mut self, provider: &mut P, geometry: &LayoutGeometry)
    where
        P: ItemProvider<Handle = H>,
    {
        let request = self.request;
        if !request.recycling_enabled || request.is_infinite || self.children.is_empty() {
            return;
        }
        let low = geometry.start_after_padding() - request.extra_space_start;
        let high = geometry.end_after_padding() + request.extra_space_end;

        let mut kept = VecDeque::with_capacity(self.children.len());
        let mut group: Vec<LayoutChild<H>> = Vec::new();
        let mut drained = core::mem::take(&mut self.children).into_iter().peekable();
        while let Some(child) = drained.next() {
            let row = child.row;
            group.push(child);
            if drained.peek().is_some_and(|next| next.row == row) {
                continue;
            }
            let start = group
                .iter()
                .map(|c| geometry.decorated_start(c.bounds, c.decor))
                .min()
                .unwrap_or(0);
            let end = group
                .iter()
                .map(|c| geometry.decorated_end(c.bounds, c.decor))
                .max()
                .unwrap_or(0);
            if end <= low || start >= high {
                for c in group.drain(..) {
                    ltrace!(position = c.position, "recycle");
                    provider.recycle(c.handle);
                }
            } else {
                kept.extend(group.drain(..));
            }
        }
        self.children = kept;
    }

    pub(crate) fn recycle_all<P: ItemProvider<Handle = H>>(&mut self, provider: &mut P) {
        for child in self.children.drain(..) {
            provider.recycle(child.handle);
        }
        self.recycle_scrap(provider);
    }

    /// Detaches every child. With `reuse`, children wait in the scrap arena to be picked up by
    /// key; otherwise they go straight back to the provider.
    pub(crate) fn scrap_all<P: ItemProvider<Handle = H>>(&mut self, reuse: bool, provider: &mut P) {
        for child in self.children.drain(..) {
            if !reuse {
                provider.recycle(child.handle);
                continue;
            }
            if let Some(stale) = self.scrap.insert(child) {
                provider.recycle(stale.handle);
            }
        }
    }

    pub(crate) fn recycle_scrap<P: ItemProvider<Handle = H>>(&mut self, provider: &mut P) {
        if self.scrap.is_empty() {
            return;
        }
        for child in self.scrap.drain() {
            provider.recycle(child.handle);
        }
    }

    /// Moves every child by `delta` along the main axis and re-places it.
    pub(crate) fn offset_children<S: PlacementSink<H>>(
        &mut self,
        delta: i32,
        geometry: &LayoutGeometry,
        sink: &mut S,
    ) {
        for child in self.children.iter_mut() {
            child.bounds = geometry.offset(child.bounds, delta);
            sink.place(&child.handle, child.bounds);
        }
    }
}

impl<H> core::fmt::Debug for FillEngine<H> {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        f.debug_struct("FillEngine")
            .field("children", &self.children.len())
            .field("scrap", &self.scrap.len())
            .field("request", &self.request)
            .finish_non_exhaustive()
    }
}
