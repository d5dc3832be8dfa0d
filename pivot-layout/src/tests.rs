use crate::*;

use alloc::format;
use alloc::sync::Arc;
use alloc::vec;
use alloc::vec::Vec;
use core::sync::atomic::{AtomicUsize, Ordering};
use pretty_assertions::assert_eq;
use std::sync::Mutex;

struct Lcg(u64);

impl Lcg {
    fn new(seed: u64) -> Self {
        Self(seed)
    }

    fn next_u64(&mut self) -> u64 {
        self.0 = self
            .0
            .wrapping_mul(6364136223846793005)
            .wrapping_add(1442695040888963407);
        self.0
    }

    fn gen_range(&mut self, start: usize, end_exclusive: usize) -> usize {
        debug_assert!(start < end_exclusive);
        start + (self.next_u64() % (end_exclusive - start) as u64) as usize
    }

    fn gen_i32(&mut self, start: i32, end_exclusive: i32) -> i32 {
        debug_assert!(start < end_exclusive);
        start + (self.next_u64() % (end_exclusive - start) as u64) as i32
    }
}

#[derive(Debug)]
struct Cell {
    key: ItemKey,
    selected: Option<usize>,
    deselected: usize,
    alignments: Vec<ChildAlignment>,
}

impl ItemHandle for Cell {
    fn on_selected(&mut self, sub_position: usize) {
        self.selected = Some(sub_position);
    }

    fn on_deselected(&mut self) {
        self.selected = None;
        self.deselected += 1;
    }

    fn sub_position_alignments(&self) -> &[ChildAlignment] {
        &self.alignments
    }
}

/// A collection of keyed items with fixed main-axis sizes that counts view traffic.
struct Items {
    entries: Vec<(ItemKey, i32)>,
    next_key: ItemKey,
    stable_keys: bool,
    unfocusable: Vec<usize>,
    alignments: Vec<(ItemKey, Vec<ChildAlignment>)>,
    decoration: Insets,
    created: usize,
    recycled: usize,
}

impl Items {
    fn uniform(count: usize, size: i32) -> Self {
        Self {
            entries: (0..count).map(|i| (i as ItemKey, size)).collect(),
            next_key: count as ItemKey,
            stable_keys: false,
            unfocusable: Vec::new(),
            alignments: Vec::new(),
            decoration: Insets::ZERO,
            created: 0,
            recycled: 0,
        }
    }

    fn alive(&self) -> usize {
        self.created - self.recycled
    }

    fn insert(&mut self, position: usize, count: usize, size: i32) {
        for i in 0..count {
            self.entries.insert(position + i, (self.next_key, size));
            self.next_key += 1;
        }
    }

    fn remove(&mut self, position: usize, count: usize) {
        self.entries.drain(position..position + count);
    }

    fn size_of(&self, key: ItemKey) -> i32 {
        self.entries
            .iter()
            .find(|(k, _)| *k == key)
            .map_or(0, |(_, size)| *size)
    }
}

impl ItemProvider for Items {
    type Handle = Cell;

    fn item_count(&self) -> usize {
        self.entries.len()
    }

    fn item_key(&self, position: usize) -> ItemKey {
        self.entries[position].0
    }

    fn has_stable_keys(&self) -> bool {
        self.stable_keys
    }

    fn get_view(&mut self, position: usize) -> Cell {
        self.created += 1;
        let key = self.entries[position].0;
        let alignments = self
            .alignments
            .iter()
            .find(|(k, _)| *k == key)
            .map(|(_, a)| a.clone())
            .unwrap_or_default();
        Cell {
            key,
            selected: None,
            deselected: 0,
            alignments,
        }
    }

    fn measure(&mut self, handle: &mut Cell, spec: MeasureSpec) -> Size {
        let main = self.size_of(handle.key);
        match spec.orientation {
            Orientation::Vertical => Size::new(spec.cross_space, main),
            Orientation::Horizontal => Size::new(main, spec.cross_space),
        }
    }

    fn decoration(&self, _handle: &Cell) -> Insets {
        self.decoration
    }

    fn recycle(&mut self, _handle: Cell) {
        self.recycled += 1;
    }

    fn is_focusable(&self, position: usize) -> bool {
        !self.unfocusable.contains(&position)
    }
}

fn noop(_: &Cell, _: Bounds) {}

fn viewport() -> Viewport {
    Viewport::new(1920, 1000)
}

fn instant() -> LayoutOptions {
    LayoutOptions::new().with_smooth_focus_changes(false)
}

fn laid_out(options: LayoutOptions, items: &mut Items) -> PivotLayout<Cell> {
    let mut layout = PivotLayout::new(options).unwrap();
    layout.set_viewport(viewport());
    layout.layout(items, &mut noop);
    layout
}

fn positions(layout: &PivotLayout<Cell>) -> Vec<usize> {
    layout.children().map(|c| c.position).collect()
}

/// Ticks until the smooth scroll settles; returns the number of ticks.
fn settle(layout: &mut PivotLayout<Cell>, items: &mut Items) -> usize {
    for ticks in 1..=10_000 {
        if !matches!(layout.tick(items, &mut noop), ScrollTick::Scrolling { .. }) {
            return ticks;
        }
    }
    panic!("smooth scroll did not settle");
}

type Recorded = Arc<Mutex<Vec<Option<usize>>>>;

fn recorder() -> (Recorded, impl Fn(Option<Selection>) + Send + Sync + 'static) {
    let log: Recorded = Arc::default();
    let sink = log.clone();
    (log, move |s: Option<Selection>| {
        sink.lock().unwrap().push(s.map(|s| s.position));
    })
}

fn assert_contiguous(layout: &PivotLayout<Cell>) {
    let positions = positions(layout);
    for pair in positions.windows(2) {
        assert_eq!(pair[1], pair[0] + 1, "children {positions:?}");
    }
}

#[test]
fn initial_layout_fills_viewport_and_selects_first_item() {
    let (changed, on_changed) = recorder();
    let (aligned, on_aligned) = recorder();
    let mut items = Items::uniform(200, 100);
    let layout = laid_out(
        LayoutOptions::new()
            .with_on_selection_changed(on_changed)
            .with_on_selection_aligned(on_aligned),
        &mut items,
    );

    assert_eq!(positions(&layout), (0..10).collect::<Vec<_>>());
    assert_eq!(layout.selected_position(), Some(0));
    assert_eq!(
        layout.child(0).map(|c| c.bounds),
        Some(Bounds {
            left: 0,
            top: 0,
            right: 1920,
            bottom: 100,
        })
    );
    assert_eq!(layout.handle(0).and_then(|c| c.selected), Some(0));
    assert_eq!(items.alive(), 10);
    assert_eq!(*changed.lock().unwrap(), vec![Some(0)]);
    assert_eq!(*aligned.lock().unwrap(), vec![Some(0)]);
    assert!(!layout.needs_layout());
    assert_eq!(
        layout.layout_window(),
        Some(LayoutWindow {
            start_offset: 0,
            end_offset: 1000,
        })
    );
}

#[test]
fn pivot_keyline_lands_on_viewport_center_after_five_moves() {
    let mut items = Items::uniform(200, 100);
    let mut layout = laid_out(instant(), &mut items);

    for expected in 1..=5 {
        assert_eq!(
            layout.move_focus(FocusDirection::Down, &mut items, &mut noop),
            Some(expected)
        );
    }

    assert_eq!(layout.selected_position(), Some(5));
    assert_eq!(layout.parent_keyline(), 500);
    assert_eq!(layout.child_keyline(5), Some(500));
    assert_eq!(layout.child(5).map(|c| c.bounds.top), Some(450));
    assert_eq!(positions(&layout), (0..=10).collect::<Vec<_>>());
    assert_eq!(layout.scroll_offset(), 50);
}

#[test]
fn items_near_the_start_stay_pinned_to_the_edge() {
    let mut items = Items::uniform(200, 100);
    let mut layout = laid_out(instant(), &mut items);

    layout.move_focus(FocusDirection::Down, &mut items, &mut noop);
    layout.move_focus(FocusDirection::Down, &mut items, &mut noop);

    // Centering item 2 would uncover space before item 0.
    assert_eq!(layout.child(0).map(|c| c.bounds.top), Some(0));
    assert_eq!(layout.child_keyline(2), Some(250));
}

#[test]
fn smooth_focus_changes_settle_on_the_keyline() {
    let mut items = Items::uniform(200, 100);
    let mut layout = laid_out(LayoutOptions::new(), &mut items);

    for expected in 1..=5 {
        assert_eq!(
            layout.move_focus(FocusDirection::Down, &mut items, &mut noop),
            Some(expected)
        );
        assert!(layout.is_scrolling());
        settle(&mut layout, &mut items);
    }

    assert!(!layout.is_scrolling());
    assert_eq!(layout.tick(&mut items, &mut noop), ScrollTick::Idle);
    assert_eq!(layout.selected_position(), Some(5));
    assert_eq!(layout.child_keyline(5), Some(500));
}

#[test]
fn smooth_scroll_reaches_a_far_target() {
    let (changed, on_changed) = recorder();
    let (aligned, on_aligned) = recorder();
    let mut items = Items::uniform(200, 100);
    let mut layout = laid_out(
        LayoutOptions::new()
            .with_on_selection_changed(on_changed)
            .with_on_selection_aligned(on_aligned),
        &mut items,
    );

    layout.scroll_to_position(150, 0, true, &mut items, &mut noop);
    assert_eq!(layout.scroll_target().map(|s| s.position), Some(150));
    assert_eq!(layout.selected_position(), Some(0));

    let first = layout.tick(&mut items, &mut noop);
    assert_eq!(first, ScrollTick::Scrolling { consumed: 64 });
    let ticks = settle(&mut layout, &mut items);
    assert!(ticks > 100, "settled after {ticks} ticks");

    assert_eq!(layout.selected_position(), Some(150));
    assert_eq!(layout.child_keyline(150), Some(500));
    assert_eq!(layout.handle(150).and_then(|c| c.selected), Some(0));
    assert_eq!(*changed.lock().unwrap(), vec![Some(0), Some(150)]);
    assert_eq!(*aligned.lock().unwrap(), vec![Some(0), Some(150)]);
    assert_eq!(items.alive(), layout.child_count());
    assert_contiguous(&layout);
}

#[test]
fn cancelled_smooth_scroll_leaves_content_in_place() {
    let mut items = Items::uniform(200, 100);
    let mut layout = laid_out(LayoutOptions::new(), &mut items);

    layout.scroll_to_position(150, 0, true, &mut items, &mut noop);
    layout.tick(&mut items, &mut noop);
    layout.tick(&mut items, &mut noop);
    assert!(layout.cancel_scroll());

    assert_eq!(layout.scroll_offset(), 128);
    assert_eq!(layout.selected_position(), Some(0));
    assert_eq!(layout.tick(&mut items, &mut noop), ScrollTick::Idle);
}

#[test]
fn scrolling_stops_at_collection_edges() {
    let mut items = Items::uniform(200, 100);
    let mut layout = laid_out(instant(), &mut items);

    assert_eq!(layout.scroll_by(-100, &mut items, &mut noop), 0);
    assert_eq!(layout.scroll_by(100_000, &mut items, &mut noop), 19_000);
    assert_eq!(layout.child(199).map(|c| c.bounds.bottom), Some(1000));
    assert_eq!(layout.scroll_by(10, &mut items, &mut noop), 0);
    assert_eq!(items.alive(), layout.child_count());
    assert_contiguous(&layout);
}

#[test]
fn scroll_by_reports_moved_children_to_the_sink() {
    let mut items = Items::uniform(200, 100);
    let mut layout = laid_out(instant(), &mut items);

    let mut placed = Vec::new();
    let consumed = layout.scroll_by(250, &mut items, &mut |cell: &Cell, bounds: Bounds| {
        placed.push((cell.key, bounds.top));
    });

    assert_eq!(consumed, 250);
    assert!(placed.contains(&(3, 50)));
    assert!(placed.contains(&(12, 950)));
    // Extra space on the scrolled-toward side keeps the pre-filled rows.
    assert_eq!(positions(&layout), (2..=22).collect::<Vec<_>>());
}

#[test]
fn grid_rows_split_the_cross_axis() {
    let mut items = Items::uniform(23, 200);
    let layout = laid_out(LayoutOptions::grid(5), &mut items);

    assert_eq!(layout.child_count(), 23);
    let child = layout.child(7).unwrap();
    assert_eq!(child.span_index, 2);
    assert_eq!(
        child.bounds,
        Bounds {
            left: 768,
            top: 200,
            right: 1152,
            bottom: 400,
        }
    );
    assert_eq!(layout.child(22).map(|c| c.bounds.top), Some(800));
}

#[test]
fn grid_navigation_moves_between_rows_and_spans() {
    let mut items = Items::uniform(50, 200);
    let mut layout = laid_out(instant().with_span_count(5), &mut items);

    assert_eq!(layout.move_focus(FocusDirection::Down, &mut items, &mut noop), Some(5));
    assert_eq!(layout.move_focus(FocusDirection::Right, &mut items, &mut noop), Some(6));
    assert_eq!(layout.move_focus(FocusDirection::Down, &mut items, &mut noop), Some(11));
    for expected in 12..=14 {
        assert_eq!(
            layout.move_focus(FocusDirection::Right, &mut items, &mut noop),
            Some(expected)
        );
    }

    // Past the last span, focus leaves the layout and the selection stays.
    assert_eq!(layout.move_focus(FocusDirection::Right, &mut items, &mut noop), None);
    assert_eq!(layout.selected_position(), Some(14));
    assert_eq!(layout.child_keyline(14), Some(500));
}

#[test]
fn grid_navigation_skips_unfocusable_rows() {
    let mut items = Items::uniform(50, 200);
    items.unfocusable = (5..10).collect();
    let mut layout = laid_out(instant().with_span_count(5), &mut items);

    assert_eq!(
        layout.next_focus_position(2, FocusDirection::Down, &items),
        Some(12)
    );
    assert_eq!(layout.move_focus(FocusDirection::Down, &mut items, &mut noop), Some(10));
}

#[test]
fn navigation_queries_wait_for_the_first_layout() {
    let mut items = Items::uniform(50, 100);
    let mut layout = PivotLayout::new(instant()).unwrap();
    layout.set_viewport(viewport());
    assert_eq!(
        layout.next_focus_position(0, FocusDirection::Down, &items),
        None
    );

    layout.layout(&mut items, &mut noop);
    assert_eq!(
        layout.next_focus_position(0, FocusDirection::Down, &items),
        Some(1)
    );

    layout.detach(&mut items);
    assert_eq!(
        layout.next_focus_position(0, FocusDirection::Down, &items),
        None
    );
}

#[test]
fn moving_past_the_first_row_keeps_focus_unless_allowed_out() {
    let mut items = Items::uniform(20, 100);
    let mut layout = laid_out(instant(), &mut items);
    assert_eq!(layout.move_focus(FocusDirection::Up, &mut items, &mut noop), Some(0));
    assert_eq!(layout.selected_position(), Some(0));

    let mut items = Items::uniform(20, 100);
    let mut layout = laid_out(instant().with_focus_out(true, false), &mut items);
    assert_eq!(layout.move_focus(FocusDirection::Up, &mut items, &mut noop), None);
    assert_eq!(layout.selected_position(), Some(0));
}

#[test]
fn reverse_layout_starts_at_the_bottom() {
    let mut items = Items::uniform(200, 100);
    let mut layout = laid_out(instant().with_reverse_layout(true), &mut items);

    assert_eq!(layout.child(0).map(|c| c.bounds.bottom), Some(1000));
    assert_eq!(layout.child(1).map(|c| c.bounds.bottom), Some(900));
    assert_eq!(layout.move_focus(FocusDirection::Up, &mut items, &mut noop), Some(1));
    assert_eq!(layout.child(0).map(|c| c.bounds.bottom), Some(1000));
    assert_eq!(layout.move_focus(FocusDirection::Down, &mut items, &mut noop), Some(0));
}

#[test]
fn horizontal_layout_runs_along_the_x_axis() {
    let mut items = Items::uniform(50, 300);
    let mut layout = laid_out(
        instant().with_orientation(Orientation::Horizontal),
        &mut items,
    );

    assert_eq!(
        layout.child(1).map(|c| c.bounds),
        Some(Bounds {
            left: 300,
            top: 0,
            right: 600,
            bottom: 1000,
        })
    );
    assert_eq!(layout.parent_keyline(), 960);
    assert_eq!(layout.move_focus(FocusDirection::Right, &mut items, &mut noop), Some(1));
    assert_eq!(layout.move_focus(FocusDirection::Down, &mut items, &mut noop), None);
}

#[test]
fn spacing_and_decorations_offset_children() {
    let mut items = Items::uniform(50, 100);
    items.decoration = Insets::uniform(5);
    let layout = laid_out(instant().with_item_spacing(10), &mut items);

    let first = layout.child(0).unwrap().bounds;
    assert_eq!((first.left, first.top, first.bottom), (5, 5, 105));
    assert_eq!(layout.child(1).map(|c| c.bounds.top), Some(125));
}

#[test]
fn custom_extra_space_materializes_beyond_the_viewport() {
    let mut items = Items::uniform(200, 100);
    let layout = laid_out(
        instant().with_extra_layout_space(|_| ExtraSpace {
            start: 200,
            end: 300,
        }),
        &mut items,
    );

    assert_eq!(positions(&layout), (0..=12).collect::<Vec<_>>());
}

#[test]
fn wrap_content_lays_out_everything() {
    let mut items = Items::uniform(30, 100);
    let mut layout = PivotLayout::new(instant()).unwrap();
    layout.set_viewport(Viewport::new(1920, 0).with_wrap_content(true));
    layout.layout(&mut items, &mut noop);

    assert_eq!(layout.child_count(), 30);
    assert_eq!(
        layout.layout_window(),
        Some(LayoutWindow {
            start_offset: 0,
            end_offset: 3000,
        })
    );
    assert_eq!(layout.scroll_by(100, &mut items, &mut noop), 0);
}

#[test]
fn removing_the_pivot_selects_the_item_that_took_its_place() {
    let (changed, on_changed) = recorder();
    let mut items = Items::uniform(200, 100);
    let mut layout = laid_out(instant().with_on_selection_changed(on_changed), &mut items);
    layout.scroll_to_position(10, 0, false, &mut items, &mut noop);

    items.remove(10, 1);
    layout.on_items_removed(10, 1);
    assert!(layout.pivot_state().is_pending_offset_disabled());
    assert!(layout.pivot_state().is_selection_update_pending());
    assert!(layout.needs_layout());

    layout.layout(&mut items, &mut noop);
    assert_eq!(layout.selected_position(), Some(10));
    assert!(!layout.pivot_state().is_selection_update_pending());
    assert_eq!(layout.handle(10).map(|c| c.key), Some(11));
    assert_eq!(layout.handle(10).and_then(|c| c.selected), Some(0));
    assert_eq!(*changed.lock().unwrap(), vec![Some(0), Some(10), Some(10)]);
    assert_eq!(items.alive(), layout.child_count());
}

#[test]
fn removing_the_tail_clamps_the_pivot() {
    let mut items = Items::uniform(200, 100);
    let mut layout = laid_out(instant(), &mut items);
    layout.scroll_to_position(199, 0, false, &mut items, &mut noop);

    items.remove(195, 5);
    layout.on_items_removed(195, 5);
    layout.layout(&mut items, &mut noop);

    assert_eq!(layout.selected_position(), Some(194));
    assert_eq!(layout.child(194).map(|c| c.bounds.bottom), Some(1000));
}

#[test]
fn inserting_before_the_pivot_keeps_the_same_item_selected() {
    let mut items = Items::uniform(200, 100);
    items.stable_keys = true;
    let mut layout = laid_out(instant(), &mut items);
    layout.scroll_to_position(10, 0, false, &mut items, &mut noop);
    let created = items.created;

    items.insert(0, 3, 100);
    layout.on_items_inserted(0, 3);
    layout.layout(&mut items, &mut noop);

    assert_eq!(layout.selected_position(), Some(13));
    assert_eq!(layout.handle(13).map(|c| c.key), Some(10));
    assert_eq!(layout.child_keyline(13), Some(500));
    // Every view was reused by key.
    assert_eq!(items.created, created);
    assert_eq!(items.alive(), layout.child_count());
}

#[test]
fn moved_pivot_follows_its_item() {
    let mut items = Items::uniform(200, 100);
    items.stable_keys = true;
    let mut layout = laid_out(instant(), &mut items);
    layout.scroll_to_position(10, 0, false, &mut items, &mut noop);

    let entry = items.entries.remove(10);
    items.entries.insert(2, entry);
    layout.on_items_moved(10, 2, 1);
    layout.layout(&mut items, &mut noop);

    assert_eq!(layout.selected_position(), Some(2));
    assert_eq!(layout.handle(2).map(|c| c.key), Some(10));
    assert_eq!(layout.child_keyline(2), Some(250));
}

#[test]
fn changed_items_are_rebound_without_stable_keys() {
    let mut items = Items::uniform(200, 100);
    let mut layout = laid_out(instant(), &mut items);

    layout.on_items_changed(0, 5);
    assert!(layout.needs_layout());
    layout.layout(&mut items, &mut noop);

    assert_eq!(items.created, 20);
    assert_eq!(items.recycled, 10);
    assert_eq!(layout.selected_position(), Some(0));
}

#[test]
fn changes_outside_the_window_relayout_without_rebinding() {
    let mut items = Items::uniform(200, 100);
    let mut layout = laid_out(instant(), &mut items);

    layout.on_items_changed(3, 0);
    assert!(!layout.needs_layout());

    layout.on_items_changed(150, 5);
    assert!(layout.needs_layout());
    layout.layout(&mut items, &mut noop);

    assert_eq!(items.created, 10);
    assert_eq!(items.recycled, 0);
    assert_eq!(positions(&layout), (0..10).collect::<Vec<_>>());
}

#[test]
fn predictive_pass_reuses_views_and_stays_quiet() {
    let completed = Arc::new(AtomicUsize::new(0));
    let counter = completed.clone();
    let (changed, on_changed) = recorder();
    let mut items = Items::uniform(200, 100);
    let mut layout = laid_out(
        instant()
            .with_on_selection_changed(on_changed)
            .with_on_layout_completed(move || {
                counter.fetch_add(1, Ordering::Relaxed);
            }),
        &mut items,
    );
    assert_eq!(completed.load(Ordering::Relaxed), 1);

    layout.layout_pass(LayoutPass::Predictive, &mut items, &mut noop);
    assert_eq!(items.created, 10);
    assert_eq!(completed.load(Ordering::Relaxed), 1);
    assert_eq!(changed.lock().unwrap().len(), 1);

    layout.layout(&mut items, &mut noop);
    assert_eq!(items.created, 10);
    assert_eq!(items.alive(), layout.child_count());
    assert_eq!(completed.load(Ordering::Relaxed), 2);
}

#[test]
fn layout_requests_from_callbacks_are_deferred() {
    let mut items = Items::uniform(50, 100);
    let mut layout = laid_out(instant(), &mut items);
    assert!(!layout.needs_layout());

    let requester = layout.layout_requester();
    layout
        .update_options(|o| {
            let requester = requester.clone();
            o.on_layout_completed = Some(Arc::new(move || requester.request()));
        })
        .unwrap();
    assert!(layout.needs_layout());

    layout.layout(&mut items, &mut noop);
    assert!(layout.needs_layout());

    layout.update_options(|o| o.on_layout_completed = None).unwrap();
    layout.layout(&mut items, &mut noop);
    assert!(!layout.needs_layout());

    requester.request();
    assert!(layout.needs_layout());
}

#[test]
fn debug_output_reports_pending_layout() {
    let mut items = Items::uniform(50, 100);
    let mut layout = laid_out(instant(), &mut items);
    assert!(format!("{layout:?}").contains("needs_layout: false"));

    layout.layout_requester().request();
    assert!(format!("{layout:?}").contains("needs_layout: true"));
}

#[test]
fn saved_state_restores_the_selection() {
    let mut items = Items::uniform(200, 100);
    let mut layout = laid_out(instant(), &mut items);
    layout.scroll_to_position(42, 0, false, &mut items, &mut noop);
    let state = layout.save_state();
    assert_eq!(state, SavedState { position: Some(42) });

    layout.detach(&mut items);
    assert_eq!(items.alive(), 0);
    assert!(layout.needs_layout());

    let mut restored = PivotLayout::new(instant()).unwrap();
    restored.set_viewport(viewport());
    restored.restore_state(state);
    restored.layout(&mut items, &mut noop);
    assert_eq!(restored.selected_position(), Some(42));
    assert_eq!(restored.child_keyline(42), Some(500));
}

#[test]
fn invalid_options_are_rejected() {
    let err = PivotLayout::<Cell>::new(
        LayoutOptions::new().with_child_alignment(ChildAlignment::new(0, 1.5)),
    )
    .unwrap_err();
    assert_eq!(
        err,
        ConfigError::RatioOutOfRange {
            field: "child offset_ratio",
            value: 1.5,
        }
    );

    let mut layout = PivotLayout::<Cell>::new(LayoutOptions::grid(3)).unwrap();
    assert_eq!(layout.set_span_count(0), Err(ConfigError::ZeroSpanCount));
    assert_eq!(layout.options().span_count, 3);
    assert_eq!(
        layout
            .update_options(|o| o.smooth_scroll_step = 0)
            .unwrap_err(),
        ConfigError::ZeroScrollStep
    );
}

#[test]
fn main_axis_moves_walk_sub_positions_first() {
    let mut items = Items::uniform(50, 100);
    items.entries[3].1 = 400;
    items.alignments = vec![(3, vec![ChildAlignment::new(0, 0.25), ChildAlignment::new(0, 0.75)])];
    let mut layout = laid_out(instant(), &mut items);

    for _ in 0..3 {
        layout.move_focus(FocusDirection::Down, &mut items, &mut noop);
    }
    assert_eq!(
        layout.selection(),
        Some(Selection {
            position: 3,
            sub_position: 0,
        })
    );
    assert_eq!(layout.child_keyline(3), Some(400));

    assert_eq!(layout.move_focus(FocusDirection::Down, &mut items, &mut noop), Some(3));
    assert_eq!(layout.selected_sub_position(), 1);
    assert_eq!(layout.child_keyline(3), Some(500));
    assert_eq!(layout.handle(3).and_then(|c| c.selected), Some(1));

    assert_eq!(layout.move_focus(FocusDirection::Down, &mut items, &mut noop), Some(4));
    assert_eq!(layout.selected_sub_position(), 0);
    assert_eq!(layout.handle(3).map(|c| c.deselected), Some(1));
}

#[test]
fn empty_collection_has_no_selection() {
    let mut items = Items::uniform(0, 100);
    let mut layout = laid_out(instant(), &mut items);

    assert_eq!(layout.selected_position(), None);
    assert_eq!(layout.child_count(), 0);
    assert_eq!(layout.move_focus(FocusDirection::Down, &mut items, &mut noop), None);
    layout.scroll_to_position(3, 0, false, &mut items, &mut noop);
    assert_eq!(layout.selected_position(), None);

    items.insert(0, 4, 100);
    layout.on_items_inserted(0, 4);
    layout.layout(&mut items, &mut noop);
    assert_eq!(layout.selected_position(), Some(0));
    assert_eq!(layout.child_count(), 4);
}

#[test]
fn random_operations_keep_the_layout_consistent() {
    let mut rng = Lcg::new(0x5eed_1234);
    let mut items = Items::uniform(120, 100);
    let mut layout = laid_out(instant().with_span_count(3), &mut items);
    let directions = [
        FocusDirection::Up,
        FocusDirection::Down,
        FocusDirection::Left,
        FocusDirection::Right,
    ];

    for step in 0..400 {
        let op = rng.gen_range(0, 6);
        let count = items.item_count();
        let relaid = match op {
            0 => {
                let direction = directions[rng.gen_range(0, 4)];
                layout.move_focus(direction, &mut items, &mut noop);
                false
            }
            1 => {
                layout.scroll_by(rng.gen_i32(-700, 700), &mut items, &mut noop);
                false
            }
            2 => {
                let position = rng.gen_range(0, count + 1);
                let n = rng.gen_range(1, 4);
                items.insert(position, n, 100);
                layout.on_items_inserted(position, n);
                layout.layout(&mut items, &mut noop);
                true
            }
            3 if count > 0 => {
                let position = rng.gen_range(0, count);
                let n = rng.gen_range(1, (count - position).min(4) + 1);
                items.remove(position, n);
                layout.on_items_removed(position, n);
                layout.layout(&mut items, &mut noop);
                true
            }
            4 if count > 0 => {
                let target = rng.gen_range(0, count);
                layout.scroll_to_position(target, 0, false, &mut items, &mut noop);
                true
            }
            _ => {
                layout.layout(&mut items, &mut noop);
                true
            }
        };

        assert_eq!(items.alive(), layout.child_count(), "step {step}");
        assert_contiguous(&layout);
        let count = items.item_count();
        match layout.selected_position() {
            Some(p) => {
                assert!(p < count, "step {step}: selection {p} of {count}");
                if relaid {
                    assert!(layout.child(p).is_some(), "step {step}: pivot {p} missing");
                }
            }
            None => assert!(!relaid || count == 0, "step {step}: no selection"),
        }
    }
}
