use crate::{SavedState, Selection};

/// A selection change ready to be reported.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct SelectionChange {
    pub previous: Option<Selection>,
    pub current: Option<Selection>,
}

/// Tracks the selected position across structural changes.
///
/// Inserts, removes and moves accumulate into a pending offset that is applied at the start of
/// the next layout pass. Removing the selected item freezes that offset: the selection snaps to
/// the removal boundary and ignores further changes until the next pass.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct PivotState {
    position: Option<usize>,
    sub_position: usize,
    pending_offset: isize,
    pending_offset_disabled: bool,
    selection_update_pending: bool,
    dispatched: Option<Selection>,
    aligned_pending: bool,
}

impl PivotState {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn position(&self) -> Option<usize> {
        self.position
    }

    pub fn sub_position(&self) -> usize {
        self.sub_position
    }

    pub fn selection(&self) -> Option<Selection> {
        self.position.map(|position| Selection {
            position,
            sub_position: self.sub_position,
        })
    }

    pub fn pending_offset(&self) -> isize {
        self.pending_offset
    }

    pub fn is_pending_offset_disabled(&self) -> bool {
        self.pending_offset_disabled
    }

    /// The selected item was removed; the next pass reports a selection even if the resolved
    /// position did not change.
    pub fn is_selection_update_pending(&self) -> bool {
        self.selection_update_pending
    }

    /// Selects `position`, dropping any pending structural offset. Returns whether the
    /// selection changed.
    pub fn update(&mut self, position: usize, sub_position: usize) -> bool {
        let changed = self.position != Some(position) || self.sub_position != sub_position;
        self.position = Some(position);
        self.sub_position = sub_position;
        self.pending_offset = 0;
        self.pending_offset_disabled = false;
        changed
    }

    pub fn clear(&mut self) {
        self.position = None;
        self.sub_position = 0;
        self.pending_offset = 0;
        self.pending_offset_disabled = false;
    }

    fn final_position(&self) -> Option<isize> {
        self.position.map(|p| p as isize + self.pending_offset)
    }

    pub fn on_items_inserted(&mut self, position: usize, count: usize) {
        let Some(current) = self.final_position() else {
            return;
        };
        if self.pending_offset_disabled || count == 0 {
            return;
        }
        if position as isize <= current {
            self.pending_offset += count as isize;
        }
    }

    pub fn on_items_removed(&mut self, position: usize, count: usize) {
        let Some(current) = self.final_position() else {
            return;
        };
        if self.pending_offset_disabled || count == 0 {
            return;
        }
        let first = position as isize;
        if first > current {
            return;
        }
        if first + count as isize > current {
            // The selected item itself is gone: snap to where the removed range started.
            self.position = Some(position);
            self.sub_position = 0;
            self.pending_offset = 0;
            self.pending_offset_disabled = true;
            self.selection_update_pending = true;
        } else {
            self.pending_offset -= count as isize;
        }
    }

    pub fn on_items_moved(&mut self, from: usize, to: usize, count: usize) {
        let Some(current) = self.final_position() else {
            return;
        };
        if self.pending_offset_disabled || count == 0 {
            return;
        }
        let (from, to, count) = (from as isize, to as isize, count as isize);
        if from <= current && current < from + count {
            self.pending_offset += to - from;
        } else if from < current && to > current - count {
            self.pending_offset -= count;
        } else if from > current && to < current {
            self.pending_offset += count;
        }
    }

    /// Applies the pending offset. Returns whether the position changed.
    pub fn consume_pending_offset(&mut self) -> bool {
        let disabled = core::mem::take(&mut self.pending_offset_disabled);
        let offset = core::mem::take(&mut self.pending_offset);
        let Some(position) = self.position else {
            return false;
        };
        if disabled || offset == 0 {
            return false;
        }
        let next = (position as isize + offset).max(0) as usize;
        if next == position {
            return false;
        }
        self.position = Some(next);
        self.sub_position = 0;
        true
    }

    /// Resolves the selection for a pass over `item_count` items. Returns whether it changed.
    pub fn on_layout_start(&mut self, item_count: usize) -> bool {
        let before = self.selection();
        self.consume_pending_offset();
        if item_count == 0 {
            self.position = None;
            self.sub_position = 0;
        } else {
            match self.position {
                None => {
                    self.position = Some(0);
                    self.sub_position = 0;
                }
                Some(p) if p >= item_count => {
                    self.position = Some(item_count - 1);
                    self.sub_position = 0;
                }
                Some(_) => {}
            }
        }
        self.selection() != before
    }

    /// Returns the change to report, if the selection differs from the last reported one or an
    /// update is pending. Marks it reported.
    pub fn dispatch_selected(&mut self) -> Option<SelectionChange> {
        let current = self.selection();
        if current == self.dispatched && !self.selection_update_pending {
            return None;
        }
        self.selection_update_pending = false;
        self.aligned_pending = true;
        let previous = core::mem::replace(&mut self.dispatched, current);
        Some(SelectionChange { previous, current })
    }

    /// Returns the reported selection once it also became aligned; at most once per change.
    pub fn dispatch_selected_and_aligned(&mut self) -> Option<Option<Selection>> {
        if !core::mem::take(&mut self.aligned_pending) {
            return None;
        }
        Some(self.dispatched)
    }

    pub fn save(&self) -> SavedState {
        SavedState {
            position: self.position,
        }
    }

    pub fn restore(&mut self, state: SavedState) {
        self.clear();
        self.position = state.position;
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    fn at(position: usize) -> PivotState {
        let mut pivot = PivotState::new();
        pivot.update(position, 0);
        pivot
    }

    #[test]
    fn insert_before_shifts_the_selection() {
        let mut pivot = at(10);
        pivot.on_items_inserted(3, 4);
        pivot.on_items_inserted(20, 4);
        assert_eq!(pivot.pending_offset(), 4);
        assert!(pivot.on_layout_start(100));
        assert_eq!(pivot.position(), Some(14));
    }

    #[test]
    fn removing_before_pulls_the_selection_back() {
        let mut pivot = at(10);
        pivot.on_items_removed(0, 3);
        pivot.on_layout_start(100);
        assert_eq!(pivot.position(), Some(7));
    }

    #[test]
    fn removing_the_selection_freezes_it_at_the_boundary() {
        let mut pivot = at(10);
        pivot.on_items_removed(8, 5);
        assert!(pivot.is_pending_offset_disabled());
        assert!(pivot.is_selection_update_pending());
        // Ignored until the next pass.
        pivot.on_items_inserted(0, 10);
        pivot.on_layout_start(100);
        assert_eq!(pivot.position(), Some(8));
        assert!(!pivot.is_pending_offset_disabled());
    }

    #[test]
    fn moves_follow_the_selected_item() {
        let mut pivot = at(5);
        pivot.on_items_moved(5, 9, 1);
        pivot.on_layout_start(20);
        assert_eq!(pivot.position(), Some(9));

        let mut pivot = at(5);
        pivot.on_items_moved(2, 8, 1);
        pivot.on_layout_start(20);
        assert_eq!(pivot.position(), Some(4));

        let mut pivot = at(5);
        pivot.on_items_moved(8, 1, 1);
        pivot.on_layout_start(20);
        assert_eq!(pivot.position(), Some(6));
    }

    #[test]
    fn layout_start_clamps_and_defaults() {
        let mut pivot = PivotState::new();
        assert!(pivot.on_layout_start(5));
        assert_eq!(pivot.position(), Some(0));

        let mut pivot = at(9);
        pivot.on_layout_start(4);
        assert_eq!(pivot.position(), Some(3));

        pivot.on_layout_start(0);
        assert_eq!(pivot.position(), None);
    }

    #[test]
    fn dispatch_reports_each_change_once() {
        let mut pivot = at(2);
        let change = pivot.dispatch_selected();
        assert_eq!(
            change.map(|c| c.current),
            Some(Some(Selection {
                position: 2,
                sub_position: 0
            }))
        );
        assert_eq!(pivot.dispatch_selected(), None);
        assert!(pivot.dispatch_selected_and_aligned().is_some());
        assert_eq!(pivot.dispatch_selected_and_aligned(), None);

        // Same index after the selected item was removed still counts as a change.
        pivot.on_items_removed(2, 1);
        pivot.on_layout_start(10);
        assert_eq!(pivot.position(), Some(2));
        assert!(pivot.dispatch_selected().is_some());
    }

    #[test]
    fn resolved_position_stays_in_range() {
        // Deterministic LCG over random structural edits.
        let mut seed: u64 = 0x9e37_79b9_7f4a_7c15;
        let mut next = move |bound: usize| {
            seed = seed
                .wrapping_mul(6364136223846793005)
                .wrapping_add(1442695040888963407);
            ((seed >> 33) as usize) % bound.max(1)
        };
        let mut pivot = PivotState::new();
        let mut count = 50usize;
        for _ in 0..500 {
            match next(4) {
                0 => {
                    let n = next(5) + 1;
                    pivot.on_items_inserted(next(count + 1), n);
                    count += n;
                }
                1 if count > 0 => {
                    let p = next(count);
                    let n = (next(5) + 1).min(count - p);
                    pivot.on_items_removed(p, n);
                    count -= n;
                }
                2 if count > 1 => {
                    let from = next(count);
                    let to = next(count);
                    pivot.on_items_moved(from, to, 1);
                }
                _ => {
                    pivot.on_layout_start(count);
                    match pivot.position() {
                        Some(p) => assert!(p < count),
                        None => assert_eq!(count, 0),
                    }
                    if let Some(p) = pivot.position() {
                        pivot.update(next(count).max(p / 2), 0);
                    }
                }
            }
        }
    }
}
