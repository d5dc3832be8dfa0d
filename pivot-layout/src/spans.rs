use alloc::sync::Arc;
use alloc::vec::Vec;

/// Returns how many spans the item at a position occupies.
pub type SpanSizeLookup = Arc<dyn Fn(usize) -> usize + Send + Sync>;

/// Where an item sits in the grid.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct SpanInfo {
    pub span_index: usize,
    pub span_size: usize,
    pub row: usize,
}

/// Position → (span, row) mapping.
///
/// Rows are packed greedily from position 0: an item wraps to a new row exactly when it does not
/// fit after the previous item (the same rule as [`crate::GridRow::fits_end`]). Uniform spans are
/// computed arithmetically; custom span sizes are computed lazily and cached until invalidated.
#[derive(Clone, Default)]
pub(crate) struct SpanCache {
    span_count: usize,
    item_count: usize,
    lookup: Option<SpanSizeLookup>,
    infos: Vec<SpanInfo>,
}

impl SpanCache {
    pub(crate) fn new(span_count: usize, lookup: Option<SpanSizeLookup>) -> Self {
        Self {
            span_count: span_count.max(1),
            item_count: 0,
            lookup,
            infos: Vec::new(),
        }
    }

    pub(crate) fn configure(&mut self, span_count: usize, lookup: Option<SpanSizeLookup>) {
        self.span_count = span_count.max(1);
        self.lookup = lookup;
        self.invalidate();
    }

    pub(crate) fn span_count(&self) -> usize {
        self.span_count
    }

    pub(crate) fn item_count(&self) -> usize {
        self.item_count
    }

    pub(crate) fn set_item_count(&mut self, item_count: usize) {
        if self.item_count != item_count {
            self.item_count = item_count;
            self.invalidate();
        }
    }

    pub(crate) fn invalidate(&mut self) {
        self.infos.clear();
    }

    fn is_uniform(&self) -> bool {
        self.lookup.is_none() || self.span_count == 1
    }

    fn span_size(&self, position: usize) -> usize {
        match &self.lookup {
            Some(f) => f(position).clamp(1, self.span_count),
            None => 1,
        }
    }

    fn extend_to(&mut self, position: usize) {
        while self.infos.len() <= position {
            let next = self.infos.len();
            let size = self.span_size(next);
            let info = match self.infos.last() {
                None => SpanInfo {
                    span_index: 0,
                    span_size: size,
                    row: 0,
                },
                Some(prev) => {
                    let index = prev.span_index + prev.span_size;
                    if index + size <= self.span_count {
                        SpanInfo {
                            span_index: index,
                            span_size: size,
                            row: prev.row,
                        }
                    } else {
                        SpanInfo {
                            span_index: 0,
                            span_size: size,
                            row: prev.row + 1,
                        }
                    }
                }
            };
            self.infos.push(info);
        }
    }

    pub(crate) fn info(&mut self, position: usize) -> SpanInfo {
        if self.is_uniform() {
            return SpanInfo {
                span_index: position % self.span_count,
                span_size: 1,
                row: position / self.span_count,
            };
        }
        self.extend_to(position);
        self.infos[position]
    }

    pub(crate) fn row(&mut self, position: usize) -> usize {
        self.info(position).row
    }

    /// First position of the row containing `position`.
    pub(crate) fn row_start(&mut self, position: usize) -> usize {
        if self.is_uniform() {
            return position - position % self.span_count;
        }
        let row = self.row(position);
        self.infos[..=position].partition_point(|i| i.row < row)
    }

    /// Last position of the row containing `position`.
    pub(crate) fn row_end(&mut self, position: usize) -> usize {
        let last = self.item_count.saturating_sub(1);
        if self.is_uniform() {
            let start = self.row_start(position);
            return (start + self.span_count - 1).min(last).max(position);
        }
        let row = self.row(position);
        let mut p = position;
        while p < last && self.row(p + 1) == row {
            p += 1;
        }
        p
    }

    /// First position of `row`, if the collection has that many rows.
    pub(crate) fn first_in_row(&mut self, row: usize) -> Option<usize> {
        if self.item_count == 0 {
            return None;
        }
        if self.is_uniform() {
            let p = row.checked_mul(self.span_count)?;
            return (p < self.item_count).then_some(p);
        }
        let last = self.item_count - 1;
        // Rows hold at least one item, so `row` starts no later than position `row`.
        let upper = row.min(last);
        self.extend_to(upper);
        while self.infos.last().is_some_and(|i| i.row < row) && self.infos.len() <= last {
            let next = self.infos.len();
            self.extend_to(next);
        }
        let p = self.infos.partition_point(|i| i.row < row);
        (p < self.item_count && self.infos.get(p).is_some_and(|i| i.row == row)).then_some(p)
    }

    /// The item in `row` whose span range covers `span_index`, or the row's last item when the
    /// row is shorter.
    pub(crate) fn item_at_span(&mut self, row: usize, span_index: usize) -> Option<usize> {
        let first = self.first_in_row(row)?;
        let mut p = first;
        loop {
            let info = self.info(p);
            if info.span_index <= span_index && span_index < info.span_index + info.span_size {
                return Some(p);
            }
            if p + 1 >= self.item_count || self.row(p + 1) != row {
                return Some(p);
            }
            p += 1;
        }
    }
}

impl core::fmt::Debug for SpanCache {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        f.debug_struct("SpanCache")
            .field("span_count", &self.span_count)
            .field("item_count", &self.item_count)
            .field("custom", &self.lookup.is_some())
            .field("cached", &self.infos.len())
            .finish()
    }
}
