use alloc::vec::Vec;

/// Span bookkeeping for one row of a grid.
///
/// A row spans the cross axis and is divided into `span_count` equal spans. Items occupy a
/// contiguous range of spans; the row height is the tallest item across the occupied spans.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct GridRow {
    span_count: usize,
    width: i32,
    start_index: Option<usize>,
    end_index: Option<usize>,
    top: i32,
    height: i32,
    span_heights: Vec<i32>,
}

impl GridRow {
    /// `width` is the cross-axis space shared by all spans.
    pub fn new(span_count: usize, width: i32) -> Self {
        let span_count = span_count.max(1);
        Self {
            span_count,
            width,
            start_index: None,
            end_index: None,
            top: 0,
            height: 0,
            span_heights: alloc::vec![0; span_count],
        }
    }

    pub fn span_count(&self) -> usize {
        self.span_count
    }

    pub fn width(&self) -> i32 {
        self.width
    }

    /// Resizes the row for a new span configuration and clears it.
    pub fn configure(&mut self, span_count: usize, width: i32) {
        let span_count = span_count.max(1);
        self.span_count = span_count;
        self.width = width;
        self.span_heights.clear();
        self.span_heights.resize(span_count, 0);
        self.reset(0);
    }

    pub fn span_space(&self) -> i32 {
        self.width / self.span_count as i32
    }

    pub fn start_index(&self) -> Option<usize> {
        self.start_index
    }

    pub fn end_index(&self) -> Option<usize> {
        self.end_index
    }

    pub fn top(&self) -> i32 {
        self.top
    }

    pub fn set_top(&mut self, top: i32) {
        self.top = top;
    }

    pub fn height(&self) -> i32 {
        self.height
    }

    pub fn bottom(&self) -> i32 {
        self.top + self.height
    }

    pub fn is_empty(&self) -> bool {
        self.start_index.is_none()
    }

    /// Cross-axis offset of the first occupied span.
    pub fn start_offset(&self) -> i32 {
        self.start_index
            .map_or(0, |i| i as i32 * self.span_space())
    }

    /// Cross-axis offset just past the last occupied span.
    pub fn end_offset(&self) -> i32 {
        self.end_index
            .map_or(0, |i| (i as i32 + 1) * self.span_space())
    }

    pub fn span_height(&self, span_index: usize) -> i32 {
        self.span_heights.get(span_index).copied().unwrap_or(0)
    }

    pub fn reset(&mut self, top: i32) {
        self.start_index = None;
        self.end_index = None;
        self.top = top;
        self.height = 0;
        self.span_heights.iter_mut().for_each(|h| *h = 0);
    }

    /// Starts the row with a single item at `span_index`.
    pub fn init(&mut self, top: i32, view_size: i32, span_index: usize, span_size: usize) {
        self.reset(top);
        let span_size = span_size.clamp(1, self.span_count);
        let span_index = span_index.min(self.span_count - span_size);
        self.start_index = Some(span_index);
        self.end_index = Some(span_index + span_size - 1);
        self.occupy(span_index, span_size, view_size);
    }

    /// Copies the full state of `other`.
    pub fn init_from(&mut self, other: &GridRow) {
        self.span_count = other.span_count;
        self.width = other.width;
        self.start_index = other.start_index;
        self.end_index = other.end_index;
        self.top = other.top;
        self.height = other.height;
        self.span_heights.clone_from(&other.span_heights);
    }

    /// Whether an item of `span_size` still fits after the last occupied span.
    pub fn fits_end(&self, span_size: usize) -> bool {
        match self.end_index {
            None => true,
            Some(end) => end + span_size < self.span_count,
        }
    }

    /// Whether an item of `span_size` still fits before the first occupied span.
    pub fn fits_start(&self, span_size: usize) -> bool {
        match self.start_index {
            None => false,
            Some(start) => start >= span_size,
        }
    }

    /// Adds an item after the occupied spans and returns its cross-axis offset.
    pub fn append(&mut self, view_size: i32, span_size: usize) -> i32 {
        let span_size = span_size.clamp(1, self.span_count);
        let first = match self.end_index {
            None => 0,
            Some(end) => end + 1,
        };
        debug_assert!(
            first + span_size <= self.span_count,
            "GridRow::append overflow (first={first}, span_size={span_size})"
        );
        if self.start_index.is_none() {
            self.start_index = Some(first);
        }
        self.end_index = Some(first + span_size - 1);
        self.occupy(first, span_size, view_size);
        first as i32 * self.span_space()
    }

    /// Adds an item before the occupied spans and returns its cross-axis offset.
    pub fn prepend(&mut self, view_size: i32, span_size: usize) -> i32 {
        let span_size = span_size.clamp(1, self.span_count);
        let first = match self.start_index {
            None => self.span_count - span_size,
            Some(start) => start.saturating_sub(span_size),
        };
        if self.end_index.is_none() {
            self.end_index = Some(first + span_size - 1);
        }
        self.start_index = Some(first);
        self.occupy(first, span_size, view_size);
        first as i32 * self.span_space()
    }

    fn occupy(&mut self, first: usize, span_size: usize, view_size: i32) {
        let last = (first + span_size).min(self.span_count);
        for h in &mut self.span_heights[first..last] {
            *h = view_size;
        }
        self.recompute_height();
    }

    fn recompute_height(&mut self) {
        self.height = match (self.start_index, self.end_index) {
            (Some(start), Some(end)) => self.span_heights[start..=end]
                .iter()
                .copied()
                .max()
                .unwrap_or(0),
            _ => 0,
        };
    }
}
