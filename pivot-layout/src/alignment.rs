use crate::error::{ConfigError, check_ratio};

/// Which collection edges are pinned to the viewport padding instead of the keyline.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum Edge {
    /// Always align to the keyline.
    None,
    /// Pin the first item to its natural position.
    Min,
    /// Pin the last item to its natural position.
    Max,
    #[default]
    MinMax,
}

impl Edge {
    pub fn has_min(self) -> bool {
        matches!(self, Self::Min | Self::MinMax)
    }

    pub fn has_max(self) -> bool {
        matches!(self, Self::Max | Self::MinMax)
    }
}

/// Where the keyline sits inside the viewport, and how the collection edges interact with it.
#[derive(Clone, Copy, Debug, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct ParentAlignment {
    pub edge: Edge,
    /// Fixed offset from the layout start. Negative values are measured from the end.
    pub offset: i32,
    pub offset_ratio: f32,
    pub offset_ratio_enabled: bool,
    pub prefer_keyline_over_min_edge: bool,
    pub prefer_keyline_over_max_edge: bool,
}

impl Default for ParentAlignment {
    fn default() -> Self {
        Self {
            edge: Edge::MinMax,
            offset: 0,
            offset_ratio: 0.5,
            offset_ratio_enabled: true,
            prefer_keyline_over_min_edge: false,
            prefer_keyline_over_max_edge: true,
        }
    }
}

impl ParentAlignment {
    pub fn new(edge: Edge) -> Self {
        Self {
            edge,
            ..Self::default()
        }
    }

    pub fn with_offset(mut self, offset: i32) -> Self {
        self.offset = offset;
        self
    }

    pub fn with_offset_ratio(mut self, ratio: f32) -> Self {
        self.offset_ratio = ratio;
        self.offset_ratio_enabled = true;
        self
    }

    pub fn without_offset_ratio(mut self) -> Self {
        self.offset_ratio_enabled = false;
        self
    }

    pub fn with_prefer_keyline(mut self, over_min_edge: bool, over_max_edge: bool) -> Self {
        self.prefer_keyline_over_min_edge = over_min_edge;
        self.prefer_keyline_over_max_edge = over_max_edge;
        self
    }

    pub fn validate(&self) -> Result<(), ConfigError> {
        check_ratio("parent offset_ratio", self.offset_ratio)
    }
}

/// Where the keyline sits inside a child.
#[derive(Clone, Copy, Debug, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct ChildAlignment {
    pub offset: i32,
    pub offset_ratio: f32,
    pub offset_ratio_enabled: bool,
    /// Measure inside the child's own padding ([`crate::ItemHandle::padding`]).
    pub include_padding: bool,
    /// Use the child's baseline ([`crate::ItemHandle::baseline`]) instead of the ratio.
    pub align_to_baseline: bool,
    /// Align to a sub-region of the child ([`crate::ItemHandle::anchor`]) instead of the whole
    /// child.
    pub anchor: Option<u32>,
}

impl Default for ChildAlignment {
    fn default() -> Self {
        Self {
            offset: 0,
            offset_ratio: 0.5,
            offset_ratio_enabled: true,
            include_padding: false,
            align_to_baseline: false,
            anchor: None,
        }
    }
}

impl ChildAlignment {
    pub fn new(offset: i32, offset_ratio: f32) -> Self {
        Self {
            offset,
            offset_ratio,
            ..Self::default()
        }
    }

    pub fn with_include_padding(mut self, include_padding: bool) -> Self {
        self.include_padding = include_padding;
        self
    }

    pub fn with_align_to_baseline(mut self, align_to_baseline: bool) -> Self {
        self.align_to_baseline = align_to_baseline;
        self
    }

    pub fn with_anchor(mut self, anchor: Option<u32>) -> Self {
        self.anchor = anchor;
        self
    }

    pub fn without_offset_ratio(mut self) -> Self {
        self.offset_ratio_enabled = false;
        self
    }

    pub fn validate(&self) -> Result<(), ConfigError> {
        check_ratio("child offset_ratio", self.offset_ratio)
    }

    /// Resolves the keyline of a child on the main axis, in viewport coordinates.
    pub fn keyline(&self, extent: ChildExtent, reverse: bool) -> i32 {
        let mut start = extent.start;
        let mut size = extent.size;
        if self.include_padding {
            start += extent.padding_start;
            size = (size - extent.padding_start - extent.padding_end).max(0);
        }

        if let (true, Some(baseline)) = (self.align_to_baseline, extent.baseline) {
            let line = extent.start + baseline;
            return if reverse {
                line - self.offset
            } else {
                line + self.offset
            };
        }

        let ratio = if self.offset_ratio_enabled {
            (size as f32 * self.offset_ratio) as i32
        } else {
            0
        };
        if reverse {
            start + size - self.offset - ratio
        } else {
            start + self.offset + ratio
        }
    }
}

/// Main-axis facts about a placed child (or one of its anchors).
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct ChildExtent {
    pub start: i32,
    pub size: i32,
    pub padding_start: i32,
    pub padding_end: i32,
    /// Baseline distance from `start`.
    pub baseline: Option<i32>,
}

/// A materialized collection edge: its outer layout edge and the keyline of its item.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub(crate) struct EdgeItem {
    pub(crate) edge: i32,
    pub(crate) keyline: i32,
}

/// Turns keyline configuration into scroll deltas, and tracks how far the layout may scroll.
///
/// All values are relative to the current viewport: a delta of `0` means "stay", positive deltas
/// move content toward the layout start.
#[derive(Clone, Debug, Default)]
pub struct AlignmentCalculator {
    parent: ParentAlignment,
    reverse: bool,
    size: i32,
    padding_low: i32,
    padding_high: i32,
    low_edge: Option<i32>,
    high_edge: Option<i32>,
    min_scroll: Option<i32>,
    max_scroll: Option<i32>,
}

impl AlignmentCalculator {
    pub fn new(parent: ParentAlignment) -> Self {
        Self {
            parent,
            ..Self::default()
        }
    }

    pub fn parent_alignment(&self) -> &ParentAlignment {
        &self.parent
    }

    pub fn set_parent_alignment(&mut self, parent: ParentAlignment) {
        self.parent = parent;
    }

    /// `size` is the full main-axis viewport extent; paddings are in layout (not collection)
    /// order.
    pub fn update_viewport(
        &mut self,
        size: i32,
        padding_low: i32,
        padding_high: i32,
        reverse: bool,
    ) {
        self.size = size;
        self.padding_low = padding_low;
        self.padding_high = padding_high;
        self.reverse = reverse;
    }

    pub fn keyline(&self) -> i32 {
        let p = &self.parent;
        let ratio = if p.offset_ratio_enabled {
            (self.size as f32 * p.offset_ratio) as i32
        } else {
            0
        };
        if self.reverse {
            let base = if p.offset >= 0 {
                self.size - p.offset
            } else {
                -p.offset
            };
            base - ratio
        } else {
            let base = if p.offset >= 0 {
                p.offset
            } else {
                self.size + p.offset
            };
            base + ratio
        }
    }

    fn low_edge_pinned(&self) -> bool {
        if self.reverse {
            self.parent.edge.has_max()
        } else {
            self.parent.edge.has_min()
        }
    }

    fn high_edge_pinned(&self) -> bool {
        if self.reverse {
            self.parent.edge.has_min()
        } else {
            self.parent.edge.has_max()
        }
    }

    pub fn min_scroll(&self) -> Option<i32> {
        self.min_scroll
    }

    pub fn max_scroll(&self) -> Option<i32> {
        self.max_scroll
    }

    pub fn clear_limits(&mut self) {
        self.low_edge = None;
        self.high_edge = None;
        self.min_scroll = None;
        self.max_scroll = None;
    }

    /// Recomputes scroll limits from the materialized collection edges.
    ///
    /// `low`/`high` are the items at the low/high layout edges, when they are materialized (the
    /// first collection item is at the low edge unless the layout is reversed).
    pub(crate) fn update_limits(&mut self, low: Option<EdgeItem>, high: Option<EdgeItem>) {
        let keyline = self.keyline();
        self.low_edge = low.map(|l| l.edge);
        self.high_edge = high.map(|h| h.edge);

        self.min_scroll = low.map(|l| {
            if self.low_edge_pinned() {
                l.edge - self.padding_low
            } else {
                l.keyline - keyline
            }
        });
        self.max_scroll = high.map(|h| {
            if self.high_edge_pinned() {
                h.edge - (self.size - self.padding_high)
            } else {
                h.keyline - keyline
            }
        });

        let (Some(low), Some(high), Some(mut min), Some(mut max)) =
            (low, high, self.min_scroll, self.max_scroll)
        else {
            return;
        };

        let (prefer_low, prefer_high) = if self.reverse {
            (
                self.parent.prefer_keyline_over_max_edge,
                self.parent.prefer_keyline_over_min_edge,
            )
        } else {
            (
                self.parent.prefer_keyline_over_min_edge,
                self.parent.prefer_keyline_over_max_edge,
            )
        };
        if self.low_edge_pinned() && prefer_low {
            min = min.min(high.keyline - keyline);
        }
        if self.high_edge_pinned() && prefer_high {
            max = max.max(low.keyline - keyline);
        }

        // Crossed limits resolve toward the pinned edge; with both pinned, toward the first item.
        let edge = self.parent.edge;
        let low_wins = if self.reverse {
            edge == Edge::Max
        } else {
            edge.has_min()
        };
        if low_wins {
            max = max.max(min);
        } else if edge != Edge::None {
            min = min.min(max);
        }

        self.min_scroll = Some(min);
        self.max_scroll = Some(max);
    }

    /// Returns the scroll delta that puts `child_keyline` where the parent alignment wants it.
    pub fn scroll_offset_for_alignment(&self, child_keyline: i32) -> i32 {
        let keyline = self.keyline();

        if let Some(low_edge) = self.low_edge.filter(|_| self.low_edge_pinned()) {
            if child_keyline - low_edge <= keyline - self.padding_low {
                let align = low_edge - self.padding_low;
                return match self.max_scroll {
                    Some(max) => align.min(max),
                    None => align,
                };
            }
        }

        if let Some(high_edge) = self.high_edge.filter(|_| self.high_edge_pinned()) {
            if high_edge - child_keyline <= self.size - keyline - self.padding_high {
                let align = high_edge - (self.size - self.padding_high);
                return match self.min_scroll {
                    Some(min) => align.max(min),
                    None => align,
                };
            }
        }

        child_keyline - keyline
    }

    /// Clamps a requested delta to the current scroll limits. Unknown limits are unbounded.
    pub fn clamp(&self, delta: i32) -> i32 {
        let mut d = delta;
        if let Some(max) = self.max_scroll {
            d = d.min(max);
        }
        if let Some(min) = self.min_scroll {
            d = d.max(min);
        }
        d
    }
}
