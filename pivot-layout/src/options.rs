use alloc::sync::Arc;

use crate::{
    ChildAlignment, ConfigError, FocusNavigator, FocusableDirection, Orientation,
    ParentAlignment, Selection, SpanSizeLookup,
};

/// A callback fired with the current selection.
pub type SelectionCallback = Arc<dyn Fn(Option<Selection>) + Send + Sync>;

/// A callback fired at the end of every real layout pass.
pub type LayoutCompletedCallback = Arc<dyn Fn() + Send + Sync>;

/// Computes extra layout space for a pass or scroll.
pub type ExtraSpaceStrategy = Arc<dyn Fn(ExtraSpaceRequest) -> ExtraSpace + Send + Sync>;

/// Inputs to an [`ExtraSpaceStrategy`].
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct ExtraSpaceRequest {
    /// Main-axis space between the paddings.
    pub total_space: i32,
    /// Pending scroll in layout terms: positive toward the end, `0` when idle.
    pub scroll_delta: i32,
}

/// Space laid out beyond the viewport on each side, in pixels.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct ExtraSpace {
    pub start: i32,
    pub end: i32,
}

/// How much to lay out beyond the viewport.
#[derive(Clone, Default)]
pub enum ExtraLayoutSpace {
    /// One viewport of extra space on the side being scrolled toward; nothing while idle.
    #[default]
    Default,
    Custom(ExtraSpaceStrategy),
}

impl ExtraLayoutSpace {
    pub(crate) fn resolve(&self, request: ExtraSpaceRequest) -> ExtraSpace {
        match self {
            Self::Default => match request.scroll_delta.signum() {
                1 => ExtraSpace {
                    start: 0,
                    end: request.total_space,
                },
                -1 => ExtraSpace {
                    start: request.total_space,
                    end: 0,
                },
                _ => ExtraSpace::default(),
            },
            Self::Custom(f) => {
                let space = f(request);
                ExtraSpace {
                    start: space.start.max(0),
                    end: space.end.max(0),
                }
            }
        }
    }
}

impl core::fmt::Debug for ExtraLayoutSpace {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        match self {
            Self::Default => f.write_str("Default"),
            Self::Custom(_) => f.write_str("Custom(..)"),
        }
    }
}

/// Configuration for [`crate::PivotLayout`].
///
/// Everything is validated when set; see [`LayoutOptions::validate`].
#[derive(Clone)]
pub struct LayoutOptions {
    pub orientation: Orientation,
    /// Items per row on the cross axis. `1` is a plain list.
    pub span_count: usize,
    /// Spans taken by the item at a position. `None` means one span per item.
    pub span_size: Option<SpanSizeLookup>,
    /// Lay the collection out from the end of the viewport toward its start.
    pub reverse_layout: bool,
    /// Gap between consecutive rows.
    pub item_spacing: i32,

    pub parent_alignment: ParentAlignment,
    /// Used for items that do not provide their own sub-position alignments.
    pub child_alignment: ChildAlignment,

    pub focusable_direction: FocusableDirection,
    pub focus_out_front: bool,
    pub focus_out_back: bool,
    pub focus_out_side_front: bool,
    pub focus_out_side_back: bool,

    /// Focus moves scroll smoothly instead of jumping.
    pub smooth_focus_changes: bool,
    /// Largest delta applied by a single [`crate::PivotLayout::tick`].
    pub smooth_scroll_step: u32,
    pub extra_layout_space: ExtraLayoutSpace,

    pub on_selection_changed: Option<SelectionCallback>,
    pub on_selection_aligned: Option<SelectionCallback>,
    pub on_layout_completed: Option<LayoutCompletedCallback>,
}

impl Default for LayoutOptions {
    fn default() -> Self {
        Self {
            orientation: Orientation::Vertical,
            span_count: 1,
            span_size: None,
            reverse_layout: false,
            item_spacing: 0,
            parent_alignment: ParentAlignment::default(),
            child_alignment: ChildAlignment::default(),
            focusable_direction: FocusableDirection::Standard,
            focus_out_front: false,
            focus_out_back: false,
            focus_out_side_front: true,
            focus_out_side_back: true,
            smooth_focus_changes: true,
            smooth_scroll_step: 64,
            extra_layout_space: ExtraLayoutSpace::Default,
            on_selection_changed: None,
            on_selection_aligned: None,
            on_layout_completed: None,
        }
    }
}

impl LayoutOptions {
    pub fn new() -> Self {
        Self::default()
    }

    /// A grid with `span_count` spans per row.
    pub fn grid(span_count: usize) -> Self {
        Self {
            span_count,
            ..Self::default()
        }
    }

    pub fn validate(&self) -> Result<(), ConfigError> {
        self.parent_alignment.validate()?;
        self.child_alignment.validate()?;
        if self.span_count == 0 {
            return Err(ConfigError::ZeroSpanCount);
        }
        if self.smooth_scroll_step == 0 {
            return Err(ConfigError::ZeroScrollStep);
        }
        Ok(())
    }

    pub(crate) fn navigator(&self) -> FocusNavigator {
        FocusNavigator {
            focusable_direction: self.focusable_direction,
            focus_out_front: self.focus_out_front,
            focus_out_back: self.focus_out_back,
            focus_out_side_front: self.focus_out_side_front,
            focus_out_side_back: self.focus_out_side_back,
        }
    }

    pub fn with_orientation(mut self, orientation: Orientation) -> Self {
        self.orientation = orientation;
        self
    }

    pub fn with_span_count(mut self, span_count: usize) -> Self {
        self.span_count = span_count;
        self
    }

    pub fn with_span_size(
        mut self,
        f: impl Fn(usize) -> usize + Send + Sync + 'static,
    ) -> Self {
        self.span_size = Some(Arc::new(f));
        self
    }

    pub fn with_reverse_layout(mut self, reverse_layout: bool) -> Self {
        self.reverse_layout = reverse_layout;
        self
    }

    pub fn with_item_spacing(mut self, item_spacing: i32) -> Self {
        self.item_spacing = item_spacing;
        self
    }

    pub fn with_parent_alignment(mut self, parent_alignment: ParentAlignment) -> Self {
        self.parent_alignment = parent_alignment;
        self
    }

    pub fn with_child_alignment(mut self, child_alignment: ChildAlignment) -> Self {
        self.child_alignment = child_alignment;
        self
    }

    pub fn with_focusable_direction(mut self, focusable_direction: FocusableDirection) -> Self {
        self.focusable_direction = focusable_direction;
        self
    }

    /// Whether focus may leave past the first/last row.
    pub fn with_focus_out(mut self, front: bool, back: bool) -> Self {
        self.focus_out_front = front;
        self.focus_out_back = back;
        self
    }

    /// Whether focus may leave past a row's first/last span.
    pub fn with_focus_out_side(mut self, front: bool, back: bool) -> Self {
        self.focus_out_side_front = front;
        self.focus_out_side_back = back;
        self
    }

    pub fn with_smooth_focus_changes(mut self, smooth: bool) -> Self {
        self.smooth_focus_changes = smooth;
        self
    }

    pub fn with_smooth_scroll_step(mut self, step: u32) -> Self {
        self.smooth_scroll_step = step;
        self
    }

    pub fn with_extra_layout_space(
        mut self,
        f: impl Fn(ExtraSpaceRequest) -> ExtraSpace + Send + Sync + 'static,
    ) -> Self {
        self.extra_layout_space = ExtraLayoutSpace::Custom(Arc::new(f));
        self
    }

    pub fn with_on_selection_changed(
        mut self,
        f: impl Fn(Option<Selection>) + Send + Sync + 'static,
    ) -> Self {
        self.on_selection_changed = Some(Arc::new(f));
        self
    }

    pub fn with_on_selection_aligned(
        mut self,
        f: impl Fn(Option<Selection>) + Send + Sync + 'static,
    ) -> Self {
        self.on_selection_aligned = Some(Arc::new(f));
        self
    }

    pub fn with_on_layout_completed(mut self, f: impl Fn() + Send + Sync + 'static) -> Self {
        self.on_layout_completed = Some(Arc::new(f));
        self
    }
}

impl core::fmt::Debug for LayoutOptions {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        f.debug_struct("LayoutOptions")
            .field("orientation", &self.orientation)
            .field("span_count", &self.span_count)
            .field("span_size", &self.span_size.is_some())
            .field("reverse_layout", &self.reverse_layout)
            .field("item_spacing", &self.item_spacing)
            .field("parent_alignment", &self.parent_alignment)
            .field("child_alignment", &self.child_alignment)
            .field("focusable_direction", &self.focusable_direction)
            .field("smooth_focus_changes", &self.smooth_focus_changes)
            .field("smooth_scroll_step", &self.smooth_scroll_step)
            .field("extra_layout_space", &self.extra_layout_space)
            .finish_non_exhaustive()
    }
}
