/// Stable identity of an item, used to match scrapped children to positions across passes.
pub type ItemKey = u64;

#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum Orientation {
    #[default]
    Vertical,
    Horizontal,
}

/// The side of the layout a fill grows toward.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum FillDirection {
    Start,
    End,
}

impl FillDirection {
    pub fn opposite(self) -> Self {
        match self {
            Self::Start => Self::End,
            Self::End => Self::Start,
        }
    }
}

/// Traversal direction through the collection.
///
/// This is independent of [`FillDirection`]: in a reversed layout, filling toward the end of the
/// viewport walks the collection toward its head.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum ItemDirection {
    Head,
    Tail,
}

impl ItemDirection {
    pub fn step(self) -> isize {
        match self {
            Self::Head => -1,
            Self::Tail => 1,
        }
    }

    pub fn opposite(self) -> Self {
        match self {
            Self::Head => Self::Tail,
            Self::Tail => Self::Head,
        }
    }
}

#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Size {
    pub width: i32,
    pub height: i32,
}

impl Size {
    pub const fn new(width: i32, height: i32) -> Self {
        Self { width, height }
    }
}

/// Left/top/right/bottom amounts, used for viewport padding and item decorations.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Insets {
    pub left: i32,
    pub top: i32,
    pub right: i32,
    pub bottom: i32,
}

impl Insets {
    pub const ZERO: Self = Self {
        left: 0,
        top: 0,
        right: 0,
        bottom: 0,
    };

    pub const fn uniform(v: i32) -> Self {
        Self {
            left: v,
            top: v,
            right: v,
            bottom: v,
        }
    }
}

/// Placement rectangle handed to the [`crate::PlacementSink`], in viewport coordinates.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Bounds {
    pub left: i32,
    pub top: i32,
    pub right: i32,
    pub bottom: i32,
}

impl Bounds {
    pub fn width(&self) -> i32 {
        self.right - self.left
    }

    pub fn height(&self) -> i32 {
        self.bottom - self.top
    }
}

/// Constraints passed to [`crate::ItemProvider::measure`].
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct MeasureSpec {
    pub orientation: Orientation,
    /// Space available on the cross axis (span space times span size for grids).
    pub cross_space: i32,
}

/// The pixel span covered by materialized children, in viewport coordinates.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct LayoutWindow {
    pub start_offset: i32,
    pub end_offset: i32,
}

impl LayoutWindow {
    pub fn size(&self) -> i32 {
        self.end_offset - self.start_offset
    }
}

/// A selected item: collection position plus alignment sub-position.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Selection {
    pub position: usize,
    pub sub_position: usize,
}

/// Logical direction of a navigation request, already translated from device input.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum FocusDirection {
    Up,
    Down,
    Left,
    Right,
}

/// How in-row (cross-axis) focus movement behaves at the edge of a row.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum FocusableDirection {
    /// Stop at the row edge; non-focusable neighbours are not skipped.
    #[default]
    Standard,
    /// Continue into the adjacent row's far span.
    Continuous,
    /// Wrap to the opposite edge of the same row.
    Circular,
}

/// Whether a layout pass is the predictive pre-pass or the real one.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum LayoutPass {
    Predictive,
    #[default]
    Real,
}

/// A read-only view of a materialized child.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct ChildInfo {
    pub position: usize,
    pub key: ItemKey,
    /// Placed bounds (decorations excluded).
    pub bounds: Bounds,
    pub span_index: usize,
    pub span_size: usize,
}

/// Outcome of one smooth-scroll tick.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum ScrollTick {
    /// No smooth scroll in flight.
    Idle,
    /// Scrolled by `consumed` pixels; more ticks are needed.
    Scrolling { consumed: i32 },
    /// The target is aligned (or unreachable); the scroll is over.
    Settled { consumed: i32 },
}
