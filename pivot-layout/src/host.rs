use crate::{Bounds, ChildAlignment, Insets, ItemKey, MeasureSpec, Size};

/// A main-axis region inside an item, relative to the item's start edge.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct AnchorRegion {
    pub offset: i32,
    pub size: i32,
}

/// Capabilities of a view handle produced by an [`ItemProvider`].
///
/// Every method has a no-op default, so plain handles only need an empty `impl`.
pub trait ItemHandle {
    /// The item became the selection, at `sub_position`.
    fn on_selected(&mut self, _sub_position: usize) {}

    /// The item stopped being the selection.
    fn on_deselected(&mut self) {}

    /// Alignment per sub-position. An empty slice means the item has a single sub-position that
    /// uses the layout's child alignment.
    fn sub_position_alignments(&self) -> &[ChildAlignment] {
        &[]
    }

    /// Baseline offset from the item's start edge, used by baseline child alignment.
    fn baseline(&self) -> Option<i32> {
        None
    }

    /// Inner padding, used by child alignments that include padding.
    fn padding(&self) -> Insets {
        Insets::ZERO
    }

    /// The region of a nested anchor view, when the item has one with that id.
    fn anchor(&self, _id: u32) -> Option<AnchorRegion> {
        None
    }

    /// The item is being removed (only meaningful during a predictive pass).
    fn is_removed(&self) -> bool {
        false
    }

    /// The item's content changed (only meaningful during a predictive pass).
    fn is_changed(&self) -> bool {
        false
    }
}

/// Host-side source of views.
///
/// The layout owns a handle from [`ItemProvider::get_view`] until it gives it back through
/// [`ItemProvider::recycle`]; the provider must not reuse it in between.
pub trait ItemProvider {
    type Handle: ItemHandle;

    fn item_count(&self) -> usize;

    /// Identity of the item at `position`. Defaults to the position itself.
    fn item_key(&self, position: usize) -> ItemKey {
        position as ItemKey
    }

    /// Whether [`ItemProvider::item_key`] survives structural changes. When it does not, a
    /// layout pass after an insert/remove/move recycles every child instead of reusing them.
    fn has_stable_keys(&self) -> bool {
        false
    }

    fn get_view(&mut self, position: usize) -> Self::Handle;

    /// Measures a handle against the cross-axis constraint in `spec`. Sizes exclude decorations.
    fn measure(&mut self, handle: &mut Self::Handle, spec: MeasureSpec) -> Size;

    /// Space reserved around the item, outside its measured size.
    fn decoration(&self, _handle: &Self::Handle) -> Insets {
        Insets::ZERO
    }

    fn recycle(&mut self, handle: Self::Handle);

    fn is_focusable(&self, _position: usize) -> bool {
        true
    }
}

/// Receives the bounds of every placed or moved child.
pub trait PlacementSink<H> {
    fn place(&mut self, handle: &H, bounds: Bounds);
}

impl<H, F> PlacementSink<H> for F
where
    F: FnMut(&H, Bounds),
{
    fn place(&mut self, handle: &H, bounds: Bounds) {
        self(handle, bounds)
    }
}
