use pivot_layout::{
    AnchorRegion, ChildAlignment, Insets, ItemHandle, ItemKey, ItemProvider, MeasureSpec, Size,
};

use crate::{SharedViewPool, ViewPool, ViewType};

/// The host's data source, as seen by a [`PooledProvider`].
pub trait ItemSource {
    type View: ItemHandle;

    fn item_count(&self) -> usize;

    fn item_key(&self, position: usize) -> ItemKey {
        position as ItemKey
    }

    fn has_stable_keys(&self) -> bool {
        false
    }

    fn view_type(&self, _position: usize) -> ViewType {
        0
    }

    fn create_view(&mut self, view_type: ViewType) -> Self::View;

    /// Points a fresh or pooled view at the item at `position`.
    fn bind_view(&mut self, view: &mut Self::View, position: usize);

    fn measure(&mut self, view: &mut Self::View, spec: MeasureSpec) -> Size;

    fn decoration(&self, _view: &Self::View) -> Insets {
        Insets::ZERO
    }

    /// Called before a view goes back to the pool.
    fn unbind_view(&mut self, _view: &mut Self::View) {}

    fn is_focusable(&self, _position: usize) -> bool {
        true
    }
}

/// A view handed to the layout, tagged with its pool bucket.
#[derive(Debug)]
pub struct Pooled<V> {
    pub view_type: ViewType,
    pub view: V,
}

impl<V: ItemHandle> ItemHandle for Pooled<V> {
    fn on_selected(&mut self, sub_position: usize) {
        self.view.on_selected(sub_position);
    }

    fn on_deselected(&mut self) {
        self.view.on_deselected();
    }

    fn sub_position_alignments(&self) -> &[ChildAlignment] {
        self.view.sub_position_alignments()
    }

    fn baseline(&self) -> Option<i32> {
        self.view.baseline()
    }

    fn padding(&self) -> Insets {
        self.view.padding()
    }

    fn anchor(&self, id: u32) -> Option<AnchorRegion> {
        self.view.anchor(id)
    }

    fn is_removed(&self) -> bool {
        self.view.is_removed()
    }

    fn is_changed(&self) -> bool {
        self.view.is_changed()
    }
}

/// View traffic through a [`PooledProvider`].
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct PoolStats {
    pub created: usize,
    pub reused: usize,
    pub pooled: usize,
    pub dropped: usize,
}

/// An [`ItemProvider`] that creates views through an [`ItemSource`] and recycles them into a
/// (possibly shared) [`ViewPool`].
pub struct PooledProvider<S: ItemSource> {
    source: S,
    pool: SharedViewPool<S::View>,
    stats: PoolStats,
}

impl<S: ItemSource> PooledProvider<S> {
    pub fn new(source: S) -> Self {
        Self::with_pool(source, ViewPool::new().shared())
    }

    pub fn with_pool(source: S, pool: SharedViewPool<S::View>) -> Self {
        Self {
            source,
            pool,
            stats: PoolStats::default(),
        }
    }

    pub fn source(&self) -> &S {
        &self.source
    }

    pub fn source_mut(&mut self) -> &mut S {
        &mut self.source
    }

    pub fn pool(&self) -> &SharedViewPool<S::View> {
        &self.pool
    }

    pub fn stats(&self) -> PoolStats {
        self.stats
    }

    pub fn into_source(self) -> S {
        self.source
    }
}

impl<S: ItemSource> ItemProvider for PooledProvider<S> {
    type Handle = Pooled<S::View>;

    fn item_count(&self) -> usize {
        self.source.item_count()
    }

    fn item_key(&self, position: usize) -> ItemKey {
        self.source.item_key(position)
    }

    fn has_stable_keys(&self) -> bool {
        self.source.has_stable_keys()
    }

    fn get_view(&mut self, position: usize) -> Self::Handle {
        let view_type = self.source.view_type(position);
        let pooled = self.pool.borrow_mut().take(view_type);
        let mut view = match pooled {
            Some(view) => {
                self.stats.reused += 1;
                view
            }
            None => {
                self.stats.created += 1;
                self.source.create_view(view_type)
            }
        };
        self.source.bind_view(&mut view, position);
        Pooled { view_type, view }
    }

    fn measure(&mut self, handle: &mut Self::Handle, spec: MeasureSpec) -> Size {
        self.source.measure(&mut handle.view, spec)
    }

    fn decoration(&self, handle: &Self::Handle) -> Insets {
        self.source.decoration(&handle.view)
    }

    fn recycle(&mut self, handle: Self::Handle) {
        let Pooled { view_type, mut view } = handle;
        self.source.unbind_view(&mut view);
        if self.pool.borrow_mut().put(view_type, view).is_some() {
            self.stats.dropped += 1;
        } else {
            self.stats.pooled += 1;
        }
    }

    fn is_focusable(&self, position: usize) -> bool {
        self.source.is_focusable(position)
    }
}

impl<S: ItemSource + core::fmt::Debug> core::fmt::Debug for PooledProvider<S> {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        f.debug_struct("PooledProvider")
            .field("source", &self.source)
            .field("pooled", &self.pool.borrow().len())
            .field("stats", &self.stats)
            .finish_non_exhaustive()
    }
}
