#[cfg(not(feature = "std"))]
use alloc::collections::BTreeMap;
#[cfg(feature = "std")]
use std::collections::HashMap;

use crate::ItemKey;
use crate::fill::LayoutChild;

#[cfg(feature = "std")]
type ScrapMap<H> = HashMap<ItemKey, LayoutChild<H>>;
#[cfg(not(feature = "std"))]
type ScrapMap<H> = BTreeMap<ItemKey, LayoutChild<H>>;

/// Children detached at the start of a layout pass, keyed by item identity.
///
/// A pass takes children back out by key before asking the provider for new views. Whatever is
/// left when a real pass ends goes back to the provider; a predictive pass leaves the arena for
/// the real pass that follows it.
pub(crate) struct ScrapArena<H> {
    map: ScrapMap<H>,
}

impl<H> ScrapArena<H> {
    pub(crate) fn new() -> Self {
        Self {
            map: ScrapMap::new(),
        }
    }

    pub(crate) fn len(&self) -> usize {
        self.map.len()
    }

    pub(crate) fn is_empty(&self) -> bool {
        self.map.is_empty()
    }

    /// Stores a child; returns a previous child with the same key, if any.
    pub(crate) fn insert(&mut self, child: LayoutChild<H>) -> Option<LayoutChild<H>> {
        self.map.insert(child.key, child)
    }

    pub(crate) fn take(&mut self, key: ItemKey) -> Option<LayoutChild<H>> {
        self.map.remove(&key)
    }

    pub(crate) fn drain(&mut self) -> impl Iterator<Item = LayoutChild<H>> + use<H> {
        core::mem::take(&mut self.map).into_values()
    }
}
