use alloc::rc::Rc;
use alloc::vec::Vec;
use core::cell::RefCell;

#[cfg(not(feature = "std"))]
use alloc::collections::BTreeMap;
#[cfg(feature = "std")]
use std::collections::HashMap;

/// Host-defined kind of view; views are only reused for items of the same type.
pub type ViewType = u32;

/// A pool shared by several layouts (nested rows of a browse screen, for example).
pub type SharedViewPool<T> = Rc<RefCell<ViewPool<T>>>;

#[cfg(feature = "std")]
type Buckets<T> = HashMap<ViewType, Bucket<T>>;
#[cfg(not(feature = "std"))]
type Buckets<T> = BTreeMap<ViewType, Bucket<T>>;

#[derive(Debug)]
struct Bucket<T> {
    views: Vec<T>,
    max: usize,
}

/// Recycled views grouped by [`ViewType`], with a per-type cap.
#[derive(Debug)]
pub struct ViewPool<T> {
    buckets: Buckets<T>,
    default_max: usize,
}

impl<T> Default for ViewPool<T> {
    fn default() -> Self {
        Self::new()
    }
}

impl<T> ViewPool<T> {
    /// Holds up to five views per type unless told otherwise.
    pub const DEFAULT_MAX_PER_TYPE: usize = 5;

    pub fn new() -> Self {
        Self::with_max_per_type(Self::DEFAULT_MAX_PER_TYPE)
    }

    pub fn with_max_per_type(max: usize) -> Self {
        Self {
            buckets: Buckets::default(),
            default_max: max,
        }
    }

    pub fn shared(self) -> SharedViewPool<T> {
        Rc::new(RefCell::new(self))
    }

    /// Sets the cap for one type, dropping pooled views above it.
    pub fn set_max_recycled(&mut self, view_type: ViewType, max: usize) {
        let default_max = self.default_max;
        let bucket = self.bucket(view_type, default_max);
        bucket.max = max;
        bucket.views.truncate(max);
    }

    /// Pools `view`. Returns it back when the type is at its cap.
    pub fn put(&mut self, view_type: ViewType, view: T) -> Option<T> {
        let default_max = self.default_max;
        let bucket = self.bucket(view_type, default_max);
        if bucket.views.len() >= bucket.max {
            return Some(view);
        }
        bucket.views.push(view);
        None
    }

    pub fn take(&mut self, view_type: ViewType) -> Option<T> {
        self.buckets.get_mut(&view_type)?.views.pop()
    }

    pub fn count(&self, view_type: ViewType) -> usize {
        self.buckets.get(&view_type).map_or(0, |b| b.views.len())
    }

    pub fn len(&self) -> usize {
        self.buckets.values().map(|b| b.views.len()).sum()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    pub fn clear(&mut self) {
        for bucket in self.buckets.values_mut() {
            bucket.views.clear();
        }
    }

    fn bucket(&mut self, view_type: ViewType, default_max: usize) -> &mut Bucket<T> {
        self.buckets.entry(view_type).or_insert_with(|| Bucket {
            views: Vec::new(),
            max: default_max,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn views_are_pooled_per_type_up_to_the_cap() {
        let mut pool = ViewPool::with_max_per_type(2);
        assert_eq!(pool.put(0, "a"), None);
        assert_eq!(pool.put(0, "b"), None);
        assert_eq!(pool.put(0, "c"), Some("c"));
        assert_eq!(pool.put(1, "x"), None);
        assert_eq!(pool.len(), 3);

        assert_eq!(pool.take(1), Some("x"));
        assert_eq!(pool.take(1), None);
        assert_eq!(pool.take(7), None);
        assert_eq!(pool.count(0), 2);
    }

    #[test]
    fn lowering_a_cap_drops_pooled_views() {
        let mut pool = ViewPool::new();
        for v in 0..4 {
            pool.put(3, v);
        }
        pool.set_max_recycled(3, 1);
        assert_eq!(pool.count(3), 1);
        assert_eq!(pool.put(3, 9), Some(9));

        pool.clear();
        assert!(pool.is_empty());
    }
}
