use super::Optional;
use crate::field::Structure;
use std::sync::{Arc, Mutex, PoisonError};
use tracing::debug;

/// One slot per possible [`Optional`] bitmask.
const SLOTS: usize = Optional::all().bits() as usize + 1;

/// Per-convention memo of built shapes, indexed by the optional-field bitmask.
///
/// Entries are built on first request under the lock and never evicted, so the same flags always
/// hand back the same `Arc`.
pub(crate) struct ShapeCache {
    uri: &'static str,
    slots: Mutex<Vec<Option<Arc<Structure>>>>,
}

impl ShapeCache {
    pub(crate) const fn new(uri: &'static str) -> Self {
        Self {
            uri,
            slots: Mutex::new(Vec::new()),
        }
    }

    pub(crate) fn get_or_build(
        &self,
        optional: Optional,
        build: impl FnOnce(Optional) -> Arc<Structure>,
    ) -> Arc<Structure> {
        // A poisoned lock still only holds complete shapes.
        let mut slots = self.slots.lock().unwrap_or_else(PoisonError::into_inner);
        if slots.is_empty() {
            slots.resize(SLOTS, None);
        }
        let index = (optional & Optional::all()).bits() as usize;
        if let Some(shape) = &slots[index] {
            return shape.clone();
        }
        let shape = build(optional);
        debug!(uri = self.uri, ?optional, fields = shape.num_fields(), "built shape");
        slots[index] = Some(shape.clone());
        shape
    }
}

#[cfg(test)]
mod test {
    use super::*;
    use crate::field::ScalarType;
    use crate::field_builder::FieldBuilder;
    use std::sync::atomic::{AtomicUsize, Ordering};

    #[test]
    fn builds_once_per_mask() {
        static CACHE: ShapeCache = ShapeCache::new("test:nt/Cache:1.0");
        let builds = AtomicUsize::new(0);
        let build = |optional: Optional| {
            builds.fetch_add(1, Ordering::SeqCst);
            let mut fb = FieldBuilder::new().add("value", ScalarType::Int);
            if optional.contains(Optional::DESCRIPTOR) {
                fb = fb.add("descriptor", ScalarType::String);
            }
            fb.create_structure()
        };
        let a = CACHE.get_or_build(Optional::DESCRIPTOR, build);
        let b = CACHE.get_or_build(Optional::DESCRIPTOR, build);
        let c = CACHE.get_or_build(Optional::empty(), build);
        assert!(Arc::ptr_eq(&a, &b));
        assert!(!Arc::ptr_eq(&a, &c));
        assert_eq!(a.num_fields(), 2);
        assert_eq!(c.num_fields(), 1);
        assert_eq!(builds.load(Ordering::SeqCst), 2);
    }

    #[test]
    fn shared_across_threads() {
        static CACHE: ShapeCache = ShapeCache::new("test:nt/Threads:1.0");
        let shapes: Vec<Arc<Structure>> = std::thread::scope(|scope| {
            let handles: Vec<_> = (0..8)
                .map(|_| {
                    scope.spawn(|| {
                        CACHE.get_or_build(Optional::ALARM, |_| {
                            FieldBuilder::new()
                                .add("value", ScalarType::Double)
                                .create_structure()
                        })
                    })
                })
                .collect();
            handles.into_iter().map(|h| h.join().unwrap()).collect()
        });
        assert!(shapes.windows(2).all(|w| Arc::ptr_eq(&w[0], &w[1])));
    }
}
