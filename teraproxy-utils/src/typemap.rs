use std::{
    any::{type_name, Any, TypeId},
    sync::Arc,
};

use ahash::AHashMap;
use parking_lot::RwLock;

type Entry = Arc<dyn Any + Send + Sync>;

/// A concurrent cache keyed by types.
///
/// Each key type owns at most one stored value. Values
/// are computed outside the lock; when two threads race
/// on the same key the first insertion wins and both
/// get the stored value back.
#[derive(Default)]
pub struct TypeCache {
    inner: RwLock<AHashMap<TypeId, Entry>>,
}

impl TypeCache {
    pub fn new() -> Self {
        Self::default()
    }

    /// Gets the value cached for `K`, if any.
    ///
    /// # Panics
    /// Panics if the value cached for `K` is not a `V`.
    pub fn get<K: 'static, V: Send + Sync + 'static>(&self) -> Option<Arc<V>> {
        let entry = self.inner.read().get(&TypeId::of::<K>()).cloned()?;
        Some(Self::downcast::<K, V>(entry))
    }

    /// Gets the value cached for `K`, computing it
    /// with `f` if nothing has been stored yet.
    ///
    /// # Panics
    /// Panics if the value cached for `K` is not a `V`.
    pub fn get_or_insert_with<K: 'static, V: Send + Sync + 'static>(
        &self,
        f: impl FnOnce() -> V,
    ) -> Arc<V> {
        if let Some(v) = self.get::<K, V>() {
            return v;
        }
        let computed: Entry = Arc::new(f());
        let entry = self
            .inner
            .write()
            .entry(TypeId::of::<K>())
            .or_insert(computed)
            .clone();
        Self::downcast::<K, V>(entry)
    }

    pub fn contains<K: 'static>(&self) -> bool {
        self.inner.read().contains_key(&TypeId::of::<K>())
    }

    pub fn len(&self) -> usize {
        self.inner.read().len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    fn downcast<K: 'static, V: Send + Sync + 'static>(entry: Entry) -> Arc<V> {
        entry.downcast::<V>().unwrap_or_else(|_| {
            panic!(
                "value cached for {} is not a {}",
                type_name::<K>(),
                type_name::<V>()
            )
        })
    }
}

#[cfg(test)]
mod tests {
    use std::{
        sync::{
            atomic::{AtomicUsize, Ordering},
            Arc,
        },
        thread,
    };

    use super::TypeCache;

    #[test]
    fn basic_functionality() {
        let cache = TypeCache::new();
        assert_eq!(*cache.get_or_insert_with::<String, _>(|| 24i32), 24);
        assert_eq!(*cache.get_or_insert_with::<f64, _>(|| 25i32), 25);
        assert_eq!(*cache.get_or_insert_with::<String, _>(|| 99i32), 24);

        assert_eq!(cache.get::<String, i32>().as_deref(), Some(&24));
        assert_eq!(cache.get::<f32, i32>(), None);
        assert!(cache.contains::<f64>());
        assert_eq!(cache.len(), 2);
    }

    #[test]
    fn racing_inserts_converge() {
        let cache = TypeCache::new();
        let calls = AtomicUsize::new(0);
        let results: Vec<Arc<Vec<u32>>> = thread::scope(|s| {
            let handles: Vec<_> = (0..8)
                .map(|_| {
                    s.spawn(|| {
                        cache.get_or_insert_with::<u8, _>(|| {
                            calls.fetch_add(1, Ordering::SeqCst);
                            vec![1, 2, 3]
                        })
                    })
                })
                .collect();
            handles.into_iter().map(|h| h.join().unwrap()).collect()
        });

        assert!(calls.load(Ordering::SeqCst) >= 1);
        let stored = cache.get::<u8, Vec<u32>>().unwrap();
        for r in results {
            assert!(Arc::ptr_eq(&r, &stored));
        }
    }

    #[test]
    #[should_panic]
    fn mismatched_value_type() {
        let cache = TypeCache::new();
        cache.get_or_insert_with::<u8, _>(|| 1u32);
        cache.get::<u8, String>();
    }
}
