use std::collections::HashMap;
use std::hash::Hash;
use std::sync::{Arc, RwLock};

use menuboard_core::{DomainError, DomainResult, EstablishmentId};

/// Key/value store partitioned by establishment.
///
/// Writes report failure: this is the system of record, so a lost write must surface.
pub trait ScopedStore<K, V>: Send + Sync {
    fn get(&self, scope: EstablishmentId, key: &K) -> Option<V>;
    fn upsert(&self, scope: EstablishmentId, key: K, value: V) -> DomainResult<()>;
    fn remove(&self, scope: EstablishmentId, key: &K) -> DomainResult<Option<V>>;
    fn list(&self, scope: EstablishmentId) -> Vec<V>;
    /// Drop every record in `scope` for which `keep` returns false. Returns how many were dropped.
    fn retain(&self, scope: EstablishmentId, keep: &dyn Fn(&V) -> bool) -> DomainResult<usize>;
}

impl<K, V, S> ScopedStore<K, V> for Arc<S>
where
    S: ScopedStore<K, V> + ?Sized,
{
    fn get(&self, scope: EstablishmentId, key: &K) -> Option<V> {
        (**self).get(scope, key)
    }

    fn upsert(&self, scope: EstablishmentId, key: K, value: V) -> DomainResult<()> {
        (**self).upsert(scope, key, value)
    }

    fn remove(&self, scope: EstablishmentId, key: &K) -> DomainResult<Option<V>> {
        (**self).remove(scope, key)
    }

    fn list(&self, scope: EstablishmentId) -> Vec<V> {
        (**self).list(scope)
    }

    fn retain(&self, scope: EstablishmentId, keep: &dyn Fn(&V) -> bool) -> DomainResult<usize> {
        (**self).retain(scope, keep)
    }
}

/// In-memory scoped store for tests/dev.
#[derive(Debug)]
pub struct InMemoryScopedStore<K, V> {
    inner: RwLock<HashMap<(EstablishmentId, K), V>>,
}

impl<K, V> InMemoryScopedStore<K, V> {
    pub fn new() -> Self {
        Self {
            inner: RwLock::new(HashMap::new()),
        }
    }
}

#[cfg(test)]
impl<K, V> InMemoryScopedStore<K, V> {
    /// Panic while holding the write lock, as a crashed writer would.
    pub(crate) fn poison(&self) {
        let _ = std::panic::catch_unwind(std::panic::AssertUnwindSafe(|| {
            let _guard = self.inner.write();
            panic!("writer crashed");
        }));
    }
}

fn poisoned() -> DomainError {
    DomainError::invariant("scoped store lock poisoned")
}

impl<K, V> Default for InMemoryScopedStore<K, V> {
    fn default() -> Self {
        Self::new()
    }
}

impl<K, V> ScopedStore<K, V> for InMemoryScopedStore<K, V>
where
    K: Clone + Eq + Hash + Send + Sync + 'static,
    V: Clone + Send + Sync + 'static,
{
    fn get(&self, scope: EstablishmentId, key: &K) -> Option<V> {
        let map = self.inner.read().ok()?;
        map.get(&(scope, key.clone())).cloned()
    }

    fn upsert(&self, scope: EstablishmentId, key: K, value: V) -> DomainResult<()> {
        let mut map = self.inner.write().map_err(|_| poisoned())?;
        map.insert((scope, key), value);
        Ok(())
    }

    fn remove(&self, scope: EstablishmentId, key: &K) -> DomainResult<Option<V>> {
        let mut map = self.inner.write().map_err(|_| poisoned())?;
        Ok(map.remove(&(scope, key.clone())))
    }

    fn list(&self, scope: EstablishmentId) -> Vec<V> {
        let map = match self.inner.read() {
            Ok(m) => m,
            Err(_) => return vec![],
        };

        map.iter()
            .filter_map(|((s, _k), v)| if *s == scope { Some(v.clone()) } else { None })
            .collect()
    }

    fn retain(&self, scope: EstablishmentId, keep: &dyn Fn(&V) -> bool) -> DomainResult<usize> {
        let mut map = self.inner.write().map_err(|_| poisoned())?;
        let before = map.len();
        map.retain(|(s, _k), v| *s != scope || keep(v));
        Ok(before - map.len())
    }
}
