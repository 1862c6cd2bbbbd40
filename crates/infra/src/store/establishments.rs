use std::collections::HashMap;
use std::sync::{Arc, RwLock};

use menuboard_catalog::Establishment;
use menuboard_core::{DomainError, DomainResult, EstablishmentId};

/// Mutation applied to a stored establishment under the store's write lock.
///
/// The change is committed only when the closure returns `Ok`.
pub type EstablishmentMutation<'a> = &'a mut dyn FnMut(&mut Establishment) -> DomainResult<()>;

pub trait EstablishmentStore: Send + Sync {
    fn get(&self, id: EstablishmentId) -> Option<Establishment>;
    fn insert(&self, establishment: Establishment) -> DomainResult<()>;
    fn update(&self, id: EstablishmentId, mutate: EstablishmentMutation<'_>) -> DomainResult<Establishment>;
    fn ids(&self) -> Vec<EstablishmentId>;
}

impl<S> EstablishmentStore for Arc<S>
where
    S: EstablishmentStore + ?Sized,
{
    fn get(&self, id: EstablishmentId) -> Option<Establishment> {
        (**self).get(id)
    }

    fn insert(&self, establishment: Establishment) -> DomainResult<()> {
        (**self).insert(establishment)
    }

    fn update(&self, id: EstablishmentId, mutate: EstablishmentMutation<'_>) -> DomainResult<Establishment> {
        (**self).update(id, mutate)
    }

    fn ids(&self) -> Vec<EstablishmentId> {
        (**self).ids()
    }
}

#[derive(Debug, Default)]
pub struct InMemoryEstablishmentStore {
    inner: RwLock<HashMap<EstablishmentId, Establishment>>,
}

impl InMemoryEstablishmentStore {
    pub fn new() -> Self {
        Self::default()
    }
}

fn poisoned() -> DomainError {
    DomainError::invariant("establishment store lock poisoned")
}

impl EstablishmentStore for InMemoryEstablishmentStore {
    fn get(&self, id: EstablishmentId) -> Option<Establishment> {
        let map = self.inner.read().ok()?;
        map.get(&id).cloned()
    }

    fn insert(&self, establishment: Establishment) -> DomainResult<()> {
        let mut map = self.inner.write().map_err(|_| poisoned())?;
        if map.contains_key(&establishment.id) {
            return Err(DomainError::conflict(format!(
                "establishment {} already exists",
                establishment.id
            )));
        }
        map.insert(establishment.id, establishment);
        Ok(())
    }

    fn update(&self, id: EstablishmentId, mutate: EstablishmentMutation<'_>) -> DomainResult<Establishment> {
        let mut map = self.inner.write().map_err(|_| poisoned())?;
        let current = map.get_mut(&id).ok_or_else(|| DomainError::not_found("establishment"))?;

        let mut draft = current.clone();
        mutate(&mut draft)?;
        *current = draft.clone();
        Ok(draft)
    }

    fn ids(&self) -> Vec<EstablishmentId> {
        match self.inner.read() {
            Ok(map) => map.keys().copied().collect(),
            Err(_) => vec![],
        }
    }
}
