//! Process-local storage backend

use std::collections::HashMap;
use std::fmt::Debug;
use std::sync::{RwLock, RwLockReadGuard, RwLockWriteGuard};

use async_trait::async_trait;

use crate::domain::storage::{Storage, StorageEntity, StorageKey};
use crate::domain::DomainError;

/// Entities keyed by their storage key, tagged with an insertion sequence number
#[derive(Debug)]
struct Slots<E: StorageEntity> {
    next_seq: u64,
    entries: HashMap<E::Key, (u64, E)>,
}

/// Storage kept in a `RwLock`ed map. Contents are lost when the process exits.
///
/// `list` returns entities in insertion order.
#[derive(Debug)]
pub struct InMemoryStorage<E: StorageEntity> {
    slots: RwLock<Slots<E>>,
}

impl<E: StorageEntity> Default for InMemoryStorage<E> {
    fn default() -> Self {
        Self {
            slots: RwLock::new(Slots {
                next_seq: 0,
                entries: HashMap::new(),
            }),
        }
    }
}

impl<E: StorageEntity> InMemoryStorage<E> {
    pub fn new() -> Self {
        Self::default()
    }

    /// Storage pre-populated in the given order. Later duplicates replace earlier ones.
    pub fn with_entities(entities: impl IntoIterator<Item = E>) -> Self {
        let storage = Self::new();
        if let Ok(mut slots) = storage.slots.write() {
            for entity in entities {
                let seq = slots.next_seq;
                slots.next_seq += 1;
                slots.entries.insert(entity.key().clone(), (seq, entity));
            }
        }
        storage
    }

    fn read(&self) -> Result<RwLockReadGuard<'_, Slots<E>>, DomainError> {
        self.slots
            .read()
            .map_err(|_| DomainError::storage("in-memory store lock is poisoned"))
    }

    fn write(&self) -> Result<RwLockWriteGuard<'_, Slots<E>>, DomainError> {
        self.slots
            .write()
            .map_err(|_| DomainError::storage("in-memory store lock is poisoned"))
    }
}

#[async_trait]
impl<E> Storage<E> for InMemoryStorage<E>
where
    E: StorageEntity + 'static,
{
    async fn get(&self, key: &E::Key) -> Result<Option<E>, DomainError> {
        Ok(self.read()?.entries.get(key).map(|(_, e)| e.clone()))
    }

    async fn list(&self) -> Result<Vec<E>, DomainError> {
        let slots = self.read()?;
        let mut ordered: Vec<_> = slots.entries.values().collect();
        ordered.sort_by_key(|(seq, _)| *seq);

        Ok(ordered.into_iter().map(|(_, e)| e.clone()).collect())
    }

    async fn create(&self, entity: E) -> Result<E, DomainError> {
        let mut slots = self.write()?;

        if slots.entries.contains_key(entity.key()) {
            return Err(DomainError::conflict(format!(
                "'{}' already exists",
                entity.key().as_str()
            )));
        }

        let seq = slots.next_seq;
        slots.next_seq += 1;
        slots
            .entries
            .insert(entity.key().clone(), (seq, entity.clone()));

        Ok(entity)
    }

    async fn delete(&self, key: &E::Key) -> Result<bool, DomainError> {
        Ok(self.write()?.entries.remove(key).is_some())
    }

    async fn exists(&self, key: &E::Key) -> Result<bool, DomainError> {
        Ok(self.read()?.entries.contains_key(key))
    }

    async fn ping(&self) -> Result<(), DomainError> {
        self.read().map(|_| ())
    }

    fn backend_name(&self) -> &'static str {
        "memory"
    }
}
