//! Consumer registry
//!
//! Producer connections are held in an id index that shadows the store.
//! Readers take a cheap snapshot of the index and never wait on writers.
//! Structural changes run one at a time: each builds the next index on a
//! copy, performs its store call, and only publishes the copy if the store
//! call succeeded. A failed change leaves both store and index as they were.

use std::collections::HashMap;
use std::sync::Arc;

use parking_lot::{Mutex, RwLock};

use super::error::{RegistryError, RegistryResult};
use crate::domain::entities::{EndpointConfiguration, ProducerInfo};
use crate::domain::ports::{ConsumerStore, StoreError};

type Index = HashMap<String, ProducerInfo>;

pub struct ConsumerRegistry {
    store: Arc<dyn ConsumerStore>,
    /// `None` while stopped
    index: RwLock<Option<Arc<Index>>>,
    mutation: Mutex<()>,
}

impl ConsumerRegistry {
    pub fn new(store: Arc<dyn ConsumerStore>) -> Self {
        Self {
            store,
            index: RwLock::new(None),
            mutation: Mutex::new(()),
        }
    }

    /// Open the store and load every persisted connection
    pub fn start(&self) -> RegistryResult<()> {
        let _guard = self.mutation.lock();
        if self.index.read().is_some() {
            return Ok(());
        }

        self.store.start()?;
        let index = match self.load_index() {
            Ok(index) => index,
            Err(e) => {
                let _ = self.store.stop();
                return Err(e);
            }
        };
        tracing::info!(consumers = index.len(), "consumer registry started");
        *self.index.write() = Some(Arc::new(index));
        Ok(())
    }

    /// Drop the cache and release the store
    pub fn stop(&self) -> RegistryResult<()> {
        let _guard = self.mutation.lock();
        if self.index.write().take().is_none() {
            return Ok(());
        }
        tracing::info!("consumer registry stopped");
        self.store.stop()?;
        Ok(())
    }

    pub fn is_started(&self) -> bool {
        self.index.read().is_some()
    }

    /// Rebuild the cache from the store, discarding what it held
    pub fn reload(&self) -> RegistryResult<()> {
        let _guard = self.mutation.lock();
        self.snapshot()?;
        let index = self.load_index()?;
        tracing::debug!(consumers = index.len(), "consumer registry reloaded");
        *self.index.write() = Some(Arc::new(index));
        Ok(())
    }

    fn load_index(&self) -> RegistryResult<Index> {
        let mut index = Index::new();
        for info in self.store.load_all()? {
            if info.persistent_key().is_none() {
                return Err(StoreError::Unsaved {
                    id: info.id().to_string(),
                }
                .into());
            }
            let id = info.id().to_string();
            if index.insert(id.clone(), info).is_some() {
                tracing::warn!(id = %id, "consumer store holds duplicate producer ids");
                return Err(RegistryError::DuplicateIdentity { id });
            }
        }
        Ok(index)
    }

    fn snapshot(&self) -> RegistryResult<Arc<Index>> {
        self.index.read().clone().ok_or(RegistryError::NotStarted)
    }

    /// Run one structural change.
    ///
    /// `change` edits a private copy of the index and makes its store call;
    /// the copy is published only if `change` returns `Ok`. Store calls must
    /// come after every check that can fail.
    fn commit<T, F>(&self, change: F) -> RegistryResult<T>
    where
        F: FnOnce(&dyn ConsumerStore, &mut Index) -> RegistryResult<T>,
    {
        let _guard = self.mutation.lock();
        let mut next = (*self.snapshot()?).clone();
        let result = change(self.store.as_ref(), &mut next)?;
        *self.index.write() = Some(Arc::new(next));
        Ok(result)
    }

    /// Create and persist a new connection.
    ///
    /// Fails with [`RegistryError::DuplicateIdentity`] if `id` is taken.
    pub fn create_consumer(
        &self,
        id: &str,
        cache_expiration: Option<u32>,
        wsdl_url: Option<String>,
    ) -> RegistryResult<ProducerInfo> {
        validate_id(id)?;
        let mut info = ProducerInfo::new(id, EndpointConfiguration::new(wsdl_url, cache_expiration));

        self.commit(|store, index| {
            if index.contains_key(id) {
                return Err(RegistryError::DuplicateIdentity { id: id.to_string() });
            }
            let key = store.save(&info)?;
            info.assign_persistent_key(key);
            index.insert(id.to_string(), info.clone());
            tracing::info!(id = %id, "producer created");
            Ok(info)
        })
    }

    /// Persist a connection whose id may have changed since it was loaded.
    ///
    /// Returns the id the connection was stored under before, if it was
    /// renamed, so callers can re-key their own indexes. On success `info`
    /// moves to the new revision; a copy taken before another accepted
    /// write fails with [`RegistryError::Conflict`].
    pub fn update_producer_info(&self, info: &mut ProducerInfo) -> RegistryResult<Option<String>> {
        validate_id(info.id())?;
        let key = info
            .persistent_key()
            .ok_or_else(|| RegistryError::UnknownConsumer {
                id: info.id().to_string(),
            })?
            .to_string();
        let mut next = info.clone();
        next.bump_revision();

        let previous = self.commit(|store, index| {
            let persisted = store
                .load_by_persistent_key(&key)?
                .ok_or_else(|| RegistryError::UnknownConsumer {
                    id: next.id().to_string(),
                })?;
            if persisted.revision() != info.revision() {
                tracing::warn!(
                    id = %next.id(),
                    stored = persisted.revision(),
                    loaded = info.revision(),
                    "refusing to overwrite a newer producer record"
                );
                return Err(RegistryError::Conflict {
                    id: persisted.id().to_string(),
                });
            }

            let old_id = persisted.id().to_string();
            let renamed = old_id != next.id();
            if renamed && index.contains_key(next.id()) {
                return Err(RegistryError::DuplicateIdentity {
                    id: next.id().to_string(),
                });
            }

            let reported = store.update(&next)?;
            if reported.as_deref() != renamed.then_some(old_id.as_str()) {
                tracing::warn!(
                    id = %next.id(),
                    stored = ?reported,
                    "consumer store disagrees about the previous producer id"
                );
            }

            if renamed {
                index.remove(&old_id);
                tracing::info!(from = %old_id, to = %next.id(), "producer renamed");
            }
            index.insert(next.id().to_string(), next.clone());
            Ok(renamed.then_some(old_id))
        })?;

        *info = next;
        Ok(previous)
    }

    /// Delete a connection from the store and the cache
    pub fn remove_consumer(&self, id: &str) -> RegistryResult<ProducerInfo> {
        self.commit(|store, index| {
            let info = index
                .get(id)
                .cloned()
                .ok_or_else(|| RegistryError::UnknownConsumer { id: id.to_string() })?;
            store.delete(&info)?;
            index.remove(id);
            tracing::info!(id = %id, "producer removed");
            Ok(info)
        })
    }

    /// Mark a connection as usable (or not) for portlet invocations
    pub fn set_active(&self, id: &str, active: bool) -> RegistryResult<ProducerInfo> {
        self.commit(|store, index| {
            let info = index
                .get_mut(id)
                .ok_or_else(|| RegistryError::UnknownConsumer { id: id.to_string() })?;
            if info.is_active() == active {
                return Ok(info.clone());
            }
            let mut updated = info.clone();
            updated.set_active(active);
            updated.bump_revision();
            store.update(&updated)?;
            *info = updated.clone();
            tracing::debug!(id = %id, active, "producer activation changed");
            Ok(updated)
        })
    }

    /// Pure lookup, never reaches the producer
    pub fn get_consumer(&self, id: &str) -> RegistryResult<Option<ProducerInfo>> {
        Ok(self.snapshot()?.get(id).cloned())
    }

    pub fn contains_consumer(&self, id: &str) -> RegistryResult<bool> {
        Ok(self.snapshot()?.contains_key(id))
    }

    pub fn consumer_by_persistent_key(&self, key: &str) -> RegistryResult<Option<ProducerInfo>> {
        Ok(self
            .snapshot()?
            .values()
            .find(|info| info.persistent_key() == Some(key))
            .cloned())
    }

    /// Point-in-time copy of all connections, in no particular order
    pub fn configured_consumers(&self) -> RegistryResult<Vec<ProducerInfo>> {
        Ok(self.snapshot()?.values().cloned().collect())
    }

    /// Ids of all connections, sorted
    pub fn configured_consumer_ids(&self) -> RegistryResult<Vec<String>> {
        let mut ids: Vec<_> = self.snapshot()?.keys().cloned().collect();
        ids.sort();
        Ok(ids)
    }

    pub fn consumer_count(&self) -> RegistryResult<usize> {
        Ok(self.snapshot()?.len())
    }
}

fn validate_id(id: &str) -> RegistryResult<()> {
    if id.trim().is_empty() || id.trim() != id {
        return Err(RegistryError::InvalidId { id: id.to_string() });
    }
    Ok(())
}
