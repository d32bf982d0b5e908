//! In-memory consumer store
//!
//! Keeps records in a map keyed by persistent key. Used by tests and by
//! embedders that handle persistence themselves.

use std::collections::HashMap;

use parking_lot::Mutex;

use crate::domain::entities::ProducerInfo;
use crate::domain::ports::{ConsumerStore, StoreError, StoreResult};

#[derive(Default)]
pub struct InMemoryConsumerStore {
    records: Mutex<HashMap<String, ProducerInfo>>,
}

impl InMemoryConsumerStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Seed the store with already-keyed records
    pub fn with_records(records: impl IntoIterator<Item = ProducerInfo>) -> StoreResult<Self> {
        let store = Self::new();
        {
            let mut map = store.records.lock();
            for info in records {
                let key = info
                    .persistent_key()
                    .ok_or_else(|| StoreError::Unsaved {
                        id: info.id().to_string(),
                    })?
                    .to_string();
                map.insert(key, info);
            }
        }
        Ok(store)
    }

    pub fn len(&self) -> usize {
        self.records.lock().len()
    }

    pub fn is_empty(&self) -> bool {
        self.records.lock().is_empty()
    }
}

fn ensure_id_free(
    records: &HashMap<String, ProducerInfo>,
    info: &ProducerInfo,
    key: Option<&str>,
) -> StoreResult<()> {
    let taken = records
        .iter()
        .any(|(k, r)| r.id() == info.id() && Some(k.as_str()) != key);
    if taken {
        return Err(StoreError::IdTaken {
            id: info.id().to_string(),
        });
    }
    Ok(())
}

fn key_of(info: &ProducerInfo) -> StoreResult<&str> {
    info.persistent_key().ok_or_else(|| StoreError::Unsaved {
        id: info.id().to_string(),
    })
}

impl ConsumerStore for InMemoryConsumerStore {
    fn save(&self, info: &ProducerInfo) -> StoreResult<String> {
        let mut records = self.records.lock();
        ensure_id_free(&records, info, None)?;
        let key = uuid::Uuid::new_v4().to_string();
        let mut record = info.clone();
        record.assign_persistent_key(key.clone());
        records.insert(key.clone(), record);
        Ok(key)
    }

    fn update(&self, info: &ProducerInfo) -> StoreResult<Option<String>> {
        let key = key_of(info)?;
        let mut records = self.records.lock();
        ensure_id_free(&records, info, Some(key))?;
        let record = records.get_mut(key).ok_or_else(|| StoreError::UnknownKey {
            key: key.to_string(),
        })?;
        let previous = (record.id() != info.id()).then(|| record.id().to_string());
        *record = info.clone();
        Ok(previous)
    }

    fn delete(&self, info: &ProducerInfo) -> StoreResult<()> {
        let key = key_of(info)?;
        self.records
            .lock()
            .remove(key)
            .map(|_| ())
            .ok_or_else(|| StoreError::UnknownKey {
                key: key.to_string(),
            })
    }

    fn load_all(&self) -> StoreResult<Vec<ProducerInfo>> {
        Ok(self.records.lock().values().cloned().collect())
    }

    fn load_by_persistent_key(&self, key: &str) -> StoreResult<Option<ProducerInfo>> {
        Ok(self.records.lock().get(key).cloned())
    }
}
