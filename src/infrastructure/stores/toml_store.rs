//! TOML Consumer Store
//!
//! Persists configured producers at `~/.wsrp/consumers.toml`. Every write is
//! a locked read-modify-write of the whole file.

use std::collections::HashSet;
use std::fs;
use std::path::{Path, PathBuf};

use fs2::FileExt;
use serde::{Deserialize, Serialize};

use crate::domain::entities::{EndpointConfiguration, ProducerInfo, RegistrationInfo};
use crate::domain::ports::{ConsumerStore, StoreError, StoreResult};

const STORE_VERSION: u32 = 1;

#[derive(Debug, Clone, Serialize, Deserialize)]
struct TomlConsumerRecord {
    key: String,
    id: String,
    #[serde(default)]
    revision: u64,
    #[serde(default)]
    active: bool,
    #[serde(default)]
    endpoint: EndpointConfiguration,
    #[serde(default)]
    registration: RegistrationInfo,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
struct TomlConsumerFile {
    version: u32,
    #[serde(default)]
    consumers: Vec<TomlConsumerRecord>,
}

impl Default for TomlConsumerFile {
    fn default() -> Self {
        Self {
            version: STORE_VERSION,
            consumers: Vec::new(),
        }
    }
}

pub struct TomlConsumerStore {
    path: PathBuf,
}

impl TomlConsumerStore {
    pub fn new() -> Self {
        Self {
            path: default_store_path(),
        }
    }

    pub fn with_path(path: PathBuf) -> Self {
        Self { path }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    fn lock_path(&self) -> PathBuf {
        self.path.with_extension("lock")
    }

    fn load_from_disk(&self) -> StoreResult<TomlConsumerFile> {
        if !self.path.exists() {
            return Ok(TomlConsumerFile::default());
        }

        let content = fs::read_to_string(&self.path).map_err(access_error)?;
        let file: TomlConsumerFile =
            toml::from_str(&content).map_err(|e| self.corrupted(e.to_string()))?;

        if file.version != STORE_VERSION {
            return Err(self.corrupted(format!("unsupported store version {}", file.version)));
        }
        let mut keys = HashSet::new();
        for record in &file.consumers {
            if !keys.insert(record.key.as_str()) {
                return Err(self.corrupted(format!("persistent key '{}' appears twice", record.key)));
            }
        }
        Ok(file)
    }

    fn save_to_disk(&self, file: &TomlConsumerFile) -> StoreResult<()> {
        if let Some(parent) = self.path.parent() {
            fs::create_dir_all(parent).map_err(access_error)?;
        }

        let content =
            toml::to_string_pretty(file).map_err(|e| StoreError::SerializationError {
                message: e.to_string(),
            })?;

        fs::write(&self.path, content).map_err(access_error)
    }

    fn corrupted(&self, message: String) -> StoreError {
        StoreError::Corrupted {
            path: self.path.clone(),
            message,
        }
    }

    /// Run `edit` against the file contents while holding the store lock
    fn modify<T>(
        &self,
        edit: impl FnOnce(&mut TomlConsumerFile) -> StoreResult<T>,
    ) -> StoreResult<T> {
        let lock_path = self.lock_path();
        if let Some(parent) = lock_path.parent() {
            fs::create_dir_all(parent).map_err(access_error)?;
        }

        let lock_file = fs::File::create(&lock_path).map_err(access_error)?;
        lock_file.lock_exclusive().map_err(access_error)?;

        let result = self.load_from_disk().and_then(|mut file| {
            let value = edit(&mut file)?;
            self.save_to_disk(&file)?;
            Ok(value)
        });

        let _ = lock_file.unlock();
        result
    }
}

impl Default for TomlConsumerStore {
    fn default() -> Self {
        Self::new()
    }
}

impl ConsumerStore for TomlConsumerStore {
    fn start(&self) -> StoreResult<()> {
        tracing::debug!(path = %self.path.display(), "opening consumer store");
        self.load_from_disk().map(|_| ())
    }

    fn save(&self, info: &ProducerInfo) -> StoreResult<String> {
        let key = uuid::Uuid::new_v4().to_string();
        let record = to_record(key.clone(), info);
        self.modify(|file| {
            ensure_id_free(file, info, None)?;
            file.consumers.push(record);
            Ok(())
        })?;
        Ok(key)
    }

    fn update(&self, info: &ProducerInfo) -> StoreResult<Option<String>> {
        let key = record_key(info)?;
        self.modify(|file| {
            ensure_id_free(file, info, Some(key))?;
            let record = file
                .consumers
                .iter_mut()
                .find(|r| r.key == key)
                .ok_or_else(|| StoreError::UnknownKey {
                    key: key.to_string(),
                })?;
            let previous = (record.id != info.id()).then(|| record.id.clone());
            *record = to_record(key.to_string(), info);
            Ok(previous)
        })
    }

    fn delete(&self, info: &ProducerInfo) -> StoreResult<()> {
        let key = record_key(info)?;
        self.modify(|file| {
            let before = file.consumers.len();
            file.consumers.retain(|r| r.key != key);
            if file.consumers.len() == before {
                return Err(StoreError::UnknownKey {
                    key: key.to_string(),
                });
            }
            Ok(())
        })
    }

    fn load_all(&self) -> StoreResult<Vec<ProducerInfo>> {
        Ok(self
            .load_from_disk()?
            .consumers
            .into_iter()
            .map(from_record)
            .collect())
    }

    fn load_by_persistent_key(&self, key: &str) -> StoreResult<Option<ProducerInfo>> {
        Ok(self
            .load_from_disk()?
            .consumers
            .into_iter()
            .find(|r| r.key == key)
            .map(from_record))
    }
}

/// `~/.wsrp/consumers.toml`
pub fn default_store_path() -> PathBuf {
    dirs::home_dir()
        .map(|h| h.join(".wsrp/consumers.toml"))
        .unwrap_or_else(|| PathBuf::from("~/.wsrp/consumers.toml"))
}

fn access_error(e: std::io::Error) -> StoreError {
    StoreError::AccessError {
        message: e.to_string(),
    }
}

/// Another process may have stored the id since our registry last loaded
fn ensure_id_free(file: &TomlConsumerFile, info: &ProducerInfo, key: Option<&str>) -> StoreResult<()> {
    let taken = file
        .consumers
        .iter()
        .any(|r| r.id == info.id() && Some(r.key.as_str()) != key);
    if taken {
        return Err(StoreError::IdTaken {
            id: info.id().to_string(),
        });
    }
    Ok(())
}

fn record_key(info: &ProducerInfo) -> StoreResult<&str> {
    info.persistent_key().ok_or_else(|| StoreError::Unsaved {
        id: info.id().to_string(),
    })
}

fn to_record(key: String, info: &ProducerInfo) -> TomlConsumerRecord {
    TomlConsumerRecord {
        key,
        id: info.id().to_string(),
        revision: info.revision(),
        active: info.is_active(),
        endpoint: info.endpoint().clone(),
        registration: info.registration().clone(),
    }
}

fn from_record(record: TomlConsumerRecord) -> ProducerInfo {
    ProducerInfo::restore(
        record.id,
        record.key,
        record.endpoint,
        record.registration,
        record.active,
    )
    .with_revision(record.revision)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::entities::RegistrationContext;
    use crate::domain::value_objects::{QName, RegistrationStatus};
    use tempfile::tempdir;

    fn store_in(dir: &tempfile::TempDir) -> TomlConsumerStore {
        TomlConsumerStore::with_path(dir.path().join("consumers.toml"))
    }

    #[test]
    fn load_missing_returns_empty() {
        let dir = tempdir().unwrap();
        let store = store_in(&dir);
        store.start().unwrap();
        assert!(store.load_all().unwrap().is_empty());
    }

    #[test]
    fn load_corrupted_returns_error() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("consumers.toml");
        fs::write(&path, "this is not toml = = =").unwrap();

        let store = TomlConsumerStore::with_path(path.clone());
        let err = store.load_all().unwrap_err();
        assert!(matches!(err, StoreError::Corrupted { .. }));

        let msg = err.to_string();
        assert!(msg.contains("consumer store corrupted"));
        assert!(msg.contains(&path.display().to_string()));
    }

    #[test]
    fn unknown_version_is_corruption() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("consumers.toml");
        fs::write(&path, "version = 7\n").unwrap();

        let err = TomlConsumerStore::with_path(path).start().unwrap_err();
        assert!(err.to_string().contains("unsupported store version 7"));
    }

    #[test]
    fn save_and_load_keeps_registration_state() {
        let dir = tempdir().unwrap();
        let store = store_in(&dir);

        let mut info = ProducerInfo::new(
            "foo",
            EndpointConfiguration::new(Some("http://example.com/wsdl".into()), Some(120)),
        );
        info.set_active(true);
        let registration = info.registration_mut();
        registration
            .set_property_value(QName::local("email").unwrap(), "a@b.c")
            .unwrap();
        registration.registration_succeeded(RegistrationContext::new("reg-1").with_state(vec![1, 2]));

        let key = store.save(&info).unwrap();
        let loaded = store.load_by_persistent_key(&key).unwrap().unwrap();

        assert_eq!(loaded.id(), "foo");
        assert_eq!(loaded.persistent_key(), Some(key.as_str()));
        assert!(loaded.is_active());
        assert_eq!(loaded.endpoint().cache_expiration, Some(120));
        assert_eq!(loaded.registration().status(), RegistrationStatus::Registered);
        assert_eq!(loaded.registration().registration_handle(), Some("reg-1"));
        assert_eq!(loaded.registration().registration_state(), Some(&[1u8, 2][..]));
        assert!(loaded.registration().has_equal_properties(info.registration()));
    }

    #[test]
    fn update_renames_in_place() {
        let dir = tempdir().unwrap();
        let store = store_in(&dir);
        let key = store
            .save(&ProducerInfo::new("foo", EndpointConfiguration::default()))
            .unwrap();
        let mut info = store.load_by_persistent_key(&key).unwrap().unwrap();
        info.set_id("bar");

        assert_eq!(store.update(&info).unwrap(), Some("foo".to_string()));

        let all = store.load_all().unwrap();
        assert_eq!(all.len(), 1);
        assert_eq!(all[0].id(), "bar");
    }

    #[test]
    fn two_handles_cannot_store_the_same_id() {
        let dir = tempdir().unwrap();
        let first = store_in(&dir);
        let second = store_in(&dir);

        first
            .save(&ProducerInfo::new("foo", EndpointConfiguration::default()))
            .unwrap();
        let err = second
            .save(&ProducerInfo::new("foo", EndpointConfiguration::default()))
            .unwrap_err();

        assert_eq!(err, StoreError::IdTaken { id: "foo".into() });
        assert_eq!(first.load_all().unwrap().len(), 1);
    }

    #[test]
    fn rename_onto_stored_id_is_refused() {
        let dir = tempdir().unwrap();
        let store = store_in(&dir);
        store
            .save(&ProducerInfo::new("foo", EndpointConfiguration::default()))
            .unwrap();
        let key = store
            .save(&ProducerInfo::new("bar", EndpointConfiguration::default()))
            .unwrap();
        let mut bar = store.load_by_persistent_key(&key).unwrap().unwrap();
        bar.set_id("foo");

        assert!(matches!(store.update(&bar), Err(StoreError::IdTaken { .. })));
        assert_eq!(store.load_by_persistent_key(&key).unwrap().unwrap().id(), "bar");
    }

    #[test]
    fn revision_is_persisted() {
        let dir = tempdir().unwrap();
        let store = store_in(&dir);
        let key = store
            .save(&ProducerInfo::new("foo", EndpointConfiguration::default()))
            .unwrap();
        let mut info = store.load_by_persistent_key(&key).unwrap().unwrap();
        info.bump_revision();

        store.update(&info).unwrap();

        let loaded = store.load_by_persistent_key(&key).unwrap().unwrap();
        assert_eq!(loaded.revision(), 1);
    }

    #[test]
    fn delete_removes_record() {
        let dir = tempdir().unwrap();
        let store = store_in(&dir);
        let key = store
            .save(&ProducerInfo::new("foo", EndpointConfiguration::default()))
            .unwrap();
        let info = store.load_by_persistent_key(&key).unwrap().unwrap();

        store.delete(&info).unwrap();

        assert!(store.load_all().unwrap().is_empty());
        assert!(matches!(
            store.delete(&info),
            Err(StoreError::UnknownKey { .. })
        ));
    }
}
