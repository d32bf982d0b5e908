//! Contract tests for producer identity in the consumer registry.

use std::sync::Arc;

use wsrp::domain::ports::ConsumerStore;
use wsrp::{ConsumerRegistry, RegistryError, RegistrationStatus, TomlConsumerStore};

use crate::common::*;

/// CONTRACT: Ids are unique; a duplicate create changes nothing.
#[test]
fn contract_duplicate_create_is_rejected_without_side_effects() {
    let (store, registry) = started_registry();
    registry.create_consumer("foo", Some(10), None).unwrap();

    let err = registry
        .create_consumer("foo", Some(20), Some("http://other".into()))
        .unwrap_err();

    assert_eq!(err, RegistryError::DuplicateIdentity { id: "foo".into() });
    assert_eq!(store.load_all().unwrap().len(), 1);
    let foo = registry.get_consumer("foo").unwrap().unwrap();
    assert_eq!(foo.endpoint().cache_expiration, Some(10));
}

/// CONTRACT: A new connection is undetermined and immediately visible.
#[test]
fn contract_created_connection_is_visible_and_undetermined() {
    let (_store, registry) = started_registry();

    registry.create_consumer("foo", None, None).unwrap();

    let foo = registry.get_consumer("foo").unwrap().unwrap();
    assert_eq!(foo.registration().status(), RegistrationStatus::Undetermined);
    assert!(registry
        .configured_consumers()
        .unwrap()
        .iter()
        .any(|p| p.id() == "foo"));
}

/// CONTRACT: Rename keeps the persistent key, moves the id, reports the old id.
///
/// Scenario: create "foo", rename to "bar"; "foo" no longer resolves,
/// "bar" does, and the previous id "foo" is returned.
#[test]
fn contract_rename_reindexes_and_preserves_persistent_key() {
    let (store, registry) = started_registry();
    let mut info = registry.create_consumer("foo", None, None).unwrap();
    let key = info.persistent_key().unwrap().to_string();

    info.set_id("bar");
    let previous = registry.update_producer_info(&mut info).unwrap();

    assert_eq!(previous.as_deref(), Some("foo"));
    assert!(registry.get_consumer("foo").unwrap().is_none());
    let bar = registry.get_consumer("bar").unwrap().unwrap();
    assert_eq!(bar.persistent_key(), Some(key.as_str()));
    assert_eq!(store.load_by_persistent_key(&key).unwrap().unwrap().id(), "bar");
}

/// CONTRACT: Updating without a rename returns no previous id.
#[test]
fn contract_update_without_rename_returns_none() {
    let (_store, registry) = started_registry();
    let mut info = registry.create_consumer("foo", None, None).unwrap();

    assert_eq!(registry.update_producer_info(&mut info).unwrap(), None);
}

/// CONTRACT: Removed connections are gone from cache and store.
#[test]
fn contract_remove_deletes_everywhere() {
    let (store, registry) = started_registry();
    registry.create_consumer("foo", None, None).unwrap();

    registry.remove_consumer("foo").unwrap();

    assert!(registry.get_consumer("foo").unwrap().is_none());
    assert!(store.is_empty());
}

/// CONTRACT: Every accessor fails before start and after stop.
#[test]
fn contract_accessors_require_started_registry() {
    let (_store, registry) = started_registry();
    registry.stop().unwrap();

    assert_eq!(registry.get_consumer("foo"), Err(RegistryError::NotStarted));
    assert_eq!(registry.configured_consumers(), Err(RegistryError::NotStarted));
    assert_eq!(
        registry.remove_consumer("foo"),
        Err(RegistryError::NotStarted)
    );
}

/// CONTRACT: Concurrent creates of one id admit exactly one winner.
#[test]
fn contract_concurrent_creates_are_serialized() {
    let (store, registry) = started_registry();
    let registry = Arc::new(registry);

    let winners: usize = (0..16)
        .map(|_| {
            let registry = Arc::clone(&registry);
            std::thread::spawn(move || registry.create_consumer("race", None, None).is_ok())
        })
        .collect::<Vec<_>>()
        .into_iter()
        .map(|h| usize::from(h.join().unwrap()))
        .sum();

    assert_eq!(winners, 1);
    assert_eq!(store.len(), 1);
}

/// CONTRACT: Snapshots are copies, safe to hold while the registry changes.
#[test]
fn contract_snapshot_is_isolated_from_mutation() {
    let (_store, registry) = started_registry();
    registry.create_consumer("a", None, None).unwrap();

    let before = registry.configured_consumers().unwrap();
    registry.remove_consumer("a").unwrap();
    registry.create_consumer("b", None, None).unwrap();

    assert_eq!(before.len(), 1);
    assert_eq!(before[0].id(), "a");
}

/// CONTRACT: The file store keeps identities across registry restarts.
#[test]
fn contract_file_store_survives_restart() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("consumers.toml");

    {
        let registry = ConsumerRegistry::new(Arc::new(TomlConsumerStore::with_path(path.clone())));
        registry.start().unwrap();
        let mut foo = registry.create_consumer("foo", None, None).unwrap();
        foo.set_id("bar");
        registry.update_producer_info(&mut foo).unwrap();
        registry.stop().unwrap();
    }

    let registry = ConsumerRegistry::new(Arc::new(TomlConsumerStore::with_path(path)));
    registry.start().unwrap();
    assert_eq!(registry.configured_consumer_ids().unwrap(), vec!["bar"]);
}

/// CONTRACT: A copy loaded before another accepted write is refused.
///
/// Scenario: two copies of "foo"; one renames it to "bar"; writing the
/// other must not bring "foo" back.
#[test]
fn contract_stale_copy_does_not_undo_rename() {
    let (_store, registry) = started_registry();
    registry.create_consumer("foo", None, None).unwrap();
    let mut first = registry.get_consumer("foo").unwrap().unwrap();
    let mut second = registry.get_consumer("foo").unwrap().unwrap();

    first.set_id("bar");
    assert_eq!(
        registry.update_producer_info(&mut first).unwrap().as_deref(),
        Some("foo")
    );
    let err = registry.update_producer_info(&mut second).unwrap_err();

    assert_eq!(err, RegistryError::Conflict { id: "bar".into() });
    assert!(registry.get_consumer("bar").unwrap().is_some());
    assert!(registry.get_consumer("foo").unwrap().is_none());
}

/// CONTRACT: Registries sharing one file cannot both claim an id.
#[test]
fn contract_shared_file_store_keeps_ids_unique() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("consumers.toml");
    let first = ConsumerRegistry::new(Arc::new(TomlConsumerStore::with_path(path.clone())));
    let second = ConsumerRegistry::new(Arc::new(TomlConsumerStore::with_path(path.clone())));
    first.start().unwrap();
    second.start().unwrap();

    first.create_consumer("foo", None, None).unwrap();
    let err = second.create_consumer("foo", None, None).unwrap_err();

    assert_eq!(err, RegistryError::DuplicateIdentity { id: "foo".into() });
    let third = ConsumerRegistry::new(Arc::new(TomlConsumerStore::with_path(path)));
    third.start().unwrap();
    assert_eq!(third.configured_consumer_ids().unwrap(), vec!["foo"]);
    third.remove_consumer("foo").unwrap();
}
