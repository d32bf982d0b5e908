//! Common test utilities for wsrp contract and CLI tests.
//!
//! This module provides:
//! - `TestEnv`: Isolated HOME and store location plus a CLI runner
//! - In-process registry helpers backed by the in-memory store

#![allow(dead_code)]

pub mod env;

pub use env::*;

use std::sync::Arc;

use wsrp::{ConsumerRegistry, InMemoryConsumerStore};

/// A started registry over a fresh in-memory store
pub fn started_registry() -> (Arc<InMemoryConsumerStore>, ConsumerRegistry) {
    let store = Arc::new(InMemoryConsumerStore::new());
    let registry = ConsumerRegistry::new(store.clone());
    registry.start().unwrap();
    (store, registry)
}
