//! Session correlation
//!
//! Maps consumer-side session keys to the producer session tokens gathered
//! for them. `SessionRegistry` is a plain concurrent map; `SessionHandler`
//! resolves the bundle for a portlet invocation.

use std::collections::HashMap;

use parking_lot::RwLock;

use crate::domain::entities::ProducerSessionInformation;
use crate::domain::ports::PortletInvocation;

#[derive(Default)]
pub struct SessionRegistry {
    sessions: RwLock<HashMap<String, ProducerSessionInformation>>,
}

impl SessionRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    /// Store `info` under `key`, returning what was there before
    pub fn put(
        &self,
        key: impl Into<String>,
        info: ProducerSessionInformation,
    ) -> Option<ProducerSessionInformation> {
        let key = key.into();
        tracing::debug!(session = %key, "producer session information stored");
        self.sessions.write().insert(key, info)
    }

    pub fn get(&self, key: &str) -> Option<ProducerSessionInformation> {
        self.sessions.read().get(key).cloned()
    }

    pub fn remove(&self, key: &str) -> Option<ProducerSessionInformation> {
        let removed = self.sessions.write().remove(key);
        if removed.is_some() {
            tracing::debug!(session = %key, "producer session information removed");
        }
        removed
    }

    /// Point-in-time copy of every bundle
    pub fn get_all(&self) -> Vec<ProducerSessionInformation> {
        self.sessions.read().values().cloned().collect()
    }

    /// Mutate the bundle under `key` in place, if there is one
    pub fn update<R>(
        &self,
        key: &str,
        f: impl FnOnce(&mut ProducerSessionInformation) -> R,
    ) -> Option<R> {
        self.sessions.write().get_mut(key).map(f)
    }

    /// Mutate the bundle under `key`, creating an empty one first if absent
    pub fn update_or_create<R>(
        &self,
        key: &str,
        f: impl FnOnce(&mut ProducerSessionInformation) -> R,
    ) -> R {
        let mut sessions = self.sessions.write();
        f(sessions.entry(key.to_string()).or_default())
    }

    /// Return the bundle under `key`, inserting an empty one first if absent
    pub fn get_or_create(&self, key: &str) -> ProducerSessionInformation {
        if let Some(existing) = self.get(key) {
            return existing;
        }
        let mut sessions = self.sessions.write();
        sessions
            .entry(key.to_string())
            .or_insert_with(|| {
                tracing::debug!(session = %key, "producer session information created");
                ProducerSessionInformation::new()
            })
            .clone()
    }

    pub fn contains(&self, key: &str) -> bool {
        self.sessions.read().contains_key(key)
    }

    pub fn len(&self) -> usize {
        self.sessions.read().len()
    }

    pub fn is_empty(&self) -> bool {
        self.sessions.read().is_empty()
    }
}

/// Resolves producer session state for portlet invocations
pub struct SessionHandler<'a> {
    registry: &'a SessionRegistry,
}

impl<'a> SessionHandler<'a> {
    pub fn new(registry: &'a SessionRegistry) -> Self {
        Self { registry }
    }

    /// Session bundle for the invocation's session.
    ///
    /// Invocations outside a session never get one. With `create`, a missing
    /// bundle is created and registered.
    pub fn session_information(
        &self,
        invocation: &dyn PortletInvocation,
        create: bool,
    ) -> Option<ProducerSessionInformation> {
        let key = invocation.session_key()?;
        if create {
            Some(self.registry.get_or_create(key))
        } else {
            self.registry.get(key)
        }
    }

    /// Live producer session id for the invoked portlet
    pub fn portlet_session_id(&self, invocation: &dyn PortletInvocation) -> Option<String> {
        let key = invocation.session_key()?;
        self.registry
            .update(key, |info| info.session_id(invocation.portlet_handle()))
            .flatten()
    }

    /// Record a session the producer opened for the invoked portlet
    pub fn record_portlet_session(
        &self,
        invocation: &dyn PortletInvocation,
        session_id: impl Into<String>,
        expires_in: Option<chrono::Duration>,
    ) -> bool {
        let Some(key) = invocation.session_key() else {
            return false;
        };
        let handle = invocation.portlet_handle().to_string();
        let session_id = session_id.into();
        self.registry.update_or_create(key, |info| {
            info.add_session(handle, session_id, expires_in, chrono::Utc::now())
        });
        true
    }

    /// Drop everything held for the invocation's session
    pub fn invalidate(&self, invocation: &dyn PortletInvocation) -> Option<ProducerSessionInformation> {
        self.registry.remove(invocation.session_key()?)
    }
}
