//! Producer session entity
//!
//! Remote session tokens gathered for one consumer-side session: the user
//! cookie, optional per-group cookies, and a session id per portlet handle.

use std::collections::HashMap;

use chrono::{DateTime, Duration, Utc};

/// A producer-side portlet session
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PortletSession {
    pub session_id: String,
    pub expires_at: Option<DateTime<Utc>>,
}

impl PortletSession {
    pub fn is_expired_at(&self, now: DateTime<Utc>) -> bool {
        self.expires_at.is_some_and(|expiry| expiry <= now)
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ProducerSessionInformation {
    user_cookie: Option<String>,
    per_group_cookies: bool,
    group_cookies: HashMap<String, String>,
    portlet_sessions: HashMap<String, PortletSession>,
}

impl ProducerSessionInformation {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn user_cookie(&self) -> Option<&str> {
        self.user_cookie.as_deref()
    }

    pub fn set_user_cookie(&mut self, cookie: impl Into<String>) {
        self.user_cookie = Some(cookie.into());
    }

    pub fn is_per_group_cookies(&self) -> bool {
        self.per_group_cookies
    }

    pub fn set_per_group_cookies(&mut self, per_group: bool) {
        self.per_group_cookies = per_group;
    }

    pub fn group_cookie(&self, group_id: &str) -> Option<&str> {
        self.group_cookies.get(group_id).map(String::as_str)
    }

    pub fn set_group_cookie(&mut self, group_id: impl Into<String>, cookie: impl Into<String>) {
        self.group_cookies.insert(group_id.into(), cookie.into());
    }

    /// Record the session a producer opened for a portlet.
    ///
    /// `expires_in` of `None` means the producer gave no expiry. An expiry
    /// past the representable range is treated the same way.
    pub fn add_session(
        &mut self,
        portlet_handle: impl Into<String>,
        session_id: impl Into<String>,
        expires_in: Option<Duration>,
        now: DateTime<Utc>,
    ) {
        let portlet_handle = portlet_handle.into();
        let expires_at = expires_in.and_then(|d| {
            let at = now.checked_add_signed(d);
            if at.is_none() {
                tracing::debug!(portlet = %portlet_handle, "session expiry out of range, keeping it open");
            }
            at
        });
        self.portlet_sessions.insert(
            portlet_handle,
            PortletSession {
                session_id: session_id.into(),
                expires_at,
            },
        );
    }

    /// Live session id for a portlet, pruning it if it expired
    pub fn session_id_at(&mut self, portlet_handle: &str, now: DateTime<Utc>) -> Option<String> {
        let expired = self
            .portlet_sessions
            .get(portlet_handle)
            .map(|s| s.is_expired_at(now))?;
        if expired {
            self.portlet_sessions.remove(portlet_handle);
            return None;
        }
        self.portlet_sessions
            .get(portlet_handle)
            .map(|s| s.session_id.clone())
    }

    pub fn session_id(&mut self, portlet_handle: &str) -> Option<String> {
        self.session_id_at(portlet_handle, Utc::now())
    }

    /// Forget a session by its id, returning the portlet handle it belonged to
    pub fn remove_session(&mut self, session_id: &str) -> Option<String> {
        let handle = self
            .portlet_sessions
            .iter()
            .find(|(_, s)| s.session_id == session_id)
            .map(|(handle, _)| handle.clone())?;
        self.portlet_sessions.remove(&handle);
        Some(handle)
    }

    /// All live session ids, e.g. to release them on the producer
    pub fn session_ids(&self) -> Vec<String> {
        let mut ids: Vec<_> = self
            .portlet_sessions
            .values()
            .map(|s| s.session_id.clone())
            .collect();
        ids.sort();
        ids
    }

    pub fn session_count(&self) -> usize {
        self.portlet_sessions.len()
    }

    pub fn clear_sessions(&mut self) {
        self.portlet_sessions.clear();
    }
}
