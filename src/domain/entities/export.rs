//! Export entity
//!
//! The result of one migration export request: the exported state of each
//! portlet, keyed by portlet handle, plus failures grouped by error code.
//! Read-only once built.

use std::collections::BTreeMap;

use chrono::{DateTime, Utc};

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ExportInfo {
    export_time: DateTime<Utc>,
    exported_portlets: BTreeMap<String, Vec<u8>>,
    failed_portlets: BTreeMap<String, Vec<String>>,
    export_context: Option<Vec<u8>>,
    expiration_time: Option<DateTime<Utc>>,
}

impl ExportInfo {
    pub fn new(export_time: DateTime<Utc>) -> Self {
        Self {
            export_time,
            exported_portlets: BTreeMap::new(),
            failed_portlets: BTreeMap::new(),
            export_context: None,
            expiration_time: None,
        }
    }

    pub fn with_portlet(mut self, handle: impl Into<String>, state: Vec<u8>) -> Self {
        self.exported_portlets.insert(handle.into(), state);
        self
    }

    pub fn with_failure(mut self, error_code: impl Into<String>, handle: impl Into<String>) -> Self {
        self.failed_portlets
            .entry(error_code.into())
            .or_default()
            .push(handle.into());
        self
    }

    /// Opaque context the producer returned with the export
    pub fn with_export_context(mut self, context: Vec<u8>) -> Self {
        self.export_context = Some(context);
        self
    }

    pub fn with_expiration_time(mut self, expiration_time: DateTime<Utc>) -> Self {
        self.expiration_time = Some(expiration_time);
        self
    }

    pub fn export_time(&self) -> DateTime<Utc> {
        self.export_time
    }

    pub fn exported_portlets(&self) -> &BTreeMap<String, Vec<u8>> {
        &self.exported_portlets
    }

    pub fn portlet_state(&self, handle: &str) -> Option<&[u8]> {
        self.exported_portlets.get(handle).map(Vec::as_slice)
    }

    pub fn failed_portlets(&self) -> &BTreeMap<String, Vec<String>> {
        &self.failed_portlets
    }

    pub fn export_context(&self) -> Option<&[u8]> {
        self.export_context.as_deref()
    }

    pub fn expiration_time(&self) -> Option<DateTime<Utc>> {
        self.expiration_time
    }

    pub fn is_expired_at(&self, now: DateTime<Utc>) -> bool {
        self.expiration_time.is_some_and(|t| t <= now)
    }
}
