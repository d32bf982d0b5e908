//! Migration ledger
//!
//! Export bundles available for import, keyed by export time. Nothing is
//! evicted automatically; an operator purges bundles with `remove`.

use std::collections::BTreeMap;
use std::sync::Arc;

use chrono::{DateTime, Utc};
use parking_lot::RwLock;

use crate::domain::entities::ExportInfo;

#[derive(Default)]
pub struct MigrationService {
    exports: RwLock<BTreeMap<DateTime<Utc>, Arc<ExportInfo>>>,
}

impl MigrationService {
    pub fn new() -> Self {
        Self::default()
    }

    /// Record a bundle. One with the same export time is replaced.
    pub fn add(&self, info: ExportInfo) -> Arc<ExportInfo> {
        let time = info.export_time();
        let info = Arc::new(info);
        let previous = self.exports.write().insert(time, Arc::clone(&info));
        if previous.is_some() {
            tracing::warn!(export_time = %time, "export bundle replaced an earlier one with the same time");
        } else {
            tracing::info!(
                export_time = %time,
                portlets = info.exported_portlets().len(),
                "export bundle added"
            );
        }
        info
    }

    /// Every bundle, oldest first
    pub fn available_export_infos(&self) -> Vec<Arc<ExportInfo>> {
        self.exports.read().values().cloned().collect()
    }

    pub fn export_info(&self, time: DateTime<Utc>) -> Option<Arc<ExportInfo>> {
        self.exports.read().get(&time).cloned()
    }

    pub fn is_available_export_infos_empty(&self) -> bool {
        self.exports.read().is_empty()
    }

    pub fn remove(&self, time: DateTime<Utc>) -> Option<Arc<ExportInfo>> {
        let removed = self.exports.write().remove(&time);
        if removed.is_some() {
            tracing::info!(export_time = %time, "export bundle removed");
        }
        removed
    }

    /// Bundles whose expiration time has passed at `now`
    pub fn expired_export_infos(&self, now: DateTime<Utc>) -> Vec<Arc<ExportInfo>> {
        self.exports
            .read()
            .values()
            .filter(|info| info.is_expired_at(now))
            .cloned()
            .collect()
    }
}
