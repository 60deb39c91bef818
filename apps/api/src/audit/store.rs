use std::sync::Arc;

use chrono::Utc;
use tracing::{debug, warn};

use crate::audit::models::{AuditEntry, NewAuditEntry};
use crate::store::{CappedCollection, KeyValueStore, StoreError};

const AUDIT_KEY: &str = "audit.entries";

/// Append-only, retention-capped audit log.
///
/// CRITICAL: `append` never fails toward the caller. Auditing must not break the action
/// being audited, so persistence errors are logged and dropped here.
pub struct EventStore {
    entries: CappedCollection<AuditEntry>,
}

impl EventStore {
    pub fn new(store: Arc<dyn KeyValueStore>, capacity: usize) -> Self {
        Self {
            entries: CappedCollection::new(store, capacity),
        }
    }

    /// Stamps `input` with an id and the current time and appends it.
    pub async fn record(&self, input: NewAuditEntry) -> AuditEntry {
        let entry = input.into_entry(Utc::now());
        self.append(entry.clone()).await;
        entry
    }

    pub async fn append(&self, entry: AuditEntry) {
        let id = entry.id.clone();
        let action = entry.action;
        match self.entries.append(AUDIT_KEY, entry).await {
            Ok(()) => debug!("Audit entry {id} recorded ({})", action.as_str()),
            Err(e) => warn!("Failed to record audit entry {id} ({}): {e}", action.as_str()),
        }
    }

    /// Every retained entry in storage order (oldest first).
    pub async fn list(&self) -> Result<Vec<AuditEntry>, StoreError> {
        self.entries.list(AUDIT_KEY).await
    }

    pub fn capacity(&self) -> usize {
        self.entries.capacity()
    }
}
