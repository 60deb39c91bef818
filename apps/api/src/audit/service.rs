//! Audit service — the surface other components call to record and inspect events.
//!
//! Error policy by operation:
//! - recording: logged, never returned
//! - query / stats / alerts: logged, safe empty default returned
//! - export: returned as `ExportError`, the caller asked for a file and must know it failed

use std::sync::Arc;

use chrono::{DateTime, Utc};
use tracing::error;

use crate::audit::alerts::{detect, SecurityAlertRule};
use crate::audit::export::{render, ExportError, ExportFormat};
use crate::audit::models::{AuditEntry, AuditFilter, AuditStats, NewAuditEntry};
use crate::audit::query::query;
use crate::audit::stats::summarize;
use crate::audit::store::EventStore;
use crate::store::KeyValueStore;

pub struct AuditService {
    store: EventStore,
    rules: Vec<SecurityAlertRule>,
}

impl AuditService {
    pub fn new(
        store: Arc<dyn KeyValueStore>,
        retention: usize,
        rules: Vec<SecurityAlertRule>,
    ) -> Self {
        Self {
            store: EventStore::new(store, retention),
            rules,
        }
    }

    pub async fn record_event(&self, input: NewAuditEntry) {
        self.store.record(input).await;
    }

    pub async fn query_events(&self, filter: &AuditFilter) -> Vec<AuditEntry> {
        match self.store.list().await {
            Ok(entries) => query(&entries, filter),
            Err(e) => {
                error!("Failed to load audit entries for query: {e}");
                Vec::new()
            }
        }
    }

    pub async fn get_stats(&self) -> AuditStats {
        match self.store.list().await {
            Ok(entries) => summarize(&entries),
            Err(e) => {
                error!("Failed to load audit entries for stats: {e}");
                AuditStats::default()
            }
        }
    }

    pub async fn get_alerts(&self, now: DateTime<Utc>) -> Vec<AuditEntry> {
        match self.store.list().await {
            Ok(entries) => detect(&entries, &self.rules, now),
            Err(e) => {
                error!("Failed to load audit entries for alert check: {e}");
                Vec::new()
            }
        }
    }

    pub async fn export_events(
        &self,
        format: ExportFormat,
        filter: &AuditFilter,
    ) -> Result<String, ExportError> {
        let entries = self
            .store
            .list()
            .await
            .map_err(|e| ExportError::Failed(e.to_string()))?;
        render(&query(&entries, filter), format)
    }

    /// How many audit entries are retained before the oldest are evicted.
    pub fn retention(&self) -> usize {
        self.store.capacity()
    }

    pub fn rules(&self) -> &[SecurityAlertRule] {
        &self.rules
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::audit::alerts::default_rules;
    use crate::audit::export::CSV_HEADER;
    use crate::audit::models::{AuditAction, Severity};
    use crate::audit::presets;
    use crate::audit::store::tests::FailingStore;
    use crate::store::MemoryStore;

    fn service() -> AuditService {
        AuditService::new(Arc::new(MemoryStore::new()), 1000, default_rules())
    }

    fn failing_service() -> AuditService {
        AuditService::new(Arc::new(FailingStore), 1000, default_rules())
    }

    #[tokio::test]
    async fn test_recorded_events_are_queryable() {
        let svc = service();
        svc.record_event(presets::user_login("u1", Some("u1@example.com"), true, None, None))
            .await;
        svc.record_event(presets::user_login("u2", None, false, None, None))
            .await;

        let failures = svc
            .query_events(&AuditFilter {
                success: Some(false),
                ..Default::default()
            })
            .await;
        assert_eq!(failures.len(), 1);
        assert_eq!(failures[0].actor_id, "u2");
    }

    #[tokio::test]
    async fn test_stats_reflect_recorded_events() {
        let svc = service();
        svc.record_event(presets::admin_user_created("admin", "a@example.com", "n@example.com"))
            .await;
        svc.record_event(presets::user_logout("u1", None, None)).await;
        let stats = svc.get_stats().await;
        assert_eq!(stats.total_count, 2);
        assert_eq!(stats.distinct_actor_count, 2);
    }

    #[tokio::test]
    async fn test_alerts_fire_from_recorded_failures() {
        let svc = service();
        for _ in 0..5 {
            svc.record_event(presets::user_login("intruder", None, false, None, None))
                .await;
        }
        let alerts = svc.get_alerts(Utc::now()).await;
        assert_eq!(alerts.len(), 1);
        assert_eq!(alerts[0].severity, Severity::High);
    }

    #[tokio::test]
    async fn test_export_applies_filter() {
        let svc = service();
        svc.record_event(presets::user_login("u1", None, true, None, None))
            .await;
        svc.record_event(presets::admin_user_deleted("admin", "a@example.com", "x@example.com"))
            .await;
        let csv = svc
            .export_events(
                ExportFormat::Csv,
                &AuditFilter {
                    action: Some(AuditAction::AdminUserDeleted),
                    ..Default::default()
                },
            )
            .await
            .unwrap();
        let lines: Vec<_> = csv.lines().collect();
        assert_eq!(lines[0], CSV_HEADER);
        assert_eq!(lines.len(), 2);
        assert!(lines[1].contains("admin.user_deleted"));
    }

    #[test]
    fn test_retention_reports_configured_cap() {
        let svc = AuditService::new(Arc::new(MemoryStore::new()), 250, default_rules());
        assert_eq!(svc.retention(), 250);
        assert_eq!(svc.rules().len(), 2);
    }

    #[tokio::test]
    async fn test_recording_never_fails_on_broken_store() {
        let svc = failing_service();
        svc.record_event(presets::user_login("u1", None, true, None, None))
            .await;
    }

    #[tokio::test]
    async fn test_reads_degrade_to_empty_defaults() {
        let svc = failing_service();
        assert!(svc.query_events(&AuditFilter::default()).await.is_empty());
        assert_eq!(svc.get_stats().await, AuditStats::default());
        assert!(svc.get_alerts(Utc::now()).await.is_empty());
    }

    #[tokio::test]
    async fn test_export_failure_is_surfaced() {
        let svc = failing_service();
        let err = svc
            .export_events(ExportFormat::Json, &AuditFilter::default())
            .await
            .unwrap_err();
        assert!(err.to_string().starts_with("export failed"));
    }
}
