use std::sync::Arc;

use crate::analysis::history::HistoryService;
use crate::audit::service::AuditService;
use crate::config::Config;
use crate::store::KeyValueStore;

/// Shared application state injected into all route handlers via Axum extractors.
#[derive(Clone)]
pub struct AppState {
    pub audit: Arc<AuditService>,
    pub history: Arc<HistoryService>,
    /// Backend label reported by /health.
    pub store_backend: &'static str,
}

impl AppState {
    /// Wires every service onto one store backend.
    pub fn new(store: Arc<dyn KeyValueStore>, config: &Config) -> Self {
        let store_backend = store.backend();
        let audit = AuditService::new(
            store.clone(),
            config.audit_retention,
            config.alert_rules.clone(),
        );
        let history = HistoryService::new(
            store,
            config.history_retention,
            config.emotion_trend_retention,
            config.analytics_offset,
        );

        AppState {
            audit: Arc::new(audit),
            history: Arc::new(history),
            store_backend,
        }
    }
}
