//! Axum route handlers for the Audit API.

use axum::{
    extract::{Query, State},
    http::{header, StatusCode},
    response::IntoResponse,
    Json,
};
use chrono::{DateTime, Utc};
use serde::Deserialize;

use crate::audit::alerts::SecurityAlertRule;
use crate::audit::export::ExportFormat;
use crate::audit::models::{
    AuditAction, AuditEntry, AuditFilter, AuditStats, NewAuditEntry, Severity,
};
use crate::audit::presets;
use crate::errors::AppError;
use crate::state::AppState;

// ────────────────────────────────────────────────────────────────────────────
// Request types
// ────────────────────────────────────────────────────────────────────────────

/// Preset events, tagged by `kind`. Identity is supplied by the caller; this service
/// never authenticates.
#[derive(Debug, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum PresetRequest {
    UserLogin {
        actor_id: String,
        email: Option<String>,
        success: bool,
        ip_address: Option<String>,
        user_agent: Option<String>,
    },
    UserLogout {
        actor_id: String,
        email: Option<String>,
        ip_address: Option<String>,
    },
    AdminUserCreated {
        admin_id: String,
        admin_email: String,
        user_email: String,
    },
    AdminUserDeleted {
        admin_id: String,
        admin_email: String,
        user_email: String,
    },
}

impl PresetRequest {
    /// The acting identity: the user for user events, the admin for admin events.
    fn actor_id(&self) -> &str {
        match self {
            PresetRequest::UserLogin { actor_id, .. }
            | PresetRequest::UserLogout { actor_id, .. } => actor_id,
            PresetRequest::AdminUserCreated { admin_id, .. }
            | PresetRequest::AdminUserDeleted { admin_id, .. } => admin_id,
        }
    }

    fn into_entry(self) -> NewAuditEntry {
        match self {
            PresetRequest::UserLogin {
                actor_id,
                email,
                success,
                ip_address,
                user_agent,
            } => presets::user_login(
                &actor_id,
                email.as_deref(),
                success,
                ip_address.as_deref(),
                user_agent.as_deref(),
            ),
            PresetRequest::UserLogout {
                actor_id,
                email,
                ip_address,
            } => presets::user_logout(&actor_id, email.as_deref(), ip_address.as_deref()),
            PresetRequest::AdminUserCreated {
                admin_id,
                admin_email,
                user_email,
            } => presets::admin_user_created(&admin_id, &admin_email, &user_email),
            PresetRequest::AdminUserDeleted {
                admin_id,
                admin_email,
                user_email,
            } => presets::admin_user_deleted(&admin_id, &admin_email, &user_email),
        }
    }
}

/// Export format plus the same filter fields as `GET /events`. Spelled out rather than
/// flattened: flattened query structs lose non-string field types.
#[derive(Debug, Deserialize)]
pub struct ExportQuery {
    pub format: ExportFormat,
    pub start_date: Option<DateTime<Utc>>,
    pub end_date: Option<DateTime<Utc>>,
    pub actor_id: Option<String>,
    pub action: Option<AuditAction>,
    pub severity: Option<Severity>,
    pub success: Option<bool>,
    pub search_text: Option<String>,
}

impl ExportQuery {
    fn filter(&self) -> AuditFilter {
        AuditFilter {
            start_date: self.start_date,
            end_date: self.end_date,
            actor_id: self.actor_id.clone(),
            action: self.action,
            severity: self.severity,
            success: self.success,
            search_text: self.search_text.clone(),
        }
    }
}

fn require_actor(actor_id: &str) -> Result<(), AppError> {
    if actor_id.trim().is_empty() {
        return Err(AppError::Validation("actor_id cannot be empty".to_string()));
    }
    Ok(())
}

// ────────────────────────────────────────────────────────────────────────────
// Handlers
// ────────────────────────────────────────────────────────────────────────────

/// POST /api/v1/audit/events
pub async fn handle_record_event(
    State(state): State<AppState>,
    Json(input): Json<NewAuditEntry>,
) -> Result<StatusCode, AppError> {
    require_actor(&input.actor_id)?;
    state.audit.record_event(input).await;
    Ok(StatusCode::ACCEPTED)
}

/// POST /api/v1/audit/presets
pub async fn handle_record_preset(
    State(state): State<AppState>,
    Json(request): Json<PresetRequest>,
) -> Result<StatusCode, AppError> {
    require_actor(request.actor_id())?;
    state.audit.record_event(request.into_entry()).await;
    Ok(StatusCode::ACCEPTED)
}

/// GET /api/v1/audit/events
pub async fn handle_query_events(
    State(state): State<AppState>,
    Query(filter): Query<AuditFilter>,
) -> Json<Vec<AuditEntry>> {
    Json(state.audit.query_events(&filter).await)
}

/// GET /api/v1/audit/stats
pub async fn handle_stats(State(state): State<AppState>) -> Json<AuditStats> {
    Json(state.audit.get_stats().await)
}

/// GET /api/v1/audit/alerts
pub async fn handle_alerts(State(state): State<AppState>) -> Json<Vec<AuditEntry>> {
    Json(state.audit.get_alerts(Utc::now()).await)
}

/// GET /api/v1/audit/rules
pub async fn handle_rules(State(state): State<AppState>) -> Json<Vec<SecurityAlertRule>> {
    Json(state.audit.rules().to_vec())
}

/// GET /api/v1/audit/export?format=csv|json
pub async fn handle_export(
    State(state): State<AppState>,
    Query(params): Query<ExportQuery>,
) -> Result<impl IntoResponse, AppError> {
    let body = state
        .audit
        .export_events(params.format, &params.filter())
        .await?;
    Ok(([(header::CONTENT_TYPE, params.format.content_type())], body))
}
