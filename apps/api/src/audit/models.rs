use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};
use uuid::Uuid;

/// Closed taxonomy of audited actions. Wire names are dotted (`user.login`).
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Hash)]
pub enum AuditAction {
    #[serde(rename = "user.login")]
    UserLogin,
    #[serde(rename = "user.logout")]
    UserLogout,
    #[serde(rename = "user.account_created")]
    UserAccountCreated,
    #[serde(rename = "user.account_deleted")]
    UserAccountDeleted,
    #[serde(rename = "admin.user_created")]
    AdminUserCreated,
    #[serde(rename = "admin.user_deleted")]
    AdminUserDeleted,
    #[serde(rename = "admin.settings_changed")]
    AdminSettingsChanged,
    #[serde(rename = "system.error")]
    SystemError,
    #[serde(rename = "security.alert")]
    SecurityAlert,
    #[serde(rename = "performance.metric")]
    PerformanceMetric,
}

impl AuditAction {
    pub fn as_str(&self) -> &'static str {
        match self {
            AuditAction::UserLogin => "user.login",
            AuditAction::UserLogout => "user.logout",
            AuditAction::UserAccountCreated => "user.account_created",
            AuditAction::UserAccountDeleted => "user.account_deleted",
            AuditAction::AdminUserCreated => "admin.user_created",
            AuditAction::AdminUserDeleted => "admin.user_deleted",
            AuditAction::AdminSettingsChanged => "admin.settings_changed",
            AuditAction::SystemError => "system.error",
            AuditAction::SecurityAlert => "security.alert",
            AuditAction::PerformanceMetric => "performance.metric",
        }
    }
}

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, PartialOrd, Ord, Hash)]
#[serde(rename_all = "snake_case")]
pub enum Severity {
    Low,
    Medium,
    High,
    Critical,
}

impl Severity {
    pub fn as_str(&self) -> &'static str {
        match self {
            Severity::Low => "low",
            Severity::Medium => "medium",
            Severity::High => "high",
            Severity::Critical => "critical",
        }
    }
}

/// One immutable audit record. Never updated after it is appended.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct AuditEntry {
    pub id: String,
    pub actor_id: String,
    pub actor_email: Option<String>,
    pub actor_display_name: Option<String>,
    pub action: AuditAction,
    pub target_id: Option<String>,
    pub target_kind: Option<String>,
    pub description: String,
    #[serde(default)]
    pub metadata: Map<String, Value>,
    pub severity: Severity,
    pub timestamp: DateTime<Utc>,
    pub ip_address: Option<String>,
    pub user_agent: Option<String>,
    pub session_id: Option<String>,
    pub success: bool,
    pub error_message: Option<String>,
}

/// Caller-supplied part of an audit entry; `id` and `timestamp` are assigned on append.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct NewAuditEntry {
    pub actor_id: String,
    #[serde(default)]
    pub actor_email: Option<String>,
    #[serde(default)]
    pub actor_display_name: Option<String>,
    pub action: AuditAction,
    #[serde(default)]
    pub target_id: Option<String>,
    #[serde(default)]
    pub target_kind: Option<String>,
    pub description: String,
    #[serde(default)]
    pub metadata: Map<String, Value>,
    pub severity: Severity,
    #[serde(default)]
    pub ip_address: Option<String>,
    #[serde(default)]
    pub user_agent: Option<String>,
    #[serde(default)]
    pub session_id: Option<String>,
    pub success: bool,
    #[serde(default)]
    pub error_message: Option<String>,
}

impl NewAuditEntry {
    pub fn new(
        actor_id: impl Into<String>,
        action: AuditAction,
        description: impl Into<String>,
        severity: Severity,
        success: bool,
    ) -> Self {
        Self {
            actor_id: actor_id.into(),
            actor_email: None,
            actor_display_name: None,
            action,
            target_id: None,
            target_kind: None,
            description: description.into(),
            metadata: Map::new(),
            severity,
            ip_address: None,
            user_agent: None,
            session_id: None,
            success,
            error_message: None,
        }
    }

    pub fn with_email(mut self, email: Option<&str>) -> Self {
        self.actor_email = email.map(str::to_string);
        self
    }

    pub fn with_target(mut self, id: &str, kind: &str) -> Self {
        self.target_id = Some(id.to_string());
        self.target_kind = Some(kind.to_string());
        self
    }

    pub fn with_metadata(mut self, key: &str, value: Value) -> Self {
        self.metadata.insert(key.to_string(), value);
        self
    }

    pub fn with_client(mut self, ip_address: Option<&str>, user_agent: Option<&str>) -> Self {
        self.ip_address = ip_address.map(str::to_string);
        self.user_agent = user_agent.map(str::to_string);
        self
    }

    pub fn with_error(mut self, message: &str) -> Self {
        self.error_message = Some(message.to_string());
        self
    }

    /// Stamps the entry with a fresh id and the given time.
    pub fn into_entry(self, timestamp: DateTime<Utc>) -> AuditEntry {
        AuditEntry {
            id: Uuid::new_v4().to_string(),
            actor_id: self.actor_id,
            actor_email: self.actor_email,
            actor_display_name: self.actor_display_name,
            action: self.action,
            target_id: self.target_id,
            target_kind: self.target_kind,
            description: self.description,
            metadata: self.metadata,
            severity: self.severity,
            timestamp,
            ip_address: self.ip_address,
            user_agent: self.user_agent,
            session_id: self.session_id,
            success: self.success,
            error_message: self.error_message,
        }
    }
}

/// All set fields are AND-combined; an unset field places no constraint.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct AuditFilter {
    pub start_date: Option<DateTime<Utc>>,
    pub end_date: Option<DateTime<Utc>>,
    pub actor_id: Option<String>,
    pub action: Option<AuditAction>,
    pub severity: Option<Severity>,
    pub success: Option<bool>,
    pub search_text: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ActionCount {
    pub action: AuditAction,
    pub count: usize,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ActorCount {
    pub actor_id: String,
    pub email: String,
    pub action_count: usize,
}

/// Derived on demand from a set of entries; never persisted.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct AuditStats {
    pub total_count: usize,
    pub success_count: usize,
    pub error_count: usize,
    pub distinct_actor_count: usize,
    pub top_actions: Vec<ActionCount>,
    pub top_actors: Vec<ActorCount>,
    pub recent_activity: Vec<AuditEntry>,
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_action_serializes_to_dotted_name() {
        let v = serde_json::to_value(AuditAction::AdminUserDeleted).unwrap();
        assert_eq!(v, json!("admin.user_deleted"));
        assert_eq!(AuditAction::AdminUserDeleted.as_str(), "admin.user_deleted");
    }

    #[test]
    fn test_action_parses_from_dotted_name() {
        let a: AuditAction = serde_json::from_value(json!("security.alert")).unwrap();
        assert_eq!(a, AuditAction::SecurityAlert);
    }

    #[test]
    fn test_severity_orders_by_urgency() {
        assert!(Severity::Low < Severity::Medium);
        assert!(Severity::High < Severity::Critical);
    }

    #[test]
    fn test_into_entry_assigns_unique_ids() {
        let now = Utc::now();
        let a = NewAuditEntry::new("u1", AuditAction::UserLogin, "ok", Severity::Low, true)
            .into_entry(now);
        let b = NewAuditEntry::new("u1", AuditAction::UserLogin, "ok", Severity::Low, true)
            .into_entry(now);
        assert_ne!(a.id, b.id);
        assert_eq!(a.timestamp, now);
    }

    #[test]
    fn test_new_entry_deserializes_with_optional_fields_missing() {
        let input: NewAuditEntry = serde_json::from_value(json!({
            "actor_id": "admin",
            "action": "admin.settings_changed",
            "description": "Changed security level",
            "severity": "high",
            "success": true
        }))
        .unwrap();
        assert!(input.metadata.is_empty());
        assert!(input.actor_email.is_none());
    }
}
