//! Security alert rules — sliding-window threshold detection over the audit log.
//!
//! Rules are plain data (`SecurityAlertRule`); the detector knows nothing about any
//! particular rule. New rules are added in config, never in code.

use chrono::{DateTime, Duration, Utc};
use serde::{Deserialize, Serialize};
use serde_json::json;
use tracing::{info, warn};

use crate::audit::models::{AuditAction, AuditEntry, NewAuditEntry, Severity};

/// Which entries of the rule's action count toward the threshold.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "snake_case")]
pub enum AlertMode {
    /// Only entries with `success = false` (e.g. failed logins).
    FailuresOnly,
    /// Every entry of the action (e.g. deletion volume).
    AllEvents,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SecurityAlertRule {
    pub id: String,
    pub name: String,
    pub description: String,
    pub action: AuditAction,
    pub mode: AlertMode,
    pub threshold: usize,
    pub window_minutes: i64,
    pub severity: Severity,
    #[serde(default = "enabled_by_default")]
    pub enabled: bool,
}

/// Longest window a rule may use (30 days).
pub const MAX_WINDOW_MINUTES: i64 = 30 * 24 * 60;

fn enabled_by_default() -> bool {
    true
}

/// Repeated login failures and bulk user deletion.
pub fn default_rules() -> Vec<SecurityAlertRule> {
    vec![
        SecurityAlertRule {
            id: "failed-logins".to_string(),
            name: "Repeated login failures".to_string(),
            description: "Repeated login failures detected".to_string(),
            action: AuditAction::UserLogin,
            mode: AlertMode::FailuresOnly,
            threshold: 5,
            window_minutes: 30,
            severity: Severity::High,
            enabled: true,
        },
        SecurityAlertRule {
            id: "bulk-deletion".to_string(),
            name: "Bulk user deletion".to_string(),
            description: "Bulk user deletion detected".to_string(),
            action: AuditAction::AdminUserDeleted,
            mode: AlertMode::AllEvents,
            threshold: 10,
            window_minutes: 60,
            severity: Severity::Critical,
            enabled: true,
        },
    ]
}

/// One synthetic `security.alert` entry per violated rule.
///
/// An entry counts toward a rule when its action matches, it passes the rule's mode,
/// and its timestamp lies in `(now - window, now]`.
pub fn detect(
    entries: &[AuditEntry],
    rules: &[SecurityAlertRule],
    now: DateTime<Utc>,
) -> Vec<AuditEntry> {
    rules
        .iter()
        .filter(|rule| rule.enabled)
        .filter_map(|rule| {
            let Some(count) = count_in_window(entries, rule, now) else {
                warn!(
                    "Skipping alert rule '{}': window of {} minutes is out of range",
                    rule.id, rule.window_minutes
                );
                return None;
            };
            if count >= rule.threshold {
                info!(
                    "Security alert '{}' fired: {count} events in {} minutes",
                    rule.id, rule.window_minutes
                );
                Some(alert_entry(rule, count, now))
            } else {
                None
            }
        })
        .collect()
}

/// `None` when the window start cannot be represented.
fn count_in_window(
    entries: &[AuditEntry],
    rule: &SecurityAlertRule,
    now: DateTime<Utc>,
) -> Option<usize> {
    let window_start = Duration::try_minutes(rule.window_minutes)
        .and_then(|window| now.checked_sub_signed(window))?;
    let count = entries
        .iter()
        .filter(|e| e.action == rule.action)
        .filter(|e| match rule.mode {
            AlertMode::FailuresOnly => !e.success,
            AlertMode::AllEvents => true,
        })
        .filter(|e| e.timestamp > window_start && e.timestamp <= now)
        .count();
    Some(count)
}

fn alert_entry(rule: &SecurityAlertRule, count: usize, now: DateTime<Utc>) -> AuditEntry {
    NewAuditEntry::new(
        "system",
        AuditAction::SecurityAlert,
        format!("{}: {count}", rule.description),
        rule.severity,
        true,
    )
    .with_metadata("rule_id", json!(rule.id))
    .with_metadata("count", json!(count))
    .with_metadata("window_minutes", json!(rule.window_minutes))
    .into_entry(now)
}
