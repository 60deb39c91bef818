//! Ready-made entries for the actions the identity and admin surfaces audit most.

use serde_json::json;

use crate::audit::models::{AuditAction, NewAuditEntry, Severity};

pub fn user_login(
    actor_id: &str,
    email: Option<&str>,
    success: bool,
    ip_address: Option<&str>,
    user_agent: Option<&str>,
) -> NewAuditEntry {
    let (description, severity) = if success {
        ("User login succeeded", Severity::Low)
    } else {
        ("User login failed", Severity::Medium)
    };

    let mut entry = NewAuditEntry::new(
        actor_id,
        AuditAction::UserLogin,
        description,
        severity,
        success,
    )
    .with_email(email)
    .with_client(ip_address, user_agent)
    .with_metadata("ip_address", json!(ip_address))
    .with_metadata("user_agent", json!(user_agent));

    if !success {
        entry = entry.with_error("Invalid credentials");
    }
    entry
}

pub fn user_logout(actor_id: &str, email: Option<&str>, ip_address: Option<&str>) -> NewAuditEntry {
    NewAuditEntry::new(
        actor_id,
        AuditAction::UserLogout,
        "User logged out",
        Severity::Low,
        true,
    )
    .with_email(email)
    .with_client(ip_address, None)
    .with_metadata("ip_address", json!(ip_address))
}

pub fn admin_user_created(admin_id: &str, admin_email: &str, new_user_email: &str) -> NewAuditEntry {
    NewAuditEntry::new(
        admin_id,
        AuditAction::AdminUserCreated,
        format!("Admin created user account: {new_user_email}"),
        Severity::Medium,
        true,
    )
    .with_email(Some(admin_email))
    .with_target(new_user_email, "user")
    .with_metadata("new_user_email", json!(new_user_email))
}

pub fn admin_user_deleted(
    admin_id: &str,
    admin_email: &str,
    deleted_user_email: &str,
) -> NewAuditEntry {
    NewAuditEntry::new(
        admin_id,
        AuditAction::AdminUserDeleted,
        format!("Admin deleted user account: {deleted_user_email}"),
        Severity::High,
        true,
    )
    .with_email(Some(admin_email))
    .with_target(deleted_user_email, "user")
    .with_metadata("deleted_user_email", json!(deleted_user_email))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_failed_login_is_medium_with_error() {
        let e = user_login("u1", Some("u1@example.com"), false, Some("10.0.0.1"), None);
        assert_eq!(e.severity, Severity::Medium);
        assert!(!e.success);
        assert!(e.error_message.is_some());
        assert_eq!(e.ip_address.as_deref(), Some("10.0.0.1"));
    }

    #[test]
    fn test_successful_login_is_low() {
        let e = user_login("u1", None, true, None, Some("curl/8"));
        assert_eq!(e.severity, Severity::Low);
        assert!(e.error_message.is_none());
        assert_eq!(e.user_agent.as_deref(), Some("curl/8"));
    }

    #[test]
    fn test_logout_preset() {
        let e = user_logout("u1", Some("u1@example.com"), None);
        assert_eq!(e.action, AuditAction::UserLogout);
        assert!(e.success);
    }

    #[test]
    fn test_admin_deletion_is_high_and_targets_user() {
        let e = admin_user_deleted("admin", "admin@example.com", "gone@example.com");
        assert_eq!(e.severity, Severity::High);
        assert_eq!(e.target_kind.as_deref(), Some("user"));
        assert!(e.description.contains("gone@example.com"));
    }

    #[test]
    fn test_admin_creation_is_medium() {
        let e = admin_user_created("admin", "admin@example.com", "new@example.com");
        assert_eq!(e.action, AuditAction::AdminUserCreated);
        assert_eq!(e.severity, Severity::Medium);
    }
}
