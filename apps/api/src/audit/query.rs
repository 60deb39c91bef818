//! Query engine — filters audit entries and orders them newest first.

use crate::audit::models::{AuditEntry, AuditFilter};

/// Returns the entries matching every set predicate of `filter`, newest first.
/// Entries with equal timestamps keep their storage order.
pub fn query(entries: &[AuditEntry], filter: &AuditFilter) -> Vec<AuditEntry> {
    let needle = filter
        .search_text
        .as_deref()
        .map(str::to_lowercase)
        .filter(|s| !s.is_empty());

    let mut matched: Vec<AuditEntry> = entries
        .iter()
        .filter(|e| matches(e, filter, needle.as_deref()))
        .cloned()
        .collect();

    sort_newest_first(&mut matched);
    matched
}

/// Stable descending sort by timestamp.
pub fn sort_newest_first(entries: &mut [AuditEntry]) {
    entries.sort_by(|a, b| b.timestamp.cmp(&a.timestamp));
}

fn matches(entry: &AuditEntry, filter: &AuditFilter, needle: Option<&str>) -> bool {
    if filter.start_date.is_some_and(|start| entry.timestamp < start) {
        return false;
    }
    if filter.end_date.is_some_and(|end| entry.timestamp > end) {
        return false;
    }
    if filter
        .actor_id
        .as_deref()
        .is_some_and(|actor| entry.actor_id != actor)
    {
        return false;
    }
    if filter.action.is_some_and(|action| entry.action != action) {
        return false;
    }
    if filter.severity.is_some_and(|s| entry.severity != s) {
        return false;
    }
    if filter.success.is_some_and(|s| entry.success != s) {
        return false;
    }
    if let Some(needle) = needle {
        if !entry.description.to_lowercase().contains(needle) {
            return false;
        }
    }
    true
}
