use std::collections::HashSet;

use crate::audit::models::{ActionCount, ActorCount, AuditEntry, AuditStats};
use crate::audit::query::sort_newest_first;

const TOP_N: usize = 5;
const RECENT_ACTIVITY: usize = 10;

/// Summary statistics over `entries`.
///
/// Entries are ranked newest first before counting, so "first seen" (the tie-breaker for
/// equal counts) means most recent.
pub fn summarize(entries: &[AuditEntry]) -> AuditStats {
    let mut sorted = entries.to_vec();
    sort_newest_first(&mut sorted);

    let total_count = sorted.len();
    let success_count = sorted.iter().filter(|e| e.success).count();
    let error_count = total_count - success_count;

    let distinct_actor_count = sorted
        .iter()
        .map(|e| e.actor_id.as_str())
        .collect::<HashSet<_>>()
        .len();

    let top_actions = rank(sorted.iter().map(|e| e.action))
        .into_iter()
        .take(TOP_N)
        .map(|(action, count)| ActionCount { action, count })
        .collect();

    let top_actors = rank(sorted.iter().map(|e| e.actor_id.as_str()))
        .into_iter()
        .take(TOP_N)
        .map(|(actor_id, count)| ActorCount {
            actor_id: actor_id.to_string(),
            email: latest_email(&sorted, actor_id),
            action_count: count,
        })
        .collect();

    let recent_activity = sorted.iter().take(RECENT_ACTIVITY).cloned().collect();

    AuditStats {
        total_count,
        success_count,
        error_count,
        distinct_actor_count,
        top_actions,
        top_actors,
        recent_activity,
    }
}

/// Frequency count in first-seen order, then stable-sorted by count descending.
fn rank<K: PartialEq>(keys: impl Iterator<Item = K>) -> Vec<(K, usize)> {
    let mut counts: Vec<(K, usize)> = Vec::new();
    for key in keys {
        match counts.iter_mut().find(|(k, _)| *k == key) {
            Some((_, count)) => *count += 1,
            None => counts.push((key, 1)),
        }
    }
    counts.sort_by(|a, b| b.1.cmp(&a.1));
    counts
}

/// Most recent email recorded for the actor; `sorted` must be newest first.
fn latest_email(sorted: &[AuditEntry], actor_id: &str) -> String {
    sorted
        .iter()
        .filter(|e| e.actor_id == actor_id)
        .find_map(|e| e.actor_email.clone())
        .unwrap_or_else(|| "Unknown".to_string())
}
