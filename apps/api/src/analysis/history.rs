//! Per-user analysis history and emotion trends.
//!
//! Persisted collections:
//! - `history.<user_id>`         AnalysisHistoryRecord, capped per user
//! - `emotion_trends.<user_id>`  EmotionTrend, capped per user
//!
//! Recording never fails toward the caller. Owner edits (update / delete) report store
//! errors since the user is waiting on that specific change.

use std::sync::Arc;

use chrono::{DateTime, FixedOffset, Utc};
use serde::Serialize;
use tracing::{debug, error, info, warn};
use uuid::Uuid;

use crate::analysis::classifier::classify;
use crate::analysis::emotion::{analyze, insights, score};
use crate::analysis::models::{
    AnalysisHistoryRecord, AttractivenessPoint, CharmCategoryAnalysis, EmotionAnalysis,
    EmotionInsight, EmotionTrend, GeneratedOutput, HistoryPatch, UserAnalyticsSummary,
};
use crate::analysis::tags::extract_tags;
use crate::analysis::user_analytics::summarize;
use crate::store::{CappedCollection, KeyValueStore, StoreError};

pub const DEFAULT_TREND_LIMIT: usize = 20;

fn history_key(user_id: &str) -> String {
    format!("history.{user_id}")
}

fn trends_key(user_id: &str) -> String {
    format!("emotion_trends.{user_id}")
}

#[derive(Debug, Clone, Serialize)]
pub struct ClassifiedContent {
    pub categorization: Vec<CharmCategoryAnalysis>,
    pub emotion: EmotionAnalysis,
    pub insights: Vec<EmotionInsight>,
}

/// Classification plus emotion analysis of one set of generated points.
pub fn classify_and_score(points: &[AttractivenessPoint]) -> ClassifiedContent {
    let emotion = analyze(points);
    ClassifiedContent {
        categorization: classify(points),
        insights: insights(&emotion),
        emotion,
    }
}

pub struct HistoryService {
    records: CappedCollection<AnalysisHistoryRecord>,
    trends: CappedCollection<EmotionTrend>,
    offset: FixedOffset,
}

impl HistoryService {
    pub fn new(
        store: Arc<dyn KeyValueStore>,
        history_capacity: usize,
        trend_capacity: usize,
        offset: FixedOffset,
    ) -> Self {
        Self {
            records: CappedCollection::new(store.clone(), history_capacity),
            trends: CappedCollection::new(store, trend_capacity),
            offset,
        }
    }

    /// Per-user caps of (history records, emotion trend points).
    pub fn retention(&self) -> (usize, usize) {
        (self.records.capacity(), self.trends.capacity())
    }

    /// Builds, classifies and stores a record for a completed generation.
    pub async fn record_analysis(
        &self,
        user_id: &str,
        user_input: &str,
        output: GeneratedOutput,
        session_duration_seconds: f64,
    ) -> AnalysisHistoryRecord {
        let now = Utc::now();
        let record = AnalysisHistoryRecord {
            id: Uuid::new_v4().to_string(),
            timestamp: now,
            user_input: user_input.to_string(),
            categorization: classify(&output.points),
            tags: extract_tags(user_input),
            generated_output: output,
            session_duration_seconds,
            user_rating: None,
            user_feedback: None,
            bookmarked: false,
        };

        match self
            .records
            .append(&history_key(user_id), record.clone())
            .await
        {
            Ok(()) => info!(
                "Recorded analysis {} for user {user_id} ({} points)",
                record.id,
                record.generated_output.points.len()
            ),
            Err(e) => warn!("Failed to record analysis {} for user {user_id}: {e}", record.id),
        }

        let trend = EmotionTrend {
            analysis_id: record.id.clone(),
            date: now,
            score: score(&record.generated_output.points),
        };
        if let Err(e) = self.trends.append(&trends_key(user_id), trend).await {
            warn!("Failed to save emotion trend for analysis {}: {e}", record.id);
        }

        record
    }

    /// Every retained record of `user_id` in storage order; empty if the store is unreadable.
    pub async fn list(&self, user_id: &str) -> Vec<AnalysisHistoryRecord> {
        match self.records.list(&history_key(user_id)).await {
            Ok(records) => records,
            Err(e) => {
                error!("Failed to load history for user {user_id}: {e}");
                Vec::new()
            }
        }
    }

    pub async fn get_record(
        &self,
        user_id: &str,
        record_id: &str,
    ) -> Result<Option<AnalysisHistoryRecord>, StoreError> {
        let records = self.records.list(&history_key(user_id)).await?;
        Ok(records.into_iter().find(|r| r.id == record_id))
    }

    /// Applies `patch` to the record; `Ok(None)` when the user has no such record.
    pub async fn update_record(
        &self,
        user_id: &str,
        record_id: &str,
        patch: &HistoryPatch,
    ) -> Result<Option<AnalysisHistoryRecord>, StoreError> {
        let updated = self
            .records
            .modify(&history_key(user_id), |records| {
                records.iter_mut().find(|r| r.id == record_id).map(|r| {
                    patch.apply(r);
                    r.clone()
                })
            })
            .await?;

        if updated.is_some() {
            debug!("Updated analysis {record_id} for user {user_id}");
        }
        Ok(updated)
    }

    /// `Ok(false)` when the user has no such record.
    pub async fn delete_record(&self, user_id: &str, record_id: &str) -> Result<bool, StoreError> {
        let removed = self
            .records
            .modify(&history_key(user_id), |records| {
                let before = records.len();
                records.retain(|r| r.id != record_id);
                records.len() != before
            })
            .await?;

        if removed {
            info!("Deleted analysis {record_id} for user {user_id}");
        }
        Ok(removed)
    }

    pub async fn get_user_analytics(
        &self,
        user_id: &str,
        now: DateTime<Utc>,
    ) -> UserAnalyticsSummary {
        summarize(&self.list(user_id).await, now, self.offset)
    }

    /// The newest `limit` trend points, oldest first.
    pub async fn emotion_trends(&self, user_id: &str, limit: usize) -> Vec<EmotionTrend> {
        match self.trends.list(&trends_key(user_id)).await {
            Ok(mut trends) => {
                let skip = trends.len().saturating_sub(limit);
                trends.drain(..skip);
                trends
            }
            Err(e) => {
                error!("Failed to load emotion trends for user {user_id}: {e}");
                Vec::new()
            }
        }
    }
}
