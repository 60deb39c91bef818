use std::collections::BTreeMap;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

// ────────────────────────────────────────────────────────────────────────────
// Generated content (supplied by the AI-generation collaborator)
// ────────────────────────────────────────────────────────────────────────────

/// One generated talking point about the employer.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct AttractivenessPoint {
    pub title: String,
    pub description: String,
}

impl AttractivenessPoint {
    /// Title and description joined and lower-cased; the text every rule table matches.
    pub fn match_text(&self) -> String {
        format!("{} {}", self.title, self.description).to_lowercase()
    }
}

#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
pub struct GeneratedOutput {
    pub points: Vec<AttractivenessPoint>,
    #[serde(default)]
    pub summary: Option<String>,
}

// ────────────────────────────────────────────────────────────────────────────
// Charm categories
// ────────────────────────────────────────────────────────────────────────────

/// The six fixed charm categories, in canonical order. Closed set.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Hash, PartialOrd, Ord)]
#[serde(rename_all = "snake_case")]
pub enum CharmCategory {
    Product,
    People,
    Process,
    Platform,
    Partnership,
    Potential,
}

/// Display metadata for a category.
#[derive(Debug, Clone, Serialize)]
pub struct CategoryInfo {
    pub id: CharmCategory,
    pub name: &'static str,
    pub description: &'static str,
    pub color: &'static str,
    pub icon: &'static str,
}

impl CharmCategory {
    pub const ALL: [CharmCategory; 6] = [
        CharmCategory::Product,
        CharmCategory::People,
        CharmCategory::Process,
        CharmCategory::Platform,
        CharmCategory::Partnership,
        CharmCategory::Potential,
    ];

    /// Unmatched points land here.
    pub const DEFAULT: CharmCategory = CharmCategory::Product;

    pub fn info(&self) -> CategoryInfo {
        let (name, description, color, icon) = match self {
            CharmCategory::Product => (
                "Product & Service",
                "Appeal of the products and services offered",
                "#3B82F6",
                "🚀",
            ),
            CharmCategory::People => (
                "People & Team",
                "Capability and appeal of employees and teams",
                "#10B981",
                "👥",
            ),
            CharmCategory::Process => (
                "Process & Systems",
                "Efficiency of workflows and internal systems",
                "#F59E0B",
                "⚙️",
            ),
            CharmCategory::Platform => (
                "Platform & Technology",
                "Strength of the technology base and infrastructure",
                "#8B5CF6",
                "💻",
            ),
            CharmCategory::Partnership => (
                "Partnership",
                "Value of alliances and cooperative relationships",
                "#EF4444",
                "🤝",
            ),
            CharmCategory::Potential => (
                "Potential & Future",
                "Growth prospects and future possibilities",
                "#EC4899",
                "⭐",
            ),
        };
        CategoryInfo {
            id: *self,
            name,
            description,
            color,
            icon,
        }
    }

    pub fn name(&self) -> &'static str {
        self.info().name
    }
}

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "snake_case")]
pub enum StrengthTier {
    High,
    Medium,
    Low,
}

impl StrengthTier {
    /// ≥30% high, ≥15% medium, otherwise low.
    pub fn from_percentage(pct: f64) -> Self {
        if pct >= 30.0 {
            StrengthTier::High
        } else if pct >= 15.0 {
            StrengthTier::Medium
        } else {
            StrengthTier::Low
        }
    }
}

/// Points of one record routed to one category. Only categories with at least one
/// point are ever materialized.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct CharmCategoryAnalysis {
    pub category: CharmCategory,
    pub matched_points: Vec<AttractivenessPoint>,
    pub percentage_of_total: f64,
    pub strength_tier: StrengthTier,
}

// ────────────────────────────────────────────────────────────────────────────
// Emotion
// ────────────────────────────────────────────────────────────────────────────

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Hash)]
#[serde(rename_all = "snake_case")]
pub enum Sentiment {
    Positive,
    Negative,
    Neutral,
}

/// Integer percentages summing to 100 ± 1 (rounding).
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq)]
pub struct EmotionScore {
    pub positive_pct: u32,
    pub negative_pct: u32,
    pub neutral_pct: u32,
    pub confidence: u32,
    pub dominant: Sentiment,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct EmotionAnalysis {
    pub overall: EmotionScore,
    pub by_category: BTreeMap<String, EmotionScore>,
    pub suggestions: Vec<String>,
}

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "snake_case")]
pub enum InsightKind {
    Highlight,
    Warning,
    Improvement,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct EmotionInsight {
    pub kind: InsightKind,
    pub message: String,
    pub confidence: u32,
    pub category: Option<String>,
}

/// Overall emotion score of one recorded analysis, kept for trend charts.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct EmotionTrend {
    pub analysis_id: String,
    pub date: DateTime<Utc>,
    pub score: EmotionScore,
}

// ────────────────────────────────────────────────────────────────────────────
// History
// ────────────────────────────────────────────────────────────────────────────

/// One completed generation, owned by the user who produced it.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct AnalysisHistoryRecord {
    pub id: String,
    pub timestamp: DateTime<Utc>,
    pub user_input: String,
    pub generated_output: GeneratedOutput,
    pub categorization: Vec<CharmCategoryAnalysis>,
    pub session_duration_seconds: f64,
    pub user_rating: Option<u8>,
    pub user_feedback: Option<String>,
    #[serde(default)]
    pub tags: Vec<String>,
    #[serde(default)]
    pub bookmarked: bool,
}

/// The only mutable fields of a history record.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct HistoryPatch {
    pub user_rating: Option<u8>,
    pub user_feedback: Option<String>,
    pub bookmarked: Option<bool>,
}

impl HistoryPatch {
    pub fn validate(&self) -> Result<(), String> {
        match self.user_rating {
            Some(r) if !(1..=5).contains(&r) => Err(format!("user_rating must be 1–5, got {r}")),
            _ => Ok(()),
        }
    }

    pub fn apply(&self, record: &mut AnalysisHistoryRecord) {
        if let Some(rating) = self.user_rating {
            record.user_rating = Some(rating);
        }
        if let Some(feedback) = &self.user_feedback {
            record.user_feedback = Some(feedback.clone());
        }
        if let Some(bookmarked) = self.bookmarked {
            record.bookmarked = bookmarked;
        }
    }
}

// ────────────────────────────────────────────────────────────────────────────
// User analytics summary
// ────────────────────────────────────────────────────────────────────────────

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct IndustryBreakdown {
    pub industry: String,
    pub count: usize,
    pub percentage: f64,
    pub average_rating: f64,
}

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "snake_case")]
pub enum UsageBucket {
    Morning,
    Afternoon,
    Evening,
    Weekend,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct UsagePattern {
    pub pattern: UsageBucket,
    pub frequency: usize,
    /// Percent (0–100) of the bucket's records rated 4 or higher.
    pub effectiveness: f64,
}

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, PartialOrd, Ord)]
#[serde(rename_all = "snake_case")]
pub enum Impact {
    Low,
    Medium,
    High,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct ImprovementSuggestion {
    pub category: CharmCategory,
    pub current_usage: f64,
    pub recommended_usage: f64,
    pub suggestion: String,
    pub impact: Impact,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct UserAnalyticsSummary {
    pub total_analyses: usize,
    pub total_generated_points: usize,
    pub average_session_duration: f64,
    pub favorite_categories: Vec<CharmCategory>,
    pub industry_breakdown: Vec<IndustryBreakdown>,
    pub usage_patterns: Vec<UsagePattern>,
    pub improvement_suggestions: Vec<ImprovementSuggestion>,
    pub streak_days: u32,
    pub last_analysis_date: DateTime<Utc>,
}
