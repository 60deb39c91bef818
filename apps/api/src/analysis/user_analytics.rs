//! Folds one user's analysis history into the dashboard summary.
//!
//! `now` and the timezone offset are parameters so day boundaries (streaks, usage
//! buckets) are deterministic under test.

use std::collections::HashSet;

use chrono::{DateTime, Datelike, FixedOffset, NaiveDate, Timelike, Utc, Weekday};

use crate::analysis::models::{
    AnalysisHistoryRecord, CharmCategory, Impact, ImprovementSuggestion, IndustryBreakdown,
    UsageBucket, UsagePattern, UserAnalyticsSummary,
};

const FAVORITE_COUNT: usize = 3;
const STREAK_WALK_LIMIT: u32 = 365;

pub fn summarize(
    history: &[AnalysisHistoryRecord],
    now: DateTime<Utc>,
    offset: FixedOffset,
) -> UserAnalyticsSummary {
    if history.is_empty() {
        return UserAnalyticsSummary {
            total_analyses: 0,
            total_generated_points: 0,
            average_session_duration: 0.0,
            favorite_categories: Vec::new(),
            industry_breakdown: Vec::new(),
            usage_patterns: Vec::new(),
            improvement_suggestions: Vec::new(),
            streak_days: 0,
            last_analysis_date: now,
        };
    }

    let total = history.len();
    let total_generated_points = history
        .iter()
        .map(|r| r.generated_output.points.len())
        .sum();
    let average_session_duration =
        history.iter().map(|r| r.session_duration_seconds).sum::<f64>() / total as f64;
    let last_analysis_date = history
        .iter()
        .map(|r| r.timestamp)
        .max()
        .unwrap_or(now);

    UserAnalyticsSummary {
        total_analyses: total,
        total_generated_points,
        average_session_duration,
        favorite_categories: favorite_categories(history),
        industry_breakdown: industry_breakdown(history),
        usage_patterns: usage_patterns(history, offset),
        improvement_suggestions: improvement_suggestions(history),
        streak_days: streak_days(history, now, offset),
        last_analysis_date,
    }
}

/// Top categories by matched points across every record. Ties keep canonical order.
fn favorite_categories(history: &[AnalysisHistoryRecord]) -> Vec<CharmCategory> {
    let mut ranked: Vec<(CharmCategory, usize)> = CharmCategory::ALL
        .iter()
        .map(|&category| {
            let points = history
                .iter()
                .flat_map(|r| &r.categorization)
                .filter(|c| c.category == category)
                .map(|c| c.matched_points.len())
                .sum();
            (category, points)
        })
        .collect();

    ranked.sort_by(|a, b| b.1.cmp(&a.1));
    ranked
        .into_iter()
        .take(FAVORITE_COUNT)
        .map(|(category, _)| category)
        .collect()
}

/// One entry per tag, in first-seen order. Average rating covers rated records only.
fn industry_breakdown(history: &[AnalysisHistoryRecord]) -> Vec<IndustryBreakdown> {
    struct Acc {
        tag: String,
        count: usize,
        rating_sum: u32,
        rated: u32,
    }

    let mut accs: Vec<Acc> = Vec::new();
    for record in history {
        for tag in &record.tags {
            let idx = match accs.iter().position(|a| &a.tag == tag) {
                Some(idx) => idx,
                None => {
                    accs.push(Acc {
                        tag: tag.clone(),
                        count: 0,
                        rating_sum: 0,
                        rated: 0,
                    });
                    accs.len() - 1
                }
            };
            let acc = &mut accs[idx];
            acc.count += 1;
            if let Some(rating) = record.user_rating {
                acc.rating_sum += u32::from(rating);
                acc.rated += 1;
            }
        }
    }

    let total = history.len() as f64;
    accs.into_iter()
        .map(|acc| IndustryBreakdown {
            percentage: acc.count as f64 / total * 100.0,
            average_rating: if acc.rated > 0 {
                f64::from(acc.rating_sum) / f64::from(acc.rated)
            } else {
                0.0
            },
            industry: acc.tag,
            count: acc.count,
        })
        .collect()
}

/// Morning 06–12, afternoon 12–18, evening 18–24, plus weekend (Sat/Sun) which overlaps
/// the others. Effectiveness is the percent of bucketed records rated 4 or higher.
fn usage_patterns(history: &[AnalysisHistoryRecord], offset: FixedOffset) -> Vec<UsagePattern> {
    let buckets = [
        UsageBucket::Morning,
        UsageBucket::Afternoon,
        UsageBucket::Evening,
        UsageBucket::Weekend,
    ];
    let mut frequency = [0usize; 4];
    let mut effective = [0usize; 4];

    for record in history {
        let local = record.timestamp.with_timezone(&offset);
        let well_rated = record.user_rating.is_some_and(|r| r >= 4);

        let mut hit = |idx: usize| {
            frequency[idx] += 1;
            if well_rated {
                effective[idx] += 1;
            }
        };

        match local.hour() {
            6..=11 => hit(0),
            12..=17 => hit(1),
            18..=23 => hit(2),
            _ => {}
        }
        if matches!(local.weekday(), Weekday::Sat | Weekday::Sun) {
            hit(3);
        }
    }

    buckets
        .iter()
        .enumerate()
        .map(|(idx, &pattern)| UsagePattern {
            pattern,
            frequency: frequency[idx],
            effectiveness: if frequency[idx] > 0 {
                effective[idx] as f64 / frequency[idx] as f64 * 100.0
            } else {
                0.0
            },
        })
        .collect()
}

/// Under 10% of records using a category → high impact, under 20% → medium.
/// Sorted high before medium; ties keep canonical category order.
fn improvement_suggestions(history: &[AnalysisHistoryRecord]) -> Vec<ImprovementSuggestion> {
    let total = history.len() as f64;

    let mut suggestions: Vec<ImprovementSuggestion> = CharmCategory::ALL
        .iter()
        .filter_map(|&category| {
            let using = history
                .iter()
                .filter(|r| {
                    r.categorization
                        .iter()
                        .any(|c| c.category == category && !c.matched_points.is_empty())
                })
                .count();
            let usage = using as f64 / total * 100.0;

            let (impact, recommended, suggestion) = if usage < 10.0 {
                (
                    Impact::High,
                    15.0,
                    format!("Try analyzing the {} appeal more actively.", category.name()),
                )
            } else if usage < 20.0 {
                (
                    Impact::Medium,
                    25.0,
                    format!("Dig deeper into the {} appeal.", category.name()),
                )
            } else {
                return None;
            };

            Some(ImprovementSuggestion {
                category,
                current_usage: usage,
                recommended_usage: recommended,
                suggestion,
                impact,
            })
        })
        .collect();

    suggestions.sort_by(|a, b| b.impact.cmp(&a.impact));
    suggestions
}

/// Consecutive local calendar days, ending today, with at least one record.
fn streak_days(history: &[AnalysisHistoryRecord], now: DateTime<Utc>, offset: FixedOffset) -> u32 {
    let active: HashSet<NaiveDate> = history
        .iter()
        .map(|r| r.timestamp.with_timezone(&offset).date_naive())
        .collect();

    let mut day = now.with_timezone(&offset).date_naive();
    let mut streak = 0;
    while streak < STREAK_WALK_LIMIT && active.contains(&day) {
        streak += 1;
        day = match day.pred_opt() {
            Some(prev) => prev,
            None => break,
        };
    }
    streak
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::{Duration, TimeZone};

    use crate::analysis::classifier::{classify, tests::point};
    use crate::analysis::models::GeneratedOutput;

    fn now() -> DateTime<Utc> {
        // Sunday
        Utc.with_ymd_and_hms(2026, 10, 18, 15, 0, 0).unwrap()
    }

    fn utc() -> FixedOffset {
        FixedOffset::east_opt(0).unwrap()
    }

    fn record_at(timestamp: DateTime<Utc>, titles: &[&str]) -> AnalysisHistoryRecord {
        let points: Vec<_> = titles.iter().map(|t| point(t, "")).collect();
        AnalysisHistoryRecord {
            id: format!("r-{}", timestamp.timestamp()),
            timestamp,
            user_input: "input".to_string(),
            categorization: classify(&points),
            generated_output: GeneratedOutput {
                points,
                summary: None,
            },
            session_duration_seconds: 30.0,
            user_rating: None,
            user_feedback: None,
            tags: Vec::new(),
            bookmarked: false,
        }
    }

    #[test]
    fn test_empty_history_is_zeroed_with_now() {
        let s = summarize(&[], now(), utc());
        assert_eq!(s.total_analyses, 0);
        assert_eq!(s.total_generated_points, 0);
        assert_eq!(s.average_session_duration, 0.0);
        assert!(s.favorite_categories.is_empty());
        assert!(s.usage_patterns.is_empty());
        assert!(s.improvement_suggestions.is_empty());
        assert_eq!(s.streak_days, 0);
        assert_eq!(s.last_analysis_date, now());
    }

    #[test]
    fn test_totals_and_average() {
        let mut a = record_at(now(), &["Our team", "Service"]);
        a.session_duration_seconds = 10.0;
        let mut b = record_at(now() - Duration::hours(1), &["Cloud platform"]);
        b.session_duration_seconds = 50.0;
        let s = summarize(&[a, b], now(), utc());
        assert_eq!(s.total_analyses, 2);
        assert_eq!(s.total_generated_points, 3);
        assert_eq!(s.average_session_duration, 30.0);
        assert_eq!(s.last_analysis_date, now());
    }

    #[test]
    fn test_streak_stops_at_first_gap() {
        let history: Vec<_> = [0, 1, 2, 4]
            .iter()
            .map(|d| record_at(now() - Duration::days(*d), &["x"]))
            .collect();
        assert_eq!(summarize(&history, now(), utc()).streak_days, 3);
    }

    #[test]
    fn test_streak_is_zero_without_activity_today() {
        let history = vec![record_at(now() - Duration::days(1), &["x"])];
        assert_eq!(summarize(&history, now(), utc()).streak_days, 0);
    }

    #[test]
    fn test_streak_uses_local_day_boundaries() {
        // 2026-10-18 01:00 at +09:00 is still 2026-10-17 in UTC
        let tokyo = FixedOffset::east_opt(9 * 3600).unwrap();
        let local_now = Utc.with_ymd_and_hms(2026, 10, 17, 16, 0, 0).unwrap();
        let history = vec![
            record_at(Utc.with_ymd_and_hms(2026, 10, 17, 15, 30, 0).unwrap(), &["x"]),
            record_at(Utc.with_ymd_and_hms(2026, 10, 17, 10, 0, 0).unwrap(), &["x"]),
        ];
        assert_eq!(summarize(&history, local_now, tokyo).streak_days, 2);
        assert_eq!(summarize(&history, local_now, utc()).streak_days, 1);
    }

    #[test]
    fn test_improvement_suggestion_for_rare_category() {
        let mut history: Vec<_> = (0..11)
            .map(|i| record_at(now() - Duration::minutes(i), &["Our team"]))
            .collect();
        history.push(record_at(now() - Duration::minutes(30), &["Strategic partner"]));

        let s = summarize(&history, now(), utc());
        let partnership = s
            .improvement_suggestions
            .iter()
            .find(|x| x.category == CharmCategory::Partnership)
            .unwrap();
        assert_eq!(partnership.impact, Impact::High);
        assert_eq!(partnership.recommended_usage, 15.0);
        assert!((partnership.current_usage - 100.0 / 12.0).abs() < 1e-9);
        assert!(s
            .improvement_suggestions
            .iter()
            .all(|x| x.category != CharmCategory::People));
    }

    #[test]
    fn test_suggestions_sorted_high_before_medium() {
        // 1 of 6 records uses product (16.7%, medium); others unused (high)
        let mut history: Vec<_> = (0..5)
            .map(|i| record_at(now() - Duration::minutes(i), &["Our team"]))
            .collect();
        history.push(record_at(now() - Duration::minutes(9), &["Service"]));

        let s = summarize(&history, now(), utc());
        let impacts: Vec<_> = s.improvement_suggestions.iter().map(|x| x.impact).collect();
        assert_eq!(impacts.last(), Some(&Impact::Medium));
        assert!(impacts[..impacts.len() - 1].iter().all(|i| *i == Impact::High));
        assert_eq!(
            s.improvement_suggestions.last().map(|x| x.category),
            Some(CharmCategory::Product)
        );
    }

    #[test]
    fn test_favorites_rank_by_matched_points() {
        let history = vec![
            record_at(now(), &["Cloud platform", "Cloud platform", "Cloud platform"]),
            record_at(now(), &["Our team", "Our team"]),
            record_at(now(), &["Strategic partner"]),
            record_at(now(), &["Strategic partner"]),
        ];
        let s = summarize(&history, now(), utc());
        assert_eq!(
            s.favorite_categories,
            vec![
                CharmCategory::Platform,
                CharmCategory::People,
                CharmCategory::Partnership
            ]
        );
    }

    #[test]
    fn test_usage_patterns_bucket_by_hour_and_weekend() {
        let sunday_morning = Utc.with_ymd_and_hms(2026, 10, 18, 8, 0, 0).unwrap();
        let monday_evening = Utc.with_ymd_and_hms(2026, 10, 19, 20, 0, 0).unwrap();
        let monday_night = Utc.with_ymd_and_hms(2026, 10, 19, 3, 0, 0).unwrap();

        let mut a = record_at(sunday_morning, &["x"]);
        a.user_rating = Some(5);
        let mut b = record_at(monday_evening, &["x"]);
        b.user_rating = Some(2);
        let c = record_at(monday_night, &["x"]);

        let s = summarize(&[a, b, c], now(), utc());
        let by = |bucket: UsageBucket| {
            s.usage_patterns
                .iter()
                .find(|p| p.pattern == bucket)
                .cloned()
                .unwrap()
        };
        assert_eq!(by(UsageBucket::Morning).frequency, 1);
        assert_eq!(by(UsageBucket::Morning).effectiveness, 100.0);
        assert_eq!(by(UsageBucket::Afternoon).frequency, 0);
        assert_eq!(by(UsageBucket::Afternoon).effectiveness, 0.0);
        assert_eq!(by(UsageBucket::Evening).frequency, 1);
        assert_eq!(by(UsageBucket::Evening).effectiveness, 0.0);
        assert_eq!(by(UsageBucket::Weekend).frequency, 1);
        assert_eq!(by(UsageBucket::Weekend).effectiveness, 100.0);
    }

    #[test]
    fn test_industry_breakdown_averages_rated_records_only() {
        let mut a = record_at(now(), &["x"]);
        a.tags = vec!["Startup".to_string(), "Finance".to_string()];
        a.user_rating = Some(4);
        let mut b = record_at(now(), &["x"]);
        b.tags = vec!["Startup".to_string()];
        let mut c = record_at(now(), &["x"]);
        c.tags = vec!["Startup".to_string()];
        c.user_rating = Some(2);
        let d = record_at(now(), &["x"]);

        let s = summarize(&[a, b, c, d], now(), utc());
        assert_eq!(s.industry_breakdown.len(), 2);
        let startup = &s.industry_breakdown[0];
        assert_eq!(startup.industry, "Startup");
        assert_eq!(startup.count, 3);
        assert_eq!(startup.percentage, 75.0);
        assert_eq!(startup.average_rating, 3.0);
        assert_eq!(s.industry_breakdown[1].industry, "Finance");
        assert_eq!(s.industry_breakdown[1].percentage, 25.0);
    }
}
