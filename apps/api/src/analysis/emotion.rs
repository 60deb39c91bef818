//! Emotion scorer — positive / negative / neutral distribution over generated points.
//!
//! Per point: every matching rule in `SENTIMENT_RULES` adds its weight to its bucket,
//! the buckets are normalized to that point's total signal, and a point with no signal
//! counts as 100% neutral. The per-point percentages are then averaged.
//!
//! No rule feeds the neutral bucket, so a point with any signal reports 0% neutral.
//! That matches the scores users have already seen and is kept as is.

use std::collections::BTreeMap;

use crate::analysis::models::{
    AttractivenessPoint, EmotionAnalysis, EmotionInsight, EmotionScore, InsightKind, Sentiment,
};
use crate::analysis::rules::{tally, Pattern, WeightedRule};

use Pattern::Substring as S;

const MAX_SUGGESTIONS: usize = 5;

const fn positive(patterns: &'static [Pattern]) -> WeightedRule<Sentiment> {
    WeightedRule {
        patterns,
        weight: 2,
        bucket: Sentiment::Positive,
    }
}

const fn negative(patterns: &'static [Pattern]) -> WeightedRule<Sentiment> {
    WeightedRule {
        patterns,
        weight: 2,
        bucket: Sentiment::Negative,
    }
}

const fn context_boost(patterns: &'static [Pattern]) -> WeightedRule<Sentiment> {
    WeightedRule {
        patterns,
        weight: 1,
        bucket: Sentiment::Positive,
    }
}

pub const SENTIMENT_RULES: &[WeightedRule<Sentiment>] = &[
    positive(&[S("excellent"), S("優れている")]),
    positive(&[S("wonderful"), S("素晴らしい")]),
    positive(&[S("attractive"), S("魅力的")]),
    positive(&[S("strength"), S("強み")]),
    positive(&[S("feature"), S("特徴")]),
    positive(&[S("advantage"), S("利点")]),
    positive(&[S("value"), S("価値")]),
    positive(&[S("success"), S("成功")]),
    positive(&[S("growth"), S("成長")]),
    positive(&[S("development"), S("発展")]),
    positive(&[S("innovat"), S("革新")]),
    positive(&[S("creativ"), S("創造的")]),
    positive(&[S("efficient"), S("効率的")]),
    positive(&[S("effective"), S("効果的")]),
    positive(&[S("reliab"), S("信頼性")]),
    positive(&[S("safety"), S("安全性")]),
    positive(&[S("quality"), S("品質")]),
    positive(&[S("service"), S("サービス")]),
    positive(&[S("support"), S("サポート")]),
    positive(&[S("flexib"), S("柔軟性")]),
    positive(&[S("adaptab"), S("適応性")]),
    positive(&[S("sustainab"), S("持続性")]),
    positive(&[S("eco-friendly"), S("環境配慮")]),
    negative(&[S("problem"), S("問題")]),
    negative(&[S("challenge"), S("課題")]),
    negative(&[S("weakness"), S("弱み")]),
    negative(&[S("shortage"), S("不足")]),
    negative(&[S("drawback"), S("欠点")]),
    negative(&[S("risk"), S("リスク")]),
    negative(&[S("concern"), S("懸念")]),
    negative(&[S("anxiety"), S("不安")]),
    negative(&[S("difficult"), S("困難")]),
    negative(&[S("complex"), S("複雑")]),
    negative(&[S("high cost"), S("高コスト")]),
    negative(&[S("time-consuming"), S("時間がかかる")]),
    negative(&[S("hassle"), S("手間")]),
    negative(&[S("limitation"), S("制限")]),
    negative(&[S("constraint"), S("制約")]),
    context_boost(&[
        S("improvement"),
        S("improve"),
        S("enhance"),
        S("strengthen"),
        S("改善"),
        S("向上"),
        S("強化"),
    ]),
    context_boost(&[
        S("response"),
        S("countermeasure"),
        S("solution"),
        S("resolve"),
        S("対応"),
        S("対策"),
        S("解決"),
    ]),
];

/// Labels for the per-category breakdown; a point belongs to a label when its text
/// contains the label or its Japanese equivalent.
pub const EMOTION_CATEGORIES: &[(&str, &[Pattern])] = &[
    ("technology", &[S("technology"), S("技術")]),
    ("culture", &[S("culture"), S("文化")]),
    ("benefits", &[S("benefits"), S("福利厚生")]),
    ("growth", &[S("growth"), S("成長")]),
    ("environment", &[S("environment"), S("環境")]),
    ("other", &[S("other"), S("その他")]),
];

pub fn score(points: &[AttractivenessPoint]) -> EmotionScore {
    score_with(points, SENTIMENT_RULES)
}

/// `score` against an arbitrary rule table.
pub fn score_with(
    points: &[AttractivenessPoint],
    rules: &[WeightedRule<Sentiment>],
) -> EmotionScore {
    if points.is_empty() {
        return EmotionScore {
            positive_pct: 0,
            negative_pct: 0,
            neutral_pct: 100,
            confidence: 50,
            dominant: Sentiment::Neutral,
        };
    }

    let mut positive_sum = 0.0_f64;
    let mut negative_sum = 0.0_f64;
    let mut neutral_sum = 0.0_f64;

    for point in points {
        let totals = tally(&point.match_text(), rules);
        let bucket = |s: Sentiment| f64::from(totals.get(&s).copied().unwrap_or(0));
        let (pos, neg, neu) = (
            bucket(Sentiment::Positive),
            bucket(Sentiment::Negative),
            bucket(Sentiment::Neutral),
        );
        let total = pos + neg + neu;

        if total > 0.0 {
            positive_sum += pos / total * 100.0;
            negative_sum += neg / total * 100.0;
            neutral_sum += neu / total * 100.0;
        } else {
            neutral_sum += 100.0;
        }
    }

    let n = points.len() as f64;
    let positive_pct = (positive_sum / n).round() as u32;
    let negative_pct = (negative_sum / n).round() as u32;
    let neutral_pct = (neutral_sum / n).round() as u32;

    EmotionScore {
        positive_pct,
        negative_pct,
        neutral_pct,
        confidence: (points.len() as u32).saturating_mul(10).clamp(50, 100),
        dominant: dominant(positive_pct, negative_pct, neutral_pct),
    }
}

/// Strictly largest bucket; any tie falls back to neutral.
fn dominant(positive: u32, negative: u32, neutral: u32) -> Sentiment {
    if positive > negative && positive > neutral {
        Sentiment::Positive
    } else if negative > positive && negative > neutral {
        Sentiment::Negative
    } else {
        Sentiment::Neutral
    }
}

pub fn analyze(points: &[AttractivenessPoint]) -> EmotionAnalysis {
    let overall = score(points);

    let mut by_category = BTreeMap::new();
    for (label, patterns) in EMOTION_CATEGORIES {
        let subset: Vec<AttractivenessPoint> = points
            .iter()
            .filter(|p| {
                let text = p.match_text();
                patterns.iter().any(|pattern| pattern.is_match(&text))
            })
            .cloned()
            .collect();
        if !subset.is_empty() {
            by_category.insert(label.to_string(), score(&subset));
        }
    }

    let suggestions = suggestions(&overall, &by_category);

    EmotionAnalysis {
        overall,
        by_category,
        suggestions,
    }
}

fn suggestions(overall: &EmotionScore, by_category: &BTreeMap<String, EmotionScore>) -> Vec<String> {
    let mut out = Vec::new();

    if overall.negative_pct > 50 {
        out.push(
            "Negative elements dominate. Clarify the issues and present concrete countermeasures."
                .to_string(),
        );
    }
    if overall.positive_pct < 30 {
        out.push(
            "Emphasize positive elements and put the company's strengths up front.".to_string(),
        );
    }
    if overall.neutral_pct > 60 {
        out.push(
            "The emotional impact is weak. Consider more concrete and appealing wording."
                .to_string(),
        );
    }

    // Fixed label order, not map order
    for (label, _) in EMOTION_CATEGORIES {
        let Some(score) = by_category.get(*label) else {
            continue;
        };
        if score.negative_pct > 60 {
            out.push(format!(
                "The {label} area needs improvement. Consider concrete countermeasures."
            ));
        }
        if score.positive_pct > 70 {
            out.push(format!(
                "The {label} area is a strength. Consider promoting it more actively."
            ));
        }
    }

    out.truncate(MAX_SUGGESTIONS);
    out
}

/// Highlights, warnings and improvement hints for the emotion dashboard.
pub fn insights(analysis: &EmotionAnalysis) -> Vec<EmotionInsight> {
    let overall = &analysis.overall;
    let mut out = Vec::new();

    if overall.positive_pct > 70 {
        out.push(insight(
            InsightKind::Highlight,
            "The content leaves a very positive impression.".to_string(),
            overall.confidence,
            None,
        ));
    }
    if overall.negative_pct > 60 {
        out.push(insight(
            InsightKind::Warning,
            "Negative elements are frequent and need attention.".to_string(),
            overall.confidence,
            None,
        ));
    }
    if overall.confidence < 70 {
        out.push(insight(
            InsightKind::Improvement,
            "Add more detailed input to raise the confidence of this analysis.".to_string(),
            overall.confidence,
            None,
        ));
    }

    for (label, _) in EMOTION_CATEGORIES {
        let Some(score) = analysis.by_category.get(*label) else {
            continue;
        };
        if score.positive_pct > 80 {
            out.push(insight(
                InsightKind::Highlight,
                format!("The {label} area is rated very highly."),
                score.confidence,
                Some(*label),
            ));
        }
        if score.negative_pct > 70 {
            out.push(insight(
                InsightKind::Warning,
                format!("The {label} area urgently needs improvement."),
                score.confidence,
                Some(*label),
            ));
        }
    }

    out
}

fn insight(
    kind: InsightKind,
    message: String,
    confidence: u32,
    category: Option<&str>,
) -> EmotionInsight {
    EmotionInsight {
        kind,
        message,
        confidence,
        category: category.map(str::to_string),
    }
}
