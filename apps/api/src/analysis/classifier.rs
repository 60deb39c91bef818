//! Content classifier — routes each generated point to one charm category.
//!
//! Algorithm:
//! 1. text = lower(title + " " + description)
//! 2. first rule in `CATEGORY_RULES` whose pattern occurs wins; no hit → default category
//! 3. percentage = matched / total × 100, tier from the percentage
//! 4. categories without points are left out entirely

use crate::analysis::models::{
    AttractivenessPoint, CharmCategory, CharmCategoryAnalysis, StrengthTier,
};
use crate::analysis::rules::{first_match, substring, word, KeywordRule};

use CharmCategory::*;

/// Ordered: earlier rules win. English plus the Japanese vocabulary the generator emits.
pub const CATEGORY_RULES: &[KeywordRule<CharmCategory>] = &[
    // Product & service
    substring("service", Product),
    substring("product", Product),
    substring("サービス", Product),
    substring("商品", Product),
    substring("プロダクト", Product),
    // People & team
    substring("team", People),
    substring("talent", People),
    substring("employee", People),
    substring("expertise", People),
    substring("チーム", People),
    substring("人材", People),
    substring("従業員", People),
    substring("専門性", People),
    // Process & systems
    substring("process", Process),
    substring("efficien", Process),
    substring("mechanism", Process),
    substring("system", Process),
    substring("プロセス", Process),
    substring("効率", Process),
    substring("仕組み", Process),
    substring("システム", Process),
    // Platform & technology
    substring("technolog", Platform),
    substring("platform", Platform),
    substring("infrastructure", Platform),
    word("ai", Platform),
    substring("技術", Platform),
    substring("プラットフォーム", Platform),
    substring("インフラ", Platform),
    // Partnership
    substring("partner", Partnership),
    substring("alliance", Partnership),
    substring("cooperat", Partnership),
    substring("collaborat", Partnership),
    substring("パートナー", Partnership),
    substring("提携", Partnership),
    substring("協力", Partnership),
    substring("連携", Partnership),
    // Potential & future
    substring("growth", Potential),
    substring("future", Potential),
    substring("potential", Potential),
    substring("possibilit", Potential),
    substring("成長", Potential),
    substring("将来", Potential),
    substring("可能性", Potential),
    substring("未来", Potential),
];

pub fn categorize_point(point: &AttractivenessPoint) -> CharmCategory {
    categorize_with(point, CATEGORY_RULES)
}

/// Same as `categorize_point` against an arbitrary table.
pub fn categorize_with(
    point: &AttractivenessPoint,
    rules: &[KeywordRule<CharmCategory>],
) -> CharmCategory {
    first_match(&point.match_text(), rules)
        .copied()
        .unwrap_or(CharmCategory::DEFAULT)
}

/// Groups `points` per category in canonical category order.
pub fn classify(points: &[AttractivenessPoint]) -> Vec<CharmCategoryAnalysis> {
    let total = points.len();
    if total == 0 {
        return Vec::new();
    }

    let routed: Vec<CharmCategory> = points.iter().map(categorize_point).collect();

    CharmCategory::ALL
        .iter()
        .filter_map(|category| {
            let matched_points: Vec<AttractivenessPoint> = points
                .iter()
                .zip(&routed)
                .filter(|(_, c)| *c == category)
                .map(|(p, _)| p.clone())
                .collect();

            if matched_points.is_empty() {
                return None;
            }

            let percentage_of_total = matched_points.len() as f64 / total as f64 * 100.0;
            Some(CharmCategoryAnalysis {
                category: *category,
                matched_points,
                percentage_of_total,
                strength_tier: StrengthTier::from_percentage(percentage_of_total),
            })
        })
        .collect()
}
