//! Industry and company-size tags pulled from the user's free-text input.

use crate::analysis::rules::{all_matches, substring, word, KeywordRule};

pub const TAG_RULES: &[KeywordRule<&str>] = &[
    // Industry
    substring("startup", "Startup"),
    substring("スタートアップ", "Startup"),
    word("hr", "HR"),
    substring("human resources", "HR"),
    substring("人事", "HR"),
    substring("it company", "IT & Technology"),
    substring("it industry", "IT & Technology"),
    substring("software", "IT & Technology"),
    substring("technolog", "IT & Technology"),
    substring("技術", "IT & Technology"),
    substring("manufactur", "Manufacturing"),
    substring("factory", "Manufacturing"),
    substring("製造", "Manufacturing"),
    substring("工場", "Manufacturing"),
    substring("financ", "Finance"),
    substring("bank", "Finance"),
    substring("金融", "Finance"),
    substring("銀行", "Finance"),
    substring("healthcare", "Healthcare"),
    substring("medical", "Healthcare"),
    substring("hospital", "Healthcare"),
    substring("医療", "Healthcare"),
    substring("病院", "Healthcare"),
    // Company size
    substring("enterprise", "Enterprise"),
    substring("large company", "Enterprise"),
    substring("大企業", "Enterprise"),
    substring("大手", "Enterprise"),
    word("sme", "SME"),
    substring("mid-sized", "SME"),
    substring("中小企業", "SME"),
    substring("中堅", "SME"),
    substring("venture", "Venture"),
    substring("ベンチャー", "Venture"),
    substring("新興", "Venture"),
];

/// Distinct tags in table order.
pub fn extract_tags(user_input: &str) -> Vec<String> {
    all_matches(&user_input.to_lowercase(), TAG_RULES)
        .into_iter()
        .map(|tag| tag.to_string())
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_no_tags_for_plain_input() {
        assert!(extract_tags("A friendly bakery downtown").is_empty());
    }

    #[test]
    fn test_industry_and_size_tags_together() {
        let tags = extract_tags("A fintech startup, venture backed, working with banks");
        assert_eq!(tags, vec!["Startup", "Finance", "Venture"]);
    }

    #[test]
    fn test_short_tokens_need_word_boundaries() {
        assert_eq!(extract_tags("Our HR team"), vec!["HR"]);
        assert!(extract_tags("three chrome shrubs").is_empty());
    }

    #[test]
    fn test_japanese_input() {
        let tags = extract_tags("大手の製造業で、工場の技術者を募集");
        assert_eq!(tags, vec!["IT & Technology", "Manufacturing", "Enterprise"]);
    }

    #[test]
    fn test_repeated_tag_appears_once() {
        assert_eq!(extract_tags("hospital and medical healthcare"), vec!["Healthcare"]);
    }
}
