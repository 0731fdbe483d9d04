//! Word-frequency summarizer feeding the "word cloud" view.
//!
//! A deliberately naive tokenizer for mixed Chinese/English text: no CJK
//! segmentation, a fixed stop-word list, case-sensitive counting. The
//! output feeds a decorative view, so ranking stability matters more
//! than linguistic accuracy.

use std::collections::HashMap;

use crate::Record;

/// Maximum number of ranked terms returned.
const TOP_WORDS: usize = 40;

/// Punctuation treated as token separators, ASCII and common CJK forms.
const SEPARATORS: &str = ",，.。!！?？\"“'”()（）-—、：:";

/// Short function words in two languages, dropped before counting.
const STOP_WORDS: [&str; 27] = [
    "的", "了", "是", "在", "和", "有", "我", "去", "吃", "好", "都", "就", "今天", "这个",
    "那个", "Data", "Daily", "Food", "to", "the", "a", "and", "of", "in", "is", "it", "for",
];

/// Derives a ranked term list from the records' text.
///
/// Concatenates `content + " " + title + " " + category` across all
/// records, splits on whitespace and the separator set, drops numeric
/// tokens and stop words, counts the rest case-sensitively, and returns
/// the top 40 by descending count. Ties keep first-encountered order.
pub fn summarize(records: &[Record]) -> Vec<(String, usize)> {
    let text = records
        .iter()
        .map(|r| format!("{} {} {}", r.content, r.title, r.category))
        .collect::<Vec<_>>()
        .join(" ");

    let mut counts: Vec<(String, usize)> = Vec::new();
    let mut index: HashMap<String, usize> = HashMap::new();

    for token in text.split(|c: char| c.is_whitespace() || SEPARATORS.contains(c)) {
        if token.is_empty() || is_numeric(token) || STOP_WORDS.contains(&token) {
            continue;
        }

        match index.get(token) {
            Some(&i) => counts[i].1 += 1,
            None => {
                index.insert(token.to_string(), counts.len());
                counts.push((token.to_string(), 1));
            }
        }
    }

    // Stable sort keeps first-encountered order among equal counts
    counts.sort_by(|a, b| b.1.cmp(&a.1));
    counts.truncate(TOP_WORDS);
    counts
}

fn is_numeric(token: &str) -> bool {
    token.parse::<f64>().is_ok()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::Category;

    fn record(content: &str, title: &str, category: Category) -> Record {
        Record {
            id: "1".to_string(),
            title: title.to_string(),
            category,
            content: content.to_string(),
            image: None,
            date: 0,
            bg_color: None,
            sticker: None,
        }
    }

    #[test]
    fn dominant_token_ranks_first() {
        let records = vec![record(
            "咖啡 咖啡 咖啡, 散步。咖啡！书 咖啡",
            "周末",
            Category::Other,
        )];
        let ranked = summarize(&records);
        assert_eq!(ranked[0], ("咖啡".to_string(), 5));
    }

    #[test]
    fn output_never_exceeds_forty_terms() {
        let words: Vec<String> = (0..100).map(|i| format!("word{}x", i)).collect();
        let records = vec![record(&words.join(" "), "t", Category::Other)];
        assert_eq!(summarize(&records).len(), 40);
    }

    #[test]
    fn numeric_tokens_are_dropped() {
        let records = vec![record("123 45.6 -7 coffee", "t", Category::Other)];
        let ranked = summarize(&records);
        let terms: Vec<&str> = ranked.iter().map(|(w, _)| w.as_str()).collect();
        assert!(terms.contains(&"coffee"));
        assert!(!terms.contains(&"123"));
        assert!(!terms.contains(&"45.6"));
        // "-7" splits on '-' and leaves the bare number, also dropped
        assert!(!terms.contains(&"7"));
    }

    #[test]
    fn stop_words_are_dropped_in_both_languages() {
        let records = vec![record("我 去 吃 the ramen 了", "今天", Category::Other)];
        let ranked = summarize(&records);
        let terms: Vec<&str> = ranked.iter().map(|(w, _)| w.as_str()).collect();
        // Only "ramen" and the category label survive
        assert_eq!(terms, vec!["ramen", "其他"]);
    }

    #[test]
    fn counting_is_case_sensitive() {
        let records = vec![record("Ramen ramen Ramen", "t", Category::Other)];
        let ranked = summarize(&records);
        assert_eq!(ranked[0], ("Ramen".to_string(), 2));
        assert!(ranked.contains(&("ramen".to_string(), 1)));
    }

    #[test]
    fn cjk_punctuation_separates_tokens() {
        let records = vec![record("火锅，烤肉。火锅：烤肉（火锅）", "t", Category::Other)];
        let ranked = summarize(&records);
        assert_eq!(ranked[0], ("火锅".to_string(), 3));
        assert!(ranked.contains(&("烤肉".to_string(), 2)));
    }

    #[test]
    fn ties_keep_first_encountered_order() {
        let records = vec![record("alpha beta gamma", "t", Category::Other)];
        let ranked = summarize(&records);
        let terms: Vec<&str> = ranked
            .iter()
            .filter(|(_, n)| *n == 1)
            .map(|(w, _)| w.as_str())
            .collect();
        let alpha = terms.iter().position(|&w| w == "alpha").unwrap();
        let beta = terms.iter().position(|&w| w == "beta").unwrap();
        let gamma = terms.iter().position(|&w| w == "gamma").unwrap();
        assert!(alpha < beta && beta < gamma);
    }

    #[test]
    fn category_label_counts_toward_frequency() {
        let records = vec![record("", "", Category::Hobbies)];
        let ranked = summarize(&records);
        assert!(ranked.contains(&("爱好".to_string(), 1)));
    }
}
