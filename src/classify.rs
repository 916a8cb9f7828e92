//! Keyword-weighted topic classification.
//!
//! Scores free text against a fixed taxonomy. For each topic, every keyword
//! contributes the number of exact token matches in the stop-word-filtered
//! token sequence plus the number of raw substring occurrences in the full
//! lowercased text (the substring pass is what catches multi-word keywords
//! like "artificial intelligence"). The per-topic sum is normalized by the
//! topic's keyword count, and topics whose mean score exceeds 0.5 are
//! assigned alongside the source's default topic.
//!
//! This is deliberately not machine-learning-grade: it is cheap, deterministic,
//! and good enough to route articles onto topic pages.

use itertools::Itertools;

/// Score a topic must exceed to be assigned (default topic is always assigned).
const SCORE_THRESHOLD: f64 = 0.5;

/// All topics the classifier can assign.
pub const TOPICS: &[&str] = &[
    "politics",
    "business",
    "technology",
    "entertainment",
    "sports",
    "science",
    "health",
    "world",
    "general",
];

/// Keywords per topic. "general" has no keywords; it is only ever assigned
/// as a default topic.
const TOPIC_KEYWORDS: &[(&str, &[&str])] = &[
    (
        "politics",
        &[
            "government", "election", "president", "democracy", "vote", "parliament",
            "minister", "policy", "political", "campaign", "senator", "congress",
        ],
    ),
    (
        "business",
        &[
            "economy", "market", "stock", "trade", "company", "industry", "corporate",
            "finance", "investor", "economic", "startup", "ceo", "profit", "revenue",
        ],
    ),
    (
        "technology",
        &[
            "tech", "software", "computer", "digital", "internet", "app", "cyber",
            "innovation", "ai", "artificial intelligence", "robot", "smartphone", "gadget",
        ],
    ),
    (
        "entertainment",
        &[
            "movie", "film", "actor", "celebrity", "music", "star", "hollywood", "tv",
            "television", "show", "concert", "award", "artist", "drama",
        ],
    ),
    (
        "sports",
        &[
            "game", "player", "team", "championship", "tournament", "match", "athlete",
            "coach", "league", "soccer", "football", "basketball", "baseball", "tennis",
        ],
    ),
    (
        "science",
        &[
            "research", "study", "scientist", "discovery", "space", "physics", "chemistry",
            "biology", "experiment", "nasa", "planet", "climate", "environment",
        ],
    ),
    (
        "health",
        &[
            "medical", "disease", "doctor", "patient", "hospital", "treatment", "drug",
            "healthcare", "cancer", "covid", "virus", "vaccine", "medicine", "wellness",
        ],
    ),
    (
        "world",
        &[
            "international", "global", "foreign", "country", "nation", "diplomatic",
            "treaty", "war", "peace", "border", "immigration", "refugee", "united nations",
        ],
    ),
];

/// English stop words removed before token matching.
const STOP_WORDS: &[&str] = &[
    "a", "about", "above", "after", "again", "against", "all", "am", "an", "and", "any",
    "are", "as", "at", "be", "because", "been", "before", "being", "below", "between",
    "both", "but", "by", "can", "did", "do", "does", "doing", "down", "during", "each",
    "few", "for", "from", "further", "had", "has", "have", "having", "he", "her", "here",
    "hers", "him", "his", "how", "i", "if", "in", "into", "is", "it", "its", "just",
    "me", "more", "most", "my", "no", "nor", "not", "now", "of", "off", "on", "once",
    "only", "or", "other", "our", "out", "over", "own", "same", "she", "should", "so",
    "some", "such", "than", "that", "the", "their", "them", "then", "there", "these",
    "they", "this", "those", "through", "to", "too", "under", "until", "up", "very",
    "was", "we", "were", "what", "when", "where", "which", "while", "who", "whom",
    "why", "will", "with", "you", "your",
];

pub(crate) fn is_stop_word(word: &str) -> bool {
    STOP_WORDS.contains(&word)
}

/// Lowercase alphabetic tokens with stop words removed.
pub(crate) fn tokens(text: &str) -> Vec<String> {
    text.to_lowercase()
        .split(|c: char| !c.is_alphabetic())
        .filter(|t| !t.is_empty() && !is_stop_word(t))
        .map(|t| t.to_string())
        .collect()
}

/// Classify an article by its title and body.
///
/// Returns a non-empty, deduplicated topic set that always contains
/// `default_topic`. Ties are not broken: every topic whose normalized score
/// exceeds the threshold is included.
pub fn classify(title: &str, body: &str, default_topic: &str) -> Vec<String> {
    let text = format!("{} {}", title, body).to_lowercase();
    let filtered = tokens(&text);

    let mut categories = vec![default_topic.to_string()];
    for (topic, keywords) in TOPIC_KEYWORDS {
        if *topic == default_topic {
            continue;
        }
        let raw: usize = keywords
            .iter()
            .map(|keyword| {
                let token_hits = filtered.iter().filter(|t| t == keyword).count();
                let substring_hits = text.matches(keyword).count();
                token_hits + substring_hits
            })
            .sum();
        let score = raw as f64 / keywords.len() as f64;
        if score > SCORE_THRESHOLD {
            categories.push(topic.to_string());
        }
    }

    categories.into_iter().unique().collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_always_contains_default_topic() {
        let result = classify("", "", "general");
        assert_eq!(result, vec!["general"]);

        let result = classify("Anything at all", "some unrelated words", "sports");
        assert!(result.contains(&"sports".to_string()));
        assert!(!result.is_empty());
    }

    #[test]
    fn test_strong_signal_assigns_topic() {
        // Every sports keyword appears, so the mean score is well above 0.5.
        let body = "The game saw the player lead his team to the championship in a \
                    tournament match. The athlete thanked his coach as the league \
                    celebrated great soccer, football, basketball, baseball and tennis.";
        let result = classify("Final night", body, "general");
        assert!(result.contains(&"sports".to_string()));
        assert!(result.contains(&"general".to_string()));
    }

    #[test]
    fn test_weak_signal_is_below_threshold() {
        // Three politics keywords once each against a 12-term list does not
        // clear the 0.5 mean, so politics must not be assigned.
        let body = "The president spoke about the election and urged citizens to vote.";
        let result = classify("Speech", body, "general");
        assert!(!result.contains(&"politics".to_string()));
    }

    #[test]
    fn test_weak_signal_kept_when_default() {
        let body = "The president spoke about the election and urged citizens to vote.";
        let result = classify("Speech", body, "politics");
        assert!(result.contains(&"politics".to_string()));
    }

    #[test]
    fn test_multi_word_keyword_matches_as_substring() {
        let body = "artificial intelligence ".repeat(10);
        let result = classify("AI everywhere", &body, "general");
        assert!(result.contains(&"technology".to_string()));
    }

    #[test]
    fn test_no_duplicate_topics() {
        let body = "tech software computer digital internet app cyber innovation \
                    ai robot smartphone gadget"
            .repeat(3);
        let result = classify("Gadgets", &body, "technology");
        let unique: std::collections::HashSet<_> = result.iter().collect();
        assert_eq!(unique.len(), result.len());
    }

    #[test]
    fn test_tokens_filters_stop_words_and_non_alpha() {
        let toks = tokens("The quick brown fox, 42 times over the lazy dog!");
        assert!(!toks.contains(&"the".to_string()));
        assert!(!toks.iter().any(|t| t.chars().any(|c| c.is_numeric())));
        assert!(toks.contains(&"quick".to_string()));
        assert!(toks.contains(&"fox".to_string()));
    }
}
