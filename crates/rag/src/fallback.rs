//! Built-in knowledge fallback
//!
//! A small fixed knowledge set used only when the vector index is empty
//! or unreachable, ranked by crude keyword overlap. Good enough to keep
//! the pipeline answering while the corpus is being ingested.

use agri_voice_core::Document;
use once_cell::sync::Lazy;

/// Score awarded per matched query term
const TERM_WEIGHT: f32 = 3.0;

/// Query words ignored during scoring
const STOP_WORDS: &[&str] = &[
    "the", "is", "are", "what", "how", "do", "i", "a", "an", "to", "in", "for",
    "of", "and", "or", "about", "tell", "me", "can", "you",
];

/// Minimal built-in agricultural knowledge
pub static FALLBACK_KNOWLEDGE: Lazy<Vec<Document>> = Lazy::new(|| {
    vec![
        Document::new(
            "Rice is best grown in puddled fields with standing water. Raise seedlings in a \
             nursery for 20 to 25 days, then transplant into well-levelled soil with good \
             water retention. Rice needs warm temperatures and responds well to split doses \
             of nitrogen during tillering and panicle initiation.",
            "built-in",
            0.5,
        ),
        Document::new(
            "Crop rotation is the practice of alternating different types of culture in the \
             same field across seasons. It reduces reliance on one set of nutrients, breaks \
             pest and weed cycles, and lowers the probability of resistant pests developing.",
            "built-in",
            0.5,
        ),
        Document::new(
            "Irrigation is the artificial application of water to soil. Common methods are \
             drip irrigation, sprinkler systems, surface irrigation and sub-irrigation; drip \
             systems save the most water and suit row vegetables and orchards.",
            "built-in",
            0.5,
        ),
        Document::new(
            "Soil health is the continued capacity of soil to function as a living ecosystem. \
             Test pH regularly, add organic matter such as compost or farmyard manure, and \
             minimize tillage to preserve soil structure and beneficial organisms.",
            "built-in",
            0.5,
        ),
        Document::new(
            "Integrated pest management combines monitoring, biological control, resistant \
             varieties and targeted spraying as a last resort. Scout fields weekly, identify \
             the pest before acting, and rotate chemical classes to avoid resistance.",
            "built-in",
            0.5,
        ),
    ]
});

/// Rank the built-in knowledge by keyword overlap with the query.
///
/// Score = 3 x the number of distinct non-stopword query terms (longer
/// than 2 chars, punctuation-trimmed) appearing in the candidate text;
/// ties preserve the knowledge set's declaration order. All-zero scores
/// return the first `k` entries unchanged.
pub fn keyword_search(query: &str, k: usize) -> Vec<Document> {
    let query_lower = query.to_lowercase();
    let terms: Vec<&str> = query_lower
        .split_whitespace()
        .map(|w| w.trim_matches(|c: char| !c.is_alphanumeric()))
        .filter(|w| w.len() > 2 && !STOP_WORDS.contains(w))
        .collect();

    let mut scored: Vec<Document> = FALLBACK_KNOWLEDGE
        .iter()
        .map(|doc| {
            let text_lower = doc.text.to_lowercase();
            let matched = terms.iter().filter(|term| text_lower.contains(**term)).count();
            Document::new(&doc.text, &doc.source, matched as f32 * TERM_WEIGHT)
        })
        .collect();

    // Stable sort keeps declaration order on ties
    scored.sort_by(|a, b| b.score.partial_cmp(&a.score).unwrap_or(std::cmp::Ordering::Equal));

    if scored.first().map(|doc| doc.score) == Some(0.0) {
        return FALLBACK_KNOWLEDGE.iter().take(k).cloned().collect();
    }

    scored.truncate(k);
    scored
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_rice_query_ranks_rice_first() {
        let results = keyword_search("How to grow rice?", 5);
        assert!(!results.is_empty());
        assert!(results[0].text.starts_with("Rice is best grown"));
        assert!(results[0].score > 0.0);
    }

    #[test]
    fn test_score_is_three_per_term() {
        // "drip" and "irrigation" both hit the irrigation entry
        let results = keyword_search("drip irrigation methods", 5);
        assert!(results[0].text.contains("drip irrigation"));
        assert!(results[0].score >= 6.0);
    }

    #[test]
    fn test_no_match_returns_entries_unchanged() {
        let results = keyword_search("quantum blockchain", 3);
        assert_eq!(results.len(), 3);
        assert_eq!(results[0].text, FALLBACK_KNOWLEDGE[0].text);
        assert_eq!(results[0].score, 0.5);
    }

    #[test]
    fn test_respects_k() {
        let results = keyword_search("soil water pest", 2);
        assert_eq!(results.len(), 2);
    }

    #[test]
    fn test_punctuation_trimmed_from_terms() {
        // "rice?" must still match the rice entry
        let with_punct = keyword_search("grow rice?", 5);
        let without = keyword_search("grow rice", 5);
        assert_eq!(with_punct[0].text, without[0].text);
        assert_eq!(with_punct[0].score, without[0].score);
    }
}
