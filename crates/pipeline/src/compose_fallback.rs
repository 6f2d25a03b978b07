//! Deterministic answer fallback
//!
//! When the composition collaborator is unreachable, a smart truncation
//! of the top retrieved document stands in for a composed answer: the
//! first two substantial clauses, never the raw chunk.

use agri_voice_core::Document;
use agri_voice_config::constants::pipeline::{
    FALLBACK_ANSWER_MAX_CHARS, FALLBACK_MIN_CLAUSE_CHARS,
};

/// Sentinel when there is nothing to truncate
const NO_ANSWER: &str = "Sorry, I couldn't process your question right now. Please try again.";

/// Build a degraded answer from the top retrieved document.
///
/// Splits the text on sentence delimiters, keeps clauses longer than 15
/// chars, and joins the first two. Falls back to the single first clause
/// when the pair runs long, and to a raw truncation when no clause
/// qualifies.
pub fn fallback_answer(retrieved: &[Document]) -> String {
    let top = match retrieved.first() {
        Some(doc) => doc.text.trim(),
        None => return NO_ANSWER.to_string(),
    };
    if top.is_empty() {
        return NO_ANSWER.to_string();
    }

    let flattened = top.replace('\n', ". ");
    let clauses: Vec<&str> = flattened
        .split(['.', '!', '?', ';'])
        .map(str::trim)
        .filter(|clause| clause.len() > FALLBACK_MIN_CLAUSE_CHARS)
        .collect();

    if clauses.is_empty() {
        let truncated: String = top.chars().take(FALLBACK_ANSWER_MAX_CHARS).collect();
        return truncated;
    }

    let take = clauses.len().min(2);
    let joined = format!("{}.", clauses[..take].join(". "));
    if joined.len() > FALLBACK_ANSWER_MAX_CHARS {
        format!("{}.", clauses[0])
    } else {
        joined
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_no_documents() {
        assert_eq!(fallback_answer(&[]), NO_ANSWER);
    }

    #[test]
    fn test_takes_first_two_clauses() {
        let doc = Document::new(
            "Rice needs standing water in puddled fields. Transplant after 20 days in a \
             nursery. Apply nitrogen in split doses.",
            "built-in",
            0.5,
        );
        let answer = fallback_answer(&[doc]);
        assert_eq!(
            answer,
            "Rice needs standing water in puddled fields. Transplant after 20 days in a nursery."
        );
    }

    #[test]
    fn test_skips_short_clauses() {
        let doc = Document::new("Yes. No. Crop rotation reduces pest and weed pressure over seasons.", "built-in", 0.5);
        let answer = fallback_answer(&[doc]);
        assert_eq!(
            answer,
            "Crop rotation reduces pest and weed pressure over seasons."
        );
    }

    #[test]
    fn test_long_pair_falls_back_to_first_clause() {
        let first = "a".repeat(120);
        let second = "b".repeat(120);
        let doc = Document::new(format!("{first}. {second}."), "built-in", 0.5);
        let answer = fallback_answer(&[doc]);
        assert_eq!(answer, format!("{first}."));
    }

    #[test]
    fn test_no_qualifying_clause_raw_truncates() {
        let doc = Document::new("short. bits. only.", "built-in", 0.5);
        let answer = fallback_answer(&[doc]);
        assert_eq!(answer, "short. bits. only.");
    }

    #[test]
    fn test_deterministic() {
        let doc = Document::new("Irrigation is the artificial application of water to soil. Drip systems save water.", "built-in", 0.5);
        assert_eq!(fallback_answer(&[doc.clone()]), fallback_answer(&[doc]));
    }
}
