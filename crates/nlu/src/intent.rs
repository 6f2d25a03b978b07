//! Intent detection
//!
//! Scores each intent by keyword matches against a fixed priority-ordered
//! table. Highest confidence wins; ties go to the earliest-declared
//! intent because later candidates must score strictly higher to replace
//! the current best.

use serde::Serialize;

/// Default intent when nothing matches
pub const GENERAL_QUERY: &str = "general_query";

/// Confidence assigned to the default intent
const GENERAL_CONFIDENCE: f32 = 0.5;

/// Confidence bonus per keyword match beyond the first
const MATCH_BONUS: f32 = 0.03;

/// Confidence ceiling
const MAX_CONFIDENCE: f32 = 0.99;

/// Intent patterns in priority order: (intent, keywords, base confidence)
const INTENT_PATTERNS: &[(&str, &[&str], f32)] = &[
    (
        "market_query",
        &["price", "mandi", "market", "cost", "rate", "buy", "sell"],
        0.85,
    ),
    (
        "pest_control",
        &["pest", "insect", "disease", "fungus", "worm", "blight", "rot", "spray"],
        0.90,
    ),
    (
        "crop_advice",
        &["grow", "plant", "seed", "sow", "harvest", "crop", "variety", "yield"],
        0.88,
    ),
    (
        "fertilizer",
        &["fertilizer", "manure", "urea", "npk", "compost", "nutrient", "soil health"],
        0.90,
    ),
    (
        "irrigation",
        &["water", "irrigat", "drip", "sprinkler", "rain", "drought", "moisture"],
        0.88,
    ),
    (
        "weather",
        &["weather", "rain", "temperature", "forecast", "monsoon", "climate"],
        0.85,
    ),
    (
        "scheme_query",
        &["scheme", "subsidy", "government", "loan", "insurance", "pm kisan"],
        0.85,
    ),
];

/// Result of intent classification
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct IntentResult {
    pub intent: String,
    /// Confidence in [0, 1], rounded to two decimals
    pub confidence: f32,
}

/// Classify the intent of a pivot-language query.
///
/// More keyword matches raise confidence; with no match at all the
/// result is `general_query` at 0.5.
pub fn detect_intent(text: &str) -> IntentResult {
    let text_lower = text.to_lowercase();

    let mut best_intent = GENERAL_QUERY;
    let mut best_confidence = GENERAL_CONFIDENCE;

    for &(intent, keywords, base) in INTENT_PATTERNS {
        let matches = keywords.iter().filter(|kw| text_lower.contains(*kw)).count();
        if matches > 0 {
            let confidence = (base + (matches as f32 - 1.0) * MATCH_BONUS).min(MAX_CONFIDENCE);
            // Strictly greater: earlier-declared intents win ties
            if confidence > best_confidence {
                best_confidence = confidence;
                best_intent = intent;
            }
        }
    }

    IntentResult {
        intent: best_intent.to_string(),
        confidence: round2(best_confidence),
    }
}

fn round2(x: f32) -> f32 {
    (x * 100.0).round() / 100.0
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_no_match_is_general_query() {
        let result = detect_intent("hello there friend");
        assert_eq!(result.intent, GENERAL_QUERY);
        assert_eq!(result.confidence, 0.5);
    }

    #[test]
    fn test_single_keyword() {
        let result = detect_intent("best fertilizer for tomato");
        assert_eq!(result.intent, "fertilizer");
        assert_eq!(result.confidence, 0.9);
    }

    #[test]
    fn test_multiple_matches_raise_confidence() {
        // "price" + "mandi" + "market" = base 0.85 + 2 * 0.03
        let result = detect_intent("mandi price in the market today");
        assert_eq!(result.intent, "market_query");
        assert_eq!(result.confidence, 0.91);
    }

    #[test]
    fn test_confidence_capped() {
        let result = detect_intent("pest insect disease fungus worm blight rot spray");
        assert_eq!(result.intent, "pest_control");
        assert_eq!(result.confidence, 0.99);
    }

    #[test]
    fn test_tie_goes_to_earlier_intent() {
        // "rate" (market_query) and "monsoon" (weather) both score a
        // single match at base 0.85; the earlier-declared intent wins.
        let result = detect_intent("rate during monsoon");
        assert_eq!(result.intent, "market_query");
    }

    #[test]
    fn test_deterministic() {
        let a = detect_intent("how to grow rice in kharif");
        let b = detect_intent("how to grow rice in kharif");
        assert_eq!(a, b);
    }
}
