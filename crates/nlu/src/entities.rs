//! Entity extraction
//!
//! Substring matching against known crop and season vocabularies.

use std::collections::HashMap;

/// Known crop entities
const CROP_NAMES: &[&str] = &[
    "paddy", "rice", "wheat", "maize", "corn", "sugarcane", "cotton",
    "tomato", "onion", "potato", "chilli", "pepper", "groundnut", "soybean",
    "mustard", "sunflower", "mango", "banana", "coconut", "tea", "coffee",
    "turmeric", "ginger", "garlic", "brinjal", "okra", "cabbage", "cauliflower",
];

/// Season vocabulary
const SEASONS: &[&str] = &["kharif", "rabi", "zaid", "monsoon", "summer", "winter"];

/// Extract entities (crops, seasons) from pivot-language text.
///
/// The "crops" key is always present (possibly empty); "seasons" only
/// when at least one season is mentioned.
pub fn extract_entities(text: &str) -> HashMap<String, Vec<String>> {
    let text_lower = text.to_lowercase();

    let mut crops: Vec<String> = CROP_NAMES
        .iter()
        .filter(|crop| text_lower.contains(*crop))
        .map(|crop| crop.to_string())
        .collect();

    // "rice" and "paddy" are the same crop; keep only "rice"
    if crops.iter().any(|c| c == "rice") {
        crops.retain(|c| c != "paddy");
    }

    let mut entities = HashMap::new();
    entities.insert("crops".to_string(), crops);

    let seasons: Vec<String> = SEASONS
        .iter()
        .filter(|season| text_lower.contains(*season))
        .map(|season| season.to_string())
        .collect();
    if !seasons.is_empty() {
        entities.insert("seasons".to_string(), seasons);
    }

    entities
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_extracts_crops() {
        let entities = extract_entities("How to grow rice and wheat?");
        assert_eq!(entities["crops"], vec!["rice", "wheat"]);
    }

    #[test]
    fn test_rice_paddy_dedup() {
        let entities = extract_entities("paddy or rice cultivation");
        assert_eq!(entities["crops"], vec!["rice"]);
    }

    #[test]
    fn test_paddy_alone_survives() {
        let entities = extract_entities("paddy cultivation");
        assert_eq!(entities["crops"], vec!["paddy"]);
    }

    #[test]
    fn test_seasons_key_only_when_present() {
        let with = extract_entities("sowing in kharif season");
        assert_eq!(with["seasons"], vec!["kharif"]);

        let without = extract_entities("how to grow rice");
        assert!(!without.contains_key("seasons"));
    }

    #[test]
    fn test_no_entities() {
        let entities = extract_entities("hello there");
        assert!(entities["crops"].is_empty());
    }

    #[test]
    fn test_case_insensitive() {
        let entities = extract_entities("TOMATO price in Monsoon");
        assert_eq!(entities["crops"], vec!["tomato"]);
        assert_eq!(entities["seasons"], vec!["monsoon"]);
    }
}
