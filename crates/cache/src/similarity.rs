//! Query similarity for fuzzy cache reuse

use std::collections::HashSet;

/// Jaccard similarity between the lowercase word sets of two strings:
/// `|A ∩ B| / |A ∪ B|`. Returns 0.0 when both are empty.
pub fn jaccard(a: &str, b: &str) -> f64 {
    let set_a: HashSet<String> = a.to_lowercase().split_whitespace().map(String::from).collect();
    let set_b: HashSet<String> = b.to_lowercase().split_whitespace().map(String::from).collect();

    let union = set_a.union(&set_b).count();
    if union == 0 {
        return 0.0;
    }
    let intersection = set_a.intersection(&set_b).count();
    intersection as f64 / union as f64
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_identical() {
        assert_eq!(jaccard("how to grow rice", "how to grow rice"), 1.0);
    }

    #[test]
    fn test_case_insensitive() {
        assert_eq!(jaccard("Grow RICE", "grow rice"), 1.0);
    }

    #[test]
    fn test_disjoint() {
        assert_eq!(jaccard("wheat blight", "tomato price"), 0.0);
    }

    #[test]
    fn test_partial_overlap() {
        // {how, to, grow, rice} vs {how, to, grow, wheat}: 3 shared of 5 total
        let sim = jaccard("how to grow rice", "how to grow wheat");
        assert!((sim - 0.6).abs() < 1e-9);
    }

    #[test]
    fn test_both_empty() {
        assert_eq!(jaccard("", ""), 0.0);
    }
}
