//! Cache key fingerprinting
//!
//! The key must be purely a function of (query, context, language) so
//! identical requests always fingerprint identically; the cache's whole
//! purpose rests on that idempotence.

use sha2::{Digest, Sha256};

/// Compute the deterministic cache key for a query.
///
/// The query is trimmed and lowercased; context and language go in raw.
/// SHA-256 keeps collision probability negligible for any realistic
/// corpus size.
pub fn fingerprint(query: &str, context: &str, language: &str) -> String {
    let normalized = query.trim().to_lowercase();
    let input = format!("{normalized}|{context}|{language}");

    let mut hasher = Sha256::new();
    hasher.update(input.as_bytes());
    let digest = hasher.finalize();

    let mut out = String::with_capacity(digest.len() * 2);
    for byte in digest {
        out.push_str(&format!("{byte:02x}"));
    }
    out
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_deterministic() {
        let a = fingerprint("How to grow rice?", "ctx", "en");
        let b = fingerprint("How to grow rice?", "ctx", "en");
        assert_eq!(a, b);
    }

    #[test]
    fn test_query_normalization() {
        // Case and surrounding whitespace do not change the key
        assert_eq!(
            fingerprint("  How To Grow RICE?  ", "", "en"),
            fingerprint("how to grow rice?", "", "en"),
        );
    }

    #[test]
    fn test_any_input_changes_key() {
        let base = fingerprint("q", "c", "en");
        assert_ne!(fingerprint("q2", "c", "en"), base);
        assert_ne!(fingerprint("q", "c2", "en"), base);
        assert_ne!(fingerprint("q", "c", "hi"), base);
    }

    #[test]
    fn test_hex_digest_shape() {
        let key = fingerprint("q", "", "en");
        assert_eq!(key.len(), 64);
        assert!(key.chars().all(|c| c.is_ascii_hexdigit()));
    }
}
