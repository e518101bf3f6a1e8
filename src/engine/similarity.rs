//! Edit-distance similarity between invoice codes

/// `1 - levenshtein(a, b) / max(len(a), len(b))`, counted in characters
///
/// Two empty codes are identical (1.0).
pub fn code_similarity(a: &str, b: &str) -> f64 {
    strsim::normalized_levenshtein(a, b)
}
