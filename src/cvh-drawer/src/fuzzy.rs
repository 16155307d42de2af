//! Edit-distance scoring for typo tolerance

/// Levenshtein distance with unit cost for insert, delete and substitute
///
/// Counts `char`s, not bytes.
pub fn levenshtein(a: &str, b: &str) -> usize {
    strsim::levenshtein(a, b)
}

/// Similarity in [0, 1]: `1 - distance / longest length`
///
/// Two empty strings are identical and score 1.
pub fn score(query: &str, name: &str) -> f32 {
    let longest = query.chars().count().max(name.chars().count());
    if longest == 0 {
        return 1.0;
    }

    1.0 - levenshtein(query, name) as f32 / longest as f32
}
