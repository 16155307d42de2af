//! Text normalization shared by the scorers
//!
//! Comparison is plain case folding; no collation or accent stripping.

/// Case-fold text before comparison
pub fn fold(text: &str) -> String {
    text.to_lowercase()
}

/// True for empty and whitespace-only text
pub fn is_blank(text: &str) -> bool {
    text.trim().is_empty()
}

/// Length in characters, used for all score ratios
pub fn char_len(text: &str) -> usize {
    text.chars().count()
}
