//! Phone keypad (T9) scoring
//!
//! A digit query such as `4624` matches names whose letters fall, in order,
//! into the keypad groups of each digit (`g`, `m`, `a`, `i` for "gmail").

/// Letters printed on each keypad digit, indexed by the digit value
static KEYPAD: [&str; 10] = [
    "", "", "abc", "def", "ghi", "jkl", "mno", "pqrs", "tuv", "wxyz",
];

/// Letters for a keypad digit; `0`, `1` and non-digits have none
pub fn letters(digit: char) -> &'static str {
    digit
        .to_digit(10)
        .map(|d| KEYPAD[d as usize])
        .unwrap_or("")
}

/// True when every character is an ASCII digit
pub fn is_digit_query(query: &str) -> bool {
    !query.is_empty() && query.chars().all(|c| c.is_ascii_digit())
}

/// Score a digit query against an already case-folded name
///
/// Walks the name once, consuming a query digit each time the current name
/// character is one of its letters. Returns the matched fraction of the
/// query when every digit was consumed, otherwise 0.
pub fn score(query: &str, name: &str) -> f32 {
    let digits: Vec<char> = query.chars().collect();
    if digits.is_empty() || digits.len() > name.chars().count() {
        return 0.0;
    }

    let mut next = 0;
    let mut matched = 0usize;

    for c in name.chars() {
        if next == digits.len() {
            break;
        }
        if letters(digits[next]).contains(c) {
            matched += 1;
            next += 1;
        }
    }

    if next == digits.len() {
        matched as f32 / digits.len() as f32
    } else {
        0.0
    }
}
