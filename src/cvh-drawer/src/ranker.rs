//! Final ordering of match results

use std::cmp::Ordering;

use crate::matcher::MatchResult;

/// Ordering used for ranked output: score, then launches, then recency,
/// all descending
pub fn compare(a: &MatchResult<'_>, b: &MatchResult<'_>) -> Ordering {
    b.score
        .total_cmp(&a.score)
        .then_with(|| b.app.usage_count.cmp(&a.app.usage_count))
        .then_with(|| b.app.last_used.cmp(&a.app.last_used))
}

/// Sort results in place; full ties keep their input order
pub fn rank(results: &mut [MatchResult<'_>]) {
    results.sort_by(compare);
}
