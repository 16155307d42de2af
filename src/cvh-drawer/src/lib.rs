//! CVH Drawer - ranked application search
//!
//! Given a typed query and the installed applications, produces a
//! score-ranked list of matches. Matching tries, in order: exact name,
//! alias, name prefix, name substring, package id, phone-keypad (T9) digits
//! and finally edit-distance similarity.
//!
//! The engine is a pure function over the records it is handed. Discovery,
//! persistence and the terminal front-end live in [`apps`], [`store`] and
//! the `cvh-drawer` binary.

pub mod apps;
pub mod browse;
pub mod config;
pub mod fuzzy;
pub mod matcher;
pub mod normalize;
pub mod ranker;
pub mod record;
pub mod store;
pub mod t9;

pub use browse::{browse, Sections};
pub use matcher::{MatchKind, MatchResult};
pub use record::AppRecord;

/// Search `candidates` for `query`, best match first
///
/// Blank queries return nothing. Hidden apps never appear, and each app
/// appears at most once.
pub fn search<'a>(query: &str, candidates: &'a [AppRecord]) -> Vec<MatchResult<'a>> {
    let mut results = matcher::collect(query, candidates);
    ranker::rank(&mut results);

    tracing::debug!(
        query,
        candidates = candidates.len(),
        matches = results.len(),
        "search complete"
    );

    results
}
