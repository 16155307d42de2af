//! Per-candidate match classification
//!
//! Each visible candidate is tested against an ordered list of rules; the
//! first rule that fires decides its kind and score, and a candidate that
//! fires none is dropped.

use serde::Serialize;

use crate::normalize;
use crate::record::AppRecord;
use crate::{fuzzy, t9};

const EXACT_SCORE: f32 = 1.0;
const ALIAS_SCORE: f32 = 0.95;
const START_BASE: f32 = 0.9;
const START_PENALTY: f32 = 0.1;
const CONTAINS_BASE: f32 = 0.8;
const CONTAINS_PENALTY: f32 = 0.2;
const PACKAGE_SCORE: f32 = 0.7;
const T9_THRESHOLD: f32 = 0.5;
const T9_WEIGHT: f32 = 0.6;
const FUZZY_THRESHOLD: f32 = 0.4;
const FUZZY_WEIGHT: f32 = 0.5;

/// Which rule produced a match
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum MatchKind {
    ExactName,
    Alias,
    StartName,
    ContainsName,
    PackageName,
    T9,
    Fuzzy,
}

impl MatchKind {
    /// Rules in evaluation order, highest priority first
    pub const RULES: [MatchKind; 7] = [
        MatchKind::ExactName,
        MatchKind::Alias,
        MatchKind::StartName,
        MatchKind::ContainsName,
        MatchKind::PackageName,
        MatchKind::T9,
        MatchKind::Fuzzy,
    ];

    pub fn label(self) -> &'static str {
        match self {
            MatchKind::ExactName => "exact",
            MatchKind::Alias => "alias",
            MatchKind::StartName => "prefix",
            MatchKind::ContainsName => "contains",
            MatchKind::PackageName => "package",
            MatchKind::T9 => "t9",
            MatchKind::Fuzzy => "fuzzy",
        }
    }

    /// Score `target` under this rule, or `None` if the rule does not fire
    fn evaluate(self, query: &Query, target: &Target) -> Option<f32> {
        match self {
            MatchKind::ExactName => (target.name == query.text).then_some(EXACT_SCORE),
            MatchKind::Alias => {
                (target.alias.as_deref() == Some(query.text.as_str())).then_some(ALIAS_SCORE)
            }
            MatchKind::StartName => target
                .name
                .starts_with(&query.text)
                .then(|| target.ratio(query))
                .flatten()
                .map(|ratio| START_BASE - ratio * START_PENALTY),
            MatchKind::ContainsName => target
                .name
                .contains(&query.text)
                .then(|| target.ratio(query))
                .flatten()
                .map(|ratio| CONTAINS_BASE - ratio * CONTAINS_PENALTY),
            MatchKind::PackageName => {
                target.package.contains(&query.text).then_some(PACKAGE_SCORE)
            }
            MatchKind::T9 => {
                if !query.digits {
                    return None;
                }
                let score = t9::score(&query.text, &target.name);
                (score > T9_THRESHOLD).then_some(score * T9_WEIGHT)
            }
            MatchKind::Fuzzy => {
                let score = fuzzy::score(&query.text, &target.name);
                (score > FUZZY_THRESHOLD).then_some(score * FUZZY_WEIGHT)
            }
        }
    }
}

/// A classified candidate
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct MatchResult<'a> {
    pub app: &'a AppRecord,
    pub kind: MatchKind,
    /// Always within [0, 1]
    pub score: f32,
}

/// A non-blank, case-folded query
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Query {
    text: String,
    len: usize,
    digits: bool,
}

impl Query {
    /// Returns `None` for empty or whitespace-only input
    pub fn parse(raw: &str) -> Option<Self> {
        if normalize::is_blank(raw) {
            return None;
        }

        let text = normalize::fold(raw);
        Some(Self {
            len: normalize::char_len(&text),
            digits: t9::is_digit_query(&text),
            text,
        })
    }

    pub fn as_str(&self) -> &str {
        &self.text
    }
}

/// Case-folded fields of one candidate
struct Target {
    name: String,
    name_len: usize,
    alias: Option<String>,
    package: String,
}

impl Target {
    fn new(app: &AppRecord) -> Self {
        let name = normalize::fold(&app.app_name);
        Self {
            name_len: normalize::char_len(&name),
            name,
            alias: app.alias.as_deref().map(normalize::fold),
            package: normalize::fold(&app.package_name),
        }
    }

    /// Share of the name covered by the query; `None` for an empty name
    fn ratio(&self, query: &Query) -> Option<f32> {
        (self.name_len > 0).then(|| query.len as f32 / self.name_len as f32)
    }
}

/// Classify one candidate: the first rule that fires wins
///
/// Hidden apps never match.
pub fn classify<'a>(query: &Query, app: &'a AppRecord) -> Option<MatchResult<'a>> {
    if app.is_hidden {
        return None;
    }

    let target = Target::new(app);
    MatchKind::RULES.iter().find_map(|&kind| {
        kind.evaluate(query, &target)
            .map(|score| MatchResult { app, kind, score })
    })
}

/// Classify every candidate, in candidate order and unranked
pub fn collect<'a>(query: &str, candidates: &'a [AppRecord]) -> Vec<MatchResult<'a>> {
    let Some(query) = Query::parse(query) else {
        return Vec::new();
    };

    candidates
        .iter()
        .filter_map(|app| classify(&query, app))
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn classify_one(query: &str, app: &AppRecord) -> Option<(MatchKind, f32)> {
        let query = Query::parse(query)?;
        classify(&query, app).map(|m| (m.kind, m.score))
    }

    fn assert_close(actual: f32, expected: f32) {
        assert!(
            (actual - expected).abs() < 1e-5,
            "expected {expected}, got {actual}"
        );
    }

    #[test]
    fn test_blank_query_does_not_parse() {
        assert!(Query::parse("").is_none());
        assert!(Query::parse("   ").is_none());
        assert_eq!(Query::parse("FaceBook").unwrap().as_str(), "facebook");
    }

    #[test]
    fn test_exact_name_any_case() {
        let app = AppRecord::new("com.facebook.katana", "Facebook");
        for q in ["Facebook", "facebook", "FACEBOOK"] {
            assert_eq!(classify_one(q, &app), Some((MatchKind::ExactName, 1.0)));
        }
    }

    #[test]
    fn test_alias() {
        let app = AppRecord::new("com.spotify.music", "Spotify").with_alias("Tunes");
        assert_eq!(classify_one("tunes", &app), Some((MatchKind::Alias, 0.95)));
    }

    #[test]
    fn test_exact_name_beats_alias() {
        let app = AppRecord::new("x.y", "Notes").with_alias("notes");
        assert_eq!(classify_one("notes", &app).unwrap().0, MatchKind::ExactName);
    }

    #[test]
    fn test_start_name_score() {
        let app = AppRecord::new("com.facebook.katana", "Facebook");
        let (kind, score) = classify_one("Face", &app).unwrap();
        assert_eq!(kind, MatchKind::StartName);
        assert_close(score, 0.9 - 0.5 * 0.1);
    }

    #[test]
    fn test_contains_name_score() {
        let app = AppRecord::new("com.facebook.katana", "Facebook");
        let (kind, score) = classify_one("book", &app).unwrap();
        assert_eq!(kind, MatchKind::ContainsName);
        assert_close(score, 0.8 - 0.5 * 0.2);
    }

    #[test]
    fn test_package_name() {
        let app = AppRecord::new("com.google.android.gm", "Gmail");
        assert_eq!(
            classify_one("android.gm", &app),
            Some((MatchKind::PackageName, 0.7))
        );
    }

    #[test]
    fn test_t9() {
        let app = AppRecord::new("com.google.android.gm", "Gmail");
        let (kind, score) = classify_one("4624", &app).unwrap();
        assert_eq!(kind, MatchKind::T9);
        assert_close(score, 0.6);
    }

    #[test]
    fn test_digits_in_name_match_before_t9() {
        let app = AppRecord::new("org.example.app2048", "2048");
        assert_eq!(classify_one("204", &app).unwrap().0, MatchKind::StartName);
    }

    #[test]
    fn test_failed_t9_falls_through_to_fuzzy() {
        let app = AppRecord::new("a", "1234");
        // 1 has no letters so T9 fails, but the edit distance is small
        let (kind, score) = classify_one("1235", &app).unwrap();
        assert_eq!(kind, MatchKind::Fuzzy);
        assert_close(score, 0.75 * 0.5);
    }

    #[test]
    fn test_fuzzy() {
        let app = AppRecord::new("com.facebook.katana", "Facebook");
        let (kind, score) = classify_one("Facbook", &app).unwrap();
        assert_eq!(kind, MatchKind::Fuzzy);
        assert!(score > 0.2);
        assert_close(score, 0.875 * 0.5);
    }

    #[test]
    fn test_no_match() {
        let app = AppRecord::new("com.whatsapp", "WhatsApp");
        assert_eq!(classify_one("xyz123", &app), None);
    }

    #[test]
    fn test_hidden_never_matches() {
        let app = AppRecord::new("com.hidden.app", "Hidden App").hidden();
        assert_eq!(classify_one("Hidden App", &app), None);
        assert_eq!(classify_one("hidden", &app), None);
    }

    #[test]
    fn test_empty_name_is_safe() {
        let app = AppRecord::new("org.example.blank", "");
        assert_eq!(
            classify_one("blank", &app),
            Some((MatchKind::PackageName, 0.7))
        );
        assert_eq!(classify_one("zzz", &app), None);
    }

    #[test]
    fn test_collect_keeps_candidate_order() {
        let apps = vec![
            AppRecord::new("b", "Bravo"),
            AppRecord::new("hidden", "Bra").hidden(),
            AppRecord::new("a", "Brazil"),
        ];
        let ids: Vec<_> = collect("bra", &apps)
            .iter()
            .map(|m| m.app.package_name.as_str())
            .collect();
        assert_eq!(ids, ["b", "a"]);
    }

    #[test]
    fn test_collect_blank_query() {
        let apps = vec![AppRecord::new("a", "A")];
        assert!(collect(" ", &apps).is_empty());
    }

    #[test]
    fn test_rules_order() {
        assert_eq!(MatchKind::RULES.first(), Some(&MatchKind::ExactName));
        assert_eq!(MatchKind::RULES.last(), Some(&MatchKind::Fuzzy));
    }
}
