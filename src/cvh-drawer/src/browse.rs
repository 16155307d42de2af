//! Empty-query view: favorites, recently used, everything else

use serde::Serialize;

use crate::normalize;
use crate::record::AppRecord;

/// Default number of entries in the recent section
pub const DEFAULT_RECENT_LIMIT: usize = 8;

/// Visible apps grouped for display when nothing has been typed
#[derive(Debug, Clone, Default, Serialize)]
pub struct Sections<'a> {
    /// Favorites, most recently used first
    pub favorites: Vec<&'a AppRecord>,
    /// Non-favorites that were launched before, most recent first
    pub recent: Vec<&'a AppRecord>,
    /// Remaining apps by name
    pub others: Vec<&'a AppRecord>,
}

impl<'a> Sections<'a> {
    /// All sections flattened in display order
    pub fn iter(&self) -> impl Iterator<Item = &'a AppRecord> + '_ {
        self.favorites
            .iter()
            .chain(&self.recent)
            .chain(&self.others)
            .copied()
    }

    pub fn len(&self) -> usize {
        self.favorites.len() + self.recent.len() + self.others.len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

/// Group visible candidates into sections
///
/// Apps that overflow `recent_limit` fall back into `others`.
pub fn browse(candidates: &[AppRecord], recent_limit: usize) -> Sections<'_> {
    let visible = candidates.iter().filter(|app| !app.is_hidden);

    let (mut favorites, rest): (Vec<_>, Vec<_>) = visible.partition(|app| app.is_favorite);
    favorites.sort_by(|a, b| b.last_used.cmp(&a.last_used));

    let (mut recent, mut others): (Vec<_>, Vec<_>) = rest.into_iter().partition(|app| app.was_used());
    recent.sort_by(|a, b| b.last_used.cmp(&a.last_used));
    if recent.len() > recent_limit {
        others.extend(recent.drain(recent_limit..));
    }

    others.sort_by_cached_key(|app| normalize::fold(&app.app_name));

    Sections {
        favorites,
        recent,
        others,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn names<'a>(apps: &[&'a AppRecord]) -> Vec<&'a str> {
        apps.iter().map(|app| app.app_name.as_str()).collect()
    }

    fn sample() -> Vec<AppRecord> {
        vec![
            AppRecord::new("zed", "zed"),
            AppRecord::new("firefox", "Firefox").favorite().with_usage(4, 100),
            AppRecord::new("gimp", "GIMP").with_usage(1, 300),
            AppRecord::new("secret", "Secret").hidden().favorite(),
            AppRecord::new("term", "Terminal").favorite().with_usage(9, 500),
            AppRecord::new("calc", "Calculator").with_usage(2, 200),
            AppRecord::new("atom", "Atom"),
        ]
    }

    #[test]
    fn test_sections() {
        let apps = sample();
        let sections = browse(&apps, DEFAULT_RECENT_LIMIT);
        assert_eq!(names(&sections.favorites), ["Terminal", "Firefox"]);
        assert_eq!(names(&sections.recent), ["GIMP", "Calculator"]);
        assert_eq!(names(&sections.others), ["Atom", "zed"]);
        assert_eq!(sections.len(), 6);
    }

    #[test]
    fn test_hidden_excluded() {
        let apps = sample();
        let sections = browse(&apps, DEFAULT_RECENT_LIMIT);
        assert!(sections.iter().all(|app| app.package_name != "secret"));
    }

    #[test]
    fn test_recent_overflow_goes_to_others() {
        let apps = sample();
        let sections = browse(&apps, 1);
        assert_eq!(names(&sections.recent), ["GIMP"]);
        assert_eq!(names(&sections.others), ["Atom", "Calculator", "zed"]);
    }

    #[test]
    fn test_empty() {
        let sections = browse(&[], DEFAULT_RECENT_LIMIT);
        assert!(sections.is_empty());
    }
}
