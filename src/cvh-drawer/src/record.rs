//! Application records supplied by the data layer

use serde::{Deserialize, Serialize};

/// An installed application as known to the drawer
///
/// The search engine only reads these; the store owns and mutates them.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AppRecord {
    /// Unique identity (desktop-file id)
    pub package_name: String,

    /// Display name
    pub app_name: String,

    /// User-set override text
    #[serde(default)]
    pub alias: Option<String>,

    /// Hidden apps never show up in search or browse
    #[serde(default)]
    pub is_hidden: bool,

    #[serde(default)]
    pub is_favorite: bool,

    /// Number of launches through the drawer
    #[serde(default)]
    pub usage_count: u32,

    /// Epoch milliseconds of the last launch, 0 when never used
    #[serde(default)]
    pub last_used: i64,

    /// Shell command used to launch the app
    #[serde(default)]
    pub exec: String,

    #[serde(default)]
    pub icon: Option<String>,
}

impl AppRecord {
    pub fn new(package_name: impl Into<String>, app_name: impl Into<String>) -> Self {
        Self {
            package_name: package_name.into(),
            app_name: app_name.into(),
            alias: None,
            is_hidden: false,
            is_favorite: false,
            usage_count: 0,
            last_used: 0,
            exec: String::new(),
            icon: None,
        }
    }

    pub fn with_alias(mut self, alias: impl Into<String>) -> Self {
        self.alias = Some(alias.into());
        self
    }

    pub fn hidden(mut self) -> Self {
        self.is_hidden = true;
        self
    }

    pub fn favorite(mut self) -> Self {
        self.is_favorite = true;
        self
    }

    pub fn with_usage(mut self, usage_count: u32, last_used: i64) -> Self {
        self.usage_count = usage_count;
        self.last_used = last_used;
        self
    }

    pub fn with_exec(mut self, exec: impl Into<String>) -> Self {
        self.exec = exec.into();
        self
    }

    /// Whether the app has ever been launched
    pub fn was_used(&self) -> bool {
        self.last_used > 0
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_missing_fields_default() {
        let json = r#"{"package_name": "firefox", "app_name": "Firefox"}"#;
        let record: AppRecord = serde_json::from_str(json).unwrap();
        assert_eq!(record, AppRecord::new("firefox", "Firefox"));
        assert!(!record.was_used());
    }

    #[test]
    fn test_builders() {
        let record = AppRecord::new("org.gnome.Calculator", "Calculator")
            .with_alias("calc")
            .favorite()
            .with_usage(3, 1_700_000_000_000);
        assert_eq!(record.alias.as_deref(), Some("calc"));
        assert!(record.is_favorite);
        assert!(!record.is_hidden);
        assert!(record.was_used());
    }
}
