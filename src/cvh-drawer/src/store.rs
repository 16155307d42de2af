//! Persistent app store
//!
//! Keeps the user's per-app state (hidden, favorite, alias, launch history)
//! in a JSON file and merges it with freshly discovered applications.

use std::collections::HashMap;
use std::fs;
use std::path::{Path, PathBuf};
use std::time::{SystemTime, UNIX_EPOCH};

use thiserror::Error;
use tracing::{debug, info};

use crate::record::AppRecord;

#[derive(Debug, Error)]
pub enum StoreError {
    #[error("failed to access app store {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("app store {path} is not valid JSON: {source}")]
    Json {
        path: PathBuf,
        #[source]
        source: serde_json::Error,
    },

    #[error("unknown application: {0}")]
    UnknownApp(String),
}

pub type Result<T> = std::result::Result<T, StoreError>;

/// Default store location under the XDG data directory
pub fn default_path() -> PathBuf {
    dirs::data_dir()
        .unwrap_or_else(|| PathBuf::from("."))
        .join("cvh-drawer/apps.json")
}

/// Milliseconds since the Unix epoch
pub fn now_millis() -> i64 {
    SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .map(|d| i64::try_from(d.as_millis()).unwrap_or(i64::MAX))
        .unwrap_or(0)
}

/// Application records backed by a JSON file
#[derive(Debug)]
pub struct AppStore {
    path: PathBuf,
    apps: Vec<AppRecord>,
}

impl AppStore {
    /// Open the store at `path`; a missing file is an empty store
    pub fn open(path: impl Into<PathBuf>) -> Result<Self> {
        let path = path.into();
        let apps = match fs::read_to_string(&path) {
            Ok(content) => serde_json::from_str(&content).map_err(|source| StoreError::Json {
                path: path.clone(),
                source,
            })?,
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => Vec::new(),
            Err(source) => return Err(StoreError::Io { path, source }),
        };

        debug!("Opened app store {} ({} apps)", path.display(), apps.len());
        Ok(Self { path, apps })
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Write the store, replacing the previous file atomically
    pub fn save(&self) -> Result<()> {
        let io_err = |source| StoreError::Io {
            path: self.path.clone(),
            source,
        };

        if let Some(parent) = self.path.parent() {
            fs::create_dir_all(parent).map_err(io_err)?;
        }

        let json = serde_json::to_string_pretty(&self.apps).map_err(|source| StoreError::Json {
            path: self.path.clone(),
            source,
        })?;

        let tmp = self.path.with_extension("json.tmp");
        fs::write(&tmp, json).map_err(io_err)?;
        fs::rename(&tmp, &self.path).map_err(io_err)?;

        debug!("Saved {} apps to {}", self.apps.len(), self.path.display());
        Ok(())
    }

    pub fn records(&self) -> &[AppRecord] {
        &self.apps
    }

    pub fn get(&self, id: &str) -> Option<&AppRecord> {
        self.apps.iter().find(|app| app.package_name == id)
    }

    fn get_mut(&mut self, id: &str) -> Result<&mut AppRecord> {
        self.apps
            .iter_mut()
            .find(|app| app.package_name == id)
            .ok_or_else(|| StoreError::UnknownApp(id.to_string()))
    }

    /// Replace the app list with `discovered`, carrying over user state
    ///
    /// Names, commands and icons come from discovery; hidden, favorite,
    /// alias and usage survive. Apps that were not discovered are dropped.
    pub fn sync(&mut self, discovered: Vec<AppRecord>) {
        let mut previous: HashMap<String, AppRecord> = self
            .apps
            .drain(..)
            .map(|app| (app.package_name.clone(), app))
            .collect();

        let mut added = 0;
        for mut app in discovered {
            match previous.remove(&app.package_name) {
                Some(old) => {
                    app.alias = old.alias;
                    app.is_hidden = old.is_hidden;
                    app.is_favorite = old.is_favorite;
                    app.usage_count = old.usage_count;
                    app.last_used = old.last_used;
                }
                None => added += 1,
            }
            self.apps.push(app);
        }

        info!(
            "Synced app store: {} apps, {} new, {} removed",
            self.apps.len(),
            added,
            previous.len()
        );
    }

    /// Count a launch of `id` at `now` (epoch milliseconds)
    pub fn record_usage(&mut self, id: &str, now: i64) -> Result<()> {
        let app = self.get_mut(id)?;
        app.usage_count = app.usage_count.saturating_add(1);
        app.last_used = now;
        Ok(())
    }

    /// Flip the hidden flag, returning the new value
    pub fn toggle_hidden(&mut self, id: &str) -> Result<bool> {
        let app = self.get_mut(id)?;
        app.is_hidden = !app.is_hidden;
        Ok(app.is_hidden)
    }

    /// Flip the favorite flag, returning the new value
    pub fn toggle_favorite(&mut self, id: &str) -> Result<bool> {
        let app = self.get_mut(id)?;
        app.is_favorite = !app.is_favorite;
        Ok(app.is_favorite)
    }

    /// Set or clear an alias; blank aliases clear it
    pub fn set_alias(&mut self, id: &str, alias: Option<String>) -> Result<()> {
        let app = self.get_mut(id)?;
        app.alias = alias
            .map(|a| a.trim().to_string())
            .filter(|a| !a.is_empty());
        Ok(())
    }
}
