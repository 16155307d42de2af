//! Application discovery
//!
//! Finds and parses .desktop files into [`AppRecord`]s

use anyhow::Result;
use std::{
    collections::HashSet,
    env, fs,
    path::{Path, PathBuf},
};
use tracing::{debug, warn};

use crate::record::AppRecord;

/// Exec field codes that only make sense when a file or URL is passed
const FIELD_CODES: [&str; 13] = [
    "%f", "%F", "%u", "%U", "%d", "%D", "%n", "%N", "%i", "%c", "%k", "%v", "%m",
];

/// Standard XDG application directories, user first, then `extra`
pub fn application_dirs(extra: &[PathBuf]) -> Vec<PathBuf> {
    let mut dirs = Vec::new();

    // User applications
    if let Some(data_home) = env::var_os("XDG_DATA_HOME") {
        dirs.push(PathBuf::from(data_home).join("applications"));
    } else if let Some(home) = dirs::home_dir() {
        dirs.push(home.join(".local/share/applications"));
    }

    // System applications
    if let Some(data_dirs) = env::var_os("XDG_DATA_DIRS") {
        for dir in env::split_paths(&data_dirs) {
            dirs.push(dir.join("applications"));
        }
    } else {
        dirs.push(PathBuf::from("/usr/local/share/applications"));
        dirs.push(PathBuf::from("/usr/share/applications"));
    }

    dirs.extend(extra.iter().cloned());
    dirs
}

/// Parse the `[Desktop Entry]` group of a desktop file
///
/// Returns `None` for entries that ask not to be shown or that cannot be
/// launched.
pub fn parse_desktop_entry(id: &str, content: &str, terminal: &str) -> Option<AppRecord> {
    let mut name = None;
    let mut exec = None;
    let mut icon = None;
    let mut no_display = false;
    let mut hidden = false;
    let mut needs_terminal = false;
    let mut in_desktop_entry = false;

    for line in content.lines() {
        let line = line.trim();

        if line.starts_with('[') {
            in_desktop_entry = line == "[Desktop Entry]";
            continue;
        }

        if !in_desktop_entry {
            continue;
        }

        if let Some((key, value)) = line.split_once('=') {
            let value = value.trim();
            match key.trim() {
                "Name" if name.is_none() => name = Some(value.to_string()),
                "Exec" => exec = Some(value.to_string()),
                "Icon" => icon = Some(value.to_string()),
                "NoDisplay" => no_display = value.eq_ignore_ascii_case("true"),
                "Hidden" => hidden = value.eq_ignore_ascii_case("true"),
                "Terminal" => needs_terminal = value.eq_ignore_ascii_case("true"),
                _ => {}
            }
        }
    }

    if no_display || hidden {
        return None;
    }

    let name = name.filter(|n| !n.is_empty())?;
    let exec = strip_field_codes(&exec?);
    if exec.is_empty() {
        return None;
    }

    let exec = if needs_terminal {
        format!("{} -e {}", terminal, exec)
    } else {
        exec
    };

    let mut record = AppRecord::new(id, name).with_exec(exec);
    record.icon = icon.filter(|i| !i.is_empty());
    Some(record)
}

fn strip_field_codes(exec: &str) -> String {
    FIELD_CODES
        .iter()
        .fold(exec.to_string(), |acc, code| acc.replace(code, ""))
        .split_whitespace()
        .collect::<Vec<_>>()
        .join(" ")
}

/// Parse a .desktop file; its stem is the application id
fn parse_desktop_file(path: &Path, terminal: &str) -> Option<AppRecord> {
    let id = path.file_stem()?.to_str()?;
    let content = match fs::read_to_string(path) {
        Ok(content) => content,
        Err(e) => {
            warn!("Failed to read {}: {}", path.display(), e);
            return None;
        }
    };

    parse_desktop_entry(id, &content, terminal)
}

/// Load applications from the given directories
///
/// Earlier directories shadow later ones for the same application id.
pub fn load_from_dirs(dirs: &[PathBuf], terminal: &str) -> Result<Vec<AppRecord>> {
    let mut records = Vec::new();
    let mut seen_ids = HashSet::new();

    for dir in dirs {
        if !dir.exists() {
            continue;
        }

        let entries = match fs::read_dir(dir) {
            Ok(e) => e,
            Err(e) => {
                warn!("Skipping {}: {}", dir.display(), e);
                continue;
            }
        };

        let mut paths: Vec<PathBuf> = entries
            .filter_map(|e| e.ok())
            .map(|e| e.path())
            .filter(|p| p.extension().map_or(false, |ext| ext == "desktop"))
            .collect();
        paths.sort();

        for path in paths {
            let Some(stem) = path.file_stem().and_then(|s| s.to_str()) else {
                continue;
            };
            // A hidden or broken user entry still shadows the system one
            if !seen_ids.insert(stem.to_string()) {
                continue;
            }
            if let Some(record) = parse_desktop_file(&path, terminal) {
                records.push(record);
            }
        }
    }

    debug!("Discovered {} applications", records.len());
    Ok(records)
}

/// Load all applications from XDG directories plus `extra`
pub fn load_applications(extra: &[PathBuf], terminal: &str) -> Result<Vec<AppRecord>> {
    load_from_dirs(&application_dirs(extra), terminal)
}
