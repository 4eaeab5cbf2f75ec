//! # Paths
//!
//! Locations of the client's files and the sanitizer applied to every path
//! a tool call asks us to touch.

use regex::Regex;
use std::path::PathBuf;
use std::sync::OnceLock;

pub const APP_DIR: &str = "oa-assist";
pub const STATE_FILE: &str = "config.json";
pub const SETTINGS_FILE: &str = "settings.yaml";
pub const LOG_FILE: &str = "session.log";

/// Returns `~/.config/oa-assist` (or the platform equivalent).
/// Falls back to a relative `.oa-assist` when no config dir is known.
pub fn app_dir() -> PathBuf {
    dirs::config_dir()
        .map(|dir| dir.join(APP_DIR))
        .unwrap_or_else(|| PathBuf::from(format!(".{}", APP_DIR)))
}

pub fn state_path() -> PathBuf {
    app_dir().join(STATE_FILE)
}

pub fn settings_path() -> PathBuf {
    app_dir().join(SETTINGS_FILE)
}

fn dot_runs() -> &'static Regex {
    static DOTS: OnceLock<Regex> = OnceLock::new();
    DOTS.get_or_init(|| Regex::new(r"\.+").expect("static regex"))
}

/// Sanitizes a path supplied by the remote assistant.
///
/// Runs of `.` are collapsed to a single `.` (so `..` can never climb out of
/// the working directory) and leading `/` are stripped so the result is
/// always relative. Applying it twice yields the same string.
pub fn sanitize_path(raw: &str) -> String {
    let collapsed = dot_runs().replace_all(raw, ".");
    collapsed.trim_start_matches('/').to_string()
}
