//! User configuration and per-view overrides.

use std::path::Path;
use std::sync::Arc;
use std::time::Duration;

use gutter_host_api::View;
use serde::{Deserialize, Serialize};

use crate::{Error, Result};

/// Global configuration shared by every view.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct Settings {
    /// Master switch for change tracking.
    pub enable: bool,
    /// Log why tracking is disabled for a view.
    pub debug: bool,
    /// Executable used for git queries.
    pub git_binary: String,
    /// Seconds a single git invocation may run.
    pub git_timeout_secs: u64,
    /// Initial comparison target (`HEAD`, `origin`, a ref or a revision).
    pub compare_against: String,
    /// Wrap around when jumping past the first or last change.
    pub next_prev_change_wrap: bool,
    /// Draw markers for untracked and ignored files.
    pub show_markers_on_untracked_file: bool,
    /// Write branch and change summary into the status bar.
    pub show_status_bar_text: bool,
    /// Maximum number of commits offered when choosing a commit.
    pub revision_limit: usize,
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            enable: true,
            debug: false,
            git_binary: "git".to_owned(),
            git_timeout_secs: 10,
            compare_against: "HEAD".to_owned(),
            next_prev_change_wrap: true,
            show_markers_on_untracked_file: false,
            show_status_bar_text: true,
            revision_limit: 2000,
        }
    }
}

impl Settings {
    /// Load settings from a JSON file; missing keys keep their defaults.
    ///
    /// # Errors
    ///
    /// Returns an error if the file cannot be read or is not valid JSON.
    pub fn load(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();
        let text = std::fs::read_to_string(path).map_err(|source| Error::Io {
            path: path.display().to_string(),
            source,
        })?;
        Self::from_json(&text).map_err(|source| Error::Settings {
            path: path.display().to_string(),
            source,
        })
    }

    /// Parse settings from JSON text; missing keys keep their defaults.
    ///
    /// # Errors
    ///
    /// Returns the parser error for malformed input.
    pub fn from_json(text: &str) -> serde_json::Result<Self> {
        serde_json::from_str(text)
    }

    /// Timeout for a single git invocation.
    #[must_use]
    pub const fn git_timeout(&self) -> Duration {
        Duration::from_secs(self.git_timeout_secs)
    }
}

/// Settings lookup for one view: a `git_gutter_<name>` view setting wins
/// over the global value.
#[derive(Debug, Clone)]
pub struct ViewSettings {
    global: Arc<Settings>,
}

impl ViewSettings {
    /// Prefix of per-view overrides.
    pub const VIEW_PREFIX: &'static str = "git_gutter_";

    /// Wrap the shared global settings.
    #[must_use]
    pub const fn new(global: Arc<Settings>) -> Self {
        Self { global }
    }

    /// The shared global settings.
    #[must_use]
    pub fn global(&self) -> &Settings {
        &self.global
    }

    /// Whether tracking is enabled for `view`.
    #[must_use]
    pub fn enable(&self, view: &dyn View) -> bool {
        self.flag(view, "enable", self.global.enable)
    }

    /// Whether change navigation wraps around for `view`.
    #[must_use]
    pub fn next_prev_change_wrap(&self, view: &dyn View) -> bool {
        self.flag(view, "next_prev_change_wrap", self.global.next_prev_change_wrap)
    }

    /// Whether untracked files get markers in `view`.
    #[must_use]
    pub fn show_markers_on_untracked_file(&self, view: &dyn View) -> bool {
        self.flag(
            view,
            "show_markers_on_untracked_file",
            self.global.show_markers_on_untracked_file,
        )
    }

    /// Whether the status bar summary is shown for `view`.
    #[must_use]
    pub fn show_status_bar_text(&self, view: &dyn View) -> bool {
        self.flag(view, "show_status_bar_text", self.global.show_status_bar_text)
    }

    fn flag(&self, view: &dyn View, name: &str, default: bool) -> bool {
        view.setting(&format!("{}{name}", Self::VIEW_PREFIX))
            .and_then(|value| value.as_bool())
            .unwrap_or(default)
    }
}
