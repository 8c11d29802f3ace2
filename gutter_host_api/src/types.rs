use serde::{Deserialize, Serialize};
use serde_json::Value;

use gutter_api::RevisionEntry;

/// Entry shown in a host quick panel.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct QuickPanelItem {
    /// Primary text of the entry.
    pub title: String,
    /// Optional secondary line.
    #[serde(default)]
    pub detail: Option<String>,
}

impl QuickPanelItem {
    /// Construct an item with optional detail line.
    #[must_use]
    pub fn new(title: impl Into<String>, detail: Option<impl Into<String>>) -> Self {
        Self {
            title: title.into(),
            detail: detail.map(Into::into),
        }
    }
}

impl From<&RevisionEntry> for QuickPanelItem {
    fn from(entry: &RevisionEntry) -> Self {
        let title = match &entry.summary {
            Some(summary) => format!("{} {}", entry.reference, summary),
            None => entry.reference.clone(),
        };
        Self {
            title,
            detail: entry.author.clone(),
        }
    }
}

/// Loose truthiness for settings written by arbitrary plugins.
///
/// `null`, `false`, zero, empty strings, empty arrays and empty objects are
/// falsy, everything else is truthy.
#[must_use]
pub fn is_truthy(value: &Value) -> bool {
    match value {
        Value::Null => false,
        Value::Bool(flag) => *flag,
        Value::Number(number) => number.as_f64().is_some_and(|n| n != 0.0),
        Value::String(text) => !text.is_empty(),
        Value::Array(items) => !items.is_empty(),
        Value::Object(map) => !map.is_empty(),
    }
}

/// Errors surfaced by host integrations.
#[derive(Debug, thiserror::Error)]
pub enum HostError {
    /// Operation is not supported by the host.
    #[error("operation '{operation}' is not supported by this host")]
    Unsupported {
        /// Name of the unsupported operation.
        operation: &'static str,
    },
    /// Generic failure surfaced by the host.
    #[error("{message}")]
    Failure {
        /// Human-readable error message.
        message: String,
    },
}

impl HostError {
    /// Helper to construct a failure from any displayable message.
    #[must_use]
    pub fn message(message: impl Into<String>) -> Self {
        Self::Failure {
            message: message.into(),
        }
    }
}

/// Convenience result alias for host operations.
pub type HostResult<T> = std::result::Result<T, HostError>;
