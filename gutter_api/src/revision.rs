use serde::{Deserialize, Serialize};

/// A selectable revision offered when choosing a comparison target.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RevisionEntry {
    /// Value used to build the target: an object id, branch or tag name.
    pub reference: String,
    /// Optional summary line (commit subject or tip subject).
    #[serde(default)]
    pub summary: Option<String>,
    /// Optional author display name.
    #[serde(default)]
    pub author: Option<String>,
    /// Unix timestamp (seconds) associated with the revision.
    #[serde(default)]
    pub timestamp: Option<i64>,
}

impl RevisionEntry {
    /// Entry with only a reference.
    pub fn new(reference: impl Into<String>) -> Self {
        Self {
            reference: reference.into(),
            summary: None,
            author: None,
            timestamp: None,
        }
    }

    /// Attach a summary line.
    #[must_use]
    pub fn with_summary(mut self, summary: impl Into<String>) -> Self {
        self.summary = Some(summary.into());
        self
    }

    /// Attach an author.
    #[must_use]
    pub fn with_author(mut self, author: impl Into<String>) -> Self {
        self.author = Some(author.into());
        self
    }
}
