use std::fmt;

use serde::{Deserialize, Serialize};

/// Reference revision the buffer is compared against.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
#[serde(tag = "kind", content = "value", rename_all = "snake_case")]
pub enum CompareTarget {
    /// The checked out commit.
    #[default]
    Head,
    /// The upstream of the checked out branch.
    Origin,
    /// An arbitrary commit or revision expression.
    Commit(String),
    /// A commit selected from the history of the tracked file.
    FileCommit(String),
    /// A local branch name.
    Branch(String),
    /// A tag name.
    Tag(String),
}

impl CompareTarget {
    /// Revision expression understood by `git show <rev>:<path>`.
    #[must_use]
    pub fn revision(&self) -> String {
        match self {
            Self::Head => "HEAD".to_owned(),
            Self::Origin => "@{upstream}".to_owned(),
            Self::Commit(oid) | Self::FileCommit(oid) => oid.clone(),
            Self::Branch(name) => format!("refs/heads/{name}"),
            Self::Tag(name) => format!("refs/tags/{name}"),
        }
    }

    /// Interpret a `compare_against` configuration value.
    ///
    /// `HEAD` and `origin` select the symbolic targets, fully qualified
    /// branch and tag references select those, anything else is treated as a
    /// revision expression.
    #[must_use]
    pub fn from_setting(value: &str) -> Self {
        let value = value.trim();
        match value {
            "" | "HEAD" => Self::Head,
            "origin" => Self::Origin,
            _ => {
                if let Some(name) = value.strip_prefix("refs/heads/") {
                    Self::Branch(name.to_owned())
                } else if let Some(name) = value.strip_prefix("refs/tags/") {
                    Self::Tag(name.to_owned())
                } else {
                    Self::Commit(value.to_owned())
                }
            }
        }
    }
}

impl fmt::Display for CompareTarget {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Head => f.write_str("HEAD"),
            Self::Origin => f.write_str("origin"),
            Self::Commit(oid) => write!(f, "commit {}", short_oid(oid)),
            Self::FileCommit(oid) => write!(f, "file commit {}", short_oid(oid)),
            Self::Branch(name) => write!(f, "branch {name}"),
            Self::Tag(name) => write!(f, "tag {name}"),
        }
    }
}

fn short_oid(oid: &str) -> &str {
    let is_hex = oid.len() >= 7 && oid.bytes().all(|b| b.is_ascii_hexdigit());
    if is_hex {
        &oid[..7]
    } else {
        oid
    }
}
