use serde::{Deserialize, Serialize};

/// Kinds of gutter markers drawn next to buffer rows.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum RegionKind {
    /// Row added relative to the reference.
    Inserted,
    /// Row changed relative to the reference.
    Modified,
    /// Reference lines were removed above the row.
    DeletedTop,
    /// Reference lines were removed below the last row.
    DeletedBottom,
    /// Reference lines were removed both above and below the row.
    DeletedDual,
    /// Row of a file git does not track.
    Untracked,
    /// Row of a file git ignores.
    Ignored,
}

impl RegionKind {
    /// Every region kind, in drawing order.
    pub const ALL: [Self; 7] = [
        Self::Inserted,
        Self::Modified,
        Self::DeletedTop,
        Self::DeletedBottom,
        Self::DeletedDual,
        Self::Untracked,
        Self::Ignored,
    ];

    /// Host region key for this kind.
    #[must_use]
    pub const fn key(self) -> &'static str {
        match self {
            Self::Inserted => "git_gutter_inserted",
            Self::Modified => "git_gutter_modified",
            Self::DeletedTop => "git_gutter_deleted_top",
            Self::DeletedBottom => "git_gutter_deleted_bottom",
            Self::DeletedDual => "git_gutter_deleted_dual",
            Self::Untracked => "git_gutter_untracked",
            Self::Ignored => "git_gutter_ignored",
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn keys_are_unique() {
        let mut keys: Vec<_> = RegionKind::ALL.iter().map(|kind| kind.key()).collect();
        keys.sort_unstable();
        keys.dedup();
        assert_eq!(keys.len(), RegionKind::ALL.len());
    }

    #[test]
    fn encoded_uses_snake_case() {
        let json = serde_json::to_string(&RegionKind::DeletedTop).expect("serialize kind");
        assert_eq!(json, "\"deleted_top\"");
    }
}
