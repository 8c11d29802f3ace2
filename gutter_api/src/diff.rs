use std::collections::BTreeSet;

use serde::{Deserialize, Serialize};

/// Line classification of a buffer against its reference content.
///
/// All rows are zero-based buffer rows. A `deleted` row marks the position
/// above which reference lines were removed; it may equal `line_count` when
/// lines were removed after the end of the buffer.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, Default)]
pub struct DiffResult {
    /// Number of lines in the buffer that was compared.
    pub line_count: u32,
    /// Rows that do not exist in the reference.
    #[serde(default)]
    pub inserted: Vec<u32>,
    /// Rows that replace reference lines.
    #[serde(default)]
    pub modified: Vec<u32>,
    /// Rows marking removed reference lines.
    #[serde(default)]
    pub deleted: Vec<u32>,
    /// Change groups in buffer order.
    #[serde(default)]
    pub hunks: Vec<DiffHunk>,
}

impl DiffResult {
    /// Returns true if the buffer matches its reference.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.inserted.is_empty() && self.modified.is_empty() && self.deleted.is_empty()
    }

    /// Summary counts of the classified rows.
    #[must_use]
    pub fn stats(&self) -> LineStats {
        LineStats {
            inserted: count(&self.inserted),
            modified: count(&self.modified),
            deleted: count(&self.deleted),
        }
    }

    /// Clamp a row into the buffer.
    #[must_use]
    pub const fn clamp_row(&self, row: u32) -> u32 {
        if row < self.line_count {
            row
        } else {
            self.line_count.saturating_sub(1)
        }
    }

    /// First row of every contiguous block of changed rows, ascending.
    #[must_use]
    pub fn change_starts(&self) -> Vec<u32> {
        let rows: BTreeSet<u32> = self
            .inserted
            .iter()
            .chain(&self.modified)
            .copied()
            .chain(self.deleted.iter().map(|&row| self.clamp_row(row)))
            .collect();

        rows.iter()
            .copied()
            .filter(|&row| row == 0 || !rows.contains(&(row - 1)))
            .collect()
    }

    /// The hunk covering `row`, if any.
    #[must_use]
    pub fn hunk_at(&self, row: u32) -> Option<&DiffHunk> {
        self.hunks.iter().find(|hunk| {
            if hunk.head_lines == 0 {
                self.clamp_row(hunk.head_row) == row
            } else {
                (hunk.head_row..hunk.head_row + hunk.head_lines).contains(&row)
            }
        })
    }
}

fn count(rows: &[u32]) -> u32 {
    u32::try_from(rows.len()).unwrap_or(u32::MAX)
}

/// Counts of inserted, modified and deleted rows.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
pub struct LineStats {
    /// Number of inserted rows.
    pub inserted: u32,
    /// Number of modified rows.
    pub modified: u32,
    /// Number of deletion markers.
    pub deleted: u32,
}

impl LineStats {
    /// Returns true if any counter is non-zero.
    #[must_use]
    pub const fn has_changes(&self) -> bool {
        self.inserted > 0 || self.modified > 0 || self.deleted > 0
    }
}

/// A contiguous change group between reference and buffer.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DiffHunk {
    /// Zero-based first reference line of the group.
    pub base_row: u32,
    /// Number of reference lines covered.
    pub base_lines: u32,
    /// Zero-based first buffer row of the group.
    pub head_row: u32,
    /// Number of buffer rows covered.
    pub head_lines: u32,
    /// Reference lines removed by the group.
    #[serde(default)]
    pub removed: Vec<String>,
    /// Buffer lines added by the group.
    #[serde(default)]
    pub added: Vec<String>,
}

impl DiffHunk {
    /// Unified diff header, e.g. `@@ -3,2 +3,1 @@`.
    #[must_use]
    pub fn header(&self) -> String {
        format!(
            "@@ -{},{} +{},{} @@",
            header_start(self.base_row, self.base_lines),
            self.base_lines,
            header_start(self.head_row, self.head_lines),
            self.head_lines
        )
    }
}

// Empty spans name the line they follow, as git does.
const fn header_start(row: u32, lines: u32) -> u32 {
    if lines == 0 {
        row
    } else {
        row + 1
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn hunk(base_row: u32, base_lines: u32, head_row: u32, head_lines: u32) -> DiffHunk {
        DiffHunk {
            base_row,
            base_lines,
            head_row,
            head_lines,
            removed: Vec::new(),
            added: Vec::new(),
        }
    }

    #[test]
    fn change_starts_merge_adjacent_rows() {
        let result = DiffResult {
            line_count: 20,
            inserted: vec![2, 3],
            modified: vec![4, 10],
            deleted: vec![15],
            hunks: Vec::new(),
        };
        assert_eq!(result.change_starts(), vec![2, 10, 15]);
    }

    #[test]
    fn change_starts_clamp_trailing_deletion() {
        let result = DiffResult {
            line_count: 5,
            inserted: Vec::new(),
            modified: Vec::new(),
            deleted: vec![5],
            hunks: Vec::new(),
        };
        assert_eq!(result.change_starts(), vec![4]);
    }

    #[test]
    fn header_uses_git_conventions() {
        assert_eq!(hunk(2, 2, 2, 1).header(), "@@ -3,2 +3,1 @@");
        assert_eq!(hunk(4, 0, 4, 2).header(), "@@ -4,0 +5,2 @@");
        assert_eq!(hunk(0, 1, 0, 0).header(), "@@ -1,1 +0,0 @@");
    }

    #[test]
    fn hunk_lookup_covers_deletions() {
        let result = DiffResult {
            line_count: 3,
            inserted: Vec::new(),
            modified: vec![0],
            deleted: vec![3],
            hunks: vec![hunk(0, 1, 0, 1), hunk(4, 2, 3, 0)],
        };
        assert_eq!(result.hunk_at(0).map(|h| h.base_row), Some(0));
        assert_eq!(result.hunk_at(2).map(|h| h.base_row), Some(4));
        assert!(result.hunk_at(1).is_none());
    }

    #[test]
    fn stats_count_rows() {
        let result = DiffResult {
            line_count: 9,
            inserted: vec![1, 2],
            modified: vec![5],
            deleted: Vec::new(),
            hunks: Vec::new(),
        };
        let stats = result.stats();
        assert_eq!(stats.inserted, 2);
        assert_eq!(stats.modified, 1);
        assert!(stats.has_changes());
        assert!(!DiffResult::default().stats().has_changes());
    }
}
