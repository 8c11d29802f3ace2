use bitflags::bitflags;
use gutter_api::LineStats;

use crate::{GitError, GitResult};

bitflags! {
    /// Simplified state of a file as reported by `git status`.
    ///
    /// The empty set means the file is committed without changes.
    #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
    pub struct FileState: u8 {
        /// Matched by an ignore rule.
        const IGNORED = 0b0_0001;
        /// Not tracked by git.
        const UNTRACKED = 0b0_0010;
        /// Status could not be determined.
        const UNKNOWN = 0b0_0100;
        /// Working copy differs from the index.
        const MODIFIED = 0b0_1000;
        /// Index differs from `HEAD`.
        const STAGED = 0b1_0000;
    }
}

impl FileState {
    /// Committed without changes.
    pub const COMMITTED: Self = Self::empty();
    /// Any state without a usable history.
    pub const IGNORED_UNTRACKED: Self = Self::IGNORED
        .union(Self::UNTRACKED)
        .union(Self::UNKNOWN);
}

/// Branch and file status parsed from
/// `git status --porcelain=2 -z -b -u --ignored -- <file>`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct GitStatus {
    /// Checked out branch name, `(detached)` for a detached head.
    pub branch: Option<String>,
    /// Commit id of the checked out head, `(initial)` before the first commit.
    pub head: Option<String>,
    /// Upstream reference of the branch.
    pub upstream: Option<String>,
    /// Commits ahead of upstream.
    pub ahead: u32,
    /// Commits behind upstream.
    pub behind: u32,
    /// Simplified file state.
    pub file_state: FileState,
    /// Object id of the file in `HEAD`.
    pub head_oid: Option<String>,
    /// Object id of the file in the index.
    pub index_oid: Option<String>,
    /// Line statistics of the last diff.
    pub lines: LineStats,
}

impl Default for GitStatus {
    fn default() -> Self {
        Self {
            branch: None,
            head: None,
            upstream: None,
            ahead: 0,
            behind: 0,
            file_state: FileState::UNKNOWN,
            head_oid: None,
            index_oid: None,
            lines: LineStats::default(),
        }
    }
}

impl GitStatus {
    /// Parse NUL separated porcelain v2 output.
    ///
    /// # Errors
    ///
    /// Returns [`GitError::Parse`] for non UTF-8 output or malformed records.
    pub fn parse(output: &[u8]) -> GitResult<Self> {
        let mut status = Self::default();
        let mut records = output
            .split(|&byte| byte == 0)
            .filter(|record| !record.is_empty());

        while let Some(record) = records.next() {
            let line = std::str::from_utf8(record)
                .map_err(|err| GitError::parse(format!("status is not UTF-8: {err}")))?;

            match line.as_bytes()[0] {
                b'#' => {
                    // Only header lines means the file is committed.
                    status.file_state = FileState::COMMITTED;
                    status.parse_header(line)?;
                }
                b'1' => status.parse_entry(line, 9)?,
                b'2' => {
                    status.parse_entry(line, 10)?;
                    // Renames carry the original path as an extra record.
                    records.next();
                }
                b'!' => status.file_state = FileState::IGNORED,
                b'?' => status.file_state = FileState::UNTRACKED,
                _ => {}
            }
        }

        Ok(status)
    }

    fn parse_header(&mut self, line: &str) -> GitResult<()> {
        let mut parts = line.splitn(3, ' ');
        let (Some(_), Some(key), Some(value)) = (parts.next(), parts.next(), parts.next()) else {
            return Err(GitError::parse(format!("malformed header: {line:?}")));
        };

        match key {
            "branch.oid" => self.head = Some(value.to_owned()),
            "branch.head" => self.branch = Some(value.to_owned()),
            "branch.upstream" => self.upstream = Some(value.to_owned()),
            "branch.ab" => {
                let (ahead, behind) = value
                    .split_once(' ')
                    .ok_or_else(|| GitError::parse(format!("malformed ahead/behind: {value:?}")))?;
                self.ahead = parse_count(ahead, '+')?;
                self.behind = parse_count(behind, '-')?;
            }
            _ => {}
        }
        Ok(())
    }

    fn parse_entry(&mut self, line: &str, fields: usize) -> GitResult<()> {
        let parts: Vec<&str> = line.splitn(fields, ' ').collect();
        if parts.len() != fields || parts[1].len() != 2 {
            return Err(GitError::parse(format!("malformed entry: {line:?}")));
        }

        let xy = parts[1].as_bytes();
        if xy[0] != b'.' {
            self.file_state |= FileState::STAGED;
        }
        if xy[1] != b'.' {
            self.file_state |= FileState::MODIFIED;
        }
        self.head_oid = Some(parts[6].to_owned());
        self.index_oid = Some(parts[7].to_owned());
        Ok(())
    }

    /// Merge diff line statistics; a tracked file with changed lines becomes
    /// modified.
    pub fn update_line_stats(&mut self, lines: LineStats) {
        self.lines = lines;
        if lines.has_changes() {
            self.set_modified();
        }
    }

    /// Mark a tracked file modified.
    ///
    /// Returns `true` if the state changed.
    pub fn set_modified(&mut self) -> bool {
        if self
            .file_state
            .intersects(FileState::IGNORED_UNTRACKED | FileState::MODIFIED)
        {
            return false;
        }
        self.file_state &= FileState::STAGED;
        self.file_state |= FileState::MODIFIED;
        true
    }

    /// Whether the file has no usable history.
    #[must_use]
    pub const fn is_ignored_or_untracked(&self) -> bool {
        self.file_state.intersects(FileState::IGNORED_UNTRACKED)
    }

    /// Whether the file is committed without changes.
    #[must_use]
    pub fn is_committed(&self) -> bool {
        self.file_state == FileState::COMMITTED
    }

    /// Whether the file has staged changes.
    #[must_use]
    pub const fn is_staged(&self) -> bool {
        self.file_state.contains(FileState::STAGED)
    }

    /// Human readable file state.
    #[must_use]
    pub fn status_text(&self) -> &'static str {
        let state = self.file_state;
        if state == FileState::COMMITTED {
            "committed"
        } else if state == FileState::IGNORED {
            "ignored"
        } else if state == FileState::UNTRACKED {
            "untracked"
        } else if state == FileState::MODIFIED {
            "modified"
        } else if state == FileState::STAGED {
            "staged"
        } else if state == FileState::STAGED | FileState::MODIFIED {
            "staged and modified"
        } else {
            "(unknown)"
        }
    }
}

fn parse_count(value: &str, sign: char) -> GitResult<u32> {
    value
        .strip_prefix(sign)
        .and_then(|digits| digits.parse().ok())
        .ok_or_else(|| GitError::parse(format!("malformed counter: {value:?}")))
}

#[cfg(test)]
mod tests {
    use super::*;

    const OID_A: &str = "1111111111111111111111111111111111111111";
    const OID_B: &str = "2222222222222222222222222222222222222222";

    fn header() -> String {
        format!(
            "# branch.oid {OID_A}\0# branch.head main\0# branch.upstream origin/main\0# branch.ab +2 -1\0"
        )
    }

    #[test]
    fn committed_file_has_only_headers() {
        let status = GitStatus::parse(header().as_bytes()).expect("parse status");
        assert!(status.is_committed());
        assert_eq!(status.branch.as_deref(), Some("main"));
        assert_eq!(status.head.as_deref(), Some(OID_A));
        assert_eq!(status.upstream.as_deref(), Some("origin/main"));
        assert_eq!((status.ahead, status.behind), (2, 1));
        assert_eq!(status.status_text(), "committed");
    }

    #[test]
    fn entry_flags_staged_and_modified() {
        let cases = [
            (".M", "modified"),
            ("M.", "staged"),
            ("MM", "staged and modified"),
        ];
        for (xy, text) in cases {
            let output =
                format!("{}1 {xy} N... 100644 100644 100644 {OID_A} {OID_B} src/lib.rs\0", header());
            let status = GitStatus::parse(output.as_bytes()).expect("parse status");
            assert_eq!(status.status_text(), text, "xy = {xy}");
            assert_eq!(status.head_oid.as_deref(), Some(OID_A));
            assert_eq!(status.index_oid.as_deref(), Some(OID_B));
        }
    }

    #[test]
    fn untracked_and_ignored_entries() {
        let output = format!("{}? notes.txt\0", header());
        let status = GitStatus::parse(output.as_bytes()).expect("parse untracked");
        assert_eq!(status.file_state, FileState::UNTRACKED);
        assert!(status.is_ignored_or_untracked());

        let output = format!("{}! target/out.o\0", header());
        let status = GitStatus::parse(output.as_bytes()).expect("parse ignored");
        assert_eq!(status.status_text(), "ignored");
    }

    #[test]
    fn rename_consumes_original_path_record() {
        let output = format!(
            "{}2 R. N... 100644 100644 100644 {OID_A} {OID_B} R100 new.rs\0? old.rs\0",
            header()
        );
        let status = GitStatus::parse(output.as_bytes()).expect("parse rename");
        assert_eq!(status.status_text(), "staged");
    }

    #[test]
    fn empty_output_is_unknown() {
        let status = GitStatus::parse(b"").expect("parse empty");
        assert_eq!(status.file_state, FileState::UNKNOWN);
        assert_eq!(status.status_text(), "(unknown)");
    }

    #[test]
    fn malformed_entry_is_rejected() {
        let output = format!("{}1 .M broken\0", header());
        assert!(matches!(
            GitStatus::parse(output.as_bytes()),
            Err(GitError::Parse { .. })
        ));
    }

    #[test]
    fn line_stats_mark_committed_file_modified() {
        let mut status = GitStatus::parse(header().as_bytes()).expect("parse status");
        status.update_line_stats(LineStats {
            inserted: 1,
            modified: 0,
            deleted: 0,
        });
        assert_eq!(status.status_text(), "modified");

        let mut staged = GitStatus {
            file_state: FileState::STAGED,
            ..GitStatus::default()
        };
        assert!(staged.set_modified());
        assert_eq!(staged.status_text(), "staged and modified");
        assert!(!staged.set_modified());
    }

    #[test]
    fn untracked_file_is_never_marked_modified() {
        let mut status = GitStatus {
            file_state: FileState::UNTRACKED,
            ..GitStatus::default()
        };
        assert!(!status.set_modified());
        assert_eq!(status.file_state, FileState::UNTRACKED);
    }
}
