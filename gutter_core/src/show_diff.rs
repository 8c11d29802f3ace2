//! Draws change markers and the status summary for a view.

use std::collections::BTreeSet;

use gutter_api::{DiffResult, RegionKind};
use gutter_git::{FileState, GitStatus};
use gutter_host_api::View;

use crate::diff::DiffEngine;
use crate::handler::GitHandler;
use crate::settings::ViewSettings;
use crate::Result;

/// Status bar slot used for the change summary.
pub const STATUS_KEY: &str = "git_gutter_status";

/// Presents the changes of a view.
pub trait DiffDisplay {
    /// Remove every marker and the status summary.
    fn clear(&mut self, view: &mut dyn View);

    /// Recompute the changes and redraw them.
    ///
    /// # Errors
    ///
    /// Propagates git and host failures.
    fn run(
        &mut self,
        view: &mut dyn View,
        handler: &mut dyn GitHandler,
        settings: &ViewSettings,
    ) -> Result<()>;

    /// Changes computed by the last successful run.
    fn last_result(&self) -> Option<&DiffResult>;
}

/// Default [`DiffDisplay`] drawing gutter regions.
#[derive(Debug, Default)]
pub struct ShowDiff {
    engine: DiffEngine,
    last: Option<DiffResult>,
}

impl ShowDiff {
    /// Create a renderer with no cached result.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    fn draw_untracked(
        view: &mut dyn View,
        status: &GitStatus,
        settings: &ViewSettings,
        line_count: u32,
    ) {
        erase_regions(view);
        if !settings.show_markers_on_untracked_file(view) {
            return;
        }
        let kind = if status.file_state.contains(FileState::IGNORED) {
            RegionKind::Ignored
        } else {
            RegionKind::Untracked
        };
        let rows: Vec<u32> = (0..line_count).collect();
        view.add_regions(kind.key(), &rows);
    }
}

impl DiffDisplay for ShowDiff {
    fn clear(&mut self, view: &mut dyn View) {
        self.last = None;
        erase_regions(view);
        view.erase_status(STATUS_KEY);
    }

    fn run(
        &mut self,
        view: &mut dyn View,
        handler: &mut dyn GitHandler,
        settings: &ViewSettings,
    ) -> Result<()> {
        let mut status = handler.status(view)?;
        let buffer = view.text();

        if status.is_ignored_or_untracked() {
            let line_count = self.engine.diff("", &buffer).line_count;
            Self::draw_untracked(view, &status, settings, line_count);
            self.last = Some(DiffResult {
                line_count,
                ..DiffResult::default()
            });
        } else {
            let reference = handler.git_file(view)?;
            let result = self.engine.diff(reference.as_deref().unwrap_or_default(), &buffer);
            draw_regions(view, &result);
            status.update_line_stats(result.stats());
            self.last = Some(result);
        }

        if settings.show_status_bar_text(view) {
            let text = status_text(&status, &handler.compare_against().to_string());
            view.set_status(STATUS_KEY, &text);
        } else {
            view.erase_status(STATUS_KEY);
        }
        Ok(())
    }

    fn last_result(&self) -> Option<&DiffResult> {
        self.last.as_ref()
    }
}

fn erase_regions(view: &mut dyn View) {
    for kind in RegionKind::ALL {
        view.erase_regions(kind.key());
    }
}

fn draw_regions(view: &mut dyn View, result: &DiffResult) {
    let mut top = BTreeSet::new();
    let mut bottom = BTreeSet::new();
    for &row in &result.deleted {
        if row < result.line_count {
            top.insert(row);
        } else {
            bottom.insert(result.clamp_row(row));
        }
    }
    let dual: BTreeSet<u32> = top.intersection(&bottom).copied().collect();

    let regions = [
        (RegionKind::Inserted, result.inserted.clone()),
        (RegionKind::Modified, result.modified.clone()),
        (RegionKind::DeletedTop, top.difference(&dual).copied().collect()),
        (
            RegionKind::DeletedBottom,
            bottom.difference(&dual).copied().collect(),
        ),
        (RegionKind::DeletedDual, dual.into_iter().collect()),
        (RegionKind::Untracked, Vec::new()),
        (RegionKind::Ignored, Vec::new()),
    ];

    for (kind, rows) in regions {
        if rows.is_empty() {
            view.erase_regions(kind.key());
        } else {
            view.add_regions(kind.key(), &rows);
        }
    }
}

/// Status bar summary, e.g. `main, modified, +1 ~2 -0, vs HEAD`.
#[must_use]
pub fn status_text(status: &GitStatus, target: &str) -> String {
    let branch = status.branch.as_deref().unwrap_or("(no branch)");
    let lines = status.lines;
    format!(
        "{branch}, {state}, +{inserted} ~{modified} -{deleted}, vs {target}",
        state = status.status_text(),
        inserted = lines.inserted,
        modified = lines.modified,
        deleted = lines.deleted,
    )
}

#[cfg(test)]
mod tests {
    use gutter_api::LineStats;
    use gutter_host_api::MemoryView;

    use super::*;

    #[test]
    fn deletion_markers_split_top_bottom_and_dual() {
        let mut view = MemoryView::new("a\nb\nc\n");
        let result = DiffResult {
            line_count: 3,
            inserted: vec![0],
            modified: Vec::new(),
            deleted: vec![1, 2, 3],
            hunks: Vec::new(),
        };
        draw_regions(&mut view, &result);

        assert_eq!(view.regions(RegionKind::Inserted.key()), &[0]);
        assert!(view.regions(RegionKind::Modified.key()).is_empty());
        assert_eq!(view.regions(RegionKind::DeletedTop.key()), &[1]);
        assert!(view.regions(RegionKind::DeletedBottom.key()).is_empty());
        assert_eq!(view.regions(RegionKind::DeletedDual.key()), &[2]);
    }

    #[test]
    fn clear_erases_everything() {
        let mut view = MemoryView::new("a\n");
        view.add_regions(RegionKind::Modified.key(), &[0]);
        view.set_status(STATUS_KEY, "main");

        let mut show_diff = ShowDiff::new();
        show_diff.clear(&mut view);

        assert!(view.regions(RegionKind::Modified.key()).is_empty());
        assert!(view.status(STATUS_KEY).is_none());
        assert!(show_diff.last_result().is_none());
    }

    #[test]
    fn status_text_summarizes_changes() {
        let status = GitStatus {
            branch: Some("main".into()),
            file_state: FileState::MODIFIED,
            lines: LineStats {
                inserted: 1,
                modified: 2,
                deleted: 0,
            },
            ..GitStatus::default()
        };
        assert_eq!(
            status_text(&status, "HEAD"),
            "main, modified, +1 ~2 -0, vs HEAD"
        );
    }
}
