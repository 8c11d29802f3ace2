//! Popup showing the change under the cursor.

use gutter_api::DiffHunk;
use gutter_host_api::View;

use crate::command::{GitGutterCommand, Kwargs};
use crate::Result;

/// Show the hunk touching the `row` keyword or the cursor row.
///
/// Nothing is shown when the row is unchanged.
///
/// # Errors
///
/// Propagates refresh failures and hosts that cannot show popups.
pub fn show_diff_popup<V: View>(cmd: &mut GitGutterCommand<V>, kwargs: &Kwargs) -> Result<()> {
    let row = kwargs
        .get("row")
        .and_then(serde_json::Value::as_u64)
        .and_then(|row| u32::try_from(row).ok())
        .unwrap_or_else(|| cmd.view.cursor_row());

    if cmd.last_result().is_none() {
        cmd.refresh()?;
    }
    let Some(content) = cmd
        .last_result()
        .and_then(|result| result.hunk_at(row))
        .map(render_hunk)
    else {
        log::debug!("no change at row {row}");
        return Ok(());
    };

    cmd.view.show_popup(&content, row)?;
    Ok(())
}

/// Render a hunk as a unified diff fragment.
#[must_use]
pub fn render_hunk(hunk: &DiffHunk) -> String {
    let mut out = hunk.header();
    for line in &hunk.removed {
        out.push_str("\n-");
        out.push_str(line);
    }
    for line in &hunk.added {
        out.push_str("\n+");
        out.push_str(line);
    }
    out
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn modified_hunk_lists_both_sides() {
        let hunk = DiffHunk {
            base_row: 1,
            base_lines: 1,
            head_row: 1,
            head_lines: 1,
            removed: vec!["old".into()],
            added: vec!["new".into()],
        };
        assert_eq!(render_hunk(&hunk), "@@ -2,1 +2,1 @@\n-old\n+new");
    }

    #[test]
    fn deleted_hunk_has_only_removed_lines() {
        let hunk = DiffHunk {
            base_row: 1,
            base_lines: 2,
            head_row: 1,
            head_lines: 0,
            removed: vec!["b".into(), "c".into()],
            added: Vec::new(),
        };
        assert_eq!(render_hunk(&hunk), "@@ -2,2 +1,0 @@\n-b\n-c");
    }
}
