//! Jumping between changed blocks.

use gutter_host_api::View;

use crate::command::{GitGutterCommand, Kwargs};
use crate::Result;

/// Move the cursor to the start of the next changed block.
///
/// # Errors
///
/// Propagates failures of the refresh needed when nothing was drawn yet.
pub fn next_change<V: View>(cmd: &mut GitGutterCommand<V>, _kwargs: &Kwargs) -> Result<()> {
    jump(cmd, Direction::Next)
}

/// Move the cursor to the start of the previous changed block.
///
/// # Errors
///
/// Propagates failures of the refresh needed when nothing was drawn yet.
pub fn prev_change<V: View>(cmd: &mut GitGutterCommand<V>, _kwargs: &Kwargs) -> Result<()> {
    jump(cmd, Direction::Prev)
}

#[derive(Debug, Clone, Copy)]
enum Direction {
    Next,
    Prev,
}

fn jump<V: View>(cmd: &mut GitGutterCommand<V>, direction: Direction) -> Result<()> {
    if cmd.last_result().is_none() {
        cmd.refresh()?;
    }
    let Some(result) = cmd.last_result() else {
        return Ok(());
    };

    let starts = result.change_starts();
    let wrap = cmd.settings.next_prev_change_wrap(&cmd.view);
    let current = cmd.view.cursor_row();

    if let Some(row) = target_row(&starts, current, direction, wrap) {
        log::trace!("moving cursor from row {current} to {row}");
        cmd.view.move_cursor(row);
    }
    Ok(())
}

fn target_row(starts: &[u32], current: u32, direction: Direction, wrap: bool) -> Option<u32> {
    match direction {
        Direction::Next => starts
            .iter()
            .copied()
            .find(|&row| row > current)
            .or_else(|| wrap.then(|| starts.first().copied()).flatten()),
        Direction::Prev => starts
            .iter()
            .rev()
            .copied()
            .find(|&row| row < current)
            .or_else(|| wrap.then(|| starts.last().copied()).flatten()),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn next_finds_following_block() {
        let starts = [2, 7, 12];
        assert_eq!(target_row(&starts, 0, Direction::Next, false), Some(2));
        assert_eq!(target_row(&starts, 2, Direction::Next, false), Some(7));
        assert_eq!(target_row(&starts, 12, Direction::Next, false), None);
        assert_eq!(target_row(&starts, 12, Direction::Next, true), Some(2));
    }

    #[test]
    fn prev_finds_preceding_block() {
        let starts = [2, 7, 12];
        assert_eq!(target_row(&starts, 8, Direction::Prev, false), Some(7));
        assert_eq!(target_row(&starts, 2, Direction::Prev, false), None);
        assert_eq!(target_row(&starts, 2, Direction::Prev, true), Some(12));
    }

    #[test]
    fn no_changes_never_moves() {
        assert_eq!(target_row(&[], 4, Direction::Next, true), None);
        assert_eq!(target_row(&[], 4, Direction::Prev, true), None);
    }
}
