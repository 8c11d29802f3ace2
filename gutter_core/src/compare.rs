//! Choosing the revision the buffer is compared against.

use gutter_api::{CompareTarget, RevisionEntry};
use gutter_host_api::{QuickPanelItem, View};

use crate::command::{GitGutterCommand, Kwargs};
use crate::handler::RevisionKind;
use crate::Result;

/// Compare against a commit of the repository history.
///
/// Uses the `commit` keyword when given, otherwise asks the user.
///
/// # Errors
///
/// Propagates failures listing revisions or refreshing the display.
pub fn set_against_commit<V: View>(cmd: &mut GitGutterCommand<V>, kwargs: &Kwargs) -> Result<()> {
    set_from_choice(cmd, kwargs, "commit", RevisionKind::Commits, CompareTarget::Commit)
}

/// Compare against a commit that touched the current file.
///
/// # Errors
///
/// Propagates failures listing revisions or refreshing the display.
pub fn set_against_file_commit<V: View>(
    cmd: &mut GitGutterCommand<V>,
    kwargs: &Kwargs,
) -> Result<()> {
    set_from_choice(
        cmd,
        kwargs,
        "commit",
        RevisionKind::FileCommits,
        CompareTarget::FileCommit,
    )
}

/// Compare against a local branch.
///
/// # Errors
///
/// Propagates failures listing revisions or refreshing the display.
pub fn set_against_branch<V: View>(cmd: &mut GitGutterCommand<V>, kwargs: &Kwargs) -> Result<()> {
    set_from_choice(cmd, kwargs, "branch", RevisionKind::Branches, CompareTarget::Branch)
}

/// Compare against a tag.
///
/// # Errors
///
/// Propagates failures listing revisions or refreshing the display.
pub fn set_against_tag<V: View>(cmd: &mut GitGutterCommand<V>, kwargs: &Kwargs) -> Result<()> {
    set_from_choice(cmd, kwargs, "tag", RevisionKind::Tags, CompareTarget::Tag)
}

/// Compare against `HEAD`.
///
/// # Errors
///
/// Propagates failures refreshing the display.
pub fn set_against_head<V: View>(cmd: &mut GitGutterCommand<V>, _kwargs: &Kwargs) -> Result<()> {
    apply(cmd, CompareTarget::Head)
}

/// Compare against the upstream of the current branch.
///
/// # Errors
///
/// Propagates failures refreshing the display.
pub fn set_against_origin<V: View>(cmd: &mut GitGutterCommand<V>, _kwargs: &Kwargs) -> Result<()> {
    apply(cmd, CompareTarget::Origin)
}

/// Tell the user what the buffer is compared against.
///
/// # Errors
///
/// Never fails; the signature matches the other actions.
pub fn show_compare<V: View>(cmd: &mut GitGutterCommand<V>, _kwargs: &Kwargs) -> Result<()> {
    let target = cmd.handler.compare_against();
    cmd.view
        .message_dialog(&format!("Git Gutter is comparing against: {target}"));
    Ok(())
}

fn set_from_choice<V: View>(
    cmd: &mut GitGutterCommand<V>,
    kwargs: &Kwargs,
    keyword: &str,
    kind: RevisionKind,
    make: fn(String) -> CompareTarget,
) -> Result<()> {
    if let Some(value) = kwargs.get(keyword).and_then(|value| value.as_str()) {
        return apply(cmd, make(value.to_owned()));
    }

    let entries = cmd.handler.revisions(&cmd.view, kind)?;
    let Some(reference) = choose(&mut cmd.view, &entries) else {
        log::debug!("revision selection cancelled");
        return Ok(());
    };
    apply(cmd, make(reference))
}

fn choose(view: &mut dyn View, entries: &[RevisionEntry]) -> Option<String> {
    if entries.is_empty() {
        return None;
    }
    let items: Vec<QuickPanelItem> = entries.iter().map(QuickPanelItem::from).collect();
    let index = view.choose(&items)?;
    entries.get(index).map(|entry| entry.reference.clone())
}

fn apply<V: View>(cmd: &mut GitGutterCommand<V>, target: CompareTarget) -> Result<()> {
    log::debug!("comparing against {target}");
    cmd.handler.set_compare_against(&mut cmd.view, target);
    cmd.refresh().inspect_err(|err| {
        log::debug!("refresh against new target failed: {err}");
        // Markers of the previous target must not stay on screen.
        cmd.show_diff.clear(&mut cmd.view);
    })
}
