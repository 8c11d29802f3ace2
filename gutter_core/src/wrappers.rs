//! Per-action commands the host can bind to keys and menus.
//!
//! Each wrapper forwards to [`GitGutterCommand::run`] with a fixed action and
//! is only offered while the view has change tracking enabled.

use gutter_host_api::View;

use crate::command::{Action, GitGutterCommand, RunArgs, ENABLED_SETTING};
use crate::Result;

/// Wrapper commands, one per action.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum WrapperCommand {
    /// `git_gutter_next_change`
    NextChange,
    /// `git_gutter_prev_change`
    PrevChange,
    /// `git_gutter_compare_commit`
    CompareCommit,
    /// `git_gutter_compare_file_commit`
    CompareFileCommit,
    /// `git_gutter_compare_branch`
    CompareBranch,
    /// `git_gutter_compare_tag`
    CompareTag,
    /// `git_gutter_compare_head`
    CompareHead,
    /// `git_gutter_compare_origin`
    CompareOrigin,
    /// `git_gutter_show_compare`
    ShowCompare,
    /// `git_gutter_diff_popup`
    DiffPopup,
}

impl WrapperCommand {
    /// Every wrapper command.
    pub const ALL: [Self; 10] = [
        Self::NextChange,
        Self::PrevChange,
        Self::CompareCommit,
        Self::CompareFileCommit,
        Self::CompareBranch,
        Self::CompareTag,
        Self::CompareHead,
        Self::CompareOrigin,
        Self::ShowCompare,
        Self::DiffPopup,
    ];

    /// Name the host registers the command under.
    #[must_use]
    pub const fn name(self) -> &'static str {
        match self {
            Self::NextChange => "git_gutter_next_change",
            Self::PrevChange => "git_gutter_prev_change",
            Self::CompareCommit => "git_gutter_compare_commit",
            Self::CompareFileCommit => "git_gutter_compare_file_commit",
            Self::CompareBranch => "git_gutter_compare_branch",
            Self::CompareTag => "git_gutter_compare_tag",
            Self::CompareHead => "git_gutter_compare_head",
            Self::CompareOrigin => "git_gutter_compare_origin",
            Self::ShowCompare => "git_gutter_show_compare",
            Self::DiffPopup => "git_gutter_diff_popup",
        }
    }

    /// The action the wrapper forwards to.
    #[must_use]
    pub const fn action(self) -> Action {
        match self {
            Self::NextChange => Action::JumpToNextChange,
            Self::PrevChange => Action::JumpToPrevChange,
            Self::CompareCommit => Action::CompareAgainstCommit,
            Self::CompareFileCommit => Action::CompareAgainstFileCommit,
            Self::CompareBranch => Action::CompareAgainstBranch,
            Self::CompareTag => Action::CompareAgainstTag,
            Self::CompareHead => Action::CompareAgainstHead,
            Self::CompareOrigin => Action::CompareAgainstOrigin,
            Self::ShowCompare => Action::ShowCompare,
            Self::DiffPopup => Action::ShowDiffPopup,
        }
    }

    /// Look up a wrapper by its registered name.
    #[must_use]
    pub fn from_name(name: &str) -> Option<Self> {
        Self::ALL.into_iter().find(|command| command.name() == name)
    }

    /// Whether the host should offer the command for `view`.
    #[must_use]
    pub fn is_enabled(view: &dyn View) -> bool {
        view.setting(ENABLED_SETTING)
            .and_then(|value| value.as_bool())
            .unwrap_or(false)
    }

    /// Forward to the umbrella command.
    ///
    /// # Errors
    ///
    /// Propagates failures of the action.
    pub fn run<V: View>(self, cmd: &mut GitGutterCommand<V>) -> Result<()> {
        cmd.run(&RunArgs::action(self.action()))
    }
}
