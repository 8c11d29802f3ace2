//! The `git_gutter` umbrella command.

use std::fmt;
use std::path::Path;
use std::sync::Arc;

use gutter_host_api::View;
use serde::Deserialize;
use serde_json::{Map, Value};

use crate::events::Events;
use crate::handler::{GitGutterHandler, GitHandler};
use crate::settings::{Settings, ViewSettings};
use crate::show_diff::{DiffDisplay, ShowDiff};
use crate::{compare, goto, popup, Result};

/// Name the host registers the umbrella command under.
pub const COMMAND_NAME: &str = "git_gutter";

/// View setting mirroring whether tracking is enabled.
pub const ENABLED_SETTING: &str = "git_gutter_is_enabled";

/// Keyword arguments passed along to actions.
pub type Kwargs = Map<String, Value>;

/// Why change tracking is disabled for a view.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum DisabledReason {
    /// Turned off by the `enable` setting.
    DisabledInSettings,
    /// The view has no window.
    Transient,
    /// The view is a scratch buffer.
    Scratch,
    /// The view is read-only.
    ReadOnly,
    /// The view is an input widget.
    Widget,
    /// The view hosts a REPL.
    Repl,
    /// The file is displayed as hexadecimal.
    Hexadecimal,
    /// The file is not inside a working tree.
    NoWorkTree,
    /// The git executable does not run.
    GitNotWorking,
}

impl DisabledReason {
    /// Numeric code, 1 to 9 in evaluation order.
    #[must_use]
    pub const fn code(self) -> u8 {
        match self {
            Self::DisabledInSettings => 1,
            Self::Transient => 2,
            Self::Scratch => 3,
            Self::ReadOnly => 4,
            Self::Widget => 5,
            Self::Repl => 6,
            Self::Hexadecimal => 7,
            Self::NoWorkTree => 8,
            Self::GitNotWorking => 9,
        }
    }

    /// Human readable reason used in diagnostics.
    #[must_use]
    pub const fn description(self) -> &'static str {
        match self {
            Self::DisabledInSettings => "disabled in settings",
            Self::Transient => "view is transient",
            Self::Scratch => "view is scratch",
            Self::ReadOnly => "view is readonly",
            Self::Widget => "view is a widget",
            Self::Repl => "view is a REPL",
            Self::Hexadecimal => "view encoding is Hexadecimal",
            Self::NoWorkTree => "file not in a working tree",
            Self::GitNotWorking => "git is not working",
        }
    }
}

impl fmt::Display for DisabledReason {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.description())
    }
}

/// Outcome of the enablement gate.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum EnablementState {
    /// Change tracking runs for the view.
    Enabled,
    /// Change tracking is off for the given reason.
    Disabled(DisabledReason),
}

impl EnablementState {
    /// `0` when enabled, otherwise the reason's code.
    #[must_use]
    pub const fn code(self) -> u8 {
        match self {
            Self::Enabled => 0,
            Self::Disabled(reason) => reason.code(),
        }
    }

    /// Whether tracking is enabled.
    #[must_use]
    pub const fn is_enabled(self) -> bool {
        matches!(self, Self::Enabled)
    }
}

/// Sub actions reachable through the `action` argument.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Action {
    /// Move to the next change.
    JumpToNextChange,
    /// Move to the previous change.
    JumpToPrevChange,
    /// Compare against a chosen commit.
    CompareAgainstCommit,
    /// Compare against a commit of the file's history.
    CompareAgainstFileCommit,
    /// Compare against a branch.
    CompareAgainstBranch,
    /// Compare against a tag.
    CompareAgainstTag,
    /// Compare against `HEAD`.
    CompareAgainstHead,
    /// Compare against the upstream branch.
    CompareAgainstOrigin,
    /// Show the current comparison target.
    ShowCompare,
    /// Show the diff of the change under the cursor.
    ShowDiffPopup,
}

impl Action {
    /// Every action.
    pub const ALL: [Self; 10] = [
        Self::JumpToNextChange,
        Self::JumpToPrevChange,
        Self::CompareAgainstCommit,
        Self::CompareAgainstFileCommit,
        Self::CompareAgainstBranch,
        Self::CompareAgainstTag,
        Self::CompareAgainstHead,
        Self::CompareAgainstOrigin,
        Self::ShowCompare,
        Self::ShowDiffPopup,
    ];

    /// Name used in the `action` argument.
    #[must_use]
    pub const fn name(self) -> &'static str {
        match self {
            Self::JumpToNextChange => "jump_to_next_change",
            Self::JumpToPrevChange => "jump_to_prev_change",
            Self::CompareAgainstCommit => "compare_against_commit",
            Self::CompareAgainstFileCommit => "compare_against_file_commit",
            Self::CompareAgainstBranch => "compare_against_branch",
            Self::CompareAgainstTag => "compare_against_tag",
            Self::CompareAgainstHead => "compare_against_head",
            Self::CompareAgainstOrigin => "compare_against_origin",
            Self::ShowCompare => "show_compare",
            Self::ShowDiffPopup => "show_diff_popup",
        }
    }

    /// Look up an action by name.
    #[must_use]
    pub fn from_name(name: &str) -> Option<Self> {
        Self::ALL.into_iter().find(|action| action.name() == name)
    }
}

/// Arguments of a `git_gutter` invocation as sent by the host.
#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
pub struct RunArgs {
    /// Sub action to run instead of refreshing.
    #[serde(default)]
    pub action: Option<String>,
    /// Raw bitmask of queued [`Events`].
    #[serde(default)]
    pub events: Option<u32>,
    /// Remaining keyword arguments for the action.
    #[serde(flatten)]
    pub kwargs: Kwargs,
}

impl RunArgs {
    /// Arguments running `action`.
    #[must_use]
    pub fn action(action: Action) -> Self {
        Self {
            action: Some(action.name().to_owned()),
            ..Self::default()
        }
    }

    /// Arguments for a refresh after `events`.
    #[must_use]
    pub fn events(events: Events) -> Self {
        Self {
            events: Some(events.bits()),
            ..Self::default()
        }
    }

    /// Add a keyword argument.
    #[must_use]
    pub fn with_kwarg(mut self, key: &str, value: impl Into<Value>) -> Self {
        self.kwargs.insert(key.to_owned(), value.into());
        self
    }

    /// Queued events, unknown bits dropped.
    #[must_use]
    pub const fn queued_events(&self) -> Events {
        match self.events {
            Some(bits) => Events::from_bits_truncate(bits),
            None => Events::empty(),
        }
    }
}

/// Diagnostic line explaining why tracking is disabled for a file.
#[must_use]
pub fn disabled_message(file_name: Option<&Path>, reason: DisabledReason) -> String {
    let name = file_name
        .and_then(Path::file_name)
        .map_or_else(|| "untitled".into(), |name| name.to_string_lossy());
    format!("disabled for \"{name}\" because {reason}")
}

/// Per-view session of the umbrella command.
///
/// Owns the view handle together with the git handler and renderer created
/// for it, and remembers the last enablement state.
pub struct GitGutterCommand<V> {
    pub(crate) view: V,
    pub(crate) settings: ViewSettings,
    pub(crate) handler: Box<dyn GitHandler>,
    pub(crate) show_diff: Box<dyn DiffDisplay>,
    state: Option<EnablementState>,
}

impl<V: View> GitGutterCommand<V> {
    /// Create the command for `view` with the default collaborators.
    #[must_use]
    pub fn new(view: V, settings: Arc<Settings>) -> Self {
        let handler = GitGutterHandler::new(&settings, &view);
        Self::with_collaborators(view, settings, Box::new(handler), Box::new(ShowDiff::new()))
    }

    /// Create the command with explicit collaborators.
    #[must_use]
    pub fn with_collaborators(
        view: V,
        settings: Arc<Settings>,
        handler: Box<dyn GitHandler>,
        show_diff: Box<dyn DiffDisplay>,
    ) -> Self {
        Self {
            view,
            settings: ViewSettings::new(settings),
            handler,
            show_diff,
            state: None,
        }
    }

    /// The view handle.
    pub const fn view(&self) -> &V {
        &self.view
    }

    /// Mutable access to the view handle.
    pub fn view_mut(&mut self) -> &mut V {
        &mut self.view
    }

    /// Settings lookup for this view.
    pub const fn settings(&self) -> &ViewSettings {
        &self.settings
    }

    /// Changes drawn by the last refresh.
    #[must_use]
    pub fn last_result(&self) -> Option<&gutter_api::DiffResult> {
        self.show_diff.last_result()
    }

    /// State computed by the last gate check, `None` before the first one.
    pub const fn state(&self) -> Option<EnablementState> {
        self.state
    }

    /// Decide whether the command may run for the view.
    ///
    /// Entering a disabled state clears the display and the view's file
    /// association; repeated checks with an unchanged outcome have no side
    /// effects.
    pub fn is_enabled(&mut self, events: Option<Events>) -> bool {
        let state = self.evaluate(events);
        let valid = state.is_enabled();

        if self.state != Some(state) {
            if let EnablementState::Disabled(reason) = state {
                self.show_diff.clear(&mut self.view);
                self.handler.invalidate_view_file();
                if self.settings.global().debug {
                    let file_name = self.view.file_name();
                    log::info!("{}", disabled_message(file_name.as_deref(), reason));
                }
            }
            self.view.set_setting(ENABLED_SETTING, Value::Bool(valid));
            self.state = Some(state);
        }
        valid
    }

    fn evaluate(&mut self, events: Option<Events>) -> EnablementState {
        let view = &self.view;
        let reason = if !self.settings.enable(view) {
            Some(DisabledReason::DisabledInSettings)
        } else if !view.is_attached() {
            Some(DisabledReason::Transient)
        } else if view.is_scratch() {
            Some(DisabledReason::Scratch)
        } else if view.is_read_only() {
            Some(DisabledReason::ReadOnly)
        } else if view.setting_is_truthy("is_widget") {
            Some(DisabledReason::Widget)
        } else if view.setting_is_truthy("repl") {
            Some(DisabledReason::Repl)
        } else if view.encoding() == "Hexadecimal" {
            Some(DisabledReason::Hexadecimal)
        } else {
            let validate = Events::requires_validation(events);
            if self.handler.work_tree(view, validate).is_none() {
                Some(DisabledReason::NoWorkTree)
            } else if self.handler.version(validate).is_none() {
                Some(DisabledReason::GitNotWorking)
            } else {
                None
            }
        };

        reason.map_or(EnablementState::Enabled, EnablementState::Disabled)
    }

    /// Run a sub action or, without one, refresh the displayed changes.
    ///
    /// An empty action name counts as no action.
    ///
    /// # Panics
    ///
    /// Panics if `args.action` names no known action.
    ///
    /// # Errors
    ///
    /// Propagates failures of the action or the refresh.
    #[allow(clippy::panic)]
    pub fn run(&mut self, args: &RunArgs) -> Result<()> {
        if let Some(name) = args.action.as_deref().filter(|name| !name.is_empty()) {
            // Action names are wired by the host bindings; an unknown one is a bug.
            let Some(action) = Action::from_name(name) else {
                panic!("Unhandled sub command \"{name}\"");
            };
            return self.dispatch(action, &args.kwargs);
        }

        self.run_default(args.queued_events())
    }

    fn dispatch(&mut self, action: Action, kwargs: &Kwargs) -> Result<()> {
        log::debug!("running {}", action.name());
        match action {
            Action::JumpToNextChange => goto::next_change(self, kwargs),
            Action::JumpToPrevChange => goto::prev_change(self, kwargs),
            Action::CompareAgainstCommit => compare::set_against_commit(self, kwargs),
            Action::CompareAgainstFileCommit => compare::set_against_file_commit(self, kwargs),
            Action::CompareAgainstBranch => compare::set_against_branch(self, kwargs),
            Action::CompareAgainstTag => compare::set_against_tag(self, kwargs),
            Action::CompareAgainstHead => compare::set_against_head(self, kwargs),
            Action::CompareAgainstOrigin => compare::set_against_origin(self, kwargs),
            Action::ShowCompare => compare::show_compare(self, kwargs),
            Action::ShowDiffPopup => popup::show_diff_popup(self, kwargs),
        }
    }

    fn run_default(&mut self, events: Events) -> Result<()> {
        // After a load the reference is fresh, while typing it cannot change.
        if !events.intersects(Events::KEEP_GIT_FILE) {
            self.handler.invalidate_git_file();
        }
        self.show_diff
            .run(&mut self.view, self.handler.as_mut(), &self.settings)
    }

    /// Re-run the command the way the host would after a target change.
    pub(crate) fn refresh(&mut self) -> Result<()> {
        if self.is_enabled(Some(Events::empty())) {
            self.run_default(Events::empty())?;
        }
        Ok(())
    }
}

impl<V: fmt::Debug> fmt::Debug for GitGutterCommand<V> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("GitGutterCommand")
            .field("view", &self.view)
            .field("state", &self.state)
            .finish_non_exhaustive()
    }
}
