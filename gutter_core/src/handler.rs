//! Per-view association between a buffer and its git work tree.

use std::path::PathBuf;

use gutter_api::{CompareTarget, RevisionEntry};
use gutter_git::{GitCli, GitStatus, GitVersion};
use gutter_host_api::View;
use serde_json::Value;

use crate::repository::WorkTree;
use crate::settings::Settings;
use crate::{Error, Result};

/// View setting holding the comparison target of a view.
pub const COMPARE_SETTING: &str = "git_gutter_compare_against";

/// Revision listings offered when choosing a comparison target.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RevisionKind {
    /// Recent commits of all references.
    Commits,
    /// Commits touching the view's file.
    FileCommits,
    /// Local branches.
    Branches,
    /// Tags.
    Tags,
}

/// Git queries made on behalf of one view.
///
/// Lookups that touch the filesystem or spawn git are cached; `validate`
/// forces a fresh lookup.
pub trait GitHandler {
    /// Root of the work tree containing the view's file.
    fn work_tree(&mut self, view: &dyn View, validate: bool) -> Option<PathBuf>;

    /// Version of the git executable, `None` if git does not run.
    fn version(&mut self, validate: bool) -> Option<GitVersion>;

    /// Forget the association between the view and its file in the work tree.
    fn invalidate_view_file(&mut self);

    /// Forget the cached reference content.
    fn invalidate_git_file(&mut self);

    /// Current comparison target.
    fn compare_against(&self) -> CompareTarget;

    /// Change the comparison target and remember it in the view.
    fn set_compare_against(&mut self, view: &mut dyn View, target: CompareTarget);

    /// Content of the view's file at the comparison target, `None` if the
    /// file does not exist there.
    ///
    /// # Errors
    ///
    /// Returns an error if the file has no work tree or git fails.
    fn git_file(&mut self, view: &dyn View) -> Result<Option<String>>;

    /// Branch and file status of the view's file.
    ///
    /// # Errors
    ///
    /// Returns an error if the file has no work tree or git fails.
    fn status(&mut self, view: &dyn View) -> Result<GitStatus>;

    /// Revisions to choose a comparison target from.
    ///
    /// # Errors
    ///
    /// Returns an error if the file has no work tree or git fails.
    fn revisions(&mut self, view: &dyn View, kind: RevisionKind) -> Result<Vec<RevisionEntry>>;
}

/// [`GitHandler`] backed by libgit2 discovery and the git executable.
#[derive(Debug)]
pub struct GitGutterHandler {
    cli: GitCli,
    revision_limit: usize,
    target: CompareTarget,
    work_tree: Option<WorkTree>,
    work_tree_checked: bool,
    view_file: Option<String>,
    version: Option<GitVersion>,
    version_checked: bool,
    git_file: Option<Option<String>>,
}

impl GitGutterHandler {
    /// Create the handler for `view`, restoring a comparison target stored
    /// in the view or falling back to the configured one.
    #[must_use]
    pub fn new(settings: &Settings, view: &dyn View) -> Self {
        let target = view
            .setting(COMPARE_SETTING)
            .and_then(|value| parse_target(&value))
            .unwrap_or_else(|| CompareTarget::from_setting(&settings.compare_against));

        Self {
            cli: GitCli::new(&settings.git_binary).with_timeout(settings.git_timeout()),
            revision_limit: settings.revision_limit,
            target,
            work_tree: None,
            work_tree_checked: false,
            view_file: None,
            version: None,
            version_checked: false,
            git_file: None,
        }
    }

    fn head_is_unborn(&self) -> Result<bool> {
        self.work_tree
            .as_ref()
            .map_or(Ok(false), WorkTree::is_unborn)
    }

    fn require_work_tree(&mut self, view: &dyn View) -> Result<(PathBuf, String)> {
        let no_work_tree = || Error::NoWorkTree {
            path: view
                .file_name()
                .map_or_else(|| "untitled".to_owned(), |p| p.display().to_string()),
        };

        let root = self.work_tree(view, false).ok_or_else(no_work_tree)?;
        if self.view_file.is_none() {
            self.view_file = view
                .file_name()
                .zip(self.work_tree.as_ref())
                .and_then(|(file, work_tree)| work_tree.relative_path(&file));
        }
        let path = self.view_file.clone().ok_or_else(no_work_tree)?;
        Ok((root, path))
    }
}

impl GitHandler for GitGutterHandler {
    fn work_tree(&mut self, view: &dyn View, validate: bool) -> Option<PathBuf> {
        if validate || !self.work_tree_checked {
            self.work_tree_checked = true;
            let discovered = view.file_name().and_then(|file| {
                WorkTree::discover(&file)
                    .map_err(|err| log::debug!("no work tree for {}: {err}", file.display()))
                    .ok()
            });
            if discovered != self.work_tree {
                self.view_file = None;
                self.git_file = None;
            }
            self.work_tree = discovered;
        }
        self.work_tree.as_ref().map(|work_tree| work_tree.root().to_path_buf())
    }

    fn version(&mut self, validate: bool) -> Option<GitVersion> {
        if validate || !self.version_checked {
            self.version_checked = true;
            self.version = self
                .cli
                .version()
                .map_err(|err| log::debug!("git is not working: {err}"))
                .ok();
        }
        self.version
    }

    fn invalidate_view_file(&mut self) {
        self.view_file = None;
    }

    fn invalidate_git_file(&mut self) {
        self.git_file = None;
    }

    fn compare_against(&self) -> CompareTarget {
        self.target.clone()
    }

    fn set_compare_against(&mut self, view: &mut dyn View, target: CompareTarget) {
        match serde_json::to_value(&target) {
            Ok(value) => view.set_setting(COMPARE_SETTING, value),
            Err(err) => log::warn!("failed to store comparison target: {err}"),
        }
        self.target = target;
        self.invalidate_git_file();
    }

    fn git_file(&mut self, view: &dyn View) -> Result<Option<String>> {
        if let Some(content) = &self.git_file {
            return Ok(content.clone());
        }
        let (root, path) = self.require_work_tree(view)?;
        let content = if self.target == CompareTarget::Head && self.head_is_unborn()? {
            // Nothing is committed yet, so every line is new.
            None
        } else {
            self.cli.show(&root, &self.target.revision(), &path)?
        };
        self.git_file = Some(content.clone());
        Ok(content)
    }

    fn status(&mut self, view: &dyn View) -> Result<GitStatus> {
        let (root, path) = self.require_work_tree(view)?;
        Ok(self.cli.status(&root, &path)?)
    }

    fn revisions(&mut self, view: &dyn View, kind: RevisionKind) -> Result<Vec<RevisionEntry>> {
        let (root, path) = self.require_work_tree(view)?;
        let entries = match kind {
            RevisionKind::Commits => self.cli.commits(&root, self.revision_limit)?,
            RevisionKind::FileCommits => {
                self.cli.file_commits(&root, &path, self.revision_limit)?
            }
            RevisionKind::Branches => self.cli.branches(&root)?,
            RevisionKind::Tags => self.cli.tags(&root)?,
        };
        Ok(entries)
    }
}

fn parse_target(value: &Value) -> Option<CompareTarget> {
    match value {
        Value::String(text) => Some(CompareTarget::from_setting(text)),
        Value::Object(_) => serde_json::from_value(value.clone()).ok(),
        _ => None,
    }
}
