#![allow(dead_code)]

use std::path::PathBuf;
use std::sync::{Arc, Mutex};

use gutter_core::handler::{GitHandler, RevisionKind};
use gutter_core::show_diff::DiffDisplay;
use gutter_core::{
    CompareTarget, DiffResult, Error, GitGutterCommand, MemoryView, Result, RevisionEntry, Settings,
    View, ViewSettings,
};
use gutter_git::{GitStatus, GitVersion};

/// Observable state shared between a test and its fakes.
#[derive(Debug)]
pub struct Probe {
    pub work_tree: Option<PathBuf>,
    pub version: Option<GitVersion>,
    pub target: CompareTarget,
    pub revisions: Vec<RevisionEntry>,
    pub result: DiffResult,
    pub fail_runs: bool,
    pub validations: Vec<bool>,
    pub work_tree_calls: usize,
    pub version_calls: usize,
    pub invalidate_view_file: usize,
    pub invalidate_git_file: usize,
    pub clears: usize,
    pub runs: usize,
}

impl Default for Probe {
    fn default() -> Self {
        Self {
            work_tree: Some(PathBuf::from("/work/project")),
            version: Some(GitVersion::new(2, 40, 0)),
            target: CompareTarget::Head,
            revisions: Vec::new(),
            result: DiffResult::default(),
            fail_runs: false,
            validations: Vec::new(),
            work_tree_calls: 0,
            version_calls: 0,
            invalidate_view_file: 0,
            invalidate_git_file: 0,
            clears: 0,
            runs: 0,
        }
    }
}

pub type SharedProbe = Arc<Mutex<Probe>>;

pub struct FakeHandler(pub SharedProbe);

impl GitHandler for FakeHandler {
    fn work_tree(&mut self, _view: &dyn View, validate: bool) -> Option<PathBuf> {
        let mut probe = self.0.lock().expect("probe");
        probe.work_tree_calls += 1;
        probe.validations.push(validate);
        probe.work_tree.clone()
    }

    fn version(&mut self, _validate: bool) -> Option<GitVersion> {
        let mut probe = self.0.lock().expect("probe");
        probe.version_calls += 1;
        probe.version
    }

    fn invalidate_view_file(&mut self) {
        self.0.lock().expect("probe").invalidate_view_file += 1;
    }

    fn invalidate_git_file(&mut self) {
        self.0.lock().expect("probe").invalidate_git_file += 1;
    }

    fn compare_against(&self) -> CompareTarget {
        self.0.lock().expect("probe").target.clone()
    }

    fn set_compare_against(&mut self, _view: &mut dyn View, target: CompareTarget) {
        self.0.lock().expect("probe").target = target;
    }

    fn git_file(&mut self, _view: &dyn View) -> Result<Option<String>> {
        Ok(None)
    }

    fn status(&mut self, _view: &dyn View) -> Result<GitStatus> {
        Ok(GitStatus::default())
    }

    fn revisions(&mut self, _view: &dyn View, _kind: RevisionKind) -> Result<Vec<RevisionEntry>> {
        Ok(self.0.lock().expect("probe").revisions.clone())
    }
}

pub struct FakeDisplay {
    probe: SharedProbe,
    last: Option<DiffResult>,
}

impl DiffDisplay for FakeDisplay {
    fn clear(&mut self, _view: &mut dyn View) {
        self.last = None;
        self.probe.lock().expect("probe").clears += 1;
    }

    fn run(
        &mut self,
        _view: &mut dyn View,
        _handler: &mut dyn GitHandler,
        _settings: &ViewSettings,
    ) -> Result<()> {
        let mut probe = self.probe.lock().expect("probe");
        probe.runs += 1;
        if probe.fail_runs {
            return Err(Error::NoWorkTree {
                path: "lib.rs".to_owned(),
            });
        }
        self.last = Some(probe.result.clone());
        Ok(())
    }

    fn last_result(&self) -> Option<&DiffResult> {
        self.last.as_ref()
    }
}

pub fn command_with(
    view: MemoryView,
    settings: Settings,
) -> (GitGutterCommand<MemoryView>, SharedProbe) {
    let probe = SharedProbe::default();
    let cmd = GitGutterCommand::with_collaborators(
        view,
        Arc::new(settings),
        Box::new(FakeHandler(Arc::clone(&probe))),
        Box::new(FakeDisplay {
            probe: Arc::clone(&probe),
            last: None,
        }),
    );
    (cmd, probe)
}

pub fn command(view: MemoryView) -> (GitGutterCommand<MemoryView>, SharedProbe) {
    command_with(view, Settings::default())
}

pub fn file_view(text: &str) -> MemoryView {
    MemoryView::new(text).with_file_name("/work/project/src/lib.rs")
}
