use std::ffi::{OsStr, OsString};
use std::io::{self, Read};
use std::path::Path;
use std::process::{Command, Stdio};
use std::thread;
use std::time::Duration;

use gutter_api::RevisionEntry;
use wait_timeout::ChildExt;

use crate::{GitError, GitResult, GitStatus, GitVersion};

/// Time a single git invocation may take before it is killed.
pub const DEFAULT_TIMEOUT: Duration = Duration::from_secs(10);

const FIELD_SEPARATOR: char = '\u{1f}';
const LOG_FORMAT: &str = "--format=%H%x1f%s%x1f%an%x1f%at";
const REF_FORMAT: &str = "--format=%(refname:short)%1f%(subject)%1f%(authorname)%1f%(creatordate:unix)";

/// Invokes the `git` executable.
#[derive(Debug, Clone)]
pub struct GitCli {
    binary: OsString,
    timeout: Duration,
}

impl Default for GitCli {
    fn default() -> Self {
        Self::new("git")
    }
}

impl GitCli {
    /// Wrapper around `binary` with the default timeout.
    pub fn new(binary: impl Into<OsString>) -> Self {
        Self {
            binary: binary.into(),
            timeout: DEFAULT_TIMEOUT,
        }
    }

    /// Override the per-invocation timeout.
    #[must_use]
    pub const fn with_timeout(mut self, timeout: Duration) -> Self {
        self.timeout = timeout;
        self
    }

    /// Executable being invoked.
    #[must_use]
    pub fn binary(&self) -> &OsStr {
        &self.binary
    }

    /// Query `git --version`.
    ///
    /// # Errors
    ///
    /// Returns an error if git cannot be run or prints something unexpected.
    pub fn version(&self) -> GitResult<GitVersion> {
        let output = self.run(None, &["--version"])?;
        output.stdout_text().parse()
    }

    /// Content of `path` (relative to `work_tree`) at `revision`.
    ///
    /// Returns `Ok(None)` if the path does not exist at that revision.
    ///
    /// # Errors
    ///
    /// Returns an error for any other git failure, such as an unknown revision.
    pub fn show(&self, work_tree: &Path, revision: &str, path: &str) -> GitResult<Option<String>> {
        let object = format!("{revision}:{path}");
        match self.run(Some(work_tree), &["show", "--no-textconv", &object]) {
            Ok(output) => Ok(Some(output.stdout_text())),
            Err(GitError::Failed { stderr, .. }) if is_missing_path(&stderr) => Ok(None),
            Err(err) => Err(err),
        }
    }

    /// Branch and file status of `path`.
    ///
    /// # Errors
    ///
    /// Returns an error if git fails or the output cannot be parsed.
    pub fn status(&self, work_tree: &Path, path: &str) -> GitResult<GitStatus> {
        let output = self.run(
            Some(work_tree),
            &[
                "status",
                "--porcelain=2",
                "-z",
                "-b",
                "-u",
                "--ignored",
                "--",
                path,
            ],
        )?;
        GitStatus::parse(&output.stdout)
    }

    /// Recent commits of all references, newest first.
    ///
    /// # Errors
    ///
    /// Returns an error if git fails.
    pub fn commits(&self, work_tree: &Path, limit: usize) -> GitResult<Vec<RevisionEntry>> {
        let limit = format!("-n{limit}");
        let output = self.run(Some(work_tree), &["log", "--all", LOG_FORMAT, &limit])?;
        Ok(parse_entries(&output.stdout_text()))
    }

    /// Commits that touched `path`, following renames, newest first.
    ///
    /// # Errors
    ///
    /// Returns an error if git fails.
    pub fn file_commits(
        &self,
        work_tree: &Path,
        path: &str,
        limit: usize,
    ) -> GitResult<Vec<RevisionEntry>> {
        let limit = format!("-n{limit}");
        let output = self.run(
            Some(work_tree),
            &["log", LOG_FORMAT, &limit, "--follow", "--", path],
        )?;
        Ok(parse_entries(&output.stdout_text()))
    }

    /// Local branches, most recently committed first.
    ///
    /// # Errors
    ///
    /// Returns an error if git fails.
    pub fn branches(&self, work_tree: &Path) -> GitResult<Vec<RevisionEntry>> {
        self.refs(work_tree, "refs/heads")
    }

    /// Tags, most recently created first.
    ///
    /// # Errors
    ///
    /// Returns an error if git fails.
    pub fn tags(&self, work_tree: &Path) -> GitResult<Vec<RevisionEntry>> {
        self.refs(work_tree, "refs/tags")
    }

    fn refs(&self, work_tree: &Path, namespace: &str) -> GitResult<Vec<RevisionEntry>> {
        let output = self.run(
            Some(work_tree),
            &["for-each-ref", "--sort=-creatordate", REF_FORMAT, namespace],
        )?;
        Ok(parse_entries(&output.stdout_text()))
    }

    fn run(&self, work_tree: Option<&Path>, args: &[&str]) -> GitResult<ProcessOutput> {
        let sub_command = args.first().copied().unwrap_or_default().to_owned();
        let mut command = Command::new(&self.binary);
        command.args(args);
        if let Some(dir) = work_tree {
            command.current_dir(dir);
        }
        command.stdin(Stdio::null());
        command.stdout(Stdio::piped());
        command.stderr(Stdio::piped());
        // Stable messages and no lock contention with the user's own git usage.
        command.env("LC_ALL", "C");
        command.env("GIT_OPTIONAL_LOCKS", "0");
        command.env("GIT_TERMINAL_PROMPT", "0");

        log::trace!("running {:?} {}", self.binary, args.join(" "));

        let mut child = command.spawn().map_err(|source| GitError::Spawn {
            binary: self.binary.to_string_lossy().into_owned(),
            source,
        })?;

        let stdout_handle = child.stdout.take().map(|mut stdout| {
            thread::spawn(move || -> io::Result<Vec<u8>> {
                let mut buffer = Vec::new();
                stdout.read_to_end(&mut buffer)?;
                Ok(buffer)
            })
        });

        let stderr_handle = child.stderr.take().map(|mut stderr| {
            thread::spawn(move || -> io::Result<Vec<u8>> {
                let mut buffer = Vec::new();
                stderr.read_to_end(&mut buffer)?;
                Ok(buffer)
            })
        });

        match child.wait_timeout(self.timeout) {
            Ok(Some(_)) => (),
            Ok(None) => {
                let _ = child.kill();
                let _ = child.wait();
                return Err(GitError::Timeout {
                    command: sub_command,
                    timeout: self.timeout,
                });
            }
            Err(source) => {
                let _ = child.kill();
                let _ = child.wait();
                return Err(GitError::Io { source });
            }
        }

        let status = child.wait().map_err(|source| GitError::Io { source })?;

        let stdout = join_reader(stdout_handle)?;
        let stderr = String::from_utf8_lossy(&join_reader(stderr_handle)?).into_owned();

        if !status.success() {
            let code = status
                .code()
                .map_or_else(|| "terminated".to_string(), |c| c.to_string());
            return Err(GitError::Failed {
                command: sub_command,
                code,
                stderr: stderr.trim().to_owned(),
            });
        }

        Ok(ProcessOutput { stdout })
    }
}

fn join_reader(handle: Option<thread::JoinHandle<io::Result<Vec<u8>>>>) -> GitResult<Vec<u8>> {
    match handle {
        Some(handle) => handle
            .join()
            .map_err(|_| GitError::Io {
                source: io::Error::other("output reader panicked"),
            })?
            .map_err(|source| GitError::Io { source }),
        None => Ok(Vec::new()),
    }
}

#[derive(Debug)]
struct ProcessOutput {
    stdout: Vec<u8>,
}

impl ProcessOutput {
    fn stdout_text(&self) -> String {
        String::from_utf8_lossy(&self.stdout).into_owned()
    }
}

fn is_missing_path(stderr: &str) -> bool {
    stderr.contains("does not exist in") || stderr.contains("exists on disk, but not in")
}

fn parse_entries(output: &str) -> Vec<RevisionEntry> {
    output.lines().filter_map(parse_entry).collect()
}

fn parse_entry(line: &str) -> Option<RevisionEntry> {
    let mut fields = line.split(FIELD_SEPARATOR);
    let reference = fields.next().map(str::trim).filter(|r| !r.is_empty())?;
    let mut entry = RevisionEntry::new(reference);
    entry.summary = fields.next().filter(|s| !s.is_empty()).map(str::to_owned);
    entry.author = fields.next().filter(|s| !s.is_empty()).map(str::to_owned);
    entry.timestamp = fields.next().and_then(|s| s.trim().parse().ok());
    Some(entry)
}
